use sea_orm::entity::prelude::*;

/// The interaction service's own copy of a content record.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "catalog_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub release_date: Option<String>,
    pub genre_id: Option<String>,
    pub average_rating: Option<f64>,
    pub subtitle_set_id: Option<String>,
    pub dub_set_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
