pub use sea_orm_migration::prelude::*;

mod m20241110_000001_create_content_tables;
mod m20241110_000002_create_user_tables;
mod m20241110_000003_create_interaction_tables;

/// Schema of the content service database.
pub struct ContentMigrator;

#[async_trait::async_trait]
impl MigratorTrait for ContentMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20241110_000001_create_content_tables::Migration)]
    }
}

/// Schema of the user service database, seeded with the subscription plans.
pub struct UserMigrator;

#[async_trait::async_trait]
impl MigratorTrait for UserMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20241110_000002_create_user_tables::Migration)]
    }
}

/// Schema of the interaction service database.
pub struct InteractionMigrator;

#[async_trait::async_trait]
impl MigratorTrait for InteractionMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20241110_000003_create_interaction_tables::Migration)]
    }
}
