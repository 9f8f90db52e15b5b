use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait, sea_query::OnConflict,
};
use tracing::debug;

use super::{StoreError, StoreResult, now_sec, require_non_empty};
use crate::{
    entities::{catalog_entry, history, like, recommendation, trending},
    models::{ContentSummary, ScoredContent},
};

#[derive(Clone)]
pub struct InteractionStore {
    db: DatabaseConnection,
}

impl InteractionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // Catalog mirror

    /// Inserts or replaces the local copy of a content record.
    pub async fn upsert_entry(&self, entry: ContentSummary) -> StoreResult<ContentSummary> {
        require_non_empty("id", &entry.id)?;
        require_non_empty("titulo", &entry.title)?;

        let model = catalog_entry::ActiveModel {
            id: Set(entry.id.clone()),
            title: Set(entry.title.clone()),
            description: Set(entry.description.clone()),
            release_date: Set(entry.release_date.clone()),
            genre_id: Set(entry.genre_id.clone()),
            average_rating: Set(entry.average_rating),
            subtitle_set_id: Set(entry.subtitle_set_id.clone()),
            dub_set_id: Set(entry.dub_set_id.clone()),
        };
        catalog_entry::Entity::insert(model)
            .on_conflict(
                OnConflict::column(catalog_entry::Column::Id)
                    .update_columns([
                        catalog_entry::Column::Title,
                        catalog_entry::Column::Description,
                        catalog_entry::Column::ReleaseDate,
                        catalog_entry::Column::GenreId,
                        catalog_entry::Column::AverageRating,
                        catalog_entry::Column::SubtitleSetId,
                        catalog_entry::Column::DubSetId,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        debug!(content_id = %entry.id, "upserted catalog entry");
        Ok(entry)
    }

    pub async fn get_entry(&self, id: &str) -> StoreResult<ContentSummary> {
        find_entry(&self.db, id).await.map(to_summary)
    }

    /// Removes the entry together with every history, like, recommendation
    /// and trending record that points at it.
    pub async fn delete_entry(&self, id: &str) -> StoreResult<()> {
        let txn = self.db.begin().await?;
        find_entry(&txn, id).await?;
        history::Entity::delete_many().filter(history::Column::ContentId.eq(id)).exec(&txn).await?;
        like::Entity::delete_many().filter(like::Column::ContentId.eq(id)).exec(&txn).await?;
        recommendation::Entity::delete_many()
            .filter(recommendation::Column::ContentId.eq(id))
            .exec(&txn)
            .await?;
        trending::Entity::delete_many().filter(trending::Column::ContentId.eq(id)).exec(&txn).await?;
        catalog_entry::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(())
    }

    // History

    pub async fn history(&self, user_id: &str) -> StoreResult<Vec<ContentSummary>> {
        let ids: Vec<String> = history::Entity::find()
            .filter(history::Column::UserId.eq(user_id))
            .order_by_desc(history::Column::WatchedAt)
            .order_by_desc(history::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|h| h.content_id)
            .collect();
        summaries_in_order(&self.db, ids).await
    }

    pub async fn record_view(&self, user_id: &str, content_id: &str) -> StoreResult<ContentSummary> {
        require_non_empty("idUsuario", user_id)?;
        let txn = self.db.begin().await?;
        let entry = find_entry(&txn, content_id).await?;
        history::ActiveModel {
            user_id: Set(user_id.to_string()),
            content_id: Set(content_id.to_string()),
            watched_at: Set(now_sec()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        debug!(user_id, content_id, "recorded view");
        Ok(to_summary(entry))
    }

    // Likes

    pub async fn likes(&self, user_id: &str) -> StoreResult<Vec<ContentSummary>> {
        let ids: Vec<String> = like::Entity::find()
            .filter(like::Column::UserId.eq(user_id))
            .order_by_desc(like::Column::LikedAt)
            .order_by_desc(like::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|l| l.content_id)
            .collect();
        summaries_in_order(&self.db, ids).await
    }

    /// Liking the same content twice keeps the first like.
    pub async fn like(&self, user_id: &str, content_id: &str) -> StoreResult<ContentSummary> {
        require_non_empty("idUsuario", user_id)?;
        let txn = self.db.begin().await?;
        let entry = find_entry(&txn, content_id).await?;
        let existing = like::Entity::find()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::ContentId.eq(content_id))
            .one(&txn)
            .await?;
        if existing.is_none() {
            like::ActiveModel {
                user_id: Set(user_id.to_string()),
                content_id: Set(content_id.to_string()),
                liked_at: Set(now_sec()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
        txn.commit().await?;
        Ok(to_summary(entry))
    }

    pub async fn unlike(&self, user_id: &str, content_id: &str) -> StoreResult<()> {
        let res = like::Entity::delete_many()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::ContentId.eq(content_id))
            .exec(&self.db)
            .await?;
        if res.rows_affected == 0 {
            return Err(StoreError::not_found("Me gusta no encontrado"));
        }
        Ok(())
    }

    // Recommendations

    pub async fn recommendations(&self, user_id: &str) -> StoreResult<Vec<ContentSummary>> {
        let ids: Vec<String> = recommendation::Entity::find()
            .filter(recommendation::Column::UserId.eq(user_id))
            .order_by_desc(recommendation::Column::Score)
            .order_by_asc(recommendation::Column::ContentId)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|r| r.content_id)
            .collect();
        summaries_in_order(&self.db, ids).await
    }

    pub async fn recommend(&self, user_id: &str, input: ScoredContent) -> StoreResult<ScoredContent> {
        require_non_empty("idUsuario", user_id)?;
        validate_score(input.score)?;
        let txn = self.db.begin().await?;
        find_entry(&txn, &input.content_id).await?;
        recommendation::Entity::insert(recommendation::ActiveModel {
            user_id: Set(user_id.to_string()),
            content_id: Set(input.content_id.clone()),
            score: Set(input.score),
        })
        .on_conflict(
            OnConflict::columns([
                recommendation::Column::UserId,
                recommendation::Column::ContentId,
            ])
            .update_column(recommendation::Column::Score)
            .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;
        txn.commit().await?;
        Ok(input)
    }

    // Trending

    pub async fn trending(&self) -> StoreResult<Vec<ContentSummary>> {
        let ids: Vec<String> = trending::Entity::find()
            .order_by_desc(trending::Column::Score)
            .order_by_asc(trending::Column::ContentId)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|t| t.content_id)
            .collect();
        summaries_in_order(&self.db, ids).await
    }

    pub async fn set_trending(&self, input: ScoredContent) -> StoreResult<ScoredContent> {
        validate_score(input.score)?;
        let txn = self.db.begin().await?;
        find_entry(&txn, &input.content_id).await?;
        trending::Entity::insert(trending::ActiveModel {
            content_id: Set(input.content_id.clone()),
            score: Set(input.score),
        })
        .on_conflict(
            OnConflict::column(trending::Column::ContentId)
                .update_column(trending::Column::Score)
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;
        txn.commit().await?;
        Ok(input)
    }
}

async fn find_entry<C: ConnectionTrait>(conn: &C, id: &str) -> StoreResult<catalog_entry::Model> {
    catalog_entry::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| StoreError::not_found("Contenido no encontrado"))
}

/// Resolves ids to catalog entries, keeping the order (and repeats) of `ids`.
async fn summaries_in_order<C: ConnectionTrait>(
    conn: &C,
    ids: Vec<String>,
) -> StoreResult<Vec<ContentSummary>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();

    let entries: HashMap<String, catalog_entry::Model> = catalog_entry::Entity::find()
        .filter(catalog_entry::Column::Id.is_in(unique))
        .all(conn)
        .await?
        .into_iter()
        .map(|e| (e.id.clone(), e))
        .collect();

    Ok(ids.iter().filter_map(|id| entries.get(id).cloned().map(to_summary)).collect())
}

fn validate_score(score: f64) -> StoreResult<()> {
    if !score.is_finite() {
        return Err(StoreError::invalid("`puntuacion` debe ser un número finito"));
    }
    Ok(())
}

fn to_summary(m: catalog_entry::Model) -> ContentSummary {
    ContentSummary {
        id: m.id,
        title: m.title,
        description: m.description,
        release_date: m.release_date,
        genre_id: m.genre_id,
        average_rating: m.average_rating,
        subtitle_set_id: m.subtitle_set_id,
        dub_set_id: m.dub_set_id,
    }
}
