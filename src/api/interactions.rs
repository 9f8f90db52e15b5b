use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use super::ApiResult;
use crate::{
    models::{ContentRef, ContentSummary, Message, ScoredContent},
    stores::InteractionStore,
};

pub fn router(store: InteractionStore) -> Router {
    Router::new()
        .route("/contenidos", post(upsert_entry))
        .route("/contenidos/{id}", get(get_entry).delete(delete_entry))
        .route("/usuarios/{id}/historial", get(history).post(record_view))
        .route("/usuarios/{id}/me-gusta", get(likes).post(like))
        .route("/usuarios/{id}/me-gusta/{content_id}", delete(unlike))
        .route("/usuarios/{id}/recomendaciones", get(recommendations).post(recommend))
        .route("/contenido/tendencias", get(trending).post(set_trending))
        .with_state(store)
        .layer(TraceLayer::new_for_http())
}

async fn upsert_entry(
    State(store): State<InteractionStore>,
    Json(entry): Json<ContentSummary>,
) -> ApiResult<ContentSummary> {
    Ok(Json(store.upsert_entry(entry).await?))
}

async fn get_entry(
    State(store): State<InteractionStore>,
    Path(id): Path<String>,
) -> ApiResult<ContentSummary> {
    Ok(Json(store.get_entry(&id).await?))
}

async fn delete_entry(
    State(store): State<InteractionStore>,
    Path(id): Path<String>,
) -> ApiResult<Message> {
    store.delete_entry(&id).await?;
    Ok(Json(Message::new("Contenido eliminado exitosamente")))
}

async fn history(
    State(store): State<InteractionStore>,
    Path(user_id): Path<String>,
) -> ApiResult<Vec<ContentSummary>> {
    Ok(Json(store.history(&user_id).await?))
}

async fn record_view(
    State(store): State<InteractionStore>,
    Path(user_id): Path<String>,
    Json(input): Json<ContentRef>,
) -> ApiResult<ContentSummary> {
    Ok(Json(store.record_view(&user_id, &input.content_id).await?))
}

async fn likes(
    State(store): State<InteractionStore>,
    Path(user_id): Path<String>,
) -> ApiResult<Vec<ContentSummary>> {
    Ok(Json(store.likes(&user_id).await?))
}

async fn like(
    State(store): State<InteractionStore>,
    Path(user_id): Path<String>,
    Json(input): Json<ContentRef>,
) -> ApiResult<ContentSummary> {
    Ok(Json(store.like(&user_id, &input.content_id).await?))
}

async fn unlike(
    State(store): State<InteractionStore>,
    Path((user_id, content_id)): Path<(String, String)>,
) -> ApiResult<Message> {
    store.unlike(&user_id, &content_id).await?;
    Ok(Json(Message::new("Me gusta eliminado exitosamente")))
}

async fn recommendations(
    State(store): State<InteractionStore>,
    Path(user_id): Path<String>,
) -> ApiResult<Vec<ContentSummary>> {
    Ok(Json(store.recommendations(&user_id).await?))
}

async fn recommend(
    State(store): State<InteractionStore>,
    Path(user_id): Path<String>,
    Json(input): Json<ScoredContent>,
) -> ApiResult<ScoredContent> {
    Ok(Json(store.recommend(&user_id, input).await?))
}

async fn trending(State(store): State<InteractionStore>) -> ApiResult<Vec<ContentSummary>> {
    Ok(Json(store.trending().await?))
}

async fn set_trending(
    State(store): State<InteractionStore>,
    Json(input): Json<ScoredContent>,
) -> ApiResult<ScoredContent> {
    Ok(Json(store.set_trending(input).await?))
}
