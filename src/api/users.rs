use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use super::ApiResult;
use crate::{
    models::{Credentials, Message, NewUser, SubscriptionPlan, User, UserPatch},
    stores::UserStore,
};

pub fn router(store: UserStore) -> Router {
    Router::new()
        .route("/planes-suscripcion", get(list_plans))
        .route("/planes-suscripcion/{id}", get(get_plan))
        .route("/usuarios", get(list_users))
        .route("/usuarios/registro", post(register))
        .route("/usuarios/login", post(login))
        .route("/usuarios/{id}", get(get_user).put(update_user).delete(delete_user))
        .with_state(store)
        .layer(TraceLayer::new_for_http())
}

async fn list_plans(State(store): State<UserStore>) -> ApiResult<Vec<SubscriptionPlan>> {
    Ok(Json(store.list_plans().await?))
}

async fn get_plan(
    State(store): State<UserStore>,
    Path(id): Path<String>,
) -> ApiResult<SubscriptionPlan> {
    Ok(Json(store.get_plan(&id).await?))
}

async fn register(State(store): State<UserStore>, Json(input): Json<NewUser>) -> ApiResult<User> {
    Ok(Json(store.register(input).await?))
}

async fn login(
    State(store): State<UserStore>,
    Json(credentials): Json<Credentials>,
) -> ApiResult<User> {
    Ok(Json(store.login(credentials).await?))
}

async fn list_users(State(store): State<UserStore>) -> ApiResult<Vec<User>> {
    Ok(Json(store.list().await?))
}

async fn get_user(State(store): State<UserStore>, Path(id): Path<String>) -> ApiResult<User> {
    Ok(Json(store.get(&id).await?))
}

async fn update_user(
    State(store): State<UserStore>,
    Path(id): Path<String>,
    Json(patch): Json<UserPatch>,
) -> ApiResult<Message> {
    store.update(&id, patch).await?;
    Ok(Json(Message::new("Datos del usuario actualizados exitosamente")))
}

async fn delete_user(State(store): State<UserStore>, Path(id): Path<String>) -> ApiResult<Message> {
    store.delete(&id).await?;
    Ok(Json(Message::new("Usuario eliminado exitosamente")))
}
