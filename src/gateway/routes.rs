use std::sync::Arc;

use axum::{
    Json,
    extract::{Form, Path, Query, State},
    response::Html,
};
use serde::Deserialize;
use tracing::{info, warn};

use super::{Backends, catalog, templates};
use crate::{
    error::{AppError, AppResult},
    models::{Credentials, NewUser, SubscriptionPlan, User},
};

const INVALID_CREDENTIALS: &str = "Credenciales inválidas";
const REGISTRATION_FAILED: &str = "Error al registrar el usuario.";
const DETAIL_NOT_FOUND: &str = "No se encontraron los detalles de la película.";
const PLANS_UNAVAILABLE: &str = "No se pudieron obtener los planes de suscripción.";

pub async fn index() -> Html<String> {
    Html(templates::index_page())
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    email: String,
    password: String,
}

pub async fn login(
    State(backends): State<Arc<Backends>>,
    Form(form): Form<LoginForm>,
) -> AppResult<Html<String>> {
    let credentials = Credentials { email: form.email.trim().to_string(), password: form.password };
    let user: User = backends
        .users
        .post_json("/usuarios/login", &credentials)
        .await
        .map_err(|err| {
            warn!(error = %err, "login rejected");
            AppError::bad_request(INVALID_CREDENTIALS)
        })?;

    info!(user_id = %user.id, "user logged in");
    let view = catalog::load_catalog(&backends, &user.id).await;
    Ok(Html(templates::main_page(&user.id, &view)))
}

/// Plans are fetched here so the form can list them; an unreachable user
/// service leaves the list empty.
pub async fn registration_page(State(backends): State<Arc<Backends>>) -> Html<String> {
    let plans: Vec<SubscriptionPlan> =
        backends.users.get_json("/planes-suscripcion").await.unwrap_or_else(|err| {
            warn!(error = %err, "could not load subscription plans");
            Vec::new()
        });
    Html(templates::registration_page(&plans))
}

#[derive(Debug, Deserialize)]
pub struct RegistrationForm {
    name: String,
    email: String,
    password: String,
    #[serde(default)]
    language: Option<String>,
    subscription_plan: String,
}

pub async fn register(
    State(backends): State<Arc<Backends>>,
    Form(form): Form<RegistrationForm>,
) -> AppResult<Html<String>> {
    let new_user = NewUser {
        name: form.name,
        email: form.email,
        password: form.password,
        language: form.language.filter(|l| !l.trim().is_empty()),
        plan_id: form.subscription_plan,
    };
    let user: User =
        backends.users.post_json("/usuarios/registro", &new_user).await.map_err(|err| {
            warn!(error = %err, "registration failed");
            AppError::internal(REGISTRATION_FAILED)
        })?;

    info!(user_id = %user.id, "user registered");
    let view = catalog::load_catalog(&backends, &user.id).await;
    Ok(Html(templates::main_page(&user.id, &view)))
}

pub async fn plans(State(backends): State<Arc<Backends>>) -> AppResult<Json<Vec<SubscriptionPlan>>> {
    let plans = backends.users.get_json("/planes-suscripcion").await.map_err(|err| {
        warn!(error = %err, "could not load subscription plans");
        AppError::internal(PLANS_UNAVAILABLE)
    })?;
    Ok(Json(plans))
}

#[derive(Debug, Deserialize)]
pub struct MainPageQuery {
    user_id: String,
}

pub async fn main_page(
    State(backends): State<Arc<Backends>>,
    Query(q): Query<MainPageQuery>,
) -> Html<String> {
    let view = catalog::load_catalog(&backends, &q.user_id).await;
    Html(templates::main_page(&q.user_id, &view))
}

pub async fn details(
    State(backends): State<Arc<Backends>>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let view = catalog::load_detail(&backends, &id)
        .await
        .ok_or_else(|| AppError::not_found(DETAIL_NOT_FOUND))?;
    Ok(Html(templates::detail_page(&view)))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    query: String,
    #[serde(default)]
    tipo: String,
}

pub async fn search(
    State(backends): State<Arc<Backends>>,
    Query(q): Query<SearchQuery>,
) -> AppResult<Html<String>> {
    let kind: catalog::SearchKind = q.tipo.parse().map_err(AppError::bad_request)?;
    let results = catalog::search(&backends, kind, &q.query).await;
    Ok(Html(templates::search_page(q.query.trim(), kind, &results)))
}

pub async fn profile(
    State(backends): State<Arc<Backends>>,
    Path(user_id): Path<String>,
) -> Html<String> {
    match catalog::load_profile(&backends, &user_id).await {
        Ok(profile) => Html(templates::profile_page(&profile)),
        Err(err) => {
            warn!(%user_id, error = %err, "profile unavailable");
            let status = err.status().map_or_else(|| "sin respuesta".to_string(), |s| s.to_string());
            Html(templates::profile_error_page(&format!(
                "Error al obtener el perfil del usuario: {status}"
            )))
        },
    }
}
