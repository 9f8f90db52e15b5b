//! Browser-facing service: calls the stores over HTTP and renders HTML.

mod backend;
pub mod catalog;
mod routes;
pub(crate) mod templates;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use backend::ServiceClient;

/// Clients for the three stores.
#[derive(Clone, Debug)]
pub struct Backends {
    pub content: ServiceClient,
    pub users: ServiceClient,
    pub interactions: ServiceClient,
}

impl Backends {
    pub fn new(
        http: reqwest::Client,
        content_url: &str,
        users_url: &str,
        interactions_url: &str,
    ) -> Self {
        Self {
            content: ServiceClient::new(http.clone(), "content", content_url),
            users: ServiceClient::new(http.clone(), "users", users_url),
            interactions: ServiceClient::new(http, "interactions", interactions_url),
        }
    }
}

pub fn router(backends: Backends) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/login", post(routes::login))
        .route("/registro_usuario", get(routes::registration_page))
        .route("/registro", post(routes::register))
        .route("/planes_suscripcion", get(routes::plans))
        .route("/pantalla_principal", get(routes::main_page))
        .route("/detalles_pelicula/{id}", get(routes::details))
        .route("/buscar", get(routes::search))
        .route("/usuarios/{id}/perfil", get(routes::profile))
        .with_state(Arc::new(backends))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any)),
        )
}
