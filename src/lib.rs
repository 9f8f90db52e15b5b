pub mod api;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod gateway;
pub mod models;
pub mod patch;
pub mod stores;

use axum::Router;
use migration::{ContentMigrator, InteractionMigrator, UserMigrator};
use sea_orm::DatabaseConnection;

use crate::{
    config::{Config, Service},
    gateway::Backends,
    stores::{ContentStore, InteractionStore, UserStore},
};

/// Builds the router for `config.service`, plus the database handle to close
/// once the server stops.
pub async fn build(config: &Config) -> anyhow::Result<(Router, Option<DatabaseConnection>)> {
    let database_url = config.database_url.as_deref();
    let max = config.db_max_connections;

    let built = match (config.service, database_url) {
        (Service::Content, Some(url)) => {
            let db = db::connect_and_migrate::<ContentMigrator>(url, max).await?;
            (api::content_router(ContentStore::new(db.clone())), Some(db))
        },
        (Service::Users, Some(url)) => {
            let db = db::connect_and_migrate::<UserMigrator>(url, max).await?;
            (api::users_router(UserStore::new(db.clone())), Some(db))
        },
        (Service::Interactions, Some(url)) => {
            let db = db::connect_and_migrate::<InteractionMigrator>(url, max).await?;
            (api::interactions_router(InteractionStore::new(db.clone())), Some(db))
        },
        (Service::Gateway, _) => {
            let http = reqwest::Client::builder()
                .user_agent(concat!("streamflix/", env!("CARGO_PKG_VERSION")))
                .timeout(config.http_timeout)
                .build()?;
            let backends = Backends::new(
                http,
                &config.content_url,
                &config.user_url,
                &config.interaction_url,
            );
            (gateway::router(backends), None)
        },
        (service, None) => anyhow::bail!("no database configured for {service:?}"),
    };
    Ok(built)
}

/// Runs one service until Ctrl-C, then closes its database.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let (app, db) = build(&config).await?;

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(service = ?config.service, addr = %config.addr, "listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    if let Some(db) = db {
        db.close().await?;
        tracing::info!("database closed");
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
