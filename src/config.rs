use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

pub const DEFAULT_CONTENT_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_USER_URL: &str = "http://127.0.0.1:8001";
pub const DEFAULT_INTERACTION_URL: &str = "http://127.0.0.1:8002";

/// Which of the four processes to run.
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum Service {
    Content,
    Users,
    Interactions,
    Gateway,
}

impl Service {
    fn default_port(self) -> u16 {
        match self {
            Service::Content => 8000,
            Service::Users => 8001,
            Service::Interactions => 8002,
            Service::Gateway => 8003,
        }
    }

    fn default_db_path(self) -> Option<&'static str> {
        match self {
            Service::Content => Some("contenidos.db"),
            Service::Users => Some("usuarios.db"),
            Service::Interactions => Some("interacciones.db"),
            Service::Gateway => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub service: Service,
    pub addr: SocketAddr,
    /// `None` for the gateway, which has no database.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub content_url: String,
    pub user_url: String,
    pub interaction_url: String,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env(service: Service) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = match std::env::var("PORT") {
            Ok(port) => port.parse().context("PORT")?,
            Err(_) => service.default_port(),
        };

        let database_url = service.default_db_path().map(|default| {
            let path = std::env::var("DB_PATH").unwrap_or_else(|_| default.to_string());
            sqlite_url(&path)
        });

        let db_max_connections: u32 =
            std::env::var("DB_MAX_CONNECTIONS").ok().and_then(|s| s.parse().ok()).unwrap_or(5);

        let content_url = std::env::var("CONTENT_SERVICE_URL")
            .unwrap_or_else(|_| DEFAULT_CONTENT_URL.to_string());
        let user_url =
            std::env::var("USER_SERVICE_URL").unwrap_or_else(|_| DEFAULT_USER_URL.to_string());
        let interaction_url = std::env::var("INTERACTION_SERVICE_URL")
            .unwrap_or_else(|_| DEFAULT_INTERACTION_URL.to_string());

        let timeout_secs: u64 = std::env::var("GATEWAY_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            service,
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            db_max_connections,
            content_url,
            user_url,
            interaction_url,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// SQLite URL that creates the file on first use.
pub fn sqlite_url(path: &str) -> String {
    format!("sqlite://{path}?mode=rwc")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_store_gets_its_own_database_file() {
        assert_eq!(Service::Content.default_db_path(), Some("contenidos.db"));
        assert_eq!(Service::Users.default_db_path(), Some("usuarios.db"));
        assert_eq!(Service::Interactions.default_db_path(), Some("interacciones.db"));
        assert_eq!(Service::Gateway.default_db_path(), None);
    }

    #[test]
    fn sqlite_url_creates_missing_files() {
        assert_eq!(sqlite_url("/tmp/x.db"), "sqlite:///tmp/x.db?mode=rwc");
    }
}
