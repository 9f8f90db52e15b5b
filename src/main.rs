use clap::Parser;
use streamflix::config::{Config, Service};

#[derive(Debug, Parser)]
#[command(name = "streamflix", about = "Streamflix catalog services")]
struct Cli {
    /// Service to run.
    #[arg(value_enum)]
    service: Service,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,streamflix=debug,sqlx=warn".to_string()),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env(cli.service)?;
    streamflix::serve(config).await
}
