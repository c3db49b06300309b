use anyhow::Result;
use nauka_api::config::{Config, CorsOrigins};
use nauka_api::server;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when variables come from the host)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("nauka_api=info".parse()?)
        )
        .init();

    info!("Starting Nauka API");

    // Load configuration from environment
    let config = Config::from_env()?;

    match &config.cors_origins {
        CorsOrigins::Any => info!("CORS: any origin"),
        CorsOrigins::List(origins) => info!("CORS: {}", origins.join(", ")),
    }

    server::run(config).await
}
