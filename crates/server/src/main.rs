//! Recipe advisor HTTP server.
//!
//! Loads the index produced by `index-builder` and serves `/query`,
//! `/health`, and `/stats`.

use ladle_core::config::{load_dotenv, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    load_dotenv();
    let config = Config::from_env();

    ladle_server::serve(config).await
}
