//! Chirp entry-point: wires stores, the fan-out worker, and HTTP routes.

mod server;

use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = server::ServerConfig::from_env().await?;
    server::run(config)?.await
}
