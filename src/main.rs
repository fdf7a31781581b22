use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use workprofile::{App, Args, Config, MemoryStore, PageRenderer, Server, load_env_file, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `.env` may carry RUST_LOG, so it is loaded before the filter is built.
    let env_file = load_env_file(Path::new(".env"));

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = env_file {
        tracing::warn!("ignoring unreadable .env file: {e}");
    }

    let config = Config::from(Args::parse());
    tracing::info!(
        host_name = %config.host_name,
        db_host = config.db_host.as_deref().unwrap_or("none"),
        backend = %config.backend,
        "starting workprofile"
    );

    let server = Server::bind(config.listen)
        .await
        .with_context(|| format!("could not bind {}", config.listen))?;
    let app = App::new(config, MemoryStore::new(), PageRenderer);

    server.serve(routes(app)).await.context("server error")?;
    Ok(())
}
