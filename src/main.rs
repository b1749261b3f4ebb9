// main.rs
use poem::listener::TcpListener;
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod db;
mod entities;
mod error;
mod pagination;
mod store;

use api::AppState;
use config::Config;
use store::PostStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let db = db::connect(&config.database).await?;
    db::ensure_schema(&db).await?;

    let state = AppState {
        store: PostStore::new(db),
        utc_offset: config.utc_offset,
    };
    let app = api::app(state, &format!("http://localhost:{}", config.port));

    let addr = config.listen_addr();
    tracing::info!(%addr, "posts api listening");
    poem::Server::new(TcpListener::bind(addr)).run(app).await?;
    Ok(())
}
