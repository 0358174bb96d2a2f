//! Recreate the news schema and load a dataset
//!
//! Usage: `seed [path/to/data.json]` (defaults to `data/test-data.json`).
//! Connects using the same configuration as the server.

use anyhow::Context;
use newsroom_common::{
    config::AppConfig,
    db::{seed, seed::SeedData, DbPool},
};
use tracing_subscriber::EnvFilter;

const DEFAULT_DATA_FILE: &str = "data/test-data.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DATA_FILE.to_string());

    let config = AppConfig::load().context("loading configuration")?;

    let json = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("reading seed data from {}", path))?;
    let data = SeedData::from_json(&json)?;

    let db = DbPool::new(&config.database).await?;
    seed::run(db.write(), &data).await?;
    db.close().await?;

    tracing::info!(path = %path, "Seeding complete");
    Ok(())
}
