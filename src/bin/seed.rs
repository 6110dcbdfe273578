//! Reset the database to the development fixture set

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use lectern_server::{config::AppConfig, logging, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let _log_guard = logging::init(&config.logging);

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    seed::load(&pool).await.context("Failed to seed database")?;

    Ok(())
}
