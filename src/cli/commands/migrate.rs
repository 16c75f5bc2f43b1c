use anyhow::Context;

use crate::config::AppConfig;
use crate::database::DatabaseManager;

pub async fn handle(config: AppConfig) -> anyhow::Result<()> {
    let url = config.database_url()?;
    let pool = DatabaseManager::connect(url, &config.database)
        .await
        .context("failed to connect to database")?;

    DatabaseManager::migrate(&pool).await?;
    pool.close().await;
    Ok(())
}
