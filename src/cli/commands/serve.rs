use anyhow::Context;

use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::router::app;
use crate::state::AppState;

pub async fn handle(mut config: AppConfig, port: Option<u16>, in_memory: bool) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.api.port = port;
    }
    config.validate()?;

    let state = if in_memory {
        tracing::warn!("Using in-memory database; data is lost on exit");
        AppState::in_memory(&config)?
    } else {
        let url = config.database_url()?;
        let pool = DatabaseManager::connect(url, &config.database)
            .await
            .context("failed to connect to database")?;
        DatabaseManager::migrate(&pool).await?;
        AppState::postgres(&config, pool)?
    };

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!(
        "Storefront API listening on http://{} ({:?})",
        bind_addr,
        config.environment
    );

    axum::serve(listener, app(state, &config))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
