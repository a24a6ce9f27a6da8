use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tokio::signal;

use food_backend::{
    config::AppConfig,
    create_router,
    services::{
        database::{Database, MongoFoodRepository},
        file::FileStore,
        memory::MemoryFoodRepository,
        repository::FoodRepository,
    },
    utils, AppState, FoodService,
};

/// Graceful shutdown signal handler
///
/// Handles shutdown signals gracefully, allowing in-flight requests to complete
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down gracefully...");
        },
    }
}

async fn connect_repository(config: &AppConfig) -> Result<Arc<dyn FoodRepository>> {
    if config.database.is_in_memory() {
        tracing::warn!("Using in-memory food catalog; data is lost on restart");
        return Ok(Arc::new(MemoryFoodRepository::new()));
    }

    let database = Database::new(&config.database.url, &config.database.name).await?;
    Ok(Arc::new(MongoFoodRepository::new(
        &database,
        &config.database.collection,
    )))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    utils::logging::init_logging()?;

    let config = Arc::new(AppConfig::load()?);

    let repository = connect_repository(&config).await?;
    let files = FileStore::new(&config.upload.dir);
    files.ensure_dir().await?;

    let state = AppState::new(FoodService::new(repository, files), config.clone());
    let app = create_router(state);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));
    tracing::info!("Server started on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
