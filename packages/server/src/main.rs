use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use common::storage::ObjectStore;
use common::storage::filesystem::FilesystemObjectStore;
use common::storage::s3::S3ObjectStore;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use platewatch_server::build_router;
use platewatch_server::config::{AppConfig, StorageBackend, StorageConfig};
use platewatch_server::database::init_db;
use platewatch_server::identity::{GoogleIdentityConfig, GoogleIdentityProvider};
use platewatch_server::prediction::HttpPlatePredictor;
use platewatch_server::schema::ensure_indexes;
use platewatch_server::state::AppState;
use platewatch_server::store::PgRecordStore;

const JWKS_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    info!("Connecting to database...");
    let db = init_db(&config.database.url)
        .await
        .context("Failed to initialize database")?;
    ensure_indexes(&db).await.context("Failed to create indexes")?;

    let objects = object_store(&config.storage).await?;

    let predictor = HttpPlatePredictor::new(
        &config.prediction.url,
        Duration::from_secs(config.prediction.timeout_secs),
    )
    .context("Failed to build prediction client")?;

    let identity = GoogleIdentityProvider::new(GoogleIdentityConfig {
        client_id: config.auth.google_client_id.clone(),
        issuers: config.auth.issuers.clone(),
        jwks_url: config.auth.jwks_url.clone(),
        jwks_refresh: Duration::from_secs(config.auth.jwks_refresh_secs),
        jwks_timeout: JWKS_FETCH_TIMEOUT,
    })
    .context("Failed to build identity provider")?;

    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState {
        config: Arc::new(config),
        records: Arc::new(PgRecordStore::new(db)),
        objects,
        predictor: Arc::new(predictor),
        identity: Arc::new(identity),
    };

    let app = build_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn object_store(config: &StorageConfig) -> anyhow::Result<Arc<dyn ObjectStore>> {
    match config.backend {
        StorageBackend::S3 => {
            let s3 = config
                .s3
                .as_ref()
                .context("storage.s3 section is missing")?;
            info!(bucket = %s3.bucket, "Using S3 object storage");
            Ok(Arc::new(
                S3ObjectStore::new(s3).context("Failed to build S3 client")?,
            ))
        }
        StorageBackend::Filesystem => {
            let fs = config
                .filesystem
                .as_ref()
                .context("storage.filesystem section is missing")?;
            info!(root = %fs.root.display(), "Using filesystem object storage");
            let store = FilesystemObjectStore::new(
                fs.root.clone(),
                fs.public_base_url.clone(),
                config.max_object_bytes,
            )
            .await
            .context("Failed to initialize filesystem storage")?;
            Ok(Arc::new(store))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
