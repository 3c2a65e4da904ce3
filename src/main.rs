use std::sync::Arc;

use aitools_catalog::app::{router, AppState};
use aitools_catalog::config::AppConfig;
use aitools_catalog::db::category_repository::{CategoryRepository, MongoCategoryRepository};
use aitools_catalog::db::news_repository::MongoNewsRepository;
use aitools_catalog::db::tool_repository::MongoToolRepository;
use aitools_catalog::keepalive::KeepAlive;
use anyhow::Context;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aitools_catalog=info,tower_http=info".into()),
        )
        .init();

    tracing::info!("Starting AI tools catalog...");

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    // Connect to MongoDB
    let mongo_client = mongodb::Client::with_uri_str(&config.mongo_uri)
        .await
        .context("Failed to connect to MongoDB")?;
    let mongo_db = mongo_client.database(&config.mongo_database);

    let category_repo = Arc::new(MongoCategoryRepository::new(&mongo_db));
    if let Err(e) = category_repo.ensure_indexes().await {
        // Typically existing case-variant duplicates; the service still runs.
        tracing::warn!("Failed to create category index: {e}");
    }

    tracing::info!("Connected to MongoDB database '{}'", config.mongo_database);

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("Failed to create upload dir {:?}", config.upload_dir))?;

    let http_client = reqwest::Client::new();

    let app_state = AppState {
        tool_repo: Arc::new(MongoToolRepository::new(&mongo_db)),
        category_repo,
        news_repo: Arc::new(MongoNewsRepository::new(&mongo_db)),
        http_client: http_client.clone(),
        upload_dir: config.upload_dir.clone(),
    };

    let app = router(app_state, config.max_upload_bytes);

    let address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    tracing::info!("Listening on http://{}", address);

    let keepalive = KeepAlive::start(
        http_client,
        config.keepalive_url(),
        config.keepalive_interval(),
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    keepalive.stop().await;
    tracing::info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
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
