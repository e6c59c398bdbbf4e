use std::net::SocketAddr;
use std::sync::Arc;

use mongodb::bson::doc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clipvault::render::RenderClient;
use clipvault::storage::GridFsStore;
use clipvault::{config::Config, routes::create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clipvault=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.server);

    // Connect to MongoDB and set up the file store
    let client = mongodb::Client::with_uri_str(&config.storage.mongo_uri).await?;
    let db = client.database(&config.storage.database);
    match db.run_command(doc! { "ping": 1 }).await {
        Ok(_) => info!("MongoDB connection established and file storage set"),
        // A dead store is not fatal at startup; requests will surface it as 5xx.
        Err(e) => error!("MongoDB connection error: {}", e),
    }

    // Create shared state
    let state = AppState {
        store: Arc::new(GridFsStore::new(db)),
        render: Arc::new(RenderClient::from_config(&config.render)),
        config: config.clone(),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
