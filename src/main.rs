use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use candidacy_backend::{
    config::{get_config, init_config, Config, StoreBackend},
    database::pool::{create_pool, run_migrations},
    middleware::{cors::api_cors, rate_limit::{rps_middleware, RateLimiter}},
    routes,
    store::{DocumentStore, FirestoreDocumentStore, MemoryDocumentStore, PgDocumentStore},
    AppState,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

const SESSION_MAX_IDLE: Duration = Duration::from_secs(30 * 60);

async fn connect_store(config: &Config) -> anyhow::Result<Arc<dyn DocumentStore>> {
    let store: Arc<dyn DocumentStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let pool = create_pool().await?;
            run_migrations(&pool).await?;
            info!("Using Postgres document store");
            Arc::new(PgDocumentStore::new(pool))
        }
        StoreBackend::Firestore => {
            let project_id = config
                .firestore_project_id
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("FIRESTORE_PROJECT_ID is not set"))?;
            info!(project_id, "Using Firestore document store");
            Arc::new(FirestoreDocumentStore::new(
                project_id,
                config.firestore_api_key.clone(),
                config.firestore_bearer_token.clone(),
                Duration::from_secs(config.store_timeout_secs),
            )?)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory document store; data is lost on restart");
            Arc::new(MemoryDocumentStore::new())
        }
    };
    Ok(store)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    init_config()?;
    let config = get_config();

    let store = connect_store(config).await?;
    let app_state = AppState::from_config(store, config);

    {
        let sessions = app_state.sessions.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(60)).await;
                let evicted = sessions.evict_idle(SESSION_MAX_IDLE);
                if evicted > 0 {
                    info!(evicted, remaining = sessions.len(), "evicted idle detail sessions");
                }
            }
        });
    }

    let app = routes::router(app_state)
        .layer(axum::middleware::from_fn_with_state(
            RateLimiter::new(config.public_rps),
            rps_middleware,
        ))
        .layer(api_cors())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
