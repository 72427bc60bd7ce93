//! HTTP surface: router, shared state and server bootstrap.

pub mod error;
pub mod handlers;

use crate::adapters::{InMemoryContactStore, JsonFileContactStore, SupabaseAuth};
use crate::config::Settings;
use crate::core::contacts::ContactService;
use crate::core::import::{ImportLimits, ImportPipeline};
use crate::domain::ports::{ContactStore, IdentityProvider};
use crate::utils::error::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::{get, post},
    Router,
};
use handlers::{auth, contacts, upload};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Collaborators built once at startup and shared by every handler.
pub struct AppState {
    pub contacts: ContactService,
    pub importer: ImportPipeline,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ContactStore>,
        identity: Arc<dyn IdentityProvider>,
        limits: ImportLimits,
    ) -> Arc<Self> {
        Arc::new(Self {
            contacts: ContactService::new(store.clone()),
            importer: ImportPipeline::new(store, limits),
            identity,
        })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = usize::try_from(state.importer.limits().max_file_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/", get(handlers::root_handler))
        .route("/signup", post(auth::sign_up_handler))
        .route("/signin", post(auth::sign_in_handler))
        .route("/profile", get(auth::profile_handler))
        .route(
            "/contact",
            post(contacts::create_contact_handler).get(contacts::list_contacts_handler),
        )
        .route(
            "/contact/{key}",
            get(contacts::get_contact_handler)
                .put(contacts::update_contact_handler)
                .delete(contacts::delete_contact_handler),
        )
        .route("/upload-csv", post(upload::upload_csv_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn build_store(settings: &Settings) -> Result<Arc<dyn ContactStore>> {
    Ok(match &settings.store.path {
        Some(path) => Arc::new(JsonFileContactStore::open(path.clone()).await?),
        None => {
            info!("No store path configured, contacts are kept in memory");
            Arc::new(InMemoryContactStore::new())
        }
    })
}

pub async fn serve(settings: Settings) -> Result<()> {
    info!("Initializing state...");
    let store = build_store(&settings).await?;
    let identity: Arc<dyn IdentityProvider> = Arc::new(SupabaseAuth::new(&settings.identity)?);
    let state = AppState::new(store, identity, settings.import.limits());

    let app = router(state);

    let address = settings.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Server running at http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
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
