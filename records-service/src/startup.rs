use crate::config::{RecordsConfig, StoreBackend};
use crate::handlers;
use crate::services::{BlobStore, InMemoryStore, LocalBlobStore, MongoStore, RecordsService};
use axum::{
    routing::{delete, get},
    Router,
};
use service_core::error::AppError;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: RecordsConfig,
    pub records: RecordsService,
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
    state: AppState,
    memory: Option<Arc<InMemoryStore>>,
}

impl Application {
    pub async fn build(config: RecordsConfig) -> Result<Self, AppError> {
        let blobs: Arc<dyn BlobStore> = Arc::new(
            LocalBlobStore::new(&config.blob.local_path, &config.blob.public_base_url)
                .await
                .map_err(|e| {
                    tracing::error!(
                        "Failed to initialize blob storage at {}: {}",
                        config.blob.local_path,
                        e
                    );
                    e
                })?,
        );

        let mut memory = None;
        let records = match config.store.backend {
            StoreBackend::Memory => {
                let store = Arc::new(InMemoryStore::new());
                memory = Some(store.clone());
                RecordsService::new(store.clone(), store.clone(), store, blobs)
            }
            StoreBackend::Mongodb => {
                let uri = config.store.uri.as_deref().ok_or_else(|| {
                    AppError::ConfigError(anyhow::anyhow!(
                        "STORE_URI is required for the mongodb backend"
                    ))
                })?;
                let store = MongoStore::connect(uri, &config.store.database)
                    .await
                    .map_err(|e| {
                        tracing::error!("Failed to connect to MongoDB: {}", e);
                        e
                    })?;
                store.initialize_indexes().await.map_err(|e| {
                    tracing::error!("Failed to initialize store indexes: {}", e);
                    e
                })?;
                let store = Arc::new(store);
                RecordsService::new(store.clone(), store.clone(), store, blobs)
            }
        };

        let state = AppState {
            config: config.clone(),
            records,
        };

        let app = Router::new()
            .route("/health", get(handlers::health_check))
            .route(
                "/documents",
                get(handlers::list_documents).post(handlers::upload_document),
            )
            .route("/documents/events", get(handlers::document_events))
            .route("/documents/:id", delete(handlers::delete_document))
            .route("/documents/:id/file", get(handlers::download_document))
            .route("/patients/:patient_key", get(handlers::lookup_patient))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            state,
            memory,
        })
    }

    pub fn records(&self) -> &RecordsService {
        &self.state.records
    }

    /// The concrete memory store, when that backend is configured. Tests
    /// use it to seed profiles and role assignments.
    pub fn memory_store(&self) -> Option<Arc<InMemoryStore>> {
        self.memory.clone()
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
