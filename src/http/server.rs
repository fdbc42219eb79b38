//! HTTP host for the admin surface and the selector endpoint.
//!
//! # Responsibilities
//! - Assemble the axum router (admin routes, selector route, middleware)
//! - Own the shared application state
//! - Bind the server to a listener and serve until shutdown
//!
//! The proxy data plane is not here: an external proxying layer calls
//! `GET /select` for a backend endpoint and forwards traffic itself.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::admin;
use crate::balancer::{self, Balancer};
use crate::config::schema::{AdminConfig, AppConfig, PaginationConfig};
use crate::persistence::file::FileSnapshots;
use crate::persistence::memory::MemorySnapshots;
use crate::persistence::{PersistenceBridge, SnapshotStore};
use crate::registry::Registry;
use crate::store::memory::{MemoryCounters, MemoryRecords};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub balancer: Arc<dyn Balancer>,
    pub bridge: Arc<PersistenceBridge>,
    pub pagination: PaginationConfig,
    pub admin: AdminConfig,
}

impl AppState {
    /// Wire the in-process stores, registry, strategy, and persistence
    /// bridge for one namespace.
    pub fn from_config(config: &AppConfig) -> Self {
        let registry = Arc::new(Registry::new(
            &config.registry.name,
            Arc::new(MemoryRecords::new()),
            Arc::new(MemoryCounters::new()),
        ));

        let snapshots: Arc<dyn SnapshotStore> = match &config.registry.snapshot_path {
            Some(path) => Arc::new(FileSnapshots::new(path)),
            None => Arc::new(MemorySnapshots::new()),
        };
        let bridge = Arc::new(PersistenceBridge::new(
            snapshots,
            config.registry.upstreams.clone(),
        ));

        Self {
            registry,
            balancer: balancer::for_strategy(config.registry.strategy),
            bridge,
            pagination: config.pagination.clone(),
            admin: config.admin.clone(),
        }
    }

    /// Lazy one-time bulk load; first touch wins, failures are logged and
    /// the registry stays empty rather than taking the server down.
    pub fn ensure_loaded(&self) {
        if let Err(error) = self.bridge.ensure_loaded(&self.registry) {
            tracing::error!(
                registry = %self.registry.name(),
                %error,
                "initial registry load failed"
            );
        }
    }
}

/// HTTP server hosting the admin surface.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn with_state(state: AppState) -> Self {
        Self {
            router: Self::build_router(state),
        }
    }

    /// Build the axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/select", get(admin::handlers::select_upstream))
            .with_state(state.clone())
            .merge(admin::admin_router(state))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "admin server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("server received shutdown signal");
            })
            .await
    }
}
