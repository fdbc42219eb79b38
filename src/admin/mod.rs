//! Admin API subsystem.
//!
//! # Data Flow
//! ```text
//! Admin request → auth.rs (bearer gate, when configured)
//!     → handlers.rs (validate → registry mutation → snapshot)
//!     → response.rs (envelope + pagination)
//! ```

pub mod auth;
pub mod handlers;
pub mod response;

use axum::middleware;
use axum::routing::{any, get};
use axum::Router;

use crate::http::server::AppState;
use auth::admin_auth;

pub fn admin_router(state: AppState) -> Router {
    Router::new()
        .route("/status", get(handlers::get_status))
        .route("/upstreams", any(handlers::collection))
        .route(
            "/upstreams/{id}",
            get(handlers::get_upstream)
                .put(handlers::update_upstream)
                .patch(handlers::update_upstream)
                .delete(handlers::delete_upstream),
        )
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth))
        .with_state(state)
}
