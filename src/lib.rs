//! Dynamic upstream registry and load-balancing selector.

pub mod admin;
pub mod balancer;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod persistence;
pub mod registry;
pub mod store;

pub use config::schema::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
