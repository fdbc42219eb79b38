//! Configuration subsystem.
//!
//! # Responsibilities
//! - Define the TOML schema with serde defaults (schema.rs)
//! - Load files and validate seed upstreams (loader.rs)

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::AppConfig;
