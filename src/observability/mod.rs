//! Observability subsystem.
//!
//! # Responsibilities
//! - Initialize logging (logging.rs)
//! - Expose Prometheus metrics and recording helpers (metrics.rs)

pub mod logging;
pub mod metrics;
