//! HTTP hosting subsystem.

pub mod server;

pub use server::{AppState, HttpServer};
