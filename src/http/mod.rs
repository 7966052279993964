//! HTTP surface of the portal.

pub mod server;

pub use server::{AppState, HttpServer, StartupError};
