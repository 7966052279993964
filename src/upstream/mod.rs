//! Upstream scholarly-metadata API subsystem.
//!
//! # Data Flow
//! ```text
//! views (per-entity task table)
//!     → request.rs (EndpointRequest: URL, query pairs, headers)
//!     → client.rs (single HTTP call, credential headers, JSON parse)
//!     → serde_json::Value or UpstreamError
//! ```
//!
//! # Design Decisions
//! - Identifiers are escaped exactly once, when the request URL is built
//! - Credentials live in the client, never in per-request data
//! - One attempt per request; a failed call is a final failure

pub mod client;
pub mod error;
pub mod request;

pub use client::UpstreamClient;
pub use error::UpstreamError;
pub use request::EndpointRequest;
