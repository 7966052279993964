//! Scholarly-metadata portal.
//!
//! A server-rendered front-end over an upstream bibliometric API. Each page
//! is one fan-out of independent upstream calls joined into a single render
//! context:
//!
//! ```text
//!                           ┌──────────────────────────────────────────┐
//!                           │                 PORTAL                    │
//!                           │                                           │
//!   Browser request         │  ┌──────┐   ┌───────┐   ┌────────────┐   │
//!   ────────────────────────┼─▶│ http │──▶│ views │──▶│ aggregate  │───┼──▶ Upstream API
//!                           │  │router│   │ table │   │ (fan-out/  │   │    (N parallel
//!                           │  └──────┘   └───────┘   │  fan-in)   │◀──┼──── GETs)
//!                           │                         └─────┬──────┘   │
//!   HTML response           │  ┌────────┐                   │          │
//!   ◀───────────────────────┼──│ render │◀──────────────────┘          │
//!                           │  └────────┘   RenderContext              │
//!                           └──────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod aggregate;
pub mod upstream;
pub mod views;

// Presentation
pub mod http;
pub mod render;

// Cross-cutting concerns
pub mod config;

pub use config::PortalConfig;
pub use http::HttpServer;
