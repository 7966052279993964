//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from the TOML config
//! file. Every section defaults so a minimal file (or no file, for local
//! experiments against a stub upstream) still produces a usable config.

use serde::{Deserialize, Serialize};

/// Root configuration for the portal.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PortalConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream API location, credentials, and deadline.
    pub upstream: UpstreamConfig,

    /// Template and partial directories.
    pub templates: TemplateConfig,

    /// Inbound request timeout.
    pub timeouts: TimeoutConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Upstream API configuration. Credentials are config-supplied only and
/// are forwarded on every upstream call; they never appear in responses.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL all endpoint paths resolve against.
    pub base_url: String,

    /// API key, sent as `X-ELS-APIKey`.
    pub api_key: String,

    /// Institution token, sent as `X-ELS-Insttoken` when non-empty.
    pub inst_token: String,

    /// Optional auth token, sent as `X-ELS-Authtoken` when present.
    pub auth_token: Option<String>,

    /// Per-call deadline in seconds.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.elsevier.com".to_string(),
            api_key: String::new(),
            inst_token: String::new(),
            auth_token: None,
            timeout_secs: 10,
        }
    }
}

/// Template storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directory of top-level page templates.
    pub dir: String,

    /// Directory of partial fragments included by the page templates.
    pub partials_dir: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            dir: "templates".to_string(),
            partials_dir: "templates/partials".to_string(),
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Whole-request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}
