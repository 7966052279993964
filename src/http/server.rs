//! HTTP server setup and request handlers.
//!
//! # Responsibilities
//! - Create the Axum router with every portal route
//! - Wire up middleware (tracing, request timeout)
//! - Dispatch each request to one aggregation plus one render
//! - Map failures to HTTP statuses (502 upstream fault, 504 upstream
//!   timeout, 500 render failure) with generic bodies
//!
//! Routes are generated from the `views::EntityKind` table, so adding an
//! entity type never adds handler code here.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path as FsPath;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::aggregate::{aggregate, RenderContext};
use crate::config::{ConfigError, PortalConfig};
use crate::render::{RenderError, Renderer};
use crate::upstream::UpstreamClient;
use crate::views::{self, EntityKind, ViewSpec};

/// Unrecoverable startup failure; terminates the process from `main`.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Templates(#[from] RenderError),
}

/// Application state injected into handlers. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<UpstreamClient>,
    pub renderer: Arc<Renderer>,
}

/// HTTP server for the portal.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration. Template
    /// loading and client construction happen here, so any misconfiguration
    /// fails before the listener starts accepting.
    pub fn new(config: PortalConfig) -> Result<Self, StartupError> {
        let renderer = Renderer::from_dirs(
            FsPath::new(&config.templates.dir),
            FsPath::new(&config.templates.partials_dir),
        )?;
        let client = UpstreamClient::new(&config.upstream)?;

        let state = AppState {
            client: Arc::new(client),
            renderer: Arc::new(renderer),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router })
    }

    /// Build the Axum router with every route and middleware layer.
    fn build_router(config: &PortalConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/", get(index))
            .route("/search", get(search))
            .route("/abstract/{id}", get(abstract_page));

        for kind in EntityKind::ALL {
            router = router
                .route(
                    kind.search_path(),
                    get(move |state: State<AppState>| search_form(state, kind)),
                )
                .route(
                    kind.detail_path(),
                    get(move |state: State<AppState>, id: Path<String>| {
                        entity_detail(state, kind, id)
                    }),
                );
        }

        router
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "portal server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("portal server stopped");
        Ok(())
    }
}

/// The landing page is the author search form.
async fn index() -> Redirect {
    Redirect::to("/authors")
}

/// Render one entity's search form.
async fn search_form(State(state): State<AppState>, kind: EntityKind) -> Response {
    let context = json!({ "entity_type": kind.as_str() });
    match state.renderer.render("search.html", &context) {
        Ok(html) => Html(html).into_response(),
        Err(err) => render_failure("search.html", err),
    }
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(rename = "entityType")]
    entity_type: String,
    #[serde(default)]
    name: String,
}

/// Submitted search: one upstream query, one results page.
async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let Some(kind) = EntityKind::from_route(&params.entity_type) else {
        tracing::debug!(entity_type = %params.entity_type, "rejecting unknown entity type");
        return (StatusCode::BAD_REQUEST, "Unknown entity type").into_response();
    };
    let spec = views::search_view(kind, &params.name, state.client.base());
    render_view(&state, spec, json!({ "entity_type": kind.as_str() })).await
}

/// Detail page for one entity: fan out the view's tasks, join, render.
async fn entity_detail(
    State(state): State<AppState>,
    kind: EntityKind,
    Path(id): Path<String>,
) -> Response {
    let spec = views::detail_view(kind, &id, state.client.base());
    render_view(&state, spec, json!({ "entity_type": kind.as_str() })).await
}

/// Abstract lookup by publication EID.
async fn abstract_page(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let spec = views::abstract_view(&id, state.client.base());
    render_view(&state, spec, json!({})).await
}

/// Shared tail of every page handler: aggregate the view's tasks, merge the
/// static context fields, render the template.
async fn render_view(state: &AppState, spec: ViewSpec, extra: Value) -> Response {
    let template = spec.template;
    let mut context = match aggregate(&state.client, spec.tasks).await {
        Ok(context) => context,
        Err(err) => {
            tracing::error!(label = %err.label, error = %err, "aggregation failed");
            let status = if err.source.is_timeout() {
                StatusCode::GATEWAY_TIMEOUT
            } else {
                StatusCode::BAD_GATEWAY
            };
            return (status, "Upstream service error").into_response();
        }
    };
    merge_extra(&mut context, extra);

    match state.renderer.render(template, &context.into_value()) {
        Ok(html) => Html(html).into_response(),
        Err(err) => render_failure(template, err),
    }
}

fn merge_extra(context: &mut RenderContext, extra: Value) {
    if let Value::Object(fields) = extra {
        for (key, value) in fields {
            context.insert(&key, value);
        }
    }
}

fn render_failure(template: &str, err: RenderError) -> Response {
    tracing::error!(template = %template, error = %err, "render failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "Page rendering failed").into_response()
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
