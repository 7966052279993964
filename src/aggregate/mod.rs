//! Fan-out/fan-in aggregation of independent upstream calls.
//!
//! # Data Flow
//! ```text
//! ViewSpec tasks (label + request + extractor)
//!     → fetch all concurrently (no ordering between tasks)
//!     → wait for every task to settle (a join, not a race)
//!     → all ok:  RenderContext keyed by task label
//!     → any err: AggregationError{label, source}, siblings discarded
//! ```
//!
//! # Design Decisions
//! - All-or-nothing: there is no partial-success render path
//! - A failing task does not cancel in-flight siblings; their results are
//!   simply discarded once the join completes
//! - Extractors are data (JSON pointers), so per-entity behavior stays a
//!   table in `views` rather than duplicated control flow

use futures_util::future;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::upstream::{EndpointRequest, UpstreamClient, UpstreamError};

/// Selects the relevant sub-value from a raw upstream body.
///
/// Expressed as a JSON pointer (`/search-results/entry`) so the selection is
/// deterministic and the per-view task tables stay pure data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extractor(pub &'static str);

impl Extractor {
    /// Apply the pointer to a parsed body. A missing field means the
    /// upstream answered with an unexpected shape.
    pub fn apply(&self, body: &Value) -> Result<Value, UpstreamError> {
        body.pointer(self.0).cloned().ok_or_else(|| {
            UpstreamError::Malformed(format!("missing `{}` in upstream body", self.0))
        })
    }
}

/// One independent upstream call within an aggregation.
#[derive(Debug, Clone)]
pub struct AggregationTask {
    /// Context field this task's result is stored under.
    pub label: &'static str,
    pub request: EndpointRequest,
    pub extract: Extractor,
}

/// Context handed to the renderer: one entry per settled task label.
///
/// Built once per request and discarded after rendering.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    fields: Map<String, Value>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: &str, value: Value) {
        self.fields.insert(label.to_string(), value);
    }

    pub fn get(&self, label: &str) -> Option<&Value> {
        self.fields.get(label)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

/// Whole-aggregation failure, pointing at the first failing task in table
/// order.
#[derive(Debug, Error)]
#[error("aggregation task `{label}` failed: {source}")]
pub struct AggregationError {
    pub label: &'static str,
    #[source]
    pub source: UpstreamError,
}

/// Fetch every task concurrently and merge the extracted results.
///
/// All fetches are issued eagerly and all are awaited; completion order is
/// unconstrained. If any task failed, the first failure in task order is
/// returned and every other result is dropped.
pub async fn aggregate(
    client: &UpstreamClient,
    tasks: Vec<AggregationTask>,
) -> Result<RenderContext, AggregationError> {
    let mut labels = Vec::with_capacity(tasks.len());
    let mut fetches = Vec::with_capacity(tasks.len());
    for task in tasks {
        labels.push(task.label);
        let request = task.request;
        let extract = task.extract;
        fetches.push(async move {
            let body = client.fetch(&request).await?;
            extract.apply(&body)
        });
    }

    let settled = future::join_all(fetches).await;

    let mut context = RenderContext::new();
    for (label, outcome) in labels.into_iter().zip(settled) {
        match outcome {
            Ok(value) => context.insert(label, value),
            Err(source) => {
                tracing::warn!(label = %label, error = %source, "aggregation task failed");
                return Err(AggregationError { label, source });
            }
        }
    }
    Ok(context)
}
