//! Request descriptors for upstream endpoints.
//!
//! An [`EndpointRequest`] is immutable once built and consumed exactly once
//! by the client. All escaping happens here: static route paths are appended
//! segment by segment, dynamic identifiers go through [`push_segment`]
//! (percent-encoded by `url`), and query values are encoded by the client
//! when the call is made. Callers must never pre-escape identifiers.
//!
//! [`push_segment`]: EndpointRequest::push_segment

use url::Url;

/// Immutable descriptor of one upstream call.
#[derive(Debug, Clone)]
pub struct EndpointRequest {
    url: Url,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
}

impl EndpointRequest {
    /// Start a request for `path` under the given base URL.
    ///
    /// `path` is a fixed route like `analytics/scival/author/metrics`;
    /// dynamic identifiers must be added with [`push_segment`] instead of
    /// being spliced into `path`.
    ///
    /// [`push_segment`]: EndpointRequest::push_segment
    pub fn new(base: &Url, path: &str) -> Self {
        let mut url = base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(path.split('/').filter(|s| !s.is_empty()));
        }
        Self {
            url,
            query: Vec::new(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
        }
    }

    /// Append a dynamic path segment (an entity id or EID), escaping it.
    pub fn push_segment(mut self, segment: &str) -> Self {
        if let Ok(mut segments) = self.url.path_segments_mut() {
            segments.push(segment);
        }
        self
    }

    /// Add a query parameter. Values are stored raw; encoding happens when
    /// the client serializes the pairs onto the URL.
    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}
