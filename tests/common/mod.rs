//! Shared utilities for integration tests: stub upstream API servers.

use axum::Router;
use serde_json::{json, Value};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Serve `router` as a stub upstream on an ephemeral port.
pub async fn start_stub_upstream(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

pub fn base_url(addr: SocketAddr) -> String {
    format!("http://{addr}")
}

/// SciVal-shaped author metrics body.
#[allow(dead_code)]
pub fn author_metrics_body() -> Value {
    json!({
        "results": [{
            "author": { "id": 12345, "name": "Ada Lovelace" },
            "metrics": [
                { "metricType": "ScholarlyOutput", "value": 1234 },
                { "metricType": "CitationCount", "value": 56789 },
                { "metricType": "FieldWeightedCitationImpact", "value": 1.87 }
            ]
        }]
    })
}

/// Scopus-shaped publication search body.
#[allow(dead_code)]
pub fn scopus_docs_body() -> Value {
    json!({
        "search-results": {
            "opensearch:totalResults": "2",
            "entry": [
                {
                    "eid": "2-s2.0-0042",
                    "dc:title": "On Computable Numbers",
                    "citedby-count": "901",
                    "prism:coverDate": "2021-05-01"
                },
                {
                    "eid": "2-s2.0-0043",
                    "dc:title": "Notes on the Analytical Engine",
                    "citedby-count": "44",
                    "prism:coverDate": "2020-11-12"
                }
            ]
        }
    })
}

/// Scopus-shaped author search body.
#[allow(dead_code)]
pub fn author_search_body() -> Value {
    json!({
        "search-results": {
            "opensearch:totalResults": "1",
            "entry": [{
                "eid": "9-s2.0-7004212771",
                "preferred-name": { "surname": "Smith", "given-name": "John" },
                "affiliation-current": {
                    "affiliation-name": "University of Somewhere",
                    "affiliation-country": "Denmark"
                }
            }]
        }
    })
}

/// Abstract retrieval body for one EID.
#[allow(dead_code)]
pub fn abstract_body() -> Value {
    json!({
        "abstracts-retrieval-response": {
            "coredata": {
                "dc:title": "On Computable Numbers",
                "prism:publicationName": "Proceedings of the LMS",
                "prism:coverDate": "2021-05-01",
                "citedby-count": "901",
                "dc:description": "We investigate the computable numbers."
            }
        }
    })
}
