//! End-to-end page tests: full portal server against stub upstreams.

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use scival_portal::{HttpServer, PortalConfig};

mod common;

async fn start_portal(upstream: SocketAddr, timeout_secs: u64) -> SocketAddr {
    let mut config = PortalConfig::default();
    config.upstream.base_url = common::base_url(upstream);
    config.upstream.api_key = "test-key".to_string();
    config.upstream.timeout_secs = timeout_secs;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config).unwrap();
    tokio::spawn(async move {
        server.run(listener).await.unwrap();
    });
    addr
}

fn no_redirect_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

#[tokio::test]
async fn index_redirects_to_author_search() {
    let upstream = common::start_stub_upstream(Router::new()).await;
    let portal = start_portal(upstream, 5).await;

    let res = no_redirect_client()
        .get(format!("http://{portal}/"))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_redirection());
    assert_eq!(
        res.headers().get("location").and_then(|v| v.to_str().ok()),
        Some("/authors")
    );
}

#[tokio::test]
async fn search_forms_render_for_every_entity_type() {
    let upstream = common::start_stub_upstream(Router::new()).await;
    let portal = start_portal(upstream, 5).await;
    let client = reqwest::Client::new();

    for (path, heading) in [
        ("/authors", "Author Search"),
        ("/countries", "Country Search"),
        ("/countryGroups", "Country Group Search"),
        ("/institutions", "Institution Search"),
        ("/institutionGroups", "Institution Group Search"),
        ("/topics", "Topic Search"),
    ] {
        let res = client
            .get(format!("http://{portal}{path}"))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200, "{path}");
        let body = res.text().await.unwrap();
        assert!(body.contains(heading), "{path} should contain `{heading}`");
    }
}

#[tokio::test]
async fn author_detail_page_renders_metrics_and_docs() {
    let router = Router::new()
        .route(
            "/analytics/scival/author/metrics",
            get(|| async { Json(common::author_metrics_body()) }),
        )
        .route(
            "/content/search/scopus",
            get(|| async { Json(common::scopus_docs_body()) }),
        );
    let upstream = common::start_stub_upstream(router).await;
    let portal = start_portal(upstream, 5).await;

    let res = reqwest::get(format!("http://{portal}/author/12345"))
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body = res.text().await.unwrap();

    assert!(body.contains("Ada Lovelace"));
    // camelCase metric names come out spaced, numbers grouped.
    assert!(body.contains("Scholarly Output"));
    assert!(body.contains("1,234"));
    assert!(body.contains("56,789"));
    // Publications with abstract links and the shortened Scopus id.
    assert!(body.contains("On Computable Numbers"));
    assert!(body.contains("/abstract/2-s2.0-0042"));
    assert!(body.contains("Scopus #0042"));
}

#[tokio::test]
async fn failing_docs_task_yields_bad_gateway_without_partial_render() {
    let router = Router::new()
        .route(
            "/analytics/scival/author/metrics",
            get(|| async { Json(common::author_metrics_body()) }),
        )
        .route(
            "/content/search/scopus",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
        );
    let upstream = common::start_stub_upstream(router).await;
    let portal = start_portal(upstream, 5).await;

    let res = reqwest::get(format!("http://{portal}/author/12345"))
        .await
        .unwrap();
    assert_eq!(res.status(), 502);
    let body = res.text().await.unwrap();
    assert_eq!(body, "Upstream service error");
    assert!(!body.contains("Ada Lovelace"));
}

#[tokio::test]
async fn upstream_timeout_yields_gateway_timeout() {
    let router = Router::new().route(
        "/analytics/scival/topic/metrics",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({ "results": [] }))
        }),
    );
    let upstream = common::start_stub_upstream(router).await;
    let portal = start_portal(upstream, 1).await;

    let res = reqwest::get(format!("http://{portal}/topic/429"))
        .await
        .unwrap();
    assert_eq!(res.status(), 504);
}

#[tokio::test]
async fn author_search_builds_the_scopus_name_query() {
    let seen: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
    let seen_in_handler = seen.clone();
    let router = Router::new().route(
        "/content/search/author",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let seen = seen_in_handler.clone();
            async move {
                *seen.lock().unwrap() = params.get("query").cloned();
                Json(common::author_search_body())
            }
        }),
    );
    let upstream = common::start_stub_upstream(router).await;
    let portal = start_portal(upstream, 5).await;

    let res = reqwest::get(format!(
        "http://{portal}/search?entityType=author&name=John%20Smith"
    ))
    .await
    .unwrap();
    assert_eq!(res.status(), 200);
    let body = res.text().await.unwrap();
    assert!(body.contains("Smith, John"));
    assert!(body.contains("University of Somewhere"));
    // Link target is the numeric tail of the author EID.
    assert!(body.contains("/author/7004212771"));

    assert_eq!(
        seen.lock().unwrap().clone().as_deref(),
        Some("authlast(Smith) and authfirst(John)")
    );
}

#[tokio::test]
async fn entity_search_renders_links_to_detail_pages() {
    let router = Router::new().route(
        "/analytics/scival/countryGroup/search",
        get(|| async {
            Json(json!({
                "results": [
                    { "id": 10, "name": "Nordic Countries" },
                    { "id": 11, "name": "European Union" }
                ]
            }))
        }),
    );
    let upstream = common::start_stub_upstream(router).await;
    let portal = start_portal(upstream, 5).await;

    let res = reqwest::get(format!(
        "http://{portal}/search?entityType=countryGroup&name=Europe"
    ))
    .await
    .unwrap();
    assert_eq!(res.status(), 200);
    let body = res.text().await.unwrap();
    assert!(body.contains("Country Group Search Results"));
    assert!(body.contains("/countryGroup/10"));
    assert!(body.contains("Nordic Countries"));
}

#[tokio::test]
async fn unknown_entity_type_is_a_client_error() {
    let upstream = common::start_stub_upstream(Router::new()).await;
    let portal = start_portal(upstream, 5).await;

    let res = reqwest::get(format!(
        "http://{portal}/search?entityType=journal&name=Nature"
    ))
    .await
    .unwrap();
    assert_eq!(res.status(), 400);
}

#[tokio::test]
async fn abstract_page_renders_coredata() {
    let router = Router::new().route(
        "/content/abstract/eid/{eid}",
        get(|| async { Json(common::abstract_body()) }),
    );
    let upstream = common::start_stub_upstream(router).await;
    let portal = start_portal(upstream, 5).await;

    let res = reqwest::get(format!("http://{portal}/abstract/2-s2.0-0042"))
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body = res.text().await.unwrap();
    assert!(body.contains("On Computable Numbers"));
    assert!(body.contains("Proceedings of the LMS"));
    assert!(body.contains("We investigate the computable numbers."));
}

#[tokio::test]
async fn institution_detail_joins_metrics_and_topics() {
    let router = Router::new()
        .route(
            "/analytics/scival/institution/metrics",
            get(|| async {
                Json(json!({
                    "results": [{
                        "institution": { "name": "University of Somewhere" },
                        "metrics": [{ "metricType": "ScholarlyOutput", "value": 420 }]
                    }]
                }))
            }),
        )
        .route(
            "/analytics/scival/topic/institutionId/{id}",
            get(|| async {
                Json(json!({
                    "topics": [
                        { "id": 429, "name": "Cryptography", "prominencePercentile": 99.1 }
                    ]
                }))
            }),
        );
    let upstream = common::start_stub_upstream(router).await;
    let portal = start_portal(upstream, 5).await;

    let res = reqwest::get(format!("http://{portal}/institution/508076"))
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body = res.text().await.unwrap();
    assert!(body.contains("University of Somewhere"));
    assert!(body.contains("Cryptography"));
    assert!(body.contains("/topic/429"));
    assert!(body.contains("99.10"));
}
