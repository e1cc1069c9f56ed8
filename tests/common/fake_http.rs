//! Fake catalog served by axum on an ephemeral port.
//!
//! The search route serves `TOTAL` records for any filter combination,
//! paginated by the request's `page_size`, with the offset carried in
//! `CMR-Scroll-Id`. Extra routes answer with failures and odd bodies.

use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde_json::json;

use granule_search::catalog::{HITS_HEADER, SCROLL_ID_HEADER};
use granule_search::config::CatalogConfig;

pub const TOTAL: usize = 5;

#[derive(Debug, Clone)]
pub struct Received {
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
}

impl Received {
    pub fn param(&self, field: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == field)
            .map(|(_, v)| v.as_str())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Default)]
pub struct FakeCatalog {
    received: Mutex<Vec<Received>>,
}

impl FakeCatalog {
    pub fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }
}

async fn search(
    State(state): State<Arc<FakeCatalog>>,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Response {
    let received = Received { query, headers };
    state.received.lock().unwrap().push(received.clone());

    let page_size: usize = received
        .param("page_size")
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);
    let offset: usize = received
        .header(SCROLL_ID_HEADER)
        .and_then(|id| id.strip_prefix("cursor-"))
        .and_then(|n| n.parse().ok())
        .unwrap_or(0);
    let end = (offset + page_size).min(TOTAL);
    let items: Vec<_> = (offset..end).map(|i| json!({"id": format!("G{i}")})).collect();

    let mut response_headers = HeaderMap::new();
    response_headers.insert(
        HeaderName::from_bytes(HITS_HEADER.as_bytes()).unwrap(),
        HeaderValue::from(TOTAL),
    );
    if received.param("scroll") == Some("true") {
        response_headers.insert(
            HeaderName::from_bytes(SCROLL_ID_HEADER.as_bytes()).unwrap(),
            HeaderValue::from_str(&format!("cursor-{end}")).unwrap(),
        );
    }

    (
        response_headers,
        axum::Json(json!({"hits": TOTAL, "items": items})),
    )
        .into_response()
}

async fn broken() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "catalog exploded").into_response()
}

async fn garbage() -> Response {
    "<html>not json</html>".into_response()
}

async fn placeholders() -> Response {
    axum::Json(json!({"hits": 3, "items": [{"id": "G0"}, null, {"id": "G2"}]})).into_response()
}

async fn health_ok() -> Response {
    axum::Json(json!({"echo": {"ok?": true}})).into_response()
}

pub async fn spawn_catalog(state: Arc<FakeCatalog>) -> String {
    let app = Router::new()
        .route("/search/granules.umm_json_v1_4", get(search))
        .route("/broken", get(broken))
        .route("/garbage", get(garbage))
        .route("/placeholders", get(placeholders))
        .route("/search/health", get(health_ok))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn catalog_config(base_url: &str) -> CatalogConfig {
    CatalogConfig {
        base_url: base_url.to_string(),
        request_timeout_ms: 5_000,
        ..CatalogConfig::default()
    }
}
