//! HTTP catalog client
//!
//! Parameters travel as repeated query pairs. The scroll cursor goes out and
//! comes back in the `CMR-Scroll-Id` header; the total match count comes back
//! in `CMR-Hits` (the body's `hits` field is the fallback).

use reqwest::header::HeaderMap;
use reqwest::Client;
use std::time::Duration;

use super::{CatalogClient, CatalogPage, PageRequest};
use crate::config::CatalogConfig;
use crate::error::{RetrievalError, RetrievalResult};
use crate::params::QueryParam;

pub const SCROLL_ID_HEADER: &str = "CMR-Scroll-Id";
pub const HITS_HEADER: &str = "CMR-Hits";
pub(super) const CLIENT_ID_HEADER: &str = "Client-Id";

/// reqwest-backed [`CatalogClient`]
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    pub(super) client: Client,
    pub(super) base_url: String,
    pub(super) search_url: String,
    pub(super) health_url: String,
    pub(super) client_id: String,
}

impl HttpCatalog {
    pub fn new(config: &CatalogConfig) -> Self {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        let mut builder = Client::builder();
        if config.request_timeout_ms > 0 {
            builder = builder.timeout(Duration::from_millis(config.request_timeout_ms));
        }
        HttpCatalog {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            search_url: format!("{base_url}{}", config.search_path),
            health_url: format!("{base_url}{}", config.health_path),
            base_url,
            client_id: config.client_id.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn search_url(&self) -> &str {
        &self.search_url
    }

    fn transport_error(&self, source: reqwest::Error) -> RetrievalError {
        RetrievalError::Transport {
            url: self.search_url.clone(),
            source,
        }
    }
}

impl CatalogClient for HttpCatalog {
    async fn fetch_page(&self, request: PageRequest<'_>) -> RetrievalResult<CatalogPage> {
        let pairs: Vec<(&str, &str)> = request.params.iter().map(QueryParam::as_pair).collect();

        let mut builder = self
            .client
            .get(&self.search_url)
            .query(&pairs)
            .header(CLIENT_ID_HEADER, &self.client_id);
        if let Some(scroll_id) = request.scroll_id {
            builder = builder.header(SCROLL_ID_HEADER, scroll_id);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RetrievalError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        let page = parse_page(&body, &headers)?;
        tracing::debug!(
            records = page.records.len(),
            hits = page.hits,
            has_scroll_id = page.scroll_id.is_some(),
            "catalog_page_fetched"
        );
        Ok(page)
    }
}

fn parse_page(body: &[u8], headers: &HeaderMap) -> RetrievalResult<CatalogPage> {
    let json: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| RetrievalError::MalformedPage(format!("invalid JSON: {e}")))?;

    let items = json
        .get("items")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| RetrievalError::MalformedPage("missing 'items' array".to_string()))?;

    let hits = header_str(headers, HITS_HEADER)
        .and_then(|h| h.trim().parse::<u64>().ok())
        .or_else(|| json.get("hits").and_then(serde_json::Value::as_u64))
        .ok_or_else(|| RetrievalError::MalformedPage("missing hit count".to_string()))?;

    let records = items
        .iter()
        .map(|item| (!item.is_null()).then(|| item.clone()))
        .collect();

    Ok(CatalogPage {
        records,
        hits,
        scroll_id: header_str(headers, SCROLL_ID_HEADER).map(str::to_string),
    })
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
