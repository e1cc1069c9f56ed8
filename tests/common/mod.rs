//! Shared test helpers: an in-memory, scripted catalog and an HTTP fake.
//!
//! Each subquery is identified by its filter parameters (everything that is
//! not a control parameter). Pages are served from the scripted record list
//! using the request's `page_size`; the scroll cursor encodes the offset.

#![allow(dead_code)]

pub mod fake_http;

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use granule_search::{
    CatalogClient, CatalogPage, PageRequest, QueryParam, ResultRecord, RetrievalError,
    RetrievalResult,
};
use serde_json::json;

const CONTROL_FIELDS: &[&str] = &[
    "provider",
    "page_size",
    "scroll",
    "options[temporal][and]",
    "sort_key[]",
    "options[platform][ignore_case]",
];

/// A request as the catalog saw it
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub params: Vec<QueryParam>,
    pub scroll_id: Option<String>,
}

impl SeenRequest {
    pub fn param(&self, field: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.field == field)
            .map(|p| p.value.as_str())
    }

    pub fn is_count(&self) -> bool {
        self.param("page_size") == Some("0")
    }

    pub fn key(&self) -> String {
        subquery_key(&self.params)
    }
}

#[derive(Default)]
pub struct ScriptedCatalog {
    records: HashMap<String, Vec<Option<ResultRecord>>>,
    fail_on: Mutex<Option<(String, usize)>>,
    page_delay: Option<Duration>,
    seen: Mutex<Vec<SeenRequest>>,
}

impl ScriptedCatalog {
    pub fn new() -> Self {
        ScriptedCatalog::default()
    }

    /// Script the entries returned for the subquery with these filter params
    pub fn with_subquery(mut self, filter_params: &[(&str, &str)], entries: Vec<Option<ResultRecord>>) -> Self {
        let params: Vec<QueryParam> = filter_params
            .iter()
            .map(|(f, v)| QueryParam::new(*f, *v))
            .collect();
        self.records.insert(subquery_key(&params), entries);
        self
    }

    /// Fail the `page`-th (0-based) page request of the given subquery
    pub fn failing_on(self, filter_params: &[(&str, &str)], page: usize) -> Self {
        let params: Vec<QueryParam> = filter_params
            .iter()
            .map(|(f, v)| QueryParam::new(*f, *v))
            .collect();
        *self.fail_on.lock().unwrap() = Some((subquery_key(&params), page));
        self
    }

    /// Sleep before answering every page request
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = Some(delay);
        self
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn page_requests(&self) -> Vec<SeenRequest> {
        self.seen().into_iter().filter(|r| !r.is_count()).collect()
    }
}

impl CatalogClient for ScriptedCatalog {
    async fn fetch_page(&self, request: PageRequest<'_>) -> RetrievalResult<CatalogPage> {
        if let Some(delay) = self.page_delay {
            tokio::time::sleep(delay).await;
        }

        let seen = SeenRequest {
            params: request.params.to_vec(),
            scroll_id: request.scroll_id.map(str::to_string),
        };
        self.seen.lock().unwrap().push(seen.clone());

        let key = seen.key();
        let entries = self.records.get(&key).cloned().unwrap_or_default();
        let hits = entries.len() as u64;

        let page_size: usize = seen
            .param("page_size")
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| RetrievalError::MalformedPage("no page_size".to_string()))?;
        let offset: usize = match &seen.scroll_id {
            Some(id) => id
                .rsplit('#')
                .next()
                .and_then(|n| n.parse().ok())
                .unwrap_or(0),
            None => 0,
        };

        // count requests (page_size 0) count as page 0
        let page_index = offset.checked_div(page_size).unwrap_or(0);
        if let Some((fail_key, fail_page)) = self.fail_on.lock().unwrap().as_ref() {
            if *fail_key == key && *fail_page == page_index {
                return Err(RetrievalError::Status {
                    status: 500,
                    body: "scripted failure".to_string(),
                });
            }
        }

        if page_size == 0 {
            return Ok(CatalogPage {
                records: Vec::new(),
                hits,
                scroll_id: None,
            });
        }

        let end = (offset + page_size).min(entries.len());
        let records = entries.get(offset..end).map(<[_]>::to_vec).unwrap_or_default();

        Ok(CatalogPage {
            records,
            hits,
            scroll_id: Some(format!("{key}#{end}")),
        })
    }
}

fn subquery_key(params: &[QueryParam]) -> String {
    params
        .iter()
        .filter(|p| !CONTROL_FIELDS.contains(&p.field.as_str()))
        .map(|p| format!("{}={}", p.field, p.value))
        .collect::<Vec<_>>()
        .join("&")
}

/// `n` distinct records tagged with `tag`
pub fn records(tag: &str, n: usize) -> Vec<Option<ResultRecord>> {
    (0..n)
        .map(|i| Some(json!({"granule": format!("{tag}-{i}")})))
        .collect()
}

pub fn granule_id(record: &ResultRecord) -> String {
    record["granule"].as_str().unwrap_or_default().to_string()
}
