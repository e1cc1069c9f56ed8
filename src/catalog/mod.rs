//! Remote Catalog Client
//!
//! The engine talks to the catalog through [`CatalogClient`], one page at a
//! time. A page carries its records, the total match count for the request,
//! and the scroll cursor to continue with (if any).
//!
//! - [`HttpCatalog`]: reqwest-backed client for the granule search API
//! - [`CatalogHealth`]: health probe result for the configured host

mod health;
mod http;

pub use health::{CatalogHealth, HealthError, HEALTH_ERROR_DISPLAY};
pub use http::{HttpCatalog, HITS_HEADER, SCROLL_ID_HEADER};

use std::future::Future;
use std::sync::Arc;

use crate::error::RetrievalResult;
use crate::params::QueryParam;

/// Opaque metadata record for one granule
pub type ResultRecord = serde_json::Value;

/// One page request
#[derive(Debug, Clone, Copy)]
pub struct PageRequest<'a> {
    pub params: &'a [QueryParam],
    /// Cursor from the previous page, absent on the first request
    pub scroll_id: Option<&'a str>,
}

impl<'a> PageRequest<'a> {
    pub fn new(params: &'a [QueryParam], scroll_id: Option<&'a str>) -> Self {
        PageRequest { params, scroll_id }
    }
}

/// One page of catalog results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogPage {
    /// Records in catalog order. `None` marks a placeholder entry.
    pub records: Vec<Option<ResultRecord>>,
    /// Total matches for the request, across all pages
    pub hits: u64,
    /// Cursor for the next page
    pub scroll_id: Option<String>,
}

/// Page-at-a-time access to the catalog
pub trait CatalogClient: Send + Sync {
    fn fetch_page(
        &self,
        request: PageRequest<'_>,
    ) -> impl Future<Output = RetrievalResult<CatalogPage>> + Send;
}

impl<C: CatalogClient> CatalogClient for Arc<C> {
    fn fetch_page(
        &self,
        request: PageRequest<'_>,
    ) -> impl Future<Output = RetrievalResult<CatalogPage>> + Send {
        (**self).fetch_page(request)
    }
}
