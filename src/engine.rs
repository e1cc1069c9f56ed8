//! Query Engine
//!
//! Binds a catalog client, a field mapping, and the query configuration so
//! callers can open sessions with one call.

use std::sync::Arc;

use crate::catalog::{CatalogClient, HttpCatalog};
use crate::config::{Config, QueryConfig};
use crate::decompose::Decomposer;
use crate::error::QueryResult;
use crate::execution::QuerySession;
use crate::field_map::FieldMapping;
use crate::filters::FilterSet;

pub struct QueryEngine<C> {
    client: Arc<C>,
    mapping: FieldMapping,
    config: QueryConfig,
}

impl<C: CatalogClient> QueryEngine<C> {
    pub fn new(client: Arc<C>, mapping: FieldMapping, config: QueryConfig) -> Self {
        QueryEngine {
            client,
            mapping,
            config,
        }
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    pub fn decomposer(&self) -> Decomposer<'_> {
        Decomposer::with_list_exempt(&self.mapping, self.config.list_exempt_filters.iter().cloned())
    }

    /// Open a new session; its cutoff starts now.
    pub fn session(
        &self,
        filters: &FilterSet,
        max_results: Option<usize>,
    ) -> QueryResult<QuerySession<C>> {
        QuerySession::new(
            Arc::clone(&self.client),
            &self.decomposer(),
            filters,
            max_results,
            &self.config,
        )
    }
}

impl QueryEngine<HttpCatalog> {
    /// HTTP catalog and the standard field mapping
    pub fn from_config(config: &Config) -> Self {
        QueryEngine::new(
            Arc::new(HttpCatalog::new(&config.catalog)),
            FieldMapping::standard(),
            config.query.clone(),
        )
    }
}
