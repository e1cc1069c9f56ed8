//! Subquery Executor
//!
//! Runs one [`SubquerySpec`] against the catalog. Page requests carry the
//! session's extra parameters first, then the subquery's own pairs, so the
//! sort keys ride along on every page and results arrive in catalog order.
//!
//! Pagination follows the catalog's scroll cursor. The sequence ends on a
//! page shorter than `page_size`, an empty page, or a page with no cursor.
//! At most one page is in flight and nothing is fetched ahead of the
//! consumer.

use futures_util::stream::{self, Stream};
use std::collections::VecDeque;
use std::sync::Arc;

use crate::catalog::{CatalogClient, PageRequest, ResultRecord};
use crate::decompose::SubquerySpec;
use crate::error::{RetrievalError, RetrievalResult};
use crate::params::{ExtraParams, QueryParam};

/// One entry pulled from a subquery
#[derive(Debug, Clone, PartialEq)]
pub enum Candidate {
    Record(ResultRecord),
    /// Null entry in a page; never yielded or counted by a session
    Placeholder,
}

/// Count and result access for one subquery
pub struct SubqueryExecutor<C> {
    client: Arc<C>,
    params: Vec<QueryParam>,
    count_params: Vec<QueryParam>,
    page_size: usize,
}

impl<C: CatalogClient> SubqueryExecutor<C> {
    pub fn new(client: Arc<C>, spec: &SubquerySpec, extra: &ExtraParams) -> Self {
        let mut params = extra.to_params();
        params.extend_from_slice(spec.params());
        let mut count_params = extra.count_params();
        count_params.extend_from_slice(spec.params());

        SubqueryExecutor {
            client,
            params,
            count_params,
            page_size: extra.page_size,
        }
    }

    /// Full parameter list sent with every page request
    pub fn params(&self) -> &[QueryParam] {
        &self.params
    }

    /// Total matches for this subquery alone, from a count-only request
    pub async fn get_count(&self) -> RetrievalResult<u64> {
        let page = self
            .client
            .fetch_page(PageRequest {
                params: &self.count_params,
                scroll_id: None,
            })
            .await?;
        Ok(page.hits)
    }

    /// A fresh, lazy pass over this subquery's results
    pub fn get_results(&self) -> SubqueryResults<C> {
        SubqueryResults {
            client: Arc::clone(&self.client),
            params: self.params.clone(),
            page_size: self.page_size,
            scroll_id: None,
            buffer: VecDeque::new(),
            finished: false,
        }
    }
}

/// Lazy, finite, non-restartable result sequence of one subquery
pub struct SubqueryResults<C> {
    client: Arc<C>,
    params: Vec<QueryParam>,
    page_size: usize,
    scroll_id: Option<String>,
    buffer: VecDeque<Option<ResultRecord>>,
    /// No further pages will be requested
    finished: bool,
}

impl<C: CatalogClient> SubqueryResults<C> {
    /// Next candidate, fetching a page only when the current one is used up.
    ///
    /// After an error the sequence is over; later calls return `Ok(None)`.
    pub async fn next_candidate(&mut self) -> RetrievalResult<Option<Candidate>> {
        loop {
            if let Some(entry) = self.buffer.pop_front() {
                return Ok(Some(entry.map_or(Candidate::Placeholder, Candidate::Record)));
            }
            if self.finished {
                return Ok(None);
            }
            self.fetch_next_page().await?;
        }
    }

    async fn fetch_next_page(&mut self) -> RetrievalResult<()> {
        let result = self
            .client
            .fetch_page(PageRequest {
                params: &self.params,
                scroll_id: self.scroll_id.as_deref(),
            })
            .await;

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                self.finished = true;
                self.buffer.clear();
                return Err(e);
            }
        };

        if page.records.is_empty()
            || page.records.len() < self.page_size
            || page.scroll_id.is_none()
        {
            self.finished = true;
        }
        self.scroll_id = page.scroll_id;
        self.buffer.extend(page.records);
        Ok(())
    }

    /// The same sequence as a [`Stream`]
    pub fn into_stream(self) -> impl Stream<Item = RetrievalResult<Candidate>> {
        stream::try_unfold(self, |mut results| async move {
            let next = results.next_candidate().await?;
            Ok::<_, RetrievalError>(next.map(|candidate| (candidate, results)))
        })
    }
}
