//! Bounded Merge Scheduler
//!
//! A [`QuerySession`] drains its subqueries one after another, in
//! decomposition order, into a single lazy sequence. Subqueries are never
//! interleaved with each other.
//!
//! ## Per-pull checks
//!
//! ```text
//! pull ──→ past cutoff? ──yes──→ TimedOut
//!            │ no
//!            ↓
//!          counter == max_results? ──yes──→ Capped
//!            │ no
//!            ↓
//!          next candidate (may fetch one page)
//!            ├── none left in any subquery ──→ Exhausted
//!            ├── past cutoff now? ──yes──→ TimedOut
//!            ├── placeholder ──→ skip, pull again
//!            └── record ──→ counter += 1, yield
//! ```
//!
//! A retrieval error ends the session in `Failed` and is returned to the
//! caller. Consumers stop early simply by not pulling again; dropping the
//! session (or its stream) drops any in-flight page request.

use futures_util::stream::{self, Stream};
use std::sync::Arc;
use uuid::Uuid;

use super::deadline::Deadline;
use super::subquery::{Candidate, SubqueryExecutor, SubqueryResults};
use crate::catalog::{CatalogClient, ResultRecord};
use crate::config::QueryConfig;
use crate::decompose::{Decomposer, SubquerySpec};
use crate::error::{QueryError, QueryResult};
use crate::filters::FilterSet;
use crate::params::ExtraParams;

/// Lifecycle of a query session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Created,
    Running,
    /// Every subquery drained without a limit firing
    Exhausted,
    /// Stopped at max_results
    Capped,
    /// Stopped at the wall-clock cutoff
    TimedOut,
    /// A catalog request failed
    Failed,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SessionState::Exhausted
                | SessionState::Capped
                | SessionState::TimedOut
                | SessionState::Failed
        )
    }
}

/// Page size for a session: `max_results` when it is smaller than the
/// default, the default otherwise.
pub fn page_size_for(max_results: Option<usize>, default_page_size: usize) -> usize {
    match max_results {
        Some(max) if max < default_page_size => max,
        _ => default_page_size,
    }
}

/// One single-use query over a decomposed filter set
pub struct QuerySession<C> {
    id: Uuid,
    client: Arc<C>,
    filters: FilterSet,
    extra: ExtraParams,
    subqueries: Vec<SubquerySpec>,
    max_results: Option<usize>,
    deadline: Deadline,
    result_counter: usize,
    state: SessionState,
    next_subquery: usize,
    current: Option<SubqueryResults<C>>,
}

impl<C: CatalogClient> QuerySession<C> {
    /// Decompose `filters` and fix the session cutoff.
    ///
    /// Fails before any network call if a filter has no field mapping.
    pub fn new(
        client: Arc<C>,
        decomposer: &Decomposer<'_>,
        filters: &FilterSet,
        max_results: Option<usize>,
        config: &QueryConfig,
    ) -> QueryResult<Self> {
        let subqueries = decomposer.decompose(filters)?;
        let page_size = page_size_for(max_results, config.default_page_size);
        let session = QuerySession {
            id: Uuid::new_v4(),
            client,
            filters: filters.clone(),
            extra: ExtraParams::new(config.provider.as_str(), page_size),
            subqueries,
            max_results,
            deadline: Deadline::new(config.time_budget()),
            result_counter: 0,
            state: SessionState::Created,
            next_subquery: 0,
            current: None,
        };

        tracing::info!(
            session_id = %session.id,
            subqueries = session.subqueries.len(),
            page_size,
            max_results = ?max_results,
            "query_session_created"
        );

        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Records yielded so far
    pub fn result_count(&self) -> usize {
        self.result_counter
    }

    pub fn max_results(&self) -> Option<usize> {
        self.max_results
    }

    pub fn page_size(&self) -> usize {
        self.extra.page_size
    }

    pub fn subqueries(&self) -> &[SubquerySpec] {
        &self.subqueries
    }

    /// Executor for one of this session's subqueries
    pub fn executor(&self, spec: &SubquerySpec) -> SubqueryExecutor<C> {
        SubqueryExecutor::new(Arc::clone(&self.client), spec, &self.extra)
    }

    /// Exact total across all subqueries, ignoring max_results and the cutoff
    pub async fn get_count(&self) -> QueryResult<u64> {
        let mut total = 0;
        for spec in &self.subqueries {
            total += self.executor(spec).get_count().await?;
        }
        Ok(total)
    }

    /// Pull the next record. `Ok(None)` means the session is over; see
    /// [`QuerySession::state`] for why.
    pub async fn next_record(&mut self) -> QueryResult<Option<ResultRecord>> {
        if self.state.is_terminal() {
            return Ok(None);
        }
        self.state = SessionState::Running;

        loop {
            if self.deadline.is_past() {
                self.time_out();
                return Ok(None);
            }
            if self.cap_reached() {
                self.finish(SessionState::Capped);
                return Ok(None);
            }

            let Some(results) = self.current_results() else {
                self.finish(SessionState::Exhausted);
                return Ok(None);
            };

            match results.next_candidate().await {
                Err(e) => {
                    self.current = None;
                    tracing::warn!(session_id = %self.id, error = %e, "query_session_failed");
                    self.finish(SessionState::Failed);
                    return Err(QueryError::from(e));
                }
                Ok(None) => {
                    tracing::debug!(
                        session_id = %self.id,
                        subquery = self.next_subquery,
                        "subquery_drained"
                    );
                    self.current = None;
                }
                Ok(Some(_)) if self.deadline.is_past() => {
                    self.time_out();
                    return Ok(None);
                }
                Ok(Some(Candidate::Placeholder)) => {}
                Ok(Some(Candidate::Record(record))) => {
                    self.result_counter += 1;
                    return Ok(Some(record));
                }
            }
        }
    }

    /// Borrowing stream over the remaining records; the session stays
    /// inspectable once the stream is dropped.
    pub fn stream(&mut self) -> impl Stream<Item = QueryResult<ResultRecord>> + '_ {
        stream::try_unfold(self, |session| async move {
            let next = session.next_record().await?;
            Ok::<_, QueryError>(next.map(|record| (record, session)))
        })
    }

    /// Owning stream over the remaining records
    pub fn into_stream(self) -> impl Stream<Item = QueryResult<ResultRecord>> {
        stream::try_unfold(self, |mut session| async move {
            let next = session.next_record().await?;
            Ok::<_, QueryError>(next.map(|record| (record, session)))
        })
    }

    fn cap_reached(&self) -> bool {
        self.max_results
            .is_some_and(|max| self.result_counter >= max)
    }

    /// Results of the subquery being drained, starting the next one if needed
    fn current_results(&mut self) -> Option<&mut SubqueryResults<C>> {
        if self.current.is_none() {
            let spec = self.subqueries.get(self.next_subquery)?;
            let results = self.executor(spec).get_results();
            self.next_subquery += 1;
            tracing::debug!(
                session_id = %self.id,
                subquery = self.next_subquery,
                of = self.subqueries.len(),
                "subquery_started"
            );
            self.current = Some(results);
        }
        self.current.as_mut()
    }

    fn time_out(&mut self) {
        tracing::warn!(
            session_id = %self.id,
            elapsed_ms = self.deadline.elapsed().as_millis() as u64,
            results = self.result_counter,
            filters = ?self.filters,
            "query_session_timed_out"
        );
        self.finish(SessionState::TimedOut);
    }

    fn finish(&mut self, state: SessionState) {
        self.state = state;
        self.current = None;
        match state {
            SessionState::Capped => {
                tracing::debug!(session_id = %self.id, results = self.result_counter, "query_session_capped");
            }
            SessionState::Exhausted => {
                tracing::debug!(session_id = %self.id, results = self.result_counter, "query_session_exhausted");
            }
            _ => {}
        }
    }
}
