//! Query Execution Module
//!
//! Turns decomposed subqueries into one bounded, lazy result sequence:
//! - [`SubqueryExecutor`]: scrolled pagination for a single subquery
//! - [`QuerySession`]: sequential merge under a cutoff and a result cap
//! - [`Deadline`]: the session's fixed wall-clock cutoff

mod deadline;
mod session;
mod subquery;

pub use deadline::Deadline;
pub use session::{page_size_for, QuerySession, SessionState};
pub use subquery::{Candidate, SubqueryExecutor, SubqueryResults};
