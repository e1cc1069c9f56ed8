//! # Granule Search Query Engine
//!
//! Translates a validated set of satellite-imagery metadata filters into a
//! bounded set of primitive requests against a paginated metadata catalog,
//! runs them, and exposes one ordered, lazily-produced stream of records
//! under a wall-clock budget and an optional result cap.
//!
//! ## Pipeline
//!
//! ```text
//! FilterSet
//!     ↓
//! [Decomposer]            → Vec<SubquerySpec> (cartesian over multi-valued filters)
//!     ↓
//! [QuerySession]          → drains subqueries in order, checks cutoff + cap per pull
//!     ↓
//! [SubqueryExecutor]      → scroll-paginated page requests via CatalogClient
//!     ↓
//! Stream<ResultRecord>
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use futures_util::StreamExt;
//! use granule_search::{Config, FilterSet, FilterValue, QueryEngine};
//!
//! let engine = QueryEngine::from_config(&Config::load()?);
//! let filters = FilterSet::new()
//!     .with("platform", FilterValue::list(["S1A", "S1B"]))
//!     .with("beammode", "IW");
//!
//! let mut session = engine.session(&filters, Some(250))?;
//! println!("total matches: {}", session.get_count().await?);
//!
//! {
//!     let records = session.stream();
//!     futures_util::pin_mut!(records);
//!     while let Some(record) = records.next().await {
//!         println!("{}", record?);
//!     }
//! }
//! println!("finished: {:?}", session.state());
//! ```
//!
//! ## Module Organization
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `filters` | Typed filter set and values |
//! | `field_map` | Filter name → backend field + value template |
//! | `decompose` | Cartesian decomposition into subqueries |
//! | `params` | Request parameter pairs and per-session control parameters |
//! | `catalog` | Catalog client trait, HTTP client, health probe |
//! | `execution` | Subquery executor, bounded merge scheduler, deadline |
//! | `engine` | Facade tying client, mapping and config together |
//! | `output` | JSON-lines writer for a session's records |
//! | `config` | Hierarchical configuration (figment) |
//! | `logging` | tracing subscriber setup |

pub mod catalog;
pub mod config;
pub mod decompose;
pub mod engine;
pub mod error;
pub mod execution;
pub mod field_map;
pub mod filters;
pub mod logging;
pub mod output;
pub mod params;

pub use catalog::{CatalogClient, CatalogPage, HttpCatalog, PageRequest, ResultRecord};
pub use config::Config;
pub use decompose::{Decomposer, SubquerySpec};
pub use engine::QueryEngine;
pub use error::{OutputError, QueryError, QueryResult, RetrievalError, RetrievalResult};
pub use execution::{QuerySession, SessionState};
pub use field_map::{FieldMapping, FieldRule};
pub use filters::{FilterSet, FilterValue};
pub use output::write_json_lines;
pub use params::{ExtraParams, QueryParam};
