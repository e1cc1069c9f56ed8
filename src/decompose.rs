//! Parameter Decomposer
//!
//! Expands a [`FilterSet`] into the ordered list of primitive subqueries the
//! catalog can answer one at a time.
//!
//! ## Algorithm
//!
//! ```text
//! FilterSet
//!     ├── combinable filters ──→ one pair-list per filter ──→ cartesian product (N branches)
//!     └── list-exempt filters ─→ flattened into one fixed tuple
//!                                         ↓
//!                  N × (branch ++ fixed tuple) = Vec<SubquerySpec>
//! ```
//!
//! List-exempt filters are sent as repeated multi-value fields, so they are
//! flattened instead of branched. Branch order is deterministic: the first
//! combinable filter varies slowest.

use std::collections::HashSet;

use crate::error::{QueryError, QueryResult};
use crate::field_map::FieldMapping;
use crate::filters::{FilterSet, FilterValue};
use crate::params::QueryParam;

/// Filters sent as repeated fields instead of being branched
pub const DEFAULT_LIST_EXEMPT_FILTERS: &[&str] = &["granule_list", "product_list"];

/// One primitive filter combination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubquerySpec {
    params: Vec<QueryParam>,
}

impl SubquerySpec {
    pub fn new(params: Vec<QueryParam>) -> Self {
        SubquerySpec { params }
    }

    pub fn params(&self) -> &[QueryParam] {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Splits and expands filter sets against a field mapping
#[derive(Debug, Clone)]
pub struct Decomposer<'a> {
    mapping: &'a FieldMapping,
    list_exempt: HashSet<String>,
}

impl<'a> Decomposer<'a> {
    /// Decomposer using [`DEFAULT_LIST_EXEMPT_FILTERS`]
    pub fn new(mapping: &'a FieldMapping) -> Self {
        Decomposer::with_list_exempt(mapping, DEFAULT_LIST_EXEMPT_FILTERS.iter().copied())
    }

    pub fn with_list_exempt<I, S>(mapping: &'a FieldMapping, list_exempt: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Decomposer {
            mapping,
            list_exempt: list_exempt.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_list_exempt(&self, filter: &str) -> bool {
        self.list_exempt.contains(filter)
    }

    /// Build the subquery list for `filters`.
    ///
    /// Fails with [`QueryError::UnmappedFilter`] on the first filter the
    /// mapping does not know, before anything else is produced.
    pub fn decompose(&self, filters: &FilterSet) -> QueryResult<Vec<SubquerySpec>> {
        let mut branch_lists = Vec::new();
        let mut fixed = Vec::new();

        for (name, value) in filters.iter() {
            let pairs = self.expand(name, value)?;
            if self.is_list_exempt(name) {
                fixed.extend(pairs);
            } else {
                branch_lists.push(pairs);
            }
        }

        let specs: Vec<SubquerySpec> = cartesian_product(&branch_lists)
            .into_iter()
            .map(|mut branch| {
                branch.extend(fixed.iter().cloned());
                SubquerySpec::new(branch)
            })
            .collect();

        tracing::debug!(
            filters = filters.len(),
            subqueries = specs.len(),
            "subqueries_built"
        );

        Ok(specs)
    }

    fn expand(&self, name: &str, value: &FilterValue) -> QueryResult<Vec<QueryParam>> {
        let rule = self
            .mapping
            .get(name)
            .ok_or_else(|| QueryError::UnmappedFilter {
                filter: name.to_string(),
            })?;

        Ok(value
            .alternatives()
            .into_iter()
            .map(|alt| QueryParam::new(rule.backend_field.as_str(), rule.format(alt)))
            .collect())
    }
}

/// Every combination picking one element from each list, in order.
///
/// No lists yields a single empty combination; any empty list yields none.
fn cartesian_product(lists: &[Vec<QueryParam>]) -> Vec<Vec<QueryParam>> {
    lists.iter().fold(vec![Vec::new()], |acc, list| {
        acc.iter()
            .flat_map(|prefix| {
                list.iter().map(move |item| {
                    let mut combo = prefix.clone();
                    combo.push(item.clone());
                    combo
                })
            })
            .collect()
    })
}
