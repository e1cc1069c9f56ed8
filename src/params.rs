//! Catalog Request Parameters
//!
//! [`QueryParam`] is one `(backend field, formatted value)` pair. Catalog
//! requests are ordered lists of these; repeated fields such as `sort_key[]`
//! or `attribute[]` are significant in order.
//!
//! [`ExtraParams`] are the control parameters attached identically to every
//! subquery: provider pin, page size, scrolling, and the fixed two-key sort
//! that makes end-date ties reproducible.

use serde::{Deserialize, Serialize};

/// One backend query parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryParam {
    pub field: String,
    pub value: String,
}

impl QueryParam {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        QueryParam {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn as_pair(&self) -> (&str, &str) {
        (&self.field, &self.value)
    }
}

/// Primary sort: newest end date first
pub const PRIMARY_SORT_KEY: &str = "-end_date";
/// Secondary sort: ascending record identifier
pub const SECONDARY_SORT_KEY: &str = "granule_ur";

/// Control parameters shared by every subquery of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraParams {
    pub provider: String,
    pub page_size: usize,
}

impl ExtraParams {
    pub fn new(provider: impl Into<String>, page_size: usize) -> Self {
        ExtraParams {
            provider: provider.into(),
            page_size,
        }
    }

    /// Parameters for a page request
    pub fn to_params(&self) -> Vec<QueryParam> {
        self.build(self.page_size, true)
    }

    /// Parameters for a count-only request: no records, no scroll context
    pub fn count_params(&self) -> Vec<QueryParam> {
        self.build(0, false)
    }

    fn build(&self, page_size: usize, scroll: bool) -> Vec<QueryParam> {
        let mut params = vec![
            QueryParam::new("provider", self.provider.as_str()),
            QueryParam::new("page_size", page_size.to_string()),
        ];
        if scroll {
            params.push(QueryParam::new("scroll", "true"));
        }
        params.extend([
            QueryParam::new("options[temporal][and]", "true"),
            QueryParam::new("sort_key[]", PRIMARY_SORT_KEY),
            QueryParam::new("sort_key[]", SECONDARY_SORT_KEY),
            QueryParam::new("options[platform][ignore_case]", "true"),
        ]);
        params
    }
}
