//! Filter Set
//!
//! The typed, already-validated search filters handed to the engine. A
//! [`FilterSet`] keeps its filters in insertion order; decomposition order
//! (and therefore request order) follows it.
//!
//! ## JSON shape
//!
//! ```json
//! {
//!   "platform": ["S1A", "S1B"],
//!   "beammode": "IW",
//!   "relativeorbit": [12, {"min": 40, "max": 44}]
//! }
//! ```

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One filter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Int(i64),
    Float(f64),
    Text(String),
    /// Inclusive numeric or date range, sent to the catalog as `min,max`
    Range {
        min: Box<FilterValue>,
        max: Box<FilterValue>,
    },
    /// Multi-valued filter; each element is one alternative
    List(Vec<FilterValue>),
}

impl FilterValue {
    pub fn text(value: impl Into<String>) -> Self {
        FilterValue::Text(value.into())
    }

    pub fn range(min: impl Into<FilterValue>, max: impl Into<FilterValue>) -> Self {
        FilterValue::Range {
            min: Box::new(min.into()),
            max: Box::new(max.into()),
        }
    }

    pub fn list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FilterValue>,
    {
        FilterValue::List(values.into_iter().map(Into::into).collect())
    }

    /// The alternatives this value stands for.
    ///
    /// A list contributes one alternative per element (possibly none); any
    /// other value is a single alternative.
    pub fn alternatives(&self) -> Vec<&FilterValue> {
        match self {
            FilterValue::List(values) => values.iter().collect(),
            other => vec![other],
        }
    }

    /// Render the value the way the catalog expects it inside a template.
    pub fn render(&self) -> String {
        match self {
            FilterValue::Int(i) => i.to_string(),
            // Debug keeps the trailing `.0` on whole floats
            FilterValue::Float(f) => format!("{f:?}"),
            FilterValue::Text(s) => s.clone(),
            FilterValue::Range { min, max } => format!("{},{}", min.render(), max.render()),
            FilterValue::List(values) => values
                .iter()
                .map(FilterValue::render)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Int(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Int(i64::from(value))
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        FilterValue::Float(value)
    }
}

/// Ordered mapping from filter name to value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    entries: Vec<(String, FilterValue)>,
}

impl FilterSet {
    pub fn new() -> Self {
        FilterSet::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert a filter. Re-inserting a name replaces the value in place and
    /// keeps the original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FilterValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FilterValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N, V> FromIterator<(N, V)> for FilterSet
where
    N: Into<String>,
    V: Into<FilterValue>,
{
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut set = FilterSet::new();
        for (name, value) in iter {
            set.insert(name, value);
        }
        set
    }
}

impl Serialize for FilterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// Deserialize through MapAccess so document order survives regardless of the
// map type the format would otherwise build.
impl<'de> Deserialize<'de> for FilterSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FilterSetVisitor;

        impl<'de> Visitor<'de> for FilterSetVisitor {
            type Value = FilterSet;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of filter names to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FilterSet, A::Error> {
                let mut set = FilterSet::new();
                while let Some((name, value)) = access.next_entry::<String, FilterValue>()? {
                    set.insert(name, value);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(FilterSetVisitor)
    }
}
