//! Property-based decomposition tests (proptest).

use proptest::prelude::*;
use std::collections::HashSet;

use granule_search::{Decomposer, FieldMapping, FilterSet, FilterValue};

const FILTERS: &[&str] = &["platform", "beamMode", "polarization", "granule_list"];

fn mapping() -> FieldMapping {
    FILTERS
        .iter()
        .fold(FieldMapping::new(), |m, name| m.with(*name, *name, "{}"))
}

/// Build a filter set from per-filter cardinalities; 0 means "absent",
/// and a cardinality of 1 is sent as a scalar.
fn filter_set(cardinalities: &[usize]) -> FilterSet {
    FILTERS
        .iter()
        .zip(cardinalities)
        .filter(|(_, n)| **n > 0)
        .map(|(name, n)| {
            let value = if *n == 1 {
                FilterValue::text(format!("{name}-0"))
            } else {
                FilterValue::list((0..*n).map(|i| format!("{name}-{i}")))
            };
            ((*name).to_string(), value)
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Subquery count is the product of combinable cardinalities
    #[test]
    fn prop_spec_count_is_product(cards in prop::collection::vec(0usize..4, 4)) {
        let mapping = mapping();
        let decomposer = Decomposer::with_list_exempt(&mapping, ["granule_list"]);
        let specs = decomposer.decompose(&filter_set(&cards)).expect("all filters mapped");

        let expected: usize = cards[..3].iter().filter(|n| **n > 0).product();
        prop_assert_eq!(specs.len(), expected);
    }

    /// Every subquery is distinct and carries the same list-exempt tail
    #[test]
    fn prop_specs_distinct_with_shared_tail(cards in prop::collection::vec(1usize..4, 4)) {
        let mapping = mapping();
        let decomposer = Decomposer::with_list_exempt(&mapping, ["granule_list"]);
        let specs = decomposer.decompose(&filter_set(&cards)).expect("all filters mapped");

        let unique: HashSet<_> = specs.iter().map(|s| s.params().to_vec()).collect();
        prop_assert_eq!(unique.len(), specs.len());

        let tail_len = cards[3];
        let tail = specs[0].params()[specs[0].len() - tail_len..].to_vec();
        for spec in &specs {
            prop_assert_eq!(spec.len(), 3 + tail_len);
            prop_assert_eq!(&spec.params()[3..], tail.as_slice());
        }
    }

    /// Same input, same output, same order
    #[test]
    fn prop_decompose_is_deterministic(cards in prop::collection::vec(0usize..4, 4)) {
        let mapping = mapping();
        let decomposer = Decomposer::new(&mapping);
        let filters = filter_set(&cards);
        prop_assert_eq!(
            decomposer.decompose(&filters).expect("mapped"),
            decomposer.decompose(&filters).expect("mapped")
        );
    }
}
