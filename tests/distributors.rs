mod common;

use std::collections::HashMap;

use angusto::{
    finite_domain, DichotomyDistributor, Distributor, Domain, DomainMap, EnumeratorDistributor,
    NaiveDistributor, RandomizingDistributor, SplitDistributor, Value,
};
use common::int_domains;
use proptest::prelude::*;

fn small() -> DomainMap {
    int_domains(&[("v1", &[1]), ("v2", &[2, 3]), ("v3", &[4, 5, 6, 7])])
}

fn large() -> DomainMap {
    int_domains(&[
        ("v1", &[1]),
        ("v2", &[2, 3, 4, 5, 6]),
        ("v3", &[7, 8, 9, 10, 11, 12, 13]),
    ])
}

fn sorted_ints(domains: &DomainMap, variable: &str) -> Vec<i64> {
    finite_domain(domains, variable)
        .unwrap()
        .sorted_values()
        .iter()
        .map(|v| v.as_int().unwrap())
        .collect()
}

/// Every strategy must leave the unsplit variables untouched and cover the
/// split variable's values exactly once across the children.
fn assert_partition(parent: &DomainMap, children: &[DomainMap], split: &str) {
    for child in children {
        for variable in ["v1", "v2", "v3"] {
            if variable != split {
                assert_eq!(sorted_ints(child, variable), sorted_ints(parent, variable));
            }
        }
    }
    let mut counts: HashMap<Value, usize> = HashMap::new();
    for child in children {
        for value in finite_domain(child, split).unwrap().values() {
            *counts.entry(value).or_default() += 1;
        }
    }
    for value in finite_domain(parent, split).unwrap().values() {
        assert_eq!(counts.remove(&value), Some(1), "value covered exactly once");
    }
    assert!(counts.is_empty(), "no values invented");
}

#[test]
fn first_fail_selection_ignores_singletons() {
    let distributor = NaiveDistributor;
    assert_eq!(distributor.find_smallest_domain(&small()).unwrap(), "v2");
    assert_eq!(distributor.find_smallest_domain(&large()).unwrap(), "v2");
    assert_eq!(distributor.find_largest_domain(&small()).unwrap(), "v3");
    assert_eq!(distributor.find_largest_domain(&large()).unwrap(), "v3");
}

#[test]
fn ties_break_by_variable_identifier() {
    let domains = int_domains(&[("b", &[1, 2]), ("a", &[1, 2]), ("c", &[1, 2, 3])]);
    assert_eq!(NaiveDistributor.find_smallest_domain(&domains).unwrap(), "a");
}

#[test]
fn naive_splits_into_singleton_and_rest() {
    for parent in [small(), large()] {
        let children = NaiveDistributor.distribute(&parent).unwrap();
        assert_eq!(children.len(), 2);
        assert_partition(&parent, &children, "v2");
        assert_eq!(finite_domain(&children[0], "v2").unwrap().size(), 1);
        assert_eq!(
            finite_domain(&children[1], "v2").unwrap().size(),
            finite_domain(&parent, "v2").unwrap().size() - 1
        );
    }
}

#[test]
fn randomizing_keeps_the_naive_shape() {
    for parent in [small(), large()] {
        let distributor = RandomizingDistributor::with_seed(42);
        let children = distributor.distribute(&parent).unwrap();
        assert_eq!(children.len(), 2);
        assert_partition(&parent, &children, "v2");
        assert_eq!(finite_domain(&children[0], "v2").unwrap().size(), 1);
    }
}

#[test]
fn randomizing_is_reproducible_with_a_seed() {
    let parent = large();
    let first = RandomizingDistributor::with_seed(7).distribute(&parent).unwrap();
    let second = RandomizingDistributor::with_seed(7).distribute(&parent).unwrap();
    assert_eq!(sorted_ints(&first[0], "v2"), sorted_ints(&second[0], "v2"));
}

#[test]
fn dichotomy_splits_into_even_halves() {
    for parent in [small(), large()] {
        let children = DichotomyDistributor.distribute(&parent).unwrap();
        assert_eq!(children.len(), 2);
        assert_partition(&parent, &children, "v2");
        let left = finite_domain(&children[0], "v2").unwrap().size();
        let right = finite_domain(&children[1], "v2").unwrap().size();
        assert!(left.abs_diff(right) <= 1);
    }
}

#[test]
fn split_distributor_caps_the_chunk_count() {
    for parent in [small(), large()] {
        let children = SplitDistributor::new(4).distribute(&parent).unwrap();
        let parent_size = finite_domain(&parent, "v2").unwrap().size();
        assert_eq!(children.len(), 4.min(parent_size));
        assert_partition(&parent, &children, "v2");
    }
}

#[test]
fn enumerator_yields_one_child_per_value() {
    for parent in [small(), large()] {
        let children = EnumeratorDistributor.distribute(&parent).unwrap();
        assert_eq!(
            children.len(),
            finite_domain(&parent, "v2").unwrap().size()
        );
        assert_partition(&parent, &children, "v2");
        for child in &children {
            assert_eq!(finite_domain(child, "v2").unwrap().size(), 1);
        }
    }
}

#[test]
fn nothing_to_distribute_is_a_misuse() {
    let domains = int_domains(&[("v1", &[1]), ("v2", &[2]), ("v3", &[3])]);
    let err = NaiveDistributor.distribute(&domains).unwrap_err();
    assert!(!err.is_inconsistency());
}

proptest! {
    // coverage invariant over arbitrary domains and chunk counts
    #[test]
    fn every_strategy_partitions_the_split_variable(
        v2 in proptest::collection::btree_set(0i64..40, 2..12),
        v3 in proptest::collection::btree_set(0i64..40, 2..14),
        parts in 2usize..6,
    ) {
        let v2: Vec<i64> = v2.into_iter().collect();
        let v3: Vec<i64> = v3.into_iter().collect();
        prop_assume!(v2.len() <= v3.len());
        let parent = int_domains(&[("v1", &[1]), ("v2", &v2), ("v3", &v3)]);
        let strategies: Vec<Box<dyn Distributor>> = vec![
            Box::new(NaiveDistributor),
            Box::new(DichotomyDistributor),
            Box::new(SplitDistributor::new(parts)),
            Box::new(EnumeratorDistributor),
            Box::new(RandomizingDistributor::with_seed(11)),
        ];
        for strategy in strategies {
            let children = strategy.distribute(&parent).unwrap();
            assert_partition(&parent, &children, "v2");
            for child in children {
                prop_assert!(
                    finite_domain(&child, "v2").unwrap().size()
                        < finite_domain(&parent, "v2").unwrap().size()
                );
            }
        }
    }
}
