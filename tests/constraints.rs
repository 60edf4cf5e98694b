mod common;

use angusto::{
    finite_domain, AllDistinct, BasicConstraint, Constraint, Domain, Predicate, ValueCondition,
    Value,
};
use common::int_domains;

fn sorted_ints(domains: &angusto::DomainMap, variable: &str) -> Vec<i64> {
    finite_domain(domains, variable)
        .unwrap()
        .sorted_values()
        .iter()
        .map(|v| v.as_int().unwrap())
        .collect()
}

mod basics {
    use super::*;

    #[test]
    fn relevance_is_limited_to_the_affected_variable() {
        let constraint = BasicConstraint::equals("x", 1);
        assert!(constraint.is_variable_relevant("x"));
        assert!(!constraint.is_variable_relevant("tagada"));
        assert_eq!(constraint.variable(), "x");
        assert!(constraint.is_basic());
    }

    #[test]
    fn equals_narrows_to_the_reference() {
        let mut domains = int_domains(&[("x", &[0, 1, 2])]);
        assert!(BasicConstraint::equals("x", 1).narrow(&mut domains).unwrap());
        assert_eq!(sorted_ints(&domains, "x"), vec![1]);
    }

    #[test]
    fn not_equals_removes_the_reference() {
        let mut domains = int_domains(&[("x", &[0, 1, 2])]);
        assert!(BasicConstraint::not_equals("x", 1).narrow(&mut domains).unwrap());
        assert_eq!(sorted_ints(&domains, "x"), vec![0, 2]);
    }

    #[test]
    fn comparisons_keep_the_matching_side() {
        let cases: [(BasicConstraint, &[i64]); 4] = [
            (BasicConstraint::less_than("x", 1), &[0]),
            (BasicConstraint::less_or_equal("x", 1), &[0, 1]),
            (BasicConstraint::greater_than("x", 1), &[2]),
            (BasicConstraint::greater_or_equal("x", 1), &[1, 2]),
        ];
        for (constraint, expected) in cases {
            let mut domains = int_domains(&[("x", &[0, 1, 2])]);
            assert!(constraint.narrow(&mut domains).unwrap());
            assert_eq!(sorted_ints(&domains, "x"), expected.to_vec());
        }
    }

    #[test]
    fn an_unsatisfiable_comparison_is_an_inconsistency() {
        let mut domains = int_domains(&[("x", &[0, 1, 2])]);
        let err = BasicConstraint::greater_than("x", 5)
            .narrow(&mut domains)
            .unwrap_err();
        assert!(err.is_inconsistency());
    }

    #[test]
    fn value_condition_filters_with_a_closure() {
        let mut domains = int_domains(&[("x", &[0, 1, 2, 3, 4])]);
        let evens = ValueCondition::new("x", "even", |v| {
            v.as_int().map_or(false, |i| i % 2 == 0)
        });
        assert!(evens.is_basic());
        assert!(evens.narrow(&mut domains).unwrap());
        assert_eq!(sorted_ints(&domains, "x"), vec![0, 2, 4]);
    }

    #[test]
    fn value_condition_over_tuples_keeps_distinct_digits() {
        let mut domains = angusto::DomainMap::new();
        domains.insert(
            "x".to_string(),
            Box::new(angusto::FiniteDomain::new([
                Value::Tuple(vec![Value::Int(1), Value::Int(1)]),
                Value::Tuple(vec![Value::Int(1), Value::Int(2)]),
            ])) as Box<dyn angusto::Domain>,
        );
        let distinct_digits = ValueCondition::new("x", "distinct_digits", |v| match v {
            Value::Tuple(items) => {
                let mut seen = std::collections::HashSet::new();
                items.iter().all(|item| seen.insert(item))
            }
            _ => false,
        });
        assert!(distinct_digits.narrow(&mut domains).unwrap());
        assert_eq!(
            finite_domain(&domains, "x").unwrap().sorted_values(),
            vec![Value::Tuple(vec![Value::Int(1), Value::Int(2)])]
        );
    }
}

mod all_distinct {
    use super::*;

    #[test]
    fn relevance_covers_every_listed_variable() {
        let constraint = AllDistinct::new(["x", "y", "z"]);
        for v in ["x", "y", "z"] {
            assert!(constraint.is_variable_relevant(v));
        }
        assert!(!constraint.is_variable_relevant("tagada"));
        assert!(!constraint.is_basic());
    }

    #[test]
    fn no_singleton_means_no_pruning() {
        let mut domains = int_domains(&[("x", &[1, 2]), ("y", &[1, 3]), ("z", &[1, 4])]);
        let entailed = AllDistinct::new(["x", "y", "z"]).narrow(&mut domains).unwrap();
        assert!(!entailed);
        assert_eq!(sorted_ints(&domains, "x"), vec![1, 2]);
        assert_eq!(sorted_ints(&domains, "y"), vec![1, 3]);
        assert_eq!(sorted_ints(&domains, "z"), vec![1, 4]);
    }

    #[test]
    fn singleton_values_are_broadcast_until_fixed_point() {
        let mut domains = int_domains(&[("x", &[1, 2]), ("y", &[1]), ("z", &[1, 4])]);
        let entailed = AllDistinct::new(["x", "y", "z"]).narrow(&mut domains).unwrap();
        assert!(entailed);
        assert_eq!(sorted_ints(&domains, "x"), vec![2]);
        assert_eq!(sorted_ints(&domains, "y"), vec![1]);
        assert_eq!(sorted_ints(&domains, "z"), vec![4]);
    }

    #[test]
    fn entailed_once_domains_are_pairwise_disjoint() {
        let mut domains = int_domains(&[("x", &[1]), ("y", &[2]), ("z", &[1, 2, 3, 4])]);
        let entailed = AllDistinct::new(["x", "y", "z"]).narrow(&mut domains).unwrap();
        assert!(entailed);
        assert_eq!(sorted_ints(&domains, "z"), vec![3, 4]);
    }

    #[test]
    fn cascading_forcing_assigns_every_variable() {
        let mut domains = int_domains(&[
            ("x", &[1]),
            ("y", &[2]),
            ("z", &[1, 3, 4]),
            ("t", &[2, 5, 4]),
            ("u", &[1, 2, 4]),
        ]);
        let entailed = AllDistinct::new(["x", "y", "z", "t", "u"])
            .narrow(&mut domains)
            .unwrap();
        assert!(entailed);
        assert_eq!(sorted_ints(&domains, "x"), vec![1]);
        assert_eq!(sorted_ints(&domains, "y"), vec![2]);
        assert_eq!(sorted_ints(&domains, "z"), vec![3]);
        assert_eq!(sorted_ints(&domains, "t"), vec![5]);
        assert_eq!(sorted_ints(&domains, "u"), vec![4]);
    }

    #[test]
    fn idempotent_once_narrowed() {
        let mut domains = int_domains(&[("x", &[1]), ("y", &[2]), ("z", &[1, 3, 4])]);
        let constraint = AllDistinct::new(["x", "y", "z"]);
        constraint.narrow(&mut domains).unwrap();
        let after_first: Vec<Vec<i64>> = ["x", "y", "z"]
            .iter()
            .map(|v| sorted_ints(&domains, v))
            .collect();
        for variable in ["x", "y", "z"] {
            finite_domain_reset(&mut domains, variable);
        }
        constraint.narrow(&mut domains).unwrap();
        let after_second: Vec<Vec<i64>> = ["x", "y", "z"]
            .iter()
            .map(|v| sorted_ints(&domains, v))
            .collect();
        assert_eq!(after_first, after_second);
        for variable in ["x", "y", "z"] {
            assert!(!domains.get(variable).unwrap().has_changed());
        }
    }

    fn finite_domain_reset(domains: &mut angusto::DomainMap, variable: &str) {
        domains.get_mut(variable).unwrap().reset_changed();
    }

    #[test]
    fn pigeonhole_failure_with_too_few_values() {
        let mut domains = int_domains(&[("x", &[1, 2]), ("y", &[2, 1]), ("z", &[1, 2])]);
        let err = AllDistinct::new(["x", "y", "z"]).narrow(&mut domains).unwrap_err();
        assert!(err.is_inconsistency());
    }

    #[test]
    fn forcing_into_an_empty_domain_fails() {
        let mut domains = int_domains(&[("x", &[1]), ("y", &[2]), ("z", &[1, 2])]);
        let err = AllDistinct::new(["x", "y", "z"]).narrow(&mut domains).unwrap_err();
        assert!(err.is_inconsistency());
    }

    #[test]
    fn conflicting_singletons_fail() {
        let mut domains = int_domains(&[("x", &[1]), ("y", &[1]), ("z", &[2, 3])]);
        let err = AllDistinct::new(["x", "y", "z"]).narrow(&mut domains).unwrap_err();
        assert!(err.is_inconsistency());
    }
}

mod predicates {
    use super::*;

    fn int(values: &[Value], index: usize) -> i64 {
        values[index].as_int().unwrap()
    }

    #[test]
    fn unary_predicate_narrows_like_a_filter() {
        let mut domains = int_domains(&[("x", &[0, 1, 2, 3])]);
        let constraint = Predicate::new(["x"], "x == 2", |vs| int(vs, 0) == 2);
        assert!(!constraint.is_basic());
        constraint.narrow(&mut domains).unwrap();
        assert_eq!(sorted_ints(&domains, "x"), vec![2]);
    }

    #[test]
    fn binary_predicate_keeps_supported_values_only() {
        let mut domains = int_domains(&[("x", &[0, 1, 2, 3]), ("y", &[0, 1])]);
        let constraint = Predicate::new(["x", "y"], "x + y == 2", |vs| int(vs, 0) + int(vs, 1) == 2);
        let entailed = constraint.narrow(&mut domains).unwrap();
        assert!(!entailed);
        assert_eq!(sorted_ints(&domains, "x"), vec![1, 2]);
        assert_eq!(sorted_ints(&domains, "y"), vec![0, 1]);
    }

    #[test]
    fn ternary_predicate_narrows_each_variable_independently() {
        let mut domains = int_domains(&[
            ("x", &[0, 1, 2, 3]),
            ("y", &[0, 1, 2]),
            ("z", &[0, 1, 2, 3]),
        ]);
        let constraint = Predicate::new(["x", "y", "z"], "x + y == 2 and z > 1", |vs| {
            int(vs, 0) + int(vs, 1) == 2 && int(vs, 2) > 1
        });
        constraint.narrow(&mut domains).unwrap();
        assert_eq!(sorted_ints(&domains, "x"), vec![0, 1, 2]);
        assert_eq!(sorted_ints(&domains, "y"), vec![0, 1, 2]);
        assert_eq!(sorted_ints(&domains, "z"), vec![2, 3]);
    }

    #[test]
    fn entailed_when_every_tuple_satisfies() {
        let mut domains = int_domains(&[("x", &[2]), ("y", &[0])]);
        let constraint = Predicate::new(["x", "y"], "x + y == 2", |vs| int(vs, 0) + int(vs, 1) == 2);
        assert!(constraint.narrow(&mut domains).unwrap());
    }

    #[test]
    fn unsatisfiable_predicate_is_an_inconsistency() {
        let mut domains = int_domains(&[("x", &[0, 1]), ("y", &[0, 1])]);
        let constraint = Predicate::new(["x", "y"], "x + y == 9", |vs| int(vs, 0) + int(vs, 1) == 9);
        assert!(constraint.narrow(&mut domains).unwrap_err().is_inconsistency());
    }
}
