#![allow(dead_code)]

use angusto::{Domain, DomainMap, FiniteDomain};

/// Builds a domain map of integer finite domains.
pub fn int_domains(entries: &[(&str, &[i64])]) -> DomainMap {
    let mut domains = DomainMap::new();
    for (name, values) in entries {
        domains.insert(
            (*name).to_string(),
            Box::new(FiniteDomain::of_ints(values.iter().copied())) as Box<dyn Domain>,
        );
    }
    domains
}

/// Variable names in declaration order.
pub fn names(entries: &[(&str, &[i64])]) -> Vec<String> {
    entries.iter().map(|(name, _)| (*name).to_string()).collect()
}
