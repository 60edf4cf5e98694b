use std::sync::Arc;

use crate::{
    error::Result,
    solver::{
        domain::{Domain, DomainMap},
        engine::VariableId,
    },
};

/// Constraints are stateless and shared by reference across every
/// repository of a search tree; pointer identity distinguishes them in
/// listener lists.
pub type ConstraintRef = Arc<dyn Constraint>;

/// Name and human-readable description of a constraint, for logs and
/// diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintDescriptor {
    pub name: String,
    pub description: String,
}

/// A relation over a subset of the problem's variables.
///
/// A constraint holds no mutable state: everything it learns is written
/// into the domain map it is given. `narrow` enforces the constraint's
/// local-consistency projection by removing candidate values (or tightening
/// interval bounds) and reports *entailment*: `true` means the constraint
/// can no longer fail whatever further removals happen to its variables'
/// domains, so the repository may drop it.
pub trait Constraint: std::fmt::Debug {
    /// The variables this constraint mentions.
    fn affected_variables(&self) -> &[VariableId];

    fn is_variable_relevant(&self, variable: &str) -> bool {
        self.affected_variables().iter().any(|v| v == variable)
    }

    /// An estimate of the narrowing cost, used to order the propagation
    /// queue (cheapest first). Defaults to the product of the affected
    /// domains' sizes.
    fn estimate_cost(&self, domains: &DomainMap) -> u64 {
        self.affected_variables()
            .iter()
            .map(|v| domains.get(v).map_or(0, |d| d.size() as u64))
            .fold(1u64, u64::saturating_mul)
    }

    /// Prunes the domains and returns the entailment flag. Fails with
    /// [`Inconsistency`](crate::error::Inconsistency) if enforcement would
    /// empty a domain.
    fn narrow(&self, domains: &mut DomainMap) -> Result<bool>;

    /// Basic constraints affect a single variable, are applied once at
    /// registration, and are never queued.
    fn is_basic(&self) -> bool {
        false
    }

    fn descriptor(&self) -> ConstraintDescriptor;
}
