use im::HashSet;

use crate::{
    error::{Inconsistency, Misuse, Result},
    solver::{engine::VariableId, interval::FiniteIntervalDomain, value::Value},
};

/// A map from each variable to its current domain.
///
/// The map is persistent: branching clones it cheaply and children diverge
/// copy-on-write as their domains are narrowed.
pub type DomainMap = im::HashMap<VariableId, Box<dyn Domain>>;

/// The set of candidate values for one variable.
///
/// Domains only ever shrink within a search node. Every mutating operation
/// records the change in a per-instance *changed* flag, which the
/// propagation loop reads to decide which constraints to re-evaluate, and
/// fails with [`Inconsistency`] when the domain would become empty.
///
/// This trait allows different underlying representations (a discrete value
/// set, a bounded interval) behind a consistent interface; constraints that
/// need a specific representation downcast through `as_any`.
pub trait Domain: std::fmt::Debug {
    fn as_any(&self) -> &dyn std::any::Any;

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;

    /// The number of candidate values left.
    fn size(&self) -> usize;

    /// A snapshot of the candidate values, in no particular order.
    fn values(&self) -> Vec<Value>;

    /// If exactly one candidate is left, returns it.
    fn singleton_value(&self) -> Option<Value>;

    /// `true` if values have been removed since the last `reset_changed`.
    fn has_changed(&self) -> bool;

    fn reset_changed(&mut self);

    /// Returns a boxed clone of the domain, changed flag included.
    fn clone_box(&self) -> Box<dyn Domain>;
}

impl Clone for Box<dyn Domain> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Looks up a variable's domain as a [`FiniteDomain`].
pub fn finite_domain<'a>(domains: &'a DomainMap, variable: &str) -> Result<&'a FiniteDomain> {
    domains
        .get(variable)
        .ok_or_else(|| Misuse::UnknownVariable(variable.to_owned()))?
        .as_any()
        .downcast_ref::<FiniteDomain>()
        .ok_or_else(|| {
            Misuse::DomainKindMismatch {
                variable: variable.to_owned(),
                expected: "finite",
            }
            .into()
        })
}

/// Looks up a variable's domain as a mutable [`FiniteDomain`].
pub fn finite_domain_mut<'a>(
    domains: &'a mut DomainMap,
    variable: &str,
) -> Result<&'a mut FiniteDomain> {
    domains
        .get_mut(variable)
        .ok_or_else(|| Misuse::UnknownVariable(variable.to_owned()))?
        .as_any_mut()
        .downcast_mut::<FiniteDomain>()
        .ok_or_else(|| {
            Misuse::DomainKindMismatch {
                variable: variable.to_owned(),
                expected: "finite",
            }
            .into()
        })
}

/// A discrete, finite set of candidate values.
#[derive(Debug, Clone)]
pub struct FiniteDomain {
    values: HashSet<Value>,
    changed: bool,
}

impl FiniteDomain {
    /// Creates a domain from the given values. Duplicates are coalesced.
    pub fn new(values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            values: values.into_iter().collect(),
            changed: false,
        }
    }

    /// Convenience constructor for integer domains.
    pub fn of_ints(values: impl IntoIterator<Item = i64>) -> Self {
        Self::new(values.into_iter().map(Value::Int))
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.values.contains(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.values.iter()
    }

    /// The candidate values in sorted order, for deterministic iteration.
    pub fn sorted_values(&self) -> Vec<Value> {
        let mut values: Vec<Value> = self.values.iter().cloned().collect();
        values.sort();
        values
    }

    /// Removes a single value.
    ///
    /// Fails with [`Misuse::ValueNotInDomain`] if the value is absent and
    /// with [`Inconsistency`] if the removal empties the domain. The changed
    /// flag is set in both the success and the inconsistency case.
    pub fn remove_value(&mut self, value: &Value) -> Result<()> {
        if self.values.remove(value).is_none() {
            return Err(Misuse::ValueNotInDomain(value.clone()).into());
        }
        self.changed = true;
        if self.values.is_empty() {
            return Err(Inconsistency::new(format!("removing {} emptied the domain", value)).into());
        }
        Ok(())
    }

    /// Removes every value in `values`. See [`FiniteDomain::remove_value`].
    pub fn remove_values<'a>(&mut self, values: impl IntoIterator<Item = &'a Value>) -> Result<()> {
        for value in values {
            self.remove_value(value)?;
        }
        Ok(())
    }

    /// Keeps only the values satisfying `keep`, failing with
    /// [`Inconsistency`] if nothing survives.
    pub fn retain(&mut self, keep: impl Fn(&Value) -> bool) -> Result<()> {
        let before = self.values.len();
        let kept: HashSet<Value> = self.values.iter().filter(|v| keep(v)).cloned().collect();
        if kept.len() < before {
            self.changed = true;
        }
        self.values = kept;
        if self.values.is_empty() {
            return Err(Inconsistency::new("filtering emptied the domain").into());
        }
        Ok(())
    }
}

impl Domain for FiniteDomain {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }

    fn size(&self) -> usize {
        self.values.len()
    }

    fn values(&self) -> Vec<Value> {
        self.values.iter().cloned().collect()
    }

    fn singleton_value(&self) -> Option<Value> {
        if self.values.len() == 1 {
            self.values.iter().next().cloned()
        } else {
            None
        }
    }

    fn has_changed(&self) -> bool {
        self.changed
    }

    fn reset_changed(&mut self) {
        self.changed = false;
    }

    fn clone_box(&self) -> Box<dyn Domain> {
        Box::new(self.clone())
    }
}
