use std::sync::Arc;

use crate::{
    error::{Inconsistency, Result},
    solver::{
        constraint::{Constraint, ConstraintDescriptor},
        domain::{finite_domain_mut, DomainMap},
        engine::VariableId,
        value::Value,
    },
};

/// The comparison operators available to [`BasicConstraint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Equal,
    NotEqual,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
}

impl Comparison {
    fn holds(self, candidate: &Value, reference: &Value) -> bool {
        match self {
            Comparison::Equal => candidate == reference,
            Comparison::NotEqual => candidate != reference,
            Comparison::LessThan => candidate < reference,
            Comparison::LessOrEqual => candidate <= reference,
            Comparison::GreaterThan => candidate > reference,
            Comparison::GreaterOrEqual => candidate >= reference,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Comparison::Equal => "==",
            Comparison::NotEqual => "!=",
            Comparison::LessThan => "<",
            Comparison::LessOrEqual => "<=",
            Comparison::GreaterThan => ">",
            Comparison::GreaterOrEqual => ">=",
        }
    }
}

/// A single-variable comparison against a constant.
///
/// Basic constraints prune their variable's domain once at registration and
/// are immediately entailed; they are never queued by the repository.
#[derive(Debug, Clone)]
pub struct BasicConstraint {
    variables: [VariableId; 1],
    comparison: Comparison,
    reference: Value,
}

impl BasicConstraint {
    pub fn new(
        variable: impl Into<VariableId>,
        comparison: Comparison,
        reference: impl Into<Value>,
    ) -> Self {
        Self {
            variables: [variable.into()],
            comparison,
            reference: reference.into(),
        }
    }

    pub fn equals(variable: impl Into<VariableId>, reference: impl Into<Value>) -> Self {
        Self::new(variable, Comparison::Equal, reference)
    }

    pub fn not_equals(variable: impl Into<VariableId>, reference: impl Into<Value>) -> Self {
        Self::new(variable, Comparison::NotEqual, reference)
    }

    pub fn less_than(variable: impl Into<VariableId>, reference: impl Into<Value>) -> Self {
        Self::new(variable, Comparison::LessThan, reference)
    }

    pub fn less_or_equal(variable: impl Into<VariableId>, reference: impl Into<Value>) -> Self {
        Self::new(variable, Comparison::LessOrEqual, reference)
    }

    pub fn greater_than(variable: impl Into<VariableId>, reference: impl Into<Value>) -> Self {
        Self::new(variable, Comparison::GreaterThan, reference)
    }

    pub fn greater_or_equal(variable: impl Into<VariableId>, reference: impl Into<Value>) -> Self {
        Self::new(variable, Comparison::GreaterOrEqual, reference)
    }

    pub fn variable(&self) -> &str {
        &self.variables[0]
    }
}

impl Constraint for BasicConstraint {
    fn affected_variables(&self) -> &[VariableId] {
        &self.variables
    }

    fn estimate_cost(&self, _domains: &DomainMap) -> u64 {
        0
    }

    fn narrow(&self, domains: &mut DomainMap) -> Result<bool> {
        let domain = finite_domain_mut(domains, self.variable())?;
        domain
            .retain(|candidate| self.comparison.holds(candidate, &self.reference))
            .map_err(|err| match err {
                crate::error::Error::Inconsistency(_) => Inconsistency::new(format!(
                    "no value of `{}` satisfies {}",
                    self.variable(),
                    self.descriptor().description
                ))
                .into(),
                other => other,
            })?;
        Ok(true)
    }

    fn is_basic(&self) -> bool {
        true
    }

    fn descriptor(&self) -> ConstraintDescriptor {
        ConstraintDescriptor {
            name: "BasicConstraint".to_string(),
            description: format!(
                "{} {} {}",
                self.variable(),
                self.comparison.symbol(),
                self.reference
            ),
        }
    }
}

/// A single-variable filter keeping only the values accepted by a closure,
/// e.g. "every digit of this tuple is distinct".
#[derive(Clone)]
pub struct ValueCondition {
    variables: [VariableId; 1],
    label: String,
    accept: Arc<dyn Fn(&Value) -> bool>,
}

impl ValueCondition {
    pub fn new(
        variable: impl Into<VariableId>,
        label: impl Into<String>,
        accept: impl Fn(&Value) -> bool + 'static,
    ) -> Self {
        Self {
            variables: [variable.into()],
            label: label.into(),
            accept: Arc::new(accept),
        }
    }

    pub fn variable(&self) -> &str {
        &self.variables[0]
    }
}

impl std::fmt::Debug for ValueCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueCondition")
            .field("variable", &self.variables[0])
            .field("label", &self.label)
            .finish()
    }
}

impl Constraint for ValueCondition {
    fn affected_variables(&self) -> &[VariableId] {
        &self.variables
    }

    fn estimate_cost(&self, _domains: &DomainMap) -> u64 {
        0
    }

    fn narrow(&self, domains: &mut DomainMap) -> Result<bool> {
        let domain = finite_domain_mut(domains, self.variable())?;
        domain.retain(|candidate| (self.accept)(candidate))?;
        Ok(true)
    }

    fn is_basic(&self) -> bool {
        true
    }

    fn descriptor(&self) -> ConstraintDescriptor {
        ConstraintDescriptor {
            name: "ValueCondition".to_string(),
            description: format!("{}({})", self.label, self.variable()),
        }
    }
}
