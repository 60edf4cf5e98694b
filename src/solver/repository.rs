use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::{
    error::{Misuse, Result},
    solver::{
        constraint::{Constraint, ConstraintRef},
        distributor::Distributor,
        domain::{Domain, DomainMap},
        engine::VariableId,
        work_list::PropagationQueue,
    },
};

/// Owns one search node's variables, domains and constraints, and drives
/// constraint narrowing to a fixed point.
///
/// Basic constraints are applied once at registration and never stored; arc
/// constraints are kept in the constraint list and indexed per variable so
/// that a domain change re-schedules exactly its listeners.
#[derive(Debug)]
pub struct Repository {
    variables: Vec<VariableId>,
    domains: DomainMap,
    constraints: Vec<ConstraintRef>,
    listeners: HashMap<VariableId, Vec<ConstraintRef>>,
}

impl Repository {
    /// Creates a repository over `variables`, each of which must key
    /// `domains`.
    pub fn new(variables: Vec<VariableId>, domains: DomainMap) -> Result<Self> {
        let mut listeners = HashMap::with_capacity(variables.len());
        for variable in &variables {
            if !domains.contains_key(variable) {
                return Err(Misuse::UnknownVariable(variable.clone()).into());
            }
            listeners.insert(variable.clone(), Vec::new());
        }
        Ok(Self {
            variables,
            domains,
            constraints: Vec::new(),
            listeners,
        })
    }

    /// Creates a repository and registers `constraints` in order.
    pub fn with_constraints(
        variables: Vec<VariableId>,
        domains: DomainMap,
        constraints: impl IntoIterator<Item = ConstraintRef>,
    ) -> Result<Self> {
        let mut repository = Self::new(variables, domains)?;
        for constraint in constraints {
            repository.add_constraint(constraint)?;
        }
        Ok(repository)
    }

    /// Registers a constraint.
    ///
    /// A basic constraint narrows its variable's domain immediately and is
    /// not kept. An arc constraint is appended to the constraint list and to
    /// the listener list of every variable it mentions.
    pub fn add_constraint(&mut self, constraint: ConstraintRef) -> Result<()> {
        for variable in constraint.affected_variables() {
            if !self.domains.contains_key(variable) {
                return Err(Misuse::UnknownVariable(variable.clone()).into());
            }
        }
        if constraint.is_basic() {
            constraint.narrow(&mut self.domains)?;
            return Ok(());
        }
        for variable in constraint.affected_variables() {
            self.listeners
                .get_mut(variable)
                .expect("listener lists cover every variable")
                .push(constraint.clone());
        }
        self.constraints.push(constraint);
        Ok(())
    }

    pub fn variables(&self) -> &[VariableId] {
        &self.variables
    }

    pub fn domains(&self) -> &DomainMap {
        &self.domains
    }

    /// The arc constraints still subscribed (entailed ones are removed
    /// during propagation).
    pub fn constraints(&self) -> &[ConstraintRef] {
        &self.constraints
    }

    /// Runs the propagation loop to a fixed point.
    ///
    /// Constraints are evaluated in ascending order of their cost estimate;
    /// whenever a narrow step changes a domain, the other listeners of that
    /// variable are marked dirty and re-run in a later batch. Entailed
    /// constraints are dropped. Returns `true` iff every domain ends up with
    /// exactly one value.
    pub fn propagate(&mut self) -> Result<bool> {
        let mut queue = PropagationQueue::seed(&self.constraints, &self.domains);
        while let Some(constraint) = queue.pop(&self.domains) {
            let entailed = constraint.narrow(&mut self.domains)?;
            for variable in constraint.affected_variables() {
                let changed = self
                    .domains
                    .get(variable)
                    .is_some_and(|domain| domain.has_changed());
                if !changed {
                    continue;
                }
                debug!(variable = %variable, "domain narrowed");
                if let Some(listeners) = self.listeners.get(variable) {
                    for listener in listeners {
                        if !Arc::ptr_eq(listener, &constraint) {
                            queue.mark_dirty(listener);
                        }
                    }
                }
                if let Some(domain) = self.domains.get_mut(variable) {
                    domain.reset_changed();
                }
            }
            if entailed {
                let description = constraint.descriptor().description;
                debug!(constraint = %description, "entailed");
                self.remove_constraint(&constraint);
                queue.discard(&constraint);
            }
        }
        Ok(self.domains.values().all(|domain| domain.size() == 1))
    }

    fn remove_constraint(&mut self, constraint: &ConstraintRef) {
        self.constraints.retain(|c| !Arc::ptr_eq(c, constraint));
        for variable in constraint.affected_variables() {
            if let Some(listeners) = self.listeners.get_mut(variable) {
                listeners.retain(|c| !Arc::ptr_eq(c, constraint));
            }
        }
    }

    /// Splits this repository into child repositories via `distributor`.
    ///
    /// Every child owns an independent domain map (changed flags cleared)
    /// and shares this repository's constraints by reference.
    pub fn distribute(&self, distributor: &dyn Distributor) -> Result<Vec<Repository>> {
        let mut children = Vec::new();
        for mut domains in distributor.distribute(&self.domains)? {
            for variable in &self.variables {
                if let Some(domain) = domains.get_mut(variable) {
                    domain.reset_changed();
                }
            }
            children.push(Repository::with_constraints(
                self.variables.clone(),
                domains,
                self.constraints.iter().cloned(),
            )?);
        }
        Ok(children)
    }
}
