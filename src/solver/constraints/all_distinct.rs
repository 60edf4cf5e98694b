use std::collections::HashSet;

use crate::{
    error::{Inconsistency, Result},
    solver::{
        constraint::{Constraint, ConstraintDescriptor},
        domain::{finite_domain, finite_domain_mut, Domain, DomainMap},
        engine::VariableId,
        value::Value,
    },
};

/// Enforces pairwise distinctness over a set of variables.
///
/// Narrowing broadcasts every singleton domain's value out of the other
/// domains until no new singletons appear, then applies the pigeonhole
/// check: fewer candidate values than variables cannot be completed.
///
/// No stronger inference (Hall sets etc.) is attempted.
#[derive(Debug, Clone)]
pub struct AllDistinct {
    variables: Vec<VariableId>,
}

impl AllDistinct {
    pub fn new<I, T>(variables: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<VariableId>,
    {
        Self {
            variables: variables.into_iter().map(Into::into).collect(),
        }
    }
}

impl Constraint for AllDistinct {
    fn affected_variables(&self) -> &[VariableId] {
        &self.variables
    }

    fn narrow(&self, domains: &mut DomainMap) -> Result<bool> {
        // broadcast singleton values until a fixed point
        let mut broadcast: HashSet<&VariableId> = HashSet::new();
        loop {
            let mut found = None;
            for variable in &self.variables {
                if broadcast.contains(variable) {
                    continue;
                }
                if let Some(value) = finite_domain(domains, variable)?.singleton_value() {
                    found = Some((variable, value));
                    break;
                }
            }
            let Some((variable, value)) = found else {
                break;
            };
            broadcast.insert(variable);
            for other in &self.variables {
                if other == variable {
                    continue;
                }
                let domain = finite_domain_mut(domains, other)?;
                if domain.contains(&value) {
                    domain.remove_value(&value).map_err(|err| {
                        if err.is_inconsistency() {
                            Inconsistency::new(format!(
                                "`{}` and `{}` would both take {}",
                                variable, other, value
                            ))
                            .into()
                        } else {
                            err
                        }
                    })?;
                }
            }
        }

        // pigeonhole: fewer candidate values than variables cannot work
        let mut union: HashSet<Value> = HashSet::new();
        let mut total = 0usize;
        let mut all_singletons = true;
        for variable in &self.variables {
            let domain = finite_domain(domains, variable)?;
            total += domain.size();
            all_singletons &= domain.size() == 1;
            union.extend(domain.iter().cloned());
        }
        if union.len() < self.variables.len() {
            return Err(Inconsistency::new(format!(
                "{} variables share only {} candidate values",
                self.variables.len(),
                union.len()
            ))
            .into());
        }

        // entailed once the domains are pairwise disjoint (which covers the
        // all-singletons case): any remaining assignment is distinct
        Ok(all_singletons || total == union.len())
    }

    fn descriptor(&self) -> ConstraintDescriptor {
        ConstraintDescriptor {
            name: "AllDistinct".to_string(),
            description: format!("AllDistinct({})", self.variables.join(", ")),
        }
    }
}
