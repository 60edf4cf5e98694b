use std::sync::Arc;

use crate::{
    error::{Inconsistency, Result},
    solver::{
        constraint::{Constraint, ConstraintDescriptor, ConstraintRef},
        domain::{finite_domain, finite_domain_mut, DomainMap},
        engine::VariableId,
        value::Value,
    },
};

/// A user-supplied boolean relation over two or more variables.
///
/// The closure receives one candidate value per affected variable, in the
/// order the variables were given. Narrowing enumerates the Cartesian
/// product of the current domains and keeps, for each variable, exactly the
/// values that participate in at least one satisfying tuple. The constraint
/// is reported entailed only when every enumerated tuple satisfied the
/// predicate.
#[derive(Clone)]
pub struct Predicate {
    variables: Vec<VariableId>,
    label: String,
    test: Arc<dyn Fn(&[Value]) -> bool>,
}

impl Predicate {
    pub fn new<I, T>(
        variables: I,
        label: impl Into<String>,
        test: impl Fn(&[Value]) -> bool + 'static,
    ) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<VariableId>,
    {
        Self {
            variables: variables.into_iter().map(Into::into).collect(),
            label: label.into(),
            test: Arc::new(test),
        }
    }
}

/// Builds a shareable predicate constraint; the usual way to state ad-hoc
/// relations when assembling a problem.
pub fn make_predicate<I, T>(
    variables: I,
    label: impl Into<String>,
    test: impl Fn(&[Value]) -> bool + 'static,
) -> ConstraintRef
where
    I: IntoIterator<Item = T>,
    T: Into<VariableId>,
{
    Arc::new(Predicate::new(variables, label, test))
}

impl std::fmt::Debug for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predicate")
            .field("variables", &self.variables)
            .field("label", &self.label)
            .finish()
    }
}

impl Constraint for Predicate {
    fn affected_variables(&self) -> &[VariableId] {
        &self.variables
    }

    fn narrow(&self, domains: &mut DomainMap) -> Result<bool> {
        if self.variables.is_empty() {
            return Ok(true);
        }
        let columns: Vec<Vec<Value>> = self
            .variables
            .iter()
            .map(|v| finite_domain(domains, v).map(|d| d.sorted_values()))
            .collect::<Result<_>>()?;

        let mut supported: Vec<Vec<bool>> =
            columns.iter().map(|c| vec![false; c.len()]).collect();
        let mut unsupported: usize = columns.iter().map(Vec::len).sum();
        let mut indices = vec![0usize; columns.len()];
        let mut tuple: Vec<Value> = columns.iter().map(|c| c[0].clone()).collect();
        let mut every_tuple_satisfied = true;

        'product: loop {
            if (self.test)(&tuple) {
                for (position, &index) in indices.iter().enumerate() {
                    if !supported[position][index] {
                        supported[position][index] = true;
                        unsupported -= 1;
                    }
                }
                // once everything is supported and entailment is already
                // lost, the rest of the product holds no new information
                if unsupported == 0 && !every_tuple_satisfied {
                    break;
                }
            } else {
                every_tuple_satisfied = false;
                if unsupported == 0 {
                    break;
                }
            }

            // odometer step through the Cartesian product
            for position in (0..indices.len()).rev() {
                indices[position] += 1;
                if indices[position] < columns[position].len() {
                    tuple[position] = columns[position][indices[position]].clone();
                    continue 'product;
                }
                indices[position] = 0;
                tuple[position] = columns[position][0].clone();
            }
            break;
        }

        for (position, variable) in self.variables.iter().enumerate() {
            let keep: Vec<&Value> = columns[position]
                .iter()
                .zip(&supported[position])
                .filter_map(|(value, &ok)| ok.then_some(value))
                .collect();
            if keep.len() == columns[position].len() {
                continue;
            }
            if keep.is_empty() {
                return Err(Inconsistency::new(format!(
                    "no value of `{}` satisfies {}",
                    variable, self.label
                ))
                .into());
            }
            let domain = finite_domain_mut(domains, variable)?;
            domain.retain(|value| keep.iter().any(|k| *k == value))?;
        }

        Ok(every_tuple_satisfied)
    }

    fn descriptor(&self) -> ConstraintDescriptor {
        ConstraintDescriptor {
            name: "Predicate".to_string(),
            description: format!("{} over ({})", self.label, self.variables.join(", ")),
        }
    }
}
