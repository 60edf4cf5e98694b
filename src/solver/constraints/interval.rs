//! Scheduling relations over finite-interval domains.
//!
//! With `S(x)` and `E(x)` the start and end of an interval, the four base
//! relations are `S(a) <= S(b)`, `E(a) <= E(b)`, `E(a) <= S(b)` and the
//! strict `S(a) < E(b)`; each `*After*` relation is its mirrored `*Before*`
//! relation with the operands swapped. Narrowing tightens only the bounds
//! the domain representation can express, so a relation may stay subscribed
//! even though no further pruning is possible yet.

use crate::{
    error::{Inconsistency, Result},
    solver::{
        constraint::{Constraint, ConstraintDescriptor},
        domain::DomainMap,
        engine::VariableId,
        interval::{interval_domain, interval_domain_mut},
    },
};

/// Snapshot of the bounds an interval relation reasons over.
struct Bounds {
    lowest_min: i64,
    highest_max: i64,
    lowest_max: i64,
    highest_min: i64,
    max_length: i64,
    resolution: i64,
}

fn bounds(domains: &DomainMap, variable: &str) -> Result<Bounds> {
    let d = interval_domain(domains, variable)?;
    Ok(Bounds {
        lowest_min: d.lowest_min(),
        highest_max: d.highest_max(),
        lowest_max: d.lowest_max(),
        highest_min: d.highest_min(),
        max_length: d.max_length(),
        resolution: d.resolution(),
    })
}

/// `S(a) <= S(b)`.
fn narrow_starts_before_start(domains: &mut DomainMap, a: &str, b: &str) -> Result<bool> {
    let da = bounds(domains, a)?;
    let db = bounds(domains, b)?;
    if da.lowest_min > db.highest_min {
        return Err(Inconsistency::new(format!("`{}` cannot start before `{}` starts", a, b)).into());
    }
    // b cannot start before a's earliest start
    interval_domain_mut(domains, b)?.set_lowest_min(da.lowest_min)?;
    // a must be able to start no later than b's latest start
    interval_domain_mut(domains, a)?.set_highest_max(db.highest_min + da.max_length)?;
    Ok(interval_domain(domains, a)?.highest_min() <= interval_domain(domains, b)?.lowest_min())
}

/// `E(a) <= E(b)`.
fn narrow_ends_before_end(domains: &mut DomainMap, a: &str, b: &str) -> Result<bool> {
    let da = bounds(domains, a)?;
    let db = bounds(domains, b)?;
    if da.lowest_max > db.highest_max {
        return Err(Inconsistency::new(format!("`{}` cannot end before `{}` ends", a, b)).into());
    }
    interval_domain_mut(domains, a)?.set_highest_max(db.highest_max)?;
    interval_domain_mut(domains, b)?.set_lowest_min(da.lowest_max - db.max_length)?;
    Ok(interval_domain(domains, a)?.highest_max() <= interval_domain(domains, b)?.lowest_max())
}

/// `E(a) <= S(b)`: a is finished by the time b starts.
fn narrow_ends_before_start(domains: &mut DomainMap, a: &str, b: &str) -> Result<bool> {
    let da = bounds(domains, a)?;
    let db = bounds(domains, b)?;
    if da.lowest_max > db.highest_min {
        return Err(Inconsistency::new(format!("`{}` cannot end before `{}` starts", a, b)).into());
    }
    interval_domain_mut(domains, a)?.set_highest_max(db.highest_min)?;
    interval_domain_mut(domains, b)?.set_lowest_min(da.lowest_max)?;
    Ok(interval_domain(domains, a)?.highest_max() <= interval_domain(domains, b)?.lowest_min())
}

/// `S(a) < E(b)`: a begins while b is still running.
fn narrow_starts_before_end(domains: &mut DomainMap, a: &str, b: &str) -> Result<bool> {
    let da = bounds(domains, a)?;
    let db = bounds(domains, b)?;
    if da.lowest_min >= db.highest_max {
        return Err(Inconsistency::new(format!("`{}` cannot start before `{}` ends", a, b)).into());
    }
    // the bounds live on the resolution grid, so strict `<` tightens by one step
    interval_domain_mut(domains, a)?.set_highest_max(db.highest_max - da.resolution + da.max_length)?;
    interval_domain_mut(domains, b)?.set_lowest_min(da.lowest_min + db.resolution - db.max_length)?;
    Ok(interval_domain(domains, a)?.highest_min() < interval_domain(domains, b)?.lowest_max())
}

macro_rules! interval_relation {
    ($(#[$doc:meta])* $name:ident, $narrow:ident, swapped: $swapped:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            variables: [VariableId; 2],
        }

        impl $name {
            pub fn new(a: impl Into<VariableId>, b: impl Into<VariableId>) -> Self {
                Self {
                    variables: [a.into(), b.into()],
                }
            }
        }

        impl Constraint for $name {
            fn affected_variables(&self) -> &[VariableId] {
                &self.variables
            }

            fn narrow(&self, domains: &mut DomainMap) -> Result<bool> {
                let [a, b] = &self.variables;
                if $swapped {
                    $narrow(domains, b, a)
                } else {
                    $narrow(domains, a, b)
                }
            }

            fn descriptor(&self) -> ConstraintDescriptor {
                ConstraintDescriptor {
                    name: stringify!($name).to_string(),
                    description: format!(
                        "{}({}, {})",
                        stringify!($name),
                        self.variables[0],
                        self.variables[1]
                    ),
                }
            }
        }
    };
}

interval_relation!(
    /// The first interval starts no later than the second starts.
    StartsBeforeStart, narrow_starts_before_start, swapped: false);
interval_relation!(
    /// The first interval starts strictly before the second ends.
    StartsBeforeEnd, narrow_starts_before_end, swapped: false);
interval_relation!(
    /// The first interval ends no later than the second starts.
    EndsBeforeStart, narrow_ends_before_start, swapped: false);
interval_relation!(
    /// The first interval ends no later than the second ends.
    EndsBeforeEnd, narrow_ends_before_end, swapped: false);
interval_relation!(
    /// The first interval starts no earlier than the second starts.
    StartsAfterStart, narrow_starts_before_start, swapped: true);
interval_relation!(
    /// The first interval starts no earlier than the second ends.
    StartsAfterEnd, narrow_ends_before_start, swapped: true);
interval_relation!(
    /// The first interval ends strictly after the second starts.
    EndsAfterStart, narrow_starts_before_end, swapped: true);
interval_relation!(
    /// The first interval ends no earlier than the second ends.
    EndsAfterEnd, narrow_ends_before_end, swapped: true);

/// One of the two intervals must end before the other starts.
///
/// The relation is symmetric, so construction canonicalises the variable
/// pair: `NoOverlap::new(a, b)` and `NoOverlap::new(b, a)` are equal, hash
/// alike and narrow identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NoOverlap {
    variables: [VariableId; 2],
}

impl NoOverlap {
    pub fn new(a: impl Into<VariableId>, b: impl Into<VariableId>) -> Self {
        let (a, b) = (a.into(), b.into());
        let variables = if a <= b { [a, b] } else { [b, a] };
        Self { variables }
    }
}

impl Constraint for NoOverlap {
    fn affected_variables(&self) -> &[VariableId] {
        &self.variables
    }

    fn narrow(&self, domains: &mut DomainMap) -> Result<bool> {
        let [x, y] = &self.variables;
        let dx = bounds(domains, x)?;
        let dy = bounds(domains, y)?;

        // already separated by the bounds alone
        if dx.highest_max <= dy.lowest_min || dy.highest_max <= dx.lowest_min {
            return Ok(true);
        }

        let x_first_possible = dx.lowest_max <= dy.highest_min;
        let y_first_possible = dy.lowest_max <= dx.highest_min;
        match (x_first_possible, y_first_possible) {
            (false, false) => Err(Inconsistency::new(format!(
                "`{}` and `{}` cannot avoid overlapping",
                x, y
            ))
            .into()),
            // both orderings still open: nothing to prune yet
            (true, true) => Ok(false),
            (true, false) => collapse(domains, x, y),
            (false, true) => collapse(domains, y, x),
        }
    }

    fn descriptor(&self) -> ConstraintDescriptor {
        ConstraintDescriptor {
            name: "NoOverlap".to_string(),
            description: format!("NoOverlap({}, {})", self.variables[0], self.variables[1]),
        }
    }
}

/// Forces `first` to run before `second`, the only ordering left.
fn collapse(domains: &mut DomainMap, first: &str, second: &str) -> Result<bool> {
    let latest_start_of_second = interval_domain(domains, second)?.highest_min();
    interval_domain_mut(domains, first)?.set_highest_max(latest_start_of_second)?;
    let earliest_end_of_first = interval_domain(domains, first)?.lowest_max();
    interval_domain_mut(domains, second)?.set_lowest_min(earliest_end_of_first)?;
    Ok(interval_domain(domains, first)?.highest_max()
        <= interval_domain(domains, second)?.lowest_min())
}
