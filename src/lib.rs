//! An arc-consistency constraint satisfaction problem (CSP) solver.
//!
//! A problem is a set of named variables, each with a finite domain of
//! candidate values, and a set of constraints restricting how the variables
//! may be assigned. The solver interleaves two mechanisms:
//!
//! - **Propagation**: a [`Repository`] drives every constraint to local
//!   consistency by narrowing the variables' domains, cheapest constraints
//!   first, until a fixed point is reached.
//! - **Distribution**: when propagation alone cannot determine every
//!   variable, a [`Distributor`] splits one domain and the [`Solver`]
//!   explores the resulting subproblems depth-first, yielding solutions
//!   lazily.
//!
//! Two domain representations are provided: [`FiniteDomain`] for discrete
//! value sets and [`FiniteIntervalDomain`] for task intervals with bounded
//! start and length, narrowed by the scheduling relations in
//! [`solver::constraints::interval`].
//!
//! # Example
//!
//! Two variables that must differ, where `a` can be `1` or `2` and `b` can
//! only be `1`; the solver deduces that `a` must be `2`.
//!
//! ```
//! use std::sync::Arc;
//!
//! use angusto::{AllDistinct, Domain, DomainMap, FiniteDomain, Repository, Solver, Value};
//!
//! # fn main() -> angusto::Result<()> {
//! let variables = vec!["a".to_string(), "b".to_string()];
//! let mut domains = DomainMap::new();
//! domains.insert(
//!     "a".into(),
//!     Box::new(FiniteDomain::of_ints([1, 2])) as Box<dyn Domain>,
//! );
//! domains.insert(
//!     "b".into(),
//!     Box::new(FiniteDomain::of_ints([1])) as Box<dyn Domain>,
//! );
//!
//! let mut repository = Repository::new(variables, domains)?;
//! repository.add_constraint(Arc::new(AllDistinct::new(["a", "b"])))?;
//!
//! let solver = Solver::default();
//! let (solution, _stats) = solver.solve_one(repository)?;
//! let solution = solution.expect("a != b is satisfiable");
//! assert_eq!(solution.get("a"), Some(&Value::Int(2)));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod solver;

pub use error::{Error, Inconsistency, Misuse, Result};
pub use solver::{
    constraint::{Constraint, ConstraintDescriptor, ConstraintRef},
    constraints::{
        all_distinct::AllDistinct,
        basic::{BasicConstraint, Comparison, ValueCondition},
        interval::{
            EndsAfterEnd, EndsAfterStart, EndsBeforeEnd, EndsBeforeStart, NoOverlap,
            StartsAfterEnd, StartsAfterStart, StartsBeforeEnd, StartsBeforeStart,
        },
        predicate::{make_predicate, Predicate},
    },
    distributor::{
        DefaultDistributor, DichotomyDistributor, Distributor, EnumeratorDistributor,
        FiniteIntervalDistributor, NaiveDistributor, RandomizingDistributor, SplitDistributor,
    },
    domain::{finite_domain, finite_domain_mut, Domain, DomainMap, FiniteDomain},
    engine::{Assignment, BestSolutions, SearchStats, Solutions, Solver, VariableId},
    interval::{interval_domain, interval_domain_mut, FiniteIntervalDomain},
    repository::Repository,
    stats::render_stats_table,
    value::{Interval, Value},
};
