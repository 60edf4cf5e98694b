use serde::Serialize;
use tracing::debug;

use crate::{
    error::{Error, Result},
    solver::{
        distributor::{DichotomyDistributor, Distributor},
        domain::{Domain, DomainMap},
        repository::Repository,
        value::Value,
    },
};

/// The opaque key naming a variable, unique within one problem.
pub type VariableId = String;

/// A complete solution: one value per variable.
pub type Assignment = im::HashMap<VariableId, Value>;

/// Counters describing one search run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Search nodes whose propagation was run.
    pub nodes_visited: u64,
    /// Nodes abandoned because propagation found an inconsistency.
    pub backtracks: u64,
    /// Distribution (branching) events.
    pub distributions: u64,
    /// Deepest point of the search tree reached.
    pub max_depth: u32,
}

/// Couples a [`Repository`] with a [`Distributor`] into a depth-first
/// search over the remaining value space.
///
/// Solutions are produced lazily: `solve_all` and `solve_best` return
/// iterators, and a consumer that stops pulling simply abandons the rest of
/// the search.
pub struct Solver {
    distributor: Box<dyn Distributor>,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new(Box::new(DichotomyDistributor))
    }
}

impl Solver {
    pub fn new(distributor: Box<dyn Distributor>) -> Self {
        Self { distributor }
    }

    /// Finds the first solution, if any.
    pub fn solve_one(&self, repository: Repository) -> Result<(Option<Assignment>, SearchStats)> {
        let mut solutions = self.solve_all(repository);
        let first = solutions.next().transpose()?;
        Ok((first, solutions.stats()))
    }

    /// Collects every solution eagerly.
    pub fn solve(&self, repository: Repository) -> Result<(Vec<Assignment>, SearchStats)> {
        let mut solutions = self.solve_all(repository);
        let mut collected = Vec::new();
        for solution in &mut solutions {
            collected.push(solution?);
        }
        Ok((collected, solutions.stats()))
    }

    /// Lazily enumerates every solution in depth-first order.
    pub fn solve_all(&self, repository: Repository) -> Solutions<'_> {
        Solutions {
            distributor: self.distributor.as_ref(),
            stack: vec![(repository, 0)],
            stats: SearchStats::default(),
            finished: false,
        }
    }

    /// Lazily enumerates an improving stream of solutions: every yielded
    /// solution costs no more than any yielded before it. The last item is
    /// the best solution found.
    pub fn solve_best<'s, F>(&'s self, repository: Repository, cost: F) -> BestSolutions<'s>
    where
        F: Fn(&Assignment) -> i64 + 's,
    {
        BestSolutions {
            solutions: self.solve_all(repository),
            cost: Box::new(cost),
            best: None,
        }
    }
}

/// Lazy depth-first iterator over all solutions. Dropping it cancels the
/// remaining search.
pub struct Solutions<'s> {
    distributor: &'s dyn Distributor,
    stack: Vec<(Repository, u32)>,
    stats: SearchStats,
    finished: bool,
}

impl Solutions<'_> {
    /// The statistics accumulated so far.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }
}

impl Iterator for Solutions<'_> {
    type Item = Result<Assignment>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        while let Some((mut repository, depth)) = self.stack.pop() {
            self.stats.nodes_visited += 1;
            self.stats.max_depth = self.stats.max_depth.max(depth);
            match repository.propagate() {
                Err(Error::Inconsistency(failure)) => {
                    debug!(depth, %failure, "backtracking");
                    self.stats.backtracks += 1;
                }
                Err(misuse) => {
                    self.finished = true;
                    return Some(Err(misuse));
                }
                Ok(true) => {
                    return Some(Ok(assignment_from(repository.domains())));
                }
                Ok(false) => {
                    self.stats.distributions += 1;
                    match repository.distribute(self.distributor) {
                        Ok(children) => {
                            // reversed so the first child is explored first
                            for child in children.into_iter().rev() {
                                self.stack.push((child, depth + 1));
                            }
                        }
                        Err(error) => {
                            self.finished = true;
                            return Some(Err(error));
                        }
                    }
                }
            }
        }
        self.finished = true;
        None
    }
}

/// Lazy iterator yielding `(solution, cost)` pairs with non-increasing
/// costs. See [`Solver::solve_best`].
pub struct BestSolutions<'s> {
    solutions: Solutions<'s>,
    cost: Box<dyn Fn(&Assignment) -> i64 + 's>,
    best: Option<i64>,
}

impl BestSolutions<'_> {
    pub fn stats(&self) -> SearchStats {
        self.solutions.stats()
    }
}

impl Iterator for BestSolutions<'_> {
    type Item = Result<(Assignment, i64)>;

    fn next(&mut self) -> Option<Self::Item> {
        for solution in &mut self.solutions {
            let solution = match solution {
                Ok(solution) => solution,
                Err(error) => return Some(Err(error)),
            };
            let cost = (self.cost)(&solution);
            if self.best.map_or(true, |best| cost <= best) {
                self.best = Some(cost);
                return Some(Ok((solution, cost)));
            }
        }
        None
    }
}

fn assignment_from(domains: &DomainMap) -> Assignment {
    domains
        .iter()
        .map(|(variable, domain)| {
            let value = domain
                .singleton_value()
                .expect("every domain is a singleton after successful propagation");
            (variable.clone(), value)
        })
        .collect()
}
