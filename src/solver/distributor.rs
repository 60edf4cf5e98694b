use std::cell::RefCell;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;

use crate::{
    error::{Misuse, Result},
    solver::{
        domain::{finite_domain, Domain, DomainMap, FiniteDomain},
        engine::VariableId,
        interval::interval_domain,
        value::Value,
    },
};

/// Splits a not-yet-determined domain map into child maps, the branching
/// point of the search.
///
/// The children must partition the chosen variable's domain (coverage) and
/// each child must hold a strictly smaller domain for it (progress); all
/// other domains are carried over unchanged into every child.
pub trait Distributor {
    fn distribute(&self, domains: &DomainMap) -> Result<Vec<DomainMap>>;

    /// First-fail selection: the variable with the smallest domain of size
    /// at least two, ties broken by variable identifier.
    fn find_smallest_domain<'a>(&self, domains: &'a DomainMap) -> Option<&'a VariableId> {
        domains
            .iter()
            .filter(|(_, domain)| domain.size() >= 2)
            .min_by(|(name_a, dom_a), (name_b, dom_b)| {
                (dom_a.size(), *name_a).cmp(&(dom_b.size(), *name_b))
            })
            .map(|(name, _)| name)
    }

    /// The variable with the largest domain, ties broken by identifier.
    fn find_largest_domain<'a>(&self, domains: &'a DomainMap) -> Option<&'a VariableId> {
        domains
            .iter()
            .filter(|(_, domain)| domain.size() >= 2)
            .min_by(|(name_a, dom_a), (name_b, dom_b)| {
                (std::cmp::Reverse(dom_a.size()), *name_a)
                    .cmp(&(std::cmp::Reverse(dom_b.size()), *name_b))
            })
            .map(|(name, _)| name)
    }
}

/// The distributor used by [`Solver`](crate::solver::engine::Solver) when
/// none is given.
pub type DefaultDistributor = DichotomyDistributor;

/// Picks the split variable and returns its sorted candidate values.
fn choose_finite_split<'a>(
    distributor: &(impl Distributor + ?Sized),
    domains: &'a DomainMap,
) -> Result<(&'a VariableId, Vec<Value>)> {
    let variable = distributor
        .find_smallest_domain(domains)
        .ok_or(Misuse::NothingToDistribute)?;
    let values = finite_domain(domains, variable)?.sorted_values();
    Ok((variable, values))
}

/// Builds one child per value chunk, replacing the split variable's domain.
fn children_from_chunks(
    domains: &DomainMap,
    variable: &VariableId,
    chunks: Vec<Vec<Value>>,
) -> Vec<DomainMap> {
    chunks
        .into_iter()
        .map(|chunk| {
            let mut child = domains.clone();
            child.insert(variable.clone(), Box::new(FiniteDomain::new(chunk)));
            child
        })
        .collect()
}

/// Splits the chosen domain into its smallest value and the rest.
#[derive(Debug, Clone, Default)]
pub struct NaiveDistributor;

impl Distributor for NaiveDistributor {
    fn distribute(&self, domains: &DomainMap) -> Result<Vec<DomainMap>> {
        let (variable, mut values) = choose_finite_split(self, domains)?;
        let first = values.remove(0);
        Ok(children_from_chunks(
            domains,
            variable,
            vec![vec![first], values],
        ))
    }
}

/// Same partition shape as [`NaiveDistributor`], with the singleton value
/// picked at random. Construct with a seed for reproducible runs.
#[derive(Debug)]
pub struct RandomizingDistributor {
    rng: RefCell<ChaCha8Rng>,
}

impl RandomizingDistributor {
    pub fn new() -> Self {
        Self {
            rng: RefCell::new(ChaCha8Rng::from_entropy()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: RefCell::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomizingDistributor {
    fn default() -> Self {
        Self::new()
    }
}

impl Distributor for RandomizingDistributor {
    fn distribute(&self, domains: &DomainMap) -> Result<Vec<DomainMap>> {
        let (variable, mut values) = choose_finite_split(self, domains)?;
        let index = self.rng.borrow_mut().gen_range(0..values.len());
        let chosen = values.remove(index);
        Ok(children_from_chunks(
            domains,
            variable,
            vec![vec![chosen], values],
        ))
    }
}

/// Splits the chosen domain into two halves of (almost) equal size.
#[derive(Debug, Clone, Default)]
pub struct DichotomyDistributor;

impl Distributor for DichotomyDistributor {
    fn distribute(&self, domains: &DomainMap) -> Result<Vec<DomainMap>> {
        let (variable, values) = choose_finite_split(self, domains)?;
        let middle = values.len().div_ceil(2);
        let (left, right) = values.split_at(middle);
        Ok(children_from_chunks(
            domains,
            variable,
            vec![left.to_vec(), right.to_vec()],
        ))
    }
}

/// Splits the chosen domain into up to `parts` contiguous chunks.
#[derive(Debug, Clone)]
pub struct SplitDistributor {
    parts: usize,
}

impl SplitDistributor {
    pub fn new(parts: usize) -> Self {
        Self {
            parts: parts.max(1),
        }
    }
}

impl Distributor for SplitDistributor {
    fn distribute(&self, domains: &DomainMap) -> Result<Vec<DomainMap>> {
        let (variable, values) = choose_finite_split(self, domains)?;
        let parts = self.parts.min(values.len());
        let base = values.len() / parts;
        let extra = values.len() % parts;
        let mut chunks = Vec::with_capacity(parts);
        let mut rest = values.as_slice();
        for part in 0..parts {
            let size = base + usize::from(part < extra);
            let (chunk, remainder) = rest.split_at(size);
            chunks.push(chunk.to_vec());
            rest = remainder;
        }
        Ok(children_from_chunks(domains, variable, chunks))
    }
}

/// One child per value of the chosen domain.
#[derive(Debug, Clone, Default)]
pub struct EnumeratorDistributor;

impl Distributor for EnumeratorDistributor {
    fn distribute(&self, domains: &DomainMap) -> Result<Vec<DomainMap>> {
        let (variable, values) = choose_finite_split(self, domains)?;
        let chunks = values.into_iter().map(|value| vec![value]).collect();
        Ok(children_from_chunks(domains, variable, chunks))
    }
}

/// Splits a finite-interval domain.
///
/// While the length window is open the split happens on the length axis:
/// one child pinned to the shortest length, the other starting one
/// resolution step longer. Once the length is fixed the split moves to the
/// start axis: the earliest start as a singleton against all later starts.
/// Both partitions cover the parent and strictly shrink it.
#[derive(Debug, Clone, Default)]
pub struct FiniteIntervalDistributor;

impl Distributor for FiniteIntervalDistributor {
    fn distribute(&self, domains: &DomainMap) -> Result<Vec<DomainMap>> {
        let variable = self
            .find_smallest_domain(domains)
            .ok_or(Misuse::NothingToDistribute)?;
        let parent = interval_domain(domains, variable)?;

        let mut first = parent.clone();
        let mut second = parent.clone();
        if parent.min_length() < parent.max_length() {
            first.set_max_length(parent.min_length())?;
            second.set_min_length(parent.min_length() + parent.resolution())?;
        } else {
            // length already fixed: pin the earliest start against the rest
            first.set_highest_max(parent.lowest_min() + parent.min_length())?;
            second.set_lowest_min(parent.lowest_min() + parent.resolution())?;
        }
        first.reset_changed();
        second.reset_changed();

        let variable = variable.clone();
        let mut left = domains.clone();
        left.insert(variable.clone(), Box::new(first));
        let mut right = domains.clone();
        right.insert(variable, Box::new(second));
        Ok(vec![left, right])
    }
}
