use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use crate::solver::{
    constraint::{Constraint, ConstraintRef},
    domain::DomainMap,
};

/// Identity key for a shared constraint.
fn key(constraint: &ConstraintRef) -> usize {
    Arc::as_ptr(constraint) as *const () as usize
}

/// The propagation loop's scheduling state: a primary queue of constraints
/// ordered by ascending cost estimate, plus a dirty set of constraints
/// whose variables changed since the queue was last built.
///
/// When the primary queue runs out it is refilled from the dirty set, with
/// costs re-estimated against the current domains. Batching the refill
/// amortises the sort and keeps cheap constraints from starving expensive
/// ones indefinitely.
pub(crate) struct PropagationQueue {
    queue: VecDeque<ConstraintRef>,
    dirty: Vec<ConstraintRef>,
    dirty_members: HashSet<usize>,
}

impl PropagationQueue {
    /// Builds the initial queue holding every registered arc constraint.
    pub fn seed(constraints: &[ConstraintRef], domains: &DomainMap) -> Self {
        let mut queue = Self {
            queue: VecDeque::new(),
            dirty: constraints.to_vec(),
            dirty_members: constraints.iter().map(key).collect(),
        };
        queue.refill(domains);
        queue
    }

    /// Pops the cheapest pending constraint, refilling from the dirty set
    /// when the primary queue is exhausted.
    pub fn pop(&mut self, domains: &DomainMap) -> Option<ConstraintRef> {
        if self.queue.is_empty() {
            if self.dirty.is_empty() {
                return None;
            }
            self.refill(domains);
        }
        self.queue.pop_front()
    }

    /// Schedules a constraint for re-evaluation in the next refill.
    pub fn mark_dirty(&mut self, constraint: &ConstraintRef) {
        if self.dirty_members.insert(key(constraint)) {
            self.dirty.push(constraint.clone());
        }
    }

    /// Drops an entailed constraint from the dirty set.
    pub fn discard(&mut self, constraint: &ConstraintRef) {
        if self.dirty_members.remove(&key(constraint)) {
            self.dirty.retain(|c| !Arc::ptr_eq(c, constraint));
        }
    }

    fn refill(&mut self, domains: &DomainMap) {
        let mut pending: Vec<(u64, ConstraintRef)> = self
            .dirty
            .drain(..)
            .map(|c| (c.estimate_cost(domains), c))
            .collect();
        self.dirty_members.clear();
        pending.sort_by_key(|(cost, _)| *cost);
        self.queue = pending.into_iter().map(|(_, c)| c).collect();
    }
}
