use crate::{
    error::{Inconsistency, Misuse, Result},
    solver::{
        domain::{Domain, DomainMap},
        value::{Interval, Value},
    },
};

/// Looks up a variable's domain as a [`FiniteIntervalDomain`].
pub fn interval_domain<'a>(
    domains: &'a DomainMap,
    variable: &str,
) -> Result<&'a FiniteIntervalDomain> {
    domains
        .get(variable)
        .ok_or_else(|| Misuse::UnknownVariable(variable.to_owned()))?
        .as_any()
        .downcast_ref::<FiniteIntervalDomain>()
        .ok_or_else(|| {
            Misuse::DomainKindMismatch {
                variable: variable.to_owned(),
                expected: "interval",
            }
            .into()
        })
}

/// Looks up a variable's domain as a mutable [`FiniteIntervalDomain`].
pub fn interval_domain_mut<'a>(
    domains: &'a mut DomainMap,
    variable: &str,
) -> Result<&'a mut FiniteIntervalDomain> {
    domains
        .get_mut(variable)
        .ok_or_else(|| Misuse::UnknownVariable(variable.to_owned()))?
        .as_any_mut()
        .downcast_mut::<FiniteIntervalDomain>()
        .ok_or_else(|| {
            Misuse::DomainKindMismatch {
                variable: variable.to_owned(),
                expected: "interval",
            }
            .into()
        })
}

/// The domain of a task interval: every `[start, start + length)` with
/// `lowest_min <= start`, `start + length <= highest_max`,
/// `min_length <= length <= max_length`, where `start` (relative to
/// `lowest_min`) and `length` are multiples of `resolution`.
///
/// Scheduling constraints narrow this domain by tightening its bounds rather
/// than by removing individual values.
#[derive(Debug, Clone)]
pub struct FiniteIntervalDomain {
    lowest_min: i64,
    highest_max: i64,
    min_length: i64,
    max_length: i64,
    resolution: i64,
    changed: bool,
}

impl PartialEq for FiniteIntervalDomain {
    fn eq(&self, other: &Self) -> bool {
        // the changed flag is bookkeeping, not part of the value space
        self.lowest_min == other.lowest_min
            && self.highest_max == other.highest_max
            && self.min_length == other.min_length
            && self.max_length == other.max_length
            && self.resolution == other.resolution
    }
}

impl Eq for FiniteIntervalDomain {}

impl FiniteIntervalDomain {
    /// Creates a domain with `max_length` defaulting to the whole span and a
    /// resolution of 1.
    pub fn new(lowest_min: i64, highest_max: i64, min_length: i64) -> Result<Self> {
        Self::with_resolution(
            lowest_min,
            highest_max,
            min_length,
            highest_max - lowest_min,
            1,
        )
    }

    /// Creates a domain with an explicit length window. A `max_length`
    /// larger than the span is clamped, not rejected.
    pub fn with_lengths(
        lowest_min: i64,
        highest_max: i64,
        min_length: i64,
        max_length: i64,
    ) -> Result<Self> {
        Self::with_resolution(lowest_min, highest_max, min_length, max_length, 1)
    }

    /// Fully explicit constructor.
    pub fn with_resolution(
        lowest_min: i64,
        highest_max: i64,
        min_length: i64,
        max_length: i64,
        resolution: i64,
    ) -> Result<Self> {
        if highest_max < lowest_min {
            return Err(Misuse::InvalidInterval(format!(
                "highest max {} is below lowest min {}",
                highest_max, lowest_min
            ))
            .into());
        }
        if resolution <= 0 {
            return Err(
                Misuse::InvalidInterval(format!("resolution {} must be positive", resolution))
                    .into(),
            );
        }
        let span = highest_max - lowest_min;
        if span % resolution != 0 {
            return Err(Misuse::InvalidInterval(format!(
                "span {} is not a multiple of resolution {}",
                span, resolution
            ))
            .into());
        }
        let max_length = max_length.min(span);
        if min_length > max_length {
            return Err(Misuse::InvalidInterval(format!(
                "min length {} exceeds max length {}",
                min_length, max_length
            ))
            .into());
        }
        if min_length < 0 {
            return Err(
                Misuse::InvalidInterval(format!("min length {} is negative", min_length)).into(),
            );
        }
        if min_length % resolution != 0 {
            return Err(Misuse::InvalidInterval(format!(
                "min length {} is not a multiple of resolution {}",
                min_length, resolution
            ))
            .into());
        }
        if min_length == 0 && max_length == 0 {
            return Err(Misuse::InvalidInterval(
                "zero-length interval domains must be requested explicitly".into(),
            )
            .into());
        }
        Ok(Self {
            lowest_min,
            highest_max,
            min_length,
            max_length,
            resolution,
            changed: false,
        })
    }

    /// Explicitly requests the degenerate domain of zero-length intervals,
    /// which the other constructors reject.
    pub fn zero_length(lowest_min: i64, highest_max: i64) -> Result<Self> {
        if highest_max < lowest_min {
            return Err(Misuse::InvalidInterval(format!(
                "highest max {} is below lowest min {}",
                highest_max, lowest_min
            ))
            .into());
        }
        Ok(Self {
            lowest_min,
            highest_max,
            min_length: 0,
            max_length: 0,
            resolution: 1,
            changed: false,
        })
    }

    pub fn lowest_min(&self) -> i64 {
        self.lowest_min
    }

    pub fn highest_max(&self) -> i64 {
        self.highest_max
    }

    pub fn min_length(&self) -> i64 {
        self.min_length
    }

    pub fn max_length(&self) -> i64 {
        self.max_length
    }

    pub fn resolution(&self) -> i64 {
        self.resolution
    }

    /// The earliest possible end: `lowest_min + min_length`.
    pub fn lowest_max(&self) -> i64 {
        self.lowest_min + self.min_length
    }

    /// The latest possible start: `highest_max - min_length`.
    pub fn highest_min(&self) -> i64 {
        self.highest_max - self.min_length
    }

    fn span(&self) -> i64 {
        self.highest_max - self.lowest_min
    }

    /// `true` iff the value ranges of the two domains intersect.
    pub fn overlap(&self, other: &FiniteIntervalDomain) -> bool {
        self.lowest_min < other.highest_max && other.lowest_min < self.highest_max
    }

    /// Raises the start lower bound to `max(lowest_min, bound)`.
    pub fn set_lowest_min(&mut self, bound: i64) -> Result<()> {
        if bound > self.lowest_min {
            self.lowest_min = bound;
            self.after_tightening()?;
        }
        Ok(())
    }

    /// Lowers the end upper bound to `min(highest_max, bound)`.
    pub fn set_highest_max(&mut self, bound: i64) -> Result<()> {
        if bound < self.highest_max {
            self.highest_max = bound;
            self.after_tightening()?;
        }
        Ok(())
    }

    /// Raises the length lower bound to `max(min_length, length)`.
    pub fn set_min_length(&mut self, length: i64) -> Result<()> {
        if length > self.min_length {
            self.min_length = length;
            self.after_tightening()?;
        }
        Ok(())
    }

    /// Lowers the length upper bound to `min(max_length, length)`.
    pub fn set_max_length(&mut self, length: i64) -> Result<()> {
        if length < self.max_length {
            self.max_length = length;
            self.after_tightening()?;
        }
        Ok(())
    }

    fn after_tightening(&mut self) -> Result<()> {
        self.changed = true;
        if self.max_length > self.span() {
            self.max_length = self.span();
        }
        if self.size() == 0 {
            return Err(Inconsistency::new(format!("interval domain {:?} became empty", self)).into());
        }
        Ok(())
    }

    fn lengths(&self) -> impl Iterator<Item = i64> + '_ {
        let mut length = self.min_length;
        std::iter::from_fn(move || {
            if length > self.max_length {
                return None;
            }
            let current = length;
            length += self.resolution;
            Some(current)
        })
    }

    fn starts_for(&self, length: i64) -> i64 {
        if length > self.span() {
            0
        } else {
            (self.span() - length) / self.resolution + 1
        }
    }
}

impl Domain for FiniteIntervalDomain {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }

    fn size(&self) -> usize {
        if self.min_length > self.max_length {
            return 0;
        }
        self.lengths().map(|len| self.starts_for(len)).sum::<i64>() as usize
    }

    fn values(&self) -> Vec<Value> {
        let mut intervals = Vec::with_capacity(self.size());
        for length in self.lengths() {
            for step in 0..self.starts_for(length) {
                let start = self.lowest_min + step * self.resolution;
                intervals.push(Value::Interval(Interval::new(start, start + length)));
            }
        }
        intervals
    }

    fn singleton_value(&self) -> Option<Value> {
        if self.size() == 1 {
            Some(Value::Interval(Interval::new(
                self.lowest_min,
                self.lowest_min + self.min_length,
            )))
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
