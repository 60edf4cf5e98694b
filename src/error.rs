use crate::solver::value::Value;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// The two failure kinds of the solver.
///
/// [`Inconsistency`] is the normal backtracking signal: a domain was emptied
/// or a constraint can no longer be satisfied. The search driver recovers
/// from it locally and it only reaches the caller when the root problem
/// itself is inconsistent. [`Misuse`] reports a malformed problem and is
/// always surfaced; the repository is not guaranteed usable afterwards.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("inconsistency: {0}")]
    Inconsistency(#[from] Inconsistency),
    #[error(transparent)]
    Misuse(#[from] Misuse),
}

impl Error {
    /// `true` for the recoverable backtracking signal.
    pub fn is_inconsistency(&self) -> bool {
        matches!(self, Error::Inconsistency(_))
    }
}

/// A domain became empty, or a constraint cannot hold under the current
/// domains. Carries a short description of the narrowing step that failed.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{reason}")]
pub struct Inconsistency {
    pub reason: String,
}

impl Inconsistency {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Misuse {
    #[error("unknown variable `{0}`")]
    UnknownVariable(String),
    #[error("value {0} is not a candidate in the domain")]
    ValueNotInDomain(Value),
    #[error("invalid interval domain: {0}")]
    InvalidInterval(String),
    #[error("variable `{variable}` does not hold a {expected} domain")]
    DomainKindMismatch {
        variable: String,
        expected: &'static str,
    },
    #[error("no variable with at least two candidate values to split")]
    NothingToDistribute,
}
