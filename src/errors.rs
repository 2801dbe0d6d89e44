//! Shared error types used across submodules.

use thiserror::Error;

use crate::math::Scalar;

/// Convenience alias for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, CascadeError>;

/// Top-level error type for the crate.
///
/// Every fallible operation reports one of these kinds; callers distinguish
/// by matching on the variant rather than parsing the message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CascadeError {
    /// A denominator fell below the universal `1e-20` magnitude guard.
    #[error("singular denominator in {0}")]
    Singular(String),
    /// `characteristic_impedance` was requested of a non-symmetric network.
    #[error("characteristic impedance is only defined for symmetric networks")]
    Nonsymmetric,
    /// A sweep descriptor was malformed.
    #[error("invalid sweep: {0}")]
    InvalidSweep(String),
    /// A component constructor received a non-physical parameter.
    #[error("invalid component: {0}")]
    InvalidComponent(String),
    /// A Monte-Carlo tolerance or distribution was malformed.
    #[error("invalid distribution: {0}")]
    InvalidDistribution(String),
}

impl CascadeError {
    /// Annotates the error with the sweep value at which it occurred.
    ///
    /// The error kind is preserved so callers can still match on it; only the
    /// context string is extended.
    #[must_use]
    pub fn at(self, label: &str, value: Scalar) -> Self {
        let tag = format!(" (at {label} = {value:.6e})");
        match self {
            Self::Singular(ctx) => Self::Singular(ctx + &tag),
            Self::Nonsymmetric => Self::Nonsymmetric,
            Self::InvalidSweep(ctx) => Self::InvalidSweep(ctx + &tag),
            Self::InvalidComponent(ctx) => Self::InvalidComponent(ctx + &tag),
            Self::InvalidDistribution(ctx) => Self::InvalidDistribution(ctx + &tag),
        }
    }
}
