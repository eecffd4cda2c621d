//! Allocation error taxonomy
//!
//! Every parse or allocation failure is a value: a machine-checkable kind plus
//! a message an operator can act on. Nothing in this crate panics on bad input.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of allocation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AllocationErrorKind {
    MalformedRange,
    NoProjects,
    MissingQuantity,
    UnrecognizedFormat,
    CountMismatch,
    NonPositiveQuantity,
    InconsistentTotals,
    TooManyProjects,
    QuantityLimitExceeded,
}

impl AllocationErrorKind {
    /// Stable code used in API error bodies
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedRange => "MALFORMED_RANGE",
            Self::NoProjects => "NO_PROJECTS",
            Self::MissingQuantity => "MISSING_QUANTITY",
            Self::UnrecognizedFormat => "UNRECOGNIZED_FORMAT",
            Self::CountMismatch => "COUNT_MISMATCH",
            Self::NonPositiveQuantity => "NON_POSITIVE_QUANTITY",
            Self::InconsistentTotals => "INCONSISTENT_TOTALS",
            Self::TooManyProjects => "TOO_MANY_PROJECTS",
            Self::QuantityLimitExceeded => "QUANTITY_LIMIT_EXCEEDED",
        }
    }
}

impl std::fmt::Display for AllocationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A rejected allocation input
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct AllocationError {
    pub kind: AllocationErrorKind,
    pub message: String,
}

impl AllocationError {
    pub fn new(kind: AllocationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn malformed_range(token: &str, reason: &str) -> Self {
        Self::new(
            AllocationErrorKind::MalformedRange,
            format!("Invalid project token \"{}\": {}", token, reason),
        )
    }

    pub fn no_projects() -> Self {
        Self::new(
            AllocationErrorKind::NoProjects,
            "No valid project numbers were given",
        )
    }

    pub fn missing_quantity() -> Self {
        Self::new(
            AllocationErrorKind::MissingQuantity,
            "Enter a total quantity or a per-project quantity",
        )
    }

    pub fn unrecognized_format(input: &str) -> Self {
        Self::new(
            AllocationErrorKind::UnrecognizedFormat,
            format!(
                "Cannot read \"{}\": enter \"po 20\" or \"20,30,40\"",
                input.trim()
            ),
        )
    }

    pub fn count_mismatch(values: usize, projects: usize) -> Self {
        Self::new(
            AllocationErrorKind::CountMismatch,
            format!(
                "Number of quantities ({}) does not match number of projects ({})",
                values, projects
            ),
        )
    }

    pub fn non_positive(detail: impl std::fmt::Display) -> Self {
        Self::new(
            AllocationErrorKind::NonPositiveQuantity,
            format!("All quantities must be positive integers (got {})", detail),
        )
    }

    pub fn inconsistent_totals(derived: u64, explicit: u64) -> Self {
        Self::new(
            AllocationErrorKind::InconsistentTotals,
            format!(
                "Per-project quantities add up to {}, but the total field says {}. Correct one of the values.",
                derived, explicit
            ),
        )
    }

    pub fn too_many_projects(count: usize, max: usize) -> Self {
        Self::new(
            AllocationErrorKind::TooManyProjects,
            format!(
                "At most {} projects are allowed per order line (got {})",
                max, count
            ),
        )
    }

    pub fn quantity_limit(message: impl Into<String>) -> Self {
        Self::new(AllocationErrorKind::QuantityLimitExceeded, message)
    }
}

impl From<AllocationError> for keepsake_common::Error {
    fn from(err: AllocationError) -> Self {
        keepsake_common::Error::rejected(err.kind.code(), err.message)
    }
}
