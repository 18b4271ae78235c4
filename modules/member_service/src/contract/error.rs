//! Contract error types for member service
//!
//! These errors are transport-agnostic and used for inter-module communication.
//! A stale read after a bulk update is a documented caller hazard, not an error.

use thiserror::Error;

/// Member service domain errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemberError {
    /// Lookup by identity (or single-result find) found nothing
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Resource type (member, team)
        resource: String,
        /// Resource identifier
        id: String,
    },

    /// Invalid relationship reference, invalid query or paging parameters,
    /// non-unique single result
    #[error("Constraint violation: {reason}")]
    ConstraintViolation {
        /// Violation details
        reason: String,
    },

    /// The backing store could not be reached; propagated unchanged
    #[error("Backing store unavailable: {reason}")]
    Unavailable {
        /// Transport failure details
        reason: String,
    },
}

impl MemberError {
    pub fn not_found(resource: &str, id: impl ToString) -> Self {
        Self::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }

    pub fn constraint(reason: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            reason: reason.into(),
        }
    }
}
