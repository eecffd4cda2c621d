//! Common state machine error types
//!
//! Shared across all domain crates that implement state machines.

use thiserror::Error;

use crate::Error as AppError;

/// Errors that can occur during state transitions
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("Illegal transition: {actor} cannot move from {from} to {to}")]
    IllegalTransition {
        from: String,
        to: String,
        actor: String,
    },

    #[error("Terminal state: {0} is a terminal state and cannot transition")]
    TerminalState(String),
}

impl StateError {
    /// Machine-checkable code surfaced to API callers
    pub fn code(&self) -> &'static str {
        match self {
            StateError::IllegalTransition { .. } | StateError::TerminalState(_) => {
                "ILLEGAL_TRANSITION"
            }
        }
    }
}

impl From<StateError> for AppError {
    fn from(err: StateError) -> Self {
        AppError::rejected(err.code(), err.to_string())
    }
}
