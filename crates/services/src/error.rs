//! Shared error types for the services crate.

use thiserror::Error;

use drill_core::model::{ModeError, RoundLengthError};

/// Errors emitted by `RoundController`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RoundError {
    #[error("a round needs at least one question")]
    EmptyRound,
    #[error("no previous round to restart")]
    NoRoundToRestart,
    #[error(transparent)]
    Mode(#[from] ModeError),
    #[error(transparent)]
    RoundLength(#[from] RoundLengthError),
}
