use thiserror::Error;

use crate::model::{ModeError, QuestionError, RoundLengthError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Mode(#[from] ModeError),
    #[error(transparent)]
    RoundLength(#[from] RoundLengthError),
}
