mod mode;
mod outcome;
mod question;
mod settings;

pub use mode::{Mode, ModeError};
pub use outcome::{CELEBRATION_MESSAGE, ResultTier, RoundOutcome};
pub use question::{MAX_FACTOR, MIN_FACTOR, Question, QuestionError};
pub use settings::{RoundLength, RoundLengthError, RoundSettings};
