use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest factor of the multiplication table.
pub const MIN_FACTOR: u8 = 1;
/// Largest factor of the multiplication table.
pub const MAX_FACTOR: u8 = 10;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestionError {
    #[error("factor must be between 1 and 10, got {0}")]
    FactorOutOfRange(u8),
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiplication question from the 10×10 table.
///
/// Immutable once created; the answer is always `a * b`.
///
/// # Examples
///
/// ```
/// # use drill_core::model::Question;
/// let q = Question::new(7, 8)?;
/// assert_eq!(q.answer(), 56);
/// assert_eq!(q.to_string(), "7 × 8 = ?");
/// # Ok::<(), drill_core::model::QuestionError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Question {
    a: u8,
    b: u8,
    answer: u16,
}

impl Question {
    /// Creates a question for `a × b`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::FactorOutOfRange` if either factor is outside `1..=10`.
    pub fn new(a: u8, b: u8) -> Result<Self, QuestionError> {
        for factor in [a, b] {
            if !(MIN_FACTOR..=MAX_FACTOR).contains(&factor) {
                return Err(QuestionError::FactorOutOfRange(factor));
            }
        }
        Ok(Self {
            a,
            b,
            answer: u16::from(a) * u16::from(b),
        })
    }

    #[must_use]
    pub fn a(&self) -> u8 {
        self.a
    }

    #[must_use]
    pub fn b(&self) -> u8 {
        self.b
    }

    #[must_use]
    pub fn answer(&self) -> u16 {
        self.answer
    }

    /// The `(a, b)` pair identifying this question within a round.
    #[must_use]
    pub fn pair(&self) -> (u8, u8) {
        (self.a, self.b)
    }

    #[must_use]
    pub fn is_correct(&self, value: i64) -> bool {
        value == i64::from(self.answer)
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} × {} = ?", self.a, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_is_product() {
        let q = Question::new(9, 6).unwrap();
        assert_eq!(q.answer(), 54);
        assert_eq!(q.pair(), (9, 6));
        assert!(q.is_correct(54));
        assert!(!q.is_correct(45));
    }

    #[test]
    fn rejects_factors_outside_table() {
        assert_eq!(
            Question::new(0, 5).unwrap_err(),
            QuestionError::FactorOutOfRange(0)
        );
        assert_eq!(
            Question::new(3, 11).unwrap_err(),
            QuestionError::FactorOutOfRange(11)
        );
    }

    #[test]
    fn negative_guess_is_never_correct() {
        let q = Question::new(1, 1).unwrap();
        assert!(!q.is_correct(-1));
    }
}
