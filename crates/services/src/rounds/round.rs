use std::fmt;

use drill_core::model::{Mode, Question, RoundOutcome};

use super::progress::RoundProgress;

/// Questions and counters of one round.
///
/// `current_index` stays within `0..=questions.len()` and `score` never
/// exceeds the number of questions already answered.
pub struct Round {
    mode: Mode,
    questions: Vec<Question>,
    current_index: usize,
    score: usize,
}

impl Round {
    pub(crate) fn new(mode: Mode, questions: Vec<Question>) -> Self {
        Self {
            mode,
            questions,
            current_index: 0,
            score: 0,
        }
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn seconds_per_question(&self) -> u32 {
        self.mode.seconds_per_question()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.current_index >= self.questions.len()
    }

    #[must_use]
    pub fn progress(&self) -> RoundProgress {
        RoundProgress {
            total: self.total(),
            index: self.current_index,
            score: self.score,
            remaining: self.total().saturating_sub(self.current_index),
            is_complete: self.is_exhausted(),
        }
    }

    #[must_use]
    pub fn outcome(&self) -> RoundOutcome {
        RoundOutcome::from_score(self.score, self.total())
    }

    pub(crate) fn record_correct(&mut self) {
        if self.score <= self.current_index && !self.is_exhausted() {
            self.score += 1;
        }
    }

    /// Step to the next question. Returns true when the round is exhausted.
    pub(crate) fn advance(&mut self) -> bool {
        if !self.is_exhausted() {
            self.current_index += 1;
        }
        self.is_exhausted()
    }
}

impl fmt::Debug for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Round")
            .field("mode", &self.mode)
            .field("questions_len", &self.questions.len())
            .field("current_index", &self.current_index)
            .field("score", &self.score)
            .finish_non_exhaustive()
    }
}
