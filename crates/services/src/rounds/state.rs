/// How the question under evaluation was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
    TimedOut,
}

/// Controller state machine.
///
/// `Idle → AwaitingAnswer → Evaluating → AwaitingAnswer | RoundComplete`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundPhase {
    #[default]
    Idle,
    AwaitingAnswer,
    Evaluating(Verdict),
    RoundComplete,
}

impl RoundPhase {
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, RoundPhase::AwaitingAnswer | RoundPhase::Evaluating(_))
    }
}

/// What happened to a submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Not awaiting an answer; nothing changed.
    Ignored,
    /// Input was not a number. The question stays open and the timer keeps running.
    Rejected,
    Correct,
    Incorrect,
}
