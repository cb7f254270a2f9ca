use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Modes with a budget at or below this many seconds show an urgency warning.
const URGENCY_BUDGET_SECS: u32 = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModeError {
    #[error("unknown mode `{0}` (expected easy, medium or hard)")]
    Unknown(String),
}

/// Fixed difficulty preset. Each mode fixes the per-question time budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// 30 seconds per question.
    #[default]
    Easy,
    /// 10 seconds per question.
    Medium,
    /// 5 seconds per question.
    Hard,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Easy, Mode::Medium, Mode::Hard];

    #[must_use]
    pub fn seconds_per_question(self) -> u32 {
        match self {
            Mode::Easy => 30,
            Mode::Medium => 10,
            Mode::Hard => 5,
        }
    }

    /// Time budget for one question.
    #[must_use]
    pub fn time_budget(self) -> Duration {
        Duration::seconds(i64::from(self.seconds_per_question()))
    }

    /// Whether the countdown may flag itself as urgent in this mode.
    #[must_use]
    pub fn warns_when_low(self) -> bool {
        self.seconds_per_question() <= URGENCY_BUDGET_SECS
    }

    /// Stable lowercase key, as accepted by `FromStr`.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Mode::Easy => "easy",
            Mode::Medium => "medium",
            Mode::Hard => "hard",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Mode::Easy => "Lätt",
            Mode::Medium => "Medium",
            Mode::Hard => "Svår",
        }
    }
}

impl FromStr for Mode {
    type Err = ModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Mode::ALL
            .into_iter()
            .find(|mode| mode.key().eq_ignore_ascii_case(key))
            .ok_or_else(|| ModeError::Unknown(key.to_owned()))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budgets_match_presets() {
        assert_eq!(Mode::Easy.time_budget(), Duration::seconds(30));
        assert_eq!(Mode::Medium.time_budget(), Duration::seconds(10));
        assert_eq!(Mode::Hard.time_budget(), Duration::seconds(5));
    }

    #[test]
    fn only_short_budgets_warn() {
        assert!(!Mode::Easy.warns_when_low());
        assert!(Mode::Medium.warns_when_low());
        assert!(Mode::Hard.warns_when_low());
    }

    #[test]
    fn parses_keys_case_insensitively() {
        assert_eq!(" Hard ".parse::<Mode>().unwrap(), Mode::Hard);
        assert_eq!("MEDIUM".parse::<Mode>().unwrap(), Mode::Medium);
        assert_eq!(
            "nightmare".parse::<Mode>().unwrap_err(),
            ModeError::Unknown("nightmare".into())
        );
    }
}
