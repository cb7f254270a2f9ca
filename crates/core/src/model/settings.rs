use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::mode::{Mode, ModeError};

//
// ─── ROUND LENGTH ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoundLengthError {
    #[error("unsupported round length {0} (expected 5, 10, 15 or 20)")]
    Unsupported(u32),
    #[error("round length must be a number, got `{0}`")]
    NotANumber(String),
}

/// Number of questions in a round, restricted to the lengths a player can pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct RoundLength(u32);

impl RoundLength {
    pub const SUPPORTED: [u32; 4] = [5, 10, 15, 20];
    pub const DEFAULT: u32 = 20;

    /// # Errors
    ///
    /// Returns `RoundLengthError::Unsupported` for anything outside `SUPPORTED`.
    pub fn new(count: u32) -> Result<Self, RoundLengthError> {
        if Self::SUPPORTED.contains(&count) {
            Ok(Self(count))
        } else {
            Err(RoundLengthError::Unsupported(count))
        }
    }

    #[must_use]
    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl Default for RoundLength {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<u32> for RoundLength {
    type Error = RoundLengthError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoundLength> for u32 {
    fn from(value: RoundLength) -> Self {
        value.0
    }
}

impl FromStr for RoundLength {
    type Err = RoundLengthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let count = raw
            .parse::<u32>()
            .map_err(|_| RoundLengthError::NotANumber(raw.to_owned()))?;
        Self::new(count)
    }
}

impl fmt::Display for RoundLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Player-selected configuration applied to the next round.
///
/// Selection methods validate their input and leave the previous value in
/// place when it is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoundSettings {
    mode: Mode,
    round_length: RoundLength,
}

impl RoundSettings {
    #[must_use]
    pub fn new(mode: Mode, round_length: RoundLength) -> Self {
        Self { mode, round_length }
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn round_length(&self) -> RoundLength {
        self.round_length
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// # Errors
    ///
    /// Returns `ModeError::Unknown` and keeps the current mode if `raw` names no mode.
    pub fn select_mode(&mut self, raw: &str) -> Result<Mode, ModeError> {
        let mode = raw.parse::<Mode>()?;
        self.mode = mode;
        Ok(mode)
    }

    /// # Errors
    ///
    /// Returns `RoundLengthError::Unsupported` and keeps the current length if
    /// `count` is not one of the supported lengths.
    pub fn select_round_length(&mut self, count: u32) -> Result<RoundLength, RoundLengthError> {
        let length = RoundLength::new(count)?;
        self.round_length = length;
        Ok(length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_easy_twenty() {
        let settings = RoundSettings::default();
        assert_eq!(settings.mode(), Mode::Easy);
        assert_eq!(settings.round_length().get(), 20);
    }

    #[test]
    fn rejected_selection_keeps_previous_value() {
        let mut settings = RoundSettings::default();
        settings.select_round_length(10).unwrap();
        settings.select_mode("hard").unwrap();

        assert!(settings.select_round_length(7).is_err());
        assert!(settings.select_mode("impossible").is_err());

        assert_eq!(settings.round_length().get(), 10);
        assert_eq!(settings.mode(), Mode::Hard);
    }

    #[test]
    fn round_length_parses_from_text() {
        assert_eq!("15".parse::<RoundLength>().unwrap().get(), 15);
        assert_eq!(
            "ten".parse::<RoundLength>().unwrap_err(),
            RoundLengthError::NotANumber("ten".into())
        );
        assert_eq!(
            "0".parse::<RoundLength>().unwrap_err(),
            RoundLengthError::Unsupported(0)
        );
    }

    #[test]
    fn round_length_deserialization_is_validated() {
        let ok: RoundLength = serde_json::from_str("5").unwrap();
        assert_eq!(ok.get(), 5);
        assert!(serde_json::from_str::<RoundLength>("6").is_err());
    }
}
