mod controller;
mod progress;
mod round;
mod state;

pub use controller::{
    CORRECT_ADVANCE_DELAY_MS, INCORRECT_ADVANCE_DELAY_MS, RoundController, TICK_INTERVAL_MS,
};
pub use progress::RoundProgress;
pub use round::Round;
pub use state::{RoundPhase, Submission, Verdict};
