#![forbid(unsafe_code)]

pub mod answer;
pub mod error;
pub mod events;
pub mod rounds;
pub mod scheduler;

pub use drill_core::Clock;

pub use error::RoundError;
pub use events::{EventSink, RoundEvent};
pub use rounds::{Round, RoundController, RoundPhase, RoundProgress, Submission, Verdict};
pub use scheduler::{FiredTimer, Scheduler, TimerKind, TimerQueue, TimerToken};
