#![forbid(unsafe_code)]

pub mod error;
pub mod generator;
pub mod model;
pub mod time;

pub use error::Error;
pub use generator::RoundGenerator;
pub use time::{Clock, Countdown};
