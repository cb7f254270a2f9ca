use chrono::{DateTime, Duration, Utc};

/// A simple clock abstraction so countdowns can run against real or test time.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock that uses the current system time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// If this is a fixed clock, advance it by the given duration.
    ///
    /// Has no effect on `Clock::Default`.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }

    /// Move a fixed clock forward to `at`. Never moves it backwards.
    pub fn advance_to(&mut self, at: DateTime<Utc>) {
        if let Clock::Fixed(t) = self {
            if at > *t {
                *t = at;
            }
        }
    }

    #[must_use]
    pub fn is_fixed(&self) -> bool {
        matches!(self, Clock::Fixed(_))
    }
}

//
// ─── COUNTDOWN ─────────────────────────────────────────────────────────────────
//

/// Below this share of the budget a countdown in a short-budget mode is urgent.
pub const URGENT_FRACTION: f64 = 0.3;

/// Deadline arithmetic for one question's time budget.
///
/// Remaining time is clamped at zero; it never goes negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    started_at: DateTime<Utc>,
    deadline: DateTime<Utc>,
    budget: Duration,
}

impl Countdown {
    #[must_use]
    pub fn start(now: DateTime<Utc>, budget: Duration) -> Self {
        Self {
            started_at: now,
            deadline: now + budget,
            budget,
        }
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    #[must_use]
    pub fn budget(&self) -> Duration {
        self.budget
    }

    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.deadline - now).max(Duration::zero())
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.remaining(now).is_zero()
    }

    /// Remaining share of the budget in `[0, 1]`, for a progress bar.
    #[must_use]
    pub fn remaining_fraction(&self, now: DateTime<Utc>) -> f64 {
        let budget_ms = self.budget.num_milliseconds();
        if budget_ms <= 0 {
            return 0.0;
        }
        self.remaining(now).num_milliseconds() as f64 / budget_ms as f64
    }

    /// Remaining whole seconds, rounded up, for a numeric display.
    #[must_use]
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> u32 {
        let ms = self.remaining(now).num_milliseconds();
        u32::try_from((ms + 999) / 1000).unwrap_or(u32::MAX)
    }
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}
