//! Timer scheduling capability injected into the round controller.
//!
//! Timers do not own callbacks. Each entry carries a `TimerKind`, and the host
//! hands fired timers back to the controller, which only acts on tokens it
//! still holds.

use chrono::{DateTime, Duration, Utc};
use log::debug;

use drill_core::Clock;

/// Handle identifying one scheduled timer. Tokens are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

impl TimerToken {
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// What a timer is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Periodic countdown refresh; re-armed after each tick.
    CountdownTick,
    /// Delay after a correct answer. Can be cut short by acknowledging.
    AdvanceAfterCorrect,
    /// Delay after a wrong answer or a timeout.
    AdvanceAfterIncorrect,
}

/// A timer whose deadline has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredTimer {
    pub token: TimerToken,
    pub kind: TimerKind,
}

pub trait Scheduler {
    /// Current time as seen by this scheduler.
    fn now(&self) -> DateTime<Utc>;

    /// Schedule a one-shot timer `delay` from now.
    fn schedule(&mut self, delay: Duration, kind: TimerKind) -> TimerToken;

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    fn cancel(&mut self, token: TimerToken) -> bool;

    /// Remove and return the earliest timer that is due, if any.
    fn pop_due(&mut self) -> Option<FiredTimer>;
}

//
// ─── TIMER QUEUE ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    token: TimerToken,
    kind: TimerKind,
    due: DateTime<Utc>,
}

/// Pending one-shot timers ordered by deadline, measured against a `Clock`.
///
/// With `Clock::Default` this tracks wall time and the host sleeps until
/// `next_deadline()`. With a fixed clock nothing fires until the clock is
/// moved, which gives tests full control over time.
#[derive(Debug, Clone)]
pub struct TimerQueue {
    clock: Clock,
    next_token: u64,
    pending: Vec<PendingTimer>,
}

impl TimerQueue {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            next_token: 1,
            pending: Vec::new(),
        }
    }

    /// Queue driven by system time.
    #[must_use]
    pub fn system() -> Self {
        Self::new(Clock::default_clock())
    }

    /// Queue driven by a fixed clock starting at `start`.
    #[must_use]
    pub fn manual(start: DateTime<Utc>) -> Self {
        Self::new(Clock::fixed(start))
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Number of timers that have neither fired nor been cancelled.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn pending_kinds(&self) -> Vec<TimerKind> {
        self.pending.iter().map(|timer| timer.kind).collect()
    }

    /// Deadline of the earliest pending timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.earliest().map(|idx| self.pending[idx].due)
    }

    /// Move a fixed clock forward. No effect on a system clock.
    pub fn advance_clock_to(&mut self, at: DateTime<Utc>) {
        self.clock.advance_to(at);
    }

    fn earliest(&self) -> Option<usize> {
        self.pending
            .iter()
            .enumerate()
            .min_by_key(|(_, timer)| (timer.due, timer.token))
            .map(|(idx, _)| idx)
    }
}

impl Scheduler for TimerQueue {
    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn schedule(&mut self, delay: Duration, kind: TimerKind) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        let due = self.clock.now() + delay.max(Duration::zero());
        self.pending.push(PendingTimer { token, kind, due });
        token
    }

    fn cancel(&mut self, token: TimerToken) -> bool {
        let before = self.pending.len();
        self.pending.retain(|timer| timer.token != token);
        let removed = self.pending.len() < before;
        if removed {
            debug!("cancelled timer {}", token.value());
        }
        removed
    }

    fn pop_due(&mut self) -> Option<FiredTimer> {
        let idx = self.earliest()?;
        if self.pending[idx].due > self.clock.now() {
            return None;
        }
        let timer = self.pending.swap_remove(idx);
        Some(FiredTimer {
            token: timer.token,
            kind: timer.kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drill_core::time::fixed_now;

    #[test]
    fn fires_in_deadline_order_once_due() {
        let mut queue = TimerQueue::manual(fixed_now());
        let late = queue.schedule(Duration::milliseconds(1500), TimerKind::AdvanceAfterIncorrect);
        let early = queue.schedule(Duration::milliseconds(50), TimerKind::CountdownTick);

        assert_eq!(queue.pop_due(), None);
        assert_eq!(
            queue.next_deadline(),
            Some(fixed_now() + Duration::milliseconds(50))
        );

        queue.advance_clock_to(fixed_now() + Duration::seconds(2));
        assert_eq!(queue.pop_due().map(|t| t.token), Some(early));
        assert_eq!(queue.pop_due().map(|t| t.token), Some(late));
        assert_eq!(queue.pop_due(), None);
    }

    #[test]
    fn equal_deadlines_fire_in_scheduling_order() {
        let mut queue = TimerQueue::manual(fixed_now());
        let first = queue.schedule(Duration::milliseconds(900), TimerKind::AdvanceAfterCorrect);
        let second = queue.schedule(Duration::milliseconds(900), TimerKind::CountdownTick);

        queue.advance_clock_to(fixed_now() + Duration::milliseconds(900));
        assert_eq!(queue.pop_due().map(|t| t.token), Some(first));
        assert_eq!(queue.pop_due().map(|t| t.token), Some(second));
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let mut queue = TimerQueue::manual(fixed_now());
        let token = queue.schedule(Duration::milliseconds(900), TimerKind::AdvanceAfterCorrect);

        assert!(queue.cancel(token));
        assert!(!queue.cancel(token));
        assert_eq!(queue.pending_len(), 0);

        queue.advance_clock_to(fixed_now() + Duration::seconds(1));
        assert_eq!(queue.pop_due(), None);
    }

    #[test]
    fn tokens_are_unique() {
        let mut queue = TimerQueue::manual(fixed_now());
        let a = queue.schedule(Duration::zero(), TimerKind::CountdownTick);
        let b = queue.schedule(Duration::zero(), TimerKind::CountdownTick);
        assert_ne!(a, b);
        assert_eq!(queue.pending_kinds(), vec![TimerKind::CountdownTick; 2]);
    }
}
