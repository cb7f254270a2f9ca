use std::fmt;

use chrono::Duration;
use log::{debug, info, warn};
use rand::Rng;
use rand::rngs::ThreadRng;

use drill_core::generator::RoundGenerator;
use drill_core::model::{Mode, Question, RoundLength, RoundOutcome, RoundSettings};
use drill_core::time::{Countdown, URGENT_FRACTION};

use super::progress::RoundProgress;
use super::round::Round;
use super::state::{RoundPhase, Submission, Verdict};
use crate::answer::parse_answer;
use crate::error::RoundError;
use crate::events::{EventSink, RoundEvent};
use crate::scheduler::{FiredTimer, Scheduler, TimerKind, TimerQueue, TimerToken};

/// Interval between countdown refreshes.
pub const TICK_INTERVAL_MS: i64 = 50;
/// Pause after a correct answer; can be skipped by acknowledging.
pub const CORRECT_ADVANCE_DELAY_MS: i64 = 900;
/// Pause after a wrong answer or timeout while the correct answer is shown.
pub const INCORRECT_ADVANCE_DELAY_MS: i64 = 1500;

#[derive(Debug, Clone, Copy)]
struct ArmedCountdown {
    token: TimerToken,
    countdown: Countdown,
}

#[derive(Debug, Clone, Copy)]
struct PendingAdvance {
    token: TimerToken,
    kind: TimerKind,
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Drives a timed round: question sequencing, countdown, scoring and the
/// post-answer pauses.
///
/// The controller never renders anything. It reports through an `EventSink`
/// and schedules all of its delays through a `Scheduler`. It holds at most one
/// countdown timer and one pending advancement at a time, and cancels both
/// before any transition that supersedes them. A fired timer whose token is
/// no longer held is dropped.
pub struct RoundController<S, E, R = ThreadRng> {
    scheduler: S,
    events: E,
    generator: RoundGenerator<R>,
    settings: RoundSettings,
    round: Option<Round>,
    phase: RoundPhase,
    countdown: Option<ArmedCountdown>,
    pending_advance: Option<PendingAdvance>,
    outcome: Option<RoundOutcome>,
}

impl<S: Scheduler, E: EventSink> RoundController<S, E, ThreadRng> {
    #[must_use]
    pub fn new(scheduler: S, events: E) -> Self {
        Self::with_generator(scheduler, events, RoundGenerator::new())
    }
}

impl<S: Scheduler, E: EventSink, R: Rng> RoundController<S, E, R> {
    #[must_use]
    pub fn with_generator(scheduler: S, events: E, generator: RoundGenerator<R>) -> Self {
        Self {
            scheduler,
            events,
            generator,
            settings: RoundSettings::default(),
            round: None,
            phase: RoundPhase::Idle,
            countdown: None,
            pending_advance: None,
            outcome: None,
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: RoundSettings) -> Self {
        self.settings = settings;
        self
    }

    // ─── accessors ────────────────────────────────────────────────────────────

    #[must_use]
    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    #[must_use]
    pub fn settings(&self) -> &RoundSettings {
        &self.settings
    }

    #[must_use]
    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            RoundPhase::Idle | RoundPhase::RoundComplete => None,
            _ => self.round.as_ref().and_then(Round::current_question),
        }
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.round.as_ref().map_or(0, Round::score)
    }

    #[must_use]
    pub fn progress(&self) -> RoundProgress {
        self.round
            .as_ref()
            .map(Round::progress)
            .unwrap_or_default()
    }

    /// Outcome of the last completed round, until a new one starts.
    #[must_use]
    pub fn outcome(&self) -> Option<&RoundOutcome> {
        self.outcome.as_ref()
    }

    /// The running countdown, if a question is awaiting an answer.
    #[must_use]
    pub fn countdown(&self) -> Option<Countdown> {
        self.countdown.map(|armed| armed.countdown)
    }

    #[must_use]
    pub fn has_pending_advance(&self) -> bool {
        self.pending_advance.is_some()
    }

    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    #[must_use]
    pub fn events(&self) -> &E {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }

    // ─── configuration ───────────────────────────────────────────────────────

    /// Select the mode used by `start_selected`.
    ///
    /// # Errors
    ///
    /// Returns `RoundError::Mode` and keeps the current mode if `raw` is unknown.
    pub fn select_mode(&mut self, raw: &str) -> Result<Mode, RoundError> {
        self.settings.select_mode(raw).map_err(|err| {
            warn!("ignoring mode selection: {err}");
            RoundError::from(err)
        })
    }

    /// Select the round length applied to the next `start_selected` or `restart`.
    ///
    /// # Errors
    ///
    /// Returns `RoundError::RoundLength` and keeps the current length if
    /// `count` is not a supported round length.
    pub fn select_round_length(&mut self, count: u32) -> Result<RoundLength, RoundError> {
        self.settings.select_round_length(count).map_err(|err| {
            warn!("ignoring round length selection: {err}");
            RoundError::from(err)
        })
    }

    // ─── round lifecycle ─────────────────────────────────────────────────────

    /// Start a fresh round of `question_count` questions in `mode`.
    ///
    /// Any countdown or pending advancement from a previous round is
    /// cancelled first. Counts above 100 are clamped by the generator.
    ///
    /// # Errors
    ///
    /// Returns `RoundError::EmptyRound` if `question_count` is zero.
    pub fn start_round(&mut self, mode: Mode, question_count: usize) -> Result<(), RoundError> {
        if question_count == 0 {
            return Err(RoundError::EmptyRound);
        }

        self.cancel_timers();
        self.settings.set_mode(mode);
        self.outcome = None;

        let questions = self.generator.generate(question_count);
        info!(
            "starting {} round with {} questions ({}s each)",
            mode,
            questions.len(),
            mode.seconds_per_question()
        );
        self.round = Some(Round::new(mode, questions));
        self.phase = RoundPhase::AwaitingAnswer;
        self.present_question();
        self.arm_countdown();
        Ok(())
    }

    /// Start a round with the selected mode and round length.
    ///
    /// # Errors
    ///
    /// See `start_round`.
    pub fn start_selected(&mut self) -> Result<(), RoundError> {
        let mode = self.settings.mode();
        let count = self.settings.round_length().get();
        self.start_round(mode, count)
    }

    /// Play again: a fresh round in the previous round's mode.
    ///
    /// # Errors
    ///
    /// Returns `RoundError::NoRoundToRestart` if no round has been started.
    pub fn restart(&mut self) -> Result<(), RoundError> {
        let mode = self
            .round
            .as_ref()
            .map(Round::mode)
            .ok_or(RoundError::NoRoundToRestart)?;
        self.start_round(mode, self.settings.round_length().get())
    }

    /// Leave the current round and return to `Idle`.
    pub fn abandon(&mut self) {
        self.cancel_timers();
        self.round = None;
        self.outcome = None;
        self.phase = RoundPhase::Idle;
    }

    // ─── player input ─────────────────────────────────────────────────────────

    /// Submit a typed answer for the current question.
    ///
    /// Input that does not parse as a number is rejected without touching the
    /// countdown, so the player can retry.
    pub fn submit_answer(&mut self, raw: &str) -> Submission {
        if self.phase != RoundPhase::AwaitingAnswer {
            return Submission::Ignored;
        }
        let Some(value) = parse_answer(raw) else {
            debug!("rejecting non-numeric answer {raw:?}");
            return Submission::Rejected;
        };
        let Some(question) = self.round.as_ref().and_then(Round::current_question).copied() else {
            return Submission::Ignored;
        };

        self.stop_countdown();

        if question.is_correct(value) {
            let score = match self.round.as_mut() {
                Some(round) => {
                    round.record_correct();
                    round.score()
                }
                None => 0,
            };
            self.phase = RoundPhase::Evaluating(Verdict::Correct);
            self.events.emit(RoundEvent::AnsweredCorrect { score });
            self.schedule_advance(TimerKind::AdvanceAfterCorrect);
            Submission::Correct
        } else {
            self.reveal_answer(question, Verdict::Incorrect);
            Submission::Incorrect
        }
    }

    /// Skip the remainder of the pause after a correct answer.
    ///
    /// Returns true if this advanced the round.
    pub fn acknowledge_correct(&mut self) -> bool {
        if self.phase != RoundPhase::Evaluating(Verdict::Correct) {
            return false;
        }
        match self.pending_advance.take() {
            Some(pending) if pending.kind == TimerKind::AdvanceAfterCorrect => {
                self.scheduler.cancel(pending.token);
                self.advance();
                true
            }
            other => {
                self.pending_advance = other;
                false
            }
        }
    }

    // ─── timers ───────────────────────────────────────────────────────────────

    /// Handle a timer fired by the scheduler.
    pub fn on_timer(&mut self, fired: FiredTimer) {
        match fired.kind {
            TimerKind::CountdownTick => self.handle_tick(fired.token),
            TimerKind::AdvanceAfterCorrect | TimerKind::AdvanceAfterIncorrect => {
                match self.pending_advance {
                    Some(pending) if pending.token == fired.token => {
                        self.pending_advance = None;
                        self.advance();
                    }
                    _ => debug!("dropping stale {:?} timer {}", fired.kind, fired.token.value()),
                }
            }
        }
    }

    /// Deliver every due timer. Returns how many fired.
    pub fn poll_timers(&mut self) -> usize {
        let mut fired = 0;
        while let Some(timer) = self.scheduler.pop_due() {
            self.on_timer(timer);
            fired += 1;
        }
        fired
    }

    fn handle_tick(&mut self, token: TimerToken) {
        let Some(armed) = self.countdown.filter(|armed| armed.token == token) else {
            debug!("dropping stale countdown tick {}", token.value());
            return;
        };
        if self.phase != RoundPhase::AwaitingAnswer {
            self.countdown = None;
            return;
        }

        let now = self.scheduler.now();
        self.emit_tick(&armed.countdown);

        if armed.countdown.is_expired(now) {
            self.countdown = None;
            self.time_out();
        } else {
            let delay = armed
                .countdown
                .remaining(now)
                .min(Duration::milliseconds(TICK_INTERVAL_MS));
            let token = self.scheduler.schedule(delay, TimerKind::CountdownTick);
            self.countdown = Some(ArmedCountdown {
                token,
                countdown: armed.countdown,
            });
        }
    }

    fn time_out(&mut self) {
        let Some(question) = self.round.as_ref().and_then(Round::current_question).copied() else {
            return;
        };
        debug!("question {question} timed out");
        self.reveal_answer(question, Verdict::TimedOut);
    }

    // ─── transitions ──────────────────────────────────────────────────────────

    fn reveal_answer(&mut self, question: Question, verdict: Verdict) {
        self.phase = RoundPhase::Evaluating(verdict);
        self.events.emit(RoundEvent::AnsweredIncorrect {
            correct_answer: question.answer(),
            timed_out: verdict == Verdict::TimedOut,
        });
        self.schedule_advance(TimerKind::AdvanceAfterIncorrect);
    }

    fn advance(&mut self) {
        let Some(round) = self.round.as_mut() else {
            return;
        };
        if round.advance() {
            self.finish_round();
        } else {
            self.phase = RoundPhase::AwaitingAnswer;
            self.present_question();
            self.arm_countdown();
        }
    }

    fn finish_round(&mut self) {
        self.cancel_timers();
        self.phase = RoundPhase::RoundComplete;
        let Some(outcome) = self.round.as_ref().map(Round::outcome) else {
            return;
        };
        info!(
            "round complete: {}/{} correct",
            outcome.score(),
            outcome.total()
        );
        self.outcome = Some(outcome);
        self.events.emit(RoundEvent::RoundComplete { outcome });
    }

    fn present_question(&mut self) {
        let Some(round) = self.round.as_ref() else {
            return;
        };
        let Some(question) = round.current_question() else {
            return;
        };
        let event = RoundEvent::QuestionChanged {
            a: question.a(),
            b: question.b(),
            index: round.current_index(),
            total: round.total(),
            score: round.score(),
        };
        self.events.emit(event);
    }

    fn arm_countdown(&mut self) {
        self.stop_countdown();
        let Some(mode) = self.round.as_ref().map(Round::mode) else {
            return;
        };
        let countdown = Countdown::start(self.scheduler.now(), mode.time_budget());
        self.emit_tick(&countdown);

        let delay = countdown
            .budget()
            .min(Duration::milliseconds(TICK_INTERVAL_MS));
        let token = self.scheduler.schedule(delay, TimerKind::CountdownTick);
        self.countdown = Some(ArmedCountdown { token, countdown });
    }

    fn emit_tick(&mut self, countdown: &Countdown) {
        let now = self.scheduler.now();
        let remaining_fraction = countdown.remaining_fraction(now);
        let warns = self
            .round
            .as_ref()
            .is_some_and(|round| round.mode().warns_when_low());
        self.events.emit(RoundEvent::Tick {
            remaining_fraction,
            remaining_seconds: countdown.remaining_seconds(now),
            urgent: warns && remaining_fraction < URGENT_FRACTION,
        });
    }

    fn schedule_advance(&mut self, kind: TimerKind) {
        self.cancel_pending_advance();
        let delay_ms = match kind {
            TimerKind::AdvanceAfterCorrect => CORRECT_ADVANCE_DELAY_MS,
            _ => INCORRECT_ADVANCE_DELAY_MS,
        };
        let token = self
            .scheduler
            .schedule(Duration::milliseconds(delay_ms), kind);
        self.pending_advance = Some(PendingAdvance { token, kind });
    }

    fn stop_countdown(&mut self) {
        if let Some(armed) = self.countdown.take() {
            self.scheduler.cancel(armed.token);
        }
    }

    fn cancel_pending_advance(&mut self) {
        if let Some(pending) = self.pending_advance.take() {
            self.scheduler.cancel(pending.token);
        }
    }

    fn cancel_timers(&mut self) {
        self.stop_countdown();
        self.cancel_pending_advance();
    }
}

impl<E: EventSink, R: Rng> RoundController<TimerQueue, E, R> {
    /// Move a fixed-clock queue forward by `delta`, firing every timer that
    /// falls due on the way in deadline order.
    ///
    /// Timers scheduled by a firing are honoured if they also fall inside the
    /// window. With a system clock this only delivers timers already due.
    pub fn advance_time(&mut self, delta: Duration) {
        if !self.scheduler.clock().is_fixed() {
            self.poll_timers();
            return;
        }
        let target = self.scheduler.now() + delta;
        while let Some(due) = self.scheduler.next_deadline() {
            if due > target {
                break;
            }
            self.scheduler.advance_clock_to(due);
            self.poll_timers();
        }
        self.scheduler.advance_clock_to(target);
    }
}

impl<S, E, R> fmt::Debug for RoundController<S, E, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoundController")
            .field("phase", &self.phase)
            .field("settings", &self.settings)
            .field("round", &self.round)
            .field("countdown", &self.countdown)
            .field("pending_advance", &self.pending_advance)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
