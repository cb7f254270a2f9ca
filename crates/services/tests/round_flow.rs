use std::collections::HashSet;

use chrono::Duration;
use rand::SeedableRng;
use rand::rngs::StdRng;

use drill_core::generator::RoundGenerator;
use drill_core::model::{Mode, ResultTier, RoundOutcome};
use drill_core::time::fixed_now;
use services::rounds::{CORRECT_ADVANCE_DELAY_MS, INCORRECT_ADVANCE_DELAY_MS};
use services::{RoundController, RoundEvent, RoundPhase, Submission, TimerQueue};

type Controller = RoundController<TimerQueue, Vec<RoundEvent>, StdRng>;

fn controller(seed: u64) -> Controller {
    RoundController::with_generator(
        TimerQueue::manual(fixed_now()),
        Vec::new(),
        RoundGenerator::with_rng(StdRng::seed_from_u64(seed)),
    )
}

fn answer_current(ctl: &mut Controller, correct: bool) -> Submission {
    let expected = ctl.current_question().expect("question is active").answer();
    let typed = if correct { expected } else { expected + 1 };
    ctl.submit_answer(&typed.to_string())
}

/// Play a whole round, answering the first `right` questions correctly.
fn play(ctl: &mut Controller, mode: Mode, total: usize, right: usize) -> RoundOutcome {
    ctl.start_round(mode, total).unwrap();
    for i in 0..total {
        let correct = i < right;
        answer_current(ctl, correct);
        let delay = if correct {
            CORRECT_ADVANCE_DELAY_MS
        } else {
            INCORRECT_ADVANCE_DELAY_MS
        };
        ctl.advance_time(Duration::milliseconds(delay));
    }
    assert_eq!(ctl.phase(), RoundPhase::RoundComplete);
    *ctl.outcome().unwrap()
}

fn count(events: &[RoundEvent], pred: impl Fn(&RoundEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

#[test]
fn round_questions_are_distinct_and_progress_monotonic() {
    let mut ctl = controller(1);
    ctl.start_round(Mode::Easy, 20).unwrap();

    let mut seen = HashSet::new();
    let mut last_index = 0;
    while ctl.phase() != RoundPhase::RoundComplete {
        let q = *ctl.current_question().unwrap();
        assert!(seen.insert(q.pair()), "question {q} repeated");

        let index = ctl.progress().index;
        assert!(index >= last_index);
        last_index = index;

        answer_current(&mut ctl, index % 2 == 0);
        assert!(ctl.score() <= index + 1);
        ctl.advance_time(Duration::milliseconds(INCORRECT_ADVANCE_DELAY_MS));
    }
    assert_eq!(seen.len(), 20);
    assert_eq!(ctl.score(), 10);
}

#[test]
fn outcome_tiers_follow_score_share() {
    let mut ctl = controller(2);

    let perfect = play(&mut ctl, Mode::Hard, 20, 20);
    assert!(perfect.is_celebration());

    let top = play(&mut ctl, Mode::Hard, 20, 18);
    assert_eq!(top.tier(), Some(ResultTier::Top));
    assert_eq!(top.score(), 18);
    assert_eq!(top.total(), 20);

    let mid = play(&mut ctl, Mode::Hard, 20, 15);
    assert_eq!(mid.tier(), Some(ResultTier::Mid));

    let low = play(&mut ctl, Mode::Hard, 20, 10);
    assert_eq!(low.tier(), Some(ResultTier::Encouragement));
    assert_eq!(low.message(), ResultTier::Encouragement.message());
}

#[test]
fn timeout_scores_like_a_wrong_answer() {
    let mut timed = controller(3);
    timed.start_round(Mode::Hard, 1).unwrap();
    let expected = timed.current_question().unwrap().answer();
    timed.advance_time(Duration::seconds(5) + Duration::milliseconds(INCORRECT_ADVANCE_DELAY_MS));

    let mut wrong = controller(3);
    wrong.start_round(Mode::Hard, 1).unwrap();
    answer_current(&mut wrong, false);
    wrong.advance_time(Duration::milliseconds(INCORRECT_ADVANCE_DELAY_MS));

    assert_eq!(timed.outcome(), wrong.outcome());
    assert_eq!(timed.score(), 0);
    assert!(timed.events().contains(&RoundEvent::AnsweredIncorrect {
        correct_answer: expected,
        timed_out: true,
    }));
    assert!(wrong.events().contains(&RoundEvent::AnsweredIncorrect {
        correct_answer: expected,
        timed_out: false,
    }));
}

#[test]
fn unanswered_round_times_out_every_question() {
    let mut ctl = controller(4);
    ctl.start_round(Mode::Hard, 5).unwrap();
    ctl.advance_time(Duration::seconds(60));

    let events = ctl.events();
    assert_eq!(
        count(events, |e| matches!(e, RoundEvent::AnsweredIncorrect { timed_out: true, .. })),
        5
    );
    assert_eq!(count(events, |e| matches!(e, RoundEvent::RoundComplete { .. })), 1);
    assert_eq!(ctl.outcome().unwrap().score(), 0);
}

#[test]
fn acknowledging_never_double_advances() {
    let mut ctl = controller(5);
    ctl.start_round(Mode::Medium, 2).unwrap();

    answer_current(&mut ctl, true);
    assert!(ctl.acknowledge_correct());
    answer_current(&mut ctl, true);
    assert!(ctl.acknowledge_correct());

    ctl.advance_time(Duration::seconds(5));

    let events = ctl.events();
    assert_eq!(count(events, |e| matches!(e, RoundEvent::QuestionChanged { .. })), 2);
    assert_eq!(count(events, |e| matches!(e, RoundEvent::RoundComplete { .. })), 1);
    assert!(ctl.outcome().unwrap().is_celebration());
}

#[test]
fn restarting_with_pending_delay_leaves_no_stale_advance() {
    let mut ctl = controller(6);
    ctl.start_round(Mode::Easy, 1).unwrap();
    answer_current(&mut ctl, true);
    assert!(ctl.has_pending_advance());

    ctl.restart().unwrap();
    ctl.events_mut().clear();

    ctl.advance_time(Duration::seconds(2));
    let events = ctl.events();
    assert_eq!(count(events, |e| matches!(e, RoundEvent::RoundComplete { .. })), 0);
    assert_eq!(count(events, |e| matches!(e, RoundEvent::QuestionChanged { .. })), 0);
    assert_eq!(ctl.phase(), RoundPhase::AwaitingAnswer);
    assert_eq!(ctl.progress().index, 0);
}

#[test]
fn restarting_mid_countdown_runs_a_single_countdown() {
    let mut ctl = controller(7);
    ctl.start_round(Mode::Hard, 3).unwrap();
    ctl.advance_time(Duration::seconds(3));
    ctl.start_round(Mode::Hard, 3).unwrap();
    ctl.events_mut().clear();

    ctl.advance_time(Duration::seconds(5));
    let events = ctl.events();
    assert_eq!(
        count(events, |e| matches!(e, RoundEvent::AnsweredIncorrect { timed_out: true, .. })),
        1
    );
    assert_eq!(count(events, |e| matches!(e, RoundEvent::Tick { .. })), 100);
}
