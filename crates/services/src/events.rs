use serde::Serialize;

use drill_core::model::RoundOutcome;

/// Discrete notifications emitted by the round controller for a presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RoundEvent {
    /// A new question is active. `index` is zero-based.
    QuestionChanged {
        a: u8,
        b: u8,
        index: usize,
        total: usize,
        score: usize,
    },
    Tick {
        remaining_fraction: f64,
        remaining_seconds: u32,
        urgent: bool,
    },
    AnsweredCorrect {
        score: usize,
    },
    /// Wrong answer or timeout; both disclose the correct answer.
    AnsweredIncorrect {
        correct_answer: u16,
        timed_out: bool,
    },
    RoundComplete {
        outcome: RoundOutcome,
    },
}

/// Receiver of round events.
pub trait EventSink {
    fn emit(&mut self, event: RoundEvent);
}

impl EventSink for Vec<RoundEvent> {
    fn emit(&mut self, event: RoundEvent) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn emit(&mut self, event: RoundEvent) {
        (**self).emit(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_camel_case_tags() {
        let json = serde_json::to_value(RoundEvent::AnsweredIncorrect {
            correct_answer: 42,
            timed_out: true,
        })
        .unwrap();
        assert_eq!(json["type"], "answeredIncorrect");
        assert_eq!(json["correctAnswer"], 42);
        assert_eq!(json["timedOut"], true);

        let json = serde_json::to_value(RoundEvent::Tick {
            remaining_fraction: 0.5,
            remaining_seconds: 3,
            urgent: false,
        })
        .unwrap();
        assert_eq!(json["type"], "tick");
        assert_eq!(json["remainingSeconds"], 3);
    }

    #[test]
    fn round_complete_nests_outcome() {
        let json = serde_json::to_value(RoundEvent::RoundComplete {
            outcome: RoundOutcome::from_score(3, 5),
        })
        .unwrap();
        assert_eq!(json["type"], "roundComplete");
        assert_eq!(json["outcome"]["type"], "results");
        assert_eq!(json["outcome"]["score"], 3);
    }

    #[test]
    fn vec_sink_records_in_order() {
        let mut sink: Vec<RoundEvent> = Vec::new();
        sink.emit(RoundEvent::AnsweredCorrect { score: 1 });
        sink.emit(RoundEvent::AnsweredCorrect { score: 2 });
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[1], RoundEvent::AnsweredCorrect { score: 2 });
    }
}
