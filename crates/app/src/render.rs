use std::io::{self, Stdout, Write};

use drill_core::model::RoundOutcome;
use services::RoundEvent;

pub const CONTROLS: &str =
    "Enter: play again · m <easy|medium|hard>: change mode · n <5|10|15|20>: round length · q: quit";

/// Terminal presentation of the round event stream.
pub struct Renderer {
    json: bool,
    last_seconds: Option<u32>,
    out: Stdout,
}

impl Renderer {
    #[must_use]
    pub fn new(json: bool) -> Self {
        Self {
            json,
            last_seconds: None,
            out: io::stdout(),
        }
    }

    pub fn render(&mut self, event: &RoundEvent) -> io::Result<()> {
        if self.json {
            let line = serde_json::to_string(event)?;
            writeln!(self.out, "{line}")?;
            return self.out.flush();
        }

        match event {
            RoundEvent::QuestionChanged {
                a,
                b,
                index,
                total,
                score,
            } => {
                self.last_seconds = None;
                writeln!(self.out)?;
                writeln!(self.out, "[{}/{total}] poäng {score}", index + 1)?;
                writeln!(self.out, "  {a} × {b} = ?")?;
            }
            RoundEvent::Tick {
                remaining_seconds,
                urgent,
                ..
            } => {
                // Only redraw when the displayed whole seconds change.
                if self.last_seconds != Some(*remaining_seconds) {
                    self.last_seconds = Some(*remaining_seconds);
                    let marker = if *urgent { " !" } else { "" };
                    write!(self.out, "\r  ⏱ {remaining_seconds:>2}s{marker}  ")?;
                }
            }
            RoundEvent::AnsweredCorrect { score } => {
                writeln!(self.out, "\n  ✓ Rätt! ({score}) [Enter]")?;
            }
            RoundEvent::AnsweredIncorrect {
                correct_answer,
                timed_out,
            } => {
                let lead = if *timed_out { "⌛ Tiden är slut." } else { "✗ Fel." };
                writeln!(self.out, "\n  {lead} Rätt svar: {correct_answer}")?;
            }
            RoundEvent::RoundComplete { outcome } => {
                self.render_outcome(outcome)?;
                writeln!(self.out, "{CONTROLS}")?;
            }
        }
        self.out.flush()
    }

    pub fn note(&mut self, message: &str) -> io::Result<()> {
        if self.json {
            return Ok(());
        }
        writeln!(self.out, "\n  {message}")?;
        self.out.flush()
    }

    fn render_outcome(&mut self, outcome: &RoundOutcome) -> io::Result<()> {
        writeln!(self.out)?;
        match outcome {
            RoundOutcome::Celebration { total, message, .. } => {
                writeln!(self.out, "🎉 {total} / {total}")?;
                writeln!(self.out, "{message}")
            }
            RoundOutcome::Results {
                score,
                total,
                message,
                ..
            } => {
                writeln!(self.out, "{score} / {total}")?;
                writeln!(self.out, "{message}")
            }
        }
    }
}
