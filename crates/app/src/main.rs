use std::fmt;
use std::time::Duration as StdDuration;

use chrono::Utc;
use log::warn;
use tokio::io::{AsyncBufReadExt, BufReader};

use drill_core::model::{Mode, RoundLength, RoundSettings};
use services::{RoundController, RoundEvent, RoundPhase, Submission, TimerQueue, Verdict};

mod render;

use render::Renderer;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidMode { raw: String },
    InvalidQuestions { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidMode { raw } => write!(f, "invalid --mode value: {raw}"),
            ArgsError::InvalidQuestions { raw } => write!(f, "invalid --questions value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--mode <easy|medium|hard>] [--questions <5|10|15|20>] [--json]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --mode easy");
    eprintln!("  --questions 20");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  DRILL_MODE, DRILL_QUESTIONS, RUST_LOG");
}

struct Args {
    settings: RoundSettings,
    json: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut settings = RoundSettings::default();
        if let Ok(raw) = std::env::var("DRILL_MODE") {
            if let Err(err) = settings.select_mode(&raw) {
                warn!("ignoring DRILL_MODE: {err}");
            }
        }
        if let Ok(raw) = std::env::var("DRILL_QUESTIONS") {
            match raw.parse::<RoundLength>() {
                Ok(length) => settings = RoundSettings::new(settings.mode(), length),
                Err(err) => warn!("ignoring DRILL_QUESTIONS: {err}"),
            }
        }
        let mut json = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--mode" => {
                    let value = require_value(args, "--mode")?;
                    let mode: Mode = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidMode { raw: value.clone() })?;
                    settings.set_mode(mode);
                }
                "--questions" => {
                    let value = require_value(args, "--questions")?;
                    let length: RoundLength = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidQuestions { raw: value.clone() })?;
                    settings = RoundSettings::new(settings.mode(), length);
                }
                "--json" => json = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { settings, json })
    }
}

type Controller = RoundController<TimerQueue, Vec<RoundEvent>>;

/// Apply one line of player input. Returns false when the player quits.
fn handle_line(
    ctl: &mut Controller,
    renderer: &mut Renderer,
    line: &str,
) -> Result<bool, Box<dyn std::error::Error>> {
    let input = line.trim();
    if input.eq_ignore_ascii_case("q") {
        return Ok(false);
    }

    match ctl.phase() {
        RoundPhase::AwaitingAnswer => {
            if ctl.submit_answer(input) == Submission::Rejected {
                renderer.note("Skriv ett tal.")?;
            }
        }
        RoundPhase::Evaluating(Verdict::Correct) => {
            if input.is_empty() {
                ctl.acknowledge_correct();
            }
        }
        RoundPhase::Evaluating(_) => {}
        RoundPhase::Idle | RoundPhase::RoundComplete => {
            if let Some(raw) = input.strip_prefix("m ") {
                match ctl.select_mode(raw) {
                    Ok(_) => ctl.start_selected()?,
                    Err(err) => renderer.note(&err.to_string())?,
                }
            } else if let Some(raw) = input.strip_prefix("n ") {
                let Ok(count) = raw.trim().parse::<u32>() else {
                    renderer.note(render::CONTROLS)?;
                    return Ok(true);
                };
                match ctl.select_round_length(count) {
                    Ok(length) => renderer.note(&format!("{length} frågor nästa omgång."))?,
                    Err(err) => renderer.note(&err.to_string())?,
                }
            } else if input.is_empty() {
                if ctl.restart().is_err() {
                    ctl.start_selected()?;
                }
            } else {
                renderer.note(render::CONTROLS)?;
            }
        }
    }
    Ok(true)
}

/// Time until the scheduler's next timer, or `None` when nothing is pending.
fn next_wait(ctl: &Controller) -> Option<StdDuration> {
    ctl.scheduler()
        .next_deadline()
        .map(|due| (due - Utc::now()).to_std().unwrap_or_default())
}

async fn sleep_or_park(wait: Option<StdDuration>) {
    match wait {
        Some(delay) => tokio::time::sleep(delay).await,
        None => std::future::pending::<()>().await,
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let parsed = Args::parse(&mut std::env::args().skip(1)).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let mut renderer = Renderer::new(parsed.json);
    let mut ctl: Controller =
        RoundController::new(TimerQueue::system(), Vec::new()).with_settings(parsed.settings);
    let mode = parsed.settings.mode();
    renderer.note(&format!(
        "{} · {} s per fråga · {} frågor",
        mode.label(),
        mode.seconds_per_question(),
        parsed.settings.round_length()
    ))?;
    ctl.start_selected()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        for event in std::mem::take(ctl.events_mut()) {
            renderer.render(&event)?;
        }

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if !handle_line(&mut ctl, &mut renderer, &line)? {
                    break;
                }
            }
            () = sleep_or_park(next_wait(&ctl)) => {
                ctl.poll_timers();
            }
        }
    }

    ctl.abandon();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    pretty_env_logger::init();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
