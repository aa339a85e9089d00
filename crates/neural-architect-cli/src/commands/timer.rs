use std::time::Duration;

use clap::{Subcommand, ValueEnum};
use neural_architect_core::timer::Ticker;
use neural_architect_core::{
    AppHooks, Config, Event, PomodoroConfigPatch, SessionCategory, TimerEngine, TimerPhase,
    ValidationError,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{open_engine, print_json, CliResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Print current timer state as JSON
    Status,
    /// Run the timer in the foreground (stdin: p, r, s, x, y, n, q)
    Run {
        /// Keep cycling through phases instead of stopping after one
        #[arg(long)]
        continuous: bool,
    },
    /// Jump to a phase, idle at its full duration
    Phase {
        #[arg(value_enum)]
        phase: PhaseArg,
    },
    /// End the current break early
    SkipBreak,
    /// Complete the current phase now
    Complete,
    /// Restore the current phase's full duration
    Reset,
    /// Change intervals, category or active tags
    Configure {
        /// Focus interval in seconds
        #[arg(long)]
        focus: Option<u64>,
        /// Break interval in seconds
        #[arg(long = "break")]
        break_secs: Option<u64>,
        /// Category for upcoming sessions (work, study, training, custom)
        #[arg(long)]
        category: Option<SessionCategory>,
        /// Tag id to activate (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Deactivate all tags before applying --tag
        #[arg(long)]
        clear_tags: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PhaseArg {
    Focus,
    Break,
}

impl From<PhaseArg> for TimerPhase {
    fn from(arg: PhaseArg) -> Self {
        match arg {
            PhaseArg::Focus => TimerPhase::Focus,
            PhaseArg::Break => TimerPhase::Break,
        }
    }
}

pub async fn run(action: TimerAction) -> CliResult {
    let config = Config::load_or_default();
    let mut engine = open_engine(&config)?;

    match action {
        TimerAction::Status => print_json(&engine.snapshot())?,
        TimerAction::Run { continuous } => {
            run_foreground(&mut engine, config.tick_interval(), continuous).await?;
        }
        TimerAction::Phase { phase } => {
            let event = engine.set_phase(phase.into());
            print_json(&event)?;
        }
        TimerAction::SkipBreak => {
            let events = engine.skip_break();
            if events.is_empty() {
                return Err("not in a break".into());
            }
            print_events(&mut engine, &events)?;
        }
        TimerAction::Complete => {
            let events = engine.complete_session();
            print_events(&mut engine, &events)?;
        }
        TimerAction::Reset => print_json(&engine.reset())?,
        TimerAction::Configure {
            focus,
            break_secs,
            category,
            tags,
            clear_tags,
        } => {
            let active_tags = if clear_tags || !tags.is_empty() {
                for id in &tags {
                    if engine.hooks().sessions().tag(id).is_none() {
                        return Err(ValidationError::InvalidValue {
                            field: "tag".into(),
                            message: format!("unknown tag id '{id}'"),
                        }
                        .into());
                    }
                }
                let mut next = if clear_tags {
                    Vec::new()
                } else {
                    engine.config().active_tags.clone()
                };
                next.extend(tags);
                Some(next)
            } else {
                None
            };
            let event = engine.set_config(PomodoroConfigPatch {
                focus_interval: focus,
                break_interval: break_secs,
                current_category: category,
                active_tags,
            });
            print_json(&event)?;
        }
    }
    Ok(())
}

fn print_events(engine: &mut TimerEngine<AppHooks>, events: &[Event]) -> CliResult {
    for event in events {
        println!("{}", serde_json::to_string(event)?);
    }
    for event in engine.hooks_mut().drain_events() {
        println!("{}", serde_json::to_string(&event)?);
    }
    Ok(())
}

enum Flow {
    Continue,
    Completed,
    Quit,
}

/// Foreground loop: ticks while running, reads one-letter commands from
/// stdin, exits on `q`, Ctrl-C, or (unless `continuous`) after a phase.
async fn run_foreground(
    engine: &mut TimerEngine<AppHooks>,
    period: Duration,
    continuous: bool,
) -> CliResult {
    let mut ticker = Ticker::new(period);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut last_shown = None;

    if let Some(event) = engine.start() {
        println!("{}", serde_json::to_string(&event)?);
    }

    loop {
        ticker.sync(engine.state().is_running);
        show_progress(engine, &mut last_shown);

        let flow = tokio::select! {
            _ = ticker.tick() => {
                let events = engine.tick();
                if events.is_empty() {
                    Flow::Continue
                } else {
                    print_events(engine, &events)?;
                    Flow::Completed
                }
            }
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) => handle_command(engine, line.trim())?,
                None => {
                    stdin_open = false;
                    Flow::Continue
                }
            },
            _ = tokio::signal::ctrl_c() => Flow::Quit,
        };

        match flow {
            Flow::Continue => {}
            Flow::Completed if continuous => {
                if let Some(event) = engine.start() {
                    println!("{}", serde_json::to_string(&event)?);
                }
            }
            Flow::Completed | Flow::Quit => break,
        }
    }

    ticker.disarm();
    Ok(())
}

fn handle_command(
    engine: &mut TimerEngine<AppHooks>,
    command: &str,
) -> Result<Flow, Box<dyn std::error::Error>> {
    let event = match command {
        "" => None,
        "p" => engine.pause(),
        "r" => engine.resume(),
        "x" => {
            let event = engine.request_reset();
            if event.is_some() {
                eprintln!("reset? [y/n]");
            }
            event
        }
        "y" if engine.state().reset_pending => {
            println!("{}", serde_json::to_string(&engine.confirm_reset())?);
            engine.start()
        }
        "n" => engine.cancel_reset(),
        "s" => {
            let events = engine.skip_break();
            if events.is_empty() {
                eprintln!("not in a break");
                return Ok(Flow::Continue);
            }
            print_events(engine, &events)?;
            return Ok(Flow::Completed);
        }
        "q" => return Ok(Flow::Quit),
        other => {
            eprintln!("unknown command '{other}' (p, r, s, x, y, n, q)");
            None
        }
    };
    if let Some(event) = event {
        println!("{}", serde_json::to_string(&event)?);
    }
    Ok(Flow::Continue)
}

fn show_progress(engine: &TimerEngine<AppHooks>, last_shown: &mut Option<(TimerPhase, u64)>) {
    let snapshot = engine.snapshot();
    let current = (snapshot.state.phase, snapshot.state.time_remaining);
    if *last_shown != Some(current) {
        println!("{} {}", snapshot.state.phase, snapshot.remaining_display);
        *last_shown = Some(current);
    }
}
