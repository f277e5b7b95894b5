use std::sync::Arc;
use std::time::Duration;

use services::{
    Clock, Direction, HttpQuestionSource, HttpSubmitter, SessionPhase, TickOutcome,
    TestSessionLoop,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use ui::{TestSessionVm, ViewError};
use vocab_core::model::SessionConfig;

use crate::TakeArgs;
use crate::terminal::TerminalSurface;

/// One line of terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Start,
    Next,
    Previous,
    Finish,
    Download,
    Reload,
    Time,
    Quit,
    Unknown(String),
    Sentence(String),
}

impl Input {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let Some(command) = trimmed.strip_prefix(':') else {
            return Self::Sentence(line.trim_end_matches(['\r', '\n']).to_string());
        };
        match command.trim().to_ascii_lowercase().as_str() {
            "start" => Self::Start,
            "next" | "n" => Self::Next,
            "prev" | "p" => Self::Previous,
            "finish" | "submit" => Self::Finish,
            "download" => Self::Download,
            "reload" => Self::Reload,
            "time" => Self::Time,
            "quit" | "q" => Self::Quit,
            _ => Self::Unknown(trimmed.to_string()),
        }
    }
}

fn session_config(args: &TakeArgs) -> SessionConfig {
    let config = SessionConfig::for_kind(args.kind);
    match args.timer_secs {
        Some(secs) => config.with_timer(Some(secs)),
        None => config,
    }
}

fn report(result: Result<(), ViewError>) {
    match result {
        Ok(()) => {}
        Err(ViewError::EmptyResultSet | ViewError::LoadFailure) => {}
        Err(err) => eprintln!("{}", err.message()),
    }
}

/// Runs one test session against stdin and stdout.
///
/// # Errors
///
/// Returns I/O errors from the terminal.
pub async fn run(args: TakeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let clock = Clock::default_clock();
    let runner = TestSessionLoop::new(
        clock,
        Arc::new(HttpQuestionSource::new(args.api.clone())),
        Arc::new(HttpSubmitter::new(args.api.clone())),
    );
    let config = session_config(&args);
    info!(kind = %config.kind(), base_url = %args.api.base_url, "starting test");

    let mut vm = TestSessionVm::new(runner, config, TerminalSurface::new());
    let mut stdout = std::io::stdout();
    vm.surface_mut().draw(&mut stdout)?;
    report(vm.load().await);
    vm.surface_mut().draw(&mut stdout)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !handle_line(&mut vm, &args, &mut ticker, &line).await? {
                    break;
                }
            }
            _ = ticker.tick(), if vm.session().timer_running() => {
                match vm.tick().await {
                    Ok(TickOutcome::Expired) => println!("Time is up. Submitting your test."),
                    Ok(_) => {}
                    Err(err) => eprintln!("{}", err.message()),
                }
            }
        }
        vm.surface_mut().draw(&mut stdout)?;
    }

    if vm.session().phase() == &SessionPhase::InProgress {
        warn!("leaving with an unsubmitted test");
    }
    Ok(())
}

/// Applies one line. Returns `false` when the user quits.
async fn handle_line(
    vm: &mut TestSessionVm<TerminalSurface>,
    args: &TakeArgs,
    ticker: &mut tokio::time::Interval,
    line: &str,
) -> Result<bool, Box<dyn std::error::Error>> {
    match Input::parse(line) {
        Input::Quit => return Ok(false),
        Input::Start => {
            report(vm.start());
            ticker.reset();
        }
        Input::Next => report(vm.advance(Direction::Next).map(|_| ())),
        Input::Previous => report(vm.advance(Direction::Previous).map(|_| ())),
        Input::Finish => {
            if vm.session().phase() == &SessionPhase::InProgress && !vm.session().is_last() {
                println!("Finish is available on the last question.");
            } else {
                report(vm.finish().await);
            }
        }
        Input::Download => match vm.download() {
            Ok(artifact) => {
                let path = artifact.write_to(&args.out_dir)?;
                println!("Results saved to {}", path.display());
            }
            Err(err) => eprintln!("{}", err.message()),
        },
        Input::Reload => report(vm.reload().await),
        Input::Time => match vm.surface().timer_text() {
            Some(remaining) => println!("Time left: {remaining}"),
            None => println!("This test is not timed."),
        },
        Input::Unknown(command) => eprintln!("unknown command: {command}"),
        Input::Sentence(text) => {
            if vm.session().phase() == &SessionPhase::InProgress {
                vm.surface_mut().type_line(&text);
                // Enter commits the line even when autosave is off.
                if !vm.on_input() {
                    vm.save_current_response();
                }
            } else {
                eprintln!("{}", ViewError::NotAllowed.message());
            }
        }
    }
    Ok(true)
}
