use filer::async_ops::OperationRunner;
use filer::cli::{AppConfig, Args};
use filer::config::UserConfig;
use filer::controller::{Command, Controller, Message};
use filer::domain::{load_batch, DiscoveryOptions};
use filer::filesystem::{DryRunFileSystem, FileOperations, LocalFileSystem};
use filer::filter::PatternFilter;
use filer::logging::{init_tracing, level_for_verbosity};
use filer::tui::{progress_headline, render, route_key, FrameInfo, TerminalSession, ViewState};
use filer::Result;

use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use std::process::ExitCode;
use std::sync::Arc;
use std::{io, time::Duration};
use tracing::{error, info};

fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    // Load user configuration
    let user_config = UserConfig::load().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load user config: {}", e);
        UserConfig::default()
    });
    let config = AppConfig::resolve(args, &user_config);

    let _log_guard = match init_tracing(
        level_for_verbosity(config.verbose),
        config.log_file.as_deref(),
    ) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run_app_with_config(&config) {
        Ok(controller) => report(&controller, &config),
        Err(e) => {
            error!(error = %e, "startup failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Builds the run from configuration, then drives the TUI until it ends
fn run_app_with_config(config: &AppConfig) -> Result<Controller> {
    let filter = PatternFilter::new(config.pattern.as_deref())?;
    let discovery_options = DiscoveryOptions {
        skip_hidden: config.skip_hidden,
    };

    let batch = load_batch(&config.source, &discovery_options, &filter)?;

    let ops: Arc<dyn FileOperations> = if config.dry_run {
        Arc::new(DryRunFileSystem::new(&config.source, config.target.clone()))
    } else {
        Arc::new(LocalFileSystem::new(&config.source, config.target.clone())?)
    };

    info!(
        source = %config.source.display(),
        dest = ?config.target,
        files = batch.total(),
        dry_run = config.dry_run,
        "starting triage"
    );

    let mut controller = Controller::new(batch, ops);
    let mut runner = OperationRunner::new()?;

    // The session restores the terminal when dropped, on every exit path
    let mut session = TerminalSession::enter()?;
    run_loop(session.terminal_mut(), &mut controller, &mut runner, config)?;
    drop(session);

    let tally = controller.tally();
    info!(
        phase = ?controller.phase(),
        decisions = tally.total(),
        kept = tally.kept,
        deleted = tally.deleted,
        skipped = tally.skipped,
        "triage finished"
    );
    Ok(controller)
}

/// Main application loop
fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    controller: &mut Controller,
    runner: &mut OperationRunner,
    config: &AppConfig,
) -> io::Result<()> {
    let frame_info = FrameInfo {
        target: config.target.as_deref(),
        dry_run: config.dry_run,
    };
    let mut view_state = ViewState::Browsing;

    loop {
        // Operation outcomes are fed in before the next key
        if let Some(outcome) = runner.poll() {
            controller.update(Message::Outcome(outcome));
        }

        terminal.draw(|frame| render(frame, controller, view_state, &frame_info))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        // Overlays consume their own input
        let route = route_key(view_state, controller.phase(), config.confirm_delete, key);
        view_state = route.view;
        let Some(input) = route.input else {
            continue;
        };

        match controller.update(Message::Key(input)) {
            Command::None => {}
            Command::Dispatch(job) => runner.dispatch(job),
            Command::Quit => break,
        }
    }

    if runner.is_busy() {
        info!("waiting for in-flight operation to finish");
    }

    Ok(())
}

/// Prints the session summary after the terminal is restored
fn report(controller: &Controller, config: &AppConfig) -> ExitCode {
    let tally = controller.tally();
    let prefix = if config.dry_run { "[DRY RUN] " } else { "" };

    println!("{}{}", prefix, progress_headline(controller.batch()));
    println!("   Kept: {}", tally.kept);
    println!("   Deleted: {}", tally.deleted);
    println!("   Skipped: {}", tally.skipped);

    match controller.error_message() {
        Some(message) if controller.is_failed() => {
            eprintln!("Error: {}", message);
            ExitCode::FAILURE
        }
        _ => ExitCode::SUCCESS,
    }
}
