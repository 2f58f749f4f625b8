//! debtune - Main entry point
//!
//! Parses the command line, builds the runner and engine, then hands off to
//! the terminal UI or the headless front end.

use anyhow::{Context, Result};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use log::{debug, error, info};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use debtune::app::App;
use debtune::cli::{Cli, Commands};
use debtune::config::RunnerConfig;
use debtune::engine::OptimizationEngine;
use debtune::error::DebtuneError;
use debtune::events::{notification_channel, EventReceiver};
use debtune::runner::{CommandRunner, DryRunRunner, PrivilegedCommandRunner};
use debtune::tasks::{Selection, TaskRegistry};
use debtune::{headless, process_guard};

/// Initialize the logger with appropriate settings
///
/// With a log file, records go there so they never draw over the UI.
fn init_logger(log_file: Option<&Path>) -> Result<()> {
    use env_logger::{Builder, Target};
    use std::io::Write;

    let mut builder = Builder::from_default_env();
    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}:{}] {}",
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .filter_level(log::LevelFilter::Info)
        .parse_default_env(); // Allows RUST_LOG env var to override

    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file {:?}", path))?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<RunnerConfig> {
    let config = match path {
        Some(path) => RunnerConfig::load_from_file(path)?,
        None => RunnerConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Main application entry point
fn main() -> Result<()> {
    let cli = Cli::parse_args();
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(path) = &cli.log_file {
        config.log_file = Some(path.clone());
    }

    // The UI owns the terminal, so its log always goes to a file
    let log_target = if cli.is_interactive() {
        Some(config.log_path())
    } else {
        config.log_file.clone()
    };
    init_logger(log_target.as_deref())?;
    info!("debtune starting up");

    // Terminate elevated children if we receive SIGINT/SIGTERM/SIGHUP
    if let Err(e) = process_guard::init_signal_handlers() {
        log::warn!("Failed to initialize signal handlers: {}", e);
        // Continue anyway - cleanup will still work via Drop
    }
    debug!("Signal handlers initialized");

    let runner: Arc<dyn CommandRunner> = if cli.dry_run {
        info!("Dry-run mode: commands will be logged, not executed");
        Arc::new(DryRunRunner::new(config.noninteractive))
    } else {
        Arc::new(PrivilegedCommandRunner::new(config.clone()))
    };
    let registry = Arc::new(TaskRegistry::builtin());
    let (notifier, events) = notification_channel();
    let engine = OptimizationEngine::new(Arc::clone(&registry), runner, notifier);

    match cli.command {
        Some(Commands::List { category }) => headless::list(&registry, category),
        Some(Commands::Validate { profile }) => {
            if !headless::validate_profile(&profile, &registry) {
                std::process::exit(1);
            }
        }
        Some(Commands::Apply { ids, profile }) => {
            let selection = match headless::load_selection(ids, profile.as_deref(), &registry) {
                Ok(selection) => selection,
                Err(e) => {
                    error!("Invalid selection: {:#}", e);
                    eprintln!("✗ {:#}", e);
                    std::process::exit(1);
                }
            };
            if !headless::apply(&engine, &events, selection)? {
                std::process::exit(1);
            }
        }
        Some(Commands::Tui {
            profile,
            save_profile,
        }) => {
            let preselect = match profile {
                Some(path) => match headless::load_selection(Vec::new(), Some(path.as_path()), &registry) {
                    Ok(selection) => Some(selection),
                    Err(e) => {
                        error!("Invalid profile: {:#}", e);
                        eprintln!("✗ {:#}", e);
                        std::process::exit(1);
                    }
                },
                None => None,
            };
            run_tui(engine, events, preselect, save_profile)?;
        }
        None => {
            info!("No command specified, launching the terminal UI");
            run_tui(engine, events, None, None)?;
        }
    }

    Ok(())
}

/// Run the terminal UI
fn run_tui(
    engine: OptimizationEngine,
    events: EventReceiver,
    preselect: Option<Selection>,
    save_profile: Option<PathBuf>,
) -> Result<()> {
    debug!("Initializing terminal for TUI mode");

    enable_raw_mode()
        .map_err(|e| DebtuneError::terminal(format!("Failed to enable raw mode: {}", e)))?;
    crossterm::execute!(stdout(), crossterm::terminal::EnterAlternateScreen)
        .map_err(|e| DebtuneError::terminal(format!("Failed to enter alternate screen: {}", e)))?;

    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)
        .map_err(|e| DebtuneError::terminal(format!("Failed to create terminal: {}", e)));

    let result = match terminal {
        Ok(mut terminal) => {
            let mut app = App::new(engine, events, save_profile);
            if let Some(selection) = &preselect {
                app = app.with_selection(selection);
            }
            app.run(&mut terminal)
        }
        Err(e) => Err(e.into()),
    };

    // Cleanup terminal (always attempt cleanup, even if app failed)
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(stdout(), crossterm::terminal::LeaveAlternateScreen);

    result
}
