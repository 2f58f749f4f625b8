//! Application module
//!
//! Contains the main application loop and key handling.
//!
//! # Module Structure
//! - `state` - Application state types (AppState, TaskRow, ErrorDialog, Toast)
//! - Main module - App struct and event loop
//!
//! The engine runs selections on its own worker thread. This loop is the only
//! owner of `AppState`: every tick it drains the notification channel and
//! applies the events in delivery order, then redraws.

mod state;

pub use state::{AppState, ErrorDialog, TaskRow, Toast, TOAST_DURATION};

use crate::components::keybindings::{KeyAction, KeybindingContext};
use crate::config::Profile;
use crate::engine::{OptimizationEngine, RunOutcome, RunStart};
use crate::events::EventReceiver;
use crate::process_guard::{ChildRegistry, ProcessGuard};
use crate::tasks::Selection;
use crate::ui::UiRenderer;
use anyhow::{anyhow, Result};
use crossterm::event::{Event, KeyEvent, KeyEventKind};
use log::{debug, error, info, warn};
use ratatui::{backend::Backend, Terminal};
use std::path::PathBuf;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Input poll interval; also bounds event delivery latency
const TICK: Duration = Duration::from_millis(50);

/// Main application struct
pub struct App {
    state: AppState,
    engine: OptimizationEngine,
    events: EventReceiver,
    /// Worker for the run in flight, joined once it ends
    worker: Option<JoinHandle<RunOutcome>>,
    ui_renderer: UiRenderer,
    keybinding_context: KeybindingContext,
    save_profile_path: Option<PathBuf>,
    /// Process guard for child process lifecycle management
    /// Ensures elevated commands are terminated when App is dropped
    _process_guard: ProcessGuard,
}

impl App {
    /// Create a new application instance
    pub fn new(
        engine: OptimizationEngine,
        events: EventReceiver,
        save_profile_path: Option<PathBuf>,
    ) -> Self {
        info!("Creating new App instance");
        let state = AppState::from_registry(engine.registry());

        let process_guard = ProcessGuard::new();
        debug!("ProcessGuard initialized for child process tracking");

        Self {
            state,
            engine,
            events,
            worker: None,
            ui_renderer: UiRenderer::new(),
            keybinding_context: KeybindingContext::new(),
            save_profile_path,
            _process_guard: process_guard,
        }
    }

    /// Replace the default selection, e.g. with a loaded profile
    pub fn with_selection(mut self, selection: &Selection) -> Self {
        info!("Preselecting {} optimization(s)", selection.len());
        self.state.select_only(selection.ids());
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        info!("Starting main application loop");

        loop {
            self.poll_engine_events();
            self.reap_worker()?;
            self.state.expire_toasts(Instant::now());

            terminal.draw(|f| {
                self.ui_renderer
                    .render(f, &self.state, &self.keybinding_context)
            })?;

            if crossterm::event::poll(TICK)? {
                match crossterm::event::read()? {
                    Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                        if self.handle_key_event(key_event) {
                            break; // Exit requested
                        }
                    }
                    // Next draw picks up the new size
                    Event::Resize(..) => {}
                    _ => {}
                }
            }
        }

        info!("Main application loop finished");
        Ok(())
    }

    /// Apply every queued engine event, in order
    pub fn poll_engine_events(&mut self) {
        let now = Instant::now();
        for event in self.events.drain() {
            debug!("Engine event: {:?}", event);
            self.state.apply_event(event, now);
        }
    }

    /// Join a finished worker. A worker panic is fatal.
    fn reap_worker(&mut self) -> Result<()> {
        if !self.worker.as_ref().is_some_and(|h| h.is_finished()) {
            return Ok(());
        }
        let Some(handle) = self.worker.take() else {
            return Ok(());
        };
        match handle.join() {
            Ok(outcome) => {
                info!("Run finished: {:?}", outcome);
                Ok(())
            }
            Err(_) => {
                error!("Optimization worker panicked");
                Err(anyhow!("optimization worker panicked; aborting"))
            }
        }
    }

    /// Handle one key press. Returns true when the app should exit.
    pub fn handle_key_event(&mut self, key_event: KeyEvent) -> bool {
        let mode = self.state.key_mode();
        let Some(action) = self.keybinding_context.action_for(mode, &key_event) else {
            return false;
        };

        match action {
            KeyAction::NavigateUp => self.state.move_up(),
            KeyAction::NavigateDown => self.state.move_down(),
            KeyAction::Home => self.state.move_home(),
            KeyAction::End => self.state.move_end(),
            KeyAction::Toggle => self.state.toggle_current(),
            KeyAction::ToggleAll => self.state.toggle_all(),
            KeyAction::Apply => self.trigger_run(),
            KeyAction::Help => self.state.toggle_help(),
            KeyAction::Dismiss => {
                if self.state.error_dialog.is_some() {
                    self.state.dismiss_error();
                } else {
                    self.state.help_visible = false;
                }
            }
            KeyAction::Quit => {
                if self.engine.is_running() || self.state.is_running() {
                    warn!("Quit refused while a run is active");
                    self.state.push_toast(
                        "Optimizations are still running (Ctrl+C to force quit)".to_string(),
                        Instant::now(),
                    );
                } else {
                    info!("Quit requested");
                    return true;
                }
            }
            KeyAction::ForceQuit => {
                warn!("Force quit requested");
                if let Ok(mut registry) = ChildRegistry::global().lock() {
                    registry.terminate_all(Duration::from_secs(1));
                }
                return true;
            }
        }
        false
    }

    /// Snapshot the toggles and hand them to the engine.
    ///
    /// Ignored while the trigger is locked, so repeated presses start one run.
    pub fn trigger_run(&mut self) {
        if !self.state.begin_run() {
            debug!("Apply ignored: a run is already active");
            return;
        }

        let ids = self.state.selected_ids();
        info!("Apply requested for {} optimization(s)", ids.len());
        self.save_profile(&ids);

        match self.engine.start(Selection::new(ids)) {
            RunStart::Started(handle) => self.worker = Some(handle),
            // Already reported through the channel; RunFinished re-enables the trigger
            RunStart::NothingSelected | RunStart::SpawnFailed => {}
            RunStart::AlreadyRunning => {
                // The UI lock and the engine disagree; the active run will unlock us
                warn!("Engine reported a run already in progress");
            }
        }
    }

    fn save_profile(&mut self, ids: &[String]) {
        let Some(path) = &self.save_profile_path else {
            return;
        };
        match Profile::new(ids.to_vec()).save_to_file(path) {
            Ok(()) => info!("Selection saved to {:?}", path),
            Err(e) => {
                error!("Failed to save profile: {:#}", e);
                self.state
                    .push_toast(format!("Could not save profile: {}", e), Instant::now());
            }
        }
    }
}
