//! Optimization execution engine
//!
//! Turns a `Selection` into a sequence of task actions on a worker thread and
//! reports what happens through the notification channel.
//!
//! # Run lifecycle
//!
//! ```text
//! start(selection)
//!   ├─ run active  → rejected, nothing emitted
//!   ├─ empty       → Status("No optimizations selected.") → RunFinished
//!   └─ spawn worker
//!        for each id, in order:
//!          Status("Applying: <label>...")
//!          action ── Err ─→ Status("Failed: <label>") → Error → RunFinished
//!            └─ Ok → Progress(k/N)
//!        Status(summary) → Toast(summary) → RunFinished
//! ```
//!
//! # Invariants
//!
//! - At most one run is active per engine. The worker queues `RunFinished`
//!   and clears the busy flag under one lock, so no event of a later run can
//!   precede it and a `start` issued after it is received is accepted.
//! - `reboot_needed` only ever goes from false to true, and only after a
//!   reboot-requiring task succeeded.
//! - Progress is recomputed from `current_step / total_steps` each time.

use crate::error::CommandFailure;
use crate::events::Notifier;
use crate::runner::CommandRunner;
use crate::tasks::{Selection, TaskContext, TaskRegistry};
use log::{error, info, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};
use std::thread::{self, JoinHandle};

pub const NOTHING_SELECTED: &str = "No optimizations selected.";
pub const RUN_STARTED: &str = "Applying optimizations...";
pub const ALL_APPLIED: &str = "All selected optimizations have been applied.";
pub const REBOOT_REQUIRED: &str = " A reboot is required for changes to take effect.";

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every task succeeded
    Completed { reboot_required: bool },
    /// `task_id` failed; later tasks were not attempted
    Failed {
        task_id: String,
        failure: CommandFailure,
    },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Result of pressing the trigger
#[derive(Debug)]
pub enum RunStart {
    /// A worker is running the selection
    Started(JoinHandle<RunOutcome>),
    /// Empty selection; already reported, trigger re-enabled
    NothingSelected,
    /// Another run is in flight; nothing happened
    AlreadyRunning,
    /// The worker thread could not be created; already reported
    SpawnFailed,
}

/// Mutable bookkeeping for one run, owned by the worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunState {
    pub total_steps: usize,
    pub current_step: usize,
    pub reboot_needed: bool,
}

impl RunState {
    pub fn new(total_steps: usize) -> Self {
        Self {
            total_steps,
            current_step: 0,
            reboot_needed: false,
        }
    }
}

/// Final status line for a completed run
pub fn completion_message(reboot_needed: bool) -> String {
    let mut message = ALL_APPLIED.to_string();
    if reboot_needed {
        message.push_str(REBOOT_REQUIRED);
    }
    message
}

/// Runs selections against a registry, one at a time.
///
/// Constructed once and shared by handle with whatever owns the interface.
pub struct OptimizationEngine {
    registry: Arc<TaskRegistry>,
    runner: Arc<dyn CommandRunner>,
    notifier: Notifier,
    active: Arc<Mutex<bool>>,
}

impl OptimizationEngine {
    pub fn new(
        registry: Arc<TaskRegistry>,
        runner: Arc<dyn CommandRunner>,
        notifier: Notifier,
    ) -> Self {
        Self {
            registry,
            runner,
            notifier,
            active: Arc::new(Mutex::new(false)),
        }
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    /// True from a successful `start` until its `RunFinished` is queued.
    ///
    /// The finishing worker holds the lock while it queues `RunFinished`, so
    /// that window also reads as running.
    pub fn is_running(&self) -> bool {
        match self.active.try_lock() {
            Ok(running) => *running,
            Err(TryLockError::Poisoned(poisoned)) => *poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => true,
        }
    }

    /// Begin a run without blocking the caller.
    ///
    /// The selection is moved in, so later toggle changes cannot reach it.
    /// While a run is active every call is rejected before anything is
    /// emitted, including calls with an empty selection. A call made while
    /// the worker is queueing `RunFinished` waits for it, so an event
    /// consumer must not call this mid-run while leaving a full queue
    /// undrained.
    pub fn start(&self, selection: Selection) -> RunStart {
        let mut running = lock_flag(&self.active);
        if *running {
            warn!("Run requested while another run is active; ignoring");
            return RunStart::AlreadyRunning;
        }

        if selection.is_empty() {
            info!("Run requested with an empty selection");
            self.notifier.status(NOTHING_SELECTED);
            self.notifier.toast(NOTHING_SELECTED);
            self.notifier.finished(true);
            return RunStart::NothingSelected;
        }

        *running = true;
        // The guard below relocks on drop, including when spawn fails
        drop(running);

        let registry = Arc::clone(&self.registry);
        let runner = Arc::clone(&self.runner);
        let notifier = self.notifier.clone();
        let active = ActiveRun(Arc::clone(&self.active));

        let spawned = thread::Builder::new()
            .name("optimization-run".to_string())
            .spawn(move || {
                let outcome = execute(&selection, &registry, runner.as_ref(), &notifier);
                active.finish(&notifier, outcome.is_success());
                outcome
            });

        match spawned {
            Ok(handle) => RunStart::Started(handle),
            Err(e) => {
                // The closure (and with it the ActiveRun guard) is dropped here
                error!("Failed to spawn optimization worker: {}", e);
                self.notifier
                    .error("Could not start optimizations", e.to_string());
                self.notifier.finished(false);
                RunStart::SpawnFailed
            }
        }
    }
}

fn lock_flag(flag: &Mutex<bool>) -> MutexGuard<'_, bool> {
    flag.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clears the engine's busy flag when the worker ends, even by panic
struct ActiveRun(Arc<Mutex<bool>>);

impl ActiveRun {
    /// Queue `RunFinished` and clear the flag as one step under the lock.
    fn finish(self, notifier: &Notifier, success: bool) {
        let mut running = lock_flag(&self.0);
        notifier.finished(success);
        *running = false;
    }
}

impl Drop for ActiveRun {
    fn drop(&mut self) {
        *lock_flag(&self.0) = false;
    }
}

/// Run a selection synchronously on the current thread.
///
/// Emits every event of the run except the closing `RunFinished`, which the
/// caller sends once it is ready for another run.
///
/// # Panics
///
/// If the selection names an id the registry does not contain. Selections are
/// built from registry keys, so a miss means the two are out of sync.
pub fn execute(
    selection: &Selection,
    registry: &TaskRegistry,
    runner: &dyn CommandRunner,
    notifier: &Notifier,
) -> RunOutcome {
    let mut state = RunState::new(selection.len());
    info!("Starting run of {} optimization(s)", state.total_steps);
    notifier.toast(RUN_STARTED);

    let ctx = TaskContext::new(runner, notifier);

    for id in selection.ids() {
        let task = registry
            .get(id)
            .unwrap_or_else(|| panic!("selection references unregistered optimization '{}'", id));
        let label = task.plain_label();

        notifier.status(format!("Applying: {}...", label));
        info!("Applying {} ({}/{})", task.id, state.current_step + 1, state.total_steps);

        if let Err(failure) = (task.action)(&ctx) {
            error!("{} failed: {} ({})", task.id, failure.message, failure.kind);
            notifier.status(format!("Failed: {}", label));
            notifier.error(failure.message.clone(), failure.details.clone());
            return RunOutcome::Failed {
                task_id: task.id.to_string(),
                failure,
            };
        }

        if task.requires_reboot {
            state.reboot_needed = true;
        }
        state.current_step += 1;
        notifier.progress(state.current_step, state.total_steps);
    }

    let message = completion_message(state.reboot_needed);
    info!("Run complete (reboot needed: {})", state.reboot_needed);
    notifier.status(message.clone());
    notifier.toast(message);

    RunOutcome::Completed {
        reboot_required: state.reboot_needed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CommandFailure;
    use crate::events::{notification_channel, EngineEvent, Progress};
    use crate::runner::CommandResult;
    use crate::tasks::{Task, TaskAction, TaskCategory};

    struct FailOn(&'static str);

    impl CommandRunner for FailOn {
        fn run(&self, command: &str) -> Result<CommandResult, CommandFailure> {
            if command == self.0 {
                Err(CommandFailure::exited(1, "nope"))
            } else {
                Ok(CommandResult::default())
            }
        }
    }

    fn step_a(ctx: &TaskContext<'_>) -> Result<(), CommandFailure> {
        ctx.run("a").map(|_| ())
    }

    fn step_b(ctx: &TaskContext<'_>) -> Result<(), CommandFailure> {
        ctx.run("b").map(|_| ())
    }

    fn registry() -> TaskRegistry {
        let mk = |id: &'static str, action: TaskAction, requires_reboot: bool| Task {
            id,
            label: id,
            action,
            requires_reboot,
            description: "",
            icon: "",
            category: TaskCategory::Apt,
        };
        TaskRegistry::from_tasks(vec![mk("a", step_a, false), mk("b", step_b, true)]).unwrap()
    }

    #[test]
    fn test_completion_message() {
        assert_eq!(completion_message(false), "All selected optimizations have been applied.");
        assert_eq!(
            completion_message(true),
            "All selected optimizations have been applied. A reboot is required for changes to take effect."
        );
    }

    #[test]
    fn test_execute_success_event_order() {
        let (notifier, receiver) = notification_channel();
        let selection = Selection::new(vec!["a".into(), "b".into()]);

        let outcome = execute(&selection, &registry(), &FailOn(""), &notifier);
        assert_eq!(outcome, RunOutcome::Completed { reboot_required: true });

        let summary = completion_message(true);
        assert_eq!(
            receiver.drain(),
            vec![
                EngineEvent::Toast(RUN_STARTED.into()),
                EngineEvent::Status("Applying: a...".into()),
                EngineEvent::Progress(Progress { completed: 1, total: 2 }),
                EngineEvent::Status("Applying: b...".into()),
                EngineEvent::Progress(Progress { completed: 2, total: 2 }),
                EngineEvent::Status(summary.clone()),
                EngineEvent::Toast(summary),
            ]
        );
    }

    #[test]
    fn test_execute_failure_stops_before_reboot_task() {
        let (notifier, receiver) = notification_channel();
        let selection = Selection::new(vec!["a".into(), "b".into()]);

        let outcome = execute(&selection, &registry(), &FailOn("a"), &notifier);
        assert!(matches!(outcome, RunOutcome::Failed { ref task_id, .. } if task_id == "a"));

        assert_eq!(
            receiver.drain(),
            vec![
                EngineEvent::Toast(RUN_STARTED.into()),
                EngineEvent::Status("Applying: a...".into()),
                EngineEvent::Status("Failed: a".into()),
                EngineEvent::Error {
                    message: "Command failed with exit code 1".into(),
                    details: "nope".into(),
                },
            ]
        );
    }

    #[test]
    #[should_panic(expected = "unregistered optimization")]
    fn test_execute_panics_on_registry_miss() {
        let (notifier, _receiver) = notification_channel();
        let selection = Selection::new(vec!["ghost".into()]);
        execute(&selection, &registry(), &FailOn(""), &notifier);
    }

    #[test]
    fn test_start_empty_selection_spawns_nothing() {
        let (notifier, receiver) = notification_channel();
        let engine = OptimizationEngine::new(Arc::new(registry()), Arc::new(FailOn("")), notifier);

        assert!(matches!(engine.start(Selection::default()), RunStart::NothingSelected));
        assert!(!engine.is_running());
        assert_eq!(
            receiver.drain(),
            vec![
                EngineEvent::Status(NOTHING_SELECTED.into()),
                EngineEvent::Toast(NOTHING_SELECTED.into()),
                EngineEvent::RunFinished { enable_trigger: true, success: true },
            ]
        );
    }

    #[test]
    fn test_start_releases_after_run() {
        let (notifier, receiver) = notification_channel();
        let engine = OptimizationEngine::new(Arc::new(registry()), Arc::new(FailOn("")), notifier);

        let RunStart::Started(handle) = engine.start(Selection::new(vec!["a".into()])) else {
            panic!("run did not start");
        };
        let outcome = handle.join().unwrap();
        assert!(outcome.is_success());
        assert!(!engine.is_running());

        let events = receiver.drain();
        assert_eq!(
            events.last(),
            Some(&EngineEvent::RunFinished { enable_trigger: true, success: true })
        );
    }
}
