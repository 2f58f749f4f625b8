//! Integration tests for the optimization engine
//!
//! Uses proptest over random selections: any length, any failure position,
//! any mix of reboot flags. Each step's action runs a command named after its
//! own id so a recording runner can see exactly what was executed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use proptest::prelude::*;

use debtune::engine::{completion_message, OptimizationEngine, RunOutcome, RunStart, RUN_STARTED};
use debtune::error::CommandFailure;
use debtune::events::{notification_channel, EngineEvent, EventReceiver, Progress};
use debtune::runner::{CommandResult, CommandRunner};
use debtune::tasks::{Selection, Task, TaskAction, TaskCategory, TaskContext, TaskRegistry};

const MAX_STEPS: usize = 8;

macro_rules! steps {
    ($($name:ident => $id:literal),* $(,)?) => {
        $(
            fn $name(ctx: &TaskContext<'_>) -> Result<(), CommandFailure> {
                ctx.run($id).map(|_| ())
            }
        )*
        const STEP_IDS: [&str; MAX_STEPS] = [$($id),*];
        const STEP_ACTIONS: [TaskAction; MAX_STEPS] = [$($name),*];
    };
}

steps! {
    step0 => "t0", step1 => "t1", step2 => "t2", step3 => "t3",
    step4 => "t4", step5 => "t5", step6 => "t6", step7 => "t7",
}

fn registry(reboot_flags: &[bool]) -> TaskRegistry {
    let tasks = reboot_flags
        .iter()
        .enumerate()
        .map(|(i, &requires_reboot)| Task {
            id: STEP_IDS[i],
            label: STEP_IDS[i],
            action: STEP_ACTIONS[i],
            requires_reboot,
            description: "",
            icon: "",
            category: TaskCategory::Packages,
        })
        .collect();
    TaskRegistry::from_tasks(tasks).unwrap()
}

/// Records commands and fails the one named in `fail_on`
#[derive(Default)]
struct Recorder {
    fail_on: Option<String>,
    commands: Mutex<Vec<String>>,
}

impl CommandRunner for Recorder {
    fn run(&self, command: &str) -> Result<CommandResult, CommandFailure> {
        self.commands.lock().unwrap().push(command.to_string());
        if self.fail_on.as_deref() == Some(command) {
            Err(CommandFailure::exited(1, "step failed"))
        } else {
            Ok(CommandResult::default())
        }
    }
}

/// Every event up to and including `RunFinished`
fn collect_run(events: &EventReceiver) -> Vec<EngineEvent> {
    let mut out = Vec::new();
    while let Some(event) = events.recv_timeout(Duration::from_secs(5)) {
        let done = matches!(event, EngineEvent::RunFinished { .. });
        out.push(event);
        if done {
            return out;
        }
    }
    panic!("run did not finish; got {:?}", out);
}

fn run_case(reboot_flags: &[bool], fail_at: Option<usize>) -> (RunOutcome, Vec<String>, Vec<EngineEvent>) {
    let recorder = Arc::new(Recorder {
        fail_on: fail_at.map(|k| STEP_IDS[k].to_string()),
        ..Recorder::default()
    });
    let (notifier, events) = notification_channel();
    let engine = OptimizationEngine::new(
        Arc::new(registry(reboot_flags)),
        recorder.clone(),
        notifier,
    );

    let ids = STEP_IDS[..reboot_flags.len()].iter().map(|s| s.to_string()).collect();
    let RunStart::Started(handle) = engine.start(Selection::new(ids)) else {
        panic!("run did not start");
    };
    let outcome = handle.join().unwrap();
    let commands = recorder.commands.lock().unwrap().clone();
    (outcome, commands, collect_run(&events))
}

fn case_strategy() -> impl Strategy<Value = (Vec<bool>, Option<usize>)> {
    prop::collection::vec(any::<bool>(), 1..=MAX_STEPS).prop_flat_map(|flags| {
        let n = flags.len();
        (Just(flags), prop::option::of(0..n))
    })
}

// =============================================================================
// Ordering and fail-fast properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Tasks run in selection order and nothing runs after a failure
    #[test]
    fn executes_prefix_up_to_failure((flags, fail_at) in case_strategy()) {
        let (outcome, commands, _) = run_case(&flags, fail_at);
        let expected_len = fail_at.map_or(flags.len(), |k| k + 1);
        prop_assert_eq!(commands, STEP_IDS[..expected_len].to_vec());
        prop_assert_eq!(outcome.is_success(), fail_at.is_none());
    }

    /// Progress goes 1/N, 2/N, ... and stops at the failure
    #[test]
    fn progress_counts_successes((flags, fail_at) in case_strategy()) {
        let (_, _, events) = run_case(&flags, fail_at);
        let n = flags.len();
        let progress: Vec<Progress> = events
            .iter()
            .filter_map(|e| match e {
                EngineEvent::Progress(p) => Some(*p),
                _ => None,
            })
            .collect();

        let completed = fail_at.unwrap_or(n);
        let expected: Vec<Progress> = (1..=completed)
            .map(|k| Progress { completed: k, total: n })
            .collect();
        prop_assert_eq!(progress, expected);
    }

    /// One terminal event, last, with the right success flag.
    /// Exactly one error on failure, none on success.
    #[test]
    fn run_finishes_exactly_once((flags, fail_at) in case_strategy()) {
        let (_, _, events) = run_case(&flags, fail_at);

        prop_assert_eq!(events.first(), Some(&EngineEvent::Toast(RUN_STARTED.to_string())));
        let finished = events
            .iter()
            .filter(|e| matches!(e, EngineEvent::RunFinished { .. }))
            .count();
        prop_assert_eq!(finished, 1);
        prop_assert_eq!(
            events.last(),
            Some(&EngineEvent::RunFinished { enable_trigger: true, success: fail_at.is_none() })
        );

        let errors = events.iter().filter(|e| matches!(e, EngineEvent::Error { .. })).count();
        prop_assert_eq!(errors, usize::from(fail_at.is_some()));
    }

    /// The reboot notice appears iff a completed task asked for one
    #[test]
    fn reboot_notice_tracks_completed_tasks(flags in prop::collection::vec(any::<bool>(), 1..=MAX_STEPS)) {
        let (outcome, _, events) = run_case(&flags, None);
        let expected = flags.iter().any(|&r| r);

        prop_assert_eq!(outcome, RunOutcome::Completed { reboot_required: expected });
        let summary = completion_message(expected);
        prop_assert!(events.contains(&EngineEvent::Status(summary.clone())));
        prop_assert!(events.contains(&EngineEvent::Toast(summary)));
    }
}

#[test]
fn failure_reports_label_then_error() {
    let (_, _, events) = run_case(&[false, true, false], Some(1));
    let tail: Vec<_> = events.iter().skip_while(|e| **e != EngineEvent::Status("Applying: t1...".into())).collect();

    assert_eq!(
        tail,
        [
            &EngineEvent::Status("Applying: t1...".into()),
            &EngineEvent::Status("Failed: t1".into()),
            &EngineEvent::Error {
                message: "Command failed with exit code 1".into(),
                details: "step failed".into(),
            },
            &EngineEvent::RunFinished { enable_trigger: true, success: false },
        ]
    );
}

#[test]
fn failed_reboot_task_does_not_set_reboot_flag() {
    let (outcome, _, events) = run_case(&[true], Some(0));
    assert!(matches!(outcome, RunOutcome::Failed { ref task_id, .. } if task_id == "t0"));
    assert!(!events
        .iter()
        .any(|e| matches!(e, EngineEvent::Status(s) if s.contains("reboot"))));
}

// =============================================================================
// At most one run
// =============================================================================

/// Holds every command until released
struct Gate {
    open: AtomicBool,
}

impl CommandRunner for Gate {
    fn run(&self, _command: &str) -> Result<CommandResult, CommandFailure> {
        while !self.open.load(Ordering::SeqCst) {
            thread::sleep(Duration::from_millis(5));
        }
        Ok(CommandResult::default())
    }
}

#[test]
fn second_start_is_rejected_while_running() {
    let gate = Arc::new(Gate { open: AtomicBool::new(false) });
    let (notifier, events) = notification_channel();
    let engine = OptimizationEngine::new(Arc::new(registry(&[false, false])), gate.clone(), notifier);

    let RunStart::Started(handle) = engine.start(Selection::new(vec!["t0".into()])) else {
        panic!("first run did not start");
    };
    assert!(engine.is_running());
    assert!(matches!(
        engine.start(Selection::new(vec!["t1".into()])),
        RunStart::AlreadyRunning
    ));

    gate.open.store(true, Ordering::SeqCst);
    assert!(handle.join().unwrap().is_success());

    // Only the first run produced events
    let run = collect_run(&events);
    assert!(!run.contains(&EngineEvent::Status("Applying: t1...".into())));
    assert!(events.drain().is_empty());
}

#[test]
fn empty_start_is_rejected_while_running() {
    let gate = Arc::new(Gate { open: AtomicBool::new(false) });
    let (notifier, events) = notification_channel();
    let engine = OptimizationEngine::new(Arc::new(registry(&[false])), gate.clone(), notifier);

    let RunStart::Started(handle) = engine.start(Selection::new(vec!["t0".into()])) else {
        panic!("first run did not start");
    };
    assert!(matches!(engine.start(Selection::default()), RunStart::AlreadyRunning));

    gate.open.store(true, Ordering::SeqCst);
    assert!(handle.join().unwrap().is_success());

    let run = collect_run(&events);
    let finished = run
        .iter()
        .filter(|e| matches!(e, EngineEvent::RunFinished { .. }))
        .count();
    assert_eq!(finished, 1);
    assert!(!run.contains(&EngineEvent::Status("No optimizations selected.".into())));
    assert_eq!(run.last(), Some(&EngineEvent::RunFinished { enable_trigger: true, success: true }));
    assert!(events.drain().is_empty());
}

/// Starts racing the end of a run either lose cleanly or begin after it
#[test]
fn start_racing_run_end_never_interleaves() {
    let (notifier, events) = notification_channel();
    let engine = Arc::new(OptimizationEngine::new(
        Arc::new(registry(&[false, false])),
        Arc::new(Recorder::default()),
        notifier,
    ));

    let RunStart::Started(first) = engine.start(Selection::new(vec!["t0".into()])) else {
        panic!("first run did not start");
    };

    let racer = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || loop {
            match engine.start(Selection::new(vec!["t1".into()])) {
                RunStart::Started(handle) => return handle,
                RunStart::AlreadyRunning => thread::yield_now(),
                other => panic!("unexpected start result {:?}", other),
            }
        })
    };

    first.join().unwrap();
    racer.join().unwrap().join().unwrap();

    let first_run = collect_run(&events);
    assert!(!first_run.contains(&EngineEvent::Status("Applying: t1...".into())));
    let second_run = collect_run(&events);
    assert!(second_run.contains(&EngineEvent::Status("Applying: t1...".into())));
}

#[test]
fn engine_accepts_new_run_as_soon_as_finished_arrives() {
    let (notifier, events) = notification_channel();
    let engine = OptimizationEngine::new(
        Arc::new(registry(&[false])),
        Arc::new(Recorder::default()),
        notifier,
    );

    for _ in 0..20 {
        let RunStart::Started(handle) = engine.start(Selection::new(vec!["t0".into()])) else {
            panic!("run rejected after RunFinished");
        };
        collect_run(&events);
        handle.join().unwrap();
    }
}

#[test]
fn empty_selection_never_spawns() {
    let recorder = Arc::new(Recorder::default());
    let (notifier, events) = notification_channel();
    let engine = OptimizationEngine::new(Arc::new(registry(&[true])), recorder.clone(), notifier);

    assert!(matches!(engine.start(Selection::default()), RunStart::NothingSelected));
    let run = collect_run(&events);
    assert_eq!(run.first(), Some(&EngineEvent::Status("No optimizations selected.".into())));
    assert!(recorder.commands.lock().unwrap().is_empty());
}
