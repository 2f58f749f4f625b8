//! Non-interactive front end: `list`, `apply` and `validate`.
//!
//! `apply` drives the same engine as the UI and prints each event as it
//! arrives, so the output reads like the UI's status line over time.

use anyhow::{bail, Result};
use log::{error, info};
use std::panic;
use std::path::Path;

use crate::config::Profile;
use crate::engine::{OptimizationEngine, RunStart};
use crate::events::{EngineEvent, EventReceiver};
use crate::tasks::{Selection, Task, TaskCategory, TaskRegistry};

/// One line per task: id, category, reboot marker, label
pub fn format_catalog(registry: &TaskRegistry, category: Option<TaskCategory>) -> Vec<String> {
    let tasks: Box<dyn Iterator<Item = &Task>> = match category {
        Some(category) => Box::new(registry.by_category(category)),
        None => Box::new(registry.tasks().iter()),
    };
    tasks
        .map(|t| {
            format!(
                "{:<26} {:<11} {} {}\n{:>40}{}",
                t.id,
                t.category,
                if t.requires_reboot { "⟳" } else { " " },
                t.plain_label(),
                "",
                t.description
            )
        })
        .collect()
}

pub fn list(registry: &TaskRegistry, category: Option<TaskCategory>) {
    for line in format_catalog(registry, category) {
        println!("{}", line);
    }
}

/// Text printed for an event; `None` for events with no console form
pub fn format_event(event: &EngineEvent) -> Option<String> {
    match event {
        EngineEvent::Status(text) => Some(format!("  {}", text)),
        EngineEvent::Progress(p) => Some(format!("  [{}/{}] {}%", p.completed, p.total, p.percent())),
        EngineEvent::Toast(text) => Some(format!("✓ {}", text)),
        EngineEvent::Error { message, details } => Some(format!("❌ {}\n   {}", message, details)),
        EngineEvent::RunFinished { .. } => None,
    }
}

/// Resolve ids given on the command line or in a profile file
pub fn load_selection(
    ids: Vec<String>,
    profile: Option<&Path>,
    registry: &TaskRegistry,
) -> Result<Selection> {
    let ids = match profile {
        Some(path) => {
            info!("Loading profile from: {:?}", path);
            let profile = Profile::load_from_file(path)?;
            profile.validate(registry)?;
            profile.tasks
        }
        None => ids,
    };
    Ok(Selection::resolve(ids, registry)?)
}

/// Run a selection to completion, printing events. Returns whether it succeeded.
pub fn apply(engine: &OptimizationEngine, events: &EventReceiver, selection: Selection) -> Result<bool> {
    let handle = match engine.start(selection) {
        RunStart::Started(handle) => handle,
        RunStart::NothingSelected => return Ok(print_until_finished(events)),
        RunStart::SpawnFailed => {
            print_until_finished(events);
            return Ok(false);
        }
        RunStart::AlreadyRunning => bail!("An optimization run is already in progress"),
    };

    let success = print_until_finished(events);

    match handle.join() {
        Ok(outcome) => {
            info!("Headless run finished: {:?}", outcome);
            Ok(success && outcome.is_success())
        }
        // A worker panic is an invariant violation; let it take the process down
        Err(payload) => panic::resume_unwind(payload),
    }
}

fn print_until_finished(events: &EventReceiver) -> bool {
    while let Some(event) = events.recv() {
        if let EngineEvent::RunFinished { success, .. } = event {
            return success;
        }
        if let Some(line) = format_event(&event) {
            if matches!(event, EngineEvent::Error { .. }) {
                eprintln!("{}", line);
            } else {
                println!("{}", line);
            }
        }
    }
    error!("Notification channel closed before the run finished");
    false
}

/// Check a profile file; prints the outcome, returns whether it is valid
pub fn validate_profile(path: &Path, registry: &TaskRegistry) -> bool {
    info!("Validating profile file: {:?}", path);
    let result = Profile::load_from_file(path)
        .and_then(|profile| profile.validate(registry).map(|_| profile).map_err(Into::into));

    match result {
        Ok(profile) => {
            println!("✓ Profile is valid: {} optimization(s)", profile.tasks.len());
            true
        }
        Err(e) => {
            error!("Profile validation failed: {:#}", e);
            eprintln!("✗ Profile validation failed: {:#}", e);
            false
        }
    }
}
