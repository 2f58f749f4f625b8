//! debtune library
//!
//! Core of the Debian optimization runner: the task registry, the privileged
//! command runner and the engine that applies a selection, plus the terminal
//! and headless front ends built on them.

pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod headless;
pub mod markup;
pub mod process_guard;
pub mod runner;
pub mod tasks;
pub mod theme;
pub mod ui;

// Re-export main types for convenience
pub use config::{Profile, RunnerConfig};
pub use engine::{OptimizationEngine, RunOutcome, RunStart};
pub use error::{CommandFailure, DebtuneError, FailureKind};
pub use events::{notification_channel, EngineEvent, EventReceiver, Notifier, Progress};
pub use process_guard::{ChildRegistry, CommandProcessGroup, ProcessGuard};
pub use runner::{CommandResult, CommandRunner, DryRunRunner, PrivilegedCommandRunner};
pub use tasks::{Selection, Task, TaskCategory, TaskContext, TaskRegistry};
