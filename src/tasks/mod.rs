//! Optimization tasks and the registry that holds them.
//!
//! A `Task` is a value: metadata plus a plain `fn` action. Actions never reach
//! ambient state; everything they may touch comes in through `TaskContext`:
//! - `run()` executes a privileged command via the configured `CommandRunner`
//! - `advise()` pushes an extra status line to the operator
//!
//! The built-in catalog lives in the submodules, grouped the way the
//! `TaskCategory` enum groups them.

mod boot;
mod catalog;
mod filesystem;
mod kernel;
mod packages;

use std::collections::HashMap;
use std::fmt;

use strum::{Display, EnumIter, EnumString};

use crate::error::{CommandFailure, DebtuneError, Result};
use crate::events::Notifier;
use crate::markup;
use crate::runner::{CommandResult, CommandRunner};

pub use catalog::CATALOG;

/// Signature of every task action
pub type TaskAction = fn(&TaskContext<'_>) -> std::result::Result<(), CommandFailure>;

/// Grouping used by `list --category` and the interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum TaskCategory {
    Filesystem,
    Kernel,
    Boot,
    Apt,
    Packages,
    Drivers,
    Xanmod,
}

/// One independently selectable optimization
#[derive(Clone, Copy)]
pub struct Task {
    /// Stable key, unique within a registry
    pub id: &'static str,
    /// Display name; may contain markup such as `&amp;`
    pub label: &'static str,
    pub action: TaskAction,
    pub requires_reboot: bool,
    pub description: &'static str,
    /// Freedesktop icon name
    pub icon: &'static str,
    pub category: TaskCategory,
}

impl Task {
    /// Label with markup decoded, ready for status lines
    pub fn plain_label(&self) -> String {
        markup::plain_text(self.label)
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("requires_reboot", &self.requires_reboot)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

/// What a task action may use while it runs
pub struct TaskContext<'a> {
    runner: &'a dyn CommandRunner,
    notifier: &'a Notifier,
}

impl<'a> TaskContext<'a> {
    pub fn new(runner: &'a dyn CommandRunner, notifier: &'a Notifier) -> Self {
        Self { runner, notifier }
    }

    /// Run one privileged command
    pub fn run(&self, command: &str) -> std::result::Result<CommandResult, CommandFailure> {
        self.runner.run(command)
    }

    /// Show a follow-up instruction; not part of progress accounting
    pub fn advise(&self, message: impl Into<String>) {
        self.notifier.status(message);
    }
}

/// Read-only lookup from id to task, in display order
#[derive(Debug, Clone)]
pub struct TaskRegistry {
    tasks: Vec<Task>,
    index: HashMap<&'static str, usize>,
}

impl TaskRegistry {
    /// The full built-in catalog
    pub fn builtin() -> Self {
        let tasks = CATALOG.to_vec();
        let index = tasks.iter().enumerate().map(|(i, t)| (t.id, i)).collect();
        Self { tasks, index }
    }

    /// Build a registry from arbitrary tasks, rejecting duplicate ids
    pub fn from_tasks(tasks: Vec<Task>) -> Result<Self> {
        let mut index = HashMap::with_capacity(tasks.len());
        for (i, task) in tasks.iter().enumerate() {
            if index.insert(task.id, i).is_some() {
                return Err(DebtuneError::registry(format!(
                    "duplicate optimization id '{}'",
                    task.id
                )));
            }
        }
        Ok(Self { tasks, index })
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.index.get(id).map(|&i| &self.tasks[i])
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn by_category(&self, category: TaskCategory) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |t| t.category == category)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Ordered snapshot of the ids chosen for one run.
///
/// Order is the operator's intended sequencing and is never re-sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<String>,
}

impl Selection {
    /// Trust the caller: ids come straight from registry keys (the interface)
    pub fn new(ids: Vec<String>) -> Self {
        Self { ids }
    }

    /// Check operator-supplied ids (CLI, profiles) against the registry
    pub fn resolve<I, S>(ids: I, registry: &TaskRegistry) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        if let Some(unknown) = ids.iter().find(|id| registry.get(id).is_none()) {
            return Err(DebtuneError::unknown_task(unknown.as_str()));
        }
        Ok(Self { ids })
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
