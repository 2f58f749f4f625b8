//! Application state definitions
//!
//! `AppState` is owned by the update loop. The worker never touches it; it only
//! changes through `apply_event`, in the order events are delivered.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::components::keybindings::KeyMode;
use crate::events::{EngineEvent, Progress};
use crate::tasks::{TaskCategory, TaskRegistry};

/// How long a toast stays on screen
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Maximum number of toasts stacked at once
const MAX_TOASTS: usize = 4;

pub const WELCOME_MESSAGE: &str = "Select optimizations and press Enter to apply.";
pub const STARTING_MESSAGE: &str = "Starting optimizations...";

/// One row of the optimization list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: String,
    /// Already decoded to plain text
    pub label: String,
    pub description: String,
    pub category: TaskCategory,
    pub requires_reboot: bool,
    pub enabled: bool,
}

/// Modal shown when a task fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDialog {
    pub message: String,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub text: String,
    pub expires_at: Instant,
}

/// Main application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub rows: Vec<TaskRow>,
    /// Highlighted row
    pub cursor: usize,
    pub status_message: String,
    /// Last progress reported in the current run
    pub progress: Option<Progress>,
    /// Whether the apply trigger accepts input
    pub trigger_enabled: bool,
    pub error_dialog: Option<ErrorDialog>,
    pub toasts: VecDeque<Toast>,
    pub help_visible: bool,
    /// Outcome of the most recent finished run, if any
    pub last_run_success: Option<bool>,
}

impl AppState {
    /// One row per registered task, all toggles off
    pub fn from_registry(registry: &TaskRegistry) -> Self {
        let rows = registry
            .tasks()
            .iter()
            .map(|task| TaskRow {
                id: task.id.to_string(),
                label: task.plain_label(),
                description: task.description.to_string(),
                category: task.category,
                requires_reboot: task.requires_reboot,
                enabled: false,
            })
            .collect();

        Self {
            rows,
            cursor: 0,
            status_message: WELCOME_MESSAGE.to_string(),
            progress: None,
            trigger_enabled: true,
            error_dialog: None,
            toasts: VecDeque::new(),
            help_visible: false,
            last_run_success: None,
        }
    }

    pub fn current_row(&self) -> Option<&TaskRow> {
        self.rows.get(self.cursor)
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.rows.len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.rows.len().saturating_sub(1);
    }

    pub fn toggle_current(&mut self) {
        if let Some(row) = self.rows.get_mut(self.cursor) {
            row.enabled = !row.enabled;
        }
    }

    /// Enable everything, or clear everything if all rows are already on
    pub fn toggle_all(&mut self) {
        let target = !self.rows.iter().all(|r| r.enabled);
        for row in &mut self.rows {
            row.enabled = target;
        }
    }

    /// Enable exactly the given ids (profile load)
    pub fn select_only(&mut self, ids: &[String]) {
        for row in &mut self.rows {
            row.enabled = ids.contains(&row.id);
        }
    }

    /// Snapshot of enabled ids, in list order
    pub fn selected_ids(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter(|r| r.enabled)
            .map(|r| r.id.clone())
            .collect()
    }

    /// Number of enabled rows that will ask for a reboot
    pub fn selected_reboot_count(&self) -> usize {
        self.rows.iter().filter(|r| r.enabled && r.requires_reboot).count()
    }

    /// Lock the trigger and reset the progress display.
    ///
    /// Returns false (and changes nothing) when the trigger is already locked.
    pub fn begin_run(&mut self) -> bool {
        if !self.trigger_enabled {
            return false;
        }
        self.trigger_enabled = false;
        self.progress = None;
        self.error_dialog = None;
        self.status_message = STARTING_MESSAGE.to_string();
        true
    }

    pub fn is_running(&self) -> bool {
        !self.trigger_enabled
    }

    /// Apply one delivered engine event
    pub fn apply_event(&mut self, event: EngineEvent, now: Instant) {
        match event {
            EngineEvent::Status(text) => self.status_message = text,
            EngineEvent::Progress(progress) => self.progress = Some(progress),
            EngineEvent::Toast(text) => self.push_toast(text, now),
            EngineEvent::Error { message, details } => {
                self.error_dialog = Some(ErrorDialog { message, details });
            }
            EngineEvent::RunFinished {
                enable_trigger,
                success,
            } => {
                self.trigger_enabled = enable_trigger;
                self.last_run_success = Some(success);
            }
        }
    }

    pub fn push_toast(&mut self, text: String, now: Instant) {
        if self.toasts.len() == MAX_TOASTS {
            self.toasts.pop_front();
        }
        self.toasts.push_back(Toast {
            text,
            expires_at: now + TOAST_DURATION,
        });
    }

    pub fn expire_toasts(&mut self, now: Instant) {
        self.toasts.retain(|t| t.expires_at > now);
    }

    pub fn dismiss_error(&mut self) {
        self.error_dialog = None;
    }

    pub fn toggle_help(&mut self) {
        self.help_visible = !self.help_visible;
    }

    /// Which layer receives keys; an error dialog sits above help
    pub fn key_mode(&self) -> KeyMode {
        if self.error_dialog.is_some() {
            KeyMode::ErrorDialog
        } else if self.help_visible {
            KeyMode::Help
        } else {
            KeyMode::TaskList
        }
    }
}
