//! User interface rendering module
//!
//! - `header` - Title bar, progress gauge, status line, apply button, nav bar
//! - `tasks` - Optimization list and description pane
//! - `dialogs` - Error dialog and toasts
//!
//! Rendering reads `AppState` and nothing else; it never mutates it.

mod dialogs;
mod header;
mod tasks;

use crate::app::AppState;
use crate::components::help_overlay::HelpOverlay;
use crate::components::keybindings::{KeyMode, KeybindingContext};
use header::HeaderRenderer;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

pub use header::TITLE;

/// UI renderer that handles all drawing operations
pub struct UiRenderer {
    header: HeaderRenderer,
}

impl Default for UiRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl UiRenderer {
    pub fn new() -> Self {
        Self {
            header: HeaderRenderer::new(),
        }
    }

    /// Render the complete UI with keybinding context
    pub fn render(&self, f: &mut Frame, state: &AppState, keybinding_ctx: &KeybindingContext) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(6),    // Tasks + details
                Constraint::Length(3), // Progress
                Constraint::Length(3), // Status
                Constraint::Length(3), // Apply button
                Constraint::Length(1), // Navigation bar
            ])
            .split(f.area());

        self.header.render_header(f, main_chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[1]);
        tasks::render_task_list(f, body[0], state);
        tasks::render_description(f, body[1], state);

        header::render_progress_bar(f, main_chunks[2], state);
        header::render_status_line(f, main_chunks[3], state);
        header::render_apply_button(f, main_chunks[4], state);

        let mode = state.key_mode();
        header::render_nav_bar(f, main_chunks[5], &keybinding_ctx.get_nav_items(mode));

        // Overlays, bottom to top
        dialogs::render_toasts(f, state);
        if state.help_visible {
            HelpOverlay::new(KeyMode::Help, keybinding_ctx).render(f, f.area());
        }
        if let Some(dialog) = &state.error_dialog {
            dialogs::render_error_dialog(f, dialog);
        }
    }
}
