//! Dialog rendering module
//!
//! Modal error dialog and the transient toast stack.

use crate::app::{AppState, ErrorDialog};
use crate::components::floating_window::{FloatingWindow, FloatingWindowConfig};
use crate::theme::{Colors, Styles};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Widest a toast may get
const TOAST_WIDTH: u16 = 50;

pub fn render_error_dialog(f: &mut Frame, dialog: &ErrorDialog) {
    let config = FloatingWindowConfig {
        title: "Error".to_string(),
        width_percent: 60,
        height_percent: 40,
        min_width: 40,
        min_height: 8,
        max_width: 90,
        max_height: 20,
        border_style: Styles::error(),
        background: Styles::panel_bg_danger(),
    };

    let lines = vec![
        Line::from(Span::styled(
            dialog.message.clone(),
            Style::default()
                .fg(Colors::ERROR)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(dialog.details.clone(), Styles::text())),
    ];

    FloatingWindow::new(config).render_lines(
        f,
        f.area(),
        &lines,
        Some("Press Enter or Esc to dismiss"),
    );
}

/// Newest toast at the top, stacked down the right edge
pub fn render_toasts(f: &mut Frame, state: &AppState) {
    let screen = f.area();
    let width = TOAST_WIDTH.min(screen.width);
    let mut y = screen.y + 1;

    for toast in state.toasts.iter().rev() {
        let height = toast_height(&toast.text, width);
        if y + height > screen.y + screen.height {
            break;
        }
        let area = Rect {
            x: screen.x + screen.width - width,
            y,
            width,
            height,
        };
        f.render_widget(Clear, area);
        let widget = Paragraph::new(toast.text.as_str())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Styles::success())
                    .style(Styles::panel_bg()),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .style(Styles::text());
        f.render_widget(widget, area);
        y += height;
    }
}

/// Border plus wrapped text, at most three lines of text
fn toast_height(text: &str, width: u16) -> u16 {
    let inner = usize::from(width.saturating_sub(2)).max(1);
    let lines = text.chars().count().div_ceil(inner).clamp(1, 3);
    lines as u16 + 2
}
