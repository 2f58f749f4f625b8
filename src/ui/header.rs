//! Header, status and footer rendering
//!
//! The fixed chrome around the task list: title bar, progress gauge, status
//! line, apply button and the key hint bar.

use crate::app::AppState;
use crate::components::keybindings::NavBarItem;
use crate::theme::{Colors, Styles};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

pub const TITLE: &str = "Debian Optimizer";

/// Renders the title bar
pub struct HeaderRenderer {
    title_line: Line<'static>,
}

impl Default for HeaderRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderRenderer {
    pub fn new() -> Self {
        Self {
            title_line: Line::from(vec![
                Span::styled("debtune", Styles::title()),
                Span::styled(" · ", Styles::text_muted()),
                Span::styled(TITLE, Styles::text()),
            ]),
        }
    }

    pub fn render_header(&self, f: &mut Frame, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let header = Paragraph::new(self.title_line.clone())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Styles::border_active()),
            )
            .alignment(Alignment::Center);
        f.render_widget(header, area);
    }
}

/// Progress of the current run; empty until the first task completes
pub fn render_progress_bar(f: &mut Frame, area: Rect, state: &AppState) {
    let (ratio, label) = match state.progress {
        Some(p) => (p.fraction(), format!("{}/{} ({}%)", p.completed, p.total, p.percent())),
        None if state.is_running() => (0.0, "Starting...".to_string()),
        None => (0.0, String::new()),
    };

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Progress"))
        .gauge_style(Styles::progress())
        .ratio(ratio.clamp(0.0, 1.0))
        .label(label);
    f.render_widget(gauge, area);
}

pub fn render_status_line(f: &mut Frame, area: Rect, state: &AppState) {
    let style = match state.last_run_success {
        Some(false) if !state.is_running() => Styles::error(),
        _ => Styles::text(),
    };
    let status = Paragraph::new(state.status_message.as_str())
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(style)
        .wrap(Wrap { trim: true });
    f.render_widget(status, area);
}

/// The trigger; dimmed while a run holds it
pub fn render_apply_button(f: &mut Frame, area: Rect, state: &AppState) {
    let (text, style, border) = if state.trigger_enabled {
        (
            "  APPLY SELECTED (Enter)  ",
            Styles::button_active(),
            Styles::border_active(),
        )
    } else {
        ("  APPLYING...  ", Styles::button_disabled(), Styles::border_inactive())
    };

    let button = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).border_style(border))
        .alignment(Alignment::Center)
        .style(style);
    f.render_widget(button, area);
}

/// Render the navigation bar
pub fn render_nav_bar(f: &mut Frame, area: Rect, items: &[NavBarItem]) {
    let mut spans = Vec::with_capacity(items.len() * 3);
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", Styles::nav_hint()));
        }
        spans.push(Span::styled(
            format!(" {} ", item.key_display),
            Style::default()
                .fg(Colors::SELECTED_FG)
                .bg(Colors::FG_SECONDARY)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!(" {}", item.action_label), Styles::nav_hint()));
    }

    let nav = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    f.render_widget(nav, area);
}
