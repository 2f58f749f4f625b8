//! Floating window component
//!
//! A bordered, centered box drawn over the main screen. Used by the help
//! overlay and the error dialog.

use crate::theme::Styles;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Size and look of a floating window
#[derive(Debug, Clone)]
pub struct FloatingWindowConfig {
    pub title: String,
    pub width_percent: u16,
    pub height_percent: u16,
    pub min_width: u16,
    pub min_height: u16,
    pub max_width: u16,
    pub max_height: u16,
    pub border_style: Style,
    pub background: Style,
}

impl Default for FloatingWindowConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            width_percent: 60,
            height_percent: 50,
            min_width: 40,
            min_height: 8,
            max_width: 100,
            max_height: 40,
            border_style: Styles::border_active(),
            background: Styles::panel_bg(),
        }
    }
}

pub struct FloatingWindow {
    config: FloatingWindowConfig,
}

impl FloatingWindow {
    pub fn new(config: FloatingWindowConfig) -> Self {
        Self { config }
    }

    /// Centered area inside `parent`, clamped to the configured bounds
    pub fn area(&self, parent: Rect) -> Rect {
        let c = &self.config;
        let width = percent_of(parent.width, c.width_percent)
            .clamp(c.min_width, c.max_width)
            .min(parent.width);
        let height = percent_of(parent.height, c.height_percent)
            .clamp(c.min_height, c.max_height)
            .min(parent.height);

        Rect {
            x: parent.x + (parent.width - width) / 2,
            y: parent.y + (parent.height - height) / 2,
            width,
            height,
        }
    }

    /// Draw `lines` in the window with an optional footer hint
    pub fn render_lines(
        &self,
        f: &mut Frame,
        parent: Rect,
        lines: &[Line<'static>],
        footer: Option<&str>,
    ) {
        let area = self.area(parent);
        if area.width == 0 || area.height == 0 {
            return;
        }

        f.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", self.config.title))
            .title_alignment(Alignment::Center)
            .border_style(self.config.border_style)
            .style(self.config.background);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let footer_height = u16::from(footer.is_some());
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(footer_height)])
            .split(inner);

        let body = Paragraph::new(lines.to_vec()).wrap(Wrap { trim: false });
        f.render_widget(body, chunks[0]);

        if let Some(text) = footer {
            let hint = Paragraph::new(Line::from(Span::styled(text.to_string(), Styles::nav_hint())))
                .alignment(Alignment::Center);
            f.render_widget(hint, chunks[1]);
        }
    }
}

fn percent_of(value: u16, percent: u16) -> u16 {
    (u32::from(value) * u32::from(percent) / 100) as u16
}
