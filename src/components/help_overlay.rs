//! Help overlay component
//!
//! Displays the keybindings for the focused mode in a floating window.

use super::floating_window::{FloatingWindow, FloatingWindowConfig};
use super::keybindings::{HelpSection, KeyMode, KeybindingContext};
use crate::theme::{Colors, Symbols};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    Frame,
};

/// Help overlay component
pub struct HelpOverlay {
    window: FloatingWindow,
    content: Vec<Line<'static>>,
}

impl HelpOverlay {
    /// Create a help overlay for the given mode
    pub fn new(mode: KeyMode, keybinding_ctx: &KeybindingContext) -> Self {
        let config = FloatingWindowConfig {
            title: "Help".to_string(),
            width_percent: 60,
            height_percent: 70,
            min_width: 50,
            min_height: 15,
            max_width: 80,
            max_height: 35,
            ..Default::default()
        };

        let sections = keybinding_ctx.get_help_content(mode);

        Self {
            window: FloatingWindow::new(config),
            content: Self::build_content(&sections),
        }
    }

    fn build_content(sections: &[HelpSection]) -> Vec<Line<'static>> {
        let mut lines: Vec<Line<'static>> = Vec::new();

        lines.push(Line::from(vec![Span::styled(
            "  debtune Help  ",
            Style::default()
                .fg(Colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        )]));
        lines.push(Line::from(""));

        for section in sections {
            lines.push(Line::from(vec![Span::styled(
                format!("  {}  ", section.title),
                Style::default()
                    .fg(Colors::SUCCESS)
                    .add_modifier(Modifier::BOLD),
            )]));

            for (key, description) in &section.items {
                lines.push(Line::from(vec![
                    Span::raw("    "),
                    Span::styled(
                        format!("{:<10}", key),
                        Style::default()
                            .fg(Colors::PRIMARY)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(description.clone(), Style::default().fg(Colors::FG_PRIMARY)),
                ]));
            }
            lines.push(Line::from(""));
        }

        lines.push(Line::from(vec![
            Span::styled(
                format!("  {} ", Symbols::REBOOT),
                Style::default().fg(Colors::WARNING),
            ),
            Span::styled(
                "needs a reboot to take effect",
                Style::default().fg(Colors::FG_SECONDARY),
            ),
        ]));

        lines
    }

    /// Render the help overlay
    pub fn render(&self, f: &mut Frame, parent: Rect) {
        self.window
            .render_lines(f, parent, &self.content, Some("Press ? or Esc to close"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_includes_every_section() {
        let ctx = KeybindingContext::new();
        let overlay = HelpOverlay::new(KeyMode::TaskList, &ctx);
        let text: Vec<String> = overlay
            .content
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();

        assert!(text.iter().any(|l| l.contains("Navigation")));
        assert!(text.iter().any(|l| l.contains("Toggle all")));
        assert!(text.iter().any(|l| l.contains("Ctrl+C")));
    }
}
