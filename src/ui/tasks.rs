//! Task list and description pane

use crate::app::{AppState, TaskRow};
use crate::theme::{Colors, Styles, Symbols};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub fn render_task_list(f: &mut Frame, area: Rect, state: &AppState) {
    let items: Vec<ListItem> = state
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| task_item(row, i == state.cursor))
        .collect();

    let selected = state.selected_ids().len();
    let title = format!("Optimizations ({}/{} selected)", selected, state.rows.len());
    let border = if state.is_running() {
        Styles::border_inactive()
    } else {
        Styles::border_active()
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border),
    );

    // Only used to keep the cursor scrolled into view
    let mut list_state = ListState::default().with_selected(Some(state.cursor));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn task_item(row: &TaskRow, highlighted: bool) -> ListItem<'static> {
    let cursor = if highlighted { Symbols::CURSOR } else { "  " };
    let toggle_style = if row.enabled {
        Styles::success()
    } else {
        Styles::text_muted()
    };
    let label_style = if highlighted {
        Styles::selected()
    } else if row.enabled {
        Styles::text()
    } else {
        Styles::text_secondary()
    };

    let mut spans = vec![
        Span::styled(cursor, Styles::title()),
        Span::styled(Symbols::toggle(row.enabled), toggle_style),
        Span::raw(" "),
        Span::styled(row.label.clone(), label_style),
    ];
    if row.requires_reboot {
        spans.push(Span::styled(format!(" {}", Symbols::REBOOT), Styles::warning()));
    }

    ListItem::new(Line::from(spans))
}

/// Details for the highlighted task
pub fn render_description(f: &mut Frame, area: Rect, state: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    if let Some(row) = state.current_row() {
        lines.push(Line::from(Span::styled(
            row.label.clone(),
            Style::default()
                .fg(Colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(vec![
            Span::styled("Category: ", Styles::text_muted()),
            Span::styled(row.category.to_string(), Styles::category()),
        ]));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(row.description.clone(), Styles::text())));
        lines.push(Line::from(""));
        if row.requires_reboot {
            lines.push(Line::from(Span::styled(
                format!("{} Requires a reboot to take effect", Symbols::REBOOT),
                Styles::warning(),
            )));
        }
    }

    let reboots = state.selected_reboot_count();
    if reboots > 0 {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("{} selected optimization(s) will need a reboot", reboots),
            Styles::text_muted(),
        )));
    }

    let pane = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Details"))
        .wrap(Wrap { trim: true });
    f.render_widget(pane, area);
}
