pub mod analysis_view;
pub mod forms;
pub mod stage_bar;
pub mod status_bar;
pub mod timeline_grid;

use crate::app::mode::Mode;
use crate::app::AppState;

use ratatui::{
    layout::{Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

const HELP_SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("h j k l / arrows", "Move the cursor one cell"),
            ("[ / ]", "Previous / next month"),
            ("PgUp / PgDn", "Previous / next month"),
            ("g", "Jump to today"),
            ("mouse wheel", "Scroll tasks (shift: days)"),
        ],
    ),
    (
        "Selection",
        &[
            ("Space / click", "Select the cell, dropping the rest"),
            ("m / ctrl+click", "Toggle the cell in the selection"),
            ("Shift+arrows", "Extend from the last selected cell"),
            ("shift+click", "Add the range from the last selected cell"),
            ("v / drag", "Start / finish a rectangle"),
            ("Esc", "Clear the selection"),
        ],
    ),
    (
        "Stages",
        &[
            ("s / Enter", "Open the stage bar for the selection"),
            ("p c f", "Planning / completed / failed (in the bar)"),
            ("Del / 0", "Clear the stage (in the bar)"),
            ("Q", "Quick select days of whole months"),
        ],
    ),
    (
        "Tasks",
        &[
            ("a", "Add a task"),
            ("d", "Delete the task under the cursor"),
            ("t", "Cycle the task status"),
            ("T", "Edit the timeline title"),
            ("H", "Edit the task column header"),
        ],
    ),
    (
        "Other",
        &[
            ("e", "Export as JSON or CSV"),
            ("A", "Analysis"),
            ("?", "Toggle this help"),
            ("q", "Quit"),
        ],
    ),
];

/// Number of lines the help overlay renders, for scroll clamping.
pub fn help_line_count() -> u16 {
    let entries: usize = HELP_SECTIONS.iter().map(|(_, keys)| keys.len() + 2).sum();
    (entries + 2) as u16
}

pub fn render(f: &mut Frame, state: &mut AppState) {
    // Update terminal dimensions for click and scroll calculations
    state.terminal_width = f.area().width;
    state.terminal_height = f.area().height;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Min(1),    // Grid
            Constraint::Length(1), // Stage bar
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    render_title(f, state, chunks[0]);
    timeline_grid::render(f, state, chunks[1]);
    stage_bar::render(f, state, chunks[2]);
    status_bar::render(f, state, chunks[3]);

    match state.mode {
        Mode::QuickSelect => forms::render_quick_select(f, state),
        Mode::ConfirmQuickSelect => forms::render_quick_select_confirm(f, state),
        Mode::Export => forms::render_export(f, state),
        Mode::Analysis => analysis_view::render(f, state),
        _ => {}
    }

    if state.show_help {
        render_help_overlay(f, state);
    }
}

fn render_title(f: &mut Frame, state: &AppState, area: Rect) {
    let title = Line::from(vec![
        Span::styled(
            format!(" {} ", state.timeline.title()),
            Style::default()
                .fg(state.theme.foreground)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} ", state.timeline.calendar().year()),
            Style::default().fg(state.theme.muted),
        ),
    ]);
    f.render_widget(
        Paragraph::new(title).style(Style::default().bg(state.theme.background)),
        area,
    );
}

fn render_help_overlay(f: &mut Frame, state: &AppState) {
    let key_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(state.theme.foreground);
    let section_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            "  Skill Timeline Help",
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for (section, keys) in HELP_SECTIONS {
        lines.push(Line::from(Span::styled(format!("  ── {} ──", section), section_style)));
        for (key, desc) in keys.iter() {
            lines.push(Line::from(vec![
                Span::styled(format!("    {:<20}", key), key_style),
                Span::styled(*desc, desc_style),
            ]));
        }
        lines.push(Line::from(""));
    }

    let area = centered_rect(70, 80, f.area());
    let total_lines = lines.len() as u16;
    let inner_height = area.height.saturating_sub(2);

    let max_scroll = total_lines.saturating_sub(inner_height);
    let scroll_offset = state.help_scroll.min(max_scroll) as usize;

    let visible_items: Vec<ListItem> = lines
        .into_iter()
        .skip(scroll_offset)
        .take(inner_height as usize)
        .map(ListItem::new)
        .collect();

    let list_widget = List::new(visible_items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .title_bottom(Line::from(" ↑↓ scroll ").centered())
            .style(Style::default().bg(state.theme.background)),
    );

    f.render_widget(Clear, area);
    f.render_widget(list_widget, area);

    if total_lines > inner_height {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));
        let mut scrollbar_state = ScrollbarState::new(max_scroll as usize + 1).position(scroll_offset);

        f.render_stateful_widget(
            scrollbar,
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
