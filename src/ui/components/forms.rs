//! Quick-select and export overlays.

use super::centered_rect;
use crate::app::state::ExportFocus;
use crate::app::AppState;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use skill_timeline::calendar::Month;

fn checkbox(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

fn label_style() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

fn key_style() -> Style {
    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
}

/// Three rows of four month checkboxes; the focused one is reversed.
fn month_grid<'a>(
    state: &AppState,
    is_checked: impl Fn(Month) -> bool,
    cursor: Option<usize>,
) -> Vec<Line<'a>> {
    Month::ALL
        .chunks(4)
        .enumerate()
        .map(|(row, months)| {
            let mut spans = vec![Span::raw("  ")];
            for (i, month) in months.iter().enumerate() {
                let index = row * 4 + i;
                let mut style = Style::default().fg(state.theme.foreground);
                if cursor == Some(index) {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                spans.push(Span::styled(
                    format!("{} {:<4}", checkbox(is_checked(*month)), month.short_name()),
                    style,
                ));
                spans.push(Span::raw(" "));
            }
            Line::from(spans)
        })
        .collect()
}

fn render_popup(f: &mut Frame, state: &AppState, area: Rect, title: &str, lines: Vec<Line>) {
    let popup = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string())
                .style(Style::default().bg(state.theme.background)),
        )
        .style(Style::default().fg(state.theme.foreground))
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

pub fn render_quick_select(f: &mut Frame, state: &AppState) {
    let Some(form) = &state.quick_select else {
        return;
    };
    let rule = &form.rule;
    let task_name = state
        .timeline
        .tasks()
        .find(&rule.task_id)
        .map(|t| t.name.as_str())
        .unwrap_or("?");

    let mut lines = vec![
        Line::from(vec![
            Span::styled("  Task:   ", label_style()),
            Span::raw(task_name.to_string()),
            Span::styled("   (j/k)", Style::default().fg(state.theme.muted)),
        ]),
        Line::from(vec![
            Span::styled("  Stage:  ", label_style()),
            Span::styled(
                rule.stage.label(),
                Style::default().fg(state.theme.stage_color(rule.stage)),
            ),
            Span::styled("   (s)", Style::default().fg(state.theme.muted)),
        ]),
        Line::from(vec![
            Span::styled("  Days:   ", label_style()),
            Span::raw(rule.filter.to_string()),
            Span::styled("   (f)", Style::default().fg(state.theme.muted)),
        ]),
        Line::from(""),
        Line::from(Span::styled("  Months", label_style())),
    ];
    lines.extend(month_grid(
        state,
        |m| rule.months.contains(&m),
        Some(form.month_cursor),
    ));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Space", key_style()),
        Span::raw(" toggle  "),
        Span::styled("a", key_style()),
        Span::raw(" all  "),
        Span::styled("Enter", key_style()),
        Span::raw(" preview  "),
        Span::styled("Esc", key_style()),
        Span::raw(" cancel"),
    ]));

    render_popup(f, state, centered_rect(60, 50, f.area()), " Quick Select ", lines);
}

pub fn render_quick_select_confirm(f: &mut Frame, state: &AppState) {
    let Some(plan) = &state.pending_plan else {
        return;
    };
    let preview = &plan.preview;
    let count_line = |label: &str, count: usize, color: Color| {
        Line::from(vec![
            Span::styled(format!("  {:<16}", label), Style::default().fg(color)),
            Span::raw(count.to_string()),
        ])
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!("  Set {} day(s) to {}?", plan.keys.len(), plan.stage),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        count_line("New cells", preview.create.len(), Color::Green),
        count_line("Overwritten", preview.update.len(), Color::Yellow),
        count_line("Already set", preview.unchanged.len(), state.theme.muted),
        Line::from(""),
    ];
    if preview.changes() == 0 {
        lines.push(Line::from(Span::styled(
            "  Nothing would change.",
            Style::default().fg(state.theme.muted),
        )));
    }
    lines.push(Line::from(vec![
        Span::styled("  [Y]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw("es - Apply    "),
        Span::styled("[N]", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Span::raw("o - Back to the form"),
    ]));

    render_popup(f, state, centered_rect(50, 40, f.area()), " Confirm Quick Select ", lines);
}

pub fn render_export(f: &mut Frame, state: &AppState) {
    let form = &state.export_form;
    let focus_style = |focus: ExportFocus| {
        if form.focus == focus {
            label_style()
        } else {
            Style::default().fg(state.theme.muted).add_modifier(Modifier::BOLD)
        }
    };
    let all_note = |empty: bool| if empty { " (all)" } else { "" };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("  Format: ", label_style()),
            Span::raw(form.format.to_string()),
            Span::styled("   (f)", Style::default().fg(state.theme.muted)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!("  Months{}", all_note(form.filter.months.is_empty())),
            focus_style(ExportFocus::Months),
        )),
    ];
    let month_cursor = (form.focus == ExportFocus::Months).then_some(form.month_cursor);
    lines.extend(month_grid(state, |m| form.filter.months.contains(&m), month_cursor));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("  Tasks{}", all_note(form.filter.tasks.is_empty())),
        focus_style(ExportFocus::Tasks),
    )));
    for (i, task) in state.timeline.tasks().iter().enumerate() {
        let mut style = Style::default().fg(state.theme.foreground);
        if form.focus == ExportFocus::Tasks && i == form.task_cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        lines.push(Line::from(Span::styled(
            format!("  {} {}", checkbox(form.filter.tasks.contains(&task.id)), task.name),
            style,
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Tab", key_style()),
        Span::raw(" switch  "),
        Span::styled("Space", key_style()),
        Span::raw(" toggle  "),
        Span::styled("Enter", key_style()),
        Span::raw(" save file  "),
        Span::styled("y", key_style()),
        Span::raw(" copy  "),
        Span::styled("Esc", key_style()),
        Span::raw(" close"),
    ]));

    render_popup(f, state, centered_rect(60, 80, f.area()), " Export ", lines);
}
