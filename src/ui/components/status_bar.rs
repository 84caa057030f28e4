use crate::app::mode::Mode;
use crate::app::AppState;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use skill_timeline::calendar::from_day_of_year;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn render(f: &mut Frame, state: &AppState, area: Rect) {
    match state.mode {
        Mode::ConfirmDelete => {
            render_confirm_delete(f, state, area);
            return;
        }
        Mode::Edit => {
            render_edit_line(f, state, area);
            return;
        }
        _ => {}
    }

    if let Some((message, time)) = &state.status_message
        && time.elapsed().as_secs() <= 3
    {
        render_status_message(f, message, area);
        return;
    }

    let cursor_label = match (state.current_task(), from_day_of_year(state.cursor_col)) {
        (Some(task), Some((month, day))) => format!("{} {} {}", task.name, month.short_name(), day),
        _ => "-".to_string(),
    };
    let drag_indicator = if state.keyboard_drag { " [drag]" } else { "" };
    let left_content = format!(
        " {} | {} | {} selected{} | {}",
        state.mode,
        state.timeline.calendar().year(),
        state.timeline.selection().len(),
        drag_indicator,
        cursor_label
    );
    let nav_hint = "? help  q quit";
    let version_text = format!("v{VERSION}");

    let padding = area.width.saturating_sub(
        left_content.chars().count() as u16 + nav_hint.len() as u16 + version_text.len() as u16 + 3,
    );

    let style = Style::default()
        .fg(state.theme.status_bar_fg)
        .bg(state.theme.status_bar_bg);

    let status_line = format!(
        "{} {:>padding$} {} {} ",
        left_content,
        "",
        nav_hint,
        version_text,
        padding = padding as usize
    );

    f.render_widget(Paragraph::new(Line::from(Span::styled(status_line, style))), area);
}

fn render_confirm_delete(f: &mut Frame, state: &AppState, area: Rect) {
    let name = state
        .pending_delete
        .as_ref()
        .map(|t| t.name.as_str())
        .unwrap_or("task");
    let prompt = format!(" Delete '{}' and all of its cells? (y/N) ", name);

    let style = Style::default()
        .fg(Color::White)
        .bg(Color::Rgb(180, 100, 0))
        .add_modifier(Modifier::BOLD);

    let padding = area.width.saturating_sub(prompt.chars().count() as u16);
    let status_line = format!("{}{:padding$}", prompt, "", padding = padding as usize);

    f.render_widget(Paragraph::new(Line::from(Span::styled(status_line, style))), area);
}

fn render_edit_line(f: &mut Frame, state: &AppState, area: Rect) {
    let prompt = state
        .edit_target
        .map(|t| t.prompt())
        .unwrap_or("Edit");
    let prefix = format!(" {}: ", prompt);
    let style = Style::default()
        .fg(state.theme.status_bar_fg)
        .bg(state.theme.status_bar_bg);

    let line = Line::from(vec![
        Span::styled(prefix.clone(), style.add_modifier(Modifier::BOLD)),
        Span::styled(state.input.text().to_string(), style),
    ]);
    f.render_widget(Paragraph::new(line).style(style), area);

    let cursor_x = area.x + prefix.len() as u16 + state.input.cursor_column() as u16;
    f.set_cursor_position((cursor_x.min(area.x + area.width.saturating_sub(1)), area.y));
}

fn render_status_message(f: &mut Frame, message: &str, area: Rect) {
    let display_message = format!(" {message} ");

    let style = Style::default()
        .fg(Color::White)
        .bg(Color::Rgb(0, 100, 0))
        .add_modifier(Modifier::BOLD);

    let padding = area.width.saturating_sub(display_message.chars().count() as u16);
    let status_line = format!("{}{:padding$}", display_message, "", padding = padding as usize);

    f.render_widget(Paragraph::new(Line::from(Span::styled(status_line, style))), area);
}
