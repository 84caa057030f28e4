use crate::app::mode::Mode;
use crate::app::AppState;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use skill_timeline::timeline::Stage;

const BUTTONS: [(Option<Stage>, &str); 4] = [
    (Some(Stage::Planning), " [p] Planning "),
    (Some(Stage::Completed), " [c] Completed "),
    (Some(Stage::Failed), " [f] Failed "),
    (None, " [Del] Clear "),
];
const LABEL: &str = " Stage: ";

/// Clickable stage buttons and the x range each occupies within `area`.
pub fn button_spans(area: Rect) -> Vec<(Option<Stage>, u16, u16)> {
    let mut x = area.x + LABEL.len() as u16;
    let mut spans = Vec::with_capacity(BUTTONS.len());
    for (stage, text) in BUTTONS {
        let width = text.len() as u16;
        spans.push((stage, x, x + width));
        x += width + 1;
    }
    spans
}

/// The stage a click at `(x, y)` asks for. `Some(None)` means "clear".
pub fn button_at(area: Rect, x: u16, y: u16) -> Option<Option<Stage>> {
    if y != area.y || area.height == 0 {
        return None;
    }
    button_spans(area)
        .into_iter()
        .find(|(_, start, end)| x >= *start && x < *end)
        .map(|(stage, _, _)| stage)
}

pub fn render(f: &mut Frame, state: &mut AppState, area: Rect) {
    state.stage_bar_area = area;
    let theme = &state.theme;
    let selected = state.timeline.selection().len();
    let active = state.mode == Mode::StageMenu;

    let base = Style::default().fg(theme.muted).bg(theme.background);
    let mut spans = vec![Span::styled(LABEL, base)];
    for (stage, text) in BUTTONS {
        let color = stage.map(|s| theme.stage_color(s)).unwrap_or(theme.muted);
        let style = if active {
            Style::default()
                .fg(theme.foreground)
                .bg(color)
                .add_modifier(Modifier::BOLD)
        } else if selected > 0 {
            Style::default().fg(color).bg(theme.background)
        } else {
            base
        };
        spans.push(Span::styled(text, style));
        spans.push(Span::styled(" ", base));
    }
    let summary = match selected {
        0 => "  nothing selected".to_string(),
        1 => "  1 cell selected".to_string(),
        n => format!("  {n} cells selected"),
    };
    spans.push(Span::styled(summary, base));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_hit_testing() {
        let area = Rect::new(0, 10, 80, 1);
        let spans = button_spans(area);
        assert_eq!(spans.len(), 4);

        let (_, start, end) = spans[0];
        assert_eq!(button_at(area, start, 10), Some(Some(Stage::Planning)));
        assert_eq!(button_at(area, end - 1, 10), Some(Some(Stage::Planning)));
        // Gap between buttons
        assert_eq!(button_at(area, end, 10), None);

        let (_, clear_start, _) = spans[3];
        assert_eq!(button_at(area, clear_start + 1, 10), Some(None));
        assert_eq!(button_at(area, start, 11), None);
        assert_eq!(button_at(area, 0, 10), None);
    }
}
