use crate::app::AppState;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use skill_timeline::calendar::{from_day_of_year, Month, DAYS_IN_GRID};
use skill_timeline::timeline::{CellKey, TaskStatus};
use skill_timeline::utils::unicode::truncate_to_width;
use unicode_width::UnicodeWidthStr;

/// Month row plus day-number row above the task rows
pub const HEADER_ROWS: u16 = 2;
const MAX_NAME_WIDTH: u16 = 28;

/// Where a screen position falls inside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridHit {
    Cell { row: usize, col: usize },
    /// Headers, task names, or empty space below the last task
    Background,
}

/// Screen geometry of the grid for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub area: Rect,
    pub name_width: u16,
    pub cell_width: u16,
    pub first_row: usize,
    pub first_col: usize,
    pub task_count: usize,
}

impl GridLayout {
    pub fn name_width_for(area: Rect) -> u16 {
        (area.width / 3).min(MAX_NAME_WIDTH)
    }

    /// Rows and day columns that fit into `area`, before scrolling.
    pub fn capacity(area: Rect, cell_width: u16) -> (usize, usize) {
        let rows = area.height.saturating_sub(HEADER_ROWS) as usize;
        let cols = area.width.saturating_sub(Self::name_width_for(area)) / cell_width.max(1);
        (rows, cols as usize)
    }

    pub fn new(area: Rect, cell_width: u16, first_row: usize, first_col: usize, task_count: usize) -> Self {
        Self {
            area,
            name_width: Self::name_width_for(area),
            cell_width: cell_width.max(1),
            first_row,
            first_col,
            task_count,
        }
    }

    pub fn visible_rows(&self) -> usize {
        let rows = self.area.height.saturating_sub(HEADER_ROWS) as usize;
        rows.min(self.task_count.saturating_sub(self.first_row))
    }

    pub fn visible_cols(&self) -> usize {
        let (_, cols) = Self::capacity(self.area, self.cell_width);
        cols.min(DAYS_IN_GRID.saturating_sub(self.first_col))
    }

    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.area.x
            && x < self.area.x + self.area.width
            && y >= self.area.y
            && y < self.area.y + self.area.height
    }

    /// None when the position is outside the grid altogether.
    pub fn hit(&self, x: u16, y: u16) -> Option<GridHit> {
        if !self.contains(x, y) {
            return None;
        }
        let cells_x = self.area.x + self.name_width;
        let cells_y = self.area.y + HEADER_ROWS;
        if x < cells_x || y < cells_y {
            return Some(GridHit::Background);
        }
        let row_offset = (y - cells_y) as usize;
        let col_offset = ((x - cells_x) / self.cell_width) as usize;
        if row_offset >= self.visible_rows() || col_offset >= self.visible_cols() {
            return Some(GridHit::Background);
        }
        Some(GridHit::Cell {
            row: self.first_row + row_offset,
            col: self.first_col + col_offset,
        })
    }
}

fn status_marker(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::NotStarted => "·",
        TaskStatus::InProgress => "▶",
        TaskStatus::Completed => "✓",
        TaskStatus::Failed => "✗",
    }
}

fn pad_to_width(s: &str, width: usize) -> String {
    let mut out = truncate_to_width(s, width);
    let used = out.width();
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

pub fn render(f: &mut Frame, state: &mut AppState, area: Rect) {
    let (rows, cols) = GridLayout::capacity(area, state.cell_width);
    state.ensure_cursor_visible(rows, cols);
    let layout = GridLayout::new(
        area,
        state.cell_width,
        state.scroll_row,
        state.scroll_col,
        state.timeline.tasks().len(),
    );
    state.grid_layout = Some(layout);

    let theme = &state.theme;
    let timeline = &state.timeline;
    let calendar = timeline.calendar();
    let today = calendar.today();
    let cw = layout.cell_width as usize;
    let name_width = layout.name_width as usize;
    let visible_cols = layout.visible_cols();
    let columns: Vec<(usize, Month, u8)> = (layout.first_col
        ..layout.first_col + visible_cols)
        .filter_map(|col| from_day_of_year(col).map(|(m, d)| (col, m, d)))
        .collect();

    let base = Style::default().fg(theme.foreground).bg(theme.background);
    let muted = Style::default().fg(theme.muted).bg(theme.background);
    let mut lines: Vec<Line> = Vec::with_capacity(area.height as usize);

    // Month names start at each month's first visible column
    let mut month_row = vec![' '; visible_cols * cw];
    let mut last_month = None;
    for (i, (_, month, _)) in columns.iter().enumerate() {
        if last_month != Some(*month) {
            for (j, c) in month.name().chars().enumerate() {
                if let Some(slot) = month_row.get_mut(i * cw + j) {
                    *slot = c;
                }
            }
            last_month = Some(*month);
        }
    }
    lines.push(Line::from(vec![
        Span::styled(
            pad_to_width(timeline.header_text(), name_width),
            base.add_modifier(Modifier::BOLD),
        ),
        Span::styled(month_row.into_iter().collect::<String>(), base.add_modifier(Modifier::BOLD)),
    ]));

    let mut day_spans = vec![Span::styled(" ".repeat(name_width), base)];
    for (_, month, day) in &columns {
        let text = format!("{:>cw$}", day, cw = cw);
        let style = if today == Some((*month, *day)) {
            Style::default().fg(theme.today).add_modifier(Modifier::BOLD)
        } else if calendar.is_weekend(*month, *day) {
            muted.bg(theme.weekend_bg)
        } else {
            muted
        };
        day_spans.push(Span::styled(text, style));
    }
    lines.push(Line::from(day_spans));

    for row in layout.first_row..layout.first_row + layout.visible_rows() {
        let Some(task) = timeline.tasks().get(row) else {
            break;
        };
        let name = format!("{} {}", status_marker(task.status), task.name);
        let name_style = if row == state.cursor_row {
            base.add_modifier(Modifier::BOLD)
        } else {
            base
        };
        let mut spans = vec![
            Span::styled(
                pad_to_width(&name, name_width.saturating_sub(1)),
                name_style.fg(theme.status_color(task.status)),
            ),
            Span::styled(" ", base),
        ];

        for (col, month, day) in &columns {
            let key = CellKey::new(task.id.clone(), *month, *day);
            let stage = timeline.get_stage(&key);
            let marker = stage.map(|s| s.marker()).unwrap_or('·');
            let mut style = match stage {
                Some(stage) => Style::default().fg(theme.foreground).bg(theme.stage_color(stage)),
                None if calendar.is_weekend(*month, *day) => muted.bg(theme.weekend_bg),
                None => muted,
            };
            if stage.is_none() && today == Some((*month, *day)) {
                style = style.fg(theme.today);
            }
            if timeline.is_selected(&key) {
                style = style.bg(theme.selection_bg).add_modifier(Modifier::BOLD);
                if let Some(stage) = stage {
                    style = style.fg(theme.stage_color(stage));
                }
            }
            if row == state.cursor_row && *col == state.cursor_col {
                style = style.fg(theme.cursor).add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(format!("{:^cw$}", marker, cw = cw), style));
        }
        lines.push(Line::from(spans));
    }

    if timeline.tasks().is_empty() {
        lines.push(Line::from(Span::styled(
            "  No tasks yet. Press 'a' to add one.",
            muted,
        )));
    }

    f.render_widget(Paragraph::new(lines).style(base), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> GridLayout {
        // 30 wide: name column 10, cells of width 2 -> 10 day columns
        GridLayout::new(Rect::new(0, 1, 30, 6), 2, 0, 40, 3)
    }

    #[test]
    fn test_capacity() {
        assert_eq!(GridLayout::capacity(Rect::new(0, 0, 30, 6), 2), (4, 10));
        assert_eq!(GridLayout::name_width_for(Rect::new(0, 0, 300, 6)), MAX_NAME_WIDTH);
    }

    #[test]
    fn test_hit_cells() {
        let layout = layout();
        assert_eq!(layout.hit(10, 3), Some(GridHit::Cell { row: 0, col: 40 }));
        assert_eq!(layout.hit(11, 3), Some(GridHit::Cell { row: 0, col: 40 }));
        assert_eq!(layout.hit(12, 5), Some(GridHit::Cell { row: 2, col: 41 }));
        assert_eq!(layout.hit(29, 4), Some(GridHit::Cell { row: 1, col: 49 }));
    }

    #[test]
    fn test_hit_background_and_outside() {
        let layout = layout();
        // Task name column and header rows
        assert_eq!(layout.hit(3, 3), Some(GridHit::Background));
        assert_eq!(layout.hit(15, 1), Some(GridHit::Background));
        // Below the last task
        assert_eq!(layout.hit(15, 6), Some(GridHit::Background));
        // Outside the widget
        assert_eq!(layout.hit(15, 0), None);
        assert_eq!(layout.hit(30, 3), None);
    }

    #[test]
    fn test_visible_cols_stop_at_year_end() {
        let layout = GridLayout::new(Rect::new(0, 0, 30, 6), 2, 0, 360, 1);
        assert_eq!(layout.visible_cols(), 5);
        assert_eq!(layout.hit(28, 2), Some(GridHit::Background));
    }

    #[test]
    fn test_pad_to_width() {
        assert_eq!(pad_to_width("AWS", 6), "AWS   ");
        assert_eq!(pad_to_width("Cloud Practitioner", 6).width(), 6);
    }
}
