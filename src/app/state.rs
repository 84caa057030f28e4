use super::mode::Mode;
use crate::ui::components::timeline_grid::GridLayout;
use crate::ui::theme::Theme;
use anyhow::Result;
use chrono::Local;
use ratatui::layout::Rect;
use skill_timeline::analysis::Analysis;
use skill_timeline::calendar::{day_of_year, from_day_of_year, Month, DAYS_IN_GRID};
use skill_timeline::clipboard::copy_to_clipboard;
use skill_timeline::config::Config;
use skill_timeline::export::{self, ExportFilter, ExportFormat};
use skill_timeline::storage::{Persistence, SqliteStore};
use skill_timeline::timeline::{
    CellKey, Modifiers, QuickSelect, QuickSelectPlan, SelectionInput, Stage, Task, Timeline,
};
use skill_timeline::utils::unicode::TextInput;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

/// What the edit line is editing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    NewTask,
    Title,
    HeaderText,
}

impl EditTarget {
    pub fn prompt(self) -> &'static str {
        match self {
            EditTarget::NewTask => "New task",
            EditTarget::Title => "Title",
            EditTarget::HeaderText => "Header",
        }
    }
}

/// Quick-select form: one task, a set of months, a day filter and a stage.
#[derive(Debug, Clone)]
pub struct QuickSelectForm {
    pub rule: QuickSelect,
    pub month_cursor: usize,
}

impl QuickSelectForm {
    pub fn cycle_stage(&mut self) {
        let index = Stage::ALL
            .iter()
            .position(|s| *s == self.rule.stage)
            .unwrap_or(0);
        self.rule.stage = Stage::ALL[(index + 1) % Stage::ALL.len()];
    }

    pub fn toggle_all_months(&mut self) {
        if self.rule.months.len() == Month::ALL.len() {
            self.rule.months.clear();
        } else {
            self.rule.months.extend(Month::ALL);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFocus {
    Months,
    Tasks,
}

#[derive(Debug, Clone)]
pub struct ExportForm {
    pub format: ExportFormat,
    pub filter: ExportFilter,
    pub focus: ExportFocus,
    pub month_cursor: usize,
    pub task_cursor: usize,
}

impl Default for ExportForm {
    fn default() -> Self {
        Self {
            format: ExportFormat::Json,
            filter: ExportFilter::all(),
            focus: ExportFocus::Months,
            month_cursor: 0,
            task_cursor: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisView {
    #[default]
    Tasks,
    Months,
    Distribution,
}

impl AnalysisView {
    pub fn next(self) -> AnalysisView {
        match self {
            AnalysisView::Tasks => AnalysisView::Months,
            AnalysisView::Months => AnalysisView::Distribution,
            AnalysisView::Distribution => AnalysisView::Tasks,
        }
    }
}

pub struct AppState {
    pub timeline: Timeline,
    persistence: Persistence<SqliteStore>,
    pub theme: Theme,
    pub mode: Mode,
    /// Task row under the keyboard cursor
    pub cursor_row: usize,
    /// Day column (0..365) under the keyboard cursor
    pub cursor_col: usize,
    pub scroll_row: usize,
    pub scroll_col: usize,
    pub cell_width: u16,
    pub export_dir: PathBuf,
    /// Keyboard equivalent of holding the mouse button
    pub keyboard_drag: bool,
    pub status_message: Option<(String, Instant)>,
    pub input: TextInput,
    pub edit_target: Option<EditTarget>,
    pub pending_delete: Option<Task>,
    pub quick_select: Option<QuickSelectForm>,
    pub pending_plan: Option<QuickSelectPlan>,
    pub export_form: ExportForm,
    pub analysis_view: AnalysisView,
    pub show_help: bool,
    pub help_scroll: u16,
    pub should_quit: bool,
    pub terminal_width: u16,
    pub terminal_height: u16,
    /// Geometry of the last rendered grid, for mouse hit testing
    pub grid_layout: Option<GridLayout>,
    pub stage_bar_area: Rect,
}

impl AppState {
    pub fn new(
        timeline: Timeline,
        persistence: Persistence<SqliteStore>,
        theme: Theme,
        config: &Config,
    ) -> Result<Self> {
        let mut state = Self {
            timeline,
            persistence,
            theme,
            mode: Mode::Navigate,
            cursor_row: 0,
            cursor_col: 0,
            scroll_row: 0,
            scroll_col: 0,
            cell_width: config.cell_width,
            export_dir: config.export_dir()?,
            keyboard_drag: false,
            status_message: None,
            input: TextInput::default(),
            edit_target: None,
            pending_delete: None,
            quick_select: None,
            pending_plan: None,
            export_form: ExportForm::default(),
            analysis_view: AnalysisView::default(),
            show_help: false,
            help_scroll: 0,
            should_quit: false,
            terminal_width: 80,
            terminal_height: 24,
            grid_layout: None,
            stage_bar_area: Rect::default(),
        };
        state.jump_to_today();
        Ok(state)
    }

    // ------------------------------------------------------------------
    // Cursor
    // ------------------------------------------------------------------

    pub fn current_task(&self) -> Option<&Task> {
        self.timeline.tasks().get(self.cursor_row)
    }

    pub fn cell_at(&self, row: usize, col: usize) -> Option<CellKey> {
        let task = self.timeline.tasks().get(row)?;
        let (month, day) = from_day_of_year(col)?;
        Some(CellKey::new(task.id.clone(), month, day))
    }

    pub fn cursor_cell(&self) -> Option<CellKey> {
        self.cell_at(self.cursor_row, self.cursor_col)
    }

    pub fn cursor_month(&self) -> Option<Month> {
        from_day_of_year(self.cursor_col).map(|(month, _)| month)
    }

    pub fn move_cursor(&mut self, rows: isize, cols: isize) {
        let max_row = self.timeline.tasks().len().saturating_sub(1);
        self.cursor_row = self.cursor_row.saturating_add_signed(rows).min(max_row);
        self.cursor_col = self
            .cursor_col
            .saturating_add_signed(cols)
            .min(DAYS_IN_GRID - 1);
        self.after_cursor_move();
    }

    pub fn set_cursor(&mut self, row: usize, col: usize) {
        self.cursor_row = row.min(self.timeline.tasks().len().saturating_sub(1));
        self.cursor_col = col.min(DAYS_IN_GRID - 1);
    }

    /// Move to the first day of the previous/next month.
    pub fn jump_month(&mut self, delta: isize) {
        let current = self.cursor_month().map(|m| m.index()).unwrap_or(0);
        let target = current.saturating_add_signed(delta).min(Month::ALL.len() - 1);
        if let Some(month) = Month::from_index(target) {
            self.cursor_col = day_of_year(month, 1);
            self.after_cursor_move();
        }
    }

    pub fn jump_to_today(&mut self) {
        if let Some((month, day)) = self.timeline.calendar().today() {
            self.cursor_col = day_of_year(month, day);
        }
    }

    fn after_cursor_move(&mut self) {
        if self.keyboard_drag
            && let Some(cell) = self.cursor_cell()
        {
            self.timeline.extend_selection(cell);
        }
    }

    /// Scroll so the cursor stays inside a viewport of the given size.
    pub fn ensure_cursor_visible(&mut self, rows: usize, cols: usize) {
        if rows > 0 {
            if self.cursor_row < self.scroll_row {
                self.scroll_row = self.cursor_row;
            } else if self.cursor_row >= self.scroll_row + rows {
                self.scroll_row = self.cursor_row + 1 - rows;
            }
        }
        if cols > 0 {
            if self.cursor_col < self.scroll_col {
                self.scroll_col = self.cursor_col;
            } else if self.cursor_col >= self.scroll_col + cols {
                self.scroll_col = self.cursor_col + 1 - cols;
            }
        }
    }

    fn clamp_cursor(&mut self) {
        let max_row = self.timeline.tasks().len().saturating_sub(1);
        self.cursor_row = self.cursor_row.min(max_row);
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Feed one selection input and report whether the selected set changed.
    pub fn select(&mut self, input: SelectionInput) -> bool {
        self.timeline.handle_selection(input)
    }

    /// Press-and-release on the cursor cell with the given modifiers held.
    pub fn click_cursor(&mut self, modifiers: Modifiers) {
        let Some(cell) = self.cursor_cell() else {
            return;
        };
        self.timeline.set_modifiers(modifiers);
        self.timeline.begin_selection(cell);
        self.timeline.end_selection();
        self.timeline.set_modifiers(Modifiers::NONE);
    }

    /// Start or finish a keyboard drag anchored at the cursor.
    pub fn toggle_keyboard_drag(&mut self) {
        if self.keyboard_drag {
            self.keyboard_drag = false;
            self.timeline.end_selection();
            return;
        }
        let Some(cell) = self.cursor_cell() else {
            return;
        };
        self.timeline.set_modifiers(Modifiers::NONE);
        if self.timeline.begin_selection(cell) {
            self.keyboard_drag = true;
        }
    }

    pub fn clear_selection(&mut self) {
        self.keyboard_drag = false;
        self.select(SelectionInput::Escape);
    }

    pub fn open_stage_menu(&mut self) {
        if self.timeline.selection().is_empty() {
            self.set_status_message("Select some cells first".to_string());
            return;
        }
        self.finish_keyboard_drag();
        self.mode = Mode::StageMenu;
    }

    fn finish_keyboard_drag(&mut self) {
        if self.keyboard_drag {
            self.keyboard_drag = false;
            self.timeline.end_selection();
        }
    }

    /// Assign (or clear) the stage of every selected cell and persist it.
    pub fn apply_stage(&mut self, stage: Option<Stage>) {
        self.finish_keyboard_drag();
        let selected = self.timeline.selection().len();
        if selected == 0 {
            self.set_status_message("Nothing selected".to_string());
            return;
        }
        let changed = self.timeline.apply_stage_to_selection(stage);
        self.persist();
        let label = stage.map(|s| s.label()).unwrap_or("no stage");
        self.set_status_message(format!("{changed} of {selected} cell(s) set to {label}"));
        self.mode = Mode::Navigate;
    }

    // ------------------------------------------------------------------
    // Tasks and labels
    // ------------------------------------------------------------------

    pub fn start_edit(&mut self, target: EditTarget) {
        let initial = match target {
            EditTarget::NewTask => String::new(),
            EditTarget::Title => self.timeline.title().to_string(),
            EditTarget::HeaderText => self.timeline.header_text().to_string(),
        };
        self.input = TextInput::new(initial);
        self.edit_target = Some(target);
        self.mode = Mode::Edit;
    }

    pub fn cancel_edit(&mut self) {
        self.edit_target = None;
        self.input = TextInput::default();
        self.mode = Mode::Navigate;
    }

    pub fn commit_edit(&mut self) {
        let Some(target) = self.edit_target.take() else {
            self.mode = Mode::Navigate;
            return;
        };
        let text = std::mem::take(&mut self.input).into_text();
        let text = text.trim();
        self.mode = Mode::Navigate;

        match target {
            EditTarget::NewTask => match self.timeline.add_task(text) {
                Some(task) => {
                    let message = format!("Added {}", task.name);
                    self.cursor_row = self.timeline.tasks().len() - 1;
                    self.set_status_message(message);
                }
                None => {
                    self.set_status_message("Task name cannot be empty".to_string());
                    return;
                }
            },
            EditTarget::Title => self.timeline.set_title(text),
            EditTarget::HeaderText => self.timeline.set_header_text(text),
        }
        self.persist();
    }

    pub fn request_delete(&mut self) {
        if let Some(task) = self.current_task().cloned() {
            self.pending_delete = Some(task);
            self.mode = Mode::ConfirmDelete;
        }
    }

    pub fn confirm_delete(&mut self) {
        self.mode = Mode::Navigate;
        let Some(task) = self.pending_delete.take() else {
            return;
        };
        if self.timeline.delete_task(&task.id).is_some() {
            self.keyboard_drag = false;
            self.clamp_cursor();
            self.persist();
            self.set_status_message(format!("Deleted {}", task.name));
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.mode = Mode::Navigate;
    }

    pub fn cycle_current_status(&mut self) {
        let Some(id) = self.current_task().map(|t| t.id.clone()) else {
            return;
        };
        if let Some(status) = self.timeline.cycle_task_status(&id) {
            self.persist();
            self.set_status_message(format!("Status: {status}"));
        }
    }

    // ------------------------------------------------------------------
    // Quick select
    // ------------------------------------------------------------------

    pub fn open_quick_select(&mut self) {
        let Some(task) = self.current_task() else {
            self.set_status_message("Add a task first".to_string());
            return;
        };
        let mut rule = QuickSelect::new(task.id.clone(), Stage::Planning);
        let month_cursor = self.cursor_month().map(|m| m.index()).unwrap_or(0);
        if let Some(month) = Month::from_index(month_cursor) {
            rule.toggle_month(month);
        }
        self.quick_select = Some(QuickSelectForm { rule, month_cursor });
        self.mode = Mode::QuickSelect;
    }

    /// Switch the quick-select form to the next or previous task.
    pub fn quick_select_cycle_task(&mut self, delta: isize) {
        let tasks = self.timeline.tasks();
        if tasks.is_empty() {
            return;
        }
        let Some(form) = self.quick_select.as_mut() else {
            return;
        };
        let current = tasks.position(&form.rule.task_id).unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(tasks.len() as isize) as usize;
        if let Some(task) = tasks.get(next) {
            form.rule.task_id = task.id.clone();
        }
    }

    /// Validate the form; on success wait for confirmation of the preview.
    pub fn submit_quick_select(&mut self) {
        let Some(form) = &self.quick_select else {
            return;
        };
        match self.timeline.plan_quick_select(&form.rule) {
            Ok(plan) => {
                debug!(summary = %plan.summary(), "quick select planned");
                self.pending_plan = Some(plan);
                self.mode = Mode::ConfirmQuickSelect;
            }
            Err(e) => self.set_status_message(capitalize(&e.to_string())),
        }
    }

    pub fn confirm_quick_select(&mut self) {
        let Some(plan) = self.pending_plan.take() else {
            self.mode = Mode::Navigate;
            return;
        };
        let changed = self.timeline.commit_quick_select(&plan);
        self.persist();
        self.quick_select = None;
        self.mode = Mode::Navigate;
        self.set_status_message(format!("Quick select: {changed} cell(s) updated"));
    }

    /// Back out of the confirmation into the form.
    pub fn reject_quick_select(&mut self) {
        self.pending_plan = None;
        self.mode = Mode::QuickSelect;
    }

    pub fn close_quick_select(&mut self) {
        self.quick_select = None;
        self.pending_plan = None;
        self.mode = Mode::Navigate;
    }

    // ------------------------------------------------------------------
    // Export and analysis
    // ------------------------------------------------------------------

    pub fn open_export(&mut self) {
        self.export_form.task_cursor = self
            .export_form
            .task_cursor
            .min(self.timeline.tasks().len().saturating_sub(1));
        self.mode = Mode::Export;
    }

    fn render_export(&self) -> Result<String> {
        export::render(
            self.export_form.format,
            self.timeline.tasks(),
            self.timeline.cells(),
            &self.export_form.filter,
        )
    }

    pub fn export_to_file(&mut self) {
        let date = Local::now().date_naive();
        let result = self.render_export().and_then(|content| {
            export::write_to_dir(&self.export_dir, self.export_form.format, date, &content)
        });
        match result {
            Ok(path) => {
                self.mode = Mode::Navigate;
                self.set_status_message(format!("Exported to {}", path.display()));
            }
            Err(e) => {
                warn!(error = %e, "export failed");
                self.set_status_message(format!("Export failed: {e}"));
            }
        }
    }

    pub fn export_to_clipboard(&mut self) {
        match self.render_export().and_then(|content| copy_to_clipboard(&content)) {
            Ok(result) => {
                self.mode = Mode::Navigate;
                self.set_status_message(format!("{} export {}", self.export_form.format, result.describe()));
            }
            Err(e) => {
                warn!(error = %e, "clipboard export failed");
                self.set_status_message(format!("Copy failed: {e}"));
            }
        }
    }

    pub fn analysis(&self) -> Analysis {
        Analysis::compute(self.timeline.tasks(), self.timeline.cells())
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Write every dirty entity. Failures are reported, not fatal.
    pub fn persist(&mut self) {
        if let Err(e) = self.persistence.save_pending(&mut self.timeline) {
            warn!(error = %e, "failed to save timeline");
            self.set_status_message(format!("Save failed: {e}"));
        }
    }

    /// Pick up writes made by another process (e.g. the CLI).
    pub fn reload_from_database(&mut self) {
        if self.timeline.dirty().any() {
            debug!("skipping reload, local changes pending");
            return;
        }
        let (tasks, cells, title, header_text) = self.persistence.load_parts();
        if tasks == *self.timeline.tasks()
            && cells == *self.timeline.cells()
            && title == self.timeline.title()
            && header_text == self.timeline.header_text()
        {
            return;
        }
        info!("reloading timeline after external change");
        self.timeline.replace_data(tasks, cells, title, header_text);
        self.keyboard_drag = false;
        self.clamp_cursor();
    }

    // ------------------------------------------------------------------
    // Status line
    // ------------------------------------------------------------------

    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    pub fn clear_expired_status_message(&mut self) {
        if let Some((_, time)) = &self.status_message
            && time.elapsed().as_secs() > 3
        {
            self.status_message = None;
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
