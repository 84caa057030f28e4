pub mod cell;
pub mod quick_select;
pub mod selection;
pub mod task;

pub use cell::{BulkPreview, CellKey, CellRecord, CellRef, CellStore, Stage};
pub use quick_select::{DayFilter, QuickSelect, QuickSelectError, QuickSelectPlan};
pub use selection::{Modifier, Modifiers, SelectionEngine, SelectionInput, Surface};
pub use task::{Task, TaskList, TaskStatus};

use crate::calendar::Calendar;
use tracing::{debug, info};

pub const DEFAULT_TITLE: &str = "Task Timeline";
pub const DEFAULT_HEADER_TEXT: &str = "Skills To Learn";

/// Which persisted entities changed since the last save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dirty {
    pub tasks: bool,
    pub cells: bool,
    pub title: bool,
    pub header_text: bool,
}

impl Dirty {
    pub fn all() -> Self {
        Self {
            tasks: true,
            cells: true,
            title: true,
            header_text: true,
        }
    }

    pub fn any(&self) -> bool {
        self.tasks || self.cells || self.title || self.header_text
    }
}

/// Application state for one timeline: tasks, cell stages, the current
/// selection and the editable labels. Every mutation goes through here so
/// cascades (task delete) and dirty tracking stay consistent.
#[derive(Debug, Clone)]
pub struct Timeline {
    tasks: TaskList,
    cells: CellStore,
    selection: SelectionEngine,
    calendar: Calendar,
    title: String,
    header_text: String,
    dirty: Dirty,
}

impl Timeline {
    pub fn new(tasks: TaskList, cells: CellStore, calendar: Calendar) -> Self {
        Self {
            tasks,
            cells,
            selection: SelectionEngine::new(),
            calendar,
            title: DEFAULT_TITLE.to_string(),
            header_text: DEFAULT_HEADER_TEXT.to_string(),
            dirty: Dirty::default(),
        }
    }

    pub fn with_labels(mut self, title: impl Into<String>, header_text: impl Into<String>) -> Self {
        self.title = title.into();
        self.header_text = header_text.into();
        self
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn cells(&self) -> &CellStore {
        &self.cells
    }

    pub fn selection(&self) -> &SelectionEngine {
        &self.selection
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn header_text(&self) -> &str {
        &self.header_text
    }

    pub fn get_stage(&self, key: &CellKey) -> Option<Stage> {
        self.cells.get_stage(key)
    }

    pub fn is_selected(&self, key: &CellKey) -> bool {
        self.selection.is_selected(key)
    }

    pub fn dirty(&self) -> Dirty {
        self.dirty
    }

    /// Return and reset the dirty set; the caller is expected to persist it.
    pub fn take_dirty(&mut self) -> Dirty {
        std::mem::take(&mut self.dirty)
    }

    pub fn mark_dirty(&mut self, dirty: Dirty) {
        self.dirty.tasks |= dirty.tasks;
        self.dirty.cells |= dirty.cells;
        self.dirty.title |= dirty.title;
        self.dirty.header_text |= dirty.header_text;
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn handle_selection(&mut self, input: SelectionInput) -> bool {
        self.selection.handle(input, &self.tasks)
    }

    pub fn begin_selection(&mut self, cell: CellKey) -> bool {
        self.selection.begin_selection(cell, &self.tasks)
    }

    pub fn extend_selection(&mut self, cell: CellKey) -> bool {
        self.selection.extend_selection(cell, &self.tasks)
    }

    pub fn end_selection(&mut self) {
        self.selection.end_selection();
    }

    pub fn clear_selection(&mut self) -> bool {
        self.selection.clear()
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.selection.set_modifiers(modifiers);
    }

    // ------------------------------------------------------------------
    // Stage assignment
    // ------------------------------------------------------------------

    /// Assign (or clear, with None) the stage of every selected cell.
    /// The selection itself is kept. Returns how many records changed.
    pub fn apply_stage_to_selection(&mut self, stage: Option<Stage>) -> usize {
        let changed = self.cells.set_stage(self.selection.cells(), stage);
        debug!(
            selected = self.selection.len(),
            changed,
            stage = ?stage,
            "applied stage to selection"
        );
        if changed > 0 {
            self.dirty.cells = true;
        }
        changed
    }

    /// Assign a stage to explicit keys. Keys of unknown tasks or with an
    /// invalid day are skipped so no orphan records can be created.
    pub fn set_stage(&mut self, keys: &[CellKey], stage: Option<Stage>) -> usize {
        let valid: Vec<&CellKey> = keys
            .iter()
            .filter(|k| k.is_valid_day() && self.tasks.contains(&k.task_id))
            .collect();
        let changed = self.cells.set_stage(valid, stage);
        if changed > 0 {
            self.dirty.cells = true;
        }
        changed
    }

    pub fn plan_quick_select(&self, rule: &QuickSelect) -> Result<QuickSelectPlan, QuickSelectError> {
        rule.plan(&self.tasks, &self.cells, &self.calendar)
    }

    /// Commit a confirmed quick-select plan.
    pub fn commit_quick_select(&mut self, plan: &QuickSelectPlan) -> usize {
        let changed = self.set_stage(&plan.keys, Some(plan.stage));
        info!(keys = plan.keys.len(), changed, stage = %plan.stage, "quick select committed");
        changed
    }

    // ------------------------------------------------------------------
    // Tasks and labels
    // ------------------------------------------------------------------

    pub fn add_task(&mut self, name: &str) -> Option<&Task> {
        let task = self.tasks.add(name)?;
        self.dirty.tasks = true;
        debug!(id = %task.id, name = %task.name, "task added");
        Some(task)
    }

    /// Remove a task together with its cell records and selection entries.
    pub fn delete_task(&mut self, task_id: &str) -> Option<Task> {
        let task = self.tasks.remove(task_id)?;
        let removed_cells = self.cells.delete_for_task(task_id);
        self.selection.remove_task(task_id);
        self.dirty.tasks = true;
        if removed_cells > 0 {
            self.dirty.cells = true;
        }
        info!(id = %task.id, removed_cells, "task deleted");
        Some(task)
    }

    pub fn set_task_status(&mut self, task_id: &str, status: TaskStatus) -> bool {
        let changed = self.tasks.set_status(task_id, status);
        if changed {
            self.dirty.tasks = true;
        }
        changed
    }

    pub fn cycle_task_status(&mut self, task_id: &str) -> Option<TaskStatus> {
        let status = self.tasks.cycle_status(task_id)?;
        self.dirty.tasks = true;
        Some(status)
    }

    pub fn set_title(&mut self, title: &str) {
        if self.title != title {
            self.title = title.to_string();
            self.dirty.title = true;
        }
    }

    pub fn set_header_text(&mut self, header_text: &str) {
        if self.header_text != header_text {
            self.header_text = header_text.to_string();
            self.dirty.header_text = true;
        }
    }

    /// Swap in freshly loaded data (e.g. after another process wrote the
    /// store). The selection is kept but re-validated against the new tasks.
    pub fn replace_data(&mut self, tasks: TaskList, cells: CellStore, title: String, header_text: String) {
        self.tasks = tasks;
        self.cells = cells;
        self.title = title;
        self.header_text = header_text;
        self.selection.retain_tasks(&self.tasks);
        self.dirty = Dirty::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Month;

    fn timeline() -> Timeline {
        let tasks = TaskList::new(vec![
            Task::with_status("a", "AWS", TaskStatus::InProgress),
            Task::with_status("b", "Thai", TaskStatus::InProgress),
        ]);
        Timeline::new(tasks, CellStore::new(), Calendar::new(2025))
    }

    #[test]
    fn test_stage_applies_to_whole_selection() {
        let mut tl = timeline();
        tl.begin_selection(CellKey::new("a", Month::January, 1));
        tl.extend_selection(CellKey::new("b", Month::January, 3));
        tl.end_selection();

        assert_eq!(tl.apply_stage_to_selection(Some(Stage::Completed)), 6);
        assert!(tl.dirty().cells);
        assert_eq!(tl.get_stage(&CellKey::new("b", Month::January, 2)), Some(Stage::Completed));
        // Selection survives the assignment
        assert_eq!(tl.selection().len(), 6);

        tl.take_dirty();
        assert_eq!(tl.apply_stage_to_selection(Some(Stage::Completed)), 0);
        assert!(!tl.dirty().cells);

        assert_eq!(tl.apply_stage_to_selection(None), 6);
        assert!(tl.cells().is_empty());
    }

    #[test]
    fn test_delete_task_cascades() {
        let mut tl = timeline();
        tl.begin_selection(CellKey::new("a", Month::March, 1));
        tl.extend_selection(CellKey::new("b", Month::March, 2));
        tl.end_selection();
        tl.apply_stage_to_selection(Some(Stage::Planning));
        tl.take_dirty();

        tl.delete_task("a").unwrap();

        let dirty = tl.take_dirty();
        assert!(dirty.tasks && dirty.cells);
        assert_eq!(tl.get_stage(&CellKey::new("a", Month::March, 1)), None);
        assert!(tl.cells().iter().all(|(k, _)| k.task_id == "b"));
        assert!(tl.selection().cells().iter().all(|k| k.task_id == "b"));
        assert_eq!(tl.selection().len(), 2);
    }

    #[test]
    fn test_set_stage_skips_orphan_keys() {
        let mut tl = timeline();
        let keys = vec![
            CellKey::new("a", Month::June, 1),
            CellKey::new("ghost", Month::June, 1),
            CellKey::new("a", Month::June, 31),
        ];
        assert_eq!(tl.set_stage(&keys, Some(Stage::Failed)), 1);
        assert_eq!(tl.cells().len(), 1);
    }

    #[test]
    fn test_quick_select_commit() {
        let mut tl = timeline();
        let rule = QuickSelect::new("b", Stage::Planning)
            .with_months([Month::February])
            .with_filter(DayFilter::Weekends);
        let plan = tl.plan_quick_select(&rule).unwrap();
        assert_eq!(tl.commit_quick_select(&plan), 8);
        assert_eq!(tl.cells().count_for_task("b", Stage::Planning), 8);
    }

    #[test]
    fn test_empty_quick_select_leaves_store_untouched() {
        let mut tl = timeline();
        let rule = QuickSelect::new("a", Stage::Planning);
        assert_eq!(tl.plan_quick_select(&rule), Err(QuickSelectError::NoMonths));
        assert!(tl.cells().is_empty());
        assert!(!tl.dirty().any());
    }

    #[test]
    fn test_labels_mark_dirty_only_on_change() {
        let mut tl = timeline();
        tl.set_title(DEFAULT_TITLE);
        assert!(!tl.dirty().title);
        tl.set_title("My Year");
        tl.set_header_text("Habits");
        let dirty = tl.take_dirty();
        assert!(dirty.title && dirty.header_text && !dirty.tasks);
        assert_eq!(tl.title(), "My Year");
    }

    #[test]
    fn test_replace_data_revalidates_selection() {
        let mut tl = timeline();
        tl.begin_selection(CellKey::new("a", Month::May, 1));
        tl.end_selection();

        let tasks = TaskList::new(vec![Task::with_status("b", "Thai", TaskStatus::Completed)]);
        tl.replace_data(tasks, CellStore::new(), "T".into(), "H".into());
        assert!(tl.selection().is_empty());
        assert_eq!(tl.tasks().len(), 1);
    }
}
