//! Pointer/keyboard driven cell selection.
//!
//! A gesture is `begin_selection` followed by any number of
//! `extend_selection` calls while the pointer is held, closed by
//! `end_selection`. Modifier keys are only consulted when a gesture begins:
//! ctrl/cmd toggles a single cell, shift unions the range from the most
//! recently added cell, and a plain press starts a fresh selection.

use super::cell::CellKey;
use super::task::TaskList;
use crate::calendar::Month;
use std::collections::HashSet;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl_or_cmd: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl_or_cmd: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ctrl_or_cmd: false,
        }
    }

    pub fn ctrl() -> Self {
        Self {
            shift: false,
            ctrl_or_cmd: true,
        }
    }

    pub fn any(self) -> bool {
        self.shift || self.ctrl_or_cmd
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Shift,
    CtrlOrCmd,
}

/// Where a pointer press landed, as far as selection is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// The timeline grid itself, outside any cell
    Timeline,
    /// The stage-assignment control; pressing it must keep the selection
    StageControl,
    /// Anything else
    Elsewhere,
}

impl Surface {
    pub fn keeps_selection(self) -> bool {
        !matches!(self, Surface::Elsewhere)
    }
}

/// Input stream consumed by [`SelectionEngine::handle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionInput {
    ModifierDown(Modifier),
    ModifierUp(Modifier),
    PointerDown(CellKey),
    PointerEnter(CellKey),
    PointerUp,
    PointerDownOn(Surface),
    Escape,
}

/// All cells between two endpoints: the task rows between them, and on each
/// row the days from the earlier endpoint to the later one. Months strictly
/// between the two endpoint months are covered in full.
///
/// The result does not depend on argument order. Returns None when either
/// endpoint refers to a task that is not in `tasks`.
pub fn range(start: &CellKey, end: &CellKey, tasks: &TaskList) -> Option<Vec<CellKey>> {
    let start_task = tasks.position(&start.task_id)?;
    let end_task = tasks.position(&end.task_id)?;
    let (min_task, max_task) = (start_task.min(end_task), start_task.max(end_task));

    let (first, last) = if (start.month, start.day) <= (end.month, end.day) {
        (start, end)
    } else {
        (end, start)
    };

    let mut result = Vec::new();
    for task in &tasks.as_slice()[min_task..=max_task] {
        for month_index in first.month.index()..=last.month.index() {
            let Some(month) = Month::from_index(month_index) else {
                continue;
            };
            let count = month.day_count();
            let from = if month == first.month { first.day.max(1) } else { 1 };
            let to = if month == last.month {
                last.day.min(count)
            } else {
                count
            };
            for day in from..=to {
                result.push(CellKey::new(task.id.clone(), month, day));
            }
        }
    }
    Some(result)
}

#[derive(Debug, Clone, Default)]
pub struct SelectionEngine {
    /// Insertion order; the last entry anchors shift-extension
    order: Vec<CellKey>,
    members: HashSet<CellKey>,
    anchor: Option<CellKey>,
    modifiers: Modifiers,
    dragging: bool,
}

impl SelectionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn is_selected(&self, key: &CellKey) -> bool {
        self.members.contains(key)
    }

    pub fn cells(&self) -> &[CellKey] {
        &self.order
    }

    pub fn last_added(&self) -> Option<&CellKey> {
        self.order.last()
    }

    pub fn anchor(&self) -> Option<&CellKey> {
        self.anchor.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    pub fn press(&mut self, modifier: Modifier) {
        match modifier {
            Modifier::Shift => self.modifiers.shift = true,
            Modifier::CtrlOrCmd => self.modifiers.ctrl_or_cmd = true,
        }
    }

    pub fn release(&mut self, modifier: Modifier) {
        match modifier {
            Modifier::Shift => self.modifiers.shift = false,
            Modifier::CtrlOrCmd => self.modifiers.ctrl_or_cmd = false,
        }
    }

    /// Feed one input event. Returns true when the selected set changed.
    pub fn handle(&mut self, input: SelectionInput, tasks: &TaskList) -> bool {
        match input {
            SelectionInput::ModifierDown(m) => {
                self.press(m);
                false
            }
            SelectionInput::ModifierUp(m) => {
                self.release(m);
                false
            }
            SelectionInput::PointerDown(cell) => self.begin_selection(cell, tasks),
            SelectionInput::PointerEnter(cell) => self.extend_selection(cell, tasks),
            SelectionInput::PointerUp => {
                self.end_selection();
                false
            }
            SelectionInput::PointerDownOn(surface) => {
                if surface.keeps_selection() {
                    false
                } else {
                    self.clear()
                }
            }
            SelectionInput::Escape => self.clear(),
        }
    }

    /// Start a gesture on `cell`. Presses on cells of unknown tasks are ignored.
    pub fn begin_selection(&mut self, cell: CellKey, tasks: &TaskList) -> bool {
        if !tasks.contains(&cell.task_id) {
            debug!(cell = %cell, "begin_selection: ignoring cell of unknown task");
            return false;
        }

        self.anchor = Some(cell.clone());
        self.dragging = true;

        if self.modifiers.ctrl_or_cmd {
            if self.members.contains(&cell) {
                self.remove(&cell);
            } else {
                self.insert(cell);
            }
            true
        } else if self.modifiers.shift && !self.order.is_empty() {
            let before = self.order.len();
            let from = self.order.last().cloned();
            match from.and_then(|from| range(&from, &cell, tasks)) {
                Some(cells) => {
                    for c in cells {
                        self.insert(c);
                    }
                }
                // Stale endpoint: drop it and keep only the pressed cell
                None => self.insert(cell),
            }
            trace!(added = self.order.len() - before, "shift-extended selection");
            self.order.len() != before
        } else {
            self.replace_with(vec![cell]);
            true
        }
    }

    /// Pointer moved onto `cell` while a gesture is active. Without modifiers
    /// the selection becomes the range from the anchor to `cell`.
    pub fn extend_selection(&mut self, cell: CellKey, tasks: &TaskList) -> bool {
        if !self.dragging || self.modifiers.any() {
            return false;
        }
        let Some(anchor) = self.anchor.as_ref() else {
            return false;
        };
        match range(anchor, &cell, tasks) {
            Some(cells) => {
                let changed = cells.len() != self.order.len()
                    || cells.iter().any(|c| !self.members.contains(c));
                if changed {
                    self.replace_with(cells);
                }
                changed
            }
            None => false,
        }
    }

    pub fn end_selection(&mut self) {
        self.dragging = false;
    }

    /// Empty the selection. Returns true if anything was selected.
    pub fn clear(&mut self) -> bool {
        self.dragging = false;
        if self.order.is_empty() {
            return false;
        }
        debug!(count = self.order.len(), "selection cleared");
        self.order.clear();
        self.members.clear();
        true
    }

    /// Drop every entry of a deleted task, including a pending anchor.
    pub fn remove_task(&mut self, task_id: &str) {
        self.order.retain(|c| c.task_id != task_id);
        self.members.retain(|c| c.task_id != task_id);
        if self.anchor.as_ref().is_some_and(|a| a.task_id == task_id) {
            self.anchor = None;
            self.dragging = false;
        }
    }

    /// Drop entries whose task is no longer in `tasks`.
    pub fn retain_tasks(&mut self, tasks: &TaskList) {
        self.order.retain(|c| tasks.contains(&c.task_id));
        self.members.retain(|c| tasks.contains(&c.task_id));
        if self.anchor.as_ref().is_some_and(|a| !tasks.contains(&a.task_id)) {
            self.anchor = None;
            self.dragging = false;
        }
    }

    fn insert(&mut self, cell: CellKey) {
        if self.members.insert(cell.clone()) {
            self.order.push(cell);
        }
    }

    fn remove(&mut self, cell: &CellKey) {
        if self.members.remove(cell) {
            self.order.retain(|c| c != cell);
        }
    }

    fn replace_with(&mut self, cells: Vec<CellKey>) {
        self.order.clear();
        self.members.clear();
        for cell in cells {
            self.insert(cell);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::task::{Task, TaskStatus};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn tasks() -> TaskList {
        TaskList::new(vec![
            Task::with_status("a", "AWS", TaskStatus::InProgress),
            Task::with_status("b", "Thai", TaskStatus::InProgress),
            Task::with_status("c", "German", TaskStatus::NotStarted),
        ])
    }

    fn key(task: &str, month: Month, day: u8) -> CellKey {
        CellKey::new(task, month, day)
    }

    fn as_set(cells: &[CellKey]) -> BTreeSet<CellKey> {
        cells.iter().cloned().collect()
    }

    #[test]
    fn test_range_two_tasks_same_month() {
        let tasks = tasks();
        let cells = range(&key("a", Month::January, 1), &key("b", Month::January, 3), &tasks).unwrap();
        let expected: BTreeSet<CellKey> = [
            key("a", Month::January, 1),
            key("a", Month::January, 2),
            key("a", Month::January, 3),
            key("b", Month::January, 1),
            key("b", Month::January, 2),
            key("b", Month::January, 3),
        ]
        .into_iter()
        .collect();
        assert_eq!(as_set(&cells), expected);
        assert_eq!(cells.len(), 6);
    }

    #[test]
    fn test_range_single_cell() {
        let tasks = tasks();
        let k = key("b", Month::May, 17);
        assert_eq!(range(&k, &k, &tasks).unwrap(), vec![k]);
    }

    #[test]
    fn test_range_is_symmetric() {
        let tasks = tasks();
        let pairs = [
            (key("a", Month::January, 30), key("c", Month::March, 2)),
            (key("c", Month::June, 15), key("a", Month::June, 3)),
            (key("b", Month::December, 1), key("b", Month::November, 29)),
            (key("a", Month::February, 28), key("c", Month::January, 31)),
        ];
        for (a, b) in pairs {
            let forward = as_set(&range(&a, &b, &tasks).unwrap());
            let backward = as_set(&range(&b, &a, &tasks).unwrap());
            assert_eq!(forward, backward, "range({a}, {b}) not symmetric");
        }
    }

    #[test]
    fn test_range_across_months_clamps_boundaries_only() {
        let tasks = tasks();
        let cells = range(&key("a", Month::March, 4), &key("a", Month::January, 30), &tasks).unwrap();
        // Jan 30-31, all of February, Mar 1-4
        assert_eq!(cells.len(), 2 + 28 + 4);
        assert_eq!(cells.first(), Some(&key("a", Month::January, 30)));
        assert_eq!(cells.last(), Some(&key("a", Month::March, 4)));
        assert!(cells.contains(&key("a", Month::February, 1)));
        assert!(!cells.contains(&key("a", Month::January, 29)));
        assert!(!cells.contains(&key("a", Month::March, 5)));
    }

    #[test]
    fn test_range_with_missing_task_is_none() {
        let tasks = tasks();
        assert!(range(&key("a", Month::May, 1), &key("zzz", Month::May, 2), &tasks).is_none());
    }

    #[test]
    fn test_plain_press_replaces() {
        let tasks = tasks();
        let mut engine = SelectionEngine::new();
        engine.begin_selection(key("a", Month::May, 1), &tasks);
        engine.end_selection();
        engine.begin_selection(key("b", Month::May, 2), &tasks);
        engine.end_selection();

        assert_eq!(engine.cells(), &[key("b", Month::May, 2)]);
    }

    #[test]
    fn test_drag_overwrites_with_range() {
        let tasks = tasks();
        let mut engine = SelectionEngine::new();
        engine.begin_selection(key("a", Month::May, 1), &tasks);
        assert!(engine.extend_selection(key("a", Month::May, 5), &tasks));
        assert_eq!(engine.len(), 5);

        // Dragging back shrinks the selection
        assert!(engine.extend_selection(key("a", Month::May, 2), &tasks));
        assert_eq!(engine.len(), 2);

        // Same (anchor, cell) again is a no-op
        assert!(!engine.extend_selection(key("a", Month::May, 2), &tasks));
        engine.end_selection();

        // After the gesture ends, pointer movement changes nothing
        assert!(!engine.extend_selection(key("c", Month::June, 9), &tasks));
        assert_eq!(engine.len(), 2);
    }

    #[test]
    fn test_ctrl_toggles_membership() {
        let tasks = tasks();
        let mut engine = SelectionEngine::new();
        engine.begin_selection(key("a", Month::May, 1), &tasks);
        engine.end_selection();

        engine.press(Modifier::CtrlOrCmd);
        engine.begin_selection(key("c", Month::July, 4), &tasks);
        engine.end_selection();
        assert_eq!(engine.len(), 2);
        assert_eq!(engine.anchor(), Some(&key("c", Month::July, 4)));

        engine.begin_selection(key("a", Month::May, 1), &tasks);
        engine.end_selection();
        assert_eq!(engine.cells(), &[key("c", Month::July, 4)]);
    }

    #[test]
    fn test_shift_unions_from_last_added() {
        let tasks = tasks();
        let mut engine = SelectionEngine::new();
        engine.begin_selection(key("a", Month::May, 1), &tasks);
        engine.end_selection();
        engine.press(Modifier::CtrlOrCmd);
        engine.begin_selection(key("a", Month::May, 10), &tasks);
        engine.end_selection();
        engine.release(Modifier::CtrlOrCmd);

        engine.press(Modifier::Shift);
        engine.begin_selection(key("a", Month::May, 12), &tasks);
        engine.end_selection();

        // May 1 kept, May 10..=12 added, nothing duplicated
        let expected: BTreeSet<CellKey> = [1, 10, 11, 12]
            .into_iter()
            .map(|d| key("a", Month::May, d))
            .collect();
        assert_eq!(as_set(engine.cells()), expected);
        assert_eq!(engine.len(), 4);
    }

    #[test]
    fn test_shift_on_empty_selection_starts_fresh() {
        let tasks = tasks();
        let mut engine = SelectionEngine::new();
        engine.press(Modifier::Shift);
        engine.begin_selection(key("b", Month::March, 3), &tasks);
        assert_eq!(engine.cells(), &[key("b", Month::March, 3)]);
    }

    #[test]
    fn test_modifiers_ignored_during_drag() {
        let tasks = tasks();
        let mut engine = SelectionEngine::new();
        engine.begin_selection(key("a", Month::May, 1), &tasks);
        engine.press(Modifier::Shift);
        assert!(!engine.extend_selection(key("a", Month::May, 9), &tasks));
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn test_outside_press_clears_but_stage_control_does_not() {
        let tasks = tasks();
        let mut engine = SelectionEngine::new();
        engine.handle(SelectionInput::PointerDown(key("a", Month::May, 1)), &tasks);
        engine.handle(SelectionInput::PointerUp, &tasks);

        assert!(!engine.handle(SelectionInput::PointerDownOn(Surface::StageControl), &tasks));
        assert_eq!(engine.len(), 1);

        assert!(engine.handle(SelectionInput::PointerDownOn(Surface::Elsewhere), &tasks));
        assert!(engine.is_empty());
    }

    #[test]
    fn test_escape_clears() {
        let tasks = tasks();
        let mut engine = SelectionEngine::new();
        engine.handle(SelectionInput::PointerDown(key("a", Month::May, 1)), &tasks);
        engine.handle(SelectionInput::PointerEnter(key("b", Month::May, 3)), &tasks);
        assert_eq!(engine.len(), 6);
        assert!(engine.handle(SelectionInput::Escape, &tasks));
        assert!(engine.is_empty());
        assert!(!engine.is_dragging());
    }

    #[test]
    fn test_remove_task_drops_entries_and_anchor() {
        let tasks = tasks();
        let mut engine = SelectionEngine::new();
        engine.begin_selection(key("a", Month::May, 1), &tasks);
        engine.extend_selection(key("c", Month::May, 2), &tasks);
        assert_eq!(engine.len(), 6);

        engine.remove_task("a");
        assert_eq!(engine.len(), 4);
        assert!(engine.cells().iter().all(|c| c.task_id != "a"));
        assert!(engine.anchor().is_none());

        // Without an anchor the drag cannot extend
        assert!(!engine.extend_selection(key("c", Month::May, 9), &tasks));
    }

    #[test]
    fn test_press_on_unknown_task_is_ignored() {
        let tasks = tasks();
        let mut engine = SelectionEngine::new();
        assert!(!engine.begin_selection(key("ghost", Month::May, 1), &tasks));
        assert!(engine.is_empty());
        assert!(engine.anchor().is_none());
    }
}
