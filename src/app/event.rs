use super::mode::Mode;
use super::state::{AppState, EditTarget, ExportFocus};
use crate::ui::components::help_line_count;
use crate::ui::components::stage_bar;
use crate::ui::components::timeline_grid::GridHit;
use anyhow::Result;
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, ModifierKeyCode, MouseButton, MouseEvent,
    MouseEventKind,
};
use skill_timeline::calendar::Month;
use skill_timeline::timeline::{Modifier, Modifiers, SelectionInput, Stage, Surface};

/// Months per row in the month checkbox grids
const MONTH_COLUMNS: isize = 4;

fn modifiers_from(mods: KeyModifiers) -> Modifiers {
    Modifiers {
        shift: mods.contains(KeyModifiers::SHIFT),
        ctrl_or_cmd: mods.intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER | KeyModifiers::META),
    }
}

fn modifier_key(code: ModifierKeyCode) -> Option<Modifier> {
    match code {
        ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift => Some(Modifier::Shift),
        ModifierKeyCode::LeftControl
        | ModifierKeyCode::RightControl
        | ModifierKeyCode::LeftSuper
        | ModifierKeyCode::RightSuper
        | ModifierKeyCode::LeftMeta
        | ModifierKeyCode::RightMeta => Some(Modifier::CtrlOrCmd),
        _ => None,
    }
}

fn move_month_cursor(cursor: usize, delta: isize) -> usize {
    cursor
        .saturating_add_signed(delta)
        .min(Month::ALL.len() - 1)
}

pub fn handle_key_event(key: KeyEvent, state: &mut AppState) -> Result<()> {
    // Only delivered by terminals with key release reporting
    if let KeyCode::Modifier(code) = key.code {
        if let Some(modifier) = modifier_key(code) {
            let input = match key.kind {
                KeyEventKind::Release => SelectionInput::ModifierUp(modifier),
                _ => SelectionInput::ModifierDown(modifier),
            };
            state.select(input);
        }
        return Ok(());
    }
    if key.kind == KeyEventKind::Release {
        return Ok(());
    }

    if state.show_help {
        let popup_height = (state.terminal_height * 80) / 100;
        let inner_height = popup_height.saturating_sub(2);
        let max_scroll = help_line_count().saturating_sub(inner_height);

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                state.help_scroll = state.help_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if state.help_scroll < max_scroll {
                    state.help_scroll = state.help_scroll.saturating_add(1);
                }
            }
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                state.show_help = false;
                state.help_scroll = 0;
            }
            _ => {}
        }
        return Ok(());
    }

    match state.mode {
        Mode::Navigate => handle_navigate_mode(key, state),
        Mode::StageMenu => handle_stage_menu_mode(key, state),
        Mode::Edit => handle_edit_mode(key, state),
        Mode::ConfirmDelete => handle_confirm_delete_mode(key, state),
        Mode::QuickSelect => handle_quick_select_mode(key, state),
        Mode::ConfirmQuickSelect => handle_confirm_quick_select_mode(key, state),
        Mode::Export => handle_export_mode(key, state),
        Mode::Analysis => handle_analysis_mode(key, state),
    }
    Ok(())
}

fn handle_navigate_mode(key: KeyEvent, state: &mut AppState) {
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    let arrow = match key.code {
        KeyCode::Left => Some((0, -1)),
        KeyCode::Right => Some((0, 1)),
        KeyCode::Up => Some((-1, 0)),
        KeyCode::Down => Some((1, 0)),
        _ => None,
    };
    if let Some((rows, cols)) = arrow {
        state.move_cursor(rows, cols);
        if shift {
            state.click_cursor(Modifiers::shift());
        }
        return;
    }

    match key.code {
        KeyCode::Char('h') => state.move_cursor(0, -1),
        KeyCode::Char('l') => state.move_cursor(0, 1),
        KeyCode::Char('k') => state.move_cursor(-1, 0),
        KeyCode::Char('j') => state.move_cursor(1, 0),
        KeyCode::Char('[') | KeyCode::PageUp => state.jump_month(-1),
        KeyCode::Char(']') | KeyCode::PageDown => state.jump_month(1),
        KeyCode::Char('g') => state.jump_to_today(),
        KeyCode::Char(' ') => state.click_cursor(Modifiers::NONE),
        KeyCode::Char('m') => state.click_cursor(Modifiers::ctrl()),
        KeyCode::Char('v') => state.toggle_keyboard_drag(),
        KeyCode::Char('s') | KeyCode::Enter => state.open_stage_menu(),
        KeyCode::Char('a') => state.start_edit(EditTarget::NewTask),
        KeyCode::Char('d') => state.request_delete(),
        KeyCode::Char('t') => state.cycle_current_status(),
        KeyCode::Char('T') => state.start_edit(EditTarget::Title),
        KeyCode::Char('H') => state.start_edit(EditTarget::HeaderText),
        KeyCode::Char('Q') => state.open_quick_select(),
        KeyCode::Char('e') => state.open_export(),
        KeyCode::Char('A') => state.mode = Mode::Analysis,
        KeyCode::Char('?') => {
            state.show_help = true;
            state.help_scroll = 0;
        }
        KeyCode::Esc => state.clear_selection(),
        KeyCode::Char('q') => state.should_quit = true,
        _ => {}
    }
}

fn handle_stage_menu_mode(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Char('p') | KeyCode::Char('1') => state.apply_stage(Some(Stage::Planning)),
        KeyCode::Char('c') | KeyCode::Char('2') => state.apply_stage(Some(Stage::Completed)),
        KeyCode::Char('f') | KeyCode::Char('3') => state.apply_stage(Some(Stage::Failed)),
        KeyCode::Delete | KeyCode::Backspace | KeyCode::Char('0') => state.apply_stage(None),
        KeyCode::Esc | KeyCode::Char('q') => state.mode = Mode::Navigate,
        _ => {}
    }
}

fn handle_edit_mode(key: KeyEvent, state: &mut AppState) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => state.cancel_edit(),
        KeyCode::Enter => state.commit_edit(),
        KeyCode::Backspace if ctrl || key.modifiers.contains(KeyModifiers::ALT) => {
            state.input.delete_word_back()
        }
        KeyCode::Char('w') if ctrl => state.input.delete_word_back(),
        KeyCode::Char('a') if ctrl => state.input.home(),
        KeyCode::Char('e') if ctrl => state.input.end(),
        KeyCode::Backspace => state.input.backspace(),
        KeyCode::Delete => state.input.delete(),
        KeyCode::Left => state.input.move_left(),
        KeyCode::Right => state.input.move_right(),
        KeyCode::Home => state.input.home(),
        KeyCode::End => state.input.end(),
        KeyCode::Char(c) if !ctrl => state.input.insert(c),
        _ => {}
    }
}

fn handle_confirm_delete_mode(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => state.confirm_delete(),
        _ => state.cancel_delete(),
    }
}

fn handle_quick_select_mode(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            state.close_quick_select();
            return;
        }
        KeyCode::Enter => {
            state.submit_quick_select();
            return;
        }
        KeyCode::Char('j') | KeyCode::Tab => {
            state.quick_select_cycle_task(1);
            return;
        }
        KeyCode::Char('k') | KeyCode::BackTab => {
            state.quick_select_cycle_task(-1);
            return;
        }
        _ => {}
    }

    let Some(form) = state.quick_select.as_mut() else {
        state.mode = Mode::Navigate;
        return;
    };
    match key.code {
        KeyCode::Left | KeyCode::Char('h') => form.month_cursor = move_month_cursor(form.month_cursor, -1),
        KeyCode::Right | KeyCode::Char('l') => form.month_cursor = move_month_cursor(form.month_cursor, 1),
        KeyCode::Up => form.month_cursor = move_month_cursor(form.month_cursor, -MONTH_COLUMNS),
        KeyCode::Down => form.month_cursor = move_month_cursor(form.month_cursor, MONTH_COLUMNS),
        KeyCode::Char(' ') => {
            if let Some(month) = Month::from_index(form.month_cursor) {
                form.rule.toggle_month(month);
            }
        }
        KeyCode::Char('a') => form.toggle_all_months(),
        KeyCode::Char('f') => form.rule.filter = form.rule.filter.next(),
        KeyCode::Char('s') => form.cycle_stage(),
        _ => {}
    }
}

fn handle_confirm_quick_select_mode(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => state.confirm_quick_select(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => state.reject_quick_select(),
        _ => {}
    }
}

fn handle_export_mode(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            state.mode = Mode::Navigate;
            return;
        }
        KeyCode::Enter => {
            state.export_to_file();
            return;
        }
        KeyCode::Char('y') => {
            state.export_to_clipboard();
            return;
        }
        _ => {}
    }

    let task_count = state.timeline.tasks().len();
    let task_id = state
        .timeline
        .tasks()
        .get(state.export_form.task_cursor)
        .map(|t| t.id.clone());
    let form = &mut state.export_form;

    match key.code {
        KeyCode::Tab | KeyCode::BackTab => {
            form.focus = match form.focus {
                ExportFocus::Months => ExportFocus::Tasks,
                ExportFocus::Tasks => ExportFocus::Months,
            };
        }
        KeyCode::Char('f') => form.format = form.format.next(),
        KeyCode::Char('a') => match form.focus {
            ExportFocus::Months => form.filter.months.clear(),
            ExportFocus::Tasks => form.filter.tasks.clear(),
        },
        KeyCode::Char(' ') => match form.focus {
            ExportFocus::Months => {
                if let Some(month) = Month::from_index(form.month_cursor) {
                    form.filter.toggle_month(month);
                }
            }
            ExportFocus::Tasks => {
                if let Some(id) = task_id {
                    form.filter.toggle_task(&id);
                }
            }
        },
        code => {
            let delta: isize = match code {
                KeyCode::Left | KeyCode::Char('h') => -1,
                KeyCode::Right | KeyCode::Char('l') => 1,
                KeyCode::Up | KeyCode::Char('k') => -1,
                KeyCode::Down | KeyCode::Char('j') => 1,
                _ => return,
            };
            let vertical = matches!(code, KeyCode::Up | KeyCode::Down | KeyCode::Char('k') | KeyCode::Char('j'));
            match form.focus {
                ExportFocus::Months => {
                    let step = if vertical { delta * MONTH_COLUMNS } else { delta };
                    form.month_cursor = move_month_cursor(form.month_cursor, step);
                }
                ExportFocus::Tasks => {
                    form.task_cursor = form
                        .task_cursor
                        .saturating_add_signed(delta)
                        .min(task_count.saturating_sub(1));
                }
            }
        }
    }
}

fn handle_analysis_mode(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Tab | KeyCode::Char('l') | KeyCode::Right => {
            state.analysis_view = state.analysis_view.next();
        }
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('A') => state.mode = Mode::Navigate,
        _ => {}
    }
}

pub fn handle_mouse_event(mouse: MouseEvent, state: &mut AppState) -> Result<()> {
    if state.show_help {
        let popup_height = (state.terminal_height * 80) / 100;
        let max_scroll = help_line_count().saturating_sub(popup_height.saturating_sub(2));

        match mouse.kind {
            MouseEventKind::ScrollUp => {
                state.help_scroll = state.help_scroll.saturating_sub(3);
            }
            MouseEventKind::ScrollDown => {
                state.help_scroll = state.help_scroll.saturating_add(3).min(max_scroll);
            }
            _ => {}
        }
        return Ok(());
    }

    if !matches!(state.mode, Mode::Navigate | Mode::StageMenu) {
        return Ok(());
    }

    let shift = mouse.modifiers.contains(KeyModifiers::SHIFT);
    match mouse.kind {
        MouseEventKind::ScrollUp if shift => state.move_cursor(0, -7),
        MouseEventKind::ScrollDown if shift => state.move_cursor(0, 7),
        MouseEventKind::ScrollUp => state.move_cursor(-3, 0),
        MouseEventKind::ScrollDown => state.move_cursor(3, 0),
        MouseEventKind::ScrollLeft => state.move_cursor(0, -7),
        MouseEventKind::ScrollRight => state.move_cursor(0, 7),
        MouseEventKind::Down(MouseButton::Left) => handle_pointer_down(mouse, state),
        MouseEventKind::Drag(MouseButton::Left) => {
            if !state.timeline.selection().is_dragging() {
                return Ok(());
            }
            let hit = state.grid_layout.and_then(|l| l.hit(mouse.column, mouse.row));
            if let Some(GridHit::Cell { row, col }) = hit
                && let Some(cell) = state.cell_at(row, col)
            {
                state.set_cursor(row, col);
                state.select(SelectionInput::PointerEnter(cell));
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            state.select(SelectionInput::PointerUp);
        }
        _ => {}
    }
    Ok(())
}

fn handle_pointer_down(mouse: MouseEvent, state: &mut AppState) {
    let (x, y) = (mouse.column, mouse.row);

    if let Some(stage) = stage_bar::button_at(state.stage_bar_area, x, y) {
        state.select(SelectionInput::PointerDownOn(Surface::StageControl));
        state.apply_stage(stage);
        return;
    }

    if state.mode == Mode::StageMenu {
        state.mode = Mode::Navigate;
    }
    if state.keyboard_drag {
        state.toggle_keyboard_drag();
    }

    let hit = state.grid_layout.and_then(|l| l.hit(x, y));
    match hit {
        Some(GridHit::Cell { row, col }) => {
            let Some(cell) = state.cell_at(row, col) else {
                return;
            };
            state.set_cursor(row, col);
            state.timeline.set_modifiers(modifiers_from(mouse.modifiers));
            state.select(SelectionInput::PointerDown(cell));
        }
        Some(GridHit::Background) => {
            state.select(SelectionInput::PointerDownOn(Surface::Timeline));
        }
        None => {
            let bar = state.stage_bar_area;
            let on_bar = bar.height > 0 && y == bar.y && x >= bar.x && x < bar.x + bar.width;
            let surface = if on_bar { Surface::StageControl } else { Surface::Elsewhere };
            state.select(SelectionInput::PointerDownOn(surface));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::components::timeline_grid::GridLayout;
    use crate::ui::theme::Theme;
    use ratatui::layout::Rect;
    use skill_timeline::calendar::Calendar;
    use skill_timeline::config::Config;
    use skill_timeline::storage::{Persistence, SqliteStore};
    use skill_timeline::timeline::CellKey;
    use tempfile::TempDir;

    const BAR_Y: u16 = 20;

    fn setup(temp_dir: &TempDir) -> AppState {
        let store = SqliteStore::open(&temp_dir.path().join("timeline.db")).unwrap();
        let persistence = Persistence::new(store, true);
        let timeline = persistence.load_timeline(Calendar::new(2025));
        let config = Config {
            export_dir: Some(temp_dir.path().join("exports")),
            ..Config::default()
        };
        let mut state = AppState::new(timeline, persistence, Theme::default(), &config).unwrap();
        state.set_cursor(0, 0);
        // Name column 10 wide, cells 2 wide, first cell row at y = 3
        state.grid_layout = Some(GridLayout::new(Rect::new(0, 1, 30, 10), 2, 0, 0, 8));
        state.stage_bar_area = Rect::new(0, BAR_Y, 80, 1);
        state
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(state: &mut AppState, code: KeyCode) {
        handle_key_event(key(code), state).unwrap();
    }

    fn mouse(state: &mut AppState, kind: MouseEventKind, column: u16, row: u16, modifiers: KeyModifiers) {
        handle_mouse_event(
            MouseEvent {
                kind,
                column,
                row,
                modifiers,
            },
            state,
        )
        .unwrap();
    }

    fn click(state: &mut AppState, column: u16, row: u16, modifiers: KeyModifiers) {
        mouse(state, MouseEventKind::Down(MouseButton::Left), column, row, modifiers);
        mouse(state, MouseEventKind::Up(MouseButton::Left), column, row, modifiers);
    }

    fn first_task_cell(state: &AppState, day: u8) -> CellKey {
        let id = state.timeline.tasks().get(0).unwrap().id.clone();
        CellKey::new(id, Month::January, day)
    }

    #[test]
    fn test_keyboard_selection_and_stage_menu() {
        let temp_dir = TempDir::new().unwrap();
        let mut state = setup(&temp_dir);

        press(&mut state, KeyCode::Char(' '));
        handle_key_event(KeyEvent::new(KeyCode::Right, KeyModifiers::SHIFT), &mut state).unwrap();
        handle_key_event(KeyEvent::new(KeyCode::Right, KeyModifiers::SHIFT), &mut state).unwrap();
        assert_eq!(state.timeline.selection().len(), 3);

        press(&mut state, KeyCode::Char('s'));
        assert_eq!(state.mode, Mode::StageMenu);
        press(&mut state, KeyCode::Char('c'));
        assert_eq!(state.mode, Mode::Navigate);
        assert_eq!(
            state.timeline.get_stage(&first_task_cell(&state, 3)),
            Some(Stage::Completed)
        );
    }

    #[test]
    fn test_ctrl_toggle_key() {
        let temp_dir = TempDir::new().unwrap();
        let mut state = setup(&temp_dir);

        press(&mut state, KeyCode::Char('m'));
        press(&mut state, KeyCode::Char('l'));
        press(&mut state, KeyCode::Char('m'));
        assert_eq!(state.timeline.selection().len(), 2);
        press(&mut state, KeyCode::Char('m'));
        assert_eq!(state.timeline.selection().len(), 1);

        press(&mut state, KeyCode::Esc);
        assert!(state.timeline.selection().is_empty());
    }

    #[test]
    fn test_mouse_drag_selects_rectangle() {
        let temp_dir = TempDir::new().unwrap();
        let mut state = setup(&temp_dir);

        mouse(&mut state, MouseEventKind::Down(MouseButton::Left), 10, 3, KeyModifiers::NONE);
        mouse(&mut state, MouseEventKind::Drag(MouseButton::Left), 12, 4, KeyModifiers::NONE);
        mouse(&mut state, MouseEventKind::Up(MouseButton::Left), 12, 4, KeyModifiers::NONE);

        assert_eq!(state.timeline.selection().len(), 4);
        assert!(!state.timeline.selection().is_dragging());
        assert_eq!((state.cursor_row, state.cursor_col), (1, 1));

        // Dragging without a press does nothing
        mouse(&mut state, MouseEventKind::Drag(MouseButton::Left), 16, 5, KeyModifiers::NONE);
        assert_eq!(state.timeline.selection().len(), 4);
    }

    #[test]
    fn test_modifier_clicks() {
        let temp_dir = TempDir::new().unwrap();
        let mut state = setup(&temp_dir);

        click(&mut state, 10, 3, KeyModifiers::NONE);
        click(&mut state, 14, 4, KeyModifiers::SHIFT);
        // Jan 1..3 for the first two tasks
        assert_eq!(state.timeline.selection().len(), 6);

        click(&mut state, 20, 6, KeyModifiers::CONTROL);
        assert_eq!(state.timeline.selection().len(), 7);
        click(&mut state, 20, 6, KeyModifiers::CONTROL);
        assert_eq!(state.timeline.selection().len(), 6);

        click(&mut state, 12, 3, KeyModifiers::NONE);
        assert_eq!(state.timeline.selection().len(), 1);
    }

    #[test]
    fn test_surfaces_keep_or_clear_selection() {
        let temp_dir = TempDir::new().unwrap();
        let mut state = setup(&temp_dir);
        click(&mut state, 10, 3, KeyModifiers::NONE);

        // Task name column belongs to the grid
        click(&mut state, 3, 3, KeyModifiers::NONE);
        assert_eq!(state.timeline.selection().len(), 1);

        // Empty part of the stage bar
        click(&mut state, 79, BAR_Y, KeyModifiers::NONE);
        assert_eq!(state.timeline.selection().len(), 1);

        // Title row
        click(&mut state, 5, 0, KeyModifiers::NONE);
        assert!(state.timeline.selection().is_empty());
    }

    #[test]
    fn test_stage_button_applies_to_selection() {
        let temp_dir = TempDir::new().unwrap();
        let mut state = setup(&temp_dir);
        click(&mut state, 10, 3, KeyModifiers::NONE);

        let (_, failed_x, _) = stage_bar::button_spans(state.stage_bar_area)[2];
        click(&mut state, failed_x, BAR_Y, KeyModifiers::NONE);

        assert_eq!(
            state.timeline.get_stage(&first_task_cell(&state, 1)),
            Some(Stage::Failed)
        );
        assert_eq!(state.timeline.selection().len(), 1);
    }

    #[test]
    fn test_add_task_through_edit_line() {
        let temp_dir = TempDir::new().unwrap();
        let mut state = setup(&temp_dir);

        press(&mut state, KeyCode::Char('a'));
        assert_eq!(state.mode, Mode::Edit);
        for c in "Go".chars() {
            press(&mut state, KeyCode::Char(c));
        }
        press(&mut state, KeyCode::Enter);

        assert_eq!(state.mode, Mode::Navigate);
        assert_eq!(state.timeline.tasks().len(), 9);
        assert_eq!(state.current_task().unwrap().name, "Go");
    }

    #[test]
    fn test_delete_needs_confirmation() {
        let temp_dir = TempDir::new().unwrap();
        let mut state = setup(&temp_dir);

        press(&mut state, KeyCode::Char('d'));
        assert_eq!(state.mode, Mode::ConfirmDelete);
        press(&mut state, KeyCode::Char('n'));
        assert_eq!(state.timeline.tasks().len(), 8);

        press(&mut state, KeyCode::Char('d'));
        press(&mut state, KeyCode::Char('y'));
        assert_eq!(state.timeline.tasks().len(), 7);
    }

    #[test]
    fn test_quick_select_keys() {
        let temp_dir = TempDir::new().unwrap();
        let mut state = setup(&temp_dir);

        press(&mut state, KeyCode::Char('Q'));
        assert_eq!(state.mode, Mode::QuickSelect);
        // January is preselected; add February and keep weekdays only
        press(&mut state, KeyCode::Char('l'));
        press(&mut state, KeyCode::Char(' '));
        press(&mut state, KeyCode::Char('f'));
        press(&mut state, KeyCode::Enter);
        assert_eq!(state.mode, Mode::ConfirmQuickSelect);
        press(&mut state, KeyCode::Char('y'));

        // 23 weekdays in January 2025, 20 in February
        assert_eq!(state.timeline.cells().len(), 43);
        assert_eq!(state.mode, Mode::Navigate);
    }

    #[test]
    fn test_export_form_keys() {
        let temp_dir = TempDir::new().unwrap();
        let mut state = setup(&temp_dir);

        press(&mut state, KeyCode::Char('e'));
        assert_eq!(state.mode, Mode::Export);
        press(&mut state, KeyCode::Down);
        press(&mut state, KeyCode::Char(' '));
        assert!(state.export_form.filter.months.contains(&Month::May));

        press(&mut state, KeyCode::Tab);
        press(&mut state, KeyCode::Char('j'));
        press(&mut state, KeyCode::Char(' '));
        let second = state.timeline.tasks().get(1).unwrap().id.clone();
        assert!(state.export_form.filter.tasks.contains(&second));

        press(&mut state, KeyCode::Esc);
        assert_eq!(state.mode, Mode::Navigate);
    }

    #[test]
    fn test_help_and_analysis_toggle() {
        let temp_dir = TempDir::new().unwrap();
        let mut state = setup(&temp_dir);

        press(&mut state, KeyCode::Char('?'));
        assert!(state.show_help);
        press(&mut state, KeyCode::Char('q'));
        assert!(!state.show_help);
        assert!(!state.should_quit);

        press(&mut state, KeyCode::Char('A'));
        assert_eq!(state.mode, Mode::Analysis);
        press(&mut state, KeyCode::Tab);
        press(&mut state, KeyCode::Esc);
        assert_eq!(state.mode, Mode::Navigate);

        press(&mut state, KeyCode::Char('q'));
        assert!(state.should_quit);
    }
}
