pub mod components;
pub mod theme;

use crate::app::{
    event::{handle_key_event, handle_mouse_event},
    AppState,
};
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use ratatui::{backend::CrosstermBackend, Terminal};
use skill_timeline::utils::paths::get_database_path;
use std::io::{self, Write};
use std::sync::mpsc;
use std::time::Duration;
use tracing::{debug, warn};

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = disable_raw_mode();
        let _ = execute!(stdout, DisableMouseCapture, LeaveAlternateScreen);
        let _ = stdout.flush();
    }
}

pub fn run_tui(mut state: AppState) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (db_tx, db_rx) = mpsc::channel();
    let _watcher = setup_database_watcher(db_tx);

    let result = run_app(&mut terminal, &mut state, db_rx);
    terminal.show_cursor()?;

    // Anything still unsaved after a failed write gets one more attempt
    state.persist();

    result
}

fn setup_database_watcher(tx: mpsc::Sender<()>) -> Option<RecommendedWatcher> {
    let db_path = get_database_path().ok()?;

    let watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res
                && event.kind.is_modify()
            {
                let _ = tx.send(());
            }
        },
        Config::default(),
    );

    match watcher {
        Ok(mut w) => match w.watch(&db_path, RecursiveMode::NonRecursive) {
            Ok(()) => Some(w),
            Err(e) => {
                warn!(error = %e, path = %db_path.display(), "could not watch database");
                None
            }
        },
        Err(e) => {
            warn!(error = %e, "could not create database watcher");
            None
        }
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    db_rx: mpsc::Receiver<()>,
) -> Result<()> {
    loop {
        terminal.draw(|f| {
            components::render(f, state);
        })?;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key)
                    if key.kind == KeyEventKind::Press || matches!(key.code, KeyCode::Modifier(_)) =>
                {
                    handle_key_event(key, state)?;
                }
                Event::Mouse(mouse) => handle_mouse_event(mouse, state)?,
                _ => {}
            }
        }

        state.clear_expired_status_message();

        let mut should_reload = false;
        while db_rx.try_recv().is_ok() {
            should_reload = true;
        }
        if should_reload {
            debug!("database changed on disk");
            state.reload_from_database();
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}
