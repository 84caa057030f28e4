//! Load/save of the timeline entities.
//!
//! Each entity is an independent JSON value under its own key. Loading is
//! per-entity and never fails: a missing or unparsable value falls back to
//! that entity's default. There is no schema versioning.

use super::kv::KeyValueStore;
use crate::calendar::Calendar;
use crate::timeline::{
    CellRecord, CellStore, Dirty, Task, TaskList, Timeline, DEFAULT_HEADER_TEXT, DEFAULT_TITLE,
};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

pub const TASKS_KEY: &str = "tasks";
pub const CELLS_KEY: &str = "cellsData";
pub const TITLE_KEY: &str = "title";
pub const HEADER_TEXT_KEY: &str = "headerText";

pub struct Persistence<S: KeyValueStore> {
    store: S,
    /// Use the starter task list when no task list is stored
    seed_tasks: bool,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S, seed_tasks: bool) -> Self {
        Self { store, seed_tasks }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn default_tasks(&self) -> TaskList {
        if self.seed_tasks {
            TaskList::seeded()
        } else {
            TaskList::default()
        }
    }

    pub fn load_tasks(&self) -> TaskList {
        match self.load_json::<Vec<Task>>(TASKS_KEY) {
            Some(tasks) => TaskList::new(tasks),
            None => self.default_tasks(),
        }
    }

    pub fn load_cells(&self) -> CellStore {
        self.load_json::<Vec<CellRecord>>(CELLS_KEY)
            .map(CellStore::from_records)
            .unwrap_or_default()
    }

    pub fn load_title(&self) -> String {
        self.load_json::<String>(TITLE_KEY)
            .unwrap_or_else(|| DEFAULT_TITLE.to_string())
    }

    pub fn load_header_text(&self) -> String {
        self.load_json::<String>(HEADER_TEXT_KEY)
            .unwrap_or_else(|| DEFAULT_HEADER_TEXT.to_string())
    }

    /// Load every entity and assemble a timeline. Cell records whose task is
    /// not in the loaded task list are dropped.
    pub fn load_timeline(&self, calendar: Calendar) -> Timeline {
        let (tasks, cells, title, header_text) = self.load_parts();
        Timeline::new(tasks, cells, calendar).with_labels(title, header_text)
    }

    /// Load fresh copies of all entities, e.g. to reload after an external write.
    pub fn load_parts(&self) -> (TaskList, CellStore, String, String) {
        let tasks = self.load_tasks();
        let loaded = self.load_cells();
        let cells = CellStore::from_records(
            loaded
                .records()
                .into_iter()
                .filter(|r| tasks.contains(&r.task_id)),
        );
        if cells.len() != loaded.len() {
            debug!(dropped = loaded.len() - cells.len(), "dropped orphaned cell records");
        }
        (tasks, cells, self.load_title(), self.load_header_text())
    }

    /// Write the entities flagged in `dirty`.
    pub fn save(&mut self, timeline: &Timeline, dirty: Dirty) -> Result<()> {
        if dirty.tasks {
            self.save_json(TASKS_KEY, timeline.tasks().as_slice())?;
        }
        if dirty.cells {
            self.save_json(CELLS_KEY, &timeline.cells().records())?;
        }
        if dirty.title {
            self.save_json(TITLE_KEY, timeline.title())?;
        }
        if dirty.header_text {
            self.save_json(HEADER_TEXT_KEY, timeline.header_text())?;
        }
        if dirty.any() {
            info!(?dirty, "timeline saved");
        }
        Ok(())
    }

    /// Persist whatever the timeline has marked dirty and reset the flags.
    pub fn save_pending(&mut self, timeline: &mut Timeline) -> Result<()> {
        let dirty = timeline.take_dirty();
        if let Err(e) = self.save(timeline, dirty) {
            // Keep the flags so the next attempt writes them again
            timeline.mark_dirty(dirty);
            return Err(e);
        }
        Ok(())
    }

    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %e, "could not read stored value, using default");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "stored value is not valid, using default");
                None
            }
        }
    }

    fn save_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)
            .with_context(|| format!("Failed to serialize '{key}'"))?;
        self.store.set(key, &json)
    }
}
