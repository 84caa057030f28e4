pub mod kv;
pub mod persistence;

pub use kv::{KeyValueStore, MemoryStore, SqliteStore};
pub use persistence::{CELLS_KEY, HEADER_TEXT_KEY, Persistence, TASKS_KEY, TITLE_KEY};

use crate::utils::paths::get_database_path;
use anyhow::Result;

/// Open the default on-disk store under the data directory.
pub fn open_default(seed_tasks: bool) -> Result<Persistence<SqliteStore>> {
    let store = SqliteStore::open(&get_database_path()?)?;
    Ok(Persistence::new(store, seed_tasks))
}
