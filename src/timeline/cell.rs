use crate::calendar::Month;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Progress stage tagged onto a single task-day cell.
/// Absence of a record means "no stage"; there is no empty variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Planning,
    Completed,
    Failed,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Planning, Stage::Completed, Stage::Failed];

    /// Single-letter marker used in CSV exports and grid cells
    pub fn marker(self) -> char {
        match self {
            Stage::Planning => 'P',
            Stage::Completed => 'X',
            Stage::Failed => 'F',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::Planning => "Planning",
            Stage::Completed => "Completed",
            Stage::Failed => "Failed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "planning" | "plan" | "p" => Ok(Stage::Planning),
            "completed" | "complete" | "done" | "x" => Ok(Stage::Completed),
            "failed" | "fail" | "f" => Ok(Stage::Failed),
            _ => Err(format!("Invalid stage: {}", s)),
        }
    }
}

/// Identifies one grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub task_id: String,
    pub month: Month,
    pub day: u8,
}

impl CellKey {
    pub fn new(task_id: impl Into<String>, month: Month, day: u8) -> Self {
        Self {
            task_id: task_id.into(),
            month,
            day,
        }
    }

    pub fn is_valid_day(&self) -> bool {
        self.month.contains_day(self.day)
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}-{}", self.task_id, self.month.short_name(), self.day)
    }
}

/// Serialized form of one cell store entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRecord {
    pub task_id: String,
    pub month: Month,
    pub day: u8,
    pub stage: Stage,
}

impl CellRecord {
    pub fn key(&self) -> CellKey {
        CellKey::new(self.task_id.clone(), self.month, self.day)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CellRefError {
    #[error("expected <month>-<day>, got '{0}'")]
    Malformed(String),
    #[error("unknown month '{0}'")]
    UnknownMonth(String),
    #[error("{month} has no day {day}")]
    DayOutOfRange { month: Month, day: u32 },
}

/// A `(month, day)` position typed by a user, e.g. `Jan-3` or `march-14`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub month: Month,
    pub day: u8,
}

impl CellRef {
    pub fn for_task(self, task_id: impl Into<String>) -> CellKey {
        CellKey::new(task_id, self.month, self.day)
    }
}

impl FromStr for CellRef {
    type Err = CellRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (month_part, day_part) = s
            .trim()
            .split_once(['-', '/', ' '])
            .ok_or_else(|| CellRefError::Malformed(s.to_string()))?;
        let month: Month = month_part
            .parse()
            .map_err(|_| CellRefError::UnknownMonth(month_part.to_string()))?;
        let day: u32 = day_part
            .trim()
            .parse()
            .map_err(|_| CellRefError::Malformed(s.to_string()))?;
        if day == 0 || day > month.day_count() as u32 {
            return Err(CellRefError::DayOutOfRange { month, day });
        }
        Ok(CellRef {
            month,
            day: day as u8,
        })
    }
}

/// Outcome classification of a prospective bulk stage assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkPreview {
    /// No record yet; one would be created
    pub create: Vec<CellKey>,
    /// A record with a different stage would be overwritten
    pub update: Vec<CellKey>,
    /// Already at the target stage
    pub unchanged: Vec<CellKey>,
}

impl BulkPreview {
    pub fn total(&self) -> usize {
        self.create.len() + self.update.len() + self.unchanged.len()
    }

    pub fn changes(&self) -> usize {
        self.create.len() + self.update.len()
    }
}

/// Sparse mapping from cell to stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellStore {
    cells: HashMap<CellKey, Stage>,
}

impl CellStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from serialized records. Later records win over earlier
    /// ones for the same key; records pointing at a day the month does not
    /// have are dropped.
    pub fn from_records(records: impl IntoIterator<Item = CellRecord>) -> Self {
        let mut cells = HashMap::new();
        for record in records {
            let key = record.key();
            if key.is_valid_day() {
                cells.insert(key, record.stage);
            }
        }
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get_stage(&self, key: &CellKey) -> Option<Stage> {
        self.cells.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CellKey, Stage)> {
        self.cells.iter().map(|(k, s)| (k, *s))
    }

    /// Assign `stage` to every key, or delete their records when `stage` is
    /// None. Returns how many records actually changed.
    pub fn set_stage<'a>(
        &mut self,
        keys: impl IntoIterator<Item = &'a CellKey>,
        stage: Option<Stage>,
    ) -> usize {
        let mut changed = 0;
        for key in keys {
            match stage {
                None => {
                    if self.cells.remove(key).is_some() {
                        changed += 1;
                    }
                }
                Some(stage) => {
                    if self.cells.insert(key.clone(), stage) != Some(stage) {
                        changed += 1;
                    }
                }
            }
        }
        changed
    }

    /// Remove every record belonging to `task_id`. Returns the number removed.
    pub fn delete_for_task(&mut self, task_id: &str) -> usize {
        let before = self.cells.len();
        self.cells.retain(|key, _| key.task_id != task_id);
        before - self.cells.len()
    }

    /// Classify what `set_stage(keys, Some(stage))` would do, without mutating.
    pub fn bulk_preview<'a>(
        &self,
        keys: impl IntoIterator<Item = &'a CellKey>,
        stage: Stage,
    ) -> BulkPreview {
        let mut preview = BulkPreview::default();
        for key in keys {
            match self.cells.get(key) {
                None => preview.create.push(key.clone()),
                Some(existing) if *existing == stage => preview.unchanged.push(key.clone()),
                Some(_) => preview.update.push(key.clone()),
            }
        }
        preview
    }

    /// Snapshot as records, sorted by task id, month and day.
    pub fn records(&self) -> Vec<CellRecord> {
        let mut records: Vec<CellRecord> = self
            .cells
            .iter()
            .map(|(key, stage)| CellRecord {
                task_id: key.task_id.clone(),
                month: key.month,
                day: key.day,
                stage: *stage,
            })
            .collect();
        records.sort_by(|a, b| {
            (&a.task_id, a.month, a.day).cmp(&(&b.task_id, b.month, b.day))
        });
        records
    }

    /// Count of records per stage for one task.
    pub fn count_for_task(&self, task_id: &str, stage: Stage) -> usize {
        self.cells
            .iter()
            .filter(|(k, s)| k.task_id == task_id && **s == stage)
            .count()
    }
}
