use super::cell::{BulkPreview, CellKey, CellStore, Stage};
use super::task::TaskList;
use crate::calendar::{Calendar, Month};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayFilter {
    #[default]
    All,
    Weekdays,
    Weekends,
}

impl DayFilter {
    pub fn accepts(self, calendar: &Calendar, month: Month, day: u8) -> bool {
        match self {
            DayFilter::All => true,
            DayFilter::Weekdays => !calendar.is_weekend(month, day),
            DayFilter::Weekends => calendar.is_weekend(month, day),
        }
    }

    pub fn next(self) -> DayFilter {
        match self {
            DayFilter::All => DayFilter::Weekdays,
            DayFilter::Weekdays => DayFilter::Weekends,
            DayFilter::Weekends => DayFilter::All,
        }
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayFilter::All => write!(f, "All days"),
            DayFilter::Weekdays => write!(f, "Weekdays"),
            DayFilter::Weekends => write!(f, "Weekends"),
        }
    }
}

impl FromStr for DayFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(DayFilter::All),
            "weekdays" | "weekday" => Ok(DayFilter::Weekdays),
            "weekends" | "weekend" => Ok(DayFilter::Weekends),
            _ => Err(format!("Invalid day filter: {}", s)),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuickSelectError {
    #[error("choose at least one month")]
    NoMonths,
    #[error("task '{0}' does not exist")]
    UnknownTask(String),
    #[error("no days match {filter} in the chosen months")]
    NoMatchingDays { filter: DayFilter },
}

/// Rule-based bulk tagging: one task, a set of months, a day filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickSelect {
    pub task_id: String,
    pub months: BTreeSet<Month>,
    pub filter: DayFilter,
    pub stage: Stage,
}

impl QuickSelect {
    pub fn new(task_id: impl Into<String>, stage: Stage) -> Self {
        Self {
            task_id: task_id.into(),
            months: BTreeSet::new(),
            filter: DayFilter::All,
            stage,
        }
    }

    pub fn with_months(mut self, months: impl IntoIterator<Item = Month>) -> Self {
        self.months.extend(months);
        self
    }

    pub fn with_filter(mut self, filter: DayFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn toggle_month(&mut self, month: Month) {
        if !self.months.remove(&month) {
            self.months.insert(month);
        }
    }

    /// Cells of the chosen months that pass the day filter, in calendar order.
    pub fn candidates(&self, calendar: &Calendar) -> Vec<CellKey> {
        self.months
            .iter()
            .flat_map(|month| {
                (1..=month.day_count())
                    .filter(|day| self.filter.accepts(calendar, *month, *day))
                    .map(|day| CellKey::new(self.task_id.clone(), *month, day))
            })
            .collect()
    }

    /// Validate and compute what applying this rule would change.
    /// Nothing is mutated; commit the returned plan after confirmation.
    pub fn plan(
        &self,
        tasks: &TaskList,
        cells: &CellStore,
        calendar: &Calendar,
    ) -> Result<QuickSelectPlan, QuickSelectError> {
        if self.months.is_empty() {
            return Err(QuickSelectError::NoMonths);
        }
        if !tasks.contains(&self.task_id) {
            return Err(QuickSelectError::UnknownTask(self.task_id.clone()));
        }
        let keys = self.candidates(calendar);
        if keys.is_empty() {
            return Err(QuickSelectError::NoMatchingDays {
                filter: self.filter,
            });
        }
        let preview = cells.bulk_preview(&keys, self.stage);
        Ok(QuickSelectPlan {
            stage: self.stage,
            keys,
            preview,
        })
    }
}

/// A validated quick-select awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickSelectPlan {
    pub stage: Stage,
    pub keys: Vec<CellKey>,
    pub preview: BulkPreview,
}

impl QuickSelectPlan {
    pub fn summary(&self) -> String {
        format!(
            "{} day(s) to {}: {} new, {} changed, {} already set",
            self.keys.len(),
            self.stage,
            self.preview.create.len(),
            self.preview.update.len(),
            self.preview.unchanged.len()
        )
    }
}
