//! JSON and CSV exports of the timeline.

use crate::calendar::Month;
use crate::timeline::{CellKey, CellRecord, CellStore, Task, TaskList, DEFAULT_HEADER_TEXT};
use crate::utils::paths::{csv_export_file_name, json_export_file_name};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn next(self) -> ExportFormat {
        match self {
            ExportFormat::Json => ExportFormat::Csv,
            ExportFormat::Csv => ExportFormat::Json,
        }
    }

    pub fn file_name(self, date: NaiveDate) -> String {
        match self {
            ExportFormat::Json => json_export_file_name(date),
            ExportFormat::Csv => csv_export_file_name(date),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "JSON"),
            ExportFormat::Csv => write!(f, "CSV"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(format!("Invalid export format: {}", s)),
        }
    }
}

/// Which tasks and months to include. An empty set means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportFilter {
    pub tasks: BTreeSet<String>,
    pub months: BTreeSet<Month>,
}

impl ExportFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn includes_task(&self, task_id: &str) -> bool {
        self.tasks.is_empty() || self.tasks.contains(task_id)
    }

    pub fn includes_month(&self, month: Month) -> bool {
        self.months.is_empty() || self.months.contains(&month)
    }

    pub fn toggle_task(&mut self, task_id: &str) {
        if !self.tasks.remove(task_id) {
            self.tasks.insert(task_id.to_string());
        }
    }

    pub fn toggle_month(&mut self, month: Month) {
        if !self.months.remove(&month) {
            self.months.insert(month);
        }
    }

    fn months(&self) -> Vec<Month> {
        Month::ALL
            .into_iter()
            .filter(|m| self.includes_month(*m))
            .collect()
    }
}

/// Document shape of a JSON export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub tasks: Vec<Task>,
    pub cell_data: Vec<CellRecord>,
}

pub fn build_document(tasks: &TaskList, cells: &CellStore, filter: &ExportFilter) -> ExportDocument {
    ExportDocument {
        tasks: tasks
            .iter()
            .filter(|t| filter.includes_task(&t.id))
            .cloned()
            .collect(),
        cell_data: cells
            .records()
            .into_iter()
            .filter(|r| filter.includes_task(&r.task_id) && filter.includes_month(r.month))
            .collect(),
    }
}

/// Pretty-printed JSON with 2-space indentation.
pub fn to_json(tasks: &TaskList, cells: &CellStore, filter: &ExportFilter) -> Result<String> {
    let document = build_document(tasks, cells, filter);
    serde_json::to_string_pretty(&document).context("Failed to serialize export")
}

pub fn parse_json(content: &str) -> Result<ExportDocument> {
    serde_json::from_str(content).context("Failed to parse export")
}

/// Grid-shaped CSV: two header rows (month names, then day numbers) and one
/// row per task with a P/X/F marker per day.
pub fn to_csv(tasks: &TaskList, cells: &CellStore, filter: &ExportFilter) -> String {
    let months = filter.months();
    let mut out = String::new();

    out.push_str(DEFAULT_HEADER_TEXT);
    out.push_str(",,,Status");
    for month in &months {
        out.push(',');
        out.push_str(month.name());
        for _ in 1..month.day_count() {
            out.push(',');
        }
    }
    out.push('\n');

    let days: Vec<String> = months
        .iter()
        .flat_map(|m| (1..=m.day_count()).map(|d| d.to_string()))
        .collect();
    out.push_str(",,,,");
    out.push_str(&days.join(","));
    out.push('\n');

    for task in tasks.iter().filter(|t| filter.includes_task(&t.id)) {
        out.push_str(&csv_field(&task.name));
        out.push_str(",,,");
        out.push_str(task.status.label());
        for month in &months {
            for day in 1..=month.day_count() {
                out.push(',');
                let key = CellKey::new(task.id.clone(), *month, day);
                if let Some(stage) = cells.get_stage(&key) {
                    out.push(stage.marker());
                }
            }
        }
        out.push('\n');
    }

    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn render(
    format: ExportFormat,
    tasks: &TaskList,
    cells: &CellStore,
    filter: &ExportFilter,
) -> Result<String> {
    match format {
        ExportFormat::Json => to_json(tasks, cells, filter),
        ExportFormat::Csv => Ok(to_csv(tasks, cells, filter)),
    }
}

/// Write `content` into `dir` under the default file name for `format`.
pub fn write_to_dir(dir: &Path, format: ExportFormat, date: NaiveDate, content: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;
    let path = dir.join(format.file_name(date));
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), %format, "export written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::{Stage, TaskStatus};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn data() -> (TaskList, CellStore) {
        let tasks = TaskList::new(vec![
            Task::with_status("1", "AWS", TaskStatus::InProgress),
            Task::with_status("2", "Thai, spoken", TaskStatus::NotStarted),
        ]);
        let mut cells = CellStore::new();
        cells.set_stage([&CellKey::new("1", Month::January, 2)], Some(Stage::Completed));
        cells.set_stage([&CellKey::new("1", Month::February, 1)], Some(Stage::Planning));
        cells.set_stage([&CellKey::new("2", Month::January, 31)], Some(Stage::Failed));
        (tasks, cells)
    }

    #[test]
    fn test_json_roundtrip() {
        let (tasks, cells) = data();
        let json = to_json(&tasks, &cells, &ExportFilter::all()).unwrap();
        assert!(json.contains("\n  \"tasks\""));
        assert!(json.contains("\"cellData\""));

        let document = parse_json(&json).unwrap();
        assert_eq!(document.tasks, tasks.as_slice().to_vec());
        assert_eq!(CellStore::from_records(document.cell_data), cells);
    }

    #[test]
    fn test_json_filter_by_task_and_month() {
        let (tasks, cells) = data();
        let mut filter = ExportFilter::all();
        filter.toggle_task("1");
        filter.toggle_month(Month::January);

        let document = build_document(&tasks, &cells, &filter);
        assert_eq!(document.tasks.len(), 1);
        assert_eq!(document.cell_data.len(), 1);
        assert_eq!(document.cell_data[0].day, 2);
    }

    #[test]
    fn test_csv_layout_single_month() {
        let (tasks, cells) = data();
        let mut filter = ExportFilter::all();
        filter.toggle_month(Month::January);

        let csv = to_csv(&tasks, &cells, &filter);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);

        assert_eq!(lines[0], format!("Skills To Learn,,,Status,January{}", ",".repeat(30)));
        let days: Vec<String> = (1..=31).map(|d| d.to_string()).collect();
        assert_eq!(lines[1], format!(",,,,{}", days.join(",")));

        let aws: Vec<&str> = lines[2].split(',').collect();
        assert_eq!(aws.len(), 4 + 31);
        assert_eq!(&aws[..4], &["AWS", "", "", "In progress"]);
        assert_eq!(aws[4], "");
        assert_eq!(aws[5], "X");

        assert!(lines[3].starts_with("\"Thai, spoken\",,,Not started"));
        assert!(lines[3].ends_with(",F"));
    }

    #[test]
    fn test_csv_all_months_width() {
        let (tasks, cells) = data();
        let csv = to_csv(&tasks, &cells, &ExportFilter::all());
        let header_fields = csv.lines().next().unwrap().split(',').count();
        assert_eq!(header_fields, 4 + 365);
    }

    #[test]
    fn test_write_to_dir() {
        let temp_dir = TempDir::new().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let path = write_to_dir(temp_dir.path(), ExportFormat::Csv, date, "a,b\n").unwrap();
        assert!(path.ends_with("Task_Timeline_Export - 2025-06-01.csv"));
        assert_eq!(fs::read_to_string(path).unwrap(), "a,b\n");
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("CSV".parse::<ExportFormat>(), Ok(ExportFormat::Csv));
        assert!("xml".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Json.next(), ExportFormat::Csv);
    }
}
