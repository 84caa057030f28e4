//! Read-only statistics over tasks and cell stages.

use crate::calendar::Month;
use crate::timeline::{CellStore, Stage, TaskList};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageCounts {
    pub planning: usize,
    pub completed: usize,
    pub failed: usize,
}

impl StageCounts {
    pub fn total(&self) -> usize {
        self.planning + self.completed + self.failed
    }

    pub fn get(&self, stage: Stage) -> usize {
        match stage {
            Stage::Planning => self.planning,
            Stage::Completed => self.completed,
            Stage::Failed => self.failed,
        }
    }

    fn add(&mut self, stage: Stage) {
        match stage {
            Stage::Planning => self.planning += 1,
            Stage::Completed => self.completed += 1,
            Stage::Failed => self.failed += 1,
        }
    }

    /// Share of `stage` among tagged cells, in percent. Zero when nothing is tagged.
    pub fn percent(&self, stage: Stage) -> f64 {
        percent(self.get(stage), self.total())
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub task_id: String,
    pub task_name: String,
    pub counts: StageCounts,
    pub completion_rate: f64,
    pub failure_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthStats {
    pub month: Month,
    pub counts: StageCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub tasks: Vec<TaskStats>,
    pub months: Vec<MonthStats>,
    pub overall: StageCounts,
}

impl Analysis {
    pub fn compute(tasks: &TaskList, cells: &CellStore) -> Self {
        let mut per_task = vec![StageCounts::default(); tasks.len()];
        let mut per_month = [StageCounts::default(); 12];
        let mut overall = StageCounts::default();

        for (key, stage) in cells.iter() {
            // Records of unknown tasks count for nobody
            let Some(row) = tasks.position(&key.task_id) else {
                continue;
            };
            per_task[row].add(stage);
            per_month[key.month.index()].add(stage);
            overall.add(stage);
        }

        let tasks = tasks
            .iter()
            .zip(per_task)
            .map(|(task, counts)| TaskStats {
                task_id: task.id.clone(),
                task_name: task.name.clone(),
                completion_rate: counts.percent(Stage::Completed),
                failure_rate: counts.percent(Stage::Failed),
                counts,
            })
            .collect();

        let months = Month::ALL
            .into_iter()
            .map(|month| MonthStats {
                month,
                counts: per_month[month.index()],
            })
            .collect();

        Self {
            tasks,
            months,
            overall,
        }
    }

    /// Largest per-task total, at least 1; used to scale bar charts.
    pub fn max_task_total(&self) -> usize {
        self.tasks
            .iter()
            .map(|t| t.counts.total())
            .max()
            .unwrap_or(0)
            .max(1)
    }
}
