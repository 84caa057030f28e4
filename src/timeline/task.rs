use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Task-level lifecycle label, distinct from the per-cell stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "Not started")]
    NotStarted,
    #[serde(rename = "In progress")]
    InProgress,
    Completed,
    Failed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::NotStarted,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Failed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "Not started",
            TaskStatus::InProgress => "In progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::Failed => "Failed",
        }
    }

    /// Cycle: Not started -> In progress -> Completed -> Failed -> Not started
    pub fn next(self) -> TaskStatus {
        match self {
            TaskStatus::NotStarted => TaskStatus::InProgress,
            TaskStatus::InProgress => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Failed,
            TaskStatus::Failed => TaskStatus::NotStarted,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        match normalized.as_str() {
            "notstarted" | "todo" => Ok(TaskStatus::NotStarted),
            "inprogress" | "started" => Ok(TaskStatus::InProgress),
            "completed" | "done" => Ok(TaskStatus::Completed),
            "failed" => Ok(TaskStatus::Failed),
            _ => Err(format!("Invalid status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub status: TaskStatus,
}

impl Task {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            status: TaskStatus::NotStarted,
        }
    }

    pub fn with_status(id: impl Into<String>, name: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status,
        }
    }
}

/// Ordered task list. The ordering is the row axis of the timeline grid
/// and the task axis of range selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// The starter list shown on a first run.
    pub fn seeded() -> Self {
        let seed = [
            ("1", "AWS Learning", TaskStatus::InProgress),
            ("2", "NodeJS Review & Testing", TaskStatus::NotStarted),
            ("3", "Typescript", TaskStatus::NotStarted),
            ("4", "NextJS", TaskStatus::NotStarted),
            ("5", "ReactJS", TaskStatus::NotStarted),
            ("6", "Improving English", TaskStatus::InProgress),
            ("7", "Learning Thai", TaskStatus::InProgress),
            ("8", "Learning German", TaskStatus::InProgress),
        ];
        Self::new(
            seed.into_iter()
                .map(|(id, name, status)| Task::with_status(id, name, status))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn find(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Resolve a user-supplied reference: exact id first, then a
    /// case-insensitive name match.
    pub fn resolve(&self, reference: &str) -> Option<&Task> {
        let reference = reference.trim();
        self.find(reference).or_else(|| {
            self.tasks
                .iter()
                .find(|t| t.name.eq_ignore_ascii_case(reference))
        })
    }

    /// Append a task. Blank names are rejected.
    pub fn add(&mut self, name: &str) -> Option<&Task> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        self.tasks.push(Task::new(name));
        self.tasks.last()
    }

    pub fn remove(&mut self, id: &str) -> Option<Task> {
        let index = self.position(id)?;
        Some(self.tasks.remove(index))
    }

    pub fn set_status(&mut self, id: &str, status: TaskStatus) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.status = status;
                true
            }
            None => false,
        }
    }

    pub fn cycle_status(&mut self, id: &str) -> Option<TaskStatus> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.status = task.status.next();
        Some(task.status)
    }

    pub fn into_vec(self) -> Vec<Task> {
        self.tasks
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        assert_eq!(format!("{}", TaskStatus::NotStarted), "Not started");
        assert_eq!(format!("{}", TaskStatus::InProgress), "In progress");
        assert_eq!(format!("{}", TaskStatus::Completed), "Completed");
        assert_eq!(format!("{}", TaskStatus::Failed), "Failed");
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("Not started".parse::<TaskStatus>().unwrap(), TaskStatus::NotStarted);
        assert_eq!("in-progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert_eq!("DONE".parse::<TaskStatus>().unwrap(), TaskStatus::Completed);
        assert_eq!("failed".parse::<TaskStatus>().unwrap(), TaskStatus::Failed);
        assert!("maybe".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_status_serde_uses_labels() {
        let task = Task::with_status("7", "Learning Thai", TaskStatus::InProgress);
        let json = serde_json::to_string(&task).unwrap();
        assert_eq!(json, r#"{"id":"7","name":"Learning Thai","status":"In progress"}"#);
        let parsed: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, task);
    }

    #[test]
    fn test_cycle_status_wraps() {
        let mut status = TaskStatus::NotStarted;
        for _ in 0..4 {
            status = status.next();
        }
        assert_eq!(status, TaskStatus::NotStarted);
    }

    #[test]
    fn test_add_rejects_blank_names() {
        let mut list = TaskList::default();
        assert!(list.add("   ").is_none());
        let task = list.add("  Rust  ").unwrap();
        assert_eq!(task.name, "Rust");
        assert_eq!(task.status, TaskStatus::NotStarted);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_added_ids_are_unique() {
        let mut list = TaskList::default();
        let a = list.add("A").unwrap().id.clone();
        let b = list.add("B").unwrap().id.clone();
        assert_ne!(a, b);
    }

    #[test]
    fn test_resolve_by_id_or_name() {
        let list = TaskList::seeded();
        assert_eq!(list.resolve("3").unwrap().name, "Typescript");
        assert_eq!(list.resolve("learning thai").unwrap().id, "7");
        assert!(list.resolve("COBOL").is_none());
    }

    #[test]
    fn test_remove_and_status() {
        let mut list = TaskList::seeded();
        assert!(list.set_status("2", TaskStatus::Failed));
        assert_eq!(list.find("2").unwrap().status, TaskStatus::Failed);
        assert!(!list.set_status("missing", TaskStatus::Failed));

        let removed = list.remove("2").unwrap();
        assert_eq!(removed.name, "NodeJS Review & Testing");
        assert_eq!(list.len(), 7);
        assert_eq!(list.position("3"), Some(1));
    }
}
