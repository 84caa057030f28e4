use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub fn get_data_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
    Ok(home.join(".skill-timeline"))
}

pub fn get_config_path() -> Result<PathBuf> {
    let data_dir = get_data_dir()?;
    Ok(data_dir.join("config.toml"))
}

pub fn get_database_path() -> Result<PathBuf> {
    let data_dir = get_data_dir()?;
    Ok(data_dir.join("timeline.db"))
}

pub fn get_logs_dir() -> Result<PathBuf> {
    let data_dir = get_data_dir()?;
    Ok(data_dir.join("logs"))
}

pub fn get_crash_log_path() -> Result<PathBuf> {
    let data_dir = get_data_dir()?;
    Ok(data_dir.join("crash.log"))
}

pub fn get_default_export_dir() -> Result<PathBuf> {
    let data_dir = get_data_dir()?;
    Ok(data_dir.join("exports"))
}

/// Fallback target when the system clipboard is unavailable
pub fn get_yank_file_path() -> Result<PathBuf> {
    let data_dir = get_data_dir()?;
    Ok(data_dir.join("yank.txt"))
}

pub fn json_export_file_name(date: NaiveDate) -> String {
    format!("task-timeline-export-{}.json", date.format("%Y-%m-%d"))
}

pub fn csv_export_file_name(date: NaiveDate) -> String {
    format!("Task_Timeline_Export - {}.csv", date.format("%Y-%m-%d"))
}

pub fn ensure_data_dir_exists() -> Result<()> {
    let data_dir = get_data_dir()?;

    if !data_dir.exists() {
        fs::create_dir_all(&data_dir)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_data_dir() {
        let dir = get_data_dir().unwrap();
        assert!(dir.to_string_lossy().ends_with(".skill-timeline"));
    }

    #[test]
    fn test_get_config_path() {
        let path = get_config_path().unwrap();
        assert!(path.to_string_lossy().contains(".skill-timeline"));
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn test_get_database_path() {
        let path = get_database_path().unwrap();
        assert!(path.to_string_lossy().contains(".skill-timeline"));
        assert!(path.to_string_lossy().ends_with("timeline.db"));
    }

    #[test]
    fn test_get_logs_and_crash_paths() {
        assert!(get_logs_dir().unwrap().to_string_lossy().ends_with("logs"));
        assert!(get_crash_log_path().unwrap().to_string_lossy().ends_with("crash.log"));
    }

    #[test]
    fn test_export_file_names() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(json_export_file_name(date), "task-timeline-export-2025-03-09.json");
        assert_eq!(csv_export_file_name(date), "Task_Timeline_Export - 2025-03-09.csv");
    }
}
