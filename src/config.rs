use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::calendar::Calendar;
use crate::utils::paths::{get_config_path, get_default_export_dir};

pub const MIN_CELL_WIDTH: u16 = 2;
pub const MAX_CELL_WIDTH: u16 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Year used for weekend shading and weekday filters. Unset means the
    /// current year at startup.
    #[serde(default)]
    pub reference_year: Option<i32>,

    /// Start with the starter task list when nothing is stored yet
    #[serde(default = "default_seed_tasks")]
    pub seed_tasks: bool,

    #[serde(default)]
    pub export_dir: Option<PathBuf>,

    /// Terminal columns per day in the grid
    #[serde(default = "default_cell_width")]
    pub cell_width: u16,
}

fn default_theme() -> String {
    "default".to_string()
}

fn default_seed_tasks() -> bool {
    true
}

fn default_cell_width() -> u16 {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            reference_year: None,
            seed_tasks: default_seed_tasks(),
            export_dir: None,
            cell_width: default_cell_width(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        config.cell_width = config.cell_width.clamp(MIN_CELL_WIDTH, MAX_CELL_WIDTH);

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content)?;

        Ok(())
    }

    pub fn calendar(&self) -> Calendar {
        match self.reference_year {
            Some(year) => Calendar::new(year),
            None => Calendar::current(),
        }
    }

    pub fn export_dir(&self) -> Result<PathBuf> {
        match &self.export_dir {
            Some(dir) => Ok(dir.clone()),
            None => get_default_export_dir(),
        }
    }
}
