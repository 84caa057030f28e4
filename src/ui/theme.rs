use ratatui::style::Color;
use skill_timeline::config::Config;
use skill_timeline::timeline::{Stage, TaskStatus};

#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub weekend_bg: Color,
    pub today: Color,
    pub cursor: Color,
    pub selection_bg: Color,
    pub planning: Color,
    pub completed: Color,
    pub failed: Color,
    pub in_progress: Color,
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
}

impl Theme {
    pub fn default_theme() -> Self {
        Self {
            background: Color::Reset,
            foreground: Color::White,
            muted: Color::DarkGray,
            weekend_bg: Color::Rgb(30, 30, 38),
            today: Color::Yellow,
            cursor: Color::Rgb(255, 200, 100),
            selection_bg: Color::Rgb(70, 70, 120),
            planning: Color::Rgb(61, 126, 184),
            completed: Color::Rgb(50, 138, 73),
            failed: Color::Rgb(123, 87, 80),
            in_progress: Color::Cyan,
            status_bar_bg: Color::Rgb(40, 40, 40),
            status_bar_fg: Color::White,
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color::Black,
            weekend_bg: Color::Rgb(22, 22, 22),
            ..Self::default_theme()
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::White,
            foreground: Color::Black,
            muted: Color::Gray,
            weekend_bg: Color::Rgb(232, 232, 240),
            today: Color::Rgb(180, 130, 0),
            cursor: Color::Rgb(200, 90, 0),
            selection_bg: Color::Rgb(190, 200, 255),
            planning: Color::Rgb(61, 126, 184),
            completed: Color::Rgb(50, 138, 73),
            failed: Color::Rgb(160, 80, 70),
            in_progress: Color::Blue,
            status_bar_bg: Color::LightBlue,
            status_bar_fg: Color::Black,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        match config.theme.as_str() {
            "dark" => Self::dark(),
            "light" => Self::light(),
            _ => Self::default_theme(),
        }
    }

    pub fn stage_color(&self, stage: Stage) -> Color {
        match stage {
            Stage::Planning => self.planning,
            Stage::Completed => self.completed,
            Stage::Failed => self.failed,
        }
    }

    pub fn status_color(&self, status: TaskStatus) -> Color {
        match status {
            TaskStatus::NotStarted => self.muted,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Completed => self.completed,
            TaskStatus::Failed => self.failed,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}
