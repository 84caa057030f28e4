use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Navigate,
    StageMenu,
    Edit,
    ConfirmDelete,
    QuickSelect,
    ConfirmQuickSelect,
    Export,
    Analysis,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Navigate => write!(f, "NAVIGATE"),
            Mode::StageMenu => write!(f, "STAGE"),
            Mode::Edit => write!(f, "INSERT"),
            Mode::ConfirmDelete => write!(f, "CONFIRM"),
            Mode::QuickSelect => write!(f, "QUICK"),
            Mode::ConfirmQuickSelect => write!(f, "CONFIRM"),
            Mode::Export => write!(f, "EXPORT"),
            Mode::Analysis => write!(f, "ANALYSIS"),
        }
    }
}
