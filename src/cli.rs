use clap::{Parser, Subcommand};
use skill_timeline::calendar::Month;
use skill_timeline::export::ExportFormat;
use skill_timeline::timeline::{CellRef, DayFilter, Stage, TaskStatus};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "skilltl")]
#[command(about = "Track skills day by day on a yearly timeline grid", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a task
    Add { name: String },
    /// List tasks with their stage counts
    List,
    /// Set a task's status (not started, in progress, completed, failed)
    Status { task: String, status: TaskStatus },
    /// Delete a task and all of its cells
    Delete {
        task: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Tag a cell, or a rectangular range of cells, with a stage
    Mark {
        task: String,
        /// Start cell, e.g. Jan-3
        from: CellRef,
        stage: Stage,
        /// End cell of a range
        #[arg(long)]
        to: Option<CellRef>,
        /// Task at the other corner of a range
        #[arg(long)]
        to_task: Option<String>,
    },
    /// Remove the stage of a cell or a range of cells
    Clear {
        task: String,
        from: CellRef,
        #[arg(long)]
        to: Option<CellRef>,
        #[arg(long)]
        to_task: Option<String>,
    },
    /// Tag every matching day of the chosen months for one task
    Quick {
        task: String,
        stage: Stage,
        /// Month to include; repeat for several
        #[arg(short, long = "month", required = true)]
        months: Vec<Month>,
        #[arg(short, long, default_value = "all")]
        filter: DayFilter,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Export tasks and cells as JSON or CSV
    Export {
        #[arg(short, long, default_value = "json")]
        format: ExportFormat,
        /// Only include this task; repeat for several
        #[arg(short, long = "task")]
        tasks: Vec<String>,
        /// Only include this month; repeat for several
        #[arg(short, long = "month")]
        months: Vec<Month>,
        /// Output file; defaults to the export directory
        #[arg(short, long, conflicts_with = "stdout")]
        output: Option<PathBuf>,
        /// Print to stdout instead of writing a file
        #[arg(long)]
        stdout: bool,
    },
    /// Show completion statistics
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set the timeline title
    Title { text: String },
    /// Set the task column header
    Header { text: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mark_range() {
        let cli = Cli::try_parse_from([
            "skilltl", "mark", "AWS", "Jan-1", "completed", "--to", "Jan-3", "--to-task", "Thai",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Mark {
                task,
                from,
                stage,
                to,
                to_task,
            }) => {
                assert_eq!(task, "AWS");
                assert_eq!(from.month, Month::January);
                assert_eq!(stage, Stage::Completed);
                assert_eq!(to.map(|c| c.day), Some(3));
                assert_eq!(to_task.as_deref(), Some("Thai"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_quick_requires_month() {
        assert!(Cli::try_parse_from(["skilltl", "quick", "AWS", "planning"]).is_err());
        let cli = Cli::try_parse_from([
            "skilltl", "quick", "AWS", "planning", "-m", "feb", "-m", "March", "--filter", "weekends",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Quick { months, filter, yes, .. }) => {
                assert_eq!(months, vec![Month::February, Month::March]);
                assert_eq!(filter, DayFilter::Weekends);
                assert!(!yes);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_bad_cell() {
        assert!(Cli::try_parse_from(["skilltl", "clear", "AWS", "Feb-30"]).is_err());
    }

    #[test]
    fn test_no_subcommand_starts_tui() {
        let cli = Cli::try_parse_from(["skilltl"]).unwrap();
        assert!(cli.command.is_none());
    }
}
