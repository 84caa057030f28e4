mod app;
mod cli;
mod ui;

use skill_timeline::analysis::Analysis;
use skill_timeline::calendar::Month;
use skill_timeline::config::Config;
use skill_timeline::export::{self, ExportFilter, ExportFormat};
use skill_timeline::storage;
use skill_timeline::timeline::{selection, CellKey, CellRef, QuickSelect, Stage, Task, Timeline};
use skill_timeline::utils::paths::{ensure_data_dir_exists, get_crash_log_path, get_logs_dir};

use anyhow::{anyhow, bail, Result};
use chrono::Local;
use clap::Parser;
use cli::{Cli, Commands};
use std::fs;
use std::io::Write;
use std::panic;
use std::path::PathBuf;
use ui::theme::Theme;

fn install_crash_handler() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        if let Ok(crash_log_path) = get_crash_log_path() {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
            let mut crash_report = format!("=== CRASH at {} ===\n", timestamp);

            if let Some(message) = panic_info.payload().downcast_ref::<&str>() {
                crash_report.push_str(&format!("Message: {}\n", message));
            } else if let Some(message) = panic_info.payload().downcast_ref::<String>() {
                crash_report.push_str(&format!("Message: {}\n", message));
            }

            if let Some(location) = panic_info.location() {
                crash_report.push_str(&format!(
                    "Location: {}:{}:{}\n",
                    location.file(),
                    location.line(),
                    location.column()
                ));
            }

            crash_report.push_str(&format!(
                "\nBacktrace:\n{}\n",
                std::backtrace::Backtrace::force_capture()
            ));
            crash_report.push('\n');

            if let Ok(mut file) = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&crash_log_path)
            {
                let _ = file.write_all(crash_report.as_bytes());
                eprintln!("\nCrash logged to: {}", crash_log_path.display());
            }
        }

        default_hook(panic_info);
    }));
}

/// Initialize file-based logging for the TUI.
///
/// Logs are written to ~/.skill-timeline/logs/skilltl.log, rolled daily.
/// Log level can be controlled with RUST_LOG env var (default: info).
fn init_file_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let logs_dir = get_logs_dir().ok()?;

    if let Err(e) = fs::create_dir_all(&logs_dir) {
        eprintln!("Warning: Could not create logs directory: {}", e);
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "skilltl.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    Some(guard)
}

/// Subcommands only surface warnings, on stderr.
fn init_cli_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    install_crash_handler();

    let cli = Cli::parse();
    let config = Config::load()?;
    ensure_data_dir_exists()?;

    let Some(command) = cli.command else {
        // Guard must be kept alive for the duration of the app
        let _log_guard = init_file_logging();
        tracing::info!("skilltl starting");

        let persistence = storage::open_default(config.seed_tasks)?;
        let timeline = persistence.load_timeline(config.calendar());
        let theme = Theme::from_config(&config);
        let state = app::AppState::new(timeline, persistence, theme, &config)?;

        ui::run_tui(state)?;

        tracing::info!("skilltl exiting gracefully");
        return Ok(());
    };

    init_cli_logging();
    let mut persistence = storage::open_default(config.seed_tasks)?;
    let mut timeline = persistence.load_timeline(config.calendar());

    match command {
        Commands::Add { name } => handle_add(&mut timeline, &name)?,
        Commands::List => handle_list(&timeline),
        Commands::Status { task, status } => {
            let task = resolve_task(&timeline, &task)?;
            timeline.set_task_status(&task.id, status);
            println!("✓ {} is now {}", task.name, status);
        }
        Commands::Delete { task, yes } => handle_delete(&mut timeline, &task, yes)?,
        Commands::Mark {
            task,
            from,
            stage,
            to,
            to_task,
        } => handle_mark(&mut timeline, &task, from, to, to_task.as_deref(), Some(stage))?,
        Commands::Clear {
            task,
            from,
            to,
            to_task,
        } => handle_mark(&mut timeline, &task, from, to, to_task.as_deref(), None)?,
        Commands::Quick {
            task,
            stage,
            months,
            filter,
            yes,
        } => {
            let task = resolve_task(&timeline, &task)?;
            let rule = QuickSelect::new(task.id, stage)
                .with_months(months)
                .with_filter(filter);
            handle_quick(&mut timeline, &rule, yes)?
        }
        Commands::Export {
            format,
            tasks,
            months,
            output,
            stdout,
        } => handle_export(&timeline, &config, format, &tasks, months, output, stdout)?,
        Commands::Stats { json } => handle_stats(&timeline, json)?,
        Commands::Title { text } => {
            timeline.set_title(text.trim());
            println!("✓ Title set to \"{}\"", timeline.title());
        }
        Commands::Header { text } => {
            timeline.set_header_text(text.trim());
            println!("✓ Header set to \"{}\"", timeline.header_text());
        }
    }

    persistence.save_pending(&mut timeline)
}

fn resolve_task(timeline: &Timeline, reference: &str) -> Result<Task> {
    timeline
        .tasks()
        .resolve(reference)
        .cloned()
        .ok_or_else(|| anyhow!("No task matches '{}'", reference))
}

fn handle_add(timeline: &mut Timeline, name: &str) -> Result<()> {
    let task = timeline
        .add_task(name)
        .ok_or_else(|| anyhow!("Task name cannot be empty"))?;
    println!("✓ Task added: {} ({})", task.name, task.id);
    Ok(())
}

fn handle_list(timeline: &Timeline) {
    if timeline.tasks().is_empty() {
        println!("No tasks yet. Add one with `skilltl add <name>`.");
        return;
    }

    println!("\n{} - {}\n", timeline.title(), timeline.header_text());
    for (idx, task) in timeline.tasks().iter().enumerate() {
        let cells = timeline.cells();
        println!(
            "{:>2}. {:<32} {:<12} P:{:<3} X:{:<3} F:{:<3} [{}]",
            idx + 1,
            task.name,
            task.status.label(),
            cells.count_for_task(&task.id, Stage::Planning),
            cells.count_for_task(&task.id, Stage::Completed),
            cells.count_for_task(&task.id, Stage::Failed),
            task.id
        );
    }
    println!();
}

fn handle_delete(timeline: &mut Timeline, reference: &str, yes: bool) -> Result<()> {
    use dialoguer::Confirm;

    let task = resolve_task(timeline, reference)?;
    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete '{}' and all of its cells?", task.name))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    if let Some(task) = timeline.delete_task(&task.id) {
        println!("✓ Deleted {}", task.name);
    }
    Ok(())
}

fn handle_mark(
    timeline: &mut Timeline,
    task: &str,
    from: CellRef,
    to: Option<CellRef>,
    to_task: Option<&str>,
    stage: Option<Stage>,
) -> Result<()> {
    let start_task = resolve_task(timeline, task)?;
    let end_task = match to_task {
        Some(reference) => resolve_task(timeline, reference)?,
        None => start_task.clone(),
    };

    let start = from.for_task(start_task.id);
    let end: CellKey = to.unwrap_or(from).for_task(end_task.id);
    let keys = selection::range(&start, &end, timeline.tasks())
        .ok_or_else(|| anyhow!("Range endpoints reference unknown tasks"))?;

    let changed = timeline.set_stage(&keys, stage);
    match stage {
        Some(stage) => println!("✓ {} of {} cell(s) set to {}", changed, keys.len(), stage),
        None => println!("✓ {} of {} cell(s) cleared", changed, keys.len()),
    }
    Ok(())
}

fn handle_quick(timeline: &mut Timeline, rule: &QuickSelect, yes: bool) -> Result<()> {
    use dialoguer::Confirm;

    let plan = timeline.plan_quick_select(rule)?;
    println!("{}", plan.summary());

    if plan.preview.changes() == 0 {
        println!("Nothing to change.");
        return Ok(());
    }

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt("Apply?")
            .default(true)
            .interact()?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let changed = timeline.commit_quick_select(&plan);
    println!("✓ {} cell(s) updated", changed);
    Ok(())
}

fn handle_export(
    timeline: &Timeline,
    config: &Config,
    format: ExportFormat,
    tasks: &[String],
    months: Vec<Month>,
    output: Option<PathBuf>,
    stdout: bool,
) -> Result<()> {
    let mut filter = ExportFilter::all();
    for reference in tasks {
        filter.tasks.insert(resolve_task(timeline, reference)?.id);
    }
    filter.months.extend(months);

    let content = export::render(format, timeline.tasks(), timeline.cells(), &filter)?;

    if stdout {
        print!("{}", content);
        return Ok(());
    }

    let path = match output {
        Some(path) => {
            if path.is_dir() {
                bail!("{} is a directory; omit --output to use the default file name", path.display());
            }
            fs::write(&path, &content)?;
            path
        }
        None => export::write_to_dir(&config.export_dir()?, format, Local::now().date_naive(), &content)?,
    };
    println!("✓ {} export written to {}", format, path.display());
    Ok(())
}

fn handle_stats(timeline: &Timeline, json: bool) -> Result<()> {
    let analysis = Analysis::compute(timeline.tasks(), timeline.cells());

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!("\n📊 {}\n", timeline.title());
    for stat in &analysis.tasks {
        println!(
            "{:<32} total {:>3}  completed {:>5.1}%  failed {:>5.1}%",
            stat.task_name,
            stat.counts.total(),
            stat.completion_rate,
            stat.failure_rate
        );
    }

    println!();
    for month in analysis.months.iter().filter(|m| m.counts.total() > 0) {
        println!(
            "{:<10} P:{:<3} X:{:<3} F:{:<3}",
            month.month.name(),
            month.counts.planning,
            month.counts.completed,
            month.counts.failed
        );
    }

    let overall = &analysis.overall;
    println!(
        "\nOverall: {:.1}% planning, {:.1}% completed, {:.1}% failed ({} cells)\n",
        overall.percent(Stage::Planning),
        overall.percent(Stage::Completed),
        overall.percent(Stage::Failed),
        overall.total()
    );
    Ok(())
}
