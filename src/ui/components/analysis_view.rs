use super::centered_rect;
use crate::app::state::AnalysisView;
use crate::app::AppState;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use skill_timeline::analysis::StageCounts;
use skill_timeline::timeline::Stage;
use skill_timeline::utils::unicode::truncate_to_width;

const BAR_WIDTH: usize = 30;

/// Stacked bar of `counts`, scaled so `max` fills `width` columns.
fn stacked_bar<'a>(state: &AppState, counts: &StageCounts, max: usize, width: usize) -> Vec<Span<'a>> {
    let mut spans = Vec::new();
    let mut used = 0;
    for stage in Stage::ALL {
        let len = counts.get(stage) * width / max.max(1);
        if len > 0 {
            spans.push(Span::styled(
                "█".repeat(len),
                Style::default().fg(state.theme.stage_color(stage)),
            ));
            used += len;
        }
    }
    spans.push(Span::raw(" ".repeat(width.saturating_sub(used))));
    spans
}

fn legend<'a>(state: &AppState) -> Line<'a> {
    let mut spans = vec![Span::raw("  ")];
    for stage in Stage::ALL {
        spans.push(Span::styled("█ ", Style::default().fg(state.theme.stage_color(stage))));
        spans.push(Span::raw(format!("{}   ", stage.label())));
    }
    Line::from(spans)
}

pub fn render(f: &mut Frame, state: &AppState) {
    let analysis = state.analysis();
    let heading = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let muted = Style::default().fg(state.theme.muted);

    let mut lines = vec![legend(state), Line::from("")];

    match state.analysis_view {
        AnalysisView::Tasks => {
            lines.push(Line::from(Span::styled("  Per task", heading)));
            let max = analysis.max_task_total();
            for stat in &analysis.tasks {
                let mut spans = vec![Span::raw(format!("  {:<20} ", truncate_to_width(&stat.task_name, 20)))];
                spans.extend(stacked_bar(state, &stat.counts, max, BAR_WIDTH));
                spans.push(Span::styled(
                    format!(
                        " {:>3}  {:>5.1}% done  {:>5.1}% failed",
                        stat.counts.total(),
                        stat.completion_rate,
                        stat.failure_rate
                    ),
                    muted,
                ));
                lines.push(Line::from(spans));
            }
            if analysis.tasks.is_empty() {
                lines.push(Line::from(Span::styled("  No tasks", muted)));
            }
        }
        AnalysisView::Months => {
            lines.push(Line::from(Span::styled("  Per month", heading)));
            let max = analysis
                .months
                .iter()
                .map(|m| m.counts.total())
                .max()
                .unwrap_or(0)
                .max(1);
            for stat in &analysis.months {
                let mut spans = vec![Span::raw(format!("  {:<10} ", stat.month.name()))];
                spans.extend(stacked_bar(state, &stat.counts, max, BAR_WIDTH));
                spans.push(Span::styled(format!(" {:>3}", stat.counts.total()), muted));
                lines.push(Line::from(spans));
            }
        }
        AnalysisView::Distribution => {
            lines.push(Line::from(Span::styled("  Stage distribution", heading)));
            let overall = &analysis.overall;
            for stage in Stage::ALL {
                let count = overall.get(stage);
                let len = count * BAR_WIDTH / overall.total().max(1);
                lines.push(Line::from(vec![
                    Span::raw(format!("  {:<10} ", stage.label())),
                    Span::styled("█".repeat(len), Style::default().fg(state.theme.stage_color(stage))),
                    Span::raw(" ".repeat(BAR_WIDTH - len)),
                    Span::styled(
                        format!(" {:>4}  {:>5.1}%", count, overall.percent(stage)),
                        muted,
                    ),
                ]));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("  {} tagged cell(s)", overall.total()),
                muted,
            )));
        }
    }

    let title = match state.analysis_view {
        AnalysisView::Tasks => " Analysis: tasks (Tab) ",
        AnalysisView::Months => " Analysis: months (Tab) ",
        AnalysisView::Distribution => " Analysis: distribution (Tab) ",
    };
    let area = centered_rect(80, 80, f.area());
    let popup = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .style(Style::default().bg(state.theme.background)),
        )
        .style(Style::default().fg(state.theme.foreground));

    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}
