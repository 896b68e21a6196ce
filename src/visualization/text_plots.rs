use crate::agent::{PolicyExtractor, TrainingReport, StopReason};
use crate::error::Result;
use crate::grid::GridModel;
use crate::metrics::TrainingMetrics;

/// Plot episode lengths as ASCII art
pub fn plot_episode_lengths(metrics: &TrainingMetrics, width: usize, height: usize) -> String {
    if metrics.episode_lengths.is_empty() {
        return "No episode data available".to_string();
    }

    let lengths: Vec<f64> = metrics.episode_lengths.iter().map(|&len| len as f64).collect();
    plot_series(&lengths, "Episode Lengths", width, height)
}

/// Plot episode returns as ASCII art
pub fn plot_episode_returns(metrics: &TrainingMetrics, width: usize, height: usize) -> String {
    if metrics.episode_returns.is_empty() {
        return "No episode data available".to_string();
    }

    let returns: Vec<f64> = metrics.episode_returns.iter().copied().collect();
    plot_series(&returns, "Episode Returns", width, height)
}

/// Generic series plotter
fn plot_series(values: &[f64], title: &str, width: usize, height: usize) -> String {
    if values.is_empty() || width < 10 || height < 5 {
        return format!("{}: Invalid data or dimensions", title);
    }

    let min_val = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max_val = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if (max_val - min_val).abs() < f64::EPSILON {
        return format!("{}: All values are {:.4}", title, min_val);
    }

    let mut plot = vec![vec![' '; width]; height];

    // Axes
    for row in plot.iter_mut() {
        row[0] = '|';
    }
    for cell in plot[height - 1].iter_mut() {
        *cell = '-';
    }
    plot[height - 1][0] = '+';

    let x_scale = (values.len().max(2) - 1) as f64 / (width - 3) as f64;
    let y_scale = (height - 3) as f64 / (max_val - min_val);

    for (i, &value) in values.iter().enumerate() {
        let x = ((i as f64 / x_scale) as usize + 2).min(width - 1);
        let offset = ((value - min_val) * y_scale) as usize;
        let y = (height - 3).saturating_sub(offset).min(height - 2);
        plot[y][x] = '*';
    }

    let mut output = format!("{}\n", title);
    output.push_str(&format!("Max: {:.4}\n", max_val));

    for row in plot.iter() {
        output.push_str(&row.iter().collect::<String>());
        output.push('\n');
    }

    output.push_str(&format!("Min: {:.4}\n", min_val));
    output.push_str(&format!("Points: {}\n", values.len()));

    output
}

/// Draw the greedy policy on the grid, northern row first.
///
/// `G` marks goals, `X` the forbidden cell, `#` the wall, arrows the greedy move.
pub fn policy_map(grid: &GridModel, policy: &PolicyExtractor<'_>) -> Result<String> {
    let mut output = String::new();

    for row in (0..grid.rows()).rev() {
        let mut line = String::with_capacity(grid.cols() * 2);
        for col in 0..grid.cols() {
            let state = row * grid.cols() + col;
            let glyph = if grid.is_goal(state) {
                'G'
            } else if grid.is_terminal(state) {
                'X'
            } else if grid.is_wall(state) {
                '#'
            } else {
                policy.optimal_action(state)?.map(|action| action.arrow()).unwrap_or('?')
            };
            if col > 0 {
                line.push(' ');
            }
            line.push(glyph);
        }
        output.push_str(&line);
        output.push('\n');
    }

    Ok(output)
}

/// Create a summary table of a training run
pub fn training_summary(report: &TrainingReport) -> String {
    let mut output = String::new();
    output.push_str("Training Summary\n");
    output.push_str("================\n");

    match report.stop_reason {
        StopReason::Converged { episode } => {
            output.push_str(&format!("Stopped: converged after {} episodes\n", episode));
        }
        StopReason::EpisodeLimit => {
            output.push_str(&format!("Stopped: episode cap of {} reached\n", report.episodes));
        }
    }
    output.push_str(&format!("Total steps: {}\n", report.total_steps));

    let metrics = &report.metrics;
    let history = metrics.episode_lengths.len();
    if let (Some(&recent_length), Some(avg_length)) =
        (metrics.episode_lengths.back(), metrics.avg_episode_length(history))
    {
        output.push_str(&format!(
            "Episode Length: Current={}, Average={:.2}\n",
            recent_length, avg_length
        ));
    }

    if let (Some(&recent_return), Some(avg_return)) =
        (metrics.episode_returns.back(), metrics.avg_episode_return(history))
    {
        output.push_str(&format!(
            "Returns: Current={:.2}, Average={:.2}\n",
            recent_return, avg_return
        ));
    }

    if let Some(rate) = metrics.goal_rate() {
        output.push_str(&format!("Goal rate: {:.1}%\n", rate * 100.0));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::QTable;
    use crate::config::GridConfig;

    #[test]
    fn test_plot_handles_flat_and_empty_series() {
        let mut metrics = TrainingMetrics::default();
        assert_eq!(plot_episode_lengths(&metrics, 40, 10), "No episode data available");

        metrics.episode_lengths.extend([3, 3, 3]);
        assert_eq!(
            plot_episode_lengths(&metrics, 40, 10),
            "Episode Lengths: All values are 3.0000"
        );

        metrics.episode_lengths.extend([9, 1, 4]);
        let plot = plot_episode_lengths(&metrics, 40, 10);
        assert!(plot.starts_with("Episode Lengths\nMax: 9.0000"));
        assert!(plot.contains("Points: 6"));
    }

    #[test]
    fn test_policy_map_marks_special_cells() {
        let grid = GridModel::new(&GridConfig::default()).unwrap();
        let table = QTable::new(grid.num_states());
        let policy = PolicyExtractor::new(&grid, &table);

        let map = policy_map(&grid, &policy).unwrap();
        let lines: Vec<&str> = map.lines().collect();
        assert_eq!(lines.len(), 4);
        // Northern row: states 12..15, goal at 15; 12 has neither West nor North
        assert_eq!(lines[0], "> < < G");
        // Row 2: states 8..11, wall at 9, goal at 11
        assert_eq!(lines[1], "^ # < G");
        // Row 1: forbidden at 4
        assert_eq!(lines[2], "X < < <");
        assert_eq!(lines[3], "^ < < <");
    }

    #[test]
    fn test_summary_reports_stop_reason_and_averages() {
        let mut metrics = TrainingMetrics::default();
        metrics.episode_lengths.extend([4, 2]);
        metrics.episode_returns.extend([99.7, -100.1]);
        metrics.goal_episodes = 1;
        metrics.forbidden_episodes = 1;

        let report = TrainingReport {
            episodes: 2,
            total_steps: 6,
            stop_reason: StopReason::EpisodeLimit,
            metrics,
        };
        let summary = training_summary(&report);
        assert!(summary.contains("Stopped: episode cap of 2 reached"));
        assert!(summary.contains("Episode Length: Current=2, Average=3.00"));
        assert!(summary.contains("Returns: Current=-100.10, Average=-0.20"));
        assert!(summary.contains("Goal rate: 50.0%"));

        let plot = plot_episode_returns(&report.metrics, 40, 10);
        assert!(plot.starts_with("Episode Returns\nMax: 99.7000"));
        assert!(plot.contains("Min: -100.1000"));
    }
}
