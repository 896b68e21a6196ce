use std::collections::VecDeque;
use std::path::Path;
use serde::{Serialize, Deserialize};

/// Per-episode history of a training run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    /// Undiscounted return per episode, exit reward included
    pub episode_returns: VecDeque<f64>,

    /// Moves taken per episode
    pub episode_lengths: VecDeque<usize>,

    /// Largest value-table change against the latest checkpoint, per episode
    pub value_changes: VecDeque<f64>,

    /// Episodes that ended in a goal cell
    pub goal_episodes: usize,

    /// Episodes that ended in the forbidden cell
    pub forbidden_episodes: usize,
}

impl TrainingMetrics {
    pub fn new(history_size: usize) -> Self {
        TrainingMetrics {
            episode_returns: VecDeque::with_capacity(history_size),
            episode_lengths: VecDeque::with_capacity(history_size),
            value_changes: VecDeque::with_capacity(history_size),
            goal_episodes: 0,
            forbidden_episodes: 0,
        }
    }

    /// Fraction of finished episodes that reached a goal
    pub fn goal_rate(&self) -> Option<f64> {
        let total = self.goal_episodes + self.forbidden_episodes;
        if total == 0 {
            return None;
        }
        Some(self.goal_episodes as f64 / total as f64)
    }

    /// Mean length of the last `window` episodes
    pub fn avg_episode_length(&self, window: usize) -> Option<f64> {
        let lengths = self.episode_lengths.iter().map(|&len| len as f64);
        recent_mean(lengths, self.episode_lengths.len(), window)
    }

    /// Mean return of the last `window` episodes
    pub fn avg_episode_return(&self, window: usize) -> Option<f64> {
        recent_mean(self.episode_returns.iter().copied(), self.episode_returns.len(), window)
    }

    /// Save metrics as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> crate::error::Result<()> {
        let serialized = serde_json::to_string_pretty(self)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }
}

/// Tracks metrics during training
pub struct MetricsTracker {
    metrics: TrainingMetrics,
    history_size: usize,

    // Episode tracking
    current_episode_return: f64,
    current_episode_length: usize,

    // Step tracking
    total_steps: usize,
}

impl MetricsTracker {
    pub fn new(history_size: usize) -> Self {
        MetricsTracker {
            metrics: TrainingMetrics::new(history_size),
            history_size: history_size.max(1),
            current_episode_return: 0.0,
            current_episode_length: 0,
            total_steps: 0,
        }
    }

    /// Start a new episode
    pub fn start_episode(&mut self) {
        self.current_episode_return = 0.0;
        self.current_episode_length = 0;
    }

    /// Record a move within an episode
    pub fn step(&mut self, reward: f64) {
        self.current_episode_return += reward;
        self.current_episode_length += 1;
        self.total_steps += 1;
    }

    /// End the current episode at a terminal cell paying `exit_reward`
    pub fn end_episode(&mut self, exit_reward: f64, reached_goal: bool) {
        let history_size = self.history_size;
        let episode_return = self.current_episode_return + exit_reward;
        push_bounded(&mut self.metrics.episode_returns, episode_return, history_size);
        push_bounded(&mut self.metrics.episode_lengths, self.current_episode_length, history_size);

        if reached_goal {
            self.metrics.goal_episodes += 1;
        } else {
            self.metrics.forbidden_episodes += 1;
        }
    }

    /// Record how far the table has moved from its checkpoint
    pub fn record_value_change(&mut self, change: f64) {
        let history_size = self.history_size;
        push_bounded(&mut self.metrics.value_changes, change, history_size);
    }

    /// Get a reference to the metrics
    pub fn metrics(&self) -> &TrainingMetrics {
        &self.metrics
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }
}

fn push_bounded<T>(history: &mut VecDeque<T>, value: T, history_size: usize) {
    if history.len() >= history_size {
        history.pop_front();
    }
    history.push_back(value);
}

fn recent_mean<I>(values: I, len: usize, window: usize) -> Option<f64>
where
    I: DoubleEndedIterator<Item = f64>,
{
    let n = window.min(len);
    if n == 0 {
        return None;
    }
    let sum: f64 = values.rev().take(n).sum();
    Some(sum / n as f64)
}
