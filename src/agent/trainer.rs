use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Serialize, Deserialize};
use tracing::{debug, info, warn};

use crate::agent::q_table::{candidate_actions, QTable};
use crate::config::{Hyperparameters, QLearningConfig, TrainingLimits};
use crate::error::{GridError, Result};
use crate::grid::GridModel;
use crate::metrics::{MetricsTracker, TrainingMetrics};
use crate::types::{Action, Transition};

/// Why training stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// The value table matched its latest checkpoint for longer than the patience
    Converged { episode: usize },
    /// The episode cap was reached first
    EpisodeLimit,
}

/// Summary of a finished training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub episodes: usize,
    pub total_steps: usize,
    pub stop_reason: StopReason,
    pub metrics: TrainingMetrics,
}

impl TrainingReport {
    pub fn converged(&self) -> bool {
        matches!(self.stop_reason, StopReason::Converged { .. })
    }
}

/// Tabular Q-learning over a [`GridModel`].
///
/// The trainer owns the value table while it learns. Episodes start at the
/// grid's start cell and run until a terminal cell is reached; every step picks
/// an action epsilon-greedily, never straight back to the previous state, and
/// applies one Bellman update. Moving into the wall leaves the agent where it
/// was, but the attempted move is still updated.
///
/// Every `checkpoint_interval` episodes the terminal exit values are refreshed
/// and the table is snapshotted. After each episode the table is compared with
/// that snapshot by exact equality; training stops early once more than
/// `patience` consecutive episodes leave it unchanged. The snapshot is only
/// refreshed at checkpoints, so this is a coarse convergence signal, not a
/// guarantee that each individual episode was stable.
///
/// ```rust
/// use gridq::agent::QLearningTrainer;
/// use gridq::config::QLearningConfig;
/// use gridq::grid::GridModel;
///
/// let config = QLearningConfig { seed: Some(7), ..QLearningConfig::default() };
/// let grid = GridModel::new(&config.grid).unwrap();
/// let mut trainer = QLearningTrainer::new(&grid, &config).unwrap();
/// let report = trainer.train().unwrap();
/// assert!(report.episodes <= config.training.max_episodes);
/// ```
pub struct QLearningTrainer<'a> {
    grid: &'a GridModel,
    params: Hyperparameters,
    limits: TrainingLimits,
    table: QTable,
    rng: StdRng,
    tracker: MetricsTracker,
}

impl<'a> QLearningTrainer<'a> {
    /// Create a trainer with a fresh, all-zero value table
    pub fn new(grid: &'a GridModel, config: &QLearningConfig) -> Result<Self> {
        config.validate()?;
        if config.grid != *grid.config() {
            return Err(GridError::invalid_parameter(
                "grid",
                "configuration describes a different grid than the model",
            ));
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(QLearningTrainer {
            grid,
            params: config.learning,
            limits: config.training,
            table: QTable::new(grid.num_states()),
            rng,
            tracker: MetricsTracker::new(config.training.max_episodes),
        })
    }

    pub fn q_table(&self) -> &QTable {
        &self.table
    }

    /// Hand the trained table out; it is read-only from here on
    pub fn into_q_table(self) -> QTable {
        self.table
    }

    /// Run episodes until the table stagnates or the episode cap is hit
    pub fn train(&mut self) -> Result<TrainingReport> {
        info!(
            epsilon = self.params.epsilon,
            alpha = self.params.alpha,
            gamma = self.params.gamma,
            max_episodes = self.limits.max_episodes,
            "starting Q-learning"
        );

        let mut snapshot = self.table.clone();
        let mut stagnant = 0usize;
        let mut episodes = 0usize;
        let mut stop_reason = StopReason::EpisodeLimit;

        for episode in 0..self.limits.max_episodes {
            if episode % self.limits.checkpoint_interval == 0 {
                self.refresh_terminal_values()?;
                snapshot = self.table.clone();
                debug!(episode, stagnant, "value table checkpoint");
            }

            self.run_episode(episode)?;
            episodes = episode + 1;

            self.tracker.record_value_change(self.table.max_abs_diff(&snapshot));
            if self.table == snapshot {
                stagnant += 1;
                if stagnant > self.limits.patience {
                    stop_reason = StopReason::Converged { episode: episodes };
                    break;
                }
            } else {
                stagnant = 0;
            }
        }

        match stop_reason {
            StopReason::Converged { episode } => {
                info!(
                    episode,
                    total_steps = self.tracker.total_steps(),
                    "value table stagnated, stopping early"
                );
            }
            StopReason::EpisodeLimit => {
                warn!(episodes, "episode cap reached before the value table stagnated");
            }
        }

        Ok(TrainingReport {
            episodes,
            total_steps: self.tracker.total_steps(),
            stop_reason,
            metrics: self.tracker.metrics().clone(),
        })
    }

    /// Terminal exits carry no continuation, so one update sets them to their reward
    fn refresh_terminal_values(&mut self) -> Result<()> {
        for state in self.grid.terminal_states() {
            self.table.bellman_update(
                self.grid,
                state,
                Action::EXIT,
                self.params.gamma,
                self.params.alpha,
            )?;
        }
        Ok(())
    }

    fn run_episode(&mut self, episode: usize) -> Result<()> {
        let grid = self.grid;
        let mut current = grid.start();
        let mut previous: Option<usize> = None;
        let mut steps = 0usize;

        self.tracker.start_episode();

        while !grid.is_terminal(current) {
            if steps >= self.limits.max_episode_steps {
                return Err(GridError::EpisodeStepLimit { episode, steps });
            }

            let action = self.select_action(current, previous)?;
            self.table.bellman_update(grid, current, action, self.params.gamma, self.params.alpha)?;
            self.tracker.step(grid.reward(current, action)?);
            steps += 1;

            let next = match grid.transition(current, action) {
                Transition::To(next) => next,
                Transition::Exit | Transition::Invalid => {
                    return Err(GridError::InvalidAction {
                        state: current,
                        action: action.index(),
                    });
                }
            };

            previous = Some(current);
            if !grid.is_wall(next) {
                current = next;
            }
        }

        let exit_reward = grid.reward(current, Action::EXIT)?;
        self.tracker.end_episode(exit_reward, grid.is_goal(current));
        Ok(())
    }

    /// Epsilon-greedy choice among valid actions that do not return to `previous`
    pub(crate) fn select_action(
        &mut self,
        state: usize,
        previous: Option<usize>,
    ) -> Result<Action> {
        if self.rng.gen::<f64>() < self.params.epsilon {
            let candidates: Vec<Action> = candidate_actions(self.grid, state, previous).collect();
            candidates
                .choose(&mut self.rng)
                .copied()
                .ok_or(GridError::NoValidActions { state })
        } else {
            self.table
                .best_action(self.grid, state, previous)
                .map(|(action, _)| action)
        }
    }
}
