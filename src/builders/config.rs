use crate::config::{GridConfig, Hyperparameters, QLearningConfig, TrainingLimits};
use crate::error::{Result, GridError};

/// Builder for QLearningConfig
///
/// ```rust
/// use gridq::builders::QLearningConfigBuilder;
///
/// let config = QLearningConfigBuilder::new()
///     .goals(15, 11)
///     .forbidden(4)
///     .wall(9)
///     .gamma(0.9)
///     .seed(3)
///     .build()
///     .unwrap();
/// assert_eq!(config.learning.gamma, 0.9);
/// ```
pub struct QLearningConfigBuilder {
    grid: GridConfig,
    goals: Option<(usize, usize)>,
    learning: Hyperparameters,
    training: TrainingLimits,
    seed: Option<u64>,
}

impl QLearningConfigBuilder {
    /// Create a builder with a 4x4 grid, no forbidden cell, no wall and no goals yet
    pub fn new() -> Self {
        QLearningConfigBuilder {
            grid: GridConfig {
                forbidden: None,
                wall: None,
                ..GridConfig::default()
            },
            goals: None,
            learning: Hyperparameters::default(),
            training: TrainingLimits::default(),
            seed: None,
        }
    }

    /// Set the grid dimensions
    pub fn dimensions(mut self, rows: usize, cols: usize) -> Self {
        self.grid.rows = rows;
        self.grid.cols = cols;
        self
    }

    /// Set the start cell (zero-based)
    pub fn start(mut self, start: usize) -> Self {
        self.grid.start = start;
        self
    }

    /// Set both goal cells (zero-based)
    pub fn goals(mut self, goal1: usize, goal2: usize) -> Self {
        self.goals = Some((goal1, goal2));
        self
    }

    /// Set the forbidden cell (zero-based)
    pub fn forbidden(mut self, cell: usize) -> Self {
        self.grid.forbidden = Some(cell);
        self
    }

    /// Set the wall cell (zero-based)
    pub fn wall(mut self, cell: usize) -> Self {
        self.grid.wall = Some(cell);
        self
    }

    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.learning.epsilon = epsilon;
        self
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.learning.alpha = alpha;
        self
    }

    pub fn gamma(mut self, gamma: f64) -> Self {
        self.learning.gamma = gamma;
        self
    }

    pub fn max_episodes(mut self, max_episodes: usize) -> Self {
        self.training.max_episodes = max_episodes;
        self
    }

    pub fn checkpoint_interval(mut self, interval: usize) -> Self {
        self.training.checkpoint_interval = interval;
        self
    }

    pub fn patience(mut self, patience: usize) -> Self {
        self.training.patience = patience;
        self
    }

    pub fn max_episode_steps(mut self, steps: usize) -> Self {
        self.training.max_episode_steps = steps;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<QLearningConfig> {
        let (goal1, goal2) = self.goals.ok_or_else(|| GridError::InvalidParameter {
            name: "goals".to_string(),
            reason: "Goal cells not specified".to_string(),
        })?;

        let config = QLearningConfig {
            grid: GridConfig {
                goal1,
                goal2,
                ..self.grid
            },
            learning: self.learning,
            training: self.training,
            seed: self.seed,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for QLearningConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_goals() {
        let result = QLearningConfigBuilder::new().build();
        assert!(matches!(
            result,
            Err(GridError::InvalidParameter { ref name, .. }) if name == "goals"
        ));
    }

    #[test]
    fn test_builder_sets_every_field() {
        let config = QLearningConfigBuilder::new()
            .dimensions(3, 5)
            .start(0)
            .goals(14, 9)
            .wall(7)
            .epsilon(0.3)
            .alpha(0.5)
            .gamma(0.8)
            .max_episodes(500)
            .checkpoint_interval(50)
            .patience(20)
            .max_episode_steps(1_000)
            .seed(11)
            .build()
            .unwrap();

        assert_eq!(config.grid.num_states(), 15);
        assert_eq!(config.grid.forbidden, None);
        assert_eq!(config.grid.wall, Some(7));
        assert_eq!(config.learning.alpha, 0.5);
        assert_eq!(config.training.patience, 20);
        assert_eq!(config.seed, Some(11));
    }

    #[test]
    fn test_builder_validates_layout() {
        let result = QLearningConfigBuilder::new().goals(1, 11).build();
        assert!(matches!(result, Err(GridError::OverlappingCells { .. })));
    }
}
