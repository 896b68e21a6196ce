//! # Run Configuration
//!
//! Every parameter of a training run lives in [`QLearningConfig`]. A config is
//! built once (from defaults, a JSON file, the builder, or the CLI), validated,
//! and then only read.
//!
//! Cells are zero-based internally. The command line speaks one-based cells;
//! use [`GridConfig::from_one_based`] at that boundary.

use serde::{Serialize, Deserialize};
use std::path::Path;

use crate::error::{GridError, Result};

/// Layout of the world: dimensions, start cell and the designated cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,
    pub start: usize,
    pub goal1: usize,
    pub goal2: usize,
    pub forbidden: Option<usize>,
    pub wall: Option<usize>,
}

impl GridConfig {
    /// Default 4x4 layout with caller-chosen special cells, all zero-based
    pub fn new(goal1: usize, goal2: usize, forbidden: Option<usize>, wall: Option<usize>) -> Self {
        GridConfig {
            goal1,
            goal2,
            forbidden,
            wall,
            ..GridConfig::default()
        }
    }

    /// Build from the one-based cell numbers used on the command line
    pub fn from_one_based(
        goal1: usize,
        goal2: usize,
        forbidden: usize,
        wall: usize,
    ) -> Result<Self> {
        Ok(GridConfig::new(
            to_zero_based("goal1", goal1)?,
            to_zero_based("goal2", goal2)?,
            Some(to_zero_based("forbidden", forbidden)?),
            Some(to_zero_based("wall", wall)?),
        ))
    }

    pub fn num_states(&self) -> usize {
        self.rows * self.cols
    }

    /// Cells that end an episode
    pub fn terminal_cells(&self) -> Vec<usize> {
        let mut cells = vec![self.goal1, self.goal2];
        cells.extend(self.forbidden);
        cells
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows < 2 || self.cols < 2 {
            return Err(GridError::invalid_parameter(
                "dimensions".to_string(),
                format!("grid must be at least 2x2, got {}x{}", self.rows, self.cols),
            ));
        }

        let num_states = self.num_states();
        let mut named = vec![("start", self.start), ("goal1", self.goal1), ("goal2", self.goal2)];
        if let Some(forbidden) = self.forbidden {
            named.push(("forbidden", forbidden));
        }
        if let Some(wall) = self.wall {
            named.push(("wall", wall));
        }

        for &(name, cell) in &named {
            if cell >= num_states {
                return Err(GridError::CellOutOfRange {
                    name: name.to_string(),
                    cell,
                    num_states,
                });
            }
        }

        for (i, &(first, a)) in named.iter().enumerate() {
            for &(second, b) in &named[i + 1..] {
                if a == b {
                    return Err(GridError::OverlappingCells {
                        first: first.to_string(),
                        second: second.to_string(),
                        cell: a,
                    });
                }
            }
        }

        Ok(())
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            rows: 4,
            cols: 4,
            start: 1,
            goal1: 15,
            goal2: 11,
            forbidden: Some(4),
            wall: Some(9),
        }
    }
}

fn to_zero_based(name: &str, cell: usize) -> Result<usize> {
    cell.checked_sub(1).ok_or_else(|| {
        GridError::invalid_parameter(name.to_string(), "cells are numbered from 1".to_string())
    })
}

/// Learning-rule parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hyperparameters {
    /// Exploration rate ε
    pub epsilon: f64,
    /// Learning rate α
    pub alpha: f64,
    /// Discount factor γ
    pub gamma: f64,
}

impl Hyperparameters {
    pub fn validate(&self) -> Result<()> {
        check_unit_interval("epsilon", self.epsilon)?;
        check_unit_interval("alpha", self.alpha)?;
        check_unit_interval("gamma", self.gamma)?;
        if self.alpha == 0.0 {
            return Err(GridError::invalid_parameter("alpha", "learning rate must be positive"));
        }
        Ok(())
    }
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Hyperparameters {
            epsilon: 0.1,
            alpha: 0.1,
            gamma: 0.2,
        }
    }
}

fn check_unit_interval(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(GridError::invalid_parameter(
            name.to_string(),
            format!("must lie in [0, 1], got {}", value),
        ));
    }
    Ok(())
}

/// Episode budget and convergence heuristic
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingLimits {
    /// Hard cap on the number of episodes
    pub max_episodes: usize,
    /// Episodes between value-table snapshots
    pub checkpoint_interval: usize,
    /// Training stops once the stagnation counter exceeds this
    pub patience: usize,
    /// Guard against an episode that never reaches a terminal cell
    pub max_episode_steps: usize,
}

impl TrainingLimits {
    pub fn validate(&self) -> Result<()> {
        if self.max_episodes == 0 {
            return Err(GridError::invalid_parameter("max_episodes", "must be positive"));
        }
        if self.checkpoint_interval == 0 {
            return Err(GridError::invalid_parameter("checkpoint_interval", "must be positive"));
        }
        if self.max_episode_steps == 0 {
            return Err(GridError::invalid_parameter("max_episode_steps", "must be positive"));
        }
        Ok(())
    }
}

impl Default for TrainingLimits {
    fn default() -> Self {
        TrainingLimits {
            max_episodes: 10_000,
            checkpoint_interval: 100,
            patience: 200,
            max_episode_steps: 100_000,
        }
    }
}

/// Complete, immutable parameters of one training run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QLearningConfig {
    pub grid: GridConfig,
    pub learning: Hyperparameters,
    pub training: TrainingLimits,
    /// Seed for the exploration RNG; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl QLearningConfig {
    pub fn new(grid: GridConfig) -> Self {
        QLearningConfig {
            grid,
            ..QLearningConfig::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        self.learning.validate()?;
        self.training.validate()
    }

    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    pub fn from_json_str(data: &str) -> Result<Self> {
        let config: QLearningConfig = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }
}
