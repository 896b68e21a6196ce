//! # gridq - Tabular Q-Learning on a Grid World
//!
//! gridq learns a navigation policy for a single agent on a small rectangular
//! grid (4x4 by default) using tabular Q-learning. The world has two goal
//! cells, an optional forbidden cell and an optional wall; the agent learns by
//! simulated trial and error which compass move to take from every cell.
//!
//! ## Quick Start
//!
//! ```rust
//! use gridq::agent::{PolicyExtractor, QLearningTrainer};
//! use gridq::config::{GridConfig, QLearningConfig};
//! use gridq::grid::GridModel;
//!
//! // One-based cells as on the command line: goals 16 and 12, forbidden 5, wall 10
//! let grid_config = GridConfig::from_one_based(16, 12, 5, 10).unwrap();
//! let config = QLearningConfig { seed: Some(1), ..QLearningConfig::new(grid_config) };
//!
//! let grid = GridModel::new(&config.grid).unwrap();
//! let mut trainer = QLearningTrainer::new(&grid, &config).unwrap();
//! let report = trainer.train().unwrap();
//! let table = trainer.into_q_table();
//!
//! let policy = PolicyExtractor::new(&grid, &table);
//! let action = policy.optimal_action(grid.start()).unwrap();
//! assert!(action.is_some());
//! # let _ = report;
//! ```
//!
//! ## Module Organization
//!
//! - [`agent`] - Value table, training loop and policy extraction
//! - [`builders`] - Builder for run configurations
//! - [`config`] - Validated run parameters and JSON loading
//! - [`error`] - Error types and result handling
//! - [`grid`] - Transition and reward tables of the grid world
//! - [`logging`] - Subscriber setup for the command line driver
//! - [`metrics`] - Per-episode training history
//! - [`report`] - Text lines printed by the driver
//! - [`types`] - Actions, transitions and query modes
//! - [`visualization`] - ASCII plots, policy map and summaries

pub mod agent;
pub mod builders;
pub mod config;
pub mod error;
pub mod grid;
pub mod logging;
pub mod metrics;
pub mod report;
pub mod types;
pub mod visualization;

pub use error::{GridError, Result};

#[cfg(test)]
mod tests;
