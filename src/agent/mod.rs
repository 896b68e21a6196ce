//! # Q-Learning Agent Module
//!
//! Tabular Q-learning over a [`GridModel`](crate::grid::GridModel).
//!
//! ## Core Concepts
//!
//! - **Value table**: one estimate per `(state, action)` pair, all starting at zero
//! - **Bellman update**: blends the old estimate with reward plus discounted best
//!   continuation
//! - **Exploration vs Exploitation**: epsilon-greedy, excluding the move that
//!   returns to the previous state
//! - **Convergence**: exact-equality comparison against periodic snapshots
//!
//! ## Example Usage
//!
//! ```rust
//! use gridq::agent::{PolicyExtractor, QLearningTrainer};
//! use gridq::config::QLearningConfig;
//! use gridq::grid::GridModel;
//!
//! let config = QLearningConfig { seed: Some(42), ..QLearningConfig::default() };
//! let grid = GridModel::new(&config.grid).unwrap();
//!
//! let mut trainer = QLearningTrainer::new(&grid, &config).unwrap();
//! let report = trainer.train().unwrap();
//! println!("trained for {} episodes", report.episodes);
//!
//! let table = trainer.into_q_table();
//! let policy = PolicyExtractor::new(&grid, &table);
//! for (state, action) in policy.optimal_policy().unwrap() {
//!     println!("{} {}", state + 1, action);
//! }
//! ```

mod policy;
mod q_table;
mod trainer;

pub use policy::{PathStep, PathTrace, PolicyExtractor};
pub use q_table::QTable;
pub use trainer::{QLearningTrainer, StopReason, TrainingReport};
