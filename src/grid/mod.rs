//! # Grid World Model
//!
//! Static structure of the world the agent learns over: which state each
//! action leads to, and what it pays.
//!
//! States are numbered row-major, `state = row * cols + col`, with row 0 on
//! the southern edge. North therefore adds `cols` and South subtracts it:
//!
//! ```text
//!  12 13 14 15      (row 3, northern edge)
//!   8  9 10 11
//!   4  5  6  7
//!   0  1  2  3      (row 0, southern edge)
//! ```
//!
//! Terminal cells (the goals and the optional forbidden cell) define only
//! action 0, which exits the episode. The wall cell defines no actions at all.
//! Moving *into* the wall is a valid transition; the trainer keeps the agent
//! in place when that happens.

use ndarray::Array2;

use crate::config::GridConfig;
use crate::error::{GridError, Result};
use crate::types::{Action, Transition, NUM_ACTIONS};

/// Reward for taking the exit action at a goal cell
pub const GOAL_REWARD: f64 = 100.0;

/// Reward for taking the exit action at the forbidden cell
pub const FORBIDDEN_REWARD: f64 = -100.0;

/// Cost of every ordinary move
pub const STEP_COST: f64 = -0.1;

/// `(state, action) -> Transition`
pub type TransitionTable = Array2<Transition>;

/// `(state, action) -> reward`; entries of invalid pairs are never read
pub type RewardTable = Array2<f64>;

/// Build the transition table from the grid geometry and designated cells.
pub fn build_transitions(
    rows: usize,
    cols: usize,
    goal1: usize,
    goal2: usize,
    forbidden: Option<usize>,
    wall: Option<usize>,
) -> TransitionTable {
    let num_states = rows * cols;
    let mut table = Array2::from_elem((num_states, NUM_ACTIONS), Transition::Invalid);

    for state in 0..num_states {
        if state == goal1 || state == goal2 || Some(state) == forbidden {
            table[[state, Action::EXIT.index()]] = Transition::Exit;
            continue;
        }
        if Some(state) == wall {
            continue;
        }

        let row = state / cols;
        let col = state % cols;
        for action in Action::ALL {
            let target = match action {
                Action::West if col > 0 => Some(state - 1),
                Action::North if row + 1 < rows => Some(state + cols),
                Action::East if col + 1 < cols => Some(state + 1),
                Action::South if row > 0 => Some(state - cols),
                _ => None,
            };
            if let Some(target) = target {
                table[[state, action.index()]] = Transition::To(target);
            }
        }
    }

    table
}

/// Build the reward table. Validity is taken from `transitions`, so this must
/// run after [`build_transitions`].
pub fn build_rewards(
    transitions: &TransitionTable,
    goal1: usize,
    goal2: usize,
    forbidden: Option<usize>,
) -> RewardTable {
    let mut rewards = Array2::zeros(transitions.raw_dim());

    for ((state, action), transition) in transitions.indexed_iter() {
        if !transition.is_valid() {
            continue;
        }
        rewards[[state, action]] = if state == goal1 || state == goal2 {
            GOAL_REWARD
        } else if Some(state) == forbidden {
            FORBIDDEN_REWARD
        } else {
            STEP_COST
        };
    }

    rewards
}

/// The grid world: geometry, designated cells, transitions and rewards.
#[derive(Debug, Clone)]
pub struct GridModel {
    config: GridConfig,
    transitions: TransitionTable,
    rewards: RewardTable,
}

impl GridModel {
    /// Validate the layout and build both tables
    pub fn new(config: &GridConfig) -> Result<Self> {
        config.validate()?;

        let transitions = build_transitions(
            config.rows,
            config.cols,
            config.goal1,
            config.goal2,
            config.forbidden,
            config.wall,
        );
        let rewards = build_rewards(&transitions, config.goal1, config.goal2, config.forbidden);

        Ok(GridModel {
            config: config.clone(),
            transitions,
            rewards,
        })
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn num_states(&self) -> usize {
        self.config.num_states()
    }

    pub fn rows(&self) -> usize {
        self.config.rows
    }

    pub fn cols(&self) -> usize {
        self.config.cols
    }

    pub fn start(&self) -> usize {
        self.config.start
    }

    /// Where `action` leads from `state`. States outside the grid are Invalid.
    pub fn transition(&self, state: usize, action: Action) -> Transition {
        self.transitions
            .get([state, action.index()])
            .copied()
            .unwrap_or(Transition::Invalid)
    }

    /// Reward for a valid `(state, action)` pair
    pub fn reward(&self, state: usize, action: Action) -> Result<f64> {
        if !self.transition(state, action).is_valid() {
            return Err(GridError::InvalidAction {
                state,
                action: action.index(),
            });
        }
        Ok(self.rewards[[state, action.index()]])
    }

    /// Valid actions of `state` in scan order
    pub fn valid_actions(&self, state: usize) -> impl Iterator<Item = Action> + '_ {
        Action::ALL
            .into_iter()
            .filter(move |&action| self.transition(state, action).is_valid())
    }

    pub fn is_goal(&self, state: usize) -> bool {
        state == self.config.goal1 || state == self.config.goal2
    }

    /// Goals and the forbidden cell
    pub fn is_terminal(&self, state: usize) -> bool {
        self.is_goal(state) || Some(state) == self.config.forbidden
    }

    pub fn is_wall(&self, state: usize) -> bool {
        Some(state) == self.config.wall
    }

    /// Terminal cells and the wall
    pub fn is_special(&self, state: usize) -> bool {
        self.is_terminal(state) || self.is_wall(state)
    }

    pub fn terminal_states(&self) -> Vec<usize> {
        self.config.terminal_cells()
    }

    /// `(row, col)` of a state, row 0 being the southern edge
    pub fn cell_position(&self, state: usize) -> (usize, usize) {
        (state / self.config.cols, state % self.config.cols)
    }

    /// Length of the longest shortest path on an empty grid
    pub fn diameter(&self) -> usize {
        self.config.rows + self.config.cols - 2
    }
}
