use ndarray::Array2;
use serde::{Serialize, Deserialize};
use std::path::Path;

use crate::error::{GridError, Result};
use crate::grid::GridModel;
use crate::types::{Action, Transition, NUM_ACTIONS};

/// Tabular state-action value estimates.
///
/// Every entry starts at zero. Entries of invalid pairs are never written, so
/// they stay at zero for the lifetime of the table.
///
/// # Example
///
/// ```rust
/// use gridq::agent::QTable;
/// use gridq::config::GridConfig;
/// use gridq::grid::GridModel;
/// use gridq::types::Action;
///
/// let grid = GridModel::new(&GridConfig::default()).unwrap();
/// let mut table = QTable::new(grid.num_states());
///
/// // Exit action at goal cell 15 learns its full reward in one update
/// let value = table.bellman_update(&grid, 15, Action::EXIT, 0.2, 0.1).unwrap();
/// assert_eq!(value, 100.0);
///
/// let (best, _) = table.best_action(&grid, 1, None).unwrap();
/// assert_eq!(best, Action::West);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    values: Array2<f64>,
}

impl QTable {
    pub fn new(num_states: usize) -> Self {
        QTable {
            values: Array2::zeros((num_states, NUM_ACTIONS)),
        }
    }

    pub fn num_states(&self) -> usize {
        self.values.nrows()
    }

    pub fn get(&self, state: usize, action: Action) -> f64 {
        self.values[[state, action.index()]]
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Largest stored value of `state` over all four actions
    pub fn max_value(&self, state: usize) -> f64 {
        self.values
            .row(state)
            .iter()
            .fold(f64::NEG_INFINITY, |max, &val| max.max(val))
    }

    /// Greedy action among the valid actions of `state`.
    ///
    /// Actions whose target is `exclude` are skipped, which stops the agent
    /// from stepping straight back to where it came from. Ties go to the
    /// lowest action index.
    pub fn best_action(
        &self,
        grid: &GridModel,
        state: usize,
        exclude: Option<usize>,
    ) -> Result<(Action, f64)> {
        let mut best: Option<(Action, f64)> = None;

        for action in candidate_actions(grid, state, exclude) {
            let value = self.get(state, action);
            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((action, value)),
            }
        }

        best.ok_or(GridError::NoValidActions { state })
    }

    /// One Q-learning update of `(state, action)`.
    ///
    /// ```text
    /// Q(s,a) <- (1 - alpha) Q(s,a) + alpha (R(s,a) + gamma max_a' Q(s',a'))
    /// ```
    ///
    /// An exit transition has no continuation, so its value becomes the reward.
    /// The continuation maximum runs over the whole stored row of `s'`.
    pub fn bellman_update(
        &mut self,
        grid: &GridModel,
        state: usize,
        action: Action,
        gamma: f64,
        alpha: f64,
    ) -> Result<f64> {
        let reward = grid.reward(state, action)?;
        let new_value = match grid.transition(state, action) {
            Transition::Exit => reward,
            Transition::To(target) => {
                let old_value = self.get(state, action);
                (1.0 - alpha) * old_value + alpha * (reward + gamma * self.max_value(target))
            }
            Transition::Invalid => {
                return Err(GridError::InvalidAction {
                    state,
                    action: action.index(),
                })
            }
        };

        self.values[[state, action.index()]] = new_value;
        Ok(new_value)
    }

    /// Largest absolute entry-wise difference to another table of the same shape
    pub fn max_abs_diff(&self, other: &QTable) -> f64 {
        self.values
            .iter()
            .zip(other.values.iter())
            .fold(0.0, |max, (a, b)| max.max((a - b).abs()))
    }

    /// Save the table to disk
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = bincode::serialize(self)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    /// Load a table from disk and check it fits `grid`
    pub fn load<P: AsRef<Path>>(path: P, grid: &GridModel) -> Result<Self> {
        let data = std::fs::read(path)?;
        let table: Self = bincode::deserialize(&data)?;
        if table.values.dim() != (grid.num_states(), NUM_ACTIONS) {
            return Err(GridError::SerializationError(format!(
                "table has shape {:?}, grid needs ({}, {})",
                table.values.dim(),
                grid.num_states(),
                NUM_ACTIONS
            )));
        }
        Ok(table)
    }
}

/// Valid actions of `state` whose target is not `exclude`
pub(crate) fn candidate_actions(
    grid: &GridModel,
    state: usize,
    exclude: Option<usize>,
) -> impl Iterator<Item = Action> + '_ {
    grid.valid_actions(state).filter(move |&action| {
        match (grid.transition(state, action).target(), exclude) {
            (Some(target), Some(excluded)) => target != excluded,
            _ => true,
        }
    })
}
