use serde::{Serialize, Deserialize};

use crate::agent::q_table::QTable;
use crate::error::{GridError, Result};
use crate::grid::GridModel;
use crate::types::{Action, Transition, NUM_ACTIONS};

/// One move of a traced path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    pub state: usize,
    pub action: Action,
}

/// Greedy policy read off a trained value table
pub struct PolicyExtractor<'a> {
    grid: &'a GridModel,
    table: &'a QTable,
}

impl<'a> PolicyExtractor<'a> {
    pub fn new(grid: &'a GridModel, table: &'a QTable) -> Self {
        PolicyExtractor { grid, table }
    }

    /// Greedy action of `state`, or `None` for terminal cells and the wall
    pub fn optimal_action(&self, state: usize) -> Result<Option<Action>> {
        if state >= self.grid.num_states() {
            return Err(GridError::CellOutOfRange {
                name: "state".to_string(),
                cell: state,
                num_states: self.grid.num_states(),
            });
        }
        if self.grid.is_special(state) {
            return Ok(None);
        }
        self.table
            .best_action(self.grid, state, None)
            .map(|(action, _)| Some(action))
    }

    /// Greedy action of every non-special state, in ascending state order
    pub fn optimal_policy(&self) -> Result<Vec<(usize, Action)>> {
        let mut policy = Vec::new();
        for state in 0..self.grid.num_states() {
            if let Some(action) = self.optimal_action(state)? {
                policy.push((state, action));
            }
        }
        Ok(policy)
    }

    /// Follow the greedy policy from `start` to the nearest goal, bounded by
    /// one step per table entry
    pub fn trace_path(&self, start: usize) -> PathTrace<'a> {
        self.trace_path_bounded(start, self.grid.num_states() * NUM_ACTIONS)
    }

    /// Follow the greedy policy from `start`, never stepping straight back.
    ///
    /// The trace yields `PathDidNotTerminate` instead of looping when the
    /// policy does not reach a goal within `max_steps`, walks into the
    /// forbidden cell, or runs into the wall.
    pub fn trace_path_bounded(&self, start: usize, max_steps: usize) -> PathTrace<'a> {
        PathTrace {
            grid: self.grid,
            table: self.table,
            start,
            current: start,
            previous: None,
            steps: 0,
            max_steps,
            stuck: false,
            done: false,
        }
    }
}

/// Lazy, finite walk along the greedy policy
pub struct PathTrace<'a> {
    grid: &'a GridModel,
    table: &'a QTable,
    start: usize,
    current: usize,
    previous: Option<usize>,
    steps: usize,
    max_steps: usize,
    stuck: bool,
    done: bool,
}

impl PathTrace<'_> {
    /// State the walk has reached so far
    pub fn current(&self) -> usize {
        self.current
    }

    fn fail(&mut self, err: GridError) -> Option<Result<PathStep>> {
        self.done = true;
        Some(Err(err))
    }
}

impl Iterator for PathTrace<'_> {
    type Item = Result<PathStep>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.grid.is_goal(self.current) {
            return None;
        }
        if self.stuck || self.steps >= self.max_steps || self.grid.is_terminal(self.current) {
            let err = GridError::PathDidNotTerminate {
                start: self.start,
                steps: self.steps,
            };
            return self.fail(err);
        }

        let action = match self.table.best_action(self.grid, self.current, self.previous) {
            Ok((action, _)) => action,
            Err(err) => return self.fail(err),
        };
        let step = PathStep {
            state: self.current,
            action,
        };

        self.steps += 1;
        self.previous = Some(self.current);
        match self.grid.transition(self.current, action) {
            // A greedy bump into the wall would repeat forever
            Transition::To(next) if self.grid.is_wall(next) => self.stuck = true,
            Transition::To(next) => self.current = next,
            Transition::Exit | Transition::Invalid => self.stuck = true,
        }

        Some(Ok(step))
    }
}
