//! Plain-text lines printed by the `gridq` binary.
//!
//! All states are printed one-based, the way cells are numbered on the
//! command line.

use crate::agent::{PathStep, PolicyExtractor, QTable};
use crate::error::{GridError, Result};
use crate::grid::GridModel;
use crate::types::Action;

/// Heading printed between the policy and the traced path
pub const PATH_HEADING: &str = "Path from start state to nearest goal:";

/// `<state> <direction>`
pub fn policy_line(state: usize, action: Action) -> String {
    format!("{} {}", state + 1, action)
}

/// `<state> <direction> <value>`
pub fn query_line(state: usize, action: Action, value: f64) -> String {
    format!("{} {} {:?}", state + 1, action, value)
}

/// One line per non-special state, ascending
pub fn policy_lines(policy: &PolicyExtractor<'_>) -> Result<Vec<String>> {
    Ok(policy
        .optimal_policy()?
        .into_iter()
        .map(|(state, action)| policy_line(state, action))
        .collect())
}

/// One line per move of the greedy path from the grid's start cell
pub fn path_lines(grid: &GridModel, policy: &PolicyExtractor<'_>) -> Result<Vec<String>> {
    let steps = policy
        .trace_path(grid.start())
        .collect::<Result<Vec<PathStep>>>()?;
    Ok(steps
        .into_iter()
        .map(|step| policy_line(step.state, step.action))
        .collect())
}

/// Learned value of every valid action of `state`; invalid actions are skipped
pub fn query_lines(grid: &GridModel, table: &QTable, state: usize) -> Result<Vec<String>> {
    if state >= grid.num_states() {
        return Err(GridError::CellOutOfRange {
            name: "state".to_string(),
            cell: state,
            num_states: grid.num_states(),
        });
    }
    Ok(grid
        .valid_actions(state)
        .map(|action| query_line(state, action, table.get(state, action)))
        .collect())
}
