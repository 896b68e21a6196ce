use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{GridError, Result};

/// Number of compass actions available in every state
pub const NUM_ACTIONS: usize = 4;

/// Compass direction the agent can move in.
///
/// The discriminant is the column index of the action in every table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    West = 0,
    North = 1,
    East = 2,
    South = 3,
}

impl Action {
    /// All actions in scan order
    pub const ALL: [Action; NUM_ACTIONS] =
        [Action::West, Action::North, Action::East, Action::South];

    /// The single action defined at terminal cells
    pub const EXIT: Action = Action::West;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Action> {
        Action::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::West => "West",
            Action::North => "North",
            Action::East => "East",
            Action::South => "South",
        }
    }

    /// Arrow glyph used by the policy map
    pub fn arrow(self) -> char {
        match self {
            Action::West => '<',
            Action::North => '^',
            Action::East => '>',
            Action::South => 'v',
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of taking an action from a state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    /// Moves to another grid state
    To(usize),
    /// Ends the episode
    Exit,
    /// Not allowed from this state
    #[default]
    Invalid,
}

impl Transition {
    pub fn is_valid(&self) -> bool {
        !matches!(self, Transition::Invalid)
    }

    pub fn target(&self) -> Option<usize> {
        match self {
            Transition::To(state) => Some(*state),
            _ => None,
        }
    }
}

/// What the driver should print after training
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryMode {
    /// Greedy action per state followed by the start-to-goal path
    Policy,
    /// Learned values for every valid action of one state (zero-based)
    Query(usize),
}

impl QueryMode {
    /// Parse a mode word and an optional one-based state argument
    pub fn parse(mode: &str, state: Option<usize>) -> Result<QueryMode> {
        match mode.parse::<ModeKind>()? {
            ModeKind::Policy => match state {
                None => Ok(QueryMode::Policy),
                Some(_) => Err(GridError::invalid_parameter(
                    "state",
                    "policy mode does not take a state",
                )),
            },
            ModeKind::Query => {
                let one_based = state.ok_or_else(|| {
                    GridError::invalid_parameter("state", "query mode needs a one-based state")
                })?;
                if one_based == 0 {
                    return Err(GridError::invalid_parameter("state", "cells are numbered from 1"));
                }
                Ok(QueryMode::Query(one_based - 1))
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ModeKind {
    Policy,
    Query,
}

impl FromStr for ModeKind {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "p" | "policy" => Ok(ModeKind::Policy),
            "q" | "query" => Ok(ModeKind::Query),
            other => Err(GridError::InvalidMode(other.to_string())),
        }
    }
}
