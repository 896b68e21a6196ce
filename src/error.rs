use std::fmt;

/// Result type for gridq operations
pub type Result<T> = std::result::Result<T, GridError>;

/// Main error type for the gridq library
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// Invalid parameter value
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// A designated cell lies outside the grid
    CellOutOfRange {
        name: String,
        cell: usize,
        num_states: usize,
    },

    /// Two designated cells share the same grid position
    OverlappingCells {
        first: String,
        second: String,
        cell: usize,
    },

    /// Unrecognised query mode
    InvalidMode(String),

    /// A state was asked to act but has no candidate action
    NoValidActions {
        state: usize,
    },

    /// An action that leaves the grid (or the wall) was used as if it were valid
    InvalidAction {
        state: usize,
        action: usize,
    },

    /// A training episode ran past its step guard
    EpisodeStepLimit {
        episode: usize,
        steps: usize,
    },

    /// The greedy path never reached a goal cell
    PathDidNotTerminate {
        start: usize,
        steps: usize,
    },

    /// IO errors (file operations)
    IoError(String),

    /// Serialization/deserialization errors
    SerializationError(String),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
            GridError::CellOutOfRange { name, cell, num_states } => {
                write!(f, "Cell '{}' = {} is outside the grid (0..{})", name, cell, num_states)
            }
            GridError::OverlappingCells { first, second, cell } => {
                write!(f, "Cells '{}' and '{}' both occupy cell {}", first, second, cell)
            }
            GridError::InvalidMode(mode) => {
                write!(f, "Invalid mode '{}': expected 'policy' or 'query'", mode)
            }
            GridError::NoValidActions { state } => {
                write!(f, "No valid actions available from state {}", state)
            }
            GridError::InvalidAction { state, action } => {
                write!(f, "Action {} is not valid from state {}", action, state)
            }
            GridError::EpisodeStepLimit { episode, steps } => {
                write!(
                    f,
                    "Episode {} exceeded {} steps without reaching a terminal cell",
                    episode, steps
                )
            }
            GridError::PathDidNotTerminate { start, steps } => {
                write!(
                    f,
                    "Greedy path from state {} did not reach a goal within {} steps",
                    start, steps
                )
            }
            GridError::IoError(msg) => write!(f, "IO error: {}", msg),
            GridError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for GridError {}

// Conversion from std::io::Error
impl From<std::io::Error> for GridError {
    fn from(err: std::io::Error) -> Self {
        GridError::IoError(err.to_string())
    }
}

// Conversion from bincode::Error
impl From<bincode::Error> for GridError {
    fn from(err: bincode::Error) -> Self {
        GridError::SerializationError(err.to_string())
    }
}

impl From<serde_json::Error> for GridError {
    fn from(err: serde_json::Error) -> Self {
        GridError::SerializationError(err.to_string())
    }
}

// Helper functions for common error patterns
impl GridError {
    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        GridError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// True for errors raised while validating configuration, before any training
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            GridError::InvalidParameter { .. }
                | GridError::CellOutOfRange { .. }
                | GridError::OverlappingCells { .. }
                | GridError::InvalidMode(_)
        )
    }
}
