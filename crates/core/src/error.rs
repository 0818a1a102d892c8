use thiserror::Error;

use crate::types::Pos;

/// Failures the core can report.
///
/// Only `InvalidConfiguration` and `InconsistentState` escape a running game.
/// `Unreachable` is absorbed by the strategy layer and turned into `Stay`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ChaseError {
    /// A cell query fell outside the grid.
    #[error("cell ({}, {}) is outside the {width}x{height} grid", pos.x, pos.y)]
    OutOfBounds { pos: Pos, width: usize, height: usize },
    /// No path exists under the searching actor's current knowledge.
    #[error("no path from ({}, {}) to ({}, {})", start.x, start.y, goal.x, goal.y)]
    Unreachable { start: Pos, goal: Pos },
    /// Rejected at construction time; fatal for that game instance.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// An occupancy or progress invariant was violated mid-game.
    #[error("inconsistent state: {0}")]
    InconsistentState(String),
}
