use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChaseError;

/// Grid cell coordinate. Ordering is row-major (`y` first) so ordered
/// collections iterate cells the way the grid is stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub fn offset(self, action: Action) -> Pos {
        let (dy, dx) = action.delta();
        Pos { y: self.y + dy, x: self.x + dx }
    }
}

pub fn manhattan(a: Pos, b: Pos) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Wall,
    Grass,
    Bush,
}

/// The five discrete actions. Declaration order is also the tie-break
/// priority used when blended scores are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Stay,
}

impl Action {
    pub const ALL: [Action; 5] = [Action::Up, Action::Down, Action::Left, Action::Right, Action::Stay];
    pub const MOVES: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Action::Up => (-1, 0),
            Action::Down => (1, 0),
            Action::Left => (0, -1),
            Action::Right => (0, 1),
            Action::Stay => (0, 0),
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// The action that moves `from` onto the grid-adjacent cell `to`
    /// (`Stay` when they are equal), or `None` when they are not adjacent.
    pub fn between(from: Pos, to: Pos) -> Option<Action> {
        Self::ALL.into_iter().find(|action| from.offset(*action) == to)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Agent,
    Enemy,
}

impl Role {
    pub fn other(self) -> Role {
        match self {
            Role::Agent => Role::Enemy,
            Role::Enemy => Role::Agent,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChaseStatus {
    Running,
    AgentSurvived,
    EnemyCaptured,
    AgentStuck,
}

impl ChaseStatus {
    pub fn is_terminal(self) -> bool {
        self != ChaseStatus::Running
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CheckpointId {
    A,
    B,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    AStar,
    Dijkstra,
    Bfs,
    Greedy,
    Jps,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] =
        [Algorithm::AStar, Algorithm::Dijkstra, Algorithm::Bfs, Algorithm::Greedy, Algorithm::Jps];
}

/// Every scorer an actor can blend: five search-backed strategies and four
/// reactive ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrategyKind {
    Random,
    MoveAway,
    MoveClose,
    WallDensity,
    AStar,
    Dijkstra,
    Bfs,
    Greedy,
    Jps,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 9] = [
        StrategyKind::Random,
        StrategyKind::MoveAway,
        StrategyKind::MoveClose,
        StrategyKind::WallDensity,
        StrategyKind::AStar,
        StrategyKind::Dijkstra,
        StrategyKind::Bfs,
        StrategyKind::Greedy,
        StrategyKind::Jps,
    ];

    pub fn algorithm(self) -> Option<Algorithm> {
        match self {
            StrategyKind::AStar => Some(Algorithm::AStar),
            StrategyKind::Dijkstra => Some(Algorithm::Dijkstra),
            StrategyKind::Bfs => Some(Algorithm::Bfs),
            StrategyKind::Greedy => Some(Algorithm::Greedy),
            StrategyKind::Jps => Some(Algorithm::Jps),
            StrategyKind::Random
            | StrategyKind::MoveAway
            | StrategyKind::MoveClose
            | StrategyKind::WallDensity => None,
        }
    }

    pub fn from_algorithm(algorithm: Algorithm) -> StrategyKind {
        match algorithm {
            Algorithm::AStar => StrategyKind::AStar,
            Algorithm::Dijkstra => StrategyKind::Dijkstra,
            Algorithm::Bfs => StrategyKind::Bfs,
            Algorithm::Greedy => StrategyKind::Greedy,
            Algorithm::Jps => StrategyKind::Jps,
        }
    }

    /// Configuration key for this strategy.
    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Random => "random",
            StrategyKind::MoveAway => "moveAway",
            StrategyKind::MoveClose => "moveClose",
            StrategyKind::WallDensity => "wallDensity",
            StrategyKind::AStar => "aStar",
            StrategyKind::Dijkstra => "dijkstra",
            StrategyKind::Bfs => "bfs",
            StrategyKind::Greedy => "greedy",
            StrategyKind::Jps => "jps",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = ChaseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(value))
            .ok_or_else(|| ChaseError::InvalidConfiguration(format!("unknown strategy `{value}`")))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum LogEvent {
    CheckpointVisited { checkpoint: CheckpointId, step: u32 },
    TunnelTraversed { role: Role, from: Pos, to: Pos, step: u32 },
    Trapped { role: Role, pos: Pos, step: u32 },
    MoveRejected { role: Role, action: Action, step: u32 },
    Finished { status: ChaseStatus, step: u32, score: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdvanceResult {
    pub simulated_steps: u32,
    pub status: ChaseStatus,
}
