pub mod config;
pub mod error;
pub mod game;
pub mod map;
pub mod mapgen;
pub mod state;
pub mod types;

pub use config::{ChaseConfig, CheckpointRouting, JpsPolicy, WeightMap};
pub use error::ChaseError;
pub use game::Game;
pub use game::discovery::DiscoveryMask;
pub use game::pathfinding::{SearchResult, find_path, path_cost, reachable_cells};
pub use game::strategy::{ActionLevels, Blend};
pub use map::{CostModel, Map, PlanningView};
pub use mapgen::{Layout, generate_layout};
pub use state::{Checkpoints, GameSummary, SearchMetric, TurnRecord, TurnSnapshot, TurnState};
pub use types::*;
