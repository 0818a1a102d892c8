//! Already-parsed run configuration and its validation rules.
//! Reading files is a collaborator concern; this module only checks values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ChaseError;
use crate::map::CostModel;
use crate::types::{Role, StrategyKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: usize,
    pub max: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSize {
    pub width: SizeRange,
    pub height: SizeRange,
}

impl Default for MapSize {
    fn default() -> Self {
        Self { width: SizeRange { min: 12, max: 16 }, height: SizeRange { min: 8, max: 12 } }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainProb {
    pub wall: f64,
    pub bush: f64,
}

impl Default for TerrainProb {
    fn default() -> Self {
        Self { wall: 0.25, bush: 0.2 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveCost {
    pub grass: u32,
    pub bush: u32,
}

impl Default for MoveCost {
    fn default() -> Self {
        Self { grass: 1, bush: 10 }
    }
}

pub type WeightMap = BTreeMap<StrategyKind, f64>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyWeights {
    pub agent: WeightMap,
    pub enemy: WeightMap,
}

impl Default for StrategyWeights {
    fn default() -> Self {
        Self {
            agent: BTreeMap::from([(StrategyKind::Random, 1.0)]),
            enemy: BTreeMap::from([
                (StrategyKind::Random, 0.2),
                (StrategyKind::AStar, 1.0),
                (StrategyKind::MoveClose, 0.1),
            ]),
        }
    }
}

/// How the enemy picks its next checkpoint while it still has one to visit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckpointRouting {
    /// Nearest unvisited checkpoint by Manhattan distance, A on ties.
    #[default]
    Nearest,
    /// A first, then B.
    InOrder,
}

/// What JPS does when the reachable region is not a uniform-cost grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JpsPolicy {
    /// Run A* instead whenever a reachable cell costs more than grass or a
    /// known tunnel is reachable.
    #[default]
    FallbackToAStar,
    /// Treat every passable cell as cost 1, the way BFS does. Known tunnels
    /// still route the search through BFS.
    UniformCost,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChaseConfig {
    pub max_steps: u32,
    pub map_size: MapSize,
    pub terrain_prob: TerrainProb,
    pub move_cost: MoveCost,
    pub tunnel_cost: u32,
    pub tunnel_pairs: usize,
    pub sensing_radius: i32,
    pub first_mover: Role,
    pub checkpoint_routing: CheckpointRouting,
    pub jps_policy: JpsPolicy,
    pub strategy_weights: StrategyWeights,
}

impl Default for ChaseConfig {
    fn default() -> Self {
        Self {
            max_steps: 500,
            map_size: MapSize::default(),
            terrain_prob: TerrainProb::default(),
            move_cost: MoveCost::default(),
            tunnel_cost: 1,
            tunnel_pairs: 2,
            sensing_radius: 1,
            first_mover: Role::Agent,
            checkpoint_routing: CheckpointRouting::default(),
            jps_policy: JpsPolicy::default(),
            strategy_weights: StrategyWeights::default(),
        }
    }
}

impl ChaseConfig {
    pub fn cost_model(&self) -> CostModel {
        CostModel { grass: self.move_cost.grass, bush: self.move_cost.bush, tunnel: self.tunnel_cost }
    }

    /// Replaces the enemy's blend with a single strategy at full weight.
    pub fn with_enemy_strategy(mut self, kind: StrategyKind) -> Self {
        self.strategy_weights.enemy = BTreeMap::from([(kind, 1.0)]);
        self
    }

    pub fn with_agent_strategy(mut self, kind: StrategyKind) -> Self {
        self.strategy_weights.agent = BTreeMap::from([(kind, 1.0)]);
        self
    }

    pub fn validate(&self) -> Result<(), ChaseError> {
        if self.max_steps == 0 {
            return Err(invalid("maxSteps must be positive"));
        }
        validate_size("width", self.map_size.width)?;
        validate_size("height", self.map_size.height)?;

        let TerrainProb { wall, bush } = self.terrain_prob;
        if !(0.0..=1.0).contains(&wall) || !(0.0..=1.0).contains(&bush) || wall + bush > 1.0 {
            return Err(invalid(format!(
                "terrain probabilities must lie in [0, 1] and sum to at most 1 (wall={wall}, bush={bush})"
            )));
        }
        if self.move_cost.grass == 0 || self.move_cost.bush == 0 || self.tunnel_cost == 0 {
            return Err(invalid("move and tunnel costs must be at least 1"));
        }
        if self.sensing_radius < 1 {
            return Err(invalid("sensingRadius must be at least 1"));
        }

        validate_weights(Role::Agent, &self.strategy_weights.agent)?;
        validate_weights(Role::Enemy, &self.strategy_weights.enemy)?;
        Ok(())
    }
}

fn validate_size(axis: &str, range: SizeRange) -> Result<(), ChaseError> {
    if range.min < 2 || range.min > range.max {
        return Err(invalid(format!(
            "map {axis} range must satisfy 1 < min <= max (got {}..={})",
            range.min, range.max
        )));
    }
    Ok(())
}

pub(crate) fn validate_weights(role: Role, weights: &WeightMap) -> Result<(), ChaseError> {
    for (kind, weight) in weights {
        if !weight.is_finite() || *weight < 0.0 {
            return Err(invalid(format!("{role:?} weight for {kind} must be finite and >= 0")));
        }
    }
    if weights.values().all(|weight| *weight == 0.0) {
        return Err(invalid(format!("{role:?} needs at least one strategy with positive weight")));
    }
    Ok(())
}

fn invalid(message: impl Into<String>) -> ChaseError {
    ChaseError::InvalidConfiguration(message.into())
}
