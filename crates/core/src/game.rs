//! One chase instance: the static map, both actor controllers, and the turn state.
//! Each `Game` owns everything it mutates, so independent games never share state.

use crate::config::ChaseConfig;
use crate::error::ChaseError;
use crate::map::Map;
use crate::mapgen::{Layout, derive_actor_seed, generate_layout};
use crate::state::{Checkpoints, GameSummary, TurnRecord, TurnSnapshot, TurnState};
use crate::types::*;

pub mod actor;
pub mod discovery;
pub mod pathfinding;
pub mod strategy;

mod engine;
mod hash;

#[cfg(test)]
mod test_support;

use actor::Actor;
use discovery::DiscoveryMask;
use strategy::Blend;

pub struct Game {
    seed: u64,
    config: ChaseConfig,
    map: Map,
    checkpoints: Checkpoints,
    agent: Actor,
    enemy: Actor,
    state: TurnState,
    log: Vec<LogEvent>,
    history: Vec<TurnRecord>,
}

impl Game {
    /// Generates a layout from `seed` and starts a game on it.
    pub fn new(seed: u64, config: ChaseConfig) -> Result<Self, ChaseError> {
        let layout = generate_layout(seed, &config)?;
        Self::from_layout(seed, config, layout)
    }

    /// Starts a game on a prepared layout. The map's costs are replaced by the
    /// configured ones.
    pub fn from_layout(seed: u64, config: ChaseConfig, layout: Layout) -> Result<Self, ChaseError> {
        config.validate()?;
        layout.validate()?;
        let Layout { map, agent, enemy, checkpoints } = layout;
        let map = map.with_costs(config.cost_model());

        let agent_blend = Blend::from_weights(Role::Agent, &config.strategy_weights.agent)?;
        let enemy_blend = Blend::from_weights(Role::Enemy, &config.strategy_weights.enemy)?;
        let agent_actor =
            Actor::new(Role::Agent, agent_blend, derive_actor_seed(seed, Role::Agent), &map);
        let enemy_actor =
            Actor::new(Role::Enemy, enemy_blend, derive_actor_seed(seed, Role::Enemy), &map);

        let mut game = Self {
            seed,
            state: TurnState::new(agent, enemy, config.first_mover),
            config,
            map,
            checkpoints,
            agent: agent_actor,
            enemy: enemy_actor,
            log: Vec::new(),
            history: Vec::new(),
        };
        game.sense_around_enemy();
        tracing::debug!(
            seed,
            width = game.map.width(),
            height = game.map.height(),
            ?agent,
            ?enemy,
            "game started"
        );
        Ok(game)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &ChaseConfig {
        &self.config
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn checkpoints(&self) -> Checkpoints {
        self.checkpoints
    }

    pub fn state(&self) -> &TurnState {
        &self.state
    }

    pub fn status(&self) -> ChaseStatus {
        self.state.status
    }

    pub fn is_over(&self) -> bool {
        self.state.status.is_terminal()
    }

    pub fn log(&self) -> &[LogEvent] {
        &self.log
    }

    pub fn history(&self) -> &[TurnRecord] {
        &self.history
    }

    pub fn enemy_discovery(&self) -> Option<&DiscoveryMask> {
        self.enemy.mask()
    }

    /// Tunnel cells the enemy has learned about.
    pub fn discovered_tunnels(&self) -> Vec<Pos> {
        self.enemy
            .mask()
            .map(|mask| mask.known_tunnel_cells().collect())
            .unwrap_or_default()
    }

    /// Most recent path planned by `kind` for `role`, if that scorer is in its blend.
    pub fn planned_path(&self, role: Role, kind: StrategyKind) -> Option<&[Pos]> {
        self.actor(role).blend().cached_path(kind)
    }

    pub fn snapshot(&self) -> TurnSnapshot {
        TurnSnapshot {
            step: self.state.step,
            score: self.state.score(),
            status: self.state.status,
            agent: self.state.agent,
            enemy: self.state.enemy,
            checkpoints: self.checkpoints,
            visited_a: self.state.progress.visited_a(),
            visited_b: self.state.progress.visited_b(),
            discovered_tunnels: self.discovered_tunnels(),
        }
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            seed: self.seed,
            status: self.state.status,
            steps: self.state.step,
            good_steps: self.state.good_steps,
            score: self.state.score(),
            searches: self.history.iter().flat_map(|record| record.searches.iter().copied()).collect(),
        }
    }

    fn actor(&self, role: Role) -> &Actor {
        match role {
            Role::Agent => &self.agent,
            Role::Enemy => &self.enemy,
        }
    }

    fn sense_around_enemy(&mut self) {
        let center = self.state.enemy.pos;
        let radius = self.config.sensing_radius;
        if let Some(mask) = self.enemy.mask_mut() {
            mask.reveal_radius(&self.map, center, radius);
        }
    }
}
