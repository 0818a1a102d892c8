//! The agent and the enemy as two configurations of one controller.
//! This module exists so target resolution and vision policy live next to the
//! blended strategy they feed. It does not own movement rules.

use std::cmp::Reverse;

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use super::discovery::DiscoveryMask;
use super::pathfinding::reachable_cells;
use super::strategy::{Blend, Decision, DecisionContext};
use crate::config::{ChaseConfig, CheckpointRouting};
use crate::error::ChaseError;
use crate::map::{Map, PlanningView};
use crate::state::{Checkpoints, CheckpointProgress, TurnState};
use crate::types::{CheckpointId, Pos, Role, manhattan};

/// What an actor can see while planning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Sight {
    Full,
    Fogged(DiscoveryMask),
}

impl Sight {
    pub fn view<'a>(&'a self, map: &'a Map) -> PlanningView<'a> {
        match self {
            Sight::Full => PlanningView::full(map),
            Sight::Fogged(mask) => PlanningView::discovered(map, mask),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Actor {
    role: Role,
    blend: Blend,
    rng: ChaCha8Rng,
    sight: Sight,
}

impl Actor {
    /// The agent sees everything; the enemy starts knowing nothing.
    pub fn new(role: Role, blend: Blend, seed: u64, map: &Map) -> Self {
        let sight = match role {
            Role::Agent => Sight::Full,
            Role::Enemy => Sight::Fogged(DiscoveryMask::new(map.width(), map.height())),
        };
        Self { role, blend, rng: ChaCha8Rng::seed_from_u64(seed), sight }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn blend(&self) -> &Blend {
        &self.blend
    }

    pub fn mask(&self) -> Option<&DiscoveryMask> {
        match &self.sight {
            Sight::Full => None,
            Sight::Fogged(mask) => Some(mask),
        }
    }

    pub fn mask_mut(&mut self) -> Option<&mut DiscoveryMask> {
        match &mut self.sight {
            Sight::Full => None,
            Sight::Fogged(mask) => Some(mask),
        }
    }

    pub fn view<'a>(&'a self, map: &'a Map) -> PlanningView<'a> {
        self.sight.view(map)
    }

    /// Where this actor is heading this turn.
    pub fn resolve_target(
        &self,
        map: &Map,
        state: &TurnState,
        checkpoints: &Checkpoints,
        routing: CheckpointRouting,
    ) -> Pos {
        match self.role {
            Role::Enemy => next_checkpoint(state.enemy.pos, &state.progress, checkpoints, routing)
                .map_or(state.agent.pos, |id| checkpoints.cell(id)),
            Role::Agent => {
                let view = self.view(map).with_occupied(state.enemy.pos);
                farthest_refuge(&view, state.agent.pos, state.enemy.pos)
            }
        }
    }

    pub fn decide(
        &mut self,
        map: &Map,
        state: &TurnState,
        checkpoints: &Checkpoints,
        config: &ChaseConfig,
    ) -> Result<Decision, ChaseError> {
        let target = self.resolve_target(map, state, checkpoints, config.checkpoint_routing);
        let me = state.actor(self.role).pos;
        let other = state.actor(self.role.other()).pos;
        // Borrows only `sight`, leaving `blend` and `rng` free below.
        let view = self.sight.view(map).with_occupied(other);
        let ctx = DecisionContext {
            role: self.role,
            me,
            other,
            target,
            view,
            jps_policy: config.jps_policy,
        };
        self.blend.decide(&ctx, &mut self.rng)
    }
}

/// Unvisited checkpoint the enemy should head for, `None` once both are done.
pub fn next_checkpoint(
    enemy: Pos,
    progress: &CheckpointProgress,
    checkpoints: &Checkpoints,
    routing: CheckpointRouting,
) -> Option<CheckpointId> {
    let mut pending = [CheckpointId::A, CheckpointId::B]
        .into_iter()
        .filter(|id| !progress.visited(*id));
    match routing {
        CheckpointRouting::InOrder => pending.next(),
        CheckpointRouting::Nearest => pending.min_by_key(|id| manhattan(enemy, checkpoints.cell(*id))),
    }
}

/// Reachable resting cell farthest from the enemy; ties go to the cell
/// closest to the agent, then to the first in row-major order.
fn farthest_refuge(view: &PlanningView<'_>, agent: Pos, enemy: Pos) -> Pos {
    reachable_cells(view, agent)
        .into_iter()
        .filter(|cell| *cell == agent || view.known_tunnel(*cell).is_none())
        .max_by_key(|cell| (manhattan(*cell, enemy), Reverse(manhattan(*cell, agent)), Reverse(*cell)))
        .unwrap_or(agent)
}
