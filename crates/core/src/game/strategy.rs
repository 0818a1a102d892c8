//! Per-action scoring and weighted blending.
//! This module exists so every scorer, search-backed or reactive, feeds one
//! blending rule. It does not own move validation; the engine re-checks
//! whatever action comes out of here.

use rand_chacha::ChaCha8Rng;

use crate::config::{JpsPolicy, WeightMap, validate_weights};
use crate::error::ChaseError;
use crate::map::PlanningView;
use crate::state::SearchMetric;
use crate::types::{Action, Pos, Role, StrategyKind, Terrain};

mod pathing;
mod reactive;

use pathing::PathCache;

/// Desirability of each of the five actions, higher is better.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ActionLevels([f64; 5]);

impl ActionLevels {
    pub const MAX: f64 = 10.0;

    pub fn get(&self, action: Action) -> f64 {
        self.0[action.index()]
    }

    pub fn set(&mut self, action: Action, level: f64) {
        self.0[action.index()] = level;
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Scaled to sum to 1. All-zero levels stay all zero.
    pub fn normalized(&self) -> Self {
        let sum = self.sum();
        if sum <= 0.0 {
            return *self;
        }
        Self(self.0.map(|level| level / sum))
    }

    pub fn add_weighted(&mut self, other: &ActionLevels, weight: f64) {
        for (total, level) in self.0.iter_mut().zip(other.0) {
            *total += level * weight;
        }
    }

    /// Highest level, first in `Action::ALL` order on ties, so moves win over
    /// `Stay`. Falls back to `Stay` when nothing scores above zero.
    pub fn best(&self) -> Action {
        let mut best = Action::Stay;
        let mut best_level = 0.0;
        for action in Action::ALL {
            if self.get(action) > best_level {
                best = action;
                best_level = self.get(action);
            }
        }
        best
    }
}

/// Everything a scorer may read while one actor decides its move.
#[derive(Clone, Copy, Debug)]
pub struct DecisionContext<'a> {
    pub role: Role,
    pub me: Pos,
    pub other: Pos,
    pub target: Pos,
    pub view: PlanningView<'a>,
    pub jps_policy: JpsPolicy,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Decision {
    pub action: Action,
    pub levels: ActionLevels,
    pub searches: Vec<SearchMetric>,
}

#[derive(Clone, Debug)]
struct StrategySlot {
    kind: StrategyKind,
    weight: f64,
    cache: Option<PathCache>,
}

/// One actor's fixed set of weighted scorers.
#[derive(Clone, Debug)]
pub struct Blend {
    slots: Vec<StrategySlot>,
}

impl Blend {
    pub fn from_weights(role: Role, weights: &WeightMap) -> Result<Self, ChaseError> {
        validate_weights(role, weights)?;
        let slots = weights
            .iter()
            .filter(|(_, weight)| **weight > 0.0)
            .map(|(kind, weight)| StrategySlot { kind: *kind, weight: *weight, cache: None })
            .collect();
        Ok(Self { slots })
    }

    pub fn weights(&self) -> impl Iterator<Item = (StrategyKind, f64)> + '_ {
        self.slots.iter().map(|slot| (slot.kind, slot.weight))
    }

    /// Last path the given search-backed scorer planned, for display.
    pub fn cached_path(&self, kind: StrategyKind) -> Option<&[Pos]> {
        self.slots
            .iter()
            .find(|slot| slot.kind == kind)
            .and_then(|slot| slot.cache.as_ref())
            .map(PathCache::path)
    }

    pub fn decide(
        &mut self,
        ctx: &DecisionContext<'_>,
        rng: &mut ChaCha8Rng,
    ) -> Result<Decision, ChaseError> {
        let mut levels = ActionLevels::default();
        let mut searches = Vec::new();
        for slot in &mut self.slots {
            let scored = match slot.kind.algorithm() {
                Some(algorithm) => pathing::score(ctx, algorithm, &mut slot.cache, &mut searches)?,
                None => reactive::score(slot.kind, ctx, rng),
            };
            levels.add_weighted(&scored.normalized(), slot.weight);
        }
        Ok(Decision { action: levels.best(), levels, searches })
    }
}

/// Where `action` would leave an actor at `from`, or `None` when the
/// destination is off the grid or a wall the view knows about.
fn open_landing(view: &PlanningView<'_>, from: Pos, action: Action) -> Option<Pos> {
    if action == Action::Stay {
        return Some(from);
    }
    let next = from.offset(action);
    match view.believed_terrain(next)? {
        Terrain::Wall => None,
        Terrain::Grass | Terrain::Bush => Some(view.landing(next)),
    }
}
