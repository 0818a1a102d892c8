//! Procedural layout generation: terrain, role and checkpoint placement, tunnels.
//! Every draw is a pure function of the game seed, so equal seeds give equal layouts.

mod placement;
mod seed;
mod terrain;

use std::collections::BTreeSet;
use std::hash::Hasher;

use xxhash_rust::xxh3::Xxh3;

use crate::config::ChaseConfig;
use crate::error::ChaseError;
use crate::map::Map;
use crate::state::Checkpoints;
use crate::types::{Pos, Terrain};

pub use seed::derive_actor_seed;

/// Attempts before generation gives up on a configuration.
pub const MAX_ATTEMPTS: u32 = 100;
/// Agent, enemy and both checkpoints each need their own grass cell.
const MIN_BLANKS: usize = 4;

const WIDTH_STREAM: u64 = 1;
const HEIGHT_STREAM: u64 = 2;

/// A starting position for one game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    pub map: Map,
    pub agent: Pos,
    pub enemy: Pos,
    pub checkpoints: Checkpoints,
}

impl Layout {
    /// Roles and checkpoints must sit on distinct, in-bounds, non-wall cells.
    pub fn validate(&self) -> Result<(), ChaseError> {
        let named = [
            ("agent", self.agent),
            ("enemy", self.enemy),
            ("checkpoint A", self.checkpoints.a),
            ("checkpoint B", self.checkpoints.b),
        ];
        for (idx, (name, pos)) in named.iter().enumerate() {
            let terrain = self.map.terrain(*pos).map_err(|_| {
                ChaseError::InvalidConfiguration(format!(
                    "{name} at ({}, {}) is outside the map",
                    pos.x, pos.y
                ))
            })?;
            if terrain == Terrain::Wall {
                return Err(ChaseError::InvalidConfiguration(format!(
                    "{name} at ({}, {}) is on a wall",
                    pos.x, pos.y
                )));
            }
            if let Some((other, _)) = named[..idx].iter().find(|(_, earlier)| earlier == pos) {
                return Err(ChaseError::InvalidConfiguration(format!(
                    "{name} shares its cell with the {other}"
                )));
            }
        }
        Ok(())
    }

    pub fn fingerprint(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write(&self.map.canonical_bytes());
        for pos in [self.agent, self.enemy, self.checkpoints.a, self.checkpoints.b] {
            hasher.write_i32(pos.y);
            hasher.write_i32(pos.x);
        }
        hasher.finish()
    }
}

pub struct MapGenerator<'a> {
    game_seed: u64,
    config: &'a ChaseConfig,
}

impl<'a> MapGenerator<'a> {
    pub fn new(game_seed: u64, config: &'a ChaseConfig) -> Self {
        Self { game_seed, config }
    }

    pub fn generate(&self) -> Result<Layout, ChaseError> {
        self.config.validate()?;
        for attempt in 0..MAX_ATTEMPTS {
            if let Some(layout) = self.try_attempt(attempt)? {
                tracing::debug!(
                    seed = self.game_seed,
                    attempt,
                    width = layout.map.width(),
                    height = layout.map.height(),
                    tunnels = layout.map.tunnel_pairs().count(),
                    "layout generated"
                );
                return Ok(layout);
            }
        }
        Err(ChaseError::InvalidConfiguration(format!(
            "no playable layout after {MAX_ATTEMPTS} attempts; lower the wall probability or enlarge the map"
        )))
    }

    fn try_attempt(&self, attempt: u32) -> Result<Option<Layout>, ChaseError> {
        let attempt_seed = seed::derive_attempt_seed(self.game_seed, attempt);
        let size = self.config.map_size;
        let width = seed::random_usize(attempt_seed, WIDTH_STREAM, size.width.min, size.width.max);
        let height =
            seed::random_usize(attempt_seed, HEIGHT_STREAM, size.height.min, size.height.max);

        let cells = terrain::roll_terrain(attempt_seed, width, height, self.config.terrain_prob);
        let mut map = Map::from_terrain(width, height, cells, self.config.cost_model())?;

        let blanks: BTreeSet<Pos> = terrain::largest_open_region(&map)
            .into_iter()
            .filter(|cell| map.terrain(*cell) == Ok(Terrain::Grass))
            .collect();
        if blanks.len() < MIN_BLANKS {
            return Ok(None);
        }
        let Some(placement) = placement::place_roles(attempt_seed, &blanks) else {
            return Ok(None);
        };

        let reserved =
            [placement.agent, placement.enemy, placement.checkpoints.a, placement.checkpoints.b];
        placement::place_tunnels(&mut map, attempt_seed, self.config.tunnel_pairs, &reserved)?;

        Ok(Some(Layout {
            map,
            agent: placement.agent,
            enemy: placement.enemy,
            checkpoints: placement.checkpoints,
        }))
    }
}

pub fn generate_layout(game_seed: u64, config: &ChaseConfig) -> Result<Layout, ChaseError> {
    MapGenerator::new(game_seed, config).generate()
}
