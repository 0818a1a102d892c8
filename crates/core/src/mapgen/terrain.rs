//! Terrain rolling and connectivity analysis.

use std::collections::{BTreeSet, VecDeque};

use super::seed::random_unit;
use crate::config::TerrainProb;
use crate::map::Map;
use crate::types::{Action, Pos, Terrain};

const TERRAIN_STREAM: u64 = 1_000;

pub(super) fn roll_terrain(seed: u64, width: usize, height: usize, prob: TerrainProb) -> Vec<Terrain> {
    (0..width * height)
        .map(|idx| {
            let roll = random_unit(seed, TERRAIN_STREAM + idx as u64);
            if roll < prob.wall {
                Terrain::Wall
            } else if roll < prob.wall + prob.bush {
                Terrain::Bush
            } else {
                Terrain::Grass
            }
        })
        .collect()
}

/// Largest 4-connected region of non-wall cells. Earlier regions in row-major
/// order win ties.
pub(super) fn largest_open_region(map: &Map) -> BTreeSet<Pos> {
    let mut seen = BTreeSet::new();
    let mut best = BTreeSet::new();
    for cell in map.cells() {
        if map.is_blocking(cell) || seen.contains(&cell) {
            continue;
        }
        let mut region = BTreeSet::from([cell]);
        let mut queue = VecDeque::from([cell]);
        while let Some(current) = queue.pop_front() {
            for action in Action::MOVES {
                let next = current.offset(action);
                if !map.is_blocking(next) && region.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen.extend(region.iter().copied());
        if region.len() > best.len() {
            best = region;
        }
    }
    best
}
