//! Role, checkpoint and tunnel placement on a rolled map.

use std::collections::BTreeSet;

use super::seed::random_usize;
use crate::error::ChaseError;
use crate::map::Map;
use crate::state::Checkpoints;
use crate::types::{Pos, Terrain, manhattan};

const PLACEMENT_STREAM: u64 = 100_000;
const TUNNEL_STREAM: u64 = 200_000;

pub(super) struct Placement {
    pub(super) agent: Pos,
    pub(super) enemy: Pos,
    pub(super) checkpoints: Checkpoints,
}

/// Draws without replacement from `pool`, removing the chosen cell.
fn draw(pool: &mut Vec<Pos>, seed: u64, stream: u64) -> Option<Pos> {
    if pool.is_empty() {
        return None;
    }
    let idx = random_usize(seed, stream, 0, pool.len() - 1);
    Some(pool.remove(idx))
}

/// Agent, enemy and both checkpoints on four distinct cells of `blanks`.
pub(super) fn place_roles(seed: u64, blanks: &BTreeSet<Pos>) -> Option<Placement> {
    let mut pool: Vec<Pos> = blanks.iter().copied().collect();
    let agent = draw(&mut pool, seed, PLACEMENT_STREAM)?;
    let enemy = draw(&mut pool, seed, PLACEMENT_STREAM + 1)?;
    let a = draw(&mut pool, seed, PLACEMENT_STREAM + 2)?;
    let b = draw(&mut pool, seed, PLACEMENT_STREAM + 3)?;
    Some(Placement { agent, enemy, checkpoints: Checkpoints { a, b } })
}

/// Links up to `pairs` tunnels between grass cells not in `reserved`. Stops
/// early once no non-adjacent partner is left.
pub(super) fn place_tunnels(
    map: &mut Map,
    seed: u64,
    pairs: usize,
    reserved: &[Pos],
) -> Result<usize, ChaseError> {
    let mut pool: Vec<Pos> = map
        .cells()
        .filter(|cell| map.terrain(*cell) == Ok(Terrain::Grass) && !reserved.contains(cell))
        .collect();
    let mut stream = TUNNEL_STREAM;
    let mut placed = 0;
    while placed < pairs {
        let Some(src) = draw(&mut pool, seed, stream) else {
            break;
        };
        stream += 1;
        let mut partners: Vec<Pos> =
            pool.iter().copied().filter(|cell| manhattan(*cell, src) > 1).collect();
        let Some(dst) = draw(&mut partners, seed, stream) else {
            break;
        };
        stream += 1;
        pool.retain(|cell| *cell != dst);
        map.add_tunnel(src, dst)?;
        placed += 1;
    }
    Ok(placed)
}
