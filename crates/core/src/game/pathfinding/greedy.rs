use std::collections::{BTreeMap, BTreeSet};

use super::{Outcome, Parent, reconstruct};
use crate::map::PlanningView;
use crate::types::{Pos, manhattan};

/// Always expands the cell that looks closest to the goal. Each cell is queued
/// at most once, which bounds the search by the cell count even inside
/// heuristic dead ends such as a U-shaped wall.
pub(super) fn search(view: &PlanningView<'_>, start: Pos, goal: Pos) -> Outcome {
    let mut open_set: BTreeSet<(u32, u64, Pos)> = BTreeSet::new();
    let mut seen = BTreeSet::from([start]);
    let mut came_from: BTreeMap<Pos, Parent> = BTreeMap::new();
    let mut seq = 0u64;
    let mut nodes_explored = 0u32;

    open_set.insert((manhattan(start, goal), seq, start));
    while let Some((_, _, current)) = open_set.pop_first() {
        nodes_explored += 1;
        if current == goal {
            return Outcome { path: reconstruct(&came_from, start, goal), nodes_explored };
        }
        for step in view.successors(current, goal) {
            let neighbor = step.landing;
            if !seen.insert(neighbor) {
                continue;
            }
            came_from.insert(neighbor, Parent { prev: current, via: step.via });
            seq += 1;
            open_set.insert((manhattan(neighbor, goal), seq, neighbor));
        }
    }

    Outcome::unreachable(nodes_explored)
}
