use std::collections::{BTreeMap, BTreeSet};

use super::{OpenNode, Outcome, Parent, reconstruct};
use crate::map::PlanningView;
use crate::types::{Pos, manhattan};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Heuristic {
    Manhattan,
    /// Dijkstra.
    Zero,
}

impl Heuristic {
    fn estimate(self, from: Pos, goal: Pos) -> u32 {
        match self {
            Heuristic::Manhattan => manhattan(from, goal),
            Heuristic::Zero => 0,
        }
    }
}

/// Best-first search on `f = g + h`, ties broken by lower `h` and then by
/// insertion order. Manhattan distance stops being admissible once a known
/// tunnel shortcuts the grid, so A* is only cost-optimal on tunnel-free views.
pub(super) fn search(
    view: &PlanningView<'_>,
    start: Pos,
    goal: Pos,
    heuristic: Heuristic,
) -> Outcome {
    let mut open_set = BTreeSet::new();
    let mut open_entries: BTreeMap<Pos, OpenNode> = BTreeMap::new();
    let mut came_from: BTreeMap<Pos, Parent> = BTreeMap::new();
    let mut g_score: BTreeMap<Pos, u32> = BTreeMap::new();
    let mut seq = 0u64;
    let mut nodes_explored = 0u32;

    let start_h = heuristic.estimate(start, goal);
    let start_node = OpenNode { f: start_h, h: start_h, seq, y: start.y, x: start.x };
    open_set.insert(start_node);
    open_entries.insert(start, start_node);
    g_score.insert(start, 0);

    while let Some(current_node) = open_set.pop_first() {
        let current = current_node.pos();
        open_entries.remove(&current);
        nodes_explored += 1;

        if current == goal {
            return Outcome { path: reconstruct(&came_from, start, goal), nodes_explored };
        }

        let Some(current_g) = g_score.get(&current).copied() else {
            continue;
        };

        for step in view.successors(current, goal) {
            let neighbor = step.landing;
            let tentative_g = current_g.saturating_add(step.cost);
            let existing_g = g_score.get(&neighbor).copied().unwrap_or(u32::MAX);
            if tentative_g >= existing_g {
                continue;
            }

            if let Some(existing_node) = open_entries.remove(&neighbor) {
                open_set.remove(&existing_node);
            }

            came_from.insert(neighbor, Parent { prev: current, via: step.via });
            g_score.insert(neighbor, tentative_g);

            seq += 1;
            let h = heuristic.estimate(neighbor, goal);
            let node =
                OpenNode { f: tentative_g.saturating_add(h), h, seq, y: neighbor.y, x: neighbor.x };
            open_set.insert(node);
            open_entries.insert(neighbor, node);
        }
    }

    Outcome::unreachable(nodes_explored)
}
