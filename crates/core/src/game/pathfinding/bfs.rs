use std::collections::{BTreeMap, VecDeque};

use super::{Outcome, Parent, reconstruct};
use crate::map::PlanningView;
use crate::types::Pos;

/// FIFO layer expansion. Every step counts as one, so bush penalties are invisible here.
pub(super) fn search(view: &PlanningView<'_>, start: Pos, goal: Pos) -> Outcome {
    let mut came_from: BTreeMap<Pos, Parent> = BTreeMap::new();
    let mut queue = VecDeque::from([start]);
    let mut nodes_explored = 0u32;

    while let Some(current) = queue.pop_front() {
        nodes_explored += 1;
        if current == goal {
            return Outcome { path: reconstruct(&came_from, start, goal), nodes_explored };
        }
        for step in view.successors(current, goal) {
            let neighbor = step.landing;
            if neighbor == start || came_from.contains_key(&neighbor) {
                continue;
            }
            came_from.insert(neighbor, Parent { prev: current, via: step.via });
            queue.push_back(neighbor);
        }
    }

    Outcome::unreachable(nodes_explored)
}
