//! Jump point search for 4-connected uniform-cost grids.
//!
//! Horizontal runs stop at the goal or at a cell with a forced neighbour.
//! Vertical runs also stop wherever a horizontal scan from the cell would
//! find something, so turning points are never skipped.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::astar::{self, Heuristic};
use super::{OpenNode, Outcome, bfs};
use crate::config::JpsPolicy;
use crate::map::PlanningView;
use crate::types::{Action, Algorithm, Pos, manhattan};

/// What the reachable region looks like from `start`.
struct Survey {
    reachable: bool,
    mixed_cost: bool,
    tunnels: bool,
    nodes: u32,
}

fn survey(view: &PlanningView<'_>, start: Pos, goal: Pos) -> Survey {
    let grass = view.map().costs().grass;
    let mut result = Survey { reachable: false, mixed_cost: false, tunnels: false, nodes: 0 };
    let mut visited = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        result.nodes += 1;
        for step in view.successors(current, goal) {
            if step.via.is_some() {
                result.tunnels = true;
            } else if step.cost != grass {
                result.mixed_cost = true;
            }
            if step.landing == goal {
                result.reachable = true;
            }
            if visited.insert(step.landing) {
                queue.push_back(step.landing);
            }
        }
    }
    result
}

pub(super) fn search(
    view: &PlanningView<'_>,
    start: Pos,
    goal: Pos,
    policy: JpsPolicy,
) -> (Algorithm, Outcome) {
    let survey = survey(view, start, goal);
    if !survey.reachable {
        return (Algorithm::Jps, Outcome::unreachable(survey.nodes));
    }

    let (used, mut outcome) = match policy {
        JpsPolicy::FallbackToAStar if survey.mixed_cost || survey.tunnels => {
            (Algorithm::AStar, astar::search(view, start, goal, Heuristic::Manhattan))
        }
        JpsPolicy::UniformCost if survey.tunnels => (Algorithm::Bfs, bfs::search(view, start, goal)),
        _ => {
            let jumped = jump_search(view, start, goal);
            if jumped.path.is_some() {
                (Algorithm::Jps, jumped)
            } else {
                let mut fallback = bfs::search(view, start, goal);
                fallback.nodes_explored += jumped.nodes_explored;
                (Algorithm::Bfs, fallback)
            }
        }
    };
    outcome.nodes_explored += survey.nodes;
    if used != Algorithm::Jps {
        tracing::debug!(?used, "jump point search delegated");
    }
    (used, outcome)
}

fn jump_search(view: &PlanningView<'_>, start: Pos, goal: Pos) -> Outcome {
    let mut open_set = BTreeSet::new();
    let mut open_entries: BTreeMap<Pos, OpenNode> = BTreeMap::new();
    let mut came_from: BTreeMap<Pos, Pos> = BTreeMap::new();
    let mut g_score: BTreeMap<Pos, u32> = BTreeMap::new();
    let mut seq = 0u64;
    let mut nodes_explored = 0u32;

    let start_h = manhattan(start, goal);
    let start_node = OpenNode { f: start_h, h: start_h, seq, y: start.y, x: start.x };
    open_set.insert(start_node);
    open_entries.insert(start, start_node);
    g_score.insert(start, 0);

    while let Some(current_node) = open_set.pop_first() {
        let current = current_node.pos();
        open_entries.remove(&current);
        nodes_explored += 1;

        if current == goal {
            return Outcome { path: expand_jumps(&came_from, start, goal), nodes_explored };
        }
        let Some(current_g) = g_score.get(&current).copied() else {
            continue;
        };

        for action in Action::MOVES {
            let Some(jump_point) = jump(view, current, action, goal) else {
                continue;
            };
            let tentative_g = current_g.saturating_add(manhattan(current, jump_point));
            if tentative_g >= g_score.get(&jump_point).copied().unwrap_or(u32::MAX) {
                continue;
            }
            if let Some(existing_node) = open_entries.remove(&jump_point) {
                open_set.remove(&existing_node);
            }
            came_from.insert(jump_point, current);
            g_score.insert(jump_point, tentative_g);

            seq += 1;
            let h = manhattan(jump_point, goal);
            let node = OpenNode {
                f: tentative_g.saturating_add(h),
                h,
                seq,
                y: jump_point.y,
                x: jump_point.x,
            };
            open_set.insert(node);
            open_entries.insert(jump_point, node);
        }
    }

    Outcome::unreachable(nodes_explored)
}

fn open(view: &PlanningView<'_>, pos: Pos, goal: Pos) -> bool {
    view.is_passable(pos, goal)
}

fn shifted(pos: Pos, dy: i32, dx: i32) -> Pos {
    Pos { y: pos.y + dy, x: pos.x + dx }
}

fn jump(view: &PlanningView<'_>, from: Pos, action: Action, goal: Pos) -> Option<Pos> {
    let (dy, dx) = action.delta();
    let mut current = from;
    loop {
        let next = current.offset(action);
        if !open(view, next, goal) {
            return None;
        }
        if next == goal {
            return Some(next);
        }
        let stop = match action {
            Action::Left | Action::Right => [-1, 1].into_iter().any(|side| {
                open(view, shifted(next, side, 0), goal)
                    && !open(view, shifted(next, side, -dx), goal)
            }),
            Action::Up | Action::Down => {
                [-1, 1].into_iter().any(|side| {
                    open(view, shifted(next, 0, side), goal)
                        && !open(view, shifted(next, -dy, side), goal)
                }) || jump(view, next, Action::Left, goal).is_some()
                    || jump(view, next, Action::Right, goal).is_some()
            }
            Action::Stay => return None,
        };
        if stop {
            return Some(next);
        }
        current = next;
    }
}

/// Rebuilds the cell-by-cell path from the chain of jump points.
fn expand_jumps(came_from: &BTreeMap<Pos, Pos>, start: Pos, goal: Pos) -> Option<Vec<Pos>> {
    let mut jumps = vec![goal];
    let mut current = goal;
    while current != start {
        current = *came_from.get(&current)?;
        jumps.push(current);
    }
    jumps.reverse();

    let mut path = vec![start];
    for pair in jumps.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let step_y = (to.y - from.y).signum();
        let step_x = (to.x - from.x).signum();
        let mut cell = from;
        while cell != to {
            cell = shifted(cell, step_y, step_x);
            path.push(cell);
        }
    }
    Some(path)
}
