//! Shortest-path and heuristic searches over a planning view.
//! This module exists so every search shares one path shape, one cost rule
//! and one metric record. It does not own target selection or action scoring.
//!
//! Paths are inclusive of both ends. A tunnel traversal shows up as the
//! entrance cell followed directly by its partner, so every consecutive pair
//! is either grid-adjacent or a tunnel pair.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::config::JpsPolicy;
use crate::error::ChaseError;
use crate::map::PlanningView;
use crate::types::{Action, Algorithm, Pos, manhattan};

mod astar;
mod bfs;
mod greedy;
mod jps;


use astar::Heuristic;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenNode {
    f: u32,
    h: u32,
    seq: u64,
    y: i32,
    x: i32,
}

impl OpenNode {
    fn pos(&self) -> Pos {
        Pos { y: self.y, x: self.x }
    }
}

/// How a search reached a resting cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Parent {
    prev: Pos,
    via: Option<Pos>,
}

struct Outcome {
    path: Option<Vec<Pos>>,
    nodes_explored: u32,
}

impl Outcome {
    fn unreachable(nodes_explored: u32) -> Self {
        Self { path: None, nodes_explored }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub start: Pos,
    pub goal: Pos,
    pub algorithm: Algorithm,
    /// Differs from `algorithm` when JPS hands the request to another search.
    pub algorithm_used: Algorithm,
    pub path: Option<Vec<Pos>>,
    /// Executable actions along `path`; tunnel hops are implied by the step
    /// onto the entrance and produce no action of their own.
    pub moves: Vec<Action>,
    /// Terrain cost of `path` as the searching view believes it.
    pub cost: Option<u32>,
    pub nodes_explored: u32,
}

impl SearchResult {
    pub fn is_reachable(&self) -> bool {
        self.path.is_some()
    }

    pub fn first_action(&self) -> Action {
        self.moves.first().copied().unwrap_or(Action::Stay)
    }

    pub fn steps(&self) -> usize {
        self.moves.len()
    }

    pub fn require_path(&self) -> Result<&[Pos], ChaseError> {
        self.path
            .as_deref()
            .ok_or(ChaseError::Unreachable { start: self.start, goal: self.goal })
    }
}

/// Runs `algorithm` from `start` to `goal` under `view`.
///
/// Both ends must be in bounds. An unreachable goal is a normal result, not an error.
pub fn find_path(
    view: &PlanningView<'_>,
    start: Pos,
    goal: Pos,
    algorithm: Algorithm,
    jps_policy: JpsPolicy,
) -> Result<SearchResult, ChaseError> {
    view.map().terrain(start)?;
    view.map().terrain(goal)?;

    let (algorithm_used, outcome) = if start == goal {
        (algorithm, Outcome { path: Some(vec![start]), nodes_explored: 0 })
    } else if !view.is_passable(goal, goal) {
        (algorithm, Outcome::unreachable(0))
    } else {
        match algorithm {
            Algorithm::AStar => (algorithm, astar::search(view, start, goal, Heuristic::Manhattan)),
            Algorithm::Dijkstra => (algorithm, astar::search(view, start, goal, Heuristic::Zero)),
            Algorithm::Bfs => (algorithm, bfs::search(view, start, goal)),
            Algorithm::Greedy => (algorithm, greedy::search(view, start, goal)),
            Algorithm::Jps => jps::search(view, start, goal, jps_policy),
        }
    };

    let moves = outcome.path.as_deref().map(moves_along).unwrap_or_default();
    let cost = outcome.path.as_deref().and_then(|path| path_cost(view, path));
    tracing::debug!(
        ?algorithm,
        ?algorithm_used,
        from = ?start,
        to = ?goal,
        nodes = outcome.nodes_explored,
        reachable = outcome.path.is_some(),
        "path search finished"
    );
    Ok(SearchResult {
        start,
        goal,
        algorithm,
        algorithm_used,
        path: outcome.path,
        moves,
        cost,
        nodes_explored: outcome.nodes_explored,
    })
}

/// Total cost of walking `path` under `view`: each entered cell costs its
/// believed terrain cost, a tunnel entrance costs the tunnel cost and the hop
/// to its partner is free. `None` when the path is not walkable.
pub fn path_cost(view: &PlanningView<'_>, path: &[Pos]) -> Option<u32> {
    let mut total = 0u32;
    let mut idx = 1;
    while idx < path.len() {
        let (prev, cell) = (path[idx - 1], path[idx]);
        if manhattan(prev, cell) != 1 {
            return None;
        }
        if let Some(&landing) = path.get(idx + 1)
            && manhattan(cell, landing) > 1
        {
            if view.known_tunnel(cell) != Some(landing) {
                return None;
            }
            total = total.saturating_add(view.map().costs().tunnel);
            idx += 2;
            continue;
        }
        total = total.saturating_add(view.believed_cost(cell)?);
        idx += 1;
    }
    Some(total)
}

/// Resting cells reachable from `start` under `view`, `start` included.
pub fn reachable_cells(view: &PlanningView<'_>, start: Pos) -> BTreeSet<Pos> {
    let mut visited = BTreeSet::new();
    if !view.in_bounds(start) {
        return visited;
    }
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);
    while let Some(current) = queue.pop_front() {
        for step in view.successors(current, start) {
            if visited.insert(step.landing) {
                queue.push_back(step.landing);
            }
        }
    }
    visited
}

fn moves_along(path: &[Pos]) -> Vec<Action> {
    path.windows(2)
        .filter(|pair| manhattan(pair[0], pair[1]) == 1)
        .filter_map(|pair| Action::between(pair[0], pair[1]))
        .collect()
}

fn reconstruct(came_from: &BTreeMap<Pos, Parent>, start: Pos, goal: Pos) -> Option<Vec<Pos>> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        let parent = came_from.get(&current)?;
        if let Some(via) = parent.via {
            path.push(via);
        }
        current = parent.prev;
        path.push(current);
    }
    path.reverse();
    Some(path)
}
