//! Search-backed scorers and the per-scorer path cache.

use super::{ActionLevels, DecisionContext, open_landing};
use crate::error::ChaseError;
use crate::game::pathfinding::find_path;
use crate::map::{PlanningView, Vision};
use crate::state::SearchMetric;
use crate::types::{Action, Algorithm, Pos, manhattan};

const CLOSER_LEVEL: f64 = 4.0;
const OPEN_LEVEL: f64 = 2.0;
const STAY_LEVEL: f64 = 1.0;

/// Last planned path plus the knowledge epochs it was planned under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct PathCache {
    target: Pos,
    path: Vec<Pos>,
    revision: u64,
    tunnel_revision: u64,
    algorithm_used: Algorithm,
}

impl PathCache {
    fn new(view: &PlanningView<'_>, target: Pos, path: Vec<Pos>, algorithm_used: Algorithm) -> Self {
        let (revision, tunnel_revision) = epochs(view);
        Self { target, path, revision, tunnel_revision, algorithm_used }
    }

    pub(super) fn path(&self) -> &[Pos] {
        &self.path
    }

    /// How much of the cached path still holds from the actor's cell. A wall
    /// or bush learned on it since planning only costs the stretch up to the
    /// last contradicted cell; the tail after it is kept.
    fn reuse(&self, ctx: &DecisionContext<'_>) -> Option<Reuse> {
        if self.target != ctx.target {
            return None;
        }
        let idx = self.path.iter().position(|cell| *cell == ctx.me)?;
        let rest = &self.path[idx..];
        if rest.len() < 2 {
            return None;
        }
        let intermediate = &rest[1..rest.len() - 1];
        if ctx.view.occupied().is_some_and(|other| intermediate.contains(&other)) {
            return None;
        }
        if let Vision::Discovered(mask) = ctx.view.vision() {
            if mask.tunnel_revision() != self.tunnel_revision {
                return None;
            }
            let contradicted: Vec<Pos> = mask.contradictions_since(self.revision).collect();
            if let Some(last) = rest[1..].iter().rposition(|cell| contradicted.contains(cell)) {
                let join = last + 2;
                if join >= rest.len() {
                    return None;
                }
                return Some(Reuse::Splice { tail: rest[join..].to_vec() });
            }
        }
        Some(Reuse::Intact { next: rest[1], steps: moves_in(rest) })
    }
}

enum Reuse {
    Intact { next: Pos, steps: u32 },
    /// Replan from the actor to `tail[0]`, then follow `tail`.
    Splice { tail: Vec<Pos> },
}

fn moves_in(path: &[Pos]) -> u32 {
    path.windows(2).filter(|pair| manhattan(pair[0], pair[1]) == 1).count() as u32
}

fn epochs(view: &PlanningView<'_>) -> (u64, u64) {
    match view.vision() {
        Vision::Full => (0, 0),
        Vision::Discovered(mask) => (mask.revision(), mask.tunnel_revision()),
    }
}

pub(super) fn score(
    ctx: &DecisionContext<'_>,
    algorithm: Algorithm,
    cache: &mut Option<PathCache>,
    searches: &mut Vec<SearchMetric>,
) -> Result<ActionLevels, ChaseError> {
    let cached_algorithm = cache.as_ref().map(|cached| cached.algorithm_used);
    match cache.as_ref().and_then(|cached| cached.reuse(ctx)) {
        Some(Reuse::Intact { next, steps }) => {
            searches.push(SearchMetric {
                role: ctx.role,
                algorithm,
                algorithm_used: cached_algorithm.unwrap_or(algorithm),
                nodes_explored: 0,
                path_len: Some(steps),
                reused: true,
            });
            return Ok(levels_toward(ctx, Action::between(ctx.me, next)));
        }
        Some(Reuse::Splice { tail }) => {
            let result = find_path(&ctx.view, ctx.me, tail[0], algorithm, ctx.jps_policy)?;
            if let Some(mut path) = result.path {
                path.extend_from_slice(&tail[1..]);
                tracing::debug!(role = ?ctx.role, rejoin = ?tail[0], "cached path spliced");
                searches.push(SearchMetric {
                    role: ctx.role,
                    algorithm,
                    algorithm_used: result.algorithm_used,
                    nodes_explored: result.nodes_explored,
                    path_len: Some(moves_in(&path)),
                    reused: false,
                });
                let first = path.get(1).and_then(|next| Action::between(ctx.me, *next));
                *cache = Some(PathCache::new(&ctx.view, ctx.target, path, result.algorithm_used));
                return Ok(levels_toward(ctx, first));
            }
        }
        None => {}
    }

    let result = find_path(&ctx.view, ctx.me, ctx.target, algorithm, ctx.jps_policy)?;
    searches.push(SearchMetric {
        role: ctx.role,
        algorithm,
        algorithm_used: result.algorithm_used,
        nodes_explored: result.nodes_explored,
        path_len: result.path.as_ref().map(|_| result.steps() as u32),
        reused: false,
    });
    let first = result.path.as_ref().map(|_| result.first_action());
    *cache = result
        .path
        .map(|path| PathCache::new(&ctx.view, ctx.target, path, result.algorithm_used));
    Ok(levels_toward(ctx, first))
}

/// Full marks for the planned first step, partial credit for other open moves
/// (more when they still close the distance), a token amount for `Stay`.
/// With no path, or already at the target, only `Stay` scores.
fn levels_toward(ctx: &DecisionContext<'_>, first: Option<Action>) -> ActionLevels {
    let mut levels = ActionLevels::default();
    let Some(first) = first.filter(|action| *action != Action::Stay) else {
        levels.set(Action::Stay, ActionLevels::MAX);
        return levels;
    };
    let distance = manhattan(ctx.me, ctx.target);
    for action in Action::MOVES {
        let Some(landing) = open_landing(&ctx.view, ctx.me, action) else {
            continue;
        };
        let level = if action == first {
            ActionLevels::MAX
        } else if manhattan(landing, ctx.target) < distance {
            CLOSER_LEVEL
        } else {
            OPEN_LEVEL
        };
        levels.set(action, level);
    }
    levels.set(first, ActionLevels::MAX);
    levels.set(Action::Stay, STAY_LEVEL);
    levels
}
