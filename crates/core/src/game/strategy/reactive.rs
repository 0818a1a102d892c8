//! Scorers that read local geometry only and never search.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::Rng;

use super::{ActionLevels, DecisionContext, open_landing};
use crate::map::PlanningView;
use crate::types::{Action, Pos, StrategyKind, Terrain, manhattan};

/// Half-width of the window `WallDensity` inspects in each direction.
const DENSITY_RANGE: i32 = 5;

pub(super) fn score(kind: StrategyKind, ctx: &DecisionContext<'_>, rng: &mut ChaCha8Rng) -> ActionLevels {
    match kind {
        StrategyKind::Random => random(ctx, rng),
        StrategyKind::MoveAway => by_distance(ctx, 1.0),
        StrategyKind::MoveClose => by_distance(ctx, -1.0),
        StrategyKind::WallDensity => wall_density(ctx),
        StrategyKind::AStar
        | StrategyKind::Dijkstra
        | StrategyKind::Bfs
        | StrategyKind::Greedy
        | StrategyKind::Jps => ActionLevels::default(),
    }
}

/// Integer noise in `0..=MAX` on open moves, with the luckiest one lifted to `MAX`.
fn random(ctx: &DecisionContext<'_>, rng: &mut ChaCha8Rng) -> ActionLevels {
    let mut levels = ActionLevels::default();
    let mut luckiest: Option<Action> = None;
    for action in Action::MOVES {
        let roll = (rng.next_u64() % (ActionLevels::MAX as u64 + 1)) as f64;
        if open_landing(&ctx.view, ctx.me, action).is_none() {
            continue;
        }
        levels.set(action, roll);
        if luckiest.is_none_or(|best| roll > levels.get(best)) {
            luckiest = Some(action);
        }
    }
    if let Some(action) = luckiest {
        levels.set(action, ActionLevels::MAX);
    }
    levels
}

/// `sign = 1` rewards growing the distance to the other actor, `-1` rewards
/// shrinking it. Standing still sits halfway.
fn by_distance(ctx: &DecisionContext<'_>, sign: f64) -> ActionLevels {
    let mut levels = ActionLevels::default();
    let current = f64::from(manhattan(ctx.me, ctx.other));
    for action in Action::ALL {
        let Some(landing) = open_landing(&ctx.view, ctx.me, action) else {
            continue;
        };
        let delta = f64::from(manhattan(landing, ctx.other)) - current;
        let level = ActionLevels::MAX / 2.0 * (1.0 + sign * delta);
        levels.set(action, level.clamp(0.0, ActionLevels::MAX));
    }
    levels
}

fn wall_density(ctx: &DecisionContext<'_>) -> ActionLevels {
    let mut levels = ActionLevels::default();
    for action in Action::MOVES {
        if open_landing(&ctx.view, ctx.me, action).is_none() {
            continue;
        }
        levels.set(action, (1.0 - density(&ctx.view, ctx.me, action)) * ActionLevels::MAX);
    }
    levels
}

/// Share of blocking cells in the half-window on `action`'s side of `center`.
/// Off-grid cells and walls the view knows about both count as blocking.
fn density(view: &PlanningView<'_>, center: Pos, action: Action) -> f64 {
    let r = DENSITY_RANGE;
    let (ys, xs) = match action {
        Action::Up => (-r..=-1, -r..=r),
        Action::Down => (1..=r, -r..=r),
        Action::Left => (-r..=r, -r..=-1),
        Action::Right => (-r..=r, 1..=r),
        Action::Stay => return 1.0,
    };
    let (mut total, mut blocked) = (1u32, 1u32);
    for dy in ys {
        for dx in xs.clone() {
            total += 1;
            let cell = Pos { y: center.y + dy, x: center.x + dx };
            if matches!(view.believed_terrain(cell), None | Some(Terrain::Wall)) {
                blocked += 1;
            }
        }
    }
    f64::from(blocked) / f64::from(total)
}
