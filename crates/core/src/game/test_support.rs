//! Shared test fixtures for the `game` submodule test suites.
//! This module exists to avoid repeating layout and config setup across many tests.
//! It does not own production gameplay logic.

use super::*;

pub(super) fn p(y: i32, x: i32) -> Pos {
    Pos { y, x }
}

pub(super) fn layout(rows: &[&str], agent: Pos, enemy: Pos, a: Pos, b: Pos) -> Layout {
    Layout {
        map: Map::from_rows(rows).expect("fixture rows are valid"),
        agent,
        enemy,
        checkpoints: Checkpoints { a, b },
    }
}

/// Single-strategy blends for both roles, enemy moving first.
pub(super) fn duel_config(agent: StrategyKind, enemy: StrategyKind) -> ChaseConfig {
    let mut config =
        ChaseConfig::default().with_agent_strategy(agent).with_enemy_strategy(enemy);
    config.first_mover = Role::Enemy;
    config
}

pub(super) fn game_on(layout: Layout, config: ChaseConfig) -> Game {
    Game::from_layout(7, config, layout).expect("fixture game is valid")
}

pub(super) fn records_for(game: &Game, role: Role) -> Vec<&TurnRecord> {
    game.history().iter().filter(|record| record.role == role).collect()
}
