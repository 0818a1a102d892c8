use super::*;
use crate::config::CheckpointRouting;
use crate::game::test_support::*;

#[test]
fn enemy_senses_its_surroundings_before_the_first_turn() {
    let game = game_on(
        layout(&[".....", ".....", "....."], p(0, 4), p(1, 1), p(2, 3), p(2, 4)),
        duel_config(StrategyKind::MoveAway, StrategyKind::AStar),
    );
    let mask = game.enemy_discovery().expect("enemy has a mask");
    assert_eq!(mask.discovered_count(), 9);
    assert!(mask.is_discovered(p(0, 0)) && !mask.is_discovered(p(0, 3)));
}

#[test]
fn bush_freezes_the_actor_for_exactly_one_turn() {
    let mut game = game_on(
        layout(&[".\".....", "#####.."], p(0, 6), p(0, 0), p(1, 5), p(1, 6)),
        duel_config(StrategyKind::MoveAway, StrategyKind::AStar),
    );
    game.advance(6).expect("advance");

    let enemy = records_for(&game, Role::Enemy);
    assert_eq!(enemy[0].to, p(0, 1), "first enemy move enters the bush");
    assert!(!enemy[0].frozen);
    assert!(enemy[1].frozen, "next enemy turn is forced to stay");
    assert_eq!(enemy[1].applied, Action::Stay);
    assert!(!enemy[2].frozen, "only one turn is lost");
    let trapped = game
        .log()
        .iter()
        .filter(|event| matches!(event, LogEvent::Trapped { role: Role::Enemy, .. }))
        .count();
    assert_eq!(trapped, 1);
}

#[test]
fn stepping_onto_the_agent_is_rejected_before_both_checkpoints() {
    let mut game = game_on(
        layout(&[".....", ".....", "....."], p(1, 2), p(1, 1), p(0, 4), p(2, 4)),
        duel_config(StrategyKind::MoveAway, StrategyKind::MoveClose),
    );
    assert_eq!(game.step(), Ok(ChaseStatus::Running));
    assert_eq!(game.state().enemy.pos, p(1, 1));
    assert!(game.log().contains(&LogEvent::MoveRejected {
        role: Role::Enemy,
        action: Action::Right,
        step: 1
    }));
}

#[test]
fn capture_after_both_checkpoints_ends_the_game() {
    let mut game = game_on(
        layout(&[".....", ".....", "....."], p(1, 2), p(1, 1), p(0, 4), p(2, 4)),
        duel_config(StrategyKind::MoveAway, StrategyKind::MoveClose),
    );
    game.state.progress.mark(CheckpointId::A);
    game.state.progress.mark(CheckpointId::B);

    assert_eq!(game.step(), Ok(ChaseStatus::EnemyCaptured));
    assert_eq!(game.state().enemy.pos, game.state().agent.pos);
    assert!(matches!(
        game.log().last(),
        Some(LogEvent::Finished { status: ChaseStatus::EnemyCaptured, step: 1, .. })
    ));

    let frozen_hash = game.snapshot_hash();
    assert_eq!(game.step(), Ok(ChaseStatus::EnemyCaptured), "finished games do not advance");
    assert_eq!(game.snapshot_hash(), frozen_hash);
}

#[test]
fn agent_boxed_in_by_walls_and_enemy_is_stuck() {
    let mut game = game_on(
        layout(&[".#...", "....."], p(0, 0), p(1, 1), p(0, 3), p(1, 4)),
        duel_config(StrategyKind::MoveAway, StrategyKind::MoveClose),
    );
    assert_eq!(game.step(), Ok(ChaseStatus::AgentStuck));
    assert_eq!(game.state().enemy.pos, p(1, 0));
}

#[test]
fn walled_off_agent_survives_with_a_perfect_score() {
    let mut config = duel_config(StrategyKind::Random, StrategyKind::AStar);
    config.max_steps = 6;
    let mut game = game_on(
        layout(&["..#..", "..#.."], p(0, 4), p(0, 0), p(1, 0), p(1, 1)),
        config,
    );
    let summary = game.run_to_end().expect("run");
    assert_eq!(summary.status, ChaseStatus::AgentSurvived);
    assert_eq!(summary.steps, 6);
    assert_eq!(summary.good_steps, 6);
    assert_eq!(summary.score, 100.0);
    assert_eq!(game.history().len(), 6);
}

#[test]
fn tunnel_teleports_and_is_remembered_by_the_enemy() {
    let mut fixture = layout(&["........"], p(0, 7), p(0, 0), p(0, 5), p(0, 6));
    fixture.map.add_tunnel(p(0, 1), p(0, 4)).expect("tunnel");
    let mut game = game_on(fixture, duel_config(StrategyKind::MoveAway, StrategyKind::MoveClose));
    assert!(game.discovered_tunnels().is_empty());

    game.step().expect("step");
    assert_eq!(game.state().enemy.pos, p(0, 4));
    assert!(game.log().contains(&LogEvent::TunnelTraversed {
        role: Role::Enemy,
        from: p(0, 1),
        to: p(0, 4),
        step: 1
    }));
    assert_eq!(game.discovered_tunnels(), vec![p(0, 1), p(0, 4)]);
    assert_eq!(game.snapshot().discovered_tunnels, vec![p(0, 1), p(0, 4)]);
}

#[test]
fn checkpoint_visit_is_logged_once() {
    let mut game = game_on(
        layout(&["......", "......"], p(1, 5), p(0, 0), p(0, 1), p(0, 3)),
        duel_config(StrategyKind::MoveAway, StrategyKind::AStar),
    );
    game.advance(8).expect("advance");
    let visits: Vec<_> = game
        .log()
        .iter()
        .filter_map(|event| match event {
            LogEvent::CheckpointVisited { checkpoint, .. } => Some(*checkpoint),
            _ => None,
        })
        .collect();
    assert_eq!(visits, vec![CheckpointId::A, CheckpointId::B]);
    assert!(game.snapshot().visited_a && game.snapshot().visited_b);
}

#[test]
fn shared_cell_without_progress_is_an_invariant_violation() {
    let mut game = game_on(
        layout(&[".....", "....."], p(0, 0), p(1, 4), p(0, 4), p(1, 0)),
        duel_config(StrategyKind::MoveAway, StrategyKind::AStar),
    );
    game.state.agent.pos = game.state.enemy.pos;
    game.state.enemy.frozen_turns = 1;
    assert!(matches!(game.step(), Err(ChaseError::InconsistentState(_))));
}

#[test]
fn advance_reports_simulated_half_turns() {
    let mut config = duel_config(StrategyKind::Random, StrategyKind::AStar);
    config.max_steps = 5;
    let mut game = game_on(
        layout(&["..#..", "..#.."], p(0, 4), p(0, 0), p(1, 0), p(1, 1)),
        config,
    );
    let first = game.advance(3).expect("advance");
    assert_eq!(first, AdvanceResult { simulated_steps: 3, status: ChaseStatus::Running });
    let rest = game.advance(10).expect("advance");
    assert_eq!(rest, AdvanceResult { simulated_steps: 2, status: ChaseStatus::AgentSurvived });
    assert_eq!(game.state().next_mover, Role::Agent, "roles alternate every half-turn");
}

#[test]
fn in_order_routing_ignores_b_until_a_is_done() {
    let mut config = duel_config(StrategyKind::MoveAway, StrategyKind::AStar);
    config.checkpoint_routing = CheckpointRouting::InOrder;
    let mut game = game_on(layout(&["......"], p(0, 5), p(0, 0), p(0, 3), p(0, 1)), config);
    game.advance(10).expect("advance");

    assert_eq!(records_for(&game, Role::Enemy)[0].to, p(0, 1), "walks over B first");
    let visits: Vec<_> = game
        .log()
        .iter()
        .filter_map(|event| match event {
            LogEvent::CheckpointVisited { checkpoint, step } => Some((*checkpoint, *step)),
            _ => None,
        })
        .collect();
    assert_eq!(visits, vec![(CheckpointId::A, 5), (CheckpointId::B, 9)]);
}

#[test]
fn tunnel_onto_the_enemy_leaves_the_agent_stuck() {
    let mut fixture = layout(&["....."], p(0, 0), p(0, 3), p(0, 2), p(0, 4));
    fixture.map.add_tunnel(p(0, 1), p(0, 3)).expect("tunnel");
    let game = game_on(fixture, duel_config(StrategyKind::MoveAway, StrategyKind::AStar));
    assert_eq!(game.resolve_move(Role::Agent, Action::Right), None);
    assert!(game.agent_is_stuck());
}

#[test]
fn zero_sensing_radius_is_rejected_before_play() {
    let mut config = duel_config(StrategyKind::MoveAway, StrategyKind::AStar);
    config.sensing_radius = 0;
    let fixture = layout(&["..#..", ".....", "....."], p(2, 4), p(0, 0), p(0, 4), p(0, 3));
    assert!(matches!(
        Game::from_layout(7, config, fixture),
        Err(ChaseError::InvalidConfiguration(_))
    ));
}

#[test]
fn enemy_path_plan_is_visible_after_a_step() {
    let mut game = game_on(
        layout(&[".....", ".....", "....."], p(0, 4), p(1, 1), p(2, 3), p(2, 4)),
        duel_config(StrategyKind::MoveAway, StrategyKind::AStar),
    );
    assert_eq!(game.planned_path(Role::Enemy, StrategyKind::AStar), None);
    game.step().expect("step");
    let plan = game.planned_path(Role::Enemy, StrategyKind::AStar).expect("enemy planned");
    assert_eq!(plan.last(), Some(&p(2, 3)), "nearest checkpoint is the target");
    assert_eq!(plan.first(), Some(&p(1, 1)));
    assert_eq!(game.planned_path(Role::Agent, StrategyKind::MoveAway), None);
}
