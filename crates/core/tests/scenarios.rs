use chase_core::{
    Algorithm, ChaseConfig, ChaseStatus, CheckpointId, CheckpointRouting, Checkpoints, Game,
    JpsPolicy, Layout, LogEvent, Map, PlanningView, Pos, Role, StrategyKind, find_path,
};

fn p(y: i32, x: i32) -> Pos {
    Pos { y, x }
}

fn visits(game: &Game) -> Vec<(CheckpointId, u32)> {
    game.log()
        .iter()
        .filter_map(|event| match event {
            LogEvent::CheckpointVisited { checkpoint, step } => Some((*checkpoint, *step)),
            _ => None,
        })
        .collect()
}

fn open_field_game(routing: CheckpointRouting) -> Game {
    let mut config = ChaseConfig::default()
        .with_enemy_strategy(StrategyKind::AStar)
        .with_agent_strategy(StrategyKind::MoveAway);
    config.checkpoint_routing = routing;
    config.max_steps = 200;
    let layout = Layout {
        map: Map::new(10, 8),
        agent: p(0, 0),
        enemy: p(7, 9),
        checkpoints: Checkpoints { a: p(2, 2), b: p(5, 7) },
    };
    Game::from_layout(3, config, layout).expect("scenario layout is valid")
}

#[test]
fn in_order_enemy_visits_a_strictly_before_b() {
    let mut game = open_field_game(CheckpointRouting::InOrder);
    let summary = game.run_to_end().expect("game runs");

    let visits = visits(&game);
    assert_eq!(visits.len(), 2, "open field lets the enemy reach both checkpoints");
    assert_eq!(visits[0].0, CheckpointId::A);
    assert_eq!(visits[1].0, CheckpointId::B);
    assert!(visits[0].1 < visits[1].1);
    assert!(summary.status.is_terminal());
}

#[test]
fn nearest_enemy_takes_the_closer_checkpoint_first() {
    let mut game = open_field_game(CheckpointRouting::Nearest);
    game.advance(40).expect("advance");
    let visits = visits(&game);
    assert_eq!(visits.first().map(|visit| visit.0), Some(CheckpointId::B));
    assert_eq!(visits.get(1).map(|visit| visit.0), Some(CheckpointId::A));
}

#[test]
fn progress_is_monotone_and_capture_needs_both_checkpoints() {
    for routing in [CheckpointRouting::Nearest, CheckpointRouting::InOrder] {
        let mut game = open_field_game(routing);
        let mut seen = (false, false);
        while !game.is_over() {
            game.step().expect("step");
            let snapshot = game.snapshot();
            assert!(snapshot.visited_a || !seen.0, "visitedA never resets");
            assert!(snapshot.visited_b || !seen.1, "visitedB never resets");
            seen = (snapshot.visited_a, snapshot.visited_b);
        }
        if game.status() == ChaseStatus::EnemyCaptured {
            assert!(seen.0 && seen.1);
        }
    }
}

#[test]
fn bush_costs_weighted_searches_but_not_step_counting_ones() {
    let map = Map::from_rows(&["..\"..", "....."]).expect("rows");
    let view = PlanningView::full(&map);
    let (start, goal) = (p(0, 0), p(0, 4));

    for algorithm in [Algorithm::AStar, Algorithm::Dijkstra] {
        let result = find_path(&view, start, goal, algorithm, JpsPolicy::default()).expect("search");
        assert_eq!(result.cost, Some(6), "{algorithm:?} detours around the bush");
        assert!(!result.require_path().expect("path").contains(&p(0, 2)));
    }

    let bfs = find_path(&view, start, goal, Algorithm::Bfs, JpsPolicy::default()).expect("search");
    assert_eq!(bfs.steps(), 4);
    assert!(bfs.require_path().expect("path").contains(&p(0, 2)));
    assert_eq!(bfs.cost, Some(13), "the walked cost still includes the bush");

    let jps = find_path(&view, start, goal, Algorithm::Jps, JpsPolicy::UniformCost).expect("search");
    assert_eq!(jps.algorithm_used, Algorithm::Jps);
    assert_eq!(jps.steps(), 4);

    let fallback = find_path(&view, start, goal, Algorithm::Jps, JpsPolicy::FallbackToAStar)
        .expect("search");
    assert_eq!(fallback.algorithm_used, Algorithm::AStar);
    assert_eq!(fallback.cost, Some(6));
}

#[test]
fn crossing_a_bush_costs_the_walker_exactly_one_turn() {
    let mut config = ChaseConfig::default()
        .with_enemy_strategy(StrategyKind::Bfs)
        .with_agent_strategy(StrategyKind::MoveAway);
    config.first_mover = Role::Enemy;
    let layout = Layout {
        map: Map::from_rows(&["..\"....."]).expect("rows"),
        agent: p(0, 7),
        enemy: p(0, 0),
        checkpoints: Checkpoints { a: p(0, 4), b: p(0, 5) },
    };
    let mut game = Game::from_layout(5, config, layout).expect("layout");
    game.advance(12).expect("advance");

    let enemy: Vec<_> = game.history().iter().filter(|record| record.role == Role::Enemy).collect();
    let cells: Vec<_> = enemy.iter().map(|record| record.to).collect();
    assert_eq!(cells, vec![p(0, 1), p(0, 2), p(0, 2), p(0, 3), p(0, 4), p(0, 5)]);
    let frozen: Vec<_> = enemy.iter().map(|record| record.frozen).collect();
    assert_eq!(frozen, vec![false, false, true, false, false, false]);
    assert_eq!(visits(&game), vec![(CheckpointId::A, 9), (CheckpointId::B, 11)]);
}
