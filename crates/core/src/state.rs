use std::mem;

use serde::Serialize;

use crate::types::*;

/// Public per-actor fields. Occupancy is derived from `pos`, never stored on the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ActorState {
    pub pos: Pos,
    pub frozen_turns: u32,
    pub last_action: Action,
}

impl ActorState {
    pub fn at(pos: Pos) -> Self {
        Self { pos, frozen_turns: 0, last_action: Action::Stay }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen_turns > 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Checkpoints {
    pub a: Pos,
    pub b: Pos,
}

impl Checkpoints {
    pub fn cell(&self, id: CheckpointId) -> Pos {
        match id {
            CheckpointId::A => self.a,
            CheckpointId::B => self.b,
        }
    }

    pub fn at(&self, pos: Pos) -> Option<CheckpointId> {
        [CheckpointId::A, CheckpointId::B].into_iter().find(|id| self.cell(*id) == pos)
    }
}

/// Monotone: flags are only ever set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct CheckpointProgress {
    visited_a: bool,
    visited_b: bool,
}

impl CheckpointProgress {
    pub fn visited(&self, id: CheckpointId) -> bool {
        match id {
            CheckpointId::A => self.visited_a,
            CheckpointId::B => self.visited_b,
        }
    }

    pub fn visited_a(&self) -> bool {
        self.visited_a
    }

    pub fn visited_b(&self) -> bool {
        self.visited_b
    }

    /// Returns true the first time `id` is marked.
    pub fn mark(&mut self, id: CheckpointId) -> bool {
        let flag = match id {
            CheckpointId::A => &mut self.visited_a,
            CheckpointId::B => &mut self.visited_b,
        };
        !mem::replace(flag, true)
    }

    pub fn both(&self) -> bool {
        self.visited_a && self.visited_b
    }
}

/// Mutable per-game state. Only the engine writes it, once per half-turn.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnState {
    pub step: u32,
    pub good_steps: u32,
    pub agent: ActorState,
    pub enemy: ActorState,
    pub progress: CheckpointProgress,
    pub status: ChaseStatus,
    pub next_mover: Role,
}

impl TurnState {
    pub fn new(agent: Pos, enemy: Pos, first_mover: Role) -> Self {
        Self {
            step: 0,
            good_steps: 0,
            agent: ActorState::at(agent),
            enemy: ActorState::at(enemy),
            progress: CheckpointProgress::default(),
            status: ChaseStatus::Running,
            next_mover: first_mover,
        }
    }

    pub fn actor(&self, role: Role) -> &ActorState {
        match role {
            Role::Agent => &self.agent,
            Role::Enemy => &self.enemy,
        }
    }

    pub fn actor_mut(&mut self, role: Role) -> &mut ActorState {
        match role {
            Role::Agent => &mut self.agent,
            Role::Enemy => &mut self.enemy,
        }
    }

    /// `100 * good / total`, or 0 before any step has been taken.
    pub fn score(&self) -> f64 {
        if self.step == 0 {
            return 0.0;
        }
        100.0 * f64::from(self.good_steps) / f64::from(self.step)
    }
}

/// Read-only view handed to renderers and other observers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TurnSnapshot {
    pub step: u32,
    pub score: f64,
    pub status: ChaseStatus,
    pub agent: ActorState,
    pub enemy: ActorState,
    pub checkpoints: Checkpoints,
    pub visited_a: bool,
    pub visited_b: bool,
    pub discovered_tunnels: Vec<Pos>,
}

/// What a headless caller reads once the game is over.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameSummary {
    pub seed: u64,
    pub status: ChaseStatus,
    pub steps: u32,
    pub good_steps: u32,
    pub score: f64,
    pub searches: Vec<SearchMetric>,
}

impl GameSummary {
    pub fn mean_nodes_explored(&self) -> f64 {
        let fresh: Vec<_> = self.searches.iter().filter(|metric| !metric.reused).collect();
        if fresh.is_empty() {
            return 0.0;
        }
        fresh.iter().map(|metric| metric.nodes_explored as f64).sum::<f64>() / fresh.len() as f64
    }
}

/// One path-algorithm invocation (or cache hit) made while deciding a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SearchMetric {
    pub role: Role,
    pub algorithm: Algorithm,
    pub algorithm_used: Algorithm,
    pub nodes_explored: u32,
    pub path_len: Option<u32>,
    pub reused: bool,
}

/// History entry written after every half-turn.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TurnRecord {
    pub step: u32,
    pub role: Role,
    pub requested: Action,
    pub applied: Action,
    pub from: Pos,
    pub to: Pos,
    pub frozen: bool,
    pub searches: Vec<SearchMetric>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_marks_only_once() {
        let mut progress = CheckpointProgress::default();
        assert!(progress.mark(CheckpointId::B));
        assert!(!progress.mark(CheckpointId::B), "second visit is not new");
        assert!(progress.visited_b() && !progress.visited_a());
        assert!(!progress.both());
        progress.mark(CheckpointId::A);
        assert!(progress.both());
    }

    #[test]
    fn score_is_zero_before_first_step() {
        let mut state = TurnState::new(Pos { y: 0, x: 0 }, Pos { y: 3, x: 3 }, Role::Agent);
        assert_eq!(state.score(), 0.0);
        state.step = 4;
        state.good_steps = 3;
        assert_eq!(state.score(), 75.0);
    }

    #[test]
    fn checkpoint_lookup_by_cell() {
        let checkpoints = Checkpoints { a: Pos { y: 2, x: 2 }, b: Pos { y: 5, x: 7 } };
        assert_eq!(checkpoints.at(Pos { y: 5, x: 7 }), Some(CheckpointId::B));
        assert_eq!(checkpoints.at(Pos { y: 0, x: 0 }), None);
    }
}
