//! Per-half-turn transition and the loops built on it.

use super::movement::MoveOutcome;
use super::*;
use crate::config::CheckpointRouting;

impl Game {
    /// Resolves one half-turn for whichever role moves next. A finished game
    /// is left untouched.
    pub fn step(&mut self) -> Result<ChaseStatus, ChaseError> {
        if self.is_over() {
            return Ok(self.state.status);
        }
        let role = self.state.next_mover;
        let step = self.state.step + 1;
        let from = self.state.actor(role).pos;

        let frozen = self.state.actor(role).is_frozen();
        let (requested, searches) = if frozen {
            self.state.actor_mut(role).frozen_turns -= 1;
            (Action::Stay, Vec::new())
        } else {
            let decision = match role {
                Role::Agent => {
                    self.agent.decide(&self.map, &self.state, &self.checkpoints, &self.config)?
                }
                Role::Enemy => {
                    self.enemy.decide(&self.map, &self.state, &self.checkpoints, &self.config)?
                }
            };
            (decision.action, decision.searches)
        };

        let outcome = match self.resolve_move(role, requested) {
            Some(outcome) => outcome,
            None => {
                tracing::debug!(?role, action = ?requested, step, "move rejected");
                self.log.push(LogEvent::MoveRejected { role, action: requested, step });
                MoveOutcome { landing: from, via: None }
            }
        };
        let applied = if outcome.landing == from && outcome.via.is_none() {
            Action::Stay
        } else {
            requested
        };
        self.apply_move(role, applied, outcome, step)?;

        self.state.step = step;
        if manhattan(self.state.agent.pos, self.state.enemy.pos) >= 2 {
            self.state.good_steps += 1;
        }
        self.state.status = self.evaluate_terminal()?;
        self.state.next_mover = role.other();

        self.history.push(TurnRecord {
            step,
            role,
            requested,
            applied,
            from,
            to: outcome.landing,
            frozen,
            searches,
        });

        if self.is_over() {
            let score = self.state.score();
            tracing::info!(status = ?self.state.status, step, score, "chase finished");
            self.log.push(LogEvent::Finished { status: self.state.status, step, score });
        }
        Ok(self.state.status)
    }

    /// Runs up to `max_half_turns` half-turns, stopping early at a terminal state.
    pub fn advance(&mut self, max_half_turns: u32) -> Result<AdvanceResult, ChaseError> {
        let mut simulated_steps = 0;
        while simulated_steps < max_half_turns && !self.is_over() {
            self.step()?;
            simulated_steps += 1;
        }
        Ok(AdvanceResult { simulated_steps, status: self.state.status })
    }

    /// Plays until a terminal state. Bounded by `max_steps`.
    pub fn run_to_end(&mut self) -> Result<GameSummary, ChaseError> {
        while !self.is_over() {
            self.step()?;
        }
        Ok(self.summary())
    }

    fn apply_move(
        &mut self,
        role: Role,
        applied: Action,
        outcome: MoveOutcome,
        step: u32,
    ) -> Result<(), ChaseError> {
        let from = self.state.actor(role).pos;
        let actor = self.state.actor_mut(role);
        actor.pos = outcome.landing;
        actor.last_action = applied;

        if let Some(entrance) = outcome.via {
            tracing::debug!(?role, ?entrance, to = ?outcome.landing, step, "tunnel traversed");
            self.log.push(LogEvent::TunnelTraversed { role, from: entrance, to: outcome.landing, step });
            if role == Role::Enemy
                && let Some(mask) = self.enemy.mask_mut()
            {
                mask.reveal_tunnel(&self.map, entrance, outcome.landing);
            }
        }

        if outcome.landing != from && self.map.terrain(outcome.landing)? == Terrain::Bush {
            self.state.actor_mut(role).frozen_turns = 1;
            self.log.push(LogEvent::Trapped { role, pos: outcome.landing, step });
        }

        if role == Role::Enemy {
            self.sense_around_enemy();
            let pos = self.state.enemy.pos;
            if let Some(id) = self.checkpoints.at(pos)
                && self.credits_visit(id)
                && self.state.progress.mark(id)
            {
                tracing::info!(checkpoint = ?id, step, "enemy visited checkpoint");
                self.log.push(LogEvent::CheckpointVisited { checkpoint: id, step });
            }
        }
        Ok(())
    }

    /// In-order routing only credits B once A is done; nearest routing
    /// credits whichever checkpoint the enemy stands on.
    fn credits_visit(&self, id: CheckpointId) -> bool {
        match self.config.checkpoint_routing {
            CheckpointRouting::Nearest => true,
            CheckpointRouting::InOrder => id == CheckpointId::A || self.state.progress.visited_a(),
        }
    }

    fn evaluate_terminal(&self) -> Result<ChaseStatus, ChaseError> {
        if self.state.agent.pos == self.state.enemy.pos {
            if !self.state.progress.both() {
                return Err(ChaseError::InconsistentState(format!(
                    "agent and enemy share ({}, {}) before both checkpoints were visited",
                    self.state.agent.pos.x, self.state.agent.pos.y
                )));
            }
            return Ok(ChaseStatus::EnemyCaptured);
        }
        if self.agent_is_stuck() {
            return Ok(ChaseStatus::AgentStuck);
        }
        if self.state.step >= self.config.max_steps {
            return Ok(ChaseStatus::AgentSurvived);
        }
        Ok(ChaseStatus::Running)
    }
}
