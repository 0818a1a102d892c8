//! Move validation and resolution against the true map.

use super::*;

/// Where an accepted action leaves the actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct MoveOutcome {
    pub(super) landing: Pos,
    /// Tunnel entrance stepped on, when the move teleported.
    pub(super) via: Option<Pos>,
}

impl Game {
    /// Checks `action` for `role` against the real terrain and tunnels, which
    /// may differ from what the actor believed. `None` means the move is
    /// rejected and the actor stays put.
    pub(super) fn resolve_move(&self, role: Role, action: Action) -> Option<MoveOutcome> {
        let from = self.state.actor(role).pos;
        if action == Action::Stay {
            return Some(MoveOutcome { landing: from, via: None });
        }
        let next = from.offset(action);
        if self.map.terrain(next).ok()? == Terrain::Wall {
            return None;
        }
        let other = self.state.actor(role.other()).pos;
        if next == other {
            return self.may_enter_other(role).then_some(MoveOutcome { landing: next, via: None });
        }
        let landing = self.map.tunnel_partner(next).unwrap_or(next);
        if landing == other && !self.may_enter_other(role) {
            return None;
        }
        Some(MoveOutcome { landing, via: (landing != next).then_some(next) })
    }

    /// Only the enemy may step onto the agent, and only once both checkpoints
    /// are visited.
    fn may_enter_other(&self, role: Role) -> bool {
        role == Role::Enemy && self.state.progress.both()
    }

    /// No direction gives the agent a legal move, counting tunnels that would
    /// drop it onto the enemy.
    pub(super) fn agent_is_stuck(&self) -> bool {
        Action::MOVES.into_iter().all(|action| self.resolve_move(Role::Agent, action).is_none())
    }
}
