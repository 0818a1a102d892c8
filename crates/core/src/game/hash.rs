//! Canonical digest of a chase in progress, used to compare runs of the same seed.

use std::hash::Hasher;

use xxhash_rust::xxh3::Xxh3;

use super::*;

fn status_code(status: ChaseStatus) -> u8 {
    match status {
        ChaseStatus::Running => 0,
        ChaseStatus::AgentSurvived => 1,
        ChaseStatus::EnemyCaptured => 2,
        ChaseStatus::AgentStuck => 3,
    }
}

impl Game {
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed);
        hasher.write(&self.map.canonical_bytes());
        hasher.write_u32(self.state.step);
        hasher.write_u32(self.state.good_steps);
        hasher.write_u8(status_code(self.state.status));
        hasher.write_u8(match self.state.next_mover {
            Role::Agent => 0,
            Role::Enemy => 1,
        });
        for actor in [&self.state.agent, &self.state.enemy] {
            hasher.write_i32(actor.pos.x);
            hasher.write_i32(actor.pos.y);
            hasher.write_u32(actor.frozen_turns);
        }
        hasher.write_u8(u8::from(self.state.progress.visited_a()));
        hasher.write_u8(u8::from(self.state.progress.visited_b()));
        if let Some(mask) = self.enemy.mask() {
            hasher.write_u64(mask.revision());
            for cell in mask.known_tunnel_cells() {
                hasher.write_i32(cell.x);
                hasher.write_i32(cell.y);
            }
        }
        hasher.finish()
    }
}
