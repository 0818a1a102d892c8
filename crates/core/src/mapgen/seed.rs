//! Deterministic seed mixing and pseudo-random stream helpers for map generation.

use crate::types::Role;

pub(super) fn random_usize(seed: u64, stream: u64, min_value: usize, max_value: usize) -> usize {
    debug_assert!(min_value <= max_value);
    let range_size = max_value - min_value + 1;
    min_value + (mix_seed_stream(seed, stream) as usize % range_size)
}

/// Uniform in `[0, 1)` with 53 bits of precision.
pub(super) fn random_unit(seed: u64, stream: u64) -> f64 {
    (mix_seed_stream(seed, stream) >> 11) as f64 / (1_u64 << 53) as f64
}

pub(super) fn mix_seed_stream(seed: u64, stream: u64) -> u64 {
    let mut mixed = seed ^ stream.wrapping_mul(0xD6E8_FD9A_5B89_7A4D);
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xC4CE_B9FE_1A85_EC53);
    mixed ^ (mixed >> 33)
}

pub(super) fn derive_attempt_seed(game_seed: u64, attempt: u32) -> u64 {
    splitmix(game_seed ^ 0x9E37_79B9_7F4A_7C15 ^ u64::from(attempt).wrapping_mul(0xBF58_476D_1CE4_E5B9))
}

/// Seed for one actor's private noise stream, independent of the map streams.
pub fn derive_actor_seed(game_seed: u64, role: Role) -> u64 {
    let code: u64 = match role {
        Role::Agent => 0xA6E7,
        Role::Enemy => 0xE7E3,
    };
    splitmix(game_seed ^ code.wrapping_mul(0x94D0_49BB_1331_11EB))
}

fn splitmix(mut mixed: u64) -> u64 {
    mixed ^= mixed >> 30;
    mixed = mixed.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    mixed ^= mixed >> 27;
    mixed = mixed.wrapping_mul(0x94D0_49BB_1331_11EB);
    mixed ^ (mixed >> 31)
}
