//! Chase state machine: one half-turn at a time, strictly alternating roles.
//! This file wires focused engine submodules together.

use super::*;

mod advance;
mod movement;

#[cfg(test)]
mod tests;
