//! Append-only record of what the enemy has learned about the map.
//! This module exists so fogged planning and path-cache invalidation share one
//! source of truth. It does not own sensing rules; the engine decides what to reveal.

use std::collections::BTreeSet;

use crate::map::Map;
use crate::types::{Pos, Terrain};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscoveryMask {
    width: usize,
    height: usize,
    known: Vec<bool>,
    tunnels: BTreeSet<Pos>,
    revision: u64,
    tunnel_revision: u64,
    // Cells that turned out not to be the grass planners assumed, keyed by the
    // revision that revealed them.
    contradictions: Vec<(u64, Pos)>,
}

impl DiscoveryMask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            known: vec![false; width * height],
            tunnels: BTreeSet::new(),
            revision: 0,
            tunnel_revision: 0,
            contradictions: Vec::new(),
        }
    }

    pub fn is_discovered(&self, pos: Pos) -> bool {
        self.index(pos).is_some_and(|idx| self.known[idx])
    }

    pub fn discovered_count(&self) -> usize {
        self.known.iter().filter(|known| **known).count()
    }

    /// Returns true when `pos` was not known before.
    pub fn reveal(&mut self, map: &Map, pos: Pos) -> bool {
        let Some(idx) = self.index(pos) else {
            return false;
        };
        if self.known[idx] {
            return false;
        }
        self.known[idx] = true;
        self.revision += 1;
        if let Ok(terrain) = map.terrain(pos)
            && terrain != Terrain::Grass
        {
            self.contradictions.push((self.revision, pos));
        }
        true
    }

    /// Reveals every in-bounds cell within Chebyshev distance `radius` of `center`.
    pub fn reveal_radius(&mut self, map: &Map, center: Pos, radius: i32) -> usize {
        let mut fresh = 0;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if self.reveal(map, Pos { y: center.y + dy, x: center.x + dx }) {
                    fresh += 1;
                }
            }
        }
        fresh
    }

    /// Exposes the tunnel between `a` and `b` and marks both ends discovered.
    pub fn reveal_tunnel(&mut self, map: &Map, a: Pos, b: Pos) {
        self.reveal(map, a);
        self.reveal(map, b);
        let fresh_a = self.tunnels.insert(a);
        let fresh_b = self.tunnels.insert(b);
        if fresh_a || fresh_b {
            self.tunnel_revision += 1;
        }
    }

    pub fn knows_tunnel(&self, pos: Pos) -> bool {
        self.tunnels.contains(&pos)
    }

    pub fn known_tunnel_count(&self) -> usize {
        self.tunnels.len() / 2
    }

    pub fn known_tunnel_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        self.tunnels.iter().copied()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn tunnel_revision(&self) -> u64 {
        self.tunnel_revision
    }

    /// Non-grass cells revealed after `revision`.
    pub fn contradictions_since(&self, revision: u64) -> impl Iterator<Item = Pos> + '_ {
        let start = self.contradictions.partition_point(|(rev, _)| *rev <= revision);
        self.contradictions[start..].iter().map(|(_, pos)| *pos)
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        let (x, y) = (pos.x as usize, pos.y as usize);
        (x < self.width && y < self.height).then_some(y * self.width + x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_is_monotone_and_counts_fresh_cells() {
        let map = Map::new(5, 5);
        let mut mask = DiscoveryMask::new(5, 5);
        assert_eq!(mask.reveal_radius(&map, Pos { y: 0, x: 0 }, 1), 4, "corner clips the window");
        assert_eq!(mask.reveal_radius(&map, Pos { y: 0, x: 0 }, 1), 0);
        assert_eq!(mask.reveal_radius(&map, Pos { y: 2, x: 2 }, 1), 8);
        assert!(mask.is_discovered(Pos { y: 1, x: 1 }));
        assert_eq!(mask.discovered_count(), 12);
    }

    #[test]
    fn only_non_grass_reveals_are_contradictions() {
        let map = Map::from_rows(&[".#.", "\".."]).expect("map");
        let mut mask = DiscoveryMask::new(3, 2);
        mask.reveal(&map, Pos { y: 0, x: 0 });
        let before = mask.revision();
        mask.reveal_radius(&map, Pos { y: 0, x: 1 }, 1);
        let found: Vec<_> = mask.contradictions_since(before).collect();
        assert_eq!(found, vec![Pos { y: 0, x: 1 }, Pos { y: 1, x: 0 }]);
        assert_eq!(mask.contradictions_since(mask.revision()).count(), 0);
    }

    #[test]
    fn tunnel_reveal_bumps_tunnel_revision_once() {
        let mut map = Map::new(4, 1);
        let (a, b) = (Pos { y: 0, x: 0 }, Pos { y: 0, x: 3 });
        map.add_tunnel(a, b).expect("tunnel");
        let mut mask = DiscoveryMask::new(4, 1);
        mask.reveal_tunnel(&map, a, b);
        mask.reveal_tunnel(&map, b, a);
        assert_eq!(mask.tunnel_revision(), 1);
        assert_eq!(mask.known_tunnel_count(), 1);
        assert!(mask.is_discovered(b));
    }
}
