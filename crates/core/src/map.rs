//! Static terrain, the hidden tunnel graph, and per-actor planning views over them.
//! Terrain never changes once a game starts; what an actor believes about it
//! depends on the `Vision` it plans with.

use std::collections::BTreeMap;

use crate::error::ChaseError;
use crate::game::discovery::DiscoveryMask;
use crate::types::{Action, Pos, Terrain, manhattan};

/// Per-terrain traversal cost. `Wall` has none.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CostModel {
    pub grass: u32,
    pub bush: u32,
    pub tunnel: u32,
}

impl Default for CostModel {
    fn default() -> Self {
        Self { grass: 1, bush: 10, tunnel: 1 }
    }
}

impl CostModel {
    pub fn terrain_cost(&self, terrain: Terrain) -> Option<u32> {
        match terrain {
            Terrain::Wall => None,
            Terrain::Grass => Some(self.grass),
            Terrain::Bush => Some(self.bush),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Map {
    width: usize,
    height: usize,
    terrain: Vec<Terrain>,
    tunnels: BTreeMap<Pos, Pos>,
    costs: CostModel,
}

impl Map {
    /// An all-grass map with default costs.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            terrain: vec![Terrain::Grass; width * height],
            tunnels: BTreeMap::new(),
            costs: CostModel::default(),
        }
    }

    pub fn from_terrain(
        width: usize,
        height: usize,
        terrain: Vec<Terrain>,
        costs: CostModel,
    ) -> Result<Self, ChaseError> {
        if width == 0 || height == 0 {
            return Err(ChaseError::InvalidConfiguration(format!(
                "map dimensions must be positive (got {width}x{height})"
            )));
        }
        if terrain.len() != width * height {
            return Err(ChaseError::InvalidConfiguration(format!(
                "expected {} terrain cells for a {width}x{height} map, got {}",
                width * height,
                terrain.len()
            )));
        }
        Ok(Self { width, height, terrain, tunnels: BTreeMap::new(), costs })
    }

    /// Builds a map from rows of `#` (wall), `"` (bush) and `.` (grass).
    pub fn from_rows(rows: &[&str]) -> Result<Self, ChaseError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.chars().count());
        let mut terrain = Vec::with_capacity(width * height);
        for row in rows {
            if row.chars().count() != width {
                return Err(ChaseError::InvalidConfiguration("map rows differ in length".into()));
            }
            for glyph in row.chars() {
                terrain.push(match glyph {
                    '#' => Terrain::Wall,
                    '"' => Terrain::Bush,
                    '.' => Terrain::Grass,
                    other => {
                        return Err(ChaseError::InvalidConfiguration(format!(
                            "unknown terrain glyph `{other}`"
                        )));
                    }
                });
            }
        }
        Self::from_terrain(width, height, terrain, CostModel::default())
    }

    pub fn with_costs(mut self, costs: CostModel) -> Self {
        self.costs = costs;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn costs(&self) -> CostModel {
        self.costs
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.width
            && (pos.y as usize) < self.height
    }

    pub fn terrain(&self, pos: Pos) -> Result<Terrain, ChaseError> {
        self.checked_index(pos).map(|idx| self.terrain[idx])
    }

    /// `None` for walls, which are never traversable.
    pub fn move_cost(&self, pos: Pos) -> Result<Option<u32>, ChaseError> {
        Ok(self.costs.terrain_cost(self.terrain(pos)?))
    }

    /// Out-of-bounds cells block movement the same way walls do.
    pub fn is_blocking(&self, pos: Pos) -> bool {
        !matches!(self.terrain(pos), Ok(Terrain::Grass | Terrain::Bush))
    }

    /// Links two non-adjacent, non-wall cells. Each cell joins at most one pair.
    pub fn add_tunnel(&mut self, a: Pos, b: Pos) -> Result<(), ChaseError> {
        for end in [a, b] {
            if self.terrain(end)? == Terrain::Wall {
                return Err(ChaseError::InvalidConfiguration(format!(
                    "tunnel endpoint ({}, {}) is a wall",
                    end.x, end.y
                )));
            }
            if self.tunnels.contains_key(&end) {
                return Err(ChaseError::InvalidConfiguration(format!(
                    "cell ({}, {}) already belongs to a tunnel",
                    end.x, end.y
                )));
            }
        }
        if manhattan(a, b) <= 1 {
            return Err(ChaseError::InvalidConfiguration(
                "tunnel endpoints must be distinct and non-adjacent".into(),
            ));
        }
        self.tunnels.insert(a, b);
        self.tunnels.insert(b, a);
        Ok(())
    }

    pub fn tunnel_partner(&self, pos: Pos) -> Option<Pos> {
        self.tunnels.get(&pos).copied()
    }

    /// Each pair once, smaller endpoint first.
    pub fn tunnel_pairs(&self) -> impl Iterator<Item = (Pos, Pos)> + '_ {
        self.tunnels.iter().filter(|(a, b)| a < b).map(|(a, b)| (*a, *b))
    }

    pub fn cells(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).map(move |x| Pos { y: y as i32, x: x as i32 })
        })
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.terrain.len() + 16);
        bytes.extend((self.width as u32).to_le_bytes());
        bytes.extend((self.height as u32).to_le_bytes());
        for cell in &self.terrain {
            bytes.push(match cell {
                Terrain::Wall => 0,
                Terrain::Grass => 1,
                Terrain::Bush => 2,
            });
        }
        for (a, b) in self.tunnel_pairs() {
            for end in [a, b] {
                bytes.extend(end.y.to_le_bytes());
                bytes.extend(end.x.to_le_bytes());
            }
        }
        bytes
    }

    fn checked_index(&self, pos: Pos) -> Result<usize, ChaseError> {
        if !self.in_bounds(pos) {
            return Err(ChaseError::OutOfBounds { pos, width: self.width, height: self.height });
        }
        Ok((pos.y as usize) * self.width + (pos.x as usize))
    }
}

/// What an actor knows about the map while planning.
#[derive(Clone, Copy, Debug)]
pub enum Vision<'a> {
    /// Every cell and every tunnel.
    Full,
    /// Only discovered cells; the rest is assumed to be grass, and only
    /// tunnels the actor has stepped through are known.
    Discovered(&'a DiscoveryMask),
}

/// One executable move during search: stepping in `action`'s direction and
/// ending on `landing`. `via` is the tunnel entrance when the step teleports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    pub action: Action,
    pub landing: Pos,
    pub via: Option<Pos>,
    pub cost: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct PlanningView<'a> {
    map: &'a Map,
    vision: Vision<'a>,
    occupied: Option<Pos>,
}

impl<'a> PlanningView<'a> {
    pub fn full(map: &'a Map) -> Self {
        Self { map, vision: Vision::Full, occupied: None }
    }

    pub fn discovered(map: &'a Map, mask: &'a DiscoveryMask) -> Self {
        Self { map, vision: Vision::Discovered(mask), occupied: None }
    }

    /// Marks the other role's current cell. It may be a path's goal but never
    /// an intermediate step.
    pub fn with_occupied(mut self, pos: Pos) -> Self {
        self.occupied = Some(pos);
        self
    }

    pub fn map(&self) -> &'a Map {
        self.map
    }

    pub fn vision(&self) -> Vision<'a> {
        self.vision
    }

    pub fn occupied(&self) -> Option<Pos> {
        self.occupied
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        self.map.in_bounds(pos)
    }

    /// `None` outside the grid.
    pub fn believed_terrain(&self, pos: Pos) -> Option<Terrain> {
        let actual = self.map.terrain(pos).ok()?;
        match self.vision {
            Vision::Full => Some(actual),
            Vision::Discovered(mask) if mask.is_discovered(pos) => Some(actual),
            Vision::Discovered(_) => Some(Terrain::Grass),
        }
    }

    pub fn believed_cost(&self, pos: Pos) -> Option<u32> {
        self.believed_terrain(pos).and_then(|terrain| self.map.costs.terrain_cost(terrain))
    }

    pub fn known_tunnel(&self, pos: Pos) -> Option<Pos> {
        let partner = self.map.tunnel_partner(pos)?;
        match self.vision {
            Vision::Full => Some(partner),
            Vision::Discovered(mask) => mask.knows_tunnel(pos).then_some(partner),
        }
    }

    /// Not a wall as far as this view knows, and not the other role's cell
    /// unless that cell is the goal.
    pub fn is_passable(&self, pos: Pos, goal: Pos) -> bool {
        match self.believed_terrain(pos) {
            None | Some(Terrain::Wall) => false,
            Some(_) => self.occupied != Some(pos) || pos == goal,
        }
    }

    /// Where an actor ends up after stepping onto `pos`.
    pub fn landing(&self, pos: Pos) -> Pos {
        self.known_tunnel(pos).unwrap_or(pos)
    }

    /// Passable 4-neighbours of `pos` plus its known tunnel partner.
    pub fn neighbors(&self, pos: Pos, goal: Pos) -> Vec<Pos> {
        let mut out: Vec<Pos> = Action::MOVES
            .into_iter()
            .map(|action| pos.offset(action))
            .filter(|next| self.is_passable(*next, goal))
            .collect();
        if let Some(partner) = self.known_tunnel(pos)
            && self.is_passable(partner, goal)
        {
            out.push(partner);
        }
        out
    }

    /// Executable moves out of `pos`. Stepping onto a known tunnel entrance
    /// lands on its partner, except when the entrance is the goal itself:
    /// reaching the other role's cell resolves before any teleport.
    pub fn successors(&self, pos: Pos, goal: Pos) -> Vec<Step> {
        let mut out = Vec::with_capacity(4);
        for action in Action::MOVES {
            let next = pos.offset(action);
            if !self.is_passable(next, goal) {
                continue;
            }
            let step = match self.known_tunnel(next) {
                Some(partner) if next != goal => {
                    if !self.is_passable(partner, goal) {
                        continue;
                    }
                    Step { action, landing: partner, via: Some(next), cost: self.map.costs.tunnel }
                }
                _ => {
                    let Some(cost) = self.believed_cost(next) else {
                        continue;
                    };
                    Step { action, landing: next, via: None, cost }
                }
            };
            out.push(step);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_is_an_error_not_a_wall() {
        let map = Map::new(4, 3);
        let outside = Pos { y: 3, x: 0 };
        assert_eq!(
            map.terrain(outside),
            Err(ChaseError::OutOfBounds { pos: outside, width: 4, height: 3 })
        );
        assert!(map.is_blocking(outside));
    }

    #[test]
    fn move_cost_follows_terrain() {
        let map = Map::from_rows(&[".\"#"]).expect("map");
        assert_eq!(map.move_cost(Pos { y: 0, x: 0 }), Ok(Some(1)));
        assert_eq!(map.move_cost(Pos { y: 0, x: 1 }), Ok(Some(10)));
        assert_eq!(map.move_cost(Pos { y: 0, x: 2 }), Ok(None));
    }

    #[test]
    fn tunnels_reject_walls_adjacency_and_reuse() {
        let mut map = Map::from_rows(&["....", "..#."]).expect("map");
        let a = Pos { y: 0, x: 0 };
        assert!(map.add_tunnel(a, Pos { y: 0, x: 1 }).is_err(), "adjacent endpoints");
        assert!(map.add_tunnel(a, Pos { y: 1, x: 2 }).is_err(), "wall endpoint");
        map.add_tunnel(a, Pos { y: 1, x: 3 }).expect("valid tunnel");
        assert!(map.add_tunnel(a, Pos { y: 0, x: 3 }).is_err(), "endpoint reused");
        assert_eq!(map.tunnel_partner(Pos { y: 1, x: 3 }), Some(a));
        assert_eq!(map.tunnel_pairs().count(), 1);
    }

    #[test]
    fn undiscovered_cells_are_assumed_grass() {
        let map = Map::from_rows(&["..#\"", "...."]).expect("map");
        let mask = DiscoveryMask::new(map.width(), map.height());
        let view = PlanningView::discovered(&map, &mask);
        assert_eq!(view.believed_terrain(Pos { y: 0, x: 2 }), Some(Terrain::Grass));
        assert_eq!(view.believed_cost(Pos { y: 0, x: 3 }), Some(1));
        assert_eq!(view.believed_terrain(Pos { y: 5, x: 0 }), None);
    }

    #[test]
    fn occupied_cell_is_only_passable_as_goal() {
        let map = Map::new(3, 1);
        let other = Pos { y: 0, x: 1 };
        let view = PlanningView::full(&map).with_occupied(other);
        assert!(!view.is_passable(other, Pos { y: 0, x: 2 }));
        assert!(view.is_passable(other, other));
    }

    #[test]
    fn hidden_tunnel_is_not_a_neighbor_until_known() {
        let mut map = Map::new(5, 1);
        let entrance = Pos { y: 0, x: 1 };
        let exit = Pos { y: 0, x: 4 };
        map.add_tunnel(entrance, exit).expect("tunnel");
        let far = Pos { y: 0, x: 3 };

        let mut mask = DiscoveryMask::new(5, 1);
        let fogged = PlanningView::discovered(&map, &mask);
        assert_eq!(fogged.neighbors(entrance, far), vec![Pos { y: 0, x: 0 }, Pos { y: 0, x: 2 }]);

        mask.reveal_tunnel(&map, entrance, exit);
        let informed = PlanningView::discovered(&map, &mask);
        assert!(informed.neighbors(entrance, far).contains(&exit));

        let full = PlanningView::full(&map);
        let steps = full.successors(Pos { y: 0, x: 0 }, far);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].landing, exit);
        assert_eq!(steps[0].via, Some(entrance));
        assert_eq!(steps[0].action, Action::Right);
    }
}
