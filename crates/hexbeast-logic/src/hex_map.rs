//! Sparse hex map keyed by cube coordinates.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::economy::ResourceKind;
use crate::hex::Hex;
use crate::offset::{roffset_to_cube, OffsetCoord, OffsetParity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Terrain {
    #[default]
    Grassland,
    Forest,
    Hills,
    Mountain,
    Water,
    /// Consecrated ground left by a completed shrine.
    Sacred,
}

impl Terrain {
    pub const ALL: [Terrain; 6] = [
        Terrain::Grassland,
        Terrain::Forest,
        Terrain::Hills,
        Terrain::Mountain,
        Terrain::Water,
        Terrain::Sacred,
    ];

    /// Cost to enter a tile of this terrain. `None` means impassable.
    pub fn move_cost(self) -> Option<u32> {
        match self {
            Terrain::Grassland | Terrain::Sacred => Some(1),
            Terrain::Forest => Some(2),
            Terrain::Hills => Some(3),
            Terrain::Mountain | Terrain::Water => None,
        }
    }

    pub fn is_passable(self) -> bool {
        self.move_cost().is_some()
    }

    /// What a resource node on this terrain yields.
    pub fn resource(self) -> Option<ResourceKind> {
        match self {
            Terrain::Grassland => Some(ResourceKind::Food),
            Terrain::Forest => Some(ResourceKind::Wood),
            Terrain::Hills => Some(ResourceKind::Stone),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tile {
    pub terrain: Terrain,
    pub elevation: i8,
}

impl Tile {
    pub fn new(terrain: Terrain) -> Self {
        Self {
            terrain,
            elevation: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<(Hex, Tile)>", into = "Vec<(Hex, Tile)>")]
pub struct HexMap {
    tiles: HashMap<Hex, Tile>,
}

impl HexMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hexagon-shaped map of grassland centered on the origin.
    pub fn hexagon(radius: i32) -> Self {
        Self::from_hexes(Hex::ORIGIN.range(radius))
    }

    /// Pointy-top rectangle, odd rows shoved right.
    pub fn rectangle(width: i32, height: i32) -> Self {
        let mut hexes = Vec::with_capacity((width.max(0) * height.max(0)) as usize);
        for row in 0..height {
            for col in 0..width {
                hexes.push(roffset_to_cube(OffsetParity::Odd, OffsetCoord::new(col, row)));
            }
        }
        Self::from_hexes(hexes)
    }

    /// Inclusive ranges along q and r.
    pub fn parallelogram(q_range: (i32, i32), r_range: (i32, i32)) -> Self {
        let mut hexes = Vec::new();
        for q in q_range.0..=q_range.1 {
            for r in r_range.0..=r_range.1 {
                hexes.push(Hex::new(q, r));
            }
        }
        Self::from_hexes(hexes)
    }

    pub fn from_hexes(hexes: impl IntoIterator<Item = Hex>) -> Self {
        Self {
            tiles: hexes.into_iter().map(|h| (h, Tile::default())).collect(),
        }
    }

    pub fn insert(&mut self, hex: Hex, tile: Tile) -> Option<Tile> {
        self.tiles.insert(hex, tile)
    }

    pub fn get(&self, hex: Hex) -> Option<&Tile> {
        self.tiles.get(&hex)
    }

    pub fn get_mut(&mut self, hex: Hex) -> Option<&mut Tile> {
        self.tiles.get_mut(&hex)
    }

    /// Change a tile's terrain. Returns false if the hex is off the map.
    pub fn set_terrain(&mut self, hex: Hex, terrain: Terrain) -> bool {
        match self.tiles.get_mut(&hex) {
            Some(tile) => {
                tile.terrain = terrain;
                true
            }
            None => false,
        }
    }

    pub fn terrain(&self, hex: Hex) -> Option<Terrain> {
        self.tiles.get(&hex).map(|t| t.terrain)
    }

    pub fn contains(&self, hex: Hex) -> bool {
        self.tiles.contains_key(&hex)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Hex, &Tile)> {
        self.tiles.iter()
    }

    /// All hexes in a stable order (sorted), for seeded generation.
    pub fn sorted_hexes(&self) -> Vec<Hex> {
        let mut hexes: Vec<Hex> = self.tiles.keys().copied().collect();
        hexes.sort();
        hexes
    }

    pub fn is_passable(&self, hex: Hex) -> bool {
        self.move_cost(hex).is_some()
    }

    /// Cost to enter `hex`; `None` when off the map or impassable.
    pub fn move_cost(&self, hex: Hex) -> Option<u32> {
        self.tiles.get(&hex).and_then(|t| t.terrain.move_cost())
    }

    /// In-map, passable neighbors in direction order.
    pub fn passable_neighbors(&self, hex: Hex) -> impl Iterator<Item = Hex> + '_ {
        hex.neighbors()
            .into_iter()
            .filter(move |n| self.is_passable(*n))
    }

    pub fn hexes_with_terrain(&self, terrain: Terrain) -> Vec<Hex> {
        let mut hexes: Vec<Hex> = self
            .tiles
            .iter()
            .filter(|(_, t)| t.terrain == terrain)
            .map(|(h, _)| *h)
            .collect();
        hexes.sort();
        hexes
    }
}

impl From<Vec<(Hex, Tile)>> for HexMap {
    fn from(tiles: Vec<(Hex, Tile)>) -> Self {
        Self {
            tiles: tiles.into_iter().collect(),
        }
    }
}

impl From<HexMap> for Vec<(Hex, Tile)> {
    fn from(map: HexMap) -> Self {
        let mut tiles: Vec<(Hex, Tile)> = map.tiles.into_iter().collect();
        tiles.sort_by_key(|(h, _)| *h);
        tiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shapes() {
        assert_eq!(HexMap::hexagon(2).len(), 19);
        assert_eq!(HexMap::rectangle(4, 3).len(), 12);
        assert_eq!(HexMap::parallelogram((-1, 1), (0, 2)).len(), 9);
        assert!(HexMap::hexagon(0).contains(Hex::ORIGIN));
    }

    #[test]
    fn test_rectangle_rows_are_shoved() {
        let map = HexMap::rectangle(3, 3);
        // Row 2 starts one q to the left of row 0.
        assert!(map.contains(Hex::new(-1, 2)));
        assert!(!map.contains(Hex::new(-1, 0)));
    }

    #[test]
    fn test_passability() {
        let mut map = HexMap::hexagon(1);
        assert!(map.set_terrain(Hex::new(1, 0), Terrain::Water));
        assert!(map.set_terrain(Hex::new(0, 1), Terrain::Forest));
        assert!(!map.set_terrain(Hex::new(5, 5), Terrain::Forest));
        assert!(!map.is_passable(Hex::new(1, 0)));
        assert_eq!(map.move_cost(Hex::new(0, 1)), Some(2));
        assert_eq!(map.move_cost(Hex::new(9, 9)), None);
        assert_eq!(map.passable_neighbors(Hex::ORIGIN).count(), 5);
    }

    #[test]
    fn test_edge_neighbors_stay_in_map() {
        let map = HexMap::hexagon(1);
        // A corner hex of a radius-1 map has three in-map neighbors.
        assert_eq!(map.passable_neighbors(Hex::new(1, 0)).count(), 3);
    }

    #[test]
    fn test_terrain_resources() {
        assert_eq!(Terrain::Forest.resource(), Some(ResourceKind::Wood));
        assert_eq!(Terrain::Water.resource(), None);
        assert!(!Terrain::Mountain.is_passable());
    }

    #[test]
    fn test_hexes_with_terrain_is_sorted() {
        let mut map = HexMap::hexagon(2);
        map.set_terrain(Hex::new(2, -1), Terrain::Hills);
        map.set_terrain(Hex::new(-2, 1), Terrain::Hills);
        assert_eq!(
            map.hexes_with_terrain(Terrain::Hills),
            vec![Hex::new(-2, 1), Hex::new(2, -1)]
        );
    }
}
