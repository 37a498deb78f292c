//! Pure game logic for Hexbeast.
//!
//! Everything here is independent of the ECS engine and any renderer.
//! Functions take plain data and return results, so they are unit-testable
//! on their own and shared by the simulation engine and the headless harness.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`hex`] | Cube coordinates, directions, distance, lines, rings |
//! | [`offset`] | Offset and doubled coordinates for rectangular maps |
//! | [`layout`] | Pointy/flat orientations, hex ↔ pixel transforms |
//! | [`hex_map`] | Sparse terrain map, map shapes, passability |
//! | [`pathfinding`] | A* search, movement ranges, cached navigator |
//! | [`jobs`] | Settlement job queue and nearest-idle-agent matching |
//! | [`economy`] | Stockpiles, costs, buildings, upkeep |
//! | [`cards`] | Card definitions, deck cycling, target checks |

pub mod cards;
pub mod economy;
pub mod hex;
pub mod hex_map;
pub mod jobs;
pub mod layout;
pub mod offset;
pub mod pathfinding;

pub use hex::{FractionalHex, Hex};
pub use hex_map::{HexMap, Terrain, Tile};
