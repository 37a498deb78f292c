//! Hexbeast Core - Settlement Simulation Engine
//!
//! An ECS-based simulation of settlements on a hex map. Agents gather,
//! haul, and build for their settlements while the player steers a god
//! beast and plays cards that reshape the land.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: agents, the god beast, resource nodes, construction sites
//! - **Components**: Pure data attached to entities (HexPosition, Movement, AssignedJob, etc.)
//! - **Systems**: Logic that queries and updates components, once per tick
//!
//! Settlements, the map, and the deck live beside the world in [`engine::GameEngine`].
//!
//! # Example
//!
//! ```rust,no_run
//! use hexbeast_core::prelude::*;
//!
//! let mut engine = GameEngine::new(GameConfig::default()).unwrap();
//!
//! loop {
//!     engine.update(1.0 / 60.0); // 60 FPS
//! }
//! ```

pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod generation;
pub mod persistence;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::GameConfig;
    pub use crate::engine::{GameEngine, SettlementSummary};
    pub use crate::error::CommandError;
    pub use crate::events::{GameEvent, LoggedEvent};
}
