//! Systems - logic that operates on components

mod cards;
mod jobs;
mod movement;
mod tick;
mod upkeep;
mod work;

pub use cards::*;
pub use jobs::*;
pub use movement::*;
pub use tick::*;
pub use upkeep::*;
pub use work::*;

use hexbeast_logic::pathfinding::HexNavigator;
use hexbeast_logic::HexMap;

use crate::components::Settlements;
use crate::config::GameConfig;
use crate::events::{EventLog, GameEvent};

/// Engine state that systems share besides the ECS world.
pub struct TickContext<'a> {
    pub map: &'a mut HexMap,
    pub navigator: &'a mut HexNavigator,
    pub settlements: &'a mut Settlements,
    pub config: &'a GameConfig,
    pub events: &'a mut EventLog,
    pub tick: u64,
}

impl TickContext<'_> {
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(self.tick, event);
    }
}
