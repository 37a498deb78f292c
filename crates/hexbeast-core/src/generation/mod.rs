//! Generation - procedural creation of the map, settlements, and population.

mod map;
mod names;
mod population;

pub use map::*;
pub use names::*;
pub use population::*;

use hecs::World;
use hexbeast_logic::economy::ResourceKind;
use hexbeast_logic::HexMap;
use rand::Rng;

use crate::components::Settlements;
use crate::config::GameConfig;

/// Everything a new game starts with.
pub struct GeneratedWorld {
    pub world: World,
    pub map: HexMap,
    pub settlements: Settlements,
    pub next_agent_id: u32,
}

/// Build a new world from `config`. The same rng state gives the same world.
pub fn generate_world(config: &GameConfig, rng: &mut impl Rng) -> GeneratedWorld {
    let mut world = World::new();
    let mut map = generate_terrain(config.map_radius, rng);
    let mut settlements = Settlements::new();

    let centers = settlement_sites(config.map_radius, config.settlement_count);
    for center in &centers {
        clear_site(&mut map, *center);
    }
    scatter_nodes(&mut world, &map, config.node_density, &centers, rng);

    let mut next_agent_id = 1;
    for (index, center) in centers.iter().enumerate() {
        guarantee_nodes(&mut world, &mut map, *center, &centers, rng);
        let id = settlements.found(settlement_name(index), *center, config.settlement_capacity);
        if let Some(settlement) = settlements.get_mut(id) {
            settlement.stockpile.add(ResourceKind::Food, config.starting_food);
        }
        generate_agents(
            &mut world,
            id,
            *center,
            config.agents_per_settlement,
            &mut next_agent_id,
            rng,
        );
    }

    spawn_beast(&mut world, &map, centers[0], config.beast_energy);

    log::info!(
        "generated {} hexes, {} settlements, {} agents",
        map.len(),
        settlements.len(),
        next_agent_id - 1
    );

    GeneratedWorld {
        world,
        map,
        settlements,
        next_agent_id,
    }
}
