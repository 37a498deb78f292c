//! Agents and the god beast.

use hecs::{Entity, World};
use hexbeast_logic::jobs::{AgentId, SettlementId};
use hexbeast_logic::{Hex, HexMap};
use rand::Rng;

use super::names::generate_name;
use crate::components::{Agent, AgentState, GodBeast, HexPosition, Name};

pub fn spawn_agent(
    world: &mut World,
    id: AgentId,
    home: SettlementId,
    at: Hex,
    name: Name,
) -> Entity {
    world.spawn((Agent { id, home }, HexPosition(at), AgentState::Idle, name))
}

/// Spawn `count` agents for a settlement, drawing ids from `next_id`.
pub fn generate_agents(
    world: &mut World,
    home: SettlementId,
    center: Hex,
    count: u32,
    next_id: &mut u32,
    rng: &mut impl Rng,
) -> Vec<Entity> {
    (0..count)
        .map(|_| {
            let id = AgentId(*next_id);
            *next_id += 1;
            spawn_agent(world, id, home, center, generate_name(rng))
        })
        .collect()
}

/// Place the beast on the first passable neighbor of `near`, or on `near`
/// itself when boxed in.
pub fn spawn_beast(world: &mut World, map: &HexMap, near: Hex, energy: u32) -> Entity {
    let at = near
        .neighbors()
        .into_iter()
        .find(|n| map.is_passable(*n))
        .unwrap_or(near);
    world.spawn((
        GodBeast::new(energy),
        HexPosition(at),
        Name::new("The Beast"),
    ))
}
