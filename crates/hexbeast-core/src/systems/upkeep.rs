//! Upkeep system - settlements eat, hunger builds, shrines make faith.

use std::collections::HashMap;

use hecs::{Entity, World};
use hexbeast_logic::economy::{starvation_level, upkeep, ResourceKind, StarvationLevel, Stockpile};
use hexbeast_logic::jobs::{AgentId, SettlementId};

use super::{abandon_agent, TickContext};
use crate::components::Agent;
use crate::events::GameEvent;

/// Feed every settlement from its stockpile.
///
/// A settlement that cannot meet its demand grows hungrier; one that eats
/// in full loses all hunger. When hunger reaches the desertion threshold
/// the newest resident leaves and hunger starts over. Shrine faith is paid
/// into `treasury`.
pub fn upkeep_system(world: &mut World, ctx: &mut TickContext, treasury: &mut Stockpile) {
    let mut residents: HashMap<SettlementId, Vec<(AgentId, Entity)>> = HashMap::new();
    for (entity, agent) in world.query::<&Agent>().iter() {
        residents.entry(agent.home).or_default().push((agent.id, entity));
    }

    let config = ctx.config;
    let mut shortages = Vec::new();
    let mut deserters = Vec::new();
    for settlement in ctx.settlements.iter_mut() {
        let homes = residents.get(&settlement.id);
        let population = homes.map_or(0, Vec::len) as u32;
        let demand = upkeep(population, config.food_per_agent);
        let level = starvation_level(&settlement.stockpile, demand);
        let eaten = settlement.stockpile.take(ResourceKind::Food, demand);

        match level {
            StarvationLevel::Fed => settlement.hunger = 0,
            StarvationLevel::Short | StarvationLevel::Starving => {
                settlement.hunger += 1;
                log::warn!(
                    "{} ate {}/{} food ({:?}, hunger {})",
                    settlement.name,
                    eaten,
                    demand,
                    level,
                    settlement.hunger
                );
                shortages.push(GameEvent::FoodShortage {
                    settlement: settlement.id,
                    demand,
                    eaten,
                });
            }
        }

        if settlement.hunger >= config.desertion_hunger {
            if let Some(&(agent, entity)) = homes.and_then(|h| h.iter().max_by_key(|(id, _)| *id)) {
                log::warn!("agent {} deserted {}", agent.0, settlement.name);
                deserters.push((settlement.id, agent, entity));
                settlement.hunger = 0;
            }
        }

        treasury.add(ResourceKind::Faith, settlement.faith_income);
    }

    for event in shortages {
        ctx.emit(event);
    }
    for (settlement, agent, entity) in deserters {
        abandon_agent(world, ctx, entity);
        let _ = world.despawn(entity);
        ctx.emit(GameEvent::AgentDeserted { settlement, agent });
    }
}
