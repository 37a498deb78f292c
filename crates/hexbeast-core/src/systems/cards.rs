//! Card effects - how a played card changes the world.
//!
//! Every effect checks its target before touching anything, so a failed
//! play leaves the world exactly as it was.

use hecs::{Entity, World};
use hexbeast_logic::cards::CardEffect;
use hexbeast_logic::economy::{BuildingKind, ResourceKind};
use hexbeast_logic::jobs::{AgentId, SettlementId};
use hexbeast_logic::pathfinding::path_cost;
use hexbeast_logic::{Hex, Terrain};

use super::{entity_at, TickContext};
use crate::components::{Agent, ConstructionSite, GodBeast, HexPosition, Movement, ResourceNode};
use crate::error::CommandError;
use crate::events::GameEvent;

/// The god beast entity and where it stands.
pub fn find_beast(world: &World) -> Option<(Entity, Hex)> {
    let mut query = world.query::<(&GodBeast, &HexPosition)>();
    let found = query.iter().next().map(|(entity, (_, pos))| (entity, pos.0));
    found
}

/// Apply `effect` at `target`.
///
/// `recruit` spawns a new agent for a settlement at the given hex and
/// returns its id; only summoning calls it.
pub fn apply_card_effect(
    world: &mut World,
    ctx: &mut TickContext,
    effect: CardEffect,
    target: Hex,
    recruit: impl FnOnce(&mut World, SettlementId, Hex) -> AgentId,
) -> Result<(), CommandError> {
    if !ctx.map.contains(target) {
        return Err(CommandError::OffMap(target));
    }
    match effect {
        CardEffect::MoveBeast { range } => send_beast(world, ctx, target, range).map(|_| ()),
        CardEffect::Bless { resource, amount } => bless(ctx, target, resource, amount),
        CardEffect::Terraform { terrain } => terraform(world, ctx, target, terrain),
        CardEffect::SummonAgent => summon(world, ctx, target, recruit),
        CardEffect::OrderBuild { building } => order_build(world, ctx, target, building),
        CardEffect::Enrich { resource, amount } => enrich(world, ctx, target, resource, amount),
    }
}

/// Walk the beast to `target` if the route costs at most `budget`.
pub fn send_beast(
    world: &mut World,
    ctx: &mut TickContext,
    target: Hex,
    budget: u32,
) -> Result<u32, CommandError> {
    let (beast, from) = find_beast(world).ok_or(CommandError::NoBeast)?;
    if !ctx.map.is_passable(target) {
        return Err(CommandError::Impassable(target));
    }
    let path = ctx
        .navigator
        .find_path(ctx.map, from, target)
        .ok_or(CommandError::Unreachable(target))?;
    let cost = path_cost(ctx.map, &path).ok_or(CommandError::Unreachable(target))?;
    if cost > budget {
        return Err(CommandError::TooFar { cost, budget });
    }
    if path.len() > 1 {
        let _ = world.insert_one(beast, Movement::new(path, ctx.config.beast_speed));
    }
    log::debug!("beast heading from {} to {} (cost {})", from, target, cost);
    Ok(cost)
}

fn bless(
    ctx: &mut TickContext,
    target: Hex,
    resource: ResourceKind,
    amount: u32,
) -> Result<(), CommandError> {
    let settlement = ctx
        .settlements
        .list
        .iter_mut()
        .filter(|s| s.center.distance(target) <= 1)
        .min_by_key(|s| (s.center.distance(target), s.id))
        .ok_or(CommandError::NoSettlement(target))?;
    settlement.stockpile.add(resource, amount);
    log::info!("{} blessed with {} {}", settlement.name, amount, resource.name());
    Ok(())
}

fn terraform(
    world: &mut World,
    ctx: &mut TickContext,
    target: Hex,
    terrain: Terrain,
) -> Result<(), CommandError> {
    if ctx.settlements.at(target).is_some()
        || entity_at::<ConstructionSite>(world, target).is_some()
    {
        return Err(CommandError::Occupied(target));
    }
    if !terrain.is_passable() {
        let mut standing = world.query::<(&HexPosition, Option<&Agent>, Option<&GodBeast>)>();
        if standing
            .iter()
            .any(|(_, (pos, agent, beast))| pos.0 == target && (agent.is_some() || beast.is_some()))
        {
            return Err(CommandError::Occupied(target));
        }
    }

    ctx.map.set_terrain(target, terrain);
    ctx.navigator.invalidate();

    if let Some(node_entity) = entity_at::<ResourceNode>(world, target) {
        match terrain.resource() {
            Some(kind) => {
                if let Ok(mut node) = world.get::<&mut ResourceNode>(node_entity) {
                    node.resource = kind;
                }
            }
            None => {
                let _ = world.despawn(node_entity);
            }
        }
    }
    for settlement in ctx.settlements.iter_mut() {
        settlement.jobs.remove_target(target);
    }

    log::info!("terrain at {} is now {:?}", target, terrain);
    ctx.emit(GameEvent::TerrainChanged { at: target, terrain });
    Ok(())
}

fn summon(
    world: &mut World,
    ctx: &mut TickContext,
    target: Hex,
    recruit: impl FnOnce(&mut World, SettlementId, Hex) -> AgentId,
) -> Result<(), CommandError> {
    let settlement = ctx
        .settlements
        .nearest(target, 1)
        .ok_or(CommandError::NoSettlement(target))?;
    let (home, center, capacity) = (settlement.id, settlement.center, settlement.capacity);
    let population = world
        .query::<&Agent>()
        .iter()
        .filter(|(_, agent)| agent.home == home)
        .count() as u32;
    if population >= capacity {
        return Err(CommandError::SettlementFull { capacity });
    }

    let agent = recruit(world, home, center);
    log::info!("agent {} answered the call at {}", agent.0, center);
    ctx.emit(GameEvent::AgentSummoned {
        settlement: home,
        agent,
    });
    Ok(())
}

fn order_build(
    world: &mut World,
    ctx: &mut TickContext,
    target: Hex,
    building: BuildingKind,
) -> Result<(), CommandError> {
    if !ctx.map.is_passable(target) {
        return Err(CommandError::Impassable(target));
    }
    if ctx.settlements.at(target).is_some()
        || entity_at::<ConstructionSite>(world, target).is_some()
        || entity_at::<ResourceNode>(world, target).is_some()
    {
        return Err(CommandError::Occupied(target));
    }
    let owner = ctx
        .settlements
        .nearest(target, ctx.config.gather_radius)
        .ok_or(CommandError::NoSettlement(target))?;
    let (settlement, name) = (owner.id, owner.name.clone());

    world.spawn((HexPosition(target), ConstructionSite::new(building, settlement)));
    log::info!("{} laid out a {} at {}", name, building.name(), target);
    ctx.emit(GameEvent::SiteFounded {
        settlement,
        building,
        at: target,
    });
    Ok(())
}

fn enrich(
    world: &mut World,
    ctx: &mut TickContext,
    target: Hex,
    resource: ResourceKind,
    amount: u32,
) -> Result<(), CommandError> {
    if !ctx.map.is_passable(target) {
        return Err(CommandError::Impassable(target));
    }
    if ctx.settlements.at(target).is_some()
        || entity_at::<ConstructionSite>(world, target).is_some()
    {
        return Err(CommandError::Occupied(target));
    }

    match entity_at::<ResourceNode>(world, target) {
        Some(node_entity) => {
            if let Ok(mut node) = world.get::<&mut ResourceNode>(node_entity) {
                if node.resource == resource {
                    node.remaining = node.remaining.saturating_add(amount);
                } else {
                    *node = ResourceNode::new(resource, amount);
                }
            }
        }
        None => {
            world.spawn((HexPosition(target), ResourceNode::new(resource, amount)));
        }
    }
    log::debug!("{} {} enriched at {}", amount, resource.name(), target);
    Ok(())
}
