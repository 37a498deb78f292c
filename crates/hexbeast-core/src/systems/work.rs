//! Work system - carries agents through the legs of their jobs.
//!
//! Runs on agents that hold an `AssignedJob` and are not moving. Pickup
//! legs draw materials from the stockpile, travel legs turn into work once
//! the agent stands on the target, and work accumulates one unit per tick
//! until the job finishes.

use hecs::{Component, Entity, World};
use hexbeast_logic::economy::BuildingKind;
use hexbeast_logic::jobs::{AgentId, JobKind, JobRequest};
use hexbeast_logic::{Hex, Terrain};

use super::{release_job, start_movement, TickContext};
use crate::components::{
    Agent, AgentState, AssignedJob, Carrying, ConstructionSite, HexPosition, JobStage, Movement,
    ResourceNode,
};
use crate::events::GameEvent;

/// Capacity added to a settlement by each house.
pub const HOUSE_CAPACITY: u32 = 2;
/// Extra food a settlement stocks for each granary.
pub const GRANARY_FOOD: u32 = 10;

pub fn work_system(world: &mut World, ctx: &mut TickContext) {
    let mut ready: Vec<(Entity, AgentId, Hex, AssignedJob)> = world
        .query::<(&Agent, &HexPosition, &AssignedJob, Option<&Movement>)>()
        .iter()
        .filter(|(_, (_, _, _, movement))| movement.is_none())
        .map(|(entity, (agent, pos, job, _))| (entity, agent.id, pos.0, *job))
        .collect();
    ready.sort_by_key(|(_, id, _, _)| *id);

    for (entity, agent, at, job) in ready {
        match job.stage {
            JobStage::Pickup => pick_up(world, ctx, entity, at, job),
            JobStage::Travel => arrive(world, ctx, entity, at, job),
            JobStage::Working => do_work(world, ctx, entity, agent, job),
        }
    }
}

/// First entity with component `T` standing on `hex`.
pub fn entity_at<T: Component>(world: &World, hex: Hex) -> Option<Entity> {
    let mut query = world.query::<(&HexPosition, &T)>();
    let found = query
        .iter()
        .find(|(_, (pos, _))| pos.0 == hex)
        .map(|(entity, _)| entity);
    found
}

fn walk_to(world: &mut World, ctx: &mut TickContext, entity: Entity, goal: Hex) {
    let speed = ctx.config.agent_speed;
    if start_movement(world, ctx.map, ctx.navigator, entity, goal, speed).is_none() {
        release_job(world, ctx, entity);
    }
}

fn pick_up(
    world: &mut World,
    ctx: &mut TickContext,
    entity: Entity,
    at: Hex,
    mut job: AssignedJob,
) {
    let Some(settlement) = ctx.settlements.get_mut(job.settlement) else {
        release_job(world, ctx, entity);
        return;
    };
    let center = settlement.center;
    if at != center {
        walk_to(world, ctx, entity, center);
        return;
    }

    let taken = match job.resource {
        Some(resource) => settlement.stockpile.take(resource, job.amount),
        None => 0,
    };
    let Some(resource) = job.resource.filter(|_| taken > 0) else {
        log::debug!("{} has nothing to haul for job {}", settlement.name, job.job.0);
        release_job(world, ctx, entity);
        return;
    };

    job.amount = taken;
    job.stage = JobStage::Travel;
    let carried = Carrying {
        resource,
        amount: taken,
    };
    let _ = world.insert(entity, (job, carried));
    walk_to(world, ctx, entity, job.target);
}

fn arrive(world: &mut World, ctx: &mut TickContext, entity: Entity, at: Hex, mut job: AssignedJob) {
    if at != job.target {
        walk_to(world, ctx, entity, job.target);
        return;
    }
    job.stage = JobStage::Working;
    let _ = world.insert(entity, (job, AgentState::Working));
}

fn do_work(
    world: &mut World,
    ctx: &mut TickContext,
    entity: Entity,
    agent: AgentId,
    mut job: AssignedJob,
) {
    job.work_done += 1;
    if !job.is_complete() {
        let _ = world.insert_one(entity, job);
        return;
    }
    match job.kind {
        JobKind::Gather => finish_gather(world, ctx, entity, agent, &job),
        JobKind::Deposit => finish_deposit(world, ctx, entity, agent, &job),
        JobKind::Haul => finish_haul(world, ctx, entity, agent, &job),
        JobKind::Build => finish_build(world, ctx, entity, agent, &job),
    }
}

fn complete_job(
    world: &mut World,
    ctx: &mut TickContext,
    entity: Entity,
    agent: AgentId,
    job: &AssignedJob,
) {
    let _ = world.remove_one::<AssignedJob>(entity);
    let _ = world.insert_one(entity, AgentState::Idle);
    let removed = ctx
        .settlements
        .get_mut(job.settlement)
        .and_then(|s| s.jobs.complete(job.job))
        .is_some();
    if removed {
        ctx.emit(GameEvent::JobCompleted {
            settlement: job.settlement,
            job: job.job,
            agent,
            kind: job.kind,
        });
    }
}

fn finish_gather(
    world: &mut World,
    ctx: &mut TickContext,
    entity: Entity,
    agent: AgentId,
    job: &AssignedJob,
) {
    // The node decides what comes out; terraforming may have changed it.
    let mut taken = 0;
    let mut resource = job.resource;
    if let Some(node_entity) = entity_at::<ResourceNode>(world, job.target) {
        let mut depleted = false;
        if let Ok(mut node) = world.get::<&mut ResourceNode>(node_entity) {
            taken = node.extract(job.amount);
            depleted = node.is_depleted();
            resource = Some(node.resource);
        }
        if depleted {
            log::debug!("resource node at {} is exhausted", job.target);
            let _ = world.despawn(node_entity);
        }
    }
    complete_job(world, ctx, entity, agent, job);

    let Some(resource) = resource.filter(|_| taken > 0) else {
        return;
    };
    let Some(settlement) = ctx.settlements.get_mut(job.settlement) else {
        return;
    };
    let center = settlement.center;
    let deposit = settlement.jobs.push_claimed(
        JobRequest::new(JobKind::Deposit, center).carrying(resource, taken),
        agent,
    );
    let follow_up = AssignedJob {
        settlement: job.settlement,
        job: deposit,
        kind: JobKind::Deposit,
        target: center,
        resource: Some(resource),
        amount: taken,
        stage: JobStage::Travel,
        work_done: 0,
    };
    let carried = Carrying {
        resource,
        amount: taken,
    };
    let _ = world.insert(entity, (follow_up, carried, AgentState::Moving));
    walk_to(world, ctx, entity, center);
}

fn finish_deposit(
    world: &mut World,
    ctx: &mut TickContext,
    entity: Entity,
    agent: AgentId,
    job: &AssignedJob,
) {
    if let Ok(carried) = world.remove_one::<Carrying>(entity) {
        if let Some(settlement) = ctx.settlements.get_mut(job.settlement) {
            settlement.stockpile.add(carried.resource, carried.amount);
            log::debug!(
                "{} stored {} {}",
                settlement.name,
                carried.amount,
                carried.resource.name()
            );
        }
        ctx.emit(GameEvent::ResourcesDeposited {
            settlement: job.settlement,
            resource: carried.resource,
            amount: carried.amount,
        });
    }
    complete_job(world, ctx, entity, agent, job);
}

fn finish_haul(
    world: &mut World,
    ctx: &mut TickContext,
    entity: Entity,
    agent: AgentId,
    job: &AssignedJob,
) {
    if let Ok(carried) = world.remove_one::<Carrying>(entity) {
        let mut delivered = false;
        if let Some(site_entity) = entity_at::<ConstructionSite>(world, job.target) {
            if let Ok(mut site) = world.get::<&mut ConstructionSite>(site_entity) {
                site.delivered.add(carried.resource, carried.amount);
                delivered = true;
            }
        }
        if !delivered {
            // Site is gone; the goods go back to the stockpile.
            if let Some(settlement) = ctx.settlements.get_mut(job.settlement) {
                settlement.stockpile.add(carried.resource, carried.amount);
            }
        }
    }
    complete_job(world, ctx, entity, agent, job);
}

fn finish_build(
    world: &mut World,
    ctx: &mut TickContext,
    entity: Entity,
    agent: AgentId,
    job: &AssignedJob,
) {
    complete_job(world, ctx, entity, agent, job);

    let Some(site_entity) = entity_at::<ConstructionSite>(world, job.target) else {
        return;
    };
    let site = {
        let Ok(mut site) = world.get::<&mut ConstructionSite>(site_entity) else {
            return;
        };
        site.build_done += 1;
        *site
    };
    if site.is_complete() {
        let _ = world.despawn(site_entity);
        complete_building(ctx, job.target, site);
    }
}

/// Apply a finished building to its settlement and the map.
pub fn complete_building(ctx: &mut TickContext, at: Hex, site: ConstructionSite) {
    let Some(settlement) = ctx.settlements.get_mut(site.settlement) else {
        return;
    };
    match site.building {
        BuildingKind::House => settlement.capacity += HOUSE_CAPACITY,
        BuildingKind::Shrine => settlement.faith_income += 1,
        BuildingKind::Granary => settlement.food_bonus += GRANARY_FOOD,
    }
    settlement.jobs.remove_target(at);
    log::info!(
        "{} finished a {} at {}",
        settlement.name,
        site.building.name(),
        at
    );

    if site.building == BuildingKind::Shrine && ctx.map.set_terrain(at, Terrain::Sacred) {
        ctx.navigator.invalidate();
        ctx.emit(GameEvent::TerrainChanged {
            at,
            terrain: Terrain::Sacred,
        });
    }
    ctx.emit(GameEvent::BuildingCompleted {
        settlement: site.settlement,
        building: site.building,
        at,
    });
}
