//! Job system - fills settlement queues and hands jobs to idle agents.

use std::collections::{HashMap, HashSet};

use hecs::{Entity, World};
use hexbeast_logic::economy::ResourceKind;
use hexbeast_logic::jobs::{
    match_jobs, AgentId, IdleAgent, JobId, JobKind, JobRequest, SettlementId,
};
use hexbeast_logic::Hex;

use super::{start_movement, TickContext};
use crate::components::{
    Agent, AgentState, AssignedJob, Carrying, ConstructionSite, HexPosition, JobStage, Movement,
    ResourceNode, Settlement, Settlements,
};
use crate::config::GameConfig;
use crate::events::GameEvent;

/// Resources agents gather and haul. Faith only comes from shrines and turns.
pub const MATERIALS: [ResourceKind; 3] =
    [ResourceKind::Food, ResourceKind::Wood, ResourceKind::Stone];

/// Stock level below which a settlement sends agents gathering.
pub fn stock_target(settlement: &Settlement, config: &GameConfig, kind: ResourceKind) -> u32 {
    let base = config.stock_targets.get(kind);
    if kind == ResourceKind::Food {
        base + settlement.food_bonus
    } else {
        base
    }
}

/// Queue gather, haul, and build jobs for every settlement.
///
/// A target never holds two jobs of the same kind. Sites get their next
/// haul or build job on the scan after the previous one finishes.
pub fn generate_jobs(world: &World, ctx: &mut TickContext) {
    let mut nodes: Vec<(Hex, ResourceKind)> = world
        .query::<(&HexPosition, &ResourceNode)>()
        .iter()
        .filter(|(_, (_, node))| !node.is_depleted())
        .map(|(_, (pos, node))| (pos.0, node.resource))
        .collect();
    nodes.sort_by_key(|(hex, _)| *hex);

    let mut sites: Vec<(Hex, ConstructionSite)> = world
        .query::<(&HexPosition, &ConstructionSite)>()
        .iter()
        .map(|(_, (pos, site))| (pos.0, *site))
        .collect();
    sites.sort_by_key(|(hex, _)| *hex);

    let in_hand = hauls_in_hand(world);
    let config = ctx.config;
    for settlement in ctx.settlements.iter_mut() {
        let id = settlement.id;
        queue_gathering(settlement, &nodes, config);
        for (at, site) in sites.iter().filter(|(_, s)| s.settlement == id) {
            queue_construction(settlement, *at, site, config, &in_hand);
        }
    }
}

/// Haul jobs whose goods have already left the stockpile.
fn hauls_in_hand(world: &World) -> HashSet<(SettlementId, JobId)> {
    let mut query = world.query::<(&AssignedJob, &Carrying)>();
    let in_hand = query
        .iter()
        .filter(|(_, (job, _))| job.kind == JobKind::Haul)
        .map(|(_, (job, _))| (job.settlement, job.job))
        .collect();
    in_hand
}

fn queue_gathering(
    settlement: &mut Settlement,
    nodes: &[(Hex, ResourceKind)],
    config: &GameConfig,
) {
    let center = settlement.center;
    for kind in MATERIALS {
        if settlement.stockpile.get(kind) >= stock_target(settlement, config, kind) {
            continue;
        }
        let active = settlement
            .jobs
            .iter()
            .filter(|j| j.kind == JobKind::Gather && j.resource == Some(kind))
            .count();
        let wanted = config.max_gather_jobs_per_resource.saturating_sub(active);
        if wanted == 0 {
            continue;
        }

        let mut candidates: Vec<Hex> = nodes
            .iter()
            .filter(|(hex, resource)| {
                *resource == kind
                    && hex.distance(center) <= config.gather_radius
                    && !settlement.jobs.has_job_for(JobKind::Gather, *hex)
            })
            .map(|(hex, _)| *hex)
            .collect();
        candidates.sort_by_key(|hex| (hex.distance(center), *hex));

        for hex in candidates.into_iter().take(wanted) {
            settlement
                .jobs
                .push(JobRequest::new(JobKind::Gather, hex).carrying(kind, config.gather_amount));
        }
    }
}

fn queue_construction(
    settlement: &mut Settlement,
    at: Hex,
    site: &ConstructionSite,
    config: &GameConfig,
    in_hand: &HashSet<(SettlementId, JobId)>,
) {
    if site.materials_complete() {
        if !site.is_complete() && !settlement.jobs.has_job_for(JobKind::Build, at) {
            settlement.jobs.push(JobRequest::new(JobKind::Build, at));
        }
        return;
    }
    if settlement.jobs.has_job_for(JobKind::Haul, at) {
        return;
    }

    let settlement_id = settlement.id;
    for kind in MATERIALS {
        let missing = site.missing(kind);
        if missing == 0 {
            continue;
        }
        // Stock already promised to hauls that have not been picked up.
        let reserved: u32 = settlement
            .jobs
            .iter()
            .filter(|j| j.kind == JobKind::Haul && j.resource == Some(kind))
            .filter(|j| !in_hand.contains(&(settlement_id, j.id)))
            .map(|j| j.amount)
            .sum();
        let available = settlement.stockpile.get(kind).saturating_sub(reserved);
        let chunk = missing.min(available).min(config.carry_capacity);
        if chunk > 0 {
            settlement
                .jobs
                .push(JobRequest::new(JobKind::Haul, at).carrying(kind, chunk));
            return;
        }
    }
}

/// Match idle agents to pending jobs and start them walking.
///
/// All idle agents form one pool; settlements are served in id order and
/// each takes the nearest agents for its oldest jobs. A job whose first leg
/// has no route is released. Jobs released too often are dropped.
pub fn assign_jobs(world: &mut World, ctx: &mut TickContext) {
    let mut entities: HashMap<AgentId, Entity> = HashMap::new();
    let mut pool: Vec<IdleAgent> = Vec::new();
    for (entity, (agent, pos, state, assigned)) in world
        .query::<(&Agent, &HexPosition, &AgentState, Option<&AssignedJob>)>()
        .iter()
    {
        if *state == AgentState::Idle && assigned.is_none() {
            entities.insert(agent.id, entity);
            pool.push(IdleAgent {
                id: agent.id,
                position: pos.0,
            });
        }
    }
    pool.sort_by_key(|a| a.id);

    let config = ctx.config;
    let tick = ctx.tick;
    for settlement in ctx.settlements.iter_mut() {
        if pool.is_empty() {
            break;
        }
        for assignment in match_jobs(&settlement.jobs, &mut pool) {
            let Some(job) = settlement.jobs.get(assignment.job).cloned() else {
                continue;
            };
            let Some(&entity) = entities.get(&assignment.agent) else {
                continue;
            };
            let (stage, goal) = if job.kind == JobKind::Haul {
                (JobStage::Pickup, settlement.center)
            } else {
                (JobStage::Travel, job.target)
            };

            let speed = config.agent_speed;
            if start_movement(world, ctx.map, ctx.navigator, entity, goal, speed).is_none() {
                settlement.jobs.release(job.id);
                log::debug!(
                    "{}: no route for {:?} job {} to {}",
                    settlement.name,
                    job.kind,
                    job.id.0,
                    goal
                );
                ctx.events.push(
                    tick,
                    GameEvent::JobReleased {
                        settlement: settlement.id,
                        job: job.id,
                        attempts: job.attempts.saturating_add(1),
                    },
                );
                continue;
            }

            settlement.jobs.claim(job.id, assignment.agent);
            let assigned = AssignedJob {
                settlement: settlement.id,
                job: job.id,
                kind: job.kind,
                target: job.target,
                resource: job.resource,
                amount: job.amount,
                stage,
                work_done: 0,
            };
            let _ = world.insert(entity, (assigned, AgentState::Moving));
            ctx.events.push(
                tick,
                GameEvent::JobAssigned {
                    settlement: settlement.id,
                    job: job.id,
                    agent: assignment.agent,
                    kind: job.kind,
                },
            );
        }
    }

    for settlement in ctx.settlements.iter_mut() {
        for job in settlement.jobs.retain_attempts(config.max_job_attempts) {
            log::warn!(
                "{} gave up on {:?} at {} after {} attempts",
                settlement.name,
                job.kind,
                job.target,
                job.attempts
            );
            ctx.events.push(
                tick,
                GameEvent::JobDropped {
                    settlement: settlement.id,
                    job: job.id,
                    kind: job.kind,
                    target: job.target,
                },
            );
        }
    }
}

/// Hand an agent's job back to its queue and make the agent idle.
///
/// Anything the agent carries goes back into the job's stockpile. Deposit
/// jobs belong to the agent that gathered the goods, so they are closed
/// instead of re-queued.
pub fn release_job(world: &mut World, ctx: &mut TickContext, entity: Entity) {
    let Ok(assigned) = world.remove_one::<AssignedJob>(entity) else {
        return;
    };
    let _ = world.remove_one::<Movement>(entity);
    let _ = world.insert_one(entity, AgentState::Idle);
    let carried = world.remove_one::<Carrying>(entity).ok();

    let Some(settlement) = ctx.settlements.get_mut(assigned.settlement) else {
        return;
    };
    if let Some(carried) = carried {
        settlement.stockpile.add(carried.resource, carried.amount);
    }
    if assigned.kind == JobKind::Deposit {
        settlement.jobs.complete(assigned.job);
        return;
    }
    if !settlement.jobs.release(assigned.job) {
        return;
    }
    let attempts = settlement
        .jobs
        .get(assigned.job)
        .map_or(0, |j| j.attempts);
    ctx.emit(GameEvent::JobReleased {
        settlement: assigned.settlement,
        job: assigned.job,
        attempts,
    });
}

/// Take an agent out of the job system before it leaves the world.
///
/// Goods it carries return to the stockpile of the job they were for (its
/// home when it holds none). Its deposits are closed and every other claim
/// it held goes back to the queue without counting as a failed attempt.
pub fn abandon_agent(world: &mut World, ctx: &mut TickContext, entity: Entity) {
    let Ok(agent) = world.get::<&Agent>(entity).map(|a| *a) else {
        return;
    };
    let assigned = world.remove_one::<AssignedJob>(entity).ok();
    let _ = world.remove_one::<Movement>(entity);
    if let Ok(carried) = world.remove_one::<Carrying>(entity) {
        let owner = assigned.map_or(agent.home, |job| job.settlement);
        if let Some(settlement) = ctx.settlements.get_mut(owner) {
            settlement.stockpile.add(carried.resource, carried.amount);
        }
    }

    let mut released = Vec::new();
    for settlement in ctx.settlements.iter_mut() {
        let held: Vec<(JobId, JobKind, u8)> = settlement
            .jobs
            .iter()
            .filter(|j| j.claimed_by == Some(agent.id))
            .map(|j| (j.id, j.kind, j.attempts))
            .collect();
        for (job, kind, attempts) in held {
            if kind == JobKind::Deposit {
                settlement.jobs.complete(job);
            } else {
                released.push((settlement.id, job, attempts));
            }
        }
        settlement.jobs.abandon_by(agent.id);
    }
    for (settlement, job, attempts) in released {
        ctx.emit(GameEvent::JobReleased {
            settlement,
            job,
            attempts,
        });
    }
}
