//! Settlement job queue and nearest-idle-agent matching.
//!
//! Jobs sit in a FIFO-ish queue owned by one settlement. A periodic scan
//! hands pending jobs, oldest first, to whichever idle agent is closest to
//! the job's target hex. Failed jobs go to the back of the queue and are
//! dropped once they have failed too often.

use serde::{Deserialize, Serialize};

use crate::economy::ResourceKind;
use crate::hex::Hex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SettlementId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobKind {
    /// Walk to a resource node and extract from it.
    Gather,
    /// Carry materials from the settlement stockpile to a construction site.
    Haul,
    /// Carry whatever the agent holds back to the settlement stockpile.
    Deposit,
    /// Work on a construction site that has its materials.
    Build,
}

impl JobKind {
    /// Work units needed once the agent stands on the target.
    pub fn work_required(self) -> u32 {
        match self {
            JobKind::Gather => 2,
            JobKind::Haul | JobKind::Deposit => 1,
            JobKind::Build => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub kind: JobKind,
    pub target: Hex,
    pub resource: Option<ResourceKind>,
    pub amount: u32,
    pub settlement: SettlementId,
    pub claimed_by: Option<AgentId>,
    /// Times this job was released because it could not be carried out.
    pub attempts: u8,
}

impl Job {
    pub fn is_claimed(&self) -> bool {
        self.claimed_by.is_some()
    }
}

/// What to enqueue; the queue fills in id and owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobRequest {
    pub kind: JobKind,
    pub target: Hex,
    pub resource: Option<ResourceKind>,
    pub amount: u32,
}

impl JobRequest {
    pub fn new(kind: JobKind, target: Hex) -> Self {
        Self {
            kind,
            target,
            resource: None,
            amount: 0,
        }
    }

    pub fn carrying(mut self, resource: ResourceKind, amount: u32) -> Self {
        self.resource = Some(resource);
        self.amount = amount;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobQueue {
    owner: SettlementId,
    jobs: Vec<Job>,
    next_id: u32,
}

impl JobQueue {
    pub fn new(owner: SettlementId) -> Self {
        Self {
            owner,
            jobs: Vec::new(),
            next_id: 1,
        }
    }

    pub fn owner(&self) -> SettlementId {
        self.owner
    }

    fn make(&mut self, req: JobRequest) -> Job {
        let id = JobId(self.next_id);
        self.next_id += 1;
        Job {
            id,
            kind: req.kind,
            target: req.target,
            resource: req.resource,
            amount: req.amount,
            settlement: self.owner,
            claimed_by: None,
            attempts: 0,
        }
    }

    pub fn push(&mut self, req: JobRequest) -> JobId {
        let job = self.make(req);
        let id = job.id;
        self.jobs.push(job);
        id
    }

    /// Enqueue ahead of everything else.
    pub fn push_front(&mut self, req: JobRequest) -> JobId {
        let job = self.make(req);
        let id = job.id;
        self.jobs.insert(0, job);
        id
    }

    /// Add a job that is claimed from the start (follow-up work for an agent).
    pub fn push_claimed(&mut self, req: JobRequest, agent: AgentId) -> JobId {
        let mut job = self.make(req);
        job.claimed_by = Some(agent);
        let id = job.id;
        self.jobs.push(job);
        id
    }

    /// Unclaimed jobs in queue order.
    pub fn pending(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter().filter(|j| !j.is_claimed())
    }

    pub fn pending_count(&self) -> usize {
        self.pending().count()
    }

    pub fn get(&self, id: JobId) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }

    /// Claim an unclaimed job. Returns false if missing or already claimed.
    pub fn claim(&mut self, id: JobId, agent: AgentId) -> bool {
        match self.jobs.iter_mut().find(|j| j.id == id) {
            Some(job) if job.claimed_by.is_none() => {
                job.claimed_by = Some(agent);
                true
            }
            _ => false,
        }
    }

    /// Give a job back after a failure: unclaim it, count the attempt, and
    /// move it to the back of the queue.
    pub fn release(&mut self, id: JobId) -> bool {
        let Some(idx) = self.jobs.iter().position(|j| j.id == id) else {
            return false;
        };
        let mut job = self.jobs.remove(idx);
        job.claimed_by = None;
        job.attempts = job.attempts.saturating_add(1);
        self.jobs.push(job);
        true
    }

    /// Unclaim everything held by an agent that is gone, without counting it
    /// against the jobs.
    pub fn abandon_by(&mut self, agent: AgentId) -> usize {
        let mut count = 0;
        for job in self.jobs.iter_mut().filter(|j| j.claimed_by == Some(agent)) {
            job.claimed_by = None;
            count += 1;
        }
        count
    }

    /// Remove a finished job.
    pub fn complete(&mut self, id: JobId) -> Option<Job> {
        let idx = self.jobs.iter().position(|j| j.id == id)?;
        Some(self.jobs.remove(idx))
    }

    pub fn has_job_for(&self, kind: JobKind, target: Hex) -> bool {
        self.jobs.iter().any(|j| j.kind == kind && j.target == target)
    }

    pub fn count_for(&self, kind: JobKind, target: Hex) -> usize {
        self.jobs
            .iter()
            .filter(|j| j.kind == kind && j.target == target)
            .count()
    }

    /// Drop unclaimed jobs that failed `max_attempts` times or more.
    pub fn retain_attempts(&mut self, max_attempts: u8) -> Vec<Job> {
        let (dropped, kept): (Vec<Job>, Vec<Job>) = std::mem::take(&mut self.jobs)
            .into_iter()
            .partition(|j| !j.is_claimed() && j.attempts >= max_attempts);
        self.jobs = kept;
        dropped
    }

    /// Remove every job aimed at `target`, claimed or not.
    pub fn remove_target(&mut self, target: Hex) -> Vec<Job> {
        let (removed, kept): (Vec<Job>, Vec<Job>) = std::mem::take(&mut self.jobs)
            .into_iter()
            .partition(|j| j.target == target);
        self.jobs = kept;
        removed
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdleAgent {
    pub id: AgentId,
    pub position: Hex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub job: JobId,
    pub agent: AgentId,
    pub target: Hex,
}

/// Greedy nearest-agent matching.
///
/// Walks pending jobs in queue order and gives each to the idle agent with
/// the smallest hex distance to its target (ties go to the lower agent id).
/// Matched agents are removed from `pool`. Stops when either side runs out.
/// The queue is not modified; callers claim the returned jobs.
pub fn match_jobs(queue: &JobQueue, pool: &mut Vec<IdleAgent>) -> Vec<Assignment> {
    let mut assignments = Vec::new();
    for job in queue.pending() {
        if pool.is_empty() {
            break;
        }
        let Some(best) = pool
            .iter()
            .enumerate()
            .min_by_key(|(_, a)| (a.position.distance(job.target), a.id))
            .map(|(i, _)| i)
        else {
            break;
        };
        let agent = pool.swap_remove(best);
        assignments.push(Assignment {
            job: job.id,
            agent: agent.id,
            target: job.target,
        });
    }
    assignments
}
