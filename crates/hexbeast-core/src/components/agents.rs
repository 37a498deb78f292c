//! Agent and god beast components.

use hexbeast_logic::economy::ResourceKind;
use hexbeast_logic::jobs::{AgentId, JobId, JobKind, SettlementId};
use hexbeast_logic::Hex;
use serde::{Deserialize, Serialize};

/// A population agent. `home` is the settlement that feeds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub home: SettlementId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AgentState {
    #[default]
    Idle,
    /// Walking toward the current leg of a job.
    Moving,
    /// Standing on the job target, doing work.
    Working,
}

/// Which leg of a job an agent is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStage {
    /// Hauling only: heading to the settlement center to pick up materials.
    Pickup,
    /// Heading to the job target.
    Travel,
    /// At the target, accumulating work.
    Working,
}

/// A claimed job, attached to the agent doing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedJob {
    pub settlement: SettlementId,
    pub job: JobId,
    pub kind: JobKind,
    pub target: Hex,
    pub resource: Option<ResourceKind>,
    pub amount: u32,
    pub stage: JobStage,
    pub work_done: u32,
}

impl AssignedJob {
    pub fn is_complete(&self) -> bool {
        self.work_done >= self.kind.work_required()
    }
}

/// Goods held by an agent between pickup and drop-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Carrying {
    pub resource: ResourceKind,
    pub amount: u32,
}

/// The player's avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GodBeast {
    /// Movement budget for direct move orders, refilled each turn.
    pub energy: u32,
    pub max_energy: u32,
}

impl GodBeast {
    pub fn new(max_energy: u32) -> Self {
        Self {
            energy: max_energy,
            max_energy,
        }
    }

    pub fn refill(&mut self) {
        self.energy = self.max_energy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assigned_job_completion() {
        let mut job = AssignedJob {
            settlement: SettlementId(1),
            job: JobId(1),
            kind: JobKind::Gather,
            target: Hex::ORIGIN,
            resource: Some(ResourceKind::Wood),
            amount: 3,
            stage: JobStage::Working,
            work_done: 0,
        };
        assert!(!job.is_complete());
        job.work_done = JobKind::Gather.work_required();
        assert!(job.is_complete());
    }

    #[test]
    fn test_beast_refill() {
        let mut beast = GodBeast::new(5);
        beast.energy = 1;
        beast.refill();
        assert_eq!(beast.energy, 5);
    }
}
