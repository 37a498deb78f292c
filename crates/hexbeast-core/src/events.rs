//! Game events - a record of what happened each tick.
//!
//! Systems push events as they act; callers drain them to drive UI,
//! logging, or assertions. The log is bounded and is not saved.

use std::collections::VecDeque;

use hexbeast_logic::cards::CardId;
use hexbeast_logic::economy::{BuildingKind, ResourceKind};
use hexbeast_logic::jobs::{AgentId, JobId, JobKind, SettlementId};
use hexbeast_logic::{Hex, Terrain};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    JobAssigned {
        settlement: SettlementId,
        job: JobId,
        agent: AgentId,
        kind: JobKind,
    },
    JobCompleted {
        settlement: SettlementId,
        job: JobId,
        agent: AgentId,
        kind: JobKind,
    },
    /// Handed back to the queue after the agent could not carry it out.
    JobReleased {
        settlement: SettlementId,
        job: JobId,
        attempts: u8,
    },
    /// Removed after too many failed attempts.
    JobDropped {
        settlement: SettlementId,
        job: JobId,
        kind: JobKind,
        target: Hex,
    },
    ResourcesDeposited {
        settlement: SettlementId,
        resource: ResourceKind,
        amount: u32,
    },
    SiteFounded {
        settlement: SettlementId,
        building: BuildingKind,
        at: Hex,
    },
    BuildingCompleted {
        settlement: SettlementId,
        building: BuildingKind,
        at: Hex,
    },
    FoodShortage {
        settlement: SettlementId,
        demand: u32,
        eaten: u32,
    },
    AgentSummoned {
        settlement: SettlementId,
        agent: AgentId,
    },
    AgentDeserted {
        settlement: SettlementId,
        agent: AgentId,
    },
    CardPlayed {
        card: CardId,
        target: Hex,
    },
    TerrainChanged {
        at: Hex,
        terrain: Terrain,
    },
    BeastArrived {
        at: Hex,
    },
    TurnEnded {
        turn: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedEvent {
    pub tick: u64,
    pub event: GameEvent,
}

#[derive(Debug, Clone)]
pub struct EventLog {
    events: VecDeque<LoggedEvent>,
    capacity: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_capacity(4096)
    }
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record an event, dropping the oldest when full.
    pub fn push(&mut self, tick: u64, event: GameEvent) {
        if self.events.len() >= self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(LoggedEvent { tick, event });
    }

    pub fn drain(&mut self) -> Vec<LoggedEvent> {
        self.events.drain(..).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LoggedEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
