//! Settlements: a center hex, a stockpile, and a job queue.
//!
//! Settlements are few and long-lived, so they live in a registry owned by
//! the engine rather than in the ECS world.

use hexbeast_logic::economy::{ResourceKind, Stockpile};
use hexbeast_logic::jobs::{JobQueue, SettlementId};
use hexbeast_logic::Hex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub id: SettlementId,
    pub name: String,
    pub center: Hex,
    pub stockpile: Stockpile,
    pub jobs: JobQueue,
    /// Most agents that can call this settlement home.
    pub capacity: u32,
    /// Upkeeps in a row that went short on food.
    pub hunger: u32,
    /// Extra food kept on hand, from granaries.
    pub food_bonus: u32,
    /// Faith produced each upkeep, from shrines.
    pub faith_income: u32,
}

impl Settlement {
    pub fn new(id: SettlementId, name: impl Into<String>, center: Hex, capacity: u32) -> Self {
        Self {
            id,
            name: name.into(),
            center,
            stockpile: Stockpile::default(),
            jobs: JobQueue::new(id),
            capacity,
            hunger: 0,
            food_bonus: 0,
            faith_income: 0,
        }
    }
}

/// Stockpile levels a settlement tries to keep; gathering stops above them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockTargets {
    pub food: u32,
    pub wood: u32,
    pub stone: u32,
}

impl StockTargets {
    pub fn get(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Food => self.food,
            ResourceKind::Wood => self.wood,
            ResourceKind::Stone => self.stone,
            ResourceKind::Faith => 0,
        }
    }
}

/// All settlements, in id order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settlements {
    pub list: Vec<Settlement>,
    next_id: u32,
}

impl Settlements {
    pub fn new() -> Self {
        Self {
            list: Vec::new(),
            next_id: 1,
        }
    }

    pub fn found(&mut self, name: impl Into<String>, center: Hex, capacity: u32) -> SettlementId {
        if self.next_id == 0 {
            self.next_id = 1;
        }
        let id = SettlementId(self.next_id);
        self.next_id += 1;
        self.list.push(Settlement::new(id, name, center, capacity));
        id
    }

    pub fn get(&self, id: SettlementId) -> Option<&Settlement> {
        self.list.iter().find(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: SettlementId) -> Option<&mut Settlement> {
        self.list.iter_mut().find(|s| s.id == id)
    }

    pub fn at(&self, center: Hex) -> Option<&Settlement> {
        self.list.iter().find(|s| s.center == center)
    }

    /// Closest settlement to `hex` within `max_distance` (ties: lower id).
    pub fn nearest(&self, hex: Hex, max_distance: i32) -> Option<&Settlement> {
        self.list
            .iter()
            .filter(|s| s.center.distance(hex) <= max_distance)
            .min_by_key(|s| (s.center.distance(hex), s.id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Settlement> {
        self.list.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Settlement> {
        self.list.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}
