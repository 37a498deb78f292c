//! Pure economy logic: stockpiles, costs, upkeep.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    Food,
    Wood,
    Stone,
    /// Spent by the player to play cards; never gathered by agents.
    Faith,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Food,
        ResourceKind::Wood,
        ResourceKind::Stone,
        ResourceKind::Faith,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ResourceKind::Food => "food",
            ResourceKind::Wood => "wood",
            ResourceKind::Stone => "stone",
            ResourceKind::Faith => "faith",
        }
    }
}

/// A resource bill. Order is irrelevant; repeated kinds add up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cost(pub Vec<(ResourceKind, u32)>);

impl Cost {
    pub fn free() -> Self {
        Self(Vec::new())
    }

    pub fn of(kind: ResourceKind, amount: u32) -> Self {
        Self(vec![(kind, amount)])
    }

    pub fn and(mut self, kind: ResourceKind, amount: u32) -> Self {
        self.0.push((kind, amount));
        self
    }

    /// Total required of one kind.
    pub fn amount(&self, kind: ResourceKind) -> u32 {
        self.0
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, a)| *a)
            .sum()
    }

    pub fn is_free(&self) -> bool {
        self.0.iter().all(|(_, a)| *a == 0)
    }
}

/// Whole-unit resource store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stockpile {
    pub food: u32,
    pub wood: u32,
    pub stone: u32,
    pub faith: u32,
}

impl Stockpile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: ResourceKind, amount: u32) -> Self {
        self.add(kind, amount);
        self
    }

    pub fn get(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Food => self.food,
            ResourceKind::Wood => self.wood,
            ResourceKind::Stone => self.stone,
            ResourceKind::Faith => self.faith,
        }
    }

    pub fn get_mut(&mut self, kind: ResourceKind) -> &mut u32 {
        match kind {
            ResourceKind::Food => &mut self.food,
            ResourceKind::Wood => &mut self.wood,
            ResourceKind::Stone => &mut self.stone,
            ResourceKind::Faith => &mut self.faith,
        }
    }

    pub fn add(&mut self, kind: ResourceKind, amount: u32) {
        let slot = self.get_mut(kind);
        *slot = slot.saturating_add(amount);
    }

    pub fn can_afford(&self, cost: &Cost) -> bool {
        ResourceKind::ALL
            .iter()
            .all(|k| self.get(*k) >= cost.amount(*k))
    }

    /// Pay the whole bill or nothing.
    pub fn spend(&mut self, cost: &Cost) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        for (kind, amount) in &cost.0 {
            *self.get_mut(*kind) -= amount;
        }
        true
    }

    /// Remove up to `max` of a resource, returning what was actually taken.
    pub fn take(&mut self, kind: ResourceKind, max: u32) -> u32 {
        let slot = self.get_mut(kind);
        let taken = (*slot).min(max);
        *slot -= taken;
        taken
    }

    pub fn total(&self) -> u32 {
        self.food + self.wood + self.stone + self.faith
    }
}

/// Structures a settlement can raise on a construction site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    /// Room for two more agents.
    House,
    /// Consecrates its tile and yields faith every upkeep.
    Shrine,
    /// Raises the food a settlement tries to keep on hand.
    Granary,
}

impl BuildingKind {
    /// Materials that must be hauled to the site before building starts.
    pub fn materials(self) -> Cost {
        match self {
            BuildingKind::House => Cost::of(ResourceKind::Wood, 4),
            BuildingKind::Shrine => Cost::of(ResourceKind::Stone, 3).and(ResourceKind::Wood, 1),
            BuildingKind::Granary => Cost::of(ResourceKind::Wood, 3).and(ResourceKind::Stone, 2),
        }
    }

    /// Build jobs needed after materials arrive.
    pub fn build_jobs(self) -> u32 {
        match self {
            BuildingKind::House => 1,
            BuildingKind::Shrine => 2,
            BuildingKind::Granary => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BuildingKind::House => "house",
            BuildingKind::Shrine => "shrine",
            BuildingKind::Granary => "granary",
        }
    }
}

/// Food eaten per upkeep interval by a population.
pub fn upkeep(population: u32, food_per_agent: u32) -> u32 {
    population.saturating_mul(food_per_agent)
}

/// How badly a settlement is starving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StarvationLevel {
    Fed,
    /// Some demand went unmet.
    Short,
    /// Nothing at all to eat.
    Starving,
}

pub fn starvation_level(stockpile: &Stockpile, demand: u32) -> StarvationLevel {
    if demand == 0 || stockpile.food >= demand {
        StarvationLevel::Fed
    } else if stockpile.food > 0 {
        StarvationLevel::Short
    } else {
        StarvationLevel::Starving
    }
}
