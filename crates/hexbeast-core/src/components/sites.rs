//! Map features agents work on: resource nodes and construction sites.

use hexbeast_logic::economy::{BuildingKind, ResourceKind, Stockpile};
use hexbeast_logic::jobs::SettlementId;
use serde::{Deserialize, Serialize};

/// A gatherable deposit. Despawned when empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceNode {
    pub resource: ResourceKind,
    pub remaining: u32,
}

impl ResourceNode {
    pub fn new(resource: ResourceKind, remaining: u32) -> Self {
        Self {
            resource,
            remaining,
        }
    }

    /// Extract up to `max`, returning the amount taken.
    pub fn extract(&mut self, max: u32) -> u32 {
        let taken = self.remaining.min(max);
        self.remaining -= taken;
        taken
    }

    pub fn is_depleted(&self) -> bool {
        self.remaining == 0
    }
}

/// A building in progress. Materials are hauled in first, then build jobs
/// finish it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructionSite {
    pub building: BuildingKind,
    pub settlement: SettlementId,
    pub delivered: Stockpile,
    pub build_done: u32,
}

impl ConstructionSite {
    pub fn new(building: BuildingKind, settlement: SettlementId) -> Self {
        Self {
            building,
            settlement,
            delivered: Stockpile::default(),
            build_done: 0,
        }
    }

    /// Materials of `kind` still missing.
    pub fn missing(&self, kind: ResourceKind) -> u32 {
        self.building
            .materials()
            .amount(kind)
            .saturating_sub(self.delivered.get(kind))
    }

    pub fn materials_complete(&self) -> bool {
        self.delivered.can_afford(&self.building.materials())
    }

    pub fn is_complete(&self) -> bool {
        self.materials_complete() && self.build_done >= self.building.build_jobs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_extraction() {
        let mut node = ResourceNode::new(ResourceKind::Stone, 5);
        assert_eq!(node.extract(3), 3);
        assert_eq!(node.extract(3), 2);
        assert!(node.is_depleted());
    }

    #[test]
    fn test_site_progress() {
        let mut site = ConstructionSite::new(BuildingKind::House, SettlementId(1));
        assert_eq!(site.missing(ResourceKind::Wood), 4);
        site.delivered.add(ResourceKind::Wood, 4);
        assert!(site.materials_complete());
        assert!(!site.is_complete());
        site.build_done = 1;
        assert!(site.is_complete());
    }
}
