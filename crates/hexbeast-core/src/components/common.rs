//! Common components used across multiple entity types.

use hexbeast_logic::Hex;
use serde::{Deserialize, Serialize};

/// Which hex an entity stands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexPosition(pub Hex);

/// Movement component - present only while entity is moving.
///
/// `path[index]` is the hex the entity currently occupies. Each tick adds
/// `speed` to `progress`; entering the next hex spends its terrain cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    pub path: Vec<Hex>,
    pub index: usize,
    pub progress: f32,
    pub speed: f32,
}

impl Movement {
    pub fn new(path: Vec<Hex>, speed: f32) -> Self {
        Self {
            path,
            index: 0,
            progress: 0.0,
            speed,
        }
    }

    pub fn destination(&self) -> Option<Hex> {
        self.path.last().copied()
    }

    pub fn next_step(&self) -> Option<Hex> {
        self.path.get(self.index + 1).copied()
    }

    pub fn is_finished(&self) -> bool {
        self.index + 1 >= self.path.len()
    }

    /// Hexes still to be entered.
    pub fn remaining(&self) -> usize {
        self.path.len().saturating_sub(self.index + 1)
    }
}

/// Name component for entities that have names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Name {
    pub given: String,
    pub epithet: Option<String>,
}

impl Name {
    pub fn new(given: impl Into<String>) -> Self {
        Self {
            given: given.into(),
            epithet: None,
        }
    }

    pub fn with_epithet(mut self, epithet: impl Into<String>) -> Self {
        self.epithet = Some(epithet.into());
        self
    }

    pub fn full_name(&self) -> String {
        match &self.epithet {
            Some(e) => format!("{} the {}", self.given, e),
            None => self.given.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_progress_queries() {
        let mut m = Movement::new(vec![Hex::new(0, 0), Hex::new(1, 0), Hex::new(2, 0)], 1.0);
        assert_eq!(m.next_step(), Some(Hex::new(1, 0)));
        assert_eq!(m.remaining(), 2);
        assert!(!m.is_finished());
        m.index = 2;
        assert!(m.is_finished());
        assert_eq!(m.next_step(), None);
        assert_eq!(m.destination(), Some(Hex::new(2, 0)));
    }

    #[test]
    fn test_name() {
        let name = Name::new("Ysolde").with_epithet("Weaver");
        assert_eq!(name.full_name(), "Ysolde the Weaver");
        assert_eq!(Name::new("Bram").full_name(), "Bram");
    }
}
