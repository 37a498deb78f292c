//! Card definitions, deck cycling, and target validation.
//!
//! Playing a card costs faith and applies an effect at a target hex near the
//! god beast. This module only knows what cards are and whether a target is
//! legal; applying effects to the world is the engine's job.

use serde::{Deserialize, Serialize};

use crate::economy::{BuildingKind, Cost, ResourceKind};
use crate::hex::Hex;
use crate::hex_map::Terrain;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardEffect {
    /// Walk the beast to the target, spending at most `range` movement.
    MoveBeast { range: u32 },
    /// Add resources to the settlement centered on the target.
    Bless { resource: ResourceKind, amount: u32 },
    /// Reshape the target tile.
    Terraform { terrain: Terrain },
    /// A new agent appears at the settlement centered on the target.
    SummonAgent,
    /// Lay out a construction site on the target.
    OrderBuild { building: BuildingKind },
    /// Create or refill a resource node on the target.
    Enrich { resource: ResourceKind, amount: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDef {
    pub id: CardId,
    pub name: String,
    pub cost: Cost,
    pub effect: CardEffect,
    /// Maximum hex distance from the beast to the target.
    pub target_range: u32,
}

impl CardDef {
    pub fn new(id: u16, name: &str, faith: u32, effect: CardEffect, target_range: u32) -> Self {
        Self {
            id: CardId(id),
            name: name.to_string(),
            cost: Cost::of(ResourceKind::Faith, faith),
            effect,
            target_range,
        }
    }
}

/// The card set a new game starts with.
pub fn starter_library() -> Vec<CardDef> {
    vec![
        CardDef::new(1, "Stride", 1, CardEffect::MoveBeast { range: 4 }, 4),
        CardDef::new(
            2,
            "Bountiful Rain",
            2,
            CardEffect::Bless {
                resource: ResourceKind::Food,
                amount: 6,
            },
            3,
        ),
        CardDef::new(
            3,
            "Grow Forest",
            2,
            CardEffect::Terraform {
                terrain: Terrain::Forest,
            },
            1,
        ),
        CardDef::new(
            4,
            "Raise Hills",
            2,
            CardEffect::Terraform {
                terrain: Terrain::Hills,
            },
            1,
        ),
        CardDef::new(5, "Call Follower", 3, CardEffect::SummonAgent, 2),
        CardDef::new(
            6,
            "Found Shrine",
            1,
            CardEffect::OrderBuild {
                building: BuildingKind::Shrine,
            },
            2,
        ),
        CardDef::new(
            7,
            "Found House",
            1,
            CardEffect::OrderBuild {
                building: BuildingKind::House,
            },
            2,
        ),
        CardDef::new(
            8,
            "Fertile Earth",
            1,
            CardEffect::Enrich {
                resource: ResourceKind::Food,
                amount: 8,
            },
            2,
        ),
    ]
}

/// Card ids for a fresh draw pile, duplicates included.
pub fn starter_deck() -> Vec<CardId> {
    [1, 1, 1, 2, 2, 3, 4, 5, 6, 7, 7, 8, 8]
        .into_iter()
        .map(CardId)
        .collect()
}

pub fn find_card(library: &[CardDef], id: CardId) -> Option<&CardDef> {
    library.iter().find(|c| c.id == id)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardError {
    OutOfRange { distance: u32, range: u32 },
    UnknownCard(CardId),
    EmptySlot(usize),
}

impl std::fmt::Display for CardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardError::OutOfRange { distance, range } => {
                write!(f, "target is {} hexes away, card reaches {}", distance, range)
            }
            CardError::UnknownCard(id) => write!(f, "unknown card {}", id.0),
            CardError::EmptySlot(i) => write!(f, "no card in hand slot {}", i),
        }
    }
}

impl std::error::Error for CardError {}

/// Check that `target` is within the card's reach of the beast.
pub fn validate_target(def: &CardDef, beast: Hex, target: Hex) -> Result<(), CardError> {
    let distance = beast.distance(target) as u32;
    if distance > def.target_range {
        return Err(CardError::OutOfRange {
            distance,
            range: def.target_range,
        });
    }
    Ok(())
}

/// Draw pile, hand, and discard pile. The top of the draw pile is the end
/// of the vector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub draw_pile: Vec<CardId>,
    pub hand: Vec<CardId>,
    pub discard: Vec<CardId>,
}

impl Deck {
    pub fn new(cards: Vec<CardId>) -> Self {
        Self {
            draw_pile: cards,
            hand: Vec::new(),
            discard: Vec::new(),
        }
    }

    /// Draw up to `n` cards. When the draw pile runs dry the discard pile is
    /// shuffled (by the caller's closure) and becomes the new draw pile.
    /// Returns how many cards were drawn.
    pub fn draw(&mut self, n: usize, mut shuffle: impl FnMut(&mut Vec<CardId>)) -> usize {
        let mut drawn = 0;
        while drawn < n {
            if self.draw_pile.is_empty() {
                if self.discard.is_empty() {
                    break;
                }
                self.draw_pile = std::mem::take(&mut self.discard);
                shuffle(&mut self.draw_pile);
            }
            if let Some(card) = self.draw_pile.pop() {
                self.hand.push(card);
                drawn += 1;
            }
        }
        drawn
    }

    /// Move a card from the hand to the discard pile.
    pub fn play(&mut self, hand_index: usize) -> Result<CardId, CardError> {
        if hand_index >= self.hand.len() {
            return Err(CardError::EmptySlot(hand_index));
        }
        let card = self.hand.remove(hand_index);
        self.discard.push(card);
        Ok(card)
    }

    pub fn discard_hand(&mut self) {
        self.discard.append(&mut self.hand);
    }

    pub fn total(&self) -> usize {
        self.draw_pile.len() + self.hand.len() + self.discard.len()
    }
}
