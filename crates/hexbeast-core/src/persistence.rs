//! Save/Load functionality for persisting game state
//!
//! Uses bincode for compact binary serialization. ECS components are
//! written per entity as a bag of optionals and respawned on load; engine
//! state outside the world travels in a [`GameState`].

use std::io::{Read, Write};

use hecs::World;
use hexbeast_logic::cards::Deck;
use hexbeast_logic::economy::Stockpile;
use hexbeast_logic::HexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::*;
use crate::config::{ConfigError, GameConfig};
use crate::systems::TickClock;

/// Version number for save file format (increment when format changes)
pub const SAVE_VERSION: u32 = 1;

/// Engine state that lives outside the ECS world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub config: GameConfig,
    pub clock: TickClock,
    pub time_scale: f32,
    pub turn: u32,
    pub next_agent_id: u32,
    pub map: HexMap,
    pub settlements: Settlements,
    /// Player-wide resources; only faith is used.
    pub treasury: Stockpile,
    pub deck: Deck,
}

#[derive(Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    pub state: GameState,
    pub entities: Vec<SerializableEntity>,
}

/// All possible components for an entity, serialized as optionals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SerializableEntity {
    pub position: Option<HexPosition>,
    pub movement: Option<Movement>,
    pub name: Option<Name>,

    // Agents
    pub agent: Option<Agent>,
    pub agent_state: Option<AgentState>,
    pub assigned_job: Option<AssignedJob>,
    pub carrying: Option<Carrying>,

    pub god_beast: Option<GodBeast>,

    // Map features
    pub resource_node: Option<ResourceNode>,
    pub construction_site: Option<ConstructionSite>,
}

fn serialize_entities(world: &World) -> Vec<SerializableEntity> {
    let mut entities = Vec::new();
    for entity_ref in world.iter() {
        let mut se = SerializableEntity::default();
        if let Some(c) = entity_ref.get::<&HexPosition>() {
            se.position = Some(*c);
        }
        if let Some(c) = entity_ref.get::<&Movement>() {
            se.movement = Some((*c).clone());
        }
        if let Some(c) = entity_ref.get::<&Name>() {
            se.name = Some((*c).clone());
        }
        if let Some(c) = entity_ref.get::<&Agent>() {
            se.agent = Some(*c);
        }
        if let Some(c) = entity_ref.get::<&AgentState>() {
            se.agent_state = Some(*c);
        }
        if let Some(c) = entity_ref.get::<&AssignedJob>() {
            se.assigned_job = Some(*c);
        }
        if let Some(c) = entity_ref.get::<&Carrying>() {
            se.carrying = Some(*c);
        }
        if let Some(c) = entity_ref.get::<&GodBeast>() {
            se.god_beast = Some(*c);
        }
        if let Some(c) = entity_ref.get::<&ResourceNode>() {
            se.resource_node = Some(*c);
        }
        if let Some(c) = entity_ref.get::<&ConstructionSite>() {
            se.construction_site = Some(*c);
        }
        entities.push(se);
    }
    entities
}

fn spawn_entity(world: &mut World, se: SerializableEntity) {
    let entity = world.spawn(());

    if let Some(c) = se.position {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.movement {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.name {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.agent {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.agent_state {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.assigned_job {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.carrying {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.god_beast {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.resource_node {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.construction_site {
        let _ = world.insert_one(entity, c);
    }
}

/// Write the world and engine state.
pub fn save_game<W: Write>(writer: W, world: &World, state: &GameState) -> Result<(), SaveError> {
    let save_data = SaveData {
        version: SAVE_VERSION,
        state: state.clone(),
        entities: serialize_entities(world),
    };
    bincode::serialize_into(writer, &save_data)?;
    Ok(())
}

/// Read a save written by [`save_game`].
pub fn load_game<R: Read>(reader: R) -> Result<LoadedGame, SaveError> {
    let save_data: SaveData = bincode::deserialize_from(reader)?;

    if save_data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save_data.version,
        });
    }
    save_data.state.config.validate()?;

    let mut world = World::new();
    for se in save_data.entities {
        spawn_entity(&mut world, se);
    }

    Ok(LoadedGame {
        world,
        state: save_data.state,
    })
}

/// Result of loading a game
pub struct LoadedGame {
    pub world: World,
    pub state: GameState,
}

/// Errors that can occur during save/load
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Bincode(#[from] Box<bincode::ErrorKind>),
    #[error("Save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
    #[error("Saved config is invalid: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexbeast_logic::economy::ResourceKind;
    use hexbeast_logic::jobs::{AgentId, SettlementId};
    use hexbeast_logic::Hex;

    fn sample_state() -> GameState {
        let mut settlements = Settlements::new();
        settlements.found("Ashford", Hex::ORIGIN, 8);
        GameState {
            config: GameConfig::default(),
            clock: TickClock::new(0.5, 8),
            time_scale: 2.0,
            turn: 3,
            next_agent_id: 2,
            map: HexMap::hexagon(3),
            settlements,
            treasury: Stockpile::new().with(ResourceKind::Faith, 4),
            deck: Deck::default(),
        }
    }

    #[test]
    fn test_components_survive_round_trip() {
        let mut world = World::new();
        world.spawn((
            Agent {
                id: AgentId(1),
                home: SettlementId(1),
            },
            HexPosition(Hex::new(1, 0)),
            AgentState::Moving,
            Movement::new(vec![Hex::new(1, 0), Hex::new(2, 0)], 1.0),
            Carrying {
                resource: ResourceKind::Wood,
                amount: 3,
            },
            Name::new("Wren").with_epithet("Quiet"),
        ));
        world.spawn((HexPosition(Hex::new(2, 1)), ResourceNode::new(ResourceKind::Stone, 12)));

        let state = sample_state();
        let mut buf = Vec::new();
        save_game(&mut buf, &world, &state).unwrap();
        let loaded = load_game(&buf[..]).unwrap();

        assert_eq!(loaded.state, state);
        assert_eq!(loaded.world.len(), 2);
        let mut before = serialize_entities(&world);
        let mut after = serialize_entities(&loaded.world);
        before.sort_by_key(|e| e.position.map(|p| p.0));
        after.sort_by_key(|e| e.position.map(|p| p.0));
        assert_eq!(before, after);
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let data = SaveData {
            version: SAVE_VERSION + 1,
            state: sample_state(),
            entities: Vec::new(),
        };
        let buf = bincode::serialize(&data).unwrap();
        match load_game(&buf[..]) {
            Err(SaveError::VersionMismatch { expected, found }) => {
                assert_eq!(expected, SAVE_VERSION);
                assert_eq!(found, SAVE_VERSION + 1);
            }
            other => panic!("expected version mismatch, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(matches!(
            load_game(&[1u8, 2, 3][..]),
            Err(SaveError::Bincode(_)) | Err(SaveError::Io(_))
        ));
    }
}
