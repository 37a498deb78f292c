//! Game configuration, loadable from JSON.
//!
//! Every field has a default, so a config file only needs the values it
//! changes.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::StockTargets;
use crate::generation::max_settlements;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for map generation, names, and deck shuffles.
    pub seed: u64,
    pub map_radius: i32,

    // Timing
    /// Seconds of (scaled) time per tick.
    pub tick_interval: f32,
    /// Cap on ticks run by a single `update`, so a long stall cannot snowball.
    pub max_ticks_per_update: u32,
    pub job_scan_interval: u64,
    pub upkeep_interval: u64,

    // Population
    pub settlement_count: u32,
    pub agents_per_settlement: u32,
    pub settlement_capacity: u32,
    pub agent_speed: f32,
    pub starting_food: u32,
    pub food_per_agent: u32,
    /// Hungry upkeeps in a row before an agent deserts.
    pub desertion_hunger: u32,

    // Jobs
    pub node_density: f32,
    pub gather_radius: i32,
    pub gather_amount: u32,
    pub carry_capacity: u32,
    pub max_gather_jobs_per_resource: usize,
    pub max_job_attempts: u8,
    pub stock_targets: StockTargets,

    // Player
    pub hand_size: usize,
    pub starting_faith: u32,
    pub faith_per_turn: u32,
    pub beast_energy: u32,
    pub beast_speed: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            map_radius: 8,
            tick_interval: 0.5,
            max_ticks_per_update: 8,
            job_scan_interval: 4,
            upkeep_interval: 20,
            settlement_count: 2,
            agents_per_settlement: 4,
            settlement_capacity: 8,
            agent_speed: 1.0,
            starting_food: 12,
            food_per_agent: 1,
            desertion_hunger: 5,
            node_density: 0.25,
            gather_radius: 5,
            gather_amount: 3,
            carry_capacity: 4,
            max_gather_jobs_per_resource: 2,
            max_job_attempts: 3,
            stock_targets: StockTargets {
                food: 20,
                wood: 12,
                stone: 8,
            },
            hand_size: 5,
            starting_faith: 6,
            faith_per_turn: 3,
            beast_energy: 6,
            beast_speed: 2.0,
        }
    }
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn check(ok: bool, msg: &str) -> Result<(), ConfigError> {
            if ok {
                Ok(())
            } else {
                Err(ConfigError::Invalid(msg.to_string()))
            }
        }
        check(self.map_radius >= 2, "map_radius must be at least 2")?;
        check(self.tick_interval > 0.0, "tick_interval must be positive")?;
        check(self.max_ticks_per_update >= 1, "max_ticks_per_update must be at least 1")?;
        check(self.job_scan_interval >= 1, "job_scan_interval must be at least 1")?;
        check(self.upkeep_interval >= 1, "upkeep_interval must be at least 1")?;
        check(self.settlement_count >= 1, "settlement_count must be at least 1")?;
        check(
            self.settlement_count <= max_settlements(self.map_radius),
            "settlement_count does not fit on the map",
        )?;
        check(
            self.agents_per_settlement <= self.settlement_capacity,
            "agents_per_settlement exceeds settlement_capacity",
        )?;
        check(self.desertion_hunger >= 1, "desertion_hunger must be at least 1")?;
        check(self.agent_speed > 0.0, "agent_speed must be positive")?;
        check(self.beast_speed > 0.0, "beast_speed must be positive")?;
        check(
            (0.0..=1.0).contains(&self.node_density),
            "node_density must be within 0..=1",
        )?;
        check(self.gather_radius >= 1, "gather_radius must be at least 1")?;
        check(self.gather_amount >= 1, "gather_amount must be at least 1")?;
        check(self.carry_capacity >= 1, "carry_capacity must be at least 1")?;
        check(self.max_job_attempts >= 1, "max_job_attempts must be at least 1")?;
        check(self.hand_size >= 1, "hand_size must be at least 1")?;
        Ok(())
    }
}
