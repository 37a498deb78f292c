//! Game engine - main entry point for running a game

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use hecs::World;
use hexbeast_logic::cards::{
    find_card, starter_deck, starter_library, validate_target, CardDef, CardError, CardId, Deck,
};
use hexbeast_logic::economy::{ResourceKind, Stockpile};
use hexbeast_logic::jobs::{AgentId, SettlementId};
use hexbeast_logic::pathfinding::HexNavigator;
use hexbeast_logic::{Hex, HexMap};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::components::*;
use crate::config::{ConfigError, GameConfig};
use crate::error::CommandError;
use crate::events::{EventLog, GameEvent, LoggedEvent};
use crate::generation::{generate_name, generate_world, spawn_agent};
use crate::persistence::{load_game, save_game, GameState, SaveError};
use crate::systems::*;

/// A settlement at a glance.
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementSummary {
    pub id: SettlementId,
    pub name: String,
    pub center: Hex,
    pub population: u32,
    pub capacity: u32,
    pub stockpile: Stockpile,
    pub hunger: u32,
    pub pending_jobs: usize,
    pub claimed_jobs: usize,
}

/// Main game engine
pub struct GameEngine {
    /// ECS world: agents, the beast, resource nodes, construction sites
    pub world: World,
    pub map: HexMap,
    pub settlements: Settlements,
    /// Player-wide resources; cards are paid from its faith
    pub treasury: Stockpile,
    pub deck: Deck,
    library: Vec<CardDef>,
    navigator: HexNavigator,
    config: GameConfig,
    clock: TickClock,
    turn: u32,
    time_scale: f32,
    next_agent_id: u32,
    rng: StdRng,
    events: EventLog,
}

impl GameEngine {
    /// Generate a new game from `config`.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let generated = generate_world(&config, &mut rng);

        let mut deck = Deck::new(starter_deck());
        deck.draw_pile.shuffle(&mut rng);
        deck.draw(config.hand_size, |pile| pile.shuffle(&mut rng));

        let engine = Self {
            world: generated.world,
            map: generated.map,
            settlements: generated.settlements,
            treasury: Stockpile::new().with(ResourceKind::Faith, config.starting_faith),
            deck,
            library: starter_library(),
            navigator: HexNavigator::new(),
            clock: TickClock::new(config.tick_interval, config.max_ticks_per_update),
            turn: 1,
            time_scale: 1.0,
            next_agent_id: generated.next_agent_id,
            rng,
            events: EventLog::new(),
            config,
        };
        log::info!("new game, seed {:#x}", engine.config.seed);
        Ok(engine)
    }

    fn from_state(world: World, state: GameState) -> Self {
        // Card draws after a load depend on the seed and how far the game got.
        let rng = StdRng::seed_from_u64(state.config.seed.wrapping_add(state.clock.tick()));
        Self {
            world,
            map: state.map,
            settlements: state.settlements,
            treasury: state.treasury,
            deck: state.deck,
            library: starter_library(),
            navigator: HexNavigator::new(),
            clock: state.clock,
            turn: state.turn,
            time_scale: state.time_scale,
            next_agent_id: state.next_agent_id,
            rng,
            events: EventLog::new(),
            config: state.config,
        }
    }

    /// Advance by wall-clock seconds; runs however many ticks are due.
    /// Returns the number of ticks run.
    pub fn update(&mut self, delta_seconds: f32) -> u32 {
        let due = self.clock.advance(delta_seconds * self.time_scale);
        for _ in 0..due {
            self.tick();
        }
        due
    }

    /// Run exactly one tick.
    pub fn tick(&mut self) {
        let tick = self.clock.step();
        let mut ctx = TickContext {
            map: &mut self.map,
            navigator: &mut self.navigator,
            settlements: &mut self.settlements,
            config: &self.config,
            events: &mut self.events,
            tick,
        };

        // T0: movement, every tick
        let report = movement_system(&mut self.world, ctx.map);
        for entity in report.blocked {
            if self.world.get::<&AssignedJob>(entity).is_ok() {
                log::debug!("agent blocked on tick {}, releasing its job", tick);
                release_job(&mut self.world, &mut ctx, entity);
            }
        }
        for entity in report.arrived {
            if self.world.get::<&GodBeast>(entity).is_err() {
                continue;
            }
            if let Ok(at) = self.world.get::<&HexPosition>(entity).map(|pos| pos.0) {
                ctx.emit(GameEvent::BeastArrived { at });
            }
        }

        // T0: work, every tick
        work_system(&mut self.world, &mut ctx);

        // T1: job scan
        if is_due(tick, ctx.config.job_scan_interval) {
            generate_jobs(&self.world, &mut ctx);
            assign_jobs(&mut self.world, &mut ctx);
        }

        // T2: upkeep
        if is_due(tick, ctx.config.upkeep_interval) {
            upkeep_system(&mut self.world, &mut ctx, &mut self.treasury);
        }
    }

    /// Run `count` ticks back to back, ignoring the clock.
    pub fn run_ticks(&mut self, count: u32) {
        for _ in 0..count {
            self.tick();
        }
    }

    /// Walk the beast to `target`, paying the route cost from its energy.
    pub fn move_beast(&mut self, target: Hex) -> Result<u32, CommandError> {
        let (beast, _) = find_beast(&self.world).ok_or(CommandError::NoBeast)?;
        if !self.map.contains(target) {
            return Err(CommandError::OffMap(target));
        }
        let energy = self
            .world
            .get::<&GodBeast>(beast)
            .map(|b| b.energy)
            .map_err(|_| CommandError::NoBeast)?;

        let mut ctx = TickContext {
            map: &mut self.map,
            navigator: &mut self.navigator,
            settlements: &mut self.settlements,
            config: &self.config,
            events: &mut self.events,
            tick: self.clock.tick(),
        };
        let cost = send_beast(&mut self.world, &mut ctx, target, energy)?;
        if let Ok(mut b) = self.world.get::<&mut GodBeast>(beast) {
            b.energy = b.energy.saturating_sub(cost);
        }
        Ok(cost)
    }

    /// Play the card in `hand_index` at `target`.
    ///
    /// Faith is only spent, and the card only discarded, when the effect
    /// succeeds.
    pub fn play_card(&mut self, hand_index: usize, target: Hex) -> Result<CardId, CommandError> {
        let card = *self
            .deck
            .hand
            .get(hand_index)
            .ok_or(CardError::EmptySlot(hand_index))?;
        let def = find_card(&self.library, card)
            .cloned()
            .ok_or(CardError::UnknownCard(card))?;
        let (_, beast_at) = find_beast(&self.world).ok_or(CommandError::NoBeast)?;
        validate_target(&def, beast_at, target)?;
        if !self.treasury.can_afford(&def.cost) {
            return Err(CommandError::NotEnoughFaith {
                needed: def.cost.amount(ResourceKind::Faith),
                available: self.treasury.get(ResourceKind::Faith),
            });
        }

        let tick = self.clock.tick();
        let next_agent_id = &mut self.next_agent_id;
        let rng = &mut self.rng;
        let mut ctx = TickContext {
            map: &mut self.map,
            navigator: &mut self.navigator,
            settlements: &mut self.settlements,
            config: &self.config,
            events: &mut self.events,
            tick,
        };
        apply_card_effect(&mut self.world, &mut ctx, def.effect, target, |world, home, at| {
            let id = AgentId(*next_agent_id);
            *next_agent_id += 1;
            spawn_agent(world, id, home, at, generate_name(rng));
            id
        })?;

        self.treasury.spend(&def.cost);
        self.deck.play(hand_index)?;
        self.events.push(tick, GameEvent::CardPlayed { card, target });
        log::info!("played {} at {}", def.name, target);
        Ok(card)
    }

    /// Close the turn: new hand, refilled beast, faith income.
    pub fn end_turn(&mut self) {
        self.deck.discard_hand();
        let hand_size = self.config.hand_size;
        let drawn = self.deck.draw(hand_size, |pile| pile.shuffle(&mut self.rng));

        for (_, beast) in self.world.query_mut::<&mut GodBeast>() {
            beast.refill();
        }
        self.treasury
            .add(ResourceKind::Faith, self.config.faith_per_turn);

        self.events.push(
            self.clock.tick(),
            GameEvent::TurnEnded { turn: self.turn },
        );
        log::info!(
            "turn {} ended; drew {}, faith {}",
            self.turn,
            drawn,
            self.faith()
        );
        self.turn += 1;
    }

    /// Set time scale (1.0 = real-time, 2.0 = 2x speed, etc.)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn current_tick(&self) -> u64 {
        self.clock.tick()
    }

    pub fn faith(&self) -> u32 {
        self.treasury.get(ResourceKind::Faith)
    }

    pub fn library(&self) -> &[CardDef] {
        &self.library
    }

    /// Definitions of the cards in hand, in hand order.
    pub fn hand(&self) -> Vec<&CardDef> {
        self.deck
            .hand
            .iter()
            .filter_map(|id| find_card(&self.library, *id))
            .collect()
    }

    pub fn agent_count(&self) -> usize {
        self.world.query::<&Agent>().iter().count()
    }

    pub fn idle_agent_count(&self) -> usize {
        self.world
            .query::<(&Agent, &AgentState)>()
            .iter()
            .filter(|(_, (_, state))| **state == AgentState::Idle)
            .count()
    }

    pub fn resource_node_count(&self) -> usize {
        self.world.query::<&ResourceNode>().iter().count()
    }

    pub fn construction_site_count(&self) -> usize {
        self.world.query::<&ConstructionSite>().iter().count()
    }

    pub fn beast_position(&self) -> Option<Hex> {
        find_beast(&self.world).map(|(_, at)| at)
    }

    pub fn beast_energy(&self) -> Option<u32> {
        let (beast, _) = find_beast(&self.world)?;
        let energy = self.world.get::<&GodBeast>(beast).ok()?.energy;
        Some(energy)
    }

    pub fn settlement_summaries(&self) -> Vec<SettlementSummary> {
        self.settlements
            .iter()
            .map(|s| {
                let population = self
                    .world
                    .query::<&Agent>()
                    .iter()
                    .filter(|(_, agent)| agent.home == s.id)
                    .count() as u32;
                let pending_jobs = s.jobs.pending_count();
                SettlementSummary {
                    id: s.id,
                    name: s.name.clone(),
                    center: s.center,
                    population,
                    capacity: s.capacity,
                    stockpile: s.stockpile,
                    hunger: s.hunger,
                    pending_jobs,
                    claimed_jobs: s.jobs.len() - pending_jobs,
                }
            })
            .collect()
    }

    /// Path cache (hits, misses).
    pub fn navigator_stats(&self) -> (u64, u64) {
        self.navigator.stats()
    }

    pub fn events(&self) -> impl Iterator<Item = &LoggedEvent> {
        self.events.iter()
    }

    pub fn drain_events(&mut self) -> Vec<LoggedEvent> {
        self.events.drain()
    }

    fn state(&self) -> GameState {
        GameState {
            config: self.config.clone(),
            clock: self.clock.clone(),
            time_scale: self.time_scale,
            turn: self.turn,
            next_agent_id: self.next_agent_id,
            map: self.map.clone(),
            settlements: self.settlements.clone(),
            treasury: self.treasury,
            deck: self.deck.clone(),
        }
    }

    /// Save game state to a writer
    pub fn save<W: Write>(&self, writer: W) -> Result<(), SaveError> {
        save_game(writer, &self.world, &self.state())
    }

    /// Load a game from a reader
    pub fn load<R: Read>(reader: R) -> Result<Self, SaveError> {
        let loaded = load_game(reader)?;
        log::info!(
            "loaded game at turn {}, tick {}",
            loaded.state.turn,
            loaded.state.clock.tick()
        );
        Ok(Self::from_state(loaded.world, loaded.state))
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<(), SaveError> {
        let file = File::create(path.as_ref())?;
        self.save(BufWriter::new(file))?;
        log::info!("saved to {}", path.as_ref().display());
        Ok(())
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, SaveError> {
        let file = File::open(path)?;
        Self::load(BufReader::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> GameConfig {
        GameConfig {
            seed: 42,
            map_radius: 6,
            settlement_count: 2,
            agents_per_settlement: 3,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_game_deals_a_hand() {
        let engine = GameEngine::new(small_config()).unwrap();
        assert_eq!(engine.deck.hand.len(), engine.config().hand_size);
        assert_eq!(engine.deck.total(), starter_deck().len());
        assert_eq!(engine.faith(), engine.config().starting_faith);
        assert_eq!(engine.agent_count(), 6);
        assert_eq!(engine.turn(), 1);
        assert!(engine.beast_position().is_some());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GameConfig {
            map_radius: 0,
            ..Default::default()
        };
        assert!(matches!(GameEngine::new(config), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_update_runs_due_ticks() {
        let mut engine = GameEngine::new(small_config()).unwrap();
        let interval = engine.config().tick_interval;
        assert_eq!(engine.update(interval * 3.0 + interval * 0.5), 3);
        assert_eq!(engine.current_tick(), 3);
        engine.set_time_scale(2.0);
        assert_eq!(engine.update(interval), 2);
    }

    #[test]
    fn test_agents_get_to_work() {
        let mut engine = GameEngine::new(small_config()).unwrap();
        let scan = engine.config().job_scan_interval as u32;
        engine.run_ticks(scan);
        assert!(engine.idle_agent_count() < engine.agent_count());
        assert!(engine
            .drain_events()
            .iter()
            .any(|e| matches!(e.event, GameEvent::JobAssigned { .. })));
    }

    #[test]
    fn test_move_beast_spends_energy() {
        let mut engine = GameEngine::new(small_config()).unwrap();
        let target = engine.settlements.list[0].center;
        assert_eq!(engine.move_beast(target), Ok(1));
        assert_eq!(engine.beast_energy(), Some(engine.config().beast_energy - 1));

        engine.run_ticks(1);
        assert_eq!(engine.beast_position(), Some(target));
        assert!(engine
            .events()
            .any(|e| e.event == GameEvent::BeastArrived { at: target }));

        assert_eq!(engine.move_beast(Hex::new(50, 0)), Err(CommandError::OffMap(Hex::new(50, 0))));
    }

    #[test]
    fn test_card_play_charges_only_on_success() {
        let mut engine = GameEngine::new(small_config()).unwrap();
        engine.deck.hand = vec![CardId(2), CardId(1)];
        let faith = engine.faith();
        let far = Hex::new(0, engine.config().map_radius);

        // Bountiful Rain far from any settlement is out of range.
        assert!(matches!(
            engine.play_card(0, far),
            Err(CommandError::Card(CardError::OutOfRange { .. }))
        ));
        assert_eq!(engine.faith(), faith);
        assert_eq!(engine.deck.hand.len(), 2);

        // The beast starts beside the first settlement, so a blessing on
        // its own hex lands there.
        let beast = engine.beast_position().unwrap();
        let food = engine.settlements.list[0].stockpile.get(ResourceKind::Food);
        assert_eq!(engine.play_card(0, beast), Ok(CardId(2)));
        assert_eq!(engine.faith(), faith - 2);
        assert_eq!(engine.deck.hand, vec![CardId(1)]);
        assert_eq!(engine.settlements.list[0].stockpile.get(ResourceKind::Food), food + 6);
        assert!(engine
            .events()
            .any(|e| e.event == GameEvent::CardPlayed { card: CardId(2), target: beast }));
    }

    #[test]
    fn test_not_enough_faith() {
        let mut engine = GameEngine::new(small_config()).unwrap();
        engine.deck.hand = vec![CardId(5)];
        engine.treasury = Stockpile::new().with(ResourceKind::Faith, 1);
        let center = engine.settlements.list[0].center;
        assert_eq!(
            engine.play_card(0, center),
            Err(CommandError::NotEnoughFaith {
                needed: 3,
                available: 1
            })
        );
        assert_eq!(engine.play_card(3, center), Err(CommandError::Card(CardError::EmptySlot(3))));
    }

    #[test]
    fn test_end_turn_refreshes() {
        let mut engine = GameEngine::new(small_config()).unwrap();
        let faith = engine.faith();
        engine.deck.play(0).unwrap();
        engine.end_turn();
        assert_eq!(engine.turn(), 2);
        assert_eq!(engine.deck.hand.len(), engine.config().hand_size);
        assert_eq!(engine.deck.total(), starter_deck().len());
        assert_eq!(engine.faith(), faith + engine.config().faith_per_turn);
        assert_eq!(engine.beast_energy(), Some(engine.config().beast_energy));
    }

    #[test]
    fn test_save_and_load() {
        let mut engine = GameEngine::new(small_config()).unwrap();
        engine.run_ticks(12);
        let mut buf = Vec::new();
        engine.save(&mut buf).unwrap();

        let loaded = GameEngine::load(&buf[..]).unwrap();
        assert_eq!(loaded.current_tick(), 12);
        assert_eq!(loaded.agent_count(), engine.agent_count());
        assert_eq!(loaded.settlement_summaries(), engine.settlement_summaries());
        assert_eq!(loaded.deck, engine.deck);
        assert_eq!(loaded.map, engine.map);
    }
}
