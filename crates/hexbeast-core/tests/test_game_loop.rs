//! Integration tests for whole games driven through `GameEngine`.
//!
//! Exercises: generation → job scans → agent work → upkeep → cards
//! → save/load

use hexbeast_core::components::{Agent, AssignedJob, ResourceNode};
use hexbeast_core::events::LoggedEvent;
use hexbeast_core::prelude::*;
use hexbeast_logic::cards::CardId;
use hexbeast_logic::economy::{BuildingKind, ResourceKind};
use hexbeast_logic::pathfinding::find_path;

// ── Helpers ────────────────────────────────────────────────────────────

fn test_config() -> GameConfig {
    GameConfig {
        seed: 1234,
        map_radius: 7,
        settlement_count: 2,
        agents_per_settlement: 3,
        ..Default::default()
    }
}

/// Run `ticks` ticks, collecting every event along the way.
fn run_collecting(engine: &mut GameEngine, ticks: u32) -> Vec<LoggedEvent> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        engine.tick();
        events.extend(engine.drain_events());
    }
    events
}

/// Every agent holding a job is the one its settlement's queue says claimed it.
fn assert_claims_consistent(engine: &GameEngine) {
    let mut query = engine.world.query::<(&Agent, &AssignedJob)>();
    for (_, (agent, assigned)) in query.iter() {
        let settlement = engine
            .settlements
            .get(assigned.settlement)
            .expect("job belongs to a settlement");
        let job = settlement
            .jobs
            .get(assigned.job)
            .expect("assigned job is still queued");
        assert_eq!(job.claimed_by, Some(agent.id));
        assert_eq!(job.kind, assigned.kind);
    }
}

// ── Simulation ─────────────────────────────────────────────────────────

#[test]
fn long_run_keeps_state_consistent() {
    let mut engine = GameEngine::new(test_config()).unwrap();
    let mut assigned = 0;
    let mut deposited = 0;

    for _ in 0..20 {
        for logged in run_collecting(&mut engine, 20) {
            match logged.event {
                GameEvent::JobAssigned { .. } => assigned += 1,
                GameEvent::ResourcesDeposited { amount, .. } => deposited += amount,
                _ => {}
            }
        }
        assert_claims_consistent(&engine);
        for summary in engine.settlement_summaries() {
            assert!(summary.population <= summary.capacity);
        }
        let mut positions = engine.world.query::<(&Agent, &HexPosition)>();
        for (_, (_, pos)) in positions.iter() {
            assert!(engine.map.is_passable(pos.0));
        }
    }

    assert_eq!(engine.current_tick(), 400);
    assert!(assigned > 0);
    assert!(deposited > 0);
}

#[test]
fn same_seed_same_game() {
    let mut a = GameEngine::new(test_config()).unwrap();
    let mut b = GameEngine::new(test_config()).unwrap();

    let events_a = run_collecting(&mut a, 150);
    let events_b = run_collecting(&mut b, 150);

    assert_eq!(events_a, events_b);
    assert_eq!(a.settlement_summaries(), b.settlement_summaries());
    assert_eq!(a.deck, b.deck);
}

#[test]
fn starving_settlements_lose_agents() {
    let config = GameConfig {
        starting_food: 0,
        food_per_agent: 50,
        upkeep_interval: 1,
        desertion_hunger: 1,
        ..test_config()
    };
    let mut engine = GameEngine::new(config).unwrap();
    let before = engine.agent_count();

    let events = run_collecting(&mut engine, 2);

    let deserted = events
        .iter()
        .filter(|e| matches!(e.event, GameEvent::AgentDeserted { .. }))
        .count();
    assert_eq!(deserted, 4);
    assert_eq!(engine.agent_count(), before - deserted);
    assert_claims_consistent(&engine);
}

#[test]
fn clock_survives_an_infinite_frame() {
    let mut engine = GameEngine::new(test_config()).unwrap();
    let interval = engine.config().tick_interval;

    assert_eq!(engine.update(f32::INFINITY), 0);
    assert_eq!(engine.update(interval * 3.0), 3);
    assert_eq!(engine.current_tick(), 3);
}

// ── Cards ──────────────────────────────────────────────────────────────

#[test]
fn ordered_house_gets_built() {
    let mut engine = GameEngine::new(test_config()).unwrap();
    for settlement in engine.settlements.iter_mut() {
        settlement.stockpile.add(ResourceKind::Wood, 40);
        settlement.stockpile.add(ResourceKind::Food, 60);
    }

    let beast = engine.beast_position().unwrap();
    let home = engine.settlements.list[0].center;
    let target = beast
        .range(2)
        .into_iter()
        .filter(|hex| *hex != beast)
        .find(|hex| {
            engine.map.is_passable(*hex)
                && engine.settlements.at(*hex).is_none()
                && find_path(&engine.map, home, *hex).is_some()
                && !engine
                    .world
                    .query::<(&HexPosition, &ResourceNode)>()
                    .iter()
                    .any(|(_, (pos, _))| pos.0 == *hex)
        })
        .expect("an open hex near the beast");

    engine.deck.hand = vec![CardId(7)];
    assert_eq!(engine.play_card(0, target), Ok(CardId(7)));
    assert_eq!(engine.construction_site_count(), 1);

    let founded = engine
        .drain_events()
        .into_iter()
        .find_map(|e| match e.event {
            GameEvent::SiteFounded { settlement, building, at } => Some((settlement, building, at)),
            _ => None,
        });
    let (owner, building, at) = founded.expect("site founded");
    assert_eq!((building, at), (BuildingKind::House, target));
    let capacity = engine.settlements.get(owner).unwrap().capacity;

    let events = run_collecting(&mut engine, 600);
    assert!(events.iter().any(|e| e.event
        == GameEvent::BuildingCompleted {
            settlement: owner,
            building: BuildingKind::House,
            at: target,
        }));
    assert_eq!(engine.construction_site_count(), 0);
    assert_eq!(engine.settlements.get(owner).unwrap().capacity, capacity + 2);
}

#[test]
fn turns_cycle_the_deck_and_pay_faith() {
    let mut engine = GameEngine::new(test_config()).unwrap();
    let cards = engine.deck.total();
    let faith = engine.faith();

    for _ in 0..6 {
        engine.end_turn();
        assert_eq!(engine.deck.hand.len(), engine.config().hand_size);
        assert_eq!(engine.deck.total(), cards);
    }
    assert_eq!(engine.turn(), 7);
    assert_eq!(engine.faith(), faith + 6 * engine.config().faith_per_turn);
}

// ── Persistence ────────────────────────────────────────────────────────

#[test]
fn saved_game_resumes() {
    let mut engine = GameEngine::new(test_config()).unwrap();
    engine.run_ticks(90);
    engine.end_turn();

    let path = std::env::temp_dir().join(format!("hexbeast-test-{}.sav", std::process::id()));
    engine.save_to_path(&path).unwrap();
    let mut loaded = GameEngine::load_from_path(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded.current_tick(), 90);
    assert_eq!(loaded.turn(), 2);
    assert_eq!(loaded.faith(), engine.faith());
    assert_eq!(loaded.beast_position(), engine.beast_position());
    assert_eq!(loaded.settlement_summaries(), engine.settlement_summaries());
    assert_claims_consistent(&loaded);

    loaded.run_ticks(200);
    assert_eq!(loaded.current_tick(), 290);
    assert_claims_consistent(&loaded);
}

#[test]
fn missing_save_file_is_an_io_error() {
    let path = std::env::temp_dir().join("hexbeast-no-such-save.sav");
    assert!(matches!(
        GameEngine::load_from_path(&path),
        Err(hexbeast_core::persistence::SaveError::Io(_))
    ));
}
