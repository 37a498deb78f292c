//! Hexbeast Headless Simulation Harness
//!
//! Validates the pure logic crate, then plays a scripted game through the
//! engine. Runs entirely in-process, with no window and no renderer.
//!
//! Usage:
//!   cargo run -p hexbeast-simtest
//!   cargo run -p hexbeast-simtest -- --verbose
//!   cargo run -p hexbeast-simtest -- --config path/to/config.json
//!
//! Set `RUST_LOG=debug` to see the engine's own log output.

use hexbeast_core::config::GameConfig;
use hexbeast_core::engine::GameEngine;
use hexbeast_core::events::GameEvent;
use hexbeast_logic::cards::{starter_deck, starter_library, validate_target, CardId, Deck};
use hexbeast_logic::economy::{
    starvation_level, upkeep, BuildingKind, ResourceKind, StarvationLevel, Stockpile,
};
use hexbeast_logic::jobs::{
    match_jobs, AgentId, IdleAgent, JobKind, JobQueue, JobRequest, SettlementId,
};
use hexbeast_logic::layout::Layout;
use hexbeast_logic::offset::{roffset_from_cube, roffset_to_cube, OffsetParity};
use hexbeast_logic::pathfinding::{find_path, path_cost, HexNavigator};
use hexbeast_logic::{Hex, HexMap, Terrain};

// ── Default config (same JSON a game would ship with) ───────────────────
const DEFAULT_CONFIG_JSON: &str = include_str!("../../../data/default_config.json");

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose");
    let config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1));
    println!("=== Hexbeast Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Config loading
    let (config, config_results) = validate_config(config_path.map(String::as_str));
    results.extend(config_results);

    // 2. Hex math and coordinates
    results.extend(validate_hex_math(verbose));

    // 3. Pathfinding on synthetic maps
    results.extend(validate_pathfinding(verbose));

    // 4. Job queue and matching
    results.extend(validate_jobs(verbose));

    // 5. Economy
    results.extend(validate_economy(verbose));

    // 6. Cards and deck
    results.extend(validate_cards(verbose));

    // 7. Scripted game through the engine
    if let Some(config) = config {
        results.extend(run_scripted_game(config, verbose));
    }

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Config ───────────────────────────────────────────────────────────

fn validate_config(path: Option<&str>) -> (Option<GameConfig>, Vec<TestResult>) {
    println!("--- Config ---");
    let mut results = Vec::new();

    let embedded = GameConfig::from_json_str(DEFAULT_CONFIG_JSON);
    results.push(TestResult {
        name: "config_default_parses".into(),
        passed: embedded.is_ok(),
        detail: match &embedded {
            Ok(_) => "data/default_config.json is valid".into(),
            Err(e) => format!("{}", e),
        },
    });
    if let Ok(parsed) = &embedded {
        results.push(TestResult {
            name: "config_matches_builtin".into(),
            passed: *parsed == GameConfig::default(),
            detail: "shipped JSON agrees with GameConfig::default()".into(),
        });
    }

    let chosen = match path {
        Some(path) => {
            let loaded = GameConfig::load(path);
            results.push(TestResult {
                name: "config_from_file".into(),
                passed: loaded.is_ok(),
                detail: match &loaded {
                    Ok(c) => format!("{} (seed {:#x}, radius {})", path, c.seed, c.map_radius),
                    Err(e) => format!("{}: {}", path, e),
                },
            });
            loaded.ok()
        }
        None => embedded.ok(),
    };

    let bad = GameConfig::from_json_str(r#"{ "map_radius": 1 }"#);
    results.push(TestResult {
        name: "config_rejects_tiny_map".into(),
        passed: bad.is_err(),
        detail: "map_radius 1 is refused".into(),
    });

    (chosen, results)
}

// ── 2. Hex Math ─────────────────────────────────────────────────────────

fn validate_hex_math(verbose: bool) -> Vec<TestResult> {
    println!("--- Hex Math ---");
    let mut results = Vec::new();

    let all_unit = Hex::ORIGIN.neighbors().iter().all(|n| n.distance(Hex::ORIGIN) == 1);
    results.push(TestResult {
        name: "hex_neighbors_adjacent".into(),
        passed: all_unit,
        detail: "all six neighbors at distance 1".into(),
    });

    let ring_sizes: Vec<usize> = (0..5).map(|k| Hex::ORIGIN.ring(k).len()).collect();
    results.push(TestResult {
        name: "hex_ring_sizes".into(),
        passed: ring_sizes == vec![1, 6, 12, 18, 24],
        detail: format!("rings 0..5 hold {:?}", ring_sizes),
    });

    let area = Hex::ORIGIN.range(4).len();
    results.push(TestResult {
        name: "hex_range_area".into(),
        passed: area == 61 && HexMap::hexagon(4).len() == 61,
        detail: format!("radius 4 covers {} hexes", area),
    });

    let a = Hex::new(-3, 1);
    let b = Hex::new(4, -2);
    let line = a.line_to(b);
    let contiguous = line.windows(2).all(|w| w[0].distance(w[1]) == 1);
    results.push(TestResult {
        name: "hex_line_contiguous".into(),
        passed: line.len() as i32 == a.distance(b) + 1 && contiguous,
        detail: format!("{} → {} in {} steps", a, b, line.len() - 1),
    });

    let layout = Layout::pointy(16.0);
    let pixel_ok = Hex::ORIGIN
        .range(5)
        .into_iter()
        .all(|h| layout.pixel_to_hex(layout.hex_to_pixel(h)).round() == h);
    results.push(TestResult {
        name: "hex_pixel_round_trip".into(),
        passed: pixel_ok,
        detail: "hex → pixel → hex is identity within radius 5".into(),
    });

    let offset_ok = Hex::ORIGIN.range(5).into_iter().all(|h| {
        [OffsetParity::Even, OffsetParity::Odd]
            .into_iter()
            .all(|p| roffset_to_cube(p, roffset_from_cube(p, h)) == h)
    });
    results.push(TestResult {
        name: "hex_offset_round_trip".into(),
        passed: offset_ok,
        detail: "row offsets convert back for both parities".into(),
    });

    if verbose {
        let corners = layout.polygon_corners(Hex::new(1, 0));
        println!("  Corners of (1, 0) at size 16:");
        for corner in corners {
            println!("    ({:7.2}, {:7.2})", corner.x, corner.y);
        }
    }

    results
}

// ── 3. Pathfinding ──────────────────────────────────────────────────────

fn validate_pathfinding(verbose: bool) -> Vec<TestResult> {
    println!("--- Pathfinding ---");
    let mut results = Vec::new();

    let open = HexMap::hexagon(5);

    // Same hex
    let same = find_path(&open, Hex::ORIGIN, Hex::ORIGIN);
    results.push(TestResult {
        name: "pathfind_same_hex".into(),
        passed: same == Some(vec![Hex::ORIGIN]),
        detail: "start == goal → [start]".into(),
    });

    // Straight across open ground
    let across = find_path(&open, Hex::new(-4, 0), Hex::new(4, 0));
    let across_len = across.as_ref().map_or(0, Vec::len);
    results.push(TestResult {
        name: "pathfind_open_ground".into(),
        passed: across_len == 9,
        detail: format!("8 steps across grassland, got {}", across_len.saturating_sub(1)),
    });

    // Hills cost more than a detour
    let mut wooded = HexMap::hexagon(3);
    wooded.set_terrain(Hex::new(1, 0), Terrain::Hills);
    let detour = find_path(&wooded, Hex::ORIGIN, Hex::new(2, 0));
    let detour_cost = detour.as_ref().and_then(|p| path_cost(&wooded, p));
    results.push(TestResult {
        name: "pathfind_avoids_hills".into(),
        passed: detour_cost == Some(3)
            && detour.as_ref().is_some_and(|p| !p.contains(&Hex::new(1, 0))),
        detail: format!("cost {:?} around the hills", detour_cost),
    });

    // Water wall with no gap
    let mut walled = HexMap::hexagon(4);
    for r in -4..=3 {
        walled.set_terrain(Hex::new(1, r), Terrain::Water);
    }
    let blocked = find_path(&walled, Hex::ORIGIN, Hex::new(3, 0));
    results.push(TestResult {
        name: "pathfind_unreachable".into(),
        passed: blocked.is_none(),
        detail: "sealed water wall → None".into(),
    });

    // Large map stress test
    let big = HexMap::hexagon(40);
    let long = find_path(&big, Hex::new(-40, 0), Hex::new(40, 0));
    results.push(TestResult {
        name: "pathfind_radius_40".into(),
        passed: long.as_ref().map_or(0, Vec::len) == 81,
        detail: "80-step crossing of a 4921-hex map".into(),
    });

    // Cache
    let mut nav = HexNavigator::new();
    for _ in 0..5 {
        nav.find_path(&open, Hex::new(-4, 0), Hex::new(4, 0));
    }
    let (hits, misses) = nav.stats();
    results.push(TestResult {
        name: "pathfind_cache_hits".into(),
        passed: hits == 4 && misses == 1,
        detail: format!("{} hits, {} misses", hits, misses),
    });

    if verbose {
        if let Some(path) = &detour {
            let steps: Vec<String> = path.iter().map(|h| h.to_string()).collect();
            println!("  Detour: {}", steps.join(" → "));
        }
    }

    results
}

// ── 4. Jobs ─────────────────────────────────────────────────────────────

fn validate_jobs(_verbose: bool) -> Vec<TestResult> {
    println!("--- Jobs ---");
    let mut results = Vec::new();

    let mut queue = JobQueue::new(SettlementId(1));
    let first = queue.push(JobRequest::new(JobKind::Gather, Hex::new(3, 0)));
    let second = queue.push(JobRequest::new(JobKind::Build, Hex::new(-3, 0)));

    let mut pool = vec![
        IdleAgent {
            id: AgentId(5),
            position: Hex::new(-2, 0),
        },
        IdleAgent {
            id: AgentId(2),
            position: Hex::new(2, 0),
        },
        IdleAgent {
            id: AgentId(9),
            position: Hex::new(2, 0),
        },
    ];
    let assignments = match_jobs(&queue, &mut pool);
    let pairs: Vec<_> = assignments.iter().map(|a| (a.job, a.agent)).collect();
    results.push(TestResult {
        name: "jobs_nearest_agent".into(),
        passed: pairs == vec![(first, AgentId(2)), (second, AgentId(5))],
        detail: "oldest job first, nearest agent, ties to lower id".into(),
    });
    results.push(TestResult {
        name: "jobs_unmatched_stay_idle".into(),
        passed: pool.len() == 1 && pool[0].id == AgentId(9),
        detail: format!("{} agent(s) left in pool", pool.len()),
    });

    queue.claim(first, AgentId(2));
    for _ in 0..3 {
        queue.claim(second, AgentId(5));
        queue.release(second);
    }
    let dropped = queue.retain_attempts(3);
    results.push(TestResult {
        name: "jobs_drop_after_attempts".into(),
        passed: dropped.len() == 1 && dropped[0].id == second && queue.len() == 1,
        detail: "job released 3 times is dropped; claimed job kept".into(),
    });

    results
}

// ── 5. Economy ──────────────────────────────────────────────────────────

fn validate_economy(verbose: bool) -> Vec<TestResult> {
    println!("--- Economy ---");
    let mut results = Vec::new();

    let mut stock = Stockpile::new().with(ResourceKind::Wood, 3).with(ResourceKind::Stone, 3);
    let shrine = BuildingKind::Shrine.materials();
    let granary = BuildingKind::Granary.materials();
    let paid = stock.spend(&granary);
    results.push(TestResult {
        name: "economy_spend".into(),
        passed: paid && stock.get(ResourceKind::Wood) == 0 && stock.get(ResourceKind::Stone) == 1,
        detail: format!("after granary: {:?}", stock),
    });

    let before = stock;
    let refused = !stock.spend(&shrine);
    results.push(TestResult {
        name: "economy_all_or_nothing".into(),
        passed: refused && stock == before,
        detail: "unaffordable shrine leaves the stockpile untouched".into(),
    });

    let fed = Stockpile::new().with(ResourceKind::Food, 8);
    let some = Stockpile::new().with(ResourceKind::Food, 3);
    let levels = (
        starvation_level(&fed, upkeep(4, 2)),
        starvation_level(&some, upkeep(4, 2)),
        starvation_level(&Stockpile::new(), upkeep(4, 2)),
    );
    results.push(TestResult {
        name: "economy_starvation_levels".into(),
        passed: levels == (StarvationLevel::Fed, StarvationLevel::Short, StarvationLevel::Starving),
        detail: format!("{:?}", levels),
    });

    if verbose {
        println!("  Building materials:");
        for building in [BuildingKind::House, BuildingKind::Shrine, BuildingKind::Granary] {
            let bill: Vec<String> = building
                .materials()
                .0
                .iter()
                .map(|(kind, amount)| format!("{} {}", amount, kind.name()))
                .collect();
            println!("    {:8}: {}", building.name(), bill.join(", "));
        }
    }

    results
}

// ── 6. Cards ────────────────────────────────────────────────────────────

fn validate_cards(verbose: bool) -> Vec<TestResult> {
    println!("--- Cards ---");
    let mut results = Vec::new();

    let library = starter_library();
    let known = starter_deck()
        .iter()
        .all(|id| library.iter().any(|c| c.id == *id));
    results.push(TestResult {
        name: "cards_deck_known".into(),
        passed: known,
        detail: format!("{} cards in deck, {} in library", starter_deck().len(), library.len()),
    });

    let mut deck = Deck::new(starter_deck());
    let total = deck.total();
    let mut conserved = true;
    for _ in 0..20 {
        deck.draw(5, |pile: &mut Vec<CardId>| pile.rotate_left(1));
        while !deck.hand.is_empty() && deck.play(deck.hand.len() - 1).is_ok() {}
        conserved &= deck.total() == total;
    }
    results.push(TestResult {
        name: "cards_conserved".into(),
        passed: conserved,
        detail: "20 draw/play cycles keep every card".into(),
    });

    let ranges_ok = library.iter().all(|def| {
        let edge = Hex::direction(2).scale(def.target_range as i32);
        let beyond = Hex::direction(2).scale(def.target_range as i32 + 1);
        validate_target(def, Hex::ORIGIN, edge).is_ok()
            && validate_target(def, Hex::ORIGIN, beyond).is_err()
    });
    results.push(TestResult {
        name: "cards_target_range".into(),
        passed: ranges_ok,
        detail: "every card reaches exactly its range".into(),
    });

    if verbose {
        for def in &library {
            println!(
                "  #{:<2} {:16} faith {}  range {}",
                def.id.0,
                def.name,
                def.cost.amount(ResourceKind::Faith),
                def.target_range
            );
        }
    }

    results
}

// ── 7. Scripted Game ────────────────────────────────────────────────────

fn run_scripted_game(config: GameConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Scripted Game ---");
    let mut results = Vec::new();

    let mut engine = match GameEngine::new(config) {
        Ok(engine) => engine,
        Err(e) => {
            results.push(TestResult {
                name: "game_start".into(),
                passed: false,
                detail: format!("{}", e),
            });
            return results;
        }
    };
    let start_agents = engine.agent_count();
    results.push(TestResult {
        name: "game_start".into(),
        passed: start_agents > 0 && engine.deck.hand.len() == engine.config().hand_size,
        detail: format!(
            "{} settlements, {} agents, {} resource nodes",
            engine.settlements.len(),
            start_agents,
            engine.resource_node_count()
        ),
    });

    let mut plays = 0;
    let mut refusals = 0;
    let mut completed_jobs = 0;
    let mut deposited = 0;
    for turn in 0..10 {
        // Try each card in hand at the beast's hex, then at the first settlement.
        let targets: Vec<Hex> = engine
            .beast_position()
            .into_iter()
            .chain(engine.settlements.list.first().map(|s| s.center))
            .collect();
        let mut slot = 0;
        while slot < engine.deck.hand.len() {
            let played = targets.iter().any(|t| engine.play_card(slot, *t).is_ok());
            if played {
                plays += 1;
            } else {
                refusals += 1;
                slot += 1;
            }
        }

        for _ in 0..40 {
            engine.update(engine.config().tick_interval);
        }
        for logged in engine.drain_events() {
            match logged.event {
                GameEvent::JobCompleted { .. } => completed_jobs += 1,
                GameEvent::ResourcesDeposited { amount, .. } => deposited += amount,
                _ => {}
            }
        }
        engine.end_turn();

        if verbose {
            println!(
                "  Turn {} (tick {}, faith {}):",
                turn + 1,
                engine.current_tick(),
                engine.faith()
            );
            for s in engine.settlement_summaries() {
                println!(
                    "    {:12} pop {}/{}  food {:3} wood {:3} stone {:3}  jobs {}+{}  hunger {}",
                    s.name,
                    s.population,
                    s.capacity,
                    s.stockpile.food,
                    s.stockpile.wood,
                    s.stockpile.stone,
                    s.pending_jobs,
                    s.claimed_jobs,
                    s.hunger
                );
            }
        }
    }

    results.push(TestResult {
        name: "game_ticks_advance".into(),
        passed: engine.current_tick() == 400,
        detail: format!("{} ticks over 10 turns", engine.current_tick()),
    });
    results.push(TestResult {
        name: "game_cards_played".into(),
        passed: plays > 0,
        detail: format!("{} cards played, {} held back", plays, refusals),
    });
    results.push(TestResult {
        name: "game_agents_work".into(),
        passed: completed_jobs > 0 && deposited > 0,
        detail: format!("{} jobs done, {} resources stored", completed_jobs, deposited),
    });
    let within_capacity = engine
        .settlement_summaries()
        .iter()
        .all(|s| s.population <= s.capacity);
    results.push(TestResult {
        name: "game_capacity_respected".into(),
        passed: within_capacity,
        detail: format!("{} agents at end", engine.agent_count()),
    });

    // Save and reload in memory
    let mut buf = Vec::new();
    let reloaded = engine
        .save(&mut buf)
        .map_err(|e| e.to_string())
        .and_then(|_| GameEngine::load(&buf[..]).map_err(|e| e.to_string()));
    results.push(TestResult {
        name: "game_save_load".into(),
        passed: reloaded.as_ref().is_ok_and(|g| {
            g.current_tick() == engine.current_tick()
                && g.settlement_summaries() == engine.settlement_summaries()
                && g.deck == engine.deck
        }),
        detail: match &reloaded {
            Ok(_) => format!("{} bytes round-tripped", buf.len()),
            Err(e) => e.clone(),
        },
    });

    if verbose {
        let (hits, misses) = engine.navigator_stats();
        println!("  Path cache: {} hits, {} misses", hits, misses);
    }

    results
}
