//! Integration tests across the pure logic modules.
//!
//! Exercises: HexMap → find_path / HexNavigator → JobQueue + match_jobs
//! → Stockpile accounting → Deck cycling

use hexbeast_logic::cards::{
    starter_deck, starter_library, validate_target, CardError, CardId, Deck,
};
use hexbeast_logic::economy::{upkeep, BuildingKind, ResourceKind, Stockpile};
use hexbeast_logic::jobs::{
    match_jobs, AgentId, IdleAgent, JobKind, JobQueue, JobRequest, SettlementId,
};
use hexbeast_logic::layout::Layout;
use hexbeast_logic::pathfinding::{find_path, path_cost, reachable, HexNavigator};
use hexbeast_logic::{Hex, HexMap, Terrain};

// ── Helpers ────────────────────────────────────────────────────────────

/// Radius-4 map with a water wall along q = 1 that leaves one gap at r = -4.
fn walled_map() -> HexMap {
    let mut map = HexMap::hexagon(4);
    for r in -3..=3 {
        map.set_terrain(Hex::new(1, r), Terrain::Water);
    }
    map
}

fn idle(id: u32, at: Hex) -> IdleAgent {
    IdleAgent {
        id: AgentId(id),
        position: at,
    }
}

// ── Paths ──────────────────────────────────────────────────────────────

#[test]
fn path_goes_around_the_wall() {
    let map = walled_map();
    let start = Hex::new(0, 0);
    let goal = Hex::new(2, 0);
    let path = find_path(&map, start, goal).expect("gap leaves a route");

    assert_eq!(path.first(), Some(&start));
    assert_eq!(path.last(), Some(&goal));
    assert!(path.iter().all(|h| map.is_passable(*h)));
    for pair in path.windows(2) {
        assert_eq!(pair[0].distance(pair[1]), 1);
    }
    assert!(path.len() > start.distance(goal) as usize + 1);
    assert_eq!(path_cost(&map, &path), Some(path.len() as u32 - 1));
}

#[test]
fn closing_the_gap_cuts_the_map() {
    let mut map = walled_map();
    map.set_terrain(Hex::new(1, -4), Terrain::Mountain);
    assert!(find_path(&map, Hex::new(0, 0), Hex::new(2, 0)).is_none());

    let near = reachable(&map, Hex::new(0, 0), 100);
    assert!(!near.contains_key(&Hex::new(2, 0)));
    assert_eq!(near.get(&Hex::new(0, 0)), Some(&0));
}

#[test]
fn navigator_needs_invalidating_after_terrain_edit() {
    let mut map = HexMap::hexagon(3);
    let mut nav = HexNavigator::new();
    let start = Hex::new(-2, 0);
    let goal = Hex::new(2, 0);

    let before = nav.find_path(&map, start, goal).expect("open map");
    for hex in &before[1..before.len() - 1] {
        map.set_terrain(*hex, Terrain::Forest);
    }

    assert_eq!(nav.find_path(&map, start, goal), Some(before.clone()));
    assert_eq!(nav.stats(), (1, 1));

    nav.invalidate();
    let after = nav.find_path(&map, start, goal).expect("still open");
    assert!(path_cost(&map, &after) <= path_cost(&map, &before));
    assert_eq!(nav.stats(), (1, 2));
}

#[test]
fn layout_round_trips_every_hex() {
    let layout = Layout::pointy(10.0);
    for hex in Hex::ORIGIN.range(3) {
        assert_eq!(layout.pixel_to_hex(layout.hex_to_pixel(hex)).round(), hex);
    }
}

// ── Jobs ───────────────────────────────────────────────────────────────

#[test]
fn job_lifecycle_through_matching() {
    let mut queue = JobQueue::new(SettlementId(1));
    let near = queue.push(JobRequest::new(JobKind::Gather, Hex::new(3, 0)));
    let far = queue.push(JobRequest::new(JobKind::Gather, Hex::new(-3, 0)));

    let mut pool = vec![idle(1, Hex::new(-2, 0)), idle(2, Hex::new(2, 0))];
    let assignments = match_jobs(&queue, &mut pool);
    assert_eq!(assignments.len(), 2);
    assert_eq!((assignments[0].job, assignments[0].agent), (near, AgentId(2)));
    assert_eq!((assignments[1].job, assignments[1].agent), (far, AgentId(1)));
    assert!(pool.is_empty());

    for a in &assignments {
        assert!(queue.claim(a.job, a.agent));
    }
    assert_eq!(queue.pending_count(), 0);

    // Agent 1 cannot reach its job; agent 2 finishes.
    assert!(queue.release(far));
    assert_eq!(queue.complete(near).map(|j| j.kind), Some(JobKind::Gather));
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.get(far).map(|j| j.attempts), Some(1));

    for _ in 0..2 {
        queue.claim(far, AgentId(1));
        queue.release(far);
    }
    let dropped = queue.retain_attempts(3);
    assert_eq!(dropped.len(), 1);
    assert!(queue.is_empty());
}

#[test]
fn departed_agent_frees_its_jobs() {
    let mut queue = JobQueue::new(SettlementId(2));
    let a = queue.push(JobRequest::new(JobKind::Haul, Hex::ORIGIN).carrying(ResourceKind::Wood, 2));
    let b = queue.push_claimed(
        JobRequest::new(JobKind::Deposit, Hex::ORIGIN).carrying(ResourceKind::Food, 3),
        AgentId(4),
    );
    queue.claim(a, AgentId(4));

    assert_eq!(queue.abandon_by(AgentId(4)), 2);
    let pending: Vec<_> = queue.pending().map(|j| j.id).collect();
    assert_eq!(pending, vec![a, b]);
    assert!(queue.iter().all(|j| j.attempts == 0));
}

// ── Economy ────────────────────────────────────────────────────────────

#[test]
fn settlement_can_afford_a_house_after_gathering() {
    let mut stock = Stockpile::new().with(ResourceKind::Food, 10);
    let house = BuildingKind::House.materials();
    assert!(!stock.can_afford(&house));

    stock.add(ResourceKind::Wood, 3);
    assert!(!stock.spend(&house));
    assert_eq!(stock.get(ResourceKind::Wood), 3);

    stock.add(ResourceKind::Wood, 1);
    assert!(stock.spend(&house));
    assert_eq!(stock.get(ResourceKind::Wood), 0);

    let eaten = stock.take(ResourceKind::Food, upkeep(4, 3));
    assert_eq!(eaten, 10);
    assert_eq!(stock.total(), 0);
}

// ── Cards ──────────────────────────────────────────────────────────────

#[test]
fn deck_cycles_without_losing_cards() {
    let mut deck = Deck::new(starter_deck());
    let total = deck.total();

    for _ in 0..10 {
        deck.draw(5, |pile: &mut Vec<CardId>| pile.reverse());
        while !deck.hand.is_empty() {
            deck.play(0).expect("hand not empty");
        }
        assert_eq!(deck.total(), total);
    }
    assert_eq!(deck.play(0), Err(CardError::EmptySlot(0)));
}

#[test]
fn every_starter_card_reaches_its_own_range() {
    for def in starter_library() {
        let edge = Hex::direction(0).scale(def.target_range as i32);
        assert!(validate_target(&def, Hex::ORIGIN, edge).is_ok(), "{}", def.name);
        let beyond = Hex::direction(0).scale(def.target_range as i32 + 1);
        assert!(validate_target(&def, Hex::ORIGIN, beyond).is_err(), "{}", def.name);
    }
}
