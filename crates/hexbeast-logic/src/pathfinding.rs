//! A* pathfinding over a [`HexMap`].
//!
//! Step cost is the entered tile's terrain cost and the heuristic is plain
//! hex distance, which never overestimates since the cheapest terrain costs 1.
//! `HexNavigator` adds a bounded path cache on top.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::hex::Hex;
use crate::hex_map::HexMap;

/// Find the cheapest path from `start` to `goal`, both included.
///
/// Returns `[start]` when they are equal and `None` when `start` is off the
/// map, `goal` is off the map or impassable, or no route exists.
pub fn find_path(map: &HexMap, start: Hex, goal: Hex) -> Option<Vec<Hex>> {
    if !map.contains(start) || !map.is_passable(goal) {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }

    // Ordered by f, then h, then insertion order; lowest pops first.
    let mut open: BinaryHeap<Reverse<(u32, u32, u64, Hex)>> = BinaryHeap::new();
    let mut g_score: HashMap<Hex, u32> = HashMap::new();
    let mut came_from: HashMap<Hex, Hex> = HashMap::new();
    let mut closed: HashSet<Hex> = HashSet::new();
    let mut seq: u64 = 0;

    let h0 = start.distance(goal) as u32;
    open.push(Reverse((h0, h0, seq, start)));
    g_score.insert(start, 0);

    while let Some(Reverse((_, _, _, current))) = open.pop() {
        if current == goal {
            return Some(reconstruct(&came_from, current));
        }
        if !closed.insert(current) {
            continue;
        }
        let g_current = g_score[&current];

        for next in map.passable_neighbors(current) {
            if closed.contains(&next) {
                continue;
            }
            let Some(step) = map.move_cost(next) else {
                continue;
            };
            let tentative = g_current + step;
            if g_score.get(&next).map_or(true, |&g| tentative < g) {
                g_score.insert(next, tentative);
                came_from.insert(next, current);
                let h = next.distance(goal) as u32;
                seq += 1;
                open.push(Reverse((tentative + h, h, seq, next)));
            }
        }
    }

    None
}

fn reconstruct(came_from: &HashMap<Hex, Hex>, goal: Hex) -> Vec<Hex> {
    let mut path = vec![goal];
    let mut node = goal;
    while let Some(&prev) = came_from.get(&node) {
        path.push(prev);
        node = prev;
    }
    path.reverse();
    path
}

/// Sum of entry costs for every hex after the first.
///
/// Returns `None` if the path crosses an impassable or off-map hex.
pub fn path_cost(map: &HexMap, path: &[Hex]) -> Option<u32> {
    path.iter().skip(1).map(|h| map.move_cost(*h)).sum()
}

/// Every hex reachable from `start` spending at most `budget`, with its cost.
pub fn reachable(map: &HexMap, start: Hex, budget: u32) -> HashMap<Hex, u32> {
    let mut best: HashMap<Hex, u32> = HashMap::new();
    if !map.contains(start) {
        return best;
    }
    let mut frontier = BinaryHeap::new();
    best.insert(start, 0);
    frontier.push(Reverse((0u32, start)));

    while let Some(Reverse((cost, current))) = frontier.pop() {
        if best.get(&current).is_some_and(|&c| c < cost) {
            continue;
        }
        for next in map.passable_neighbors(current) {
            let Some(step) = map.move_cost(next) else {
                continue;
            };
            let next_cost = cost + step;
            if next_cost > budget {
                continue;
            }
            if best.get(&next).map_or(true, |&c| next_cost < c) {
                best.insert(next, next_cost);
                frontier.push(Reverse((next_cost, next)));
            }
        }
    }

    best
}

/// A* with a small cache of recent results.
///
/// The map is borrowed per call so callers can keep editing terrain; call
/// [`HexNavigator::invalidate`] after any edit.
#[derive(Debug, Clone)]
pub struct HexNavigator {
    cache: HashMap<(Hex, Hex), Option<Vec<Hex>>>,
    cache_capacity: usize,
    hits: u64,
    misses: u64,
}

impl Default for HexNavigator {
    fn default() -> Self {
        Self::with_capacity(256)
    }
}

impl HexNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(cache_capacity: usize) -> Self {
        Self {
            cache: HashMap::new(),
            cache_capacity,
            hits: 0,
            misses: 0,
        }
    }

    pub fn find_path(&mut self, map: &HexMap, start: Hex, goal: Hex) -> Option<Vec<Hex>> {
        let key = (start, goal);
        if let Some(cached) = self.cache.get(&key) {
            self.hits += 1;
            return cached.clone();
        }
        self.misses += 1;

        let result = find_path(map, start, goal);

        if self.cache_capacity > 0 {
            if self.cache.len() >= self.cache_capacity {
                // Evict an arbitrary entry (HashMap iteration order).
                if let Some(&evict_key) = self.cache.keys().next() {
                    self.cache.remove(&evict_key);
                }
            }
            self.cache.insert(key, result.clone());
        }

        result
    }

    /// Drop all cached paths, e.g. after terrain changed.
    pub fn invalidate(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    /// (hits, misses) since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}
