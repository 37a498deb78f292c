//! Terrain and resource node generation.

use hecs::World;
use hexbeast_logic::economy::ResourceKind;
use hexbeast_logic::{Hex, HexMap, Terrain};
use rand::Rng;

use crate::components::{HexPosition, ResourceNode};

/// Relative odds of each terrain on a fresh map. Sacred ground only comes
/// from shrines.
const TERRAIN_WEIGHTS: [(Terrain, u32); 5] = [
    (Terrain::Grassland, 50),
    (Terrain::Forest, 22),
    (Terrain::Hills, 13),
    (Terrain::Mountain, 7),
    (Terrain::Water, 8),
];

/// Units of resource in a generated node.
const NODE_SIZE: std::ops::RangeInclusive<u32> = 10..=30;

/// Hexagonal map of `radius` with random terrain.
pub fn generate_terrain(radius: i32, rng: &mut impl Rng) -> HexMap {
    let mut map = HexMap::hexagon(radius);
    let total: u32 = TERRAIN_WEIGHTS.iter().map(|(_, w)| w).sum();
    // Sorted so the same seed gives the same map regardless of hash order.
    for hex in map.sorted_hexes() {
        let mut roll = rng.gen_range(0..total);
        let mut terrain = Terrain::Grassland;
        for (candidate, weight) in TERRAIN_WEIGHTS {
            if roll < weight {
                terrain = candidate;
                break;
            }
            roll -= weight;
        }
        map.set_terrain(hex, terrain);
    }
    map
}

fn settlement_ring(radius: i32) -> i32 {
    (radius / 2).max(1)
}

/// Most settlements a map of `radius` can hold: the origin plus every hex
/// of the settlement ring.
pub fn max_settlements(radius: i32) -> u32 {
    6 * settlement_ring(radius) as u32 + 1
}

/// Where settlements go: the first at the origin, the rest spaced around
/// the ring halfway to the edge. Never more than `max_settlements`.
pub fn settlement_sites(radius: i32, count: u32) -> Vec<Hex> {
    let mut sites = vec![Hex::ORIGIN];
    if count <= 1 {
        return sites;
    }
    let ring = Hex::ORIGIN.ring(settlement_ring(radius));
    let others = ((count - 1) as usize).min(ring.len());
    for i in 0..others {
        sites.push(ring[i * ring.len() / others]);
    }
    sites
}

/// Make a settlement site livable: grassland on and around the center, and
/// a walkable line back to the origin.
pub fn clear_site(map: &mut HexMap, center: Hex) {
    map.set_terrain(center, Terrain::Grassland);
    for n in center.neighbors() {
        map.set_terrain(n, Terrain::Grassland);
    }
    for hex in Hex::ORIGIN.line_to(center) {
        if !map.is_passable(hex) {
            map.set_terrain(hex, Terrain::Grassland);
        }
    }
}

/// Scatter resource nodes over producing terrain.
///
/// Each hex whose terrain yields a resource gets a node with probability
/// `density`. Hexes in `reserved` are skipped. Returns the number placed.
pub fn scatter_nodes(
    world: &mut World,
    map: &HexMap,
    density: f32,
    reserved: &[Hex],
    rng: &mut impl Rng,
) -> usize {
    let mut placed = 0;
    for hex in map.sorted_hexes() {
        if reserved.contains(&hex) {
            continue;
        }
        let Some(resource) = map.terrain(hex).and_then(Terrain::resource) else {
            continue;
        };
        if rng.gen::<f32>() < density {
            let node = ResourceNode::new(resource, rng.gen_range(NODE_SIZE));
            world.spawn((HexPosition(hex), node));
            placed += 1;
        }
    }
    placed
}

/// Ensure a settlement has one node of each gathered resource nearby,
/// turning a free ring hex into matching terrain where needed.
pub fn guarantee_nodes(
    world: &mut World,
    map: &mut HexMap,
    center: Hex,
    reserved: &[Hex],
    rng: &mut impl Rng,
) {
    let wanted = [
        (ResourceKind::Food, Terrain::Grassland),
        (ResourceKind::Wood, Terrain::Forest),
        (ResourceKind::Stone, Terrain::Hills),
    ];
    let mut taken: Vec<Hex> = world
        .query::<&HexPosition>()
        .iter()
        .map(|(_, pos)| pos.0)
        .collect();

    for (resource, terrain) in wanted {
        let has_one = world
            .query::<(&HexPosition, &ResourceNode)>()
            .iter()
            .any(|(_, (pos, node))| node.resource == resource && pos.0.distance(center) <= 3);
        if has_one {
            continue;
        }
        let spot = Hex::ORIGIN
            .ring(2)
            .into_iter()
            .map(|offset| center + offset)
            .find(|hex| map.contains(*hex) && !reserved.contains(hex) && !taken.contains(hex));
        let Some(hex) = spot else {
            log::warn!("no room for a {} node near {}", resource.name(), center);
            continue;
        };
        map.set_terrain(hex, terrain);
        world.spawn((HexPosition(hex), ResourceNode::new(resource, rng.gen_range(NODE_SIZE))));
        taken.push(hex);
    }
}
