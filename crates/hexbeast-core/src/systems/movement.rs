//! Movement system - steps entities along their hex paths once per tick.

use hecs::{Entity, World};
use hexbeast_logic::pathfinding::HexNavigator;
use hexbeast_logic::{Hex, HexMap};

use crate::components::{HexPosition, Movement};

/// What happened to moving entities this tick.
#[derive(Debug, Default)]
pub struct MovementReport {
    /// Reached the end of their path; `Movement` was removed.
    pub arrived: Vec<Entity>,
    /// Next hex became impassable; `Movement` was removed where they stand.
    pub blocked: Vec<Entity>,
}

enum Outcome {
    Moving,
    Arrived,
    Blocked,
}

/// Advance every entity with a `Movement` by one tick.
pub fn movement_system(world: &mut World, map: &HexMap) -> MovementReport {
    let mut report = MovementReport::default();
    let mut finished: Vec<(Entity, Outcome)> = Vec::new();

    for (entity, (pos, movement)) in world.query_mut::<(&mut HexPosition, &mut Movement)>() {
        match step_movement(pos, movement, map) {
            Outcome::Moving => {}
            outcome => finished.push((entity, outcome)),
        }
    }

    for (entity, outcome) in finished {
        let _ = world.remove_one::<Movement>(entity);
        match outcome {
            Outcome::Arrived => report.arrived.push(entity),
            Outcome::Blocked => report.blocked.push(entity),
            Outcome::Moving => {}
        }
    }

    report
}

fn step_movement(pos: &mut HexPosition, movement: &mut Movement, map: &HexMap) -> Outcome {
    if movement.is_finished() {
        return Outcome::Arrived;
    }
    movement.progress += movement.speed;

    while let Some(next) = movement.next_step() {
        let Some(cost) = map.move_cost(next) else {
            return Outcome::Blocked;
        };
        if movement.progress < cost as f32 {
            return Outcome::Moving;
        }
        movement.progress -= cost as f32;
        movement.index += 1;
        pos.0 = next;
    }

    Outcome::Arrived
}

/// Plan a route for `entity` and attach a `Movement`.
///
/// Returns the path length in hexes entered (0 when already there), or
/// `None` if there is no route. An entity already at `goal` gets no
/// `Movement` component.
pub fn start_movement(
    world: &mut World,
    map: &HexMap,
    navigator: &mut HexNavigator,
    entity: Entity,
    goal: Hex,
    speed: f32,
) -> Option<usize> {
    let start = world.get::<&HexPosition>(entity).ok()?.0;
    let path = navigator.find_path(map, start, goal)?;
    let steps = path.len().saturating_sub(1);
    if steps == 0 {
        let _ = world.remove_one::<Movement>(entity);
    } else {
        let _ = world.insert_one(entity, Movement::new(path, speed));
    }
    Some(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexbeast_logic::Terrain;

    fn line_path(n: i32) -> Vec<Hex> {
        (0..=n).map(|q| Hex::new(q, 0)).collect()
    }

    #[test]
    fn test_one_hex_per_tick_on_grass() {
        let map = HexMap::hexagon(4);
        let mut world = World::new();
        let e = world.spawn((HexPosition(Hex::ORIGIN), Movement::new(line_path(3), 1.0)));

        movement_system(&mut world, &map);
        assert_eq!(world.get::<&HexPosition>(e).unwrap().0, Hex::new(1, 0));
        movement_system(&mut world, &map);
        let report = movement_system(&mut world, &map);
        assert_eq!(report.arrived, vec![e]);
        assert_eq!(world.get::<&HexPosition>(e).unwrap().0, Hex::new(3, 0));
        assert!(world.get::<&Movement>(e).is_err());
    }

    #[test]
    fn test_rough_terrain_takes_longer() {
        let mut map = HexMap::hexagon(4);
        map.set_terrain(Hex::new(1, 0), Terrain::Hills);
        let mut world = World::new();
        let e = world.spawn((HexPosition(Hex::ORIGIN), Movement::new(line_path(1), 1.0)));

        movement_system(&mut world, &map);
        movement_system(&mut world, &map);
        assert_eq!(world.get::<&HexPosition>(e).unwrap().0, Hex::ORIGIN);
        let report = movement_system(&mut world, &map);
        assert_eq!(report.arrived, vec![e]);
    }

    #[test]
    fn test_fast_movers_take_several_steps() {
        let map = HexMap::hexagon(4);
        let mut world = World::new();
        let e = world.spawn((HexPosition(Hex::ORIGIN), Movement::new(line_path(3), 2.0)));
        movement_system(&mut world, &map);
        assert_eq!(world.get::<&HexPosition>(e).unwrap().0, Hex::new(2, 0));
    }

    #[test]
    fn test_blocked_when_path_floods() {
        let mut map = HexMap::hexagon(4);
        let mut world = World::new();
        let e = world.spawn((HexPosition(Hex::ORIGIN), Movement::new(line_path(3), 1.0)));
        movement_system(&mut world, &map);
        map.set_terrain(Hex::new(2, 0), Terrain::Water);
        let report = movement_system(&mut world, &map);
        assert_eq!(report.blocked, vec![e]);
        assert_eq!(world.get::<&HexPosition>(e).unwrap().0, Hex::new(1, 0));
        assert!(world.get::<&Movement>(e).is_err());
    }

    #[test]
    fn test_start_movement() {
        let map = HexMap::hexagon(4);
        let mut nav = HexNavigator::new();
        let mut world = World::new();
        let e = world.spawn((HexPosition(Hex::ORIGIN),));
        assert_eq!(start_movement(&mut world, &map, &mut nav, e, Hex::new(0, 3), 1.0), Some(3));
        assert!(world.get::<&Movement>(e).is_ok());
        assert_eq!(start_movement(&mut world, &map, &mut nav, e, Hex::ORIGIN, 1.0), Some(0));
        assert!(world.get::<&Movement>(e).is_err());
        assert_eq!(start_movement(&mut world, &map, &mut nav, e, Hex::new(9, 9), 1.0), None);
    }
}
