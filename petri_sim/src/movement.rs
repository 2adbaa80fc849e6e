// Steering — per-tick movement integration for in-flight parties.
//
// Each party blends a goal-seeking velocity (toward its destination
// colony's current position) with the repulsion accumulated from grazed
// non-target colonies, then renormalizes the result to exactly its max
// speed. Parties therefore move at constant speed; only the direction is
// blended. This keeps motion stable regardless of how many overlaps push on
// a party in one tick.
//
// Repulsion is accumulated by `collision.rs` earlier in the same tick and
// zeroed again at the next tick's start — it is never carried over.

use crate::config::GameConfig;
use crate::map::GameMap;
use crate::types::{PartyId, Vec2};

/// Advance every in-flight party by one tick.
pub fn advance(map: &mut GameMap, config: &GameConfig) {
    // Colonies do not move, but the destination is queried fresh each tick
    // so a party would track it if they ever did.
    let goals: Vec<(PartyId, Vec2)> = map
        .parties()
        .filter_map(|(id, body)| map.colony(body.destination).map(|c| (id, c.position)))
        .collect();

    for (id, destination) in goals {
        if let Some(body) = map.party_mut(id) {
            let goal = (destination - body.position).limit(body.max_speed);
            let blended =
                goal + body.repulsion.limit(body.max_speed).scaled(config.repulsion_damping);
            // Forced to exactly max speed, not clamped — constant-speed
            // motion with direction blended from goal and repulsion. The
            // zero vector stays zero (a party sitting exactly on its goal
            // with no repulsion has no direction to move in).
            body.velocity = blended.with_magnitude(body.max_speed);
            body.position += body.velocity;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colony::Colony;
    use crate::faction::{FactionId, FactionTable};
    use crate::types::ColonyArchetype;

    fn setup_with_party(
        source: Vec2,
        target: Vec2,
    ) -> (GameMap, GameConfig, crate::types::PartyId) {
        let config = GameConfig::default();
        let factions = FactionTable::new(config.factions.clone());
        let mut map = GameMap::new(1280.0, 720.0);
        let from = map.register_colony(
            Colony::new(FactionId(1), 20, ColonyArchetype::Regular),
            source,
            60.0,
            &config,
        );
        let to = map.register_colony(
            Colony::new(FactionId::NULL, 0, ColonyArchetype::Regular),
            target,
            40.0,
            &config,
        );
        let pid = map.launch_party(from, to, &factions, &config).unwrap();
        (map, config, pid)
    }

    #[test]
    fn party_moves_straight_at_max_speed() {
        let (mut map, config, pid) = setup_with_party(
            Vec2::new(100.0, 100.0),
            Vec2::new(1100.0, 100.0),
        );
        let max_speed = map.party(pid).unwrap().max_speed;

        advance(&mut map, &config);
        let body = map.party(pid).unwrap();
        assert!((body.velocity.magnitude() - max_speed).abs() < 1e-9);
        assert!((body.position.x - (100.0 + max_speed)).abs() < 1e-9);
        assert_eq!(body.position.y, 100.0);
    }

    #[test]
    fn speed_stays_constant_over_many_ticks() {
        let (mut map, config, pid) = setup_with_party(
            Vec2::new(100.0, 100.0),
            Vec2::new(1100.0, 650.0),
        );
        let max_speed = map.party(pid).unwrap().max_speed;
        for _ in 0..50 {
            advance(&mut map, &config);
            let v = map.party(pid).unwrap().velocity.magnitude();
            assert!((v - max_speed).abs() < 1e-9, "speed drifted to {v}");
        }
    }

    #[test]
    fn repulsion_bends_the_path_without_changing_speed() {
        let (mut map, config, pid) = setup_with_party(
            Vec2::new(100.0, 100.0),
            Vec2::new(1100.0, 100.0),
        );
        let max_speed = map.party(pid).unwrap().max_speed;
        // Push sideways, as a grazed colony below the path would.
        map.party_mut(pid).unwrap().repulsion = Vec2::new(0.0, -30.0);

        advance(&mut map, &config);
        let body = map.party(pid).unwrap();
        assert!((body.velocity.magnitude() - max_speed).abs() < 1e-9);
        assert!(body.velocity.y < 0.0, "repulsion should deflect the party");
        assert!(body.velocity.x > 0.0, "goal seeking should still dominate");
    }

    #[test]
    fn party_closes_distance_to_destination() {
        let (mut map, config, pid) = setup_with_party(
            Vec2::new(100.0, 100.0),
            Vec2::new(600.0, 400.0),
        );
        let target = Vec2::new(600.0, 400.0);
        let before = map.party(pid).unwrap().position.distance(target);
        for _ in 0..10 {
            advance(&mut map, &config);
        }
        let after = map.party(pid).unwrap().position.distance(target);
        assert!(after < before);
    }
}
