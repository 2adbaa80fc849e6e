// The map — sole owner of all placed colonies and in-flight parties.
//
// `GameMap` pairs the pure logic entities (`Colony`, `Party`) with their
// spatial state and dispenses compact ids. Everything else in the sim refers
// to entities through ids; the map is the only owner. A party's reference to
// its destination colony is a `ColonyId` lookup relation, not ownership —
// colonies are never destroyed, so the destination always resolves.
//
// Registration/unregistration of parties happens through `launch_party` and
// `remove_party`; removing an id that is not present is a silent no-op.
//
// **Critical constraint: determinism.** Entities are stored in `BTreeMap`s
// keyed by monotonically dispensed ids, so every per-tick sweep (growth,
// movement, collision, policy) iterates in a fixed order.

use crate::colony::Colony;
use crate::config::GameConfig;
use crate::faction::FactionTable;
use crate::party::Party;
use crate::types::{ColonyId, PartyId, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A colony together with its spatial placement.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlacedColony {
    pub colony: Colony,
    /// Center of the colony. Colonies do not move.
    pub position: Vec2,
    /// Visual radius; also the radius used for point-containment queries.
    pub radius: f64,
    /// Collision radius, slightly shrunk from the visual radius.
    pub hitbox: f64,
}

impl PlacedColony {
    /// Point-containment test against the visual radius. Used for
    /// selection/hover queries, not for collision.
    pub fn contains(&self, point: Vec2) -> bool {
        self.position.distance(point) < self.radius
    }
}

/// A party together with its spatial and steering state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InFlightParty {
    pub party: Party,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Repulsion accumulated from grazed non-target colonies this tick.
    /// Zeroed at the start of every tick, before collision resolution.
    pub repulsion: Vec2,
    pub radius: f64,
    pub hitbox: f64,
    /// Effective max speed, fixed at launch: faction speed x colony speed
    /// factor x global pacing factor.
    pub max_speed: f64,
    /// The target colony. A lookup relation — the party queries the
    /// destination's current position each tick.
    pub destination: ColonyId,
}

/// Container for everything on the play field.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameMap {
    colonies: BTreeMap<ColonyId, PlacedColony>,
    parties: BTreeMap<PartyId, InFlightParty>,
    next_colony_id: u32,
    next_party_id: u32,
    width: f64,
    height: f64,
}

impl GameMap {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            colonies: BTreeMap::new(),
            parties: BTreeMap::new(),
            next_colony_id: 0,
            next_party_id: 0,
            width,
            height,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Remove every entity, keeping the field dimensions. Id dispensers are
    /// not reset so ids stay unique across reloads within one state.
    pub fn clear(&mut self) {
        self.colonies.clear();
        self.parties.clear();
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    /// Place a colony on the field. The collision hitbox is the visual
    /// radius shrunk by the configured ratio.
    pub fn register_colony(
        &mut self,
        colony: Colony,
        position: Vec2,
        radius: f64,
        config: &GameConfig,
    ) -> ColonyId {
        let id = ColonyId(self.next_colony_id);
        self.next_colony_id += 1;
        self.colonies.insert(
            id,
            PlacedColony {
                colony,
                position,
                radius,
                hitbox: radius * config.colony_hitbox_ratio,
            },
        );
        id
    }

    /// Split half of `from`'s population into a party bound for `to`.
    ///
    /// Returns `None` (no-op) when `from == to` or either colony is unknown.
    /// The party's visual radius is interpolated from the source colony's
    /// post-split population; its hitbox is the configured fraction of that.
    pub fn launch_party(
        &mut self,
        from: ColonyId,
        to: ColonyId,
        factions: &FactionTable,
        config: &GameConfig,
    ) -> Option<PartyId> {
        if from == to || !self.colonies.contains_key(&to) {
            return None;
        }
        let placed = self.colonies.get_mut(&from)?;
        let party = placed.colony.split_party();
        let radius = (config.party_radius_colony_ratio * placed.radius - config.party_radius_min)
            * placed.colony.population() as f64
            / config.population_limit as f64
            + config.party_radius_min;
        let max_speed =
            party.max_speed(factions.stats(party.faction())) * config.party_speed_factor;
        let position = placed.position;

        let id = PartyId(self.next_party_id);
        self.next_party_id += 1;
        self.parties.insert(
            id,
            InFlightParty {
                party,
                position,
                velocity: Vec2::ZERO,
                repulsion: Vec2::ZERO,
                radius,
                hitbox: radius * config.party_hitbox_ratio,
                max_speed,
                destination: to,
            },
        );
        Some(id)
    }

    /// Remove a party from the field (it arrived). Unknown ids are a silent
    /// no-op and return `None`.
    pub fn remove_party(&mut self, id: PartyId) -> Option<InFlightParty> {
        self.parties.remove(&id)
    }

    // -----------------------------------------------------------------------
    // Enumeration and lookup
    // -----------------------------------------------------------------------

    pub fn colonies(&self) -> impl Iterator<Item = (ColonyId, &PlacedColony)> {
        self.colonies.iter().map(|(id, c)| (*id, c))
    }

    pub fn colonies_mut(&mut self) -> impl Iterator<Item = (ColonyId, &mut PlacedColony)> {
        self.colonies.iter_mut().map(|(id, c)| (*id, c))
    }

    pub fn parties(&self) -> impl Iterator<Item = (PartyId, &InFlightParty)> {
        self.parties.iter().map(|(id, p)| (*id, p))
    }

    pub fn parties_mut(&mut self) -> impl Iterator<Item = (PartyId, &mut InFlightParty)> {
        self.parties.iter_mut().map(|(id, p)| (*id, p))
    }

    pub fn colony(&self, id: ColonyId) -> Option<&PlacedColony> {
        self.colonies.get(&id)
    }

    pub fn colony_mut(&mut self, id: ColonyId) -> Option<&mut PlacedColony> {
        self.colonies.get_mut(&id)
    }

    pub fn party(&self, id: PartyId) -> Option<&InFlightParty> {
        self.parties.get(&id)
    }

    pub fn party_mut(&mut self, id: PartyId) -> Option<&mut InFlightParty> {
        self.parties.get_mut(&id)
    }

    pub fn colony_count(&self) -> usize {
        self.colonies.len()
    }

    pub fn party_count(&self) -> usize {
        self.parties.len()
    }

    // -----------------------------------------------------------------------
    // Spatial queries
    // -----------------------------------------------------------------------

    /// All colonies whose visual radius contains the given point. Used for
    /// selection and hover, not by the simulation itself.
    pub fn colonies_at(&self, point: Vec2) -> Vec<ColonyId> {
        self.colonies()
            .filter(|(_, placed)| placed.contains(point))
            .map(|(id, _)| id)
            .collect()
    }

    /// Whether a colony of the given radius fits at `position` without
    /// overlapping an existing colony.
    pub fn can_place_colony(&self, radius: f64, position: Vec2) -> bool {
        self.colonies()
            .all(|(_, placed)| placed.position.distance(position) >= radius + placed.radius)
    }

    /// Zero every party's repulsion accumulator. Runs at the start of each
    /// tick; repulsion is recomputed fresh from this tick's overlaps.
    pub fn reset_repulsion(&mut self) {
        for (_, body) in self.parties_mut() {
            body.repulsion = Vec2::ZERO;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::faction::FactionId;
    use crate::types::ColonyArchetype;

    fn setup() -> (GameMap, FactionTable, GameConfig) {
        let config = GameConfig::default();
        let factions = FactionTable::new(config.factions.clone());
        (GameMap::new(1280.0, 720.0), factions, config)
    }

    #[test]
    fn register_dispenses_sequential_ids() {
        let (mut map, _, config) = setup();
        let a = map.register_colony(
            Colony::new(FactionId(1), 10, ColonyArchetype::Regular),
            Vec2::new(100.0, 100.0),
            60.0,
            &config,
        );
        let b = map.register_colony(
            Colony::new(FactionId::NULL, 0, ColonyArchetype::Regular),
            Vec2::new(500.0, 500.0),
            40.0,
            &config,
        );
        assert_ne!(a, b);
        assert_eq!(map.colony_count(), 2);
    }

    #[test]
    fn colony_hitbox_is_shrunk_from_radius() {
        let (mut map, _, config) = setup();
        let id = map.register_colony(
            Colony::new(FactionId(1), 10, ColonyArchetype::Regular),
            Vec2::new(100.0, 100.0),
            60.0,
            &config,
        );
        let placed = map.colony(id).unwrap();
        assert!((placed.hitbox - 60.0 * config.colony_hitbox_ratio).abs() < 1e-9);
        assert!(placed.hitbox < placed.radius);
    }

    #[test]
    fn launch_splits_population_and_registers_a_party() {
        let (mut map, factions, config) = setup();
        let from = map.register_colony(
            Colony::new(FactionId(1), 7, ColonyArchetype::Regular),
            Vec2::new(100.0, 100.0),
            60.0,
            &config,
        );
        let to = map.register_colony(
            Colony::new(FactionId::NULL, 0, ColonyArchetype::Regular),
            Vec2::new(900.0, 500.0),
            40.0,
            &config,
        );

        let pid = map.launch_party(from, to, &factions, &config).unwrap();
        let body = map.party(pid).unwrap();
        assert_eq!(body.party.population(), 4);
        assert_eq!(map.colony(from).unwrap().colony.population(), 3);
        assert_eq!(body.destination, to);
        // Party starts at the source colony's center.
        assert_eq!(body.position, map.colony(from).unwrap().position);
    }

    #[test]
    fn launch_to_self_or_unknown_is_a_noop() {
        let (mut map, factions, config) = setup();
        let only = map.register_colony(
            Colony::new(FactionId(1), 10, ColonyArchetype::Regular),
            Vec2::new(100.0, 100.0),
            60.0,
            &config,
        );
        assert!(map.launch_party(only, only, &factions, &config).is_none());
        assert!(
            map.launch_party(only, ColonyId(999), &factions, &config)
                .is_none()
        );
        assert!(
            map.launch_party(ColonyId(999), only, &factions, &config)
                .is_none()
        );
        assert_eq!(map.colony(only).unwrap().colony.population(), 10);
        assert_eq!(map.party_count(), 0);
    }

    #[test]
    fn party_max_speed_includes_global_pacing_factor() {
        let (mut map, factions, config) = setup();
        let from = map.register_colony(
            Colony::new(FactionId(1), 10, ColonyArchetype::Speed),
            Vec2::new(100.0, 100.0),
            60.0,
            &config,
        );
        let to = map.register_colony(
            Colony::new(FactionId::NULL, 0, ColonyArchetype::Regular),
            Vec2::new(900.0, 500.0),
            40.0,
            &config,
        );
        let pid = map.launch_party(from, to, &factions, &config).unwrap();
        let expected = factions.stats(FactionId(1)).speed * 1.3 * config.party_speed_factor;
        assert!((map.party(pid).unwrap().max_speed - expected).abs() < 1e-9);
    }

    #[test]
    fn remove_party_is_idempotent() {
        let (mut map, factions, config) = setup();
        let from = map.register_colony(
            Colony::new(FactionId(1), 10, ColonyArchetype::Regular),
            Vec2::new(100.0, 100.0),
            60.0,
            &config,
        );
        let to = map.register_colony(
            Colony::new(FactionId::NULL, 0, ColonyArchetype::Regular),
            Vec2::new(900.0, 500.0),
            40.0,
            &config,
        );
        let pid = map.launch_party(from, to, &factions, &config).unwrap();
        assert!(map.remove_party(pid).is_some());
        // Second removal is a silent no-op.
        assert!(map.remove_party(pid).is_none());
    }

    #[test]
    fn colonies_at_uses_the_visual_radius() {
        let (mut map, _, config) = setup();
        let id = map.register_colony(
            Colony::new(FactionId(1), 10, ColonyArchetype::Regular),
            Vec2::new(100.0, 100.0),
            60.0,
            &config,
        );
        assert_eq!(map.colonies_at(Vec2::new(120.0, 100.0)), vec![id]);
        // Inside the visual radius but outside the hitbox still selects.
        assert_eq!(map.colonies_at(Vec2::new(155.0, 100.0)), vec![id]);
        assert!(map.colonies_at(Vec2::new(170.0, 100.0)).is_empty());
    }

    #[test]
    fn can_place_colony_rejects_overlap() {
        let (mut map, _, config) = setup();
        map.register_colony(
            Colony::new(FactionId(1), 10, ColonyArchetype::Regular),
            Vec2::new(100.0, 100.0),
            60.0,
            &config,
        );
        assert!(!map.can_place_colony(50.0, Vec2::new(150.0, 100.0)));
        assert!(map.can_place_colony(50.0, Vec2::new(400.0, 400.0)));
    }
}
