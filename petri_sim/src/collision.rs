// Collision — contact detection and arrival resolution.
//
// Detection and resolution are split: a `BroadPhase` produces the list of
// party/colony overlaps for the tick, and `resolve` consumes it. The split
// keeps resolution logic independent of how contacts are found, so the
// pair scan can be swapped for a spatial index without touching game rules.
//
// Overlap with the *destination* colony is an arrival: the party is removed
// from the field and the colony accepts it (merge or battle). Overlap with
// any other colony only accumulates repulsion; movement folds that into the
// party's heading later in the same tick.
//
// **Critical constraint: determinism.** `PairScan` walks colonies in id
// order and parties in id order inside that, so the contact list — and
// therefore the order battles resolve in — is a pure function of state.

use crate::colony::AcceptOutcome;
use crate::event::{SimEvent, SimEventKind};
use crate::faction::FactionTable;
use crate::map::GameMap;
use crate::types::{ColonyId, PartyId};

/// One party/colony overlap detected this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Contact {
    pub party: PartyId,
    pub colony: ColonyId,
}

/// Contact detection strategy.
pub trait BroadPhase {
    fn contacts(&self, map: &GameMap) -> Vec<Contact>;
}

/// Brute-force colony-by-party scan. Quadratic, which is fine at the entity
/// counts a match produces (tens of colonies, tens of parties).
pub struct PairScan;

impl BroadPhase for PairScan {
    fn contacts(&self, map: &GameMap) -> Vec<Contact> {
        let mut contacts = Vec::new();
        for (colony_id, placed) in map.colonies() {
            for (party_id, body) in map.parties() {
                let overlap =
                    body.position.distance(placed.position) < body.hitbox + placed.hitbox;
                if overlap {
                    contacts.push(Contact {
                        party: party_id,
                        colony: colony_id,
                    });
                }
            }
        }
        contacts
    }
}

/// Resolve the tick's contacts in order: arrivals consume the party and run
/// merge/battle, grazes push repulsion onto it.
///
/// A party can appear in several contacts; once an arrival has consumed it,
/// its remaining contacts are skipped.
pub fn resolve(
    map: &mut GameMap,
    contacts: &[Contact],
    factions: &FactionTable,
    population_limit: u32,
    tick: u64,
    events: &mut Vec<SimEvent>,
) {
    for contact in contacts {
        // Consumed by an earlier arrival this tick.
        let Some(body) = map.party(contact.party) else {
            continue;
        };

        if body.destination == contact.colony {
            let Some(mut arrived) = map.remove_party(contact.party) else {
                continue;
            };
            let Some(placed) = map.colony_mut(contact.colony) else {
                continue;
            };
            let outcome = placed
                .colony
                .accept(&mut arrived.party, factions, population_limit);
            let kind = match outcome {
                AcceptOutcome::Merged => SimEventKind::PartyMerged {
                    party: contact.party,
                    colony: contact.colony,
                    population: placed.colony.population(),
                },
                AcceptOutcome::Defended => SimEventKind::ColonyDefended {
                    colony: contact.colony,
                    remaining: placed.colony.population(),
                },
                AcceptOutcome::Conquered => SimEventKind::ColonyConquered {
                    colony: contact.colony,
                    faction: placed.colony.owner(),
                    population: placed.colony.population(),
                },
                AcceptOutcome::Annihilated => SimEventKind::ColonyNeutralized {
                    colony: contact.colony,
                },
            };
            events.push(SimEvent { tick, kind });
        } else {
            let push = {
                let Some(placed) = map.colony(contact.colony) else {
                    continue;
                };
                body.position - placed.position
            };
            if let Some(body) = map.party_mut(contact.party) {
                body.repulsion += push;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colony::Colony;
    use crate::config::GameConfig;
    use crate::faction::FactionId;
    use crate::types::{ColonyArchetype, Vec2};

    fn setup() -> (GameMap, FactionTable, GameConfig) {
        let config = GameConfig::default();
        let factions = FactionTable::new(config.factions.clone());
        (GameMap::new(1280.0, 720.0), factions, config)
    }

    fn place(
        map: &mut GameMap,
        config: &GameConfig,
        owner: FactionId,
        population: u32,
        position: Vec2,
        radius: f64,
    ) -> ColonyId {
        map.register_colony(
            Colony::new(owner, population, ColonyArchetype::Regular),
            position,
            radius,
            config,
        )
    }

    #[test]
    fn pair_scan_detects_overlap_by_hitbox_sum() {
        let (mut map, factions, config) = setup();
        let from = place(&mut map, &config, FactionId(1), 20, Vec2::new(100.0, 100.0), 60.0);
        let to = place(&mut map, &config, FactionId::NULL, 0, Vec2::new(900.0, 100.0), 60.0);
        let pid = map.launch_party(from, to, &factions, &config).unwrap();

        // Far from the target: only the source colony overlaps.
        let contacts = PairScan.contacts(&map);
        assert!(contacts.contains(&Contact { party: pid, colony: from }));
        assert!(!contacts.contains(&Contact { party: pid, colony: to }));

        // Teleport next to the target, just inside the combined hitboxes.
        let sum = map.party(pid).unwrap().hitbox + map.colony(to).unwrap().hitbox;
        map.party_mut(pid).unwrap().position = Vec2::new(900.0 - sum + 1.0, 100.0);
        let contacts = PairScan.contacts(&map);
        assert!(contacts.contains(&Contact { party: pid, colony: to }));
    }

    #[test]
    fn arrival_at_destination_removes_party_and_merges() {
        let (mut map, factions, config) = setup();
        let from = place(&mut map, &config, FactionId(1), 20, Vec2::new(100.0, 100.0), 60.0);
        let to = place(&mut map, &config, FactionId(1), 6, Vec2::new(900.0, 100.0), 60.0);
        let pid = map.launch_party(from, to, &factions, &config).unwrap();
        map.party_mut(pid).unwrap().position = Vec2::new(900.0, 100.0);

        let contacts = PairScan.contacts(&map);
        let mut events = Vec::new();
        resolve(&mut map, &contacts, &factions, config.population_limit, 7, &mut events);

        assert!(map.party(pid).is_none());
        assert_eq!(map.colony(to).unwrap().colony.population(), 16);
        assert_eq!(
            events,
            vec![SimEvent {
                tick: 7,
                kind: SimEventKind::PartyMerged {
                    party: pid,
                    colony: to,
                    population: 16,
                },
            }]
        );
    }

    #[test]
    fn arrival_at_hostile_destination_raises_battle_event() {
        let (mut map, factions, config) = setup();
        let from = place(&mut map, &config, FactionId(1), 40, Vec2::new(100.0, 100.0), 60.0);
        let to = place(&mut map, &config, FactionId(2), 1, Vec2::new(900.0, 100.0), 60.0);
        let pid = map.launch_party(from, to, &factions, &config).unwrap();
        map.party_mut(pid).unwrap().position = Vec2::new(900.0, 100.0);

        let contacts = PairScan.contacts(&map);
        let mut events = Vec::new();
        resolve(&mut map, &contacts, &factions, config.population_limit, 3, &mut events);

        let placed = map.colony(to).unwrap();
        assert_eq!(placed.colony.owner(), FactionId(1));
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0].kind,
            SimEventKind::ColonyConquered { colony, faction: FactionId(1), .. } if colony == to
        ));
    }

    #[test]
    fn graze_accumulates_repulsion_away_from_the_colony() {
        let (mut map, factions, config) = setup();
        let from = place(&mut map, &config, FactionId(1), 20, Vec2::new(100.0, 100.0), 60.0);
        let to = place(&mut map, &config, FactionId::NULL, 0, Vec2::new(1100.0, 100.0), 60.0);
        let obstacle =
            place(&mut map, &config, FactionId(2), 10, Vec2::new(600.0, 100.0), 60.0);
        let pid = map.launch_party(from, to, &factions, &config).unwrap();
        // Overlapping the obstacle, offset up and to the left of its center.
        map.party_mut(pid).unwrap().position = Vec2::new(590.0, 80.0);

        let contacts = PairScan.contacts(&map);
        assert!(contacts.contains(&Contact { party: pid, colony: obstacle }));
        let mut events = Vec::new();
        resolve(&mut map, &contacts, &factions, config.population_limit, 1, &mut events);

        // Not an arrival: the party survives, no events, repulsion points
        // from the obstacle's center toward the party.
        assert!(events.is_empty());
        let body = map.party(pid).unwrap();
        assert_eq!(body.repulsion, Vec2::new(-10.0, -20.0));
    }

    #[test]
    fn consumed_party_skips_its_remaining_contacts() {
        let (mut map, factions, config) = setup();
        let from = place(&mut map, &config, FactionId(1), 20, Vec2::new(100.0, 100.0), 60.0);
        // Destination and an overlapping neighbor share the party's position.
        let to = place(&mut map, &config, FactionId(1), 5, Vec2::new(900.0, 100.0), 60.0);
        place(&mut map, &config, FactionId(2), 5, Vec2::new(930.0, 100.0), 60.0);
        let pid = map.launch_party(from, to, &factions, &config).unwrap();
        map.party_mut(pid).unwrap().position = Vec2::new(915.0, 100.0);

        let contacts = PairScan.contacts(&map);
        assert!(contacts.len() >= 2);
        let mut events = Vec::new();
        resolve(&mut map, &contacts, &factions, config.population_limit, 1, &mut events);

        // Exactly one outcome: the arrival. The graze with the neighbor is
        // skipped because the party no longer exists.
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0].kind, SimEventKind::PartyMerged { .. }));
    }
}
