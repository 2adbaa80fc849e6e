// Scripted opponents — the attack policy for non-human factions.
//
// Each scripted player owns a faction and a tick counter. Once per attack
// interval it sweeps its colonies and, per colony, rolls whether to attack;
// a passing roll launches at a uniformly chosen colony it does not own
// (enemy or neutral alike). The policy reads map state and the shared rng
// but launches nothing itself — it returns (from, to) orders for the sim to
// execute, so a policy decision goes through exactly the same launch path
// as a player command.
//
// **Critical constraint: determinism.** Colonies are swept in id order and
// every roll draws from the sim's seeded rng, so a policy's decisions are a
// pure function of (state, seed).

use crate::config::GameConfig;
use crate::faction::FactionId;
use crate::map::GameMap;
use crate::types::ColonyId;
use petri_prng::SimRng;
use serde::{Deserialize, Serialize};

/// One scripted faction controller.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScriptedPlayer {
    faction: FactionId,
    /// Ticks accumulated toward the next attack wave.
    timer: u32,
}

impl ScriptedPlayer {
    pub fn new(faction: FactionId) -> Self {
        Self { faction, timer: 0 }
    }

    pub fn faction(&self) -> FactionId {
        self.faction
    }

    /// Advance the attack timer one tick and return the launches to make.
    ///
    /// A controller for the null faction never acts. When the interval
    /// elapses, each owned colony rolls independently; a roll passes when
    /// the sample exceeds the attack probability, so raising the
    /// probability makes attacks *less* frequent.
    pub fn decide(
        &mut self,
        map: &GameMap,
        rng: &mut SimRng,
        config: &GameConfig,
    ) -> Vec<(ColonyId, ColonyId)> {
        if self.faction.is_null() {
            return Vec::new();
        }

        let mut orders = Vec::new();
        self.timer += 1;
        if self.timer / config.attack_every > 0 {
            let owned: Vec<ColonyId> = map
                .colonies()
                .filter(|(_, placed)| placed.colony.owner() == self.faction)
                .map(|(id, _)| id)
                .collect();
            for from in owned {
                if rng.next_f64() > config.attack_probability {
                    let targets: Vec<ColonyId> = map
                        .colonies()
                        .filter(|(_, placed)| placed.colony.owner() != self.faction)
                        .map(|(id, _)| id)
                        .collect();
                    if !targets.is_empty() {
                        orders.push((from, targets[rng.range_usize(0, targets.len())]));
                    }
                }
            }
            self.timer = 0;
        }
        orders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colony::Colony;
    use crate::types::{ColonyArchetype, Vec2};

    fn setup() -> (GameMap, GameConfig) {
        let config = GameConfig::default();
        let mut map = GameMap::new(1280.0, 720.0);
        for (owner, x) in [(FactionId(1), 100.0), (FactionId(2), 600.0), (FactionId::NULL, 1100.0)]
        {
            map.register_colony(
                Colony::new(owner, 20, ColonyArchetype::Regular),
                Vec2::new(x, 360.0),
                60.0,
                &config,
            );
        }
        (map, config)
    }

    #[test]
    fn null_faction_never_acts() {
        let (map, config) = setup();
        let mut rng = SimRng::new(1);
        let mut player = ScriptedPlayer::new(FactionId::NULL);
        for _ in 0..(config.attack_every * 3) {
            assert!(player.decide(&map, &mut rng, &config).is_empty());
        }
    }

    #[test]
    fn no_orders_before_the_interval_elapses() {
        let (map, config) = setup();
        let mut rng = SimRng::new(1);
        let mut player = ScriptedPlayer::new(FactionId(2));
        for _ in 0..(config.attack_every - 1) {
            assert!(player.decide(&map, &mut rng, &config).is_empty());
        }
    }

    #[test]
    fn orders_only_target_non_owned_colonies() {
        let (map, mut config) = setup();
        // Every roll passes.
        config.attack_probability = 0.0;
        let mut rng = SimRng::new(7);
        let mut player = ScriptedPlayer::new(FactionId(2));
        let mut saw_orders = false;
        for _ in 0..(config.attack_every * 5) {
            for (from, to) in player.decide(&map, &mut rng, &config) {
                saw_orders = true;
                assert_eq!(map.colony(from).unwrap().colony.owner(), FactionId(2));
                assert_ne!(map.colony(to).unwrap().colony.owner(), FactionId(2));
            }
        }
        assert!(saw_orders);
    }

    #[test]
    fn probability_one_suppresses_all_attacks() {
        // Rolls pass only when the sample *exceeds* the threshold, so a
        // threshold of 1.0 can never be beaten.
        let (map, mut config) = setup();
        config.attack_probability = 1.0;
        let mut rng = SimRng::new(7);
        let mut player = ScriptedPlayer::new(FactionId(2));
        for _ in 0..(config.attack_every * 5) {
            assert!(player.decide(&map, &mut rng, &config).is_empty());
        }
    }

    #[test]
    fn decisions_are_deterministic_for_a_seed() {
        let (map, mut config) = setup();
        config.attack_probability = 0.4;
        let mut all_a = Vec::new();
        let mut all_b = Vec::new();
        for sink in [&mut all_a, &mut all_b] {
            let mut rng = SimRng::new(99);
            let mut player = ScriptedPlayer::new(FactionId(1));
            for _ in 0..(config.attack_every * 10) {
                sink.extend(player.decide(&map, &mut rng, &config));
            }
        }
        assert_eq!(all_a, all_b);
    }
}
