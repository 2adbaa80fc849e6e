// Match setup — authored scenarios and random map generation.
//
// A `MapScenario` is a data-only map description, loadable from JSON:
// placements are expressed in reference coordinates (a 1600-unit-wide
// field) and scaled to the configured world size at instantiation, so one
// scenario file serves every resolution. Slots (`Player(n)`, `Enemy(n)`)
// are bound to concrete factions at instantiation time; the scenario file
// itself never names factions.
//
// `generate_random` builds a symmetric free-for-all instead: starting
// colonies spaced evenly on the field's inscribed ellipse, neutral colonies
// scattered uniformly with a bounded retry budget. Generation draws
// exclusively from the sim's seeded rng, so a seed reproduces the map.

use crate::colony::Colony;
use crate::config::GameConfig;
use crate::faction::{FactionId, FactionTable};
use crate::map::GameMap;
use crate::policy::ScriptedPlayer;
use crate::types::{ColonyArchetype, SetupError, Vec2};
use petri_prng::SimRng;
use serde::{Deserialize, Serialize};

/// Who a scenario placement belongs to. Slots are indices into the faction
/// lists supplied at instantiation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotOwner {
    Player(usize),
    Enemy(usize),
    Neutral,
}

/// One colony in a scenario, in reference coordinates.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ColonyPlacement {
    pub owner: SlotOwner,
    pub position: Vec2,
    pub radius: f64,
    pub archetype: ColonyArchetype,
}

/// A data-only map description.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MapScenario {
    pub name: String,
    /// Number of enemy slots the scenario expects to be filled.
    pub enemies: usize,
    pub placements: Vec<ColonyPlacement>,
}

impl MapScenario {
    /// Realize the scenario onto a map, binding slots to the given factions.
    ///
    /// Placements are scaled from reference coordinates to the configured
    /// world size. Player and enemy colonies start at the player population,
    /// neutral ones at the neutral population. A placement whose slot index
    /// is not covered by the supplied factions fails with `MissingSlot`.
    pub fn instantiate(
        &self,
        map: &mut GameMap,
        config: &GameConfig,
        players: &[FactionId],
        enemies: &[FactionId],
    ) -> Result<(), SetupError> {
        let scale = config.world_width / config.reference_width;
        map.clear();
        for placement in &self.placements {
            let (owner, population) = match placement.owner {
                SlotOwner::Player(slot) => (
                    *players.get(slot).ok_or(SetupError::MissingSlot { slot })?,
                    config.initial_player_population,
                ),
                SlotOwner::Enemy(slot) => (
                    *enemies.get(slot).ok_or(SetupError::MissingSlot { slot })?,
                    config.initial_player_population,
                ),
                SlotOwner::Neutral => (FactionId::NULL, config.initial_neutral_population),
            };
            map.register_colony(
                Colony::new(owner, population, placement.archetype),
                placement.position.scaled(scale),
                placement.radius * scale,
                config,
            );
        }
        Ok(())
    }
}

/// Generate a random free-for-all map.
///
/// The player and `n_enemies` scripted opponents each get one starting
/// colony, spaced evenly (from a random initial angle) on the ellipse
/// inscribed in the field, inset by the starting radius. Enemy factions are
/// drawn without repeats from the table. `n_neutral` neutral colonies are
/// then scattered uniformly; each placement retries up to the configured
/// attempt budget before giving up with `NoRoomForColony`.
///
/// Returns the scripted controllers for the drawn enemy factions.
pub fn generate_random(
    map: &mut GameMap,
    rng: &mut SimRng,
    config: &GameConfig,
    factions: &FactionTable,
    player_faction: FactionId,
    n_enemies: usize,
    n_neutral: usize,
) -> Result<Vec<ScriptedPlayer>, SetupError> {
    map.clear();
    let scale = config.world_width / config.reference_width;
    let starting_radius = config.starting_colony_radius * scale;
    let center = Vec2::new(config.world_width / 2.0, config.world_height / 2.0);
    let half_width = config.world_width / 2.0 - starting_radius;
    let half_height = config.world_height / 2.0 - starting_radius;

    let mut taken = vec![player_faction];
    let mut players = Vec::with_capacity(n_enemies);
    let mut starters = vec![player_faction];
    for _ in 0..n_enemies {
        let drawn = factions.draw_unique(&taken, rng)?;
        taken.push(drawn);
        starters.push(drawn);
        players.push(ScriptedPlayer::new(drawn));
    }

    let mut theta = rng.next_f64() * std::f64::consts::TAU;
    let step = std::f64::consts::TAU / starters.len() as f64;
    for faction in starters {
        let position =
            center + Vec2::new(theta.cos() * half_width, theta.sin() * half_height);
        map.register_colony(
            Colony::new(faction, config.initial_player_population, ColonyArchetype::Regular),
            position,
            starting_radius,
            config,
        );
        theta += step;
    }

    for _ in 0..n_neutral {
        place_neutral(map, rng, config)?;
    }
    Ok(players)
}

const NEUTRAL_ARCHETYPES: [ColonyArchetype; 5] = [
    ColonyArchetype::Regular,
    ColonyArchetype::Strength,
    ColonyArchetype::Speed,
    ColonyArchetype::Growth,
    ColonyArchetype::Defense,
];

fn place_neutral(
    map: &mut GameMap,
    rng: &mut SimRng,
    config: &GameConfig,
) -> Result<(), SetupError> {
    let scale = config.world_width / config.reference_width;
    for _ in 0..config.placement_attempts {
        let radius = rng.range_f64(config.neutral_radius_min, config.neutral_radius_max) * scale;
        let position = Vec2::new(
            rng.range_f64(radius, config.world_width - radius),
            rng.range_f64(radius, config.world_height - radius),
        );
        if map.can_place_colony(radius, position) {
            let archetype = NEUTRAL_ARCHETYPES[rng.range_usize(0, NEUTRAL_ARCHETYPES.len())];
            map.register_colony(
                Colony::new(FactionId::NULL, config.initial_neutral_population, archetype),
                position,
                radius,
                config,
            );
            return Ok(());
        }
    }
    Err(SetupError::NoRoomForColony)
}
