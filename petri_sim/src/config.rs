// Data-driven game configuration.
//
// All tunable simulation parameters live here in `GameConfig`, loaded from
// JSON at startup. The sim never uses magic numbers — it reads from the
// config. This enables balance iteration without recompilation.
//
// Colony behavioral presets are grouped into `ColonyProfile`, a bundle of
// scalar factors. Named preset constructors (`ColonyProfile::regular()`,
// `::strength()`, etc.) produce the five archetypes by tuning the same
// parameter set — there is no colony subtype hierarchy.
//
// Faction stat bundles (strength, defense, speed, reproduction period,
// visual identity) live in `FactionData` entries keyed by `FactionId` in the
// `factions` map — see `faction.rs`.
//
// See also: `sim.rs` which owns the `GameConfig` as part of `SimState`,
// `colony.rs` which reads the profile factors, `scenario.rs` for the
// placement parameters.
//
// **Critical constraint: determinism.** Config values feed directly into
// simulation logic. Two matches with the same seed and commands are only
// identical if their configs are identical.

use crate::faction::{AnimationKind, FactionData, FactionId};
use crate::types::ColonyArchetype;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Colony profiles — the five archetype presets
// ---------------------------------------------------------------------------

/// Behavioral factors for one colony, fixed at creation.
///
/// `defense` and `strength` multiply combat power, `reproduction` scales the
/// faction's reproduction period (lower = faster growth), `speed` multiplies
/// the max speed of outgoing parties.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColonyProfile {
    pub defense: f64,
    pub strength: f64,
    pub reproduction: f64,
    pub speed: f64,
}

impl ColonyProfile {
    /// No modifiers.
    pub fn regular() -> Self {
        Self {
            defense: 1.0,
            strength: 1.0,
            reproduction: 1.0,
            speed: 1.0,
        }
    }

    /// Outgoing parties fight at 1.3x strength.
    pub fn strength() -> Self {
        Self {
            strength: 1.3,
            ..Self::regular()
        }
    }

    /// Outgoing parties move at 1.3x speed.
    pub fn speed() -> Self {
        Self {
            speed: 1.3,
            ..Self::regular()
        }
    }

    /// Reproduction period scaled by 0.7 — population grows faster.
    pub fn growth() -> Self {
        Self {
            reproduction: 0.7,
            ..Self::regular()
        }
    }

    /// Defends at 1.3x defense.
    pub fn defense() -> Self {
        Self {
            defense: 1.3,
            ..Self::regular()
        }
    }

    pub fn for_archetype(archetype: ColonyArchetype) -> Self {
        match archetype {
            ColonyArchetype::Regular => Self::regular(),
            ColonyArchetype::Strength => Self::strength(),
            ColonyArchetype::Speed => Self::speed(),
            ColonyArchetype::Growth => Self::growth(),
            ColonyArchetype::Defense => Self::defense(),
        }
    }

    /// The smallest reproduction factor across the presets. Config
    /// validation uses this to guarantee that no (faction, archetype)
    /// combination rounds its growth period down to zero ticks.
    pub fn min_reproduction_factor() -> f64 {
        Self::growth().reproduction
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// A malformed configuration. Detected by `GameConfig::validate()` before
/// any core entity is constructed — never inside the tick loop. Battle and
/// growth arithmetic divide by net defense, strength and the growth period,
/// so zero-valued stats must be rejected up front.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A faction carries a zero combat stat; battle arithmetic would divide
    /// by zero.
    ZeroCombatStat { faction: FactionId },
    /// A faction's reproduction period, scaled by the smallest archetype
    /// factor, floors to zero ticks.
    GrowthPeriodTooShort { faction: FactionId },
    /// A playable faction whose parties cannot move.
    ZeroSpeed { faction: FactionId },
    /// The population limit is zero; no colony could ever hold population.
    ZeroPopulationLimit,
    /// The scripted policy's attack interval is zero; the decision sweep
    /// divides by it.
    ZeroAttackInterval,
    /// The neutral placement radii form an empty range, or a colony at the
    /// scaled maximum radius could not fit inside the field at all.
    BadNeutralRadiusRange,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroCombatStat { faction } => {
                write!(f, "{faction} has a zero strength or defense stat")
            }
            ConfigError::GrowthPeriodTooShort { faction } => {
                write!(f, "{faction} reproduction period floors to zero ticks")
            }
            ConfigError::ZeroSpeed { faction } => {
                write!(f, "{faction} has zero party speed")
            }
            ConfigError::ZeroPopulationLimit => write!(f, "population limit is zero"),
            ConfigError::ZeroAttackInterval => write!(f, "attack interval is zero"),
            ConfigError::BadNeutralRadiusRange => {
                write!(f, "neutral colony radius range is empty or exceeds the field")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Top-level game config
// ---------------------------------------------------------------------------

/// Top-level game configuration. Loaded from JSON, never mutated at runtime.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameConfig {
    /// Hard cap on colony population. Parties in transit are uncapped.
    pub population_limit: u32,

    /// Global pacing multiplier applied to every party's max speed on
    /// launch, on top of the faction speed and the colony's speed factor.
    pub party_speed_factor: f64,

    /// Damping applied to the accumulated repulsion vector before it is
    /// blended into a party's goal velocity.
    pub repulsion_damping: f64,

    /// Colony hitbox radius as a fraction of its visual radius. Slightly
    /// under 1 so parties graze the rim before an arrival registers.
    pub colony_hitbox_ratio: f64,

    /// Party hitbox radius as a fraction of its visual radius.
    pub party_hitbox_ratio: f64,

    /// Party visual radius interpolation: at full population the radius is
    /// `party_radius_colony_ratio * colony_radius`, at zero population it is
    /// `party_radius_min`.
    pub party_radius_colony_ratio: f64,
    pub party_radius_min: f64,

    /// Ticks between scripted-opponent decision sweeps.
    pub attack_every: u32,

    /// Threshold for the per-colony attack roll during a sweep: a colony
    /// launches when its uniform sample in [0, 1) exceeds this value.
    pub attack_probability: f64,

    /// Upper bound on simultaneously selected colonies.
    pub max_selected: usize,

    /// Starting population of player- and enemy-owned colonies.
    pub initial_player_population: u32,

    /// Starting population of neutral colonies.
    pub initial_neutral_population: u32,

    /// Play field dimensions in world units.
    pub world_width: f64,
    pub world_height: f64,

    /// Width that authored scenario coordinates are expressed in; positions
    /// and radii are scaled by `world_width / reference_width` on load.
    pub reference_width: f64,

    /// Radius of the starting colony each player and enemy receives on a
    /// randomly generated map.
    pub starting_colony_radius: f64,

    /// Radius range for randomly placed neutral colonies.
    pub neutral_radius_min: f64,
    pub neutral_radius_max: f64,

    /// Attempt budget per neutral colony before random placement gives up
    /// with `SetupError::NoRoomForColony`.
    pub placement_attempts: u32,

    /// Per-faction stat bundles, keyed by `FactionId`. The null entry is
    /// optional; the table fills it in.
    pub factions: BTreeMap<FactionId, FactionData>,
}

impl Default for GameConfig {
    fn default() -> Self {
        let mut factions = BTreeMap::new();
        factions.insert(
            FactionId(1),
            FactionData {
                name: "Balanced".to_string(),
                strength: 10,
                defense: 10,
                speed: 2.0,
                reproduction_period: 30,
                color: [139, 0, 0],
                animation: AnimationKind::Spin,
                polygon_sides: 3,
            },
        );
        factions.insert(
            FactionId(2),
            FactionData {
                name: "Swift".to_string(),
                strength: 12,
                defense: 6,
                speed: 3.0,
                reproduction_period: 30,
                color: [0, 139, 0],
                animation: AnimationKind::Spin,
                polygon_sides: 3,
            },
        );
        factions.insert(
            FactionId(3),
            FactionData {
                name: "Fertile".to_string(),
                strength: 8,
                defense: 11,
                speed: 2.0,
                reproduction_period: 20,
                color: [139, 139, 0],
                animation: AnimationKind::Pulse,
                polygon_sides: 5,
            },
        );
        factions.insert(
            FactionId(4),
            FactionData {
                name: "Tank".to_string(),
                strength: 14,
                defense: 14,
                speed: 1.5,
                reproduction_period: 40,
                color: [0, 0, 139],
                animation: AnimationKind::Wobble,
                polygon_sides: 4,
            },
        );

        Self {
            population_limit: 100,
            party_speed_factor: 0.6,
            repulsion_damping: 0.8,
            colony_hitbox_ratio: 5.0 / 6.0,
            party_hitbox_ratio: 0.5,
            party_radius_colony_ratio: 1.7,
            party_radius_min: 20.0,
            attack_every: 300,
            attack_probability: 0.5,
            max_selected: 10,
            initial_player_population: 30,
            initial_neutral_population: 10,
            world_width: 1280.0,
            world_height: 720.0,
            reference_width: 1600.0,
            starting_colony_radius: 100.0,
            neutral_radius_min: 40.0,
            neutral_radius_max: 60.0,
            placement_attempts: 1000,
            factions,
        }
    }
}

impl GameConfig {
    /// Reject configurations whose arithmetic would be partial at runtime.
    /// Called by `SimState::with_config` before any entity exists.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_limit == 0 {
            return Err(ConfigError::ZeroPopulationLimit);
        }
        if self.attack_every == 0 {
            return Err(ConfigError::ZeroAttackInterval);
        }
        // Random placement samples a position in [radius, dim - radius];
        // a scaled radius of half a field dimension empties that interval.
        let scale = self.world_width / self.reference_width;
        if self.neutral_radius_min >= self.neutral_radius_max
            || self.neutral_radius_max * scale * 2.0 >= self.world_width.min(self.world_height)
        {
            return Err(ConfigError::BadNeutralRadiusRange);
        }
        let min_factor = ColonyProfile::min_reproduction_factor();
        for (&id, data) in &self.factions {
            if data.strength == 0 || data.defense == 0 {
                return Err(ConfigError::ZeroCombatStat { faction: id });
            }
            if (data.reproduction_period as f64 * min_factor).floor() < 1.0 {
                return Err(ConfigError::GrowthPeriodTooShort { faction: id });
            }
            if !id.is_null() && data.speed <= 0.0 {
                return Err(ConfigError::ZeroSpeed { faction: id });
            }
        }
        Ok(())
    }
}
