// Party entity — population in transit between colonies.
//
// A party is a pure data holder: population, a faction fixed at creation
// (parties never change allegiance mid-flight), and the strength/speed
// factors inherited from the colony that launched it. Spatial state —
// position, velocity, repulsion, destination — lives in the map layer
// (`InFlightParty` in `map.rs`); movement is applied externally by
// `movement.rs`.

use crate::faction::{FactionData, FactionId};
use serde::{Deserialize, Serialize};

/// A mobile population unit. Created by `Colony::split_party`, consumed by
/// `Colony::accept` on arrival.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Party {
    population: u32,
    faction: FactionId,
    strength_factor: f64,
    speed_factor: f64,
}

impl Party {
    pub fn new(faction: FactionId, population: u32, strength_factor: f64, speed_factor: f64) -> Self {
        Self {
            population,
            faction,
            strength_factor,
            speed_factor,
        }
    }

    pub fn population(&self) -> u32 {
        self.population
    }

    pub fn set_population(&mut self, population: u32) {
        self.population = population;
    }

    pub fn faction(&self) -> FactionId {
        self.faction
    }

    pub fn strength_factor(&self) -> f64 {
        self.strength_factor
    }

    pub fn speed_factor(&self) -> f64 {
        self.speed_factor
    }

    /// Base max speed: faction speed times the spawning colony's speed
    /// factor. The map applies the global pacing factor on top at launch.
    pub fn max_speed(&self, stats: &FactionData) -> f64 {
        stats.speed * self.speed_factor
    }
}
