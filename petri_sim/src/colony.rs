// Colony entity — stationary population holder with growth and combat.
//
// A colony owns a population count, an owning faction, and the behavioral
// factors of its archetype. It grows one unit at a time on a tick counter,
// absorbs friendly parties, fights hostile ones, and splits off half its
// population as an outgoing party. Colonies are never destroyed during a
// match: population can reach zero, ownership can flip or fall to the null
// faction, but the entity persists spatially.
//
// Battle arithmetic (see `battle`) is deterministic and total for every
// validated config: it divides by net defense and net strength, both of
// which `GameConfig::validate()` guarantees to be non-zero.
//
// See also: `party.rs` for the mobile half, `collision.rs` which calls
// `accept` on arrival, `config.rs` for `ColonyProfile`.

use crate::config::ColonyProfile;
use crate::faction::{FactionData, FactionId, FactionTable};
use crate::party::Party;
use crate::types::ColonyArchetype;
use serde::{Deserialize, Serialize};

/// What happened when a colony accepted an incoming party.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AcceptOutcome {
    /// Same faction — populations merged (capped at the limit).
    Merged,
    /// Battle; the colony held and keeps its owner.
    Defended,
    /// Battle; the party won and the colony changed owner.
    Conquered,
    /// Battle; exact tie — the colony falls to the null faction.
    Annihilated,
}

/// A stationary population holder. Spatial placement (position, radius,
/// hitbox) lives in the map layer; this type is pure game logic.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Colony {
    population: u32,
    owner: FactionId,
    archetype: ColonyArchetype,
    profile: ColonyProfile,
    /// Ticks accumulated toward the next population increment.
    growth_timer: u32,
}

impl Colony {
    pub fn new(owner: FactionId, population: u32, archetype: ColonyArchetype) -> Self {
        Self {
            population,
            owner,
            archetype,
            profile: ColonyProfile::for_archetype(archetype),
            growth_timer: 0,
        }
    }

    pub fn population(&self) -> u32 {
        self.population
    }

    pub fn owner(&self) -> FactionId {
        self.owner
    }

    pub fn archetype(&self) -> ColonyArchetype {
        self.archetype
    }

    pub fn profile(&self) -> &ColonyProfile {
        &self.profile
    }

    /// Administrative mutator used by map setup. Does not touch the growth
    /// timer.
    pub fn set_population(&mut self, population: u32) {
        self.population = population;
    }

    /// Administrative mutator used by map setup.
    pub fn set_owner(&mut self, owner: FactionId) {
        self.owner = owner;
    }

    /// Remove all population. Used when (re)initializing a map.
    pub fn empty(&mut self) {
        self.population = 0;
    }

    /// Advance growth by one tick.
    ///
    /// Reproduction is strictly periodic: one unit every
    /// `floor(reproduction_period * reproduction_factor)` ticks, never
    /// fractionally. A colony at the population limit accumulates nothing.
    pub fn grow(&mut self, owner_stats: &FactionData, limit: u32) {
        if self.population >= limit {
            return;
        }
        self.growth_timer += 1;
        let period = (owner_stats.reproduction_period as f64 * self.profile.reproduction).floor()
            as u32;
        if self.growth_timer / period > 0 {
            self.population += 1;
            self.growth_timer = 0;
        }
    }

    /// Accept an arriving party: merge if it is friendly, battle otherwise.
    /// The party is consumed by the caller either way.
    pub fn accept(
        &mut self,
        party: &mut Party,
        factions: &FactionTable,
        limit: u32,
    ) -> AcceptOutcome {
        if party.faction() == self.owner {
            self.population = (self.population + party.population()).min(limit);
            AcceptOutcome::Merged
        } else {
            self.battle(party, factions)
        }
    }

    /// Deterministic battle resolution.
    ///
    /// Both sides' power is population times their net combat stat; the
    /// difference, floored back through each side's own net stat, is what
    /// survives. Ownership goes to whichever side has more survivors; an
    /// exact tie neutralizes the colony (populations are left at the equal
    /// computed remainder).
    fn battle(&mut self, party: &mut Party, factions: &FactionTable) -> AcceptOutcome {
        let net_defense = factions.stats(self.owner).defense as f64 * self.profile.defense;
        let net_strength =
            factions.stats(party.faction()).strength as f64 * party.strength_factor();

        let colony_power = self.population as f64 * net_defense;
        let party_power = party.population() as f64 * net_strength;
        let diff = colony_power - party_power;

        self.population = (diff / net_defense).floor().max(0.0) as u32;
        party.set_population((-diff / net_strength).floor().max(0.0) as u32);

        if self.population < party.population() {
            self.population = party.population();
            self.owner = party.faction();
            AcceptOutcome::Conquered
        } else if self.population == party.population() {
            self.owner = FactionId::NULL;
            AcceptOutcome::Annihilated
        } else {
            AcceptOutcome::Defended
        }
    }

    /// Split off half the population as an outgoing party.
    ///
    /// The party takes `ceil(population / 2)`, the colony keeps
    /// `floor(population / 2)` — odd populations favor the party by one.
    /// The party inherits the colony's strength and speed factors.
    pub fn split_party(&mut self) -> Party {
        let outgoing = self.population.div_ceil(2);
        self.population /= 2;
        Party::new(self.owner, outgoing, self.profile.strength, self.profile.speed)
    }
}
