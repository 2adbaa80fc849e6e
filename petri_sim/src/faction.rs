// Faction data — data-driven stat bundles shared by colonies and parties.
//
// All behavioral differences between factions are expressed as data in
// `FactionData`, keyed by `FactionId` in the game config. Colonies and
// parties never hold copies of the stats; they store the id and look the
// record up in the `FactionTable`, which is the sole owner of the canonical
// records. Two factions are the same iff their ids are equal — stats are
// never compared.
//
// `FactionId::NULL` is the distinguished "unclaimed" faction: neutral
// colonies are owned by it, and a battle that ends in an exact tie hands the
// colony to it. The table always contains a record for it.
//
// See also: `config.rs` where the faction map lives, `colony.rs` and
// `party.rs` which consume this data, `sim.rs` for win detection which
// relies on id equality.

use crate::types::SetupError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identity of a faction. Equality of factions is equality of ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FactionId(pub u16);

impl FactionId {
    /// The distinguished "unclaimed" faction. Distinct from every real
    /// faction; owns neutral colonies and battle-tie remainders.
    pub const NULL: FactionId = FactionId(0);

    pub fn is_null(self) -> bool {
        self == Self::NULL
    }
}

impl fmt::Display for FactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FactionId({})", self.0)
    }
}

/// How a faction's parties are animated. Consumed only by rendering; the
/// sim stores and serializes it untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationKind {
    Spin,
    Pulse,
    Wobble,
}

/// Data-driven behavioral and visual parameters for one faction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FactionData {
    /// Display name.
    pub name: String,

    /// Combat power multiplier for attacking parties.
    pub strength: u32,

    /// Combat power multiplier for defending colonies.
    pub defense: u32,

    /// Base movement rate of this faction's parties, in world units per tick.
    pub speed: f64,

    /// Ticks required for a colony of this faction to add one population
    /// unit (before the colony's reproduction factor is applied).
    pub reproduction_period: u32,

    /// Visual identity — passed through to the rendering layer untouched.
    pub color: [u8; 3],
    pub animation: AnimationKind,
    pub polygon_sides: u32,
}

/// Registry of canonical faction records, built from config at match setup.
///
/// Always contains a record for `FactionId::NULL`; a missing null entry is
/// filled in with `FactionTable::null_faction()`.
#[derive(Clone, Debug, Default)]
pub struct FactionTable {
    factions: BTreeMap<FactionId, FactionData>,
}

impl FactionTable {
    pub fn new(mut factions: BTreeMap<FactionId, FactionData>) -> Self {
        factions
            .entry(FactionId::NULL)
            .or_insert_with(Self::null_faction);
        Self { factions }
    }

    /// The record backing `FactionId::NULL`. Neutral colonies fight at full
    /// combat stats — conquering one costs the attacker real population —
    /// but reproduce an order of magnitude slower than any real faction.
    pub fn null_faction() -> FactionData {
        FactionData {
            name: "unclaimed".to_string(),
            strength: 10,
            defense: 10,
            speed: 2.0,
            reproduction_period: 180,
            color: [0, 0, 0],
            animation: AnimationKind::Spin,
            polygon_sides: 3,
        }
    }

    /// Look up a faction's stats. Panics on an unknown id — colonies and
    /// parties only ever carry ids that came from this table, and the config
    /// is validated before the table is built.
    pub fn stats(&self, id: FactionId) -> &FactionData {
        &self.factions[&id]
    }

    pub fn contains(&self, id: FactionId) -> bool {
        self.factions.contains_key(&id)
    }

    /// All ids in the table, null included, in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = FactionId> + '_ {
        self.factions.keys().copied()
    }

    /// Ids of the real (non-null) factions, in ascending order.
    pub fn playable_ids(&self) -> impl Iterator<Item = FactionId> + '_ {
        self.ids().filter(|id| !id.is_null())
    }

    /// Draw a uniformly random faction that is not null and not in `taken`.
    ///
    /// Used at setup to give each scripted opponent a distinct faction.
    /// Returns `SetupError::NoFactionAvailable` when every playable faction
    /// is already assigned, so the surrounding setup can abort generation.
    pub fn draw_unique(
        &self,
        taken: &[FactionId],
        rng: &mut petri_prng::SimRng,
    ) -> Result<FactionId, SetupError> {
        let available: Vec<FactionId> = self
            .playable_ids()
            .filter(|id| !taken.contains(id))
            .collect();
        if available.is_empty() {
            return Err(SetupError::NoFactionAvailable);
        }
        Ok(available[rng.range_usize(0, available.len())])
    }
}
