// Simulation events — the observable output of a tick.
//
// `step` returns the events raised while advancing; outer layers (rendering,
// audio, replay capture) react to these rather than diffing state. Events
// are emitted in deterministic order: within one tick, command effects come
// first, then policy launches, then collision outcomes.

use crate::faction::FactionId;
use crate::types::{ColonyId, PartyId};
use serde::{Deserialize, Serialize};

/// One observable state transition, stamped with the tick it happened on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimEvent {
    pub tick: u64,
    pub kind: SimEventKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEventKind {
    /// A party left its source colony.
    PartyLaunched {
        party: PartyId,
        from: ColonyId,
        to: ColonyId,
        faction: FactionId,
        population: u32,
    },
    /// A party reached a colony of its own faction and was absorbed.
    PartyMerged {
        party: PartyId,
        colony: ColonyId,
        population: u32,
    },
    /// A battle ended with the defenders holding the colony.
    ColonyDefended { colony: ColonyId, remaining: u32 },
    /// A battle ended with the attackers taking the colony.
    ColonyConquered {
        colony: ColonyId,
        faction: FactionId,
        population: u32,
    },
    /// A battle wiped out both sides; the colony reverted to no owner.
    ColonyNeutralized { colony: ColonyId },
}
