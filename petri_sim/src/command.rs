// Commands — the sole input channel into the simulation.
//
// Outer layers (local input, network transport, replay playback) all reduce
// to a stream of `SimCommand`s handed to `SimState::step`. A command names
// the faction issuing it; the sim validates ownership at application time,
// so a stale or hostile command degrades to a no-op instead of corrupting
// state.
//
// **Critical constraint: determinism.** Identical command streams applied to
// identical states must produce identical results, so commands carry the
// tick they are scheduled for and the sim applies them in (tick, issue
// order) sequence.

use crate::faction::FactionId;
use crate::types::ColonyId;
use serde::{Deserialize, Serialize};

/// A scheduled instruction from one faction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimCommand {
    /// The faction on whose behalf the action runs. Ownership checks are
    /// made against this, not against any outer notion of "the player".
    pub faction: FactionId,
    /// Earliest tick the command may apply on. Commands scheduled for past
    /// ticks apply immediately on the next tick processed.
    pub tick: u64,
    pub action: SimAction,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimAction {
    /// Split half of `from`'s population into a party bound for `to`.
    /// Requires the issuing faction to own `from`.
    LaunchParty { from: ColonyId, to: ColonyId },
    /// Add a colony to the issuing faction's selection set.
    SelectColony { colony: ColonyId },
    /// Launch a party from every selected colony toward `target`, then
    /// clear the selection.
    SendSelectedTo { target: ColonyId },
    /// Drop the selection without launching anything.
    ClearSelection,
    /// Debug/editor: reassign a colony's owner. Unknown factions are a
    /// no-op.
    SetFaction { colony: ColonyId, faction: FactionId },
    /// Debug/editor: overwrite a colony's population.
    SetPopulation { colony: ColonyId, population: u32 },
    /// Debug/editor: zero a colony's population and drop its owner.
    EmptyColony { colony: ColonyId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_roundtrip_through_json() {
        let commands = vec![
            SimCommand {
                faction: FactionId(1),
                tick: 42,
                action: SimAction::LaunchParty {
                    from: ColonyId(0),
                    to: ColonyId(3),
                },
            },
            SimCommand {
                faction: FactionId(2),
                tick: 42,
                action: SimAction::SendSelectedTo {
                    target: ColonyId(1),
                },
            },
            SimCommand {
                faction: FactionId(1),
                tick: 43,
                action: SimAction::ClearSelection,
            },
        ];
        let encoded = serde_json::to_string(&commands).unwrap();
        let decoded: Vec<SimCommand> = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, commands);
    }
}
