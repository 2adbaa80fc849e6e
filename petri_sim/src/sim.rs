// The simulation core — tick loop, command application, win detection.
//
// `SimState` is the complete authoritative state of one match: tick counter,
// seeded rng, config, faction table, map, scripted opponents, and the
// player's selection set. `step` advances the state to a target tick,
// applying scheduled commands along the way, and returns the events raised.
//
// Per-tick order is fixed: reset repulsion, apply due commands, run the
// scripted policies, resolve collisions, grow colonies, move parties.
// Collision runs before movement so that repulsion accumulated from this
// tick's overlaps steers this tick's motion.
//
// **Critical constraint: determinism.** Given the same seed, config, and
// command sequence, two `SimState`s evolve identically. Everything iterated
// per tick lives in `BTreeMap`s, every random draw goes through the owned
// `SimRng`, and commands apply in (tick, issue order) sequence. No wall
// clock, no thread timing, no hash-order iteration anywhere in this loop.
//
// See also: `collision.rs` for arrival resolution, `policy.rs` for the
// scripted opponents, `scenario.rs` for match setup.

use crate::collision::{self, BroadPhase, PairScan};
use crate::command::{SimAction, SimCommand};
use crate::config::{ConfigError, GameConfig};
use crate::event::{SimEvent, SimEventKind};
use crate::faction::{FactionId, FactionTable};
use crate::map::GameMap;
use crate::movement;
use crate::policy::ScriptedPlayer;
use crate::scenario::{self, MapScenario};
use crate::types::{ColonyId, SetupError};
use petri_prng::SimRng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Everything `step` produced while advancing.
#[derive(Clone, Debug, Default)]
pub struct StepResult {
    pub events: Vec<SimEvent>,
}

/// Authoritative state of one match.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimState {
    tick: u64,
    rng: SimRng,
    config: GameConfig,
    /// Derived from `config.factions`; rebuilt on deserialization rather
    /// than stored twice.
    #[serde(skip)]
    factions: FactionTable,
    map: GameMap,
    players: Vec<ScriptedPlayer>,
    selection: SmallVec<[ColonyId; 8]>,
}

impl SimState {
    /// A match with the default config. The default config is known-valid,
    /// so this cannot fail.
    pub fn new(seed: u64) -> Self {
        Self::build(seed, GameConfig::default())
    }

    /// A match with a custom config. Validation runs up front so the tick
    /// loop never divides by a zero stat.
    pub fn with_config(seed: u64, config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(seed, config))
    }

    fn build(seed: u64, config: GameConfig) -> Self {
        let factions = FactionTable::new(config.factions.clone());
        let map = GameMap::new(config.world_width, config.world_height);
        Self {
            tick: 0,
            rng: SimRng::new(seed),
            config,
            factions,
            map,
            players: Vec::new(),
            selection: SmallVec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn factions(&self) -> &FactionTable {
        &self.factions
    }

    pub fn map(&self) -> &GameMap {
        &self.map
    }

    /// Mutable map access for editor/setup layers. Not used by the tick
    /// loop itself.
    pub fn map_mut(&mut self) -> &mut GameMap {
        &mut self.map
    }

    pub fn players(&self) -> &[ScriptedPlayer] {
        &self.players
    }

    pub fn selection(&self) -> &[ColonyId] {
        &self.selection
    }

    // -----------------------------------------------------------------------
    // Match setup
    // -----------------------------------------------------------------------

    /// Realize an authored scenario, binding player and enemy slots to the
    /// given factions. Enemy factions get scripted controllers.
    pub fn load_scenario(
        &mut self,
        scenario: &MapScenario,
        players: &[FactionId],
        enemies: &[FactionId],
    ) -> Result<(), SetupError> {
        scenario.instantiate(&mut self.map, &self.config, players, enemies)?;
        self.players = enemies.iter().map(|&f| ScriptedPlayer::new(f)).collect();
        self.selection.clear();
        Ok(())
    }

    /// Generate a random free-for-all map. Enemy factions are drawn without
    /// repeats from the table and get scripted controllers.
    pub fn generate_random_match(
        &mut self,
        player_faction: FactionId,
        n_enemies: usize,
        n_neutral: usize,
    ) -> Result<(), SetupError> {
        self.players = scenario::generate_random(
            &mut self.map,
            &mut self.rng,
            &self.config,
            &self.factions,
            player_faction,
            n_enemies,
            n_neutral,
        )?;
        self.selection.clear();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Tick loop
    // -----------------------------------------------------------------------

    /// Advance the simulation to `target_tick`, applying each command on the
    /// first processed tick at or after its scheduled tick.
    ///
    /// Commands may arrive unsorted; they are applied in (tick, issue order)
    /// sequence. Advancing to a tick at or before the current one is a no-op.
    pub fn step(&mut self, commands: &[SimCommand], target_tick: u64) -> StepResult {
        let mut pending: Vec<&SimCommand> = commands.iter().collect();
        pending.sort_by_key(|cmd| cmd.tick);
        let mut next = 0;

        let mut events = Vec::new();
        while self.tick < target_tick {
            self.tick += 1;
            self.map.reset_repulsion();

            while next < pending.len() && pending[next].tick <= self.tick {
                self.apply_command(pending[next], &mut events);
                next += 1;
            }

            self.run_policies(&mut events);

            let contacts = PairScan.contacts(&self.map);
            collision::resolve(
                &mut self.map,
                &contacts,
                &self.factions,
                self.config.population_limit,
                self.tick,
                &mut events,
            );

            self.grow_colonies();
            movement::advance(&mut self.map, &self.config);
        }
        StepResult { events }
    }

    fn apply_command(&mut self, cmd: &SimCommand, events: &mut Vec<SimEvent>) {
        match cmd.action {
            SimAction::LaunchParty { from, to } => {
                if self.owner_of(from) == Some(cmd.faction) {
                    self.launch(from, to, events);
                }
            }
            SimAction::SelectColony { colony } => self.select_colony(cmd.faction, colony),
            SimAction::SendSelectedTo { target } => {
                self.send_selected_to(cmd.faction, target, events);
            }
            SimAction::ClearSelection => self.selection.clear(),
            SimAction::SetFaction { colony, faction } => {
                // Unknown factions would poison every later stats lookup.
                if self.factions.contains(faction) {
                    if let Some(placed) = self.map.colony_mut(colony) {
                        placed.colony.set_owner(faction);
                    }
                }
            }
            SimAction::SetPopulation { colony, population } => {
                if let Some(placed) = self.map.colony_mut(colony) {
                    placed.colony.set_population(population);
                }
            }
            SimAction::EmptyColony { colony } => {
                if let Some(placed) = self.map.colony_mut(colony) {
                    placed.colony.empty();
                    placed.colony.set_owner(FactionId::NULL);
                }
            }
        }
    }

    fn run_policies(&mut self, events: &mut Vec<SimEvent>) {
        let mut orders = Vec::new();
        for player in self.players.iter_mut() {
            orders.extend(player.decide(&self.map, &mut self.rng, &self.config));
        }
        for (from, to) in orders {
            self.launch(from, to, events);
        }
    }

    fn grow_colonies(&mut self) {
        let limit = self.config.population_limit;
        let factions = &self.factions;
        for (_, placed) in self.map.colonies_mut() {
            let stats = factions.stats(placed.colony.owner());
            placed.colony.grow(stats, limit);
        }
    }

    fn launch(&mut self, from: ColonyId, to: ColonyId, events: &mut Vec<SimEvent>) {
        if let Some(id) = self.map.launch_party(from, to, &self.factions, &self.config)
            && let Some(body) = self.map.party(id)
        {
            events.push(SimEvent {
                tick: self.tick,
                kind: SimEventKind::PartyLaunched {
                    party: id,
                    from,
                    to,
                    faction: body.party.faction(),
                    population: body.party.population(),
                },
            });
        }
    }

    fn select_colony(&mut self, faction: FactionId, colony: ColonyId) {
        if self.selection.len() >= self.config.max_selected
            || self.selection.contains(&colony)
            || self.owner_of(colony) != Some(faction)
        {
            return;
        }
        self.selection.push(colony);
    }

    /// Launch from every selected colony the faction still owns, then drop
    /// the selection. The target itself is skipped if selected; ownership is
    /// re-checked because it can flip between select and send.
    fn send_selected_to(
        &mut self,
        faction: FactionId,
        target: ColonyId,
        events: &mut Vec<SimEvent>,
    ) {
        let selected: SmallVec<[ColonyId; 8]> = std::mem::take(&mut self.selection);
        for from in selected {
            if from != target && self.owner_of(from) == Some(faction) {
                self.launch(from, target, events);
            }
        }
    }

    fn owner_of(&self, colony: ColonyId) -> Option<FactionId> {
        self.map.colony(colony).map(|placed| placed.colony.owner())
    }

    // -----------------------------------------------------------------------
    // Win detection
    // -----------------------------------------------------------------------

    /// The winning faction, if the match is decided.
    ///
    /// A faction wins when every colony it does not own is null-owned and no
    /// party of another real faction is in flight — null population is a
    /// wildcard, never a winner. A field holding nothing but null colonies
    /// is undecided (nobody is left to win).
    pub fn winner(&self) -> Option<FactionId> {
        let mut candidate = FactionId::NULL;
        for (_, placed) in self.map.colonies() {
            let owner = placed.colony.owner();
            if owner.is_null() {
                continue;
            }
            if candidate.is_null() {
                candidate = owner;
            } else if candidate != owner {
                return None;
            }
        }
        for (_, body) in self.map.parties() {
            let faction = body.party.faction();
            if faction.is_null() {
                continue;
            }
            if candidate.is_null() {
                candidate = faction;
            } else if candidate != faction {
                return None;
            }
        }
        if candidate.is_null() { None } else { Some(candidate) }
    }

    // -----------------------------------------------------------------------
    // Snapshots
    // -----------------------------------------------------------------------

    /// Serialize the full match state to JSON. Floats round-trip
    /// bit-exactly, so a restored state replays identically.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Restore a match from a JSON snapshot. The faction table is derived
    /// state and is rebuilt from the snapshot's config.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut state: SimState = serde_json::from_str(json)?;
        state.factions = FactionTable::new(state.config.factions.clone());
        Ok(state)
    }
}
