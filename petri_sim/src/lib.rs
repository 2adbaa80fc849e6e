// petri_sim — pure Rust simulation library.
//
// This crate contains all match logic for Petri: colonies, parties, combat,
// steering, scripted opponents, map setup, and the command interface. It has
// zero rendering dependencies and can be tested, benchmarked, and run
// headless.
//
// Module overview:
// - `sim.rs`:      Top-level SimState, tick loop, command application, win detection.
// - `map.rs`:      GameMap — sole owner of placed colonies and in-flight parties.
// - `colony.rs`:   Colony entity — growth, merge/battle resolution, party splitting.
// - `party.rs`:    Party entity — population in transit.
// - `movement.rs`: Steering integration (goal seeking + damped repulsion).
// - `collision.rs`: Broad-phase contact detection + arrival resolution.
// - `policy.rs`:   ScriptedPlayer — the timed attack policy for non-human factions.
// - `scenario.rs`: Authored scenarios + random map generation.
// - `command.rs`:  SimCommand / SimAction — all sim mutations.
// - `event.rs`:    SimEvent — the observable output of a tick.
// - `config.rs`:   GameConfig + ColonyProfile — all tunable parameters.
// - `faction.rs`:  FactionId / FactionData / FactionTable — data-driven faction stats.
// - `prng`:        Re-exported from `petri_prng` — xoshiro256++ PRNG with SplitMix64 seeding.
// - `types.rs`:    Vec2, entity IDs, colony archetypes, setup errors.
//
// **Critical constraint: determinism.** The simulation is a pure function:
// `(state, commands) -> (new_state, events)`. All randomness comes from a
// seeded xoshiro256++ PRNG (re-exported from `petri_prng`). No `HashMap`,
// no system time, no OS entropy. Use `BTreeMap` for ordered collections.

pub mod collision;
pub mod colony;
pub mod command;
pub mod config;
pub mod event;
pub mod faction;
pub mod map;
pub mod movement;
pub mod party;
pub mod policy;
pub use petri_prng as prng;
pub mod scenario;
pub mod sim;
pub mod types;
