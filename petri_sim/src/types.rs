// Core types shared across the simulation.
//
// Defines the 2D vector (`Vec2`), compact entity identifiers, the colony
// archetype enum, and the setup error taxonomy. All types derive `Serialize`
// and `Deserialize` for config files and state snapshots.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};

// ---------------------------------------------------------------------------
// Spatial types
// ---------------------------------------------------------------------------

/// A point or displacement in the two-dimensional play field.
///
/// Coordinates are in world units; the origin is the top-left corner of the
/// field, X grows right and Y grows down (screen convention).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length.
    pub fn magnitude(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Self) -> f64 {
        (other - self).magnitude()
    }

    /// Component-wise scaling.
    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Clamp the magnitude to at most `max`. Direction is preserved; vectors
    /// already shorter than `max` are returned unchanged.
    pub fn limit(self, max: f64) -> Self {
        let len = self.magnitude();
        if len > max { self.scaled(max / len) } else { self }
    }

    /// Rescale to exactly the given magnitude. The zero vector has no
    /// direction and is returned unchanged.
    pub fn with_magnitude(self, len: f64) -> Self {
        let current = self.magnitude();
        if current == 0.0 {
            self
        } else {
            self.scaled(len / current)
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Entity IDs — compact integers, dispensed by the map container.
// ---------------------------------------------------------------------------

/// Compact identifier for a placed colony.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColonyId(pub u32);

/// Compact identifier for an in-flight party.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PartyId(pub u32);

impl fmt::Display for ColonyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ColonyId({})", self.0)
    }
}

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PartyId({})", self.0)
    }
}

// ---------------------------------------------------------------------------
// Colony archetypes
// ---------------------------------------------------------------------------

/// The five fixed behavioral presets for colonies. Each archetype maps to a
/// `ColonyProfile` of scalar factors (see `config.rs`); the archetype tag is
/// kept on the colony so consumers can query which preset it was built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ColonyArchetype {
    /// All factors 1.0.
    Regular,
    /// Outgoing parties fight at 1.3x strength.
    Strength,
    /// Outgoing parties move at 1.3x speed.
    Speed,
    /// Reproduction period scaled by 0.7 (faster growth).
    Growth,
    /// Defends at 1.3x defense.
    Defense,
}

// ---------------------------------------------------------------------------
// Setup errors
// ---------------------------------------------------------------------------

/// Failures during match setup (map generation, scenario instantiation,
/// faction assignment). The tick loop itself never returns errors; everything
/// fallible happens before the first tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SetupError {
    /// A unique faction was requested but every non-null faction is taken.
    NoFactionAvailable,
    /// Random placement could not fit a colony within the attempt budget.
    NoRoomForColony,
    /// A scenario placement referenced a player or enemy slot that was not
    /// supplied at instantiation time.
    MissingSlot { slot: usize },
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::NoFactionAvailable => {
                write!(f, "no unassigned faction remains to draw from")
            }
            SetupError::NoRoomForColony => {
                write!(f, "could not place a colony without overlap")
            }
            SetupError::MissingSlot { slot } => {
                write!(f, "scenario references missing slot {slot}")
            }
        }
    }
}

impl std::error::Error for SetupError {}
