//! Gophers and the food they live on.
//!
//! - [`GopherId`]: unique, never reused within a world
//! - [`Gopher`]: identity, position and vitals of one agent
//! - [`LifeState`]: what the gopher decided to do this tick
//! - [`GopherFlags`]: derived vitals (mature, hungry, decayed)
//! - [`FoodItem`]: a tile's worth of nutrition
//!
//! A gopher's position is owned by the world: it only changes when a move or
//! eat action is applied, so a decision always sees the tile the grid agrees
//! with.
//!
//! # Example
//!
//! ```
//! use burrow::Coord;
//! use gopherlife_core::entity::{Gender, Gopher, GopherId, LifeState};
//!
//! let gopher = Gopher::new(GopherId::new(7), "Pip", Gender::Female, Coord::new(3, 4), 40);
//!
//! assert_eq!(gopher.id().as_u64(), 7);
//! assert_eq!(gopher.position(), Coord::new(3, 4));
//! assert_eq!(gopher.state, LifeState::Searching);
//! assert!(!gopher.is_decayed());
//! ```

pub mod food;

use std::fmt;

use bitflags::bitflags;
use burrow::Coord;
use serde::{Deserialize, Serialize};

use crate::settings::GopherSettings;

pub use food::FoodItem;

/// Unique identifier for a gopher.
///
/// Ordered by numeric value; ids grow with spawn order.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GopherId(u64);

impl GopherId {
    /// Creates a new `GopherId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for GopherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GopherId({})", self.0)
    }
}

impl fmt::Display for GopherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for GopherId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Gender, fixed at birth.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Male gopher
    Male,
    /// Female gopher
    Female,
}

impl Gender {
    /// Pick a gender with even odds.
    pub fn random(rng: &mut impl rand::Rng) -> Self {
        if rng.gen_bool(0.5) {
            Self::Female
        } else {
            Self::Male
        }
    }
}

/// What a gopher is doing.
///
/// `Decayed` is terminal: a decayed gopher only waits for its removal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LifeState {
    /// Looking for food, nothing in range
    #[default]
    Searching,
    /// Stepping towards a food tile
    MovingTowardFood,
    /// Eating an adjacent food tile
    Eating,
    /// Holding position, ready to parent the next birth
    Mating,
    /// Fed and wandering
    Idle,
    /// Dead, awaiting removal
    Decayed,
}

impl fmt::Display for LifeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Searching => write!(f, "Searching"),
            Self::MovingTowardFood => write!(f, "MovingTowardFood"),
            Self::Eating => write!(f, "Eating"),
            Self::Mating => write!(f, "Mating"),
            Self::Idle => write!(f, "Idle"),
            Self::Decayed => write!(f, "Decayed"),
        }
    }
}

bitflags! {
    /// Vitals derived from age and energy.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct GopherFlags: u8 {
        /// Old enough to parent a birth.
        const MATURE = 1 << 0;
        /// Energy below the hunger threshold.
        const HUNGRY = 1 << 1;
        /// Dead. Never cleared.
        const DECAYED = 1 << 2;
    }
}

/// One gopher.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gopher {
    id: GopherId,
    /// Display name
    pub name: String,
    /// Gender
    pub gender: Gender,
    position: Coord,
    /// Ticks lived
    pub age: u32,
    /// Remaining energy; zero is death
    pub energy: u32,
    /// Derived vitals
    pub flags: GopherFlags,
    /// Current activity
    pub state: LifeState,
    /// Food tile the gopher last headed for
    pub target: Option<Coord>,
}

impl Gopher {
    /// Create a newborn gopher at `position`.
    #[must_use]
    pub fn new(
        id: GopherId,
        name: impl Into<String>,
        gender: Gender,
        position: Coord,
        energy: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            gender,
            position,
            age: 0,
            energy,
            flags: GopherFlags::empty(),
            state: LifeState::Searching,
            target: None,
        }
    }

    /// The gopher's id.
    #[must_use]
    pub fn id(&self) -> GopherId {
        self.id
    }

    /// Tile the gopher stands on.
    #[must_use]
    pub fn position(&self) -> Coord {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Coord) {
        self.position = position;
    }

    /// True once the gopher has died.
    #[must_use]
    pub fn is_decayed(&self) -> bool {
        self.flags.contains(GopherFlags::DECAYED)
    }

    /// True if old enough to parent.
    #[must_use]
    pub fn is_mature(&self) -> bool {
        self.flags.contains(GopherFlags::MATURE)
    }

    /// True if below the hunger threshold.
    #[must_use]
    pub fn is_hungry(&self) -> bool {
        self.flags.contains(GopherFlags::HUNGRY)
    }

    /// Mark the gopher dead.
    pub fn decay(&mut self) {
        self.flags.insert(GopherFlags::DECAYED);
        self.state = LifeState::Decayed;
        self.target = None;
    }

    /// Age one tick and burn one unit of energy.
    ///
    /// Returns `true` if the gopher died of it: out of energy or past its
    /// lifespan.
    pub fn live_one_tick(&mut self, vitals: &GopherSettings) -> bool {
        if self.is_decayed() {
            return true;
        }
        self.age = self.age.saturating_add(1);
        self.energy = self.energy.saturating_sub(1);
        self.refresh_flags(vitals);

        if self.energy == 0 || self.age > vitals.lifespan {
            self.decay();
            return true;
        }
        false
    }

    /// Gain `nutrition` energy, capped at the maximum.
    pub fn eat(&mut self, food: FoodItem, vitals: &GopherSettings) {
        self.energy = self
            .energy
            .saturating_add(food.nutrition)
            .min(vitals.max_energy);
        self.state = LifeState::Eating;
        self.target = None;
        self.refresh_flags(vitals);
    }

    /// True if mature and energetic enough to parent a birth.
    #[must_use]
    pub fn ready_to_mate(&self, vitals: &GopherSettings) -> bool {
        self.is_mature() && !self.is_decayed() && self.energy >= vitals.mating_energy
    }

    /// Pay for a birth and stop mating.
    pub fn give_birth(&mut self, vitals: &GopherSettings) {
        self.energy = self.energy.saturating_sub(vitals.birth_cost);
        self.state = LifeState::Idle;
        self.refresh_flags(vitals);
        if self.energy == 0 {
            self.decay();
        }
    }

    fn refresh_flags(&mut self, vitals: &GopherSettings) {
        self.flags
            .set(GopherFlags::MATURE, self.age >= vitals.maturity_age);
        self.flags
            .set(GopherFlags::HUNGRY, self.energy < vitals.hunger_threshold);
    }
}
