//! Fundamental geometric types, opaque backend handles and per-faction storage.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::enums::Faction;

/// 3D position in simulation space (meters, Cartesian).
/// x = East, y = North, z = Up (altitude).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Range to another position in meters (3D distance).
    pub fn range_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Horizontal range (ignoring altitude).
    pub fn horizontal_range_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Bearing to another position in radians (0 = North, clockwise).
    pub fn bearing_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx.atan2(dy).rem_euclid(std::f64::consts::TAU)
    }
}

/// Opaque reference to a simulated unit. Stable for the lifetime of the unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityHandle(pub u64);

/// Opaque reference to a detected adversary group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetGroupHandle(pub u64);

/// Opaque reference to an objective or base flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FlagHandle(pub u64);

/// Backend-assigned weapon identifier, unique within a unit's armament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WeaponId(pub u32);

/// One value for each combatant faction.
///
/// Indexing with [`Faction::Neutral`] is a programming error and panics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerFaction<T> {
    pub legacy: T,
    pub dynasty: T,
}

impl<T> PerFaction<T> {
    pub fn new(legacy: T, dynasty: T) -> Self {
        Self { legacy, dynasty }
    }

    /// Build both slots from a function of the faction.
    pub fn from_fn(mut f: impl FnMut(Faction) -> T) -> Self {
        Self {
            legacy: f(Faction::Legacy),
            dynasty: f(Faction::Dynasty),
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(Faction, T) -> U) -> PerFaction<U> {
        PerFaction {
            legacy: f(Faction::Legacy, self.legacy),
            dynasty: f(Faction::Dynasty, self.dynasty),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Faction, &T)> {
        [(Faction::Legacy, &self.legacy), (Faction::Dynasty, &self.dynasty)].into_iter()
    }
}

impl<T> Index<Faction> for PerFaction<T> {
    type Output = T;

    fn index(&self, faction: Faction) -> &T {
        match faction {
            Faction::Legacy => &self.legacy,
            Faction::Dynasty => &self.dynasty,
            Faction::Neutral => panic!("neutral faction has no per-faction slot"),
        }
    }
}

impl<T> IndexMut<Faction> for PerFaction<T> {
    fn index_mut(&mut self, faction: Faction) -> &mut T {
        match faction {
            Faction::Legacy => &mut self.legacy,
            Faction::Dynasty => &mut self.dynasty,
            Faction::Neutral => panic!("neutral faction has no per-faction slot"),
        }
    }
}
