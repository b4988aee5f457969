//! ECS components for the sandbox world.
//!
//! Units carry `Unit`, `Position`, `Motion`, `Status` and `Orders`, plus
//! optional `Radar`, `Armament` and `FuelTank`. Flags and contact groups are
//! separate entities with their own marker components.

use hecs::Entity;

use trident_core::entity::{Capabilities, Weapon};
use trident_core::enums::{Domain, EngagementPosture, Faction, WeaponUsage};
use trident_core::types::{Position, WeaponId};

/// Identity and static capabilities of a unit.
#[derive(Debug, Clone)]
pub struct Unit {
    pub name: String,
    pub faction: Faction,
    pub domain: Domain,
    pub controllable: bool,
    pub capabilities: Capabilities,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Motion {
    /// Radians (0 = North, clockwise).
    pub heading: f64,
    /// m/s.
    pub speed: f64,
    pub max_speed: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct Status {
    pub alive: bool,
    pub died_at_frame: Option<u64>,
    pub capturing: bool,
}

impl Default for Status {
    fn default() -> Self {
        Self {
            alive: true,
            died_at_frame: None,
            capturing: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Radar {
    /// Nominal detection range in meters.
    pub range: f64,
    /// Emitter strength in [0, 1]. Zero is silent.
    pub strength: f64,
    pub focus: Option<Position>,
}

impl Radar {
    pub fn emitting(&self) -> bool {
        self.strength > 0.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct Armament {
    pub weapons: Vec<Weapon>,
}

impl Armament {
    pub fn get_mut(&mut self, id: WeaponId) -> Option<&mut Weapon> {
        self.weapons.iter_mut().find(|w| w.id == id)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FuelTank {
    /// Remaining endurance in seconds at full throttle.
    pub fuel: f64,
    pub capacity: f64,
}

impl FuelTank {
    pub fn fraction(&self) -> f64 {
        if self.capacity <= 0.0 {
            return 1.0;
        }
        (self.fuel / self.capacity).clamp(0.0, 1.0)
    }
}

/// Current tasking of a unit.
#[derive(Debug, Clone, Default)]
pub enum Orders {
    #[default]
    Idle,
    Patrol {
        waypoints: Vec<Position>,
        next: usize,
    },
    Engage {
        group: Entity,
        weapons: Vec<WeaponId>,
        usage: WeaponUsage,
        posture: EngagementPosture,
        throttle: f64,
        wez_scale: f64,
    },
    Capture {
        flag: Entity,
    },
    ReturnToBase {
        flag: Entity,
    },
    Refuel {
        provider: Entity,
    },
}

/// Objective or base flag.
#[derive(Debug, Clone, Copy)]
pub struct Flag {
    pub faction: Faction,
    pub captured_by: Option<Faction>,
}

/// One faction's track on one adversary unit.
#[derive(Debug, Clone, Copy)]
pub struct ContactGroup {
    pub observer: Faction,
    pub observed_faction: Faction,
    pub domain: Domain,
    pub member: Entity,
}
