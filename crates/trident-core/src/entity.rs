//! Owned snapshots of backend objects.
//!
//! The backend hands these out on lookup; the environment never holds a live
//! reference into backend storage. A snapshot can be stale one step later.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::enums::{Domain, Faction};
use crate::types::{EntityHandle, FlagHandle, Position, TargetGroupHandle, WeaponId};

/// Static capability flags of a unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Carries a steerable radar (stealth and sensing actions).
    #[serde(default)]
    pub radar: bool,
    /// Long-range sensing platform.
    #[serde(default)]
    pub long_range_sensor: bool,
    /// Can seize the objective flag.
    #[serde(default)]
    pub capture: bool,
    /// Can receive fuel in flight.
    #[serde(default)]
    pub refuel_receiver: bool,
    /// Can provide fuel to other units.
    #[serde(default)]
    pub refuel_provider: bool,
}

/// A weapon mount as currently loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub id: WeaponId,
    pub name: String,
    pub target_domains: Vec<Domain>,
    pub ammo: u32,
    /// Maximum engagement range in meters.
    pub range: f64,
}

impl Weapon {
    pub fn can_target(&self, domain: Domain) -> bool {
        self.ammo > 0 && self.target_domains.contains(&domain)
    }
}

/// Snapshot of one simulated unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    pub handle: EntityHandle,
    pub name: String,
    pub faction: Faction,
    pub domain: Domain,
    pub alive: bool,
    pub controllable: bool,
    pub position: Position,
    /// Heading in radians (0 = North, clockwise).
    pub heading: f64,
    /// Current speed (m/s).
    pub speed: f64,
    pub max_speed: f64,
    pub capabilities: Capabilities,
    pub weapons: Vec<Weapon>,
    /// Remaining fuel as a fraction of capacity.
    pub fuel_fraction: f64,
    pub radar_enabled: bool,
    pub radar_focus: Option<Position>,
    pub capturing: bool,
    pub engaged_group: Option<TargetGroupHandle>,
}

impl EntityState {
    /// Whether the unit has any weapon with ammunition.
    pub fn can_engage(&self) -> bool {
        self.weapons.iter().any(|w| w.ammo > 0)
    }

    /// Domains reachable by the unit's loaded weapons.
    pub fn target_domains(&self) -> BTreeSet<Domain> {
        self.weapons
            .iter()
            .filter(|w| w.ammo > 0)
            .flat_map(|w| w.target_domains.iter().copied())
            .collect()
    }

    pub fn total_ammo(&self) -> u32 {
        self.weapons.iter().map(|w| w.ammo).sum()
    }

    /// Weapon ids compatible with the given target domain, in mount order.
    pub fn weapons_for(&self, domain: Domain) -> Vec<WeaponId> {
        self.weapons
            .iter()
            .filter(|w| w.can_target(domain))
            .map(|w| w.id)
            .collect()
    }
}

/// Snapshot of a detected adversary group, as seen by one faction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetGroupState {
    pub handle: TargetGroupHandle,
    /// The faction holding this track.
    pub faction: Faction,
    /// The faction of the detected force.
    pub observed_faction: Faction,
    pub domain: Domain,
    pub position: Position,
    pub num_known_alive_units: u32,
}

/// Snapshot of an objective or base flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagState {
    pub handle: FlagHandle,
    pub faction: Faction,
    pub position: Position,
    /// Set once a combatant has completed a capture of this flag.
    pub captured_by: Option<Faction>,
}
