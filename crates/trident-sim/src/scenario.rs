//! Trident Island scenario geometry and default force compositions.
//!
//! The map is centred on the island objective. Legacy holds the south-west
//! corner and Dynasty the north-east; each faction's flag marks its base.

use trident_core::backend::{ForceLaydown, UnitSpec, WeaponSpec};
use trident_core::entity::Capabilities;
use trident_core::enums::{Domain, Faction};
use trident_core::types::Position;

/// Distance of each base from the island along both axes (meters).
const BASE_OFFSET: f64 = 90_000.0;

/// Circular spawn area for one faction and domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnZone {
    pub center: Position,
    pub radius: f64,
}

pub fn island_position() -> Position {
    Position::new(0.0, 0.0, 0.0)
}

pub fn base_position(faction: Faction) -> Position {
    match faction {
        Faction::Legacy => Position::new(-BASE_OFFSET, -BASE_OFFSET, 0.0),
        Faction::Dynasty => Position::new(BASE_OFFSET, BASE_OFFSET, 0.0),
        Faction::Neutral => island_position(),
    }
}

/// Where units of a domain are placed at laydown.
pub fn spawn_zone(faction: Faction, domain: Domain) -> SpawnZone {
    let base = base_position(faction);
    // Unit vector from the base toward the island.
    let (ux, uy) = match faction {
        Faction::Legacy => (1.0, 1.0),
        Faction::Dynasty => (-1.0, -1.0),
        Faction::Neutral => (0.0, 0.0),
    };
    let (forward, radius) = match domain {
        Domain::Air => (10_000.0, 15_000.0),
        Domain::Surface => (20_000.0, 10_000.0),
        Domain::Land => (0.0, 5_000.0),
    };
    SpawnZone {
        center: Position::new(base.x + ux * forward, base.y + uy * forward, 0.0),
        radius,
    }
}

/// Default force for either faction. Both sides are symmetric.
pub fn default_laydown(faction: Faction) -> ForceLaydown {
    let mut units = Vec::new();
    for i in 0..4 {
        units.push(fighter(i));
    }
    units.push(UnitSpec {
        name: "AEW-1".into(),
        domain: Domain::Air,
        controllable: true,
        capabilities: Capabilities {
            radar: true,
            long_range_sensor: true,
            refuel_receiver: true,
            ..Capabilities::default()
        },
        weapons: Vec::new(),
        max_speed: 200.0,
        radar_range_km: 200.0,
        endurance_secs: 28_800.0,
    });
    units.push(UnitSpec {
        name: "Tanker-1".into(),
        domain: Domain::Air,
        controllable: true,
        capabilities: Capabilities {
            refuel_provider: true,
            ..Capabilities::default()
        },
        weapons: Vec::new(),
        max_speed: 220.0,
        radar_range_km: 0.0,
        endurance_secs: 36_000.0,
    });
    for i in 0..2 {
        units.push(UnitSpec {
            name: format!("Transport-{}", i + 1),
            domain: Domain::Air,
            controllable: true,
            capabilities: Capabilities {
                capture: true,
                refuel_receiver: true,
                ..Capabilities::default()
            },
            weapons: Vec::new(),
            max_speed: 140.0,
            radar_range_km: 0.0,
            endurance_secs: 14_400.0,
        });
    }
    for i in 0..2 {
        units.push(UnitSpec {
            name: format!("Destroyer-{}", i + 1),
            domain: Domain::Surface,
            controllable: true,
            capabilities: Capabilities {
                radar: true,
                ..Capabilities::default()
            },
            weapons: vec![
                weapon("SAM", &[Domain::Air], 8, 80.0),
                weapon("ASM", &[Domain::Surface], 4, 120.0),
            ],
            max_speed: 15.0,
            radar_range_km: 120.0,
            endurance_secs: 0.0,
        });
    }
    units.push(UnitSpec {
        name: "SAM-Site-1".into(),
        domain: Domain::Land,
        controllable: true,
        capabilities: Capabilities {
            radar: true,
            ..Capabilities::default()
        },
        weapons: vec![weapon("SAM", &[Domain::Air], 6, 100.0)],
        max_speed: 0.0,
        radar_range_km: 100.0,
        endurance_secs: 0.0,
    });
    units.push(UnitSpec {
        name: "Carrier".into(),
        domain: Domain::Surface,
        controllable: false,
        capabilities: Capabilities::default(),
        weapons: Vec::new(),
        max_speed: 15.0,
        radar_range_km: 0.0,
        endurance_secs: 0.0,
    });
    ForceLaydown { faction, units }
}

fn fighter(index: usize) -> UnitSpec {
    UnitSpec {
        name: format!("Fighter-{}", index + 1),
        domain: Domain::Air,
        controllable: true,
        capabilities: Capabilities {
            radar: true,
            refuel_receiver: true,
            ..Capabilities::default()
        },
        weapons: vec![
            weapon("AAM-Long", &[Domain::Air], 2, 100.0),
            weapon("AAM-Short", &[Domain::Air], 2, 30.0),
            weapon("ASM-Light", &[Domain::Surface, Domain::Land], 2, 60.0),
        ],
        max_speed: 300.0,
        radar_range_km: 80.0,
        endurance_secs: 10_800.0,
    }
}

fn weapon(name: &str, targets: &[Domain], ammo: u32, range_km: f64) -> WeaponSpec {
    WeaponSpec {
        name: name.to_string(),
        target_domains: targets.to_vec(),
        ammo,
        range_km,
    }
}
