//! Entity spawn factories for setting up the sandbox world.
//!
//! Places flags and forces with appropriate component bundles. Unit
//! positions are drawn uniformly from the per-domain spawn zone, and air
//! units start on a randomly oriented combat air patrol.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use trident_core::backend::{ForceLaydown, UnitSpec};
use trident_core::entity::Weapon;
use trident_core::enums::{Domain, Faction};
use trident_core::types::{Position, WeaponId};

use crate::components::*;
use crate::constants::*;
use crate::scenario;
use crate::systems::orders::racetrack_waypoints;

/// Spawn the island flag and one base flag per combatant.
pub fn spawn_flags(world: &mut World) -> Vec<Entity> {
    let mut flags = vec![world.spawn((
        Flag {
            faction: Faction::Neutral,
            captured_by: None,
        },
        scenario::island_position(),
    ))];
    for faction in Faction::COMBATANTS {
        flags.push(world.spawn((
            Flag {
                faction,
                captured_by: None,
            },
            scenario::base_position(faction),
        )));
    }
    flags
}

/// Spawn every unit of a laydown, returning the new entities in order.
pub fn spawn_force(world: &mut World, rng: &mut ChaCha8Rng, laydown: &ForceLaydown) -> Vec<Entity> {
    laydown
        .units
        .iter()
        .map(|spec| spawn_unit(world, rng, laydown.faction, spec))
        .collect()
}

/// Spawn one unit at a random location in its domain's spawn zone.
pub fn spawn_unit(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    faction: Faction,
    spec: &UnitSpec,
) -> Entity {
    let zone = scenario::spawn_zone(faction, spec.domain);
    let bearing = rng.gen_range(0.0..std::f64::consts::TAU);
    let dist = zone.radius * rng.gen_range(0.0_f64..1.0).sqrt();
    let altitude = match spec.domain {
        Domain::Air => rng.gen_range(AIR_MIN_ALTITUDE..AIR_MAX_ALTITUDE),
        Domain::Surface | Domain::Land => 0.0,
    };
    let position = Position::new(
        zone.center.x + dist * bearing.sin(),
        zone.center.y + dist * bearing.cos(),
        altitude,
    );

    let orders = if spec.domain == Domain::Air && spec.max_speed > 0.0 {
        let long = rng.gen_range(INITIAL_PATROL_MIN_AXIS..INITIAL_PATROL_MAX_AXIS);
        let short = INITIAL_PATROL_MIN_AXIS.min(long);
        let angle = rng.gen_range(0.0..std::f64::consts::PI);
        Orders::Patrol {
            waypoints: racetrack_waypoints(&position, long, short, angle),
            next: 0,
        }
    } else {
        Orders::Idle
    };

    let weapons = spec
        .weapons
        .iter()
        .enumerate()
        .map(|(i, w)| Weapon {
            id: WeaponId(i as u32),
            name: w.name.clone(),
            target_domains: w.target_domains.clone(),
            ammo: w.ammo,
            range: w.range_km * 1000.0,
        })
        .collect();

    let entity = world.spawn((
        Unit {
            name: spec.name.clone(),
            faction,
            domain: spec.domain,
            controllable: spec.controllable,
            capabilities: spec.capabilities,
        },
        position,
        Motion {
            heading: 0.0,
            speed: 0.0,
            max_speed: spec.max_speed,
        },
        Status::default(),
        orders,
        Armament { weapons },
    ));

    if spec.capabilities.radar || spec.radar_range_km > 0.0 {
        let _ = world.insert_one(
            entity,
            Radar {
                range: spec.radar_range_km * 1000.0,
                strength: 1.0,
                focus: None,
            },
        );
    }
    if spec.domain == Domain::Air && spec.endurance_secs > 0.0 {
        let _ = world.insert_one(
            entity,
            FuelTank {
                fuel: spec.endurance_secs,
                capacity: spec.endurance_secs,
            },
        );
    }
    entity
}
