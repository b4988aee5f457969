//! Movement system: steers air units toward their order's destination.
//!
//! Surface and land units hold position. Headings follow the core
//! convention (0 = North, clockwise).

use std::collections::HashMap;

use glam::DVec2;
use hecs::{Entity, World};

use trident_core::enums::Domain;
use trident_core::types::Position;

use crate::components::{Armament, Motion, Orders, Status, Unit};
use crate::constants::{ENGAGE_STANDOFF_FRACTION, PATROL_THROTTLE};

/// Destination for one unit this tick.
#[derive(Debug, Clone, Copy)]
struct Leg {
    target: Position,
    throttle: f64,
    /// Stop this far short of the target (meters).
    standoff: f64,
}

pub fn run(world: &mut World, dt: f64) {
    let legs = plan_legs(world);

    for (entity, (unit, pos, motion, status, orders)) in
        world.query_mut::<(&Unit, &mut Position, &mut Motion, &Status, &mut Orders)>()
    {
        if !status.alive || unit.domain != Domain::Air {
            motion.speed = 0.0;
            continue;
        }
        match orders {
            Orders::Idle => motion.speed = 0.0,
            Orders::Patrol { waypoints, next } => {
                if waypoints.is_empty() {
                    motion.speed = 0.0;
                    continue;
                }
                let waypoint = waypoints[*next % waypoints.len()];
                let speed = motion.max_speed * PATROL_THROTTLE;
                if advance(pos, motion, &waypoint, speed, dt, 0.0) {
                    *next = (*next + 1) % waypoints.len();
                }
            }
            _ => match legs.get(&entity) {
                Some(leg) => {
                    let speed = motion.max_speed * leg.throttle.clamp(0.0, 1.0);
                    advance(pos, motion, &leg.target, speed, dt, leg.standoff);
                }
                None => motion.speed = 0.0,
            },
        }
    }
}

/// Resolve order targets that live on other entities.
fn plan_legs(world: &World) -> HashMap<Entity, Leg> {
    let mut legs = HashMap::new();
    let mut query = world.query::<(&Orders, &Armament)>();
    for (entity, (orders, armament)) in query.iter() {
        let (target, throttle, standoff) = match orders {
            Orders::Engage {
                group,
                weapons,
                throttle,
                wez_scale,
                ..
            } => {
                let reach = armament
                    .weapons
                    .iter()
                    .filter(|w| weapons.contains(&w.id))
                    .map(|w| w.range)
                    .fold(f64::INFINITY, f64::min);
                let standoff = if reach.is_finite() {
                    reach * wez_scale * ENGAGE_STANDOFF_FRACTION
                } else {
                    0.0
                };
                (*group, *throttle, standoff)
            }
            Orders::Capture { flag } | Orders::ReturnToBase { flag } => (*flag, 1.0, 0.0),
            Orders::Refuel { provider } => (*provider, 1.0, 0.0),
            Orders::Idle | Orders::Patrol { .. } => continue,
        };
        if let Ok(pos) = world.get::<&Position>(target) {
            legs.insert(
                entity,
                Leg {
                    target: *pos,
                    throttle,
                    standoff,
                },
            );
        }
    }
    legs
}

/// Move toward `dest` for one tick. Returns true once within `standoff`.
fn advance(
    pos: &mut Position,
    motion: &mut Motion,
    dest: &Position,
    speed: f64,
    dt: f64,
    standoff: f64,
) -> bool {
    let here = DVec2::new(pos.x, pos.y);
    let delta = DVec2::new(dest.x, dest.y) - here;
    let dist = delta.length();
    let remaining = dist - standoff;
    if remaining <= 0.0 {
        motion.speed = 0.0;
        return true;
    }
    motion.heading = delta.x.atan2(delta.y).rem_euclid(std::f64::consts::TAU);
    motion.speed = speed;
    let travel = speed * dt;
    let step = travel.min(remaining);
    let next = here + delta / dist * step;
    pos.x = next.x;
    pos.y = next.y;
    travel >= remaining
}
