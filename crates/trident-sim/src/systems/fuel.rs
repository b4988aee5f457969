//! Fuel system: burn, fuel exhaustion, and replenishment at base or tanker.

use hecs::{Entity, World};
use tracing::debug;

use trident_core::types::Position;

use crate::components::{FuelTank, Motion, Orders, Status};
use crate::constants::ARRIVAL_RADIUS;

/// Burn fuel proportional to throttle. An aircraft that runs dry is lost.
pub fn burn(world: &mut World, dt: f64, frame: u64) {
    for (entity, (tank, motion, status)) in
        world.query_mut::<(&mut FuelTank, &mut Motion, &mut Status)>()
    {
        if !status.alive || motion.max_speed <= 0.0 || motion.speed <= 0.0 {
            continue;
        }
        tank.fuel -= dt * (motion.speed / motion.max_speed);
        if tank.fuel <= 0.0 {
            tank.fuel = 0.0;
            status.alive = false;
            status.capturing = false;
            status.died_at_frame = Some(frame);
            motion.speed = 0.0;
            debug!(?entity, "aircraft lost to fuel exhaustion");
        }
    }
}

/// Complete return-to-base and refuel orders whose destination was reached.
pub fn replenish(world: &mut World) {
    let mut completed: Vec<Entity> = Vec::new();
    {
        let mut query = world.query::<(&Position, &Orders, &Status)>();
        for (entity, (pos, orders, status)) in query.iter() {
            if !status.alive {
                continue;
            }
            let target = match orders {
                Orders::ReturnToBase { flag } => *flag,
                Orders::Refuel { provider } => {
                    let provider_alive = world
                        .get::<&Status>(*provider)
                        .map(|s| s.alive)
                        .unwrap_or(false);
                    if !provider_alive {
                        completed.push(entity);
                        continue;
                    }
                    *provider
                }
                _ => continue,
            };
            let reached = world
                .get::<&Position>(target)
                .map(|t| pos.horizontal_range_to(&t) <= ARRIVAL_RADIUS)
                .unwrap_or(true);
            if reached {
                completed.push(entity);
            }
        }
    }

    for entity in completed {
        let refuel = world
            .get::<&Orders>(entity)
            .map(|o| match &*o {
                Orders::Refuel { provider } => world
                    .get::<&Status>(*provider)
                    .map(|s| s.alive)
                    .unwrap_or(false),
                _ => true,
            })
            .unwrap_or(false);
        if refuel {
            if let Ok(mut tank) = world.get::<&mut FuelTank>(entity) {
                tank.fuel = tank.capacity;
            }
        }
        if let Ok(mut orders) = world.get::<&mut Orders>(entity) {
            *orders = Orders::Idle;
        }
    }
}
