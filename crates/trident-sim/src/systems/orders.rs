//! Command intake: turns backend commands into unit orders and sensor state.

use hecs::{Entity, World};
use tracing::debug;

use trident_core::commands::Command;
use trident_core::types::Position;

use crate::components::{ContactGroup, Flag, Orders, Radar, Status, Unit};
use crate::systems::snapshot::resolve;

/// Corner waypoints of a racetrack centred on `center`, flown clockwise.
/// `angle` orients the long axis (0 = North, clockwise).
pub fn racetrack_waypoints(center: &Position, long: f64, short: f64, angle: f64) -> Vec<Position> {
    let (ax, ay) = (angle.sin(), angle.cos());
    let (px, py) = (angle.cos(), -angle.sin());
    let (hl, hs) = (long / 2.0, short / 2.0);
    [(hl, hs), (hl, -hs), (-hl, -hs), (-hl, hs)]
        .iter()
        .map(|(l, s)| Position::new(center.x + ax * l + px * s, center.y + ay * l + py * s, center.z))
        .collect()
}

/// Apply one command. Commands for dead or unknown units are dropped.
pub fn apply(world: &mut World, command: Command) {
    let Some(entity) = live_unit(world, command.entity().0) else {
        debug!(?command, "dropping command for unknown or dead unit");
        return;
    };

    match command {
        Command::PatrolRaceTrack {
            center,
            axis_long,
            axis_short,
            angle,
            ..
        } => set_orders(
            world,
            entity,
            Orders::Patrol {
                waypoints: racetrack_waypoints(&center, axis_long, axis_short, angle),
                next: 0,
            },
        ),
        Command::CommitWeapons {
            target,
            weapons,
            usage,
            posture,
            throttle,
            wez_scale,
            ..
        } => match resolve(world, target.0).filter(|g| world.get::<&ContactGroup>(*g).is_ok()) {
            Some(group) => set_orders(
                world,
                entity,
                Orders::Engage {
                    group,
                    weapons,
                    usage,
                    posture,
                    throttle,
                    wez_scale,
                },
            ),
            None => debug!(?target, "weapons commit against vanished group"),
        },
        Command::SetRadarStrength { strength, .. } => {
            if let Ok(mut radar) = world.get::<&mut Radar>(entity) {
                radar.strength = strength.clamp(0.0, 1.0);
            }
        }
        Command::SetRadarFocus { focus, .. } => {
            if let Ok(mut radar) = world.get::<&mut Radar>(entity) {
                radar.focus = Some(focus);
            }
        }
        Command::ClearRadarFocus { .. } => {
            if let Ok(mut radar) = world.get::<&mut Radar>(entity) {
                radar.focus = None;
            }
        }
        Command::CaptureFlag { flag, .. } => {
            if let Some(flag) = flag_entity(world, flag.0) {
                set_orders(world, entity, Orders::Capture { flag });
            }
        }
        Command::ReturnToBase { flag, .. } => {
            if let Some(flag) = flag_entity(world, flag.0) {
                set_orders(world, entity, Orders::ReturnToBase { flag });
            }
        }
        Command::Refuel { provider, .. } => {
            if let Some(provider) = live_unit(world, provider.0) {
                set_orders(world, entity, Orders::Refuel { provider });
            }
        }
    }
}

fn set_orders(world: &mut World, entity: Entity, orders: Orders) {
    if let Ok(mut current) = world.get::<&mut Orders>(entity) {
        *current = orders;
    }
}

fn live_unit(world: &World, bits: u64) -> Option<Entity> {
    let entity = resolve(world, bits)?;
    let alive = world.get::<&Status>(entity).map(|s| s.alive).unwrap_or(false);
    (alive && world.get::<&Unit>(entity).is_ok()).then_some(entity)
}

fn flag_entity(world: &World, bits: u64) -> Option<Entity> {
    resolve(world, bits).filter(|e| world.get::<&Flag>(*e).is_ok())
}
