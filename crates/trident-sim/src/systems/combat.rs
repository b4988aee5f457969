//! Combat system: resolves weapons commitments.
//!
//! Each engaging unit fires its selected weapons once the target is inside
//! the scaled weapon engagement zone. Every shot consumes one round and
//! kills with a posture-dependent probability.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use trident_core::enums::{EngagementPosture, WeaponUsage};
use trident_core::types::{Position, WeaponId};

use crate::components::*;
use crate::constants::*;

/// Single-shot kill probability.
pub fn kill_probability(posture: EngagementPosture) -> f64 {
    match posture {
        EngagementPosture::Defensive => PK_DEFENSIVE,
        EngagementPosture::Cautious => PK_CAUTIOUS,
        EngagementPosture::Assertive => PK_ASSERTIVE,
        EngagementPosture::Aggressive => PK_AGGRESSIVE,
    }
}

struct Shooter {
    entity: Entity,
    position: Position,
    group: Entity,
    weapons: Vec<WeaponId>,
    usage: WeaponUsage,
    posture: EngagementPosture,
    wez_scale: f64,
}

/// Run one firing pass. Returns the units killed this tick.
pub fn run(world: &mut World, rng: &mut ChaCha8Rng, frame: u64) -> Vec<Entity> {
    let mut shooters: Vec<Shooter> = world
        .query::<(&Position, &Orders, &Status)>()
        .iter()
        .filter(|(_, (_, _, status))| status.alive)
        .filter_map(|(entity, (pos, orders, _))| match orders {
            Orders::Engage {
                group,
                weapons,
                usage,
                posture,
                wez_scale,
                ..
            } => Some(Shooter {
                entity,
                position: *pos,
                group: *group,
                weapons: weapons.clone(),
                usage: *usage,
                posture: *posture,
                wez_scale: *wez_scale,
            }),
            _ => None,
        })
        .collect();
    shooters.sort_by_key(|s| s.entity.to_bits());

    let mut killed = Vec::new();
    for shooter in shooters {
        let Some((target, domain, target_pos)) = target_of(world, shooter.group) else {
            stand_down(world, shooter.entity);
            continue;
        };
        let range = shooter.position.range_to(&target_pos);
        let pk = kill_probability(shooter.posture);
        let mut hit = false;
        let mut rounds_left = 0;
        if let Ok(mut armament) = world.get::<&mut Armament>(shooter.entity) {
            for id in &shooter.weapons {
                let Some(weapon) = armament.get_mut(*id) else {
                    continue;
                };
                if !weapon.can_target(domain) {
                    continue;
                }
                if !hit && range <= weapon.range * shooter.wez_scale {
                    let shots = shooter.usage.shots_per_weapon().min(weapon.ammo);
                    for _ in 0..shots {
                        weapon.ammo -= 1;
                        if rng.gen::<f64>() < pk {
                            hit = true;
                            break;
                        }
                    }
                }
                rounds_left += weapon.ammo;
            }
        }

        if hit {
            kill(world, target, frame);
            killed.push(target);
            debug!(shooter = ?shooter.entity, ?target, "target destroyed");
        }
        if hit || rounds_left == 0 {
            stand_down(world, shooter.entity);
        }
    }
    killed
}

/// Live member of a contact group, with its domain and position.
fn target_of(world: &World, group: Entity) -> Option<(Entity, trident_core::enums::Domain, Position)> {
    let contact = *world.get::<&ContactGroup>(group).ok()?;
    let alive = world.get::<&Status>(contact.member).ok()?.alive;
    if !alive {
        return None;
    }
    let pos = *world.get::<&Position>(contact.member).ok()?;
    Some((contact.member, contact.domain, pos))
}

fn kill(world: &World, entity: Entity, frame: u64) {
    if let Ok(mut status) = world.get::<&mut Status>(entity) {
        status.alive = false;
        status.capturing = false;
        status.died_at_frame = Some(frame);
    }
    if let Ok(mut motion) = world.get::<&mut Motion>(entity) {
        motion.speed = 0.0;
    }
    stand_down(world, entity);
}

fn stand_down(world: &World, entity: Entity) {
    if let Ok(mut orders) = world.get::<&mut Orders>(entity) {
        *orders = Orders::Idle;
    }
}
