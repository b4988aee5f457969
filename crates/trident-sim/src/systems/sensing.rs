//! Sensing system: maintains each faction's contact groups.
//!
//! A faction detects an adversary unit when one of its live units has it
//! inside radar range (reduced against silent targets, extended near a
//! focus point) or inside visual range. Each detected unit is tracked as
//! one contact group per observing faction; losing detection despawns it.

use std::collections::{BTreeMap, BTreeSet};

use hecs::{Entity, World};

use trident_core::enums::{Domain, Faction};
use trident_core::events::{DespawnedObject, SimEvent, SpawnedObject};
use trident_core::types::Position;

use crate::components::{ContactGroup, Radar, Status, Unit};
use crate::constants::*;
use crate::systems::snapshot::{group_handle, group_state};

/// Contact table: (observer, adversary unit) to contact-group entity.
pub type ContactTable = BTreeMap<(Faction, Entity), Entity>;

#[derive(Debug, Clone, Copy)]
struct Sighting {
    entity: Entity,
    faction: Faction,
    domain: Domain,
    position: Position,
    radar: Option<Radar>,
}

/// Whether `sensor` detects `target`.
fn detects(sensor: &Sighting, target: &Sighting) -> bool {
    let range = sensor.position.horizontal_range_to(&target.position);
    if range <= VISUAL_RANGE {
        return true;
    }
    let Some(radar) = sensor.radar.filter(|r| r.emitting()) else {
        return false;
    };
    let mut reach = radar.range * radar.strength;
    if !target.radar.is_some_and(|r| r.emitting()) {
        reach *= STEALTH_DETECTION_FACTOR;
    }
    if let Some(focus) = radar.focus {
        if focus.horizontal_range_to(&target.position) <= FOCUS_RADIUS {
            reach *= FOCUS_RANGE_BONUS;
        }
    }
    range <= reach
}

pub fn run(world: &mut World, contacts: &mut ContactTable, events: &mut Vec<SimEvent>) {
    let mut live: Vec<Sighting> = world
        .query::<(&Unit, &Position, &Status, Option<&Radar>)>()
        .iter()
        .filter(|(_, (_, _, status, _))| status.alive)
        .map(|(entity, (unit, pos, _, radar))| Sighting {
            entity,
            faction: unit.faction,
            domain: unit.domain,
            position: *pos,
            radar: radar.copied(),
        })
        .collect();
    live.sort_by_key(|s| s.entity.to_bits());

    let mut detected: BTreeMap<(Faction, Entity), Sighting> = BTreeMap::new();
    for observer in Faction::COMBATANTS {
        let sensors: Vec<&Sighting> = live.iter().filter(|s| s.faction == observer).collect();
        for target in live.iter().filter(|s| s.faction.is_combatant() && s.faction != observer) {
            if sensors.iter().any(|s| detects(s, target)) {
                detected.insert((observer, target.entity), *target);
            }
        }
    }

    // Drop contacts that are no longer detected.
    let lost: BTreeSet<(Faction, Entity)> = contacts
        .keys()
        .filter(|k| !detected.contains_key(k))
        .copied()
        .collect();
    for key in lost {
        if let Some(group) = contacts.remove(&key) {
            let _ = world.despawn(group);
            events.push(SimEvent::Despawned {
                object: DespawnedObject::TargetGroup {
                    handle: group_handle(group),
                    observer: key.0,
                },
            });
        }
    }

    for ((observer, member), sighting) in detected {
        match contacts.get(&(observer, member)) {
            Some(group) => {
                if let Ok(mut pos) = world.get::<&mut Position>(*group) {
                    *pos = sighting.position;
                }
            }
            None => {
                let group = world.spawn((
                    ContactGroup {
                        observer,
                        observed_faction: sighting.faction,
                        domain: sighting.domain,
                        member,
                    },
                    sighting.position,
                ));
                contacts.insert((observer, member), group);
                if let Some(state) = group_state(world, group) {
                    events.push(SimEvent::Spawned {
                        object: SpawnedObject::TargetGroup(state.clone()),
                    });
                    events.push(SimEvent::AdversaryContact { group: state });
                }
            }
        }
    }
}
