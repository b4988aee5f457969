//! Cleanup system: removes dead units once their retention period expires,
//! and reports a victory when one side has no live units left.

use std::collections::BTreeSet;

use hecs::{Entity, World};

use trident_core::enums::Faction;
use trident_core::events::{DespawnedObject, SimEvent};

use crate::components::{Status, Unit};
use crate::constants::CORPSE_RETENTION_FRAMES;
use crate::systems::snapshot::entity_handle;

/// Despawn expired dead units. Uses a pre-allocated buffer to avoid per-tick
/// allocation.
pub fn run(
    world: &mut World,
    frame: u64,
    despawn_buffer: &mut Vec<(Entity, Faction)>,
    events: &mut Vec<SimEvent>,
) {
    despawn_buffer.clear();

    for (entity, (unit, status)) in world.query_mut::<(&Unit, &Status)>() {
        if let Some(died) = status.died_at_frame {
            if frame.saturating_sub(died) >= CORPSE_RETENTION_FRAMES {
                despawn_buffer.push((entity, unit.faction));
            }
        }
    }
    despawn_buffer.sort_by_key(|(e, _)| e.to_bits());

    for (entity, faction) in despawn_buffer.drain(..) {
        if world.despawn(entity).is_ok() {
            events.push(SimEvent::Despawned {
                object: DespawnedObject::Entity {
                    handle: entity_handle(entity),
                    faction,
                },
            });
        }
    }
}

/// The surviving faction, if exactly one of the factions that fielded
/// forces still has live units.
pub fn check_victory(world: &World, fielded: &BTreeSet<Faction>) -> Option<Faction> {
    let mut alive: BTreeSet<Faction> = BTreeSet::new();
    for (_entity, (unit, status)) in world.query::<(&Unit, &Status)>().iter() {
        if status.alive {
            alive.insert(unit.faction);
        }
    }
    let mut survivors = fielded.iter().filter(|f| alive.contains(f));
    match (survivors.next(), survivors.next()) {
        (Some(winner), None) if fielded.len() > 1 => Some(*winner),
        _ => None,
    }
}
