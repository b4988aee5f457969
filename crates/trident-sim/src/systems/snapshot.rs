//! Snapshot builders: read ECS components into owned core state types.
//!
//! This module is read-only; it never modifies the world.

use hecs::{Entity, World};

use trident_core::entity::{EntityState, FlagState, TargetGroupState};
use trident_core::types::{EntityHandle, FlagHandle, Position, TargetGroupHandle};

use crate::components::*;

/// Map a handle's bits back to a live ECS entity.
pub fn resolve(world: &World, bits: u64) -> Option<Entity> {
    Entity::from_bits(bits).filter(|e| world.contains(*e))
}

pub fn entity_handle(entity: Entity) -> EntityHandle {
    EntityHandle(entity.to_bits().get())
}

pub fn group_handle(entity: Entity) -> TargetGroupHandle {
    TargetGroupHandle(entity.to_bits().get())
}

pub fn flag_handle(entity: Entity) -> FlagHandle {
    FlagHandle(entity.to_bits().get())
}

pub fn entity_state(world: &World, entity: Entity) -> Option<EntityState> {
    let unit = world.get::<&Unit>(entity).ok()?;
    let position = *world.get::<&Position>(entity).ok()?;
    let motion = *world.get::<&Motion>(entity).ok()?;
    let status = *world.get::<&Status>(entity).ok()?;
    let radar = world.get::<&Radar>(entity).ok().map(|r| *r);
    let weapons = world
        .get::<&Armament>(entity)
        .map(|a| a.weapons.clone())
        .unwrap_or_default();
    let fuel_fraction = world
        .get::<&FuelTank>(entity)
        .map(|t| t.fraction())
        .unwrap_or(1.0);
    let engaged_group = match world.get::<&Orders>(entity).ok().as_deref() {
        Some(Orders::Engage { group, .. }) => Some(group_handle(*group)),
        _ => None,
    };

    Some(EntityState {
        handle: entity_handle(entity),
        name: unit.name.clone(),
        faction: unit.faction,
        domain: unit.domain,
        alive: status.alive,
        controllable: unit.controllable,
        position,
        heading: motion.heading,
        speed: motion.speed,
        max_speed: motion.max_speed,
        capabilities: unit.capabilities,
        weapons,
        fuel_fraction,
        radar_enabled: radar.is_some_and(|r| r.emitting()),
        radar_focus: radar.and_then(|r| r.focus),
        capturing: status.capturing,
        engaged_group,
    })
}

pub fn group_state(world: &World, entity: Entity) -> Option<TargetGroupState> {
    let group = *world.get::<&ContactGroup>(entity).ok()?;
    let position = *world.get::<&Position>(entity).ok()?;
    let alive = world
        .get::<&Status>(group.member)
        .map(|s| s.alive)
        .unwrap_or(false);
    Some(TargetGroupState {
        handle: group_handle(entity),
        faction: group.observer,
        observed_faction: group.observed_faction,
        domain: group.domain,
        position,
        num_known_alive_units: u32::from(alive),
    })
}

pub fn flag_state(world: &World, entity: Entity) -> Option<FlagState> {
    let flag = *world.get::<&Flag>(entity).ok()?;
    let position = *world.get::<&Position>(entity).ok()?;
    Some(FlagState {
        handle: flag_handle(entity),
        faction: flag.faction,
        position,
        captured_by: flag.captured_by,
    })
}
