//! Capture system: flags units that are holding a flag they were ordered to seize.

use std::collections::HashMap;

use hecs::{Entity, World};

use trident_core::types::Position;

use crate::components::{Flag, Orders, Status, Unit};
use crate::constants::FLAG_CAPTURE_RADIUS;

pub fn run(world: &mut World) {
    let flags: HashMap<Entity, Position> = world
        .query::<(&Flag, &Position)>()
        .iter()
        .map(|(e, (_, pos))| (e, *pos))
        .collect();

    for (_entity, (unit, pos, orders, status)) in
        world.query_mut::<(&Unit, &Position, &Orders, &mut Status)>()
    {
        status.capturing = status.alive
            && unit.capabilities.capture
            && match orders {
                Orders::Capture { flag } => flags
                    .get(flag)
                    .is_some_and(|f| pos.horizontal_range_to(f) <= FLAG_CAPTURE_RADIUS),
                _ => false,
            };
    }
}
