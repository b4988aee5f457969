//! Valid-action masks reported in each agent's step info.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use trident_core::backend::SimulationBackend;
use trident_core::entity::EntityState;
use trident_core::enums::{ActionKind, Domain};

use crate::agent::FactionAgent;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidMasks {
    /// Action type indices some unit can currently perform. Always holds 0.
    pub action_types: BTreeSet<u8>,
    /// IDs of live controllable units.
    pub controllable_entities: BTreeSet<u32>,
    /// IDs of detected adversary groups.
    pub visible_targets: BTreeSet<u32>,
    /// For each unit ID, the visible target IDs it has a weapon for.
    pub entity_target_matrix: BTreeMap<u32, BTreeSet<u32>>,
}

/// Refuel pairing candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefuelMasks {
    pub receivers: BTreeSet<u32>,
    pub providers: BTreeSet<u32>,
}

fn kinds_for(entity: &EntityState) -> impl Iterator<Item = ActionKind> {
    let air = entity.domain == Domain::Air;
    let caps = entity.capabilities;
    [
        (ActionKind::Move, air),
        (ActionKind::ReturnToBase, air),
        (ActionKind::Capture, air && caps.capture),
        (ActionKind::Stealth, caps.radar),
        (ActionKind::SensingPosition, caps.radar),
        (ActionKind::Refuel, caps.refuel_receiver),
    ]
    .into_iter()
    .filter_map(|(kind, ok)| ok.then_some(kind))
}

pub fn compute(agent: &FactionAgent, backend: &dyn SimulationBackend) -> ValidMasks {
    let mut masks = ValidMasks::default();
    masks.action_types.insert(ActionKind::Noop.index());

    let groups = agent.visible_target_groups(backend);
    masks.visible_targets = groups.iter().map(|(id, _)| *id).collect();

    for (id, entity) in agent.live_entities(backend) {
        if !entity.controllable {
            continue;
        }
        masks.controllable_entities.insert(id);
        masks
            .action_types
            .extend(kinds_for(&entity).map(ActionKind::index));

        let engageable: BTreeSet<u32> = groups
            .iter()
            .filter(|(_, g)| g.observed_faction != agent.faction())
            .filter(|(_, g)| !backend.select_weapons(entity.handle, g.handle).is_empty())
            .map(|(gid, _)| *gid)
            .collect();
        if !engageable.is_empty() {
            masks.action_types.insert(ActionKind::Engage.index());
            masks.entity_target_matrix.insert(id, engageable);
        }
    }
    masks
}

pub fn refuel(agent: &FactionAgent, backend: &dyn SimulationBackend) -> RefuelMasks {
    RefuelMasks {
        receivers: agent
            .refuelable_entities(backend)
            .into_iter()
            .map(|(id, _)| id)
            .collect(),
        providers: agent
            .refuel_providers(backend)
            .into_iter()
            .map(|(id, _)| id)
            .collect(),
    }
}
