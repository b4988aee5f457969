//! Events emitted by the simulation backend after each tick.

use serde::{Deserialize, Serialize};

use crate::entity::{EntityState, FlagState, TargetGroupState};
use crate::enums::Faction;
use crate::types::{EntityHandle, FlagHandle, TargetGroupHandle};

/// A newly created backend object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum SpawnedObject {
    Entity(EntityState),
    TargetGroup(TargetGroupState),
    Flag(FlagState),
}

/// A backend object that no longer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum DespawnedObject {
    Entity {
        handle: EntityHandle,
        faction: Faction,
    },
    TargetGroup {
        handle: TargetGroupHandle,
        observer: Faction,
    },
    Flag {
        handle: FlagHandle,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    Spawned { object: SpawnedObject },
    Despawned { object: DespawnedObject },
    /// A faction's sensors picked up an adversary group.
    AdversaryContact { group: TargetGroupState },
    /// The backend's own win condition fired (a faction was wiped out).
    Victory { faction: Faction },
}
