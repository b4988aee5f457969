//! Event dispatch from the backend to registries and the flag board.
//!
//! Dispatch is stateless: each event is matched exhaustively on its kind
//! and the kind of object it carries, then routed by faction to the owning
//! agent's handler or to the shared handler. Anything no handler takes is
//! reported as [`Handled::Ignored`] and logged.

use tracing::debug;

use trident_core::entity::{EntityState, FlagState, TargetGroupState};
use trident_core::enums::Faction;
use trident_core::events::{DespawnedObject, SimEvent, SpawnedObject};
use trident_core::types::{EntityHandle, FlagHandle, TargetGroupHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// State changed.
    Applied,
    /// Already known; nothing changed.
    Duplicate,
    /// No handler accepts this event.
    Ignored,
    /// The owning registry has no free ID left.
    Refused,
}

/// Capability set for reacting to backend events. Every method defaults to
/// ignoring the event, so implementors only override what they respond to.
pub trait EventHandler {
    fn on_entity_spawned(&mut self, _state: &EntityState) -> Handled {
        Handled::Ignored
    }

    fn on_entity_despawned(&mut self, _handle: EntityHandle) -> Handled {
        Handled::Ignored
    }

    fn on_target_group_spawned(&mut self, _group: &TargetGroupState) -> Handled {
        Handled::Ignored
    }

    fn on_target_group_despawned(&mut self, _handle: TargetGroupHandle) -> Handled {
        Handled::Ignored
    }

    /// A detection. Treated as a group spawn unless overridden.
    fn on_adversary_contact(&mut self, group: &TargetGroupState) -> Handled {
        self.on_target_group_spawned(group)
    }

    fn on_flag_spawned(&mut self, _flag: &FlagState) -> Handled {
        Handled::Ignored
    }

    fn on_flag_despawned(&mut self, _handle: FlagHandle) -> Handled {
        Handled::Ignored
    }

    fn on_victory(&mut self, _faction: Faction) -> Handled {
        Handled::Ignored
    }
}

/// Where events go: one handler per agent plus the shared flag board.
pub struct DispatchTargets<'a> {
    pub legacy: &'a mut dyn EventHandler,
    pub dynasty: &'a mut dyn EventHandler,
    pub shared: &'a mut dyn EventHandler,
}

impl DispatchTargets<'_> {
    fn agent(&mut self, faction: Faction) -> Option<&mut dyn EventHandler> {
        match faction {
            Faction::Legacy => Some(&mut *self.legacy),
            Faction::Dynasty => Some(&mut *self.dynasty),
            Faction::Neutral => None,
        }
    }
}

/// Counts of how a batch of events was handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub applied: usize,
    pub duplicates: usize,
    pub ignored: usize,
    pub refused: usize,
}

impl DispatchSummary {
    pub fn total(&self) -> usize {
        self.applied + self.duplicates + self.ignored + self.refused
    }
}

pub fn dispatch(event: &SimEvent, targets: &mut DispatchTargets<'_>) -> Handled {
    let handled = match event {
        SimEvent::Spawned { object } => match object {
            SpawnedObject::Entity(state) => targets
                .agent(state.faction)
                .map_or(Handled::Ignored, |h| h.on_entity_spawned(state)),
            SpawnedObject::TargetGroup(group) => targets
                .agent(group.faction)
                .map_or(Handled::Ignored, |h| h.on_target_group_spawned(group)),
            SpawnedObject::Flag(flag) => targets.shared.on_flag_spawned(flag),
        },
        SimEvent::Despawned { object } => match *object {
            DespawnedObject::Entity { handle, faction } => targets
                .agent(faction)
                .map_or(Handled::Ignored, |h| h.on_entity_despawned(handle)),
            DespawnedObject::TargetGroup { handle, observer } => targets
                .agent(observer)
                .map_or(Handled::Ignored, |h| h.on_target_group_despawned(handle)),
            DespawnedObject::Flag { handle } => targets.shared.on_flag_despawned(handle),
        },
        SimEvent::AdversaryContact { group } => targets
            .agent(group.faction)
            .map_or(Handled::Ignored, |h| h.on_adversary_contact(group)),
        SimEvent::Victory { faction } => targets.shared.on_victory(*faction),
    };
    if handled == Handled::Ignored {
        debug!(?event, "unhandled backend event");
    }
    handled
}

/// Dispatch a batch of events in order.
pub fn dispatch_all(events: &[SimEvent], targets: &mut DispatchTargets<'_>) -> DispatchSummary {
    let mut summary = DispatchSummary::default();
    for event in events {
        match dispatch(event, targets) {
            Handled::Applied => summary.applied += 1,
            Handled::Duplicate => summary.duplicates += 1,
            Handled::Ignored => summary.ignored += 1,
            Handled::Refused => summary.refused += 1,
        }
    }
    summary
}
