//! Per-faction agent state: the agent's own units and its detected groups.

use tracing::{debug, warn};

use trident_core::backend::SimulationBackend;
use trident_core::config::EnvConfig;
use trident_core::entity::{EntityState, TargetGroupState};
use trident_core::enums::Faction;
use trident_core::types::{EntityHandle, TargetGroupHandle};

use crate::dispatch::{EventHandler, Handled};
use crate::registry::{EntityRegistry, TargetGroupRegistry, Tracked};

/// Registries and lookups for one faction. Everything here is fog-of-war
/// scoped: only the faction's own controllable units and what it has
/// detected.
#[derive(Debug, Clone)]
pub struct FactionAgent {
    faction: Faction,
    pub entities: EntityRegistry,
    pub target_groups: TargetGroupRegistry,
}

impl FactionAgent {
    /// Registries sized to the entity and target-group slots of `config`.
    pub fn new(faction: Faction, config: &EnvConfig) -> Self {
        Self {
            faction,
            entities: EntityRegistry::new(faction, config.max_entities),
            target_groups: TargetGroupRegistry::new(faction, config.max_target_groups),
        }
    }

    pub fn faction(&self) -> Faction {
        self.faction
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.target_groups.clear();
    }

    pub fn entity_by_id(&self, backend: &dyn SimulationBackend, id: i64) -> Option<EntityState> {
        backend.entity(self.entities.get_raw(id)?)
    }

    pub fn target_group_by_id(
        &self,
        backend: &dyn SimulationBackend,
        id: i64,
    ) -> Option<TargetGroupState> {
        backend.target_group(self.target_groups.get_raw(id)?)
    }

    /// Tracked units that still resolve in the backend, dead or alive.
    pub fn tracked_entities(&self, backend: &dyn SimulationBackend) -> Vec<(u32, EntityState)> {
        self.entities
            .all()
            .filter_map(|(id, h)| backend.entity(h).map(|s| (id, s)))
            .collect()
    }

    pub fn live_entities(&self, backend: &dyn SimulationBackend) -> Vec<(u32, EntityState)> {
        self.tracked_entities(backend)
            .into_iter()
            .filter(|(_, s)| s.alive)
            .collect()
    }

    pub fn capture_capable_entities(
        &self,
        backend: &dyn SimulationBackend,
    ) -> Vec<(u32, EntityState)> {
        self.live_entities(backend)
            .into_iter()
            .filter(|(_, s)| s.capabilities.capture)
            .collect()
    }

    /// Live units able to receive fuel.
    pub fn refuelable_entities(&self, backend: &dyn SimulationBackend) -> Vec<(u32, EntityState)> {
        self.live_entities(backend)
            .into_iter()
            .filter(|(_, s)| s.capabilities.refuel_receiver)
            .collect()
    }

    /// Live units able to provide fuel.
    pub fn refuel_providers(&self, backend: &dyn SimulationBackend) -> Vec<(u32, EntityState)> {
        self.live_entities(backend)
            .into_iter()
            .filter(|(_, s)| s.capabilities.refuel_provider)
            .collect()
    }

    pub fn is_entity_capturing(&self, backend: &dyn SimulationBackend, id: i64) -> bool {
        self.entity_by_id(backend, id)
            .is_some_and(|s| s.alive && s.capturing)
    }

    pub fn visible_target_groups(
        &self,
        backend: &dyn SimulationBackend,
    ) -> Vec<(u32, TargetGroupState)> {
        self.target_groups
            .all()
            .filter_map(|(id, h)| backend.target_group(h).map(|g| (id, g)))
            .collect()
    }
}

impl EventHandler for FactionAgent {
    fn on_entity_spawned(&mut self, state: &EntityState) -> Handled {
        if !state.controllable {
            return Handled::Ignored;
        }
        let first_refusal = !self.entities.is_refused(state.handle);
        match self.entities.track(state.handle, state.faction) {
            Some(Tracked { id, inserted: true }) => {
                debug!(faction = ?self.faction, id, name = %state.name, "entity tracked");
                Handled::Applied
            }
            Some(_) => Handled::Duplicate,
            None => {
                if first_refusal {
                    warn!(
                        faction = ?self.faction,
                        name = %state.name,
                        capacity = self.entities.capacity(),
                        "entity slots exhausted; unit left untracked"
                    );
                }
                Handled::Refused
            }
        }
    }

    fn on_entity_despawned(&mut self, handle: EntityHandle) -> Handled {
        match self.entities.forget(handle) {
            Some(id) => {
                debug!(faction = ?self.faction, id, "entity released");
                Handled::Applied
            }
            None => Handled::Ignored,
        }
    }

    fn on_target_group_spawned(&mut self, group: &TargetGroupState) -> Handled {
        let first_refusal = !self.target_groups.is_refused(group.handle);
        match self.target_groups.track(group.handle, group.faction) {
            Some(Tracked { id, inserted: true }) => {
                debug!(faction = ?self.faction, id, "target group tracked");
                Handled::Applied
            }
            Some(_) => Handled::Duplicate,
            None => {
                if first_refusal {
                    warn!(
                        faction = ?self.faction,
                        capacity = self.target_groups.capacity(),
                        "target group slots exhausted; contact left untracked"
                    );
                }
                Handled::Refused
            }
        }
    }

    fn on_target_group_despawned(&mut self, handle: TargetGroupHandle) -> Handled {
        match self.target_groups.forget(handle) {
            Some(id) => {
                debug!(faction = ?self.faction, id, "target group released");
                Handled::Applied
            }
            None => Handled::Ignored,
        }
    }
}
