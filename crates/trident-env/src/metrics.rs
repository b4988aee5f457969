//! Mission metrics: casualties, capture progress and island control.
//!
//! Recomputed once per step from live backend state, in a fixed order:
//! casualties, capture possibility, contest status, capture timers.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use trident_core::backend::SimulationBackend;
use trident_core::config::EnvConfig;
use trident_core::enums::Faction;
use trident_core::events::{DespawnedObject, SimEvent};
use trident_core::types::{EntityHandle, PerFaction};

use crate::agent::FactionAgent;
use crate::flags::FlagBoard;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissionMetrics {
    /// Dead units per faction, as explicit sets so a death counts once.
    /// Never shrinks within an episode.
    casualties: PerFaction<BTreeSet<EntityHandle>>,
    /// Seconds of uninterrupted qualifying presence.
    pub capture_progress: PerFaction<f64>,
    pub capture_possible: PerFaction<bool>,
    /// First step at which the capture threshold was crossed.
    pub capture_completed_step: PerFaction<Option<u64>>,
    pub island_contested: bool,
}

impl MissionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The faction's own dead.
    pub fn friendly_kills(&self, faction: Faction) -> &BTreeSet<EntityHandle> {
        &self.casualties[faction]
    }

    /// The opposing faction's dead.
    pub fn enemy_kills(&self, faction: Faction) -> &BTreeSet<EntityHandle> {
        match faction.opponent() {
            Some(enemy) => &self.casualties[enemy],
            None => &self.casualties[faction],
        }
    }

    pub fn casualties(&self, faction: Faction) -> usize {
        self.friendly_kills(faction).len()
    }

    pub fn kills(&self, faction: Faction) -> usize {
        self.enemy_kills(faction).len()
    }

    /// Kills over casualties, with casualties floored at one.
    pub fn kill_ratio(&self, faction: Faction) -> f64 {
        self.kills(faction) as f64 / self.casualties(faction).max(1) as f64
    }

    /// Run the full per-step update.
    pub fn update(
        &mut self,
        agents: &PerFaction<FactionAgent>,
        flags: &FlagBoard,
        backend: &dyn SimulationBackend,
        config: &EnvConfig,
    ) {
        self.record_casualties(agents, backend);
        self.update_capture_possible(agents, backend);
        self.update_contested(agents, flags, backend, config);
        self.advance_capture(agents, backend, config.seconds_per_step());
    }

    /// Add newly dead units to the casualty sets. Returns how many were new.
    pub fn record_casualties(
        &mut self,
        agents: &PerFaction<FactionAgent>,
        backend: &dyn SimulationBackend,
    ) -> usize {
        let mut added = 0;
        for (_, agent) in agents.iter() {
            for (_, state) in agent.tracked_entities(backend) {
                if state.alive || !state.faction.is_combatant() {
                    continue;
                }
                let handle = state.handle;
                if self.casualties.iter().any(|(_, set)| set.contains(&handle)) {
                    continue;
                }
                // A scanner's own dead are its friendly kills and the
                // opponent's enemy kills, so the owning faction keys the set.
                let side = state.faction;
                self.casualties[side].insert(handle);
                added += 1;
                debug!(faction = ?side, name = %state.name, "casualty recorded");
            }
        }
        added
    }

    /// Count tracked units the backend removed outright as lost. Must run
    /// before dispatch releases their IDs, since a unit killed and despawned
    /// in the same tick never shows up dead in a snapshot.
    pub fn record_despawn_losses(
        &mut self,
        events: &[SimEvent],
        agents: &PerFaction<FactionAgent>,
    ) -> usize {
        let mut added = 0;
        for event in events {
            let SimEvent::Despawned {
                object: DespawnedObject::Entity { handle, faction },
            } = event
            else {
                continue;
            };
            if !faction.is_combatant() || agents[*faction].entities.id_of(*handle).is_none() {
                continue;
            }
            if self.casualties.iter().any(|(_, set)| set.contains(handle)) {
                continue;
            }
            self.casualties[*faction].insert(*handle);
            added += 1;
            debug!(?faction, ?handle, "despawned unit recorded as lost");
        }
        added
    }

    fn update_capture_possible(
        &mut self,
        agents: &PerFaction<FactionAgent>,
        backend: &dyn SimulationBackend,
    ) {
        for (faction, agent) in agents.iter() {
            self.capture_possible[faction] = !agent.capture_capable_entities(backend).is_empty();
        }
    }

    fn update_contested(
        &mut self,
        agents: &PerFaction<FactionAgent>,
        flags: &FlagBoard,
        backend: &dyn SimulationBackend,
        config: &EnvConfig,
    ) {
        let Some(island) = flags.neutral() else {
            self.island_contested = false;
            return;
        };
        let radius = config.capture_zone_radius_m();
        let present = |agent: &FactionAgent| {
            agent
                .live_entities(backend)
                .iter()
                .any(|(_, s)| s.position.horizontal_range_to(&island.position) <= radius)
        };
        self.island_contested = present(&agents.legacy) && present(&agents.dynasty);
    }

    fn advance_capture(
        &mut self,
        agents: &PerFaction<FactionAgent>,
        backend: &dyn SimulationBackend,
        dt: f64,
    ) {
        for (faction, agent) in agents.iter() {
            let capturing = agent
                .live_entities(backend)
                .iter()
                .any(|(_, s)| s.capturing);
            let qualifying = capturing && self.capture_possible[faction] && !self.island_contested;
            if qualifying {
                self.capture_progress[faction] += dt;
            } else {
                if self.capture_progress[faction] > 0.0 {
                    debug!(?faction, "capture interrupted");
                }
                self.capture_progress[faction] = 0.0;
                // The completion marker is never cleared once set.
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn insert_casualty(&mut self, faction: Faction, handle: EntityHandle) {
        self.casualties[faction].insert(handle);
    }
}
