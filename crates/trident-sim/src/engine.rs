//! Sandbox simulation engine.
//!
//! `SandboxSimulation` owns the hecs ECS world, applies commands, runs all
//! systems once per tick, and reports the resulting events. Completely
//! headless and deterministic for a given seed and command sequence.

use std::collections::BTreeSet;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use trident_core::backend::{ForceLaydown, SimulationBackend, SimulationConfig};
use trident_core::commands::Command;
use trident_core::constants::FRAMES_PER_SECOND;
use trident_core::entity::{EntityState, FlagState, TargetGroupState};
use trident_core::enums::Faction;
use trident_core::error::Result;
use trident_core::events::{SimEvent, SpawnedObject};
use trident_core::types::{EntityHandle, FlagHandle, TargetGroupHandle, WeaponId};

use crate::components::{Armament, ContactGroup, Status};
use crate::systems;
use crate::systems::sensing::ContactTable;
use crate::systems::snapshot::resolve;
use crate::world_setup;

/// One recorded tick of the backend's own replay log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayFrame {
    pub frame: u64,
    pub commands: Vec<Command>,
    pub events: Vec<SimEvent>,
}

/// The backend's deterministic replay: seed plus every command and event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimReplay {
    pub scenario_name: String,
    pub seed: u64,
    pub frames: Vec<ReplayFrame>,
}

/// The sandbox simulation. Owns the ECS world and all sim state.
pub struct SandboxSimulation {
    world: World,
    rng: ChaCha8Rng,
    frame_index: u64,
    pending_laydowns: Vec<ForceLaydown>,
    fielded: BTreeSet<Faction>,
    contacts: ContactTable,
    despawn_buffer: Vec<(Entity, Faction)>,
    victory_declared: bool,
    replay: Option<SimReplay>,
}

impl SandboxSimulation {
    pub fn new(config: &SimulationConfig) -> Self {
        let replay = config.record_replay.then(|| SimReplay {
            scenario_name: config.scenario_name.clone(),
            seed: config.seed,
            frames: Vec::new(),
        });
        Self {
            world: World::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            frame_index: 0,
            pending_laydowns: Vec::new(),
            fielded: BTreeSet::new(),
            contacts: ContactTable::new(),
            despawn_buffer: Vec::new(),
            victory_declared: false,
            replay,
        }
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Kill a unit outright (for tests).
    #[cfg(test)]
    pub fn kill_unit(&mut self, handle: EntityHandle) {
        if let Some(entity) = resolve(&self.world, handle.0) {
            if let Ok(mut status) = self.world.get::<&mut Status>(entity) {
                status.alive = false;
                status.died_at_frame = Some(self.frame_index);
            }
        }
    }

    fn record(&mut self, commands: Vec<Command>, events: &[SimEvent]) {
        if let Some(replay) = self.replay.as_mut() {
            replay.frames.push(ReplayFrame {
                frame: self.frame_index,
                commands,
                events: events.to_vec(),
            });
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self, dt: f64, events: &mut Vec<SimEvent>) {
        // 1. Movement
        systems::movement::run(&mut self.world, dt);
        // 2. Fuel burn and replenishment
        systems::fuel::burn(&mut self.world, dt, self.frame_index);
        systems::fuel::replenish(&mut self.world);
        // 3. Weapons
        let killed = systems::combat::run(&mut self.world, &mut self.rng, self.frame_index);
        if !killed.is_empty() {
            debug!(count = killed.len(), frame = self.frame_index, "units destroyed");
        }
        // 4. Flag presence
        systems::capture::run(&mut self.world);
        // 5. Detection and contact groups
        systems::sensing::run(&mut self.world, &mut self.contacts, events);
        // 6. Cleanup of expired dead units
        systems::cleanup::run(
            &mut self.world,
            self.frame_index,
            &mut self.despawn_buffer,
            events,
        );
        // 7. Win condition
        if !self.victory_declared {
            if let Some(faction) = systems::cleanup::check_victory(&self.world, &self.fielded) {
                self.victory_declared = true;
                info!(?faction, "backend victory: opposing force eliminated");
                events.push(SimEvent::Victory { faction });
            }
        }
    }
}

impl SimulationBackend for SandboxSimulation {
    fn start_force_laydown(&mut self, laydowns: Vec<ForceLaydown>) {
        self.pending_laydowns = laydowns;
    }

    fn finalize_force_laydown(&mut self) -> Vec<SimEvent> {
        let mut events = Vec::new();
        for flag in world_setup::spawn_flags(&mut self.world) {
            if let Some(state) = systems::snapshot::flag_state(&self.world, flag) {
                events.push(SimEvent::Spawned {
                    object: SpawnedObject::Flag(state),
                });
            }
        }

        let laydowns = std::mem::take(&mut self.pending_laydowns);
        for laydown in &laydowns {
            let spawned = world_setup::spawn_force(&mut self.world, &mut self.rng, laydown);
            if !spawned.is_empty() {
                self.fielded.insert(laydown.faction);
            }
            info!(faction = ?laydown.faction, units = spawned.len(), "force laid down");
            events.extend(
                spawned
                    .into_iter()
                    .filter_map(|e| systems::snapshot::entity_state(&self.world, e))
                    .map(|state| SimEvent::Spawned {
                        object: SpawnedObject::Entity(state),
                    }),
            );
        }

        systems::sensing::run(&mut self.world, &mut self.contacts, &mut events);
        self.record(Vec::new(), &events);
        events
    }

    fn tick(&mut self, commands: Vec<Command>, frame_rate: u32) -> Vec<SimEvent> {
        for command in &commands {
            systems::orders::apply(&mut self.world, command.clone());
        }

        self.frame_index += u64::from(frame_rate);
        let dt = f64::from(frame_rate) / FRAMES_PER_SECOND;
        let mut events = Vec::new();
        self.run_systems(dt, &mut events);
        self.record(commands, &events);
        events
    }

    fn entity(&self, handle: EntityHandle) -> Option<EntityState> {
        let entity = resolve(&self.world, handle.0)?;
        systems::snapshot::entity_state(&self.world, entity)
    }

    fn target_group(&self, handle: TargetGroupHandle) -> Option<TargetGroupState> {
        let entity = resolve(&self.world, handle.0)?;
        systems::snapshot::group_state(&self.world, entity)
    }

    fn flag(&self, handle: FlagHandle) -> Option<FlagState> {
        let entity = resolve(&self.world, handle.0)?;
        systems::snapshot::flag_state(&self.world, entity)
    }

    fn select_weapons(&self, entity: EntityHandle, group: TargetGroupHandle) -> Vec<WeaponId> {
        let (Some(unit), Some(group)) = (
            resolve(&self.world, entity.0),
            resolve(&self.world, group.0),
        ) else {
            return Vec::new();
        };
        let alive = self
            .world
            .get::<&Status>(unit)
            .map(|s| s.alive)
            .unwrap_or(false);
        let Ok(contact) = self.world.get::<&ContactGroup>(group) else {
            return Vec::new();
        };
        if !alive {
            return Vec::new();
        }
        self.world
            .get::<&Armament>(unit)
            .map(|a| {
                a.weapons
                    .iter()
                    .filter(|w| w.can_target(contact.domain))
                    .map(|w| w.id)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn frame_index(&self) -> u64 {
        self.frame_index
    }

    fn export_replay(&self) -> Result<String> {
        let replay = self.replay.clone().unwrap_or_default();
        Ok(serde_json::to_string(&replay)?)
    }
}
