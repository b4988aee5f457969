//! The simulation backend contract.
//!
//! The environment drives an opaque backend through these traits: it lays
//! down forces once per episode, then ticks the backend once per step with
//! the commands both agents produced, and reads back typed events. All state
//! the environment needs beyond events is obtained through owned snapshots.

use serde::{Deserialize, Serialize};

use crate::commands::Command;
use crate::entity::{Capabilities, EntityState, FlagState, TargetGroupState};
use crate::enums::{Domain, Faction};
use crate::error::Result;
use crate::events::SimEvent;
use crate::types::{EntityHandle, FlagHandle, TargetGroupHandle, WeaponId};

/// A weapon mount in a force composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponSpec {
    pub name: String,
    pub target_domains: Vec<Domain>,
    pub ammo: u32,
    /// Engagement range in km.
    pub range_km: f64,
}

/// One unit to place at laydown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSpec {
    pub name: String,
    pub domain: Domain,
    #[serde(default = "default_true")]
    pub controllable: bool,
    #[serde(default)]
    pub capabilities: Capabilities,
    #[serde(default)]
    pub weapons: Vec<WeaponSpec>,
    /// Maximum speed in m/s.
    pub max_speed: f64,
    /// Radar range in km. Ignored when the unit has no radar.
    #[serde(default)]
    pub radar_range_km: f64,
    /// Endurance at cruise in seconds. Zero means unlimited.
    #[serde(default)]
    pub endurance_secs: f64,
}

fn default_true() -> bool {
    true
}

/// All units one faction brings to an episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceLaydown {
    pub faction: Faction,
    pub units: Vec<UnitSpec>,
}

impl ForceLaydown {
    pub fn empty(faction: Faction) -> Self {
        Self {
            faction,
            units: Vec::new(),
        }
    }
}

/// Parameters for creating one backend instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub scenario_name: String,
    pub seed: u64,
    /// Keep a command/event log for [`SimulationBackend::export_replay`].
    pub record_replay: bool,
}

/// A live simulation instance.
pub trait SimulationBackend {
    /// Queue force laydowns. Nothing is placed until finalize.
    fn start_force_laydown(&mut self, laydowns: Vec<ForceLaydown>);

    /// Place queued forces and flags, returning their spawn events.
    fn finalize_force_laydown(&mut self) -> Vec<SimEvent>;

    /// Apply `commands` and advance by `frame_rate` frames.
    fn tick(&mut self, commands: Vec<Command>, frame_rate: u32) -> Vec<SimEvent>;

    fn entity(&self, handle: EntityHandle) -> Option<EntityState>;

    fn target_group(&self, handle: TargetGroupHandle) -> Option<TargetGroupState>;

    fn flag(&self, handle: FlagHandle) -> Option<FlagState>;

    /// Weapons on `entity` able to engage `group` right now, in mount order.
    fn select_weapons(&self, entity: EntityHandle, group: TargetGroupHandle) -> Vec<WeaponId>;

    /// Frames advanced since creation.
    fn frame_index(&self) -> u64;

    /// The backend's own deterministic replay, as JSON.
    fn export_replay(&self) -> Result<String>;
}

/// Process-level lifecycle of backend instances.
pub trait BackendFactory {
    type Backend: SimulationBackend;

    /// One-time process setup. Called before the first `create`.
    fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    fn create(&mut self, config: &SimulationConfig) -> Result<Self::Backend>;

    /// Release a backend. Must be called before a replacement is created.
    fn destroy(&mut self, backend: Self::Backend);

    /// Force composition used when no composition file is configured.
    fn default_laydown(&self, faction: Faction) -> ForceLaydown;
}
