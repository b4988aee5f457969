//! Backend factory for the sandbox simulation.

use tracing::debug;

use trident_core::backend::{BackendFactory, ForceLaydown, SimulationConfig};
use trident_core::enums::Faction;
use trident_core::error::Result;

use crate::engine::SandboxSimulation;
use crate::scenario;

/// Creates sandbox instances and counts how many are live.
#[derive(Debug, Default)]
pub struct SandboxFactory {
    initialized: bool,
    live: usize,
}

impl SandboxFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of created backends not yet destroyed.
    pub fn live_backends(&self) -> usize {
        self.live
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

impl BackendFactory for SandboxFactory {
    type Backend = SandboxSimulation;

    fn initialize(&mut self) -> Result<()> {
        self.initialized = true;
        Ok(())
    }

    fn create(&mut self, config: &SimulationConfig) -> Result<SandboxSimulation> {
        self.live += 1;
        debug!(seed = config.seed, live = self.live, "sandbox backend created");
        Ok(SandboxSimulation::new(config))
    }

    fn destroy(&mut self, backend: SandboxSimulation) {
        self.live = self.live.saturating_sub(1);
        debug!(live = self.live, "sandbox backend destroyed");
        drop(backend);
    }

    fn default_laydown(&self, faction: Faction) -> ForceLaydown {
        scenario::default_laydown(faction)
    }
}
