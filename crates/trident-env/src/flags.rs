//! Shared flag board: the island objective and one base flag per faction.

use std::collections::BTreeMap;

use tracing::{debug, info};

use trident_core::entity::FlagState;
use trident_core::enums::Faction;
use trident_core::types::FlagHandle;

use crate::dispatch::{EventHandler, Handled};

/// Flags keyed by owning faction, plus any backend-declared victory.
#[derive(Debug, Clone, Default)]
pub struct FlagBoard {
    flags: BTreeMap<Faction, FlagState>,
    backend_victory: Option<Faction>,
}

impl FlagBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.flags.clear();
        self.backend_victory = None;
    }

    /// The island objective flag.
    pub fn neutral(&self) -> Option<&FlagState> {
        self.flags.get(&Faction::Neutral)
    }

    /// A faction's home flag.
    pub fn home(&self, faction: Faction) -> Option<&FlagState> {
        self.flags.get(&faction)
    }

    pub fn all(&self) -> impl Iterator<Item = &FlagState> {
        self.flags.values()
    }

    /// Record the faction that completed capture of the island.
    pub fn mark_captured(&mut self, faction: Faction) {
        if let Some(flag) = self.flags.get_mut(&Faction::Neutral) {
            if flag.captured_by.is_none() {
                flag.captured_by = Some(faction);
                info!(?faction, "island flag captured");
            }
        }
    }

    /// Victory reported by the backend's own win condition, if any.
    pub fn backend_victory(&self) -> Option<Faction> {
        self.backend_victory
    }
}

impl EventHandler for FlagBoard {
    fn on_flag_spawned(&mut self, flag: &FlagState) -> Handled {
        match self.flags.get(&flag.faction) {
            Some(existing) if existing.handle == flag.handle => Handled::Duplicate,
            _ => {
                self.flags.insert(flag.faction, flag.clone());
                Handled::Applied
            }
        }
    }

    fn on_flag_despawned(&mut self, handle: FlagHandle) -> Handled {
        let owner = self
            .flags
            .iter()
            .find(|(_, f)| f.handle == handle)
            .map(|(faction, _)| *faction);
        match owner {
            Some(faction) => {
                self.flags.remove(&faction);
                debug!(?faction, "flag removed");
                Handled::Applied
            }
            None => Handled::Ignored,
        }
    }

    fn on_victory(&mut self, faction: Faction) -> Handled {
        if self.backend_victory.is_some() {
            return Handled::Duplicate;
        }
        info!(?faction, "backend declared victory");
        self.backend_victory = Some(faction);
        Handled::Applied
    }
}
