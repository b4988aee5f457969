//! Per-agent step info.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use trident_core::action::Action;
use trident_core::enums::{Faction, Outcome, TerminationCause};

use crate::masks::{RefuelMasks, ValidMasks};

/// The last action recorded for one entity ID, and the step it came in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionTrail {
    pub step: u64,
    pub action: Action,
}

/// Audit trail of submitted actions keyed by the addressed entity ID.
pub type ActionTrails = BTreeMap<i64, ActionTrail>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissionInfo {
    pub casualties: usize,
    pub kills: usize,
    pub kill_ratio: f64,
    pub capture_progress: f64,
    pub enemy_capture_progress: f64,
    pub capture_possible: bool,
    pub enemy_capture_possible: bool,
    pub island_contested: bool,
    pub capture_completed_step: Option<u64>,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    pub agent: String,
    pub faction: Faction,
    pub step: u64,
    pub time_elapsed: f64,
    pub time_remaining: f64,
    /// Tracked own units, dead or alive.
    pub num_entities: usize,
    pub num_live_entities: usize,
    pub num_target_groups: usize,
    /// Own units and contacts left untracked because their ID slots ran out.
    pub untracked_entities: usize,
    pub untracked_target_groups: usize,
    /// Backend events produced by the last tick or laydown.
    pub last_events_count: usize,
    pub valid_masks: ValidMasks,
    pub refuel_masks: RefuelMasks,
    pub mission: MissionInfo,
    /// Every non-noop action submitted this episode, latest per entity.
    pub action_intent: ActionTrails,
    /// Actions that passed validation, latest per entity.
    pub action_applied: ActionTrails,
    /// Why this agent's last action was downgraded to a no-op.
    pub last_rejection: Option<String>,
    pub termination_cause: Option<TerminationCause>,
    pub backend_victory: Option<Faction>,
}

impl StepInfo {
    /// Whether `entity_id` had an action applied at `step`.
    pub fn applied_at(&self, entity_id: i64, step: u64) -> bool {
        self.action_applied
            .get(&entity_id)
            .is_some_and(|t| t.step == step)
    }

    /// Whether an action addressed to `entity_id` was submitted at `step`.
    pub fn intended_at(&self, entity_id: i64, step: u64) -> bool {
        self.action_intent
            .get(&entity_id)
            .is_some_and(|t| t.step == step)
    }
}
