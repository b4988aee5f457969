//! Per-step reward shaping.
//!
//! The environment's own reward is the zero-sum terminal component. Any
//! dense shaping is supplied per agent through [`RewardShaper`] and added on
//! top every step.

use trident_core::enums::{Faction, Outcome};

use crate::metrics::MissionMetrics;

/// Read-only view of the step just completed.
pub struct RewardContext<'a> {
    pub faction: Faction,
    pub step: u64,
    pub time_elapsed: f64,
    pub metrics: &'a MissionMetrics,
    pub outcome: Outcome,
    /// Whether this agent's action passed validation this step.
    pub action_applied: bool,
}

pub trait RewardShaper {
    fn step_reward(&self, _ctx: &RewardContext<'_>) -> f64 {
        0.0
    }
}

/// No shaping: terminal reward only.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroShaping;

impl RewardShaper for ZeroShaping {}

/// Small bonus for own capture progress, penalty for the opponent's.
#[derive(Debug, Clone, Copy)]
pub struct CaptureProgressShaping {
    pub weight: f64,
}

impl RewardShaper for CaptureProgressShaping {
    fn step_reward(&self, ctx: &RewardContext<'_>) -> f64 {
        let own = ctx.metrics.capture_progress[ctx.faction];
        let enemy = ctx
            .faction
            .opponent()
            .map_or(0.0, |f| ctx.metrics.capture_progress[f]);
        match own.partial_cmp(&enemy) {
            Some(std::cmp::Ordering::Greater) => self.weight,
            Some(std::cmp::Ordering::Less) => -self.weight,
            _ => 0.0,
        }
    }
}
