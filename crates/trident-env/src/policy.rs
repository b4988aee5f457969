//! Scripted baseline policies.
//!
//! Policies see exactly what a learning agent sees: its observation vector
//! and its step info. They are used by the adjudication binary and by tests
//! that need a side to do something purposeful.

use std::collections::BTreeSet;

use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use trident_core::action::Action;
use trident_core::config::EnvConfig;
use trident_core::constants::{ENTITY_FEATURES, GLOBAL_FEATURES};
use trident_core::enums::{ActionKind, EngagementPosture, WeaponUsage};

use crate::info::StepInfo;

// Entity-block offsets read by the scripted policies.
const SLOT_PRESENT: usize = 0;
const SLOT_AIR: usize = 1;
const SLOT_CAN_CAPTURE: usize = 5;
const SLOT_ALIVE: usize = 14;

pub trait Policy {
    fn act(&mut self, observation: &[f32], info: &StepInfo) -> Action;

    /// Forget per-episode state.
    fn reset(&mut self) {}

    fn name(&self) -> &'static str;
}

/// Build a policy by name: `noop`, `random` or `capture-rush`.
pub fn by_name(name: &str, seed: u64, config: &EnvConfig) -> Option<Box<dyn Policy>> {
    match name {
        "noop" => Some(Box::new(NoopPolicy)),
        "random" => Some(Box::new(RandomValidPolicy::new(seed, config))),
        "capture-rush" => Some(Box::new(CaptureRushPolicy::new())),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPolicy;

impl Policy for NoopPolicy {
    fn act(&mut self, _observation: &[f32], _info: &StepInfo) -> Action {
        Action::noop()
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}

/// Uniform choices restricted to what the valid masks allow.
#[derive(Debug, Clone)]
pub struct RandomValidPolicy {
    rng: ChaCha8Rng,
    seed: u64,
    grid_cells: i64,
    patrol_steps: i64,
    angle_steps: i64,
}

impl RandomValidPolicy {
    pub fn new(seed: u64, config: &EnvConfig) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            grid_cells: config.grid_cell_count() as i64,
            patrol_steps: config.patrol_steps().max(1) as i64,
            angle_steps: config.angle_steps().max(1) as i64,
        }
    }

    fn pick<T: Copy>(&mut self, set: &BTreeSet<T>) -> Option<T> {
        set.iter().copied().choose(&mut self.rng)
    }
}

impl Policy for RandomValidPolicy {
    fn act(&mut self, _observation: &[f32], info: &StepInfo) -> Action {
        let masks = &info.valid_masks;
        let Some(kind) = self
            .pick(&masks.action_types)
            .and_then(|k| ActionKind::from_index(i64::from(k)))
        else {
            return Action::noop();
        };

        match kind {
            ActionKind::Noop => Action::noop(),
            ActionKind::Engage => {
                let Some((entity, targets)) =
                    masks.entity_target_matrix.iter().choose(&mut self.rng)
                else {
                    return Action::noop();
                };
                let Some(target) = targets.iter().copied().choose(&mut self.rng) else {
                    return Action::noop();
                };
                Action {
                    target_group_id: i64::from(target),
                    weapon_selection: 0,
                    weapon_usage: self.rng.gen_range(0..3),
                    weapon_engagement: self.rng.gen_range(0..4),
                    ..Action::new(kind, i64::from(*entity))
                }
            }
            ActionKind::Refuel => {
                let refuel = &info.refuel_masks;
                match (self.pick(&refuel.receivers), self.pick(&refuel.providers)) {
                    (Some(receiver), Some(provider)) => Action {
                        refuel_target_id: i64::from(provider),
                        ..Action::new(kind, i64::from(receiver))
                    },
                    _ => Action::noop(),
                }
            }
            _ => {
                let Some(entity) = self.pick(&masks.controllable_entities) else {
                    return Action::noop();
                };
                let mut action = Action::new(kind, i64::from(entity));
                match kind {
                    ActionKind::Move => {
                        action.move_center_grid = self.rng.gen_range(0..self.grid_cells.max(1));
                        action.move_short_axis_km = self.rng.gen_range(0..self.patrol_steps);
                        action.move_long_axis_km = self.rng.gen_range(0..self.patrol_steps);
                        action.move_axis_angle = self.rng.gen_range(0..self.angle_steps);
                    }
                    ActionKind::Stealth => action.stealth_enabled = self.rng.gen_range(0..2),
                    ActionKind::SensingPosition => {
                        action.sensing_position_grid = self.rng.gen_range(0..=self.grid_cells);
                    }
                    _ => {}
                }
                action
            }
        }
    }

    fn reset(&mut self) {
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Sends every capture-capable aircraft to the island, then engages
/// whatever it can see.
#[derive(Debug, Clone, Default)]
pub struct CaptureRushPolicy {
    ordered: BTreeSet<u32>,
    engaged: BTreeSet<(u32, u32)>,
}

impl CaptureRushPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live capture-capable aircraft, read from the entity blocks.
    fn capture_candidates(observation: &[f32], info: &StepInfo) -> Vec<u32> {
        info.valid_masks
            .controllable_entities
            .iter()
            .copied()
            .filter(|&id| {
                let start = GLOBAL_FEATURES + id as usize * ENTITY_FEATURES;
                observation
                    .get(start..start + ENTITY_FEATURES)
                    .is_some_and(|block| {
                        [SLOT_PRESENT, SLOT_AIR, SLOT_CAN_CAPTURE, SLOT_ALIVE]
                            .iter()
                            .all(|&i| block[i] > 0.5)
                    })
            })
            .collect()
    }
}

impl Policy for CaptureRushPolicy {
    fn act(&mut self, observation: &[f32], info: &StepInfo) -> Action {
        let capture_allowed = info
            .valid_masks
            .action_types
            .contains(&ActionKind::Capture.index());
        if capture_allowed {
            let next = Self::capture_candidates(observation, info)
                .into_iter()
                .find(|id| !self.ordered.contains(id));
            if let Some(id) = next {
                self.ordered.insert(id);
                return Action::new(ActionKind::Capture, i64::from(id));
            }
        }

        let pair = info
            .valid_masks
            .entity_target_matrix
            .iter()
            .filter(|(entity, _)| !self.ordered.contains(entity))
            .flat_map(|(entity, targets)| targets.iter().map(move |t| (*entity, *t)))
            .find(|pair| !self.engaged.contains(pair));
        match pair {
            Some((entity, target)) => {
                self.engaged.insert((entity, target));
                Action {
                    target_group_id: i64::from(target),
                    weapon_selection: 0,
                    weapon_usage: WeaponUsage::OneShotPerAdversary as i64,
                    weapon_engagement: EngagementPosture::Assertive as i64,
                    ..Action::new(ActionKind::Engage, i64::from(entity))
                }
            }
            None => Action::noop(),
        }
    }

    fn reset(&mut self) {
        self.ordered.clear();
        self.engaged.clear();
    }

    fn name(&self) -> &'static str {
        "capture-rush"
    }
}
