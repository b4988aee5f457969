//! The 13-field discrete action record and the spaces agents act in.

use serde::{Deserialize, Serialize};

use crate::config::EnvConfig;
use crate::constants::{
    ENTITY_FEATURES, GLOBAL_FEATURES, NUM_ACTION_KINDS, NUM_ENGAGEMENT_POSTURES,
    NUM_WEAPON_USAGES, TARGET_GROUP_FEATURES,
};
use crate::enums::ActionKind;

/// One agent's action for one step.
///
/// Fields are raw indices as produced by a policy; nothing here is trusted
/// until the environment validates it. The default value is a no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Action {
    pub action_type: i64,
    pub entity_id: i64,
    pub move_center_grid: i64,
    pub move_short_axis_km: i64,
    pub move_long_axis_km: i64,
    pub move_axis_angle: i64,
    pub target_group_id: i64,
    pub weapon_selection: i64,
    pub weapon_usage: i64,
    pub weapon_engagement: i64,
    pub stealth_enabled: i64,
    pub sensing_position_grid: i64,
    pub refuel_target_id: i64,
}

impl Action {
    pub fn noop() -> Self {
        Self::default()
    }

    /// Start an action of the given kind addressed to `entity_id`.
    pub fn new(kind: ActionKind, entity_id: i64) -> Self {
        Self {
            action_type: i64::from(kind.index()),
            entity_id,
            ..Self::default()
        }
    }

    pub fn kind(&self) -> Option<ActionKind> {
        ActionKind::from_index(self.action_type)
    }

    /// Field values in schema order.
    pub fn to_array(&self) -> [i64; 13] {
        [
            self.action_type,
            self.entity_id,
            self.move_center_grid,
            self.move_short_axis_km,
            self.move_long_axis_km,
            self.move_axis_angle,
            self.target_group_id,
            self.weapon_selection,
            self.weapon_usage,
            self.weapon_engagement,
            self.stealth_enabled,
            self.sensing_position_grid,
            self.refuel_target_id,
        ]
    }

    pub fn from_array(values: [i64; 13]) -> Self {
        Self {
            action_type: values[0],
            entity_id: values[1],
            move_center_grid: values[2],
            move_short_axis_km: values[3],
            move_long_axis_km: values[4],
            move_axis_angle: values[5],
            target_group_id: values[6],
            weapon_selection: values[7],
            weapon_usage: values[8],
            weapon_engagement: values[9],
            stealth_enabled: values[10],
            sensing_position_grid: values[11],
            refuel_target_id: values[12],
        }
    }
}

/// One bounded discrete field of the action schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionField {
    pub name: String,
    /// Number of values; valid indices are `0..n`.
    pub n: u64,
}

/// Multi-discrete action space with one bound per action field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSpace {
    pub fields: Vec<ActionField>,
}

impl ActionSpace {
    pub fn from_config(config: &EnvConfig) -> Self {
        let cells = config.grid_cell_count() as u64;
        let entities = config.max_entities as u64;
        let patrol = config.patrol_steps() as u64;
        let spec: [(&str, u64); 13] = [
            ("action_type", NUM_ACTION_KINDS),
            ("entity_id", entities),
            ("move_center_grid", cells),
            ("move_short_axis_km", patrol),
            ("move_long_axis_km", patrol),
            ("move_axis_angle", config.angle_steps() as u64),
            ("target_group_id", config.max_target_groups as u64),
            ("weapon_selection", config.max_weapon_combinations()),
            ("weapon_usage", NUM_WEAPON_USAGES),
            ("weapon_engagement", NUM_ENGAGEMENT_POSTURES),
            ("stealth_enabled", 2),
            // The extra index resets sensing to its default.
            ("sensing_position_grid", cells + 1),
            ("refuel_target_id", entities),
        ];
        Self {
            fields: spec
                .iter()
                .map(|(name, n)| ActionField {
                    name: (*name).to_string(),
                    n: *n,
                })
                .collect(),
        }
    }

    pub fn nvec(&self) -> Vec<u64> {
        self.fields.iter().map(|f| f.n).collect()
    }

    /// Whether every field lies inside its bound.
    pub fn contains(&self, action: &Action) -> bool {
        action
            .to_array()
            .iter()
            .zip(&self.fields)
            .all(|(v, f)| u64::try_from(*v).is_ok_and(|v| v < f.n))
    }
}

/// Box observation space: a flat vector in `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservationSpace {
    pub len: usize,
    pub low: f32,
    pub high: f32,
}

impl ObservationSpace {
    pub fn from_config(config: &EnvConfig) -> Self {
        Self {
            len: GLOBAL_FEATURES
                + ENTITY_FEATURES * config.max_entities
                + TARGET_GROUP_FEATURES * config.max_target_groups,
            low: 0.0,
            high: 1.0,
        }
    }

    pub fn contains(&self, observation: &[f32]) -> bool {
        observation.len() == self.len
            && observation
                .iter()
                .all(|v| v.is_finite() && *v >= self.low && *v <= self.high)
    }
}
