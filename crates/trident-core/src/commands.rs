//! Commands issued by the environment to the simulation backend.

use serde::{Deserialize, Serialize};

use crate::enums::{EngagementPosture, WeaponUsage};
use crate::types::{EntityHandle, FlagHandle, Position, TargetGroupHandle, WeaponId};

/// All commands the environment can send to a backend in one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    /// Fly a racetrack pattern centered on `center`.
    PatrolRaceTrack {
        entity: EntityHandle,
        center: Position,
        /// Long axis length in meters.
        axis_long: f64,
        /// Short axis length in meters.
        axis_short: f64,
        /// Orientation of the long axis in radians (0 = North, clockwise).
        angle: f64,
    },
    /// Commit weapons against a detected group.
    CommitWeapons {
        entity: EntityHandle,
        target: TargetGroupHandle,
        weapons: Vec<WeaponId>,
        usage: WeaponUsage,
        posture: EngagementPosture,
        throttle: f64,
        wez_scale: f64,
    },
    /// Set emitter strength in [0, 1]. Zero means stealth.
    SetRadarStrength { entity: EntityHandle, strength: f64 },
    SetRadarFocus { entity: EntityHandle, focus: Position },
    ClearRadarFocus { entity: EntityHandle },
    CaptureFlag { entity: EntityHandle, flag: FlagHandle },
    ReturnToBase { entity: EntityHandle, flag: FlagHandle },
    Refuel {
        receiver: EntityHandle,
        provider: EntityHandle,
    },
}

impl Command {
    /// The unit this command is addressed to.
    pub fn entity(&self) -> EntityHandle {
        match self {
            Command::PatrolRaceTrack { entity, .. }
            | Command::CommitWeapons { entity, .. }
            | Command::SetRadarStrength { entity, .. }
            | Command::SetRadarFocus { entity, .. }
            | Command::ClearRadarFocus { entity }
            | Command::CaptureFlag { entity, .. }
            | Command::ReturnToBase { entity, .. } => *entity,
            Command::Refuel { receiver, .. } => *receiver,
        }
    }
}
