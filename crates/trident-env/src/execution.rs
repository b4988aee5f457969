//! Action execution: validated actions to backend commands.

use trident_core::commands::Command;

use crate::validation::ValidatedAction;
use crate::weapons;

/// Engagements always commit at full throttle.
pub const ENGAGE_THROTTLE: f64 = 1.0;

/// Weapon engagement zone scale used for every commit.
pub const WEZ_SCALE: f64 = 1.0;

/// Commands for one validated action. A no-op produces none.
pub fn commands_for(action: &ValidatedAction) -> Vec<Command> {
    match action {
        ValidatedAction::Noop => Vec::new(),
        ValidatedAction::Move {
            entity,
            center,
            axis_short,
            axis_long,
            angle,
        } => vec![Command::PatrolRaceTrack {
            entity: *entity,
            center: *center,
            axis_long: *axis_long,
            axis_short: *axis_short,
            angle: *angle,
        }],
        ValidatedAction::Engage {
            entity,
            target,
            available,
            selection,
            usage,
            posture,
        } => vec![Command::CommitWeapons {
            entity: *entity,
            target: *target,
            weapons: weapons::select(available, *selection),
            usage: *usage,
            posture: *posture,
            throttle: ENGAGE_THROTTLE,
            wez_scale: WEZ_SCALE,
        }],
        ValidatedAction::Stealth { entity, enabled } => vec![Command::SetRadarStrength {
            entity: *entity,
            strength: if *enabled { 0.0 } else { 1.0 },
        }],
        ValidatedAction::Sense { entity, focus } => match focus {
            Some(focus) => vec![Command::SetRadarFocus {
                entity: *entity,
                focus: *focus,
            }],
            None => vec![Command::ClearRadarFocus { entity: *entity }],
        },
        ValidatedAction::Capture { entity, flag } => vec![Command::CaptureFlag {
            entity: *entity,
            flag: *flag,
        }],
        ValidatedAction::ReturnToBase { entity, flag } => vec![Command::ReturnToBase {
            entity: *entity,
            flag: *flag,
        }],
        ValidatedAction::Refuel { receiver, provider } => vec![Command::Refuel {
            receiver: *receiver,
            provider: *provider,
        }],
    }
}
