//! Action validation.
//!
//! Checks one agent's raw action against that agent's registries, the
//! shared flag board and the environment configuration. A valid action is
//! returned decoded; an invalid one yields a [`Rejection`] naming the first
//! failed precondition. Rejections are not errors: the environment treats
//! them as a no-op for the step.

use thiserror::Error;

use trident_core::action::Action;
use trident_core::backend::SimulationBackend;
use trident_core::config::EnvConfig;
use trident_core::entity::EntityState;
use trident_core::enums::{ActionKind, Domain, EngagementPosture, Faction, WeaponUsage};
use trident_core::types::{EntityHandle, FlagHandle, Position, TargetGroupHandle, WeaponId};

use crate::agent::FactionAgent;
use crate::flags::FlagBoard;
use crate::weapons;

/// Everything the validator may look at for one agent.
pub struct ActionContext<'a> {
    pub agent: &'a FactionAgent,
    pub flags: &'a FlagBoard,
    pub backend: &'a dyn SimulationBackend,
    pub config: &'a EnvConfig,
}

impl ActionContext<'_> {
    pub fn faction(&self) -> Faction {
        self.agent.faction()
    }
}

/// A fully checked and decoded action.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatedAction {
    Noop,
    Move {
        entity: EntityHandle,
        center: Position,
        axis_short: f64,
        axis_long: f64,
        angle: f64,
    },
    Engage {
        entity: EntityHandle,
        target: TargetGroupHandle,
        /// Compatible weapons at validation time, in mount order.
        available: Vec<WeaponId>,
        selection: i64,
        usage: WeaponUsage,
        posture: EngagementPosture,
    },
    Stealth {
        entity: EntityHandle,
        enabled: bool,
    },
    /// `focus` of `None` resets to default forward sensing.
    Sense {
        entity: EntityHandle,
        focus: Option<Position>,
    },
    Capture {
        entity: EntityHandle,
        flag: FlagHandle,
    },
    ReturnToBase {
        entity: EntityHandle,
        flag: FlagHandle,
    },
    Refuel {
        receiver: EntityHandle,
        provider: EntityHandle,
    },
}

impl ValidatedAction {
    pub fn is_noop(&self) -> bool {
        matches!(self, ValidatedAction::Noop)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("unknown action type {0}")]
    UnknownActionType(i64),
    #[error("entity {0} is not a live controllable unit of the acting faction")]
    UnknownEntity(i64),
    #[error("entity {0} is not an air unit")]
    NotAirborne(i64),
    #[error("grid index {0} is outside the grid")]
    GridIndexOutOfRange(i64),
    #[error("grid cell {0} lies outside the map bounds")]
    OutOfBounds(i64),
    #[error("target group {0} is not visible to the acting faction")]
    UnknownTargetGroup(i64),
    #[error("target group {0} is a friendly force")]
    FriendlyTarget(i64),
    #[error("entity {entity} has no weapon able to engage target group {target}")]
    NoCompatibleWeapon { entity: i64, target: i64 },
    #[error("weapon selection {selection} is invalid for {available} available weapons")]
    InvalidWeaponSelection { selection: i64, available: usize },
    #[error("weapon usage {0} is undefined")]
    InvalidWeaponUsage(i64),
    #[error("engagement posture {0} is undefined")]
    InvalidPosture(i64),
    #[error("entity {0} has no radar")]
    NoRadar(i64),
    #[error("entity {0} cannot capture")]
    CannotCapture(i64),
    #[error("no {0:?} flag on the board")]
    MissingFlag(Faction),
    #[error("flag belongs to {0:?}")]
    WrongFlagFaction(Faction),
    #[error("refuel target {0} is not a unit of the acting faction")]
    UnknownRefuelTarget(i64),
    #[error("entity {0} cannot receive fuel")]
    CannotReceiveFuel(i64),
    #[error("entity {0} cannot provide fuel")]
    CannotProvideFuel(i64),
    #[error("entity {0} cannot refuel from itself")]
    SelfRefuel(i64),
}

pub fn validate(action: &Action, ctx: &ActionContext<'_>) -> Result<ValidatedAction, Rejection> {
    let kind = action
        .kind()
        .ok_or(Rejection::UnknownActionType(action.action_type))?;
    if kind == ActionKind::Noop {
        return Ok(ValidatedAction::Noop);
    }

    let entity = acting_entity(action.entity_id, ctx)?;
    let id = action.entity_id;
    match kind {
        ActionKind::Noop => Ok(ValidatedAction::Noop),
        ActionKind::Move => validate_move(action, &entity, ctx),
        ActionKind::Engage => validate_engage(action, &entity, ctx),
        ActionKind::Stealth => {
            if !entity.capabilities.radar {
                return Err(Rejection::NoRadar(id));
            }
            Ok(ValidatedAction::Stealth {
                entity: entity.handle,
                enabled: action.stealth_enabled != 0,
            })
        }
        ActionKind::SensingPosition => validate_sense(action, &entity, ctx),
        ActionKind::Capture => {
            require_air(&entity, id)?;
            let flag = ctx
                .flags
                .neutral()
                .ok_or(Rejection::MissingFlag(Faction::Neutral))?;
            if flag.faction != Faction::Neutral {
                return Err(Rejection::WrongFlagFaction(flag.faction));
            }
            if !entity.capabilities.capture {
                return Err(Rejection::CannotCapture(id));
            }
            Ok(ValidatedAction::Capture {
                entity: entity.handle,
                flag: flag.handle,
            })
        }
        ActionKind::ReturnToBase => {
            require_air(&entity, id)?;
            let flag = ctx
                .flags
                .home(entity.faction)
                .ok_or(Rejection::MissingFlag(entity.faction))?;
            if flag.faction != entity.faction {
                return Err(Rejection::WrongFlagFaction(flag.faction));
            }
            Ok(ValidatedAction::ReturnToBase {
                entity: entity.handle,
                flag: flag.handle,
            })
        }
        ActionKind::Refuel => {
            let target_id = action.refuel_target_id;
            let provider = ctx
                .agent
                .entity_by_id(ctx.backend, target_id)
                .filter(|p| p.alive && p.faction == entity.faction)
                .ok_or(Rejection::UnknownRefuelTarget(target_id))?;
            if provider.handle == entity.handle {
                return Err(Rejection::SelfRefuel(id));
            }
            if !entity.capabilities.refuel_receiver {
                return Err(Rejection::CannotReceiveFuel(id));
            }
            if !provider.capabilities.refuel_provider {
                return Err(Rejection::CannotProvideFuel(target_id));
            }
            Ok(ValidatedAction::Refuel {
                receiver: entity.handle,
                provider: provider.handle,
            })
        }
    }
}

/// Resolve the acting unit: tracked, live, controllable and ours.
fn acting_entity(id: i64, ctx: &ActionContext<'_>) -> Result<EntityState, Rejection> {
    ctx.agent
        .entity_by_id(ctx.backend, id)
        .filter(|e| e.alive && e.controllable && e.faction == ctx.faction())
        .ok_or(Rejection::UnknownEntity(id))
}

fn require_air(entity: &EntityState, id: i64) -> Result<(), Rejection> {
    if entity.domain == Domain::Air {
        Ok(())
    } else {
        Err(Rejection::NotAirborne(id))
    }
}

/// Decode an in-grid cell index to an in-bounds world position.
fn grid_position(index: i64, ctx: &ActionContext<'_>) -> Result<Position, Rejection> {
    let cell = usize::try_from(index)
        .ok()
        .filter(|c| *c < ctx.config.grid_cell_count())
        .ok_or(Rejection::GridIndexOutOfRange(index))?;
    let position = ctx.config.grid_to_position(cell);
    if !ctx.config.in_bounds(&position) {
        return Err(Rejection::OutOfBounds(index));
    }
    Ok(position)
}

fn validate_move(
    action: &Action,
    entity: &EntityState,
    ctx: &ActionContext<'_>,
) -> Result<ValidatedAction, Rejection> {
    require_air(entity, action.entity_id)?;
    let mut center = grid_position(action.move_center_grid, ctx)?;
    center.z = entity.position.z;

    let clamp_index = |raw: i64, steps: usize| -> usize {
        usize::try_from(raw.max(0))
            .unwrap_or(0)
            .min(steps.saturating_sub(1))
    };
    let patrol_steps = ctx.config.patrol_steps();
    Ok(ValidatedAction::Move {
        entity: entity.handle,
        center,
        axis_short: ctx
            .config
            .patrol_axis_m(clamp_index(action.move_short_axis_km, patrol_steps)),
        axis_long: ctx
            .config
            .patrol_axis_m(clamp_index(action.move_long_axis_km, patrol_steps)),
        angle: ctx
            .config
            .patrol_angle_rad(clamp_index(action.move_axis_angle, ctx.config.angle_steps())),
    })
}

fn validate_engage(
    action: &Action,
    entity: &EntityState,
    ctx: &ActionContext<'_>,
) -> Result<ValidatedAction, Rejection> {
    let target_id = action.target_group_id;
    let group = ctx
        .agent
        .target_group_by_id(ctx.backend, target_id)
        .ok_or(Rejection::UnknownTargetGroup(target_id))?;
    if group.observed_faction == ctx.faction() {
        return Err(Rejection::FriendlyTarget(target_id));
    }

    let available = ctx.backend.select_weapons(entity.handle, group.handle);
    if available.is_empty() {
        return Err(Rejection::NoCompatibleWeapon {
            entity: action.entity_id,
            target: target_id,
        });
    }
    if !weapons::is_valid_selection(available.len(), action.weapon_selection) {
        return Err(Rejection::InvalidWeaponSelection {
            selection: action.weapon_selection,
            available: available.len(),
        });
    }
    let usage = WeaponUsage::from_index(action.weapon_usage)
        .ok_or(Rejection::InvalidWeaponUsage(action.weapon_usage))?;
    let posture = EngagementPosture::from_index(action.weapon_engagement)
        .ok_or(Rejection::InvalidPosture(action.weapon_engagement))?;

    Ok(ValidatedAction::Engage {
        entity: entity.handle,
        target: group.handle,
        available,
        selection: action.weapon_selection,
        usage,
        posture,
    })
}

fn validate_sense(
    action: &Action,
    entity: &EntityState,
    ctx: &ActionContext<'_>,
) -> Result<ValidatedAction, Rejection> {
    let index = action.sensing_position_grid;
    let cells = ctx.config.grid_cell_count();
    // One past the last cell resets sensing and skips every other check.
    if usize::try_from(index).is_ok_and(|i| i == cells) {
        return Ok(ValidatedAction::Sense {
            entity: entity.handle,
            focus: None,
        });
    }
    if !entity.capabilities.radar {
        return Err(Rejection::NoRadar(action.entity_id));
    }
    let mut focus = grid_position(index, ctx)?;
    focus.z = entity.position.z;
    Ok(ValidatedAction::Sense {
        entity: entity.handle,
        focus: Some(focus),
    })
}
