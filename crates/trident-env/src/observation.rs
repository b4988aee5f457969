//! Observation builder.
//!
//! Layout: a block of global scalars, then one fixed-size block per entity
//! slot and one per target-group slot. Slots are indexed by the agent's
//! registry IDs, so observation slot `i` describes the unit an action
//! addresses as `entity_id = i`. Unused slots are zero. Every value is
//! finite and clipped to [0, 1].

use std::f64::consts::TAU;

use trident_core::backend::SimulationBackend;
use trident_core::config::EnvConfig;
use trident_core::constants::*;
use trident_core::entity::{EntityState, TargetGroupState};
use trident_core::enums::{Domain, Faction};
use trident_core::types::Position;

use crate::agent::FactionAgent;
use crate::flags::FlagBoard;
use crate::metrics::MissionMetrics;

pub struct ObservationContext<'a> {
    pub agent: &'a FactionAgent,
    pub backend: &'a dyn SimulationBackend,
    pub metrics: &'a MissionMetrics,
    pub flags: &'a FlagBoard,
    pub config: &'a EnvConfig,
    pub time_elapsed: f64,
}

/// Clip to [0, 1], mapping NaN and infinities to zero.
fn unit(value: f64) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0) as f32
    } else {
        0.0
    }
}

fn flag(value: bool) -> f32 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Guarded ratio: the denominator is floored at one.
fn fraction(numerator: f64, denominator: f64) -> f64 {
    numerator / denominator.max(1.0)
}

fn domain_one_hot(domain: Domain) -> [f32; 3] {
    match domain {
        Domain::Air => [1.0, 0.0, 0.0],
        Domain::Surface => [0.0, 1.0, 0.0],
        Domain::Land => [0.0, 0.0, 1.0],
    }
}

struct Geometry {
    half_w: f64,
    half_h: f64,
    diagonal: f64,
    island: Position,
}

impl Geometry {
    fn new(config: &EnvConfig, flags: &FlagBoard) -> Self {
        let half_w = config.half_width_m().max(1.0);
        let half_h = config.half_height_m().max(1.0);
        Self {
            half_w,
            half_h,
            diagonal: 2.0 * (half_w * half_w + half_h * half_h).sqrt(),
            island: flags.neutral().map(|f| f.position).unwrap_or_default(),
        }
    }

    fn x(&self, p: &Position) -> f32 {
        unit((p.x + self.half_w) / (2.0 * self.half_w))
    }

    fn y(&self, p: &Position) -> f32 {
        unit((p.y + self.half_h) / (2.0 * self.half_h))
    }

    fn distance(&self, a: &Position, b: &Position) -> f32 {
        unit(a.horizontal_range_to(b) / self.diagonal)
    }
}

pub fn build(ctx: &ObservationContext<'_>) -> Vec<f32> {
    let config = ctx.config;
    let len = GLOBAL_FEATURES
        + ENTITY_FEATURES * config.max_entities
        + TARGET_GROUP_FEATURES * config.max_target_groups;
    let mut obs = Vec::with_capacity(len);
    let geo = Geometry::new(config, ctx.flags);

    let entities = ctx.agent.tracked_entities(ctx.backend);
    let groups = ctx.agent.visible_target_groups(ctx.backend);

    obs.extend(global_block(ctx, &entities, &geo));

    let mut entity_slots = vec![[0.0_f32; ENTITY_FEATURES]; config.max_entities];
    for (id, state) in &entities {
        if let Some(slot) = entity_slots.get_mut(*id as usize) {
            *slot = entity_block(ctx, state, &geo);
        }
    }
    obs.extend(entity_slots.into_iter().flatten());

    let mut group_slots = vec![[0.0_f32; TARGET_GROUP_FEATURES]; config.max_target_groups];
    for (id, group) in &groups {
        if let Some(slot) = group_slots.get_mut(*id as usize) {
            *slot = group_block(group, &entities, &geo);
        }
    }
    obs.extend(group_slots.into_iter().flatten());

    debug_assert_eq!(obs.len(), len);
    obs
}

fn global_block(
    ctx: &ObservationContext<'_>,
    entities: &[(u32, EntityState)],
    geo: &Geometry,
) -> [f32; GLOBAL_FEATURES] {
    let config = ctx.config;
    let m = ctx.metrics;
    let faction = ctx.agent.faction();
    let enemy = faction.opponent().unwrap_or(Faction::Neutral);
    let max_entities = config.max_entities as f64;
    let required = config.capture_required_seconds.max(f64::EPSILON);
    let sensor_alive = entities
        .iter()
        .any(|(_, s)| s.alive && s.capabilities.long_range_sensor);
    let enemy_progress = if enemy.is_combatant() {
        m.capture_progress[enemy]
    } else {
        0.0
    };
    let enemy_possible = enemy.is_combatant() && m.capture_possible[enemy];

    [
        unit(1.0 - ctx.time_elapsed / config.max_game_time.max(f64::EPSILON)),
        unit(fraction(m.casualties(faction) as f64, max_entities)),
        unit(fraction(m.kills(faction) as f64, max_entities)),
        unit(m.kill_ratio(faction) / config.kill_ratio_threshold.max(f64::EPSILON)),
        flag(sensor_alive),
        unit(m.capture_progress[faction] / required),
        unit(enemy_progress / required),
        flag(m.island_contested),
        flag(m.capture_possible[faction]),
        flag(enemy_possible),
        geo.x(&geo.island),
        geo.y(&geo.island),
    ]
}

fn entity_block(
    ctx: &ObservationContext<'_>,
    s: &EntityState,
    geo: &Geometry,
) -> [f32; ENTITY_FEATURES] {
    let config = ctx.config;
    let [air, surface, land] = domain_one_hot(s.domain);
    let caps = s.capabilities;
    let loaded = s.weapons.iter().filter(|w| w.ammo > 0).count();

    let engaged = s
        .engaged_group
        .and_then(|h| ctx.agent.target_groups.id_of(h).map(|id| (id, h)));
    let (engaged_id, engaged_dist) = match engaged {
        Some((id, handle)) => (
            unit(fraction(f64::from(id) + 1.0, config.max_target_groups as f64)),
            ctx.backend
                .target_group(handle)
                .map(|g| geo.distance(&s.position, &g.position))
                .unwrap_or(0.0),
        ),
        None => (0.0, 0.0),
    };
    let (focus_x, focus_y) = match &s.radar_focus {
        Some(p) => (geo.x(p), geo.y(p)),
        None => (0.0, 0.0),
    };

    [
        // identity
        1.0,
        air,
        surface,
        land,
        flag(caps.radar),
        flag(caps.capture),
        flag(caps.refuel_receiver || caps.refuel_provider),
        // kinematics
        geo.x(&s.position),
        geo.y(&s.position),
        unit(s.position.z / MAX_ALTITUDE),
        unit(s.speed / MAX_SPEED),
        unit(s.heading.rem_euclid(TAU) / TAU),
        // egocentric
        geo.distance(&s.position, &geo.island),
        unit(s.position.bearing_to(&geo.island) / TAU),
        // status
        flag(s.alive),
        unit(s.fuel_fraction),
        flag(s.radar_enabled),
        flag(s.capturing),
        // weapons
        unit(fraction(f64::from(s.total_ammo()), f64::from(config.max_ammo))),
        unit(fraction(loaded as f64, f64::from(config.max_weapons))),
        flag(s.can_engage()),
        // engagement
        flag(engaged.is_some()),
        engaged_id,
        engaged_dist,
        flag(s.radar_focus.is_some()),
        focus_x,
        focus_y,
    ]
}

fn group_block(
    g: &TargetGroupState,
    entities: &[(u32, EntityState)],
    geo: &Geometry,
) -> [f32; TARGET_GROUP_FEATURES] {
    let [air, surface, land] = domain_one_hot(g.domain);
    let nearest = entities
        .iter()
        .filter(|(_, s)| s.alive)
        .map(|(_, s)| s.position.horizontal_range_to(&g.position))
        .fold(f64::INFINITY, f64::min);
    let nearest = if nearest.is_finite() {
        unit(nearest / geo.diagonal)
    } else {
        1.0
    };
    [
        1.0,
        air,
        surface,
        land,
        geo.x(&g.position),
        geo.y(&g.position),
        unit(g.position.z / MAX_ALTITUDE),
        unit(f64::from(g.num_known_alive_units) / MAX_GROUP_UNITS),
        geo.distance(&g.position, &geo.island),
        nearest,
    ]
}
