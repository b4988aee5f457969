//! Sandbox tuning parameters.

/// Distance below which a moving unit is considered to have arrived (meters).
pub const ARRIVAL_RADIUS: f64 = 1_000.0;

/// A capture-capable unit within this distance of a flag is capturing it.
pub const FLAG_CAPTURE_RADIUS: f64 = 2_000.0;

/// Unaided detection range against any unit (meters).
pub const VISUAL_RANGE: f64 = 10_000.0;

/// Radar range multiplier against a target whose own radar is silent.
pub const STEALTH_DETECTION_FACTOR: f64 = 0.6;

/// Radar range multiplier for targets near the radar's focus point.
pub const FOCUS_RANGE_BONUS: f64 = 1.25;

/// Radius around a focus point that receives the focus bonus (meters).
pub const FOCUS_RADIUS: f64 = 30_000.0;

/// Dead units remain in the world this many frames before despawn.
/// Must exceed one environment step so deaths are observed before removal.
pub const CORPSE_RETENTION_FRAMES: u64 = 1_800;

/// Fraction of max speed used on patrol.
pub const PATROL_THROTTLE: f64 = 0.7;

/// Engage orders close to this fraction of the shortest selected weapon range.
pub const ENGAGE_STANDOFF_FRACTION: f64 = 0.8;

/// Initial combat air patrol axis bounds (meters).
pub const INITIAL_PATROL_MIN_AXIS: f64 = 20_000.0;
pub const INITIAL_PATROL_MAX_AXIS: f64 = 40_000.0;

/// Air units spawn between these altitudes (meters).
pub const AIR_MIN_ALTITUDE: f64 = 6_000.0;
pub const AIR_MAX_ALTITUDE: f64 = 9_000.0;

/// Single-shot kill probability by engagement posture.
pub const PK_DEFENSIVE: f64 = 0.4;
pub const PK_CAUTIOUS: f64 = 0.5;
pub const PK_ASSERTIVE: f64 = 0.6;
pub const PK_AGGRESSIVE: f64 = 0.7;
