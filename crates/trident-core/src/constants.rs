//! Environment constants and normalisation parameters.

/// Backend frames per second of mission time.
pub const FRAMES_PER_SECOND: f64 = 60.0;

/// Number of discrete action kinds.
pub const NUM_ACTION_KINDS: u64 = 8;

/// Number of weapon-usage modes.
pub const NUM_WEAPON_USAGES: u64 = 3;

/// Number of engagement postures.
pub const NUM_ENGAGEMENT_POSTURES: u64 = 4;

// --- Observation layout ---

/// Global scalars at the head of every observation.
pub const GLOBAL_FEATURES: usize = 12;

/// Features per controllable-entity slot.
pub const ENTITY_FEATURES: usize = 27;

/// Features per target-group slot.
pub const TARGET_GROUP_FEATURES: usize = 10;

// --- Normalisation ---

/// Speed normalisation (m/s), roughly Mach 2.
pub const MAX_SPEED: f64 = 700.0;

/// Altitude normalisation (meters).
pub const MAX_ALTITUDE: f64 = 15_000.0;

/// Unit count normalisation for target groups.
pub const MAX_GROUP_UNITS: f64 = 10.0;

/// Entity domain count, for one-hot scaling.
pub const NUM_DOMAINS: f64 = 3.0;
