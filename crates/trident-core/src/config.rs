//! Environment configuration and the grid geometry derived from it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::FRAMES_PER_SECOND;
use crate::error::Result;
use crate::types::Position;

/// Environment configuration. Every field has a default, so partial JSON
/// files are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Truncation horizon in mission seconds.
    pub max_game_time: f64,
    /// Uninterrupted presence required to complete a capture.
    pub capture_required_seconds: f64,
    /// Kill-ratio win threshold. A faction loses at `<= 1 / threshold`.
    pub kill_ratio_threshold: f64,
    /// Map extent (width, height) in km, centred on the origin.
    pub map_size_km: (f64, f64),
    pub grid_resolution_km: f64,
    pub max_entities: usize,
    pub max_target_groups: usize,
    pub max_weapons: u32,
    pub min_patrol_axis_km: f64,
    pub max_patrol_axis_km: f64,
    pub patrol_axis_increment_km: f64,
    pub angle_resolution_degrees: f64,
    /// Backend frames advanced per environment step.
    pub frame_rate: u32,
    pub capture_zone_radius_km: f64,
    pub max_ammo: u32,
    pub terminal_reward: f64,
    pub seed: Option<u64>,
    pub legacy_force_path: Option<PathBuf>,
    pub dynasty_force_path: Option<PathBuf>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            max_game_time: 100_000.0,
            capture_required_seconds: 600.0,
            kill_ratio_threshold: 5.0,
            map_size_km: (250.0, 250.0),
            grid_resolution_km: 10.0,
            max_entities: 100,
            max_target_groups: 50,
            max_weapons: 5,
            min_patrol_axis_km: 100.0,
            max_patrol_axis_km: 1000.0,
            patrol_axis_increment_km: 25.0,
            angle_resolution_degrees: 10.0,
            frame_rate: 600,
            capture_zone_radius_km: 5.0,
            max_ammo: 20,
            terminal_reward: 100.0,
            seed: None,
            legacy_force_path: None,
            dynasty_force_path: None,
        }
    }
}

impl EnvConfig {
    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Cells along one side of the square placement grid.
    pub fn grid_size(&self) -> usize {
        if self.grid_resolution_km <= 0.0 {
            return 1;
        }
        ((self.map_size_km.0 / self.grid_resolution_km).floor() as usize).max(1)
    }

    pub fn grid_cell_count(&self) -> usize {
        self.grid_size() * self.grid_size()
    }

    /// Number of discrete racetrack axis lengths.
    pub fn patrol_steps(&self) -> usize {
        if self.patrol_axis_increment_km <= 0.0 {
            return 1;
        }
        let span = (self.max_patrol_axis_km - self.min_patrol_axis_km).max(0.0);
        (span / self.patrol_axis_increment_km).floor() as usize + 1
    }

    /// Number of discrete racetrack orientations.
    pub fn angle_steps(&self) -> usize {
        if self.angle_resolution_degrees <= 0.0 {
            return 1;
        }
        ((360.0 / self.angle_resolution_degrees).floor() as usize).max(1)
    }

    /// Non-empty weapon combinations addressable by the action schema.
    pub fn max_weapon_combinations(&self) -> u64 {
        (1u64 << self.max_weapons.min(63)) - 1
    }

    /// Mission seconds per environment step.
    pub fn seconds_per_step(&self) -> f64 {
        f64::from(self.frame_rate) / FRAMES_PER_SECOND
    }

    pub fn max_episode_steps(&self) -> u64 {
        let dt = self.seconds_per_step();
        if dt <= 0.0 {
            return 0;
        }
        (self.max_game_time / dt).ceil() as u64
    }

    pub fn half_width_m(&self) -> f64 {
        self.map_size_km.0 * 500.0
    }

    pub fn half_height_m(&self) -> f64 {
        self.map_size_km.1 * 500.0
    }

    pub fn capture_zone_radius_m(&self) -> f64 {
        self.capture_zone_radius_km * 1000.0
    }

    /// World position (meters, ground level) of a grid cell.
    pub fn grid_to_position(&self, index: usize) -> Position {
        let gs = self.grid_size();
        let res_m = self.grid_resolution_km * 1000.0;
        let x = (index % gs) as f64 * res_m - self.half_width_m();
        let y = (index / gs) as f64 * res_m - self.half_height_m();
        Position::new(x, y, 0.0)
    }

    /// Grid cell containing a world position, clamped to the grid.
    pub fn position_to_grid(&self, position: &Position) -> usize {
        let gs = self.grid_size();
        let res_m = (self.grid_resolution_km * 1000.0).max(f64::EPSILON);
        let clamp = |v: f64| (v.floor().max(0.0) as usize).min(gs - 1);
        let col = clamp((position.x + self.half_width_m()) / res_m);
        let row = clamp((position.y + self.half_height_m()) / res_m);
        row * gs + col
    }

    pub fn in_bounds(&self, position: &Position) -> bool {
        position.x.abs() <= self.half_width_m() && position.y.abs() <= self.half_height_m()
    }

    /// Racetrack axis length in meters for a discrete step index.
    pub fn patrol_axis_m(&self, step: usize) -> f64 {
        (self.min_patrol_axis_km + step as f64 * self.patrol_axis_increment_km) * 1000.0
    }

    /// Racetrack orientation in radians for a discrete step index.
    pub fn patrol_angle_rad(&self, step: usize) -> f64 {
        (step as f64 * self.angle_resolution_degrees).to_radians()
    }
}
