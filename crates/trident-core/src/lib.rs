//! Core types and definitions for the Trident Island wargame environment.
//!
//! This crate defines the vocabulary shared across all other crates:
//! factions and domains, entity snapshots, backend commands and events,
//! the discrete action schema, configuration, and the simulation backend
//! contract. It has no dependency on any particular simulation engine.

pub mod action;
pub mod backend;
pub mod commands;
pub mod config;
pub mod constants;
pub mod entity;
pub mod enums;
pub mod error;
pub mod events;
pub mod types;

pub use action::{Action, ActionField, ActionSpace, ObservationSpace};
pub use backend::{BackendFactory, ForceLaydown, SimulationBackend, SimulationConfig, UnitSpec};
pub use config::EnvConfig;
pub use error::{Result, TridentError};

#[cfg(test)]
mod tests;
