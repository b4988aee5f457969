//! Sandbox simulation backend for Trident Island.
//!
//! Owns a hecs ECS world, runs systems once per environment tick and
//! reports spawn, despawn, contact and victory events. Deterministic for a
//! given seed and command sequence.

pub mod components;
pub mod constants;
pub mod engine;
pub mod factory;
pub mod scenario;
pub mod systems;
pub mod world_setup;

pub use engine::SandboxSimulation;
pub use factory::SandboxFactory;
pub use trident_core as core;

#[cfg(test)]
mod tests;
