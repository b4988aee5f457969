//! Two-faction reinforcement-learning environment for Trident Island.
//!
//! Each step both agents submit one structured action. Actions are
//! validated against the acting agent's own registries, converted to backend
//! commands, and the shared backend is ticked once. The resulting events
//! update registries and flags, mission metrics are recomputed, and the
//! outcome evaluator decides termination and terminal rewards.

pub mod agent;
pub mod dispatch;
pub mod env;
pub mod execution;
pub mod flags;
pub mod forces;
pub mod info;
pub mod masks;
pub mod metrics;
pub mod observation;
pub mod outcome;
pub mod policy;
pub mod registry;
pub mod replay;
pub mod reward;
pub mod validation;
pub mod weapons;

pub use env::{ResetOutput, StepOutput, TridentEnv};
pub use trident_core as core;
