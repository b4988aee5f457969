//! ECS systems that operate on the sandbox world each tick.
//!
//! Systems are pure functions over `&mut World` (or `&World` for read-only).
//! They do not own state; everything lives in components, except the
//! contact table the engine passes to sensing.

pub mod capture;
pub mod cleanup;
pub mod combat;
pub mod fuel;
pub mod movement;
pub mod orders;
pub mod sensing;
pub mod snapshot;
