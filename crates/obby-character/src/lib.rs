//! Obby Character - third-person locomotion
//!
//! - `LocomotionConfig` — speeds, turn rates and fade length
//! - `LocomotionState` — current action, facing yaw and position
//! - `CharacterController` — per-tick state selection, cross-fade requests and
//!   movement integration from a `MovementIntent`

pub mod character;
pub mod config;

pub use character::{CharacterController, LocomotionState, LocomotionStep};
pub use config::LocomotionConfig;
