//! Animation layer for the obby character
//!
//! - **Resolution**: map arbitrary exported clip names onto canonical
//!   locomotion roles via a fixed alias table
//! - **Blending**: time-bounded cross-fades between roles, with overlapping
//!   fades represented as explicit transition records

pub mod animator;
pub mod blend;
pub mod resolver;

pub use animator::{Animator, ClipStatus};
pub use blend::{ActionMixer, Transition, DEFAULT_FADE_DURATION};
pub use resolver::{resolve_actions, CanonicalActionMap, CanonicalRole, ClipSet};
