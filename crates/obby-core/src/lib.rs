//! Obby Core - Foundational types shared by every obby crate
//!
//! This crate provides:
//! - `Vec3` - Spatial vector with the planar helpers the course logic needs
//! - `CheckpointId` - Stable checkpoint identifiers authored with a course
//! - Error types and Result alias

mod error;
mod id;
mod types;

pub use error::{ObbyError, Result};
pub use id::CheckpointId;
pub use types::Vec3;
