//! Obby Course - checkpoint-based timed progression
//!
//! - `CourseFile` / `Course` — TOML course definitions and the built-in course
//! - `CheckpointTracker` — planar proximity detection over ordered checkpoints
//! - `RunTimer` / `BestTimeStore` — wall-clock run timing with a durable best
//! - `RespawnController` — hazard contact sends the player back to the last checkpoint
//! - `ObstacleDriver` — hazards animated from the global elapsed clock
//! - `RewardService` — best-effort per-checkpoint reward contract

pub mod checkpoint;
pub mod format;
pub mod loader;
pub mod obstacle;
pub mod respawn;
pub mod reward;
pub mod timer;

pub use checkpoint::{
    Advance, Checkpoint, CheckpointProgress, CheckpointTracker, DEFAULT_ACTIVATION_RADIUS,
};
pub use format::{Axis, CheckpointDef, CourseFile, CourseMetadata, HazardDef, HazardKind};
pub use loader::{load_course, load_course_string, Course};
pub use obstacle::{Hazard, HazardContact, ObstacleDriver};
pub use respawn::{Respawn, RespawnController};
pub use reward::{
    FailingRewardService, NullRewardService, RecordingRewardService, RewardService,
    DEFAULT_REWARD_AMOUNT,
};
pub use timer::{format_time, BestTimeStore, RunTimer, BEST_TIME_PLACEHOLDER, DEFAULT_NAMESPACE};
