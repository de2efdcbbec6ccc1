//! Events emitted by a running course

use obby_core::{CheckpointId, Vec3};

/// Something the host (HUD, audio, analytics) may want to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum CourseEvent {
    /// A new run began at the start checkpoint
    RunStarted,
    /// The player entered a checkpoint's activation radius
    CheckpointReached { id: CheckpointId, label: String },
    /// The reward service rejected or failed a checkpoint reward
    RewardFailed { id: CheckpointId, reason: String },
    /// The goal was reached
    CourseCompleted { elapsed_ms: u64, new_best: bool },
    /// Hazard contact sent the player back to the last checkpoint
    Respawned { checkpoint: CheckpointId, position: Vec3 },
}
