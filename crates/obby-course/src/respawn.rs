//! Hazard-contact respawn

use crate::checkpoint::CheckpointTracker;
use crate::timer::RunTimer;
use obby_core::{CheckpointId, Vec3};

/// Where a respawn put the player
#[derive(Debug, Clone, PartialEq)]
pub struct Respawn {
    pub checkpoint: CheckpointId,
    pub position: Vec3,
}

/// Sends the player back to the last reached checkpoint and restarts the run
/// timer. Checkpoint progress is kept.
#[derive(Debug, Default)]
pub struct RespawnController {
    count: u32,
}

impl RespawnController {
    pub fn new() -> Self {
        Self::default()
    }

    /// `teleport` receives the spawn position and must move the character
    /// there instantly.
    pub fn respawn(
        &mut self,
        tracker: &CheckpointTracker,
        timer: &mut RunTimer,
        teleport: impl FnOnce(Vec3),
    ) -> Respawn {
        let position = tracker.spawn_position();
        teleport(position);
        timer.restart();
        self.count += 1;
        tracing::info!(
            "respawned at {} ({}, {}, {})",
            tracker.current_id(),
            position.x,
            position.y,
            position.z
        );
        Respawn {
            checkpoint: tracker.current_id().clone(),
            position,
        }
    }

    /// Respawns since the controller was created or last reset
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}
