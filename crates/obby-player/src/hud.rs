//! HUD data for an external overlay
//!
//! The overlay itself is drawn by the host. This is the per-frame snapshot it
//! reads: checkpoint labels, run time, best time and completion.

use obby_animation::CanonicalRole;
use obby_core::Vec3;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct HudSnapshot {
    /// Authored label of the current checkpoint
    pub checkpoint_label: String,
    /// One-based checkpoint index over total, e.g. "2/4"
    pub progress_label: String,
    pub elapsed: String,
    pub best: String,
    pub complete: bool,
    pub position: Vec3,
    pub action: CanonicalRole,
}

impl fmt::Display for HudSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {:<14} time {}  best {}  pos ({:.2}, {:.2}, {:.2})  {}",
            self.progress_label,
            self.checkpoint_label,
            self.elapsed,
            self.best,
            self.position.x,
            self.position.y,
            self.position.z,
            self.action
        )?;
        if self.complete {
            write!(f, "  FINISHED")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_line() {
        let hud = HudSnapshot {
            checkpoint_label: "Goal".into(),
            progress_label: "4/4".into(),
            elapsed: "00:11".into(),
            best: "00:11".into(),
            complete: true,
            position: Vec3::new(24.0, 0.5, 0.0),
            action: CanonicalRole::Idle,
        };
        let line = hud.to_string();
        assert!(line.starts_with("[4/4] Goal"));
        assert!(line.contains("best 00:11"));
        assert!(line.ends_with("FINISHED"));
    }
}
