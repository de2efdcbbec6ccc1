//! Checkpoint detection and run progress
//!
//! Detection is purely spatial: every checkpoint within the activation radius
//! (measured on the XZ plane) is a candidate, and authored order is not
//! enforced. Nothing fires while the player is still inside the radius of
//! `last_detected`, so lingering never advances twice, even where two radii
//! overlap.

use obby_core::{CheckpointId, ObbyError, Result, Vec3};

pub const DEFAULT_ACTIVATION_RADIUS: f32 = 1.5;

/// An authored checkpoint. Immutable once the course is loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint {
    pub id: CheckpointId,
    pub label: String,
    pub position: Vec3,
    pub order: usize,
    pub is_start: bool,
    pub is_goal: bool,
}

/// Progress through the current run
#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointProgress {
    pub current: CheckpointId,
    pub spawn_position: Vec3,
    pub last_detected: Option<CheckpointId>,
}

/// Result of entering a new checkpoint's radius
#[derive(Debug, Clone, PartialEq)]
pub struct Advance {
    pub checkpoint: Checkpoint,
    pub previous: CheckpointId,
}

impl Advance {
    /// Every checkpoint except the start pays out
    pub fn is_rewarded(&self) -> bool {
        !self.checkpoint.is_start
    }

    pub fn is_goal(&self) -> bool {
        self.checkpoint.is_goal
    }
}

pub struct CheckpointTracker {
    checkpoints: Vec<Checkpoint>,
    activation_radius: f32,
    progress: CheckpointProgress,
}

impl CheckpointTracker {
    /// Build a tracker over an ordered checkpoint list. Exactly one start and
    /// at least one goal are required.
    pub fn new(checkpoints: Vec<Checkpoint>, activation_radius: f32) -> Result<Self> {
        if !(activation_radius > 0.0) {
            return Err(ObbyError::ValueOutOfRange {
                field: "activation_radius".into(),
                min: 0.0,
                max: f64::MAX,
                value: activation_radius as f64,
            });
        }
        let mut starts = checkpoints.iter().filter(|c| c.is_start);
        let start = match (starts.next(), starts.next()) {
            (Some(start), None) => start,
            (None, _) => return Err(ObbyError::CourseError("no start checkpoint".into())),
            (Some(_), Some(_)) => {
                return Err(ObbyError::CourseError("more than one start checkpoint".into()))
            }
        };
        if !checkpoints.iter().any(|c| c.is_goal) {
            return Err(ObbyError::CourseError("no goal checkpoint".into()));
        }

        let progress = CheckpointProgress {
            current: start.id.clone(),
            spawn_position: start.position,
            last_detected: None,
        };
        Ok(Self {
            checkpoints,
            activation_radius,
            progress,
        })
    }

    /// Check the player's position and advance if it entered a new checkpoint.
    pub fn update(&mut self, position: Vec3) -> Option<Advance> {
        let radius = self.activation_radius;
        let within = |c: &Checkpoint| c.position.planar_distance(&position) <= radius;

        let last = self.progress.last_detected.as_ref();
        if last.and_then(|id| self.get(id.as_str())).is_some_and(within) {
            return None;
        }
        let hit = self
            .checkpoints
            .iter()
            .find(|&c| within(c) && last != Some(&c.id))?
            .clone();

        let previous = std::mem::replace(&mut self.progress.current, hit.id.clone());
        self.progress.spawn_position = hit.position;
        self.progress.last_detected = Some(hit.id.clone());
        tracing::info!("checkpoint reached: {} ({})", hit.label, hit.id);

        Some(Advance {
            checkpoint: hit,
            previous,
        })
    }

    /// Back to the start, forgetting every detection. Used for a new run only;
    /// respawns keep progress.
    pub fn reset(&mut self) {
        if let Some(start) = self.start() {
            self.progress = CheckpointProgress {
                current: start.id.clone(),
                spawn_position: start.position,
                last_detected: None,
            };
        }
    }

    pub fn progress(&self) -> &CheckpointProgress {
        &self.progress
    }

    pub fn current_id(&self) -> &CheckpointId {
        &self.progress.current
    }

    pub fn current(&self) -> Option<&Checkpoint> {
        self.get(self.progress.current.as_str())
    }

    pub fn get(&self, id: &str) -> Option<&Checkpoint> {
        self.checkpoints.iter().find(|c| c.id == id)
    }

    pub fn start(&self) -> Option<&Checkpoint> {
        self.checkpoints.iter().find(|c| c.is_start)
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    pub fn activation_radius(&self) -> f32 {
        self.activation_radius
    }

    pub fn spawn_position(&self) -> Vec3 {
        self.progress.spawn_position
    }

    /// Authored label of the current checkpoint, e.g. "Checkpoint 1"
    pub fn current_label(&self) -> &str {
        self.current().map(|c| c.label.as_str()).unwrap_or("")
    }

    /// One-based position of the current checkpoint, e.g. "2/4"
    pub fn progress_label(&self) -> String {
        let index = self.current().map(|c| c.order).unwrap_or(0);
        format!("{}/{}", index + 1, self.checkpoints.len())
    }

    /// The current checkpoint and every one authored before it
    pub fn is_activated(&self, id: &str) -> bool {
        match (self.get(id), self.current()) {
            (Some(cp), Some(current)) => cp.order <= current.order,
            _ => false,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.current().map(|c| c.is_goal).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course() -> Vec<Checkpoint> {
        ["start", "cp1", "cp2", "goal"]
            .iter()
            .enumerate()
            .map(|(i, id)| Checkpoint {
                id: CheckpointId::new(*id),
                label: id.to_string(),
                position: Vec3::new(8.0 * i as f32, 0.0, 0.0),
                order: i,
                is_start: i == 0,
                is_goal: i == 3,
            })
            .collect()
    }

    fn tracker() -> CheckpointTracker {
        CheckpointTracker::new(course(), DEFAULT_ACTIVATION_RADIUS).unwrap()
    }

    #[test]
    fn starts_at_start() {
        let t = tracker();
        assert_eq!(t.current_id().as_str(), "start");
        assert_eq!(t.spawn_position(), Vec3::ZERO);
        assert_eq!(t.progress_label(), "1/4");
        assert!(!t.is_complete());
    }

    #[test]
    fn advances_within_radius() {
        let mut t = tracker();
        assert!(t.update(Vec3::new(6.4, 0.0, 0.0)).is_none());

        let adv = t.update(Vec3::new(6.6, 0.0, 0.4)).unwrap();
        assert_eq!(adv.checkpoint.id.as_str(), "cp1");
        assert_eq!(adv.previous.as_str(), "start");
        assert!(adv.is_rewarded());
        assert_eq!(t.spawn_position(), Vec3::new(8.0, 0.0, 0.0));
        assert_eq!(t.progress_label(), "2/4");
    }

    #[test]
    fn radius_is_inclusive() {
        let mut t = tracker();
        assert!(t.update(Vec3::new(9.5, 0.0, 0.0)).is_some());
    }

    #[test]
    fn height_is_ignored() {
        let mut t = tracker();
        assert!(t.update(Vec3::new(8.0, 10.0, 0.0)).is_some());
    }

    #[test]
    fn lingering_advances_once() {
        let mut t = tracker();
        let mut advances = 0;
        for i in 0..120 {
            let jitter = (i as f32 * 0.1).sin() * 0.5;
            if t.update(Vec3::new(8.0 + jitter, 0.0, jitter)).is_some() {
                advances += 1;
            }
        }
        assert_eq!(advances, 1);
    }

    #[test]
    fn overlapping_radii_advance_once() {
        let mut cps = course();
        cps[1].position = Vec3::new(2.0, 0.0, 0.0);
        let mut t = CheckpointTracker::new(cps, DEFAULT_ACTIVATION_RADIUS).unwrap();

        // x = 1 is inside both the start and cp1
        let advances: Vec<_> = (0..60)
            .filter_map(|_| t.update(Vec3::new(1.0, 0.0, 0.0)))
            .collect();
        assert_eq!(advances.len(), 1);
        assert_eq!(advances[0].checkpoint.id.as_str(), "start");

        // Leaving the start's radius while still inside cp1 fires cp1 once
        let rewarded = (0..60)
            .filter_map(|_| t.update(Vec3::new(2.5, 0.0, 0.0)))
            .filter(|a| a.is_rewarded())
            .count();
        assert_eq!(rewarded, 1);
        assert_eq!(t.current_id().as_str(), "cp1");

        // Walking back into the overlap does not bounce to the start
        assert!(t.update(Vec3::new(1.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn start_is_detected_but_not_rewarded() {
        let mut t = tracker();
        let adv = t.update(Vec3::ZERO).unwrap();
        assert!(!adv.is_rewarded());
        assert!(t.update(Vec3::ZERO).is_none());
    }

    #[test]
    fn out_of_order_is_allowed() {
        let mut t = tracker();
        let adv = t.update(Vec3::new(16.0, 0.0, 0.0)).unwrap();
        assert_eq!(adv.checkpoint.id.as_str(), "cp2");
        assert!(t.is_activated("cp1"));
        assert!(!t.is_activated("goal"));

        let adv = t.update(Vec3::new(8.0, 0.0, 0.0)).unwrap();
        assert_eq!(adv.checkpoint.id.as_str(), "cp1");
    }

    #[test]
    fn goal_completes_and_does_not_retrigger() {
        let mut t = tracker();
        let adv = t.update(Vec3::new(24.0, 0.0, 0.0)).unwrap();
        assert!(adv.is_goal());
        assert!(t.is_complete());
        assert!(t.update(Vec3::new(24.5, 0.0, 0.0)).is_none());
    }

    #[test]
    fn reset_returns_to_start() {
        let mut t = tracker();
        t.update(Vec3::new(24.0, 0.0, 0.0));
        t.reset();
        assert_eq!(t.current_id().as_str(), "start");
        assert!(t.progress().last_detected.is_none());
        assert!(!t.is_complete());
        assert!(t.update(Vec3::new(24.0, 0.0, 0.0)).is_some());
    }

    #[test]
    fn labels() {
        let mut t = tracker();
        t.update(Vec3::new(16.0, 0.0, 0.0));
        assert_eq!(t.current_label(), "cp2");
        assert_eq!(t.progress_label(), "3/4");
    }

    #[test]
    fn rejects_missing_start_or_goal() {
        let mut cps = course();
        cps[0].is_start = false;
        assert!(CheckpointTracker::new(cps, 1.5).is_err());

        let mut cps = course();
        cps[3].is_goal = false;
        assert!(CheckpointTracker::new(cps, 1.5).is_err());

        assert!(CheckpointTracker::new(course(), 0.0).is_err());
    }
}
