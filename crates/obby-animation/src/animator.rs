//! Per-character animation state: resolved roles plus the cross-fade mixer

use crate::blend::{ActionMixer, Transition};
use crate::resolver::{resolve_actions, CanonicalActionMap, CanonicalRole, ClipSet};

/// Where the character's clips are in their load lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipStatus {
    /// The asset loader has not delivered anything yet
    Pending,
    /// Clips arrived and were resolved
    Ready,
    /// The loader gave up; the character moves without animation
    Failed(String),
}

/// Drives which clips are audible for one character.
///
/// Every request goes through the role fallback chain (run → walk → idle,
/// turns → idle), so a missing clip degrades to the closest available one and
/// an empty map simply plays nothing.
#[derive(Debug, Clone)]
pub struct Animator<H> {
    actions: CanonicalActionMap<H>,
    mixer: ActionMixer,
    status: ClipStatus,
}

impl<H: Clone> Animator<H> {
    pub fn new(fade_duration: f64) -> Self {
        Self {
            actions: CanonicalActionMap::default(),
            mixer: ActionMixer::new(fade_duration),
            status: ClipStatus::Pending,
        }
    }

    /// Re-resolve roles for a new clip set and settle on idle.
    pub fn set_clips(&mut self, clips: &ClipSet<H>) {
        self.actions = resolve_actions(clips);
        self.status = ClipStatus::Ready;
        if self.actions.is_resolved(CanonicalRole::Idle) {
            self.mixer.play_immediate(CanonicalRole::Idle);
        } else {
            self.mixer.stop_all();
        }
        tracing::debug!(
            "resolved {} of {} animation roles from {} clips",
            self.actions.resolved_roles().len(),
            CanonicalRole::ALL.len(),
            clips.len()
        );
    }

    /// Record a permanent load failure. Any previous clips are dropped.
    pub fn mark_failed(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::warn!("character clips unavailable: {}", reason);
        self.actions = CanonicalActionMap::default();
        self.mixer.stop_all();
        self.status = ClipStatus::Failed(reason);
    }

    pub fn status(&self) -> &ClipStatus {
        &self.status
    }

    pub fn actions(&self) -> &CanonicalActionMap<H> {
        &self.actions
    }

    pub fn mixer(&self) -> &ActionMixer {
        &self.mixer
    }

    pub fn is_resolved(&self, role: CanonicalRole) -> bool {
        self.actions.is_resolved(role)
    }

    /// The role that will actually be heard when `role` is requested
    pub fn playable_role(&self, role: CanonicalRole) -> Option<CanonicalRole> {
        let chain: &[CanonicalRole] = match role {
            CanonicalRole::Run => &[CanonicalRole::Run, CanonicalRole::Walk, CanonicalRole::Idle],
            CanonicalRole::Walk => &[CanonicalRole::Walk, CanonicalRole::Idle],
            CanonicalRole::TurnLeft => &[CanonicalRole::TurnLeft, CanonicalRole::Idle],
            CanonicalRole::TurnRight => &[CanonicalRole::TurnRight, CanonicalRole::Idle],
            CanonicalRole::Idle => &[CanonicalRole::Idle],
        };
        chain.iter().copied().find(|r| self.actions.is_resolved(*r))
    }

    /// Ask for `role`; cross-fades only when the audible role changes.
    pub fn request(&mut self, role: CanonicalRole) -> Option<Transition> {
        let playable = self.playable_role(role)?;
        self.mixer.cross_fade(playable)
    }

    pub fn advance(&mut self, dt: f64) {
        self.mixer.advance(dt);
    }

    /// Handles with non-zero weight, for the render host to sample
    pub fn blend_weights(&self) -> Vec<(CanonicalRole, &H, f32)> {
        self.mixer
            .active_weights()
            .into_iter()
            .filter_map(|(role, w)| self.actions.get(role).map(|h| (role, h, w)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clips(names: &[&str]) -> ClipSet<String> {
        names.iter().map(|n| (*n, n.to_string())).collect()
    }

    #[test]
    fn starts_pending_and_silent() {
        let animator: Animator<String> = Animator::new(0.25);
        assert_eq!(animator.status(), &ClipStatus::Pending);
        assert!(animator.blend_weights().is_empty());
    }

    #[test]
    fn set_clips_settles_on_idle() {
        let mut animator = Animator::new(0.25);
        animator.set_clips(&clips(&["Armature|Idle", "Armature|Walk"]));
        assert_eq!(animator.status(), &ClipStatus::Ready);
        let weights = animator.blend_weights();
        assert_eq!(weights.len(), 1);
        assert_eq!(weights[0].0, CanonicalRole::Idle);
        assert_eq!(weights[0].1, "Armature|Idle");
    }

    #[test]
    fn run_falls_back_to_walk_then_idle() {
        let mut animator = Animator::new(0.25);
        animator.set_clips(&clips(&["Idle", "Walk"]));
        assert_eq!(animator.playable_role(CanonicalRole::Run), Some(CanonicalRole::Walk));

        animator.set_clips(&clips(&["Idle"]));
        assert_eq!(animator.playable_role(CanonicalRole::Run), Some(CanonicalRole::Idle));
        assert_eq!(animator.playable_role(CanonicalRole::TurnLeft), Some(CanonicalRole::Idle));
    }

    #[test]
    fn request_fades_only_on_change() {
        let mut animator = Animator::new(0.25);
        animator.set_clips(&clips(&["Idle", "Walk", "Run"]));
        assert!(animator.request(CanonicalRole::Walk).is_some());
        assert!(animator.request(CanonicalRole::Walk).is_none());
        assert!(animator.request(CanonicalRole::Run).is_some());
    }

    #[test]
    fn empty_or_failed_clips_play_nothing() {
        let mut animator: Animator<String> = Animator::new(0.25);
        assert!(animator.request(CanonicalRole::Walk).is_none());

        animator.set_clips(&clips(&["Idle"]));
        animator.mark_failed("404");
        assert!(matches!(animator.status(), ClipStatus::Failed(_)));
        assert!(animator.request(CanonicalRole::Idle).is_none());
        assert!(animator.blend_weights().is_empty());
    }
}
