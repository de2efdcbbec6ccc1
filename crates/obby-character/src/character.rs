//! Third-person locomotion state machine
//!
//! Each tick the controller reads a `MovementIntent`, picks the target action,
//! asks the animator to cross-fade into it, then integrates yaw and position.
//! Integration never depends on clips being present: with no animation at all
//! the character still turns and moves.

use crate::config::LocomotionConfig;
use obby_animation::{Animator, CanonicalRole, ClipSet, Transition};
use obby_core::Vec3;
use obby_runtime::MovementIntent;

/// Authoritative character state, written once per tick by the controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocomotionState {
    pub current_action: CanonicalRole,
    /// Facing angle in radians; 0 faces +Z
    pub facing_yaw: f32,
    pub position: Vec3,
}

/// What one tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocomotionStep {
    pub previous_action: CanonicalRole,
    pub action: CanonicalRole,
    /// Cross-fade started this tick, if the audible clip changed
    pub transition: Option<Transition>,
    pub displacement: Vec3,
}

impl LocomotionStep {
    pub fn action_changed(&self) -> bool {
        self.previous_action != self.action
    }
}

/// Kinematic third-person controller. No collision: positions are integrated
/// directly and corrected only by teleports (respawn).
pub struct CharacterController<H> {
    state: LocomotionState,
    config: LocomotionConfig,
    animator: Animator<H>,
}

impl<H: Clone> CharacterController<H> {
    pub fn new(config: LocomotionConfig, position: Vec3) -> Self {
        Self {
            state: LocomotionState {
                current_action: CanonicalRole::Idle,
                facing_yaw: 0.0,
                position,
            },
            animator: Animator::new(config.fade_duration),
            config,
        }
    }

    pub fn state(&self) -> &LocomotionState {
        &self.state
    }

    pub fn position(&self) -> Vec3 {
        self.state.position
    }

    pub fn facing_yaw(&self) -> f32 {
        self.state.facing_yaw
    }

    pub fn current_action(&self) -> CanonicalRole {
        self.state.current_action
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn animator(&self) -> &Animator<H> {
        &self.animator
    }

    /// Deliver (or replace) the character's clip set
    pub fn set_clips(&mut self, clips: &ClipSet<H>) {
        self.animator.set_clips(clips);
    }

    /// The asset loader failed for good; keep moving without animation
    pub fn mark_clips_failed(&mut self, reason: impl Into<String>) {
        self.animator.mark_failed(reason);
    }

    /// Move instantly, without interpolation
    pub fn teleport(&mut self, position: Vec3) {
        self.state.position = position;
    }

    pub fn set_facing_yaw(&mut self, yaw: f32) {
        self.state.facing_yaw = yaw;
    }

    /// Pick this tick's action from the intent and the resolved roles
    pub fn select_action(&self, intent: &MovementIntent) -> CanonicalRole {
        let moving = intent.forward || intent.backward;
        if moving {
            if intent.run && self.animator.is_resolved(CanonicalRole::Run) {
                CanonicalRole::Run
            } else {
                CanonicalRole::Walk
            }
        } else if intent.left || intent.right {
            let turn = if intent.left {
                CanonicalRole::TurnLeft
            } else {
                CanonicalRole::TurnRight
            };
            // No turn clip: stay idle, rotation still happens
            if self.animator.is_resolved(turn) {
                turn
            } else {
                CanonicalRole::Idle
            }
        } else {
            CanonicalRole::Idle
        }
    }

    /// Advance one tick of `dt` seconds
    pub fn tick(&mut self, intent: &MovementIntent, dt: f64) -> LocomotionStep {
        let dt_f32 = dt.max(0.0) as f32;
        self.animator.advance(dt.max(0.0));

        let previous_action = self.state.current_action;
        let action = self.select_action(intent);
        self.state.current_action = action;
        let transition = self.animator.request(action);

        let moving = intent.forward || intent.backward;
        let mut displacement = Vec3::ZERO;

        if moving {
            let coupled = self.config.turn_speed * self.config.coupled_turn_factor * dt_f32;
            if intent.left {
                self.state.facing_yaw += coupled;
            }
            if intent.right {
                self.state.facing_yaw -= coupled;
            }

            let mut direction = Vec3::from_yaw(self.state.facing_yaw);
            // Forward wins when both are held
            if intent.backward && !intent.forward {
                direction = -direction;
            }
            let speed = if action == CanonicalRole::Run {
                self.config.run_speed
            } else {
                self.config.walk_speed
            };
            displacement = direction * (speed * dt_f32);
            self.state.position += displacement;
        } else if intent.left || intent.right {
            let sign = if intent.left { 1.0 } else { -1.0 };
            self.state.facing_yaw += sign * self.config.turn_speed * dt_f32;
        }

        if previous_action != action {
            tracing::trace!("locomotion {} -> {}", previous_action, action);
        }

        LocomotionStep {
            previous_action,
            action,
            transition,
            displacement,
        }
    }
}
