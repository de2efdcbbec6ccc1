//! Locomotion tuning

use obby_core::{ObbyError, Result};
use serde::{Deserialize, Serialize};

/// Movement and blending constants for one character
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocomotionConfig {
    /// Walk speed in m/s
    #[serde(default = "default_walk_speed")]
    pub walk_speed: f32,
    /// Run speed in m/s (must exceed walk speed)
    #[serde(default = "default_run_speed")]
    pub run_speed: f32,
    /// Turn-in-place rate in rad/s
    #[serde(default = "default_turn_speed")]
    pub turn_speed: f32,
    /// Fraction of `turn_speed` applied while moving and steering
    #[serde(default = "default_coupled_turn_factor")]
    pub coupled_turn_factor: f32,
    /// Cross-fade length in seconds
    #[serde(default = "default_fade_duration")]
    pub fade_duration: f64,
}

fn default_walk_speed() -> f32 {
    2.2
}
fn default_run_speed() -> f32 {
    4.0
}
fn default_turn_speed() -> f32 {
    2.4
}
fn default_coupled_turn_factor() -> f32 {
    0.8
}
fn default_fade_duration() -> f64 {
    0.25
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            walk_speed: default_walk_speed(),
            run_speed: default_run_speed(),
            turn_speed: default_turn_speed(),
            coupled_turn_factor: default_coupled_turn_factor(),
            fade_duration: default_fade_duration(),
        }
    }
}

impl LocomotionConfig {
    /// Reject tunings the state machine cannot honor
    pub fn validate(&self) -> Result<()> {
        if !(self.walk_speed > 0.0) {
            return Err(ObbyError::ValueOutOfRange {
                field: "walk_speed".into(),
                min: 0.0,
                max: f64::from(f32::MAX),
                value: f64::from(self.walk_speed),
            });
        }
        if !(self.run_speed > self.walk_speed) {
            return Err(ObbyError::ValueOutOfRange {
                field: "run_speed".into(),
                min: f64::from(self.walk_speed),
                max: f64::from(f32::MAX),
                value: f64::from(self.run_speed),
            });
        }
        if !(0.0..=1.0).contains(&self.coupled_turn_factor) {
            return Err(ObbyError::ValueOutOfRange {
                field: "coupled_turn_factor".into(),
                min: 0.0,
                max: 1.0,
                value: f64::from(self.coupled_turn_factor),
            });
        }
        if self.turn_speed < 0.0 {
            return Err(ObbyError::ValueOutOfRange {
                field: "turn_speed".into(),
                min: 0.0,
                max: f64::from(f32::MAX),
                value: f64::from(self.turn_speed),
            });
        }
        if self.fade_duration < 0.0 {
            return Err(ObbyError::ValueOutOfRange {
                field: "fade_duration".into(),
                min: 0.0,
                max: f64::MAX,
                value: self.fade_duration,
            });
        }
        Ok(())
    }
}
