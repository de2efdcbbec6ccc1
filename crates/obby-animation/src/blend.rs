//! Cross-fade blending between canonical actions
//!
//! Each role carries a weight ramp. Starting a cross-fade ramps the incoming
//! role 0→1 and every other audible role from its current weight down to 0
//! over the same duration. Fades may overlap: a second request before the
//! first one finishes simply starts new ramps from wherever the weights are.

use crate::resolver::CanonicalRole;

/// Default cross-fade length in seconds
pub const DEFAULT_FADE_DURATION: f64 = 0.25;

/// One requested cross-fade, kept until it finishes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// Role that was playing when the fade was requested (`None` on first play)
    pub from: Option<CanonicalRole>,
    pub to: CanonicalRole,
    /// Mixer time at which the fade started, in seconds
    pub start_time: f64,
    pub duration: f64,
}

impl Transition {
    /// Normalized progress in `[0, 1]` at mixer time `now`
    pub fn progress(&self, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (((now - self.start_time) / self.duration).clamp(0.0, 1.0)) as f32
    }

    pub fn is_complete(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }
}

#[derive(Debug, Clone, Copy)]
struct WeightRamp {
    from: f32,
    to: f32,
    start_time: f64,
    duration: f64,
}

impl WeightRamp {
    fn constant(weight: f32) -> Self {
        Self {
            from: weight,
            to: weight,
            start_time: 0.0,
            duration: 0.0,
        }
    }

    fn at(&self, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = (((now - self.start_time) / self.duration).clamp(0.0, 1.0)) as f32;
        self.from + (self.to - self.from) * t
    }

    fn settled(&self, now: f64) -> bool {
        self.duration <= 0.0 || now - self.start_time >= self.duration
    }
}

/// Per-role weights plus the list of in-flight transitions.
#[derive(Debug, Clone)]
pub struct ActionMixer {
    time: f64,
    ramps: [WeightRamp; 5],
    current: Option<CanonicalRole>,
    transitions: Vec<Transition>,
    fade_duration: f64,
}

impl Default for ActionMixer {
    fn default() -> Self {
        Self::new(DEFAULT_FADE_DURATION)
    }
}

impl ActionMixer {
    pub fn new(fade_duration: f64) -> Self {
        Self {
            time: 0.0,
            ramps: [WeightRamp::constant(0.0); 5],
            current: None,
            transitions: Vec::new(),
            fade_duration: fade_duration.max(0.0),
        }
    }

    /// Mixer-local time in seconds
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn fade_duration(&self) -> f64 {
        self.fade_duration
    }

    /// The most recently requested role
    pub fn current(&self) -> Option<CanonicalRole> {
        self.current
    }

    /// Start playing `role` at full weight with no fade, silencing everything else.
    pub fn play_immediate(&mut self, role: CanonicalRole) {
        for r in CanonicalRole::ALL {
            let w = if r == role { 1.0 } else { 0.0 };
            self.ramps[r.index()] = WeightRamp::constant(w);
        }
        self.transitions.clear();
        self.current = Some(role);
    }

    /// Cross-fade into `role`. Requesting the current role is a no-op.
    /// Returns the transition that was started, if any.
    pub fn cross_fade(&mut self, role: CanonicalRole) -> Option<Transition> {
        if self.current == Some(role) {
            return None;
        }

        let now = self.time;
        for r in CanonicalRole::ALL {
            let ramp = &mut self.ramps[r.index()];
            if r == role {
                // Incoming action restarts from silence
                *ramp = WeightRamp {
                    from: 0.0,
                    to: 1.0,
                    start_time: now,
                    duration: self.fade_duration,
                };
            } else {
                let w = ramp.at(now);
                *ramp = if w > 0.0 {
                    WeightRamp {
                        from: w,
                        to: 0.0,
                        start_time: now,
                        duration: self.fade_duration,
                    }
                } else {
                    WeightRamp::constant(0.0)
                };
            }
        }

        let transition = Transition {
            from: self.current,
            to: role,
            start_time: now,
            duration: self.fade_duration,
        };
        self.transitions.push(transition);
        self.current = Some(role);
        Some(transition)
    }

    /// Advance mixer time and drop finished transitions.
    pub fn advance(&mut self, dt: f64) {
        self.time += dt.max(0.0);
        let now = self.time;
        self.transitions.retain(|t| !t.is_complete(now));
        for ramp in &mut self.ramps {
            if ramp.settled(now) {
                *ramp = WeightRamp::constant(ramp.to);
            }
        }
    }

    /// Current blend weight of `role` in `[0, 1]`
    pub fn weight(&self, role: CanonicalRole) -> f32 {
        self.ramps[role.index()].at(self.time)
    }

    /// Roles with non-zero weight, paired with that weight
    pub fn active_weights(&self) -> Vec<(CanonicalRole, f32)> {
        CanonicalRole::ALL
            .into_iter()
            .map(|r| (r, self.weight(r)))
            .filter(|(_, w)| *w > 0.0)
            .collect()
    }

    /// Transitions that have started but not finished
    pub fn active_transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn is_blending(&self) -> bool {
        !self.transitions.is_empty()
    }

    /// Silence everything
    pub fn stop_all(&mut self) {
        self.ramps = [WeightRamp::constant(0.0); 5];
        self.transitions.clear();
        self.current = None;
    }
}
