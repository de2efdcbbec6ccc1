//! Hazards driven from the global elapsed clock
//!
//! Moving hazards are recomputed from one shared monotonic clock rather than
//! accumulating per-hazard deltas, so every hazard stays phase-consistent.
//! Intersection tests belong to the host; this module only exposes the
//! contact entry point.

use crate::format::{Axis, HazardDef, HazardKind};
use obby_core::Vec3;

const DEFAULT_AMPLITUDE: f32 = 3.0;
const DEFAULT_ANGULAR_FREQUENCY: f32 = 0.8;

/// A hazard instance with its live position
#[derive(Debug, Clone, PartialEq)]
pub struct Hazard {
    pub kind: HazardKind,
    pub base_position: Vec3,
    pub size: Vec3,
    pub axis: Axis,
    pub amplitude: f32,
    pub angular_frequency: f32,
    pub phase: f32,
    position: Vec3,
}

impl Hazard {
    pub fn from_def(def: &HazardDef) -> Self {
        Self {
            kind: def.kind,
            base_position: def.position,
            size: def.size.unwrap_or(Vec3::new(1.0, 1.0, 1.0)),
            axis: def.axis.unwrap_or_default(),
            amplitude: def.amplitude.unwrap_or(DEFAULT_AMPLITUDE),
            angular_frequency: def.angular_frequency.unwrap_or(DEFAULT_ANGULAR_FREQUENCY),
            phase: def.phase.unwrap_or(0.0),
            position: def.position,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Position at global time `t`. The driven axis is replaced outright by
    /// `amplitude * sin(t * angular_frequency + phase)`; the other two keep
    /// their authored values.
    pub fn position_at(&self, t: f64) -> Vec3 {
        if self.kind != HazardKind::MovingPlatform {
            return self.base_position;
        }
        let offset = self.amplitude * ((t as f32) * self.angular_frequency + self.phase).sin();
        let mut p = self.base_position;
        match self.axis {
            Axis::X => p.x = offset,
            Axis::Y => p.y = offset,
            Axis::Z => p.z = offset,
        }
        p
    }
}

/// A reported touch on a hazard
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardContact {
    pub index: usize,
    pub kind: HazardKind,
    /// Global time of the contact
    pub time: f64,
}

type ContactHandler = Box<dyn FnMut(&HazardContact)>;

pub struct ObstacleDriver {
    hazards: Vec<Hazard>,
    elapsed: f64,
    handlers: Vec<ContactHandler>,
}

impl ObstacleDriver {
    pub fn new(defs: &[HazardDef]) -> Self {
        Self {
            hazards: defs.iter().map(Hazard::from_def).collect(),
            elapsed: 0.0,
            handlers: Vec::new(),
        }
    }

    /// Recompute every moving hazard from the global elapsed time
    pub fn update(&mut self, global_elapsed: f64) {
        self.elapsed = global_elapsed;
        for hazard in &mut self.hazards {
            hazard.position = hazard.position_at(global_elapsed);
        }
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }

    pub fn hazard_position(&self, index: usize) -> Option<Vec3> {
        self.hazards.get(index).map(|h| h.position)
    }

    /// Register an observer called for every deadly contact
    pub fn on_hazard_contact(&mut self, handler: impl FnMut(&HazardContact) + 'static) {
        self.handlers.push(Box::new(handler));
    }

    /// Entry point for the host's collision layer. Contacts with non-deadly
    /// hazards are ignored. Returns the contact if it was deadly.
    pub fn report_contact(&mut self, index: usize) -> Option<HazardContact> {
        let hazard = self.hazards.get(index)?;
        if !hazard.kind.is_deadly() {
            return None;
        }
        let contact = HazardContact {
            index,
            kind: hazard.kind,
            time: self.elapsed,
        };
        for handler in &mut self.handlers {
            handler(&contact);
        }
        Some(contact)
    }

    /// Index of the first deadly hazard, for hosts that only know "touched lava"
    pub fn first_deadly(&self) -> Option<usize> {
        self.hazards.iter().position(|h| h.kind.is_deadly())
    }
}
