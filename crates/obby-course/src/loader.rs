//! Course loading from TOML files

use crate::checkpoint::{Checkpoint, CheckpointTracker};
use crate::format::{CourseFile, HazardDef};
use obby_core::{CheckpointId, ObbyError, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// A validated course, ready to build trackers from
#[derive(Debug, Clone)]
pub struct Course {
    pub name: String,
    pub namespace: String,
    pub activation_radius: f32,
    pub reward_amount: u32,
    pub checkpoints: Vec<Checkpoint>,
    pub hazards: Vec<HazardDef>,
}

impl Course {
    /// Validate a parsed file and assign order and start/goal flags
    pub fn from_file(file: CourseFile) -> Result<Self> {
        if file.checkpoints.len() < 2 {
            return Err(ObbyError::CourseError(format!(
                "course '{}' needs at least a start and a goal checkpoint",
                file.course.name
            )));
        }
        if !(file.course.activation_radius > 0.0) {
            return Err(ObbyError::ValueOutOfRange {
                field: "activation_radius".into(),
                min: 0.0,
                max: f64::MAX,
                value: file.course.activation_radius as f64,
            });
        }

        let mut seen = HashSet::new();
        for def in &file.checkpoints {
            if !seen.insert(def.id.as_str()) {
                return Err(ObbyError::CourseError(format!(
                    "duplicate checkpoint id '{}'",
                    def.id
                )));
            }
        }

        Ok(Self::assemble(file))
    }

    fn assemble(file: CourseFile) -> Self {
        let explicit_start = file.checkpoints.iter().any(|c| c.start);
        let explicit_goal = file.checkpoints.iter().any(|c| c.goal);
        let last = file.checkpoints.len().saturating_sub(1);
        let checkpoints = file
            .checkpoints
            .iter()
            .enumerate()
            .map(|(order, def)| Checkpoint {
                id: CheckpointId::new(def.id.clone()),
                label: def.label.clone(),
                position: def.position,
                order,
                is_start: if explicit_start { def.start } else { order == 0 },
                is_goal: if explicit_goal { def.goal } else { order == last },
            })
            .collect();

        Self {
            name: file.course.name,
            namespace: file.course.namespace,
            activation_radius: file.course.activation_radius,
            reward_amount: file.course.reward_amount,
            checkpoints,
            hazards: file.hazards,
        }
    }

    /// The built-in four-checkpoint course
    pub fn builtin() -> Self {
        Self::assemble(CourseFile::builtin())
    }

    pub fn tracker(&self) -> Result<CheckpointTracker> {
        CheckpointTracker::new(self.checkpoints.clone(), self.activation_radius)
    }

    pub fn start(&self) -> Option<&Checkpoint> {
        self.checkpoints.iter().find(|c| c.is_start)
    }
}

/// Load a course from a TOML file
pub fn load_course<P: AsRef<Path>>(path: P) -> Result<Course> {
    let content = fs::read_to_string(path)?;
    load_course_string(&content)
}

/// Load a course from a TOML string
pub fn load_course_string(content: &str) -> Result<Course> {
    let file: CourseFile = toml::from_str(content)?;
    let course = Course::from_file(file)?;
    // The tracker enforces exactly one start and at least one goal
    course.tracker()?;
    tracing::debug!(
        "loaded course '{}' with {} checkpoints and {} hazards",
        course.name,
        course.checkpoints.len(),
        course.hazards.len()
    );
    Ok(course)
}
