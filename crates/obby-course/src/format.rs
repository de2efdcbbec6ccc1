//! Course file format definitions

use obby_core::Vec3;
use serde::{Deserialize, Serialize};

/// Root structure of a course TOML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseFile {
    pub course: CourseMetadata,
    #[serde(default)]
    pub checkpoints: Vec<CheckpointDef>,
    #[serde(default)]
    pub hazards: Vec<HazardDef>,
}

/// Course metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseMetadata {
    pub name: String,
    /// Prefix for persisted keys, e.g. `<namespace>.bestTime`
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_activation_radius")]
    pub activation_radius: f32,
    #[serde(default = "default_reward_amount")]
    pub reward_amount: u32,
}

fn default_namespace() -> String {
    crate::timer::DEFAULT_NAMESPACE.to_string()
}

fn default_activation_radius() -> f32 {
    crate::checkpoint::DEFAULT_ACTIVATION_RADIUS
}

fn default_reward_amount() -> u32 {
    crate::reward::DEFAULT_REWARD_AMOUNT
}

/// A checkpoint as authored. Without explicit flags the first entry is the
/// start and the last is the goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointDef {
    pub id: String,
    pub label: String,
    pub position: Vec3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub start: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub goal: bool,
}

impl CheckpointDef {
    pub fn new(id: impl Into<String>, label: impl Into<String>, position: Vec3) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            position,
            color: None,
            start: false,
            goal: false,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardKind {
    /// Oscillates along one axis
    MovingPlatform,
    /// Static geometry, no motion
    FixedPlatform,
    /// Contact sends the player back to the last checkpoint
    Lava,
}

impl HazardKind {
    /// Whether touching this hazard triggers a respawn
    pub fn is_deadly(&self) -> bool {
        matches!(self, HazardKind::Lava)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    #[default]
    X,
    Y,
    Z,
}

/// A hazard as authored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardDef {
    pub kind: HazardKind,
    pub position: Vec3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Vec3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<Axis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amplitude: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angular_frequency: Option<f32>,
    /// Radians added to the oscillator argument
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<f32>,
}

impl HazardDef {
    pub fn fixed(position: Vec3, size: Vec3) -> Self {
        Self {
            kind: HazardKind::FixedPlatform,
            position,
            size: Some(size),
            axis: None,
            amplitude: None,
            angular_frequency: None,
            phase: None,
        }
    }

    pub fn moving(
        position: Vec3,
        size: Vec3,
        axis: Axis,
        amplitude: f32,
        angular_frequency: f32,
    ) -> Self {
        Self {
            kind: HazardKind::MovingPlatform,
            position,
            size: Some(size),
            axis: Some(axis),
            amplitude: Some(amplitude),
            angular_frequency: Some(angular_frequency),
            phase: None,
        }
    }

    pub fn lava(position: Vec3, size: Vec3) -> Self {
        Self {
            kind: HazardKind::Lava,
            ..Self::fixed(position, size)
        }
    }
}

impl CourseFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            course: CourseMetadata {
                name: name.into(),
                namespace: default_namespace(),
                activation_radius: default_activation_radius(),
                reward_amount: default_reward_amount(),
            },
            checkpoints: Vec::new(),
            hazards: Vec::new(),
        }
    }

    /// The built-in four-checkpoint course
    pub fn builtin() -> Self {
        let mut file = Self::new("Obby");
        file.checkpoints = vec![
            CheckpointDef::new("start", "Start", Vec3::new(0.0, 0.5, 0.0)).with_color("#10B981"),
            CheckpointDef::new("cp1", "Checkpoint 1", Vec3::new(8.0, 0.5, 0.0))
                .with_color("#3B82F6"),
            CheckpointDef::new("cp2", "Checkpoint 2", Vec3::new(16.0, 0.5, 0.0))
                .with_color("#8B5CF6"),
            CheckpointDef::new("goal", "Goal", Vec3::new(24.0, 0.5, 0.0)).with_color("#F59E0B"),
        ];
        let platform = Vec3::new(3.0, 1.0, 1.0);
        file.hazards = vec![
            HazardDef::fixed(Vec3::new(4.0, 0.5, 0.0), platform),
            HazardDef::fixed(Vec3::new(12.0, 0.5, 0.0), platform),
            HazardDef::fixed(Vec3::new(20.0, 0.5, 0.0), platform),
            HazardDef::moving(Vec3::new(14.0, 1.0, 0.0), platform, Axis::X, 3.0, 0.8),
            HazardDef::lava(Vec3::new(0.0, -0.1, 0.0), Vec3::new(30.0, 0.2, 30.0)),
        ];
        file
    }

    pub fn to_toml(&self) -> obby_core::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_course() {
        let toml_str = r#"
[course]
name = "Tiny"

[[checkpoints]]
id = "a"
label = "A"
position = [0, 0, 0]

[[checkpoints]]
id = "b"
label = "B"
position = [5.0, 0.0, 0.0]
"#;
        let file: CourseFile = toml::from_str(toml_str).unwrap();
        assert_eq!(file.course.name, "Tiny");
        assert_eq!(file.course.namespace, "connectus.obby");
        assert!((file.course.activation_radius - 1.5).abs() < 1e-6);
        assert_eq!(file.course.reward_amount, 5);
        assert_eq!(file.checkpoints.len(), 2);
        assert_eq!(file.checkpoints[1].position, Vec3::new(5.0, 0.0, 0.0));
        assert!(file.hazards.is_empty());
    }

    #[test]
    fn parse_hazards() {
        let toml_str = r#"
[course]
name = "Hazards"

[[hazards]]
kind = "moving_platform"
position = [14, 1, 0]
axis = "z"
amplitude = 2.0
angular_frequency = 1.5

[[hazards]]
kind = "lava"
position = [0, -0.1, 0]
size = [30, 0.2, 30]
"#;
        let file: CourseFile = toml::from_str(toml_str).unwrap();
        assert_eq!(file.hazards[0].kind, HazardKind::MovingPlatform);
        assert_eq!(file.hazards[0].axis, Some(Axis::Z));
        assert!(file.hazards[1].kind.is_deadly());
        assert_eq!(file.hazards[1].size, Some(Vec3::new(30.0, 0.2, 30.0)));
    }

    #[test]
    fn builtin_serializes_and_reparses() {
        let file = CourseFile::builtin();
        let text = file.to_toml().unwrap();
        let parsed: CourseFile = toml::from_str(&text).unwrap();
        assert_eq!(parsed.checkpoints.len(), 4);
        assert_eq!(parsed.checkpoints[3].id, "goal");
        assert_eq!(parsed.hazards.len(), 5);
        assert!(!text.contains("start = false"));
    }
}
