//! Clip-name resolution
//!
//! Characters arrive with whatever clip names their exporter produced
//! (`"Idle"`, `"Armature|Walk"`, `"Running"`...). The resolver maps them onto
//! the five canonical locomotion roles using a fixed alias table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A locomotion role, independent of how the source clip is named
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalRole {
    Idle,
    Walk,
    Run,
    TurnLeft,
    TurnRight,
}

impl CanonicalRole {
    pub const ALL: [CanonicalRole; 5] = [
        CanonicalRole::Idle,
        CanonicalRole::Walk,
        CanonicalRole::Run,
        CanonicalRole::TurnLeft,
        CanonicalRole::TurnRight,
    ];

    /// Alias names in priority order
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            CanonicalRole::Idle => &["Idle", "idle", "Idle_01", "Armature|Idle"],
            CanonicalRole::Walk => &[
                "Walk",
                "Walking",
                "WalkForward",
                "Move",
                "Locomotion",
                "Armature|Walk",
            ],
            CanonicalRole::Run => &["Run", "Running", "Sprint", "Armature|Run"],
            CanonicalRole::TurnLeft => &["TurnLeft", "Turn_L", "RotateLeft", "Armature|TurnLeft"],
            CanonicalRole::TurnRight => {
                &["TurnRight", "Turn_R", "RotateRight", "Armature|TurnRight"]
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalRole::Idle => "idle",
            CanonicalRole::Walk => "walk",
            CanonicalRole::Run => "run",
            CanonicalRole::TurnLeft => "turnLeft",
            CanonicalRole::TurnRight => "turnRight",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            CanonicalRole::Idle => 0,
            CanonicalRole::Walk => 1,
            CanonicalRole::Run => 2,
            CanonicalRole::TurnLeft => 3,
            CanonicalRole::TurnRight => 4,
        }
    }
}

impl fmt::Display for CanonicalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Externally supplied clips, keyed by their source name.
///
/// Insertion order is preserved; substring matching walks clips in that order.
#[derive(Debug, Clone)]
pub struct ClipSet<H> {
    clips: Vec<(String, H)>,
}

impl<H> Default for ClipSet<H> {
    fn default() -> Self {
        Self { clips: Vec::new() }
    }
}

impl<H> ClipSet<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a clip. A clip with the same name is replaced in place.
    pub fn insert(&mut self, name: impl Into<String>, handle: H) {
        let name = name.into();
        if let Some(slot) = self.clips.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = handle;
        } else {
            self.clips.push((name, handle));
        }
    }

    pub fn get(&self, name: &str) -> Option<&H> {
        self.clips.iter().find(|(n, _)| n == name).map(|(_, h)| h)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.clips.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &H)> {
        self.clips.iter().map(|(n, h)| (n.as_str(), h))
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

impl<H, S: Into<String>> FromIterator<(S, H)> for ClipSet<H> {
    fn from_iter<I: IntoIterator<Item = (S, H)>>(iter: I) -> Self {
        let mut set = ClipSet::new();
        for (name, handle) in iter {
            set.insert(name, handle);
        }
        set
    }
}

/// Resolved handle per canonical role; `None` where nothing matched.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalActionMap<H> {
    slots: [Option<H>; 5],
}

impl<H> Default for CanonicalActionMap<H> {
    fn default() -> Self {
        Self {
            slots: [None, None, None, None, None],
        }
    }
}

impl<H> CanonicalActionMap<H> {
    pub fn get(&self, role: CanonicalRole) -> Option<&H> {
        self.slots[role.index()].as_ref()
    }

    pub fn is_resolved(&self, role: CanonicalRole) -> bool {
        self.slots[role.index()].is_some()
    }

    /// Roles that have a clip, in canonical order
    pub fn resolved_roles(&self) -> Vec<CanonicalRole> {
        CanonicalRole::ALL
            .into_iter()
            .filter(|r| self.is_resolved(*r))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn set(&mut self, role: CanonicalRole, handle: Option<H>) {
        self.slots[role.index()] = handle;
    }
}

/// Map an arbitrary clip set onto the canonical roles.
///
/// For each role, an exact case-insensitive match against the alias list wins;
/// otherwise the first alias (in priority order) contained in any clip name
/// wins. If clips exist but none looks like idle, the first clip stands in for
/// idle so a non-empty set always has a rest pose. Never fails.
pub fn resolve_actions<H: Clone>(clips: &ClipSet<H>) -> CanonicalActionMap<H> {
    let mut map = CanonicalActionMap::default();
    if clips.is_empty() {
        return map;
    }

    let lowered: Vec<(String, &H)> = clips
        .iter()
        .map(|(name, handle)| (name.to_lowercase(), handle))
        .collect();

    for role in CanonicalRole::ALL {
        map.set(role, find_for_role(role, &lowered).cloned());
    }

    if !map.is_resolved(CanonicalRole::Idle) {
        if let Some((name, handle)) = clips.iter().next() {
            tracing::debug!("no idle-like clip; using '{}' as idle", name);
            map.set(CanonicalRole::Idle, Some(handle.clone()));
        }
    }

    for role in CanonicalRole::ALL {
        if !map.is_resolved(role) {
            tracing::debug!("animation role '{}' unresolved", role);
        }
    }

    map
}

fn find_for_role<'a, H>(role: CanonicalRole, lowered: &[(String, &'a H)]) -> Option<&'a H> {
    let aliases = role.aliases();

    // Exact match, alias priority order
    for alias in aliases {
        let alias = alias.to_lowercase();
        if let Some((_, handle)) = lowered.iter().find(|(name, _)| *name == alias) {
            return Some(*handle);
        }
    }

    // Substring containment, alias priority order
    for alias in aliases {
        let alias = alias.to_lowercase();
        if let Some((_, handle)) = lowered.iter().find(|(name, _)| name.contains(&alias)) {
            return Some(*handle);
        }
    }

    None
}
