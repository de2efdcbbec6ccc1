//! Stable checkpoint identifiers

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// A checkpoint identifier as authored in the course file (`"start"`, `"cp1"`, ...).
///
/// Identifiers are compared by exact string equality; they never change
/// once a course has been loaded.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckpointId(String);

impl CheckpointId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CheckpointId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CheckpointId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for CheckpointId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for CheckpointId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CheckpointId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Debug for CheckpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CheckpointId({})", self.0)
    }
}

impl fmt::Display for CheckpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
