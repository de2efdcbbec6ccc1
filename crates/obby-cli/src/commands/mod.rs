//! CLI command implementations

pub mod best;
pub mod course;
pub mod play;
pub mod resolve;
pub mod validate;

use anyhow::{Context, Result};
use obby_course::{load_course, Course};

/// Load the course at `path`, or the built-in course
pub(crate) fn load_course_or_builtin(path: Option<&str>) -> Result<Course> {
    match path {
        Some(path) => {
            load_course(path).with_context(|| format!("Failed to load course {}", path))
        }
        None => Ok(Course::builtin()),
    }
}
