//! Course validation command

use anyhow::{bail, Result};
use obby_course::{load_course, BestTimeStore};

pub fn run(path: &str) -> Result<()> {
    match load_course(path) {
        Ok(course) => {
            println!("OK: '{}'", course.name);
            println!(
                "  {} checkpoint(s), {} hazard(s)",
                course.checkpoints.len(),
                course.hazards.len()
            );
            println!("  activation radius {}", course.activation_radius);
            println!("  best-time key {}", BestTimeStore::key_for(&course.namespace));
            for cp in &course.checkpoints {
                let role = if cp.is_start {
                    " [start]"
                } else if cp.is_goal {
                    " [goal]"
                } else {
                    ""
                };
                println!(
                    "    {}. {} ({}) at ({}, {}, {}){}",
                    cp.order + 1,
                    cp.label,
                    cp.id,
                    cp.position.x,
                    cp.position.y,
                    cp.position.z,
                    role
                );
            }
            Ok(())
        }
        Err(e) => bail!("invalid course {}: {}", path, e),
    }
}
