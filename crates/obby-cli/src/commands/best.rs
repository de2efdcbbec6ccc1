//! Best-time commands

use super::load_course_or_builtin;
use anyhow::{Context, Result};
use clap::Subcommand;
use obby_course::BestTimeStore;
use obby_player::ObbyConfig;
use obby_runtime::TomlFileStore;
use std::path::Path;

#[derive(Subcommand)]
pub enum BestCommands {
    /// Show the recorded best time
    Show {
        /// Path to course file (built-in course if omitted)
        #[arg(long)]
        course: Option<String>,
    },
    /// Forget the recorded best time
    Reset {
        /// Path to course file (built-in course if omitted)
        #[arg(long)]
        course: Option<String>,
    },
}

pub fn run(cmd: BestCommands) -> Result<()> {
    let config = ObbyConfig::load().context("Failed to load config")?;
    let path = config.store_path();

    match cmd {
        BestCommands::Show { course } => {
            let course = load_course_or_builtin(course.as_deref())?;
            let store = TomlFileStore::open(&path)
                .with_context(|| format!("Failed to open store {}", path.display()))?;
            let best = BestTimeStore::open(Box::new(store), &course.namespace);
            match best.best_ms() {
                Some(ms) => println!(
                    "{}: {} ({} ms)",
                    course.name,
                    obby_course::format_time(ms),
                    ms
                ),
                None => println!("{}: {}", course.name, obby_course::BEST_TIME_PLACEHOLDER),
            }
        }
        BestCommands::Reset { course } => {
            let course = load_course_or_builtin(course.as_deref())?;
            if clear_best(&path, &course.namespace)? {
                println!("Cleared best time for '{}'", course.name);
            } else {
                println!("No best time recorded for '{}'", course.name);
            }
        }
    }
    Ok(())
}

/// Remove the best time for `namespace`. Returns whether one was recorded.
fn clear_best(path: &Path, namespace: &str) -> Result<bool> {
    let mut store = TomlFileStore::open(path)
        .with_context(|| format!("Failed to open store {}", path.display()))?;
    let removed = store.remove(&BestTimeStore::key_for(namespace))?;
    Ok(removed.is_some())
}
