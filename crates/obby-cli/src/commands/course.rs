//! Course file commands

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use obby_course::CourseFile;
use std::path::Path;

#[derive(Subcommand)]
pub enum CourseCommands {
    /// Write the built-in course as TOML
    Export {
        /// Output path (stdout if omitted)
        output: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(cmd: CourseCommands) -> Result<()> {
    match cmd {
        CourseCommands::Export { output, force } => {
            let text = CourseFile::builtin().to_toml()?;
            match output {
                Some(path) => {
                    if Path::new(&path).exists() && !force {
                        bail!("{} already exists; pass --force to overwrite", path);
                    }
                    std::fs::write(&path, text)
                        .with_context(|| format!("Failed to write {}", path))?;
                    println!("Wrote built-in course to {}", path);
                }
                None => print!("{}", text),
            }
        }
    }
    Ok(())
}
