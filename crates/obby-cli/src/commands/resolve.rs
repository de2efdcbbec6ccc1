//! Resolve command - shows the role each clip name maps to

use anyhow::Result;
use obby_animation::{resolve_actions, CanonicalRole, ClipSet};

pub fn run(clips: &[String]) -> Result<()> {
    let set: ClipSet<String> = clips.iter().map(|c| (c.as_str(), c.clone())).collect();
    let actions = resolve_actions(&set);

    for role in CanonicalRole::ALL {
        match actions.get(role) {
            Some(clip) => println!("  {:<10} -> {}", role.as_str(), clip),
            None => println!("  {:<10} -> (none)", role.as_str()),
        }
    }
    if actions.is_empty() {
        println!("\nNo roles resolved; the character will move without animation.");
    }
    Ok(())
}
