//! Play command - runs a course headlessly from a key script

use super::load_course_or_builtin;
use anyhow::{bail, Context, Result};
use obby_animation::ClipSet;
use obby_course::{NullRewardService, RewardService};
use obby_player::{
    run_script, Collaborators, HttpRewardService, InputScript, ObbyConfig, ObbyController,
    ScriptReport,
};
use obby_runtime::{
    CourseEvent, KeyValueStore, ManualTimeSource, MemoryStore, SystemTimeSource, TimeSource,
    TomlFileStore,
};
use std::path::Path;

pub struct PlayArgs {
    pub course: Option<String>,
    pub script: Option<String>,
    pub duration: f64,
    pub clips: Vec<String>,
    pub no_rewards: bool,
    pub no_save: bool,
    pub format: String,
}

pub fn run(args: PlayArgs) -> Result<()> {
    if args.format != "text" && args.format != "json" {
        bail!("unknown format '{}'; valid values: text, json", args.format);
    }

    let config = ObbyConfig::load().context("Failed to load config")?;
    let course = load_course_or_builtin(args.course.as_deref())?;
    let script = match &args.script {
        Some(path) => InputScript::load(Path::new(path))
            .with_context(|| format!("Failed to load script {}", path))?,
        None => InputScript::straight_run(args.duration),
    };

    let store: Box<dyn KeyValueStore> = if args.no_save {
        Box::new(MemoryStore::new())
    } else {
        let path = config.store_path();
        match TomlFileStore::open(&path) {
            Ok(store) => Box::new(store),
            Err(e) => {
                tracing::warn!("store {} unavailable, best time not saved: {}", path.display(), e);
                Box::new(MemoryStore::new())
            }
        }
    };

    let rewards: Box<dyn RewardService> = match config.reward_url() {
        Some(url) if !args.no_rewards => Box::new(HttpRewardService::new(url)),
        _ => Box::new(NullRewardService),
    };

    // Simulated wall clock, anchored at the real time
    let clock = ManualTimeSource::new(SystemTimeSource.now_ms());
    let mut controller: ObbyController<String> = ObbyController::new(
        &course,
        config.locomotion,
        Collaborators {
            time: Box::new(clock.clone()),
            store,
            rewards,
        },
    )
    .context("Failed to start course")?;

    if let Some(amount) = config.reward.amount {
        controller.set_reward_amount(amount);
    }
    controller.set_spawn_yaw(initial_yaw(&course));
    if !args.clips.is_empty() {
        let clips: ClipSet<String> = args.clips.iter().map(|c| (c.as_str(), c.clone())).collect();
        controller.set_clips(&clips);
    }

    let report = run_script(&mut controller, &script, &clock)?;
    controller.shutdown();

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&report_json(&course.name, &report))?);
    } else {
        print_report(&course.name, &report);
        println!();
        println!("{}", controller.hud());
    }
    Ok(())
}

/// Face from the start toward the next checkpoint
fn initial_yaw(course: &obby_course::Course) -> f32 {
    let mut ordered = course.checkpoints.iter().filter(|c| !c.is_start);
    match (course.start(), ordered.next()) {
        (Some(start), Some(next)) => {
            let dx = next.position.x - start.position.x;
            let dz = next.position.z - start.position.z;
            dx.atan2(dz)
        }
        _ => 0.0,
    }
}

fn print_report(course: &str, report: &ScriptReport) {
    println!("Course: {}", course);
    println!(
        "Simulated {:.2}s over {} ticks",
        report.simulated_secs, report.ticks
    );
    println!();
    println!("Events:");
    for event in &report.events {
        match event {
            CourseEvent::RunStarted => println!("  run started"),
            CourseEvent::CheckpointReached { id, label } => {
                println!("  reached {} ({})", label, id)
            }
            CourseEvent::RewardFailed { id, reason } => {
                println!("  reward for {} failed: {}", id, reason)
            }
            CourseEvent::CourseCompleted {
                elapsed_ms,
                new_best,
            } => println!(
                "  completed in {}{}",
                obby_course::format_time(*elapsed_ms),
                if *new_best { " (new best)" } else { "" }
            ),
            CourseEvent::Respawned { checkpoint, .. } => println!("  respawned at {}", checkpoint),
        }
    }
    println!();
    if report.complete {
        println!("Finished: {}  best {}", report.elapsed, report.best);
    } else {
        println!("Did not finish: {}  best {}", report.elapsed, report.best);
    }
}

fn report_json(course: &str, report: &ScriptReport) -> serde_json::Value {
    let events: Vec<serde_json::Value> = report
        .events
        .iter()
        .map(|event| match event {
            CourseEvent::RunStarted => serde_json::json!({ "event": "run_started" }),
            CourseEvent::CheckpointReached { id, label } => serde_json::json!({
                "event": "checkpoint_reached", "id": id.as_str(), "label": label
            }),
            CourseEvent::RewardFailed { id, reason } => serde_json::json!({
                "event": "reward_failed", "id": id.as_str(), "reason": reason
            }),
            CourseEvent::CourseCompleted {
                elapsed_ms,
                new_best,
            } => serde_json::json!({
                "event": "course_completed", "elapsed_ms": elapsed_ms, "new_best": new_best
            }),
            CourseEvent::Respawned {
                checkpoint,
                position,
            } => serde_json::json!({
                "event": "respawned", "checkpoint": checkpoint.as_str(),
                "position": position.to_array()
            }),
        })
        .collect();

    serde_json::json!({
        "course": course,
        "ticks": report.ticks,
        "simulated_secs": report.simulated_secs,
        "complete": report.complete,
        "elapsed": report.elapsed,
        "best": report.best,
        "final_position": report.final_position.to_array(),
        "events": events,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use obby_course::Course;

    #[test]
    fn builtin_course_faces_positive_x() {
        let yaw = initial_yaw(&Course::builtin());
        assert!((yaw - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }
}
