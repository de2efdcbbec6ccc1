//! Scripted headless input
//!
//! A script is a timed list of key presses, key releases and hazard contacts
//! played against a controller at a fixed tick rate. Run time is simulated:
//! the runner advances a `ManualTimeSource` by `dt` each tick, so a scripted
//! run finishes in milliseconds but reports the time a player would have taken.

use crate::controller::ObbyController;
use obby_core::{ObbyError, Result, Vec3};
use obby_runtime::{key_from_name, CourseEvent, ManualTimeSource};
use serde::{Deserialize, Serialize};
use std::path::Path;
use winit::keyboard::KeyCode;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputScript {
    /// Seconds per tick
    #[serde(default = "default_dt")]
    pub dt: f64,
    /// Total simulated seconds
    pub duration: f64,
    /// End as soon as the goal is reached
    #[serde(default = "default_true")]
    pub stop_on_complete: bool,
    /// Treat `dt` as a frame delta and simulate in 60 Hz fixed steps
    #[serde(default)]
    pub fixed_step: bool,
    #[serde(default)]
    pub events: Vec<ScriptEvent>,
}

fn default_dt() -> f64 {
    1.0 / 60.0
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptEvent {
    /// Simulated time in seconds
    pub at: f64,
    #[serde(default)]
    pub press: Vec<String>,
    #[serde(default)]
    pub release: Vec<String>,
    /// Touch the first deadly hazard
    #[serde(default)]
    pub hazard: bool,
}

impl InputScript {
    /// Hold forward from the start until the goal or `duration` runs out
    pub fn straight_run(duration: f64) -> Self {
        Self {
            dt: default_dt(),
            duration,
            stop_on_complete: true,
            fixed_step: false,
            events: vec![ScriptEvent {
                at: 0.0,
                press: vec!["KeyW".into()],
                ..Default::default()
            }],
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let script: InputScript = toml::from_str(content)?;
        if !(script.dt > 0.0) {
            return Err(ObbyError::ValueOutOfRange {
                field: "dt".into(),
                min: 0.0,
                max: obby_runtime::MAX_FRAME_DELTA,
                value: script.dt,
            });
        }
        Ok(script)
    }
}

/// What a scripted run produced
#[derive(Debug, Clone)]
pub struct ScriptReport {
    pub ticks: u64,
    pub simulated_secs: f64,
    pub final_position: Vec3,
    pub complete: bool,
    pub elapsed: String,
    pub best: String,
    pub events: Vec<CourseEvent>,
}

struct ResolvedEvent {
    at: f64,
    press: Vec<KeyCode>,
    release: Vec<KeyCode>,
    hazard: bool,
}

fn resolve_keys(names: &[String]) -> Result<Vec<KeyCode>> {
    names
        .iter()
        .map(|name| {
            key_from_name(name)
                .ok_or_else(|| ObbyError::InputError(format!("unknown key '{}'", name)))
        })
        .collect()
}

/// Play `script` against `controller`. `clock` must be the time source the
/// controller was built with.
pub fn run_script<H: Clone>(
    controller: &mut ObbyController<H>,
    script: &InputScript,
    clock: &ManualTimeSource,
) -> Result<ScriptReport> {
    let mut pending = script
        .events
        .iter()
        .map(|e| {
            Ok(ResolvedEvent {
                at: e.at,
                press: resolve_keys(&e.press)?,
                release: resolve_keys(&e.release)?,
                hazard: e.hazard,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    pending.sort_by(|a, b| a.at.total_cmp(&b.at));
    let mut pending = pending.into_iter().peekable();

    let dt = script.dt.min(obby_runtime::MAX_FRAME_DELTA);
    let dt_ms = (dt * 1000.0).round() as u64;
    let mut events = Vec::new();
    let mut ticks = 0u64;
    let mut t = 0.0;

    while t < script.duration {
        while let Some(event) = pending.next_if(|e| e.at <= t) {
            for key in event.press {
                controller.handle_key_down(key);
            }
            for key in event.release {
                controller.handle_key_up(key);
            }
            if event.hazard {
                match controller.obstacles().first_deadly() {
                    Some(index) => {
                        controller.report_hazard_contact(index);
                    }
                    None => controller.on_hazard_contact(),
                }
            }
        }

        clock.advance_ms(dt_ms);
        if script.fixed_step {
            controller.update_fixed(dt);
        } else {
            controller.update(dt);
        }
        ticks += 1;
        t = ticks as f64 * dt;
        events.extend(controller.drain_events());

        if script.stop_on_complete && controller.is_course_complete() {
            break;
        }
    }

    controller.settle_rewards();
    events.extend(controller.drain_events());

    tracing::debug!("script finished after {} ticks", ticks);
    Ok(ScriptReport {
        ticks,
        simulated_secs: t,
        final_position: controller.character().position(),
        complete: controller.is_course_complete(),
        elapsed: controller.get_elapsed_formatted(),
        best: controller.get_best_formatted(),
        events,
    })
}
