//! Obby Player - session wiring for the obby character controller
//!
//! - `ObbyController` — input, locomotion, checkpoints, timer, respawn and
//!   rewards driven from one per-frame `update`
//! - `HudSnapshot` — what an overlay shows each frame
//! - `ObbyConfig` — layered global/project/env configuration
//! - `RewardDispatcher` — reward delivery on a worker thread
//! - `HttpRewardService` — reward client for the wallet mint endpoint
//! - `InputScript` — timed key script for headless runs

pub mod config;
mod controller;
pub mod hud;
mod reward_dispatch;
mod reward_http;
pub mod script;

pub use config::ObbyConfig;
pub use controller::{Collaborators, ObbyController};
pub use hud::HudSnapshot;
pub use reward_dispatch::{RewardDispatcher, RewardOutcome};
pub use reward_http::HttpRewardService;
pub use script::{run_script, InputScript, ScriptEvent, ScriptReport};
