//! The obby session: one character on one course
//!
//! Per tick the controller samples input, steps locomotion, queries
//! checkpoints and queues rewards. Hazard contacts respawn the character at
//! the last checkpoint. Input events only ever touch `InputState`; everything
//! else is written from `update`.

use crate::hud::HudSnapshot;
use crate::reward_dispatch::{RewardDispatcher, RewardOutcome};
use obby_animation::ClipSet;
use obby_character::{CharacterController, LocomotionConfig, LocomotionStep};
use obby_core::{Result, Vec3};
use obby_course::{
    Advance, BestTimeStore, CheckpointTracker, Course, ObstacleDriver, RespawnController,
    RewardService, RunTimer,
};
use obby_runtime::{
    CourseEvent, EventBus, GameClock, InputState, KeyValueStore, RuntimeSystem, TimeSource,
};
use winit::keyboard::KeyCode;

/// External services the controller talks to
pub struct Collaborators {
    pub time: Box<dyn TimeSource>,
    pub store: Box<dyn KeyValueStore>,
    pub rewards: Box<dyn RewardService>,
}

pub struct ObbyController<H> {
    course_name: String,
    reward_amount: u32,
    input: InputState,
    clock: GameClock,
    character: CharacterController<H>,
    tracker: CheckpointTracker,
    timer: RunTimer,
    respawns: RespawnController,
    obstacles: ObstacleDriver,
    rewards: RewardDispatcher,
    events: EventBus,
    spawn_yaw: f32,
    active: bool,
}

impl<H: Clone> ObbyController<H> {
    /// Build a session for `course`. The character spawns at the start
    /// checkpoint and the run timer starts immediately.
    pub fn new(
        course: &Course,
        locomotion: LocomotionConfig,
        services: Collaborators,
    ) -> Result<Self> {
        locomotion.validate()?;
        let tracker = course.tracker()?;
        let spawn = tracker.spawn_position();
        let best = BestTimeStore::open(services.store, &course.namespace);
        let timer = RunTimer::new(services.time, best);

        let mut events = EventBus::new();
        events.push(CourseEvent::RunStarted);
        tracing::info!(
            "course '{}' ready: {} checkpoints, best {}",
            course.name,
            course.checkpoints.len(),
            timer.best_formatted()
        );

        Ok(Self {
            course_name: course.name.clone(),
            reward_amount: course.reward_amount,
            input: InputState::new(),
            clock: GameClock::new(),
            character: CharacterController::new(locomotion, spawn),
            tracker,
            timer,
            respawns: RespawnController::new(),
            obstacles: ObstacleDriver::new(&course.hazards),
            rewards: RewardDispatcher::spawn(services.rewards),
            events,
            spawn_yaw: 0.0,
            active: true,
        })
    }

    /// Facing used at spawn and on every new run. Applies immediately.
    pub fn set_spawn_yaw(&mut self, yaw: f32) {
        self.spawn_yaw = yaw;
        self.character.set_facing_yaw(yaw);
    }

    /// Override the per-checkpoint reward amount
    pub fn set_reward_amount(&mut self, amount: u32) {
        self.reward_amount = amount;
    }

    // --- asset delivery ---

    pub fn set_clips(&mut self, clips: &ClipSet<H>) {
        self.character.set_clips(clips);
    }

    pub fn mark_clips_failed(&mut self, reason: impl Into<String>) {
        self.character.mark_clips_failed(reason);
    }

    // --- input ---

    pub fn handle_key_down(&mut self, key: KeyCode) {
        self.input.process_key_down(key);
    }

    pub fn handle_key_up(&mut self, key: KeyCode) {
        self.input.process_key_up(key);
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    // --- simulation ---

    /// Advance one frame. `dt` is clamped to `[0, MAX_FRAME_DELTA]`.
    /// Does nothing after `shutdown`.
    pub fn update(&mut self, dt: f64) -> Option<LocomotionStep> {
        if !self.active {
            return None;
        }
        self.clock.advance(dt);
        Some(self.simulate(self.clock.delta_time))
    }

    /// Advance one frame through the fixed-timestep accumulator. Runs one
    /// simulation step per whole `fixed_timestep` and carries the remainder
    /// to the next frame. A host picks this or `update`, not both.
    pub fn update_fixed(&mut self, frame_dt: f64) -> Vec<LocomotionStep> {
        let mut steps = Vec::new();
        if !self.active {
            return steps;
        }
        self.clock.advance(frame_dt);
        while self.clock.should_fixed_update() {
            self.clock.consume_fixed_step();
            steps.push(self.simulate(self.clock.fixed_timestep));
        }
        steps
    }

    fn simulate(&mut self, dt: f64) -> LocomotionStep {
        let outcomes = self.rewards.poll();
        self.record_reward_outcomes(outcomes);

        self.obstacles.update(self.clock.total_time);

        let intent = self.input.sample_intent();
        let step = self.character.tick(&intent, dt);

        if let Some(advance) = self.tracker.update(self.character.position()) {
            self.on_advance(advance);
        }
        step
    }

    fn on_advance(&mut self, advance: Advance) {
        // The run time is read before the goal's reward is queued
        let completion = if advance.is_goal() {
            self.timer.complete()
        } else {
            None
        };

        if advance.is_rewarded() {
            let checkpoint = advance.checkpoint;
            self.events.push(CourseEvent::CheckpointReached {
                id: checkpoint.id.clone(),
                label: checkpoint.label,
            });
            self.rewards.submit(checkpoint.id, self.reward_amount);
        }

        if let Some((elapsed_ms, new_best)) = completion {
            tracing::info!(
                "'{}' completed in {}",
                self.course_name,
                obby_course::format_time(elapsed_ms)
            );
            self.events.push(CourseEvent::CourseCompleted {
                elapsed_ms,
                new_best,
            });
        }
    }

    fn record_reward_outcomes(&mut self, outcomes: Vec<RewardOutcome>) {
        for outcome in outcomes {
            match outcome.error {
                None => tracing::debug!("rewarded {} for {}", outcome.amount, outcome.checkpoint),
                Some(reason) => {
                    tracing::warn!("reward for {} failed: {}", outcome.checkpoint, reason);
                    self.events.push(CourseEvent::RewardFailed {
                        id: outcome.checkpoint,
                        reason,
                    });
                }
            }
        }
    }

    /// Wait for every queued reward and emit `RewardFailed` for the ones that
    /// failed. Blocks for at most the reward client's timeout per request.
    pub fn settle_rewards(&mut self) {
        let outcomes = self.rewards.settle();
        self.record_reward_outcomes(outcomes);
    }

    pub fn pending_rewards(&self) -> usize {
        self.rewards.in_flight()
    }

    /// Hazard contact from the host: back to the last checkpoint, timer reset
    pub fn on_hazard_contact(&mut self) {
        if !self.active {
            return;
        }
        let character = &mut self.character;
        let respawn = self
            .respawns
            .respawn(&self.tracker, &mut self.timer, |p| character.teleport(p));
        self.events.push(CourseEvent::Respawned {
            checkpoint: respawn.checkpoint,
            position: respawn.position,
        });
    }

    /// Contact with a specific hazard. Only deadly hazards respawn.
    pub fn report_hazard_contact(&mut self, index: usize) -> bool {
        if !self.active {
            return false;
        }
        let deadly = self.obstacles.report_contact(index).is_some();
        if deadly {
            self.on_hazard_contact();
        }
        deadly
    }

    /// Start over from the start checkpoint. The best time is kept.
    pub fn start_new_run(&mut self) {
        if !self.active {
            return;
        }
        self.tracker.reset();
        self.respawns.reset();
        self.character.teleport(self.tracker.spawn_position());
        self.character.set_facing_yaw(self.spawn_yaw);
        self.timer.restart();
        self.events.push(CourseEvent::RunStarted);
        tracing::info!("new run on '{}'", self.course_name);
    }

    /// Detach input and stop ticking. Later calls are no-ops.
    pub fn shutdown(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.input.detach();
        self.rewards.close();
        tracing::debug!("controller for '{}' shut down", self.course_name);
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    // --- queries for the overlay ---

    pub fn get_spawn_position(&self) -> Vec3 {
        self.tracker.spawn_position()
    }

    pub fn get_current_checkpoint_label(&self) -> String {
        self.tracker.current_label().to_string()
    }

    pub fn get_progress_label(&self) -> String {
        self.tracker.progress_label()
    }

    pub fn get_elapsed_formatted(&self) -> String {
        self.timer.elapsed_formatted()
    }

    pub fn get_best_formatted(&self) -> String {
        self.timer.best_formatted()
    }

    pub fn is_course_complete(&self) -> bool {
        self.tracker.is_complete()
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            checkpoint_label: self.get_current_checkpoint_label(),
            progress_label: self.get_progress_label(),
            elapsed: self.get_elapsed_formatted(),
            best: self.get_best_formatted(),
            complete: self.is_course_complete(),
            position: self.character.position(),
            action: self.character.current_action(),
        }
    }

    // --- accessors ---

    pub fn character(&self) -> &CharacterController<H> {
        &self.character
    }

    pub fn tracker(&self) -> &CheckpointTracker {
        &self.tracker
    }

    pub fn timer(&self) -> &RunTimer {
        &self.timer
    }

    pub fn obstacles(&self) -> &ObstacleDriver {
        &self.obstacles
    }

    pub fn obstacles_mut(&mut self) -> &mut ObstacleDriver {
        &mut self.obstacles
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn respawn_count(&self) -> u32 {
        self.respawns.count()
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<CourseEvent> {
        self.events.drain()
    }
}

impl<H: Clone> RuntimeSystem for ObbyController<H> {
    fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    // Frame-driven; hosts wanting fixed steps call `update_fixed`
    fn fixed_update(&mut self, _dt: f64) -> Result<()> {
        Ok(())
    }

    fn update(&mut self, dt: f64) -> Result<()> {
        ObbyController::update(self, dt);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        ObbyController::shutdown(self);
        Ok(())
    }

    fn name(&self) -> &str {
        "obby"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use obby_course::{NullRewardService, RecordingRewardService};
    use obby_runtime::{ManualTimeSource, MemoryStore};

    fn controller() -> (ObbyController<String>, ManualTimeSource, RecordingRewardService) {
        let clock = ManualTimeSource::new(0);
        let rewards = RecordingRewardService::new();
        let c = ObbyController::new(
            &Course::builtin(),
            LocomotionConfig::default(),
            Collaborators {
                time: Box::new(clock.clone()),
                store: Box::new(MemoryStore::new()),
                rewards: Box::new(rewards.clone()),
            },
        )
        .unwrap();
        (c, clock, rewards)
    }

    #[test]
    fn spawns_at_start() {
        let (c, _, _) = controller();
        assert_eq!(c.get_spawn_position(), Vec3::new(0.0, 0.5, 0.0));
        assert_eq!(c.character().position(), Vec3::new(0.0, 0.5, 0.0));
        assert_eq!(c.get_current_checkpoint_label(), "Start");
        assert_eq!(c.get_progress_label(), "1/4");
        assert_eq!(c.get_best_formatted(), "--:--");
        assert!(!c.is_course_complete());
    }

    #[test]
    fn key_events_drive_movement() {
        let (mut c, _, _) = controller();
        c.handle_key_down(KeyCode::KeyW);
        c.update(0.2);
        assert!((c.character().position().z - 0.44).abs() < 1e-5);

        c.handle_key_up(KeyCode::KeyW);
        c.update(0.2);
        assert!((c.character().position().z - 0.44).abs() < 1e-5);
    }

    #[test]
    fn frame_delta_is_clamped() {
        let (mut c, _, _) = controller();
        c.handle_key_down(KeyCode::KeyW);
        c.update(3.0);
        assert!((c.character().position().z - 2.2 * 0.25).abs() < 1e-5);
        assert!((c.clock().total_time - 0.25).abs() < 1e-9);
    }

    #[test]
    fn start_is_not_rewarded() {
        let (mut c, _, rewards) = controller();
        for _ in 0..30 {
            c.update(1.0 / 60.0);
        }
        assert_eq!(rewards.count(), 0);
        let events = c.drain_events();
        assert_eq!(events, vec![CourseEvent::RunStarted]);
    }

    #[test]
    fn shutdown_stops_everything() {
        let (mut c, _, _) = controller();
        c.handle_key_down(KeyCode::KeyW);
        c.shutdown();
        assert!(!c.is_active());

        c.handle_key_down(KeyCode::KeyW);
        assert!(c.update(0.1).is_none());
        c.on_hazard_contact();
        c.start_new_run();
        assert_eq!(c.character().position(), Vec3::new(0.0, 0.5, 0.0));
        assert_eq!(c.respawn_count(), 0);

        // Second shutdown is harmless
        c.shutdown();
    }

    #[test]
    fn runtime_system_ticks_on_frame_update() {
        let (mut c, _, _) = controller();
        c.handle_key_down(KeyCode::ArrowUp);
        c.initialize().unwrap();
        RuntimeSystem::fixed_update(&mut c, 1.0 / 60.0).unwrap();
        assert_eq!(c.character().position().z, 0.0);
        RuntimeSystem::update(&mut c, 1.0 / 60.0).unwrap();
        assert!(c.character().position().z > 0.0);
        assert_eq!(c.name(), "obby");
        RuntimeSystem::shutdown(&mut c).unwrap();
        assert!(!c.is_active());
    }

    #[test]
    fn fixed_steps_carry_the_remainder() {
        let (mut c, _, _) = controller();
        c.handle_key_down(KeyCode::KeyW);

        // 2.4 steps of 1/60: two now, the rest carries over
        assert_eq!(c.update_fixed(0.04).len(), 2);
        assert!((c.character().position().z - 2.2 * 2.0 / 60.0).abs() < 1e-5);
        assert_eq!(c.update_fixed(0.02).len(), 1);
        assert!((c.character().position().z - 2.2 * 3.0 / 60.0).abs() < 1e-5);
        assert!(c.update_fixed(0.0).is_empty());

        c.shutdown();
        assert!(c.update_fixed(1.0).is_empty());
    }

    #[test]
    fn non_deadly_contact_is_ignored() {
        let (mut c, _, _) = controller();
        c.handle_key_down(KeyCode::KeyW);
        c.update(0.25);
        assert!(!c.report_hazard_contact(0));
        assert!(c.character().position().z > 0.0);

        let lava = c.obstacles().first_deadly().unwrap();
        assert!(c.report_hazard_contact(lava));
        assert_eq!(c.character().position(), Vec3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn moves_without_any_clips() {
        let clock = ManualTimeSource::new(0);
        let mut c: ObbyController<u32> = ObbyController::new(
            &Course::builtin(),
            LocomotionConfig::default(),
            Collaborators {
                time: Box::new(clock),
                store: Box::new(MemoryStore::new()),
                rewards: Box::new(NullRewardService),
            },
        )
        .unwrap();
        c.mark_clips_failed("404");
        c.handle_key_down(KeyCode::KeyD);
        c.update(0.1);
        assert!(c.character().facing_yaw() < 0.0);
    }
}
