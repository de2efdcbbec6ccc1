//! Checkpoint reward contract
//!
//! Rewards are best-effort. A failure is reported back to the caller, which
//! logs it and carries on; progress is never rolled back.

use obby_core::{ObbyError, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Amount granted per rewarded checkpoint unless the course overrides it
pub const DEFAULT_REWARD_AMOUNT: u32 = 5;

/// Delivers a reward. Calls may block; hosts run them off the simulation
/// thread, hence `Send`.
pub trait RewardService: Send {
    fn reward_checkpoint(&mut self, amount: u32) -> Result<()>;
}

/// Grants nothing and always succeeds. Used when rewards are disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRewardService;

impl RewardService for NullRewardService {
    fn reward_checkpoint(&mut self, _amount: u32) -> Result<()> {
        Ok(())
    }
}

/// Keeps every requested amount. Clones share the same log.
#[derive(Debug, Default, Clone)]
pub struct RecordingRewardService {
    calls: Arc<Mutex<Vec<u32>>>,
}

impl RecordingRewardService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<u32> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.calls().len()
    }

    pub fn total(&self) -> u32 {
        self.calls().iter().sum()
    }
}

impl RewardService for RecordingRewardService {
    fn reward_checkpoint(&mut self, amount: u32) -> Result<()> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(amount);
        }
        Ok(())
    }
}

/// Always fails, counting attempts
#[derive(Debug, Default, Clone)]
pub struct FailingRewardService {
    attempts: Arc<AtomicUsize>,
}

impl FailingRewardService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl RewardService for FailingRewardService {
    fn reward_checkpoint(&mut self, _amount: u32) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(ObbyError::RewardError("reward service unreachable".into()))
    }
}
