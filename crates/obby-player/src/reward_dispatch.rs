//! Reward delivery on a worker thread
//!
//! The tick only queues a request. A slow or unreachable reward endpoint
//! therefore never stalls locomotion or adds to the wall-clock run time.
//! Outcomes come back on a second channel for the controller to collect.

use obby_core::CheckpointId;
use obby_course::RewardService;
use std::sync::mpsc;

struct RewardRequest {
    checkpoint: CheckpointId,
    amount: u32,
}

/// How one reward request ended
#[derive(Debug, Clone, PartialEq)]
pub struct RewardOutcome {
    pub checkpoint: CheckpointId,
    pub amount: u32,
    /// `None` when the reward was delivered
    pub error: Option<String>,
}

pub struct RewardDispatcher {
    requests: Option<mpsc::Sender<RewardRequest>>,
    outcomes: mpsc::Receiver<RewardOutcome>,
    in_flight: usize,
    rejected: Vec<RewardOutcome>,
}

impl RewardDispatcher {
    /// Move `service` onto its own worker thread
    pub fn spawn(mut service: Box<dyn RewardService>) -> Self {
        let (request_tx, request_rx) = mpsc::channel::<RewardRequest>();
        let (outcome_tx, outcome_rx) = mpsc::channel();

        std::thread::spawn(move || {
            for request in request_rx {
                let error = service
                    .reward_checkpoint(request.amount)
                    .err()
                    .map(|e| e.to_string());
                let outcome = RewardOutcome {
                    checkpoint: request.checkpoint,
                    amount: request.amount,
                    error,
                };
                if outcome_tx.send(outcome).is_err() {
                    break;
                }
            }
        });

        Self {
            requests: Some(request_tx),
            outcomes: outcome_rx,
            in_flight: 0,
            rejected: Vec::new(),
        }
    }

    /// Queue a reward. Never blocks.
    pub fn submit(&mut self, checkpoint: CheckpointId, amount: u32) {
        let request = RewardRequest { checkpoint, amount };
        let sent = match &self.requests {
            Some(tx) => tx.send(request).map_err(|e| e.0),
            None => Err(request),
        };
        match sent {
            Ok(()) => self.in_flight += 1,
            Err(request) => self.rejected.push(RewardOutcome {
                checkpoint: request.checkpoint,
                amount: request.amount,
                error: Some("reward delivery is closed".into()),
            }),
        }
    }

    /// Outcomes that are ready now
    pub fn poll(&mut self) -> Vec<RewardOutcome> {
        let mut outcomes = std::mem::take(&mut self.rejected);
        while let Ok(outcome) = self.outcomes.try_recv() {
            self.in_flight -= 1;
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Block until every queued request has an outcome
    pub fn settle(&mut self) -> Vec<RewardOutcome> {
        let mut outcomes = std::mem::take(&mut self.rejected);
        while self.in_flight > 0 {
            match self.outcomes.recv() {
                Ok(outcome) => {
                    self.in_flight -= 1;
                    outcomes.push(outcome);
                }
                // Worker is gone; nothing else will arrive
                Err(_) => self.in_flight = 0,
            }
        }
        outcomes
    }

    /// Requests queued but not yet answered
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Stop accepting requests. Already queued ones are still delivered.
    pub fn close(&mut self) {
        self.requests = None;
    }
}
