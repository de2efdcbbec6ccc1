//! HTTP reward client
//!
//! POSTs `{"amount": n}` to `<base>/wallet/demo/mint` with a short timeout.
//! Runs on the reward worker thread; failures come back as
//! `ObbyError::RewardError` for the controller to log.

use obby_core::{ObbyError, Result};
use obby_course::RewardService;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 5;
const MINT_PATH: &str = "/wallet/demo/mint";

pub struct HttpRewardService {
    mint_url: String,
    agent: ureq::Agent,
}

impl HttpRewardService {
    pub fn new(base_url: &str) -> Self {
        Self {
            mint_url: mint_url(base_url),
            agent: build_agent(),
        }
    }

    pub fn mint_url(&self) -> &str {
        &self.mint_url
    }
}

impl RewardService for HttpRewardService {
    fn reward_checkpoint(&mut self, amount: u32) -> Result<()> {
        let payload = reward_payload(amount);
        let response = self
            .agent
            .post(&self.mint_url)
            .header("Content-Type", "application/json")
            .send_json(&payload);

        match response {
            Ok(_) => {
                tracing::debug!("rewarded {} at {}", amount, self.mint_url);
                Ok(())
            }
            Err(ureq::Error::StatusCode(code)) => Err(ObbyError::RewardError(format!(
                "mint returned HTTP {}",
                code
            ))),
            Err(e) => Err(ObbyError::RewardError(format!("mint request failed: {}", e))),
        }
    }
}

fn mint_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), MINT_PATH)
}

fn reward_payload(amount: u32) -> serde_json::Value {
    serde_json::json!({ "amount": amount })
}

fn build_agent() -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
        .build();
    config.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_mint_url() {
        assert_eq!(mint_url("http://localhost:4000"), "http://localhost:4000/wallet/demo/mint");
        assert_eq!(mint_url("http://localhost:4000/"), "http://localhost:4000/wallet/demo/mint");
        assert_eq!(
            HttpRewardService::new("https://api.example.com/v1").mint_url(),
            "https://api.example.com/v1/wallet/demo/mint"
        );
    }

    #[test]
    fn payload_shape() {
        assert_eq!(reward_payload(5).to_string(), r#"{"amount":5}"#);
    }

    #[test]
    fn unreachable_host_is_a_reward_error() {
        // Nothing listens on the discard port
        let mut service = HttpRewardService::new("http://127.0.0.1:9");
        let err = service.reward_checkpoint(5).unwrap_err();
        assert!(matches!(err, ObbyError::RewardError(_)));
    }
}
