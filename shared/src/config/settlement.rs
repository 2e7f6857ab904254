//! Payment settlement worker configuration

use serde::{Deserialize, Serialize};

/// Cadence settings for the payment settlement worker
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SettlementConfig {
    /// Seconds between settlement poll ticks
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Seconds a payment stays pending before it becomes due for settlement
    #[serde(default = "default_settle_delay")]
    pub settle_delay_secs: i64,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            settle_delay_secs: default_settle_delay(),
        }
    }
}

impl SettlementConfig {
    /// Load from `SETTLEMENT_POLL_SECS` / `SETTLEMENT_DELAY_SECS` environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(secs) = env_u64("SETTLEMENT_POLL_SECS") {
            config.poll_interval_secs = secs;
        }
        if let Some(secs) = env_u64("SETTLEMENT_DELAY_SECS") {
            config.settle_delay_secs = secs as i64;
        }
        config
    }
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

fn default_poll_interval() -> u64 {
    1
}

fn default_settle_delay() -> i64 {
    2
}
