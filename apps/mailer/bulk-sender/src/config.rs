//! Configuration for the bulk sender

use core_config::{env_parse, ConfigError, FromEnv};
use email::DEFAULT_PACING;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderConfig {
    /// Pause between consecutive sends (`BULK_SENDER_PACING_MS`)
    pub pacing: Duration,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            pacing: DEFAULT_PACING,
        }
    }
}

impl FromEnv for SenderConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let default_ms = DEFAULT_PACING.as_millis() as u64;
        let pacing_ms = env_parse("BULK_SENDER_PACING_MS", default_ms)?;

        Ok(Self {
            pacing: Duration::from_millis(pacing_ms),
        })
    }
}

impl SenderConfig {
    /// A `--pacing-ms` flag wins over the environment
    pub fn pacing_override(&self, pacing_ms: Option<u64>) -> Duration {
        pacing_ms.map(Duration::from_millis).unwrap_or(self.pacing)
    }
}
