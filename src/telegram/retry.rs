use serde::Deserialize;
use std::time::Duration;
use tracing::error;

use super::{ProviderResponse, Sleeper};
use crate::errors::Result;

/// How often, and for how long at most, a throttled call is re-sent.
///
/// The wait itself always comes from the provider's `retry_after`; the
/// policy only caps it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_retries: u32,
    #[serde(rename = "max_delay_secs", deserialize_with = "secs::deserialize")]
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            max_delay: Duration::from_secs(300),
        }
    }
}

impl RetryPolicy {
    /// Run `attempt`, re-running it after the provider's delay for as long as
    /// it comes back throttled and retries remain. Returns the last outcome.
    pub fn run<F>(&self, sleeper: &dyn Sleeper, mut attempt: F) -> Result<ProviderResponse>
    where
        F: FnMut() -> Result<ProviderResponse>,
    {
        let mut retries = 0;
        let mut waited = Duration::ZERO;

        loop {
            match attempt() {
                Err(err) if retries < self.max_retries => {
                    let Some(retry_after) = err.retry_after() else {
                        return Err(err);
                    };
                    let delay = retry_after.min(self.max_delay);
                    retries += 1;
                    waited += delay;
                    error!(
                        error = %err,
                        ?delay,
                        retry = retries,
                        max_retries = self.max_retries,
                        ?waited,
                        "Throttled by provider, waiting before re-sending"
                    );
                    sleeper.sleep(delay);
                }
                outcome => return outcome,
            }
        }
    }
}

mod secs {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
