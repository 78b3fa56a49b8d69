//! Lifecycle state waiter (exponential backoff)
//!
//! Polls a resource until the remote service reports it ready, or until it is
//! gone after a delete. This is polling, not retrying: any error other than
//! not-found is returned as-is.

use crate::error::{CloudError, Result};
use crate::resource::Resource;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Polling schedule
#[derive(Debug, Clone)]
pub struct WaitConfig {
    /// Maximum number of polls
    pub max_attempts: u32,

    /// Delay after the first poll
    pub initial_delay: Duration,

    /// Upper bound for a single delay
    pub max_delay: Duration,

    /// Backoff multiplier
    pub multiplier: f64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        // ~20 minutes total, enough for a VCN or a function to settle
        Self {
            max_attempts: 60,
            initial_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(30),
            multiplier: 1.5,
        }
    }
}

impl WaitConfig {
    /// No delay between polls
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            multiplier: 1.0,
        }
    }

    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.powi(attempt as i32);
        let secs = (self.initial_delay.as_secs_f64() * factor).min(self.max_delay.as_secs_f64());
        Duration::from_secs_f64(secs)
    }
}

/// Poll `fetch` until the resource is ready and return its final form
pub async fn wait_until_ready<R, F, Fut>(config: &WaitConfig, id: &str, mut fetch: F) -> Result<R>
where
    R: Resource,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<R>>,
{
    for attempt in 0..config.max_attempts {
        let resource = fetch().await?;
        let state = resource.lifecycle_state();

        if state.is_ready() {
            return Ok(resource);
        }
        if state.is_failed() {
            return Err(CloudError::ResourceFailed {
                kind: R::KIND,
                id: id.to_string(),
            });
        }

        tracing::debug!("{} {} is {}, waiting", R::KIND, id, state);

        if attempt + 1 < config.max_attempts {
            sleep(config.delay_for_attempt(attempt)).await;
        }
    }

    Err(CloudError::Timeout(format!(
        "{} {} did not become ready after {} polls",
        R::KIND,
        id,
        config.max_attempts
    )))
}

/// Poll `fetch` until the resource reports a terminal state or is not found
pub async fn wait_until_gone<R, F, Fut>(config: &WaitConfig, id: &str, mut fetch: F) -> Result<()>
where
    R: Resource,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<R>>,
{
    for attempt in 0..config.max_attempts {
        match fetch().await {
            Ok(resource) => {
                let state = resource.lifecycle_state();
                if state.is_gone() {
                    return Ok(());
                }
                if state.is_failed() {
                    return Err(CloudError::ResourceFailed {
                        kind: R::KIND,
                        id: id.to_string(),
                    });
                }
                tracing::debug!("{} {} is {}, waiting for removal", R::KIND, id, state);
            }
            Err(e) if e.is_not_found() => return Ok(()),
            Err(e) => return Err(e),
        }

        if attempt + 1 < config.max_attempts {
            sleep(config.delay_for_attempt(attempt)).await;
        }
    }

    Err(CloudError::Timeout(format!(
        "{} {} was not removed after {} polls",
        R::KIND,
        id,
        config.max_attempts
    )))
}
