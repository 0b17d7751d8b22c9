//! Model fallback policy.
//!
//! One bounded loop replaces "call again with the lighter model": attempt 0
//! goes to the first candidate model, every retry moves one step down the
//! candidate list and then sticks to the last entry. Only errors whose kind
//! is retryable (quota, overload) are retried; anything else returns at once.

use std::time::Duration;

use tracing::{info, warn};

use super::{GenerateRequest, LlmError, ModelEndpoint};

/// Delay before each fallback attempt.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);
/// Fallback attempts after the primary call.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Ordered candidates; the first is the primary model.
    models: Vec<String>,
    max_retries: u32,
    delay: Duration,
}

impl RetryPolicy {
    pub fn new(primary: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            models: vec![primary.into(), fallback.into()],
            max_retries: DEFAULT_MAX_RETRIES,
            delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// A policy that never retries: one call to `model`.
    pub fn single(model: impl Into<String>) -> Self {
        Self {
            models: vec![model.into()],
            max_retries: 0,
            delay: Duration::ZERO,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn primary_model(&self) -> &str {
        &self.models[0]
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Model used for the given zero-based attempt.
    pub fn model_for_attempt(&self, attempt: u32) -> &str {
        let idx = (attempt as usize).min(self.models.len() - 1);
        &self.models[idx]
    }

    /// Sends `request`, falling back across models on retryable errors.
    /// Returns the raw response text of the first successful attempt, or the
    /// last error unchanged once the retry budget is spent.
    pub async fn execute(
        &self,
        endpoint: &dyn ModelEndpoint,
        request: &GenerateRequest,
    ) -> Result<String, LlmError> {
        let mut attempt = 0;
        loop {
            let model = self.model_for_attempt(attempt);
            match endpoint.generate(model, request).await {
                Ok(text) => {
                    if attempt > 0 {
                        info!("Fallback model {model} succeeded on attempt {}", attempt + 1);
                    }
                    return Ok(text);
                }
                Err(e) if e.kind().is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        "Model {model} busy ({e}). Attempting fallback to {}... (Retry {attempt})",
                        self.model_for_attempt(attempt)
                    );
                    tokio::time::sleep(self.delay).await;
                }
                Err(e) => {
                    if e.kind().is_retryable() {
                        warn!("Giving up after {} attempts: {e}", self.max_attempts());
                    }
                    return Err(e);
                }
            }
        }
    }
}
