//! Scripted endpoint for exercising orchestration without the network.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{GenerateRequest, LlmError, ModelEndpoint};

/// Replays a fixed script of outcomes and records every call.
/// Once the script runs out, every call fails with an `Other`-class error.
pub struct ScriptedEndpoint {
    outcomes: Mutex<Vec<Result<String, LlmError>>>,
    calls: Mutex<Vec<(String, GenerateRequest)>>,
}

impl ScriptedEndpoint {
    pub fn new(mut outcomes: Vec<Result<String, LlmError>>) -> Self {
        outcomes.reverse();
        Self {
            outcomes: Mutex::new(outcomes),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Models used, in call order.
    pub fn models(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(model, _)| model.clone())
            .collect()
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, request)| request.clone())
            .collect()
    }
}

#[async_trait]
impl ModelEndpoint for ScriptedEndpoint {
    async fn generate(&self, model: &str, request: &GenerateRequest) -> Result<String, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((model.to_string(), request.clone()));
        self.outcomes.lock().unwrap().pop().unwrap_or_else(|| {
            Err(LlmError::Api {
                status: 500,
                code: Some("INTERNAL".to_string()),
                message: "script exhausted".to_string(),
            })
        })
    }
}

pub fn overloaded() -> Result<String, LlmError> {
    Err(LlmError::Api {
        status: 503,
        code: Some("UNAVAILABLE".to_string()),
        message: "The model is overloaded. Please try again later.".to_string(),
    })
}

pub fn quota_exhausted() -> Result<String, LlmError> {
    Err(LlmError::Api {
        status: 429,
        code: Some("RESOURCE_EXHAUSTED".to_string()),
        message: "You exceeded your current quota.".to_string(),
    })
}

pub fn invalid_key() -> Result<String, LlmError> {
    Err(LlmError::Api {
        status: 400,
        code: Some("INVALID_ARGUMENT".to_string()),
        message: "API key not valid. Please pass a valid API key.".to_string(),
    })
}
