//! Consultation chat: free-form, multi-turn Markdown conversation with the
//! stylist persona. Unlike blueprints, replies are plain text and a failed
//! turn is not retried against the fallback model.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::llm_client::retry::RetryPolicy;
use crate::llm_client::{
    Content, GenerateRequest, LlmError, ModelEndpoint, Part, SystemInstruction,
};
use crate::models::user::UserProfile;
use crate::stylist::prompts::{consultation_greeting, consultation_instruction};

pub const CONSULTATION_INTERRUPTED: &str =
    "Consultation temporarily interrupted. Please try again.";

pub struct Consultation {
    endpoint: Arc<dyn ModelEndpoint>,
    /// One attempt on the primary model; a failed turn is left to the user.
    policy: RetryPolicy,
    system_instruction: SystemInstruction,
    greeting: String,
    /// Turns sent to the model; always starts with a user turn.
    transcript: Vec<Content>,
}

impl Consultation {
    pub fn start(endpoint: Arc<dyn ModelEndpoint>, model: &str, profile: &UserProfile) -> Self {
        Self {
            endpoint,
            policy: RetryPolicy::single(model),
            system_instruction: SystemInstruction {
                parts: vec![Part::text(consultation_instruction(profile))],
            },
            greeting: consultation_greeting(profile),
            transcript: Vec::new(),
        }
    }

    /// Shown before the first turn; never sent to the model.
    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    pub fn transcript(&self) -> &[Content] {
        &self.transcript
    }

    /// Sends one user message and returns the reply.
    /// On failure the user turn is dropped so the transcript stays alternating.
    pub async fn send(&mut self, message: &str) -> Result<String, LlmError> {
        self.transcript.push(Content::user(vec![Part::text(message)]));

        let request = GenerateRequest {
            system_instruction: Some(self.system_instruction.clone()),
            contents: self.transcript.clone(),
        };

        match self.policy.execute(self.endpoint.as_ref(), &request).await {
            Ok(reply) => {
                debug!("Consultation reply: {} chars", reply.len());
                self.transcript.push(Content::model(reply.clone()));
                Ok(reply)
            }
            Err(e) => {
                warn!("Consultation turn failed: {e}");
                self.transcript.pop();
                Err(e)
            }
        }
    }
}
