//! AI Request Orchestrator — turns a profile and a request into a typed
//! blueprint.
//!
//! Flow: build prompt → assemble parts (inline image + text) → send under the
//! retry policy → Response Repair → typed result. Raw model text never leaves
//! this module.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::llm_client::image::InlineImage;
use crate::llm_client::repair::parse_repaired;
use crate::llm_client::retry::RetryPolicy;
use crate::llm_client::{GenerateRequest, LlmError, ModelEndpoint, Part};
use crate::models::user::UserProfile;
use crate::stylist::analysis::AnalysisResult;
use crate::stylist::prompts::{analysis_prompt, recommendation_prompt};
use crate::stylist::recommendation::{RecommendationRequest, RecommendationResult};

#[derive(Clone)]
pub struct Stylist {
    endpoint: Arc<dyn ModelEndpoint>,
    policy: RetryPolicy,
}

impl Stylist {
    pub fn new(endpoint: Arc<dyn ModelEndpoint>, policy: RetryPolicy) -> Self {
        Self { endpoint, policy }
    }

    pub fn endpoint(&self) -> Arc<dyn ModelEndpoint> {
        Arc::clone(&self.endpoint)
    }

    pub fn primary_model(&self) -> &str {
        self.policy.primary_model()
    }

    /// Analyzes a photo (data URL or bare base64) into an upgrade blueprint.
    /// The image part goes first, followed by the prompt.
    #[instrument(skip_all, fields(user_id = %profile.id))]
    pub async fn analyze(
        &self,
        image: &str,
        profile: &UserProfile,
    ) -> Result<AnalysisResult, LlmError> {
        let request = GenerateRequest::single_turn(vec![
            Part::image(InlineImage::from_data_url(image)),
            Part::text(analysis_prompt(profile)),
        ]);

        let text = self.policy.execute(self.endpoint.as_ref(), &request).await?;
        let result: AnalysisResult = parse_repaired(&text)?;

        info!(
            "Analysis complete: aesthetic={:?}, confidence={}",
            result.style_aesthetic, result.style_confidence
        );
        Ok(result)
    }

    /// Builds an outfit for the request. The prompt comes first; an optional
    /// reference photo follows it.
    #[instrument(skip_all, fields(user_id = %profile.id, occasion = %request.occasion))]
    pub async fn recommend(
        &self,
        profile: &UserProfile,
        request: &RecommendationRequest,
        image: Option<&str>,
    ) -> Result<RecommendationResult, LlmError> {
        let mut parts = vec![Part::text(recommendation_prompt(profile, request))];
        if let Some(image) = image {
            parts.push(Part::image(InlineImage::from_data_url(image)));
        }
        let request = GenerateRequest::single_turn(parts);

        let text = self.policy.execute(self.endpoint.as_ref(), &request).await?;
        let result: RecommendationResult = parse_repaired(&text)?;

        info!(
            "Recommendation complete: title={:?}, score={}",
            result.title, result.style_score
        );
        Ok(result)
    }
}
