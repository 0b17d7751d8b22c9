use thiserror::Error;

use crate::llm_client::repair::MALFORMED_RESPONSE_MESSAGE;
use crate::llm_client::{ErrorKind, LlmError, RecoveryAction};
use crate::session::AuthError;
use crate::store::StoreError;
use crate::stylist::gate::GateError;

/// Application-level error type.
/// `report()` turns it into what the CLI prints: a code, a user-facing
/// message and an optional recovery hint.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Gate(#[from] GateError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub code: &'static str,
    pub message: String,
    pub hint: Option<&'static str>,
}

impl AppError {
    pub fn report(&self) -> ErrorReport {
        let (code, message, hint) = match self {
            AppError::Validation(msg) => ("VALIDATION_ERROR", msg.clone(), None),
            AppError::Auth(AuthError::Store(e)) => {
                tracing::error!("Storage error during sign-in: {e}");
                (
                    "STORAGE_ERROR",
                    "Local profile storage could not be read or written".to_string(),
                    None,
                )
            }
            AppError::Auth(e) => ("UNAUTHORIZED", e.to_string(), None),
            AppError::Gate(e) => ("RATE_LIMITED", e.to_string(), None),
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                let kind = e.kind();
                (kind.code(), llm_message(kind), recovery_hint(kind.recovery()))
            }
            AppError::Store(e) => {
                tracing::error!("Storage error: {e}");
                (
                    "STORAGE_ERROR",
                    "Local profile storage could not be read or written".to_string(),
                    None,
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                ("INTERNAL_ERROR", format!("{e:#}"), None)
            }
        };

        ErrorReport {
            code,
            message,
            hint,
        }
    }
}

fn llm_message(kind: ErrorKind) -> String {
    match kind {
        ErrorKind::QuotaExceeded => {
            "The AI quota for this API key is exhausted, even on the fallback model".to_string()
        }
        ErrorKind::ServerOverloaded => {
            "The AI service is overloaded right now, even on the fallback model".to_string()
        }
        ErrorKind::InvalidCredential => "The configured API key was rejected".to_string(),
        ErrorKind::MalformedResponse => MALFORMED_RESPONSE_MESSAGE.to_string(),
        ErrorKind::Other => "The styling request failed".to_string(),
    }
}

fn recovery_hint(action: RecoveryAction) -> Option<&'static str> {
    match action {
        RecoveryAction::Reauthenticate => {
            Some("Set a different key in GEMINI_API_KEY and run the command again.")
        }
        RecoveryAction::RetryManually => Some("Wait a moment and run the command again."),
        RecoveryAction::None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::repair::RepairError;

    fn api(status: u16, code: &str, message: &str) -> AppError {
        AppError::Llm(LlmError::Api {
            status,
            code: Some(code.to_string()),
            message: message.to_string(),
        })
    }

    #[test]
    fn test_quota_suggests_changing_the_key() {
        let report = api(429, "RESOURCE_EXHAUSTED", "Quota exceeded").report();
        assert_eq!(report.code, "QUOTA_EXCEEDED");
        assert!(report.hint.unwrap().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_overload_suggests_manual_retry() {
        let report = api(503, "UNAVAILABLE", "The model is overloaded").report();
        assert_eq!(report.code, "SERVER_OVERLOADED");
        assert_eq!(report.hint, Some("Wait a moment and run the command again."));
    }

    #[test]
    fn test_invalid_key_is_reported_as_such() {
        let report = api(400, "INVALID_ARGUMENT", "API key not valid. Please pass a valid API key.")
            .report();
        assert_eq!(report.code, "INVALID_KEY");
        assert_eq!(report.message, "The configured API key was rejected");
    }

    #[test]
    fn test_malformed_uses_fixed_message() {
        let report = AppError::Llm(LlmError::Repair(RepairError::NoStructuredData)).report();
        assert_eq!(report.code, "MALFORMED_RESPONSE");
        assert_eq!(report.message, MALFORMED_RESPONSE_MESSAGE);
    }

    #[test]
    fn test_auth_and_gate_errors_pass_their_message_through() {
        let report = AppError::from(AuthError::EmailTaken).report();
        assert_eq!(report.code, "UNAUTHORIZED");
        assert_eq!(report.message, "Email already exists");

        let report = AppError::from(GateError::CoolingDown { remaining_secs: 12 }).report();
        assert_eq!(report.code, "RATE_LIMITED");
        assert!(report.message.contains("12s"));
        assert!(report.hint.is_none());
    }
}
