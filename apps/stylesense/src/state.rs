use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use tracing::{debug, info};

use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::retry::RetryPolicy;
use crate::llm_client::GeminiClient;
use crate::store::{FileStore, StyleStore};
use crate::stylist::gate::{Permit, RequestGate};
use crate::stylist::orchestrator::Stylist;

/// Shared application state handed to every command.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: StyleStore,
    /// One in-flight AI request, then a cooldown per user.
    pub gate: RequestGate,
}

impl AppState {
    pub fn new(config: Config, store: StyleStore) -> anyhow::Result<Self> {
        let cooldown = chrono::Duration::from_std(config.cooldown)
            .context("STYLESENSE_COOLDOWN_SECS is out of range")?;
        Ok(Self {
            config,
            store,
            gate: RequestGate::new(cooldown),
        })
    }

    /// Opens the file-backed store named by the configuration.
    pub fn open(config: Config) -> anyhow::Result<Self> {
        let kv = FileStore::open(&config.store_path).with_context(|| {
            format!("Failed to open store at {}", config.store_path.display())
        })?;
        info!("Store opened at {}", kv.path().display());
        Self::new(config, StyleStore::new(Arc::new(kv)))
    }

    /// Builds the Gemini-backed stylist. Fails when no API key is configured.
    pub fn stylist(&self) -> Result<Stylist, AppError> {
        let client = GeminiClient::new(
            &self.config.api_base,
            self.config.api_key()?.to_string(),
            self.config.http_timeout,
        )?;
        let policy = RetryPolicy::new(&self.config.primary_model, &self.config.fallback_model)
            .with_max_retries(self.config.max_retries)
            .with_delay(self.config.retry_delay);
        info!(
            "Stylist ready (primary: {}, fallback: {})",
            self.config.primary_model, self.config.fallback_model
        );
        Ok(Stylist::new(Arc::new(client), policy))
    }

    /// Admits an AI request for `user_id` or explains why it must wait.
    pub fn admit(&self, user_id: &str) -> Result<Permit, AppError> {
        let last = self.store.last_request_completed(user_id)?;
        Ok(self.gate.admit(last, Utc::now())?)
    }

    /// Starts the cooldown. Only called after a request succeeded.
    pub fn complete(&self, user_id: &str, _permit: Permit) -> Result<(), AppError> {
        self.store.record_request_completed(user_id, Utc::now())?;
        debug!("Cooldown started for user {user_id}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    use crate::config::{DEFAULT_API_BASE, DEFAULT_FALLBACK_MODEL, DEFAULT_PRIMARY_MODEL};
    use crate::store::MemoryStore;
    use crate::stylist::gate::GateError;

    fn config(api_key: Option<&str>) -> Config {
        Config {
            api_key: api_key.map(str::to_string),
            api_base: DEFAULT_API_BASE.to_string(),
            primary_model: DEFAULT_PRIMARY_MODEL.to_string(),
            fallback_model: DEFAULT_FALLBACK_MODEL.to_string(),
            store_path: PathBuf::from("unused.json"),
            retry_delay: Duration::from_millis(10),
            max_retries: 2,
            cooldown: Duration::from_secs(20),
            http_timeout: Duration::from_secs(5),
            rust_log: "info".to_string(),
        }
    }

    fn state(api_key: Option<&str>) -> AppState {
        AppState::new(config(api_key), StyleStore::new(Arc::new(MemoryStore::new()))).unwrap()
    }

    #[test]
    fn test_stylist_requires_api_key() {
        assert!(matches!(state(None).stylist(), Err(AppError::Internal(_))));
        let stylist = state(Some("key")).stylist().unwrap();
        assert_eq!(stylist.primary_model(), DEFAULT_PRIMARY_MODEL);
    }

    #[test]
    fn test_completed_request_starts_cooldown_for_that_user_only() {
        let state = state(None);
        let permit = state.admit("u1").unwrap();
        state.complete("u1", permit).unwrap();

        assert!(matches!(
            state.admit("u1"),
            Err(AppError::Gate(GateError::CoolingDown { .. }))
        ));
        assert!(state.admit("u2").is_ok());
    }

    #[test]
    fn test_dropped_permit_does_not_start_cooldown() {
        let state = state(None);
        let permit = state.admit("u1").unwrap();
        assert!(matches!(
            state.admit("u1"),
            Err(AppError::Gate(GateError::RequestInFlight))
        ));
        drop(permit);
        assert!(state.admit("u1").is_ok());
    }

    #[test]
    fn test_oversized_cooldown_keeps_gate_closed() {
        let mut config = config(None);
        config.cooldown = Duration::from_secs(10_000_000_000_000);
        let state =
            AppState::new(config, StyleStore::new(Arc::new(MemoryStore::new()))).unwrap();

        let permit = state.admit("u1").unwrap();
        state.complete("u1", permit).unwrap();
        assert!(matches!(
            state.admit("u1"),
            Err(AppError::Gate(GateError::CoolingDown { .. }))
        ));
    }
}
