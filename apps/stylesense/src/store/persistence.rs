//! Persistence Adapter — the logical collections StyleSense keeps.
//!
//! Each collection is one JSON blob under a fixed `stylesense_` key. There are
//! no transactions: every operation is read-modify-write of a whole blob.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use super::kv::{KeyValueStore, StoreError};
use crate::models::history::{HistoryEntry, HistoryRecord};
use crate::models::user::{Preferences, StoredUser, UserProfile};

pub const USERS_KEY: &str = "stylesense_users";
pub const CURRENT_USER_KEY: &str = "stylesense_current_user";
pub const HISTORY_KEY: &str = "stylesense_history";
pub const LAST_REQUEST_KEY: &str = "stylesense_last_request";

#[derive(Clone)]
pub struct StyleStore {
    kv: Arc<dyn KeyValueStore>,
}

impl StyleStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    fn read<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, StoreError> {
        match self.kv.get(key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(T::default()),
        }
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        self.kv.set(key, &serde_json::to_string(value)?)
    }

    // ── users ───────────────────────────────────────────────────────────────

    pub fn get_users(&self) -> Result<Vec<StoredUser>, StoreError> {
        self.read(USERS_KEY)
    }

    /// Appends a user. Email uniqueness is the caller's job.
    pub fn save_user(&self, user: StoredUser) -> Result<(), StoreError> {
        let mut users = self.get_users()?;
        users.push(user);
        self.write(USERS_KEY, &users)
    }

    pub fn find_user_by_email(&self, email: &str) -> Result<Option<StoredUser>, StoreError> {
        Ok(self
            .get_users()?
            .into_iter()
            .find(|u| u.profile.email == email))
    }

    /// Replaces the preferences of `user_id`. Unknown ids are a no-op.
    /// When the user is the active one, the current-user pointer is refreshed.
    pub fn update_preferences(
        &self,
        user_id: &str,
        preferences: Preferences,
    ) -> Result<Option<UserProfile>, StoreError> {
        let mut users = self.get_users()?;
        let Some(user) = users.iter_mut().find(|u| u.profile.id == user_id) else {
            debug!("Ignoring preference update for unknown user {user_id}");
            return Ok(None);
        };
        user.profile.preferences = Some(preferences);
        let updated = user.profile.clone();
        self.write(USERS_KEY, &users)?;

        if self
            .current_user()?
            .is_some_and(|current| current.id == user_id)
        {
            self.set_current_user(Some(&updated))?;
        }

        info!("Updated preferences for user {user_id}");
        Ok(Some(updated))
    }

    // ── session pointer ─────────────────────────────────────────────────────

    pub fn set_current_user(&self, user: Option<&UserProfile>) -> Result<(), StoreError> {
        match user {
            Some(user) => self.write(CURRENT_USER_KEY, user),
            None => self.kv.remove(CURRENT_USER_KEY),
        }
    }

    pub fn current_user(&self) -> Result<Option<UserProfile>, StoreError> {
        self.read(CURRENT_USER_KEY)
    }

    // ── history ─────────────────────────────────────────────────────────────

    /// Prepends a timestamped entry to the user's history and returns it.
    pub fn save_to_history(
        &self,
        user_id: &str,
        record: HistoryRecord,
    ) -> Result<HistoryEntry, StoreError> {
        let mut history: HashMap<String, Vec<HistoryEntry>> = self.read(HISTORY_KEY)?;
        let entry = HistoryEntry {
            record,
            timestamp: Utc::now(),
        };
        history
            .entry(user_id.to_string())
            .or_default()
            .insert(0, entry.clone());
        self.write(HISTORY_KEY, &history)?;
        debug!("Saved {} to history of user {user_id}", entry.record.kind());
        Ok(entry)
    }

    /// Newest first; empty when the user has none.
    pub fn get_history(&self, user_id: &str) -> Result<Vec<HistoryEntry>, StoreError> {
        let mut history: HashMap<String, Vec<HistoryEntry>> = self.read(HISTORY_KEY)?;
        Ok(history.remove(user_id).unwrap_or_default())
    }

    // ── request cooldown bookkeeping ────────────────────────────────────────

    pub fn record_request_completed(
        &self,
        user_id: &str,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut stamps: HashMap<String, DateTime<Utc>> = self.read(LAST_REQUEST_KEY)?;
        stamps.insert(user_id.to_string(), at);
        self.write(LAST_REQUEST_KEY, &stamps)
    }

    pub fn last_request_completed(
        &self,
        user_id: &str,
    ) -> Result<Option<DateTime<Utc>>, StoreError> {
        let mut stamps: HashMap<String, DateTime<Utc>> = self.read(LAST_REQUEST_KEY)?;
        Ok(stamps.remove(user_id))
    }
}
