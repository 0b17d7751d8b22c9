//! Accounts and the session context.
//!
//! The active user is an explicit `SessionContext` handed to whatever needs
//! it. It is created on login or registration, cleared on logout, and
//! restored at startup from the persisted current-user pointer.
//!
//! Credentials are compared in plaintext against the local store. This is a
//! convenience login for a single machine, not an authentication system.

use thiserror::Error;
use tracing::info;

use crate::models::user::{Preferences, StoredUser, UserProfile};
use crate::store::{StoreError, StyleStore};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already exists")]
    EmailTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not signed in. Run `stylesense login` or `stylesense register` first.")]
    NotSignedIn,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Registration form.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub gender: Option<String>,
    pub skin_tone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    user: UserProfile,
}

impl SessionContext {
    fn new(user: UserProfile) -> Self {
        Self { user }
    }

    pub fn user(&self) -> &UserProfile {
        &self.user
    }

    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    /// Picks up a preference change made through the store.
    pub fn refresh(&mut self, user: UserProfile) {
        if user.id == self.user.id {
            self.user = user;
        }
    }
}

/// Creates a user, rejecting duplicate emails, and signs them in.
pub fn register(store: &StyleStore, account: NewAccount) -> Result<SessionContext, AuthError> {
    if store.find_user_by_email(&account.email)?.is_some() {
        return Err(AuthError::EmailTaken);
    }

    let profile = UserProfile::new(
        account.name,
        account.email,
        Preferences::initial(account.gender, account.skin_tone),
    );
    store.save_user(StoredUser {
        profile: profile.clone(),
        password: account.password,
    })?;
    info!("Registered user {}", profile.id);

    start(store, profile)
}

pub fn login(store: &StyleStore, email: &str, password: &str) -> Result<SessionContext, AuthError> {
    let user = store
        .get_users()?
        .into_iter()
        .find(|u| u.profile.email == email && u.password == password)
        .ok_or(AuthError::InvalidCredentials)?;

    start(store, user.profile)
}

pub fn logout(store: &StyleStore, session: SessionContext) -> Result<(), AuthError> {
    store.set_current_user(None)?;
    info!("Signed out user {}", session.user_id());
    Ok(())
}

/// Restores the session persisted by a previous run, if any.
pub fn restore(store: &StyleStore) -> Result<Option<SessionContext>, AuthError> {
    Ok(store.current_user()?.map(SessionContext::new))
}

/// Like `restore`, but a missing session is an error.
pub fn require(store: &StyleStore) -> Result<SessionContext, AuthError> {
    restore(store)?.ok_or(AuthError::NotSignedIn)
}

fn start(store: &StyleStore, user: UserProfile) -> Result<SessionContext, AuthError> {
    store.set_current_user(Some(&user))?;
    info!("Session started for user {}", user.id);
    Ok(SessionContext::new(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::store::MemoryStore;

    fn store() -> StyleStore {
        StyleStore::new(Arc::new(MemoryStore::new()))
    }

    fn account(email: &str) -> NewAccount {
        NewAccount {
            name: "Morgan Blake".to_string(),
            email: email.to_string(),
            password: "secret".to_string(),
            gender: Some("Feminine".to_string()),
            skin_tone: None,
        }
    }

    #[test]
    fn test_register_creates_user_and_session() {
        let store = store();
        let session = register(&store, account("m@x.io")).unwrap();

        assert_eq!(session.user().email, "m@x.io");
        let prefs = session.user().preferences.clone().unwrap();
        assert_eq!(prefs.gender, "Feminine");
        assert_eq!(prefs.skin_tone.as_deref(), Some("Light"));

        assert_eq!(store.get_users().unwrap().len(), 1);
        assert_eq!(store.current_user().unwrap().as_ref(), Some(session.user()));
    }

    #[test]
    fn test_register_rejects_duplicate_email() {
        let store = store();
        register(&store, account("m@x.io")).unwrap();
        let err = register(&store, account("m@x.io")).unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
        assert_eq!(store.get_users().unwrap().len(), 1);
    }

    #[test]
    fn test_login_checks_email_and_password() {
        let store = store();
        let registered = register(&store, account("m@x.io")).unwrap();
        store.set_current_user(None).unwrap();

        assert!(matches!(
            login(&store, "m@x.io", "wrong"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            login(&store, "nobody@x.io", "secret"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(store.current_user().unwrap().is_none());

        let session = login(&store, "m@x.io", "secret").unwrap();
        assert_eq!(session.user(), registered.user());
        assert_eq!(store.current_user().unwrap().as_ref(), Some(session.user()));
    }

    #[test]
    fn test_logout_clears_and_restore_reads_pointer() {
        let store = store();
        let session = register(&store, account("m@x.io")).unwrap();

        let restored = restore(&store).unwrap().unwrap();
        assert_eq!(restored.user(), session.user());

        logout(&store, session).unwrap();
        assert!(restore(&store).unwrap().is_none());
        assert!(matches!(require(&store), Err(AuthError::NotSignedIn)));
    }

    #[test]
    fn test_refresh_ignores_other_users() {
        let store = store();
        let mut session = register(&store, account("m@x.io")).unwrap();
        let mut other = session.user().clone();
        other.id = "someone-else".to_string();
        other.name = "Other".to_string();

        session.refresh(other);
        assert_eq!(session.user().name, "Morgan Blake");
    }
}
