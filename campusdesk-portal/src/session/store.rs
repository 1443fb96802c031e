//! Session store
//!
//! Holds the signed-in user and access token. The setters on [`SessionStore`]
//! are the only write path; every mutation is persisted to durable storage so
//! a reload restores the session.

use super::Role;
use crate::storage::{load_snapshot, save_snapshot, DurableStorage};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Signed-in user as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(alias = "id", alias = "_id")]
    pub user_id: String,
    pub email: String,
    pub role: Role,
    /// Account status reported by the backend, e.g. `ACTIVE`
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Persisted shape of the session store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionState {
    user: Option<SessionUser>,
    access_token: Option<String>,
    #[serde(default)]
    is_authenticated: bool,
}

pub struct SessionStore {
    user: Option<SessionUser>,
    access_token: Option<String>,
    storage: Arc<dyn DurableStorage>,
    key: String,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("user", &self.user)
            .field("has_token", &self.access_token.is_some())
            .field("key", &self.key)
            .finish()
    }
}

impl SessionStore {
    /// Rehydrate the store from `storage`. Run once before the first render.
    pub fn init(storage: Arc<dyn DurableStorage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let state: SessionState = load_snapshot(storage.as_ref(), &key).unwrap_or_default();

        // The flag is derived; a snapshot claiming otherwise is normalized
        if state.is_authenticated != (state.user.is_some() && state.access_token.is_some()) {
            warn!(key = %key, "Persisted session flag disagrees with its contents");
        }

        let store = Self {
            user: state.user,
            access_token: state.access_token,
            storage,
            key,
        };

        debug!(
            authenticated = store.is_authenticated(),
            role = ?store.role(),
            "Session store rehydrated"
        );
        store
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    /// True iff both a user and an access token are present
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.access_token.is_some()
    }

    /// Record a successful sign-in. The token is taken as-is.
    pub fn login(&mut self, user: SessionUser, access_token: impl Into<String>) {
        info!(user_id = %user.user_id, role = %user.role, "Signed in");
        self.user = Some(user);
        self.access_token = Some(access_token.into());
        self.persist();
    }

    /// Forget the user and token. Navigation is the caller's business.
    pub fn logout(&mut self) {
        info!("Signed out");
        self.user = None;
        self.access_token = None;
        self.persist();
    }

    /// Replace the user record, e.g. after a profile refresh
    pub fn set_user(&mut self, user: SessionUser) {
        debug!(user_id = %user.user_id, "Session user replaced");
        self.user = Some(user);
        self.persist();
    }

    fn persist(&self) {
        let state = SessionState {
            user: self.user.clone(),
            access_token: self.access_token.clone(),
            is_authenticated: self.is_authenticated(),
        };
        if let Err(e) = save_snapshot(self.storage.as_ref(), &self.key, &state) {
            warn!(key = %self.key, error = %e, "Failed to persist session");
        }
    }
}

impl PartialEq for SessionStore {
    fn eq(&self, other: &Self) -> bool {
        self.user == other.user && self.access_token == other.access_token
    }
}
