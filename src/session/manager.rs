use std::sync::Arc;
use tracing::{info, warn};

use super::{Session, SessionStorage, StoredSession};
use crate::api::{AuthApi, Credentials};
use crate::core::{RequestFailure, Result};
use crate::lifecycle::RequestLifecycle;
use crate::model::User;
use crate::store::StoreHandle;

/// Owns the session and keeps its storage in step with it.
pub struct SessionManager {
    auth: Arc<dyn AuthApi>,
    storage: Arc<dyn SessionStorage>,
    session: Session,
    lifecycle: RequestLifecycle,
    error: Option<RequestFailure>,
}

impl SessionManager {
    pub fn new(auth: Arc<dyn AuthApi>, storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            auth,
            storage,
            session: Session::default(),
            lifecycle: RequestLifecycle::Idle,
            error: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn lifecycle(&self) -> RequestLifecycle {
        self.lifecycle
    }

    pub fn error(&self) -> Option<&RequestFailure> {
        self.error.as_ref()
    }

    /// Rebuilds the session from storage. Returns whether one was found.
    pub async fn restore(&mut self) -> Result<bool> {
        match self.storage.load().await? {
            Some(stored) => {
                let user = User {
                    role: stored.role,
                    ..stored.user
                };
                let session = Session::new(stored.token, user);
                info!(user = ?session.user_id(), "session restored");
                self.session = session;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Signs in. A rejected login, or one whose session cannot be saved, is
    /// recorded on the manager and returned; the previous session stays.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<&Session> {
        self.lifecycle.begin();
        self.error = None;

        match self.auth.login(credentials).await {
            Ok(response) => {
                let stored = StoredSession {
                    token: response.access_token.clone(),
                    role: response.payload.role,
                    user: response.payload.clone(),
                };
                if let Err(err) = self.storage.save(&stored).await {
                    warn!(error = %err, "login accepted but the session could not be saved");
                    self.lifecycle.reject();
                    self.error = Some(RequestFailure::new(err.to_string()));
                    return Err(err);
                }
                self.session = Session::new(response.access_token, response.payload);
                self.lifecycle.fulfill();
                info!(user = ?self.session.user_id(), role = ?self.session.role(), "logged in");
                Ok(&self.session)
            }
            Err(failure) => {
                warn!(error = %failure, "login rejected");
                self.lifecycle.reject();
                self.error = Some(failure.clone());
                Err(failure.into())
            }
        }
    }

    /// Replaces the signed-in user (after a profile edit) and persists it.
    pub async fn update_user(&mut self, user: User) -> Result<()> {
        self.session.replace_user(user);
        if let (Some(token), Some(user), Some(role)) =
            (self.session.token(), self.session.user(), self.session.role())
        {
            let stored = StoredSession {
                token: token.to_string(),
                user: user.clone(),
                role,
            };
            self.storage.save(&stored).await?;
        }
        Ok(())
    }

    /// Clears the session and its storage, and resets every collection.
    pub async fn logout(&mut self, store: &StoreHandle) -> Result<()> {
        info!(user = ?self.session.user_id(), "logging out");
        self.session = Session::default();
        self.lifecycle = RequestLifecycle::Idle;
        self.error = None;
        store.reset().await;
        self.storage.clear().await
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("user", &self.session.user_id())
            .field("lifecycle", &self.lifecycle)
            .finish_non_exhaustive()
    }
}
