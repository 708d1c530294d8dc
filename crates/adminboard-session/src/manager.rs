//! Session Manager
//!
//! All credential acquisition, verification and destruction goes through
//! here. Store writes happen inside the same `publish` as the in-memory
//! change they belong to, so the two never disagree for another caller.

use chrono::Utc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

use adminboard_api::{AuthResponse, IdentityService, UserProfile};

use crate::error::SessionError;
use crate::session::{Session, SessionPhase};
use crate::store::{TokenStore, REFRESH_TOKEN_KEY, TOKEN_KEY};
use crate::Result;

/// Lifetime requested for every issued token
pub const DEFAULT_TOKEN_LIFETIME_MINS: u32 = 30;

const LOGIN_FAILED_MESSAGE: &str = "Login failed";
const PERSIST_FAILED_MESSAGE: &str = "Failed to persist session";

/// Result of [`SessionManager::login`], ready to show to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LoginOutcome {
    fn succeeded() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verification {
    Verified,
    Rejected,
    /// The token stopped being current while the request was out
    Superseded,
    /// Another verification of the same token is still pending
    InFlight,
}

/// Removes a token from the in-flight set when the verification ends,
/// including when its future is dropped
struct InFlightGuard<'a> {
    set: &'a Mutex<HashSet<String>>,
    token: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set.lock().remove(&self.token);
    }
}

pub struct SessionManager {
    /// Current session, published to subscribers on every change
    state: Arc<watch::Sender<Session>>,
    /// Durable token storage
    store: Arc<dyn TokenStore>,
    /// Remote identity service
    identity: Arc<dyn IdentityService>,
    /// Token values with a verification request outstanding
    verifying: Arc<Mutex<HashSet<String>>>,
    initialized: Arc<AtomicBool>,
    token_lifetime_mins: u32,
}

impl SessionManager {
    pub fn new(store: Arc<dyn TokenStore>, identity: Arc<dyn IdentityService>) -> Self {
        let (state, _) = watch::channel(Session::unresolved());

        Self {
            state: Arc::new(state),
            store,
            identity,
            verifying: Arc::new(Mutex::new(HashSet::new())),
            initialized: Arc::new(AtomicBool::new(false)),
            token_lifetime_mins: DEFAULT_TOKEN_LIFETIME_MINS,
        }
    }

    pub fn with_token_lifetime(mut self, minutes: u32) -> Self {
        self.token_lifetime_mins = minutes.max(1);
        self
    }

    /// Restore the stored session, if any. Must be called once at startup.
    ///
    /// A stored token is verified against the identity service; any failure
    /// logs out. `is_loading` turns false when this returns and stays false.
    pub async fn initialize(&self) -> Result<Session> {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return Err(SessionError::AlreadyInitialized);
        }

        let stored = match self.store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored token");
                None
            }
        };

        if let Some(token) = stored {
            self.publish(|s| {
                s.token = Some(token.clone());
                true
            });

            let outcome = self.verify(&token).await;
            tracing::debug!(outcome = ?outcome, "Startup verification finished");
        } else {
            tracing::info!("No stored session");
        }

        self.publish(|s| std::mem::replace(&mut s.is_loading, false));

        let session = self.snapshot();
        tracing::info!(phase = %session.phase(), "Initialized session");

        Ok(session)
    }

    /// Check `token` with the identity service and apply the answer,
    /// but only while `token` is still the current one.
    async fn verify(&self, token: &str) -> Verification {
        if !self.verifying.lock().insert(token.to_string()) {
            return Verification::InFlight;
        }
        let _guard = InFlightGuard {
            set: &self.verifying,
            token: token.to_string(),
        };

        match self.identity.whoami(token).await {
            Ok(profile) => {
                let user_id = profile.id;
                let applied = self.publish(|s| {
                    if s.token.as_deref() != Some(token) {
                        return false;
                    }
                    s.current_user = Some(profile);
                    s.authenticated_at = Some(Utc::now());
                    s.is_loading = false;
                    true
                });

                if applied {
                    tracing::info!(user_id, "Verified stored session");
                    Verification::Verified
                } else {
                    Verification::Superseded
                }
            }
            Err(e) => {
                if self.end_session_if_current(Some(token)) {
                    tracing::warn!(error = %e, "Token verification failed");
                    Verification::Rejected
                } else {
                    Verification::Superseded
                }
            }
        }
    }

    /// Exchange credentials for a session.
    ///
    /// On failure nothing changes, in memory or in the store.
    pub async fn login(&self, username: &str, password: &str) -> LoginOutcome {
        let response = match self
            .identity
            .login(username, password, self.token_lifetime_mins)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(username = %username, error = %e, "Login rejected");
                let message = e.server_message().unwrap_or(LOGIN_FAILED_MESSAGE);
                return LoginOutcome::failed(message);
            }
        };

        let AuthResponse {
            credentials,
            profile,
        } = response;
        let user_id = profile.id;

        let mut persisted = Ok(());
        self.publish(|s| {
            if let Err(e) = self.store.set(TOKEN_KEY, &credentials.token) {
                persisted = Err(e);
                return false;
            }

            // A login without a refresh credential must not keep a previous one
            let refresh_write = match credentials.refresh_token.as_deref() {
                Some(refresh_token) => self.store.set(REFRESH_TOKEN_KEY, refresh_token),
                None => self.store.remove(REFRESH_TOKEN_KEY),
            };
            if let Err(e) = refresh_write {
                tracing::warn!(error = %e, "Failed to persist refresh token");
            }

            s.token = Some(credentials.token);
            s.current_user = Some(profile);
            s.authenticated_at = Some(Utc::now());
            true
        });

        if let Err(e) = persisted {
            tracing::error!(error = %e, "Failed to persist token");
            return LoginOutcome::failed(PERSIST_FAILED_MESSAGE);
        }

        tracing::info!(user_id, username = %username, "Logged in");

        LoginOutcome::succeeded()
    }

    /// End the session. Safe to call at any time, any number of times.
    pub fn logout(&self) {
        let changed = self.publish(|s| self.clear_session(s));

        if changed {
            tracing::info!("Logged out");
        }
    }

    /// Log out, but only if `token` is still the current token.
    ///
    /// Returns false when the session moved on while a request was out.
    fn end_session_if_current(&self, token: Option<&str>) -> bool {
        let mut current = false;
        let changed = self.publish(|s| {
            if s.token.as_deref() != token {
                return false;
            }
            current = true;
            self.clear_session(s)
        });

        if changed {
            tracing::info!("Logged out");
        }
        current
    }

    /// Drop the stored credentials and the in-memory session.
    /// Runs inside `publish` so both change together.
    fn clear_session(&self, s: &mut Session) -> bool {
        for key in [TOKEN_KEY, REFRESH_TOKEN_KEY] {
            if let Err(e) = self.store.remove(key) {
                tracing::warn!(key = %key, error = %e, "Failed to remove stored credential");
            }
        }

        let had_session = s.token.is_some() || s.current_user.is_some();
        s.clear();
        had_session
    }

    /// Obtain a new bearer token with the stored refresh credential.
    ///
    /// Any failure ends the session before the error is returned; callers
    /// should treat an `Err` as "logged out", not as something to retry.
    /// If the session changed while the request was out (a logout, or a
    /// new login), the answer is dropped and that newer session is kept.
    pub async fn refresh_session(&self) -> Result<String> {
        let started_with = self.token();

        let refresh_token = match self.store.get(REFRESH_TOKEN_KEY) {
            Ok(Some(token)) if !token.is_empty() => token,
            Ok(_) => {
                tracing::warn!("Refresh requested without a stored refresh token");
                self.end_session_if_current(started_with.as_deref());
                return Err(SessionError::MissingRefreshToken);
            }
            Err(e) => {
                self.end_session_if_current(started_with.as_deref());
                return Err(e.into());
            }
        };

        let credentials = match self
            .identity
            .refresh(&refresh_token, self.token_lifetime_mins)
            .await
        {
            Ok(credentials) => credentials,
            Err(e) => {
                if self.end_session_if_current(started_with.as_deref()) {
                    tracing::warn!(error = %e, "Token refresh failed");
                    return Err(e.into());
                }
                tracing::info!("Ignoring failed refresh of a replaced session");
                return Err(SessionError::Superseded);
            }
        };

        let token = credentials.token;
        let mut outcome: Option<Result<()>> = None;
        self.publish(|s| {
            if s.token != started_with {
                return false;
            }

            if let Err(e) = self.store.set(TOKEN_KEY, &token) {
                outcome = Some(Err(e.into()));
                return self.clear_session(s);
            }

            if let Some(rotated) = credentials.refresh_token.as_deref() {
                if let Err(e) = self.store.set(REFRESH_TOKEN_KEY, rotated) {
                    tracing::warn!(error = %e, "Failed to persist rotated refresh token");
                }
            }

            s.token = Some(token.clone());
            outcome = Some(Ok(()));
            true
        });

        match outcome {
            Some(Ok(())) => {
                tracing::info!("Refreshed session token");
                Ok(token)
            }
            Some(Err(e)) => {
                tracing::error!(error = %e, "Failed to persist refreshed token");
                Err(e)
            }
            None => {
                tracing::info!("Discarding refreshed token of a replaced session");
                Err(SessionError::Superseded)
            }
        }
    }

    /// Apply `f` to the session and notify subscribers if it reports a change
    fn publish<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut Session) -> bool,
    {
        let mut transition: Option<(SessionPhase, SessionPhase)> = None;

        let changed = self.state.send_if_modified(|session| {
            let from = session.phase();
            let changed = f(session);
            transition = Some((from, session.phase()));
            changed
        });

        if let Some((from, to)) = transition {
            debug_assert!(
                from.can_transition_to(to),
                "invalid session transition {from} -> {to}"
            );
            if from != to {
                tracing::debug!(from = %from, to = %to, "Session phase changed");
            }
        }

        changed
    }

    // === Observation ===

    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Receive every published session change
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.state.borrow().current_user.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.borrow().phase()
    }
}

impl Clone for SessionManager {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            store: Arc::clone(&self.store),
            identity: Arc::clone(&self.identity),
            verifying: Arc::clone(&self.verifying),
            initialized: Arc::clone(&self.initialized),
            token_lifetime_mins: self.token_lifetime_mins,
        }
    }
}
