//! Session commands
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adminboard_core::{Session, SessionPhase, UserProfile};

use super::CommandResult;
use crate::state::AppState;

/// What the front end may know about the session. Never carries a token.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionInfo {
    pub phase: SessionPhase,
    pub authenticated: bool,
    pub user: Option<UserProfile>,
    pub authenticated_at: Option<DateTime<Utc>>,
}

impl From<Session> for SessionInfo {
    fn from(session: Session) -> Self {
        Self {
            phase: session.phase(),
            authenticated: session.is_authenticated(),
            user: session.current_user,
            authenticated_at: session.authenticated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshInfo {
    pub refreshed: bool,
}

pub async fn login(state: &AppState, username: &str, password: &str) -> CommandResult<SessionInfo> {
    let dashboard = state.dashboard();

    match dashboard.login(username, password).await {
        Ok(outcome) if outcome.success => {
            CommandResult::ok(dashboard.session_manager().snapshot().into())
        }
        Ok(outcome) => CommandResult::err(
            outcome
                .message
                .unwrap_or_else(|| "Login failed".to_string()),
        ),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

pub fn logout(state: &AppState) -> CommandResult<SessionInfo> {
    let dashboard = state.dashboard();
    dashboard.logout();
    CommandResult::ok(dashboard.session_manager().snapshot().into())
}

pub fn status(state: &AppState) -> CommandResult<SessionInfo> {
    CommandResult::ok(state.dashboard().session_manager().snapshot().into())
}

pub fn whoami(state: &AppState) -> CommandResult<UserProfile> {
    state.dashboard().current_user().into()
}

/// The new token stays in the store; only the fact of the refresh is reported
pub async fn refresh(state: &AppState) -> CommandResult<RefreshInfo> {
    match state.dashboard().refresh_session().await {
        Ok(_) => CommandResult::ok(RefreshInfo { refreshed: true }),
        Err(e) => CommandResult::err(e.to_string()),
    }
}
