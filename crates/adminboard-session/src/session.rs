//! Session state and its phases
//!
//! ```text
//! Unresolved ──(no stored token | verify fails)──> Anonymous
//!     │                                              │  ▲
//!     └──────────────(verify ok)──> Authenticated <──┘  │ (login ok)
//!                                        │               │
//!                                        └─(logout | refresh fails)
//! ```

use adminboard_api::UserProfile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of who is signed in.
///
/// `current_user` is only ever set while `token` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Bearer credential; `None` means unauthenticated
    pub token: Option<String>,
    /// Identity resolved for `token`
    pub current_user: Option<UserProfile>,
    /// True only while the startup verification is pending
    pub is_loading: bool,
    /// When `current_user` was last resolved
    pub authenticated_at: Option<DateTime<Utc>>,
}

impl Session {
    /// State of a freshly started process, before the stored token is checked
    pub fn unresolved() -> Self {
        Self {
            token: None,
            current_user: None,
            is_loading: true,
            authenticated_at: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.is_loading {
            SessionPhase::Unresolved
        } else if self.current_user.is_some() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Anonymous
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase() == SessionPhase::Authenticated
    }

    pub(crate) fn clear(&mut self) {
        self.token = None;
        self.current_user = None;
        self.authenticated_at = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// Startup verification has not finished
    Unresolved,
    /// Nobody is signed in
    Anonymous,
    /// A verified user is signed in
    Authenticated,
}

impl SessionPhase {
    pub fn can_transition_to(&self, target: SessionPhase) -> bool {
        match (self, target) {
            (SessionPhase::Unresolved, SessionPhase::Anonymous) => true,
            (SessionPhase::Unresolved, SessionPhase::Authenticated) => true,
            (SessionPhase::Anonymous, SessionPhase::Authenticated) => true,
            (SessionPhase::Authenticated, SessionPhase::Anonymous) => true,
            (a, b) if *a == b => true,
            // Nothing returns to Unresolved once startup has settled
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Unresolved => "unresolved",
            SessionPhase::Anonymous => "anonymous",
            SessionPhase::Authenticated => "authenticated",
        }
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
