//! Adminboard Session Management
//!
//! Owns the credential lifecycle of the running process:
//! - a stored token is verified once at startup
//! - login persists the token before the in-memory session changes
//! - any failed verification or refresh ends the session
//! - state changes are published to subscribers as atomic snapshots

mod error;
mod manager;
mod session;
mod store;

pub use error::SessionError;
pub use manager::{LoginOutcome, SessionManager, DEFAULT_TOKEN_LIFETIME_MINS};
pub use session::{Session, SessionPhase};
pub use store::{MemoryTokenStore, TokenStore, REFRESH_TOKEN_KEY, TOKEN_KEY};

pub type Result<T> = std::result::Result<T, SessionError>;
