//! Adminboard Core
//!
//! Central coordination layer: configuration, logging, form rules and the
//! `Dashboard` container that the front end drives.

mod config;
mod dashboard;
mod error;
pub mod forms;

pub use config::Config;
pub use dashboard::Dashboard;
pub use error::{CoreError, FieldError};

// Re-export core components
pub use adminboard_api::{
    Address, AddressDraft, ApiError, PageRequest, UserDraft, UserPage, UserProfile,
};
pub use adminboard_session::{LoginOutcome, Session, SessionError, SessionManager, SessionPhase};
pub use adminboard_storage::{Database, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
///
/// Logs go to stderr so that command output on stdout stays parseable.
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
