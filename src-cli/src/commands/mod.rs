//! Command handlers
//!
//! Each handler turns a dashboard call into a `CommandResult`, which is what
//! ends up on stdout.

pub mod profile;
pub mod sessions;
pub mod users;

use serde::{Deserialize, Serialize};
use std::io::Write;

use adminboard_core::CoreError;

#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

impl<T> From<adminboard_core::Result<T>> for CommandResult<T> {
    fn from(result: adminboard_core::Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::from_error(e),
        }
    }
}

impl<T> CommandResult<T> {
    fn from_error(error: CoreError) -> Self {
        tracing::debug!(error = ?error, "Command failed");
        Self::err(error.to_string())
    }
}

impl<T: Serialize> CommandResult<T> {
    /// Print as JSON on stdout and report whether the command succeeded
    pub fn emit(&self) -> anyhow::Result<bool> {
        let mut stdout = std::io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, self)?;
        writeln!(stdout)?;
        Ok(self.success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_shape() {
        let ok = serde_json::to_value(CommandResult::ok(42)).unwrap();
        assert_eq!(
            ok,
            serde_json::json!({"success": true, "data": 42, "error": null})
        );

        let err: CommandResult<u32> = Err(CoreError::NotAuthenticated).into();
        assert!(!err.success);
        assert_eq!(err.error.as_deref(), Some("Not logged in"));
        assert!(err.data.is_none());
    }
}
