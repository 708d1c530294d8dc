//! Application state management
use adminboard_core::{Config, Dashboard, Result, Session};

/// Dashboard plus the bits of process state the commands share
pub struct AppState {
    dashboard: Dashboard,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let dashboard = Dashboard::new(config)?;
        Ok(Self { dashboard })
    }

    /// Resolve the stored session before any command runs
    pub async fn initialize(&self) -> Result<Session> {
        self.dashboard.initialize().await
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }
}
