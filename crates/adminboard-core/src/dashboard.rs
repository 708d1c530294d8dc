//! Main dashboard state container
//!
//! Owns the credential database, the HTTP clients and the session manager.
//! Every directory call is made with the token of the current session.

use std::sync::Arc;

use adminboard_api::{
    ApiClient, HttpIdentityClient, PageRequest, UserDirectory, UserDraft, UserPage, UserProfile,
};
use adminboard_session::{LoginOutcome, Session, SessionManager};
use adminboard_storage::Database;

use crate::config::Config;
use crate::error::CoreError;
use crate::forms;
use crate::Result;

pub struct Dashboard {
    /// Configuration
    config: Config,
    /// Session manager (login state and token persistence)
    session_manager: SessionManager,
    /// Remote user directory
    directory: UserDirectory,
}

impl Dashboard {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        // Ensure data directory exists
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;
        let client = ApiClient::new(&config.api_base_url, config.request_timeout())?;

        let session_manager = SessionManager::new(
            Arc::new(db),
            Arc::new(HttpIdentityClient::new(client.clone())),
        )
        .with_token_lifetime(config.token_lifetime_mins);
        let directory = UserDirectory::new(client);

        Ok(Self {
            config,
            session_manager,
            directory,
        })
    }

    /// Restore the stored session
    pub async fn initialize(&self) -> Result<Session> {
        let session = self.session_manager.initialize().await?;
        tracing::info!(
            api = %self.config.api_base_url,
            authenticated = session.is_authenticated(),
            "Dashboard initialized"
        );
        Ok(session)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // === Session operations ===

    pub fn session_manager(&self) -> &SessionManager {
        &self.session_manager
    }

    /// Validate the login form, then sign in
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome> {
        forms::validate_login(username, password)?;
        Ok(self.session_manager.login(username.trim(), password).await)
    }

    pub fn logout(&self) {
        self.session_manager.logout();
    }

    pub async fn refresh_session(&self) -> Result<String> {
        Ok(self.session_manager.refresh_session().await?)
    }

    pub fn current_user(&self) -> Result<UserProfile> {
        self.session_manager
            .current_user()
            .ok_or(CoreError::NotAuthenticated)
    }

    fn bearer(&self) -> Result<String> {
        let session = self.session_manager.snapshot();
        match session.token {
            Some(token) if session.is_authenticated() => Ok(token),
            _ => Err(CoreError::NotAuthenticated),
        }
    }

    // === Dashboard summary ===

    pub async fn user_count(&self) -> Result<u64> {
        Ok(self.directory.count(&self.bearer()?).await?)
    }

    // === User directory ===

    pub async fn list_users(&self, page: PageRequest) -> Result<UserPage> {
        Ok(self.directory.list(&self.bearer()?, page).await?)
    }

    pub async fn get_user(&self, id: u64) -> Result<UserProfile> {
        Ok(self.directory.get(&self.bearer()?, id).await?)
    }

    pub async fn create_user(&self, draft: &UserDraft) -> Result<UserProfile> {
        let token = self.bearer()?;
        forms::validate_user(draft)?;
        Ok(self.directory.add(&token, draft).await?)
    }

    pub async fn update_user(&self, id: u64, draft: &UserDraft) -> Result<UserProfile> {
        let token = self.bearer()?;
        forms::validate_user(draft)?;
        Ok(self.directory.update(&token, id, draft).await?)
    }

    pub async fn delete_user(&self, id: u64) -> Result<UserProfile> {
        Ok(self.directory.delete(&self.bearer()?, id).await?)
    }

    // === Profile ===

    /// Save the signed-in user's own record.
    ///
    /// The session keeps the profile it was verified with; the saved record
    /// is returned to the caller instead.
    pub async fn update_profile(&self, draft: &UserDraft) -> Result<UserProfile> {
        let token = self.bearer()?;
        let user = self.current_user()?;
        forms::validate_user(draft)?;

        let updated = self.directory.update(&token, user.id, draft).await?;
        tracing::info!(user_id = user.id, "Updated profile");

        Ok(updated)
    }
}
