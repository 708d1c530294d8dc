//! Dashboard summary and user directory commands
use clap::Args;
use serde::{Deserialize, Serialize};

use adminboard_core::{AddressDraft, PageRequest, UserDraft, UserProfile};

use super::CommandResult;
use crate::state::AppState;

/// Form fields for a user record. Unset flags keep the base value.
#[derive(Debug, Clone, Default, Args)]
pub struct UserFields {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    /// Ten digits
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub gender: Option<String>,
    /// Street address
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
}

impl UserFields {
    pub fn apply(self, base: UserDraft) -> UserDraft {
        UserDraft {
            first_name: self.first_name.unwrap_or(base.first_name),
            last_name: self.last_name.unwrap_or(base.last_name),
            email: self.email.unwrap_or(base.email),
            phone: self.phone.unwrap_or(base.phone),
            gender: self.gender.unwrap_or(base.gender),
            address: AddressDraft {
                address: self.address.unwrap_or(base.address.address),
                city: self.city.unwrap_or(base.address.city),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryInfo {
    pub greeting: String,
    pub total_users: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserListInfo {
    pub users: Vec<UserProfile>,
    pub page: u32,
    pub per_page: u32,
    pub page_count: u64,
    pub total: u64,
}

pub async fn summary(state: &AppState) -> CommandResult<SummaryInfo> {
    let dashboard = state.dashboard();

    let user = match dashboard.current_user() {
        Ok(user) => user,
        Err(e) => return CommandResult::err(e.to_string()),
    };

    match dashboard.user_count().await {
        Ok(total_users) => CommandResult::ok(SummaryInfo {
            greeting: format!("Welcome back, {}", user.display_name()),
            total_users,
        }),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

pub async fn list(state: &AppState, page: u32, per_page: u32) -> CommandResult<UserListInfo> {
    let request = PageRequest::new(page, per_page);

    match state.dashboard().list_users(request).await {
        Ok(result) => CommandResult::ok(UserListInfo {
            page_count: result.page_count(request.per_page),
            page: request.page,
            per_page: request.per_page,
            total: result.total,
            users: result.users,
        }),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

pub async fn add(state: &AppState, fields: UserFields) -> CommandResult<UserProfile> {
    let draft = fields.apply(UserDraft::default());
    state.dashboard().create_user(&draft).await.into()
}

/// Edit a user, starting from the record the service has now
pub async fn update(state: &AppState, id: u64, fields: UserFields) -> CommandResult<UserProfile> {
    let dashboard = state.dashboard();

    let existing = match dashboard.get_user(id).await {
        Ok(user) => user,
        Err(e) => return CommandResult::err(e.to_string()),
    };

    let draft = fields.apply(UserDraft::from(&existing));
    dashboard.update_user(id, &draft).await.into()
}

pub async fn delete(state: &AppState, id: u64) -> CommandResult<UserProfile> {
    state.dashboard().delete_user(id).await.into()
}
