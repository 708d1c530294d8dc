//! Profile commands
use adminboard_core::{UserDraft, UserProfile};

use super::users::UserFields;
use super::CommandResult;
use crate::state::AppState;

/// Save the signed-in user's record, starting from the session profile
pub async fn update(state: &AppState, fields: UserFields) -> CommandResult<UserProfile> {
    let dashboard = state.dashboard();

    let current = match dashboard.current_user() {
        Ok(user) => user,
        Err(e) => return CommandResult::err(e.to_string()),
    };

    let draft = fields.apply(UserDraft::from(&current));
    dashboard.update_profile(&draft).await.into()
}
