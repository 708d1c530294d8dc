//! User directory: counting, paging, fetching and editing `/users`

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::profile::{UserDraft, UserProfile};
use crate::Result;

/// Zero-based page selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub const DEFAULT_PER_PAGE: u32 = 5;

    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page,
            per_page: per_page.max(1),
        }
    }

    pub fn skip(&self) -> u64 {
        u64::from(self.page) * u64::from(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_PER_PAGE)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPage {
    pub users: Vec<UserProfile>,
    pub total: u64,
    #[serde(default)]
    pub skip: u64,
    #[serde(default)]
    pub limit: u64,
}

impl UserPage {
    /// Number of pages needed for `total` users at this page size
    pub fn page_count(&self, per_page: u32) -> u64 {
        let per_page = u64::from(per_page.max(1));
        self.total.div_ceil(per_page)
    }
}

#[derive(Debug, Clone)]
pub struct UserDirectory {
    client: ApiClient,
}

impl UserDirectory {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Total number of users known to the service
    pub async fn count(&self, token: &str) -> Result<u64> {
        let request = self
            .client
            .request(Method::GET, "users")?
            .bearer_auth(token)
            .query(&[("limit", "1"), ("select", "id")]);

        let page: UserPage = self.client.send(request).await?;
        Ok(page.total)
    }

    pub async fn list(&self, token: &str, page: PageRequest) -> Result<UserPage> {
        let request = self
            .client
            .request(Method::GET, "users")?
            .bearer_auth(token)
            .query(&[("limit", u64::from(page.per_page)), ("skip", page.skip())]);

        self.client.send(request).await
    }

    pub async fn get(&self, token: &str, id: u64) -> Result<UserProfile> {
        let request = self
            .client
            .request(Method::GET, &format!("users/{id}"))?
            .bearer_auth(token);

        self.client.send(request).await
    }

    pub async fn add(&self, token: &str, draft: &UserDraft) -> Result<UserProfile> {
        let request = self
            .client
            .request(Method::POST, "users/add")?
            .bearer_auth(token)
            .json(draft);

        let user: UserProfile = self.client.send(request).await?;
        tracing::info!(user_id = user.id, "Added user");
        Ok(user)
    }

    pub async fn update(&self, token: &str, id: u64, draft: &UserDraft) -> Result<UserProfile> {
        let request = self
            .client
            .request(Method::PUT, &format!("users/{id}"))?
            .bearer_auth(token)
            .json(draft);

        let user: UserProfile = self.client.send(request).await?;
        tracing::info!(user_id = user.id, "Updated user");
        Ok(user)
    }

    /// Delete a user; the service answers with the deleted record
    pub async fn delete(&self, token: &str, id: u64) -> Result<UserProfile> {
        let request = self
            .client
            .request(Method::DELETE, &format!("users/{id}"))?
            .bearer_auth(token);

        let user: UserProfile = self.client.send(request).await?;
        tracing::info!(user_id = user.id, "Deleted user");
        Ok(user)
    }
}
