//! Identity service: login, whoami, refresh

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::ApiClient;
use crate::profile::UserProfile;
use crate::Result;

/// Bearer credential pair issued by login and refresh
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawCredentials")]
pub struct Credentials {
    pub token: String,
    pub refresh_token: Option<String>,
}

/// Older service versions name the bearer `token`, newer ones `accessToken`
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCredentials {
    token: Option<String>,
    access_token: Option<String>,
    refresh_token: Option<String>,
}

impl TryFrom<RawCredentials> for Credentials {
    type Error = String;

    fn try_from(raw: RawCredentials) -> std::result::Result<Self, Self::Error> {
        let token = raw
            .token
            .or(raw.access_token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| "missing field `token`".to_string())?;

        Ok(Self {
            token,
            refresh_token: raw.refresh_token.filter(|t| !t.is_empty()),
        })
    }
}

/// Login reply: the credentials plus the profile of the signed-in user
#[derive(Debug, Clone, PartialEq)]
pub struct AuthResponse {
    pub credentials: Credentials,
    pub profile: UserProfile,
}

impl AuthResponse {
    const CREDENTIAL_KEYS: [&'static str; 3] = ["token", "accessToken", "refreshToken"];

    /// Split the flat login body into credentials and profile
    pub fn from_body(body: Map<String, Value>) -> serde_json::Result<Self> {
        let credentials: Credentials = serde_json::from_value(Value::Object(body.clone()))?;

        let mut profile_body = body;
        for key in Self::CREDENTIAL_KEYS {
            profile_body.remove(key);
        }
        let profile: UserProfile = serde_json::from_value(Value::Object(profile_body))?;

        Ok(Self {
            credentials,
            profile,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
    expires_in_mins: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
    expires_in_mins: u32,
}

/// Remote identity operations the session manager depends on
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Exchange a username and password for a token with the given lifetime
    async fn login(
        &self,
        username: &str,
        password: &str,
        expires_in_mins: u32,
    ) -> Result<AuthResponse>;

    /// Resolve the profile a bearer token belongs to
    async fn whoami(&self, token: &str) -> Result<UserProfile>;

    async fn refresh(&self, refresh_token: &str, expires_in_mins: u32) -> Result<Credentials>;
}

/// [`IdentityService`] over HTTP
#[derive(Debug, Clone)]
pub struct HttpIdentityClient {
    client: ApiClient,
}

impl HttpIdentityClient {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityService for HttpIdentityClient {
    async fn login(
        &self,
        username: &str,
        password: &str,
        expires_in_mins: u32,
    ) -> Result<AuthResponse> {
        let request = self
            .client
            .request(Method::POST, "auth/login")?
            .json(&LoginRequest {
                username,
                password,
                expires_in_mins,
            });

        let body: Map<String, Value> = self.client.send(request).await?;
        let response = AuthResponse::from_body(body)?;

        tracing::debug!(user_id = response.profile.id, "Login accepted");

        Ok(response)
    }

    async fn whoami(&self, token: &str) -> Result<UserProfile> {
        let request = self
            .client
            .request(Method::GET, "auth/me")?
            .bearer_auth(token);

        self.client.send(request).await
    }

    async fn refresh(&self, refresh_token: &str, expires_in_mins: u32) -> Result<Credentials> {
        let request = self
            .client
            .request(Method::POST, "auth/refresh")?
            .json(&RefreshRequest {
                refresh_token,
                expires_in_mins,
            });

        self.client.send(request).await
    }
}
