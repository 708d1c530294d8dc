//! HTTP client behaviour against a mock identity service

use std::time::Duration;

use adminboard_api::{
    ApiClient, ApiError, HttpIdentityClient, IdentityService, PageRequest, UserDirectory,
    UserDraft,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.uri(), Duration::from_secs(5)).expect("client")
}

#[tokio::test]
async fn test_login_sends_credentials_and_lifetime() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({
            "username": "jane",
            "password": "correctpass",
            "expiresInMins": 30
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "xyz",
            "refreshToken": "refresh-xyz",
            "id": 1,
            "firstName": "Jane"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let identity = HttpIdentityClient::new(client_for(&server));
    let response = identity.login("jane", "correctpass", 30).await.unwrap();

    assert_eq!(response.credentials.token, "xyz");
    assert_eq!(
        response.credentials.refresh_token.as_deref(),
        Some("refresh-xyz")
    );
    assert_eq!(response.profile.id, 1);
    assert_eq!(response.profile.first_name.as_deref(), Some("Jane"));
}

#[tokio::test]
async fn test_login_rejection_carries_server_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    let identity = HttpIdentityClient::new(client_for(&server));
    let err = identity.login("jane", "wrongpass", 30).await.unwrap_err();

    assert!(matches!(err, ApiError::Status { status: 400, .. }));
    assert_eq!(err.server_message(), Some("Invalid credentials"));
}

#[tokio::test]
async fn test_error_without_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let identity = HttpIdentityClient::new(client_for(&server));
    let err = identity.whoami("abc").await.unwrap_err();

    assert!(matches!(err, ApiError::Status { status: 502, message: None }));
    assert_eq!(err.server_message(), None);
}

#[tokio::test]
async fn test_whoami_uses_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "firstName": "Jane"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let identity = HttpIdentityClient::new(client_for(&server));
    let profile = identity.whoami("abc").await.unwrap();

    assert_eq!(profile.first_name.as_deref(), Some("Jane"));
}

#[tokio::test]
async fn test_whoami_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let identity = HttpIdentityClient::new(client_for(&server));
    let err = identity.whoami("abc").await.unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn test_refresh_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_json(json!({"refreshToken": "r-1", "expiresInMins": 30})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "fresh",
            "refreshToken": "r-2"
        })))
        .mount(&server)
        .await;

    let identity = HttpIdentityClient::new(client_for(&server));
    let credentials = identity.refresh("r-1", 30).await.unwrap();

    assert_eq!(credentials.token, "fresh");
    assert_eq!(credentials.refresh_token.as_deref(), Some("r-2"));
}

#[tokio::test]
async fn test_request_timeout_is_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 1}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri(), Duration::from_millis(200)).unwrap();
    let identity = HttpIdentityClient::new(client);
    let err = identity.whoami("abc").await.unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test]
async fn test_user_directory_paging() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("limit", "5"))
        .and(query_param("skip", "10"))
        .and(header("authorization", "Bearer xyz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{"id": 11, "firstName": "Ava"}, {"id": 12, "firstName": "Ben"}],
            "total": 208,
            "skip": 10,
            "limit": 5
        })))
        .expect(1)
        .mount(&server)
        .await;

    let directory = UserDirectory::new(client_for(&server));
    let page = directory.list("xyz", PageRequest::new(2, 5)).await.unwrap();

    assert_eq!(page.total, 208);
    assert_eq!(page.users.len(), 2);
    assert_eq!(page.users[0].id, 11);
}

#[tokio::test]
async fn test_user_directory_count() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{"id": 1}],
            "total": 208,
            "skip": 0,
            "limit": 1
        })))
        .mount(&server)
        .await;

    let directory = UserDirectory::new(client_for(&server));
    assert_eq!(directory.count("xyz").await.unwrap(), 208);
}

#[tokio::test]
async fn test_user_directory_edits() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/add"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 209,
            "firstName": "Nora"
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/users/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5,
            "firstName": "Nora"
        })))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/users/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5,
            "isDeleted": true
        })))
        .mount(&server)
        .await;

    let directory = UserDirectory::new(client_for(&server));
    let draft = UserDraft {
        first_name: "Nora".to_string(),
        ..Default::default()
    };

    assert_eq!(directory.add("xyz", &draft).await.unwrap().id, 209);
    assert_eq!(directory.update("xyz", 5, &draft).await.unwrap().id, 5);

    let deleted = directory.delete("xyz", 5).await.unwrap();
    assert_eq!(deleted.extra.get("isDeleted"), Some(&json!(true)));
}

#[tokio::test]
async fn test_user_directory_get() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/7"))
        .and(header("authorization", "Bearer xyz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "firstName": "Ava",
            "address": {"address": "1 Main St", "city": "Austin", "state": "Texas"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let directory = UserDirectory::new(client_for(&server));
    let user = directory.get("xyz", 7).await.unwrap();

    assert_eq!(user.first_name.as_deref(), Some("Ava"));
    let draft = UserDraft::from(&user);
    assert_eq!(draft.address.city, "Austin");
}

#[tokio::test]
async fn test_missing_user_is_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/users/9999"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"message": "User with id '9999' not found"})),
        )
        .mount(&server)
        .await;

    let directory = UserDirectory::new(client_for(&server));
    let err = directory.delete("xyz", 9999).await.unwrap_err();

    assert!(matches!(err, ApiError::Status { status: 404, .. }));
    assert_eq!(err.server_message(), Some("User with id '9999' not found"));
}
