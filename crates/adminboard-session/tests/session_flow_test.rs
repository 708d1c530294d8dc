//! End-to-end session flows: SQLite store + HTTP identity service mock

use std::sync::Arc;
use std::time::Duration;

use adminboard_api::{ApiClient, HttpIdentityClient};
use adminboard_session::{
    SessionError, SessionManager, SessionPhase, TokenStore, REFRESH_TOKEN_KEY, TOKEN_KEY,
};
use adminboard_storage::Database;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn manager_for(server: &MockServer, db: &Database) -> SessionManager {
    let client = ApiClient::new(&server.uri(), Duration::from_secs(5)).expect("client");
    SessionManager::new(
        Arc::new(db.clone()),
        Arc::new(HttpIdentityClient::new(client)),
    )
}

async fn mount_login(server: &MockServer) {
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
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({
            "username": "jane",
            "password": "wrongpass",
            "expiresInMins": 30
        })))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_survives_restart() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", "Bearer xyz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "firstName": "Jane"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("adminboard.db");

    // first run: fresh install, log in
    {
        let db = Database::open(&db_path).unwrap();
        let manager = manager_for(&server, &db);
        let session = manager.initialize().await.unwrap();
        assert_eq!(session.phase(), SessionPhase::Anonymous);

        let outcome = manager.login("jane", "correctpass").await;
        assert!(outcome.success);
        assert_eq!(db.get(TOKEN_KEY).unwrap().as_deref(), Some("xyz"));
    }

    // second run: the stored token is verified once
    let db = Database::open(&db_path).unwrap();
    let manager = manager_for(&server, &db);
    assert!(manager.is_loading());

    let session = manager.initialize().await.unwrap();
    assert_eq!(session.phase(), SessionPhase::Authenticated);
    assert_eq!(session.current_user.unwrap().id, 1);
    assert!(!manager.is_loading());
}

#[tokio::test]
async fn test_expired_token_at_startup_is_cleared() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Token Expired!"})),
        )
        .mount(&server)
        .await;

    let db = Database::open_in_memory().unwrap();
    db.set(TOKEN_KEY, "abc").unwrap();
    db.set(REFRESH_TOKEN_KEY, "refresh-abc").unwrap();

    let manager = manager_for(&server, &db);
    let session = manager.initialize().await.unwrap();

    assert_eq!(session.phase(), SessionPhase::Anonymous);
    assert!(session.token.is_none());
    assert_eq!(db.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(db.get(REFRESH_TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_unreachable_service_at_startup_logs_out() {
    // nothing listens on the mock once it is dropped
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };

    let db = Database::open_in_memory().unwrap();
    db.set(TOKEN_KEY, "abc").unwrap();

    let client = ApiClient::new(&uri, Duration::from_secs(2)).unwrap();
    let manager = SessionManager::new(
        Arc::new(db.clone()),
        Arc::new(HttpIdentityClient::new(client)),
    );

    let session = manager.initialize().await.unwrap();

    assert_eq!(session.phase(), SessionPhase::Anonymous);
    assert_eq!(db.get(TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_wrong_password_leaves_store_untouched() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    let db = Database::open_in_memory().unwrap();
    let manager = manager_for(&server, &db);
    manager.initialize().await.unwrap();

    let outcome = manager.login("jane", "wrongpass").await;

    assert!(!outcome.success);
    assert_eq!(outcome.message.as_deref(), Some("Invalid credentials"));
    assert_eq!(manager.phase(), SessionPhase::Anonymous);
    assert_eq!(db.get(TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_logout_then_refresh_fails() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    let db = Database::open_in_memory().unwrap();
    let manager = manager_for(&server, &db);
    manager.initialize().await.unwrap();
    assert!(manager.login("jane", "correctpass").await.success);

    manager.logout();
    assert_eq!(db.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(manager.phase(), SessionPhase::Anonymous);

    assert!(matches!(
        manager.refresh_session().await,
        Err(SessionError::MissingRefreshToken)
    ));
}

#[tokio::test]
async fn test_refresh_rotates_credentials() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_json(json!({"refreshToken": "refresh-xyz", "expiresInMins": 30})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "xyz-2",
            "refreshToken": "refresh-xyz-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let db = Database::open_in_memory().unwrap();
    let manager = manager_for(&server, &db);
    manager.initialize().await.unwrap();
    manager.login("jane", "correctpass").await;

    let token = manager.refresh_session().await.unwrap();

    assert_eq!(token, "xyz-2");
    assert_eq!(db.get(TOKEN_KEY).unwrap().as_deref(), Some("xyz-2"));
    assert_eq!(
        db.get(REFRESH_TOKEN_KEY).unwrap().as_deref(),
        Some("refresh-xyz-2")
    );
    assert_eq!(manager.phase(), SessionPhase::Authenticated);
}

#[tokio::test]
async fn test_refresh_rejected_ends_session() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"message": "Invalid refresh token"})),
        )
        .mount(&server)
        .await;

    let db = Database::open_in_memory().unwrap();
    let manager = manager_for(&server, &db);
    manager.initialize().await.unwrap();
    manager.login("jane", "correctpass").await;

    let result = manager.refresh_session().await;

    assert!(matches!(result, Err(SessionError::Api(_))));
    assert_eq!(manager.phase(), SessionPhase::Anonymous);
    assert_eq!(db.get(TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_logout_while_refresh_pending_survives_restart() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"accessToken": "xyz-2"}))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("adminboard.db");

    {
        let db = Database::open(&db_path).unwrap();
        let manager = manager_for(&server, &db);
        manager.initialize().await.unwrap();
        assert!(manager.login("jane", "correctpass").await.success);

        let refresh = manager.refresh_session();
        let logout = async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            manager.logout();
        };
        let (result, ()) = tokio::join!(refresh, logout);

        assert!(matches!(result, Err(SessionError::Superseded)));
        assert_eq!(manager.phase(), SessionPhase::Anonymous);
        assert_eq!(db.get(TOKEN_KEY).unwrap(), None);
    }

    // nothing is left to verify on the next start
    let db = Database::open(&db_path).unwrap();
    let manager = manager_for(&server, &db);
    let session = manager.initialize().await.unwrap();
    assert_eq!(session.phase(), SessionPhase::Anonymous);
}
