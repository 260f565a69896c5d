use chrono::{Duration, Utc};
use mockito::Matcher;
use serde_json::json;
use tempfile::TempDir;
use timetree_to_gcal::components::google_calendar::{Credential, TokenManager, TokenStore};
use timetree_to_gcal::config::Config;
use timetree_to_gcal::error::Error;

fn scopes() -> Vec<String> {
    vec![
        "https://www.googleapis.com/auth/calendar".to_string(),
        "https://www.googleapis.com/auth/calendar.events".to_string(),
    ]
}

fn stored_credential(token_uri: &str, expires_in_minutes: i64) -> Credential {
    Credential {
        access_token: "ya29.stored".to_string(),
        refresh_token: Some("1//refresh".to_string()),
        token_uri: token_uri.to_string(),
        client_id: "client-id".to_string(),
        client_secret: "client-secret".to_string(),
        scopes: scopes(),
        expiry: Some(Utc::now() + Duration::minutes(expires_in_minutes)),
    }
}

fn config_in(dir: &TempDir) -> Config {
    Config {
        token_file: dir.path().join("token.json"),
        client_secret_file: dir.path().join("credentials.json"),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_valid_token_is_reused() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    // Unroutable token endpoint: any network use would fail the test
    let stored = stored_credential("http://127.0.0.1:9/token", 30);
    TokenStore::new(&config.token_file).save(&stored).unwrap();

    let credential = TokenManager::new(&config)
        .acquire_credentials(&scopes())
        .await
        .unwrap();

    assert_eq!(credential, stored);
}

#[tokio::test]
async fn test_expired_token_is_refreshed_and_saved() {
    let mut server = mockito::Server::new_async().await;
    let refresh = server
        .mock("POST", "/token")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("grant_type".to_string(), "refresh_token".to_string()),
            Matcher::UrlEncoded("refresh_token".to_string(), "1//refresh".to_string()),
            Matcher::UrlEncoded("client_id".to_string(), "client-id".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "access_token": "ya29.fresh",
                "expires_in": 3599,
                "token_type": "Bearer"
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let store = TokenStore::new(&config.token_file);
    store
        .save(&stored_credential(&format!("{}/token", server.url()), -30))
        .unwrap();

    let credential = TokenManager::new(&config)
        .acquire_credentials(&scopes())
        .await
        .unwrap();

    refresh.assert_async().await;
    assert_eq!(credential.access_token, "ya29.fresh");
    assert_eq!(credential.refresh_token.as_deref(), Some("1//refresh"));
    assert!(credential.is_valid(Utc::now()));

    let saved = store.load().unwrap().unwrap();
    assert_eq!(saved, credential);
}

#[tokio::test]
async fn test_rejected_refresh_is_fatal() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/token")
        .with_status(400)
        .with_body(r#"{"error": "invalid_grant", "error_description": "Token has been expired or revoked."}"#)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let store = TokenStore::new(&config.token_file);
    let stored = stored_credential(&format!("{}/token", server.url()), -30);
    store.save(&stored).unwrap();

    let err = TokenManager::new(&config)
        .acquire_credentials(&scopes())
        .await
        .unwrap_err();

    match err {
        Error::TokenRefresh(message) => assert!(message.contains("invalid_grant")),
        other => panic!("expected TokenRefresh, got {:?}", other),
    }
    // The stored token is left untouched
    assert_eq!(store.load().unwrap().unwrap(), stored);
}

#[tokio::test]
async fn test_missing_client_secret_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);

    let err = TokenManager::new(&config)
        .acquire_credentials(&scopes())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ClientSecret(_)));
    assert!(!config.token_file.exists());
}

#[tokio::test]
async fn test_malformed_token_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    std::fs::write(&config.token_file, "not json").unwrap();

    let err = TokenManager::new(&config)
        .acquire_credentials(&scopes())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Serialization(_)));
}

#[test]
fn test_store_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let store = TokenStore::new(dir.path().join("state").join("token.json"));

    assert!(store.load().unwrap().is_none());
    store.save(&stored_credential("https://oauth2.googleapis.com/token", 30)).unwrap();
    assert!(store.load().unwrap().is_some());
}
