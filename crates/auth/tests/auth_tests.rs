use serde_json::json;
use vetsupport_family_auth::{AuthError, HttpIdentityProvider, IdentityProvider};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session_body() -> serde_json::Value {
    json!({
        "access_token": "test_access_token",
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": "test_refresh_token",
        "user": {
            "id": "family-demo-123",
            "email": "demo.family@vetsupport.com",
            "user_metadata": {
                "full_name": "Sarah Johnson",
                "relationship": "spouse",
                "connected_veteran": "veteran-demo-456"
            }
        }
    })
}

#[tokio::test]
async fn test_sign_in_with_password() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(header("apikey", "test_anon_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body()))
        .mount(&mock_server)
        .await;

    let provider =
        HttpIdentityProvider::new(&mock_server.uri(), "test_anon_key", reqwest::Client::new());

    let result = provider
        .sign_in_with_password("demo.family@vetsupport.com", "FamilySupport2024!")
        .await;

    assert!(result.is_ok());
    let session = result.unwrap();
    assert_eq!(session.access_token, "test_access_token");
    assert_eq!(session.user.id, "family-demo-123");
    assert_eq!(
        session.user.email,
        Some("demo.family@vetsupport.com".to_string())
    );

    // Signing in persists the session for later retrieval.
    let persisted = provider.get_session().await.unwrap();
    assert_eq!(persisted.unwrap().user.id, "family-demo-123");
}

#[tokio::test]
async fn test_sign_in_rejection_maps_to_invalid_credentials() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&mock_server)
        .await;

    let provider =
        HttpIdentityProvider::new(&mock_server.uri(), "test_anon_key", reqwest::Client::new());

    let result = provider
        .sign_in_with_password("demo.family@vetsupport.com", "nope")
        .await;

    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    assert!(provider.get_session().await.unwrap().is_none());
}

#[tokio::test]
async fn test_sign_up() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .and(body_json(json!({
            "email": "new.member@vetsupport.com",
            "password": "Secret123!",
            "data": { "relationship": "parent" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "pending-confirmation"
        })))
        .mount(&mock_server)
        .await;

    let provider =
        HttpIdentityProvider::new(&mock_server.uri(), "test_anon_key", reqwest::Client::new());

    let result = provider
        .sign_up(
            "new.member@vetsupport.com",
            "Secret123!",
            Some(json!({ "relationship": "parent" })),
        )
        .await;

    assert!(result.is_ok());
    // Sign-up never authenticates.
    assert!(provider.get_session().await.unwrap().is_none());
}

#[tokio::test]
async fn test_sign_out_clears_persisted_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body()))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(header("Authorization", "Bearer test_access_token"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let provider =
        HttpIdentityProvider::new(&mock_server.uri(), "test_anon_key", reqwest::Client::new());

    let session = provider
        .sign_in_with_password("demo.family@vetsupport.com", "FamilySupport2024!")
        .await
        .unwrap();

    provider.sign_out(&session.access_token).await.unwrap();

    assert!(provider.get_session().await.unwrap().is_none());
}

#[tokio::test]
async fn test_reset_password_for_email() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/recover"))
        .and(body_json(json!({ "email": "demo.family@vetsupport.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let provider =
        HttpIdentityProvider::new(&mock_server.uri(), "test_anon_key", reqwest::Client::new());

    let result = provider
        .reset_password_for_email("demo.family@vetsupport.com")
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_unreachable_provider_maps_to_provider_unavailable() {
    // Nothing is listening on this port.
    let provider = HttpIdentityProvider::new(
        "http://127.0.0.1:1",
        "test_anon_key",
        reqwest::Client::new(),
    );

    let result = provider
        .reset_password_for_email("demo.family@vetsupport.com")
        .await;

    assert!(matches!(result, Err(AuthError::ProviderUnavailable(_))));
}
