//! Full-stack exercise of [`FamilyClient`] against mocked ecosystem
//! endpoints.

use serde_json::json;
use vetsupport_family::config::ClientConfig;
use vetsupport_family::link::RiskLevel;
use vetsupport_family::profile::{AccessLevel, Relationship};
use vetsupport_family::FamilyClient;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_ecosystem(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
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
        })))
        .mount(server)
        .await;

    // First sign-in: no backing profile yet, client provisions one.
    Mock::given(method("GET"))
        .and(path("/api/family/profile/family-demo-123"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/family/profile/family-demo-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/family/connect-veteran"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "accessLevel": "detailed"
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/family/veteran-status/veteran-demo-456"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "veteranId": "veteran-demo-456",
            "riskLevel": "high",
            "lastActivity": "2024-03-10T08:00:00Z",
            "allowedDataSharing": ["basic_status", "crisis_alerts", "check_ins"],
            "emergencyContactStatus": true
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/family/send-message"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/family/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(server)
        .await;
}

#[test]
fn sign_in_connect_and_alert_flow_over_http() {
    tokio_test::block_on(async {
        let server = MockServer::start().await;
        mount_ecosystem(&server).await;

        let config = ClientConfig::new(&server.uri(), "test_api_key").unwrap();
        let client = FamilyClient::new(config).unwrap();

        client
            .sign_in("demo.family@vetsupport.com", "FamilySupport2024!")
            .await
            .unwrap();

        // Provisioned from identity metadata since the backend had none.
        let profile = client.profile().profile().await.unwrap();
        assert_eq!(profile.first_name, "Sarah");
        assert_eq!(profile.relationship, Relationship::Spouse);

        assert!(client.connect_to_veteran("veteran-demo-456", "DEMO123").await);

        let status = client.link().status().await.unwrap();
        assert_eq!(status.risk_level, RiskLevel::High);

        // High risk plus years of inactivity in the canned snapshot.
        let alerts = client.link().alerts().await;
        assert!(alerts.iter().any(|alert| alert.action_required));

        let profile = client.profile().profile().await.unwrap();
        assert_eq!(profile.access_level, AccessLevel::Detailed);

        client.shutdown().await;
    });
}

#[test]
fn insights_survive_a_failing_analytics_endpoint() {
    tokio_test::block_on(async {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/family/insights/veteran-demo-456"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let config = ClientConfig::new(&server.uri(), "test_api_key").unwrap();
        let client = FamilyClient::new(config).unwrap();

        let insights = client.veteran_insights("veteran-demo-456").await;

        assert!(insights.insights.risk_trends.is_empty());
        assert!(!insights.alerts.crisis_risk);
    });
}
