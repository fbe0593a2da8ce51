use serde_json::json;
use vetsupport_family_link::{
    ConnectionHealth, HttpVeteranLinkService, LinkError, MessageKind, RiskLevel, SupportMessage,
    VeteranLinkService,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service_for(server: &MockServer) -> HttpVeteranLinkService {
    HttpVeteranLinkService::new(&server.uri(), "test_api_key", reqwest::Client::new())
}

#[tokio::test]
async fn test_connect_veteran() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/family/connect-veteran"))
        .and(header("apikey", "test_api_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "accessLevel": "detailed"
        })))
        .mount(&server)
        .await;

    let grant = service_for(&server)
        .connect("family-demo-123", "veteran-demo-456", "DEMO123")
        .await
        .unwrap();

    assert_eq!(grant.access_level, "detailed");
}

#[tokio::test]
async fn test_connect_rejection_is_typed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/family/connect-veteran"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
        .mount(&server)
        .await;

    let result = service_for(&server)
        .connect("family-demo-123", "veteran-demo-456", "WRONG999")
        .await;

    assert!(matches!(result, Err(LinkError::Rejected)));
}

#[tokio::test]
async fn test_connect_forbidden_status_is_rejection() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/family/connect-veteran"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let result = service_for(&server)
        .connect("family-demo-123", "veteran-demo-456", "WRONG999")
        .await;

    assert!(matches!(result, Err(LinkError::Rejected)));
}

#[tokio::test]
async fn test_fetch_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/family/veteran-status/veteran-demo-456"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "veteranId": "veteran-demo-456",
            "riskLevel": "high",
            "lastActivity": "2024-03-10T08:00:00Z",
            "allowedDataSharing": ["basic_status", "crisis_alerts", "check_ins"],
            "emergencyContactStatus": true
        })))
        .mount(&server)
        .await;

    let status = service_for(&server)
        .fetch_status("veteran-demo-456")
        .await
        .unwrap();

    assert_eq!(status.veteran_id, "veteran-demo-456");
    assert_eq!(status.risk_level, RiskLevel::High);
    assert_eq!(status.allowed_data_sharing.len(), 3);
    assert!(status.emergency_contact_status);
}

#[tokio::test]
async fn test_send_message_acknowledgement() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/family/send-message"))
        .and(header("apikey", "test_api_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    let message = SupportMessage::new("How are you feeling today?", MessageKind::CheckIn);
    let delivered = service_for(&server)
        .send_message("family-demo-123", "veteran-demo-456", &message)
        .await
        .unwrap();

    assert!(delivered);
}

#[tokio::test]
async fn test_request_check_in_negative_acknowledgement() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/family/request-checkin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
        .mount(&server)
        .await;

    let accepted = service_for(&server)
        .request_check_in("family-demo-123", "veteran-demo-456")
        .await
        .unwrap();

    assert!(!accepted);
}

#[tokio::test]
async fn test_fetch_insights_full_shape() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/family/insights/veteran-demo-456"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "insights": {
                "riskTrends": ["Sleep patterns have improved over the past week"],
                "interventionRecommendations": ["Continue current treatment plan"],
                "familyAlerts": ["Veteran has been more isolated than usual"],
                "providerReferrals": []
            },
            "correlations": {
                "withOtherApps": [],
                "crossPlatformPatterns": [],
                "familyDynamics": ["Family support correlates with improved outcomes"]
            },
            "alerts": {
                "crisisRisk": false,
                "familySupport": true,
                "providerIntervention": true
            }
        })))
        .mount(&server)
        .await;

    let insights = service_for(&server)
        .fetch_insights("veteran-demo-456")
        .await
        .unwrap();

    assert_eq!(insights.insights.risk_trends.len(), 1);
    assert!(insights.alerts.family_support);
    assert!(insights.alerts.provider_intervention);
}

#[tokio::test]
async fn test_probe_maps_reachability_to_health() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/family/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;

    assert_eq!(
        service_for(&server).probe().await,
        ConnectionHealth::Connected
    );
}

#[tokio::test]
async fn test_probe_degrades_on_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/family/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    assert_eq!(
        service_for(&server).probe().await,
        ConnectionHealth::Limited
    );
}

#[tokio::test]
async fn test_probe_reports_offline_when_unreachable() {
    let service = HttpVeteranLinkService::new(
        "http://127.0.0.1:1",
        "test_api_key",
        reqwest::Client::new(),
    );

    assert_eq!(service.probe().await, ConnectionHealth::Offline);
}
