//! Veteran link service implementations.
//!
//! [`VeteranLinkService`] is the seam to the veteran-side service:
//! connection handshake, status fetch, messaging, check-in requests,
//! emergency-contact updates, analytics and the reachability probe.
//! [`HttpVeteranLinkService`] talks to the `/api/family/*` endpoints;
//! [`InMemoryVeteranLinkService`] is scriptable for tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    ConnectionHealth, LinkError, LinkGrant, SupportMessage, VeteranInsights, VeteranStatus,
};

/// Capability interface to the veteran-side service.
///
/// Every operation is request/response. The monitor converts failures
/// to booleans or empty-shaped defaults at its own boundary; this trait
/// reports them faithfully.
#[async_trait]
pub trait VeteranLinkService: Send + Sync {
    /// Connection handshake. The access code is verified by the
    /// veteran-side service; a rejection is [`LinkError::Rejected`].
    async fn connect(
        &self,
        family_member_id: &str,
        veteran_id: &str,
        access_code: &str,
    ) -> Result<LinkGrant, LinkError>;

    async fn fetch_status(&self, veteran_id: &str) -> Result<VeteranStatus, LinkError>;

    async fn send_message(
        &self,
        family_member_id: &str,
        veteran_id: &str,
        message: &SupportMessage,
    ) -> Result<bool, LinkError>;

    async fn request_check_in(
        &self,
        family_member_id: &str,
        veteran_id: &str,
    ) -> Result<bool, LinkError>;

    async fn update_emergency_contact(
        &self,
        family_member_id: &str,
        veteran_id: &str,
        emergency_contact: bool,
    ) -> Result<bool, LinkError>;

    async fn fetch_insights(&self, veteran_id: &str) -> Result<VeteranInsights, LinkError>;

    /// Reachability probe. Never errors; unreachability IS the answer.
    async fn probe(&self) -> ConnectionHealth;
}

#[derive(Debug, Deserialize)]
struct AckResponse {
    success: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectResponse {
    success: bool,
    #[serde(default)]
    access_level: Option<String>,
}

/// Service backed by the ecosystem's `/api/family/*` endpoints.
pub struct HttpVeteranLinkService {
    base_url: String,
    api_key: String,
    http_client: Client,
}

impl HttpVeteranLinkService {
    pub fn new(base_url: &str, api_key: &str, http_client: Client) -> Self {
        Self {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            http_client,
        }
    }

    async fn post_ack(
        &self,
        endpoint: &str,
        payload: &serde_json::Value,
    ) -> Result<bool, LinkError> {
        let url = format!("{}/api/family/{}", self.base_url, endpoint);

        let response = self
            .http_client
            .post(&url)
            .header("apikey", &self.api_key)
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LinkError::Api(error_text));
        }

        let ack: AckResponse = response.json().await?;
        Ok(ack.success)
    }
}

#[async_trait]
impl VeteranLinkService for HttpVeteranLinkService {
    async fn connect(
        &self,
        family_member_id: &str,
        veteran_id: &str,
        access_code: &str,
    ) -> Result<LinkGrant, LinkError> {
        let url = format!("{}/api/family/connect-veteran", self.base_url);

        let payload = serde_json::json!({
            "familyMemberId": family_member_id,
            "veteranId": veteran_id,
            "accessCode": access_code,
        });

        let response = self
            .http_client
            .post(&url)
            .header("apikey", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if matches!(status.as_u16(), 401 | 403) {
            return Err(LinkError::Rejected);
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LinkError::Api(error_text));
        }

        let connect: ConnectResponse = response.json().await?;
        if !connect.success {
            return Err(LinkError::Rejected);
        }

        Ok(LinkGrant {
            access_level: connect
                .access_level
                .unwrap_or_else(|| "detailed".to_string()),
        })
    }

    async fn fetch_status(&self, veteran_id: &str) -> Result<VeteranStatus, LinkError> {
        let url = format!("{}/api/family/veteran-status/{}", self.base_url, veteran_id);

        let response = self
            .http_client
            .get(&url)
            .header("apikey", &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LinkError::Api(error_text));
        }

        let status: VeteranStatus = response.json().await?;
        Ok(status)
    }

    async fn send_message(
        &self,
        family_member_id: &str,
        veteran_id: &str,
        message: &SupportMessage,
    ) -> Result<bool, LinkError> {
        let payload = serde_json::json!({
            "familyMemberId": family_member_id,
            "veteranId": veteran_id,
            "message": message.body,
            "messageType": message.kind,
            "timestamp": Utc::now(),
        });
        self.post_ack("send-message", &payload).await
    }

    async fn request_check_in(
        &self,
        family_member_id: &str,
        veteran_id: &str,
    ) -> Result<bool, LinkError> {
        let payload = serde_json::json!({
            "familyMemberId": family_member_id,
            "veteranId": veteran_id,
            "timestamp": Utc::now(),
        });
        self.post_ack("request-checkin", &payload).await
    }

    async fn update_emergency_contact(
        &self,
        family_member_id: &str,
        veteran_id: &str,
        emergency_contact: bool,
    ) -> Result<bool, LinkError> {
        let payload = serde_json::json!({
            "familyMemberId": family_member_id,
            "veteranId": veteran_id,
            "isEmergencyContact": emergency_contact,
        });
        self.post_ack("update-emergency-contact", &payload).await
    }

    async fn fetch_insights(&self, veteran_id: &str) -> Result<VeteranInsights, LinkError> {
        let url = format!("{}/api/family/insights/{}", self.base_url, veteran_id);

        let response = self
            .http_client
            .get(&url)
            .header("apikey", &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LinkError::Api(error_text));
        }

        let insights: VeteranInsights = response.json().await?;
        Ok(insights)
    }

    async fn probe(&self) -> ConnectionHealth {
        let url = format!("{}/api/family/health", self.base_url);

        match self
            .http_client
            .get(&url)
            .header("apikey", &self.api_key)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => ConnectionHealth::Connected,
            Ok(response) => {
                debug!("health probe answered {}", response.status());
                ConnectionHealth::Limited
            }
            Err(err) => {
                debug!("health probe failed: {}", err);
                ConnectionHealth::Offline
            }
        }
    }
}

/// Scriptable in-memory service for tests and demos.
///
/// Accepts the demo access codes, serves a configurable status
/// snapshot, and counts probes so teardown behaviour is observable.
pub struct InMemoryVeteranLinkService {
    accepted_codes: HashSet<String>,
    status: RwLock<VeteranStatus>,
    insights: RwLock<VeteranInsights>,
    health: RwLock<ConnectionHealth>,
    unavailable: AtomicBool,
    probe_count: AtomicU32,
    sent_messages: RwLock<Vec<SupportMessage>>,
    check_in_requests: AtomicU32,
}

impl InMemoryVeteranLinkService {
    pub fn new(status: VeteranStatus) -> Self {
        Self {
            accepted_codes: ["DEMO123", "FAMILY456"]
                .iter()
                .map(|code| code.to_string())
                .collect(),
            status: RwLock::new(status),
            insights: RwLock::new(VeteranInsights::default()),
            health: RwLock::new(ConnectionHealth::Connected),
            unavailable: AtomicBool::new(false),
            probe_count: AtomicU32::new(0),
            sent_messages: RwLock::new(Vec::new()),
            check_in_requests: AtomicU32::new(0),
        }
    }

    pub fn set_status(&self, status: VeteranStatus) {
        *self.status.write().unwrap() = status;
    }

    pub fn set_insights(&self, insights: VeteranInsights) {
        *self.insights.write().unwrap() = insights;
    }

    pub fn set_health(&self, health: ConnectionHealth) {
        *self.health.write().unwrap() = health;
    }

    /// Simulates a service outage: subsequent operations fail.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn probe_count(&self) -> u32 {
        self.probe_count.load(Ordering::SeqCst)
    }

    pub fn sent_messages(&self) -> Vec<SupportMessage> {
        self.sent_messages.read().unwrap().clone()
    }

    pub fn check_in_requests(&self) -> u32 {
        self.check_in_requests.load(Ordering::SeqCst)
    }

    fn ensure_available(&self) -> Result<(), LinkError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(LinkError::Api("simulated outage".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl VeteranLinkService for InMemoryVeteranLinkService {
    async fn connect(
        &self,
        _family_member_id: &str,
        _veteran_id: &str,
        access_code: &str,
    ) -> Result<LinkGrant, LinkError> {
        self.ensure_available()?;
        if !self.accepted_codes.contains(access_code) {
            return Err(LinkError::Rejected);
        }
        Ok(LinkGrant {
            access_level: "detailed".to_string(),
        })
    }

    async fn fetch_status(&self, _veteran_id: &str) -> Result<VeteranStatus, LinkError> {
        self.ensure_available()?;
        Ok(self.status.read().unwrap().clone())
    }

    async fn send_message(
        &self,
        _family_member_id: &str,
        _veteran_id: &str,
        message: &SupportMessage,
    ) -> Result<bool, LinkError> {
        self.ensure_available()?;
        self.sent_messages.write().unwrap().push(message.clone());
        Ok(true)
    }

    async fn request_check_in(
        &self,
        _family_member_id: &str,
        _veteran_id: &str,
    ) -> Result<bool, LinkError> {
        self.ensure_available()?;
        self.check_in_requests.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }

    async fn update_emergency_contact(
        &self,
        _family_member_id: &str,
        _veteran_id: &str,
        emergency_contact: bool,
    ) -> Result<bool, LinkError> {
        self.ensure_available()?;
        self.status.write().unwrap().emergency_contact_status = emergency_contact;
        Ok(true)
    }

    async fn fetch_insights(&self, _veteran_id: &str) -> Result<VeteranInsights, LinkError> {
        self.ensure_available()?;
        Ok(self.insights.read().unwrap().clone())
    }

    async fn probe(&self) -> ConnectionHealth {
        self.probe_count.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return ConnectionHealth::Offline;
        }
        *self.health.read().unwrap()
    }
}
