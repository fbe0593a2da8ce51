//! Veteran connection monitoring for the VetSupport family companion
//!
//! This crate owns everything derived from the link between a family
//! member and their veteran: the wellbeing snapshot ([`VeteranStatus`]),
//! the alert list regenerated from it ([`FamilyAlert`]), the coarse
//! reachability indicator ([`ConnectionHealth`]) kept fresh by a
//! cancellable polling task, and the [`VeteranLinkService`] seam to the
//! veteran-side service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod alerts;
pub mod cache;
pub mod monitor;
pub mod service;

pub use alerts::derive_alerts;
pub use cache::{ConnectionCache, FileConnectionCache, InMemoryConnectionCache};
pub use monitor::{LinkMonitor, MonitorHandle};
pub use service::{HttpVeteranLinkService, InMemoryVeteranLinkService, VeteranLinkService};

/// Error type
#[derive(Error, Debug)]
pub enum LinkError {
    #[error("veteran link service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("veteran link service error: {0}")]
    Api(String),

    /// The veteran-side service rejected the access code.
    #[error("access code rejected by the veteran-side service")]
    Rejected,

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Risk bands reported by the veteran-side service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Crisis,
}

/// Wellbeing snapshot of the connected veteran.
///
/// Only meaningful while a veteran connection exists; discarded on
/// disconnect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VeteranStatus {
    pub veteran_id: String,
    pub risk_level: RiskLevel,
    pub last_activity: DateTime<Utc>,
    #[serde(default)]
    pub allowed_data_sharing: Vec<String>,
    #[serde(default)]
    pub emergency_contact_status: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Crisis,
    CheckIn,
    Improvement,
    Resource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertPriority {
    Low,
    Medium,
    High,
    Critical,
}

/// A notification surfaced to the family member, derived from the
/// current [`VeteranStatus`]. Ephemeral; regenerated wholesale on every
/// refresh and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyAlert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertType,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub priority: AlertPriority,
    pub action_required: bool,
}

/// Coarse reachability of the veteran-side service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionHealth {
    Connected,
    Limited,
    Offline,
}

/// Locally cached connection pointer, used only to restore the link
/// across restarts. A hint, never a source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRecord {
    pub veteran_id: String,
    pub connected_at: DateTime<Utc>,
    pub access_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Support,
    CheckIn,
    Urgent,
}

/// A supportive message composed by the family member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportMessage {
    pub body: String,
    pub kind: MessageKind,
}

impl SupportMessage {
    pub fn new(body: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            body: body.into(),
            kind,
        }
    }

    pub fn support(body: impl Into<String>) -> Self {
        Self::new(body, MessageKind::Support)
    }
}

/// Grant returned by a successful connection handshake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkGrant {
    pub access_level: String,
}

/// Derived analytics summary for the connected veteran.
///
/// Every field is present even when the analytics collaborator fails;
/// callers receive the [`Default`] empty shape and render
/// unconditionally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VeteranInsights {
    pub insights: InsightSummary,
    pub correlations: CorrelationSummary,
    pub alerts: InsightFlags,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsightSummary {
    pub risk_trends: Vec<String>,
    pub intervention_recommendations: Vec<String>,
    pub family_alerts: Vec<String>,
    pub provider_referrals: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CorrelationSummary {
    pub with_other_apps: Vec<String>,
    pub cross_platform_patterns: Vec<String>,
    pub family_dynamics: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsightFlags {
    pub crisis_risk: bool,
    pub family_support: bool,
    pub provider_intervention: bool,
}
