//! Family member profile for the VetSupport family companion
//!
//! One profile per authenticated identity: name, relationship to the
//! veteran, access level, linkage to a veteran account and notification
//! preferences. The [`ProfileStore`] is the sole owner of the loaded
//! profile; persistence goes through the [`ProfileRepository`] seam.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vetsupport_family_auth::Identity;

pub mod repository;
pub mod store;

pub use repository::{HttpProfileRepository, InMemoryProfileRepository, ProfileRepository};
pub use store::ProfileStore;

/// Error type
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("profile service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("profile service error: {0}")]
    Api(String),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Relationship of the family member to their veteran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    Spouse,
    Parent,
    Child,
    Sibling,
    Friend,
    Other,
}

/// How much of the veteran's data this family member may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    Basic,
    Detailed,
    CrisisOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredLanguage {
    En,
    Fr,
}

/// Per-category notification toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub crisis_alerts: bool,
    pub check_in_reminders: bool,
    pub resource_updates: bool,
    pub family_messages: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            crisis_alerts: true,
            check_in_reminders: true,
            resource_updates: true,
            family_messages: true,
        }
    }
}

/// The family member's stored attributes and preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyProfile {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub relationship: Relationship,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connected_veteran_id: Option<String>,
    pub access_level: AccessLevel,
    pub emergency_contact: bool,
    pub province: String,
    pub preferred_language: PreferredLanguage,
    #[serde(default)]
    pub notification_settings: NotificationSettings,
    pub joined_at: DateTime<Utc>,
}

impl FamilyProfile {
    /// Builds a first-sign-in profile from the identity's metadata hints
    /// (`full_name`, `relationship`, `connected_veteran`).
    pub fn provisional(identity: &Identity) -> Self {
        let metadata = &identity.user_metadata;

        let full_name = metadata
            .get("full_name")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        let (first_name, last_name) = match full_name.split_once(' ') {
            Some((first, last)) => (first.to_string(), last.to_string()),
            None => (full_name.to_string(), String::new()),
        };

        let relationship = metadata
            .get("relationship")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or(Relationship::Other);

        let connected_veteran_id = metadata
            .get("connected_veteran")
            .and_then(|v| v.as_str())
            .map(str::to_string);

        Self {
            id: identity.id.clone(),
            first_name,
            last_name,
            email: identity.email.clone().unwrap_or_default(),
            relationship,
            connected_veteran_id,
            access_level: AccessLevel::Basic,
            emergency_contact: false,
            province: String::new(),
            preferred_language: PreferredLanguage::En,
            notification_settings: NotificationSettings::default(),
            joined_at: Utc::now(),
        }
    }
}

/// Partial profile update, merged field-by-field into the loaded profile.
///
/// Veteran linkage is deliberately not part of the update surface; it
/// changes only through `connect_to_veteran` / `disconnect_from_veteran`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship: Option<Relationship>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_language: Option<PreferredLanguage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_settings: Option<NotificationSettings>,
}

impl ProfileUpdate {
    pub(crate) fn apply(&self, profile: &mut FamilyProfile) {
        if let Some(first_name) = &self.first_name {
            profile.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            profile.last_name = last_name.clone();
        }
        if let Some(relationship) = self.relationship {
            profile.relationship = relationship;
        }
        if let Some(emergency_contact) = self.emergency_contact {
            profile.emergency_contact = emergency_contact;
        }
        if let Some(province) = &self.province {
            profile.province = province.clone();
        }
        if let Some(preferred_language) = self.preferred_language {
            profile.preferred_language = preferred_language;
        }
        if let Some(notification_settings) = self.notification_settings {
            profile.notification_settings = notification_settings;
        }
    }
}
