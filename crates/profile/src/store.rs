//! Profile store: the single owner of the loaded family profile.

use std::collections::HashSet;
use std::sync::Arc;

use log::{info, warn};
use tokio::sync::RwLock;
use vetsupport_family_auth::Identity;

use crate::{AccessLevel, FamilyProfile, ProfileRepository, ProfileUpdate};

/// Access codes accepted for linking a profile to a veteran account.
/// Illustrative; production validates against the veteran-side service.
pub const ACCEPTED_ACCESS_CODES: [&str; 2] = ["DEMO123", "FAMILY456"];

/// Owns the family member's profile for the active identity.
///
/// Collaborator failures are swallowed at this boundary: a fetch that
/// fails degrades to "no profile", a save that fails keeps the local
/// merge authoritative. Nothing here surfaces an error to the view
/// layer.
pub struct ProfileStore {
    repository: Arc<dyn ProfileRepository>,
    profile: Arc<RwLock<Option<FamilyProfile>>>,
    access_codes: HashSet<String>,
}

impl ProfileStore {
    pub fn new(repository: Arc<dyn ProfileRepository>) -> Self {
        Self {
            repository,
            profile: Arc::new(RwLock::new(None)),
            access_codes: ACCEPTED_ACCESS_CODES
                .iter()
                .map(|code| code.to_string())
                .collect(),
        }
    }

    /// Replaces the accepted access-code allow-list.
    pub fn with_access_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.access_codes = codes.into_iter().map(Into::into).collect();
        self
    }

    /// Loads the profile for `identity`, provisioning a default one on
    /// first sign-in. A transport failure degrades to "no profile".
    pub async fn load_for(&self, identity: &Identity) {
        match self.repository.fetch(&identity.id).await {
            Ok(Some(profile)) => {
                info!("loaded family profile for {}", identity.id);
                *self.profile.write().await = Some(profile);
            }
            Ok(None) => {
                let provisional = FamilyProfile::provisional(identity);
                info!("provisioning family profile for {}", identity.id);
                if let Err(err) = self.repository.save(&provisional).await {
                    warn!("could not persist provisional profile: {}", err);
                }
                *self.profile.write().await = Some(provisional);
            }
            Err(err) => {
                warn!("failed to load family profile for {}: {}", identity.id, err);
                *self.profile.write().await = None;
            }
        }
    }

    /// Clears the loaded profile. Called when the identity is cleared.
    pub async fn clear(&self) {
        *self.profile.write().await = None;
    }

    /// Snapshot of the loaded profile.
    pub async fn profile(&self) -> Option<FamilyProfile> {
        self.profile.read().await.clone()
    }

    /// Merges `update` into the loaded profile. Strict no-op when no
    /// profile is loaded.
    pub async fn update_profile(&self, update: ProfileUpdate) {
        let snapshot = {
            let mut guard = self.profile.write().await;
            let Some(profile) = guard.as_mut() else {
                return;
            };
            update.apply(profile);
            profile.clone()
        };

        // The local merge is authoritative; persistence is best effort.
        if let Err(err) = self.repository.save(&snapshot).await {
            warn!("profile update not persisted: {}", err);
        }
    }

    /// Links the profile to a veteran account if `access_code` is on the
    /// allow-list. Wrong codes report `false` and change nothing.
    pub async fn connect_to_veteran(&self, veteran_id: &str, access_code: &str) -> bool {
        if !self.access_codes.contains(access_code) {
            warn!("rejected veteran link attempt: access code not accepted");
            return false;
        }

        let snapshot = {
            let mut guard = self.profile.write().await;
            let Some(profile) = guard.as_mut() else {
                return false;
            };
            profile.connected_veteran_id = Some(veteran_id.to_string());
            profile.access_level = AccessLevel::Detailed;
            profile.clone()
        };

        if let Err(err) = self.repository.save(&snapshot).await {
            warn!("veteran link not persisted: {}", err);
        }
        info!("profile linked to veteran {}", veteran_id);
        true
    }

    /// Mirrors a link already granted by the veteran-side service into
    /// the profile. Unlike [`ProfileStore::connect_to_veteran`] this
    /// performs no code validation; the grant is the authority.
    pub async fn record_veteran_link(&self, veteran_id: &str) {
        let snapshot = {
            let mut guard = self.profile.write().await;
            let Some(profile) = guard.as_mut() else {
                return;
            };
            profile.connected_veteran_id = Some(veteran_id.to_string());
            profile.access_level = AccessLevel::Detailed;
            profile.clone()
        };

        if let Err(err) = self.repository.save(&snapshot).await {
            warn!("veteran link not persisted: {}", err);
        }
    }

    /// Unlinks the veteran account and demotes access to basic.
    pub async fn disconnect_from_veteran(&self) {
        let snapshot = {
            let mut guard = self.profile.write().await;
            let Some(profile) = guard.as_mut() else {
                return;
            };
            profile.connected_veteran_id = None;
            profile.access_level = AccessLevel::Basic;
            profile.clone()
        };

        if let Err(err) = self.repository.save(&snapshot).await {
            warn!("veteran unlink not persisted: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InMemoryProfileRepository, PreferredLanguage, Relationship};

    fn demo_identity() -> Identity {
        Identity {
            id: "family-demo-123".to_string(),
            email: Some("demo.family@vetsupport.com".to_string()),
            user_metadata: serde_json::json!({
                "full_name": "Sarah Johnson",
                "relationship": "spouse",
                "connected_veteran": "veteran-demo-456",
            }),
            created_at: None,
            updated_at: None,
        }
    }

    async fn loaded_store() -> ProfileStore {
        let store = ProfileStore::new(Arc::new(InMemoryProfileRepository::new()));
        store.load_for(&demo_identity()).await;
        store
    }

    #[tokio::test]
    async fn provisions_default_profile_from_identity_metadata() {
        let store = loaded_store().await;

        let profile = store.profile().await.unwrap();
        assert_eq!(profile.id, "family-demo-123");
        assert_eq!(profile.first_name, "Sarah");
        assert_eq!(profile.last_name, "Johnson");
        assert_eq!(profile.relationship, Relationship::Spouse);
        assert_eq!(
            profile.connected_veteran_id.as_deref(),
            Some("veteran-demo-456")
        );
        assert_eq!(profile.access_level, AccessLevel::Basic);
    }

    #[tokio::test]
    async fn update_profile_is_idempotent() {
        let store = loaded_store().await;

        let update = ProfileUpdate {
            province: Some("Ontario".to_string()),
            preferred_language: Some(PreferredLanguage::Fr),
            ..Default::default()
        };

        store.update_profile(update.clone()).await;
        let once = store.profile().await.unwrap();

        store.update_profile(update).await;
        let twice = store.profile().await.unwrap();

        assert_eq!(once, twice);
        assert_eq!(twice.province, "Ontario");
        assert_eq!(twice.preferred_language, PreferredLanguage::Fr);
    }

    #[tokio::test]
    async fn update_without_loaded_profile_is_a_no_op() {
        let store = ProfileStore::new(Arc::new(InMemoryProfileRepository::new()));

        store
            .update_profile(ProfileUpdate {
                province: Some("Ontario".to_string()),
                ..Default::default()
            })
            .await;

        assert!(store.profile().await.is_none());
    }

    #[tokio::test]
    async fn connect_with_accepted_code_links_and_elevates() {
        let store = loaded_store().await;
        store.disconnect_from_veteran().await;

        assert!(store.connect_to_veteran("veteran-demo-456", "DEMO123").await);

        let profile = store.profile().await.unwrap();
        assert_eq!(
            profile.connected_veteran_id.as_deref(),
            Some("veteran-demo-456")
        );
        assert_eq!(profile.access_level, AccessLevel::Detailed);
    }

    #[tokio::test]
    async fn connect_with_wrong_code_changes_nothing() {
        let store = loaded_store().await;
        let before = store.profile().await.unwrap();

        assert!(
            !store
                .connect_to_veteran("veteran-demo-789", "WRONG999")
                .await
        );

        assert_eq!(store.profile().await.unwrap(), before);
    }

    #[tokio::test]
    async fn disconnect_clears_linkage_and_demotes_access() {
        let store = loaded_store().await;
        store.connect_to_veteran("veteran-demo-456", "FAMILY456").await;

        store.disconnect_from_veteran().await;

        let profile = store.profile().await.unwrap();
        assert!(profile.connected_veteran_id.is_none());
        assert_eq!(profile.access_level, AccessLevel::Basic);
    }

    #[tokio::test]
    async fn clear_drops_loaded_profile() {
        let store = loaded_store().await;
        store.clear().await;
        assert!(store.profile().await.is_none());
    }
}
