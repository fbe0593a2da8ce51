//! Profile persistence seam.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::{FamilyProfile, ProfileError};

/// Capability interface to the family-profile store.
///
/// Absence of a backing profile is not an error: `fetch` returns
/// `Ok(None)` and the caller degrades to a setup state.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn fetch(&self, id: &str) -> Result<Option<FamilyProfile>, ProfileError>;
    async fn save(&self, profile: &FamilyProfile) -> Result<(), ProfileError>;
}

/// Repository backed by the ecosystem's `/api/family/profile` endpoints.
pub struct HttpProfileRepository {
    base_url: String,
    api_key: String,
    http_client: Client,
}

impl HttpProfileRepository {
    pub fn new(base_url: &str, api_key: &str, http_client: Client) -> Self {
        Self {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            http_client,
        }
    }
}

#[async_trait]
impl ProfileRepository for HttpProfileRepository {
    async fn fetch(&self, id: &str) -> Result<Option<FamilyProfile>, ProfileError> {
        let url = format!("{}/api/family/profile/{}", self.base_url, id);

        let response = self
            .http_client
            .get(&url)
            .header("apikey", &self.api_key)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProfileError::Api(error_text));
        }

        let profile: FamilyProfile = response.json().await?;
        Ok(Some(profile))
    }

    async fn save(&self, profile: &FamilyProfile) -> Result<(), ProfileError> {
        let url = format!("{}/api/family/profile/{}", self.base_url, profile.id);

        let response = self
            .http_client
            .put(&url)
            .header("apikey", &self.api_key)
            .header("Content-Type", "application/json")
            .json(profile)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProfileError::Api(error_text));
        }

        Ok(())
    }
}

/// In-memory repository for tests and demos.
#[derive(Default)]
pub struct InMemoryProfileRepository {
    profiles: RwLock<HashMap<String, FamilyProfile>>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(self, profile: FamilyProfile) -> Self {
        {
            let mut profiles = self.profiles.write().unwrap();
            profiles.insert(profile.id.clone(), profile);
        }
        self
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn fetch(&self, id: &str) -> Result<Option<FamilyProfile>, ProfileError> {
        let profiles = self.profiles.read().unwrap();
        Ok(profiles.get(id).cloned())
    }

    async fn save(&self, profile: &FamilyProfile) -> Result<(), ProfileError> {
        let mut profiles = self.profiles.write().unwrap();
        profiles.insert(profile.id.clone(), profile.clone());
        Ok(())
    }
}
