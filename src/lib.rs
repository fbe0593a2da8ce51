//! VetSupport Family Companion Client Library
//!
//! A Rust client for the family-facing side of the VetSupport veteran
//! mental-health ecosystem: authentication, the family member's
//! profile, and the monitored connection to their veteran's account
//! with derived alerts and reachability tracking.
//!
//! The [`FamilyClient`] is the entry point. It owns three stores — the
//! session store, the profile store and the link monitor — and drives
//! their lifecycle: session restore on [`FamilyClient::initialize`],
//! downstream provisioning on sign-in, and teardown (including the
//! health-polling task) on sign-out or [`FamilyClient::shutdown`].

pub mod config;
pub mod error;

pub use vetsupport_family_auth as auth;
pub use vetsupport_family_link as link;
pub use vetsupport_family_profile as profile;
pub use vetsupport_family_resources as resources;

use std::sync::Arc;

use log::info;
use reqwest::Client;
use tokio::sync::Mutex;

use crate::auth::{
    HttpIdentityProvider, Identity, IdentityProvider, Session, SessionStore,
};
use crate::config::ClientConfig;
use crate::error::Error;
use crate::link::{
    ConnectionCache, FileConnectionCache, HttpVeteranLinkService, InMemoryConnectionCache,
    LinkMonitor, MonitorHandle, SupportMessage, VeteranInsights, VeteranLinkService,
};
use crate::profile::{HttpProfileRepository, ProfileRepository, ProfileStore};

/// The main entry point for the family companion client
pub struct FamilyClient {
    config: ClientConfig,
    http_client: Client,
    session: Arc<SessionStore>,
    profile: Arc<ProfileStore>,
    link: Arc<LinkMonitor>,
    monitor: Mutex<Option<MonitorHandle>>,
}

impl FamilyClient {
    /// Create a new client wired to the production HTTP collaborators.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use vetsupport_family::config::ClientConfig;
    /// use vetsupport_family::FamilyClient;
    ///
    /// # fn main() -> Result<(), vetsupport_family::error::Error> {
    /// let config = ClientConfig::new("https://api.vetsupport.example", "your-api-key")?;
    /// let client = FamilyClient::new(config)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        let base_url = config.base_url();
        let provider = Arc::new(HttpIdentityProvider::new(
            &base_url,
            &config.api_key,
            http_client.clone(),
        ));
        let repository = Arc::new(HttpProfileRepository::new(
            &base_url,
            &config.api_key,
            http_client.clone(),
        ));
        let service = Arc::new(HttpVeteranLinkService::new(
            &base_url,
            &config.api_key,
            http_client.clone(),
        ));
        let cache: Arc<dyn ConnectionCache> = match &config.connection_cache_path {
            Some(path) => Arc::new(FileConnectionCache::new(path.clone())),
            None => Arc::new(InMemoryConnectionCache::new()),
        };

        Ok(Self::assemble(
            config,
            http_client,
            provider,
            repository,
            service,
            cache,
        ))
    }

    /// Create a client with injected collaborator implementations.
    ///
    /// Used by tests and demos to swap in the in-memory providers.
    pub fn with_providers(
        config: ClientConfig,
        provider: Arc<dyn IdentityProvider>,
        repository: Arc<dyn ProfileRepository>,
        service: Arc<dyn VeteranLinkService>,
        cache: Arc<dyn ConnectionCache>,
    ) -> Self {
        Self::assemble(config, Client::new(), provider, repository, service, cache)
    }

    fn assemble(
        config: ClientConfig,
        http_client: Client,
        provider: Arc<dyn IdentityProvider>,
        repository: Arc<dyn ProfileRepository>,
        service: Arc<dyn VeteranLinkService>,
        cache: Arc<dyn ConnectionCache>,
    ) -> Self {
        let session = Arc::new(SessionStore::new(provider));
        let profile = Arc::new(ProfileStore::new(repository));
        let link = Arc::new(
            LinkMonitor::new(service, cache).with_poll_interval(config.health_check_interval),
        );

        Self {
            config,
            http_client,
            session,
            profile,
            link,
            monitor: Mutex::new(None),
        }
    }

    /// Restores a persisted session and, if one exists, provisions the
    /// dependent stores and starts health monitoring.
    pub async fn initialize(&self) -> Option<Identity> {
        let identity = self.session.initialize().await?;
        self.provision_for(&identity).await;
        Some(identity)
    }

    /// Signs in and provisions the dependent stores.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, Error> {
        let session = self.session.sign_in(email, password).await?;
        self.provision_for(&session.user).await;
        Ok(session)
    }

    /// Requests account creation. Never authenticates.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<(), Error> {
        self.session.sign_up(email, password, metadata).await?;
        Ok(())
    }

    /// Signs out and clears all dependent state. Idempotent.
    pub async fn sign_out(&self) -> Result<(), Error> {
        self.stop_monitoring().await;
        self.link.reset().await;
        self.profile.clear().await;
        self.session.sign_out().await?;
        Ok(())
    }

    /// Asks the identity provider to send a password-reset email.
    pub async fn reset_password(&self, email: &str) -> Result<(), Error> {
        self.session.reset_password(email).await?;
        Ok(())
    }

    /// Performs the veteran connection handshake and mirrors a granted
    /// link into the family profile.
    pub async fn connect_to_veteran(&self, veteran_id: &str, access_code: &str) -> bool {
        let Some(identity) = self.session.identity().await else {
            return false;
        };
        if !self
            .link
            .connect_to_veteran(&identity.id, veteran_id, access_code)
            .await
        {
            return false;
        }
        self.profile.record_veteran_link(veteran_id).await;
        true
    }

    /// Severs the veteran connection and demotes profile access.
    pub async fn disconnect_from_veteran(&self) {
        self.link.disconnect().await;
        self.profile.disconnect_from_veteran().await;
    }

    /// Sends a supportive message to the connected veteran.
    pub async fn send_support_message(&self, message: &SupportMessage) -> bool {
        let Some(identity) = self.session.identity().await else {
            return false;
        };
        self.link.send_support_message(&identity.id, message).await
    }

    /// Asks the veteran-side app to prompt a check-in.
    pub async fn request_check_in(&self) -> bool {
        let Some(identity) = self.session.identity().await else {
            return false;
        };
        self.link.request_check_in(&identity.id).await
    }

    /// Registers or withdraws this family member as an emergency
    /// contact for the connected veteran.
    pub async fn update_emergency_contact(&self, emergency_contact: bool) -> bool {
        let Some(identity) = self.session.identity().await else {
            return false;
        };
        self.link
            .update_emergency_contact(&identity.id, emergency_contact)
            .await
    }

    /// Fetches the analytics summary for `veteran_id`; failures yield
    /// the empty shape.
    pub async fn veteran_insights(&self, veteran_id: &str) -> VeteranInsights {
        self.link.veteran_insights(veteran_id).await
    }

    /// Stops background monitoring. Safe to call repeatedly.
    pub async fn shutdown(&self) {
        self.stop_monitoring().await;
    }

    /// Get a reference to the session store.
    pub fn auth(&self) -> &SessionStore {
        &self.session
    }

    /// Get a reference to the profile store.
    pub fn profile(&self) -> &ProfileStore {
        &self.profile
    }

    /// Get a reference to the connection monitor.
    pub fn link(&self) -> &LinkMonitor {
        &self.link
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// HTTP client shared by every collaborator.
    pub fn http_client(&self) -> &Client {
        &self.http_client
    }

    async fn provision_for(&self, identity: &Identity) {
        self.profile.load_for(identity).await;
        self.link.restore().await;
        self.start_monitoring_if_needed().await;
    }

    async fn start_monitoring_if_needed(&self) {
        let mut guard = self.monitor.lock().await;
        if guard.is_none() {
            info!("starting connection health monitoring");
            *guard = Some(self.link.start_monitoring());
        }
    }

    async fn stop_monitoring(&self) {
        let handle = self.monitor.lock().await.take();
        if let Some(handle) = handle {
            handle.stop().await;
            info!("connection health monitoring stopped");
        }
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::auth::{AuthError, AuthState, Identity, Session};
    pub use crate::config::ClientConfig;
    pub use crate::error::Error;
    pub use crate::link::{
        ConnectionHealth, FamilyAlert, MessageKind, RiskLevel, SupportMessage, VeteranStatus,
    };
    pub use crate::profile::{AccessLevel, FamilyProfile, ProfileUpdate, Relationship};
    pub use crate::FamilyClient;
}
