//! Identity provider implementations.
//!
//! The [`IdentityProvider`] trait is the seam to the external identity
//! service. [`HttpIdentityProvider`] talks to the production endpoints;
//! [`MockIdentityProvider`] keeps an in-memory account table and is the
//! implementation used by tests and local demos.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use reqwest::Client;
use uuid::Uuid;

use crate::{AuthError, Identity, Session};

/// Capability interface to the identity service.
///
/// Implementations must map a credentials rejection to
/// [`AuthError::InvalidCredentials`] and an unreachable provider to
/// [`AuthError::ProviderUnavailable`]; callers rely on that distinction.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Returns the provider's persisted session, if any.
    async fn get_session(&self) -> Result<Option<Session>, AuthError>;

    /// Signs in with email and password.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError>;

    /// Requests account creation. Does not authenticate.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<(), AuthError>;

    /// Revokes the session behind `access_token`.
    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;

    /// Sends a password-reset email. Fire and forget.
    async fn reset_password_for_email(&self, email: &str) -> Result<(), AuthError>;
}

/// Identity provider backed by the ecosystem's `/auth/v1` endpoints.
pub struct HttpIdentityProvider {
    url: String,
    key: String,
    http_client: Client,
    persist_session: bool,
    current_session: Arc<RwLock<Option<Session>>>,
}

impl HttpIdentityProvider {
    pub fn new(url: &str, key: &str, http_client: Client) -> Self {
        Self {
            url: url.to_string(),
            key: key.to_string(),
            http_client,
            persist_session: true,
            current_session: Arc::new(RwLock::new(None)),
        }
    }

    /// Disables keeping the signed-in session in memory.
    pub fn with_persist_session(mut self, value: bool) -> Self {
        self.persist_session = value;
        self
    }

    fn remember(&self, session: &Session) {
        if self.persist_session {
            let mut write_guard = self.current_session.write().unwrap();
            *write_guard = Some(session.clone());
        }
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        let read_guard = self.current_session.read().unwrap();
        Ok(read_guard.clone())
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.url);

        let payload = serde_json::json!({
            "email": email,
            "password": password,
        });

        let response = self
            .http_client
            .post(&url)
            .header("apikey", &self.key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            // 400/401/422 are the provider's credential-rejection statuses
            if matches!(status.as_u16(), 400 | 401 | 422) {
                debug!("sign-in rejected for {}: {}", email, error_text);
                return Err(AuthError::InvalidCredentials);
            }
            return Err(AuthError::Api(error_text));
        }

        let session: Session = response.json().await?;
        self.remember(&session);

        Ok(session)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<(), AuthError> {
        let url = format!("{}/auth/v1/signup", self.url);

        let mut payload = serde_json::json!({
            "email": email,
            "password": password,
        });
        if let Some(metadata) = metadata {
            payload["data"] = metadata;
        }

        let response = self
            .http_client
            .post(&url)
            .header("apikey", &self.key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AuthError::Api(error_text));
        }

        Ok(())
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let url = format!("{}/auth/v1/logout", self.url);

        let response = self
            .http_client
            .post(&url)
            .header("apikey", &self.key)
            .header("Authorization", format!("Bearer {}", access_token))
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AuthError::Api(error_text));
        }

        let mut write_guard = self.current_session.write().unwrap();
        *write_guard = None;

        Ok(())
    }

    async fn reset_password_for_email(&self, email: &str) -> Result<(), AuthError> {
        let url = format!("{}/auth/v1/recover", self.url);

        let payload = serde_json::json!({
            "email": email,
        });

        let response = self
            .http_client
            .post(&url)
            .header("apikey", &self.key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AuthError::Api(error_text));
        }

        Ok(())
    }
}

struct MockAccount {
    password: String,
    identity: Identity,
}

/// In-memory identity provider for tests and demos.
///
/// Accounts are a simple email-to-password table. `with_demo_family`
/// seeds the demo family account the companion app ships with.
#[derive(Default)]
pub struct MockIdentityProvider {
    accounts: RwLock<HashMap<String, MockAccount>>,
    session: RwLock<Option<Session>>,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the demo family account.
    pub fn with_demo_family() -> Self {
        let provider = Self::new();
        provider.add_account(
            "demo.family@vetsupport.com",
            "FamilySupport2024!",
            serde_json::json!({
                "full_name": "Sarah Johnson",
                "relationship": "spouse",
                "connected_veteran": "veteran-demo-456",
            }),
        );
        provider
    }

    /// Registers an account with the given metadata.
    pub fn add_account(&self, email: &str, password: &str, metadata: serde_json::Value) {
        let identity = Identity {
            id: Uuid::new_v4().to_string(),
            email: Some(email.to_string()),
            user_metadata: metadata,
            created_at: Some(Utc::now().to_rfc3339()),
            updated_at: Some(Utc::now().to_rfc3339()),
        };
        let mut accounts = self.accounts.write().unwrap();
        accounts.insert(
            email.to_string(),
            MockAccount {
                password: password.to_string(),
                identity,
            },
        );
    }

    /// Installs a persisted session, as if a previous run had signed in.
    pub fn with_session(self, session: Session) -> Self {
        {
            let mut slot = self.session.write().unwrap();
            *slot = Some(session);
        }
        self
    }

    fn issue_session(identity: Identity) -> Session {
        Session {
            access_token: format!("mock-token-{}", Uuid::new_v4()),
            refresh_token: format!("mock-refresh-{}", Uuid::new_v4()),
            expires_in: 3600,
            token_type: "bearer".to_string(),
            user: identity,
        }
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        let slot = self.session.read().unwrap();
        Ok(slot.clone())
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let identity = {
            let accounts = self.accounts.read().unwrap();
            match accounts.get(email) {
                Some(account) if account.password == password => account.identity.clone(),
                _ => return Err(AuthError::InvalidCredentials),
            }
        };

        let session = Self::issue_session(identity);
        let mut slot = self.session.write().unwrap();
        *slot = Some(session.clone());
        Ok(session)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<(), AuthError> {
        self.add_account(
            email,
            password,
            metadata.unwrap_or_else(|| serde_json::json!({})),
        );
        Ok(())
    }

    async fn sign_out(&self, _access_token: &str) -> Result<(), AuthError> {
        let mut slot = self.session.write().unwrap();
        *slot = None;
        Ok(())
    }

    async fn reset_password_for_email(&self, _email: &str) -> Result<(), AuthError> {
        Ok(())
    }
}
