//! Session store: the single owner of the authenticated identity.

use std::sync::Arc;

use log::{info, warn};
use tokio::sync::{broadcast, RwLock};

use crate::{AuthError, AuthState, Identity, IdentityProvider, Session};

/// Auth lifecycle notifications, broadcast to dependent stores.
#[derive(Debug, Clone)]
pub enum AuthEvent {
    SignedIn(Session),
    SignedOut,
}

/// Holds the current authenticated identity and drives the
/// `Unauthenticated -> Authenticating -> Authenticated` state machine.
///
/// The store is the sole mutator of the session; everything else reads
/// snapshots through [`SessionStore::session`] or subscribes to
/// [`AuthEvent`]s.
pub struct SessionStore {
    provider: Arc<dyn IdentityProvider>,
    state: Arc<RwLock<AuthState>>,
    session: Arc<RwLock<Option<Session>>>,
    events: broadcast::Sender<AuthEvent>,
}

impl SessionStore {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            provider,
            state: Arc::new(RwLock::new(AuthState::Unauthenticated)),
            session: Arc::new(RwLock::new(None)),
            events,
        }
    }

    /// Checks the provider for a persisted session.
    ///
    /// A restore failure is not fatal; the store stays unauthenticated
    /// and the caller proceeds to the sign-in surface.
    pub async fn initialize(&self) -> Option<Identity> {
        match self.provider.get_session().await {
            Ok(Some(session)) => {
                let identity = session.user.clone();
                *self.session.write().await = Some(session.clone());
                *self.state.write().await = AuthState::Authenticated;
                info!("restored session for {}", identity.id);
                let _ = self.events.send(AuthEvent::SignedIn(session));
                Some(identity)
            }
            Ok(None) => None,
            Err(err) => {
                warn!("session restore failed: {}", err);
                None
            }
        }
    }

    /// Signs in with email and password.
    ///
    /// On rejection the prior state is left intact. While a sign-in is
    /// in flight, further submissions fail with
    /// [`AuthError::AuthenticationInProgress`].
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        {
            let mut state = self.state.write().await;
            if *state == AuthState::Authenticating {
                return Err(AuthError::AuthenticationInProgress);
            }
            *state = AuthState::Authenticating;
        }

        match self.provider.sign_in_with_password(email, password).await {
            Ok(session) => {
                *self.session.write().await = Some(session.clone());
                *self.state.write().await = AuthState::Authenticated;
                info!("signed in as {}", session.user.id);
                let _ = self.events.send(AuthEvent::SignedIn(session.clone()));
                Ok(session)
            }
            Err(err) => {
                let had_session = self.session.read().await.is_some();
                *self.state.write().await = if had_session {
                    AuthState::Authenticated
                } else {
                    AuthState::Unauthenticated
                };
                warn!("sign-in failed for {}: {}", email, err);
                Err(err)
            }
        }
    }

    /// Requests account creation. Never authenticates.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<(), AuthError> {
        self.provider.sign_up(email, password, metadata).await
    }

    /// Clears the identity. Idempotent.
    ///
    /// The session is dropped locally before the provider revocation, so
    /// a transport failure cannot leave a half-signed-out store.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let session = self.session.write().await.take();
        *self.state.write().await = AuthState::Unauthenticated;

        let Some(session) = session else {
            return Ok(());
        };

        if let Err(err) = self.provider.sign_out(&session.access_token).await {
            warn!("provider sign-out failed, session cleared locally: {}", err);
        }
        info!("signed out {}", session.user.id);
        let _ = self.events.send(AuthEvent::SignedOut);
        Ok(())
    }

    /// Asks the provider to send a password-reset email.
    ///
    /// Fire and forget: only an unreachable provider is surfaced. A
    /// provider-side rejection is logged and resolves anyway, so the
    /// reset surface never reveals whether an account exists.
    pub async fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        match self.provider.reset_password_for_email(email).await {
            Ok(()) => Ok(()),
            Err(err @ AuthError::ProviderUnavailable(_)) => Err(err),
            Err(err) => {
                warn!("password reset request not acknowledged: {}", err);
                Ok(())
            }
        }
    }

    /// Snapshot of the current session.
    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    /// Snapshot of the current identity.
    pub async fn identity(&self) -> Option<Identity> {
        self.session.read().await.as_ref().map(|s| s.user.clone())
    }

    pub async fn state(&self) -> AuthState {
        *self.state.read().await
    }

    /// Receiver for sign-in and sign-out notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}
