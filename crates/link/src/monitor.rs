//! Connection monitor: owns the veteran status, the derived alerts and
//! the connection-health indicator.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use log::{debug, info, warn};
use tokio::sync::{broadcast, oneshot, RwLock};
use tokio::task::JoinHandle;

use crate::alerts::derive_alerts;
use crate::{
    ConnectionCache, ConnectionHealth, ConnectionRecord, FamilyAlert, SupportMessage,
    VeteranInsights, VeteranLinkService, VeteranStatus,
};

/// Default spacing between reachability probes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Owns everything derived from the veteran connection.
///
/// Single writer: only the monitor mutates status, alerts and health.
/// External failures are converted to booleans or empty-shaped defaults
/// here; nothing propagates an error past this boundary.
pub struct LinkMonitor {
    service: Arc<dyn VeteranLinkService>,
    cache: Arc<dyn ConnectionCache>,
    status: Arc<RwLock<Option<VeteranStatus>>>,
    alerts: Arc<RwLock<Vec<FamilyAlert>>>,
    health: Arc<RwLock<ConnectionHealth>>,
    health_changes: broadcast::Sender<ConnectionHealth>,
    poll_interval: Duration,
}

impl LinkMonitor {
    pub fn new(service: Arc<dyn VeteranLinkService>, cache: Arc<dyn ConnectionCache>) -> Self {
        let (health_changes, _) = broadcast::channel(16);
        Self {
            service,
            cache,
            status: Arc::new(RwLock::new(None)),
            alerts: Arc::new(RwLock::new(Vec::new())),
            health: Arc::new(RwLock::new(ConnectionHealth::Offline)),
            health_changes,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Restores a previously stored veteran connection, if any.
    pub async fn restore(&self) -> Option<ConnectionRecord> {
        let record = self.cache.load()?;
        info!("restoring veteran connection to {}", record.veteran_id);

        self.refresh_veteran_status(&record.veteran_id).await;
        if self.status.read().await.is_some() {
            self.set_health(ConnectionHealth::Connected).await;
        } else {
            self.set_health(ConnectionHealth::Offline).await;
        }
        Some(record)
    }

    /// Performs the connection handshake with the veteran-side service.
    ///
    /// On success the connection pointer is persisted for restoration
    /// across restarts and the status is refreshed immediately.
    /// Rejection and transport failure both report `false`.
    pub async fn connect_to_veteran(
        &self,
        family_member_id: &str,
        veteran_id: &str,
        access_code: &str,
    ) -> bool {
        match self
            .service
            .connect(family_member_id, veteran_id, access_code)
            .await
        {
            Ok(grant) => {
                let record = ConnectionRecord {
                    veteran_id: veteran_id.to_string(),
                    connected_at: Utc::now(),
                    access_level: grant.access_level,
                };
                self.cache.store(&record);
                self.refresh_veteran_status(veteran_id).await;
                self.set_health(ConnectionHealth::Connected).await;
                info!("connected to veteran {}", veteran_id);
                true
            }
            Err(err) => {
                warn!("failed to connect to veteran {}: {}", veteran_id, err);
                false
            }
        }
    }

    /// Fetches the current status and regenerates the alert list
    /// wholesale. A fetch failure leaves the previous snapshot in place.
    pub async fn refresh_veteran_status(&self, veteran_id: &str) {
        match self.service.fetch_status(veteran_id).await {
            Ok(status) => {
                let alerts = derive_alerts(&status, Utc::now());
                debug!(
                    "status refresh for {}: {:?}, {} alert(s)",
                    veteran_id,
                    status.risk_level,
                    alerts.len()
                );
                *self.status.write().await = Some(status);
                *self.alerts.write().await = alerts;
            }
            Err(err) => {
                warn!("failed to refresh veteran status: {}", err);
            }
        }
    }

    /// Sends a supportive message to the connected veteran.
    pub async fn send_support_message(
        &self,
        family_member_id: &str,
        message: &SupportMessage,
    ) -> bool {
        let Some(veteran_id) = self.connected_veteran_id().await else {
            return false;
        };

        match self
            .service
            .send_message(family_member_id, &veteran_id, message)
            .await
        {
            Ok(delivered) => delivered,
            Err(err) => {
                warn!("failed to send support message: {}", err);
                false
            }
        }
    }

    /// Asks the veteran-side app to prompt a check-in.
    pub async fn request_check_in(&self, family_member_id: &str) -> bool {
        let Some(veteran_id) = self.connected_veteran_id().await else {
            return false;
        };

        match self
            .service
            .request_check_in(family_member_id, &veteran_id)
            .await
        {
            Ok(accepted) => accepted,
            Err(err) => {
                warn!("failed to request check-in: {}", err);
                false
            }
        }
    }

    /// Registers or withdraws this family member as an emergency
    /// contact. A confirmed update is mirrored into the held snapshot.
    pub async fn update_emergency_contact(
        &self,
        family_member_id: &str,
        emergency_contact: bool,
    ) -> bool {
        let Some(veteran_id) = self.connected_veteran_id().await else {
            return false;
        };

        match self
            .service
            .update_emergency_contact(family_member_id, &veteran_id, emergency_contact)
            .await
        {
            Ok(true) => {
                if let Some(status) = self.status.write().await.as_mut() {
                    status.emergency_contact_status = emergency_contact;
                }
                true
            }
            Ok(false) => false,
            Err(err) => {
                warn!("failed to update emergency contact: {}", err);
                false
            }
        }
    }

    /// Fetches the analytics summary for `veteran_id`. A collaborator
    /// failure yields the empty shape so callers render unconditionally.
    pub async fn veteran_insights(&self, veteran_id: &str) -> VeteranInsights {
        match self.service.fetch_insights(veteran_id).await {
            Ok(insights) => insights,
            Err(err) => {
                warn!("failed to fetch veteran insights: {}", err);
                VeteranInsights::default()
            }
        }
    }

    /// Runs one reachability probe and records the result.
    pub async fn check_health_once(&self) {
        let health = self.service.probe().await;
        self.set_health(health).await;
    }

    /// Discards status, alerts and health. The cache hint survives; it
    /// is only cleared by an explicit disconnect.
    pub async fn reset(&self) {
        *self.status.write().await = None;
        self.alerts.write().await.clear();
        self.set_health(ConnectionHealth::Offline).await;
    }

    /// Severs the veteran connection: clears the persisted pointer and
    /// all in-memory connection state.
    pub async fn disconnect(&self) {
        self.cache.clear();
        self.reset().await;
        info!("veteran connection severed");
    }

    /// Starts periodic health polling.
    ///
    /// The returned handle must be kept; polling runs until
    /// [`MonitorHandle::stop`] consumes it (or the handle is dropped,
    /// which aborts the task). Stopping twice is unrepresentable.
    pub fn start_monitoring(self: &Arc<Self>) -> MonitorHandle {
        let monitor = Arc::clone(self);
        let interval = self.poll_interval;
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately; skip it so probes
            // start one full interval after mount.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        monitor.check_health_once().await;
                    }
                    _ = &mut shutdown_rx => {
                        debug!("health monitoring stopped");
                        break;
                    }
                }
            }
        });

        MonitorHandle {
            shutdown: Some(shutdown_tx),
            task: Some(task),
        }
    }

    pub async fn status(&self) -> Option<VeteranStatus> {
        self.status.read().await.clone()
    }

    pub async fn alerts(&self) -> Vec<FamilyAlert> {
        self.alerts.read().await.clone()
    }

    pub async fn health(&self) -> ConnectionHealth {
        *self.health.read().await
    }

    /// Receiver for connection-health transitions.
    pub fn subscribe_health(&self) -> broadcast::Receiver<ConnectionHealth> {
        self.health_changes.subscribe()
    }

    async fn connected_veteran_id(&self) -> Option<String> {
        self.status
            .read()
            .await
            .as_ref()
            .map(|status| status.veteran_id.clone())
    }

    async fn set_health(&self, health: ConnectionHealth) {
        let mut current = self.health.write().await;
        if *current != health {
            info!("connection health changing from {:?} to {:?}", *current, health);
            *current = health;
            let _ = self.health_changes.send(health);
        }
    }
}

/// Handle to the background polling task.
///
/// Teardown happens exactly once: `stop` consumes the handle, and a
/// dropped handle aborts the task so repeated mount/unmount cannot leak
/// a timer.
pub struct MonitorHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    /// Signals the polling task and waits for it to exit.
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
