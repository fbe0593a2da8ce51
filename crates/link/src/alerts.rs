//! Alert derivation.
//!
//! Alerts are a pure function of the status snapshot: the monitor calls
//! [`derive_alerts`] after every refresh and replaces the alert list
//! wholesale, so stale or duplicated alerts cannot accumulate.

use chrono::{DateTime, Utc};

use crate::{AlertPriority, AlertType, FamilyAlert, RiskLevel, VeteranStatus};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Days of veteran inactivity after which a check-in reminder fires.
pub const INACTIVITY_THRESHOLD_DAYS: f64 = 3.0;

/// Derives the family alert list from a status snapshot.
///
/// The rules evaluate independently; more than one alert may fire for
/// the same snapshot.
pub fn derive_alerts(status: &VeteranStatus, now: DateTime<Utc>) -> Vec<FamilyAlert> {
    let mut alerts = Vec::new();
    let stamp = now.timestamp_millis();

    if status.risk_level == RiskLevel::Crisis {
        alerts.push(FamilyAlert {
            id: format!("crisis_{}", stamp),
            kind: AlertType::Crisis,
            message: "Your veteran may need immediate support. Crisis resources are available \
                      24/7."
                .to_string(),
            timestamp: now,
            priority: AlertPriority::Critical,
            action_required: true,
        });
    }

    if status.risk_level == RiskLevel::High {
        alerts.push(FamilyAlert {
            id: format!("high_risk_{}", stamp),
            kind: AlertType::CheckIn,
            message: "Your veteran may be experiencing increased stress. Consider reaching out."
                .to_string(),
            timestamp: now,
            priority: AlertPriority::High,
            action_required: true,
        });
    }

    let days_since_activity =
        (now - status.last_activity).num_seconds() as f64 / SECONDS_PER_DAY;
    if days_since_activity > INACTIVITY_THRESHOLD_DAYS {
        let days = days_since_activity.floor() as i64;
        alerts.push(FamilyAlert {
            id: format!("checkin_{}", stamp),
            kind: AlertType::CheckIn,
            message: format!(
                "It's been {} days since your veteran's last activity. Consider sending a \
                 supportive message.",
                days
            ),
            timestamp: now,
            priority: AlertPriority::Medium,
            action_required: false,
        });
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn status(risk_level: RiskLevel, last_activity: DateTime<Utc>) -> VeteranStatus {
        VeteranStatus {
            veteran_id: "veteran-demo-456".to_string(),
            risk_level,
            last_activity,
            allowed_data_sharing: vec!["basic_status".to_string()],
            emergency_contact_status: true,
        }
    }

    #[test]
    fn crisis_risk_yields_exactly_one_critical_alert() {
        let now = Utc::now();
        let alerts = derive_alerts(&status(RiskLevel::Crisis, now), now);

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertType::Crisis);
        assert_eq!(alerts[0].priority, AlertPriority::Critical);
        assert!(alerts[0].action_required);
    }

    #[test]
    fn low_risk_with_recent_activity_yields_no_alerts() {
        let now = Utc::now();
        let recent = now - Duration::days(1);

        assert!(derive_alerts(&status(RiskLevel::Low, recent), now).is_empty());
    }

    #[test]
    fn high_risk_yields_check_in_alert_requiring_action() {
        let now = Utc::now();
        let alerts = derive_alerts(&status(RiskLevel::High, now), now);

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertType::CheckIn);
        assert_eq!(alerts[0].priority, AlertPriority::High);
        assert!(alerts[0].action_required);
    }

    #[test]
    fn five_days_of_inactivity_yields_reminder_mentioning_the_count() {
        let now = Utc::now();
        let stale = now - Duration::days(5);
        let alerts = derive_alerts(&status(RiskLevel::Low, stale), now);

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertType::CheckIn);
        assert_eq!(alerts[0].priority, AlertPriority::Medium);
        assert!(!alerts[0].action_required);
        assert!(alerts[0].message.contains('5'), "{}", alerts[0].message);
    }

    #[test]
    fn three_days_exactly_is_below_the_inactivity_threshold() {
        let now = Utc::now();
        let boundary = now - Duration::days(3);

        assert!(derive_alerts(&status(RiskLevel::Low, boundary), now).is_empty());
    }

    #[test]
    fn rules_fire_independently() {
        let now = Utc::now();
        let stale = now - Duration::days(4);
        let alerts = derive_alerts(&status(RiskLevel::Crisis, stale), now);

        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].kind, AlertType::Crisis);
        assert_eq!(alerts[1].kind, AlertType::CheckIn);
    }

    #[test]
    fn derivation_is_deterministic_for_a_fixed_instant() {
        let now = Utc::now();
        let stale = now - Duration::days(6);
        let snapshot = status(RiskLevel::High, stale);

        assert_eq!(
            derive_alerts(&snapshot, now),
            derive_alerts(&snapshot, now)
        );
    }
}
