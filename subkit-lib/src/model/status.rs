//! The user's current subscription status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether the user holds the configured entitlement, and the details if so.
///
/// An inactive status never carries an entitlement, package or expiration;
/// the constructors are the only way to build one, so the invariant holds for
/// every value in the system, deserialized ones included.
///
/// # Example
///
/// ```
/// use subkit_lib::SubscriptionStatus;
///
/// let status = SubscriptionStatus::active("premium", "pkg_annual", None);
/// assert!(status.is_active());
/// assert_eq!(status.active_package_id(), Some("pkg_annual"));
///
/// assert_eq!(SubscriptionStatus::default(), SubscriptionStatus::INACTIVE);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StatusRecord", into = "StatusRecord")]
pub struct SubscriptionStatus {
    is_active: bool,
    active_entitlement_id: Option<String>,
    active_package_id: Option<String>,
    expiration_date: Option<DateTime<Utc>>,
}

impl SubscriptionStatus {
    /// Canonical "no active subscription" value.
    pub const INACTIVE: Self = Self {
        is_active: false,
        active_entitlement_id: None,
        active_package_id: None,
        expiration_date: None,
    };

    /// The inactive status.
    pub const fn inactive() -> Self {
        Self::INACTIVE
    }

    /// An active status for `entitlement_id`, purchased through `package_id`.
    ///
    /// `expiration_date` is `None` for lifetime purchases.
    pub fn active(
        entitlement_id: impl Into<String>,
        package_id: impl Into<String>,
        expiration_date: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            is_active: true,
            active_entitlement_id: Some(entitlement_id.into()),
            active_package_id: Some(package_id.into()),
            expiration_date,
        }
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn active_entitlement_id(&self) -> Option<&str> {
        self.active_entitlement_id.as_deref()
    }

    /// Store product identifier behind the active entitlement.
    pub fn active_package_id(&self) -> Option<&str> {
        self.active_package_id.as_deref()
    }

    pub fn expiration_date(&self) -> Option<DateTime<Utc>> {
        self.expiration_date
    }

    /// True when the status is active but its expiration is at or before `now`.
    ///
    /// The provider remains the authority on activity; this only lets callers
    /// notice a cached value that has gone stale.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expiration_date {
            Some(expiration) => self.is_active && expiration <= now,
            None => false,
        }
    }
}

impl Default for SubscriptionStatus {
    fn default() -> Self {
        Self::INACTIVE
    }
}

/// Wire shape of [`SubscriptionStatus`].
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusRecord {
    is_active: bool,
    #[serde(default)]
    active_entitlement_id: Option<String>,
    #[serde(default)]
    active_package_id: Option<String>,
    #[serde(default)]
    expiration_date: Option<DateTime<Utc>>,
}

impl From<StatusRecord> for SubscriptionStatus {
    fn from(record: StatusRecord) -> Self {
        if !record.is_active {
            return Self::INACTIVE;
        }
        Self {
            is_active: true,
            active_entitlement_id: record.active_entitlement_id,
            active_package_id: record.active_package_id,
            expiration_date: record.expiration_date,
        }
    }
}

impl From<SubscriptionStatus> for StatusRecord {
    fn from(status: SubscriptionStatus) -> Self {
        Self {
            is_active: status.is_active,
            active_entitlement_id: status.active_entitlement_id,
            active_package_id: status.active_package_id,
            expiration_date: status.expiration_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_inactive_is_empty() {
        let status = SubscriptionStatus::inactive();
        assert!(!status.is_active());
        assert!(status.active_entitlement_id().is_none());
        assert!(status.active_package_id().is_none());
        assert!(status.expiration_date().is_none());
    }

    #[test]
    fn test_expiry_check() {
        let expires = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let status = SubscriptionStatus::active("premium", "pkg_monthly", Some(expires));

        assert!(!status.is_expired_at(expires - Duration::seconds(1)));
        assert!(status.is_expired_at(expires));

        let lifetime = SubscriptionStatus::active("premium", "pkg_lifetime", None);
        assert!(!lifetime.is_expired_at(expires));
        assert!(!SubscriptionStatus::INACTIVE.is_expired_at(expires));
    }

    #[test]
    fn test_deserialize_normalizes_inactive() {
        let json = r#"{
            "isActive": false,
            "activeEntitlementId": "premium",
            "activePackageId": "pkg_annual",
            "expirationDate": "2026-01-01T00:00:00Z"
        }"#;
        let status: SubscriptionStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status, SubscriptionStatus::INACTIVE);
    }

    #[test]
    fn test_serde_active() {
        let expires = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let status = SubscriptionStatus::active("premium", "pkg_annual", Some(expires));

        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["isActive"], true);
        assert_eq!(json["activePackageId"], "pkg_annual");

        let back: SubscriptionStatus = serde_json::from_value(json).unwrap();
        assert_eq!(back, status);
    }
}
