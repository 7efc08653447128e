//! Last-known subscription state.
//!
//! The cache lets callers read status synchronously without waiting on the
//! provider. Only the synchronization core writes to it.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use subkit_lib::{SubscriptionOffering, SubscriptionStatus};

/// Copy of the cached values at one point in time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheSnapshot {
    pub status: SubscriptionStatus,
    pub offerings: Option<SubscriptionOffering>,
    pub user_id: Option<String>,
}

/// Single-lock store of status, offerings and user id.
///
/// Every setter replaces one field under the write lock, so readers never see
/// a half-written value. Writes are last-writer-wins.
#[derive(Debug, Default)]
pub struct StatusCache {
    inner: RwLock<CacheSnapshot>,
}

impl StatusCache {
    /// Create an empty cache: inactive, no offerings, no user.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&self, status: SubscriptionStatus) {
        self.write().status = status;
    }

    pub fn set_offerings(&self, offerings: Option<SubscriptionOffering>) {
        self.write().offerings = offerings;
    }

    pub fn set_user_id(&self, user_id: Option<String>) {
        self.write().user_id = user_id;
    }

    /// Last committed status. Never blocks on I/O.
    pub fn status(&self) -> SubscriptionStatus {
        self.read().status.clone()
    }

    pub fn offerings(&self) -> Option<SubscriptionOffering> {
        self.read().offerings.clone()
    }

    pub fn user_id(&self) -> Option<String> {
        self.read().user_id.clone()
    }

    pub fn snapshot(&self) -> CacheSnapshot {
        self.read().clone()
    }

    // A panic while holding the lock cannot leave a field half-written (each
    // write is a single assignment), so a poisoned lock is still usable.
    fn read(&self) -> RwLockReadGuard<'_, CacheSnapshot> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CacheSnapshot> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let cache = StatusCache::new();
        assert_eq!(cache.status(), SubscriptionStatus::INACTIVE);
        assert!(cache.offerings().is_none());
        assert!(cache.user_id().is_none());
    }

    #[test]
    fn test_setters_touch_one_field() {
        let cache = StatusCache::new();
        cache.set_user_id(Some("user_1".into()));
        cache.set_status(SubscriptionStatus::active("premium", "pkg_annual", None));

        let snapshot = cache.snapshot();
        assert_eq!(snapshot.user_id.as_deref(), Some("user_1"));
        assert!(snapshot.status.is_active());
        assert!(snapshot.offerings.is_none());

        cache.set_user_id(None);
        assert!(cache.status().is_active());
        assert!(cache.user_id().is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let cache = StatusCache::new();
        cache.set_status(SubscriptionStatus::active("premium", "pkg_monthly", None));
        cache.set_status(SubscriptionStatus::active("premium", "pkg_annual", None));
        assert_eq!(cache.status().active_package_id(), Some("pkg_annual"));

        cache.set_status(SubscriptionStatus::INACTIVE);
        assert_eq!(cache.status(), SubscriptionStatus::INACTIVE);
    }
}
