//! Test assertions and verification helpers.

use crate::{PurchasesError, PurchasesErrorCode, Result, SubscriptionStatus};

/// Assert that a status is the canonical inactive value.
///
/// # Panics
/// Panics if the status is active or carries any detail.
pub fn assert_inactive(status: &SubscriptionStatus) {
    assert_eq!(
        status,
        &SubscriptionStatus::INACTIVE,
        "Expected inactive status, got {:?}",
        status
    );
}

/// Assert that a status is active for `entitlement_id` via `package_id`.
///
/// # Panics
/// Panics if the status is inactive or names different ids.
pub fn assert_active(status: &SubscriptionStatus, entitlement_id: &str, package_id: &str) {
    assert!(status.is_active(), "Expected active status, got {:?}", status);
    assert_eq!(status.active_entitlement_id(), Some(entitlement_id));
    assert_eq!(status.active_package_id(), Some(package_id));
}

/// Assert that a result failed with the given error code.
///
/// # Panics
/// Panics if the result succeeded or failed differently.
pub fn assert_error_code<T: std::fmt::Debug>(result: &Result<T>, expected: PurchasesErrorCode) {
    match result {
        Ok(value) => panic!("Expected {:?}, got Ok({:?})", expected, value),
        Err(err) => assert_eq!(
            err.code(),
            expected,
            "Expected {:?}, got error: {}",
            expected,
            err
        ),
    }
}

/// Assert that a result failed because the provider is not configured.
///
/// # Panics
/// Panics otherwise.
pub fn assert_not_configured<T: std::fmt::Debug>(result: &Result<T>) {
    assert!(
        matches!(result, Err(PurchasesError::NotConfigured)),
        "Expected NotConfigured, got {:?}",
        result
    );
}
