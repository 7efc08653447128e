//! subkit library.
//!
//! Shared vocabulary for subscription handling: the values applications see,
//! the price arithmetic behind them, the error taxonomy, and the
//! [`PurchaseProvider`] trait that vendor SDK adapters implement.
//!
//! This crate intentionally stays stateless. Caching and synchronization live
//! in `subkit-subscriptions`.
//!
//! # Features
//!
//! - **Provider Boundary**: async request/response methods plus a push stream
//! - **Data Model**: statuses, offerings and packages that uphold their invariants
//! - **Pricing**: exact decimal math and storefront formatting
//!
//! # Example
//!
//! ```
//! use subkit_lib::{PackageDuration, SubscriptionPackage};
//! use subkit_lib::provider::{PackageType, ProviderPackage, StoreProduct};
//! use subkit_lib::pricing::PriceFormat;
//! use rust_decimal::Decimal;
//!
//! let annual = ProviderPackage {
//!     identifier: "pkg_annual".into(),
//!     package_type: PackageType::Annual,
//!     store_product: StoreProduct {
//!         product_identifier: "com.example.annual".into(),
//!         localized_title: "Annual".into(),
//!         localized_description: "Premium for a year".into(),
//!         price: Decimal::new(9900, 2),
//!         localized_price_string: "$99.00".into(),
//!         price_format: Some(PriceFormat::en_us()),
//!     },
//! };
//!
//! let package = SubscriptionPackage::from_provider(&annual);
//! assert_eq!(package.duration(), PackageDuration::Annual);
//! assert_eq!(package.price_per_month(), Some("$8.25"));
//! ```

pub mod errors;
pub mod model;
pub mod prelude;
pub mod pricing;
pub mod provider;

/// Test utilities for subscription testing.
///
/// This module is only available with the `test-utils` feature or in test builds.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use errors::{ProviderError, PurchasesError, PurchasesErrorCode};
pub use model::{PackageDuration, SubscriptionOffering, SubscriptionPackage, SubscriptionStatus};
pub use provider::{CustomerInfo, CustomerInfoStream, PurchaseProvider};

/// Common result alias for subscription operations.
pub type Result<T> = std::result::Result<T, PurchasesError>;

/// Default entitlement identifier.
pub const DEFAULT_ENTITLEMENT_ID: &str = "premium";

/// Translate provider customer info into a [`SubscriptionStatus`].
///
/// The status is active only when `entitlement_id` is present and active; the
/// package id is the store product behind it.
///
/// # Example
///
/// ```
/// use subkit_lib::{status_from_customer_info, CustomerInfo, SubscriptionStatus};
///
/// let info = CustomerInfo::default();
/// assert_eq!(status_from_customer_info(&info, "premium"), SubscriptionStatus::INACTIVE);
/// ```
#[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip(info), fields(user = %info.app_user_id)))]
pub fn status_from_customer_info(info: &CustomerInfo, entitlement_id: &str) -> SubscriptionStatus {
    match info.entitlement(entitlement_id) {
        Some(entitlement) if entitlement.is_active => SubscriptionStatus::active(
            entitlement_id,
            entitlement.product_identifier.clone(),
            entitlement.expiration_date,
        ),
        _ => SubscriptionStatus::INACTIVE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        customer_with, customer_with_entitlement, customer_without_entitlements, entitlement,
    };
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_active_entitlement_translates() {
        let expires = Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap();
        let info = customer_with_entitlement("premium", "pkg_annual", Some(expires));

        let status = status_from_customer_info(&info, "premium");
        assert!(status.is_active());
        assert_eq!(status.active_entitlement_id(), Some("premium"));
        assert_eq!(status.active_package_id(), Some("pkg_annual"));
        assert_eq!(status.expiration_date(), Some(expires));
    }

    #[test]
    fn test_missing_or_inactive_entitlement_is_inactive() {
        let none = customer_without_entitlements();
        assert_eq!(status_from_customer_info(&none, "premium"), SubscriptionStatus::INACTIVE);

        let lapsed = customer_with(vec![entitlement("premium", "pkg_monthly", false, None)]);
        assert_eq!(status_from_customer_info(&lapsed, "premium"), SubscriptionStatus::INACTIVE);

        let other = customer_with_entitlement("pro", "pkg_pro", None);
        assert_eq!(status_from_customer_info(&other, "premium"), SubscriptionStatus::INACTIVE);
    }
}
