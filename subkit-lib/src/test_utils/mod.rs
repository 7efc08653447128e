//! Test utilities for subkit.
//!
//! This module provides:
//! - A scriptable in-memory purchase provider
//! - Fixtures for customer info, products and offerings
//! - Assertion helpers for statuses and errors
//!
//! ## Usage
//!
//! ```rust,ignore
//! use subkit_lib::test_utils::{customer_with_entitlement, MockProvider};
//!
//! let provider = MockProvider::new();
//! provider.set_customer_info(customer_with_entitlement("premium", "pkg_annual", None));
//!
//! // Push an update to every live subscriber
//! provider.emit(customer_without_entitlements()).await;
//! ```

mod assertions;
mod fixtures;
mod mock_provider;

pub use fixtures::{
    annual_package, customer_with, customer_with_entitlement, customer_without_entitlements,
    entitlement, lifetime_package, monthly_package, offerings_with, package, standard_offerings,
    store_product, TestFixtures,
};

pub use mock_provider::{MockProvider, ProviderCall, PurchaseBehavior, ANONYMOUS_USER_ID};

pub use assertions::{assert_active, assert_error_code, assert_inactive, assert_not_configured};
