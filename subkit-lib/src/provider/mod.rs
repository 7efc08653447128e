//! Purchase provider boundary.
//!
//! This module defines the shape every purchase backend adapter implements.
//! The types mirror what subscription SDKs hand back (customer info with an
//! entitlement map, offerings made of packages wrapping store products) but
//! carry no SDK types, so any provider can be plugged in.

mod stream;

pub use stream::{CustomerInfoSender, CustomerInfoStream};

use crate::errors::ProviderError;
use crate::pricing::PriceFormat;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Result alias for provider calls.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// One entitlement as reported by the provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementInfo {
    /// Entitlement identifier, e.g. `"premium"`.
    pub identifier: String,
    /// Whether the entitlement currently grants access.
    pub is_active: bool,
    /// Store product that unlocked the entitlement.
    pub product_identifier: String,
    /// When access ends (`None` for lifetime purchases).
    pub expiration_date: Option<DateTime<Utc>>,
    /// Whether the subscription will renew.
    #[serde(default)]
    pub will_renew: bool,
}

/// Snapshot of everything the provider knows about the current customer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    /// App user id the provider associates with this customer.
    pub app_user_id: String,
    /// All entitlements, active or not, keyed by identifier.
    #[serde(default)]
    pub entitlements: HashMap<String, EntitlementInfo>,
}

impl CustomerInfo {
    /// Look up an entitlement by identifier.
    pub fn entitlement(&self, identifier: &str) -> Option<&EntitlementInfo> {
        self.entitlements.get(identifier)
    }
}

/// Package type as classified by the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageType {
    Weekly,
    Monthly,
    TwoMonth,
    ThreeMonth,
    SixMonth,
    Annual,
    Lifetime,
    Custom,
    Unknown,
}

/// A product as listed by the platform store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreProduct {
    pub product_identifier: String,
    pub localized_title: String,
    pub localized_description: String,
    /// Exact price in the storefront currency.
    pub price: Decimal,
    /// Price as the store renders it, e.g. `"$99.00"`.
    pub localized_price_string: String,
    /// Storefront formatting conventions, when the store reports them.
    pub price_format: Option<PriceFormat>,
}

/// One purchasable package inside an offering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderPackage {
    pub identifier: String,
    pub package_type: PackageType,
    pub store_product: StoreProduct,
}

/// A named group of packages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderOffering {
    pub identifier: String,
    pub available_packages: Vec<ProviderPackage>,
}

impl ProviderOffering {
    /// Find a package by identifier.
    pub fn package(&self, identifier: &str) -> Option<&ProviderPackage> {
        self.available_packages
            .iter()
            .find(|p| p.identifier == identifier)
    }
}

/// All offerings configured for the app.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderOfferings {
    /// The offering the provider wants shown right now.
    pub current: Option<ProviderOffering>,
    /// Every offering, keyed by identifier.
    #[serde(default)]
    pub all: HashMap<String, ProviderOffering>,
}

/// Outcome of a purchase flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PurchaseResult {
    /// Customer info after the purchase.
    pub customer_info: CustomerInfo,
    /// Store transaction id, when a transaction happened.
    pub transaction_id: Option<String>,
    /// True if the user dismissed the purchase sheet.
    pub user_cancelled: bool,
}

/// Outcome of logging a user in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogInResult {
    pub customer_info: CustomerInfo,
    /// True if the provider created a new customer for this id.
    pub created: bool,
}

/// A purchase backend.
///
/// Request/response methods plus one push subscription. Implementations wrap
/// a vendor SDK (or a fake, see `test_utils`) and must be shareable across
/// tasks.
#[async_trait]
pub trait PurchaseProvider: Send + Sync {
    /// Initialise the SDK with an API key.
    ///
    /// Called once, before any other method, and only with a non-empty key.
    fn configure(&self, api_key: &str) -> ProviderResult<()>;

    /// Fetch the current customer's entitlements.
    async fn customer_info(&self) -> ProviderResult<CustomerInfo>;

    /// Fetch the configured offerings.
    async fn offerings(&self) -> ProviderResult<ProviderOfferings>;

    /// Run the native purchase flow for `package`.
    async fn purchase(&self, package: &ProviderPackage) -> ProviderResult<PurchaseResult>;

    /// Re-sync purchases made with the current store account.
    async fn restore_purchases(&self) -> ProviderResult<CustomerInfo>;

    /// Identify the customer as `app_user_id`.
    async fn log_in(&self, app_user_id: &str) -> ProviderResult<LogInResult>;

    /// Forget the identified customer and fall back to an anonymous one.
    async fn log_out(&self) -> ProviderResult<CustomerInfo>;

    /// Subscribe to customer info updates pushed by the provider.
    ///
    /// Each call creates an independent subscription. Dropping the returned
    /// stream must release it.
    fn customer_info_stream(&self) -> CustomerInfoStream;
}
