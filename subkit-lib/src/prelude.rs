//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use subkit_lib::prelude::*;
//! ```
//!
//! ## What's Included
//!
//! - Model: `SubscriptionStatus`, `SubscriptionOffering`, `SubscriptionPackage`, `PackageDuration`
//! - Errors: `PurchasesError`, `PurchasesErrorCode`, `ProviderError`, `Result`
//! - Provider boundary: `PurchaseProvider` and its data types
//! - Pricing: `PriceFormat`

// Model
pub use crate::model::{
    PackageDuration, SubscriptionOffering, SubscriptionPackage, SubscriptionStatus,
};

// Error handling
pub use crate::errors::{ProviderError, PurchasesError, PurchasesErrorCode};
pub use crate::Result;

// Provider boundary
pub use crate::provider::{
    CustomerInfo, CustomerInfoSender, CustomerInfoStream, EntitlementInfo, LogInResult,
    PackageType, ProviderOffering, ProviderOfferings, ProviderPackage, ProviderResult,
    PurchaseProvider, PurchaseResult, StoreProduct,
};

// Pricing
pub use crate::pricing::PriceFormat;
