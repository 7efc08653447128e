//! # Subkit Subscriptions
//!
//! Keeps a locally cached subscription status consistent with a remote
//! purchase provider.
//!
//! ## Model
//!
//! - One [`StatusCache`] per service, guarded by a single lock
//! - Pull operations (check, purchase, restore, user sync) write the cache
//!   only after the provider call succeeds
//! - A background task drains the provider's push stream into the same cache
//! - Writes from both sides are last-writer-wins; reads never block on I/O
//!
//! ## Usage
//!
//! ```rust,ignore
//! use subkit_subscriptions::{SubscriptionConfig, SubscriptionService};
//!
//! let service = SubscriptionService::new(SubscriptionConfig::new(api_key), provider)?;
//! service.check_status().await?;
//! if service.status().is_active() {
//!     unlock_premium();
//! }
//! ```

pub mod config;
pub mod repository;
pub mod service;
pub mod state;
pub mod stream;
pub mod sync;

pub use config::{CustomAttributesSetter, SubscriptionConfig};
pub use repository::ProviderRepository;
pub use service::{SubscriptionService, SubscriptionUseCase};
pub use state::{CacheSnapshot, StatusCache};
pub use stream::StatusStream;
pub use sync::SyncCore;

pub use subkit_lib::{
    PackageDuration, PurchasesError, PurchasesErrorCode, Result, SubscriptionOffering,
    SubscriptionPackage, SubscriptionStatus,
};
