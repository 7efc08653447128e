//! Values exposed to applications.

mod offering;
mod status;

pub use offering::{PackageDuration, SubscriptionOffering, SubscriptionPackage};
pub use status::SubscriptionStatus;
