//! Application-facing subscription service.

use crate::config::SubscriptionConfig;
use crate::stream::StatusStream;
use crate::sync::SyncCore;
use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use std::sync::Arc;
use subkit_lib::{
    PurchaseProvider, PurchasesError, Result, SubscriptionOffering, SubscriptionStatus,
};
use tokio::task::JoinHandle;

/// Subscription operations as seen by application code.
///
/// [`SubscriptionService`] is the production implementation; view models can
/// depend on this trait and take a fake in tests.
#[async_trait]
pub trait SubscriptionUseCase: Send + Sync {
    /// Live status updates pushed by the provider.
    fn observe_status(&self) -> BoxStream<'static, SubscriptionStatus>;

    /// Last known status. Never performs I/O.
    fn status(&self) -> SubscriptionStatus;

    async fn check_status(&self) -> Result<SubscriptionStatus>;

    async fn load_offerings(&self) -> Result<Option<SubscriptionOffering>>;

    async fn purchase(&self, package_id: &str) -> Result<SubscriptionStatus>;

    async fn restore(&self) -> Result<SubscriptionStatus>;

    async fn sync_user(&self, user_id: &str) -> Result<SubscriptionStatus>;

    async fn clear_user(&self) -> Result<()>;
}

/// Subscription service bound to one provider.
///
/// Construction starts a background task that keeps the cached status in step
/// with provider pushes, whether or not any operation is ever called. The task
/// is aborted when the service is dropped.
///
/// # Example
///
/// ```rust,ignore
/// let service = SubscriptionService::new(SubscriptionConfig::new(api_key), provider)?;
/// match service.purchase("pkg_annual").await {
///     Ok(status) => show_thanks(status),
///     Err(e) if e.is_cancellation() => {}
///     Err(e) => show_error(e.message()),
/// }
/// ```
#[derive(Debug)]
pub struct SubscriptionService {
    core: SyncCore,
    background: JoinHandle<()>,
}

impl SubscriptionService {
    /// Build the service and start following provider pushes.
    ///
    /// Fails with `InvalidConfiguration` for a blank entitlement id, or
    /// `Unknown` outside a Tokio runtime. An empty API key is not an error;
    /// see [`SubscriptionConfig`].
    pub fn new(config: SubscriptionConfig, provider: Arc<dyn PurchaseProvider>) -> Result<Self> {
        config.validate()?;
        // Checked before the provider is configured.
        tokio::runtime::Handle::try_current()
            .map_err(|e| PurchasesError::Unknown(format!("no Tokio runtime: {}", e)))?;

        let core = SyncCore::new(&config, provider);
        let background = core.spawn_background_sync();
        tracing::debug!(
            "Subscription service started (entitlement: {}, configured: {})",
            config.entitlement_id,
            core.is_configured()
        );
        Ok(Self { core, background })
    }

    pub fn is_configured(&self) -> bool {
        self.core.is_configured()
    }

    /// Last known status. Never performs I/O.
    pub fn status(&self) -> SubscriptionStatus {
        self.core.cache().status()
    }

    /// Offering from the last successful `load_offerings`.
    pub fn cached_offering(&self) -> Option<SubscriptionOffering> {
        self.core.cache().offerings()
    }

    /// User id from the last successful `sync_user`.
    pub fn current_user_id(&self) -> Option<String> {
        self.core.cache().user_id()
    }

    /// Live status updates. Each one is already in the cache when it arrives.
    pub fn observe_status(&self) -> StatusStream {
        self.core.observe_changes()
    }

    /// Number of live `observe_status` streams.
    pub fn observer_count(&self) -> usize {
        self.core.observer_count()
    }

    pub async fn check_status(&self) -> Result<SubscriptionStatus> {
        self.core.check_status().await
    }

    pub async fn load_offerings(&self) -> Result<Option<SubscriptionOffering>> {
        self.core.load_offerings().await
    }

    /// Cached offering, loading it if needed.
    ///
    /// Fails with `OfferingsNotAvailable` when the provider has no current
    /// offering.
    pub async fn require_offering(&self) -> Result<SubscriptionOffering> {
        if let Some(offering) = self.cached_offering() {
            return Ok(offering);
        }
        self.load_offerings()
            .await?
            .ok_or(PurchasesError::OfferingsNotAvailable)
    }

    pub async fn purchase(&self, package_id: &str) -> Result<SubscriptionStatus> {
        self.core.purchase(package_id).await
    }

    pub async fn restore(&self) -> Result<SubscriptionStatus> {
        self.core.restore().await
    }

    pub async fn sync_user(&self, user_id: &str) -> Result<SubscriptionStatus> {
        self.core.sync_user(user_id).await
    }

    pub async fn clear_user(&self) -> Result<()> {
        self.core.clear_user().await
    }
}

impl Drop for SubscriptionService {
    fn drop(&mut self) {
        self.background.abort();
    }
}

#[async_trait]
impl SubscriptionUseCase for SubscriptionService {
    fn observe_status(&self) -> BoxStream<'static, SubscriptionStatus> {
        SubscriptionService::observe_status(self).boxed()
    }

    fn status(&self) -> SubscriptionStatus {
        SubscriptionService::status(self)
    }

    async fn check_status(&self) -> Result<SubscriptionStatus> {
        SubscriptionService::check_status(self).await
    }

    async fn load_offerings(&self) -> Result<Option<SubscriptionOffering>> {
        SubscriptionService::load_offerings(self).await
    }

    async fn purchase(&self, package_id: &str) -> Result<SubscriptionStatus> {
        SubscriptionService::purchase(self, package_id).await
    }

    async fn restore(&self) -> Result<SubscriptionStatus> {
        SubscriptionService::restore(self).await
    }

    async fn sync_user(&self, user_id: &str) -> Result<SubscriptionStatus> {
        SubscriptionService::sync_user(self, user_id).await
    }

    async fn clear_user(&self) -> Result<()> {
        SubscriptionService::clear_user(self).await
    }
}
