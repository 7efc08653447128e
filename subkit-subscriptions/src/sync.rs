//! Synchronization core.
//!
//! Bridges the provider into the [`StatusCache`]: pull operations call the
//! provider and commit the result on success. Push updates are consumed by a
//! single background task that commits each one to the cache on arrival and
//! then fans it out to every [`StatusStream`]. Writes from both sides land in
//! the same cache, and the one that completes last wins.

use crate::config::SubscriptionConfig;
use crate::repository::ProviderRepository;
use crate::state::StatusCache;
use crate::stream::{StatusStream, UPDATE_BUFFER};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use subkit_lib::{
    status_from_customer_info, PurchaseProvider, PurchasesError, Result, SubscriptionOffering,
    SubscriptionStatus,
};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

type UpdateSender = Arc<Mutex<Option<broadcast::Sender<SubscriptionStatus>>>>;

fn lock_updates(
    updates: &Mutex<Option<broadcast::Sender<SubscriptionStatus>>>,
) -> MutexGuard<'_, Option<broadcast::Sender<SubscriptionStatus>>> {
    updates.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owner of the cache and the provider repository.
#[derive(Debug)]
pub struct SyncCore {
    cache: Arc<StatusCache>,
    repository: ProviderRepository,
    /// Fan-out to observers. `None` when unconfigured or once pushes ended.
    updates: UpdateSender,
}

impl SyncCore {
    /// Configure the provider and start from an empty cache.
    pub fn new(config: &SubscriptionConfig, provider: Arc<dyn PurchaseProvider>) -> Self {
        let repository = ProviderRepository::new(config, provider);
        let updates = repository
            .is_configured()
            .then(|| broadcast::channel(UPDATE_BUFFER).0);
        Self {
            cache: Arc::new(StatusCache::new()),
            repository,
            updates: Arc::new(Mutex::new(updates)),
        }
    }

    /// Read-only access to the cache.
    pub fn cache(&self) -> &StatusCache {
        &self.cache
    }

    pub fn is_configured(&self) -> bool {
        self.repository.is_configured()
    }

    pub async fn check_status(&self) -> Result<SubscriptionStatus> {
        let status = self.repository.check_status().await?;
        self.cache.set_status(status.clone());
        Ok(status)
    }

    /// Load the current offering. `None` is cached too.
    pub async fn load_offerings(&self) -> Result<Option<SubscriptionOffering>> {
        let offering = self.repository.load_offerings().await?;
        self.cache.set_offerings(offering.clone());
        Ok(offering)
    }

    pub async fn purchase(&self, package_id: &str) -> Result<SubscriptionStatus> {
        let status = self.repository.purchase(package_id).await?;
        self.cache.set_status(status.clone());
        Ok(status)
    }

    pub async fn restore(&self) -> Result<SubscriptionStatus> {
        let status = self.repository.restore().await?;
        self.cache.set_status(status.clone());
        Ok(status)
    }

    /// Log in as `user_id`, run the attributes hook and refresh the status.
    ///
    /// Nothing is cached unless both the log in and the status check succeed.
    pub async fn sync_user(&self, user_id: &str) -> Result<SubscriptionStatus> {
        self.repository.log_in(user_id).await?;

        let status = self.repository.check_status().await.map_err(|e| match e {
            PurchasesError::NetworkError(cause) => PurchasesError::UserSyncFailed(cause),
            other => other,
        })?;

        self.cache.set_user_id(Some(user_id.to_string()));
        self.cache.set_status(status.clone());
        Ok(status)
    }

    /// Log out and reset the cache to `{ inactive, no user }`.
    ///
    /// The reset ignores whatever the provider reports after log out.
    pub async fn clear_user(&self) -> Result<()> {
        self.repository.log_out().await?;
        self.cache.set_user_id(None);
        self.cache.set_status(SubscriptionStatus::INACTIVE);
        Ok(())
    }

    /// Subscribe to status updates from the background push consumer.
    ///
    /// Opens no provider listener of its own and never writes the cache. The
    /// stream is already finished when the core is unconfigured or the
    /// provider has ended its push stream.
    pub fn observe_changes(&self) -> StatusStream {
        match lock_updates(&self.updates).as_ref() {
            Some(sender) => StatusStream::new(sender.subscribe()),
            None => StatusStream::ended(),
        }
    }

    /// Number of live observers.
    pub fn observer_count(&self) -> usize {
        lock_updates(&self.updates)
            .as_ref()
            .map_or(0, |sender| sender.receiver_count())
    }

    /// Consume the provider's push stream on the current runtime.
    ///
    /// Each push is committed to the cache as soon as it arrives and then
    /// handed to observers. The task ends when the provider ends the stream,
    /// which also ends every observer. Call once per core, from within a
    /// Tokio runtime.
    pub fn spawn_background_sync(&self) -> JoinHandle<()> {
        let mut source = self.repository.customer_info_stream();
        let cache = Arc::clone(&self.cache);
        let updates = Arc::clone(&self.updates);
        let entitlement_id = self.repository.entitlement_id().to_string();

        tokio::spawn(async move {
            let mut applied = 0usize;
            while let Some(info) = source.next().await {
                let status = status_from_customer_info(&info, &entitlement_id);
                cache.set_status(status.clone());
                applied += 1;

                // No receivers is not an error.
                let observers = lock_updates(&updates)
                    .as_ref()
                    .and_then(|sender| sender.send(status.clone()).ok())
                    .unwrap_or(0);
                tracing::debug!(
                    "Applied pushed status (active: {}) for {} observers",
                    status.is_active(),
                    observers
                );
            }
            lock_updates(&updates).take();
            tracing::debug!("Push stream ended after {} updates", applied);
        })
    }
}
