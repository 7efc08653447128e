//! Provider access.
//!
//! [`ProviderRepository`] is the only place that talks to the
//! [`PurchaseProvider`]. It owns the configured/unconfigured decision, maps
//! provider failures onto [`PurchasesError`] and translates customer info into
//! [`SubscriptionStatus`]. It never touches the cache.

use crate::config::{CustomAttributesSetter, SubscriptionConfig};
use std::sync::Arc;
use subkit_lib::provider::{ProviderOfferings, ProviderPackage};
use subkit_lib::{
    status_from_customer_info, CustomerInfo, CustomerInfoStream, ProviderError, PurchaseProvider,
    PurchasesError, Result, SubscriptionOffering, SubscriptionStatus,
};

/// Provider wrapper bound to one entitlement.
pub struct ProviderRepository {
    provider: Arc<dyn PurchaseProvider>,
    entitlement_id: String,
    custom_attributes: Option<Arc<dyn CustomAttributesSetter>>,
    configured: bool,
}

impl ProviderRepository {
    /// Configure `provider` from `config`.
    ///
    /// An empty API key or a provider that rejects the key leaves the
    /// repository unconfigured; this is logged, not returned.
    pub fn new(config: &SubscriptionConfig, provider: Arc<dyn PurchaseProvider>) -> Self {
        let configured = if !config.has_api_key() {
            tracing::warn!("No API key supplied; subscription features are disabled");
            false
        } else {
            match provider.configure(&config.api_key) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Provider rejected configuration: {}", e);
                    false
                }
            }
        };

        Self {
            provider,
            entitlement_id: config.entitlement_id.clone(),
            custom_attributes: config.custom_attributes.clone(),
            configured,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    pub fn entitlement_id(&self) -> &str {
        &self.entitlement_id
    }

    fn ensure_configured(&self) -> Result<()> {
        if self.configured {
            Ok(())
        } else {
            Err(PurchasesError::NotConfigured)
        }
    }

    /// Translate customer info for this repository's entitlement.
    pub fn translate(&self, info: &CustomerInfo) -> SubscriptionStatus {
        status_from_customer_info(info, &self.entitlement_id)
    }

    /// Fetch and translate the current customer info.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn check_status(&self) -> Result<SubscriptionStatus> {
        self.ensure_configured()?;
        let info = self
            .provider
            .customer_info()
            .await
            .map_err(PurchasesError::NetworkError)?;
        Ok(self.translate(&info))
    }

    /// Fetch the current offering. `Ok(None)` when the provider has none.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn load_offerings(&self) -> Result<Option<SubscriptionOffering>> {
        self.ensure_configured()?;
        let offerings = self
            .provider
            .offerings()
            .await
            .map_err(PurchasesError::NetworkError)?;
        Ok(offerings.current.as_ref().map(SubscriptionOffering::from_provider))
    }

    /// Buy the package with `package_id` from the current offering.
    ///
    /// The package is looked up in a fresh offerings fetch, never the cache.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn purchase(&self, package_id: &str) -> Result<SubscriptionStatus> {
        self.ensure_configured()?;
        let offerings = self
            .provider
            .offerings()
            .await
            .map_err(PurchasesError::PurchaseFailed)?;
        let package = find_package(&offerings, package_id)
            .ok_or_else(|| PurchasesError::PackageNotFound(package_id.to_string()))?;

        let result = match self.provider.purchase(package).await {
            Ok(result) => result,
            Err(ProviderError::Cancelled) => return Err(PurchasesError::PurchaseCancelled),
            Err(e) => return Err(PurchasesError::PurchaseFailed(e)),
        };
        if result.user_cancelled {
            tracing::info!("Purchase of {} cancelled by user", package_id);
            return Err(PurchasesError::PurchaseCancelled);
        }

        let status = self.translate(&result.customer_info);
        tracing::info!(
            "Purchased {} (transaction {:?}, active: {})",
            package_id,
            result.transaction_id,
            status.is_active()
        );
        Ok(status)
    }

    /// Restore purchases made with the current store account.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn restore(&self) -> Result<SubscriptionStatus> {
        self.ensure_configured()?;
        let info = self
            .provider
            .restore_purchases()
            .await
            .map_err(PurchasesError::RestoreFailed)?;
        let status = self.translate(&info);
        tracing::info!("Restored purchases (active: {})", status.is_active());
        Ok(status)
    }

    /// Identify the customer and run the attributes hook once.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn log_in(&self, user_id: &str) -> Result<()> {
        self.ensure_configured()?;
        if user_id.trim().is_empty() {
            return Err(PurchasesError::UserSyncFailed(ProviderError::Configuration(
                "app user id must not be empty".to_string(),
            )));
        }

        let result = self
            .provider
            .log_in(user_id)
            .await
            .map_err(PurchasesError::UserSyncFailed)?;
        tracing::info!("Logged in {} (new customer: {})", user_id, result.created);

        if let Some(setter) = &self.custom_attributes {
            setter.set_attributes(user_id).await;
        }
        Ok(())
    }

    /// Forget the identified customer.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn log_out(&self) -> Result<()> {
        self.ensure_configured()?;
        self.provider
            .log_out()
            .await
            .map_err(PurchasesError::UserSyncFailed)?;
        tracing::info!("Logged out");
        Ok(())
    }

    /// Open a new customer info subscription.
    ///
    /// Unconfigured repositories return a stream that ends immediately.
    pub fn customer_info_stream(&self) -> CustomerInfoStream {
        if self.configured {
            self.provider.customer_info_stream()
        } else {
            CustomerInfoStream::empty()
        }
    }
}

fn find_package<'a>(
    offerings: &'a ProviderOfferings,
    package_id: &str,
) -> Option<&'a ProviderPackage> {
    offerings.current.as_ref()?.package(package_id)
}

impl std::fmt::Debug for ProviderRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRepository")
            .field("entitlement_id", &self.entitlement_id)
            .field("configured", &self.configured)
            .finish_non_exhaustive()
    }
}
