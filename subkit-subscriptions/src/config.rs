use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use subkit_lib::{PurchasesError, Result, DEFAULT_ENTITLEMENT_ID};

/// Hook for pushing extra customer attributes to the provider after log in.
///
/// Invoked at most once per successful `sync_user` call and awaited before
/// the call continues.
#[async_trait]
pub trait CustomAttributesSetter: Send + Sync {
    async fn set_attributes(&self, user_id: &str);
}

struct FnAttributesSetter<F>(F);

#[async_trait]
impl<F, Fut> CustomAttributesSetter for FnAttributesSetter<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = ()> + Send,
{
    async fn set_attributes(&self, user_id: &str) {
        (self.0)(user_id.to_string()).await
    }
}

fn default_entitlement_id() -> String {
    DEFAULT_ENTITLEMENT_ID.to_string()
}

/// Settings for a subscription service.
///
/// An empty `api_key` is accepted: the service then runs unconfigured and
/// every provider-dependent call fails with `NotConfigured`.
#[derive(Clone, Deserialize)]
pub struct SubscriptionConfig {
    /// Provider API key.
    pub api_key: String,

    /// Entitlement that counts as "subscribed".
    #[serde(default = "default_entitlement_id")]
    pub entitlement_id: String,

    /// Optional attributes hook run during user sync.
    #[serde(skip)]
    pub custom_attributes: Option<Arc<dyn CustomAttributesSetter>>,
}

impl SubscriptionConfig {
    /// Create a configuration for the default `"premium"` entitlement.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            entitlement_id: default_entitlement_id(),
            custom_attributes: None,
        }
    }

    /// Use a different entitlement.
    pub fn with_entitlement_id(mut self, entitlement_id: impl Into<String>) -> Self {
        self.entitlement_id = entitlement_id.into();
        self
    }

    /// Install an attributes hook.
    pub fn with_custom_attributes(mut self, setter: Arc<dyn CustomAttributesSetter>) -> Self {
        self.custom_attributes = Some(setter);
        self
    }

    /// Install an attributes hook from an async closure.
    pub fn with_custom_attributes_fn<F, Fut>(self, setter: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.with_custom_attributes(Arc::new(FnAttributesSetter(setter)))
    }

    /// True when a provider key was supplied. Only an empty key counts as
    /// missing; anything else is handed to the provider as is.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.entitlement_id.trim().is_empty() {
            return Err(PurchasesError::InvalidConfiguration(
                "entitlement id cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for SubscriptionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = if self.has_api_key() { "<redacted>" } else { "<empty>" };
        f.debug_struct("SubscriptionConfig")
            .field("api_key", &key)
            .field("entitlement_id", &self.entitlement_id)
            .field("custom_attributes", &self.custom_attributes.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_defaults() {
        let config = SubscriptionConfig::new("appl_key");
        assert_eq!(config.entitlement_id, "premium");
        assert!(config.custom_attributes.is_none());
        assert!(config.has_api_key());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_with_default_entitlement() {
        let config: SubscriptionConfig =
            serde_json::from_str(r#"{ "api_key": "appl_key" }"#).unwrap();
        assert_eq!(config.api_key, "appl_key");
        assert_eq!(config.entitlement_id, "premium");

        let config: SubscriptionConfig =
            serde_json::from_str(r#"{ "api_key": "", "entitlement_id": "pro" }"#).unwrap();
        assert!(!config.has_api_key());
        assert_eq!(config.entitlement_id, "pro");
    }

    #[test]
    fn test_blank_entitlement_is_invalid() {
        let config = SubscriptionConfig::new("appl_key").with_entitlement_id("  ");
        assert!(matches!(
            config.validate(),
            Err(PurchasesError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_empty_key_is_valid() {
        let config = SubscriptionConfig::new("");
        assert!(!config.has_api_key());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_whitespace_key_is_a_key() {
        let config = SubscriptionConfig::new("  ");
        assert!(config.has_api_key());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", SubscriptionConfig::new("appl_secret"));
        assert!(!rendered.contains("appl_secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[tokio::test]
    async fn test_closure_setter() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let config = SubscriptionConfig::new("appl_key").with_custom_attributes_fn(move |user| {
            let counter = Arc::clone(&counter);
            async move {
                assert_eq!(user, "user_1");
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        let setter = config.custom_attributes.expect("setter installed");
        setter.set_attributes("user_1").await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
