//! Error types for subscription operations.
//!
//! Two layers of errors exist:
//! - [`ProviderError`] is what a [`PurchaseProvider`](crate::PurchaseProvider)
//!   implementation reports for a failed request.
//! - [`PurchasesError`] is the flat taxonomy surfaced to application code.
//!   Every provider failure is wrapped into exactly one of its variants; no
//!   retries happen below the caller.

use thiserror::Error;

/// Error codes for FFI and mobile integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum PurchasesErrorCode {
    /// Provider was never configured
    NotConfigured = 1000,
    /// Configuration values are invalid
    InvalidConfiguration = 1001,
    /// Transport/provider failure
    Network = 2000,
    /// User dismissed the purchase sheet
    PurchaseCancelled = 3000,
    /// Purchase failed
    PurchaseFailed = 3001,
    /// Restore failed
    RestoreFailed = 3002,
    /// No current offering
    OfferingsNotAvailable = 4000,
    /// Package id not in the current offering
    PackageNotFound = 4001,
    /// Log in / log out failed
    UserSyncFailed = 5000,
    /// Internal/unexpected error
    Unknown = 9999,
}

/// Failure reported by a purchase provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Network unreachable, timeout, TLS failure and the like.
    #[error("network error: {0}")]
    Network(String),

    /// The platform store (App Store / Play Store) rejected the request.
    #[error("store error: {0}")]
    Store(String),

    /// The provider backend answered with an error.
    #[error("backend error {code}: {message}")]
    Backend {
        /// Provider specific error code
        code: i32,
        /// Message returned by the backend
        message: String,
    },

    /// The user cancelled a store interaction.
    ///
    /// Some SDKs report cancellation as an error instead of a flag on the
    /// purchase result; both are treated the same way.
    #[error("cancelled by user")]
    Cancelled,

    /// The SDK refused the supplied configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

impl ProviderError {
    /// Create a backend error.
    pub fn backend(code: i32, message: impl Into<String>) -> Self {
        Self::Backend {
            code,
            message: message.into(),
        }
    }
}

/// Errors surfaced by subscription operations.
#[derive(Debug, Error)]
pub enum PurchasesError {
    /// The provider was never successfully configured (e.g. empty API key).
    #[error("subscriptions are not configured")]
    NotConfigured,

    /// Configuration values are invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Transport or provider failure while reading state.
    #[error("network error: {0}")]
    NetworkError(#[source] ProviderError),

    /// The user cancelled the purchase sheet.
    ///
    /// This is an expected outcome; UI layers should not present it as an error.
    #[error("purchase was cancelled")]
    PurchaseCancelled,

    /// The purchase flow failed.
    #[error("purchase failed: {0}")]
    PurchaseFailed(#[source] ProviderError),

    /// Restoring purchases failed.
    #[error("restore failed: {0}")]
    RestoreFailed(#[source] ProviderError),

    /// The provider has no current offering to show.
    #[error("no offerings are available")]
    OfferingsNotAvailable,

    /// The requested package is not part of the current offering.
    #[error("package not found: {0}")]
    PackageNotFound(String),

    /// Logging a user in or out failed.
    #[error("user sync failed: {0}")]
    UserSyncFailed(#[source] ProviderError),

    /// Internal/unexpected error.
    #[error("unexpected error: {0}")]
    Unknown(String),
}

impl PurchasesError {
    /// Get the error code for FFI/mobile integration.
    pub fn code(&self) -> PurchasesErrorCode {
        match self {
            Self::NotConfigured => PurchasesErrorCode::NotConfigured,
            Self::InvalidConfiguration(_) => PurchasesErrorCode::InvalidConfiguration,
            Self::NetworkError(_) => PurchasesErrorCode::Network,
            Self::PurchaseCancelled => PurchasesErrorCode::PurchaseCancelled,
            Self::PurchaseFailed(_) => PurchasesErrorCode::PurchaseFailed,
            Self::RestoreFailed(_) => PurchasesErrorCode::RestoreFailed,
            Self::OfferingsNotAvailable => PurchasesErrorCode::OfferingsNotAvailable,
            Self::PackageNotFound(_) => PurchasesErrorCode::PackageNotFound,
            Self::UserSyncFailed(_) => PurchasesErrorCode::UserSyncFailed,
            Self::Unknown(_) => PurchasesErrorCode::Unknown,
        }
    }

    /// Get the error message as an owned String (useful for FFI).
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Returns true if the user cancelled a purchase.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::PurchaseCancelled)
    }

    /// Returns true if the error should be shown to the user.
    pub fn should_display(&self) -> bool {
        !self.is_cancellation()
    }

    /// The provider failure behind this error, if any.
    pub fn provider_cause(&self) -> Option<&ProviderError> {
        match self {
            Self::NetworkError(cause)
            | Self::PurchaseFailed(cause)
            | Self::RestoreFailed(cause)
            | Self::UserSyncFailed(cause) => Some(cause),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_codes() {
        let err = PurchasesError::PackageNotFound("pkg_annual".to_string());
        assert_eq!(err.code(), PurchasesErrorCode::PackageNotFound);
        assert_eq!(err.code() as i32, 4001);

        let err = PurchasesError::NetworkError(ProviderError::Network("offline".into()));
        assert_eq!(err.code(), PurchasesErrorCode::Network);
    }

    #[test]
    fn test_cancellation_is_not_displayed() {
        assert!(PurchasesError::PurchaseCancelled.is_cancellation());
        assert!(!PurchasesError::PurchaseCancelled.should_display());

        let failed = PurchasesError::PurchaseFailed(ProviderError::Cancelled);
        assert!(!failed.is_cancellation());
        assert!(failed.should_display());
    }

    #[test]
    fn test_error_display() {
        let err = PurchasesError::RestoreFailed(ProviderError::backend(7, "receipt in use"));
        assert!(err.to_string().contains("restore failed"));
        assert!(err.to_string().contains("receipt in use"));

        let err = PurchasesError::PackageNotFound("pkg_monthly".into());
        assert_eq!(err.message(), "package not found: pkg_monthly");
    }

    #[test]
    fn test_source_chain() {
        let err = PurchasesError::UserSyncFailed(ProviderError::Network("reset".into()));
        let source = err.source().expect("wrapped provider error");
        assert_eq!(source.to_string(), "network error: reset");
        assert_eq!(
            err.provider_cause(),
            Some(&ProviderError::Network("reset".into()))
        );
        assert!(PurchasesError::NotConfigured.provider_cause().is_none());
    }
}
