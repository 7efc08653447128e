//! In-memory purchase provider for tests.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::errors::ProviderError;
use crate::provider::{
    CustomerInfo, CustomerInfoSender, CustomerInfoStream, LogInResult, ProviderOfferings,
    ProviderPackage, ProviderResult, PurchaseProvider, PurchaseResult,
};
use async_trait::async_trait;

/// Anonymous app user id the mock falls back to after log out.
pub const ANONYMOUS_USER_ID: &str = "$anonymous";

/// A call received by [`MockProvider`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProviderCall {
    Configure(String),
    CustomerInfo,
    Offerings,
    Purchase(String),
    RestorePurchases,
    LogIn(String),
    LogOut,
    Subscribe,
}

/// What the next purchase does.
#[derive(Clone, Debug)]
pub enum PurchaseBehavior {
    /// Complete and replace the customer info with this one.
    Grant(CustomerInfo),
    /// The user dismisses the sheet (reported through the result flag).
    Cancel,
    /// The user dismisses the sheet (reported as a provider error).
    CancelWithError,
    /// The purchase fails.
    Fail(ProviderError),
}

#[derive(Default)]
struct MockState {
    customer_info: CustomerInfo,
    offerings: ProviderOfferings,
    purchase: Option<PurchaseBehavior>,
    restored_info: Option<CustomerInfo>,
    logged_out_info: Option<CustomerInfo>,
    configure_error: Option<ProviderError>,
    customer_info_error: Option<ProviderError>,
    offerings_error: Option<ProviderError>,
    restore_error: Option<ProviderError>,
    log_in_error: Option<ProviderError>,
    log_out_error: Option<ProviderError>,
}

/// Scriptable [`PurchaseProvider`].
///
/// Every response can be replaced or turned into an error, every call is
/// recorded, and customer info updates can be pushed to live subscribers with
/// [`MockProvider::emit`].
#[derive(Default)]
pub struct MockProvider {
    state: Mutex<MockState>,
    listeners: Mutex<Vec<CustomerInfoSender>>,
    calls: Mutex<Vec<ProviderCall>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockProvider {
    /// Create a provider with an anonymous customer and no offerings.
    pub fn new() -> Self {
        let provider = Self::default();
        lock(&provider.state).customer_info.app_user_id = ANONYMOUS_USER_ID.to_string();
        provider
    }

    // --- Scripting ---

    pub fn set_customer_info(&self, info: CustomerInfo) {
        lock(&self.state).customer_info = info;
    }

    pub fn set_offerings(&self, offerings: ProviderOfferings) {
        lock(&self.state).offerings = offerings;
    }

    pub fn set_purchase_behavior(&self, behavior: PurchaseBehavior) {
        lock(&self.state).purchase = Some(behavior);
    }

    /// Customer info returned by the next restore (defaults to the current one).
    pub fn set_restored_info(&self, info: CustomerInfo) {
        lock(&self.state).restored_info = Some(info);
    }

    /// Customer info returned by log out (defaults to an anonymous customer
    /// that keeps the current entitlements).
    pub fn set_logged_out_info(&self, info: CustomerInfo) {
        lock(&self.state).logged_out_info = Some(info);
    }

    pub fn fail_configure(&self, error: ProviderError) {
        lock(&self.state).configure_error = Some(error);
    }

    pub fn fail_customer_info(&self, error: ProviderError) {
        lock(&self.state).customer_info_error = Some(error);
    }

    pub fn fail_offerings(&self, error: ProviderError) {
        lock(&self.state).offerings_error = Some(error);
    }

    pub fn fail_restore(&self, error: ProviderError) {
        lock(&self.state).restore_error = Some(error);
    }

    pub fn fail_log_in(&self, error: ProviderError) {
        lock(&self.state).log_in_error = Some(error);
    }

    pub fn fail_log_out(&self, error: ProviderError) {
        lock(&self.state).log_out_error = Some(error);
    }

    // --- Push stream ---

    /// Push an update to every live subscriber.
    ///
    /// Returns how many subscribers received it. Subscribers that dropped
    /// their stream are forgotten.
    pub async fn emit(&self, info: CustomerInfo) -> usize {
        let listeners: Vec<CustomerInfoSender> = {
            let mut listeners = lock(&self.listeners);
            listeners.retain(|l| !l.is_closed());
            listeners.clone()
        };

        let mut delivered = 0;
        for listener in listeners {
            if listener.send(info.clone()).await {
                delivered += 1;
            }
        }
        delivered
    }

    /// Number of subscriptions whose stream is still alive.
    pub fn listener_count(&self) -> usize {
        let mut listeners = lock(&self.listeners);
        listeners.retain(|l| !l.is_closed());
        listeners.len()
    }

    /// End every open subscription.
    pub fn close_streams(&self) {
        lock(&self.listeners).clear();
    }

    // --- Inspection ---

    pub fn calls(&self) -> Vec<ProviderCall> {
        lock(&self.calls).clone()
    }

    /// Number of recorded calls matching `predicate`.
    pub fn call_count(&self, predicate: impl Fn(&ProviderCall) -> bool) -> usize {
        lock(&self.calls).iter().filter(|c| predicate(c)).count()
    }

    /// Number of calls that would have hit the network.
    pub fn network_call_count(&self) -> usize {
        self.call_count(|c| !matches!(c, ProviderCall::Configure(_) | ProviderCall::Subscribe))
    }

    /// Current customer info as the provider sees it.
    pub fn customer_info_snapshot(&self) -> CustomerInfo {
        lock(&self.state).customer_info.clone()
    }

    fn record(&self, call: ProviderCall) {
        lock(&self.calls).push(call);
    }
}

#[async_trait]
impl PurchaseProvider for MockProvider {
    fn configure(&self, api_key: &str) -> ProviderResult<()> {
        self.record(ProviderCall::Configure(api_key.to_string()));
        match lock(&self.state).configure_error.clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn customer_info(&self) -> ProviderResult<CustomerInfo> {
        self.record(ProviderCall::CustomerInfo);
        let state = lock(&self.state);
        match &state.customer_info_error {
            Some(error) => Err(error.clone()),
            None => Ok(state.customer_info.clone()),
        }
    }

    async fn offerings(&self) -> ProviderResult<ProviderOfferings> {
        self.record(ProviderCall::Offerings);
        let state = lock(&self.state);
        match &state.offerings_error {
            Some(error) => Err(error.clone()),
            None => Ok(state.offerings.clone()),
        }
    }

    async fn purchase(&self, package: &ProviderPackage) -> ProviderResult<PurchaseResult> {
        self.record(ProviderCall::Purchase(package.identifier.clone()));
        let mut state = lock(&self.state);
        match state.purchase.clone() {
            None => Ok(PurchaseResult {
                customer_info: state.customer_info.clone(),
                transaction_id: None,
                user_cancelled: false,
            }),
            Some(PurchaseBehavior::Grant(info)) => {
                state.customer_info = info.clone();
                Ok(PurchaseResult {
                    customer_info: info,
                    transaction_id: Some(format!("txn_{}", package.identifier)),
                    user_cancelled: false,
                })
            }
            Some(PurchaseBehavior::Cancel) => Ok(PurchaseResult {
                customer_info: state.customer_info.clone(),
                transaction_id: None,
                user_cancelled: true,
            }),
            Some(PurchaseBehavior::CancelWithError) => Err(ProviderError::Cancelled),
            Some(PurchaseBehavior::Fail(error)) => Err(error),
        }
    }

    async fn restore_purchases(&self) -> ProviderResult<CustomerInfo> {
        self.record(ProviderCall::RestorePurchases);
        let mut state = lock(&self.state);
        if let Some(error) = &state.restore_error {
            return Err(error.clone());
        }
        if let Some(info) = state.restored_info.clone() {
            state.customer_info = info;
        }
        Ok(state.customer_info.clone())
    }

    async fn log_in(&self, app_user_id: &str) -> ProviderResult<LogInResult> {
        self.record(ProviderCall::LogIn(app_user_id.to_string()));
        let mut state = lock(&self.state);
        if let Some(error) = &state.log_in_error {
            return Err(error.clone());
        }
        let created = state.customer_info.app_user_id != app_user_id;
        state.customer_info.app_user_id = app_user_id.to_string();
        Ok(LogInResult {
            customer_info: state.customer_info.clone(),
            created,
        })
    }

    async fn log_out(&self) -> ProviderResult<CustomerInfo> {
        self.record(ProviderCall::LogOut);
        let mut state = lock(&self.state);
        if let Some(error) = &state.log_out_error {
            return Err(error.clone());
        }
        let info = match state.logged_out_info.clone() {
            Some(info) => info,
            None => CustomerInfo {
                app_user_id: ANONYMOUS_USER_ID.to_string(),
                ..state.customer_info.clone()
            },
        };
        state.customer_info = info.clone();
        Ok(info)
    }

    fn customer_info_stream(&self) -> CustomerInfoStream {
        self.record(ProviderCall::Subscribe);
        let (sender, stream) = CustomerInfoStream::channel(CustomerInfoStream::DEFAULT_BUFFER);
        lock(&self.listeners).push(sender);
        stream
    }
}
