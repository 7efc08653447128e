//! Status change stream.

use futures::stream::{self, BoxStream, Stream, StreamExt};
use std::pin::Pin;
use std::task::{Context, Poll};
use subkit_lib::SubscriptionStatus;
use tokio::sync::broadcast::{self, error::RecvError};

/// Statuses buffered per observer before a slow one starts skipping.
pub const UPDATE_BUFFER: usize = 64;

/// Status updates fanned out from the background push consumer.
///
/// The consumer commits each push to the cache on arrival and only then
/// hands it to observers, so an observer never writes the cache itself. An
/// observer that falls more than [`UPDATE_BUFFER`] updates behind skips the
/// oldest ones instead of holding up delivery. Dropping the stream releases
/// its slot in the fan-out.
pub struct StatusStream {
    inner: BoxStream<'static, SubscriptionStatus>,
}

impl StatusStream {
    pub(crate) fn new(receiver: broadcast::Receiver<SubscriptionStatus>) -> Self {
        let inner = stream::unfold(receiver, |mut receiver| async move {
            loop {
                match receiver.recv().await {
                    Ok(status) => return Some((status, receiver)),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!("Observer fell behind, skipped {} updates", skipped);
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        })
        .boxed();
        Self { inner }
    }

    /// A stream that is already finished.
    pub(crate) fn ended() -> Self {
        Self {
            inner: stream::empty().boxed(),
        }
    }

    /// Wait for the next status. `None` once the provider ends the stream.
    pub async fn next(&mut self) -> Option<SubscriptionStatus> {
        self.inner.next().await
    }
}

impl Stream for StatusStream {
    type Item = SubscriptionStatus;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl std::fmt::Debug for StatusStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusStream").finish_non_exhaustive()
    }
}
