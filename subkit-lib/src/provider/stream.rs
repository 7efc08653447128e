//! Push channel for customer info updates.

use super::CustomerInfo;
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// Provider side of a customer info subscription.
#[derive(Clone, Debug)]
pub struct CustomerInfoSender {
    sender: mpsc::Sender<CustomerInfo>,
}

impl CustomerInfoSender {
    /// Deliver an update, waiting for buffer space.
    ///
    /// Returns false once the subscriber has gone away; the provider should
    /// then forget this sender.
    pub async fn send(&self, info: CustomerInfo) -> bool {
        self.sender.send(info).await.is_ok()
    }

    /// Deliver an update without waiting. Returns false if the buffer is full
    /// or the subscriber has gone away.
    pub fn try_send(&self, info: CustomerInfo) -> bool {
        self.sender.try_send(info).is_ok()
    }

    /// True once the subscriber dropped its stream.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Subscriber side of a customer info subscription.
///
/// Ends when every [`CustomerInfoSender`] for it is dropped. Dropping the
/// stream closes the channel, which is how providers learn to unsubscribe.
#[derive(Debug)]
pub struct CustomerInfoStream {
    receiver: mpsc::Receiver<CustomerInfo>,
}

impl CustomerInfoStream {
    /// Default buffer between provider and subscriber.
    pub const DEFAULT_BUFFER: usize = 16;

    /// Create a connected sender/stream pair.
    pub fn channel(buffer: usize) -> (CustomerInfoSender, Self) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        (CustomerInfoSender { sender }, Self { receiver })
    }

    /// A stream that is already finished.
    pub fn empty() -> Self {
        let (_, stream) = Self::channel(1);
        stream
    }

    /// Wait for the next update. `None` once the provider side is gone.
    pub async fn next(&mut self) -> Option<CustomerInfo> {
        self.receiver.recv().await
    }
}

impl Stream for CustomerInfoStream {
    type Item = CustomerInfo;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_stream_ends() {
        let mut stream = CustomerInfoStream::empty();
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_drop_closes_sender() {
        let (sender, stream) = CustomerInfoStream::channel(4);
        assert!(sender.send(CustomerInfo::default()).await);
        assert!(!sender.is_closed());

        drop(stream);
        assert!(sender.is_closed());
        assert!(!sender.try_send(CustomerInfo::default()));
    }

    #[tokio::test]
    async fn test_stream_yields_in_order() {
        use futures::StreamExt;

        let (sender, stream) = CustomerInfoStream::channel(4);
        for id in ["a", "b"] {
            let info = CustomerInfo {
                app_user_id: id.to_string(),
                ..Default::default()
            };
            assert!(sender.try_send(info));
        }
        drop(sender);

        let ids: Vec<String> = stream.map(|info| info.app_user_id).collect().await;
        assert_eq!(ids, vec!["a", "b"]);
    }
}
