//! Inbound half of a connection with a one-shot close notification.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::Stream;
use tokio::sync::mpsc;

/// Wraps the inbound frame stream of a connection.
///
/// Frames are passed through untouched. [`ConnReader::close`] tells
/// whoever holds the other end of the close channel that the connection is
/// going away. The notification is sent at most once; later closes are
/// no-ops.
#[derive(Debug)]
pub struct ConnReader<S> {
    inner: S,
    close_tx: Option<mpsc::Sender<()>>,
}

impl<S> ConnReader<S> {
    /// Wraps `inner`, signalling `close_tx` on close.
    #[must_use]
    pub fn new(inner: S, close_tx: mpsc::Sender<()>) -> Self {
        Self {
            inner,
            close_tx: Some(close_tx),
        }
    }

    /// Sends the close notification if it has not been sent yet.
    ///
    /// A receiver that is already gone is not an error.
    pub async fn close(&mut self) {
        let Some(close_tx) = self.close_tx.take() else {
            return;
        };
        if close_tx.send(()).await.is_err() {
            tracing::trace!("close receiver already dropped");
        }
    }

    /// Returns `true` once [`ConnReader::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.close_tx.is_none()
    }

    /// Returns the wrapped stream.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S> Stream for ConnReader<S>
where
    S: Stream + Unpin,
{
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.get_mut().inner).poll_next(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
