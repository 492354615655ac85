//! Outbound half of a connection that owns the connection's write lock.

use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures_util::Sink;
use tokio::sync::OwnedRwLockWriteGuard;

/// Wraps the outbound sink of a connection together with an exclusive
/// write guard.
///
/// The guard is held for as long as the writer is open. Closing the sink
/// closes the wrapped sink first and then releases the guard, whether or
/// not the inner close succeeded. The guard is released exactly once;
/// redundant closes only re-close the inner sink.
#[derive(Debug)]
pub struct ConnWriter<S> {
    inner: S,
    guard: Option<OwnedRwLockWriteGuard<()>>,
}

impl<S> ConnWriter<S> {
    /// Wraps `inner`, taking ownership of the held write `guard`.
    #[must_use]
    pub fn new(inner: S, guard: OwnedRwLockWriteGuard<()>) -> Self {
        Self {
            inner,
            guard: Some(guard),
        }
    }

    /// Returns `true` while the write guard is still held.
    #[must_use]
    pub fn holds_lock(&self) -> bool {
        self.guard.is_some()
    }
}

impl<S, Item> Sink<Item> for ConnWriter<S>
where
    S: Sink<Item> + Unpin,
{
    type Error = S::Error;

    fn poll_ready(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Pin::new(&mut self.get_mut().inner).poll_ready(cx)
    }

    fn start_send(self: Pin<&mut Self>, item: Item) -> Result<(), Self::Error> {
        Pin::new(&mut self.get_mut().inner).start_send(item)
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Pin::new(&mut self.get_mut().inner).poll_flush(cx)
    }

    fn poll_close(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        let this = self.get_mut();
        let result = ready!(Pin::new(&mut this.inner).poll_close(cx));
        if this.guard.take().is_some() {
            tracing::trace!("connection write lock released");
        }
        Poll::Ready(result)
    }
}
