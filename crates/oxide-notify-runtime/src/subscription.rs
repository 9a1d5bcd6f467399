//! Reactive subscriptions over a [`Query`].

use core::pin::Pin;
use core::task::{Context, Poll};

use futures::future::BoxFuture;
use futures::{FutureExt, Stream, StreamExt};
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::{Result, RuntimeError};
use crate::listener::Listener;
use crate::query::Query;

/// A stream of query results, refreshed whenever one of the query's keys is
/// notified.
///
/// The subscription registers its listener under every key when created
/// and yields the initial result first. Notifications that arrive while a
/// re-execution is pending are coalesced into one further run.
/// [`cancel`](Self::cancel), or dropping the subscription, removes the
/// listener from every key before returning; no execution starts after
/// that.
pub struct Subscription<T> {
    query: Query<T>,
    listener: Listener,
    wakeups: mpsc::UnboundedReceiver<()>,
    pending: Option<BoxFuture<'static, Result<T>>>,
    active: bool,
}

impl<T: Send + 'static> Subscription<T> {
    pub(crate) fn new(query: Query<T>) -> Self {
        let (sender, wakeups) = mpsc::unbounded_channel();
        let listener = Listener::new(move || {
            // Fails only once the subscription is gone.
            let _ = sender.send(());
        });

        query.add_listener(&listener);
        debug!(keys = ?query.keys(), listener = listener.id(), "Subscribed");
        let pending = Some(query.run());

        Self {
            query,
            listener,
            wakeups,
            pending,
            active: true,
        }
    }

    /// Waits for the next result.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::SubscriptionClosed`] after cancellation, or
    /// the query's own error.
    pub async fn recv(&mut self) -> Result<T> {
        match self.next().await {
            Some(result) => result,
            None => Err(RuntimeError::SubscriptionClosed),
        }
    }
}

impl<T> Subscription<T> {
    /// The keys this subscription listens under.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        self.query.keys()
    }

    /// True until cancelled.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Stops listening. Idempotent.
    pub fn cancel(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.query.remove_listener(&self.listener);
        self.pending = None;
        debug!(
            keys = ?self.query.keys(),
            listener = self.listener.id(),
            remaining = self.query.registry().key_count(),
            "Unsubscribed"
        );
    }
}

impl<T> Stream for Subscription<T> {
    type Item = Result<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if !this.active {
                return Poll::Ready(None);
            }

            if let Some(pending) = this.pending.as_mut() {
                let result = futures::ready!(pending.poll_unpin(cx));
                this.pending = None;
                return Poll::Ready(Some(result));
            }

            match this.wakeups.poll_recv(cx) {
                Poll::Ready(Some(())) => {
                    // Coalesce a burst of notifications into one run.
                    while this.wakeups.try_recv().is_ok() {}
                    this.pending = Some(this.query.run());
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}
