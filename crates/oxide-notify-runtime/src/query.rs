//! Re-runnable queries bound to topic keys.

use core::fmt;
use core::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::error::Result;
use crate::listener::Listener;
use crate::registry::ListenerRegistry;
use crate::subscription::Subscription;

type Executor<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T>> + Send + Sync>;

/// A query that can be executed any number of times and observed through
/// the keys it listens under.
pub struct Query<T> {
    keys: Vec<String>,
    registry: Arc<ListenerRegistry>,
    executor: Executor<T>,
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Self {
            keys: self.keys.clone(),
            registry: Arc::clone(&self.registry),
            executor: Arc::clone(&self.executor),
        }
    }
}

impl<T> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query").field("keys", &self.keys).finish_non_exhaustive()
    }
}

impl<T: Send + 'static> Query<T> {
    /// Creates a query listening under `keys`. Each call to `execute`
    /// runs a fresh future from `executor`.
    pub fn new<F, Fut>(keys: Vec<String>, registry: Arc<ListenerRegistry>, executor: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        Self {
            keys,
            registry,
            executor: Arc::new(move || executor().boxed()),
        }
    }

    /// Runs the query.
    ///
    /// # Errors
    ///
    /// Returns whatever error the underlying statement fails with.
    pub async fn execute(&self) -> Result<T> {
        (self.executor)().await
    }

    /// Transforms every result of this query. The mapped query listens
    /// under the same keys.
    pub fn map<U, F>(self, f: F) -> Query<U>
    where
        U: Send + 'static,
        F: Fn(T) -> Result<U> + Send + Sync + 'static,
    {
        let executor = self.executor;
        let f = Arc::new(f);
        Query {
            keys: self.keys,
            registry: self.registry,
            executor: Arc::new(move || {
                let f = Arc::clone(&f);
                executor().map(move |result| result.and_then(|value| (*f)(value))).boxed()
            }),
        }
    }

    /// Starts a subscription: registers under every key, then yields the
    /// current result and a fresh one after each notification.
    #[must_use]
    pub fn subscribe(&self) -> Subscription<T> {
        Subscription::new(self.clone())
    }
}

impl<T> Query<T> {
    /// The keys this query listens under.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Registers `listener` under every key of this query.
    pub fn add_listener(&self, listener: &Listener) {
        self.registry.add_listener(&self.keys, listener);
    }

    /// Removes `listener` from every key of this query.
    pub fn remove_listener(&self, listener: &Listener) {
        self.registry.remove_listener(&self.keys, listener);
    }

    pub(crate) fn registry(&self) -> &ListenerRegistry {
        &self.registry
    }

    pub(crate) fn run(&self) -> BoxFuture<'static, Result<T>> {
        (self.executor)()
    }
}
