//! # oxide-notify-runtime
//!
//! Runtime support for accessors generated by `oxide-notify-compiler`.
//!
//! Reads return a [`Query`] bound to a list of topic keys. Mutations call
//! [`Database::notify`] after they succeed, or queue keys on a
//! [`Transaction`] that notifies once it commits. The [`ListenerRegistry`]
//! in between maps keys to listeners; a [`Subscription`] is a listener that
//! re-runs its query whenever one of its keys fires.
//!
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! use oxide_notify_runtime::{Listener, ListenerRegistry};
//!
//! let registry = ListenerRegistry::new();
//! let calls = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&calls);
//! let listener = Listener::new(move || {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! registry.add_listener(["all_users"], &listener);
//! registry.notify_listeners(["all_users", "all_users"]);
//! assert_eq!(calls.load(Ordering::SeqCst), 1);
//!
//! registry.remove_listener(["all_users"], &listener);
//! assert!(registry.is_empty());
//! ```

mod batch;
mod database;
mod error;
mod listener;
mod query;
mod registry;
mod subscription;
mod value;

pub use batch::NotifyBatch;
pub use database::{Database, Transaction};
pub use error::{Result, RuntimeError};
pub use listener::{Listener, ListenerFn, ListenerId};
pub use query::Query;
pub use registry::ListenerRegistry;
pub use subscription::Subscription;
pub use value::{SqlValue, ToSqlValue};

/// Re-exported so generated code needs no direct sqlx dependency.
pub use sqlx;
