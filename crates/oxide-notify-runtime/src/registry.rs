//! The topic key to listener registry.
//!
//! Each key maps to the listeners registered under it. An entry is created
//! by the first `add_listener` for its key and removed when its last
//! listener is removed.
//!
//! `notify_listeners` snapshots a key's registrations under the map lock
//! and invokes them with that lock released, so listeners may add or
//! remove registrations (their own included) from inside the callback. A
//! listener added during a notification may or may not be invoked by it.
//!
//! Every registration also carries its own reentrant lock, held across
//! the check of its `active` flag and the invocation. `remove_listener`
//! clears the flag under that lock, so once it returns no invocation of
//! the removed registration is running or can start, except one on the
//! calling thread itself (a listener removing itself). A listener must
//! therefore not block on another thread that is removing it.

use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex};
use tracing::trace;

use crate::listener::Listener;

struct Registration {
    listener: Listener,
    active: ReentrantMutex<Cell<bool>>,
}

impl Registration {
    fn new(listener: &Listener) -> Self {
        Self {
            listener: listener.clone(),
            active: ReentrantMutex::new(Cell::new(true)),
        }
    }

    /// Invokes the listener unless it has been removed.
    fn invoke(&self) {
        let active = self.active.lock();
        if active.get() {
            self.listener.call();
        }
    }

    /// Waits for a running invocation on another thread, then prevents
    /// any further one.
    fn deactivate(&self) {
        self.active.lock().set(false);
    }
}

/// Shared registry of listeners by topic key.
///
/// All methods take `&self`. Operations on several keys behave as the same
/// operation applied to each key in turn.
#[derive(Default)]
pub struct ListenerRegistry {
    entries: Mutex<HashMap<String, Vec<Arc<Registration>>>>,
}

impl ListenerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` under every key. Registering a listener under a
    /// key it is already registered under does nothing.
    pub fn add_listener<I, S>(&self, keys: I, listener: &Listener)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = self.entries.lock();
        for key in keys {
            let key = key.as_ref();
            let registrations = entries.entry(key.to_string()).or_default();
            if registrations.iter().any(|r| r.listener == *listener) {
                continue;
            }
            registrations.push(Arc::new(Registration::new(listener)));
            trace!(key = %key, listener = listener.id(), "Added listener");
        }
    }

    /// Removes `listener` from every key. Keys left without listeners are
    /// dropped.
    ///
    /// Returns once no invocation of the removed registrations is running
    /// on another thread.
    pub fn remove_listener<I, S>(&self, keys: I, listener: &Listener)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut removed = vec![];
        {
            let mut entries = self.entries.lock();
            for key in keys {
                let key = key.as_ref();
                let Some(registrations) = entries.get_mut(key) else {
                    continue;
                };
                if let Some(pos) = registrations.iter().position(|r| r.listener == *listener) {
                    removed.push(registrations.remove(pos));
                    trace!(key = %key, listener = listener.id(), "Removed listener");
                }
                if registrations.is_empty() {
                    entries.remove(key);
                }
            }
        }

        // The map lock is released first: a running listener may need it.
        for registration in removed {
            registration.deactivate();
        }
    }

    /// Invokes the listeners of every key. Repeated keys are notified once.
    ///
    /// Listeners run on the calling thread; a panicking listener propagates
    /// to the caller.
    pub fn notify_listeners<I, S>(&self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        for key in keys {
            let key = key.as_ref();
            if !seen.insert(key.to_string()) {
                continue;
            }

            let snapshot: Vec<Arc<Registration>> = {
                let entries = self.entries.lock();
                entries.get(key).cloned().unwrap_or_default()
            };
            trace!(key = %key, listeners = snapshot.len(), "Notifying");

            for registration in snapshot {
                registration.invoke();
            }
        }
    }

    /// Number of listeners registered under `key`.
    #[must_use]
    pub fn listener_count(&self, key: &str) -> usize {
        self.entries.lock().get(key).map_or(0, Vec::len)
    }

    /// Number of keys with at least one listener.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.entries.lock().len()
    }

    /// True if no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
