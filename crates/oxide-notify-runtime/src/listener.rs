//! Listener handles.

use core::fmt;
use core::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identity of a [`Listener`], unique within the process.
pub type ListenerId = u64;

/// Closure type for listeners.
pub type ListenerFn = dyn Fn() + Send + Sync;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// A callback registered under topic keys.
///
/// Clones share the callback and the identity, so a clone can be used to
/// remove a registration made with the original. Equality is by identity.
#[derive(Clone)]
pub struct Listener {
    id: ListenerId,
    callback: Arc<ListenerFn>,
}

impl Listener {
    /// Wraps `callback` in a listener with a fresh identity.
    pub fn new(callback: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            callback: Arc::new(callback),
        }
    }

    /// This listener's identity.
    #[must_use]
    pub const fn id(&self) -> ListenerId {
        self.id
    }

    /// Invokes the callback.
    pub fn call(&self) {
        (self.callback)();
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Listener {}

impl Hash for Listener {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener").field("id", &self.id).finish()
    }
}
