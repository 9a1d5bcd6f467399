//! Deferred notification keys.

use std::collections::HashSet;

/// Keys collected during a transaction, notified once it commits.
///
/// Keeps first-insertion order and drops repeats, so each key fires at
/// most once per batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifyBatch {
    keys: Vec<String>,
    seen: HashSet<String>,
}

impl NotifyBatch {
    /// Creates an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a key. Returns false if it was already present.
    pub fn push(&mut self, key: impl Into<String>) -> bool {
        let key = key.into();
        if self.seen.contains(&key) {
            return false;
        }
        self.seen.insert(key.clone());
        self.keys.push(key);
        true
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True if no key was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The keys in insertion order.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Consumes the batch, returning its keys in insertion order.
    #[must_use]
    pub fn into_keys(self) -> Vec<String> {
        self.keys
    }
}

impl<S: Into<String>> Extend<S> for NotifyBatch {
    fn extend<I: IntoIterator<Item = S>>(&mut self, keys: I) {
        for key in keys {
            self.push(key);
        }
    }
}
