//! SQLite access wired to the listener registry.

use std::sync::Arc;

use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Sqlite;
use tracing::debug;

use crate::batch::NotifyBatch;
use crate::error::Result;
use crate::query::Query;
use crate::registry::ListenerRegistry;
use crate::value::{bind_all, SqlValue};

/// A connection pool and the registry its statements notify.
///
/// Clones share both.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    registry: Arc<ListenerRegistry>,
}

impl Database {
    /// Connects to `url` with a fresh registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be created.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(url).await?;
        Ok(Self::from_pool(pool))
    }

    /// Wraps an existing pool with a fresh registry.
    #[must_use]
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self {
            pool,
            registry: Arc::new(ListenerRegistry::new()),
        }
    }

    /// Returns the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the shared listener registry.
    #[must_use]
    pub const fn registry(&self) -> &Arc<ListenerRegistry> {
        &self.registry
    }

    /// Builds a query for `sql` listening under `keys`.
    #[must_use]
    pub fn query(
        &self,
        keys: Vec<String>,
        sql: &'static str,
        args: Vec<SqlValue>,
    ) -> Query<Vec<SqliteRow>> {
        let pool = self.pool.clone();
        Query::new(keys, Arc::clone(&self.registry), move || {
            let pool = pool.clone();
            let args = args.clone();
            async move { Ok(bind_all(sql, args).fetch_all(&pool).await?) }
        })
    }

    /// Executes a statement and returns the number of rows affected.
    /// Nothing is notified; call [`notify`](Self::notify) once it succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    pub async fn execute(&self, sql: &str, args: Vec<SqlValue>) -> Result<u64> {
        let result = bind_all(sql, args).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Notifies the listeners of every key. Repeated keys fire once.
    pub fn notify(&self, keys: &[String]) {
        debug!(keys = ?keys, "Notifying keys");
        self.registry.notify_listeners(keys);
    }

    /// Starts a transaction whose notifications are held until commit.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started.
    pub async fn begin(&self) -> Result<Transaction> {
        let tx = self.pool.begin().await?;
        Ok(Transaction {
            tx,
            pending: NotifyBatch::new(),
            registry: Arc::clone(&self.registry),
        })
    }
}

/// A database transaction with deferred notifications.
///
/// Keys passed to [`notify`](Self::notify) are notified only after
/// [`commit`](Self::commit) succeeds. Rolling back, or dropping the
/// transaction without committing, discards them.
pub struct Transaction {
    tx: sqlx::Transaction<'static, Sqlite>,
    pending: NotifyBatch,
    registry: Arc<ListenerRegistry>,
}

impl Transaction {
    /// Executes a statement inside the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    pub async fn execute(&mut self, sql: &str, args: Vec<SqlValue>) -> Result<u64> {
        let result = bind_all(sql, args).execute(&mut *self.tx).await?;
        Ok(result.rows_affected())
    }

    /// Runs a query inside the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn fetch_all(&mut self, sql: &str, args: Vec<SqlValue>) -> Result<Vec<SqliteRow>> {
        Ok(bind_all(sql, args).fetch_all(&mut *self.tx).await?)
    }

    /// Queues keys to notify after commit.
    pub fn notify(&mut self, keys: &[String]) {
        self.pending.extend(keys);
    }

    /// Keys queued so far.
    #[must_use]
    pub fn pending(&self) -> &[String] {
        self.pending.keys()
    }

    /// Commits, then notifies every queued key once.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails; nothing is notified then.
    pub async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        let keys = self.pending.into_keys();
        debug!(keys = ?keys, "Committed; notifying keys");
        self.registry.notify_listeners(&keys);
        Ok(())
    }

    /// Rolls back and discards queued keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the rollback fails.
    pub async fn rollback(self) -> Result<()> {
        debug!(discarded = self.pending.len(), "Rolling back");
        self.tx.rollback().await?;
        Ok(())
    }
}
