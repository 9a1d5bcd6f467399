// Generated by oxide-notify from Ledger.sq. Do not edit.

use oxide_notify_runtime::sqlx::sqlite::SqliteRow;
use oxide_notify_runtime::{Database, Query, Result, ToSqlValue};

/// Statements declared in `Ledger.sq`.
#[derive(Clone)]
pub struct LedgerQueries {
    db: Database,
}

impl LedgerQueries {
    /// Wraps a database handle.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Runs `byKeys`. The returned query listens on `ledger_:keys`.
    pub fn by_keys(&self, keys_2: impl ToSqlValue) -> Query<Vec<SqliteRow>> {
        let keys_2 = keys_2.to_sql_value();
        let keys = vec![format!("ledger_{}", keys_2.key_fragment())];
        self.db.query(keys, "SELECT * FROM ledger WHERE label = ?1", vec![keys_2.clone()])
    }

    /// Runs `deleteRows`, then notifies `ledger`.
    pub async fn delete_rows(&self, rows_2: impl ToSqlValue) -> Result<u64> {
        let rows_2 = rows_2.to_sql_value();
        let keys = vec![String::from("ledger")];
        let rows = self.db.execute("DELETE FROM ledger WHERE amount < ?1", vec![rows_2.clone()]).await?;
        self.db.notify(&keys);
        Ok(rows)
    }

    /// Runs `moveTx` in one transaction, then notifies `ledger`
    /// once it commits.
    pub async fn move_tx(&self, tx_2: impl ToSqlValue, rows_2: impl ToSqlValue, keys_2: impl ToSqlValue) -> Result<u64> {
        let tx_2 = tx_2.to_sql_value();
        let rows_2 = rows_2.to_sql_value();
        let keys_2 = keys_2.to_sql_value();
        let keys = vec![String::from("ledger")];
        let mut tx = self.db.begin().await?;
        let mut rows = 0;
        rows += tx.execute("INSERT INTO ledger (label, amount) VALUES (?1, ?2)", vec![tx_2.clone(), rows_2.clone()]).await?;
        rows += tx.execute("DELETE FROM ledger WHERE label = ?1", vec![keys_2.clone()]).await?;
        tx.notify(&keys);
        tx.commit().await?;
        Ok(rows)
    }
}
