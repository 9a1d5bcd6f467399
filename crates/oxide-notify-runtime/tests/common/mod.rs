#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use oxide_notify_runtime::{Database, Listener};
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::Row;

const SCHEMA: &[&str] = &[
    "CREATE TABLE messages (
        id INTEGER PRIMARY KEY,
        conversation_id TEXT NOT NULL,
        user_id TEXT NOT NULL,
        body TEXT NOT NULL
    )",
    "CREATE TABLE archive (
        id INTEGER PRIMARY KEY,
        body TEXT NOT NULL
    )",
];

/// An in-memory database with the message schema. One connection, so every
/// statement sees the same database.
pub async fn setup() -> Database {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .expect("Failed to create in-memory SQLite pool");
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(&pool)
            .await
            .expect("Failed to create schema");
    }
    Database::from_pool(pool)
}

/// A listener that counts its invocations.
pub fn counting() -> (Listener, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let listener = Listener::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    (listener, calls)
}

pub fn calls(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}

/// The `body` column of every row.
pub fn bodies(rows: &[SqliteRow]) -> Vec<String> {
    rows.iter().map(|row| row.get::<String, _>("body")).collect()
}
