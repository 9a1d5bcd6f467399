//! Drives the accessors the compiler emits for `fixtures/Message.sq`.

mod common;

#[path = "fixtures/message_queries.rs"]
mod message_queries;

use common::{bodies, calls, counting, setup};
use message_queries::MessageQueries;
use oxide_notify_runtime::RuntimeError;

async fn queries() -> (MessageQueries, oxide_notify_runtime::Database) {
    let db = setup().await;
    (MessageQueries::new(db.clone()), db)
}

#[tokio::test]
async fn test_constant_custom_key_replaces_table_key() {
    let (queries, db) = queries().await;
    let query = queries.select_all();
    assert_eq!(query.keys(), ["all_messages"]);

    let mut subscription = query.subscribe();
    assert!(subscription.recv().await.unwrap().is_empty());
    assert_eq!(db.registry().listener_count("all_messages"), 1);
    assert_eq!(db.registry().listener_count("messages"), 0);
}

#[tokio::test]
async fn test_template_keys_render_argument_values() {
    let (queries, db) = queries().await;
    let query = queries.select_for_conversation_and_user("c1", "u1");
    assert_eq!(query.keys(), ["conversation_c1", "user_u1"]);

    let mut subscription = query.subscribe();
    assert!(subscription.recv().await.unwrap().is_empty());

    // Either key refreshes the subscription.
    queries.insert_message("c1", "u1", "hello").await.unwrap();
    assert_eq!(bodies(&subscription.recv().await.unwrap()), vec!["hello"]);

    db.notify(&[String::from("user_u1")]);
    assert_eq!(bodies(&subscription.recv().await.unwrap()), vec!["hello"]);
}

#[tokio::test]
async fn test_mutation_notifies_only_its_custom_key() {
    let (queries, db) = queries().await;
    let (conversation, conversation_calls) = counting();
    let (other, other_calls) = counting();
    let (table, table_calls) = counting();
    db.registry().add_listener(["conversation_c1"], &conversation);
    db.registry().add_listener(["conversation_c2"], &other);
    db.registry().add_listener(["messages"], &table);

    let rows = queries.insert_message("c1", "u1", "hello").await.unwrap();
    assert_eq!(rows, 1);
    assert_eq!(calls(&conversation_calls), 1);
    assert_eq!(calls(&other_calls), 0);
    assert_eq!(calls(&table_calls), 0);
}

#[tokio::test]
async fn test_default_keys_are_tables() {
    let (queries, db) = queries().await;
    queries.insert_message("c1", "u1", "hello").await.unwrap();

    let query = queries.select_by_id(1_i64);
    assert_eq!(query.keys(), ["messages"]);
    let mut subscription = query.subscribe();
    assert_eq!(bodies(&subscription.recv().await.unwrap()), vec!["hello"]);

    assert_eq!(queries.delete_by_id(1_i64).await.unwrap(), 1);
    assert!(subscription.recv().await.unwrap().is_empty());
    drop(subscription);
    assert!(db.registry().is_empty());
}

#[tokio::test]
async fn test_transaction_notifies_written_tables_after_commit() {
    let (queries, db) = queries().await;
    queries.insert_message("c1", "u1", "hello").await.unwrap();

    let (listener, counter) = counting();
    db.registry().add_listener(["archive", "messages"], &listener);

    assert_eq!(queries.archive_message(1_i64).await.unwrap(), 2);
    assert_eq!(calls(&counter), 2);

    let archived = db.query(vec![], "SELECT * FROM archive", vec![]);
    assert_eq!(bodies(&archived.execute().await.unwrap()), vec!["hello"]);
}

#[tokio::test]
async fn test_failed_block_rolls_back_and_notifies_nothing() {
    let (queries, db) = queries().await;
    queries.insert_message("c1", "u1", "hello").await.unwrap();
    db.execute(
        "CREATE TRIGGER keep_messages BEFORE DELETE ON messages \
         BEGIN SELECT RAISE(ABORT, 'messages are kept'); END",
        vec![],
    )
    .await
    .unwrap();

    let (listener, counter) = counting();
    db.registry().add_listener(["archive", "messages"], &listener);

    // The INSERT into archive succeeds, then the DELETE aborts.
    let err = queries.archive_message(1_i64).await.unwrap_err();
    assert!(matches!(err, RuntimeError::Database(_)));
    assert_eq!(calls(&counter), 0);

    let archived = db.query(vec![], "SELECT * FROM archive", vec![]);
    assert!(archived.execute().await.unwrap().is_empty());
    let kept = db.query(vec![], "SELECT * FROM messages", vec![]);
    assert_eq!(bodies(&kept.execute().await.unwrap()), vec!["hello"]);
}

#[tokio::test]
async fn test_failed_mutation_notifies_nothing() {
    let (queries, db) = queries().await;
    let (listener, counter) = counting();
    db.registry().add_listener(["conversation_c1"], &listener);

    // body is NOT NULL.
    let err = queries
        .insert_message("c1", "u1", Option::<String>::None)
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::Database(_)));
    assert_eq!(calls(&counter), 0);
}

#[tokio::test]
async fn test_cancelled_subscription_stops_refreshing() {
    let (queries, db) = queries().await;
    let mut subscription = queries.select_for_conversation_and_user("c1", "u1").subscribe();
    subscription.recv().await.unwrap();

    subscription.cancel();
    assert!(db.registry().is_empty());

    queries.insert_message("c1", "u1", "late").await.unwrap();
    assert!(matches!(
        subscription.recv().await,
        Err(RuntimeError::SubscriptionClosed)
    ));
}
