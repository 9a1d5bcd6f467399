mod common;

use common::{
    compile_err, compile_ok, plan, resolve, strip_annotations, tables, LEDGER_RS, LEDGER_SQ,
    MESSAGE_RS, MESSAGE_SQ,
};
use oxide_notify_compiler::{CompileError, KeyExpression, KeySource, StatementKind};

#[test]
fn test_message_fixture_matches_generated_source() {
    let generated = compile_ok("Message.sq", MESSAGE_SQ, true);
    assert_eq!(generated.module_name, "message");
    assert_eq!(generated.struct_name, "MessageQueries");
    assert_eq!(generated.source, MESSAGE_RS);
}

#[test]
fn test_ledger_fixture_matches_generated_source() {
    let generated = compile_ok("Ledger.sq", LEDGER_SQ, true);
    assert_eq!(generated.struct_name, "LedgerQueries");
    assert_eq!(generated.source, LEDGER_RS);

    let move_tx = plan(&generated, "moveTx");
    assert_eq!(move_tx.kind, StatementKind::Transaction);
    assert_eq!(move_tx.keys, tables(&["ledger"]));
}

#[test]
fn test_constant_custom_key() {
    let source = "-- @CustomKey all_users\nselectAll:\nSELECT * FROM users;";
    let generated = compile_ok("User.sq", source, true);
    let select_all = plan(&generated, "selectAll");

    assert_eq!(select_all.kind, StatementKind::Read);
    assert_eq!(resolve(select_all, &[]), vec!["all_users"]);
    assert!(generated
        .source
        .contains("let keys = vec![String::from(\"all_users\")];"));
    assert!(!generated.source.contains("String::from(\"users\")"));
}

#[test]
fn test_two_template_keys() {
    let source = "-- @CustomKey conversation_:conversation_id\n\
                  -- @CustomKey user_:user_id\n\
                  selectForConversationAndUser:\n\
                  SELECT * FROM messages WHERE conversation_id = :conversation_id AND user_id = :user_id;";
    let generated = compile_ok("Message.sq", source, true);
    let select = plan(&generated, "selectForConversationAndUser");

    assert_eq!(
        resolve(select, &[("conversation_id", "c1"), ("user_id", "u1")]),
        vec!["conversation_c1", "user_u1"]
    );
}

#[test]
fn test_notify_custom_key_on_insert() {
    let source = "-- @NotifyCustomKey conversation_:conversation_id\n\
                  insertMessage:\n\
                  INSERT INTO messages (conversation_id, body) VALUES (:conversation_id, :body);";
    let generated = compile_ok("Message.sq", source, true);
    let insert = plan(&generated, "insertMessage");

    assert_eq!(insert.kind, StatementKind::Mutation);
    assert_eq!(
        resolve(insert, &[("conversation_id", "c1"), ("body", "hi")]),
        vec!["conversation_c1"]
    );
    assert!(!generated.source.contains("String::from(\"messages\")"));
}

#[test]
fn test_unresolved_parameter_fails_the_file() {
    let source = "selectAll:\nSELECT * FROM messages;\n\n\
                  -- @CustomKey conversation_:invalid_param\n\
                  selectByConversation:\n\
                  SELECT * FROM messages WHERE conversation_id = :conversation_id;";
    let err = compile_err("Message.sq", source, true);

    assert_eq!(
        err,
        CompileError::UnresolvedParameter {
            statement: String::from("selectByConversation"),
            parameter: String::from("invalid_param"),
        }
    );
    let message = err.to_string();
    assert!(message.contains("invalid_param"));
    assert!(message.contains("selectByConversation"));
}

#[test]
fn test_disabled_flag_ignores_annotations() {
    let with_annotations = compile_ok("Message.sq", MESSAGE_SQ, false);
    let without = compile_ok("Message.sq", &strip_annotations(MESSAGE_SQ), false);

    assert_eq!(with_annotations.source, without.source);
    assert_eq!(with_annotations.plans, without.plans);
    assert!(with_annotations.plans.iter().all(|p| !p.keys.is_custom()));
    assert_eq!(
        plan(&with_annotations, "selectAll").keys,
        tables(&["messages"])
    );
}

#[test]
fn test_disabled_flag_skips_validation() {
    let source = "-- @CustomKey conversation_:invalid_param\n\
                  selectByConversation:\n\
                  SELECT * FROM messages WHERE conversation_id = :conversation_id;";
    let generated = compile_ok("Message.sq", source, false);
    assert_eq!(
        plan(&generated, "selectByConversation").keys,
        tables(&["messages"])
    );
}

#[test]
fn test_reads_default_to_tables_read() {
    let source = "selectWithAuthor:\n\
                  SELECT m.body, u.name FROM messages m JOIN users u ON u.id = m.user_id;";
    let generated = compile_ok("Message.sq", source, true);
    assert_eq!(
        plan(&generated, "selectWithAuthor").keys,
        tables(&["messages", "users"])
    );
}

#[test]
fn test_mutations_default_to_tables_written() {
    let generated = compile_ok("Message.sq", MESSAGE_SQ, true);
    assert_eq!(plan(&generated, "deleteById").keys, tables(&["messages"]));

    let archive = plan(&generated, "archiveMessage");
    assert_eq!(archive.kind, StatementKind::Transaction);
    assert_eq!(archive.keys, tables(&["archive", "messages"]));
}

#[test]
fn test_annotation_of_other_kind_is_ignored() {
    let source = "-- @NotifyCustomKey everything\n\
                  -- @CustomKey all_users\n\
                  selectAll:\n\
                  SELECT * FROM users;\n\
                  \n\
                  -- @CustomKey everything\n\
                  deleteAll:\n\
                  DELETE FROM users;";
    let generated = compile_ok("User.sq", source, true);
    assert_eq!(
        plan(&generated, "selectAll").keys,
        KeySource::Custom(vec![KeyExpression::parse("all_users")])
    );
    assert_eq!(plan(&generated, "deleteAll").keys, tables(&["users"]));
}

#[test]
fn test_annotations_attach_to_the_next_statement_only() {
    let source = "-- @CustomKey first_key\n\
                  first:\n\
                  SELECT * FROM a;\n\
                  second:\n\
                  SELECT * FROM b;";
    let generated = compile_ok("Q.sq", source, true);
    assert_eq!(resolve(plan(&generated, "first"), &[]), vec!["first_key"]);
    assert_eq!(plan(&generated, "second").keys, tables(&["b"]));
}

#[test]
fn test_unlabeled_statement_breaks_the_annotation_run() {
    let source = "-- @CustomKey orphan\n\
                  CREATE TABLE t (id INTEGER);\n\
                  selectAll:\n\
                  SELECT * FROM t;";
    let generated = compile_ok("T.sq", source, true);
    assert_eq!(plan(&generated, "selectAll").keys, tables(&["t"]));
}

#[test]
fn test_block_comment_annotation() {
    let source = "/* @CustomKey all_users */\nselectAll:\nSELECT * FROM users;";
    let generated = compile_ok("User.sq", source, true);
    assert_eq!(resolve(plan(&generated, "selectAll"), &[]), vec!["all_users"]);
}

#[test]
fn test_duplicate_custom_keys_are_kept() {
    let source = "-- @CustomKey same\n-- @CustomKey same\nselectAll:\nSELECT * FROM users;";
    let generated = compile_ok("User.sq", source, true);
    assert_eq!(resolve(plan(&generated, "selectAll"), &[]), vec!["same", "same"]);
}

#[test]
fn test_duplicate_statement_names() {
    let source = "q: SELECT 1;\nq: SELECT 2;";
    assert_eq!(
        compile_err("Q.sq", source, false),
        CompileError::DuplicateStatement {
            file: String::from("Q.sq"),
            name: String::from("q"),
        }
    );
}

#[test]
fn test_method_name_collisions() {
    assert_eq!(
        compile_err("Q.sq", "new:\nSELECT 1;", false),
        CompileError::MethodCollision {
            file: String::from("Q.sq"),
            statement: String::from("new"),
            method: String::from("new"),
            existing: None,
        }
    );

    let source = "selectAll:\nSELECT 1;\n\nselect_all:\nSELECT 2;";
    assert_eq!(
        compile_err("Q.sq", source, false),
        CompileError::MethodCollision {
            file: String::from("Q.sq"),
            statement: String::from("select_all"),
            method: String::from("select_all"),
            existing: Some(String::from("selectAll")),
        }
    );
}

#[test]
fn test_positional_and_named_parameters_stay_distinct() {
    let generated = compile_ok("P.sq", "q: SELECT * FROM t WHERE a = :value1 OR b = ?;", false);
    let q = plan(&generated, "q");
    assert_eq!(q.statements[0].sql, "SELECT * FROM t WHERE a = ?1 OR b = ?2");
    assert!(generated
        .source
        .contains("pub fn q(&self, value1: impl ToSqlValue, value2: impl ToSqlValue)"));
}

#[test]
fn test_syntax_error_names_the_file() {
    let err = compile_err("Broken.sq", "q: SELECT FROM;", false);
    assert!(matches!(err, CompileError::Syntax { ref file, .. } if file == "Broken.sq"));
}

#[test]
fn test_space_after_colon_is_a_syntax_error() {
    let err = compile_err("Q.sq", "q: SELECT * FROM t WHERE id = : id;", false);
    assert!(matches!(err, CompileError::Syntax { ref error, .. } if error.message.contains("':'")));
}
