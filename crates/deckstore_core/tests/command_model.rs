use deckstore_core::{CommandKind, Predicate, SqlValue, UndoCommand, ROW_ID_COLUMN};

#[test]
fn revert_insert_is_a_row_scoped_delete_without_values() {
    let command = UndoCommand::revert_insert("cards", 42);

    assert_eq!(command.kind, CommandKind::Delete);
    assert_eq!(command.table, "cards");
    assert!(command.values.is_empty());
    assert_eq!(command.predicate, Predicate::Row(42));
    assert!(command.is_row_scoped());
}

#[test]
fn revert_update_appends_row_identifier_last() {
    let old_values = vec![("due".to_owned(), SqlValue::Integer(5))];
    let command = UndoCommand::revert_update("cards", 7, old_values);

    assert_eq!(command.kind, CommandKind::Update);
    assert_eq!(
        command.values.last().unwrap(),
        &(ROW_ID_COLUMN.to_owned(), SqlValue::Integer(7))
    );
    assert_eq!(command.predicate, Predicate::Row(7));
}

#[test]
fn revert_delete_keeps_full_row_and_row_predicate() {
    let full_row = vec![
        ("id".to_owned(), SqlValue::Integer(3)),
        ("due".to_owned(), SqlValue::Integer(9)),
        ("guid".to_owned(), SqlValue::Null),
    ];
    let command = UndoCommand::revert_delete("cards", 3, full_row.clone());

    assert_eq!(command.kind, CommandKind::Insert);
    assert_eq!(command.values, full_row);
    assert_eq!(command.predicate, Predicate::Row(3));
}

#[test]
fn command_serialization_uses_expected_wire_fields() {
    let command = UndoCommand::revert_update(
        "cards",
        1,
        vec![("due".to_owned(), SqlValue::Integer(5))],
    );

    let json = serde_json::to_value(&command).unwrap();
    assert_eq!(json["kind"], "update");
    assert_eq!(json["table"], "cards");
    assert_eq!(json["predicate"]["row"], 1);
    assert_eq!(json["values"][0][0], "due");
    assert_eq!(json["values"][0][1]["integer"], 5);

    let decoded: UndoCommand = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, command);
}

#[test]
fn sql_value_conversions_cover_common_literals() {
    assert_eq!(SqlValue::from(5_i64), SqlValue::Integer(5));
    assert_eq!(SqlValue::from(2.5_f64), SqlValue::Real(2.5));
    assert_eq!(SqlValue::from("deck"), SqlValue::Text("deck".to_owned()));
    assert_eq!(
        SqlValue::from("deck".to_owned()),
        SqlValue::Text("deck".to_owned())
    );
}
