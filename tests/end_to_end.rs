//! End-to-end flow through the public facade
//!
//! Probe, build a schema, write rows and read the schema back, all through
//! `isam::*` against the stub engine.

use isam::testing::StubEngine;
use isam::{
    AdapterConfig, Api, CodePage, ColumnDefinition, ColumnType, CommitFlags, DbId,
    IndexDefinition, IndexFlags, IndexSegment, Instance, ObjectFlags, Prep, Session, TableId,
};
use std::sync::Arc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

#[test]
fn schema_round_trip_through_the_facade() {
    init_tracing();
    let stub = Arc::new(StubEngine::with_build(7601));
    let api = Api::new(stub.clone(), &AdapterConfig::default()).unwrap();
    assert!(api.capabilities().windows7_features);

    let mut instance = Instance::NIL;
    let mut sesid = Session::NIL;
    let mut dbid = DbId::NIL;
    api.create_instance(&mut instance, "e2e").unwrap();
    api.init(&mut instance).unwrap();
    api.begin_session(instance, &mut sesid, "", "").unwrap();
    api.create_database(sesid, "e2e.edb", &mut dbid, Default::default())
        .unwrap();

    let mut columns = vec![
        ColumnDefinition::new("id", ColumnType::Long),
        ColumnDefinition::new("name", ColumnType::Text).with_codepage(CodePage::Unicode),
    ];
    let indexes = [IndexDefinition::new("primary", vec![IndexSegment::ascending("id")])
        .with_flags(IndexFlags::PRIMARY)];
    let mut tableid = TableId::NIL;

    api.begin_transaction(sesid).unwrap();
    let status = api
        .create_table_column_index(sesid, dbid, "people", 0, 0, &mut columns, &indexes, &mut tableid)
        .unwrap();
    assert!(status.is_success());

    api.prepare_update(sesid, tableid, Prep::Insert).unwrap();
    api.set_column(sesid, tableid, columns[0].columnid, Some(&7u32.to_le_bytes()[..]), 4, Default::default())
        .unwrap();
    let mut actual = 0;
    api.update(sesid, tableid, None, 0, &mut actual).unwrap();
    assert!(api
        .commit_transaction(sesid, CommitFlags::empty())
        .unwrap()
        .is_success());
    assert_eq!(stub.table_rows("people").unwrap().len(), 1);

    stub.stage_columns(columns.clone());
    let read: Vec<ColumnDefinition> = api
        .columns(sesid, tableid)
        .unwrap()
        .collect::<isam::Result<_>>()
        .unwrap();
    assert_eq!(read, columns);

    stub.stage_objects(vec![
        isam::testing::ObjectRow::table("people"),
        isam::testing::ObjectRow {
            flags: ObjectFlags::SYSTEM.bits(),
            ..isam::testing::ObjectRow::table("MSysObjects")
        },
    ]);
    let names: Vec<String> = api
        .table_names(sesid, dbid)
        .unwrap()
        .collect::<isam::Result<_>>()
        .unwrap();
    assert_eq!(names, vec!["people"]);

    api.close_table(sesid, tableid).unwrap();
    api.end_session(sesid).unwrap();
    api.term(instance).unwrap();
    assert_eq!(stub.open_cursors(), 0);
    assert_eq!(stub.live_sessions(), 0);
    assert_eq!(stub.live_instances(), 0);
}
