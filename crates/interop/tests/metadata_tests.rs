//! Metadata enumeration against the stub engine
//!
//! Every test checks the cursor-release invariant: the temporary cursor
//! behind an enumerator is closed exactly once, whether the rows run out,
//! a fault ends the enumeration or the iterator is dropped early.

mod common;

use common::{stub_api, DBID, LEGACY_BUILD, SESID, VISTA_BUILD};
use isam_core::{
    CodePage, ColumnDefinition, ColumnFlags, ColumnId, ColumnType, CompareOptions, ComparePolicy,
    Error, IndexFlags, IndexInfo, IndexSegment, TableId,
};
use isam_interop::{CursorState, MetaCursor, TempCursor};
use isam_native::testing::{IndexRow, ObjectRow, StubEngine};

const TABLE: TableId = TableId::from_raw(0x77);

// ============================================================================
// Test Helpers
// ============================================================================

fn column(name: &str, id: u32, column_type: ColumnType) -> ColumnDefinition {
    ColumnDefinition {
        columnid: ColumnId::from_raw(id),
        ..ColumnDefinition::new(name, column_type)
    }
}

fn text_segment(name: &str, ascending: bool, is_ascii: bool) -> IndexSegment {
    IndexSegment {
        column_name: name.to_string(),
        column_type: ColumnType::Text,
        ascending,
        is_ascii,
    }
}

fn index_info(name: &str, segments: Vec<IndexSegment>) -> IndexInfo {
    IndexInfo {
        name: name.to_string(),
        compare: ComparePolicy::default(),
        segments,
        flags: IndexFlags::empty(),
        unique_keys: 0,
        entries: 0,
        pages: 1,
    }
}

fn assert_closed_once(stub: &StubEngine) {
    assert_eq!(stub.closed_tables().len(), 1, "calls: {:?}", stub.calls());
    assert_eq!(stub.open_cursors(), 0);
}

// ============================================================================
// Columns
// ============================================================================

#[test]
fn empty_result_set_yields_nothing() {
    let (stub, api) = stub_api(VISTA_BUILD);

    let mut columns = api.columns(SESID, TABLE).unwrap();
    assert!(columns.next().is_none());
    assert!(columns.next().is_none());
    assert_eq!(columns.cursor().state(), CursorState::Closed);
    drop(columns);

    assert_closed_once(&stub);
}

#[test]
fn columns_round_trip_in_both_encodings() {
    for build in [LEGACY_BUILD, VISTA_BUILD] {
        let (stub, api) = stub_api(build);
        let staged = vec![
            column("id", 1, ColumnType::LongLong).with_flags(ColumnFlags::FIXED | ColumnFlags::AUTOINCREMENT),
            column("title", 0x100, ColumnType::Text)
                .with_codepage(CodePage::Unicode)
                .with_max_length(255)
                .with_default(vec![b'x'; 300]),
            column("flag", 0x101, ColumnType::Bit).with_flags(ColumnFlags::NOT_NULL),
        ];
        stub.stage_columns(staged.clone());

        let read: Vec<ColumnDefinition> = api
            .columns(SESID, TABLE)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(read, staged, "build {build}");
        assert_closed_once(&stub);
    }
}

#[test]
fn columns_by_table_name() {
    let (stub, api) = stub_api(LEGACY_BUILD);
    stub.stage_columns(vec![column("a", 1, ColumnType::Long)]);

    let names: Vec<String> = api
        .columns_in(SESID, DBID, "Orders")
        .unwrap()
        .map(|c| c.unwrap().name)
        .collect();

    assert_eq!(names, vec!["a"]);
    assert_eq!(stub.count("JetGetColumnInfoListA"), 1);
    assert_closed_once(&stub);
}

#[test]
fn early_drop_closes_once() {
    let (stub, api) = stub_api(VISTA_BUILD);
    stub.stage_columns(vec![
        column("a", 1, ColumnType::Long),
        column("b", 2, ColumnType::Long),
        column("c", 3, ColumnType::Long),
    ]);

    let mut columns = api.columns(SESID, TABLE).unwrap();
    assert_eq!(columns.next().unwrap().unwrap().name, "a");
    drop(columns);

    assert_closed_once(&stub);
}

#[test]
fn retrieve_fault_ends_the_enumeration() {
    let (stub, api) = stub_api(VISTA_BUILD);
    stub.stage_columns(vec![
        column("a", 1, ColumnType::Long),
        column("b", 2, ColumnType::Long),
        column("c", 3, ColumnType::Long),
    ]);
    // One row takes seven retrieves.
    stub.fail_retrieve_after(8, -1022);

    let mut columns = api.columns(SESID, TABLE).unwrap();
    assert_eq!(columns.next().unwrap().unwrap().name, "a");
    match columns.next() {
        Some(Err(Error::Engine(status))) => assert_eq!(status.code(), -1022),
        other => panic!("expected an engine error, got {other:?}"),
    }
    assert!(columns.next().is_none());
    assert_eq!(columns.cursor().state(), CursorState::Closed);
    drop(columns);

    assert_closed_once(&stub);
}

#[test]
fn failed_list_call_is_an_engine_error() {
    let (stub, api) = stub_api(VISTA_BUILD);
    stub.script("JetGetTableColumnInfoListW", -1310);

    match api.columns(SESID, TABLE) {
        Err(Error::Engine(status)) => assert_eq!(status.code(), -1310),
        Err(other) => panic!("unexpected error {other:?}"),
        Ok(_) => panic!("expected the list call to fail"),
    }
    assert!(stub.closed_tables().is_empty());
}

#[test]
fn failed_positioning_closes_the_cursor() {
    let (stub, api) = stub_api(VISTA_BUILD);
    stub.stage_columns(vec![column("a", 1, ColumnType::Long)]);
    stub.script("JetMove", -1);

    let mut columns = api.columns(SESID, TABLE).unwrap();
    assert!(matches!(columns.next(), Some(Err(Error::Engine(_)))));
    assert!(columns.next().is_none());
    drop(columns);

    assert_eq!(stub.count("JetMove"), 1);
    assert_closed_once(&stub);
}

// ============================================================================
// Indexes
// ============================================================================

#[test]
fn indexes_fold_segment_rows() {
    for build in [LEGACY_BUILD, VISTA_BUILD] {
        let (stub, api) = stub_api(build);
        let single = IndexInfo {
            flags: IndexFlags::PRIMARY | IndexFlags::UNIQUE,
            unique_keys: 10,
            entries: 10,
            ..index_info("primary", vec![IndexSegment {
                column_type: ColumnType::Long,
                ..IndexSegment::ascending("id")
            }])
        };
        let wide = IndexInfo {
            compare: ComparePolicy {
                locale_id: 1031,
                options: CompareOptions::IGNORE_CASE | CompareOptions::IGNORE_KANA_TYPE,
            },
            entries: 42,
            pages: 3,
            ..index_info(
                "by_address",
                vec![
                    text_segment("country", true, true),
                    text_segment("city", true, false),
                    text_segment("street", false, false),
                    text_segment("number", true, true),
                    text_segment("unit", false, true),
                ],
            )
        };
        stub.stage_indexes(&[single.clone(), wide.clone()]);

        let read: Vec<IndexInfo> = api
            .indexes(SESID, TABLE)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(read, vec![single, wide], "build {build}");
        assert_closed_once(&stub);
    }
}

#[test]
fn indexes_by_table_name() {
    let (stub, api) = stub_api(VISTA_BUILD);
    stub.stage_indexes(&[index_info("ix", vec![text_segment("a", true, false)])]);

    let read: Vec<IndexInfo> = api
        .indexes_in(SESID, DBID, "Orders")
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(read.len(), 1);
    assert_eq!(read[0].segments[0].column_name, "a");
    assert_eq!(stub.count("JetGetIndexInfoListW"), 1);
    assert_closed_once(&stub);
}

fn malformed_rows_are_corruption(rows: Vec<IndexRow>) {
    let (stub, api) = stub_api(VISTA_BUILD);
    stub.stage_index_rows(rows);

    let mut indexes = api.indexes(SESID, TABLE).unwrap();
    assert!(matches!(indexes.next(), Some(Err(Error::Corruption(_)))));
    assert!(indexes.next().is_none());
    drop(indexes);

    assert_closed_once(&stub);
}

#[test]
fn short_segment_run_is_corruption() {
    let mut rows = IndexRow::expand(&index_info(
        "ix",
        vec![
            text_segment("a", true, false),
            text_segment("b", true, false),
            text_segment("c", true, false),
        ],
    ));
    rows.truncate(2);
    malformed_rows_are_corruption(rows);
}

#[test]
fn misnumbered_segment_is_corruption() {
    let mut rows = IndexRow::expand(&index_info(
        "ix",
        vec![text_segment("a", true, false), text_segment("b", true, false)],
    ));
    rows[1].i_column = 2;
    malformed_rows_are_corruption(rows);
}

#[test]
fn index_without_segments_is_corruption() {
    malformed_rows_are_corruption(vec![IndexRow {
        index_name: "ix".to_string(),
        c_column: 0,
        ..IndexRow::default()
    }]);
}

// ============================================================================
// Table names
// ============================================================================

#[test]
fn table_names_skip_system_tables() {
    for build in [LEGACY_BUILD, VISTA_BUILD] {
        let (stub, api) = stub_api(build);
        stub.stage_objects(vec![
            ObjectRow::system_table("MSysObjects"),
            ObjectRow::table("Orders"),
            ObjectRow::system_table("MSysObjids"),
            ObjectRow::table("Lines"),
        ]);

        let names: Vec<String> = api
            .table_names(SESID, DBID)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(names, vec!["Orders", "Lines"]);
        assert_closed_once(&stub);
    }
}

#[test]
fn only_system_tables_yields_nothing() {
    let (stub, api) = stub_api(VISTA_BUILD);
    stub.stage_objects(vec![ObjectRow::system_table("MSysObjects")]);

    assert_eq!(api.table_names(SESID, DBID).unwrap().count(), 0);
    assert_closed_once(&stub);
}

// ============================================================================
// Cursor lifecycle
// ============================================================================

#[test]
fn cursor_state_transitions() {
    let (stub, api) = stub_api(VISTA_BUILD);
    stub.stage_columns(vec![column("a", 1, ColumnType::Long)]);

    let mut list = TempCursor::default();
    let status = api
        .get_table_column_info_list(SESID, TABLE, &mut list)
        .unwrap();
    assert!(status.is_success());
    assert_eq!(list.records, 1);

    let mut cursor = MetaCursor::new(&api, SESID, list.tableid);
    assert_eq!(cursor.state(), CursorState::Unopened);

    cursor.open().unwrap();
    assert_eq!(cursor.state(), CursorState::BeforeFirst);

    assert!(cursor.advance().unwrap());
    assert_eq!(cursor.state(), CursorState::OnRow);
    assert_eq!(cursor.read_text(list.layout.column_name).unwrap(), "a");
    assert_eq!(cursor.read_u32(list.layout.coltyp).unwrap(), ColumnType::Long.raw());
    assert_eq!(cursor.retrieve(list.layout.default).unwrap(), None);

    assert!(!cursor.advance().unwrap());
    assert_eq!(cursor.state(), CursorState::Closed);
    assert!(!cursor.advance().unwrap());

    cursor.close();
    drop(cursor);
    assert_eq!(stub.closed_tables(), vec![list.tableid.raw()]);
}

#[test]
fn unopened_cursor_is_still_closed_on_drop() {
    let (stub, api) = stub_api(LEGACY_BUILD);
    let mut list = TempCursor::default();
    api.get_table_column_info_list(SESID, TABLE, &mut list)
        .unwrap();

    drop(MetaCursor::new(&api, SESID, list.tableid));

    assert_eq!(stub.count("JetMove"), 0);
    assert_closed_once(&stub);
}

#[test]
fn oversized_field_is_rejected_before_growing_the_buffer() {
    let (stub, api) = stub_api(VISTA_BUILD);
    stub.stage_columns(vec![column("a", 1, ColumnType::Long)]);

    let mut list = TempCursor::default();
    api.get_table_column_info_list(SESID, TABLE, &mut list)
        .unwrap();
    let mut cursor = MetaCursor::new(&api, SESID, list.tableid);
    cursor.open().unwrap();
    assert!(cursor.advance().unwrap());

    stub.truncate_next_retrieve(u32::MAX);
    assert!(matches!(
        cursor.retrieve(list.layout.column_name),
        Err(Error::Decode(_))
    ));
    assert_eq!(cursor.read_text(list.layout.column_name).unwrap(), "a");

    drop(cursor);
    assert_closed_once(&stub);
}
