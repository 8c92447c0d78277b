//! Temporary cursors returned by the introspection calls
//!
//! Each list call opens a cursor over a result set and describes its layout:
//! which columnid holds which field. The columnids are only valid for that
//! cursor and are captured here once.

use isam_core::{ColumnId, TableId};
use isam_native::{NativeColumnList, NativeIndexList, NativeObjectList};

/// An open result-set cursor and its self-described layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TempCursor<L> {
    /// Cursor to read and eventually close
    pub tableid: TableId,
    /// Row count reported by the engine
    pub records: u32,
    /// Where each field lives
    pub layout: L,
}

/// Field columnids of a column-list cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnListLayout {
    pub column_name: ColumnId,
    pub columnid: ColumnId,
    pub coltyp: ColumnId,
    pub cp: ColumnId,
    pub cb_max: ColumnId,
    pub grbit: ColumnId,
    pub default: ColumnId,
}

/// Field columnids of an index-list cursor.
///
/// One row per key segment; the index-level fields repeat on every row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexListLayout {
    pub index_name: ColumnId,
    pub grbit_index: ColumnId,
    pub c_key: ColumnId,
    pub c_entry: ColumnId,
    pub c_page: ColumnId,
    pub c_column: ColumnId,
    pub i_column: ColumnId,
    pub coltyp: ColumnId,
    pub cp: ColumnId,
    pub grbit_column: ColumnId,
    pub column_name: ColumnId,
    pub langid: ColumnId,
    pub lc_map_flags: ColumnId,
}

/// Field columnids of an object-list cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectListLayout {
    pub object_name: ColumnId,
    pub objtyp: ColumnId,
    pub flags: ColumnId,
}

impl From<&NativeColumnList> for TempCursor<ColumnListLayout> {
    fn from(list: &NativeColumnList) -> Self {
        TempCursor {
            tableid: TableId::from_raw(list.tableid),
            records: list.c_record,
            layout: ColumnListLayout {
                column_name: ColumnId::from_raw(list.columnid_column_name),
                columnid: ColumnId::from_raw(list.columnid_columnid),
                coltyp: ColumnId::from_raw(list.columnid_coltyp),
                cp: ColumnId::from_raw(list.columnid_cp),
                cb_max: ColumnId::from_raw(list.columnid_cb_max),
                grbit: ColumnId::from_raw(list.columnid_grbit),
                default: ColumnId::from_raw(list.columnid_default),
            },
        }
    }
}

impl From<&NativeIndexList> for TempCursor<IndexListLayout> {
    fn from(list: &NativeIndexList) -> Self {
        TempCursor {
            tableid: TableId::from_raw(list.tableid),
            records: list.c_record,
            layout: IndexListLayout {
                index_name: ColumnId::from_raw(list.columnid_index_name),
                grbit_index: ColumnId::from_raw(list.columnid_grbit_index),
                c_key: ColumnId::from_raw(list.columnid_c_key),
                c_entry: ColumnId::from_raw(list.columnid_c_entry),
                c_page: ColumnId::from_raw(list.columnid_c_page),
                c_column: ColumnId::from_raw(list.columnid_c_column),
                i_column: ColumnId::from_raw(list.columnid_i_column),
                coltyp: ColumnId::from_raw(list.columnid_coltyp),
                cp: ColumnId::from_raw(list.columnid_cp),
                grbit_column: ColumnId::from_raw(list.columnid_grbit_column),
                column_name: ColumnId::from_raw(list.columnid_column_name),
                langid: ColumnId::from_raw(list.columnid_langid),
                lc_map_flags: ColumnId::from_raw(list.columnid_lc_map_flags),
            },
        }
    }
}

impl From<&NativeObjectList> for TempCursor<ObjectListLayout> {
    fn from(list: &NativeObjectList) -> Self {
        TempCursor {
            tableid: TableId::from_raw(list.tableid),
            records: list.c_record,
            layout: ObjectListLayout {
                object_name: ColumnId::from_raw(list.columnid_object_name),
                objtyp: ColumnId::from_raw(list.columnid_objtyp),
                flags: ColumnId::from_raw(list.columnid_flags),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_layout_is_captured_by_field() {
        let native = NativeColumnList {
            tableid: 0x77,
            c_record: 3,
            columnid_column_name: 11,
            columnid_columnid: 12,
            columnid_default: 99,
            ..Default::default()
        };
        let cursor = TempCursor::from(&native);
        assert_eq!(cursor.tableid, TableId::from_raw(0x77));
        assert_eq!(cursor.records, 3);
        assert_eq!(cursor.layout.column_name.raw(), 11);
        assert_eq!(cursor.layout.columnid.raw(), 12);
        assert_eq!(cursor.layout.default.raw(), 99);
    }

    #[test]
    fn default_cursor_is_nil() {
        let cursor = TempCursor::<ObjectListLayout>::default();
        assert!(cursor.tableid.is_nil());
        assert_eq!(cursor.records, 0);
    }
}
