//! Metadata result sets served by the stub
//!
//! Rows are maps from columnid to the raw bytes a retrieve returns. Text is
//! ANSI or UTF-16LE depending on which variant of the list call opened the
//! cursor. Layout columnids are deliberately unlike small ordinals so a
//! decoder that hardcodes positions fails loudly.

use crate::chars::NativeChar;
use crate::records::{
    NativeColumnList, NativeIndexList, NativeObjectList, NativeRecord, KEY_DESCENDING,
};
use byteorder::{ByteOrder, LittleEndian};
use isam_core::{CodePage, ColumnDefinition, IndexInfo, ObjectFlags, ObjectType};
use std::collections::HashMap;
use std::ffi::c_char;

/// One cursor row: columnid to raw value. Absent columns retrieve as null.
pub type Row = HashMap<u32, Vec<u8>>;

/// Column-list layout columnids
pub mod column_layout {
    pub const PRESENTATION_ORDER: u32 = 0x100;
    pub const COLUMN_NAME: u32 = 0x101;
    pub const COLUMNID: u32 = 0x102;
    pub const COLTYP: u32 = 0x103;
    pub const COUNTRY: u32 = 0x104;
    pub const LANGID: u32 = 0x105;
    pub const CP: u32 = 0x106;
    pub const COLLATE: u32 = 0x107;
    pub const CB_MAX: u32 = 0x108;
    pub const GRBIT: u32 = 0x109;
    pub const DEFAULT: u32 = 0x10A;
    pub const BASE_TABLE_NAME: u32 = 0x10B;
    pub const BASE_COLUMN_NAME: u32 = 0x10C;
    pub const DEFINITION_NAME: u32 = 0x10D;
}

/// Index-list layout columnids
pub mod index_layout {
    pub const INDEX_NAME: u32 = 0x200;
    pub const GRBIT_INDEX: u32 = 0x201;
    pub const C_KEY: u32 = 0x202;
    pub const C_ENTRY: u32 = 0x203;
    pub const C_PAGE: u32 = 0x204;
    pub const C_COLUMN: u32 = 0x205;
    pub const I_COLUMN: u32 = 0x206;
    pub const COLUMNID: u32 = 0x207;
    pub const COLTYP: u32 = 0x208;
    pub const COUNTRY: u32 = 0x209;
    pub const LANGID: u32 = 0x20A;
    pub const CP: u32 = 0x20B;
    pub const COLLATE: u32 = 0x20C;
    pub const GRBIT_COLUMN: u32 = 0x20D;
    pub const COLUMN_NAME: u32 = 0x20E;
    pub const LC_MAP_FLAGS: u32 = 0x20F;
}

/// Object-list layout columnids
pub mod object_layout {
    pub const CONTAINER_NAME: u32 = 0x300;
    pub const OBJECT_NAME: u32 = 0x301;
    pub const OBJTYP: u32 = 0x302;
    pub const DT_CREATE: u32 = 0x303;
    pub const DT_UPDATE: u32 = 0x304;
    pub const GRBIT: u32 = 0x305;
    pub const FLAGS: u32 = 0x306;
    pub const C_RECORD: u32 = 0x307;
    pub const C_PAGE: u32 = 0x308;
}

/// One physical row of an index-list result set.
///
/// A logical index with K key segments spans K rows that repeat the index
/// fields and number the segments with `i_column`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexRow {
    pub index_name: String,
    pub grbit_index: u32,
    pub c_key: u32,
    pub c_entry: u32,
    pub c_page: u32,
    pub c_column: u32,
    pub i_column: u32,
    pub columnid: u32,
    pub coltyp: u32,
    pub langid: u16,
    pub cp: u16,
    pub grbit_column: u32,
    pub column_name: String,
    pub lc_map_flags: u32,
}

impl IndexRow {
    /// The rows the engine produces for one index.
    pub fn expand(info: &IndexInfo) -> Vec<IndexRow> {
        let count = info.segments.len() as u32;
        info.segments
            .iter()
            .enumerate()
            .map(|(i, segment)| IndexRow {
                index_name: info.name.clone(),
                grbit_index: info.flags.bits(),
                c_key: info.unique_keys,
                c_entry: info.entries,
                c_page: info.pages,
                c_column: count,
                i_column: i as u32,
                columnid: 0x40 + i as u32,
                coltyp: segment.column_type.raw(),
                langid: info.compare.locale_id as u16,
                cp: if segment.is_ascii {
                    CodePage::Ascii.raw()
                } else if segment.column_type.is_textual() {
                    CodePage::Unicode.raw()
                } else {
                    CodePage::None.raw()
                },
                grbit_column: if segment.ascending { 0 } else { KEY_DESCENDING },
                column_name: segment.column_name.clone(),
                lc_map_flags: info.compare.map_flags(),
            })
            .collect()
    }
}

/// One row of an object-list result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRow {
    /// Object name
    pub name: String,
    /// Native object type
    pub objtyp: u32,
    /// Object flags
    pub flags: u32,
}

impl ObjectRow {
    /// A user table
    pub fn table(name: impl Into<String>) -> Self {
        ObjectRow {
            name: name.into(),
            objtyp: ObjectType::Table.raw(),
            flags: 0,
        }
    }

    /// An engine-internal table
    pub fn system_table(name: impl Into<String>) -> Self {
        ObjectRow {
            flags: ObjectFlags::SYSTEM.bits(),
            ..ObjectRow::table(name)
        }
    }
}

pub(crate) fn text(wide: bool, value: &str) -> Vec<u8> {
    if wide {
        value.encode_utf16().flat_map(u16::to_le_bytes).collect()
    } else {
        <c_char as NativeChar>::encode(value)
            .into_iter()
            .map(|u| u as u8)
            .collect()
    }
}

pub(crate) fn le16(value: u16) -> Vec<u8> {
    let mut buf = vec![0; 2];
    LittleEndian::write_u16(&mut buf, value);
    buf
}

pub(crate) fn le32(value: u32) -> Vec<u8> {
    let mut buf = vec![0; 4];
    LittleEndian::write_u32(&mut buf, value);
    buf
}

pub(crate) fn column_rows(columns: &[ColumnDefinition], wide: bool) -> Vec<Row> {
    use column_layout::*;
    columns
        .iter()
        .enumerate()
        .map(|(i, def)| {
            let mut row = Row::new();
            row.insert(PRESENTATION_ORDER, le32(i as u32));
            row.insert(COLUMN_NAME, text(wide, &def.name));
            row.insert(COLUMNID, le32(def.columnid.raw()));
            row.insert(COLTYP, le32(def.column_type.raw()));
            row.insert(CP, le16(def.codepage.raw()));
            row.insert(CB_MAX, le32(def.max_length));
            row.insert(GRBIT, le32(def.flags.bits()));
            if !def.default_value.is_empty() {
                row.insert(DEFAULT, def.default_value.clone());
            }
            row
        })
        .collect()
}

pub(crate) fn index_rows(rows: &[IndexRow], wide: bool) -> Vec<Row> {
    use index_layout::*;
    rows.iter()
        .map(|r| {
            let mut row = Row::new();
            row.insert(INDEX_NAME, text(wide, &r.index_name));
            row.insert(GRBIT_INDEX, le32(r.grbit_index));
            row.insert(C_KEY, le32(r.c_key));
            row.insert(C_ENTRY, le32(r.c_entry));
            row.insert(C_PAGE, le32(r.c_page));
            row.insert(C_COLUMN, le32(r.c_column));
            row.insert(I_COLUMN, le32(r.i_column));
            row.insert(COLUMNID, le32(r.columnid));
            row.insert(COLTYP, le32(r.coltyp));
            row.insert(LANGID, le16(r.langid));
            row.insert(CP, le16(r.cp));
            row.insert(GRBIT_COLUMN, le32(r.grbit_column));
            row.insert(COLUMN_NAME, text(wide, &r.column_name));
            row.insert(LC_MAP_FLAGS, le32(r.lc_map_flags));
            row
        })
        .collect()
}

pub(crate) fn object_rows(rows: &[ObjectRow], objtyp: u32, wide: bool) -> Vec<Row> {
    use object_layout::*;
    rows.iter()
        .filter(|r| objtyp == ObjectType::Nil.raw() || r.objtyp == objtyp)
        .map(|r| {
            let mut row = Row::new();
            row.insert(CONTAINER_NAME, text(wide, "Tables"));
            row.insert(OBJECT_NAME, text(wide, &r.name));
            row.insert(OBJTYP, le16(r.objtyp as u16));
            row.insert(GRBIT, le32(0));
            row.insert(FLAGS, le32(r.flags));
            row
        })
        .collect()
}

pub(crate) fn column_list(tableid: usize, rows: usize) -> NativeColumnList {
    use column_layout::*;
    let mut list = NativeColumnList {
        tableid,
        c_record: rows as u32,
        columnid_presentation_order: PRESENTATION_ORDER,
        columnid_column_name: COLUMN_NAME,
        columnid_columnid: COLUMNID,
        columnid_coltyp: COLTYP,
        columnid_country: COUNTRY,
        columnid_langid: LANGID,
        columnid_cp: CP,
        columnid_collate: COLLATE,
        columnid_cb_max: CB_MAX,
        columnid_grbit: GRBIT,
        columnid_default: DEFAULT,
        columnid_base_table_name: BASE_TABLE_NAME,
        columnid_base_column_name: BASE_COLUMN_NAME,
        columnid_definition_name: DEFINITION_NAME,
        ..Default::default()
    };
    list.stamp();
    list
}

pub(crate) fn index_list(tableid: usize, rows: usize) -> NativeIndexList {
    use index_layout::*;
    let mut list = NativeIndexList {
        tableid,
        c_record: rows as u32,
        columnid_index_name: INDEX_NAME,
        columnid_grbit_index: GRBIT_INDEX,
        columnid_c_key: C_KEY,
        columnid_c_entry: C_ENTRY,
        columnid_c_page: C_PAGE,
        columnid_c_column: C_COLUMN,
        columnid_i_column: I_COLUMN,
        columnid_columnid: COLUMNID,
        columnid_coltyp: COLTYP,
        columnid_country: COUNTRY,
        columnid_langid: LANGID,
        columnid_cp: CP,
        columnid_collate: COLLATE,
        columnid_grbit_column: GRBIT_COLUMN,
        columnid_column_name: COLUMN_NAME,
        columnid_lc_map_flags: LC_MAP_FLAGS,
        ..Default::default()
    };
    list.stamp();
    list
}

pub(crate) fn object_list(tableid: usize, rows: usize) -> NativeObjectList {
    use object_layout::*;
    let mut list = NativeObjectList {
        tableid,
        c_record: rows as u32,
        columnid_container_name: CONTAINER_NAME,
        columnid_object_name: OBJECT_NAME,
        columnid_objtyp: OBJTYP,
        columnid_dt_create: DT_CREATE,
        columnid_dt_update: DT_UPDATE,
        columnid_grbit: GRBIT,
        columnid_flags: FLAGS,
        columnid_c_record: C_RECORD,
        columnid_c_page: C_PAGE,
        ..Default::default()
    };
    list.stamp();
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use isam_core::{ColumnType, ComparePolicy, IndexFlags, IndexSegment};

    #[test]
    fn expand_numbers_segments() {
        let info = IndexInfo {
            name: "ix".into(),
            compare: ComparePolicy::default(),
            segments: vec![IndexSegment::ascending("a"), IndexSegment::descending("b")],
            flags: IndexFlags::UNIQUE,
            unique_keys: 3,
            entries: 4,
            pages: 1,
        };
        let rows = IndexRow::expand(&info);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.c_column == 2));
        assert_eq!(rows[1].i_column, 1);
        assert_eq!(rows[1].grbit_column, KEY_DESCENDING);
    }

    #[test]
    fn text_encodings() {
        assert_eq!(text(false, "ab"), b"ab");
        assert_eq!(text(true, "ab"), vec![b'a', 0, b'b', 0]);
    }

    #[test]
    fn empty_default_is_null() {
        let rows = column_rows(&[ColumnDefinition::new("c", ColumnType::Long)], true);
        assert!(!rows[0].contains_key(&column_layout::DEFAULT));
    }
}
