//! Native record layouts
//!
//! Every record the engine fills or reads carries its own declared size in
//! `cb_struct`. It must be stamped with the record's true size before the
//! record crosses the boundary; the engine uses it to detect version skew.
//!
//! Records generic over `C` exist in an ANSI (`c_char`) and a wide (`u16`)
//! form that differ only in the type of their string pointers.

use std::ffi::c_void;
use std::mem;
use std::ptr;

/// Information levels for the metadata entry points.
pub mod info_level {
    /// Single column definition
    pub const COL_INFO: u32 = 0;
    /// Column list cursor
    pub const COL_INFO_LIST: u32 = 1;
    /// Index list cursor
    pub const IDX_INFO_LIST: u32 = 1;
    /// Object list cursor without statistics
    pub const OBJ_INFO_LIST_NO_STATS: u32 = 1;
}

/// System parameter identifiers used by the capability probe.
pub mod param {
    /// Maximum concurrent temporary tables
    pub const MAX_TEMPORARY_TABLES: u32 = 10;
    /// Crash recovery on/off (string parameter)
    pub const RECOVERY: u32 = 34;
    /// Suppress informational event log entries
    pub const NO_INFORMATION_EVENT: u32 = 112;
}

/// `grbit` bit: `locale` points at a [`NativeUnicodeIndex`]
pub const INDEX_UNICODE: u32 = 0x0000_0800;

/// `grbit` bit: `cb_key_most` is meaningful
pub const INDEX_KEY_MOST: u32 = 0x0000_8000;

/// Index-list `grbitColumn` bit for a descending key segment
pub const KEY_DESCENDING: u32 = 0x0000_0001;

/// A record whose first field is its own declared size.
pub trait NativeRecord {
    /// True size of the record
    const SIZE: u32;

    /// Size currently declared in the record
    fn declared_size(&self) -> u32;

    /// Write the true size into the record
    fn stamp(&mut self);

    /// Whether the declared size matches the true size
    fn is_stamped(&self) -> bool {
        self.declared_size() == Self::SIZE
    }
}

macro_rules! native_record {
    ($name:ident $(<$g:ident>)?) => {
        impl$(<$g>)? NativeRecord for $name$(<$g>)? {
            const SIZE: u32 = mem::size_of::<Self>() as u32;

            fn declared_size(&self) -> u32 {
                self.cb_struct
            }

            fn stamp(&mut self) {
                self.cb_struct = Self::SIZE;
            }
        }
    };
}

/// `JET_COLUMNDEF`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NativeColumnDef {
    /// Declared size
    pub cb_struct: u32,
    /// Column id
    pub columnid: u32,
    /// Column type
    pub coltyp: u32,
    /// Unused
    pub country: u16,
    /// Unused
    pub langid: u16,
    /// Code page
    pub cp: u16,
    /// Unused
    pub collate: u16,
    /// Maximum length
    pub cb_max: u32,
    /// Column flags
    pub grbit: u32,
}

native_record!(NativeColumnDef);

/// `JET_UNICODEINDEX`: locale plus normalization flags
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NativeUnicodeIndex {
    /// Locale identifier
    pub lcid: u32,
    /// `LCMAP` flags
    pub map_flags: u32,
}

/// `JET_COLUMNCREATE`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct NativeColumnCreate<C> {
    /// Declared size
    pub cb_struct: u32,
    /// NUL-terminated column name
    pub column_name: *const C,
    /// Column type
    pub coltyp: u32,
    /// Maximum length
    pub cb_max: u32,
    /// Column flags
    pub grbit: u32,
    /// Default value, null when absent
    pub default: *const c_void,
    /// Default value length
    pub cb_default: u32,
    /// Code page
    pub cp: u32,
    /// Written by the engine
    pub columnid: u32,
    /// Written by the engine
    pub err: i32,
}

native_record!(NativeColumnCreate<C>);

impl<C> Default for NativeColumnCreate<C> {
    fn default() -> Self {
        NativeColumnCreate {
            cb_struct: 0,
            column_name: ptr::null(),
            coltyp: 0,
            cb_max: 0,
            grbit: 0,
            default: ptr::null(),
            cb_default: 0,
            cp: 0,
            columnid: 0,
            err: 0,
        }
    }
}

/// `JET_INDEXCREATE` without the key-length field (legacy layout)
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct NativeIndexCreate<C> {
    /// Declared size
    pub cb_struct: u32,
    /// NUL-terminated index name
    pub index_name: *const C,
    /// Double-NUL-terminated key description
    pub key: *const C,
    /// Key description length in bytes, terminators included
    pub cb_key: u32,
    /// Index flags
    pub grbit: u32,
    /// Page density percentage
    pub density: u32,
    /// Locale id, or a `*mut NativeUnicodeIndex` when `grbit` has [`INDEX_UNICODE`]
    pub locale: usize,
    /// Unused
    pub cb_var_seg_mac: usize,
    /// Unused
    pub conditional_columns: *mut c_void,
    /// Unused
    pub c_conditional_column: u32,
    /// Written by the engine
    pub err: i32,
}

native_record!(NativeIndexCreate<C>);

impl<C> Default for NativeIndexCreate<C> {
    fn default() -> Self {
        NativeIndexCreate {
            cb_struct: 0,
            index_name: ptr::null(),
            key: ptr::null(),
            cb_key: 0,
            grbit: 0,
            density: 0,
            locale: 0,
            cb_var_seg_mac: 0,
            conditional_columns: ptr::null_mut(),
            c_conditional_column: 0,
            err: 0,
        }
    }
}

/// `JET_INDEXCREATE` with the key-length field (Vista layout)
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct NativeIndexCreate1<C> {
    /// Legacy fields; `base.cb_struct` declares the size of this whole record
    pub base: NativeIndexCreate<C>,
    /// Maximum key length in bytes
    pub cb_key_most: u32,
}

impl<C> NativeRecord for NativeIndexCreate1<C> {
    const SIZE: u32 = mem::size_of::<Self>() as u32;

    fn declared_size(&self) -> u32 {
        self.base.cb_struct
    }

    fn stamp(&mut self) {
        self.base.cb_struct = Self::SIZE;
    }
}

impl<C> Default for NativeIndexCreate1<C> {
    fn default() -> Self {
        NativeIndexCreate1 {
            base: NativeIndexCreate::default(),
            cb_key_most: 0,
        }
    }
}

/// `JET_TABLECREATE`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct NativeTableCreate<C> {
    /// Declared size
    pub cb_struct: u32,
    /// NUL-terminated table name
    pub table_name: *const C,
    /// Unused
    pub template_table_name: *const C,
    /// Initial pages
    pub pages: u32,
    /// Page density percentage
    pub density: u32,
    /// Column records
    pub column_creates: *mut NativeColumnCreate<C>,
    /// Number of column records
    pub c_columns: u32,
    /// Index records, in the layout chosen for the call
    pub index_creates: *mut c_void,
    /// Number of index records
    pub c_indexes: u32,
    /// Table flags
    pub grbit: u32,
    /// Written by the engine
    pub tableid: usize,
    /// Written by the engine: number of objects created
    pub c_created: u32,
}

native_record!(NativeTableCreate<C>);

impl<C> Default for NativeTableCreate<C> {
    fn default() -> Self {
        NativeTableCreate {
            cb_struct: 0,
            table_name: ptr::null(),
            template_table_name: ptr::null(),
            pages: 0,
            density: 0,
            column_creates: ptr::null_mut(),
            c_columns: 0,
            index_creates: ptr::null_mut(),
            c_indexes: 0,
            grbit: 0,
            tableid: 0,
            c_created: 0,
        }
    }
}

/// `JET_COLUMNLIST`: layout of a column-list cursor
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NativeColumnList {
    /// Declared size
    pub cb_struct: u32,
    /// Result-set cursor
    pub tableid: usize,
    /// Row count
    pub c_record: u32,
    /// Presentation order field
    pub columnid_presentation_order: u32,
    /// Column name field
    pub columnid_column_name: u32,
    /// Column id field
    pub columnid_columnid: u32,
    /// Column type field
    pub columnid_coltyp: u32,
    /// Unused
    pub columnid_country: u32,
    /// Language id field
    pub columnid_langid: u32,
    /// Code page field
    pub columnid_cp: u32,
    /// Unused
    pub columnid_collate: u32,
    /// Maximum length field
    pub columnid_cb_max: u32,
    /// Column flags field
    pub columnid_grbit: u32,
    /// Default value field
    pub columnid_default: u32,
    /// Owning table name field
    pub columnid_base_table_name: u32,
    /// Base column name field
    pub columnid_base_column_name: u32,
    /// Definition name field
    pub columnid_definition_name: u32,
}

native_record!(NativeColumnList);

/// `JET_INDEXLIST`: layout of an index-list cursor
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NativeIndexList {
    /// Declared size
    pub cb_struct: u32,
    /// Result-set cursor
    pub tableid: usize,
    /// Row count, one per key segment
    pub c_record: u32,
    /// Index name field
    pub columnid_index_name: u32,
    /// Index flags field
    pub columnid_grbit_index: u32,
    /// Distinct key count field
    pub columnid_c_key: u32,
    /// Entry count field
    pub columnid_c_entry: u32,
    /// Page count field
    pub columnid_c_page: u32,
    /// Segment count field
    pub columnid_c_column: u32,
    /// Segment number field
    pub columnid_i_column: u32,
    /// Segment column id field
    pub columnid_columnid: u32,
    /// Segment column type field
    pub columnid_coltyp: u32,
    /// Unused
    pub columnid_country: u32,
    /// Language id field
    pub columnid_langid: u32,
    /// Segment code page field
    pub columnid_cp: u32,
    /// Unused
    pub columnid_collate: u32,
    /// Segment flags field
    pub columnid_grbit_column: u32,
    /// Segment column name field
    pub columnid_column_name: u32,
    /// Normalization flags field
    pub columnid_lc_map_flags: u32,
}

native_record!(NativeIndexList);

/// `JET_OBJECTLIST`: layout of an object-list cursor
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NativeObjectList {
    /// Declared size
    pub cb_struct: u32,
    /// Result-set cursor
    pub tableid: usize,
    /// Row count
    pub c_record: u32,
    /// Container name field
    pub columnid_container_name: u32,
    /// Object name field
    pub columnid_object_name: u32,
    /// Object type field
    pub columnid_objtyp: u32,
    /// Unused
    pub columnid_dt_create: u32,
    /// Unused
    pub columnid_dt_update: u32,
    /// Object grbit field
    pub columnid_grbit: u32,
    /// Object flags field
    pub columnid_flags: u32,
    /// Unused
    pub columnid_c_record: u32,
    /// Unused
    pub columnid_c_page: u32,
}

native_record!(NativeObjectList);

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::c_char;

    #[test]
    fn default_records_are_unstamped() {
        assert!(!NativeColumnDef::default().is_stamped());
        assert!(!NativeColumnList::default().is_stamped());
        assert!(!NativeIndexCreate1::<u16>::default().is_stamped());
    }

    #[test]
    fn stamp_writes_true_size() {
        let mut def = NativeColumnDef::default();
        def.stamp();
        assert_eq!(def.cb_struct as usize, mem::size_of::<NativeColumnDef>());
        assert!(def.is_stamped());
    }

    #[test]
    fn vista_layout_is_larger_and_stamps_through_base() {
        assert!(NativeIndexCreate1::<u16>::SIZE > NativeIndexCreate::<u16>::SIZE);

        let mut record = NativeIndexCreate1::<u16>::default();
        record.stamp();
        assert_eq!(record.base.cb_struct, NativeIndexCreate1::<u16>::SIZE);
    }

    #[test]
    fn string_width_does_not_change_layout() {
        assert_eq!(
            NativeColumnCreate::<c_char>::SIZE,
            NativeColumnCreate::<u16>::SIZE
        );
        assert_eq!(
            NativeTableCreate::<c_char>::SIZE,
            NativeTableCreate::<u16>::SIZE
        );
    }

    #[test]
    fn column_def_layout() {
        // 4 + 4 + 4 + 2 * 4 + 4 + 4
        assert_eq!(NativeColumnDef::SIZE, 28);
    }
}
