//! Index enumeration
//!
//! The index list has one row per key segment, not per index. The first row
//! of an index carries the segment count K; that row and the K - 1 rows
//! after it are folded into one [`IndexInfo`]. Each row numbers its segment
//! with `i_column`, which must match its position in the run.

use super::cursor::MetaCursor;
use super::lists::IndexListLayout;
use isam_core::{
    CodePage, ColumnType, ComparePolicy, Error, IndexFlags, IndexInfo, IndexSegment, Result,
};
use isam_native::records::KEY_DESCENDING;

/// Lazily decoded indexes of a table.
pub struct Indexes<'a> {
    cursor: MetaCursor<'a>,
    layout: IndexListLayout,
}

impl<'a> Indexes<'a> {
    pub(crate) fn new(cursor: MetaCursor<'a>, layout: IndexListLayout) -> Self {
        Indexes { cursor, layout }
    }

    /// The underlying cursor
    pub fn cursor(&self) -> &MetaCursor<'a> {
        &self.cursor
    }
}

fn read_segment(cursor: &MetaCursor<'_>, layout: &IndexListLayout) -> Result<IndexSegment> {
    Ok(IndexSegment {
        column_name: cursor.read_text(layout.column_name)?,
        column_type: ColumnType::from_raw(cursor.read_u32(layout.coltyp)?)?,
        ascending: cursor.read_u32(layout.grbit_column)? & KEY_DESCENDING == 0,
        is_ascii: cursor.read_u32(layout.cp)? == u32::from(CodePage::Ascii.raw()),
    })
}

fn read_index(cursor: &mut MetaCursor<'_>, layout: &IndexListLayout) -> Result<IndexInfo> {
    let name = cursor.read_text(layout.index_name)?;
    let count = cursor.read_u32(layout.c_column)?;
    if count == 0 {
        return Err(Error::Corruption(format!(
            "index `{name}` declares no key segments"
        )));
    }

    let mut info = IndexInfo {
        compare: ComparePolicy::from_native(
            cursor.read_u32(layout.langid)?,
            cursor.read_u32(layout.lc_map_flags)?,
        ),
        segments: Vec::new(),
        flags: IndexFlags::from_bits_truncate(cursor.read_u32(layout.grbit_index)?),
        unique_keys: cursor.read_u32(layout.c_key)?,
        entries: cursor.read_u32(layout.c_entry)?,
        pages: cursor.read_u32(layout.c_page)?,
        name,
    };

    for position in 0..count {
        if position > 0 && !cursor.advance()? {
            return Err(Error::Corruption(format!(
                "index `{}` ends after {position} of {count} key segments",
                info.name
            )));
        }
        let ordinal = cursor.read_u32(layout.i_column)?;
        if ordinal != position {
            return Err(Error::Corruption(format!(
                "index `{}`: key segment {position} is numbered {ordinal}",
                info.name
            )));
        }
        info.segments.push(read_segment(cursor, layout)?);
    }
    Ok(info)
}

impl Iterator for Indexes<'_> {
    type Item = Result<IndexInfo>;

    fn next(&mut self) -> Option<Self::Item> {
        let layout = self.layout;
        self.cursor.next_item(|cursor| read_index(cursor, &layout))
    }
}
