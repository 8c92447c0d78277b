//! Column enumeration: one row, one column

use super::cursor::MetaCursor;
use super::lists::ColumnListLayout;
use isam_core::{CodePage, ColumnDefinition, ColumnFlags, ColumnId, ColumnType, Result};

/// Lazily decoded columns of a table.
pub struct Columns<'a> {
    cursor: MetaCursor<'a>,
    layout: ColumnListLayout,
}

impl<'a> Columns<'a> {
    pub(crate) fn new(cursor: MetaCursor<'a>, layout: ColumnListLayout) -> Self {
        Columns { cursor, layout }
    }

    /// The underlying cursor
    pub fn cursor(&self) -> &MetaCursor<'a> {
        &self.cursor
    }
}

fn read_column(cursor: &mut MetaCursor<'_>, layout: &ColumnListLayout) -> Result<ColumnDefinition> {
    Ok(ColumnDefinition {
        name: cursor.read_text(layout.column_name)?,
        columnid: ColumnId::from_raw(cursor.read_u32(layout.columnid)?),
        column_type: ColumnType::from_raw(cursor.read_u32(layout.coltyp)?)?,
        codepage: CodePage::from_raw(cursor.read_u32(layout.cp)? as u16),
        max_length: cursor.read_u32(layout.cb_max)?,
        default_value: cursor.retrieve(layout.default)?.unwrap_or_default(),
        flags: ColumnFlags::from_bits_truncate(cursor.read_u32(layout.grbit)?),
    })
}

impl Iterator for Columns<'_> {
    type Item = Result<ColumnDefinition>;

    fn next(&mut self) -> Option<Self::Item> {
        let layout = self.layout;
        self.cursor.next_item(|cursor| read_column(cursor, &layout))
    }
}
