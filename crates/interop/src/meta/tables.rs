//! Table-name enumeration

use super::cursor::MetaCursor;
use super::lists::ObjectListLayout;
use isam_core::{ObjectFlags, Result};

/// Lazily decoded names of the user tables in a database.
///
/// Engine-owned tables are skipped.
pub struct TableNames<'a> {
    cursor: MetaCursor<'a>,
    layout: ObjectListLayout,
}

impl<'a> TableNames<'a> {
    pub(crate) fn new(cursor: MetaCursor<'a>, layout: ObjectListLayout) -> Self {
        TableNames { cursor, layout }
    }

    /// The underlying cursor
    pub fn cursor(&self) -> &MetaCursor<'a> {
        &self.cursor
    }
}

impl Iterator for TableNames<'_> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let layout = self.layout;
        loop {
            let row = self.cursor.next_item(|cursor| {
                let flags = ObjectFlags::from_bits_truncate(cursor.read_u32(layout.flags)?);
                let name = cursor.read_text(layout.object_name)?;
                Ok((name, flags))
            })?;
            match row {
                Ok((_, flags)) if flags.contains(ObjectFlags::SYSTEM) => continue,
                Ok((name, _)) => return Some(Ok(name)),
                Err(err) => return Some(Err(err)),
            }
        }
    }
}
