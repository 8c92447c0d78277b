//! Metadata enumeration
//!
//! Turns the introspection result sets into iterators of schema values.
//! Every enumerator owns its temporary cursor through a [`MetaCursor`] and
//! releases it exactly once: when the rows run out, on the first fault, or
//! when the iterator is dropped early. After a fault the iterator yields
//! that error once and then `None`.

mod columns;
mod cursor;
mod indexes;
mod lists;
mod tables;

pub use columns::Columns;
pub use cursor::{CursorState, MetaCursor};
pub use indexes::Indexes;
pub use lists::{ColumnListLayout, IndexListLayout, ObjectListLayout, TempCursor};
pub use tables::TableNames;

use crate::api::Api;
use isam_core::{DbId, Error, ObjectType, Result, Session, Status, TableId};

fn opened<L>(op: &'static str, status: Status, list: &TempCursor<L>) -> Result<()> {
    if status.is_error() {
        tracing::warn!(target: "isam::meta", op, code = status.code(), "Metadata list call failed");
        return Err(Error::Engine(status));
    }
    tracing::debug!(
        target: "isam::meta",
        op,
        tableid = %list.tableid,
        records = list.records,
        "Metadata result set opened"
    );
    Ok(())
}

impl Api {
    /// Columns of an open table.
    pub fn columns(&self, sesid: Session, tableid: TableId) -> Result<Columns<'_>> {
        let mut list = TempCursor::default();
        opened(
            "columns",
            self.get_table_column_info_list(sesid, tableid, &mut list)?,
            &list,
        )?;
        let cursor = MetaCursor::new(self, sesid, list.tableid);
        Ok(Columns::new(cursor, list.layout))
    }

    /// Columns of a table by name.
    pub fn columns_in(&self, sesid: Session, dbid: DbId, table: &str) -> Result<Columns<'_>> {
        let mut list = TempCursor::default();
        opened(
            "columns_in",
            self.get_column_info_list(sesid, dbid, table, &mut list)?,
            &list,
        )?;
        let cursor = MetaCursor::new(self, sesid, list.tableid);
        Ok(Columns::new(cursor, list.layout))
    }

    /// Indexes of an open table.
    pub fn indexes(&self, sesid: Session, tableid: TableId) -> Result<Indexes<'_>> {
        let mut list = TempCursor::default();
        opened(
            "indexes",
            self.get_table_index_info_list(sesid, tableid, None, &mut list)?,
            &list,
        )?;
        let cursor = MetaCursor::new(self, sesid, list.tableid);
        Ok(Indexes::new(cursor, list.layout))
    }

    /// Indexes of a table by name.
    pub fn indexes_in(&self, sesid: Session, dbid: DbId, table: &str) -> Result<Indexes<'_>> {
        let mut list = TempCursor::default();
        opened(
            "indexes_in",
            self.get_index_info_list(sesid, dbid, table, None, &mut list)?,
            &list,
        )?;
        let cursor = MetaCursor::new(self, sesid, list.tableid);
        Ok(Indexes::new(cursor, list.layout))
    }

    /// Names of the user tables in a database.
    pub fn table_names(&self, sesid: Session, dbid: DbId) -> Result<TableNames<'_>> {
        let mut list = TempCursor::default();
        opened(
            "table_names",
            self.get_object_info_list(sesid, dbid, ObjectType::Table, &mut list)?,
            &list,
        )?;
        let cursor = MetaCursor::new(self, sesid, list.tableid);
        Ok(TableNames::new(cursor, list.layout))
    }
}
