//! Introspection calls returning temporary cursors
//!
//! Each call opens a result set the caller must close with
//! [`Api::close_table`]. The enumerators in [`crate::meta`] wrap these and
//! take care of that.

use super::{Api, NativeText};
use crate::meta::{ColumnListLayout, IndexListLayout, ObjectListLayout, TempCursor};
use isam_core::{DbId, ObjectType, Result, Session, Status, TableId};
use isam_native::{chars, marshal};
use isam_native::{NativeColumnList, NativeIndexList, NativeObjectList, NativeRecord};

fn stamped<T: NativeRecord + Default>() -> T {
    let mut record = T::default();
    record.stamp();
    record
}

impl Api {
    /// List the columns of an open table.
    pub fn get_table_column_info_list(
        &self,
        sesid: Session,
        tableid: TableId,
        list: &mut TempCursor<ColumnListLayout>,
    ) -> Result<Status> {
        let mut native: NativeColumnList = stamped();
        let code = if self.wide() {
            self.engine()
                .get_table_column_info_list_w(sesid.raw(), tableid.raw(), &mut native)
        } else {
            self.engine()
                .get_table_column_info_list_a(sesid.raw(), tableid.raw(), &mut native)
        };
        let status = self.finish("JetGetTableColumnInfo", code)?;
        if !status.is_error() {
            *list = TempCursor::from(&native);
        }
        Ok(status)
    }

    /// List the columns of a table by name.
    pub fn get_column_info_list(
        &self,
        sesid: Session,
        dbid: DbId,
        table: &str,
        list: &mut TempCursor<ColumnListLayout>,
    ) -> Result<Status> {
        let table = self.object_name(table, "table")?;
        let mut native: NativeColumnList = stamped();
        let code = match &table {
            NativeText::Ansi(t) => {
                self.engine()
                    .get_column_info_list_a(sesid.raw(), dbid.raw(), t, &mut native)
            }
            NativeText::Wide(t) => {
                self.engine()
                    .get_column_info_list_w(sesid.raw(), dbid.raw(), t, &mut native)
            }
        };
        let status = self.finish("JetGetColumnInfo", code)?;
        if !status.is_error() {
            *list = TempCursor::from(&native);
        }
        Ok(status)
    }

    /// List the indexes of an open table, or one index when `index` is given.
    pub fn get_table_index_info_list(
        &self,
        sesid: Session,
        tableid: TableId,
        index: Option<&str>,
        list: &mut TempCursor<IndexListLayout>,
    ) -> Result<Status> {
        let mut native: NativeIndexList = stamped();
        let code = match self.optional_text(index, "index")? {
            None if self.wide() => self.engine().get_table_index_info_list_w(
                sesid.raw(),
                tableid.raw(),
                None,
                &mut native,
            ),
            None => self.engine().get_table_index_info_list_a(
                sesid.raw(),
                tableid.raw(),
                None,
                &mut native,
            ),
            Some(NativeText::Ansi(i)) => self.engine().get_table_index_info_list_a(
                sesid.raw(),
                tableid.raw(),
                Some(i.as_c_str()),
                &mut native,
            ),
            Some(NativeText::Wide(i)) => self.engine().get_table_index_info_list_w(
                sesid.raw(),
                tableid.raw(),
                Some(i.as_slice()),
                &mut native,
            ),
        };
        let status = self.finish("JetGetTableIndexInfo", code)?;
        if !status.is_error() {
            *list = TempCursor::from(&native);
        }
        Ok(status)
    }

    /// List the indexes of a table by name.
    pub fn get_index_info_list(
        &self,
        sesid: Session,
        dbid: DbId,
        table: &str,
        index: Option<&str>,
        list: &mut TempCursor<IndexListLayout>,
    ) -> Result<Status> {
        marshal::check_name(table, "table")?;
        let mut native: NativeIndexList = stamped();
        let code = if self.wide() {
            let table = chars::wide(table, "table")?;
            let index = index.map(|i| chars::wide(i, "index")).transpose()?;
            self.engine().get_index_info_list_w(
                sesid.raw(),
                dbid.raw(),
                &table,
                index.as_deref(),
                &mut native,
            )
        } else {
            let table = chars::ansi(table, "table")?;
            let index = index.map(|i| chars::ansi(i, "index")).transpose()?;
            self.engine().get_index_info_list_a(
                sesid.raw(),
                dbid.raw(),
                &table,
                index.as_deref(),
                &mut native,
            )
        };
        let status = self.finish("JetGetIndexInfo", code)?;
        if !status.is_error() {
            *list = TempCursor::from(&native);
        }
        Ok(status)
    }

    /// List catalog objects of a type; `ObjectType::Nil` lists every type.
    pub fn get_object_info_list(
        &self,
        sesid: Session,
        dbid: DbId,
        objtyp: ObjectType,
        list: &mut TempCursor<ObjectListLayout>,
    ) -> Result<Status> {
        let mut native: NativeObjectList = stamped();
        let code = if self.wide() {
            self.engine()
                .get_object_info_list_w(sesid.raw(), dbid.raw(), objtyp.raw(), &mut native)
        } else {
            self.engine()
                .get_object_info_list_a(sesid.raw(), dbid.raw(), objtyp.raw(), &mut native)
        };
        let status = self.finish("JetGetObjectInfo", code)?;
        if !status.is_error() {
            *list = TempCursor::from(&native);
        }
        Ok(status)
    }
}
