//! Tables, columns, indexes and temporary tables

use super::{checked_count, checked_u32, Api, IndexLayout, NativeText};
use isam_core::{
    ColumnDefinition, ColumnId, ComparePolicy, DbId, Error, IndexDefinition, OpenTableFlags,
    Result, Session, Status, TableId, TempTableFlags,
};
use isam_native::marshal::{self, TableCreate};
use isam_native::{NativeChar, NativeColumnDef, NativeEngine, NativeRecord, PinScope};
use std::ffi::c_char;

impl Api {
    /// Create an empty table and open a cursor on it.
    pub fn create_table(
        &self,
        sesid: Session,
        dbid: DbId,
        name: &str,
        pages: i32,
        density: i32,
        tableid: &mut TableId,
    ) -> Result<Status> {
        let name = self.object_name(name, "name")?;
        let pages = checked_u32(pages, "pages")?;
        let density = checked_u32(density, "density")?;
        let mut raw = 0;
        let code = match &name {
            NativeText::Ansi(n) => self.engine().create_table_a(
                sesid.raw(),
                dbid.raw(),
                n,
                pages,
                density,
                &mut raw,
            ),
            NativeText::Wide(n) => self.engine().create_table_w(
                sesid.raw(),
                dbid.raw(),
                n,
                pages,
                density,
                &mut raw,
            ),
        };
        *tableid = TableId::from_raw(raw);
        self.finish("JetCreateTable", code)
    }

    /// Open a cursor on an existing table.
    pub fn open_table(
        &self,
        sesid: Session,
        dbid: DbId,
        name: &str,
        grbit: OpenTableFlags,
        tableid: &mut TableId,
    ) -> Result<Status> {
        let name = self.object_name(name, "name")?;
        let mut raw = 0;
        let code = match &name {
            NativeText::Ansi(n) => {
                self.engine()
                    .open_table_a(sesid.raw(), dbid.raw(), n, grbit.bits(), &mut raw)
            }
            NativeText::Wide(n) => {
                self.engine()
                    .open_table_w(sesid.raw(), dbid.raw(), n, grbit.bits(), &mut raw)
            }
        };
        *tableid = TableId::from_raw(raw);
        self.finish("JetOpenTable", code)
    }

    /// Close a cursor.
    pub fn close_table(&self, sesid: Session, tableid: TableId) -> Result<Status> {
        self.finish(
            "JetCloseTable",
            self.engine().close_table(sesid.raw(), tableid.raw()),
        )
    }

    /// Delete a table.
    pub fn delete_table(&self, sesid: Session, dbid: DbId, name: &str) -> Result<Status> {
        let name = self.object_name(name, "name")?;
        let code = match &name {
            NativeText::Ansi(n) => self.engine().delete_table_a(sesid.raw(), dbid.raw(), n),
            NativeText::Wide(n) => self.engine().delete_table_w(sesid.raw(), dbid.raw(), n),
        };
        self.finish("JetDeleteTable", code)
    }

    /// Add a column to an open table.
    ///
    /// On success the engine-assigned column id is written back into `def`.
    pub fn add_column(
        &self,
        sesid: Session,
        tableid: TableId,
        def: &mut ColumnDefinition,
    ) -> Result<Status> {
        let name = self.object_name(&def.name, "def.name")?;
        let native = marshal::column_def(def);
        let mut columnid = 0;
        let code = match &name {
            NativeText::Ansi(n) => self.engine().add_column_a(
                sesid.raw(),
                tableid.raw(),
                n,
                &native,
                &def.default_value,
                &mut columnid,
            ),
            NativeText::Wide(n) => self.engine().add_column_w(
                sesid.raw(),
                tableid.raw(),
                n,
                &native,
                &def.default_value,
                &mut columnid,
            ),
        };
        let status = self.finish("JetAddColumn", code)?;
        if !status.is_error() {
            def.columnid = ColumnId::from_raw(columnid);
        }
        Ok(status)
    }

    /// Delete a column from an open table.
    pub fn delete_column(&self, sesid: Session, tableid: TableId, name: &str) -> Result<Status> {
        let name = self.object_name(name, "name")?;
        let code = match &name {
            NativeText::Ansi(n) => self.engine().delete_column_a(sesid.raw(), tableid.raw(), n),
            NativeText::Wide(n) => self.engine().delete_column_w(sesid.raw(), tableid.raw(), n),
        };
        self.finish("JetDeleteColumn", code)
    }

    /// Describe one column of an open table.
    ///
    /// `def` is overwritten only when the engine does not report an error.
    ///
    /// # Errors
    ///
    /// Besides contract violations, returns [`Error::Decode`] if the engine
    /// reports a column type this crate does not model.
    pub fn get_table_column_info(
        &self,
        sesid: Session,
        tableid: TableId,
        column: &str,
        def: &mut ColumnDefinition,
    ) -> Result<Status> {
        let name = self.object_name(column, "column")?;
        let mut native = NativeColumnDef::default();
        native.stamp();
        let code = match &name {
            NativeText::Ansi(n) => {
                self.engine()
                    .get_table_column_info_a(sesid.raw(), tableid.raw(), n, &mut native)
            }
            NativeText::Wide(n) => {
                self.engine()
                    .get_table_column_info_w(sesid.raw(), tableid.raw(), n, &mut native)
            }
        };
        let status = self.finish("JetGetTableColumnInfo", code)?;
        if !status.is_error() {
            *def = marshal::column_from_def(column, &native)?;
        }
        Ok(status)
    }

    /// Create one or more indexes on an open table in a single call.
    pub fn create_index(
        &self,
        sesid: Session,
        tableid: TableId,
        indexes: &[IndexDefinition],
    ) -> Result<Status> {
        if indexes.is_empty() {
            return Err(Error::ArgumentOutOfRange {
                name: "indexes",
                value: 0,
                reason: "at least one index is required",
            });
        }
        for index in indexes {
            self.check_index(index)?;
        }
        let count = checked_count(indexes.len(), "indexes")?;

        let mut scope = PinScope::new();
        let code = match self.dispatch.index_layout {
            IndexLayout::Legacy => {
                let mut records = indexes
                    .iter()
                    .map(|def| marshal::index_create::<c_char>(def, &mut scope))
                    .collect::<Result<Vec<_>>>()?;
                // SAFETY: `records` and every buffer they point into (owned by
                // `scope`) outlive the call.
                unsafe {
                    self.engine().create_index2_a(
                        sesid.raw(),
                        tableid.raw(),
                        records.as_mut_ptr(),
                        count,
                    )
                }
            }
            IndexLayout::Vista => {
                let mut records = indexes
                    .iter()
                    .map(|def| marshal::index_create1::<u16>(def, &mut scope))
                    .collect::<Result<Vec<_>>>()?;
                // SAFETY: as above.
                unsafe {
                    self.engine().create_index2_w(
                        sesid.raw(),
                        tableid.raw(),
                        records.as_mut_ptr(),
                        count,
                    )
                }
            }
        };
        drop(scope);
        self.finish("JetCreateIndex2", code)
    }

    /// Delete an index.
    pub fn delete_index(&self, sesid: Session, tableid: TableId, name: &str) -> Result<Status> {
        let name = self.object_name(name, "name")?;
        let code = match &name {
            NativeText::Ansi(n) => self.engine().delete_index_a(sesid.raw(), tableid.raw(), n),
            NativeText::Wide(n) => self.engine().delete_index_w(sesid.raw(), tableid.raw(), n),
        };
        self.finish("JetDeleteIndex", code)
    }

    /// Create a table with its columns and indexes in one call.
    ///
    /// On success every engine-assigned column id is written back into
    /// `columns`, position for position, and `tableid` is an open cursor on
    /// the new table.
    #[allow(clippy::too_many_arguments)]
    pub fn create_table_column_index(
        &self,
        sesid: Session,
        dbid: DbId,
        name: &str,
        pages: i32,
        density: i32,
        columns: &mut [ColumnDefinition],
        indexes: &[IndexDefinition],
        tableid: &mut TableId,
    ) -> Result<Status> {
        let pages = checked_u32(pages, "pages")?;
        let density = checked_u32(density, "density")?;
        for index in indexes.iter() {
            self.check_index(index)?;
        }

        let mut scope = PinScope::new();
        let code = match self.dispatch.index_layout {
            IndexLayout::Legacy => {
                let records = indexes
                    .iter()
                    .map(|def| marshal::index_create::<c_char>(def, &mut scope))
                    .collect::<Result<Vec<_>>>()?;
                let mut create =
                    TableCreate::new(name, pages, density, columns, records, &mut scope)?;
                // SAFETY: `create` owns the column and index arrays, `scope`
                // owns every buffer they point into; both outlive the call.
                let code = unsafe {
                    self.engine()
                        .create_table_column_index_a(sesid.raw(), dbid.raw(), create.as_mut_ptr())
                };
                echo_created(&create, code, columns, tableid);
                code
            }
            IndexLayout::Vista => {
                let records = indexes
                    .iter()
                    .map(|def| marshal::index_create1::<u16>(def, &mut scope))
                    .collect::<Result<Vec<_>>>()?;
                let mut create =
                    TableCreate::new(name, pages, density, columns, records, &mut scope)?;
                // SAFETY: as above.
                let code = unsafe {
                    self.engine()
                        .create_table_column_index_w(sesid.raw(), dbid.raw(), create.as_mut_ptr())
                };
                echo_created(&create, code, columns, tableid);
                code
            }
        };
        drop(scope);
        self.finish("JetCreateTableColumnIndex", code)
    }

    /// Open a sort/temporary table with the engine's default locale.
    ///
    /// `columnids` receives one id per entry of `columns`, in the same order.
    pub fn open_temp_table(
        &self,
        sesid: Session,
        columns: &[ColumnDefinition],
        grbit: TempTableFlags,
        tableid: &mut TableId,
        columnids: &mut [ColumnId],
    ) -> Result<Status> {
        self.temp_table("JetOpenTempTable", columns, tableid, columnids, |engine, defs, t, ids| {
            engine.open_temp_table(sesid.raw(), defs, grbit.bits(), t, ids)
        })
    }

    /// Open a temporary table sorting text by a numeric locale.
    pub fn open_temp_table_with_locale(
        &self,
        sesid: Session,
        columns: &[ColumnDefinition],
        locale_id: u32,
        grbit: TempTableFlags,
        tableid: &mut TableId,
        columnids: &mut [ColumnId],
    ) -> Result<Status> {
        self.temp_table("JetOpenTempTable2", columns, tableid, columnids, |engine, defs, t, ids| {
            engine.open_temp_table2(sesid.raw(), defs, locale_id, grbit.bits(), t, ids)
        })
    }

    /// Open a temporary table sorting text by a locale with normalization flags.
    pub fn open_temp_table_with_unicode(
        &self,
        sesid: Session,
        columns: &[ColumnDefinition],
        compare: &ComparePolicy,
        grbit: TempTableFlags,
        tableid: &mut TableId,
        columnids: &mut [ColumnId],
    ) -> Result<Status> {
        let descriptor = marshal::unicode_index(compare);
        self.temp_table("JetOpenTempTable3", columns, tableid, columnids, |engine, defs, t, ids| {
            // SAFETY: `descriptor` lives on this frame for the whole call.
            unsafe { engine.open_temp_table3(sesid.raw(), defs, &descriptor, grbit.bits(), t, ids) }
        })
    }

    fn temp_table(
        &self,
        op: &'static str,
        columns: &[ColumnDefinition],
        tableid: &mut TableId,
        columnids: &mut [ColumnId],
        call: impl FnOnce(&dyn NativeEngine, &[NativeColumnDef], &mut usize, &mut [u32]) -> i32,
    ) -> Result<Status> {
        if columns.len() != columnids.len() {
            return Err(Error::LengthMismatch {
                left: "columns",
                left_len: columns.len(),
                right: "columnids",
                right_len: columnids.len(),
            });
        }
        let defs: Vec<NativeColumnDef> = columns.iter().map(marshal::column_def).collect();
        let mut raw_ids = vec![0u32; defs.len()];
        let mut raw_tableid = 0;

        let code = call(self.engine(), &defs, &mut raw_tableid, &mut raw_ids);
        let status = self.finish(op, code)?;
        if !status.is_error() {
            *tableid = TableId::from_raw(raw_tableid);
            for (slot, raw) in columnids.iter_mut().zip(raw_ids) {
                *slot = ColumnId::from_raw(raw);
            }
        }
        Ok(status)
    }
}

fn echo_created<C: NativeChar, I>(
    create: &TableCreate<C, I>,
    code: i32,
    columns: &mut [ColumnDefinition],
    tableid: &mut TableId,
) {
    if code >= 0 {
        create.echo_columnids(columns);
        *tableid = TableId::from_raw(create.tableid());
    }
}
