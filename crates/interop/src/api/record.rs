//! Cursor navigation and record updates

use super::{checked_buffer, checked_buffer_mut, Api, NativeText};
use isam_core::status::codes;
use isam_core::{
    ColumnId, MakeKeyFlags, Move, MoveFlags, Prep, Result, RetrieveColumnFlags, SeekFlags,
    Session, SetColumnFlags, Status, TableId,
};

impl Api {
    /// Move a cursor.
    pub fn move_to(
        &self,
        sesid: Session,
        tableid: TableId,
        to: Move,
        grbit: MoveFlags,
    ) -> Result<Status> {
        self.finish(
            "JetMove",
            self.engine()
                .move_cursor(sesid.raw(), tableid.raw(), to.raw(), grbit.bits()),
        )
    }

    /// Position a cursor before its first row, so the next `Move::Next`
    /// lands on the first row.
    ///
    /// Works on empty tables: "no current record" from either move is
    /// expected and reported as success.
    pub fn move_before_first(&self, sesid: Session, tableid: TableId) -> Result<Status> {
        let first = self.move_to(sesid, tableid, Move::First, MoveFlags::empty())?;
        if first.is_error() && first.code() != codes::NO_CURRENT_RECORD {
            return Ok(first);
        }
        let previous = self.move_to(sesid, tableid, Move::Previous, MoveFlags::empty())?;
        if previous.code() == codes::NO_CURRENT_RECORD {
            return Ok(Status::SUCCESS);
        }
        Ok(previous)
    }

    /// Build a search key one column value at a time.
    ///
    /// `size` bytes of `data` are used; `None` with size `0` is a null value.
    pub fn make_key(
        &self,
        sesid: Session,
        tableid: TableId,
        data: Option<&[u8]>,
        size: i32,
        grbit: MakeKeyFlags,
    ) -> Result<Status> {
        let data = checked_buffer(data, size, "data")?;
        self.finish(
            "JetMakeKey",
            self.engine()
                .make_key(sesid.raw(), tableid.raw(), data, grbit.bits()),
        )
    }

    /// Seek to the key built with [`Api::make_key`].
    pub fn seek(&self, sesid: Session, tableid: TableId, grbit: SeekFlags) -> Result<Status> {
        self.finish(
            "JetSeek",
            self.engine().seek(sesid.raw(), tableid.raw(), grbit.bits()),
        )
    }

    /// Switch the cursor's index; `None` selects the primary index.
    pub fn set_current_index(
        &self,
        sesid: Session,
        tableid: TableId,
        index: Option<&str>,
    ) -> Result<Status> {
        let code = match self.optional_text(index, "index")? {
            None if self.wide() => self.engine().set_current_index_w(sesid.raw(), tableid.raw(), None),
            None => self.engine().set_current_index_a(sesid.raw(), tableid.raw(), None),
            Some(NativeText::Ansi(i)) => {
                self.engine()
                    .set_current_index_a(sesid.raw(), tableid.raw(), Some(i.as_c_str()))
            }
            Some(NativeText::Wide(i)) => {
                self.engine()
                    .set_current_index_w(sesid.raw(), tableid.raw(), Some(i.as_slice()))
            }
        };
        self.finish("JetSetCurrentIndex", code)
    }

    /// Start, or cancel, an insert or replace.
    pub fn prepare_update(&self, sesid: Session, tableid: TableId, prep: Prep) -> Result<Status> {
        self.finish(
            "JetPrepareUpdate",
            self.engine()
                .prepare_update(sesid.raw(), tableid.raw(), prep.raw()),
        )
    }

    /// Apply the prepared update.
    ///
    /// When a bookmark buffer is given, up to `size` bytes of the new
    /// record's bookmark are written into it and `actual` receives the full
    /// bookmark length.
    pub fn update(
        &self,
        sesid: Session,
        tableid: TableId,
        bookmark: Option<&mut [u8]>,
        size: i32,
        actual: &mut u32,
    ) -> Result<Status> {
        let bookmark = checked_buffer_mut(bookmark, size, "bookmark")?;
        self.finish(
            "JetUpdate",
            self.engine()
                .update(sesid.raw(), tableid.raw(), bookmark, actual),
        )
    }

    /// Delete the record under the cursor.
    pub fn delete(&self, sesid: Session, tableid: TableId) -> Result<Status> {
        self.finish("JetDelete", self.engine().delete(sesid.raw(), tableid.raw()))
    }

    /// Set a column of the record being prepared.
    pub fn set_column(
        &self,
        sesid: Session,
        tableid: TableId,
        columnid: ColumnId,
        data: Option<&[u8]>,
        size: i32,
        grbit: SetColumnFlags,
    ) -> Result<Status> {
        let data = checked_buffer(data, size, "data")?;
        self.finish(
            "JetSetColumn",
            self.engine()
                .set_column(sesid.raw(), tableid.raw(), columnid.raw(), data, grbit.bits()),
        )
    }

    /// Read a column of the current record.
    ///
    /// `actual` receives the full value length, which may exceed `size`;
    /// the engine then reports a truncation warning.
    #[allow(clippy::too_many_arguments)]
    pub fn retrieve_column(
        &self,
        sesid: Session,
        tableid: TableId,
        columnid: ColumnId,
        data: Option<&mut [u8]>,
        size: i32,
        actual: &mut u32,
        grbit: RetrieveColumnFlags,
    ) -> Result<Status> {
        let data = checked_buffer_mut(data, size, "data")?;
        self.finish(
            "JetRetrieveColumn",
            self.engine().retrieve_column(
                sesid.raw(),
                tableid.raw(),
                columnid.raw(),
                data,
                actual,
                grbit.bits(),
            ),
        )
    }
}
