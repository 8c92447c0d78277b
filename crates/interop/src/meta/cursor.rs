//! Close-once cursor over a metadata result set

use crate::api::Api;
use byteorder::{ByteOrder, LittleEndian};
use isam_core::status::codes;
use isam_core::{
    ColumnId, Error, Move, MoveFlags, Result, RetrieveColumnFlags, Session, TableId,
};
use isam_native::chars;
use tracing::{debug, warn};

/// Initial retrieve buffer; grown on truncation.
const INITIAL_BUFFER: usize = 64;

/// Lifecycle of a metadata cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// Handed over, not yet positioned
    Unopened,
    /// Positioned before the first row
    BeforeFirst,
    /// Positioned on a row
    OnRow,
    /// Released; no further native calls
    Closed,
}

/// Owns a temporary cursor and releases it exactly once.
///
/// The cursor is closed on exhaustion, on the first fault and, failing
/// both, when dropped.
pub struct MetaCursor<'a> {
    api: &'a Api,
    sesid: Session,
    tableid: TableId,
    wide: bool,
    state: CursorState,
}

impl<'a> MetaCursor<'a> {
    /// Take ownership of a cursor opened by one of the list calls.
    pub fn new(api: &'a Api, sesid: Session, tableid: TableId) -> Self {
        MetaCursor {
            api,
            sesid,
            tableid,
            wide: api.wide(),
            state: CursorState::Unopened,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> CursorState {
        self.state
    }

    /// Position before the first row. Valid on an empty result set.
    pub fn open(&mut self) -> Result<()> {
        if self.state != CursorState::Unopened {
            return Ok(());
        }
        let status = self.api.move_before_first(self.sesid, self.tableid)?;
        if status.is_error() {
            return Err(self.fault(Error::Engine(status)));
        }
        debug!(target: "isam::meta", tableid = %self.tableid, "Metadata cursor opened");
        self.state = CursorState::BeforeFirst;
        Ok(())
    }

    /// Step to the next row. `Ok(false)` means exhausted, and the cursor is
    /// closed by then.
    pub fn advance(&mut self) -> Result<bool> {
        match self.state {
            CursorState::Closed => return Ok(false),
            CursorState::Unopened => self.open()?,
            CursorState::BeforeFirst | CursorState::OnRow => {}
        }
        let status = self
            .api
            .move_to(self.sesid, self.tableid, Move::Next, MoveFlags::empty())?;
        if status.code() == codes::NO_CURRENT_RECORD {
            self.close();
            return Ok(false);
        }
        if status.is_error() {
            return Err(self.fault(Error::Engine(status)));
        }
        self.state = CursorState::OnRow;
        Ok(true)
    }

    /// Raw value of a field on the current row; `None` if the value is null.
    pub fn retrieve(&self, columnid: ColumnId) -> Result<Option<Vec<u8>>> {
        let mut buffer = vec![0u8; INITIAL_BUFFER];
        loop {
            let size = i32::try_from(buffer.len())
                .map_err(|_| Error::Decode(format!("{} byte field", buffer.len())))?;
            let mut actual = 0u32;
            let status = self.api.retrieve_column(
                self.sesid,
                self.tableid,
                columnid,
                Some(&mut buffer[..]),
                size,
                &mut actual,
                RetrieveColumnFlags::empty(),
            )?;
            match status.code() {
                codes::COLUMN_NULL => return Ok(None),
                codes::BUFFER_TRUNCATED if actual as usize > buffer.len() => {
                    if i32::try_from(actual).is_err() {
                        return Err(Error::Decode(format!(
                            "{actual} byte field in column {columnid}"
                        )));
                    }
                    buffer.resize(actual as usize, 0);
                }
                code if code < 0 => return Err(Error::Engine(status)),
                _ => {
                    buffer.truncate(actual as usize);
                    return Ok(Some(buffer));
                }
            }
        }
    }

    /// An unsigned integer field stored in 1, 2 or 4 little-endian bytes.
    /// Null reads as zero.
    pub fn read_u32(&self, columnid: ColumnId) -> Result<u32> {
        let Some(bytes) = self.retrieve(columnid)? else {
            return Ok(0);
        };
        match bytes.len() {
            1 => Ok(u32::from(bytes[0])),
            2 => Ok(u32::from(LittleEndian::read_u16(&bytes))),
            4 => Ok(LittleEndian::read_u32(&bytes)),
            n => Err(Error::Decode(format!(
                "{n}-byte integer in column {columnid}"
            ))),
        }
    }

    /// A text field in the encoding of the list call that opened the
    /// cursor. Null reads as empty.
    pub fn read_text(&self, columnid: ColumnId) -> Result<String> {
        match self.retrieve(columnid)? {
            None => Ok(String::new()),
            Some(bytes) if self.wide => chars::decode_wide_bytes(&bytes),
            Some(bytes) => Ok(chars::decode_ansi_bytes(&bytes)),
        }
    }

    /// Release the cursor. Later calls do nothing.
    pub fn close(&mut self) {
        if self.state == CursorState::Closed {
            return;
        }
        self.state = CursorState::Closed;
        if let Ok(status) = self.api.close_table(self.sesid, self.tableid) {
            debug!(
                target: "isam::meta",
                tableid = %self.tableid,
                code = status.code(),
                "Metadata cursor closed"
            );
        }
    }

    /// Close after a fault and hand the error back.
    pub(crate) fn fault(&mut self, err: Error) -> Error {
        warn!(target: "isam::meta", tableid = %self.tableid, error = %err, "Metadata enumeration failed");
        self.close();
        err
    }

    /// Advance and read one item; the building block of the enumerators.
    ///
    /// `read` may advance further itself. Any error closes the cursor.
    pub(crate) fn next_item<T>(
        &mut self,
        read: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Option<Result<T>> {
        match self.advance() {
            Ok(true) => {}
            Ok(false) => return None,
            Err(err) => return Some(Err(err)),
        }
        match read(self) {
            Ok(item) => Some(Ok(item)),
            Err(err) => Some(Err(self.fault(err))),
        }
    }
}

impl Drop for MetaCursor<'_> {
    fn drop(&mut self) {
        self.close();
    }
}
