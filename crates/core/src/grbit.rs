//! Option bits and small enumerations passed to native calls

use bitflags::bitflags;

bitflags! {
    /// Options for creating a database.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CreateDatabaseFlags: u32 {
        /// No logging for this database
        const RECOVERY_OFF = 0x0000_0008;
        /// Replace an existing file
        const OVERWRITE_EXISTING = 0x0000_0200;
        /// Single copy of the database header
        const SHADOWING_OFF = 0x0000_1000;
    }
}

bitflags! {
    /// Options for attaching a database.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AttachDatabaseFlags: u32 {
        /// Attach read-only
        const READ_ONLY = 0x0000_0001;
        /// Drop indexes flagged corrupt
        const DELETE_CORRUPT_INDEXES = 0x0000_0010;
    }
}

bitflags! {
    /// Options for opening an attached database.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct OpenDatabaseFlags: u32 {
        /// Open read-only
        const READ_ONLY = 0x0000_0001;
        /// Exclusive use by this session
        const EXCLUSIVE = 0x0000_0002;
    }
}

bitflags! {
    /// Options for committing a transaction.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CommitFlags: u32 {
        /// Do not wait for the log flush
        const LAZY_FLUSH = 0x0000_0001;
        /// Wait for all previous lazy commits
        const WAIT_LAST_LEVEL0_COMMIT = 0x0000_0002;
    }
}

bitflags! {
    /// Options for rolling back.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RollbackFlags: u32 {
        /// Undo every nesting level
        const ROLLBACK_ALL = 0x0000_0001;
    }
}

bitflags! {
    /// Options for opening a table.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct OpenTableFlags: u32 {
        /// Deny writes to other cursors
        const DENY_WRITE = 0x0000_0001;
        /// Deny reads to other cursors
        const DENY_READ = 0x0000_0002;
        /// Read-only cursor
        const READ_ONLY = 0x0000_0004;
        /// Cursor may update
        const UPDATABLE = 0x0000_0008;
        /// Allow DDL on fixed tables
        const PERMIT_DDL = 0x0000_0010;
        /// Do not cache pages
        const NO_CACHE = 0x0000_0020;
        /// Preread the table
        const PREREAD = 0x0000_0040;
        /// Sequential scan hint
        const SEQUENTIAL = 0x0000_8000;
    }
}

bitflags! {
    /// Options for temporary tables.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TempTableFlags: u32 {
        /// Seekable by key
        const INDEXED = 0x0000_0001;
        /// Duplicate keys removed
        const UNIQUE = 0x0000_0002;
        /// Rows may be inserted after the sort
        const UPDATABLE = 0x0000_0004;
        /// Backward movement supported
        const SCROLLABLE = 0x0000_0008;
        /// Nulls sort after values
        const SORT_NULLS_HIGH = 0x0000_0010;
        /// Always materialize to disk
        const FORCE_MATERIALIZATION = 0x0000_0020;
    }
}

bitflags! {
    /// Options for building a search key.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MakeKeyFlags: u32 {
        /// Start a new key
        const NEW_KEY = 0x0000_0001;
        /// Treat the value as a string prefix
        const STRING_PREFIX = 0x0000_0002;
        /// Substring limit
        const SUB_STR_LIMIT = 0x0000_0004;
        /// The data is an already-normalized key
        const NORMALIZED_KEY = 0x0000_0008;
        /// A zero-length value, not null
        const KEY_DATA_ZERO_LENGTH = 0x0000_0010;
        /// Wildcard for the rest of the key, start of range
        const FULL_COLUMN_START_LIMIT = 0x0000_0100;
        /// Wildcard for the rest of the key, end of range
        const FULL_COLUMN_END_LIMIT = 0x0000_0200;
        /// Partial wildcard, start of range
        const PARTIAL_COLUMN_START_LIMIT = 0x0000_0400;
        /// Partial wildcard, end of range
        const PARTIAL_COLUMN_END_LIMIT = 0x0000_0800;
    }
}

bitflags! {
    /// Seek comparison.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SeekFlags: u32 {
        /// Equal
        const EQ = 0x0000_0001;
        /// Less than
        const LT = 0x0000_0002;
        /// Less than or equal
        const LE = 0x0000_0004;
        /// Greater than or equal
        const GE = 0x0000_0008;
        /// Greater than
        const GT = 0x0000_0010;
        /// With `EQ`, also set an index range
        const SET_INDEX_RANGE = 0x0000_0020;
    }
}

bitflags! {
    /// Options for setting a column.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SetColumnFlags: u32 {
        /// Append to a long value
        const APPEND_LV = 0x0000_0001;
        /// Overwrite part of a long value
        const OVERWRITE_LV = 0x0000_0004;
        /// Resize a long value
        const SIZE_LV = 0x0000_0008;
        /// Zero-length value, not null
        const ZERO_LENGTH = 0x0000_0020;
        /// Force separate long-value storage
        const SEPARATE_LV = 0x0000_0040;
        /// Reject duplicate multi-values
        const UNIQUE_MULTI_VALUES = 0x0000_0080;
        /// Reject normalized-duplicate multi-values
        const UNIQUE_NORMALIZED_MULTI_VALUES = 0x0000_0100;
        /// Force in-record long-value storage
        const INTRINSIC_LV = 0x0000_0400;
    }
}

bitflags! {
    /// Options for retrieving a column.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RetrieveColumnFlags: u32 {
        /// Read from the copy buffer
        const COPY = 0x0000_0001;
        /// Read from the index entry
        const FROM_INDEX = 0x0000_0002;
        /// Read from the primary bookmark
        const FROM_PRIMARY_BOOKMARK = 0x0000_0004;
        /// Sequence numbers are tags
        const TAG = 0x0000_0008;
        /// Retrieve the null value
        const NULL = 0x0000_0010;
        /// Ignore the column default
        const IGNORE_DEFAULT = 0x0000_0020;
    }
}

bitflags! {
    /// Options for moving a cursor.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MoveFlags: u32 {
        /// Move to a record with a different key
        const MOVE_KEY_NE = 0x0000_0001;
    }
}

bitflags! {
    /// Flags describing a catalog object.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ObjectFlags: u32 {
        /// Derived from a template table
        const TABLE_DERIVED = 0x1000_0000;
        /// Template table
        const TABLE_TEMPLATE = 0x2000_0000;
        /// Fixed DDL
        const TABLE_FIXED_DDL = 0x4000_0000;
        /// Engine-owned object
        const SYSTEM = 0x8000_0000;
    }
}

/// Catalog object type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    /// Any object
    Nil,
    /// Table
    Table,
}

impl ObjectType {
    /// Native object type value
    pub const fn raw(self) -> u32 {
        match self {
            ObjectType::Nil => 0,
            ObjectType::Table => 1,
        }
    }
}

/// Cursor movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// First record
    First,
    /// Previous record
    Previous,
    /// Next record
    Next,
    /// Last record
    Last,
    /// Relative offset
    By(i32),
}

impl Move {
    /// Native row offset
    pub const fn raw(self) -> i32 {
        match self {
            Move::First => i32::MIN,
            Move::Previous => -1,
            Move::Next => 1,
            Move::Last => i32::MAX,
            Move::By(offset) => offset,
        }
    }
}

/// Kind of update to prepare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prep {
    /// Insert a new record
    Insert,
    /// Replace the current record
    Replace,
    /// Cancel the pending update
    Cancel,
    /// Replace without taking a write lock
    ReplaceNoLock,
    /// Insert a copy of the current record
    InsertCopy,
}

impl Prep {
    /// Native preparation value
    pub const fn raw(self) -> u32 {
        match self {
            Prep::Insert => 0,
            Prep::Replace => 2,
            Prep::Cancel => 3,
            Prep::ReplaceNoLock => 4,
            Prep::InsertCopy => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_offsets() {
        assert_eq!(Move::First.raw(), i32::MIN);
        assert_eq!(Move::Previous.raw(), -1);
        assert_eq!(Move::Next.raw(), 1);
        assert_eq!(Move::Last.raw(), i32::MAX);
        assert_eq!(Move::By(-7).raw(), -7);
    }

    #[test]
    fn system_flag_is_high_bit() {
        assert_eq!(ObjectFlags::SYSTEM.bits(), 0x8000_0000);
        let flags = ObjectFlags::from_bits_truncate(0x8000_0001);
        assert!(flags.contains(ObjectFlags::SYSTEM));
    }
}
