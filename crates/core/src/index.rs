//! Index schema model
//!
//! An index key is an ordered list of segments; segment order is the
//! composite-key order and is preserved exactly as defined. String
//! comparison is described by a [`ComparePolicy`], which combines a locale
//! identifier with normalization flags.

use crate::column::ColumnType;
use bitflags::bitflags;

/// Locale used when none is given (en-US)
pub const DEFAULT_LOCALE_ID: u32 = 1033;

/// `LCMAP_SORTKEY`: always present in a native normalization descriptor
pub const LCMAP_SORTKEY: u32 = 0x0000_0400;

bitflags! {
    /// Index creation flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct IndexFlags: u32 {
        /// Duplicate keys rejected
        const UNIQUE = 0x0000_0001;
        /// Clustered primary index
        const PRIMARY = 0x0000_0002;
        /// Null key segments rejected
        const DISALLOW_NULL = 0x0000_0004;
        /// Entries with all-null keys skipped
        const IGNORE_NULL = 0x0000_0008;
        /// Entries with any null segment skipped
        const IGNORE_ANY_NULL = 0x0000_0020;
        /// Entries with a null first segment skipped
        const IGNORE_FIRST_NULL = 0x0000_0040;
        /// Lazy index maintenance
        const LAZY_FLUSH = 0x0000_0080;
        /// Index starts empty
        const EMPTY = 0x0000_0100;
        /// Index changes are not versioned
        const UNVERSIONED = 0x0000_0200;
        /// Nulls sort after values
        const SORT_NULLS_HIGH = 0x0000_0400;
        /// Cross product of multi-valued columns
        const CROSS_PRODUCT = 0x0000_4000;
        /// Key truncation is an error
        const DISALLOW_TRUNCATION = 0x0001_0000;
    }
}

bitflags! {
    /// String comparison normalization.
    ///
    /// Bit values are the engine's `LCMAP`/`NORM` flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CompareOptions: u32 {
        /// Case-insensitive
        const IGNORE_CASE = 0x0000_0001;
        /// Diacritics ignored
        const IGNORE_NON_SPACE = 0x0000_0002;
        /// Symbols ignored
        const IGNORE_SYMBOLS = 0x0000_0004;
        /// Hyphen and apostrophe sort with symbols
        const STRING_SORT = 0x0000_1000;
        /// Hiragana and katakana compare equal
        const IGNORE_KANA_TYPE = 0x0001_0000;
        /// Half- and full-width compare equal
        const IGNORE_WIDTH = 0x0002_0000;
    }
}

/// Locale-aware comparison policy of an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComparePolicy {
    /// Windows locale identifier
    pub locale_id: u32,
    /// Normalization flags
    pub options: CompareOptions,
}

impl ComparePolicy {
    /// Policy for a locale with no normalization flags
    pub const fn locale(locale_id: u32) -> Self {
        ComparePolicy {
            locale_id,
            options: CompareOptions::empty(),
        }
    }

    /// Combine a locale with native map flags.
    ///
    /// `LCMAP_SORTKEY` and unknown bits are dropped.
    pub const fn from_native(locale_id: u32, map_flags: u32) -> Self {
        ComparePolicy {
            locale_id,
            options: CompareOptions::from_bits_truncate(map_flags),
        }
    }

    /// Native map flags for a normalization descriptor
    pub const fn map_flags(&self) -> u32 {
        self.options.bits() | LCMAP_SORTKEY
    }

    /// Whether a full normalization descriptor is needed to express this policy
    pub const fn needs_descriptor(&self) -> bool {
        !self.options.is_empty()
    }
}

impl Default for ComparePolicy {
    fn default() -> Self {
        ComparePolicy::locale(DEFAULT_LOCALE_ID)
    }
}

/// One column of a composite key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSegment {
    /// Key column name
    pub column_name: String,
    /// Storage type of the key column
    pub column_type: ColumnType,
    /// Sort direction
    pub ascending: bool,
    /// Whether the key column is ASCII text
    pub is_ascii: bool,
}

impl IndexSegment {
    /// Ascending segment over a column
    pub fn ascending(column_name: impl Into<String>) -> Self {
        IndexSegment {
            column_name: column_name.into(),
            column_type: ColumnType::Nil,
            ascending: true,
            is_ascii: false,
        }
    }

    /// Descending segment over a column
    pub fn descending(column_name: impl Into<String>) -> Self {
        IndexSegment {
            ascending: false,
            ..IndexSegment::ascending(column_name)
        }
    }
}

/// An index to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDefinition {
    /// Index name
    pub name: String,
    /// String comparison policy
    pub compare: ComparePolicy,
    /// Key segments, in key order; at least one
    pub segments: Vec<IndexSegment>,
    /// Creation flags
    pub flags: IndexFlags,
    /// Initial page density percentage, `0` for the engine default
    pub density: u32,
    /// Maximum key length in bytes, `0` for the engine default (Vista layout only)
    pub max_key_length: u32,
}

impl IndexDefinition {
    /// Index over the given segments with default settings
    pub fn new(name: impl Into<String>, segments: Vec<IndexSegment>) -> Self {
        IndexDefinition {
            name: name.into(),
            compare: ComparePolicy::default(),
            segments,
            flags: IndexFlags::empty(),
            density: 0,
            max_key_length: 0,
        }
    }

    /// Set the creation flags
    pub fn with_flags(mut self, flags: IndexFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the comparison policy
    pub fn with_compare(mut self, compare: ComparePolicy) -> Self {
        self.compare = compare;
        self
    }
}

/// An index as described by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexInfo {
    /// Index name
    pub name: String,
    /// String comparison policy
    pub compare: ComparePolicy,
    /// Key segments, in key order
    pub segments: Vec<IndexSegment>,
    /// Index flags
    pub flags: IndexFlags,
    /// Number of distinct keys
    pub unique_keys: u32,
    /// Number of entries
    pub entries: u32,
    /// Number of pages
    pub pages: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sortkey_is_stripped_on_read() {
        let policy = ComparePolicy::from_native(1031, LCMAP_SORTKEY | 0x1 | 0x0002_0000);
        assert_eq!(policy.locale_id, 1031);
        assert_eq!(
            policy.options,
            CompareOptions::IGNORE_CASE | CompareOptions::IGNORE_WIDTH
        );
    }

    #[test]
    fn sortkey_is_added_on_write() {
        let policy = ComparePolicy {
            locale_id: 1033,
            options: CompareOptions::IGNORE_NON_SPACE,
        };
        assert_eq!(policy.map_flags(), LCMAP_SORTKEY | 0x2);
        assert_eq!(
            ComparePolicy::from_native(1033, policy.map_flags()),
            policy
        );
    }

    #[test]
    fn plain_locale_needs_no_descriptor() {
        assert!(!ComparePolicy::locale(1033).needs_descriptor());
        assert!(ComparePolicy::from_native(1033, 0x1).needs_descriptor());
    }

    #[test]
    fn segment_constructors() {
        let asc = IndexSegment::ascending("a");
        let desc = IndexSegment::descending("b");
        assert!(asc.ascending);
        assert!(!desc.ascending);
        assert_eq!(desc.column_name, "b");
    }
}
