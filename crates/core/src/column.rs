//! Column schema model

use crate::error::{Error, Result};
use crate::handle::ColumnId;
use bitflags::bitflags;

/// Longest table, column or index name the engine accepts, in bytes
pub const NAME_MOST: usize = 64;

/// Storage type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum ColumnType {
    /// No type
    #[default]
    Nil = 0,
    /// Boolean
    Bit = 1,
    /// 1-byte unsigned integer
    UnsignedByte = 2,
    /// 2-byte signed integer
    Short = 3,
    /// 4-byte signed integer
    Long = 4,
    /// 8-byte fixed-point currency
    Currency = 5,
    /// 4-byte float
    IeeeSingle = 6,
    /// 8-byte float
    IeeeDouble = 7,
    /// OLE automation date
    DateTime = 8,
    /// Binary, up to 255 bytes
    Binary = 9,
    /// Text, up to 255 bytes
    Text = 10,
    /// Long binary
    LongBinary = 11,
    /// Long text
    LongText = 12,
    /// 4-byte unsigned integer
    UnsignedLong = 14,
    /// 8-byte signed integer
    LongLong = 15,
    /// 16-byte GUID
    Guid = 16,
    /// 2-byte unsigned integer
    UnsignedShort = 17,
}

impl ColumnType {
    /// Decode a native column type
    pub fn from_raw(raw: u32) -> Result<Self> {
        Ok(match raw {
            0 => ColumnType::Nil,
            1 => ColumnType::Bit,
            2 => ColumnType::UnsignedByte,
            3 => ColumnType::Short,
            4 => ColumnType::Long,
            5 => ColumnType::Currency,
            6 => ColumnType::IeeeSingle,
            7 => ColumnType::IeeeDouble,
            8 => ColumnType::DateTime,
            9 => ColumnType::Binary,
            10 => ColumnType::Text,
            11 => ColumnType::LongBinary,
            12 => ColumnType::LongText,
            14 => ColumnType::UnsignedLong,
            15 => ColumnType::LongLong,
            16 => ColumnType::Guid,
            17 => ColumnType::UnsignedShort,
            other => return Err(Error::Decode(format!("unknown column type {other}"))),
        })
    }

    /// Native column type value
    pub const fn raw(self) -> u32 {
        self as u32
    }

    /// Whether values of this type carry a code page
    pub const fn is_textual(self) -> bool {
        matches!(self, ColumnType::Text | ColumnType::LongText)
    }
}

/// Code page of a text column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CodePage {
    /// Not a text column
    #[default]
    None,
    /// UTF-16
    Unicode,
    /// Western European ANSI
    Ascii,
}

impl CodePage {
    /// Decode a native code page; unknown pages read as `None`
    pub const fn from_raw(raw: u16) -> Self {
        match raw {
            1200 => CodePage::Unicode,
            1252 => CodePage::Ascii,
            _ => CodePage::None,
        }
    }

    /// Native code page value
    pub const fn raw(self) -> u16 {
        match self {
            CodePage::None => 0,
            CodePage::Unicode => 1200,
            CodePage::Ascii => 1252,
        }
    }
}

bitflags! {
    /// Column creation and description flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ColumnFlags: u32 {
        /// Fixed-size storage
        const FIXED = 0x0000_0001;
        /// Tagged (sparse) column
        const TAGGED = 0x0000_0002;
        /// Null values rejected
        const NOT_NULL = 0x0000_0004;
        /// Version column
        const VERSION = 0x0000_0008;
        /// Auto-increment
        const AUTOINCREMENT = 0x0000_0010;
        /// Updatable
        const UPDATABLE = 0x0000_0020;
        /// Temporary-table key column
        const TT_KEY = 0x0000_0040;
        /// Temporary-table descending key column
        const TT_DESCENDING = 0x0000_0080;
        /// Multi-valued
        const MULTI_VALUED = 0x0000_0400;
        /// Escrow-update column
        const ESCROW_UPDATE = 0x0000_0800;
        /// Not versioned
        const UNVERSIONED = 0x0000_1000;
        /// May contain nulls
        const MAYBE_NULL = 0x0000_2000;
        /// Default supplied by a callback
        const USER_DEFINED_DEFAULT = 0x0000_8000;
    }
}

/// A column as created on, or described by, the engine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnDefinition {
    /// Column name
    pub name: String,
    /// Assigned by the engine when the column is created
    pub columnid: ColumnId,
    /// Storage type
    pub column_type: ColumnType,
    /// Code page for text columns
    pub codepage: CodePage,
    /// Maximum length in bytes, `0` for the type's default
    pub max_length: u32,
    /// Default value bytes; empty for none
    pub default_value: Vec<u8>,
    /// Column flags
    pub flags: ColumnFlags,
}

impl ColumnDefinition {
    /// Definition of a column not yet created
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        ColumnDefinition {
            name: name.into(),
            column_type,
            ..Default::default()
        }
    }

    /// Set the code page
    pub fn with_codepage(mut self, codepage: CodePage) -> Self {
        self.codepage = codepage;
        self
    }

    /// Set the maximum length
    pub fn with_max_length(mut self, max_length: u32) -> Self {
        self.max_length = max_length;
        self
    }

    /// Set the flags
    pub fn with_flags(mut self, flags: ColumnFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the default value
    pub fn with_default(mut self, default_value: impl Into<Vec<u8>>) -> Self {
        self.default_value = default_value.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_type_round_trip() {
        for raw in (0..=12).chain(14..=17) {
            let ty = ColumnType::from_raw(raw).unwrap();
            assert_eq!(ty.raw(), raw);
        }
    }

    #[test]
    fn unknown_column_type_is_rejected() {
        assert!(matches!(ColumnType::from_raw(13), Err(Error::Decode(_))));
        assert!(ColumnType::from_raw(99).is_err());
    }

    #[test]
    fn codepage_values() {
        assert_eq!(CodePage::from_raw(1252), CodePage::Ascii);
        assert_eq!(CodePage::from_raw(1200), CodePage::Unicode);
        assert_eq!(CodePage::from_raw(437), CodePage::None);
        assert_eq!(CodePage::Ascii.raw(), 1252);
    }

    #[test]
    fn unknown_flag_bits_are_truncated() {
        let flags = ColumnFlags::from_bits_truncate(0x8000_0001);
        assert_eq!(flags, ColumnFlags::FIXED);
    }

    #[test]
    fn builder_sets_fields() {
        let def = ColumnDefinition::new("title", ColumnType::LongText)
            .with_codepage(CodePage::Unicode)
            .with_max_length(512)
            .with_flags(ColumnFlags::TAGGED)
            .with_default(b"x".to_vec());
        assert_eq!(def.name, "title");
        assert!(def.columnid.is_nil());
        assert_eq!(def.codepage, CodePage::Unicode);
        assert_eq!(def.max_length, 512);
        assert_eq!(def.default_value, b"x");
    }
}
