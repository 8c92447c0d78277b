//! Struct marshaling
//!
//! Converts schema definitions to the native records the engine reads and
//! back. Encoders stamp `cb_struct`, zero every native field the model does
//! not expose and pin any memory the record points into on the caller's
//! [`PinScope`]. Decoders drop unexposed fields and truncate unknown flag
//! bits.
//!
//! ## Key descriptions
//!
//! An index key is passed as a sequence of NUL-terminated segments, each a
//! direction character followed by the column name, closed by an extra NUL:
//!
//! ```text
//! +last\0-first\0\0
//! ```
//!
//! `cb_key` counts bytes, so a wide description is twice as long as its
//! code-unit count.

use crate::chars::{self, NativeChar};
use crate::pin::PinScope;
use crate::records::{
    NativeColumnCreate, NativeColumnDef, NativeIndexCreate, NativeIndexCreate1, NativeRecord,
    NativeTableCreate, NativeUnicodeIndex, INDEX_KEY_MOST, INDEX_UNICODE,
};
use isam_core::{
    CodePage, ColumnDefinition, ColumnFlags, ColumnId, ColumnType, ComparePolicy, Error,
    IndexDefinition, IndexFlags, IndexSegment, Result, NAME_MOST,
};
use std::ffi::c_void;

/// Validate a table, column or index name.
pub fn check_name(name: &str, arg: &'static str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid(arg, "must not be empty"));
    }
    if name.len() > NAME_MOST {
        return Err(Error::invalid(
            arg,
            format!("{} bytes exceeds the {NAME_MOST}-byte limit", name.len()),
        ));
    }
    chars::check_no_nul(name, arg)
}

fn length_u32(len: usize, arg: &'static str) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::ArgumentOutOfRange {
        name: arg,
        value: len as i64,
        reason: "does not fit the native 32-bit length",
    })
}

// ---- columns ------------------------------------------------------------

/// Encode a column definition. The name and default value travel separately.
pub fn column_def(def: &ColumnDefinition) -> NativeColumnDef {
    let mut native = NativeColumnDef {
        columnid: def.columnid.raw(),
        coltyp: def.column_type.raw(),
        cp: def.codepage.raw(),
        cb_max: def.max_length,
        grbit: def.flags.bits(),
        ..Default::default()
    };
    native.stamp();
    native
}

/// Decode a column definition filled by the engine.
pub fn column_from_def(name: impl Into<String>, native: &NativeColumnDef) -> Result<ColumnDefinition> {
    Ok(ColumnDefinition {
        name: name.into(),
        columnid: ColumnId::from_raw(native.columnid),
        column_type: ColumnType::from_raw(native.coltyp)?,
        codepage: CodePage::from_raw(native.cp),
        max_length: native.cb_max,
        default_value: Vec::new(),
        flags: ColumnFlags::from_bits_truncate(native.grbit),
    })
}

/// Encode a column for table creation. An empty default is passed as null.
pub fn column_create<C: NativeChar>(
    def: &ColumnDefinition,
    scope: &mut PinScope,
) -> Result<NativeColumnCreate<C>> {
    check_name(&def.name, "column.name")?;
    let name = chars::nul_terminated::<C>(&def.name, "column.name")?;
    let cb_default = length_u32(def.default_value.len(), "column.default_value")?;

    let mut native = NativeColumnCreate {
        column_name: C::pin_units(scope, name),
        coltyp: def.column_type.raw(),
        cb_max: def.max_length,
        grbit: def.flags.bits(),
        default: scope.pin_bytes(&def.default_value),
        cb_default,
        cp: u32::from(def.codepage.raw()),
        ..Default::default()
    };
    native.stamp();
    Ok(native)
}

/// Decode a column creation record.
///
/// # Safety
///
/// The record's name and default pointers must be null or valid.
pub unsafe fn column_from_create<C: NativeChar>(
    native: &NativeColumnCreate<C>,
) -> Result<ColumnDefinition> {
    let default_value = if native.default.is_null() || native.cb_default == 0 {
        Vec::new()
    } else {
        std::slice::from_raw_parts(native.default as *const u8, native.cb_default as usize).to_vec()
    };
    Ok(ColumnDefinition {
        name: chars::read_nul_terminated(native.column_name),
        columnid: ColumnId::from_raw(native.columnid),
        column_type: ColumnType::from_raw(native.coltyp)?,
        codepage: u16::try_from(native.cp).map_or(CodePage::None, CodePage::from_raw),
        max_length: native.cb_max,
        default_value,
        flags: ColumnFlags::from_bits_truncate(native.grbit),
    })
}

// ---- indexes ------------------------------------------------------------

/// Encode a comparison policy as a normalization descriptor.
pub fn unicode_index(policy: &ComparePolicy) -> NativeUnicodeIndex {
    NativeUnicodeIndex {
        lcid: policy.locale_id,
        map_flags: policy.map_flags(),
    }
}

/// Decode a normalization descriptor.
pub fn compare_from_unicode(native: &NativeUnicodeIndex) -> ComparePolicy {
    ComparePolicy::from_native(native.lcid, native.map_flags)
}

/// Encode key segments as a double-NUL-terminated key description.
pub fn key_description<C: NativeChar>(segments: &[IndexSegment]) -> Result<Vec<C>> {
    let mut units = Vec::new();
    for segment in segments {
        check_name(&segment.column_name, "index.segments.column_name")?;
        units.push(C::ascii(if segment.ascending { b'+' } else { b'-' }));
        units.extend(C::encode(&segment.column_name));
        units.push(C::NUL);
    }
    units.push(C::NUL);
    Ok(units)
}

/// Decode a key description back into segments.
pub fn parse_key_description<C: NativeChar>(units: &[C]) -> Result<Vec<IndexSegment>> {
    let plus = C::ascii(b'+');
    let minus = C::ascii(b'-');
    let mut segments = Vec::new();
    for token in units.split(|&u| u == C::NUL) {
        let Some((&sign, name)) = token.split_first() else {
            break;
        };
        let segment = if sign == plus {
            IndexSegment::ascending(C::decode(name))
        } else if sign == minus {
            IndexSegment::descending(C::decode(name))
        } else {
            return Err(Error::Decode(
                "key segment does not start with '+' or '-'".to_string(),
            ));
        };
        segments.push(segment);
    }
    Ok(segments)
}

/// Encode an index in the legacy layout.
///
/// A policy with normalization flags is passed as a pinned descriptor with
/// `INDEX_UNICODE` set; a plain locale is passed by value.
pub fn index_create<C: NativeChar>(
    def: &IndexDefinition,
    scope: &mut PinScope,
) -> Result<NativeIndexCreate<C>> {
    check_name(&def.name, "index.name")?;
    if def.segments.is_empty() {
        return Err(Error::ArgumentOutOfRange {
            name: "index.segments",
            value: 0,
            reason: "an index needs at least one key segment",
        });
    }
    let name = chars::nul_terminated::<C>(&def.name, "index.name")?;
    let key = key_description::<C>(&def.segments)?;
    let cb_key = length_u32(key.len() * C::WIDTH, "index.segments")?;

    let mut grbit = def.flags.bits();
    let locale = if def.compare.needs_descriptor() {
        grbit |= INDEX_UNICODE;
        scope.pin_descriptor(unicode_index(&def.compare)) as usize
    } else {
        def.compare.locale_id as usize
    };

    let mut native = NativeIndexCreate {
        index_name: C::pin_units(scope, name),
        key: C::pin_units(scope, key),
        cb_key,
        grbit,
        density: def.density,
        locale,
        ..Default::default()
    };
    native.stamp();
    Ok(native)
}

/// Encode an index in the Vista layout, carrying the maximum key length.
pub fn index_create1<C: NativeChar>(
    def: &IndexDefinition,
    scope: &mut PinScope,
) -> Result<NativeIndexCreate1<C>> {
    let mut native = NativeIndexCreate1 {
        base: index_create(def, scope)?,
        cb_key_most: def.max_key_length,
    };
    if def.max_key_length > 0 {
        native.base.grbit |= INDEX_KEY_MOST;
    }
    native.stamp();
    Ok(native)
}

/// Decode a legacy-layout index record.
///
/// # Safety
///
/// The record's name, key and (with `INDEX_UNICODE`) descriptor pointers
/// must be valid.
pub unsafe fn index_from_create<C: NativeChar>(
    native: &NativeIndexCreate<C>,
) -> Result<IndexDefinition> {
    let key = chars::read_units(native.key, native.cb_key as usize / C::WIDTH);
    let compare = if native.grbit & INDEX_UNICODE != 0 {
        let descriptor = native.locale as *const NativeUnicodeIndex;
        if descriptor.is_null() {
            return Err(Error::Decode(
                "unicode index record without a descriptor".to_string(),
            ));
        }
        compare_from_unicode(&*descriptor)
    } else {
        ComparePolicy::locale(native.locale as u32)
    };

    Ok(IndexDefinition {
        name: chars::read_nul_terminated(native.index_name),
        compare,
        segments: parse_key_description(&key)?,
        flags: IndexFlags::from_bits_truncate(native.grbit),
        density: native.density,
        max_key_length: 0,
    })
}

/// Decode a Vista-layout index record.
///
/// # Safety
///
/// As for [`index_from_create`].
pub unsafe fn index_from_create1<C: NativeChar>(
    native: &NativeIndexCreate1<C>,
) -> Result<IndexDefinition> {
    let mut def = index_from_create(&native.base)?;
    if native.base.grbit & INDEX_KEY_MOST != 0 {
        def.max_key_length = native.cb_key_most;
    }
    Ok(def)
}

// ---- tables -------------------------------------------------------------

/// A table creation record together with the arrays it points into.
///
/// `I` is the index record layout chosen for the call. The arrays are
/// heap-allocated and never resized, so [`TableCreate::as_mut_ptr`] stays
/// valid while `self` is alive and not mutated.
pub struct TableCreate<C, I> {
    record: NativeTableCreate<C>,
    columns: Vec<NativeColumnCreate<C>>,
    indexes: Vec<I>,
}

impl<C: NativeChar, I> TableCreate<C, I> {
    /// Encode a table with its columns and already-encoded indexes.
    pub fn new(
        name: &str,
        pages: u32,
        density: u32,
        columns: &[ColumnDefinition],
        indexes: Vec<I>,
        scope: &mut PinScope,
    ) -> Result<Self> {
        check_name(name, "table.name")?;
        let table_name = chars::nul_terminated::<C>(name, "table.name")?;
        let columns = columns
            .iter()
            .map(|def| column_create::<C>(def, scope))
            .collect::<Result<Vec<_>>>()?;

        let mut record = NativeTableCreate {
            table_name: C::pin_units(scope, table_name),
            pages,
            density,
            c_columns: length_u32(columns.len(), "table.columns")?,
            c_indexes: length_u32(indexes.len(), "table.indexes")?,
            ..Default::default()
        };
        record.stamp();
        Ok(TableCreate {
            record,
            columns,
            indexes,
        })
    }

    /// The record to pass to the engine.
    pub fn as_mut_ptr(&mut self) -> *mut NativeTableCreate<C> {
        self.record.column_creates = if self.columns.is_empty() {
            std::ptr::null_mut()
        } else {
            self.columns.as_mut_ptr()
        };
        self.record.index_creates = if self.indexes.is_empty() {
            std::ptr::null_mut()
        } else {
            self.indexes.as_mut_ptr() as *mut c_void
        };
        &mut self.record
    }

    /// Table id written by the engine
    pub fn tableid(&self) -> usize {
        self.record.tableid
    }

    /// Number of objects the engine reports as created
    pub fn created(&self) -> u32 {
        self.record.c_created
    }

    /// Copy engine-assigned column ids into the caller's definitions.
    pub fn echo_columnids(&self, defs: &mut [ColumnDefinition]) {
        for (def, native) in defs.iter_mut().zip(&self.columns) {
            def.columnid = ColumnId::from_raw(native.columnid);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isam_core::CompareOptions;
    use std::ffi::c_char;

    fn wide_units(text: &str) -> Vec<u16> {
        text.encode_utf16().collect()
    }

    #[test]
    fn column_def_is_stamped_and_zeroes_hidden_fields() {
        let def = ColumnDefinition::new("id", ColumnType::Long).with_flags(ColumnFlags::AUTOINCREMENT);
        let native = column_def(&def);
        assert!(native.is_stamped());
        assert_eq!(native.country, 0);
        assert_eq!(native.langid, 0);
        assert_eq!(native.collate, 0);
        assert_eq!(native.coltyp, 4);
        assert_eq!(native.grbit, 0x10);
    }

    #[test]
    fn column_def_decodes() {
        let native = NativeColumnDef {
            columnid: 7,
            coltyp: ColumnType::Text.raw(),
            cp: 1252,
            cb_max: 40,
            grbit: ColumnFlags::NOT_NULL.bits() | 0x4000_0000,
            ..Default::default()
        };
        let def = column_from_def("name", &native).unwrap();
        assert_eq!(def.columnid, ColumnId::from_raw(7));
        assert_eq!(def.codepage, CodePage::Ascii);
        assert_eq!(def.flags, ColumnFlags::NOT_NULL);
    }

    #[test]
    fn column_create_passes_empty_default_as_null() {
        let mut scope = PinScope::new();
        let def = ColumnDefinition::new("c", ColumnType::Binary);
        let native = column_create::<u16>(&def, &mut scope).unwrap();
        assert!(native.default.is_null());
        assert_eq!(native.cb_default, 0);
        assert!(native.is_stamped());
    }

    #[test]
    fn column_name_limits() {
        let mut scope = PinScope::new();
        let at_limit = ColumnDefinition::new("n".repeat(NAME_MOST), ColumnType::Long);
        assert!(column_create::<c_char>(&at_limit, &mut scope).is_ok());

        let over = ColumnDefinition::new("n".repeat(NAME_MOST + 1), ColumnType::Long);
        assert!(column_create::<c_char>(&over, &mut scope).is_err());

        let empty = ColumnDefinition::new("", ColumnType::Long);
        let err = column_create::<u16>(&empty, &mut scope).unwrap_err();
        assert!(err.is_contract_violation());
    }

    #[test]
    fn key_description_format() {
        let segments = vec![IndexSegment::ascending("last"), IndexSegment::descending("first")];
        let key = key_description::<u16>(&segments).unwrap();

        let mut expected = wide_units("+last");
        expected.push(0);
        expected.extend(wide_units("-first"));
        expected.extend([0, 0]);
        assert_eq!(key, expected);

        let parsed = parse_key_description(&key).unwrap();
        assert_eq!(parsed, segments);
    }

    #[test]
    fn key_description_rejects_missing_direction() {
        let mut key = wide_units("last");
        key.extend([0, 0]);
        assert!(matches!(parse_key_description(&key), Err(Error::Decode(_))));
    }

    #[test]
    fn cb_key_counts_bytes() {
        let mut scope = PinScope::new();
        let def = IndexDefinition::new("ix", vec![IndexSegment::ascending("ab")]);
        // "+ab\0\0" is five code units
        let ansi = index_create::<c_char>(&def, &mut scope).unwrap();
        assert_eq!(ansi.cb_key, 5);
        let wide = index_create::<u16>(&def, &mut scope).unwrap();
        assert_eq!(wide.cb_key, 10);
    }

    #[test]
    fn plain_locale_is_passed_by_value() {
        let mut scope = PinScope::new();
        let def = IndexDefinition::new("ix", vec![IndexSegment::ascending("a")])
            .with_compare(ComparePolicy::locale(1031));
        let native = index_create::<u16>(&def, &mut scope).unwrap();
        assert_eq!(native.grbit & INDEX_UNICODE, 0);
        assert_eq!(native.locale, 1031);
    }

    #[test]
    fn normalization_flags_use_a_descriptor() {
        let mut scope = PinScope::new();
        let compare = ComparePolicy {
            locale_id: 1033,
            options: CompareOptions::IGNORE_CASE,
        };
        let def = IndexDefinition::new("ix", vec![IndexSegment::ascending("a")])
            .with_flags(IndexFlags::UNIQUE)
            .with_compare(compare);
        let native = index_create::<u16>(&def, &mut scope).unwrap();
        assert_ne!(native.grbit & INDEX_UNICODE, 0);

        let decoded = unsafe { index_from_create(&native) }.unwrap();
        assert_eq!(decoded.compare, compare);
        assert_eq!(decoded.flags, IndexFlags::UNIQUE);
        assert_eq!(decoded.segments, def.segments);
    }

    #[test]
    fn empty_segments_are_rejected() {
        let mut scope = PinScope::new();
        let def = IndexDefinition::new("ix", Vec::new());
        let err = index_create::<c_char>(&def, &mut scope).unwrap_err();
        assert!(err.is_contract_violation());
    }

    #[test]
    fn vista_layout_carries_key_most() {
        let mut scope = PinScope::new();
        let mut def = IndexDefinition::new("ix", vec![IndexSegment::ascending("a")]);
        let without = index_create1::<u16>(&def, &mut scope).unwrap();
        assert_eq!(without.base.grbit & INDEX_KEY_MOST, 0);
        assert!(without.is_stamped());

        def.max_key_length = 1000;
        let with = index_create1::<u16>(&def, &mut scope).unwrap();
        assert_ne!(with.base.grbit & INDEX_KEY_MOST, 0);
        assert_eq!(unsafe { index_from_create1(&with) }.unwrap().max_key_length, 1000);
    }

    #[test]
    fn table_create_points_at_its_arrays() {
        let mut scope = PinScope::new();
        let columns = vec![
            ColumnDefinition::new("a", ColumnType::Long),
            ColumnDefinition::new("b", ColumnType::LongText),
        ];
        let def = IndexDefinition::new("ix", vec![IndexSegment::ascending("a")]);
        let indexes = vec![index_create1::<u16>(&def, &mut scope).unwrap()];
        let mut create =
            TableCreate::<u16, _>::new("t", 16, 80, &columns, indexes, &mut scope).unwrap();

        let record = unsafe { &*create.as_mut_ptr() };
        assert!(record.is_stamped());
        assert_eq!(record.c_columns, 2);
        assert_eq!(record.c_indexes, 1);
        let second = unsafe { column_from_create(&*record.column_creates.add(1)) }.unwrap();
        assert_eq!(second.name, "b");
    }
}
