//! Round-trip tests for the struct marshaler

use isam_core::{
    CodePage, ColumnDefinition, ColumnFlags, ColumnType, CompareOptions, ComparePolicy,
    IndexDefinition, IndexFlags, IndexSegment, NAME_MOST,
};
use isam_native::marshal::{
    column_create, column_from_create, index_create, index_create1, index_from_create,
    index_from_create1,
};
use isam_native::{NativeRecord, PinScope};
use proptest::prelude::*;
use std::ffi::c_char;

fn column_type() -> impl Strategy<Value = ColumnType> {
    prop::sample::select(vec![
        ColumnType::Bit,
        ColumnType::Long,
        ColumnType::LongLong,
        ColumnType::Text,
        ColumnType::LongText,
        ColumnType::Binary,
        ColumnType::LongBinary,
        ColumnType::Guid,
        ColumnType::UnsignedShort,
    ])
}

fn codepage() -> impl Strategy<Value = CodePage> {
    prop::sample::select(vec![CodePage::None, CodePage::Ascii, CodePage::Unicode])
}

fn column() -> impl Strategy<Value = ColumnDefinition> {
    (
        "[A-Za-z][A-Za-z0-9_]{0,63}",
        column_type(),
        codepage(),
        any::<u32>(),
        prop::collection::vec(any::<u8>(), 0..32),
        any::<u32>(),
    )
        .prop_map(|(name, ty, cp, max, default, flags)| {
            ColumnDefinition::new(name, ty)
                .with_codepage(cp)
                .with_max_length(max)
                .with_default(default)
                .with_flags(ColumnFlags::from_bits_truncate(flags))
        })
}

fn index() -> impl Strategy<Value = IndexDefinition> {
    (
        "[A-Za-z][A-Za-z0-9_]{0,30}",
        prop::collection::vec(("[A-Za-z][A-Za-z0-9]{0,15}", any::<bool>()), 1..=16),
        any::<u32>(),
        any::<u32>(),
        1024u32..2000,
    )
        .prop_map(|(name, segments, flags, options, locale)| {
            let segments = segments
                .into_iter()
                .map(|(column, ascending)| {
                    if ascending {
                        IndexSegment::ascending(column)
                    } else {
                        IndexSegment::descending(column)
                    }
                })
                .collect();
            IndexDefinition::new(name, segments)
                .with_flags(IndexFlags::from_bits_truncate(flags))
                .with_compare(ComparePolicy {
                    locale_id: locale,
                    options: CompareOptions::from_bits_truncate(options),
                })
        })
}

#[test]
fn column_with_longest_name_and_empty_default() {
    let mut scope = PinScope::new();
    let def = ColumnDefinition::new("x".repeat(NAME_MOST), ColumnType::LongText)
        .with_codepage(CodePage::Unicode)
        .with_flags(ColumnFlags::TAGGED | ColumnFlags::MULTI_VALUED);

    let wide = column_create::<u16>(&def, &mut scope).unwrap();
    assert!(wide.is_stamped());
    assert!(wide.default.is_null());
    assert_eq!(unsafe { column_from_create(&wide) }.unwrap(), def);

    let ansi = column_create::<c_char>(&def, &mut scope).unwrap();
    assert_eq!(unsafe { column_from_create(&ansi) }.unwrap(), def);
}

#[test]
fn legacy_index_drops_key_most() {
    let mut scope = PinScope::new();
    let mut def = IndexDefinition::new("ix", vec![IndexSegment::ascending("a")]);
    def.max_key_length = 500;
    let native = index_create::<c_char>(&def, &mut scope).unwrap();
    let decoded = unsafe { index_from_create(&native) }.unwrap();
    assert_eq!(decoded.max_key_length, 0);
    assert_eq!(decoded.segments, def.segments);
}

proptest! {
    #[test]
    fn column_round_trip(def in column()) {
        let mut scope = PinScope::new();
        let wide = column_create::<u16>(&def, &mut scope).unwrap();
        prop_assert_eq!(unsafe { column_from_create(&wide) }.unwrap(), def.clone());

        let ansi = column_create::<c_char>(&def, &mut scope).unwrap();
        prop_assert_eq!(unsafe { column_from_create(&ansi) }.unwrap(), def);
    }

    #[test]
    fn vista_index_round_trip(mut def in index(), key_most in 0u32..4096) {
        def.max_key_length = key_most;
        let mut scope = PinScope::new();
        let native = index_create1::<u16>(&def, &mut scope).unwrap();
        prop_assert!(native.is_stamped());
        prop_assert_eq!(unsafe { index_from_create1(&native) }.unwrap(), def);
    }

    #[test]
    fn legacy_index_round_trip(def in index()) {
        let mut scope = PinScope::new();
        let native = index_create::<c_char>(&def, &mut scope).unwrap();
        prop_assert_eq!(unsafe { index_from_create(&native) }.unwrap(), def);
    }
}
