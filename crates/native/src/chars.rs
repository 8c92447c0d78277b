//! ANSI and wide string encoding
//!
//! The engine exposes every string-taking entry point twice: once for
//! 8-bit ANSI strings, once for UTF-16. [`NativeChar`] abstracts over the two
//! so records and marshaling code are written once.

use crate::pin::PinScope;
use byteorder::{ByteOrder, LittleEndian};
use isam_core::{Error, Result};
use std::ffi::{c_char, CString};

/// A native string code unit: `c_char` (ANSI) or `u16` (wide).
pub trait NativeChar: Copy + Eq + 'static {
    /// Bytes per code unit
    const WIDTH: usize;

    /// The terminator
    const NUL: Self;

    /// Encode without a terminator
    fn encode(text: &str) -> Vec<Self>;

    /// Decode code units, stopping at nothing
    fn decode(units: &[Self]) -> String;

    /// Give ownership of the units to a pin scope and return a stable pointer
    fn pin_units(scope: &mut PinScope, units: Vec<Self>) -> *const Self;

    /// A single ASCII character as a code unit
    fn ascii(byte: u8) -> Self;
}

impl NativeChar for c_char {
    const WIDTH: usize = 1;
    const NUL: Self = 0;

    /// Characters outside ASCII become `?`.
    fn encode(text: &str) -> Vec<Self> {
        text.chars()
            .map(|c| (if c.is_ascii() { c as u8 } else { b'?' }) as c_char)
            .collect()
    }

    fn decode(units: &[Self]) -> String {
        units.iter().map(|&u| (u as u8) as char).collect()
    }

    fn pin_units(scope: &mut PinScope, units: Vec<Self>) -> *const Self {
        scope.pin_ansi(units)
    }

    fn ascii(byte: u8) -> Self {
        byte as c_char
    }
}

impl NativeChar for u16 {
    const WIDTH: usize = 2;
    const NUL: Self = 0;

    fn encode(text: &str) -> Vec<Self> {
        text.encode_utf16().collect()
    }

    fn decode(units: &[Self]) -> String {
        String::from_utf16_lossy(units)
    }

    fn pin_units(scope: &mut PinScope, units: Vec<Self>) -> *const Self {
        scope.pin_wide(units)
    }

    fn ascii(byte: u8) -> Self {
        byte as u16
    }
}

/// Reject strings the engine cannot represent as NUL-terminated.
pub fn check_no_nul(text: &str, arg: &'static str) -> Result<()> {
    if text.contains('\0') {
        return Err(Error::invalid(arg, "contains an interior NUL"));
    }
    Ok(())
}

/// Encode with a trailing terminator.
pub fn nul_terminated<C: NativeChar>(text: &str, arg: &'static str) -> Result<Vec<C>> {
    check_no_nul(text, arg)?;
    let mut units = C::encode(text);
    units.push(C::NUL);
    Ok(units)
}

/// ANSI string for a `&CStr` parameter.
pub fn ansi(text: &str, arg: &'static str) -> Result<CString> {
    check_no_nul(text, arg)?;
    let bytes: Vec<u8> = <c_char as NativeChar>::encode(text)
        .into_iter()
        .map(|u| u as u8)
        .collect();
    CString::new(bytes).map_err(|_| Error::invalid(arg, "contains an interior NUL"))
}

/// NUL-terminated UTF-16 for a wide parameter.
pub fn wide(text: &str, arg: &'static str) -> Result<Vec<u16>> {
    nul_terminated::<u16>(text, arg)
}

/// Read a NUL-terminated string; a null pointer reads as empty.
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated sequence of `C`.
pub unsafe fn read_nul_terminated<C: NativeChar>(ptr: *const C) -> String {
    if ptr.is_null() {
        return String::new();
    }
    let mut len = 0;
    while *ptr.add(len) != C::NUL {
        len += 1;
    }
    C::decode(std::slice::from_raw_parts(ptr, len))
}

/// Copy `count` code units.
///
/// # Safety
///
/// `ptr` must be null (with `count == 0`) or valid for `count` reads.
pub unsafe fn read_units<C: NativeChar>(ptr: *const C, count: usize) -> Vec<C> {
    if ptr.is_null() || count == 0 {
        return Vec::new();
    }
    std::slice::from_raw_parts(ptr, count).to_vec()
}

/// Text retrieved from an ANSI cursor column, trailing NULs dropped.
pub fn decode_ansi_bytes(bytes: &[u8]) -> String {
    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    bytes[..end].iter().map(|&b| b as char).collect()
}

/// Text retrieved from a wide cursor column (UTF-16LE), trailing NULs dropped.
pub fn decode_wide_bytes(bytes: &[u8]) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(Error::Decode(format!(
            "wide text has odd byte length {}",
            bytes.len()
        )));
    }
    let mut units = vec![0u16; bytes.len() / 2];
    LittleEndian::read_u16_into(bytes, &mut units);
    while units.last() == Some(&0) {
        units.pop();
    }
    String::from_utf16(&units).map_err(|e| Error::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ansi_replaces_non_ascii() {
        let units = <c_char as NativeChar>::encode("caf\u{e9}");
        assert_eq!(<c_char as NativeChar>::decode(&units), "caf?");
        assert_eq!(ansi("caf\u{e9}", "name").unwrap().as_bytes(), b"caf?");
    }

    #[test]
    fn wide_keeps_unicode() {
        let units = wide("caf\u{e9}", "name").unwrap();
        assert_eq!(units.last(), Some(&0));
        assert_eq!(u16::decode(&units[..units.len() - 1]), "caf\u{e9}");
    }

    #[test]
    fn interior_nul_is_rejected() {
        assert!(ansi("a\0b", "name").is_err());
        assert!(wide("a\0b", "name").is_err());
        assert!(nul_terminated::<c_char>("a\0", "name").is_err());
    }

    #[test]
    fn read_back_terminated() {
        let units = wide("segment", "name").unwrap();
        let text = unsafe { read_nul_terminated(units.as_ptr()) };
        assert_eq!(text, "segment");
        assert_eq!(unsafe { read_nul_terminated::<u16>(std::ptr::null()) }, "");
    }

    #[test]
    fn retrieved_text_drops_terminators() {
        assert_eq!(decode_ansi_bytes(b"Orders\0"), "Orders");
        assert_eq!(decode_ansi_bytes(b""), "");

        let bytes: Vec<u8> = "Ord\u{e9}rs\0"
            .encode_utf16()
            .flat_map(|u| u.to_le_bytes())
            .collect();
        assert_eq!(decode_wide_bytes(&bytes).unwrap(), "Ord\u{e9}rs");
        assert!(decode_wide_bytes(&[0x41]).is_err());
    }
}
