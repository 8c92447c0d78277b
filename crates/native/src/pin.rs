//! Scoped pinning of call buffers
//!
//! A [`PinScope`] owns every buffer a single native call points into: names,
//! key descriptions, default values, normalization descriptors. Each buffer
//! lives on the heap, so its address is stable for as long as the scope is
//! alive no matter how many more buffers are pinned after it. Dropping the
//! scope releases them all. A scope is created immediately before the call
//! and dropped immediately after it.

use crate::records::NativeUnicodeIndex;
use std::ffi::{c_char, c_void};
use std::ptr;
use tracing::trace;

/// Owner of the buffers referenced by one native call.
#[derive(Default)]
pub struct PinScope {
    ansi: Vec<Vec<c_char>>,
    wide: Vec<Vec<u16>>,
    bytes: Vec<Vec<u8>>,
    descriptors: Vec<Box<NativeUnicodeIndex>>,
}

impl PinScope {
    /// Empty scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin ANSI code units
    pub fn pin_ansi(&mut self, units: Vec<c_char>) -> *const c_char {
        if units.is_empty() {
            return ptr::null();
        }
        self.ansi.push(units);
        self.ansi[self.ansi.len() - 1].as_ptr()
    }

    /// Pin wide code units
    pub fn pin_wide(&mut self, units: Vec<u16>) -> *const u16 {
        if units.is_empty() {
            return ptr::null();
        }
        self.wide.push(units);
        self.wide[self.wide.len() - 1].as_ptr()
    }

    /// Pin a byte buffer; an empty buffer is passed as null
    pub fn pin_bytes(&mut self, bytes: &[u8]) -> *const c_void {
        if bytes.is_empty() {
            return ptr::null();
        }
        self.bytes.push(bytes.to_vec());
        self.bytes[self.bytes.len() - 1].as_ptr() as *const c_void
    }

    /// Pin a normalization descriptor
    pub fn pin_descriptor(&mut self, descriptor: NativeUnicodeIndex) -> *mut NativeUnicodeIndex {
        self.descriptors.push(Box::new(descriptor));
        let last = self.descriptors.len() - 1;
        &mut *self.descriptors[last] as *mut NativeUnicodeIndex
    }

    /// Number of pinned buffers
    pub fn len(&self) -> usize {
        self.ansi.len() + self.wide.len() + self.bytes.len() + self.descriptors.len()
    }

    /// Whether nothing is pinned
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for PinScope {
    fn drop(&mut self) {
        if !self.is_empty() {
            trace!(target: "isam::pin", pinned = self.len(), "Released call buffers");
        }
    }
}
