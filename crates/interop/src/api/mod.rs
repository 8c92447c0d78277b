//! The call adapter
//!
//! [`Api`] exposes one method per logical engine operation. Each method
//! validates its arguments, picks the native variant the engine's
//! capabilities call for, marshals, calls, unmarshals and returns the raw
//! status.
//!
//! ## Results
//!
//! `Err` means a caller-contract violation caught before any native call
//! was made. Everything the engine reports, errors included, comes back as
//! `Ok(Status)` with the raw code untouched. Outputs are written through
//! `&mut` parameters, the way the native surface writes them.
//!
//! ## Dispatch
//!
//! Which string encoding and which index record layout to use is decided
//! once, when the `Api` is built, and never re-examined per call.

mod database;
mod info;
mod instance;
mod record;
mod table;

pub use instance::ParamValue;

use crate::detect;
use crate::status::observe;
use isam_core::{AdapterConfig, Capabilities, Error, IndexDefinition, Result, Status};
use isam_native::chars;
use isam_native::{marshal, NativeEngine};
use std::ffi::CString;
use std::sync::Arc;

/// Which string entry points to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringMode {
    /// `_a` entry points, 8-bit strings
    Ansi,
    /// `_w` entry points, UTF-16 strings
    Unicode,
}

/// Which index creation record to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexLayout {
    /// `NativeIndexCreate` with ANSI strings, no key-length field
    Legacy,
    /// `NativeIndexCreate1` with wide strings and `cb_key_most`
    Vista,
}

/// Variant choices derived from capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dispatch {
    /// String encoding
    pub strings: StringMode,
    /// Index record layout
    pub index_layout: IndexLayout,
}

impl Dispatch {
    /// Resolve variant choices for an engine
    pub const fn from_capabilities(capabilities: &Capabilities) -> Self {
        Dispatch {
            strings: if capabilities.unicode_paths {
                StringMode::Unicode
            } else {
                StringMode::Ansi
            },
            index_layout: if capabilities.vista_features {
                IndexLayout::Vista
            } else {
                IndexLayout::Legacy
            },
        }
    }
}

/// A string encoded for the selected entry points.
pub(crate) enum NativeText {
    Ansi(CString),
    Wide(Vec<u16>),
}

/// Capability-negotiated adapter over a [`NativeEngine`].
#[derive(Clone)]
pub struct Api {
    engine: Arc<dyn NativeEngine>,
    capabilities: Capabilities,
    dispatch: Dispatch,
}

impl std::fmt::Debug for Api {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Api")
            .field("capabilities", &self.capabilities)
            .field("dispatch", &self.dispatch)
            .finish_non_exhaustive()
    }
}

impl Api {
    /// Build an adapter, probing the engine unless the config overrides the version.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an invalid config and [`Error::Engine`]
    /// if the probe fails.
    pub fn new(engine: Arc<dyn NativeEngine>, config: &AdapterConfig) -> Result<Self> {
        config.validate()?;
        let capabilities = detect::detect(engine.as_ref(), config)?;
        Ok(Self::with_capabilities(engine, capabilities))
    }

    /// Build an adapter with known capabilities; makes no native calls.
    pub fn with_capabilities(engine: Arc<dyn NativeEngine>, capabilities: Capabilities) -> Self {
        Api {
            engine,
            capabilities,
            dispatch: Dispatch::from_capabilities(&capabilities),
        }
    }

    /// Capabilities of the engine
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Variant choices in effect
    pub fn dispatch(&self) -> Dispatch {
        self.dispatch
    }

    pub(crate) fn engine(&self) -> &dyn NativeEngine {
        self.engine.as_ref()
    }

    pub(crate) fn wide(&self) -> bool {
        self.dispatch.strings == StringMode::Unicode
    }

    /// Observe a native status and return it.
    pub(crate) fn finish(&self, op: &'static str, code: i32) -> Result<Status> {
        Ok(observe(op, Status::from_raw(code)))
    }

    /// Encode a string argument for the selected entry points.
    pub(crate) fn text(&self, value: &str, arg: &'static str) -> Result<NativeText> {
        Ok(match self.dispatch.strings {
            StringMode::Ansi => NativeText::Ansi(chars::ansi(value, arg)?),
            StringMode::Unicode => NativeText::Wide(chars::wide(value, arg)?),
        })
    }

    /// Encode a required, non-empty name.
    pub(crate) fn name(&self, value: &str, arg: &'static str) -> Result<NativeText> {
        if value.is_empty() {
            return Err(Error::invalid(arg, "must not be empty"));
        }
        self.text(value, arg)
    }

    /// Encode a table, column or index name, enforcing the engine's name limit.
    pub(crate) fn object_name(&self, value: &str, arg: &'static str) -> Result<NativeText> {
        marshal::check_name(value, arg)?;
        self.text(value, arg)
    }

    /// Encode an optional string argument.
    pub(crate) fn optional_text(
        &self,
        value: Option<&str>,
        arg: &'static str,
    ) -> Result<Option<NativeText>> {
        value.map(|v| self.text(v, arg)).transpose()
    }

    /// Check an index definition against the engine's key limits.
    pub(crate) fn check_index(&self, index: &IndexDefinition) -> Result<()> {
        let segments = index.segments.len();
        if segments == 0 || segments > self.capabilities.columns_key_most as usize {
            return Err(Error::ArgumentOutOfRange {
                name: "index.segments",
                value: segments as i64,
                reason: "key segment count must be between 1 and the engine's key column limit",
            });
        }
        Ok(())
    }
}

/// Validate a `(buffer, size)` pair and return the first `size` bytes.
pub(crate) fn checked_buffer<'a>(
    data: Option<&'a [u8]>,
    size: i32,
    arg: &'static str,
) -> Result<&'a [u8]> {
    let len = checked_size(size, arg)?;
    match data {
        None if len > 0 => Err(Error::ArgumentNull(arg)),
        None => Ok(&[]),
        Some(bytes) if len > bytes.len() => Err(Error::ArgumentOutOfRange {
            name: arg,
            value: i64::from(size),
            reason: "exceeds the buffer length",
        }),
        Some(bytes) => Ok(&bytes[..len]),
    }
}

/// Mutable form of [`checked_buffer`].
pub(crate) fn checked_buffer_mut<'a>(
    data: Option<&'a mut [u8]>,
    size: i32,
    arg: &'static str,
) -> Result<&'a mut [u8]> {
    let len = checked_size(size, arg)?;
    match data {
        None if len > 0 => Err(Error::ArgumentNull(arg)),
        None => Ok(&mut []),
        Some(bytes) if len > bytes.len() => Err(Error::ArgumentOutOfRange {
            name: arg,
            value: i64::from(size),
            reason: "exceeds the buffer length",
        }),
        Some(bytes) => Ok(&mut bytes[..len]),
    }
}

/// Validate a non-negative size and narrow it to the native width.
pub(crate) fn checked_u32(size: i32, arg: &'static str) -> Result<u32> {
    checked_size(size, arg).map(|size| size as u32)
}

/// Length of a record array as the native count.
pub(crate) fn checked_count(len: usize, arg: &'static str) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::ArgumentOutOfRange {
        name: arg,
        value: len as i64,
        reason: "too many records for one call",
    })
}

/// Validate a non-negative size or count.
pub(crate) fn checked_size(size: i32, arg: &'static str) -> Result<usize> {
    usize::try_from(size).map_err(|_| Error::ArgumentOutOfRange {
        name: arg,
        value: i64::from(size),
        reason: "must not be negative",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_follows_capabilities() {
        let legacy = Dispatch::from_capabilities(&Capabilities::from_build(2700));
        assert_eq!(legacy.strings, StringMode::Ansi);
        assert_eq!(legacy.index_layout, IndexLayout::Legacy);

        let vista = Dispatch::from_capabilities(&Capabilities::from_build(6000));
        assert_eq!(vista.strings, StringMode::Unicode);
        assert_eq!(vista.index_layout, IndexLayout::Vista);
    }

    #[test]
    fn buffer_checks() {
        let bytes = [1u8, 2, 3];
        assert_eq!(checked_buffer(Some(&bytes[..]), 2, "data").unwrap(), &[1, 2]);
        assert!(checked_buffer(None, 0, "data").unwrap().is_empty());
        assert!(matches!(
            checked_buffer(None, 1, "data"),
            Err(Error::ArgumentNull("data"))
        ));
        assert!(matches!(
            checked_buffer(Some(&bytes[..]), 4, "data"),
            Err(Error::ArgumentOutOfRange { .. })
        ));
        assert!(matches!(
            checked_buffer(Some(&bytes[..]), -1, "data"),
            Err(Error::ArgumentOutOfRange { value: -1, .. })
        ));
    }
}
