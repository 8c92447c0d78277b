//! Native layer for the Isam adapter
//!
//! Everything that touches the engine's flat C surface lives here:
//! - Records: `#[repr(C)]` size-stamped layouts
//! - NativeEngine: one method per entry point, raw status out
//! - Chars: ANSI and wide string encoding behind one trait
//! - PinScope: owner of every buffer a single call points into
//! - Marshal: schema definitions to records and back
//! - Esent: the Windows binding, loaded at runtime
//! - Testing: an in-memory stub engine

#![warn(clippy::all)]

pub mod chars;
#[cfg(windows)]
pub mod dl;
pub mod engine;
#[cfg(windows)]
pub mod esent;
pub mod marshal;
pub mod pin;
pub mod records;
pub mod testing;

pub use chars::NativeChar;
pub use engine::NativeEngine;
#[cfg(windows)]
pub use esent::Esent;
pub use marshal::TableCreate;
pub use pin::PinScope;
pub use records::{
    NativeColumnCreate, NativeColumnDef, NativeColumnList, NativeIndexCreate, NativeIndexCreate1,
    NativeIndexList, NativeObjectList, NativeRecord, NativeTableCreate, NativeUnicodeIndex,
};
