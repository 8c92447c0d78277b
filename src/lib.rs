//! Isam - capability-negotiated adapter over the ESE/JET storage engine
//!
//! The engine exposes a flat C surface whose entry points, string encodings
//! and record layouts vary with its build. This crate probes the engine
//! once, picks the right variants, and exposes one typed operation per
//! engine operation plus iterators over its metadata.
//!
//! # Quick Start
//!
//! ```ignore
//! use isam::{AdapterConfig, Api, Esent};
//! use std::sync::Arc;
//!
//! let api = Api::new(Arc::new(Esent::load()?), &AdapterConfig::default())?;
//! for name in api.table_names(sesid, dbid)? {
//!     println!("{}", name?);
//! }
//! ```
//!
//! # Architecture
//!
//! - [`isam_core`]: handles, statuses, errors, capabilities, schema model, config
//! - [`isam_native`]: native records, the engine trait, marshaling, the stub engine
//! - [`isam_interop`]: capability detection, the call adapter, metadata enumeration

pub use isam_core::*;
pub use isam_interop::{
    detect, meta, observe, Api, Columns, CursorState, Dispatch, IndexLayout, Indexes, MetaCursor, ParamValue,
    StringMode, TableNames, TempCursor,
};
#[cfg(windows)]
pub use isam_native::Esent;
pub use isam_native::{testing, NativeEngine};
