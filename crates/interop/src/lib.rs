//! Capability-negotiated call adapter
//!
//! This crate sits between callers and the engine's flat surface:
//! - Detect: probe the engine version once and derive its capabilities
//! - Api: one method per engine operation, dispatched to the right native
//!   variant, with caller-contract checks before any native call
//! - Meta: iterators over the introspection result sets
//! - Status: the observation hook every status passes through

#![warn(clippy::all)]

pub mod api;
pub mod detect;
pub mod meta;
pub mod status;

pub use api::{Api, Dispatch, IndexLayout, ParamValue, StringMode};
pub use meta::{
    ColumnListLayout, Columns, CursorState, IndexListLayout, Indexes, MetaCursor,
    ObjectListLayout, TableNames, TempCursor,
};
pub use status::observe;
