//! Testing utilities for code built on the native surface
//!
//! - **StubEngine**: scriptable in-memory [`NativeEngine`](crate::NativeEngine)
//!   with a call log, staged metadata result sets and simple cursors
//! - **Rows**: the row and layout shapes the stub serves
//!
//! # Example
//!
//! ```ignore
//! use isam_native::testing::{ObjectRow, StubEngine};
//!
//! let stub = StubEngine::with_build(7600);
//! stub.stage_objects(vec![ObjectRow::table("Orders"), ObjectRow::system_table("MSysObjects")]);
//! stub.script("JetCommitTransaction", -1054);
//! ```

mod rows;
mod stub;

pub use rows::{column_layout, index_layout, object_layout, IndexRow, ObjectRow, Row};
pub use stub::{
    CreatedIndex, CreatedTable, StubEngine, TempTableCall, COLUMN_NOT_FOUND, INVALID_SESID,
    INVALID_TABLEID, NOT_IN_TRANSACTION, OBJECT_NOT_FOUND, UPDATE_NOT_PREPARED,
};
