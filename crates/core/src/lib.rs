//! Core types for the Isam adapter
//!
//! This crate defines the types shared by the native layer and the adapter:
//! - Handles: opaque engine identifiers with `NIL` sentinels
//! - Status: raw engine status and its classification
//! - Error: caller-contract violations and enumeration faults
//! - Capabilities: feature snapshot derived from the engine build
//! - Schema model: column and index definitions, option bits
//! - AdapterConfig: `isam.toml` configuration

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod capabilities;
pub mod column;
pub mod config;
pub mod error;
pub mod grbit;
pub mod handle;
pub mod index;
pub mod status;

pub use capabilities::{build_number, Capabilities};
pub use column::{CodePage, ColumnDefinition, ColumnFlags, ColumnType, NAME_MOST};
pub use config::{AdapterConfig, CONFIG_FILE_NAME};
pub use error::{Error, Result};
pub use grbit::{
    AttachDatabaseFlags, CommitFlags, CreateDatabaseFlags, MakeKeyFlags, Move, MoveFlags,
    ObjectFlags, ObjectType, OpenDatabaseFlags, OpenTableFlags, Prep, RetrieveColumnFlags,
    RollbackFlags, SeekFlags, SetColumnFlags, TempTableFlags,
};
pub use handle::{ColumnId, DbId, Instance, Session, TableId};
pub use index::{
    CompareOptions, ComparePolicy, IndexDefinition, IndexFlags, IndexInfo, IndexSegment,
};
pub use status::{Status, StatusClass};
