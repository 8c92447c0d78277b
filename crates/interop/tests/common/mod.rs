//! Shared helpers for the adapter integration tests

#![allow(dead_code)]

use isam_core::{Capabilities, DbId, Session};
use isam_interop::Api;
use isam_native::testing::StubEngine;
use std::sync::Arc;

/// Windows Server 2003 build: ANSI entry points, legacy index records
pub const LEGACY_BUILD: u32 = 3790;
/// Vista build: wide entry points, Vista index records
pub const VISTA_BUILD: u32 = 6002;
/// Windows 7 build
pub const WIN7_BUILD: u32 = 7600;

pub const SESID: Session = Session::from_raw(0x42);
pub const DBID: DbId = DbId::from_raw(1);

/// Route adapter logs to the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

/// A stub engine and an adapter over it with known capabilities.
pub fn stub_api(build: u32) -> (Arc<StubEngine>, Api) {
    init_tracing();
    let stub = Arc::new(StubEngine::with_build(build));
    let api = Api::with_capabilities(stub.clone(), Capabilities::from_build(build));
    (stub, api)
}
