//! Capability detection against the stub engine
//!
//! The probe must leave nothing behind: every instance and session it
//! creates is released, whichever step fails.

mod common;

use common::{init_tracing, LEGACY_BUILD, VISTA_BUILD, WIN7_BUILD};
use isam_core::{AdapterConfig, Capabilities, Error};
use isam_interop::{detect, Api, IndexLayout, StringMode};
use isam_native::records::param;
use isam_native::testing::StubEngine;
use std::sync::Arc;
use tempfile::TempDir;

// ============================================================================
// Probe lifecycle
// ============================================================================

#[test]
fn probe_reads_version_and_releases_everything() {
    init_tracing();
    let stub = Arc::new(StubEngine::with_build(WIN7_BUILD));

    let api = Api::new(stub.clone(), &AdapterConfig::default()).unwrap();

    let caps = api.capabilities();
    assert_eq!(caps.build, WIN7_BUILD);
    assert!(caps.vista_features);
    assert!(caps.windows7_features);
    assert_eq!(api.dispatch().strings, StringMode::Unicode);
    assert_eq!(api.dispatch().index_layout, IndexLayout::Vista);

    assert_eq!(stub.live_instances(), 0);
    assert_eq!(stub.live_sessions(), 0);
    assert_eq!(stub.count("JetTerm"), 1);
    assert_eq!(stub.count("JetEndSession"), 1);
}

#[test]
fn probe_uses_ansi_entry_points_only() {
    init_tracing();
    let stub = Arc::new(StubEngine::with_build(WIN7_BUILD));
    detect::probe_version(stub.as_ref(), "probe").unwrap();

    let calls = stub.calls();
    assert!(calls.contains(&"JetCreateInstanceA"));
    assert!(calls.contains(&"JetBeginSessionA"));
    assert!(calls.iter().all(|c| !c.ends_with('W')));
}

#[test]
fn probe_instance_is_non_durable() {
    init_tracing();
    let stub = Arc::new(StubEngine::with_build(VISTA_BUILD));
    detect::probe_version(stub.as_ref(), "probe").unwrap();

    let params = stub.parameters();
    assert!(params.contains(&(param::RECOVERY, 0, Some("off".to_string()))));
    assert!(params.contains(&(param::NO_INFORMATION_EVENT, 1, None)));
    assert!(params.contains(&(param::MAX_TEMPORARY_TABLES, 0, None)));
}

#[test]
fn probe_releases_on_every_failure_point() {
    init_tracing();
    let steps = [
        "JetCreateInstanceA",
        "JetSetSystemParameterA",
        "JetInit",
        "JetBeginSessionA",
        "JetGetVersion",
    ];
    for step in steps {
        let stub = Arc::new(StubEngine::with_build(VISTA_BUILD));
        stub.script(step, -1090);

        let err = Api::new(stub.clone(), &AdapterConfig::default()).unwrap_err();
        match err {
            Error::Engine(status) => assert_eq!(status.code(), -1090, "step {step}"),
            other => panic!("step {step}: unexpected error {other:?}"),
        }

        assert_eq!(stub.live_instances(), 0, "instance leaked at {step}");
        assert_eq!(stub.live_sessions(), 0, "session leaked at {step}");

        let expected_terms = usize::from(step != "JetCreateInstanceA");
        assert_eq!(stub.count("JetTerm"), expected_terms, "step {step}");
        let expected_ends = usize::from(step == "JetGetVersion");
        assert_eq!(stub.count("JetEndSession"), expected_ends, "step {step}");
    }
}

#[test]
fn failed_teardown_does_not_mask_the_version() {
    init_tracing();
    let stub = Arc::new(StubEngine::with_build(LEGACY_BUILD));
    stub.script("JetTerm", -1);

    let api = Api::new(stub.clone(), &AdapterConfig::default()).unwrap();
    assert_eq!(api.capabilities().build, LEGACY_BUILD);
    assert_eq!(api.dispatch().strings, StringMode::Ansi);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn version_override_makes_no_native_calls() {
    init_tracing();
    let stub = Arc::new(StubEngine::with_build(LEGACY_BUILD));

    let api = Api::new(stub.clone(), &AdapterConfig::with_version(VISTA_BUILD << 8)).unwrap();

    assert_eq!(api.capabilities().build, VISTA_BUILD);
    assert_eq!(api.dispatch().index_layout, IndexLayout::Vista);
    assert_eq!(stub.call_count(), 0);
}

#[test]
fn zero_build_override_yields_baseline_capabilities() {
    init_tracing();
    let stub = Arc::new(StubEngine::with_build(WIN7_BUILD));

    let api = Api::new(stub.clone(), &AdapterConfig::with_version(0x0800_0010)).unwrap();

    assert_eq!(*api.capabilities(), Capabilities::baseline());
    assert_eq!(api.capabilities().columns_key_most, 12);
    assert_eq!(api.dispatch().strings, StringMode::Ansi);
    assert_eq!(api.dispatch().index_layout, IndexLayout::Legacy);
    assert_eq!(stub.call_count(), 0);
}

#[test]
fn probe_prefix_names_the_instance() {
    init_tracing();
    let stub = Arc::new(StubEngine::with_build(VISTA_BUILD));
    stub.script("JetTerm", -1);

    let config = AdapterConfig {
        probe_instance_prefix: "custom".to_string(),
        ..AdapterConfig::default()
    };
    Api::new(stub.clone(), &config).unwrap();

    let names = stub.instance_names();
    assert_eq!(names.len(), 1);
    assert!(names[0].starts_with(&format!("custom-{}-", std::process::id())));
}

#[test]
fn config_file_override_is_honoured() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(isam_core::CONFIG_FILE_NAME);
    std::fs::write(&path, format!("version_override = {}\n", WIN7_BUILD << 8)).unwrap();

    let config = AdapterConfig::from_file(&path).unwrap();
    let stub = Arc::new(StubEngine::with_build(LEGACY_BUILD));
    let api = Api::new(stub.clone(), &config).unwrap();

    assert_eq!(api.capabilities().build, WIN7_BUILD);
    assert_eq!(stub.call_count(), 0);
}

#[test]
fn invalid_config_is_rejected_before_probing() {
    init_tracing();
    let stub = Arc::new(StubEngine::with_build(VISTA_BUILD));
    let config = AdapterConfig {
        probe_instance_prefix: String::new(),
        ..AdapterConfig::default()
    };

    let err = Api::new(stub.clone(), &config).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert_eq!(stub.call_count(), 0);
}
