//! Engine capability detection
//!
//! The probe brings up a throwaway, non-durable engine instance, opens one
//! session, reads the version and tears everything down again. Teardown is
//! owned by guards, so the session and the instance are released on every
//! exit path, including a failure half-way through.
//!
//! Capabilities are not known yet while probing, so the probe only uses the
//! ANSI entry points.

use crate::status::observe;
use isam_core::{AdapterConfig, Capabilities, Error, Result, Status};
use isam_native::chars;
use isam_native::records::param;
use isam_native::NativeEngine;
use std::ffi::CString;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

static PROBE_SEQUENCE: AtomicU64 = AtomicU64::new(0);

struct InstanceGuard<'a> {
    engine: &'a dyn NativeEngine,
    raw: usize,
}

impl Drop for InstanceGuard<'_> {
    fn drop(&mut self) {
        let status = observe("JetTerm", Status::from_raw(self.engine.term(self.raw)));
        debug!(target: "isam::detect", code = status.code(), "Probe instance terminated");
    }
}

struct SessionGuard<'a> {
    engine: &'a dyn NativeEngine,
    raw: usize,
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        observe("JetEndSession", Status::from_raw(self.engine.end_session(self.raw, 0)));
    }
}

fn check(op: &'static str, code: i32) -> Result<()> {
    let status = observe(op, Status::from_raw(code));
    if status.is_error() {
        warn!(target: "isam::detect", op, code = status.code(), "Capability probe failed");
        return Err(Error::Engine(status));
    }
    Ok(())
}

/// Unique name for a probe instance: `<prefix>-<pid>-<n>`.
pub fn probe_instance_name(prefix: &str) -> String {
    let n = PROBE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}-{}", prefix, std::process::id(), n)
}

/// Read the raw engine version through a throwaway instance.
///
/// # Errors
///
/// Returns [`Error::Engine`] with the first negative status encountered.
pub fn probe_version(engine: &dyn NativeEngine, prefix: &str) -> Result<u32> {
    let name = probe_instance_name(prefix);
    let instance_name = chars::ansi(&name, "probe_instance_prefix")?;
    let recovery_off = CString::new("off").map_err(|_| Error::invalid("recovery", "NUL"))?;
    let empty = CString::default();

    debug!(target: "isam::detect", instance = %name, "Probing engine version");

    let mut raw = 0;
    check("JetCreateInstanceA", engine.create_instance_a(&mut raw, &instance_name))?;
    let mut instance = InstanceGuard { engine, raw };

    check(
        "JetSetSystemParameterA",
        engine.set_system_parameter_a(
            &mut instance.raw,
            0,
            param::RECOVERY,
            0,
            Some(recovery_off.as_c_str()),
        ),
    )?;
    check(
        "JetSetSystemParameterA",
        engine.set_system_parameter_a(&mut instance.raw, 0, param::NO_INFORMATION_EVENT, 1, None),
    )?;
    check(
        "JetSetSystemParameterA",
        engine.set_system_parameter_a(&mut instance.raw, 0, param::MAX_TEMPORARY_TABLES, 0, None),
    )?;
    check("JetInit", engine.init(&mut instance.raw))?;

    let mut sesid = 0;
    check(
        "JetBeginSessionA",
        engine.begin_session_a(instance.raw, &mut sesid, &empty, &empty),
    )?;
    let session = SessionGuard { engine, raw: sesid };

    let mut version = 0;
    check("JetGetVersion", engine.get_version(session.raw, &mut version))?;
    Ok(version)
}

/// Capabilities of the engine, from the override if configured, else probed.
pub fn detect(engine: &dyn NativeEngine, config: &AdapterConfig) -> Result<Capabilities> {
    let capabilities = match config.override_capabilities() {
        Some(capabilities) => {
            debug!(target: "isam::detect", build = capabilities.build, "Using configured engine version");
            capabilities
        }
        None => Capabilities::from_version(probe_version(engine, &config.probe_instance_prefix)?),
    };

    info!(
        target: "isam::detect",
        build = capabilities.build,
        columns_key_most = capabilities.columns_key_most,
        server2003 = capabilities.server2003_features,
        vista = capabilities.vista_features,
        windows7 = capabilities.windows7_features,
        unicode_paths = capabilities.unicode_paths,
        large_keys = capabilities.large_keys,
        "Engine capabilities"
    );
    Ok(capabilities)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_names_are_unique() {
        let a = probe_instance_name("p");
        let b = probe_instance_name("p");
        assert_ne!(a, b);
        assert!(a.starts_with(&format!("p-{}-", std::process::id())));
    }
}
