//! Adapter configuration via `isam.toml`
//!
//! The only knob that changes behavior is the version override: when set,
//! capabilities are derived from it and the engine is never probed.

use crate::capabilities::Capabilities;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name.
pub const CONFIG_FILE_NAME: &str = "isam.toml";

fn default_probe_instance_prefix() -> String {
    "isam-probe".to_string()
}

/// Adapter configuration loaded from `isam.toml`.
///
/// # Example
///
/// ```toml
/// # Skip the capability probe and assume this raw engine version
/// # version_override = 0x08001DB0
///
/// probe_instance_prefix = "isam-probe"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Raw engine version to assume instead of probing the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_override: Option<u32>,
    /// Name prefix for the throwaway probe instance.
    #[serde(default = "default_probe_instance_prefix")]
    pub probe_instance_prefix: String,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            version_override: None,
            probe_instance_prefix: default_probe_instance_prefix(),
        }
    }
}

impl AdapterConfig {
    /// Config that skips probing and assumes the given raw version.
    pub fn with_version(version: u32) -> Self {
        Self {
            version_override: Some(version),
            ..Self::default()
        }
    }

    /// Capabilities implied by the override, if any.
    pub fn override_capabilities(&self) -> Option<Capabilities> {
        self.version_override.map(Capabilities::from_version)
    }

    /// Check the configuration for values the probe cannot use.
    ///
    /// # Errors
    ///
    /// Returns an error if the probe prefix is empty or contains a NUL.
    pub fn validate(&self) -> Result<()> {
        if self.probe_instance_prefix.is_empty() {
            return Err(Error::Config(
                "probe_instance_prefix must not be empty".to_string(),
            ));
        }
        if self.probe_instance_prefix.contains('\0') {
            return Err(Error::Config(
                "probe_instance_prefix must not contain NUL".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Isam adapter configuration
#
# Raw engine version to assume instead of probing the engine (default: probe).
# The build number is (version & 0xFFFFFF) >> 8.
# version_override = 0x08001DB0

# Name prefix for the throwaway instance used by the capability probe.
probe_instance_prefix = "isam-probe"
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AdapterConfig = toml::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::build_number;
    use tempfile::TempDir;

    #[test]
    fn default_config_probes() {
        let config = AdapterConfig::default();
        assert!(config.version_override.is_none());
        assert!(config.override_capabilities().is_none());
        assert_eq!(config.probe_instance_prefix, "isam-probe");
    }

    #[test]
    fn default_toml_parses_correctly() {
        let config: AdapterConfig = toml::from_str(AdapterConfig::default_toml()).unwrap();
        assert_eq!(config, AdapterConfig::default());
    }

    #[test]
    fn override_derives_capabilities() {
        let config = AdapterConfig::with_version(7600 << 8);
        let caps = config.override_capabilities().unwrap();
        assert_eq!(caps.build, 7600);
        assert!(caps.windows7_features);
    }

    #[test]
    fn empty_prefix_is_rejected() {
        let config = AdapterConfig {
            probe_instance_prefix: String::new(),
            ..AdapterConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn zero_build_override_is_baseline() {
        let config = AdapterConfig::with_version(0x0800_0010);
        assert!(config.validate().is_ok());
        assert_eq!(build_number(0x0800_0010), 0);
        assert_eq!(config.override_capabilities(), Some(Capabilities::baseline()));
    }

    #[test]
    fn write_default_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        assert!(!path.exists());

        AdapterConfig::write_default_if_missing(&path).unwrap();
        assert!(path.exists());

        let config = AdapterConfig::from_file(&path).unwrap();
        assert!(config.version_override.is_none());
    }

    #[test]
    fn write_default_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        std::fs::write(&path, "version_override = 1536000\n").unwrap();
        AdapterConfig::write_default_if_missing(&path).unwrap();

        let config = AdapterConfig::from_file(&path).unwrap();
        assert_eq!(config.version_override, Some(1_536_000));
    }

    #[test]
    fn write_to_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        let config = AdapterConfig {
            version_override: Some(6002 << 8),
            probe_instance_prefix: "custom".to_string(),
        };
        config.write_to_file(&path).unwrap();

        let loaded = AdapterConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = AdapterConfig::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(Error::IoError(_))));
    }
}
