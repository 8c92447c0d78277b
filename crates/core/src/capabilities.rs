//! Engine capability snapshot
//!
//! Capabilities are a step function of the engine's build number. Each
//! threshold is cumulative: a build that clears the Vista threshold also has
//! every Server 2003 feature.

/// First build with the Server 2003 feature set
pub const SERVER2003_BUILD: u32 = 2700;

/// First build with the Vista feature set, Unicode paths and large keys
pub const VISTA_BUILD: u32 = 6000;

/// First build with the Windows 7 feature set
pub const WINDOWS7_BUILD: u32 = 7000;

/// Composite-key column limit before the Vista feature set
pub const BASELINE_COLUMNS_KEY_MOST: u32 = 12;

/// Composite-key column limit from the Vista feature set onward
pub const VISTA_COLUMNS_KEY_MOST: u32 = 16;

/// Extract the build number from a raw version integer
pub const fn build_number(version: u32) -> u32 {
    (version & 0x00FF_FFFF) >> 8
}

/// What the loaded engine supports.
///
/// Immutable once derived; safe to share across threads and sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capabilities {
    /// Build number the snapshot was derived from
    pub build: u32,
    /// Maximum number of columns in a composite key
    pub columns_key_most: u32,
    /// Feature set A
    pub server2003_features: bool,
    /// Feature set B; selects the Vista index record layout
    pub vista_features: bool,
    /// Selects the wide-string entry points
    pub unicode_paths: bool,
    /// Keys longer than 255 bytes
    pub large_keys: bool,
    /// Feature set C
    pub windows7_features: bool,
}

impl Capabilities {
    /// Derive capabilities from a raw version integer
    pub const fn from_version(version: u32) -> Self {
        Self::from_build(build_number(version))
    }

    /// Derive capabilities from a build number
    pub const fn from_build(build: u32) -> Self {
        let vista = build >= VISTA_BUILD;
        Capabilities {
            build,
            columns_key_most: if vista {
                VISTA_COLUMNS_KEY_MOST
            } else {
                BASELINE_COLUMNS_KEY_MOST
            },
            server2003_features: build >= SERVER2003_BUILD,
            vista_features: vista,
            unicode_paths: vista,
            large_keys: vista,
            windows7_features: build >= WINDOWS7_BUILD,
        }
    }

    /// The baseline engine: no optional features
    pub const fn baseline() -> Self {
        Self::from_build(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn build_number_decoding() {
        // major 0x08, build 7600, low byte 0x10
        let version = 0x0800_0000 | (7600 << 8) | 0x10;
        assert_eq!(build_number(version), 7600);
    }

    #[test]
    fn baseline_below_first_threshold() {
        let caps = Capabilities::from_build(SERVER2003_BUILD - 1);
        assert_eq!(caps.columns_key_most, 12);
        assert!(!caps.server2003_features);
        assert!(!caps.vista_features);
        assert!(!caps.unicode_paths);
        assert!(!caps.large_keys);
        assert!(!caps.windows7_features);
    }

    #[test]
    fn server2003_threshold() {
        let caps = Capabilities::from_build(SERVER2003_BUILD);
        assert!(caps.server2003_features);
        assert!(!caps.vista_features);
        assert_eq!(caps.columns_key_most, 12);
    }

    #[test]
    fn vista_threshold() {
        let below = Capabilities::from_build(VISTA_BUILD - 1);
        assert!(!below.vista_features);
        assert!(!below.unicode_paths);

        let caps = Capabilities::from_build(VISTA_BUILD);
        assert!(caps.server2003_features);
        assert!(caps.vista_features);
        assert!(caps.unicode_paths);
        assert!(caps.large_keys);
        assert_eq!(caps.columns_key_most, 16);
        assert!(!caps.windows7_features);
    }

    #[test]
    fn windows7_threshold() {
        assert!(!Capabilities::from_build(WINDOWS7_BUILD - 1).windows7_features);
        let caps = Capabilities::from_build(WINDOWS7_BUILD);
        assert!(caps.windows7_features);
        assert!(caps.vista_features);
        assert!(caps.server2003_features);
        assert_eq!(caps.columns_key_most, 16);
    }

    proptest! {
        #[test]
        fn flags_are_cumulative(build in 0u32..0x0001_0000) {
            let caps = Capabilities::from_build(build);
            prop_assert_eq!(caps.server2003_features, build >= SERVER2003_BUILD);
            prop_assert_eq!(caps.vista_features, build >= VISTA_BUILD);
            prop_assert_eq!(caps.unicode_paths, caps.vista_features);
            prop_assert_eq!(caps.large_keys, caps.vista_features);
            prop_assert_eq!(caps.windows7_features, build >= WINDOWS7_BUILD);
            if caps.windows7_features { prop_assert!(caps.vista_features); }
            if caps.vista_features { prop_assert!(caps.server2003_features); }
        }

        #[test]
        fn version_high_byte_is_ignored(build in 0u32..0x0001_0000, major in 0u32..256, low in 0u32..256) {
            let version = (major << 24) | (build << 8) | low;
            prop_assert_eq!(Capabilities::from_version(version), Capabilities::from_build(build));
        }
    }
}
