//! Opaque engine handles
//!
//! Handles are thin wrappers over the native-sized value the engine assigns.
//! They compare by value only: no ordering, no arithmetic. Each kind has a
//! `NIL` sentinel, which is also its `Default`.

use std::fmt;

macro_rules! engine_handle {
    ($(#[$meta:meta])* $name:ident, $raw:ty, $nil:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name($raw);

        impl $name {
            /// The distinguished invalid handle
            pub const NIL: $name = $name($nil);

            /// Wrap a value produced by the engine
            pub const fn from_raw(raw: $raw) -> Self {
                $name(raw)
            }

            /// The value passed back to the engine
            pub const fn raw(self) -> $raw {
                self.0
            }

            /// Whether this is the `NIL` sentinel
            pub const fn is_nil(self) -> bool {
                self.0 == $nil
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::NIL
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}(0x{:x})", stringify!($name), self.0)
            }
        }
    };
}

engine_handle!(
    /// Engine instance
    Instance,
    usize,
    0
);

engine_handle!(
    /// Session (transaction context)
    Session,
    usize,
    0
);

engine_handle!(
    /// Attached database opened by a session
    DbId,
    u32,
    0xFFFF_FFFF
);

engine_handle!(
    /// Open cursor on a table, temporary table or metadata result set
    TableId,
    usize,
    0
);

engine_handle!(
    /// Column identifier, stable for the table's lifetime
    ColumnId,
    u32,
    0
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn nil_is_default() {
        assert!(Instance::default().is_nil());
        assert!(Session::default().is_nil());
        assert!(TableId::default().is_nil());
        assert!(ColumnId::default().is_nil());
        assert_eq!(DbId::default().raw(), 0xFFFF_FFFF);
    }

    #[test]
    fn dbid_zero_is_a_real_database() {
        assert!(!DbId::from_raw(0).is_nil());
    }

    #[test]
    fn equality_is_by_value() {
        assert_eq!(TableId::from_raw(7), TableId::from_raw(7));
        assert_ne!(TableId::from_raw(7), TableId::from_raw(8));

        let set: HashSet<Session> = [Session::from_raw(1), Session::from_raw(1)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn display_names_the_kind() {
        assert_eq!(ColumnId::from_raw(255).to_string(), "ColumnId(0xff)");
    }
}
