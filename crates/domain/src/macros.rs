//! Macro for implementing Display and FromStr for name-mapped enums
//!
//! # Example
//!
//! ```rust
//! use vspheredb_domain::impl_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum PowerState {
//!     PoweredOn,
//!     PoweredOff,
//! }
//!
//! impl_name_conversions!(PowerState {
//!     PoweredOn => "poweredOn",
//!     PoweredOff => "poweredOff",
//! });
//!
//! assert_eq!(PowerState::PoweredOn.to_string(), "poweredOn");
//! assert_eq!("POWEREDOFF".parse::<PowerState>().unwrap(), PowerState::PoweredOff);
//! ```

/// Implements Display and FromStr for enums with a canonical name per variant
///
/// - Display writes the canonical name exactly as given
/// - FromStr matches case-insensitively and fails with
///   [`VsphereDbError::InvalidInput`](crate::VsphereDbError::InvalidInput)
#[macro_export]
macro_rules! impl_name_conversions {
    ($enum_name:ident { $($variant:ident => $name:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Canonical name of this variant
            pub const fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::VsphereDbError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($name) {
                        return Ok(Self::$variant);
                    }
                )+
                Err($crate::VsphereDbError::InvalidInput(format!(
                    "Invalid {}: {}",
                    stringify!($enum_name),
                    s
                )))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use crate::VsphereDbError;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestState {
        PoweredOn,
        Suspended,
    }

    impl_name_conversions!(TestState {
        PoweredOn => "poweredOn",
        Suspended => "suspended",
    });

    #[test]
    fn test_display_keeps_canonical_case() {
        assert_eq!(TestState::PoweredOn.to_string(), "poweredOn");
        assert_eq!(TestState::Suspended.name(), "suspended");
    }

    #[test]
    fn test_fromstr_ignores_case() {
        assert_eq!(TestState::from_str("poweredon").unwrap(), TestState::PoweredOn);
        assert_eq!(TestState::from_str("POWEREDON").unwrap(), TestState::PoweredOn);
        assert_eq!(TestState::from_str("Suspended").unwrap(), TestState::Suspended);
    }

    #[test]
    fn test_fromstr_invalid() {
        let err = TestState::from_str("standby").unwrap_err();
        assert_eq!(err, VsphereDbError::InvalidInput("Invalid TestState: standby".into()));
        assert!(TestState::from_str("").is_err());
    }
}
