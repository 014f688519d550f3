//! Macro for implementing Display and FromStr for wire-level status enums
//!
//! Remote APIs report statuses as camelCase strings (`inProgress`,
//! `notStarted`). This macro maps each variant to its wire string once and
//! derives both directions from that mapping. Parsing is exact: a value
//! differing only in case is an unknown status.
//!
//! # Example
//!
//! ```rust
//! use teamlink_domain::impl_wire_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum JobStatus {
//!     Queued,
//!     Running,
//! }
//!
//! impl_wire_status_conversions!(JobStatus {
//!     Queued => "queued",
//!     Running => "running",
//! });
//!
//! assert_eq!("running".parse::<JobStatus>().unwrap(), JobStatus::Running);
//! assert!("RUNNING".parse::<JobStatus>().is_err());
//! ```

/// Implements Display and FromStr traits for status enums
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their wire strings
///
/// Unrecognized input yields `Err` with the enum name and the raw value, so
/// callers can surface unknown remote statuses verbatim.
#[macro_export]
macro_rules! impl_wire_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
