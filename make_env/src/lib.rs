#![forbid(unsafe_code)]

//! Environment variable names shared by the protomake library, its tests and
//! the `test_support` helpers.

/// Environment variable override for the `make` executable.
///
/// # Examples
///
/// ```
/// use make_env::MAKE_ENV;
/// assert_eq!(MAKE_ENV, "PROTOMAKE_MAKE");
/// ```
pub const MAKE_ENV: &str = "PROTOMAKE_MAKE";

/// Fallback for the proto tree root when `--proto-root` is not given.
pub const PROTO_ROOT_ENV: &str = "PROTOROOT";

/// Go workspace root used to derive the default generation root.
pub const GOPATH_ENV: &str = "GOPATH";
