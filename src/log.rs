//! `debug!` and `warn!` for the conversion passes.
//!
//! The batch pass warns about every skipped icon and duplicate name, and the
//! parser warns when it drops a child node that has no tag. Group totals go
//! out at debug level. With the `tracing` feature these are the `tracing`
//! macros and the CLI's subscriber picks them up; without it every call
//! compiles away, arguments included.

#[cfg(feature = "tracing")]
pub use tracing::{debug, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub use crate::{debug, warn};
