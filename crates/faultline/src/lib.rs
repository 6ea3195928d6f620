//! # faultline
//!
//! Stack-annotated error wrapping for backend services: one captured call
//! stack per error chain, human-readable context prepended at each layer,
//! and a pluggable renderer that resolves frames only when an expanded
//! trace is actually requested.
//!
//! ## Quick Start
//!
//! ```rust
//! use faultline::ResultExt;
//!
//! fn read_config(path: &str) -> faultline::Result<String> {
//!     std::fs::read_to_string(path).with_context(|| format!("read_config(path={path})"))
//! }
//!
//! let err = read_config("/no/such/file").unwrap_err();
//! assert!(err.message().starts_with("read_config(path=/no/such/file): "));
//!
//! // Message followed by one indented `file:line` entry per frame.
//! println!("{}", err.trace());
//! ```
//!
//! ## Guarantees
//!
//! - **Capture once**: the stack is recorded at the deepest annotation site
//!   and survives any number of re-wraps unchanged.
//! - **Cheap by default**: `Display` and [`Fault::message`] never touch the
//!   symbol table; resolution is lazy and memoized per error.
//! - **Transparent chains**: `source()` keeps delegating to the wrapped
//!   error, so sentinel probing and downcasting work as if no wrapping
//!   had occurred.
//! - **Pluggable output**: [`set_formatter`] swaps the process-wide
//!   rendering strategy, e.g. for machine-parseable traces.

pub mod core;

// === Ergonomic Macros ===
pub mod macros;

/// Main error type carrying context layers and one captured stack
pub use crate::core::fault::{BoxError, Chain, Fault};

/// Result type alias for `Result<T, Fault>`
pub use crate::core::result::{Result, ResultExt, catch};

/// Pluggable rendering strategy
pub use crate::core::format::{Formatter, Message, TextFormatter, set_formatter};

/// Captured addresses and resolved source locations
pub use crate::core::stack::{CapturedStack, ResolvedFrame};

/// Convenient prelude with everything you need
pub mod prelude {
    // `catch` pulls in both the function and the macro of the same name;
    // `fault` is the macro alone.
    pub use crate::{Fault, Formatter, Result, ResultExt, catch, fault, set_formatter};
}
