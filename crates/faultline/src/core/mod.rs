//! Core error-annotation components
//!
//! - [`fault`](crate::core::fault) - the [`Fault`](crate::Fault) chain and capture-once wrapping
//! - [`stack`](crate::core::stack) - raw capture and lazy frame resolution
//! - [`result`](crate::core::result) - Result alias and extension traits
//! - [`format`](crate::core::format) - pluggable rendering strategy

pub mod fault;
pub mod format;
pub mod result;
pub mod stack;

pub use fault::{BoxError, Chain, Fault};
pub use format::{Formatter, Message, TextFormatter, set_formatter};
pub use result::{Result, ResultExt, catch};
pub use stack::{CapturedStack, ResolvedFrame};
