//! Result alias, extension traits and in-place annotation
//!
//! Every entry point here is a safe no-op on the success path, which is
//! what makes unconditional annotation at function exit correct: `Ok`
//! values and empty slots pass through untouched and no stack is captured.

use crate::core::fault::{BoxError, Fault};

/// Result type for fallible operations annotated with [`Fault`].
pub type Result<T> = std::result::Result<T, Fault>;

/// Extension trait wrapping the error arm of any compatible `Result`.
pub trait ResultExt<T> {
    /// Annotates the error with a stack capture unless its chain already
    /// carries one. `Ok` passes through untouched.
    fn fault(self) -> Result<T>;

    /// Like [`ResultExt::fault`], but attributes the capture to the caller
    /// of the invoking helper function.
    fn fault_up(self) -> Result<T>;

    /// Prefixes the error message with `context` and `": "`, wrapping with
    /// a capture if the chain has none.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Like [`ResultExt::context`], but the message is built only on the
    /// error path. The idiomatic tail-position call for attaching
    /// "called with these arguments" context on every return:
    ///
    /// ```rust
    /// use faultline::ResultExt;
    ///
    /// fn parse_port(raw: &str) -> faultline::Result<u16> {
    ///     raw.parse().with_context(|| format!("parse_port(raw={raw})"))
    /// }
    ///
    /// let err = parse_port("nope").unwrap_err();
    /// assert!(err.message().starts_with("parse_port(raw=nope): "));
    /// ```
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<BoxError>,
{
    fn fault(self) -> Result<T> {
        self.map_err(|e| Fault::wrap_with(e.into(), None, 0))
    }

    fn fault_up(self) -> Result<T> {
        self.map_err(|e| Fault::wrap_with(e.into(), None, 1))
    }

    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| Fault::wrap_with(e.into(), Some(context.into()), 0))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| Fault::wrap_with(e.into(), Some(f()), 0))
    }
}

/// Rewraps the error held in `slot` behind a context message, in place.
///
/// Empty slots are left untouched and `f` is never invoked, so the call is
/// safe on every return path. For imperatively-built errors; the
/// [`catch!`](crate::catch!) macro adds format-string sugar on top.
pub fn catch<F>(slot: &mut Option<Fault>, f: F)
where
    F: FnOnce() -> String,
{
    if let Some(err) = slot.take() {
        *slot = Some(Fault::wrap_with(Box::new(err), Some(f()), 0));
    }
}
