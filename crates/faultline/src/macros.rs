//! Ergonomic macros for error creation and in-place annotation

/// Creates a [`Fault`](crate::Fault) from a formatted message, capturing
/// the call stack at the macro invocation.
///
/// # Examples
///
/// ```rust
/// use faultline::fault;
///
/// let user = "ana";
/// let err = fault!("no profile for {user}");
/// assert_eq!(err.message(), "no profile for ana");
///
/// let err = fault!("expected {} shards, got {}", 4, 7);
/// assert_eq!(err.message(), "expected 4 shards, got 7");
/// ```
#[macro_export]
macro_rules! fault {
    ($($arg:tt)*) => {
        $crate::Fault::new(format!($($arg)*))
    };
}

/// Rewraps the error held in a slot behind a formatted context message.
///
/// The format arguments are evaluated only when the slot actually holds an
/// error, so the call is free on the success path.
///
/// # Examples
///
/// ```rust
/// use faultline::{catch, fault};
///
/// let b = -1;
/// let mut err = Some(fault!("invalid argument"));
/// catch!(err, "do_another_stuff(b={b})");
/// assert_eq!(err.unwrap().message(), "do_another_stuff(b=-1): invalid argument");
///
/// let mut err: Option<faultline::Fault> = None;
/// catch!(err, "never formatted");
/// assert!(err.is_none());
/// ```
#[macro_export]
macro_rules! catch {
    ($slot:expr, $($arg:tt)*) => {
        $crate::catch(&mut $slot, || format!($($arg)*))
    };
}
