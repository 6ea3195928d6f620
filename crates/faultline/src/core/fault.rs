//! Main [`Fault`] type: capture-once wrapping and chain traversal
//!
//! A `Fault` chain is built from two node kinds. The capture-holder sits at
//! the deepest annotation site and owns the leaf error, the one recorded
//! stack and the memoized resolved frames. Context layers stack on top of it
//! in any number, each contributing only a message prefix. Wrapping an error
//! that already carries a holder anywhere in its source chain never captures
//! again and never touches the original holder's stack.

use std::error::Error as StdError;
use std::fmt;
use std::sync::OnceLock;

use crate::core::format::{Message, formatter};
use crate::core::stack::{CapturedStack, ResolvedFrame};

/// Boxed error payload carried inside a [`Fault`] chain.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// An error annotated with human-readable context and a single captured
/// call stack.
///
/// `Display` yields the composed context message only; the recorded stack
/// surfaces exclusively through [`Fault::trace`]. Both node kinds delegate
/// [`source`](StdError::source) to the wrapped error, so sentinel probing
/// and downcasting by surrounding code behave as if no wrapping occurred.
pub struct Fault {
    repr: Repr,
}

enum Repr {
    /// Capture-holder: owns the leaf error and the one stack snapshot.
    Captured {
        source: BoxError,
        stack: CapturedStack,
        frames: OnceLock<Vec<ResolvedFrame>>,
    },
    /// Context layer: annotation with no stack of its own. `inner` is
    /// either a `Fault` or a foreign error whose source chain holds one.
    Context {
        context: Option<String>,
        inner: BoxError,
    },
}

impl Fault {
    /// Creates a new error with `message`, capturing the call stack here.
    pub fn new(message: impl Into<String>) -> Self {
        Self::wrap_with(BoxError::from(message.into()), None, 0)
    }

    /// Annotates `err` with a stack capture unless its chain already has
    /// one, in which case only a context layer is added.
    pub fn wrap<E: Into<BoxError>>(err: E) -> Self {
        Self::wrap_with(err.into(), None, 0)
    }

    /// Like [`Fault::wrap`], but attributes the capture to the caller of
    /// the invoking function. For utility helpers that wrap errors on
    /// behalf of their own caller.
    pub fn wrap_up<E: Into<BoxError>>(err: E) -> Self {
        Self::wrap_with(err.into(), None, 1)
    }

    /// Wraps `err` behind a context message, joined to the inner message
    /// with `": "`.
    pub fn context<E: Into<BoxError>>(err: E, context: impl Into<String>) -> Self {
        Self::wrap_with(err.into(), Some(context.into()), 0)
    }

    /// Single routing point for all wrapping entry points.
    ///
    /// Invariant: a chain holds at most one capture, the one closest to the
    /// original failure site. The tag check on the head plus one source
    /// walk for foreign wrappers decides whether to capture.
    pub(crate) fn wrap_with(err: BoxError, context: Option<String>, offset: usize) -> Self {
        if find_fault(&*err).is_some() {
            return Self {
                repr: Repr::Context {
                    context,
                    inner: err,
                },
            };
        }
        let holder = Self {
            repr: Repr::Captured {
                source: err,
                stack: CapturedStack::capture(offset),
                frames: OnceLock::new(),
            },
        };
        Self {
            repr: Repr::Context {
                context,
                inner: Box::new(holder),
            },
        }
    }

    /// Plain one-line message, rendered through the installed
    /// [`Formatter`](crate::Formatter). Never resolves frames.
    pub fn message(&self) -> String {
        formatter().format(&Message::new(self, &[], false))
    }

    /// Expanded multi-line trace: the message followed by one `file:line`
    /// entry per resolved frame, deepest call first.
    ///
    /// Resolution runs once per error instance and is memoized. Degrades to
    /// the plain message when nothing was captured or nothing resolved.
    pub fn trace(&self) -> String {
        let frames = self.frames();
        formatter().format(&Message::new(self, frames, !frames.is_empty()))
    }

    /// Resolved source locations for the captured stack, deepest first.
    ///
    /// Empty when the chain carries no capture or symbolization found no
    /// source info.
    pub fn frames(&self) -> &[ResolvedFrame] {
        match self.holder().map(|h| &h.repr) {
            Some(Repr::Captured { stack, frames, .. }) => {
                frames.get_or_init(|| stack.resolve())
            }
            _ => &[],
        }
    }

    /// Iterates the error chain, outermost first, `self` included.
    pub fn chain(&self) -> Chain<'_> {
        Chain {
            next: Some(self as &(dyn StdError + 'static)),
        }
    }

    /// `true` when any link of the chain is an `E`.
    pub fn is<E: StdError + 'static>(&self) -> bool {
        self.downcast_ref::<E>().is_some()
    }

    /// Borrows the first chain link that is an `E`.
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.chain().find_map(|e| e.downcast_ref::<E>())
    }

    /// Walks down to the capture-holder node, if the chain has one.
    fn holder(&self) -> Option<&Fault> {
        match &self.repr {
            Repr::Captured { .. } => Some(self),
            Repr::Context { inner, .. } => find_fault(&**inner)?.holder(),
        }
    }

    #[cfg(test)]
    pub(crate) fn holder_stack(&self) -> Option<&CapturedStack> {
        match self.holder().map(|h| &h.repr) {
            Some(Repr::Captured { stack, .. }) => Some(stack),
            _ => None,
        }
    }

    #[cfg(test)]
    pub(crate) fn frames_resolved(&self) -> bool {
        matches!(
            self.holder().map(|h| &h.repr),
            Some(Repr::Captured { frames, .. }) if frames.get().is_some()
        )
    }

    #[cfg(test)]
    pub(crate) fn is_holder(&self) -> bool {
        matches!(self.repr, Repr::Captured { .. })
    }
}

/// First `Fault` in the source chain starting at `err` itself, if any.
fn find_fault<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a Fault> {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(fault) = e.downcast_ref::<Fault>() {
            return Some(fault);
        }
        current = e.source();
    }
    None
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Captured { source, .. } => fmt::Display::fmt(source, f),
            Repr::Context {
                context: Some(context),
                inner,
            } => write!(f, "{context}: {inner}"),
            Repr::Context {
                context: None,
                inner,
            } => fmt::Display::fmt(inner, f),
        }
    }
}

impl fmt::Debug for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Captured { source, stack, .. } => f
                .debug_struct("Captured")
                .field("source", source)
                .field("stack", stack)
                .finish_non_exhaustive(),
            Repr::Context { context, inner } => f
                .debug_struct("Context")
                .field("context", context)
                .field("inner", inner)
                .finish(),
        }
    }
}

impl StdError for Fault {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        let inner: &(dyn StdError + 'static) = match &self.repr {
            Repr::Captured { source, .. } => &**source,
            Repr::Context { inner, .. } => &**inner,
        };
        Some(inner)
    }
}

/// Iterator over an error chain, outermost first.
pub struct Chain<'a> {
    next: Option<&'a (dyn StdError + 'static)>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn StdError + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}
