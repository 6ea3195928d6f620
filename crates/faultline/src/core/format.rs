//! Pluggable rendering strategy
//!
//! One process-wide [`Formatter`] turns a [`Fault`] plus its resolved
//! frames into the final string. Applications substitute their own strategy
//! (machine-parseable output, custom layout) without touching the error
//! core. Reads of the strategy are lock-free; swapping it is an atomic
//! store intended for application startup.

use std::sync::{Arc, LazyLock};

use arc_swap::ArcSwap;

use crate::core::fault::Fault;
use crate::core::stack::ResolvedFrame;

/// Ephemeral rendering request handed to a [`Formatter`]. Not persisted.
pub struct Message<'a> {
    error: &'a Fault,
    frames: &'a [ResolvedFrame],
    expand: bool,
}

impl<'a> Message<'a> {
    pub(crate) fn new(error: &'a Fault, frames: &'a [ResolvedFrame], expand: bool) -> Self {
        Self {
            error,
            frames,
            expand,
        }
    }

    /// The full error chain being rendered.
    pub fn error(&self) -> &'a Fault {
        self.error
    }

    /// Resolved frames, deepest call first. Empty unless expanding.
    pub fn frames(&self) -> &'a [ResolvedFrame] {
        self.frames
    }

    /// `false` requests the plain one-line message, `true` the full trace.
    pub fn expand(&self) -> bool {
        self.expand
    }
}

/// Process-wide rendering strategy for [`Fault`] output.
///
/// Contract: when [`Message::expand`] is `false` the output is exactly the
/// error's own message text, with no frame information.
pub trait Formatter: Send + Sync {
    /// Renders `message` to its final string form.
    fn format(&self, message: &Message<'_>) -> String;
}

/// Default plain-text strategy: the message alone, or the message followed
/// by one indented `file:line` entry per frame when expanded.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format(&self, message: &Message<'_>) -> String {
        if !message.expand() {
            return message.error().to_string();
        }
        let mut out = message.error().to_string();
        for frame in message.frames() {
            out.push_str(&format!("\n    {frame}"));
        }
        out
    }
}

static FORMATTER: LazyLock<ArcSwap<Box<dyn Formatter>>> = LazyLock::new(|| {
    let default: Box<dyn Formatter> = Box::new(TextFormatter);
    ArcSwap::from_pointee(default)
});

/// Replaces the process-wide formatter.
///
/// Configure once at application startup, before errors start rendering
/// concurrently. The swap itself is atomic, so in-flight renderings finish
/// with whichever strategy they loaded.
pub fn set_formatter(formatter: impl Formatter + 'static) {
    let boxed: Box<dyn Formatter> = Box::new(formatter);
    FORMATTER.store(Arc::new(boxed));
}

pub(crate) fn formatter() -> Arc<Box<dyn Formatter>> {
    FORMATTER.load_full()
}
