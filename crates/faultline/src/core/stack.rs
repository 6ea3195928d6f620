//! Raw stack capture and lazy frame resolution
//!
//! Capture and symbolization are deliberately split: recording instruction
//! pointers is cheap and happens at error-creation time, while mapping them
//! to `file:line` pairs is expensive and runs only when an expanded trace is
//! actually requested.

use std::ffi::c_void;
use std::fmt;

/// Upper bound on recorded frames. Deeper stacks are silently truncated;
/// truncation is not an error.
pub(crate) const MAX_STACK_DEPTH: usize = 50;

/// Frames skipped at capture time so the recorded stack starts at the
/// application call site instead of inside the capture machinery.
pub(crate) const CALLER_OFFSET: usize = 4;

/// An immutable sequence of raw instruction pointers recorded at one point
/// in time.
///
/// The addresses stay opaque until resolution; an empty capture is valid
/// and renders as a plain message downstream.
#[derive(Clone)]
pub struct CapturedStack {
    ips: Vec<usize>,
}

impl CapturedStack {
    /// Records the current call stack, best-effort.
    ///
    /// `offset` shifts attribution further up the stack, for helper
    /// functions that capture on behalf of their own caller.
    #[inline(never)]
    pub(crate) fn capture(offset: usize) -> Self {
        let skip = CALLER_OFFSET + offset;
        let mut ips = Vec::with_capacity(MAX_STACK_DEPTH);
        let mut depth = 0usize;
        backtrace::trace(|frame| {
            depth += 1;
            if depth <= skip {
                return true;
            }
            ips.push(frame.ip() as usize);
            ips.len() < MAX_STACK_DEPTH
        });
        tracing::trace!(frames = ips.len(), skipped = skip, "captured error stack");
        Self { ips }
    }

    /// Number of recorded addresses.
    pub fn len(&self) -> usize {
        self.ips.len()
    }

    /// `true` when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.ips.is_empty()
    }

    pub(crate) fn addresses(&self) -> &[usize] {
        &self.ips
    }

    /// Symbolizes every recorded address, deepest call first.
    ///
    /// Frames without source information and frames belonging to the
    /// unwinding machinery are dropped. Resolution is a pure function of the
    /// addresses and the running binary's symbol table; callers memoize the
    /// result because symbolization is the expensive half of the pipeline.
    pub(crate) fn resolve(&self) -> Vec<ResolvedFrame> {
        let mut frames = Vec::with_capacity(self.ips.len());
        for &ip in &self.ips {
            backtrace::resolve(ip as *mut c_void, |symbol| {
                let (Some(file), Some(line)) = (symbol.filename(), symbol.lineno()) else {
                    return;
                };
                let file = file.display().to_string();
                if is_unwinder_frame(&file) {
                    return;
                }
                frames.push(ResolvedFrame { file, line });
            });
        }
        frames
    }
}

impl fmt::Debug for CapturedStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapturedStack")
            .field("frames", &self.ips.len())
            .finish()
    }
}

/// Frames from the unwinding internals would pollute every trace with
/// library noise, so filtering them out is a correctness requirement rather
/// than cosmetics.
fn is_unwinder_frame(file: &str) -> bool {
    file.contains("/backtrace-")
        || file.contains("\\backtrace-")
        || file.ends_with("library/std/src/backtrace.rs")
}

/// One symbolized stack entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolvedFrame {
    /// Source file the address resolved to.
    pub file: String,
    /// Line number within `file`.
    pub line: u32,
}

impl fmt::Display for ResolvedFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[inline(never)]
    fn recurse(n: usize) -> CapturedStack {
        if n == 0 {
            CapturedStack::capture(0)
        } else {
            std::hint::black_box(recurse(n - 1))
        }
    }

    #[test]
    fn capture_is_bounded() {
        let stack = recurse(MAX_STACK_DEPTH * 2);
        assert!(stack.len() <= MAX_STACK_DEPTH);
        assert!(!stack.is_empty());
    }

    #[test]
    fn resolve_preserves_capture_order_and_never_panics() {
        let stack = CapturedStack::capture(0);
        let first = stack.resolve();
        let second = stack.resolve();
        // Pure function of the addresses and the loaded binary.
        assert_eq!(first, second);
    }

    #[test]
    fn empty_capture_resolves_to_nothing() {
        let stack = CapturedStack { ips: Vec::new() };
        assert!(stack.is_empty());
        assert!(stack.resolve().is_empty());
    }

    #[test]
    fn unwinder_frames_are_filtered() {
        assert!(is_unwinder_frame(
            "/home/u/.cargo/registry/src/index/backtrace-0.3.75/src/lib.rs"
        ));
        assert!(!is_unwinder_frame("src/core/stack.rs"));
    }

    #[test]
    fn frame_display_is_file_colon_line() {
        let frame = ResolvedFrame {
            file: "src/main.rs".to_string(),
            line: 42,
        };
        assert_eq!(frame.to_string(), "src/main.rs:42");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn frame_serializes_for_structured_formatters() {
        let frame = ResolvedFrame {
            file: "src/main.rs".to_string(),
            line: 7,
        };
        let json = serde_json::to_string(&frame).unwrap();
        assert_eq!(json, r#"{"file":"src/main.rs","line":7}"#);
    }
}
