// Stack traces
// Frame capture at error creation and merging across thread or task hand-offs

use std::ffi::c_void;
use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::config;

/// Separator printed between an enhanced capture and the trace it extends.
const SEGMENT_SEPARATOR: &str = "\n ---------------------------------- ";

/// Leading symbols with these prefixes belong to the capture machinery, this
/// crate or the runtime beneath them, and are not shown.
const INTERNAL_PREFIXES: &[&str] = &[
    "backtrace::",
    "faultline::",
    "<faultline::",
    "core::",
    "<core::",
    "std::",
    "<std::",
    "alloc::",
    "<alloc::",
];

/// A captured call stack.
///
/// Frames are stored as raw addresses and only symbolised when the trace is
/// printed. A trace produced by enhancement links to the trace of the error
/// it enhanced; when printed, the frames the two captures share at their
/// outer end are elided from the newer one and counted instead. Frames are
/// shared when they run the same function, whatever the line.
pub struct StackTrace {
    frames: Vec<Frame>,
    cause: Option<Arc<StackTrace>>,
}

/// One captured frame: where it returns to, and the function it belongs to.
#[derive(Debug, Clone, Copy)]
struct Frame {
    ip: usize,
    function: usize,
}

impl Frame {
    fn from_backtrace(frame: &backtrace::Frame) -> Self {
        let ip = frame.ip() as usize;
        let function = match frame.symbol_address() as usize {
            0 => ip,
            address => address,
        };
        Self { ip, function }
    }

    fn same_function(&self, other: &Frame) -> bool {
        self.function == other.function
    }
}

impl StackTrace {
    /// Capture the current stack, unless capture is disabled.
    #[inline(never)]
    pub(crate) fn capture() -> Option<Arc<StackTrace>> {
        let frames = capture_frames()?;
        Some(Arc::new(StackTrace {
            frames,
            cause: None,
        }))
    }

    /// Capture the current stack and link it to `cause`.
    ///
    /// Without a cause this is a plain capture. With capture disabled the
    /// cause is returned as is.
    #[inline(never)]
    pub(crate) fn enhance(cause: Option<Arc<StackTrace>>) -> Option<Arc<StackTrace>> {
        let Some(frames) = capture_frames() else {
            return cause;
        };

        let enhanced = StackTrace { frames, cause };
        trace!(
            captured = enhanced.frames.len(),
            duplicated = enhanced.duplicated_frames(),
            "Enhanced stack trace"
        );
        Some(Arc::new(enhanced))
    }

    #[cfg(test)]
    fn from_parts(frames: Vec<(usize, usize)>, cause: Option<Arc<StackTrace>>) -> Self {
        let frames = frames
            .into_iter()
            .map(|(ip, function)| Frame { ip, function })
            .collect();
        Self { frames, cause }
    }

    /// Number of frames in this capture, elided ones included.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The trace this one enhances, if any.
    pub fn cause(&self) -> Option<&StackTrace> {
        self.cause.as_deref()
    }

    /// Number of outermost frames shared with the cause trace.
    pub fn duplicated_frames(&self) -> usize {
        match &self.cause {
            Some(cause) => self
                .frames
                .iter()
                .rev()
                .zip(cause.frames.iter().rev())
                .take_while(|(ours, theirs)| ours.same_function(theirs))
                .count(),
            None => 0,
        }
    }

    fn unique_frames(&self) -> &[Frame] {
        &self.frames[..self.frames.len() - self.duplicated_frames()]
    }
}

impl fmt::Display for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for location in resolve_visible(self.unique_frames()) {
            write!(
                f,
                "\n at {}()\n\t{}:{}",
                location.function, location.file, location.line
            )?;
        }

        let duplicated = self.duplicated_frames();
        if duplicated > 0 {
            write!(f, "\n ...\n ({} duplicated frames)", duplicated)?;
        }

        if let Some(cause) = &self.cause {
            f.write_str(SEGMENT_SEPARATOR)?;
            fmt::Display::fmt(cause.as_ref(), f)?;
        }

        Ok(())
    }
}

impl fmt::Debug for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackTrace")
            .field("frames", &self.frames.len())
            .field("duplicated", &self.duplicated_frames())
            .field("cause", &self.cause)
            .finish()
    }
}

fn capture_frames() -> Option<Vec<Frame>> {
    let config = config::current();
    if !config.enabled {
        return None;
    }

    let mut frames = Vec::with_capacity(config.max_frames.min(64));
    backtrace::trace(|frame| {
        frames.push(Frame::from_backtrace(frame));
        frames.len() < config.max_frames
    });
    Some(frames)
}

struct Location {
    function: String,
    file: String,
    line: u32,
}

impl Location {
    fn from_symbol(symbol: &backtrace::Symbol) -> Self {
        Self {
            function: symbol
                .name()
                .map(|name| format!("{:#}", name))
                .unwrap_or_else(|| "<unknown>".to_string()),
            file: symbol
                .filename()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "<unknown>".to_string()),
            line: symbol.lineno().unwrap_or(0),
        }
    }

    fn unresolved(ip: usize) -> Self {
        Self {
            function: format!("{:#x}", ip),
            file: "<unknown>".to_string(),
            line: 0,
        }
    }
}

fn is_internal(function: &str) -> bool {
    !function.contains("::tests::")
        && INTERNAL_PREFIXES
            .iter()
            .any(|prefix| function.starts_with(prefix))
}

/// Symbolise `frames`, inlined calls expanded, and drop the leading symbols
/// of the capture machinery.
fn resolve_visible(frames: &[Frame]) -> Vec<Location> {
    let mut locations = Vec::new();
    for &Frame { ip, .. } in frames {
        let before = locations.len();
        // Return addresses point past the call; step back into it.
        backtrace::resolve(ip.saturating_sub(1) as *mut c_void, |symbol| {
            locations.push(Location::from_symbol(symbol));
        });
        if locations.len() == before {
            locations.push(Location::unresolved(ip));
        }
    }

    let internal = locations
        .iter()
        .take_while(|location| is_internal(&location.function))
        .count();
    locations.drain(..internal);
    locations
}
