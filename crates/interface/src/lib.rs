//! Source positions, spans, and diagnostics for the WGSL minifier.
//!
//! Everything in this crate is per-invocation state: a [`Session`] owns the
//! source file being processed and the diagnostic sink, and is dropped as a
//! unit when the pipeline finishes. There is no process-wide state.

#[macro_use]
extern crate tracing;

pub mod diagnostics;
use diagnostics::{DiagCtxt, ErrorGuaranteed};

mod pos;
pub use pos::{BytePos, CharPos};

mod source_file;
pub use source_file::{LineCol, SourceFile, utf16_width};

mod span;
pub use span::Span;

/// Pipeline result type.
///
/// The error carries no payload: by the time it is produced, the diagnostic
/// describing the failure has already been recorded in the [`DiagCtxt`].
pub type Result<T = (), E = ErrorGuaranteed> = std::result::Result<T, E>;

/// Per-invocation pipeline state.
///
/// Holds the source being minified and the diagnostic context. Passed by
/// reference through the lexer, parser, and semantic passes; never shared
/// between concurrent invocations.
pub struct Session {
    /// The diagnostics context.
    pub dcx: DiagCtxt,
    /// The source file being processed.
    pub file: SourceFile,
}

impl Session {
    /// Creates a new session for a single source file.
    pub fn new(name: impl Into<String>, src: impl Into<String>) -> Self {
        Self { dcx: DiagCtxt::new(), file: SourceFile::new(name.into(), src.into()) }
    }

    /// Returns `Err` if an error diagnostic has been emitted.
    #[inline]
    pub fn check_errors(&self) -> Result {
        self.dcx.has_errors()
    }

    /// Resolves a span to a 1-based line/column pair in this session's file.
    #[inline]
    pub fn lookup(&self, span: Span) -> LineCol {
        self.file.lookup_line_col(span.lo())
    }
}
