//! Diagnostics implementation.
//!
//! Diagnostics are values: the pipeline records them into a [`DiagCtxt`] and
//! the public API returns them to the caller. Nothing is written to stderr or
//! any other process-wide stream.

use crate::{SourceFile, Span};
use serde::Serialize;
use std::{cell::RefCell, fmt, marker::PhantomData};

/// Useful type to use with [`Result`](crate::Result) to indicate that an
/// error has already been recorded in the [`DiagCtxt`], so no need to
/// continue checking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ErrorGuaranteed(());

/// Diagnostic level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// An error in the source being minified. Any recorded error makes the
    /// minifier return the original source unchanged.
    Error,
    /// A warning. Does not prevent minification from finishing.
    Warning,
}

impl Level {
    /// Returns the string representation of the level.
    pub const fn to_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// A single recorded diagnostic.
#[derive(Clone, Debug)]
pub struct Diag {
    /// The diagnostic level.
    pub level: Level,
    /// The primary message.
    pub message: String,
    /// The primary span, if any.
    pub span: Option<Span>,
}

impl Diag {
    /// Resolves the diagnostic to a line/column record against `file`.
    pub fn render(&self, file: &SourceFile) -> SourceError {
        let lc = self.span.map(|s| file.lookup_line_col(s.lo()));
        SourceError {
            line: lc.map_or(1, |lc| lc.line),
            column: lc.map_or(1, |lc| lc.col1()),
            message: self.message.clone(),
        }
    }
}

/// A diagnostic resolved to a source position, as surfaced by the public API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SourceError {
    /// 1-based line.
    pub line: u32,
    /// 1-based column, in UTF-16 code units.
    pub column: u32,
    /// The diagnostic message.
    pub message: String,
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

/// The diagnostics context: an in-memory diagnostic sink.
///
/// Uses interior mutability so that passes holding `&Session` can record
/// diagnostics without threading `&mut` everywhere. Single-threaded by
/// design; the pipeline never shares a context across invocations.
#[derive(Debug, Default)]
pub struct DiagCtxt {
    emitted: RefCell<Vec<Diag>>,
}

impl DiagCtxt {
    /// Creates a new, empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder for an error diagnostic.
    #[track_caller]
    pub fn err(&self, message: impl Into<String>) -> DiagnosticBuilder<'_, ErrorGuaranteed> {
        DiagnosticBuilder::new(self, Level::Error, message.into())
    }

    /// Creates a builder for a warning diagnostic.
    pub fn warn(&self, message: impl Into<String>) -> DiagnosticBuilder<'_, ()> {
        DiagnosticBuilder::new(self, Level::Warning, message.into())
    }

    /// Records a finished diagnostic.
    pub fn emit_diag(&self, diag: Diag) {
        trace!(level = %diag.level, message = %diag.message, "emit");
        self.emitted.borrow_mut().push(diag);
    }

    /// Returns the number of recorded error diagnostics.
    pub fn err_count(&self) -> usize {
        self.emitted.borrow().iter().filter(|d| d.level == Level::Error).count()
    }

    /// Returns `Err` if any error diagnostic has been recorded.
    pub fn has_errors(&self) -> Result<(), ErrorGuaranteed> {
        if self.err_count() == 0 { Ok(()) } else { Err(ErrorGuaranteed(())) }
    }

    /// Returns a copy of all recorded diagnostics, in emission order.
    pub fn emitted(&self) -> Vec<Diag> {
        self.emitted.borrow().clone()
    }
}

/// Return type of diagnostic emission, statically tied to the level of the
/// builder that produced it: emitting an error yields an [`ErrorGuaranteed`].
pub trait EmissionGuarantee: Sized {
    #[doc(hidden)]
    fn emit_producing_guarantee(dcx: &DiagCtxt, diag: Diag) -> Self;
}

impl EmissionGuarantee for ErrorGuaranteed {
    fn emit_producing_guarantee(dcx: &DiagCtxt, diag: Diag) -> Self {
        debug_assert_eq!(diag.level, Level::Error);
        dcx.emit_diag(diag);
        ErrorGuaranteed(())
    }
}

impl EmissionGuarantee for () {
    fn emit_producing_guarantee(dcx: &DiagCtxt, diag: Diag) -> Self {
        dcx.emit_diag(diag);
    }
}

/// Used for constructing and then recording a diagnostic.
#[must_use = "diagnostics do nothing unless emitted with `emit`"]
pub struct DiagnosticBuilder<'a, G: EmissionGuarantee = ErrorGuaranteed> {
    dcx: &'a DiagCtxt,
    diag: Diag,
    _marker: PhantomData<G>,
}

impl<'a, G: EmissionGuarantee> DiagnosticBuilder<'a, G> {
    fn new(dcx: &'a DiagCtxt, level: Level, message: String) -> Self {
        Self { dcx, diag: Diag { level, message, span: None }, _marker: PhantomData }
    }

    /// Sets the primary span of the diagnostic.
    pub fn span(mut self, span: Span) -> Self {
        self.diag.span = Some(span);
        self
    }

    /// Records the diagnostic.
    pub fn emit(self) -> G {
        G::emit_producing_guarantee(self.dcx, self.diag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BytePos;

    #[test]
    fn errors_guarantee() {
        let dcx = DiagCtxt::new();
        assert!(dcx.has_errors().is_ok());
        dcx.warn("something odd").emit();
        assert!(dcx.has_errors().is_ok());
        let _: ErrorGuaranteed =
            dcx.err("bad token").span(Span::new(BytePos(1), BytePos(2))).emit();
        assert!(dcx.has_errors().is_err());
        assert_eq!(dcx.err_count(), 1);
        assert_eq!(dcx.emitted().len(), 2);
    }

    #[test]
    fn render() {
        let file = SourceFile::new("t.wgsl".into(), "abc\ndef".into());
        let d = Diag {
            level: Level::Error,
            message: "boom".into(),
            span: Some(Span::new(BytePos(5), BytePos(6))),
        };
        let r = d.render(&file);
        assert_eq!((r.line, r.column), (2, 2));
    }
}
