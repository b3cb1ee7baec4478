//! WGSL lexer and parser.
//!
//! The lexer turns UTF-8 source into a token stream; the parser builds the
//! AST, eagerly creating symbols for every declaration and populating the
//! module scope. Name resolution happens afterwards, in the bind pass of
//! `wgslmin-sema`.

#[macro_use]
extern crate tracing;

pub mod lexer;
pub use lexer::{Cursor, Lexer};

mod parser;
pub use parser::Parser;

use wgslmin_interface::diagnostics::ErrorGuaranteed;

/// Parser result type: the error means a diagnostic has been recorded and
/// the parser should resynchronize.
pub type PResult<T> = Result<T, ErrorGuaranteed>;
