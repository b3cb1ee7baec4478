//! WGSL output emission: the minifying printer and Source Map v3 support.

#[macro_use]
extern crate tracing;

mod printer;
pub use printer::print;

mod source_map;
pub use source_map::{OriginalPos, SourceMap, SourceMapBuilder};
