//! WGSL minifier, validator, and reflection tool.
//!
//! Shrinks WebGPU shaders while preserving the identifiers the host API
//! must see verbatim, and reflects their external bindings and memory
//! layouts.
//!
//! # Examples
//!
//! ```
//! let output = wgslmin::minify(
//!     "@fragment fn main() -> @location(0) vec4<f32> { return vec4<f32>(0.0); }",
//!     &wgslmin::MinifyOptions::default(),
//! );
//! assert!(output.errors.is_empty());
//! assert!(output.code.contains("fn main("));
//! ```

#[macro_use]
extern crate tracing;

use indexmap::IndexMap;
use serde::Serialize;
use wgslmin_interface::Session;
use wgslmin_interface::diagnostics::Level;
use wgslmin_parse::Parser;

pub use wgslmin_ast as ast;
pub use wgslmin_config::{ConfigError, MinifyOptions};
pub use wgslmin_interface::diagnostics::SourceError;
pub use wgslmin_sema::{
    ArrayInfo, BindingInfo, EntryPointInfo, MemberLayout, ReflectInfo, StructLayout,
};

/// The result of a [`minify`] invocation.
///
/// If any error was recorded, `code` is the input source unchanged: the
/// minifier never emits partial output.
#[derive(Clone, Debug)]
pub struct MinifyOutput {
    /// The minified module, or the original source on error.
    pub code: String,
    /// Errors, in source order.
    pub errors: Vec<SourceError>,
    /// Warnings. These do not prevent minification.
    pub warnings: Vec<SourceError>,
    /// Input size in bytes.
    pub original_size: usize,
    /// Output size in bytes.
    pub minified_size: usize,
    /// The Source Map v3 JSON document, if requested.
    pub source_map: Option<String>,
    /// The source map as a `sourceMappingURL` data URI, if requested.
    pub source_map_data_uri: Option<String>,
}

/// Minifies a WGSL module.
#[instrument(name = "minify", level = "debug", skip_all)]
pub fn minify(source: &str, options: &MinifyOptions) -> MinifyOutput {
    let sess = new_session(source, options);
    let mut module = Parser::new(&sess).parse_module();
    if sess.check_errors().is_ok() {
        wgslmin_sema::bind(&sess, &mut module);
    }

    let (errors, warnings) = rendered_diagnostics(&sess);
    if !errors.is_empty() {
        debug!(errors = errors.len(), "returning original source");
        return MinifyOutput {
            code: source.to_string(),
            errors,
            warnings,
            original_size: source.len(),
            minified_size: source.len(),
            source_map: None,
            source_map_data_uri: None,
        };
    }

    wgslmin_sema::mark_live(&mut module);
    let renames = wgslmin_sema::assign_names(&module, options);
    let (code, map) = wgslmin_emit::print(&module, &renames, options, &sess.file);
    debug!(
        original = source.len(),
        minified = code.len(),
        ratio = %format_args!("{:.2}", code.len() as f64 / source.len().max(1) as f64),
        "minified"
    );
    MinifyOutput {
        errors,
        warnings,
        original_size: source.len(),
        minified_size: code.len(),
        code,
        source_map: map.as_ref().map(|m| m.json.clone()),
        source_map_data_uri: map.as_ref().map(|m| m.to_data_uri()),
    }
}

/// The result of a [`reflect`] invocation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectOutput {
    /// External bindings, in declaration order.
    pub bindings: Vec<BindingInfo>,
    /// Struct layouts by name, in declaration order.
    pub structs: IndexMap<String, StructLayout>,
    /// Entry points, in declaration order.
    pub entry_points: Vec<EntryPointInfo>,
    /// Rendered diagnostics. Reflection data is empty if any were errors.
    pub errors: Vec<String>,
}

impl ReflectOutput {
    /// Serializes the reflection data to JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("reflection serialization")
    }
}

/// Reflects a WGSL module: bindings, struct layouts, entry points.
#[instrument(name = "reflect", level = "debug", skip_all)]
pub fn reflect(source: &str) -> ReflectOutput {
    let options = MinifyOptions::default();
    let sess = new_session(source, &options);
    let mut module = Parser::new(&sess).parse_module();
    if sess.check_errors().is_ok() {
        wgslmin_sema::bind(&sess, &mut module);
    }

    let (errors, _warnings) = rendered_diagnostics(&sess);
    if !errors.is_empty() {
        return ReflectOutput {
            bindings: Vec::new(),
            structs: IndexMap::new(),
            entry_points: Vec::new(),
            errors: errors.iter().map(ToString::to_string).collect(),
        };
    }

    wgslmin_sema::mark_live(&mut module);
    let renames = wgslmin_sema::assign_names(&module, &options);
    let info = wgslmin_sema::reflect_module(&module, &renames);
    ReflectOutput {
        bindings: info.bindings,
        structs: info.structs,
        entry_points: info.entry_points,
        errors: Vec::new(),
    }
}

fn new_session(source: &str, options: &MinifyOptions) -> Session {
    let name = options.source_map_source_name.as_deref().unwrap_or("input.wgsl");
    Session::new(name, source)
}

/// Splits the session's diagnostics into rendered errors and warnings.
fn rendered_diagnostics(sess: &Session) -> (Vec<SourceError>, Vec<SourceError>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    for diag in sess.dcx.emitted() {
        let rendered = diag.render(&sess.file);
        match diag.level {
            Level::Error => errors.push(rendered),
            Level::Warning => warnings.push(rendered),
        }
    }
    (errors, warnings)
}
