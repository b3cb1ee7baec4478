//! WGSL minifier configuration.
//!
//! [`MinifyOptions`] is both the in-process options record and the on-disk
//! config format: all keys are optional camelCase JSON, so a caller (the
//! CLI, a bundler plugin) can deserialize a config file straight into it.

use serde::{Deserialize, Serialize};

/// Options controlling a single minify invocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MinifyOptions {
    /// Remove all non-significant whitespace.
    pub minify_whitespace: bool,
    /// Rename live, non-pinned identifiers to the shortest fresh names.
    pub minify_identifiers: bool,
    /// Rewrite numeric literals and type constructors to shorter spellings.
    pub minify_syntax: bool,
    /// Rename `@group`/`@binding` variables too. Off by default: the host
    /// looks bindings up by name.
    pub mangle_external_bindings: bool,
    /// Drop declarations not reachable from any entry point.
    pub tree_shaking: bool,
    /// Keep the names of struct types used as uniform or storage buffer
    /// types.
    pub preserve_uniform_struct_types: bool,
    /// Names to keep verbatim regardless of the options above.
    pub keep_names: Vec<String>,

    /// Emit a Source Map v3 for the minified output.
    pub source_map: bool,
    /// Embed the original source in the map's `sourcesContent`.
    pub source_map_include_sources: bool,
    /// Value of the map's `file` field.
    pub source_map_file: Option<String>,
    /// Name used for the original source in the map's `sources`. Defaults
    /// to the session's file name.
    pub source_map_source_name: Option<String>,
}

impl Default for MinifyOptions {
    fn default() -> Self {
        Self {
            minify_whitespace: true,
            minify_identifiers: true,
            minify_syntax: true,
            mangle_external_bindings: false,
            tree_shaking: true,
            preserve_uniform_struct_types: false,
            keep_names: Vec::new(),
            source_map: false,
            source_map_include_sources: false,
            source_map_file: None,
            source_map_source_name: None,
        }
    }
}

impl MinifyOptions {
    /// Parses options from a JSON config record. Missing keys take their
    /// defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// An error reading a config record.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config was not valid JSON, or a key had the wrong type.
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = MinifyOptions::default();
        assert!(opts.minify_whitespace);
        assert!(opts.minify_identifiers);
        assert!(opts.minify_syntax);
        assert!(opts.tree_shaking);
        assert!(!opts.mangle_external_bindings);
        assert!(!opts.preserve_uniform_struct_types);
        assert!(opts.keep_names.is_empty());
        assert!(!opts.source_map);
    }

    #[test]
    fn from_json_partial() {
        let opts =
            MinifyOptions::from_json(r#"{"minifyIdentifiers": false, "keepNames": ["foo"]}"#)
                .unwrap();
        assert!(!opts.minify_identifiers);
        assert_eq!(opts.keep_names, ["foo"]);
        // Unmentioned keys keep their defaults.
        assert!(opts.minify_whitespace);
    }

    #[test]
    fn from_json_rejects_garbage() {
        assert!(MinifyOptions::from_json("{").is_err());
        assert!(MinifyOptions::from_json(r#"{"treeShaking": "yes"}"#).is_err());
    }
}
