//! Source Map v3 emission.
//!
//! Mapping segments are base64 VLQ deltas grouped per generated line.
//! Columns on both sides are counted in UTF-16 code units so that map
//! positions line up with WebGPU's `GPUCompilationMessage`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use indexmap::IndexSet;
use serde::Serialize;

/// An original position: 0-based line and 0-based UTF-16 column.
#[derive(Clone, Copy, Debug)]
pub struct OriginalPos {
    pub line: u32,
    pub col: u32,
}

#[derive(Clone, Copy, Debug)]
struct Segment {
    gen_col: u32,
    orig_line: u32,
    orig_col: u32,
    name: Option<u32>,
}

/// Accumulates mappings while the printer runs, then encodes the map.
#[derive(Debug)]
pub struct SourceMapBuilder {
    file: Option<String>,
    source_name: String,
    source_content: Option<String>,
    names: IndexSet<String>,
    lines: Vec<Vec<Segment>>,
}

impl SourceMapBuilder {
    /// Creates a builder for a map over a single original source.
    pub fn new(
        source_name: impl Into<String>,
        source_content: Option<String>,
        file: Option<String>,
    ) -> Self {
        Self {
            file,
            source_name: source_name.into(),
            source_content,
            names: IndexSet::new(),
            lines: Vec::new(),
        }
    }

    /// Interns an original name, returning its index in `names`.
    ///
    /// Names keep first-insertion order, so indices are stable across runs.
    pub fn name_index(&mut self, name: &str) -> u32 {
        if let Some(index) = self.names.get_index_of(name) {
            return index as u32;
        }
        self.names.insert_full(name.to_string()).0 as u32
    }

    /// Records a mapping from a generated position to an original one.
    ///
    /// Must be called in generated order: lines ascending, columns
    /// ascending within a line.
    pub fn add_mapping(
        &mut self,
        gen_line: u32,
        gen_col: u32,
        orig: OriginalPos,
        name: Option<u32>,
    ) {
        while self.lines.len() <= gen_line as usize {
            self.lines.push(Vec::new());
        }
        self.lines[gen_line as usize].push(Segment {
            gen_col,
            orig_line: orig.line,
            orig_col: orig.col,
            name,
        });
    }

    /// Encodes the accumulated mappings into a Source Map v3 JSON string.
    pub fn finish(self) -> SourceMap {
        let mut mappings = String::new();
        let mut prev_orig_line = 0i64;
        let mut prev_orig_col = 0i64;
        let mut prev_name = 0i64;
        let mut prev_source = 0i64;
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                mappings.push(';');
            }
            let mut prev_gen_col = 0i64;
            for (j, segment) in line.iter().enumerate() {
                if j > 0 {
                    mappings.push(',');
                }
                encode_vlq(&mut mappings, segment.gen_col as i64 - prev_gen_col);
                prev_gen_col = segment.gen_col as i64;
                // One source only; the delta is 0 after the first segment.
                encode_vlq(&mut mappings, -prev_source);
                prev_source = 0;
                encode_vlq(&mut mappings, segment.orig_line as i64 - prev_orig_line);
                prev_orig_line = segment.orig_line as i64;
                encode_vlq(&mut mappings, segment.orig_col as i64 - prev_orig_col);
                prev_orig_col = segment.orig_col as i64;
                if let Some(name) = segment.name {
                    encode_vlq(&mut mappings, name as i64 - prev_name);
                    prev_name = name as i64;
                }
            }
        }

        let json = SourceMapJson {
            version: 3,
            file: self.file.as_deref(),
            sources: [&self.source_name],
            sources_content: self.source_content.as_deref().map(|c| [c]),
            names: self.names.iter().map(String::as_str).collect(),
            mappings,
        };
        SourceMap { json: serde_json::to_string(&json).expect("source map serialization") }
    }
}

/// A finished Source Map v3 document.
#[derive(Clone, Debug)]
pub struct SourceMap {
    /// The JSON text.
    pub json: String,
}

impl SourceMap {
    /// Renders the map as a `sourceMappingURL` data URI.
    pub fn to_data_uri(&self) -> String {
        let mut uri = String::from("data:application/json;charset=utf-8;base64,");
        STANDARD.encode_string(&self.json, &mut uri);
        uri
    }
}

#[derive(Serialize)]
struct SourceMapJson<'a> {
    version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<&'a str>,
    sources: [&'a str; 1],
    #[serde(rename = "sourcesContent", skip_serializing_if = "Option::is_none")]
    sources_content: Option<[&'a str; 1]>,
    names: Vec<&'a str>,
    mappings: String,
}

const BASE64_CHARS: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Encodes one value as base64 VLQ: sign bit in the lowest position, then
/// five value bits per character, continuation in the sixth bit.
fn encode_vlq(out: &mut String, value: i64) {
    let mut v =
        if value < 0 { (((-value) as u64) << 1) | 1 } else { (value as u64) << 1 };
    loop {
        let mut digit = (v & 0b1_1111) as u8;
        v >>= 5;
        if v != 0 {
            digit |= 1 << 5;
        }
        out.push(BASE64_CHARS[digit as usize] as char);
        if v == 0 {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vlq(value: i64) -> String {
        let mut s = String::new();
        encode_vlq(&mut s, value);
        s
    }

    #[test]
    fn vlq_known_values() {
        assert_eq!(vlq(0), "A");
        assert_eq!(vlq(1), "C");
        assert_eq!(vlq(-1), "D");
        assert_eq!(vlq(16), "gB");
        assert_eq!(vlq(123), "2H");
    }

    #[test]
    fn mappings_deltas() {
        let mut builder = SourceMapBuilder::new("in.wgsl", None, Some("out.wgsl".into()));
        let n = builder.name_index("longName");
        assert_eq!(n, 0);
        assert_eq!(builder.name_index("longName"), 0);
        builder.add_mapping(0, 0, OriginalPos { line: 0, col: 3 }, Some(n));
        builder.add_mapping(0, 1, OriginalPos { line: 0, col: 12 }, None);
        let map = builder.finish();
        // (0, 0, 0, 3, 0) then (+1, 0, 0, +9).
        assert!(map.json.contains(r#""mappings":"AAAGA,CAAS""#), "got {}", map.json);
        assert!(map.json.contains(r#""names":["longName"]"#));
        assert!(map.json.contains(r#""version":3"#));
    }

    #[test]
    fn data_uri_roundtrip() {
        let builder = SourceMapBuilder::new("a.wgsl", Some("src".into()), None);
        let map = builder.finish();
        let uri = map.to_data_uri();
        let b64 = uri.strip_prefix("data:application/json;charset=utf-8;base64,").unwrap();
        let decoded = STANDARD.decode(b64).unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), map.json);
    }
}
