use wgslmin::{MinifyOptions, minify};

const SRC: &str = "fn longName() -> f32 { return 1.0; }\n\
                   @fragment fn main() -> @location(0) vec4<f32> { return vec4<f32>(longName()); }";

fn map_options() -> MinifyOptions {
    MinifyOptions {
        source_map: true,
        source_map_include_sources: true,
        source_map_file: Some("out.wgsl".into()),
        ..Default::default()
    }
}

/// One decoded mapping: generated (line, col), original (line, col), name.
type Decoded = (u32, u32, u32, u32, Option<u32>);

fn decode_mappings(mappings: &str) -> Vec<Decoded> {
    const CHARS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
    let mut decoded = Vec::new();
    let (mut src, mut line, mut col, mut name) = (0i64, 0i64, 0i64, 0i64);
    for (gen_line, group) in mappings.split(';').enumerate() {
        let mut gen_col = 0i64;
        for segment in group.split(',').filter(|s| !s.is_empty()) {
            let mut values = Vec::new();
            let mut current = 0i64;
            let mut shift = 0u32;
            for ch in segment.chars() {
                let digit = CHARS.find(ch).expect("invalid VLQ digit") as i64;
                current |= (digit & 31) << shift;
                if digit & 32 != 0 {
                    shift += 5;
                } else {
                    let negative = current & 1 != 0;
                    let value = current >> 1;
                    values.push(if negative { -value } else { value });
                    current = 0;
                    shift = 0;
                }
            }
            assert!(values.len() == 4 || values.len() == 5, "segment {segment:?}");
            gen_col += values[0];
            src += values[1];
            line += values[2];
            col += values[3];
            assert_eq!(src, 0, "single-source map");
            let name_index = (values.len() == 5).then(|| {
                name += values[4];
                name as u32
            });
            decoded.push((gen_line as u32, gen_col as u32, line as u32, col as u32, name_index));
        }
    }
    decoded
}

#[test]
fn source_map_structure() {
    let out = minify(SRC, &map_options());
    assert!(out.errors.is_empty(), "{:?}", out.errors);
    let map: serde_json::Value = serde_json::from_str(out.source_map.as_ref().unwrap()).unwrap();
    assert_eq!(map["version"], 3);
    assert_eq!(map["file"], "out.wgsl");
    assert_eq!(map["sources"][0], "input.wgsl");
    assert_eq!(map["sourcesContent"][0], SRC);
    let names: Vec<&str> =
        map["names"].as_array().unwrap().iter().map(|n| n.as_str().unwrap()).collect();
    assert!(names.contains(&"longName"), "names: {names:?}");
}

#[test]
fn renamed_identifier_round_trips() {
    let out = minify(SRC, &map_options());
    let map: serde_json::Value = serde_json::from_str(out.source_map.as_ref().unwrap()).unwrap();
    let names: Vec<String> =
        map["names"].as_array().unwrap().iter().map(|n| n.as_str().unwrap().into()).collect();
    let long_name = names.iter().position(|n| n == "longName").unwrap() as u32;

    let decoded = decode_mappings(map["mappings"].as_str().unwrap());
    let for_long_name: Vec<_> =
        decoded.iter().filter(|d| d.4 == Some(long_name)).collect();
    // The declaration and the call site both map back to the original.
    let decl_col = SRC.lines().next().unwrap().find("longName").unwrap() as u32;
    let call_line = 1u32;
    let call_col = SRC.lines().nth(1).unwrap().find("longName").unwrap() as u32;
    assert!(
        for_long_name.iter().any(|d| (d.2, d.3) == (0, decl_col)),
        "missing declaration mapping in {for_long_name:?}"
    );
    assert!(
        for_long_name.iter().any(|d| (d.2, d.3) == (call_line, call_col)),
        "missing call-site mapping in {for_long_name:?}"
    );

    // The generated positions point at the short name in the output.
    let (gen_line, gen_col, ..) = *for_long_name[0];
    assert_eq!(gen_line, 0, "minified output is a single line");
    let short = out.code[gen_col as usize..].chars().next().unwrap();
    assert!(short.is_ascii_lowercase(), "expected a renamed identifier, got {short:?}");
}

#[test]
fn declaration_starts_are_mapped() {
    let out = minify(SRC, &map_options());
    let map: serde_json::Value = serde_json::from_str(out.source_map.as_ref().unwrap()).unwrap();
    let decoded = decode_mappings(map["mappings"].as_str().unwrap());
    // Two top-level declarations, each with a nameless mapping at its start.
    let nameless: Vec<_> = decoded.iter().filter(|d| d.4.is_none()).collect();
    assert!(nameless.len() >= 2, "decl mappings: {decoded:?}");
    assert!(nameless.iter().any(|d| (d.2, d.3) == (0, 0)));
    assert!(nameless.iter().any(|d| (d.2, d.3) == (1, 0)));
}

#[test]
fn data_uri() {
    let out = minify(SRC, &map_options());
    let uri = out.source_map_data_uri.unwrap();
    assert!(uri.starts_with("data:application/json;charset=utf-8;base64,"));
}

#[test]
fn no_map_unless_requested() {
    let out = minify(SRC, &MinifyOptions::default());
    assert!(out.source_map.is_none());
    assert!(out.source_map_data_uri.is_none());
}

#[test]
fn utf16_columns() {
    // 'π' is 2 UTF-8 bytes but 1 UTF-16 unit; the mapped column of the
    // renamed identifier must count UTF-16 units.
    let src = "const π = 3.14159;\nfn f() -> f32 { return π; }";
    let out = minify(src, &map_options());
    assert!(out.errors.is_empty(), "{:?}", out.errors);
    let map: serde_json::Value = serde_json::from_str(out.source_map.as_ref().unwrap()).unwrap();
    let names: Vec<String> =
        map["names"].as_array().unwrap().iter().map(|n| n.as_str().unwrap().into()).collect();
    let pi = names.iter().position(|n| n == "π").unwrap() as u32;
    let decoded = decode_mappings(map["mappings"].as_str().unwrap());
    // `const π` declares π at UTF-16 column 6 of line 0.
    assert!(
        decoded.iter().any(|d| d.4 == Some(pi) && (d.2, d.3) == (0, 6)),
        "mappings: {decoded:?}"
    );
}
