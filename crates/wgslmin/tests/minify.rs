use wgslmin::{MinifyOptions, minify};

fn minify_default(src: &str) -> wgslmin::MinifyOutput {
    minify(src, &MinifyOptions::default())
}

#[test]
fn entry_point_preservation() {
    let out = minify_default(
        "@fragment fn main() -> @location(0) vec4<f32> { return vec4<f32>(0.0); }",
    );
    assert!(out.errors.is_empty(), "{:?}", out.errors);
    assert_eq!(out.code, "@fragment fn main()->@location(0)vec4f{return vec4f(0.);}");
    assert!(out.minified_size < out.original_size);
}

#[test]
fn tree_shaking() {
    let out = minify_default(
        "fn unused() -> f32 { return 1.0; } \
         fn used() -> f32 { return 2.0; } \
         @fragment fn main() -> @location(0) vec4<f32> { return vec4<f32>(used()); }",
    );
    assert!(out.errors.is_empty(), "{:?}", out.errors);
    assert!(!out.code.contains("unused"));
    assert_eq!(
        out.code,
        "fn a()->f32{return 2.;}\
         @fragment fn main()->@location(0)vec4f{return vec4f(a());}"
    );
}

#[test]
fn external_binding_alias() {
    let out = minify_default(
        "@group(0) @binding(0) var<uniform> uniforms: Data; \
         fn main() { return uniforms.x + uniforms.y; }",
    );
    assert!(out.errors.is_empty(), "{:?}", out.errors);
    // The declaration keeps its name; uses go through a short alias; field
    // accesses are untouched.
    assert_eq!(
        out.code,
        "@group(0)@binding(0)var<uniform>uniforms:Data;\
         fn main(){let a=uniforms;return a.x+a.y;}"
    );
}

#[test]
fn external_binding_mangling_opt_in() {
    let out = minify(
        "@group(0) @binding(0) var<uniform> uniforms: Data; \
         fn main() { return uniforms.x + uniforms.y; }",
        &MinifyOptions { mangle_external_bindings: true, ..Default::default() },
    );
    assert!(out.errors.is_empty());
    assert!(!out.code.contains("uniforms"));
    assert!(out.code.contains("var<uniform>a:Data"));
}

#[test]
fn syntax_rewriting() {
    let out = minify_default("fn f() -> vec3<f32> { return vec3<f32>(0.5, 1.0, 1000000.0); }");
    assert!(out.errors.is_empty(), "{:?}", out.errors);
    assert!(out.code.contains("vec3f(.5,1.,1e6)"), "got {}", out.code);
}

#[test]
fn syntax_rewriting_can_be_disabled() {
    let out = minify(
        "fn f() -> vec3<f32> { return vec3<f32>(0.5); }",
        &MinifyOptions { minify_syntax: false, ..Default::default() },
    );
    assert!(out.code.contains("vec3<f32>(0.5)"), "got {}", out.code);
}

#[test]
fn nested_block_comment() {
    let out = minify_default("/* a /* b */ c */ fn main(){}");
    assert!(out.errors.is_empty(), "{:?}", out.errors);
    assert_eq!(out.code, "fn main(){}");
}

#[test]
fn invalid_input_returns_original() {
    for src in [
        "fn main( {",
        "fn typedef() {}",
        "/* unterminated",
        "let __x = 1;",
        "var<private> x: f32; var<private> x: f32;",
        "fn f() { 1 + ; }",
    ] {
        let out = minify_default(src);
        assert_eq!(out.code, src, "invalid input must be returned unchanged");
        assert!(!out.errors.is_empty(), "expected errors for {src:?}");
        assert_eq!(out.original_size, out.minified_size);
    }
}

#[test]
fn errors_carry_positions() {
    let out = minify_default("fn main() {\n    let x = ;\n}");
    assert!(!out.errors.is_empty());
    let err = &out.errors[0];
    assert_eq!(err.line, 2);
    assert!(err.column > 1);
}

#[test]
fn idempotence() {
    let src = r#"
@group(0) @binding(0) var<uniform> params: Params;
struct Params { scale: f32, offset: vec2<f32> }
fn helper(x: f32) -> f32 { return x * params.scale + params.scale; }
@fragment fn main() -> @location(0) vec4<f32> {
    var acc = 0.0;
    for (var i = 0; i < 4; i++) { acc += helper(0.5); }
    return vec4<f32>(acc);
}
"#;
    let once = minify_default(src);
    assert!(once.errors.is_empty(), "{:?}", once.errors);
    let twice = minify_default(&once.code);
    assert!(twice.errors.is_empty(), "{:?}", twice.errors);
    assert_eq!(once.code, twice.code, "full minification must be a fixed point");
}

#[test]
fn keep_names() {
    let out = minify(
        "fn helper() -> f32 { return 1.0; } \
         @fragment fn main() -> @location(0) vec4<f32> { return vec4<f32>(helper()); }",
        &MinifyOptions { keep_names: vec!["helper".into()], ..Default::default() },
    );
    assert!(out.code.contains("fn helper()"), "got {}", out.code);
}

#[test]
fn tree_shaking_can_be_disabled() {
    let out = minify(
        "fn unused() -> f32 { return 1.0; } \
         @fragment fn main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }",
        &MinifyOptions { tree_shaking: false, ..Default::default() },
    );
    // Kept, and kept under its original name: dead symbols are not renamed.
    assert!(out.code.contains("fn unused()"), "got {}", out.code);
}

#[test]
fn no_entry_points_keeps_everything() {
    let out = minify_default("fn lib_function(x: f32) -> f32 { return x * 2.0; }");
    assert!(out.errors.is_empty());
    assert!(out.code.contains("fn lib_function("));
    // Locals are still renamed.
    assert!(out.code.contains("(a:f32)"), "got {}", out.code);
}

#[test]
fn renamed_output_never_reserves() {
    // Enough symbols to exhaust several alphabet letters; `if`, `fn`, `as`,
    // `do` and friends must all be skipped.
    let mut src = String::new();
    let mut body = String::new();
    for i in 0..80 {
        src.push_str(&format!("fn helper{i}() -> f32 {{ return {i}.0; }}\n"));
        body.push_str(&format!("acc += helper{i}();"));
    }
    src.push_str(&format!(
        "@fragment fn main() -> @location(0) vec4<f32> {{ var acc = 0.0; {body} return \
         vec4<f32>(acc); }}"
    ));
    let out = minify_default(&src);
    assert!(out.errors.is_empty(), "{:?}", out.errors);
    assert!(!out.code.contains("__"));
    assert!(!out.code.contains("fn if("));
    assert!(!out.code.contains("fn as("));
    // Re-minifying the output must parse cleanly: every generated name is a
    // legal identifier.
    let again = minify_default(&out.code);
    assert!(again.errors.is_empty(), "{:?}", again.errors);
}

#[test]
fn whitespace_preserving_mode() {
    let out = minify(
        "fn f() -> f32 { return 1.0; }",
        &MinifyOptions { minify_whitespace: false, ..Default::default() },
    );
    assert!(out.errors.is_empty());
    assert!(out.code.contains('\n'));
    // Still a valid module.
    let re = minify_default(&out.code);
    assert!(re.errors.is_empty(), "{:?}", re.errors);
}

#[test]
fn frequency_first_naming() {
    // `hot` is used three times, `cold` once: `hot` must get `a`.
    let out = minify_default(
        "fn hot() -> f32 { return 1.0; } \
         fn cold() -> f32 { return hot(); } \
         @fragment fn main() -> @location(0) vec4<f32> { \
             return vec4<f32>(hot() + hot() + cold()); }",
    );
    assert!(out.errors.is_empty());
    assert!(out.code.contains("fn a()->f32{return 1.;}"), "got {}", out.code);
}

#[test]
fn statement_coverage_roundtrip() {
    let src = r#"
@compute @workgroup_size(1) fn main() {
    var x = 0;
    let limit = 10;
    loop {
        x++;
        if x > limit { break; }
        switch x {
            case 1, 2: { continue; }
            default: { }
        }
        continuing {
            break if x > 100;
        }
    }
    for (var i = 0; i < 4; i++) { x += i; }
    while x > 0 { x--; }
    _ = x;
}
"#;
    let out = minify_default(src);
    assert!(out.errors.is_empty(), "{:?}", out.errors);
    let again = minify_default(&out.code);
    assert!(again.errors.is_empty(), "{:?}", again.errors);
    assert_eq!(out.code, again.code);
}

#[test]
fn directives_are_kept() {
    let out = minify_default(
        "enable f16;\n@fragment fn main() -> @location(0) vec4<f16> { return vec4<f16>(0.0); }",
    );
    assert!(out.errors.is_empty(), "{:?}", out.errors);
    assert!(out.code.starts_with("enable f16;"), "got {}", out.code);
    assert!(out.code.contains("vec4h"), "got {}", out.code);
}

#[test]
fn const_assert_is_always_live() {
    let out = minify_default(
        "const LIMIT = 4; const_assert LIMIT < 8; \
         @fragment fn main() -> @location(0) vec4<f32> { return vec4<f32>(0.0); }",
    );
    assert!(out.errors.is_empty(), "{:?}", out.errors);
    assert!(out.code.contains("const_assert"), "got {}", out.code);
    // Its dependency survives tree shaking with it.
    assert!(out.code.contains("const"), "got {}", out.code);
}

#[test]
fn template_lists_survive() {
    let src = "fn f() -> f32 { var arr = array<vec3<f32>, 2>(vec3<f32>(0.0), vec3<f32>(1.0)); \
               return arr[0].x; }";
    let out = minify_default(src);
    assert!(out.errors.is_empty(), "{:?}", out.errors);
    assert!(out.code.contains("array<vec3f,2>"), "got {}", out.code);
    let again = minify_default(&out.code);
    assert_eq!(out.code, again.code);
}

#[test]
fn comparisons_are_not_templates() {
    let out = minify_default("fn f(a: i32, b: i32) -> bool { return (a) < (b); }");
    assert!(out.errors.is_empty(), "{:?}", out.errors);
    let again = minify_default(&out.code);
    assert!(again.errors.is_empty(), "{:?}", again.errors);
}

#[test]
fn unresolved_identifier_is_a_warning_not_an_error() {
    let out = minify_default("fn main() { let x = HOST_INJECTED; }");
    assert!(out.errors.is_empty(), "{:?}", out.errors);
    assert_eq!(out.warnings.len(), 1);
    // The unknown name is pinned and survives.
    assert!(out.code.contains("HOST_INJECTED"), "got {}", out.code);
}
