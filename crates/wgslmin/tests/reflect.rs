use wgslmin::reflect;

#[test]
fn vec3_struct_layout() {
    let out = reflect("struct S { a: f32, b: vec3<f32>, c: f32 }");
    assert!(out.errors.is_empty(), "{:?}", out.errors);
    let s = &out.structs["S"];
    assert_eq!(s.size, 32);
    assert_eq!(s.align, 16);
    let offsets: Vec<_> = s.members.iter().map(|m| m.offset).collect();
    assert_eq!(offsets, [0, 16, 28]);
    assert_eq!(s.members[1].ty, "vec3<f32>");
    assert_eq!(s.members[1].size, 12);
    assert_eq!(s.members[1].align, 16);
}

#[test]
fn matrix_layout() {
    let out = reflect("struct M { m: mat4x4<f32>, n: mat2x3<f32> }");
    assert!(out.errors.is_empty());
    let m = &out.structs["M"];
    // mat4x4<f32>: 4 columns of vec4<f32>.
    assert_eq!(m.members[0].size, 64);
    assert_eq!(m.members[0].align, 16);
    // mat2x3<f32>: 2 columns of vec3<f32>, padded to vec4 stride.
    assert_eq!(m.members[1].offset, 64);
    assert_eq!(m.members[1].size, 32);
    assert_eq!(m.members[1].align, 16);
}

#[test]
fn size_and_align_attributes() {
    let out = reflect("struct S { @size(16) a: f32, @align(32) b: f32 }");
    assert!(out.errors.is_empty());
    let s = &out.structs["S"];
    assert_eq!(s.members[0].offset, 0);
    assert_eq!(s.members[0].size, 16);
    assert_eq!(s.members[1].offset, 32);
    assert_eq!(s.align, 32);
    assert_eq!(s.size, 64);
}

#[test]
fn bindings_and_entry_points() {
    let out = reflect(
        r#"
struct Light { pos: vec3<f32>, intensity: f32 }
struct Scene { lights: array<Light, 2>, count: u32 }
@group(0) @binding(0) var<uniform> scene: Scene;
@group(0) @binding(1) var<storage, read_write> data: array<vec4<f32>>;
@group(1) @binding(0) var tex: texture_2d<f32>;
@group(1) @binding(1) var samp: sampler;
@compute @workgroup_size(8, 8) fn main() { }
"#,
    );
    assert!(out.errors.is_empty(), "{:?}", out.errors);

    let light = &out.structs["Light"];
    assert_eq!((light.size, light.align), (16, 16));
    let scene = &out.structs["Scene"];
    assert_eq!((scene.size, scene.align), (48, 16));
    assert_eq!(scene.members[1].offset, 32);

    assert_eq!(out.bindings.len(), 4);
    let uniform = &out.bindings[0];
    assert_eq!((uniform.group, uniform.binding), (0, 0));
    assert_eq!(uniform.name, "scene");
    assert_eq!(uniform.mapped_name, "scene");
    assert_eq!(uniform.address_space, "uniform");
    assert_eq!(uniform.access_mode, "read");
    assert_eq!(uniform.ty, "Scene");
    assert_eq!(uniform.layout.as_ref().unwrap().size, 48);
    // Nested struct member carries its full sub-layout.
    let lights = &uniform.layout.as_ref().unwrap().members[0];
    assert_eq!(lights.ty, "array<Light, 2>");

    let storage = &out.bindings[1];
    assert_eq!(storage.address_space, "storage");
    assert_eq!(storage.access_mode, "read_write");
    let array = storage.array.as_ref().unwrap();
    assert_eq!(array.count, None);
    assert_eq!(array.size, None);
    assert_eq!(array.stride, 16);
    assert_eq!(array.element_type, "vec4<f32>");

    let tex = &out.bindings[2];
    assert_eq!(tex.address_space, "handle");
    assert_eq!(tex.ty, "texture_2d<f32>");
    assert!(tex.layout.is_none());
    assert!(tex.array.is_none());
    let samp = &out.bindings[3];
    assert_eq!(samp.address_space, "handle");
    assert_eq!(samp.ty, "sampler");

    assert_eq!(out.entry_points.len(), 1);
    let main = &out.entry_points[0];
    assert_eq!(main.name, "main");
    assert_eq!(main.mapped_name, "main");
    assert_eq!(main.stage, "compute");
    assert_eq!(main.workgroup_size, [8, 8, 1]);
}

#[test]
fn sized_array_binding() {
    let out = reflect(
        "struct Item { value: vec4<f32> }\n\
         @group(0) @binding(0) var<storage> items: array<Item, 8>;",
    );
    assert!(out.errors.is_empty(), "{:?}", out.errors);
    let array = out.bindings[0].array.as_ref().unwrap();
    assert_eq!(array.depth, 1);
    assert_eq!(array.count, Some(8));
    assert_eq!(array.stride, 16);
    assert_eq!(array.size, Some(128));
    assert_eq!(array.element_type, "Item");
    assert_eq!(array.element_layout.as_ref().unwrap().size, 16);
}

#[test]
fn nested_array_binding() {
    let out =
        reflect("@group(0) @binding(0) var<storage> grid: array<array<f32, 4>, 2>;");
    assert!(out.errors.is_empty(), "{:?}", out.errors);
    let array = out.bindings[0].array.as_ref().unwrap();
    assert_eq!(array.count, Some(2));
    assert_eq!(array.stride, 16);
    let nested = array.nested.as_ref().unwrap();
    assert_eq!(nested.depth, 2);
    assert_eq!(nested.count, Some(4));
    assert_eq!(nested.stride, 4);
}

#[test]
fn workgroup_size_from_constant() {
    let out = reflect("const WG = 16;\n@compute @workgroup_size(WG) fn main() { }");
    assert!(out.errors.is_empty(), "{:?}", out.errors);
    assert_eq!(out.entry_points[0].workgroup_size, [16, 1, 1]);
}

#[test]
fn storage_texture_access() {
    let out = reflect(
        "@group(0) @binding(0) var img: texture_storage_2d<rgba8unorm, write>;",
    );
    assert!(out.errors.is_empty(), "{:?}", out.errors);
    let img = &out.bindings[0];
    assert_eq!(img.address_space, "handle");
    assert_eq!(img.access_mode, "write");
}

#[test]
fn alias_is_peeled_for_layout() {
    let out = reflect(
        "struct Data { v: vec4<f32> }\n\
         alias Buf = Data;\n\
         @group(0) @binding(0) var<uniform> u: Buf;",
    );
    assert!(out.errors.is_empty(), "{:?}", out.errors);
    assert_eq!(out.bindings[0].ty, "Buf");
    assert_eq!(out.bindings[0].layout.as_ref().unwrap().name, "Data");
}

#[test]
fn f16_layouts() {
    let out = reflect("enable f16;\nstruct H { a: f16, b: vec3<f16>, c: f16 }");
    assert!(out.errors.is_empty(), "{:?}", out.errors);
    let h = &out.structs["H"];
    // f16: size 2; vec3<f16>: size 6, align 8.
    let offsets: Vec<_> = h.members.iter().map(|m| m.offset).collect();
    assert_eq!(offsets, [0, 8, 14]);
    assert_eq!(h.size, 16);
    assert_eq!(h.align, 8);
}

#[test]
fn errors_suppress_reflection() {
    let out = reflect("struct {");
    assert!(!out.errors.is_empty());
    assert!(out.bindings.is_empty());
    assert!(out.structs.is_empty());
    assert!(out.entry_points.is_empty());
}

#[test]
fn json_output_shape() {
    let out = reflect("@group(0) @binding(0) var<uniform> u: vec4<f32>;");
    let json: serde_json::Value = serde_json::from_str(&out.to_json()).unwrap();
    assert_eq!(json["bindings"][0]["group"], 0);
    assert_eq!(json["bindings"][0]["addressSpace"], "uniform");
    assert_eq!(json["bindings"][0]["type"], "vec4<f32>");
    assert!(json["entryPoints"].as_array().unwrap().is_empty());
}
