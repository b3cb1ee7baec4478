//! The predeclared WGSL name set.
//!
//! Identifier uses that fail scope resolution are checked against this table
//! before a diagnostic is considered: predeclared names (types, type
//! aliases, enumerants, builtin values, builtin functions) are simply not
//! module symbols and never warrant one.

/// Returns `true` if `s` is a predeclared WGSL name.
#[inline]
pub fn is_predeclared(s: &str) -> bool {
    PREDECLARED.binary_search(&s).is_ok()
}

/// All predeclared names, sorted for binary search.
static PREDECLARED: &[&str] = &[
    "abs",
    "acos",
    "acosh",
    "all",
    "any",
    "array",
    "arrayLength",
    "asin",
    "asinh",
    "atan",
    "atan2",
    "atanh",
    "atomic",
    "atomicAdd",
    "atomicAnd",
    "atomicCompareExchangeWeak",
    "atomicExchange",
    "atomicLoad",
    "atomicMax",
    "atomicMin",
    "atomicOr",
    "atomicStore",
    "atomicSub",
    "atomicXor",
    "bgra8unorm",
    "bitcast",
    "bool",
    "ceil",
    "clamp",
    "cos",
    "cosh",
    "countLeadingZeros",
    "countOneBits",
    "countTrailingZeros",
    "cross",
    "degrees",
    "determinant",
    "distance",
    "dot",
    "dot4I8Packed",
    "dot4U8Packed",
    "dpdx",
    "dpdxCoarse",
    "dpdxFine",
    "dpdy",
    "dpdyCoarse",
    "dpdyFine",
    "exp",
    "exp2",
    "extractBits",
    "f16",
    "f32",
    "faceForward",
    "firstLeadingBit",
    "firstTrailingBit",
    "floor",
    "fma",
    "fract",
    "frag_depth",
    "frexp",
    "front_facing",
    "function",
    "fwidth",
    "fwidthCoarse",
    "fwidthFine",
    "global_invocation_id",
    "i32",
    "insertBits",
    "instance_index",
    "inverseSqrt",
    "ldexp",
    "length",
    "local_invocation_id",
    "local_invocation_index",
    "log",
    "log2",
    "mat2x2",
    "mat2x2f",
    "mat2x2h",
    "mat2x3",
    "mat2x3f",
    "mat2x3h",
    "mat2x4",
    "mat2x4f",
    "mat2x4h",
    "mat3x2",
    "mat3x2f",
    "mat3x2h",
    "mat3x3",
    "mat3x3f",
    "mat3x3h",
    "mat3x4",
    "mat3x4f",
    "mat3x4h",
    "mat4x2",
    "mat4x2f",
    "mat4x2h",
    "mat4x3",
    "mat4x3f",
    "mat4x3h",
    "mat4x4",
    "mat4x4f",
    "mat4x4h",
    "max",
    "min",
    "mix",
    "modf",
    "normalize",
    "num_workgroups",
    "pack2x16float",
    "pack2x16snorm",
    "pack2x16unorm",
    "pack4x8snorm",
    "pack4x8unorm",
    "pack4xI8",
    "pack4xI8Clamp",
    "pack4xU8",
    "pack4xU8Clamp",
    "position",
    "pow",
    "private",
    "ptr",
    "quantizeToF16",
    "r32float",
    "r32sint",
    "r32uint",
    "radians",
    "read",
    "read_write",
    "reflect",
    "refract",
    "reverseBits",
    "rg32float",
    "rg32sint",
    "rg32uint",
    "rgba16float",
    "rgba16sint",
    "rgba16uint",
    "rgba32float",
    "rgba32sint",
    "rgba32uint",
    "rgba8sint",
    "rgba8snorm",
    "rgba8uint",
    "rgba8unorm",
    "round",
    "sample_index",
    "sample_mask",
    "sampler",
    "sampler_comparison",
    "saturate",
    "select",
    "sign",
    "sin",
    "sinh",
    "smoothstep",
    "sqrt",
    "step",
    "storage",
    "storageBarrier",
    "tan",
    "tanh",
    "textureBarrier",
    "textureDimensions",
    "textureGather",
    "textureGatherCompare",
    "textureLoad",
    "textureNumLayers",
    "textureNumLevels",
    "textureNumSamples",
    "textureSample",
    "textureSampleBaseClampToEdge",
    "textureSampleBias",
    "textureSampleCompare",
    "textureSampleCompareLevel",
    "textureSampleGrad",
    "textureSampleLevel",
    "textureStore",
    "texture_1d",
    "texture_2d",
    "texture_2d_array",
    "texture_3d",
    "texture_cube",
    "texture_cube_array",
    "texture_depth_2d",
    "texture_depth_2d_array",
    "texture_depth_cube",
    "texture_depth_cube_array",
    "texture_depth_multisampled_2d",
    "texture_external",
    "texture_multisampled_2d",
    "texture_storage_1d",
    "texture_storage_2d",
    "texture_storage_2d_array",
    "texture_storage_3d",
    "transpose",
    "trunc",
    "u32",
    "uniform",
    "unpack2x16float",
    "unpack2x16snorm",
    "unpack2x16unorm",
    "unpack4x8snorm",
    "unpack4x8unorm",
    "unpack4xI8",
    "unpack4xU8",
    "vec2",
    "vec2f",
    "vec2h",
    "vec2i",
    "vec2u",
    "vec3",
    "vec3f",
    "vec3h",
    "vec3i",
    "vec3u",
    "vec4",
    "vec4f",
    "vec4h",
    "vec4i",
    "vec4u",
    "vertex_index",
    "workgroup",
    "workgroupBarrier",
    "workgroupUniformLoad",
    "workgroup_id",
    "write",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predeclared_is_sorted() {
        assert!(PREDECLARED.is_sorted(), "binary search requires a sorted table");
    }

    #[test]
    fn membership() {
        assert!(is_predeclared("f32"));
        assert!(is_predeclared("vec3f"));
        assert!(is_predeclared("textureSample"));
        assert!(is_predeclared("read_write"));
        assert!(is_predeclared("rgba8unorm"));
        assert!(!is_predeclared("my_var"));
        assert!(!is_predeclared("fn"));
    }
}
