//! WGSL memory layout: `AlignOf`/`SizeOf` per the WGSL specification.
//!
//! Used by reflection only; the minifier itself never needs layouts.

use crate::eval::{collect_const_values, const_u32};
use rustc_hash::FxHashMap;
use serde::Serialize;
use wgslmin_ast::ast::*;
use wgslmin_ast::{SymbolId, VecSize};

/// `roundUp(x, a) = ⌈x/a⌉·a`, the WGSL layout primitive.
#[inline]
pub const fn round_up(x: u32, align: u32) -> u32 {
    (x + align - 1) / align * align
}

/// Size and alignment of a type, in bytes.
///
/// For a runtime-sized array the size is the element stride: the smallest
/// binding that holds one element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub size: u32,
    pub align: u32,
}

/// The computed layout of a struct.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructLayout {
    pub name: String,
    pub size: u32,
    pub align: u32,
    pub members: Vec<MemberLayout>,
}

/// The computed layout of one struct member.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberLayout {
    pub name: String,
    pub offset: u32,
    pub size: u32,
    pub align: u32,
    #[serde(rename = "type")]
    pub ty: String,
    /// Full sub-layout for struct-typed members.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<Box<StructLayout>>,
}

/// Computes sizes, alignments, and offsets for the types of one module.
///
/// Struct layouts are memoized by symbol; recursive struct definitions are
/// impossible in WGSL, so the recursion terminates.
pub struct LayoutComputer<'a> {
    structs: FxHashMap<SymbolId, &'a StructDecl>,
    aliases: FxHashMap<SymbolId, &'a Type>,
    const_values: FxHashMap<SymbolId, u32>,
    cache: FxHashMap<SymbolId, Option<StructLayout>>,
}

impl<'a> LayoutComputer<'a> {
    /// Creates a layout computer over the module's declarations.
    pub fn new(module: &'a Module) -> Self {
        let mut structs = FxHashMap::default();
        let mut aliases = FxHashMap::default();
        for item in &module.items {
            match &item.kind {
                ItemKind::Struct(decl) => {
                    structs.insert(decl.symbol, decl);
                }
                ItemKind::Alias(decl) => {
                    aliases.insert(decl.symbol, &decl.ty);
                }
                _ => {}
            }
        }
        Self {
            structs,
            aliases,
            const_values: collect_const_values(&module.items),
            cache: FxHashMap::default(),
        }
    }

    /// Resolves aliases down to the aliased type.
    pub fn peel_aliases(&self, mut ty: &'a Type) -> &'a Type {
        while let TyKind::Named(r) = &ty.kind {
            match r.reference.and_then(|id| self.aliases.get(&id).copied()) {
                Some(next) => ty = next,
                None => break,
            }
        }
        ty
    }

    /// Returns the struct symbol a type names, if any.
    pub fn as_struct(&self, ty: &'a Type) -> Option<SymbolId> {
        match &self.peel_aliases(ty).kind {
            TyKind::Named(r) => {
                let id = r.reference?;
                self.structs.contains_key(&id).then_some(id)
            }
            _ => None,
        }
    }

    /// Evaluates an array element count.
    pub fn array_count(&self, size: &Expr) -> Option<u32> {
        const_u32(size, &self.const_values)
    }

    /// Computes the size and alignment of a type. `None` for types with no
    /// host-shareable layout: textures, samplers, pointers.
    pub fn layout_of(&mut self, ty: &Type) -> Option<Layout> {
        match &ty.kind {
            TyKind::Named(r) => {
                if let Some(layout) = scalar_layout(&r.ident.name) {
                    return Some(layout);
                }
                let id = r.reference?;
                if let Some(&alias) = self.aliases.get(&id) {
                    return self.layout_of(alias);
                }
                let layout = self.struct_layout(id)?;
                Some(Layout { size: layout.size, align: layout.align })
            }
            TyKind::Vector(t) => {
                let elem = self.layout_of(&t.elem)?;
                Some(vector_layout(t.size, elem))
            }
            TyKind::Matrix(t) => {
                let elem = self.layout_of(&t.elem)?;
                let column = vector_layout(t.rows, elem);
                Some(Layout {
                    size: t.cols.to_u32() * round_up(column.size, column.align),
                    align: column.align,
                })
            }
            TyKind::Array(t) => {
                let elem = self.layout_of(&t.elem)?;
                let stride = round_up(elem.size, elem.align);
                let count = match &t.size {
                    Some(size) => self.array_count(size)?,
                    // Runtime-sized: report the minimum binding size.
                    None => 1,
                };
                Some(Layout { size: count * stride, align: elem.align })
            }
            TyKind::Atomic(elem) => self.layout_of(elem),
            TyKind::Ptr(_) | TyKind::Generic(_) => None,
        }
    }

    /// Computes a struct's full layout, memoized.
    pub fn struct_layout(&mut self, id: SymbolId) -> Option<StructLayout> {
        if let Some(cached) = self.cache.get(&id) {
            return cached.clone();
        }
        let layout = self.struct_layout_uncached(id);
        self.cache.insert(id, layout.clone());
        layout
    }

    fn struct_layout_uncached(&mut self, id: SymbolId) -> Option<StructLayout> {
        let decl = *self.structs.get(&id)?;
        let mut members = Vec::with_capacity(decl.members.len());
        let mut cursor = 0u32;
        let mut struct_align = 1u32;
        for member in &decl.members {
            let natural = self.layout_of(&member.ty)?;
            // `@align` overrides the member's alignment, `@size` its size.
            // A non-power-of-two `@align` is invalid WGSL; fall back to the
            // natural alignment rather than divide by zero.
            let align = self
                .member_attr(member, "align")
                .filter(|a| a.is_power_of_two())
                .unwrap_or(natural.align);
            let size = self.member_attr(member, "size").unwrap_or(natural.size);
            let offset = round_up(cursor, align);
            cursor = offset + size;
            struct_align = struct_align.max(align);

            let nested = self
                .as_struct(&member.ty)
                .and_then(|sid| self.struct_layout(sid))
                .map(Box::new);
            members.push(MemberLayout {
                name: member.name.name.clone(),
                offset,
                size,
                align,
                ty: type_to_string(&member.ty),
                layout: nested,
            });
        }
        Some(StructLayout {
            name: decl.name.name.clone(),
            size: round_up(cursor, struct_align),
            align: struct_align,
            members,
        })
    }

    fn member_attr(&self, member: &StructMember, name: &str) -> Option<u32> {
        let attr = member.attrs.iter().find(|a| a.is(name))?;
        const_u32(attr.args.first()?, &self.const_values)
    }
}

fn scalar_layout(name: &str) -> Option<Layout> {
    match name {
        "bool" | "i32" | "u32" | "f32" => Some(Layout { size: 4, align: 4 }),
        "f16" => Some(Layout { size: 2, align: 2 }),
        _ => None,
    }
}

/// `vecN<T>` layout: `vec3` aligns like `vec4`.
fn vector_layout(size: VecSize, elem: Layout) -> Layout {
    let n = size.to_u32();
    Layout {
        size: n * elem.size,
        align: if size == VecSize::Three { 4 * elem.size } else { n * elem.size },
    }
}

/// Renders a type in canonical WGSL spelling, for reflection output.
pub fn type_to_string(ty: &Type) -> String {
    match &ty.kind {
        TyKind::Named(r) => r.ident.name.clone(),
        TyKind::Vector(t) => format!("vec{}<{}>", t.size, type_to_string(&t.elem)),
        TyKind::Matrix(t) => {
            format!("mat{}x{}<{}>", t.cols, t.rows, type_to_string(&t.elem))
        }
        TyKind::Array(t) => match &t.size {
            Some(size) => {
                format!("array<{}, {}>", type_to_string(&t.elem), expr_to_string(size))
            }
            None => format!("array<{}>", type_to_string(&t.elem)),
        },
        TyKind::Atomic(elem) => format!("atomic<{}>", type_to_string(elem)),
        TyKind::Ptr(t) => match t.access {
            Some(access) => {
                format!("ptr<{}, {}, {access}>", t.address_space, type_to_string(&t.elem))
            }
            None => format!("ptr<{}, {}>", t.address_space, type_to_string(&t.elem)),
        },
        TyKind::Generic(t) => {
            let args =
                t.args.iter().map(expr_to_string).collect::<Vec<_>>().join(", ");
            format!("{}<{args}>", t.name.ident.name)
        }
    }
}

fn expr_to_string(expr: &Expr) -> String {
    match &expr.peel_parens().kind {
        ExprKind::Lit(lit) => lit.text.clone(),
        ExprKind::Ident(r) => r.ident.name.clone(),
        _ => "_".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_up_is_ceiling_multiplication() {
        assert_eq!(round_up(0, 16), 0);
        assert_eq!(round_up(1, 16), 16);
        assert_eq!(round_up(16, 16), 16);
        assert_eq!(round_up(17, 16), 32);
        assert_eq!(round_up(12, 4), 12);
    }

    #[test]
    fn scalar_and_vector_layouts() {
        assert_eq!(scalar_layout("f32"), Some(Layout { size: 4, align: 4 }));
        assert_eq!(scalar_layout("f16"), Some(Layout { size: 2, align: 2 }));
        let f32l = scalar_layout("f32").unwrap();
        // The fixed layouts of the WGSL specification.
        assert_eq!(vector_layout(VecSize::Three, f32l), Layout { size: 12, align: 16 });
        assert_eq!(vector_layout(VecSize::Two, f32l), Layout { size: 8, align: 8 });
        assert_eq!(vector_layout(VecSize::Four, f32l), Layout { size: 16, align: 16 });
        let f16l = scalar_layout("f16").unwrap();
        assert_eq!(vector_layout(VecSize::Three, f16l), Layout { size: 6, align: 8 });
    }
}
