//! Reflection: external bindings, entry points, and struct layouts.
//!
//! A read-only walk over the module's top-level declarations, emitting the
//! descriptors the host uses to create bind group layouts and pipelines.

use crate::layout::{LayoutComputer, StructLayout, round_up, type_to_string};
use crate::rename::RenameMap;
use indexmap::IndexMap;
use serde::Serialize;
use wgslmin_ast::ast::*;
use wgslmin_ast::{AccessMode, AddressSpace};

/// Everything reflection extracts from one module.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectInfo {
    pub bindings: Vec<BindingInfo>,
    /// Struct layouts by original name, in declaration order.
    pub structs: IndexMap<String, StructLayout>,
    pub entry_points: Vec<EntryPointInfo>,
}

/// One `@group`/`@binding` variable.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingInfo {
    pub group: u32,
    pub binding: u32,
    /// The name as written in the source.
    pub name: String,
    /// The name in the minified output. Equal to `name` unless external
    /// bindings are mangled.
    pub mapped_name: String,
    pub address_space: String,
    pub access_mode: String,
    #[serde(rename = "type")]
    pub ty: String,
    /// Struct layout, for struct-typed uniform and storage buffers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<StructLayout>,
    /// Array descriptor, for array-typed buffers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array: Option<ArrayInfo>,
}

/// An array-typed binding, possibly nested.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayInfo {
    /// Nesting depth: 1 for `array<T>`, 2 for `array<array<T, N>>`, ...
    pub depth: u32,
    /// Element count; `None` for runtime-sized arrays.
    pub count: Option<u32>,
    /// Element stride in bytes.
    pub stride: u32,
    /// Total size in bytes; `None` for runtime-sized arrays.
    pub size: Option<u32>,
    pub element_type: String,
    /// Element type name in the minified output.
    pub mapped_element_type: String,
    /// Full layout, for struct elements.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_layout: Option<StructLayout>,
    /// Descriptor of the element array, for nested arrays.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nested: Option<Box<ArrayInfo>>,
}

/// One entry point.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPointInfo {
    pub name: String,
    /// Always equal to `name`: entry points are never renamed.
    pub mapped_name: String,
    pub stage: String,
    /// Workgroup size padded to three dimensions with 1. Only meaningful
    /// for compute entry points.
    pub workgroup_size: [u32; 3],
}

/// Walks the module's top-level declarations and assembles reflection data.
#[instrument(name = "reflect", level = "debug", skip_all)]
pub fn reflect_module(module: &Module, renames: &RenameMap) -> ReflectInfo {
    let mut computer = LayoutComputer::new(module);
    let mut bindings = Vec::new();
    let mut structs = IndexMap::new();
    let mut entry_points = Vec::new();

    for item in &module.items {
        match &item.kind {
            ItemKind::Struct(decl) => {
                if let Some(layout) = computer.struct_layout(decl.symbol) {
                    structs.insert(decl.name.name.clone(), layout);
                }
            }
            ItemKind::Var(decl) => {
                let symbol = &module.symbols[decl.symbol];
                let (Some(group), Some(binding)) = (symbol.group, symbol.binding) else {
                    continue;
                };
                let address_space = symbol.address_space.unwrap_or(AddressSpace::Handle);
                let ty = decl.ty.as_ref();
                let access = symbol
                    .access
                    .or_else(|| ty.and_then(storage_texture_access))
                    .unwrap_or(default_access(address_space));
                bindings.push(BindingInfo {
                    group,
                    binding,
                    name: symbol.name.clone(),
                    mapped_name: renames.name_of(decl.symbol, &module.symbols).to_string(),
                    address_space: address_space.to_string(),
                    access_mode: access.to_string(),
                    ty: ty.map_or_else(String::new, type_to_string),
                    layout: ty
                        .and_then(|ty| computer.as_struct(ty))
                        .and_then(|id| computer.struct_layout(id)),
                    array: ty.and_then(|ty| {
                        array_info(&mut computer, renames, module, ty, 1)
                    }),
                });
            }
            ItemKind::Function(decl) => {
                let Some(stage) = item.attrs.iter().find_map(|a| {
                    ["vertex", "fragment", "compute"]
                        .into_iter()
                        .find(|s| a.is(s))
                }) else {
                    continue;
                };
                entry_points.push(EntryPointInfo {
                    name: decl.name.name.clone(),
                    mapped_name: decl.name.name.clone(),
                    stage: stage.to_string(),
                    workgroup_size: workgroup_size(&computer, &item.attrs),
                });
            }
            _ => {}
        }
    }

    debug!(
        bindings = bindings.len(),
        structs = structs.len(),
        entry_points = entry_points.len(),
        "reflected"
    );
    ReflectInfo { bindings, structs, entry_points }
}

fn array_info(
    computer: &mut LayoutComputer<'_>,
    renames: &RenameMap,
    module: &Module,
    ty: &Type,
    depth: u32,
) -> Option<ArrayInfo> {
    let peeled = computer.peel_aliases(ty);
    let TyKind::Array(array) = &peeled.kind else { return None };
    let elem_layout = computer.layout_of(&array.elem)?;
    let stride = round_up(elem_layout.size, elem_layout.align);
    let count = array.size.as_deref().and_then(|size| computer.array_count(size));
    let runtime = array.size.is_none();

    let elem_struct = computer.as_struct(&array.elem);
    let mapped_element_type = match elem_struct {
        Some(id) => renames.name_of(id, &module.symbols).to_string(),
        None => type_to_string(&array.elem),
    };
    Some(ArrayInfo {
        depth,
        count: if runtime { None } else { count },
        stride,
        size: if runtime { None } else { count.map(|c| c * stride) },
        element_type: type_to_string(&array.elem),
        mapped_element_type,
        element_layout: elem_struct.and_then(|id| computer.struct_layout(id)),
        nested: array_info(computer, renames, module, &array.elem, depth + 1).map(Box::new),
    })
}

fn storage_texture_access(ty: &Type) -> Option<AccessMode> {
    let TyKind::Generic(generic) = &ty.kind else { return None };
    if !generic.name.ident.name.starts_with("texture_storage") {
        return None;
    }
    generic.args.iter().find_map(|arg| {
        let ExprKind::Ident(r) = &arg.peel_parens().kind else { return None };
        r.ident.name.parse().ok()
    })
}

fn default_access(space: AddressSpace) -> AccessMode {
    match space {
        AddressSpace::Uniform | AddressSpace::Storage | AddressSpace::Handle => AccessMode::Read,
        AddressSpace::Workgroup | AddressSpace::Private | AddressSpace::Function => {
            AccessMode::ReadWrite
        }
    }
}

fn workgroup_size(computer: &LayoutComputer<'_>, attrs: &[Attribute]) -> [u32; 3] {
    let mut size = [1u32; 3];
    if let Some(attr) = attrs.iter().find(|a| a.is("workgroup_size")) {
        for (slot, arg) in size.iter_mut().zip(&attr.args) {
            if let Some(value) = computer.array_count(arg) {
                *slot = value;
            }
        }
    }
    size
}
