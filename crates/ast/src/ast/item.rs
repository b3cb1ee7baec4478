use super::{Attribute, Block, Expr, Ident, Type};
use crate::{AccessMode, AddressSpace, SymbolId};
use std::fmt;
use wgslmin_interface::Span;

/// A top-level declaration in a WGSL module.
#[derive(Debug)]
pub struct Item {
    /// Attributes preceding the declaration.
    pub attrs: Vec<Attribute>,
    /// Source location, including attributes.
    pub span: Span,
    /// The item's kind.
    pub kind: ItemKind,
}

impl Item {
    /// Returns the symbol governing the item, if it declares a name.
    pub fn symbol(&self) -> Option<SymbolId> {
        match &self.kind {
            ItemKind::Var(v) => Some(v.symbol),
            ItemKind::Const(c) => Some(c.symbol),
            ItemKind::Override(o) => Some(o.symbol),
            ItemKind::Function(f) => Some(f.symbol),
            ItemKind::Struct(s) => Some(s.symbol),
            ItemKind::Alias(a) => Some(a.symbol),
            ItemKind::ConstAssert(_) => None,
        }
    }

    /// Returns the name of the item, if it declares one.
    pub fn name(&self) -> Option<&Ident> {
        match &self.kind {
            ItemKind::Var(v) => Some(&v.name),
            ItemKind::Const(c) => Some(&c.name),
            ItemKind::Override(o) => Some(&o.name),
            ItemKind::Function(f) => Some(&f.name),
            ItemKind::Struct(s) => Some(&s.name),
            ItemKind::Alias(a) => Some(&a.name),
            ItemKind::ConstAssert(_) => None,
        }
    }

    /// Returns the description of the item, for diagnostics.
    pub fn description(&self) -> &'static str {
        match &self.kind {
            ItemKind::Var(_) => "variable declaration",
            ItemKind::Const(_) => "const declaration",
            ItemKind::Override(_) => "override declaration",
            ItemKind::Function(_) => "function definition",
            ItemKind::Struct(_) => "struct definition",
            ItemKind::Alias(_) => "type alias",
            ItemKind::ConstAssert(_) => "const assertion",
        }
    }
}

/// An AST item kind.
pub enum ItemKind {
    /// `var<uniform> u: Uniforms;`
    Var(VarDecl),
    /// `const PI: f32 = 3.14159;`
    Const(ConstDecl),
    /// `override scale: f32 = 1.0;`
    Override(OverrideDecl),
    /// `fn main() { ... }`
    Function(FunctionDecl),
    /// `struct Light { ... }`
    Struct(StructDecl),
    /// `alias Mat = mat4x4<f32>;`
    Alias(AliasDecl),
    /// `const_assert WORKGROUP_SIZE <= 256;`
    ConstAssert(ConstAssert),
}

impl fmt::Debug for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ItemKind::")?;
        match self {
            Self::Var(item) => item.fmt(f),
            Self::Const(item) => item.fmt(f),
            Self::Override(item) => item.fmt(f),
            Self::Function(item) => item.fmt(f),
            Self::Struct(item) => item.fmt(f),
            Self::Alias(item) => item.fmt(f),
            Self::ConstAssert(item) => item.fmt(f),
        }
    }
}

/// A `var` declaration, module-scope or local.
#[derive(Debug)]
pub struct VarDecl {
    /// The declared name.
    pub name: Ident,
    /// The symbol created for the declaration.
    pub symbol: SymbolId,
    /// The address space template argument, if written.
    pub address_space: Option<AddressSpace>,
    /// The access mode template argument, if written.
    pub access: Option<AccessMode>,
    /// The declared type. May be omitted when an initializer is present.
    pub ty: Option<Type>,
    /// The initializer.
    pub init: Option<Expr>,
}

/// A `const` declaration, module-scope or local.
#[derive(Debug)]
pub struct ConstDecl {
    pub name: Ident,
    pub symbol: SymbolId,
    pub ty: Option<Type>,
    pub init: Expr,
}

/// A `let` declaration. Function-scope only.
#[derive(Debug)]
pub struct LetDecl {
    pub name: Ident,
    pub symbol: SymbolId,
    pub ty: Option<Type>,
    pub init: Expr,
}

/// An `override` declaration. Module-scope only.
#[derive(Debug)]
pub struct OverrideDecl {
    pub name: Ident,
    pub symbol: SymbolId,
    pub ty: Option<Type>,
    pub init: Option<Expr>,
}

/// A function definition.
#[derive(Debug)]
pub struct FunctionDecl {
    pub name: Ident,
    pub symbol: SymbolId,
    pub params: Vec<Param>,
    /// The return type, with its attributes (`-> @location(0) vec4<f32>`).
    pub ret: Option<ReturnType>,
    pub body: Block,
}

/// A function return type and its attributes.
#[derive(Debug)]
pub struct ReturnType {
    pub attrs: Vec<Attribute>,
    pub ty: Type,
}

/// A function parameter.
#[derive(Debug)]
pub struct Param {
    pub attrs: Vec<Attribute>,
    pub name: Ident,
    pub symbol: SymbolId,
    pub ty: Type,
    pub span: Span,
}

/// A struct definition.
#[derive(Debug)]
pub struct StructDecl {
    pub name: Ident,
    pub symbol: SymbolId,
    pub members: Vec<StructMember>,
}

/// A struct member.
#[derive(Debug)]
pub struct StructMember {
    pub attrs: Vec<Attribute>,
    pub name: Ident,
    pub symbol: SymbolId,
    pub ty: Type,
    pub span: Span,
}

/// An `alias` declaration.
#[derive(Debug)]
pub struct AliasDecl {
    pub name: Ident,
    pub symbol: SymbolId,
    pub ty: Type,
}

/// A `const_assert` declaration or statement.
#[derive(Debug)]
pub struct ConstAssert {
    pub expr: Expr,
}
