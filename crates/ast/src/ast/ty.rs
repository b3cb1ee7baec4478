use super::{Expr, IdentRef};
use crate::{AccessMode, AddressSpace, VecSize};
use std::fmt;
use wgslmin_interface::Span;

/// A type as written in the source.
#[derive(Clone, Debug)]
pub struct Type {
    pub span: Span,
    pub kind: TyKind,
}

/// A type kind.
#[derive(Clone)]
pub enum TyKind {
    /// A plain name: a scalar (`f32`), a struct, or an alias.
    Named(IdentRef),
    /// `vec3<f32>`, or the predeclared shorthand `vec3f`.
    Vector(VectorTy),
    /// `mat4x4<f32>`, or the predeclared shorthand `mat4x4f`.
    Matrix(MatrixTy),
    /// `array<T, N>` or the runtime-sized `array<T>`.
    Array(ArrayTy),
    /// `atomic<T>`.
    Atomic(Box<Type>),
    /// `ptr<space, T>` or `ptr<space, T, access>`.
    Ptr(PtrTy),
    /// Any other templated predeclared type: textures, in practice.
    ///
    /// Texture template arguments are always predeclared names (sampled
    /// scalar types, texel formats, access modes), so they are held as
    /// expressions whose identifier references resolve to builtins.
    Generic(GenericTy),
}

impl fmt::Debug for TyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TyKind::")?;
        match self {
            Self::Named(t) => t.fmt(f),
            Self::Vector(t) => t.fmt(f),
            Self::Matrix(t) => t.fmt(f),
            Self::Array(t) => t.fmt(f),
            Self::Atomic(t) => write!(f, "Atomic({t:?})"),
            Self::Ptr(t) => t.fmt(f),
            Self::Generic(t) => t.fmt(f),
        }
    }
}

/// A vector type.
#[derive(Clone, Debug)]
pub struct VectorTy {
    pub size: VecSize,
    pub elem: Box<Type>,
    /// `true` if written with a predeclared shorthand (`vec3f`).
    pub shorthand: bool,
}

/// A matrix type. `cols` columns of `rows`-component vectors.
#[derive(Clone, Debug)]
pub struct MatrixTy {
    pub cols: VecSize,
    pub rows: VecSize,
    pub elem: Box<Type>,
    /// `true` if written with a predeclared shorthand (`mat4x4f`).
    pub shorthand: bool,
}

/// An array type. `size` is `None` for runtime-sized arrays.
#[derive(Clone, Debug)]
pub struct ArrayTy {
    pub elem: Box<Type>,
    pub size: Option<Box<Expr>>,
}

/// A pointer type.
#[derive(Clone, Debug)]
pub struct PtrTy {
    pub address_space: AddressSpace,
    pub elem: Box<Type>,
    pub access: Option<AccessMode>,
}

/// A templated predeclared type the grammar does not model structurally.
#[derive(Clone, Debug)]
pub struct GenericTy {
    pub name: IdentRef,
    pub args: Vec<Expr>,
}
