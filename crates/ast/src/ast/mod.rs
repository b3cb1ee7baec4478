//! WGSL AST definitions.

use crate::{ScopeTree, SymbolId, SymbolTable};
use std::fmt;
use wgslmin_interface::Span;

mod expr;
pub use expr::{
    BinOp, BinOpKind, Callee, CallExpr, Expr, ExprKind, FloatSuffix, IntSuffix, Lit, LitKind,
    UnOp, UnOpKind,
};

mod item;
pub use item::{
    AliasDecl, ConstAssert, ConstDecl, FunctionDecl, Item, ItemKind, LetDecl, OverrideDecl,
    Param, ReturnType, StructDecl, StructMember, VarDecl,
};

mod stmt;
pub use stmt::{
    AssignStmt, Block, CaseSelector, Continuing, ElseBranch, ForStmt, IfStmt, LoopStmt, Stmt,
    StmtKind, SwitchCase, SwitchStmt, WhileStmt,
};

mod ty;
pub use ty::{ArrayTy, GenericTy, MatrixTy, PtrTy, TyKind, Type, VectorTy};

/// A parsed WGSL module: the root of the AST, owning every node, symbol, and
/// scope created for one invocation.
#[derive(Debug)]
pub struct Module {
    /// `enable`/`requires`/`diagnostic` directives, in source order.
    pub directives: Vec<Directive>,
    /// Top-level declarations, in source order.
    pub items: Vec<Item>,
    /// All symbols declared in the module.
    pub symbols: SymbolTable,
    /// The scope tree. The module scope is populated during parsing;
    /// function and block scopes during the bind pass.
    pub scopes: ScopeTree,
}

/// An identifier as written in the source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ident {
    /// The identifier text.
    pub name: String,
    /// Source location.
    pub span: Span,
}

impl Ident {
    /// Creates a new identifier.
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self { name: name.into(), span }
    }

    /// Returns the identifier text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A use of an identifier in an expression or type position.
///
/// `reference` is `None` until the bind pass resolves it; it stays `None`
/// for predeclared builtins and for names that failed to resolve, which
/// downstream passes treat as pinned.
#[derive(Clone, Debug)]
pub struct IdentRef {
    /// The identifier as written.
    pub ident: Ident,
    /// The resolved symbol.
    pub reference: Option<SymbolId>,
}

impl IdentRef {
    /// Creates a new, unresolved reference.
    pub fn new(ident: Ident) -> Self {
        Self { ident, reference: None }
    }
}

/// An attribute: `@name` or `@name(arg, ...)`.
#[derive(Clone, Debug)]
pub struct Attribute {
    /// Source location, from `@` through the closing parenthesis.
    pub span: Span,
    /// The attribute name, without the `@`.
    pub name: Ident,
    /// Arguments. Empty for marker attributes like `@vertex`.
    pub args: Vec<Expr>,
}

impl Attribute {
    /// Returns `true` if the attribute has the given name.
    #[inline]
    pub fn is(&self, name: &str) -> bool {
        self.name.name == name
    }
}

/// A module directive, before all declarations.
#[derive(Clone, Debug)]
pub struct Directive {
    /// Source location.
    pub span: Span,
    /// The directive kind and payload.
    pub kind: DirectiveKind,
}

/// A directive payload.
#[derive(Clone, Debug)]
pub enum DirectiveKind {
    /// `enable f16;`
    Enable(Vec<DirectiveName>),
    /// `requires readonly_and_readwrite_storage_textures;`
    Requires(Vec<DirectiveName>),
    /// `diagnostic(off, derivative_uniformity);`
    Diagnostic {
        /// The severity: `error`, `warning`, `info`, or `off`.
        severity: Ident,
        /// The rule name, optionally qualified: `foo` or `foo.bar`.
        rule: (Ident, Option<Ident>),
    },
}

/// An extension name listed by an `enable` or `requires` directive.
///
/// The name gets a pinned symbol so that reflection and renaming see it, but
/// it is not entered into any scope: extensions are not referenceable.
#[derive(Clone, Debug)]
pub struct DirectiveName {
    /// The extension name.
    pub ident: Ident,
    /// The symbol created for it.
    pub symbol: SymbolId,
}
