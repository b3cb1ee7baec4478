//! The per-module symbol table and scope tree.
//!
//! Every declared name gets a [`Symbol`] at parse time. AST nodes refer to
//! symbols through [`SymbolId`]; an unresolved reference slot is
//! `Option<SymbolId>` and stays `None` until the bind pass fills it, so
//! there is no sentinel value to collide with a default.

use crate::{AccessMode, AddressSpace};
use index_vec::IndexVec;
use indexmap::IndexMap;
use wgslmin_interface::Span;

index_vec::define_index_type! {
    /// A reference to a [`Symbol`] in the module's [`SymbolTable`].
    pub struct SymbolId = u32;
}

index_vec::define_index_type! {
    /// A reference to a [`Scope`] in the module's scope tree.
    pub struct ScopeId = u32;
}

impl ScopeId {
    /// The module scope. Always present; always the first scope.
    pub const MODULE: Self = Self::from_raw_unchecked(0);
}

/// What kind of declaration a symbol names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// A `var` declaration, module-scope or local.
    Variable,
    /// A function parameter.
    Parameter,
    /// A function.
    Function,
    /// A struct.
    Struct,
    /// A struct field.
    Field,
    /// A type alias.
    Alias,
    /// An `override` declaration.
    Override,
    /// A `const` declaration.
    Const,
    /// A `let` declaration.
    Let,
    /// An extension named by an `enable` or `requires` directive.
    Directive,
}

bitflags::bitflags! {
    /// Boolean properties of a symbol, set by the bind pass and liveness.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct SymbolFlags: u8 {
        /// Reachable from an entry point; set by liveness analysis.
        const LIVE = 1 << 0;
        /// A function with a shader stage attribute.
        const ENTRY_POINT = 1 << 1;
        /// A module-scope `var` with `@group` and `@binding`.
        const EXTERNAL_BINDING = 1 << 2;
        /// Must keep its original name in the output.
        const PINNED = 1 << 3;
        /// A predeclared WGSL name.
        const BUILTIN = 1 << 4;
    }
}

/// The durable identity of a declared name.
#[derive(Clone, Debug)]
pub struct Symbol {
    /// The name as written in the source.
    pub name: String,
    /// The declaration kind.
    pub kind: SymbolKind,
    /// The span of the declaring identifier.
    pub span: Span,
    /// The scope the symbol is declared in.
    pub scope: ScopeId,
    /// Number of resolved uses, maintained by the bind pass.
    pub uses: u32,
    /// Flag set.
    pub flags: SymbolFlags,
    /// `@group` value, for external bindings.
    pub group: Option<u32>,
    /// `@binding` value, for external bindings.
    pub binding: Option<u32>,
    /// Address space, for `var` declarations.
    pub address_space: Option<AddressSpace>,
    /// Access mode, for `var<storage, ...>` declarations.
    pub access: Option<AccessMode>,
}

impl Symbol {
    /// Returns `true` if the given flag is set.
    #[inline]
    pub fn is(&self, flag: SymbolFlags) -> bool {
        self.flags.contains(flag)
    }

    /// Returns `true` if the symbol must keep its original name.
    pub fn keeps_original_name(&self) -> bool {
        self.flags.intersects(
            SymbolFlags::ENTRY_POINT | SymbolFlags::PINNED | SymbolFlags::BUILTIN,
        ) || self.kind == SymbolKind::Field
            || self.kind == SymbolKind::Directive
    }
}

/// All symbols of one module, in declaration order.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: IndexVec<SymbolId, Symbol>,
}

impl SymbolTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new symbol with zero uses and empty flags.
    pub fn fresh(
        &mut self,
        name: impl Into<String>,
        kind: SymbolKind,
        span: Span,
        scope: ScopeId,
    ) -> SymbolId {
        self.symbols.push(Symbol {
            name: name.into(),
            kind,
            span,
            scope,
            uses: 0,
            flags: SymbolFlags::empty(),
            group: None,
            binding: None,
            address_space: None,
            access: None,
        })
    }

    /// Returns the number of symbols.
    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns `true` if the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterates over `(id, symbol)` pairs in declaration order.
    pub fn iter_enumerated(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> + '_ {
        self.symbols.iter_enumerated()
    }

    /// Sets a flag on a symbol.
    #[inline]
    pub fn set_flag(&mut self, id: SymbolId, flag: SymbolFlags) {
        self.symbols[id].flags |= flag;
    }
}

impl std::ops::Index<SymbolId> for SymbolTable {
    type Output = Symbol;

    #[inline]
    fn index(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id]
    }
}

impl std::ops::IndexMut<SymbolId> for SymbolTable {
    #[inline]
    fn index_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id]
    }
}

/// The kind of a scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    /// The module scope. Declarations here may reference one another in any
    /// textual order.
    Module,
    /// A function scope, holding its parameters.
    Function,
    /// A block scope: compound statements, loop bodies, `continuing` blocks.
    Block,
}

/// A node in the scope tree.
///
/// The name map preserves insertion order so that iteration over a scope is
/// deterministic.
#[derive(Debug)]
pub struct Scope {
    /// The parent scope. `None` only for the module scope.
    pub parent: Option<ScopeId>,
    /// The scope kind.
    pub kind: ScopeKind,
    /// Declared names, in declaration order.
    pub names: IndexMap<String, SymbolId>,
}

/// The scope tree of one module.
///
/// The module scope is created eagerly; function and block scopes are added
/// as the bind pass walks function bodies. Lookup walks parent links;
/// declarations never hoist.
#[derive(Debug)]
pub struct ScopeTree {
    scopes: IndexVec<ScopeId, Scope>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    /// Creates a scope tree containing only the module scope.
    pub fn new() -> Self {
        let mut scopes = IndexVec::new();
        scopes.push(Scope { parent: None, kind: ScopeKind::Module, names: IndexMap::new() });
        Self { scopes }
    }

    /// Adds a child scope.
    pub fn push_scope(&mut self, parent: ScopeId, kind: ScopeKind) -> ScopeId {
        self.scopes.push(Scope { parent: Some(parent), kind, names: IndexMap::new() })
    }

    /// Declares `name` in `scope`.
    ///
    /// Returns the previously declared symbol if the name already exists in
    /// this exact scope, leaving the scope unchanged.
    pub fn declare(&mut self, scope: ScopeId, name: &str, id: SymbolId) -> Option<SymbolId> {
        let names = &mut self.scopes[scope].names;
        if let Some(&existing) = names.get(name) {
            return Some(existing);
        }
        names.insert(name.to_string(), id);
        None
    }

    /// Resolves `name` starting at `scope`, walking parent links.
    pub fn lookup(&self, mut scope: ScopeId, name: &str) -> Option<SymbolId> {
        loop {
            let s = &self.scopes[scope];
            if let Some(&id) = s.names.get(name) {
                return Some(id);
            }
            scope = s.parent?;
        }
    }

    /// Returns the scope with the given id.
    #[inline]
    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id]
    }

    /// Iterates over all scopes.
    pub fn iter(&self) -> impl Iterator<Item = (ScopeId, &Scope)> + '_ {
        self.scopes.iter_enumerated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_parents() {
        let mut symbols = SymbolTable::new();
        let mut scopes = ScopeTree::new();
        let a = symbols.fresh("a", SymbolKind::Const, Span::DUMMY, ScopeId::MODULE);
        assert_eq!(scopes.declare(ScopeId::MODULE, "a", a), None);

        let func = scopes.push_scope(ScopeId::MODULE, ScopeKind::Function);
        let block = scopes.push_scope(func, ScopeKind::Block);
        let shadow = symbols.fresh("a", SymbolKind::Let, Span::DUMMY, block);

        assert_eq!(scopes.lookup(block, "a"), Some(a));
        assert_eq!(scopes.declare(block, "a", shadow), None);
        assert_eq!(scopes.lookup(block, "a"), Some(shadow));
        assert_eq!(scopes.lookup(func, "a"), Some(a));
        assert_eq!(scopes.lookup(block, "missing"), None);
    }

    #[test]
    fn duplicate_declaration_is_reported() {
        let mut symbols = SymbolTable::new();
        let mut scopes = ScopeTree::new();
        let first = symbols.fresh("x", SymbolKind::Variable, Span::DUMMY, ScopeId::MODULE);
        let second = symbols.fresh("x", SymbolKind::Variable, Span::DUMMY, ScopeId::MODULE);
        assert_eq!(scopes.declare(ScopeId::MODULE, "x", first), None);
        assert_eq!(scopes.declare(ScopeId::MODULE, "x", second), Some(first));
    }
}
