//! The bind pass.
//!
//! Walks the AST once, resolving every identifier reference against the
//! scope chain, incrementing use counts, and interpreting attributes into
//! symbol flags. This is the only pass that mutates the AST.
//!
//! Local scopes are created here rather than during parsing: a declaration
//! is entered into its scope only after its initializer has been resolved,
//! which is exactly WGSL's no-hoisting rule (`let x = x;` sees the outer
//! `x`).

use crate::builtins::is_predeclared;
use crate::eval::{collect_const_values, const_u32};
use rustc_hash::FxHashMap;
use wgslmin_ast::ast::*;
use wgslmin_ast::{
    AddressSpace, ScopeId, ScopeKind, ScopeTree, SymbolFlags, SymbolId, SymbolTable,
};
use wgslmin_interface::Session;

/// Attributes whose arguments are constant expressions and take part in
/// name resolution. The rest (`@builtin`, `@interpolate`, `@diagnostic`)
/// carry enumerant names that are not identifiers in any scope.
const CONST_EXPR_ATTRS: &[&str] =
    &["group", "binding", "workgroup_size", "location", "id", "size", "align", "blend_src"];

/// Resolves all references in `module` and interprets attributes.
///
/// Unresolved names that are not predeclared get a warning and keep a
/// `None` reference; downstream passes treat them as pinned so that
/// host-injected identifiers survive minification.
#[instrument(name = "bind", level = "debug", skip_all)]
pub fn bind(sess: &Session, module: &mut Module) {
    let Module { directives, items, symbols, scopes } = module;

    let const_values = collect_const_values(items);
    let mut binder = Binder { sess, symbols, scopes, scope: ScopeId::MODULE, const_values };

    for directive in directives.iter() {
        match &directive.kind {
            DirectiveKind::Enable(names) | DirectiveKind::Requires(names) => {
                for name in names {
                    binder.symbols.set_flag(name.symbol, SymbolFlags::PINNED);
                }
            }
            DirectiveKind::Diagnostic { .. } => {}
        }
    }

    for item in items.iter_mut() {
        binder.bind_item(item);
    }
    debug!(symbols = binder.symbols.len(), "bound");
}

struct Binder<'a, 'sess> {
    sess: &'sess Session,
    symbols: &'a mut SymbolTable,
    scopes: &'a mut ScopeTree,
    /// The scope the binder is currently resolving in.
    scope: ScopeId,
    /// Module-scope constant values, for attribute evaluation.
    const_values: FxHashMap<SymbolId, u32>,
}

impl Binder<'_, '_> {
    fn bind_item(&mut self, item: &mut Item) {
        let Item { attrs, kind, .. } = item;
        self.bind_attrs(attrs);
        match kind {
            ItemKind::Var(decl) => {
                self.bind_var_parts(decl);
                self.finish_global_var(decl, attrs);
            }
            ItemKind::Const(decl) => {
                if let Some(ty) = &mut decl.ty {
                    self.bind_type(ty);
                }
                self.bind_expr(&mut decl.init);
            }
            ItemKind::Override(decl) => {
                if let Some(ty) = &mut decl.ty {
                    self.bind_type(ty);
                }
                if let Some(init) = &mut decl.init {
                    self.bind_expr(init);
                }
                // `@id(n)` makes the override's pipeline identity its id,
                // but hosts may still override by name.
                if attrs.iter().any(|a| a.is("id")) {
                    self.symbols.set_flag(decl.symbol, SymbolFlags::PINNED);
                }
            }
            ItemKind::Function(decl) => self.bind_function(decl, attrs),
            ItemKind::Struct(decl) => self.bind_struct(decl),
            ItemKind::Alias(decl) => self.bind_type(&mut decl.ty),
            ItemKind::ConstAssert(assert) => self.bind_expr(&mut assert.expr),
        }
    }

    /// Resolves the constant-expression arguments of attributes so that
    /// liveness sees constants referenced from `@workgroup_size` and
    /// friends.
    fn bind_attrs(&mut self, attrs: &mut [Attribute]) {
        for attr in attrs {
            if CONST_EXPR_ATTRS.contains(&attr.name.as_str()) {
                for arg in &mut attr.args {
                    self.bind_expr(arg);
                }
            }
        }
    }

    fn bind_var_parts(&mut self, decl: &mut VarDecl) {
        if let Some(ty) = &mut decl.ty {
            self.bind_type(ty);
        }
        if let Some(init) = &mut decl.init {
            self.bind_expr(init);
        }
    }

    /// Interprets a module-scope `var`'s attributes and type into symbol
    /// facts: address space, access mode, and external-binding status.
    fn finish_global_var(&mut self, decl: &VarDecl, attrs: &[Attribute]) {
        let group = self.attr_u32(attrs, "group");
        let binding = self.attr_u32(attrs, "binding");
        let address_space = decl.address_space.or_else(|| {
            decl.ty.as_ref().and_then(|ty| is_handle_type(ty).then_some(AddressSpace::Handle))
        });

        let symbol = &mut self.symbols[decl.symbol];
        symbol.address_space = address_space;
        symbol.access = decl.access;
        if let (Some(group), Some(binding)) = (group, binding) {
            symbol.flags |= SymbolFlags::EXTERNAL_BINDING;
            symbol.group = Some(group);
            symbol.binding = Some(binding);
        }
    }

    fn bind_struct(&mut self, decl: &mut StructDecl) {
        for member in &mut decl.members {
            self.bind_attrs(&mut member.attrs);
            self.bind_type(&mut member.ty);
            // `@builtin` and `@location` tie the member to the pipeline
            // interface; its name must survive.
            if member.attrs.iter().any(|a| a.is("builtin") || a.is("location")) {
                self.symbols.set_flag(member.symbol, SymbolFlags::PINNED);
            }
        }
    }

    fn bind_function(&mut self, decl: &mut FunctionDecl, attrs: &[Attribute]) {
        if attrs.iter().any(|a| a.is("vertex") || a.is("fragment") || a.is("compute")) {
            self.symbols.set_flag(decl.symbol, SymbolFlags::ENTRY_POINT);
        }

        // Parameter types and the return type resolve at module scope.
        for param in &mut decl.params {
            self.bind_attrs(&mut param.attrs);
            self.bind_type(&mut param.ty);
            if param.attrs.iter().any(|a| a.is("builtin")) {
                self.symbols.set_flag(param.symbol, SymbolFlags::PINNED);
            }
        }
        if let Some(ret) = &mut decl.ret {
            self.bind_attrs(&mut ret.attrs);
            self.bind_type(&mut ret.ty);
        }

        // Parameters and the body share the function scope.
        let parent = self.scope;
        self.scope = self.scopes.push_scope(parent, ScopeKind::Function);
        for param in &decl.params {
            self.declare_local(param.symbol, &param.name);
        }
        for stmt in &mut decl.body.stmts {
            self.bind_stmt(stmt);
        }
        self.scope = parent;
    }

    fn bind_block(&mut self, block: &mut Block) {
        let parent = self.scope;
        self.scope = self.scopes.push_scope(parent, ScopeKind::Block);
        for stmt in &mut block.stmts {
            self.bind_stmt(stmt);
        }
        self.scope = parent;
    }

    fn bind_stmt(&mut self, stmt: &mut Stmt) {
        match &mut stmt.kind {
            StmtKind::Block(block) => self.bind_block(block),
            StmtKind::If(s) => self.bind_if(s),
            StmtKind::Switch(s) => {
                self.bind_expr(&mut s.selector);
                for case in &mut s.cases {
                    for selector in &mut case.selectors {
                        if let CaseSelector::Expr(e) = selector {
                            self.bind_expr(e);
                        }
                    }
                    self.bind_block(&mut case.body);
                }
            }
            StmtKind::For(s) => {
                // The loop header gets its own scope so the induction
                // variable does not leak.
                let parent = self.scope;
                self.scope = self.scopes.push_scope(parent, ScopeKind::Block);
                if let Some(init) = &mut s.init {
                    self.bind_stmt(init);
                }
                if let Some(cond) = &mut s.cond {
                    self.bind_expr(cond);
                }
                if let Some(update) = &mut s.update {
                    self.bind_stmt(update);
                }
                self.bind_block(&mut s.body);
                self.scope = parent;
            }
            StmtKind::While(s) => {
                self.bind_expr(&mut s.cond);
                self.bind_block(&mut s.body);
            }
            StmtKind::Loop(s) => {
                // The continuing block can see loop-body declarations, so
                // its scope nests inside the loop body's. `break if` is the
                // continuing block's last statement and resolves inside it.
                let parent = self.scope;
                self.scope = self.scopes.push_scope(parent, ScopeKind::Block);
                for stmt in &mut s.body.stmts {
                    self.bind_stmt(stmt);
                }
                if let Some(continuing) = &mut s.continuing {
                    let loop_scope = self.scope;
                    self.scope = self.scopes.push_scope(loop_scope, ScopeKind::Block);
                    for stmt in &mut continuing.body.stmts {
                        self.bind_stmt(stmt);
                    }
                    if let Some(break_if) = &mut continuing.break_if {
                        self.bind_expr(break_if);
                    }
                    self.scope = loop_scope;
                }
                self.scope = parent;
            }
            StmtKind::Assign(s) => {
                if let Some(lhs) = &mut s.lhs {
                    self.bind_expr(lhs);
                }
                self.bind_expr(&mut s.rhs);
            }
            StmtKind::Increment(e) | StmtKind::Decrement(e) | StmtKind::Call(e) => {
                self.bind_expr(e)
            }
            StmtKind::BreakIf(e) => self.bind_expr(e),
            StmtKind::Return(e) => {
                if let Some(e) = e {
                    self.bind_expr(e);
                }
            }
            StmtKind::Var(decl) => {
                self.bind_var_parts(decl);
                self.declare_local(decl.symbol, &decl.name);
            }
            StmtKind::Let(decl) => {
                if let Some(ty) = &mut decl.ty {
                    self.bind_type(ty);
                }
                self.bind_expr(&mut decl.init);
                self.declare_local(decl.symbol, &decl.name);
            }
            StmtKind::Const(decl) => {
                if let Some(ty) = &mut decl.ty {
                    self.bind_type(ty);
                }
                self.bind_expr(&mut decl.init);
                self.declare_local(decl.symbol, &decl.name);
            }
            StmtKind::ConstAssert(assert) => self.bind_expr(&mut assert.expr),
            StmtKind::Break | StmtKind::Continue | StmtKind::Discard | StmtKind::Empty => {}
        }
    }

    fn bind_if(&mut self, s: &mut IfStmt) {
        self.bind_expr(&mut s.cond);
        self.bind_block(&mut s.then_block);
        match s.else_branch.as_deref_mut() {
            Some(ElseBranch::If(elif)) => self.bind_if(elif),
            Some(ElseBranch::Block(block)) => self.bind_block(block),
            None => {}
        }
    }

    fn bind_expr(&mut self, expr: &mut Expr) {
        match &mut expr.kind {
            ExprKind::Lit(_) => {}
            ExprKind::Ident(r) => self.resolve_ref(r),
            ExprKind::Unary(_, e) | ExprKind::Paren(e) => self.bind_expr(e),
            ExprKind::Binary(_, lhs, rhs) => {
                self.bind_expr(lhs);
                self.bind_expr(rhs);
            }
            ExprKind::Index(e, index) => {
                self.bind_expr(e);
                self.bind_expr(index);
            }
            ExprKind::Member(e, _) => self.bind_expr(e),
            ExprKind::Call(call) => {
                match &mut call.callee {
                    Callee::Ident(r) => self.resolve_ref(r),
                    Callee::Type(ty) => self.bind_type(ty),
                }
                for arg in &mut call.args {
                    self.bind_expr(arg);
                }
            }
        }
    }

    fn bind_type(&mut self, ty: &mut Type) {
        match &mut ty.kind {
            TyKind::Named(r) => self.resolve_ref(r),
            TyKind::Vector(t) => self.bind_type(&mut t.elem),
            TyKind::Matrix(t) => self.bind_type(&mut t.elem),
            TyKind::Array(t) => {
                self.bind_type(&mut t.elem);
                if let Some(size) = &mut t.size {
                    self.bind_expr(size);
                }
            }
            TyKind::Atomic(elem) => self.bind_type(elem),
            TyKind::Ptr(t) => self.bind_type(&mut t.elem),
            TyKind::Generic(t) => {
                self.resolve_ref(&mut t.name);
                for arg in &mut t.args {
                    self.bind_expr(arg);
                }
            }
        }
    }

    fn resolve_ref(&mut self, r: &mut IdentRef) {
        match self.scopes.lookup(self.scope, &r.ident.name) {
            Some(id) => {
                r.reference = Some(id);
                self.symbols[id].uses += 1;
            }
            None => {
                if !is_predeclared(&r.ident.name) {
                    self.sess
                        .dcx
                        .warn(format!(
                            "cannot find `{}` in this scope; assuming it is provided by the \
                             host and keeping the name as written",
                            r.ident.name
                        ))
                        .span(r.ident.span)
                        .emit();
                }
            }
        }
    }

    /// Enters a local declaration into the current scope, after its
    /// initializer has been resolved.
    fn declare_local(&mut self, id: SymbolId, name: &Ident) {
        self.symbols[id].scope = self.scope;
        if self.scopes.declare(self.scope, &name.name, id).is_some() {
            self.sess
                .dcx
                .err(format!("the name `{}` is declared multiple times in this scope", name.name))
                .span(name.span)
                .emit();
        }
    }

    fn attr_u32(&self, attrs: &[Attribute], name: &str) -> Option<u32> {
        let attr = attrs.iter().find(|a| a.is(name))?;
        const_u32(attr.args.first()?, &self.const_values)
    }
}

/// Returns `true` for types that live in the `handle` address space.
fn is_handle_type(ty: &Type) -> bool {
    let name = match &ty.kind {
        TyKind::Named(r) => &r.ident.name,
        TyKind::Generic(t) => &t.name.ident.name,
        _ => return false,
    };
    name.starts_with("texture_") || name == "sampler" || name == "sampler_comparison"
}
