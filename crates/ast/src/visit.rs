//! Read-only AST visitor.
//!
//! Every walk function is an exhaustive match over its node's kinds, so
//! adding a kind forces every pass through here to be revisited.

use crate::ast::*;

/// A read-only AST visitor. Override the methods of interest; the defaults
/// walk the whole subtree.
pub trait Visitor: Sized {
    fn visit_item(&mut self, item: &Item) {
        walk_item(self, item);
    }

    fn visit_attribute(&mut self, attr: &Attribute) {
        walk_attribute(self, attr);
    }

    fn visit_block(&mut self, block: &Block) {
        walk_block(self, block);
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }

    fn visit_type(&mut self, ty: &Type) {
        walk_type(self, ty);
    }

    fn visit_ident_ref(&mut self, _ident: &IdentRef) {}
}

pub fn walk_item<V: Visitor>(v: &mut V, item: &Item) {
    for attr in &item.attrs {
        v.visit_attribute(attr);
    }
    match &item.kind {
        ItemKind::Var(var) => walk_var_decl(v, var),
        ItemKind::Const(c) => {
            if let Some(ty) = &c.ty {
                v.visit_type(ty);
            }
            v.visit_expr(&c.init);
        }
        ItemKind::Override(o) => {
            if let Some(ty) = &o.ty {
                v.visit_type(ty);
            }
            if let Some(init) = &o.init {
                v.visit_expr(init);
            }
        }
        ItemKind::Function(f) => {
            for param in &f.params {
                for attr in &param.attrs {
                    v.visit_attribute(attr);
                }
                v.visit_type(&param.ty);
            }
            if let Some(ret) = &f.ret {
                for attr in &ret.attrs {
                    v.visit_attribute(attr);
                }
                v.visit_type(&ret.ty);
            }
            v.visit_block(&f.body);
        }
        ItemKind::Struct(s) => {
            for member in &s.members {
                for attr in &member.attrs {
                    v.visit_attribute(attr);
                }
                v.visit_type(&member.ty);
            }
        }
        ItemKind::Alias(a) => v.visit_type(&a.ty),
        ItemKind::ConstAssert(c) => v.visit_expr(&c.expr),
    }
}

pub fn walk_var_decl<V: Visitor>(v: &mut V, var: &VarDecl) {
    if let Some(ty) = &var.ty {
        v.visit_type(ty);
    }
    if let Some(init) = &var.init {
        v.visit_expr(init);
    }
}

pub fn walk_attribute<V: Visitor>(v: &mut V, attr: &Attribute) {
    for arg in &attr.args {
        v.visit_expr(arg);
    }
}

pub fn walk_block<V: Visitor>(v: &mut V, block: &Block) {
    for stmt in &block.stmts {
        v.visit_stmt(stmt);
    }
}

pub fn walk_stmt<V: Visitor>(v: &mut V, stmt: &Stmt) {
    match &stmt.kind {
        StmtKind::Block(block) => v.visit_block(block),
        StmtKind::If(s) => walk_if(v, s),
        StmtKind::Switch(s) => {
            v.visit_expr(&s.selector);
            for case in &s.cases {
                for selector in &case.selectors {
                    match selector {
                        CaseSelector::Expr(e) => v.visit_expr(e),
                        CaseSelector::Default => {}
                    }
                }
                v.visit_block(&case.body);
            }
        }
        StmtKind::For(s) => {
            if let Some(init) = &s.init {
                v.visit_stmt(init);
            }
            if let Some(cond) = &s.cond {
                v.visit_expr(cond);
            }
            if let Some(update) = &s.update {
                v.visit_stmt(update);
            }
            v.visit_block(&s.body);
        }
        StmtKind::While(s) => {
            v.visit_expr(&s.cond);
            v.visit_block(&s.body);
        }
        StmtKind::Loop(s) => {
            v.visit_block(&s.body);
            if let Some(continuing) = &s.continuing {
                v.visit_block(&continuing.body);
                if let Some(break_if) = &continuing.break_if {
                    v.visit_expr(break_if);
                }
            }
        }
        StmtKind::Assign(s) => {
            if let Some(lhs) = &s.lhs {
                v.visit_expr(lhs);
            }
            v.visit_expr(&s.rhs);
        }
        StmtKind::Increment(e) | StmtKind::Decrement(e) | StmtKind::Call(e) => v.visit_expr(e),
        StmtKind::Break | StmtKind::Continue | StmtKind::Discard | StmtKind::Empty => {}
        StmtKind::BreakIf(e) => v.visit_expr(e),
        StmtKind::Return(e) => {
            if let Some(e) = e {
                v.visit_expr(e);
            }
        }
        StmtKind::Var(var) => walk_var_decl(v, var),
        StmtKind::Let(l) => {
            if let Some(ty) = &l.ty {
                v.visit_type(ty);
            }
            v.visit_expr(&l.init);
        }
        StmtKind::Const(c) => {
            if let Some(ty) = &c.ty {
                v.visit_type(ty);
            }
            v.visit_expr(&c.init);
        }
        StmtKind::ConstAssert(c) => v.visit_expr(&c.expr),
    }
}

fn walk_if<V: Visitor>(v: &mut V, s: &IfStmt) {
    v.visit_expr(&s.cond);
    v.visit_block(&s.then_block);
    match s.else_branch.as_deref() {
        Some(ElseBranch::If(elif)) => walk_if(v, elif),
        Some(ElseBranch::Block(block)) => v.visit_block(block),
        None => {}
    }
}

pub fn walk_expr<V: Visitor>(v: &mut V, expr: &Expr) {
    match &expr.kind {
        ExprKind::Lit(_) => {}
        ExprKind::Ident(ident) => v.visit_ident_ref(ident),
        ExprKind::Unary(_, e) | ExprKind::Paren(e) => v.visit_expr(e),
        ExprKind::Binary(_, lhs, rhs) => {
            v.visit_expr(lhs);
            v.visit_expr(rhs);
        }
        ExprKind::Index(e, index) => {
            v.visit_expr(e);
            v.visit_expr(index);
        }
        ExprKind::Member(e, _) => v.visit_expr(e),
        ExprKind::Call(call) => {
            match &call.callee {
                Callee::Ident(ident) => v.visit_ident_ref(ident),
                Callee::Type(ty) => v.visit_type(ty),
            }
            for arg in &call.args {
                v.visit_expr(arg);
            }
        }
    }
}

pub fn walk_type<V: Visitor>(v: &mut V, ty: &Type) {
    match &ty.kind {
        TyKind::Named(ident) => v.visit_ident_ref(ident),
        TyKind::Vector(t) => v.visit_type(&t.elem),
        TyKind::Matrix(t) => v.visit_type(&t.elem),
        TyKind::Array(t) => {
            v.visit_type(&t.elem);
            if let Some(size) = &t.size {
                v.visit_expr(size);
            }
        }
        TyKind::Atomic(elem) => v.visit_type(elem),
        TyKind::Ptr(t) => v.visit_type(&t.elem),
        TyKind::Generic(t) => {
            v.visit_ident_ref(&t.name);
            for arg in &t.args {
                v.visit_expr(arg);
            }
        }
    }
}
