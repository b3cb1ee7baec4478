//! The minifying printer.
//!
//! Serializes the AST using the renamer's name map, eliding whitespace and
//! shortening literals and type constructors when the options ask for it.
//! Two adjacent tokens get a separating space only when concatenating them
//! would change the token stream.

use crate::source_map::{OriginalPos, SourceMap, SourceMapBuilder};
use rustc_hash::{FxHashMap, FxHashSet};
use wgslmin_ast::ast::*;
use wgslmin_ast::visit::Visitor;
use wgslmin_ast::{SymbolFlags, SymbolId};
use wgslmin_config::MinifyOptions;
use wgslmin_interface::{SourceFile, Span, utf16_width};
use wgslmin_sema::RenameMap;

/// Prints a module. Returns the output text and, if requested, its source
/// map.
#[instrument(name = "print", level = "debug", skip_all)]
pub fn print(
    module: &Module,
    renames: &RenameMap,
    options: &MinifyOptions,
    file: &SourceFile,
) -> (String, Option<SourceMap>) {
    let map = options.source_map.then(|| {
        SourceMapBuilder::new(
            options.source_map_source_name.clone().unwrap_or_else(|| file.name.clone()),
            options.source_map_include_sources.then(|| file.src.clone()),
            options.source_map_file.clone(),
        )
    });
    let mut printer = Printer {
        module,
        renames,
        options,
        file,
        out: String::with_capacity(file.src.len() / 2),
        active_aliases: FxHashSet::default(),
        indent: 0,
        line: 0,
        col: 0,
        pending: None,
        map,
    };
    printer.print_module();
    let Printer { out, map, .. } = printer;
    trace!(out.len = out.len(), "printed");
    (out, map.map(SourceMapBuilder::finish))
}

struct Printer<'a> {
    module: &'a Module,
    renames: &'a RenameMap,
    options: &'a MinifyOptions,
    file: &'a SourceFile,
    out: String,
    /// Alias-preserved bindings whose alias is in effect in the function
    /// currently being printed.
    active_aliases: FxHashSet<SymbolId>,
    indent: usize,
    /// Generated line and UTF-16 column, tracked for the source map.
    line: u32,
    col: u32,
    /// A mapping to record at the next emitted token.
    pending: Option<(Span, Option<u32>)>,
    map: Option<SourceMapBuilder>,
}

impl Printer<'_> {
    fn print_module(&mut self) {
        for directive in &self.module.directives {
            self.print_directive(directive);
        }
        for item in &self.module.items {
            if !self.is_emitted(item) {
                continue;
            }
            self.mark(item.span);
            self.print_item(item);
            self.newline();
        }
    }

    /// Dead declarations are skipped when tree shaking is on;
    /// `const_assert` is always live.
    fn is_emitted(&self, item: &Item) -> bool {
        if !self.options.tree_shaking {
            return true;
        }
        match item.symbol() {
            Some(id) => self.module.symbols[id].is(SymbolFlags::LIVE),
            None => true,
        }
    }

    fn print_directive(&mut self, directive: &Directive) {
        match &directive.kind {
            DirectiveKind::Enable(names) | DirectiveKind::Requires(names) => {
                let keyword = match &directive.kind {
                    DirectiveKind::Enable(_) => "enable",
                    _ => "requires",
                };
                self.word(keyword);
                for (i, name) in names.iter().enumerate() {
                    if i > 0 {
                        self.word(",");
                        self.space();
                    }
                    self.word(&name.ident.name);
                }
            }
            DirectiveKind::Diagnostic { severity, rule } => {
                self.word("diagnostic");
                self.word("(");
                self.word(&severity.name);
                self.word(",");
                self.space();
                self.word(&rule.0.name);
                if let Some(sub) = &rule.1 {
                    self.word(".");
                    self.word(&sub.name);
                }
                self.word(")");
            }
        }
        self.word(";");
        self.newline();
    }

    fn print_item(&mut self, item: &Item) {
        self.print_attrs(&item.attrs);
        match &item.kind {
            ItemKind::Var(decl) => {
                // An alias-preserved binding keeps its declaration as
                // written; the alias statements go at the top of the
                // function that uses it.
                self.print_var_decl(decl);
                self.word(";");
            }
            ItemKind::Const(decl) => {
                self.print_const_decl(decl);
                self.word(";");
            }
            ItemKind::Override(decl) => {
                self.word("override");
                self.decl_name(decl.symbol, &decl.name);
                if let Some(ty) = &decl.ty {
                    self.word(":");
                    self.space();
                    self.print_type(ty);
                }
                if let Some(init) = &decl.init {
                    self.op("=");
                    self.print_expr(init);
                }
                self.word(";");
            }
            ItemKind::Function(decl) => self.print_function(decl),
            ItemKind::Struct(decl) => {
                self.word("struct");
                self.decl_name(decl.symbol, &decl.name);
                self.open_brace();
                for (i, member) in decl.members.iter().enumerate() {
                    if i > 0 {
                        self.word(",");
                        self.newline();
                    }
                    self.print_attrs(&member.attrs);
                    // Field names are part of the host-visible interface.
                    self.word(&member.name.name);
                    self.word(":");
                    self.space();
                    self.print_type(&member.ty);
                }
                self.close_brace();
            }
            ItemKind::Alias(decl) => {
                self.word("alias");
                self.decl_name(decl.symbol, &decl.name);
                self.op("=");
                self.print_type(&decl.ty);
                self.word(";");
            }
            ItemKind::ConstAssert(assert) => {
                self.word("const_assert");
                self.print_expr(&assert.expr);
                self.word(";");
            }
        }
    }

    fn print_var_decl(&mut self, decl: &VarDecl) {
        self.word("var");
        if let Some(space) = decl.address_space {
            self.word("<");
            self.word(space.as_ref());
            if let Some(access) = decl.access {
                self.word(",");
                self.space();
                self.word(access.as_ref());
            }
            self.word(">");
        }
        self.decl_name(decl.symbol, &decl.name);
        if let Some(ty) = &decl.ty {
            self.word(":");
            self.space();
            self.print_type(ty);
        }
        if let Some(init) = &decl.init {
            self.op("=");
            self.print_expr(init);
        }
    }

    fn print_const_decl(&mut self, decl: &ConstDecl) {
        self.word("const");
        self.decl_name(decl.symbol, &decl.name);
        if let Some(ty) = &decl.ty {
            self.word(":");
            self.space();
            self.print_type(ty);
        }
        self.op("=");
        self.print_expr(&decl.init);
    }

    fn print_let_decl(&mut self, decl: &LetDecl) {
        self.word("let");
        self.decl_name(decl.symbol, &decl.name);
        if let Some(ty) = &decl.ty {
            self.word(":");
            self.space();
            self.print_type(ty);
        }
        self.op("=");
        self.print_expr(&decl.init);
    }

    fn print_function(&mut self, decl: &FunctionDecl) {
        self.word("fn");
        self.decl_name(decl.symbol, &decl.name);
        self.word("(");
        for (i, param) in decl.params.iter().enumerate() {
            if i > 0 {
                self.word(",");
                self.space();
            }
            self.print_attrs(&param.attrs);
            self.decl_name(param.symbol, &param.name);
            self.word(":");
            self.space();
            self.print_type(&param.ty);
        }
        self.word(")");
        if let Some(ret) = &decl.ret {
            self.word("->");
            self.print_attrs(&ret.attrs);
            self.print_type(&ret.ty);
        }
        self.open_brace();
        self.print_binding_aliases(decl);
        for (i, stmt) in decl.body.stmts.iter().enumerate() {
            if i > 0 {
                self.newline();
            }
            self.print_stmt(stmt);
        }
        self.close_brace();
        self.active_aliases.clear();
    }

    /// For each preserved external binding used at least twice in this
    /// function, emits `let <alias> = <original>;` so every use can be
    /// short. Single-use bindings keep the original name at the use site,
    /// which also makes re-minification a fixed point: the alias statement
    /// itself is the binding's only use on the next run.
    fn print_binding_aliases(&mut self, decl: &FunctionDecl) {
        let mut collector = AliasCollector {
            renames: self.renames,
            counts: FxHashMap::default(),
            found: Vec::new(),
        };
        for stmt in &decl.body.stmts {
            collector.visit_stmt(stmt);
        }
        self.active_aliases.clear();
        // Emitted in declaration order so output is stable across runs.
        let mut found = collector.found;
        found.sort_unstable();
        for id in found {
            if collector.counts[&id] < 2 {
                continue;
            }
            self.active_aliases.insert(id);
            let module = self.module;
            let alias = self.renames.assigned(id).expect("aliased symbols are always renamed");
            self.word("let");
            self.word(alias);
            self.op("=");
            self.word(&module.symbols[id].name);
            self.word(";");
            self.newline();
        }
    }

    fn print_attrs(&mut self, attrs: &[Attribute]) {
        for attr in attrs {
            self.word("@");
            self.word(&attr.name.name);
            if !attr.args.is_empty() {
                self.word("(");
                for (i, arg) in attr.args.iter().enumerate() {
                    if i > 0 {
                        self.word(",");
                        self.space();
                    }
                    self.print_expr(arg);
                }
                self.word(")");
            }
            self.space();
        }
    }

    fn print_block(&mut self, block: &Block) {
        self.open_brace();
        for (i, stmt) in block.stmts.iter().enumerate() {
            if i > 0 {
                self.newline();
            }
            self.print_stmt(stmt);
        }
        self.close_brace();
    }

    fn print_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Block(block) => self.print_block(block),
            StmtKind::If(s) => self.print_if(s),
            StmtKind::Switch(s) => {
                self.word("switch");
                self.print_expr(&s.selector);
                self.open_brace();
                for case in &s.cases {
                    self.print_case(case);
                    self.newline();
                }
                self.close_brace();
            }
            StmtKind::For(s) => {
                self.word("for");
                self.word("(");
                if let Some(init) = &s.init {
                    self.print_simple_stmt(init);
                }
                self.word(";");
                if let Some(cond) = &s.cond {
                    self.print_expr(cond);
                }
                self.word(";");
                if let Some(update) = &s.update {
                    self.print_simple_stmt(update);
                }
                self.word(")");
                self.print_block(&s.body);
            }
            StmtKind::While(s) => {
                self.word("while");
                self.print_expr(&s.cond);
                self.print_block(&s.body);
            }
            StmtKind::Loop(s) => {
                self.word("loop");
                self.open_brace();
                for stmt in &s.body.stmts {
                    self.print_stmt(stmt);
                    self.newline();
                }
                if let Some(continuing) = &s.continuing {
                    self.word("continuing");
                    self.open_brace();
                    for stmt in &continuing.body.stmts {
                        self.print_stmt(stmt);
                        self.newline();
                    }
                    if let Some(break_if) = &continuing.break_if {
                        self.word("break");
                        self.word("if");
                        self.print_expr(break_if);
                        self.word(";");
                    }
                    self.close_brace();
                }
                self.close_brace();
            }
            StmtKind::Assign(_)
            | StmtKind::Increment(_)
            | StmtKind::Decrement(_)
            | StmtKind::Call(_) => {
                self.print_simple_stmt(stmt);
                self.word(";");
            }
            StmtKind::Break => {
                self.word("break");
                self.word(";");
            }
            StmtKind::BreakIf(cond) => {
                self.word("break");
                self.word("if");
                self.print_expr(cond);
                self.word(";");
            }
            StmtKind::Continue => {
                self.word("continue");
                self.word(";");
            }
            StmtKind::Discard => {
                self.word("discard");
                self.word(";");
            }
            StmtKind::Return(value) => {
                self.word("return");
                if let Some(value) = value {
                    self.print_expr(value);
                }
                self.word(";");
            }
            StmtKind::Var(decl) => {
                self.print_var_decl(decl);
                self.word(";");
            }
            StmtKind::Let(decl) => {
                self.print_let_decl(decl);
                self.word(";");
            }
            StmtKind::Const(decl) => {
                self.print_const_decl(decl);
                self.word(";");
            }
            StmtKind::ConstAssert(assert) => {
                self.word("const_assert");
                self.print_expr(&assert.expr);
                self.word(";");
            }
            StmtKind::Empty => self.word(";"),
        }
    }

    /// Prints an assignment/increment/call statement without its `;`, as
    /// used inside `for` headers.
    fn print_simple_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Assign(s) => {
                match &s.lhs {
                    Some(lhs) => self.print_expr(lhs),
                    None => self.word("_"),
                }
                match s.op {
                    Some(op) => self.op(op.to_str_with_eq()),
                    None => self.op("="),
                }
                self.print_expr(&s.rhs);
            }
            StmtKind::Increment(e) => {
                self.print_expr(e);
                self.word("++");
            }
            StmtKind::Decrement(e) => {
                self.print_expr(e);
                self.word("--");
            }
            StmtKind::Call(e) => self.print_expr(e),
            StmtKind::Var(decl) => self.print_var_decl(decl),
            StmtKind::Let(decl) => self.print_let_decl(decl),
            StmtKind::Const(decl) => self.print_const_decl(decl),
            _ => self.print_stmt(stmt),
        }
    }

    fn print_if(&mut self, s: &IfStmt) {
        self.word("if");
        self.print_expr(&s.cond);
        self.print_block(&s.then_block);
        match s.else_branch.as_deref() {
            Some(ElseBranch::If(elif)) => {
                self.word("else");
                self.print_if(elif);
            }
            Some(ElseBranch::Block(block)) => {
                self.word("else");
                self.print_block(block);
            }
            None => {}
        }
    }

    fn print_case(&mut self, case: &SwitchCase) {
        let only_default =
            matches!(case.selectors.as_slice(), [CaseSelector::Default]);
        if only_default {
            self.word("default");
        } else {
            self.word("case");
            for (i, selector) in case.selectors.iter().enumerate() {
                if i > 0 {
                    self.word(",");
                    self.space();
                }
                match selector {
                    CaseSelector::Expr(e) => self.print_expr(e),
                    CaseSelector::Default => self.word("default"),
                }
            }
        }
        self.print_block(&case.body);
    }

    fn print_expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Lit(lit) => self.print_lit(lit),
            ExprKind::Ident(r) => self.print_ident_ref(r),
            ExprKind::Unary(op, operand) => {
                self.word(op.kind.to_str());
                self.print_expr(operand);
            }
            ExprKind::Binary(op, lhs, rhs) => {
                self.print_expr(lhs);
                self.op(op.kind.to_str());
                self.print_expr(rhs);
            }
            ExprKind::Paren(inner) => {
                self.word("(");
                self.print_expr(inner);
                self.word(")");
            }
            ExprKind::Index(base, index) => {
                self.print_expr(base);
                self.word("[");
                self.print_expr(index);
                self.word("]");
            }
            ExprKind::Member(base, member) => {
                self.print_expr(base);
                self.word(".");
                self.word(&member.name);
            }
            ExprKind::Call(call) => {
                match &call.callee {
                    Callee::Ident(r) => self.print_ident_ref(r),
                    Callee::Type(ty) => self.print_type(ty),
                }
                self.word("(");
                for (i, arg) in call.args.iter().enumerate() {
                    if i > 0 {
                        self.word(",");
                        self.space();
                    }
                    self.print_expr(arg);
                }
                self.word(")");
            }
        }
    }

    fn print_ident_ref(&mut self, r: &IdentRef) {
        match r.reference {
            Some(id) => {
                let module = self.module;
                if self.renames.is_aliased(id) && !self.active_aliases.contains(&id) {
                    // No alias in effect here; use the preserved name.
                    self.word(&module.symbols[id].name);
                    return;
                }
                match self.renames.assigned(id) {
                    Some(new_name) => {
                        self.mark_name(r.ident.span, &module.symbols[id].name);
                        self.word(new_name);
                    }
                    None => self.word(&module.symbols[id].name),
                }
            }
            // Predeclared or host-provided: keep as written.
            None => self.word(&r.ident.name),
        }
    }

    /// Prints a declared name: the assigned short name, or the original
    /// for pinned symbols and alias-preserved bindings.
    fn decl_name(&mut self, id: SymbolId, ident: &Ident) {
        if self.renames.is_aliased(id) {
            self.word(&ident.name);
            return;
        }
        match self.renames.assigned(id) {
            Some(new_name) => {
                self.mark_name(ident.span, &ident.name);
                self.word(new_name);
            }
            None => self.word(&ident.name),
        }
    }

    fn print_type(&mut self, ty: &Type) {
        match &ty.kind {
            TyKind::Named(r) => self.print_ident_ref(r),
            TyKind::Vector(t) => match scalar_suffix(&t.elem) {
                Some(suffix) if self.options.minify_syntax || t.shorthand => {
                    let name = format!("vec{}{suffix}", t.size);
                    self.word(&name);
                }
                _ => {
                    let name = format!("vec{}", t.size);
                    self.word(&name);
                    self.word("<");
                    self.print_type(&t.elem);
                    self.word(">");
                }
            },
            TyKind::Matrix(t) => {
                // Only `f` and `h` matrix shorthands are predeclared.
                let suffix = scalar_suffix(&t.elem).filter(|s| matches!(*s, "f" | "h"));
                match suffix {
                    Some(suffix) if self.options.minify_syntax || t.shorthand => {
                        let name = format!("mat{}x{}{suffix}", t.cols, t.rows);
                        self.word(&name);
                    }
                    _ => {
                        let name = format!("mat{}x{}", t.cols, t.rows);
                        self.word(&name);
                        self.word("<");
                        self.print_type(&t.elem);
                        self.word(">");
                    }
                }
            }
            TyKind::Array(t) => {
                self.word("array");
                self.word("<");
                self.print_type(&t.elem);
                if let Some(size) = &t.size {
                    self.word(",");
                    self.space();
                    self.print_expr(size);
                }
                self.word(">");
            }
            TyKind::Atomic(elem) => {
                self.word("atomic");
                self.word("<");
                self.print_type(elem);
                self.word(">");
            }
            TyKind::Ptr(t) => {
                self.word("ptr");
                self.word("<");
                self.word(t.address_space.as_ref());
                self.word(",");
                self.space();
                self.print_type(&t.elem);
                if let Some(access) = t.access {
                    self.word(",");
                    self.space();
                    self.word(access.as_ref());
                }
                self.word(">");
            }
            TyKind::Generic(t) => {
                self.print_ident_ref(&t.name);
                self.word("<");
                for (i, arg) in t.args.iter().enumerate() {
                    if i > 0 {
                        self.word(",");
                        self.space();
                    }
                    self.print_expr(arg);
                }
                self.word(">");
            }
        }
    }

    fn print_lit(&mut self, lit: &Lit) {
        match lit.kind {
            LitKind::Float { hex: false, suffix } if self.options.minify_syntax => {
                let compact = compact_float(&lit.text, suffix);
                self.word(&compact);
            }
            _ => self.word(&lit.text),
        }
    }

    // Output primitives.

    /// Emits a token, inserting a space only if gluing it to the previous
    /// output would change the lexing.
    fn word(&mut self, s: &str) {
        debug_assert!(!s.is_empty());
        let last = self.out.as_bytes().last().copied().unwrap_or(b'\0');
        if needs_space(last, s.as_bytes()[0]) {
            self.push_raw(" ");
        }
        if let Some((span, name)) = self.pending.take() {
            let lc = self.file.lookup_line_col(span.lo());
            let orig = OriginalPos { line: lc.line - 1, col: lc.col.to_u32() };
            if let Some(builder) = &mut self.map {
                builder.add_mapping(self.line, self.col, orig, name);
            }
        }
        self.push_raw(s);
    }

    fn push_raw(&mut self, s: &str) {
        self.out.push_str(s);
        match s.rfind('\n') {
            Some(pos) => {
                self.line += s.bytes().filter(|&b| b == b'\n').count() as u32;
                self.col = utf16_width(&s[pos + 1..]) as u32;
            }
            None => self.col += utf16_width(s) as u32,
        }
    }

    /// Schedules a declaration-start mapping for the next token.
    fn mark(&mut self, span: Span) {
        if self.map.is_some() {
            self.pending = Some((span, None));
        }
    }

    /// Schedules a renamed-identifier mapping for the next token.
    fn mark_name(&mut self, span: Span, original: &str) {
        if let Some(builder) = &mut self.map {
            let name = builder.name_index(original);
            self.pending = Some((span, Some(name)));
        }
    }

    /// A purely cosmetic space, emitted only in whitespace-preserving mode.
    fn space(&mut self) {
        if !self.options.minify_whitespace {
            self.push_raw(" ");
        }
    }

    /// An operator with cosmetic spaces around it.
    fn op(&mut self, s: &str) {
        self.space();
        self.word(s);
        self.space();
    }

    fn newline(&mut self) {
        if !self.options.minify_whitespace {
            self.push_raw("\n");
            for _ in 0..self.indent {
                self.push_raw("    ");
            }
        }
    }

    fn open_brace(&mut self) {
        self.space();
        self.word("{");
        self.indent += 1;
        self.newline();
    }

    fn close_brace(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.newline();
        self.word("}");
    }
}

/// Counts uses of alias-preserved external bindings in a function body,
/// keeping first-use order.
struct AliasCollector<'a> {
    renames: &'a RenameMap,
    counts: FxHashMap<SymbolId, u32>,
    found: Vec<SymbolId>,
}

impl Visitor for AliasCollector<'_> {
    fn visit_ident_ref(&mut self, ident: &IdentRef) {
        if let Some(id) = ident.reference
            && self.renames.is_aliased(id)
        {
            let count = self.counts.entry(id).or_insert(0);
            if *count == 0 {
                self.found.push(id);
            }
            *count += 1;
        }
    }
}

/// Returns the predeclared-alias suffix for a scalar element type.
fn scalar_suffix(ty: &Type) -> Option<&'static str> {
    let TyKind::Named(r) = &ty.kind else { return None };
    match r.ident.name.as_str() {
        "f32" => Some("f"),
        "i32" => Some("i"),
        "u32" => Some("u"),
        "f16" => Some("h"),
        _ => None,
    }
}

/// Returns `true` if gluing a token starting with `next` directly after
/// output ending in `prev` would change the token stream.
fn needs_space(prev: u8, next: u8) -> bool {
    let ident_ish = |c: u8| c.is_ascii_alphanumeric() || c == b'_' || !c.is_ascii();
    (ident_ish(prev) && ident_ish(next))
        // `1` then `.5` must not become `1.5`.
        || (prev.is_ascii_digit() && next == b'.')
        || (prev == b'.' && next.is_ascii_digit())
        // `-` then `-x` must not become `--`.
        || (prev == b'-' && next == b'-')
        || (prev == b'+' && next == b'+')
        // `a &` then `&b` must not become `&&`.
        || (prev == b'&' && next == b'&')
        || (prev == b'|' && next == b'|')
        // `/` then `*p` or a `/`-starting token would open a comment.
        || (prev == b'/' && (next == b'*' || next == b'/'))
        || (prev == b'=' && next == b'=')
        || (prev == b'!' && next == b'=')
}

/// Shortest equivalent spelling of a decimal float literal.
///
/// Purely textual: the digits are never converted through a binary float.
fn compact_float(text: &str, suffix: Option<FloatSuffix>) -> String {
    let suffix_str = match suffix {
        Some(FloatSuffix::F) => "f",
        Some(FloatSuffix::H) => "h",
        None => "",
    };
    let body = &text[..text.len() - suffix_str.len()];

    let (mantissa, exp) = match body.find(['e', 'E']) {
        Some(pos) => (&body[..pos], body[pos + 1..].trim_start_matches('+').parse::<i64>()
            .unwrap_or(0)),
        None => (body, 0),
    };
    let (int_part, frac_part) = match mantissa.find('.') {
        Some(pos) => (&mantissa[..pos], &mantissa[pos + 1..]),
        None => (mantissa, ""),
    };

    let mut digits: String = format!("{int_part}{frac_part}");
    let mut e10 = exp - frac_part.len() as i64;
    while digits.ends_with('0') {
        digits.pop();
        e10 += 1;
    }
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        // Zero. `0.` is the shortest unsuffixed float spelling.
        return if suffix_str.is_empty() { "0.".into() } else { format!("0{suffix_str}") };
    }

    let plain = render_plain(digits, e10, suffix_str.is_empty());
    let exponent = format!("{digits}e{e10}");
    let shortest = if exponent.len() < plain.len() { exponent } else { plain };
    format!("{shortest}{suffix_str}")
}

fn render_plain(digits: &str, e10: i64, needs_dot: bool) -> String {
    if e10 >= 0 {
        let mut s = String::with_capacity(digits.len() + e10 as usize + 1);
        s.push_str(digits);
        s.extend(std::iter::repeat_n('0', e10 as usize));
        if needs_dot {
            s.push('.');
        }
        return s;
    }
    let point = digits.len() as i64 + e10;
    if point > 0 {
        let (int_part, frac_part) = digits.split_at(point as usize);
        format!("{int_part}.{frac_part}")
    } else {
        let zeros = "0".repeat((-point) as usize);
        format!(".{zeros}{digits}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compact(text: &str) -> String {
        let suffix = match text.as_bytes().last() {
            Some(b'f') => Some(FloatSuffix::F),
            Some(b'h') => Some(FloatSuffix::H),
            _ => None,
        };
        compact_float(text, suffix)
    }

    #[test]
    fn float_compaction() {
        assert_eq!(compact("0.5"), ".5");
        assert_eq!(compact("1.0"), "1.");
        assert_eq!(compact("1000000.0"), "1e6");
        assert_eq!(compact("0.0"), "0.");
        assert_eq!(compact("1.5"), "1.5");
        assert_eq!(compact("2.4e-2"), ".024");
        assert_eq!(compact("1e7"), "1e7");
        assert_eq!(compact("0.00001234"), "1234e-8");
        assert_eq!(compact("1.0e7"), "1e7");
        assert_eq!(compact("100.50"), "100.5");
    }

    #[test]
    fn float_compaction_keeps_suffixes() {
        assert_eq!(compact("1.0f"), "1f");
        assert_eq!(compact("0.5h"), ".5h");
        assert_eq!(compact("0.0f"), "0f");
        assert_eq!(compact("500.0f"), "500f");
    }

    #[test]
    fn spacing() {
        assert!(needs_space(b'a', b'b'));
        assert!(needs_space(b't', b'f'));
        assert!(needs_space(b'1', b'.'));
        assert!(needs_space(b'-', b'-'));
        assert!(needs_space(b'/', b'*'));
        assert!(!needs_space(b')', b'{'));
        assert!(!needs_space(b'>', b'('));
        assert!(!needs_space(b',', b'.'));
        assert!(!needs_space(b'(', b'-'));
    }
}
