//! The renamer: assigns minified names to live, non-pinned symbols.
//!
//! Frequency-first assignment: symbols are ordered by descending use count
//! (ties broken by declaration position) and drawn from the minimal-length
//! alphabet `a..z, A..Z, aa, ab, ...`, skipping keywords, reserved words,
//! and any name a pinned symbol keeps. Name assignment draws from one
//! global sequence, so output is stable across runs.

use itertools::Itertools;
use rustc_hash::{FxHashMap, FxHashSet};
use wgslmin_ast::ast::*;
use wgslmin_ast::visit::Visitor;
use wgslmin_ast::{
    AddressSpace, SymbolFlags, SymbolId, SymbolTable, is_keyword, is_reserved,
};
use wgslmin_config::MinifyOptions;
use wgslmin_interface::BytePos;

/// The renamer's output: the new name for every renamed symbol.
#[derive(Debug, Default)]
pub struct RenameMap {
    assigned: FxHashMap<SymbolId, String>,
    /// External bindings that keep their declared name but whose uses go
    /// through a short `let` alias inside the one function that uses them.
    aliased: FxHashSet<SymbolId>,
}

impl RenameMap {
    /// Returns the name to emit for a symbol at a use site.
    pub fn name_of<'s>(&'s self, id: SymbolId, symbols: &'s SymbolTable) -> &'s str {
        self.assigned.get(&id).map_or(symbols[id].name.as_str(), String::as_str)
    }

    /// Returns the assigned short name, if the symbol was renamed.
    pub fn assigned(&self, id: SymbolId) -> Option<&str> {
        self.assigned.get(&id).map(String::as_str)
    }

    /// Returns `true` if the symbol is an alias-preserved external binding:
    /// its declaration keeps the original name and [`Self::assigned`] is
    /// the alias.
    pub fn is_aliased(&self, id: SymbolId) -> bool {
        self.aliased.contains(&id)
    }
}

/// Assigns minified names.
#[instrument(name = "rename", level = "debug", skip_all)]
pub fn assign_names(module: &Module, options: &MinifyOptions) -> RenameMap {
    if !options.minify_identifiers {
        return RenameMap::default();
    }

    // Struct types of uniform/storage variables, pinned on request.
    let mut pinned_structs = FxHashSet::default();
    if options.preserve_uniform_struct_types {
        for item in &module.items {
            if let ItemKind::Var(decl) = &item.kind
                && matches!(
                    module.symbols[decl.symbol].address_space,
                    Some(AddressSpace::Uniform | AddressSpace::Storage)
                )
                && let Some(TyKind::Named(r)) = decl.ty.as_ref().map(|ty| &ty.kind)
                && let Some(id) = r.reference
            {
                pinned_structs.insert(id);
            }
        }
    }

    // Names that stay in the output verbatim; fresh names must avoid them.
    // Only declarations that actually appear in the output count: taking
    // the name of a tree-shaken declaration would change the assignment on
    // a second run.
    let emitted = emitted_symbols(module, options.tree_shaking);
    let mut taken: FxHashSet<&str> = options.keep_names.iter().map(String::as_str).collect();
    let mut preserved_bindings = FxHashSet::default();
    let mut candidates: Vec<(SymbolId, BytePos)> = Vec::new();

    for (id, symbol) in module.symbols.iter_enumerated() {
        // Dead or unused symbols keep their original name (rule 1), as do
        // pinned symbols of every kind (rules 2, 3, and 5).
        let keeps_name = !symbol.is(SymbolFlags::LIVE)
            || symbol.uses == 0
            || symbol.keeps_original_name()
            || options.keep_names.iter().any(|n| n == &symbol.name)
            || pinned_structs.contains(&id);
        if keeps_name {
            if emitted.contains(&id) {
                taken.insert(&symbol.name);
            }
            continue;
        }
        if symbol.is(SymbolFlags::EXTERNAL_BINDING) && !options.mangle_external_bindings {
            taken.insert(&symbol.name);
            preserved_bindings.insert(id);
            continue;
        }
        candidates.push((id, symbol.span.lo()));
    }

    // Preserved bindings that qualify for a `let` alias join the candidate
    // pool under the position the alias statement will occupy, so that
    // re-minifying the output reproduces the same assignment.
    let aliased = alias_set(module, &preserved_bindings);
    let mut alias_candidates: Vec<_> = aliased.iter().map(|(&id, &pos)| (id, pos)).collect();
    alias_candidates.sort_by_key(|&(id, _)| id);
    candidates.extend(alias_candidates);

    // Highest use count first; position breaks ties so output is diff-able
    // across runs.
    let candidates = candidates
        .into_iter()
        .sorted_by_key(|&(id, pos)| (std::cmp::Reverse(module.symbols[id].uses), pos))
        .collect::<Vec<_>>();

    let mut generator = NameGenerator::default();
    let mut assigned = FxHashMap::default();
    for (id, _) in candidates {
        let name = loop {
            let name = generator.next_name();
            if !is_keyword(&name) && !is_reserved(&name) && !taken.contains(name.as_str()) {
                break name;
            }
        };
        assigned.insert(id, name);
    }
    debug!(renamed = assigned.len(), aliased = aliased.len(), "assigned");
    RenameMap { assigned, aliased: aliased.into_keys().collect() }
}

/// Decides which preserved bindings get a `let` alias, and where.
///
/// A binding qualifies only when all of its uses sit in a single function,
/// at least two of them: the alias then provably shortens the output, and
/// minification stays a fixed point. (After one pass, the alias statement
/// is the binding's only use, so no second alias is ever introduced; a
/// binding spread over several functions would re-qualify on the next run
/// and the output would never converge.)
///
/// Only `uniform` buffers are value-aliasable with `let`; handle types and
/// storage buffers keep their name at every use.
fn alias_set(
    module: &Module,
    preserved: &FxHashSet<SymbolId>,
) -> FxHashMap<SymbolId, BytePos> {
    let mut uses_per_function: FxHashMap<SymbolId, Vec<(u32, BytePos)>> = FxHashMap::default();
    for item in &module.items {
        let ItemKind::Function(decl) = &item.kind else { continue };
        let mut counter = UseCounter { of: preserved, counts: FxHashMap::default() };
        for stmt in &decl.body.stmts {
            counter.visit_stmt(stmt);
        }
        for (id, count) in counter.counts {
            uses_per_function.entry(id).or_default().push((count, decl.body.span.lo()));
        }
    }

    let mut aliased = FxHashMap::default();
    for &id in preserved {
        let symbol = &module.symbols[id];
        if symbol.address_space != Some(AddressSpace::Uniform) {
            continue;
        }
        if let Some([(count, body)]) = uses_per_function.get(&id).map(Vec::as_slice)
            && *count == symbol.uses
            && *count >= 2
        {
            aliased.insert(id, *body);
        }
    }
    aliased
}

/// Collects the symbols whose declarations appear in the output: every
/// declaration of every kept top-level item, plus directive names.
fn emitted_symbols(module: &Module, tree_shaking: bool) -> FxHashSet<SymbolId> {
    let mut emitted = FxHashSet::default();
    for directive in &module.directives {
        match &directive.kind {
            DirectiveKind::Enable(names) | DirectiveKind::Requires(names) => {
                emitted.extend(names.iter().map(|n| n.symbol));
            }
            DirectiveKind::Diagnostic { .. } => {}
        }
    }
    for item in &module.items {
        let kept = !tree_shaking
            || item.symbol().is_none_or(|id| module.symbols[id].is(SymbolFlags::LIVE));
        if kept {
            declared_in_item(item, &mut emitted);
        }
    }
    emitted
}

fn declared_in_item(item: &Item, out: &mut FxHashSet<SymbolId>) {
    match &item.kind {
        ItemKind::Var(decl) => {
            out.insert(decl.symbol);
        }
        ItemKind::Const(decl) => {
            out.insert(decl.symbol);
        }
        ItemKind::Override(decl) => {
            out.insert(decl.symbol);
        }
        ItemKind::Alias(decl) => {
            out.insert(decl.symbol);
        }
        ItemKind::Struct(decl) => {
            out.insert(decl.symbol);
            out.extend(decl.members.iter().map(|m| m.symbol));
        }
        ItemKind::Function(decl) => {
            out.insert(decl.symbol);
            out.extend(decl.params.iter().map(|p| p.symbol));
            declared_in_block(&decl.body, out);
        }
        ItemKind::ConstAssert(_) => {}
    }
}

fn declared_in_block(block: &Block, out: &mut FxHashSet<SymbolId>) {
    for stmt in &block.stmts {
        declared_in_stmt(stmt, out);
    }
}

fn declared_in_stmt(stmt: &Stmt, out: &mut FxHashSet<SymbolId>) {
    match &stmt.kind {
        StmtKind::Var(decl) => {
            out.insert(decl.symbol);
        }
        StmtKind::Let(decl) => {
            out.insert(decl.symbol);
        }
        StmtKind::Const(decl) => {
            out.insert(decl.symbol);
        }
        StmtKind::Block(block) => declared_in_block(block, out),
        StmtKind::If(s) => {
            declared_in_block(&s.then_block, out);
            let mut else_branch = s.else_branch.as_deref();
            while let Some(branch) = else_branch {
                match branch {
                    ElseBranch::If(elif) => {
                        declared_in_block(&elif.then_block, out);
                        else_branch = elif.else_branch.as_deref();
                    }
                    ElseBranch::Block(block) => {
                        declared_in_block(block, out);
                        break;
                    }
                }
            }
        }
        StmtKind::Switch(s) => {
            for case in &s.cases {
                declared_in_block(&case.body, out);
            }
        }
        StmtKind::For(s) => {
            if let Some(init) = &s.init {
                declared_in_stmt(init, out);
            }
            declared_in_block(&s.body, out);
        }
        StmtKind::While(s) => declared_in_block(&s.body, out),
        StmtKind::Loop(s) => {
            declared_in_block(&s.body, out);
            if let Some(continuing) = &s.continuing {
                declared_in_block(&continuing.body, out);
            }
        }
        StmtKind::Assign(_)
        | StmtKind::Increment(_)
        | StmtKind::Decrement(_)
        | StmtKind::Call(_)
        | StmtKind::Break
        | StmtKind::BreakIf(_)
        | StmtKind::Continue
        | StmtKind::Discard
        | StmtKind::Return(_)
        | StmtKind::ConstAssert(_)
        | StmtKind::Empty => {}
    }
}

/// Counts uses of a fixed symbol set in a subtree.
struct UseCounter<'a> {
    of: &'a FxHashSet<SymbolId>,
    counts: FxHashMap<SymbolId, u32>,
}

impl Visitor for UseCounter<'_> {
    fn visit_ident_ref(&mut self, ident: &IdentRef) {
        if let Some(id) = ident.reference
            && self.of.contains(&id)
        {
            *self.counts.entry(id).or_insert(0) += 1;
        }
    }
}

/// Produces `a, b, ..., z, A, ..., Z, aa, ab, ...` in order.
#[derive(Default)]
struct NameGenerator {
    next: usize,
}

impl NameGenerator {
    fn next_name(&mut self) -> String {
        let name = nth_name(self.next);
        self.next += 1;
        name
    }
}

/// Bijective base-52 rendering of `n`.
fn nth_name(mut n: usize) -> String {
    const ALPHABET: &[u8; 52] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let mut buf = Vec::with_capacity(2);
    loop {
        buf.push(ALPHABET[n % 52]);
        if n < 52 {
            break;
        }
        n = n / 52 - 1;
    }
    buf.reverse();
    String::from_utf8(buf).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_sequence() {
        assert_eq!(nth_name(0), "a");
        assert_eq!(nth_name(25), "z");
        assert_eq!(nth_name(26), "A");
        assert_eq!(nth_name(51), "Z");
        assert_eq!(nth_name(52), "aa");
        assert_eq!(nth_name(53), "ab");
        assert_eq!(nth_name(52 + 52), "ba");
        assert_eq!(nth_name(52 + 52 * 52), "aaa");
    }

    #[test]
    fn generated_names_are_never_placeholders() {
        let mut generator = NameGenerator::default();
        for _ in 0..4000 {
            let name = generator.next_name();
            assert!(!name.starts_with("__") && name != "_");
        }
    }
}
