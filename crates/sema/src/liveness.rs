//! Liveness analysis (tree shaking).
//!
//! Marks [`SymbolFlags::LIVE`] on every symbol reachable from an entry
//! point through the cross-declaration dependency graph. The printer later
//! omits top-level declarations whose symbol is not live.

use rustc_hash::FxHashMap;
use wgslmin_ast::ast::{IdentRef, Item, Module};
use wgslmin_ast::visit::Visitor;
use wgslmin_ast::{SymbolFlags, SymbolId};

/// Collects every resolved symbol reference in a subtree.
#[derive(Default)]
struct RefCollector {
    refs: Vec<SymbolId>,
}

impl Visitor for RefCollector {
    fn visit_ident_ref(&mut self, ident: &IdentRef) {
        // Unresolved references are pinned names and contribute nothing.
        if let Some(id) = ident.reference {
            self.refs.push(id);
        }
    }
}

fn collect_refs(item: &Item) -> Vec<SymbolId> {
    let mut collector = RefCollector::default();
    collector.visit_item(item);
    collector.refs
}

/// Marks live symbols.
///
/// A module with no entry points cannot be traced, so everything is
/// conservatively kept. `const_assert` declarations are always live, and so
/// is everything they mention.
#[instrument(name = "liveness", level = "debug", skip_all)]
pub fn mark_live(module: &mut Module) {
    let mut deps: FxHashMap<SymbolId, Vec<SymbolId>> = FxHashMap::default();
    let mut worklist = Vec::new();
    let mut has_entry_point = false;

    for item in &module.items {
        let refs = collect_refs(item);
        match item.symbol() {
            Some(symbol) => {
                if module.symbols[symbol].is(SymbolFlags::ENTRY_POINT) {
                    has_entry_point = true;
                    worklist.push(symbol);
                }
                deps.insert(symbol, refs);
            }
            // `const_assert`: always live, and keeps its dependencies.
            None => worklist.extend(refs),
        }
    }

    if !has_entry_point {
        for id in all_ids(module) {
            module.symbols.set_flag(id, SymbolFlags::LIVE);
        }
        debug!(live = module.symbols.len(), "no entry points, keeping everything");
        return;
    }

    let mut live = 0usize;
    while let Some(id) = worklist.pop() {
        if module.symbols[id].is(SymbolFlags::LIVE) {
            continue;
        }
        module.symbols.set_flag(id, SymbolFlags::LIVE);
        live += 1;
        if let Some(refs) = deps.get(&id) {
            worklist.extend_from_slice(refs);
        }
    }
    debug!(live, total = module.symbols.len(), "marked");
}

fn all_ids(module: &Module) -> Vec<SymbolId> {
    module.symbols.iter_enumerated().map(|(id, _)| id).collect()
}
