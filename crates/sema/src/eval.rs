//! Minimal constant evaluation for attribute arguments and array sizes.
//!
//! The minifier is not a compiler: expressions are never transformed. But
//! `@group`, `@binding`, `@workgroup_size`, `@size`, `@align`, and array
//! element counts must be read as numbers for reflection and layout, so
//! integer literals and one level of module-scope `const` indirection are
//! folded here.

use rustc_hash::FxHashMap;
use wgslmin_ast::SymbolId;
use wgslmin_ast::ast::{Expr, ExprKind, Item, ItemKind, LitKind};

/// Collects the values of module-scope `const` declarations with integer
/// literal initializers.
pub(crate) fn collect_const_values(items: &[Item]) -> FxHashMap<SymbolId, u32> {
    let mut values = FxHashMap::default();
    for item in items {
        if let ItemKind::Const(c) = &item.kind
            && let Some(value) = literal_u32(&c.init)
        {
            values.insert(c.symbol, value);
        }
    }
    values
}

/// Evaluates an attribute argument or array size to a `u32`: an integer
/// literal, or a reference to a module-scope constant with one.
pub(crate) fn const_u32(expr: &Expr, consts: &FxHashMap<SymbolId, u32>) -> Option<u32> {
    match &expr.peel_parens().kind {
        ExprKind::Lit(_) => literal_u32(expr),
        ExprKind::Ident(r) => consts.get(&r.reference?).copied(),
        _ => None,
    }
}

/// Evaluates an integer literal expression.
pub(crate) fn literal_u32(expr: &Expr) -> Option<u32> {
    let ExprKind::Lit(lit) = &expr.peel_parens().kind else { return None };
    let LitKind::Int { hex, .. } = lit.kind else { return None };
    let digits = lit.text.trim_end_matches(['i', 'u']);
    if hex {
        u32::from_str_radix(digits.get(2..)?, 16).ok()
    } else {
        digits.parse().ok()
    }
}
