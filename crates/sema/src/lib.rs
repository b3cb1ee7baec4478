//! WGSL semantic passes: name resolution, liveness, memory layout, renaming,
//! and reflection.
//!
//! All passes operate on the [`Module`](wgslmin_ast::ast::Module) built by
//! `wgslmin-parse`. The bind pass is the only one that mutates the AST
//! (filling in symbol references and use counts); liveness only flips symbol
//! flags; everything after that is read-only.

#[macro_use]
extern crate tracing;

mod builtins;
pub use builtins::is_predeclared;

mod eval;

mod layout;
pub use layout::{Layout, LayoutComputer, MemberLayout, StructLayout, round_up, type_to_string};

mod liveness;
pub use liveness::mark_live;

mod reflect;
pub use reflect::{ArrayInfo, BindingInfo, EntryPointInfo, ReflectInfo, reflect_module};

mod rename;
pub use rename::{RenameMap, assign_names};

mod resolve;
pub use resolve::bind;
