//! WGSL AST type definitions: tokens, declarations, statements, expressions,
//! types, the per-module symbol table, and a read-only visitor.
//!
//! All nodes are created during parsing. The bind pass fills in symbol
//! references and use counts, liveness marks symbol flags, and every later
//! pass only reads. The [`ast::Module`] value owns everything and is dropped
//! as a unit.

pub mod ast;
pub use ast::Ident;

mod enums;
pub use enums::{AccessMode, AddressSpace, ShaderStage, VecSize};

mod reserved;
pub use reserved::{is_keyword, is_reserved};

mod symbol;
pub use symbol::{
    Scope, ScopeId, ScopeKind, ScopeTree, Symbol, SymbolFlags, SymbolId, SymbolKind, SymbolTable,
};

pub mod token;
pub use token::{BinOpToken, Keyword, Token, TokenKind, TokenLit, TokenLitKind};

pub mod visit;
pub use visit::Visitor;
