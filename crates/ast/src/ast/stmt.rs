use super::{ConstAssert, ConstDecl, Expr, LetDecl, VarDecl};
use crate::token::BinOpToken;
use std::fmt;
use wgslmin_interface::Span;

/// A block of statements: `{ ... }`.
#[derive(Debug)]
pub struct Block {
    /// Source location, including the braces.
    pub span: Span,
    pub stmts: Vec<Stmt>,
}

/// A statement.
#[derive(Debug)]
pub struct Stmt {
    pub span: Span,
    pub kind: StmtKind,
}

/// A statement kind.
pub enum StmtKind {
    /// A nested compound statement.
    Block(Block),
    /// `if c { } else if c2 { } else { }`
    If(IfStmt),
    /// `switch e { case 1, 2: { } default: { } }`
    Switch(SwitchStmt),
    /// `for (init; cond; update) { }`
    For(Box<ForStmt>),
    /// `while c { }`
    While(WhileStmt),
    /// `loop { ... continuing { ... } }`
    Loop(LoopStmt),
    /// `a = b`, `a += b`, `_ = b`
    Assign(AssignStmt),
    /// `a++`
    Increment(Expr),
    /// `a--`
    Decrement(Expr),
    /// A function call used as a statement.
    Call(Expr),
    /// `break;`
    Break,
    /// `break if c;` — only valid as the last statement of a `continuing`.
    BreakIf(Expr),
    /// `continue;`
    Continue,
    /// `discard;`
    Discard,
    /// `return e?;`
    Return(Option<Expr>),
    /// A local `var` declaration.
    Var(VarDecl),
    /// A local `let` declaration.
    Let(LetDecl),
    /// A local `const` declaration.
    Const(ConstDecl),
    /// `const_assert e;`
    ConstAssert(ConstAssert),
    /// A lone `;`.
    Empty,
}

impl fmt::Debug for StmtKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StmtKind::")?;
        match self {
            Self::Block(s) => s.fmt(f),
            Self::If(s) => s.fmt(f),
            Self::Switch(s) => s.fmt(f),
            Self::For(s) => s.fmt(f),
            Self::While(s) => s.fmt(f),
            Self::Loop(s) => s.fmt(f),
            Self::Assign(s) => s.fmt(f),
            Self::Increment(s) => write!(f, "Increment({s:?})"),
            Self::Decrement(s) => write!(f, "Decrement({s:?})"),
            Self::Call(s) => write!(f, "Call({s:?})"),
            Self::Break => f.write_str("Break"),
            Self::BreakIf(s) => write!(f, "BreakIf({s:?})"),
            Self::Continue => f.write_str("Continue"),
            Self::Discard => f.write_str("Discard"),
            Self::Return(s) => write!(f, "Return({s:?})"),
            Self::Var(s) => s.fmt(f),
            Self::Let(s) => s.fmt(f),
            Self::Const(s) => s.fmt(f),
            Self::ConstAssert(s) => s.fmt(f),
            Self::Empty => f.write_str("Empty"),
        }
    }
}

/// An `if` statement, with its chained `else if`/`else` branches.
#[derive(Debug)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_block: Block,
    pub else_branch: Option<Box<ElseBranch>>,
}

/// The `else` part of an `if` statement.
#[derive(Debug)]
pub enum ElseBranch {
    /// `else if ...`
    If(IfStmt),
    /// `else { ... }`
    Block(Block),
}

/// A `switch` statement.
#[derive(Debug)]
pub struct SwitchStmt {
    pub selector: Expr,
    pub cases: Vec<SwitchCase>,
}

/// One clause of a `switch` statement.
#[derive(Debug)]
pub struct SwitchCase {
    pub span: Span,
    /// Case selectors. `default` may be mixed with expressions.
    pub selectors: Vec<CaseSelector>,
    pub body: Block,
}

/// A single selector in a `case` clause.
#[derive(Debug)]
pub enum CaseSelector {
    Expr(Expr),
    Default,
}

/// A `for` statement. All three header slots are optional.
#[derive(Debug)]
pub struct ForStmt {
    pub init: Option<Stmt>,
    pub cond: Option<Expr>,
    pub update: Option<Stmt>,
    pub body: Block,
}

/// A `while` statement.
#[derive(Debug)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: Block,
}

/// A `loop` statement.
#[derive(Debug)]
pub struct LoopStmt {
    pub body: Block,
    pub continuing: Option<Continuing>,
}

/// A `continuing` block, with its optional trailing `break if`.
#[derive(Debug)]
pub struct Continuing {
    pub span: Span,
    pub body: Block,
    pub break_if: Option<Expr>,
}

/// An assignment statement.
///
/// `lhs` is `None` for a phony assignment (`_ = e`); `op` is `None` for a
/// simple `=` and the operator of a compound assignment otherwise.
#[derive(Debug)]
pub struct AssignStmt {
    pub lhs: Option<Expr>,
    pub op: Option<BinOpToken>,
    pub rhs: Expr,
}
