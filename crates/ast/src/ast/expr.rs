use super::{Ident, IdentRef, Type};
use std::fmt;
use wgslmin_interface::Span;

/// An expression.
#[derive(Clone, Debug)]
pub struct Expr {
    pub span: Span,
    pub kind: ExprKind,
}

impl Expr {
    /// Returns the expression with any wrapping parentheses removed.
    pub fn peel_parens(&self) -> &Self {
        let mut expr = self;
        while let ExprKind::Paren(inner) = &expr.kind {
            expr = inner;
        }
        expr
    }
}

/// An expression kind.
#[derive(Clone)]
pub enum ExprKind {
    /// A literal: `1.0`, `42u`, `true`.
    Lit(Lit),
    /// A reference to a declared or predeclared name.
    Ident(IdentRef),
    /// A unary operation: `-x`, `!x`, `&x`, `*x`.
    Unary(UnOp, Box<Expr>),
    /// A binary operation: `a + b`.
    Binary(BinOp, Box<Expr>, Box<Expr>),
    /// A parenthesized expression: `(a + b)`.
    ///
    /// Kept as a node so the printer reproduces grouping without having to
    /// reason about precedence.
    Paren(Box<Expr>),
    /// An index operation: `a[i]`.
    Index(Box<Expr>, Box<Expr>),
    /// A member access or swizzle: `a.b`, `v.xyz`.
    ///
    /// Field names are accessed by lexeme in WGSL and are never renamed, so
    /// no symbol reference is recorded here.
    Member(Box<Expr>, Ident),
    /// A function call or type constructor.
    Call(CallExpr),
}

impl fmt::Debug for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ExprKind::")?;
        match self {
            Self::Lit(e) => e.fmt(f),
            Self::Ident(e) => e.fmt(f),
            Self::Unary(op, e) => write!(f, "Unary({op:?}, {e:?})"),
            Self::Binary(op, l, r) => write!(f, "Binary({op:?}, {l:?}, {r:?})"),
            Self::Paren(e) => write!(f, "Paren({e:?})"),
            Self::Index(e, i) => write!(f, "Index({e:?}, {i:?})"),
            Self::Member(e, m) => write!(f, "Member({e:?}, {m})"),
            Self::Call(e) => e.fmt(f),
        }
    }
}

/// A function call or type constructor expression.
#[derive(Clone, Debug)]
pub struct CallExpr {
    pub callee: Callee,
    pub args: Vec<Expr>,
}

/// The callee of a call expression.
#[derive(Clone, Debug)]
pub enum Callee {
    /// A plain name: a function, or an untemplated type like `f32(x)`.
    Ident(IdentRef),
    /// A templated type constructor: `vec3<f32>(...)`, `array<f32, 4>(...)`.
    Type(Type),
}

/// A literal value. Carries the original lexeme; the minifier rewrites
/// literals purely textually.
#[derive(Clone, Debug)]
pub struct Lit {
    pub kind: LitKind,
    /// The lexeme as written, including base prefix and suffix.
    pub text: String,
}

/// A literal kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LitKind {
    Bool(bool),
    Int { hex: bool, suffix: Option<IntSuffix> },
    Float { hex: bool, suffix: Option<FloatSuffix> },
}

/// An integer literal suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntSuffix {
    /// `i`
    I,
    /// `u`
    U,
}

/// A float literal suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloatSuffix {
    /// `f`
    F,
    /// `h`
    H,
}

/// A unary operator.
#[derive(Clone, Copy, Debug)]
pub struct UnOp {
    pub span: Span,
    pub kind: UnOpKind,
}

/// A unary operator kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnOpKind {
    /// `-`
    Neg,
    /// `!`
    Not,
    /// `~`
    BitNot,
    /// `*`
    Deref,
    /// `&`
    AddrOf,
}

impl UnOpKind {
    /// Returns the string representation of the operator.
    pub const fn to_str(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "!",
            Self::BitNot => "~",
            Self::Deref => "*",
            Self::AddrOf => "&",
        }
    }
}

/// A binary operator.
#[derive(Clone, Copy, Debug)]
pub struct BinOp {
    pub span: Span,
    pub kind: BinOpKind,
}

/// A binary operator kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum BinOpKind {
    /// `||`
    Or,
    /// `&&`
    And,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Le,
    /// `>=`
    Ge,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
    /// `&`
    BitAnd,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
}

impl BinOpKind {
    /// Returns the string representation of the operator.
    pub const fn to_str(self) -> &'static str {
        match self {
            Self::Or => "||",
            Self::And => "&&",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::BitAnd => "&",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
        }
    }
}
