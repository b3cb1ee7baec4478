//! Raw, low-level tokens. Created using [`Cursor`](super::Cursor).

/// Numeric literal base.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Base {
    /// No prefix.
    Decimal,
    /// `0x` or `0X` prefix.
    Hexadecimal,
}

/// A raw token.
///
/// It doesn't contain information about data that has been parsed, only the
/// type of the token and its size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawToken {
    /// The kind of token.
    pub kind: RawTokenKind,
    /// The length of the token in bytes.
    pub len: u32,
}

impl RawToken {
    /// The [`Eof`](RawTokenKind::Eof) token with length 0.
    pub const EOF: Self = Self::new(RawTokenKind::Eof, 0);

    /// Creates a new token.
    #[inline]
    pub const fn new(kind: RawTokenKind, len: u32) -> Self {
        Self { kind, len }
    }
}

/// Common lexeme types.
///
/// Operators are produced with maximal munch; the parser's template-list
/// disambiguation splits `>>`, `>=`, and `>>=` back apart when they close
/// template argument lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawTokenKind {
    /// `// comment`
    LineComment,
    /// `/* block comment */`. WGSL block comments nest.
    BlockComment { terminated: bool },
    /// Any whitespace character sequence.
    Whitespace,
    /// `ident`, `var`, `_`, `__reserved`
    ///
    /// At this step, keywords, the placeholder, and ill-formed names are
    /// all considered identifiers; the lexer sorts them out.
    Ident,
    /// `123`, `1.5`, `0x1p-2`, `4u`. See [`RawLiteralKind`].
    Literal { kind: RawLiteralKind },

    /// `;`
    Semi,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `@`
    At,
    /// `:`
    Colon,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `{`
    OpenBrace,
    /// `}`
    CloseBrace,
    /// `[`
    OpenBracket,
    /// `]`
    CloseBracket,
    /// `~`
    Tilde,
    /// `!`
    Bang,
    /// `!=`
    BangEq,
    /// `=`
    Eq,
    /// `==`
    EqEq,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `<<`
    Shl,
    /// `<<=`
    ShlEq,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `>>`
    Shr,
    /// `>>=`
    ShrEq,
    /// `+`
    Plus,
    /// `++`
    PlusPlus,
    /// `+=`
    PlusEq,
    /// `-`
    Minus,
    /// `--`
    MinusMinus,
    /// `-=`
    MinusEq,
    /// `->`
    Arrow,
    /// `*`
    Star,
    /// `*=`
    StarEq,
    /// `/`
    Slash,
    /// `/=`
    SlashEq,
    /// `%`
    Percent,
    /// `%=`
    PercentEq,
    /// `^`
    Caret,
    /// `^=`
    CaretEq,
    /// `&`
    And,
    /// `&&`
    AndAnd,
    /// `&=`
    AndEq,
    /// `|`
    Or,
    /// `||`
    OrOr,
    /// `|=`
    OrEq,

    /// Unknown token, not expected by the lexer.
    Unknown,

    /// End of input.
    Eof,
}

/// The literal types supported by the lexer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawLiteralKind {
    /// `123`, `0x7f`, `12i`, `4u`; `empty_int` flags a bare `0x` prefix.
    Int { base: Base, empty_int: bool },
    /// `1.5`, `.5e-2`, `1f`, `0x1.8p2`. The suffix, if any, is included in
    /// the token.
    Float { base: Base },
}
