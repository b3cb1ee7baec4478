use super::*;
use Base::*;
use RawTokenKind::*;

fn lex(src: &str) -> Vec<(RawTokenKind, u32)> {
    Cursor::new(src).map(|t| (t.kind, t.len)).collect()
}

fn lex_kinds(src: &str) -> Vec<RawTokenKind> {
    Cursor::new(src).map(|t| t.kind).collect()
}

#[track_caller]
fn assert_single_lit(src: &str, kind: RawLiteralKind) {
    assert_eq!(lex(src), [(Literal { kind }, src.len() as u32)], "lexing {src:?}");
}

#[test]
fn smoke() {
    assert_eq!(
        lex("fn main() { return 1; }"),
        [
            (Ident, 2),
            (Whitespace, 1),
            (Ident, 4),
            (OpenParen, 1),
            (CloseParen, 1),
            (Whitespace, 1),
            (OpenBrace, 1),
            (Whitespace, 1),
            (Ident, 6),
            (Whitespace, 1),
            (Literal { kind: RawLiteralKind::Int { base: Decimal, empty_int: false } }, 1),
            (Semi, 1),
            (Whitespace, 1),
            (CloseBrace, 1),
        ]
    );
}

#[test]
fn comments() {
    assert_eq!(lex_kinds("// line\nx"), [LineComment, Whitespace, Ident]);
    assert_eq!(lex_kinds("/* block */x"), [BlockComment { terminated: true }, Ident]);
    // Block comments nest.
    assert_eq!(
        lex_kinds("/* a /* b */ c */x"),
        [BlockComment { terminated: true }, Ident]
    );
    assert_eq!(lex_kinds("/* a /* b */"), [BlockComment { terminated: false }]);
    assert_eq!(lex_kinds("/*/"), [BlockComment { terminated: false }]);
}

#[test]
fn line_comment_to_eof() {
    assert_eq!(lex_kinds("x // no newline"), [Ident, Whitespace, LineComment]);
}

#[test]
fn integers() {
    assert_single_lit("0", RawLiteralKind::Int { base: Decimal, empty_int: false });
    assert_single_lit("123", RawLiteralKind::Int { base: Decimal, empty_int: false });
    assert_single_lit("123i", RawLiteralKind::Int { base: Decimal, empty_int: false });
    assert_single_lit("4u", RawLiteralKind::Int { base: Decimal, empty_int: false });
    assert_single_lit("0x7fu", RawLiteralKind::Int { base: Hexadecimal, empty_int: false });
    assert_single_lit("0XABC", RawLiteralKind::Int { base: Hexadecimal, empty_int: false });
    assert_eq!(
        lex("0x"),
        [(Literal { kind: RawLiteralKind::Int { base: Hexadecimal, empty_int: true } }, 2)]
    );
}

#[test]
fn floats() {
    for src in ["1.5", "0.", ".5", "1f", "1h", "2.4e-2", "1E5", ".5e3f", "1."] {
        assert_single_lit(src, RawLiteralKind::Float { base: Decimal });
    }
    for src in ["0x1p4", "0x1.8p-2", "0x.8p1", "0x1.8"] {
        assert_single_lit(src, RawLiteralKind::Float { base: Hexadecimal });
    }
}

#[test]
fn number_boundaries() {
    // `1.xxx` is an integer followed by member access.
    assert_eq!(
        lex_kinds("1.x"),
        [
            Literal { kind: RawLiteralKind::Int { base: Decimal, empty_int: false } },
            Dot,
            Ident
        ]
    );
    // `1e` is an integer followed by an identifier.
    assert_eq!(
        lex_kinds("1e"),
        [Literal { kind: RawLiteralKind::Int { base: Decimal, empty_int: false } }, Ident]
    );
    // A suffix letter glued to more identifier characters is not a suffix.
    assert_eq!(
        lex_kinds("1fx"),
        [Literal { kind: RawLiteralKind::Int { base: Decimal, empty_int: false } }, Ident]
    );
}

#[test]
fn operators_maximal_munch() {
    assert_eq!(lex_kinds("<<= << <= <"), [ShlEq, Whitespace, Shl, Whitespace, Le, Whitespace, Lt]);
    assert_eq!(lex_kinds(">>= >> >= >"), [ShrEq, Whitespace, Shr, Whitespace, Ge, Whitespace, Gt]);
    assert_eq!(lex_kinds("->-"), [Arrow, Minus]);
    assert_eq!(lex_kinds("--x"), [MinusMinus, Ident]);
    assert_eq!(lex_kinds("&&&"), [AndAnd, And]);
    assert_eq!(lex_kinds("a|=b"), [Ident, OrEq, Ident]);
    assert_eq!(lex_kinds("!=!"), [BangEq, Bang]);
}

#[test]
fn unicode_identifiers() {
    assert_eq!(lex("Δt"), [(Ident, 3)]);
    assert_eq!(lex("été"), [(Ident, 5)]);
    // Not XID_Start: emoji are unknown tokens.
    assert_eq!(lex_kinds("🦀"), [Unknown]);
}

#[test]
fn underscores() {
    // The cursor does not distinguish `_` or `__x`; the lexer does.
    assert_eq!(lex("_"), [(Ident, 1)]);
    assert_eq!(lex("__x"), [(Ident, 3)]);
    assert_eq!(lex("_x"), [(Ident, 2)]);
}

#[test]
fn ident_classification() {
    assert!(is_ident("foo"));
    assert!(is_ident("_foo"));
    assert!(is_ident("Δt"));
    assert!(!is_ident("_"));
    assert!(!is_ident("__foo"));
    assert!(!is_ident("1foo"));
    assert!(!is_ident(""));
}
