//! WGSL lexer.

use std::str::FromStr;
use wgslmin_ast::token::{Keyword, Token, TokenKind, TokenLit, TokenLitKind};
use wgslmin_ast::{BinOpToken, is_reserved};
use wgslmin_interface::{BytePos, Session, Span, diagnostics::DiagCtxt};

mod cursor;
use cursor::token::{Base, RawLiteralKind, RawToken, RawTokenKind};
pub use cursor::*;

/// WGSL lexer.
///
/// Converts a [`Cursor`]'s output from simple [`RawTokenKind`]s into rich
/// [`TokenKind`]s, classifying keywords, reserved words, and literals.
///
/// A lexical error stops token production: the diagnostic is recorded and
/// everything past the faulty position is dropped.
pub struct Lexer<'sess> {
    /// Cursor over the source.
    cursor: Cursor<'sess>,
    /// The absolute offset of the current token.
    pos: BytePos,
    /// The parsing context.
    pub(crate) sess: &'sess Session,
    /// Source text to tokenize.
    src: &'sess str,
}

impl<'sess> Lexer<'sess> {
    /// Creates a new `Lexer` for the session's source file.
    pub fn new(sess: &'sess Session) -> Self {
        let src = sess.file.src.as_str();
        Self { cursor: Cursor::new(src), pos: BytePos(0), sess, src }
    }

    /// Returns a reference to the diagnostic context.
    #[inline]
    pub fn dcx(&self) -> &'sess DiagCtxt {
        &self.sess.dcx
    }

    /// Consumes the lexer and collects the remaining tokens into a vector.
    ///
    /// Comments and whitespace are never part of the output. Production
    /// stops at the first lexical error.
    #[instrument(name = "lex", level = "debug", skip_all)]
    pub fn into_tokens(mut self) -> Vec<Token> {
        // An estimate of the number of tokens in the source.
        let mut tokens = Vec::with_capacity(self.src.len() / 4);
        loop {
            let token = self.next_token();
            if token.is_eof() {
                break;
            }
            tokens.push(token);
        }
        trace!(src.len = self.src.len(), tokens.len = tokens.len(), "lexed");
        tokens
    }

    /// Returns the next token, advancing the lexer.
    ///
    /// Returns EOF at the end of input and after any lexical error.
    pub fn next_token(&mut self) -> Token {
        loop {
            let RawToken { kind: raw_kind, len } = self.cursor.advance_token();
            let start = self.pos;
            self.pos += len;
            let span = Span::new(start, self.pos);

            let kind = match raw_kind {
                RawTokenKind::Whitespace | RawTokenKind::LineComment => continue,
                RawTokenKind::BlockComment { terminated } => {
                    if !terminated {
                        self.dcx().err("unterminated block comment").span(span).emit();
                        TokenKind::Eof
                    } else {
                        continue;
                    }
                }

                RawTokenKind::Ident => self.cook_ident(span),
                RawTokenKind::Literal { kind } => self.cook_literal(span, kind),

                RawTokenKind::Semi => TokenKind::Semi,
                RawTokenKind::Comma => TokenKind::Comma,
                RawTokenKind::Dot => TokenKind::Dot,
                RawTokenKind::At => TokenKind::At,
                RawTokenKind::Colon => TokenKind::Colon,
                RawTokenKind::OpenParen => TokenKind::OpenParen,
                RawTokenKind::CloseParen => TokenKind::CloseParen,
                RawTokenKind::OpenBrace => TokenKind::OpenBrace,
                RawTokenKind::CloseBrace => TokenKind::CloseBrace,
                RawTokenKind::OpenBracket => TokenKind::OpenBracket,
                RawTokenKind::CloseBracket => TokenKind::CloseBracket,
                RawTokenKind::Tilde => TokenKind::Tilde,
                RawTokenKind::Bang => TokenKind::Not,
                RawTokenKind::BangEq => TokenKind::Ne,
                RawTokenKind::Eq => TokenKind::Eq,
                RawTokenKind::EqEq => TokenKind::EqEq,
                RawTokenKind::Lt => TokenKind::Lt,
                RawTokenKind::Le => TokenKind::Le,
                RawTokenKind::Shl => TokenKind::BinOp(BinOpToken::Shl),
                RawTokenKind::ShlEq => TokenKind::BinOpEq(BinOpToken::Shl),
                RawTokenKind::Gt => TokenKind::Gt,
                RawTokenKind::Ge => TokenKind::Ge,
                RawTokenKind::Shr => TokenKind::BinOp(BinOpToken::Shr),
                RawTokenKind::ShrEq => TokenKind::BinOpEq(BinOpToken::Shr),
                RawTokenKind::Plus => TokenKind::BinOp(BinOpToken::Plus),
                RawTokenKind::PlusPlus => TokenKind::PlusPlus,
                RawTokenKind::PlusEq => TokenKind::BinOpEq(BinOpToken::Plus),
                RawTokenKind::Minus => TokenKind::BinOp(BinOpToken::Minus),
                RawTokenKind::MinusMinus => TokenKind::MinusMinus,
                RawTokenKind::MinusEq => TokenKind::BinOpEq(BinOpToken::Minus),
                RawTokenKind::Arrow => TokenKind::Arrow,
                RawTokenKind::Star => TokenKind::BinOp(BinOpToken::Star),
                RawTokenKind::StarEq => TokenKind::BinOpEq(BinOpToken::Star),
                RawTokenKind::Slash => TokenKind::BinOp(BinOpToken::Slash),
                RawTokenKind::SlashEq => TokenKind::BinOpEq(BinOpToken::Slash),
                RawTokenKind::Percent => TokenKind::BinOp(BinOpToken::Percent),
                RawTokenKind::PercentEq => TokenKind::BinOpEq(BinOpToken::Percent),
                RawTokenKind::Caret => TokenKind::BinOp(BinOpToken::Caret),
                RawTokenKind::CaretEq => TokenKind::BinOpEq(BinOpToken::Caret),
                RawTokenKind::And => TokenKind::BinOp(BinOpToken::And),
                RawTokenKind::AndAnd => TokenKind::AndAnd,
                RawTokenKind::AndEq => TokenKind::BinOpEq(BinOpToken::And),
                RawTokenKind::Or => TokenKind::BinOp(BinOpToken::Or),
                RawTokenKind::OrOr => TokenKind::OrOr,
                RawTokenKind::OrEq => TokenKind::BinOpEq(BinOpToken::Or),

                RawTokenKind::Unknown => {
                    let c = self.src[span.to_range()].chars().next().unwrap_or('\u{FFFD}');
                    self.dcx()
                        .err(format!("unexpected character {c:?}"))
                        .span(span)
                        .emit();
                    TokenKind::Eof
                }

                RawTokenKind::Eof => TokenKind::Eof,
            };
            return Token::new(kind, span);
        }
    }

    fn cook_ident(&self, span: Span) -> TokenKind {
        let text = &self.src[span.to_range()];
        if text == "_" {
            return TokenKind::Underscore;
        }
        if text.starts_with("__") {
            self.dcx()
                .err(format!("`{text}`: identifiers must not start with `__`"))
                .span(span)
                .emit();
            return TokenKind::Eof;
        }
        if let Ok(kw) = Keyword::from_str(text) {
            return TokenKind::Keyword(kw);
        }
        if is_reserved(text) {
            self.dcx()
                .err(format!("`{text}` is a reserved word and cannot be used"))
                .span(span)
                .emit();
            return TokenKind::Eof;
        }
        TokenKind::Ident(text.to_string())
    }

    fn cook_literal(&self, span: Span, kind: RawLiteralKind) -> TokenKind {
        let text = &self.src[span.to_range()];
        let kind = match kind {
            RawLiteralKind::Int { base, empty_int } => {
                if empty_int {
                    self.dcx()
                        .err("hexadecimal literal has no digits")
                        .span(span)
                        .emit();
                    return TokenKind::Eof;
                }
                TokenLitKind::Int { hex: base == Base::Hexadecimal }
            }
            RawLiteralKind::Float { base } => {
                TokenLitKind::Float { hex: base == Base::Hexadecimal }
            }
        };
        TokenKind::Literal(TokenLit::new(kind, text.to_string()))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.is_eof() { None } else { Some(token) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &str) -> (Session, Vec<Token>) {
        let sess = Session::new("test.wgsl", src);
        let tokens = {
            let lexer = Lexer::new(&sess);
            lexer.into_tokens()
        };
        (sess, tokens)
    }

    fn kinds(src: &str) -> Vec<TokenKind> {
        lex(src).1.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn keywords_and_idents() {
        assert_eq!(
            kinds("fn foo"),
            [TokenKind::Keyword(Keyword::Fn), TokenKind::Ident("foo".into())]
        );
        assert_eq!(kinds("_"), [TokenKind::Underscore]);
        assert_eq!(kinds("_x"), [TokenKind::Ident("_x".into())]);
    }

    #[test]
    fn reserved_word_is_an_error() {
        let (sess, tokens) = lex("var typedef");
        assert_eq!(tokens.len(), 1);
        assert!(sess.dcx.has_errors().is_err());
    }

    #[test]
    fn double_underscore_is_an_error() {
        let (sess, tokens) = lex("let __x = 1;");
        assert_eq!(tokens.len(), 1);
        assert!(sess.dcx.has_errors().is_err());
    }

    #[test]
    fn stops_after_error() {
        let (sess, tokens) = lex("a ` b c");
        assert_eq!(tokens.len(), 1);
        assert!(sess.dcx.has_errors().is_err());
    }

    #[test]
    fn literal_classification() {
        let TokenKind::Literal(lit) = &kinds("1.5f")[0] else { panic!() };
        assert_eq!(lit.kind, TokenLitKind::Float { hex: false });
        assert_eq!(lit.text, "1.5f");

        let TokenKind::Literal(lit) = &kinds("0x10u")[0] else { panic!() };
        assert_eq!(lit.kind, TokenLitKind::Int { hex: true });
    }

    #[test]
    fn spans_are_byte_ranges() {
        let (_, tokens) = lex("let x");
        assert_eq!(tokens[0].span.to_range(), 0..3);
        assert_eq!(tokens[1].span.to_range(), 4..5);
    }
}
