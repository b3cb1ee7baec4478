use super::{ExpectedToken, Parser};
use crate::PResult;
use wgslmin_ast::BinOpToken;
use wgslmin_ast::ast::*;
use wgslmin_ast::token::{Keyword, TokenKind, TokenLit, TokenLitKind};

impl Parser<'_> {
    /// Parses an expression.
    pub(super) fn parse_expr(&mut self) -> PResult<Expr> {
        self.parse_binary_expr(0)
    }

    /// Precedence-climbing binary expression parser. All WGSL binary
    /// operators are left-associative.
    fn parse_binary_expr(&mut self, min_prec: u8) -> PResult<Expr> {
        let mut lhs = self.parse_unary_expr()?;
        while let Some((kind, prec)) = self.current_binop() {
            if prec < min_prec {
                break;
            }
            let op = BinOp { span: self.token.span, kind };
            self.bump();
            let rhs = self.parse_binary_expr(prec + 1)?;
            let span = lhs.span.to(rhs.span);
            lhs = Expr { span, kind: ExprKind::Binary(op, Box::new(lhs), Box::new(rhs)) };
        }
        Ok(lhs)
    }

    fn current_binop(&self) -> Option<(BinOpKind, u8)> {
        use BinOpKind::*;
        Some(match &self.token.kind {
            TokenKind::OrOr => (Or, 1),
            TokenKind::AndAnd => (And, 2),
            TokenKind::BinOp(BinOpToken::Or) => (BitOr, 3),
            TokenKind::BinOp(BinOpToken::Caret) => (BitXor, 4),
            TokenKind::BinOp(BinOpToken::And) => (BitAnd, 5),
            TokenKind::EqEq => (Eq, 6),
            TokenKind::Ne => (Ne, 6),
            TokenKind::Lt => (Lt, 7),
            TokenKind::Gt => (Gt, 7),
            TokenKind::Le => (Le, 7),
            TokenKind::Ge => (Ge, 7),
            TokenKind::BinOp(BinOpToken::Shl) => (Shl, 8),
            TokenKind::BinOp(BinOpToken::Shr) => (Shr, 8),
            TokenKind::BinOp(BinOpToken::Plus) => (Add, 9),
            TokenKind::BinOp(BinOpToken::Minus) => (Sub, 9),
            TokenKind::BinOp(BinOpToken::Star) => (Mul, 10),
            TokenKind::BinOp(BinOpToken::Slash) => (Div, 10),
            TokenKind::BinOp(BinOpToken::Percent) => (Rem, 10),
            _ => return None,
        })
    }

    /// Parses a unary expression. Also the entry point for assignment
    /// left-hand sides, which are `*`/`&`-prefixed postfix chains.
    pub(super) fn parse_unary_expr(&mut self) -> PResult<Expr> {
        let lo = self.token.span;
        let op_kind = match &self.token.kind {
            TokenKind::BinOp(BinOpToken::Minus) => Some(UnOpKind::Neg),
            TokenKind::Not => Some(UnOpKind::Not),
            TokenKind::Tilde => Some(UnOpKind::BitNot),
            TokenKind::BinOp(BinOpToken::Star) => Some(UnOpKind::Deref),
            TokenKind::BinOp(BinOpToken::And) => Some(UnOpKind::AddrOf),
            _ => None,
        };
        if let Some(kind) = op_kind {
            let op = UnOp { span: lo, kind };
            self.bump();
            let operand = self.parse_unary_expr()?;
            let span = lo.to(operand.span);
            return Ok(Expr { span, kind: ExprKind::Unary(op, Box::new(operand)) });
        }
        let primary = self.parse_primary_expr()?;
        self.parse_postfix_expr(primary)
    }

    fn parse_postfix_expr(&mut self, mut expr: Expr) -> PResult<Expr> {
        loop {
            match &self.token.kind {
                TokenKind::OpenBracket => {
                    self.bump();
                    let index = self.parse_expr()?;
                    self.expect(TokenKind::CloseBracket)?;
                    let span = expr.span.to(self.prev_token.span);
                    expr = Expr {
                        span,
                        kind: ExprKind::Index(Box::new(expr), Box::new(index)),
                    };
                }
                TokenKind::Dot => {
                    self.bump();
                    let member = self.parse_ident()?;
                    let span = expr.span.to(member.span);
                    expr = Expr { span, kind: ExprKind::Member(Box::new(expr), member) };
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_primary_expr(&mut self) -> PResult<Expr> {
        let lo = self.token.span;
        match &self.token.kind {
            TokenKind::Literal(lit) => {
                let lit = lit_to_ast(lit);
                self.bump();
                Ok(Expr { span: lo, kind: ExprKind::Lit(lit) })
            }
            TokenKind::Keyword(Keyword::True) => {
                self.bump();
                Ok(Expr { span: lo, kind: ExprKind::Lit(bool_lit(true)) })
            }
            TokenKind::Keyword(Keyword::False) => {
                self.bump();
                Ok(Expr { span: lo, kind: ExprKind::Lit(bool_lit(false)) })
            }
            TokenKind::OpenParen => {
                self.bump();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::CloseParen)?;
                let span = lo.to(self.prev_token.span);
                Ok(Expr { span, kind: ExprKind::Paren(Box::new(inner)) })
            }
            TokenKind::Ident(_) => {
                if self.look_ahead(1).kind == TokenKind::TemplateArgsStart {
                    // A templated type constructor: `vec3<f32>(...)`.
                    let ty = self.parse_type()?;
                    let args = self.parse_call_args()?;
                    let span = lo.to(self.prev_token.span);
                    let call = CallExpr { callee: Callee::Type(ty), args };
                    return Ok(Expr { span, kind: ExprKind::Call(call) });
                }
                let ident = self.parse_ident()?;
                if self.token.kind == TokenKind::OpenParen {
                    let args = self.parse_call_args()?;
                    let span = lo.to(self.prev_token.span);
                    let call = CallExpr { callee: Callee::Ident(IdentRef::new(ident)), args };
                    return Ok(Expr { span, kind: ExprKind::Call(call) });
                }
                Ok(Expr { span: lo, kind: ExprKind::Ident(IdentRef::new(ident)) })
            }
            _ => {
                self.expected_tokens.push(ExpectedToken::Lit);
                self.expected_tokens.push(ExpectedToken::Ident);
                self.unexpected()
            }
        }
    }

    /// Parses a parenthesized, comma-separated argument list. Trailing
    /// commas are accepted.
    pub(super) fn parse_call_args(&mut self) -> PResult<Vec<Expr>> {
        self.expect(TokenKind::OpenParen)?;
        let mut args = Vec::new();
        while !self.check(TokenKind::CloseParen) {
            args.push(self.parse_expr()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::CloseParen)?;
        Ok(args)
    }
}

fn bool_lit(value: bool) -> Lit {
    Lit { kind: LitKind::Bool(value), text: if value { "true" } else { "false" }.into() }
}

/// Classifies a literal token, extracting its type suffix.
fn lit_to_ast(lit: &TokenLit) -> Lit {
    let text = lit.text.clone();
    let kind = match lit.kind {
        TokenLitKind::Int { hex } => {
            let suffix = match text.as_bytes().last() {
                Some(b'i') => Some(IntSuffix::I),
                Some(b'u') => Some(IntSuffix::U),
                _ => None,
            };
            LitKind::Int { hex, suffix }
        }
        TokenLitKind::Float { hex } => {
            // A hex float's `f` can only be a suffix after the binary
            // exponent; anywhere else it is a digit.
            let suffixable = !hex || text.contains(['p', 'P']);
            let suffix = match text.as_bytes().last() {
                Some(b'f') if suffixable => Some(FloatSuffix::F),
                Some(b'h') if suffixable => Some(FloatSuffix::H),
                _ => None,
            };
            LitKind::Float { hex, suffix }
        }
    };
    Lit { kind, text }
}
