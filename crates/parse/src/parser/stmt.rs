use super::Parser;
use crate::PResult;
use wgslmin_ast::ast::*;
use wgslmin_ast::token::{Keyword, TokenKind};

impl Parser<'_> {
    /// Parses a compound statement: `{ ... }`.
    ///
    /// A failed statement is skipped up to the next `;` or `}` so one body
    /// can surface several diagnostics.
    pub(super) fn parse_block(&mut self) -> PResult<Block> {
        let lo = self.token.span;
        self.expect(TokenKind::OpenBrace)?;
        let mut stmts = Vec::new();
        while !self.check(TokenKind::CloseBrace) && !self.token.is_eof() {
            match self.parse_stmt() {
                Ok(stmt) => stmts.push(stmt),
                Err(_) => self.recover_stmt(),
            }
        }
        self.expect(TokenKind::CloseBrace)?;
        Ok(Block { span: lo.to(self.prev_token.span), stmts })
    }

    fn parse_stmt(&mut self) -> PResult<Stmt> {
        let lo = self.token.span;
        let kind = match &self.token.kind {
            TokenKind::Semi => {
                self.bump();
                StmtKind::Empty
            }
            TokenKind::OpenBrace => StmtKind::Block(self.parse_block()?),
            TokenKind::Keyword(kw) => {
                let kw = *kw;
                match kw {
                    Keyword::If => StmtKind::If(self.parse_if_stmt()?),
                    Keyword::Switch => StmtKind::Switch(self.parse_switch_stmt()?),
                    Keyword::For => StmtKind::For(Box::new(self.parse_for_stmt()?)),
                    Keyword::While => {
                        self.bump();
                        let cond = self.parse_expr()?;
                        let body = self.parse_block()?;
                        StmtKind::While(WhileStmt { cond, body })
                    }
                    Keyword::Loop => StmtKind::Loop(self.parse_loop_stmt()?),
                    Keyword::Break => {
                        self.bump();
                        if self.eat_keyword(Keyword::If) {
                            let cond = self.parse_expr()?;
                            self.expect_semi()?;
                            StmtKind::BreakIf(cond)
                        } else {
                            self.expect_semi()?;
                            StmtKind::Break
                        }
                    }
                    Keyword::Continue => {
                        self.bump();
                        self.expect_semi()?;
                        StmtKind::Continue
                    }
                    Keyword::Discard => {
                        self.bump();
                        self.expect_semi()?;
                        StmtKind::Discard
                    }
                    Keyword::Return => {
                        self.bump();
                        let value = if self.check(TokenKind::Semi) {
                            None
                        } else {
                            Some(self.parse_expr()?)
                        };
                        self.expect_semi()?;
                        StmtKind::Return(value)
                    }
                    Keyword::Var => {
                        let decl = self.parse_var_decl(false)?;
                        self.expect_semi()?;
                        StmtKind::Var(decl)
                    }
                    Keyword::Let => {
                        let decl = self.parse_let_decl()?;
                        self.expect_semi()?;
                        StmtKind::Let(decl)
                    }
                    Keyword::Const => {
                        let decl = self.parse_const_decl(false)?;
                        self.expect_semi()?;
                        StmtKind::Const(decl)
                    }
                    Keyword::ConstAssert => {
                        let assert = self.parse_const_assert()?;
                        self.expect_semi()?;
                        StmtKind::ConstAssert(assert)
                    }
                    _ => return self.unexpected(),
                }
            }
            _ => {
                let kind = self.parse_simple_stmt()?;
                self.expect_semi()?;
                kind
            }
        };
        Ok(Stmt { span: lo.to(self.prev_token.span), kind })
    }

    /// Parses an assignment, increment/decrement, phony assignment, or call
    /// statement, without the trailing `;`. Shared with `for` headers.
    fn parse_simple_stmt(&mut self) -> PResult<StmtKind> {
        if self.token.kind == TokenKind::Underscore {
            self.bump();
            self.expect(TokenKind::Eq)?;
            let rhs = self.parse_expr()?;
            return Ok(StmtKind::Assign(AssignStmt { lhs: None, op: None, rhs }));
        }
        let lhs = self.parse_unary_expr()?;
        Ok(match &self.token.kind {
            TokenKind::Eq => {
                self.bump();
                let rhs = self.parse_expr()?;
                StmtKind::Assign(AssignStmt { lhs: Some(lhs), op: None, rhs })
            }
            TokenKind::BinOpEq(op) => {
                let op = *op;
                self.bump();
                let rhs = self.parse_expr()?;
                StmtKind::Assign(AssignStmt { lhs: Some(lhs), op: Some(op), rhs })
            }
            TokenKind::PlusPlus => {
                self.bump();
                StmtKind::Increment(lhs)
            }
            TokenKind::MinusMinus => {
                self.bump();
                StmtKind::Decrement(lhs)
            }
            _ => {
                if matches!(lhs.kind, ExprKind::Call(_)) {
                    StmtKind::Call(lhs)
                } else {
                    return self.unexpected();
                }
            }
        })
    }

    fn parse_if_stmt(&mut self) -> PResult<IfStmt> {
        self.expect_keyword(Keyword::If)?;
        let cond = self.parse_expr()?;
        let then_block = self.parse_block()?;
        let else_branch = if self.eat_keyword(Keyword::Else) {
            Some(Box::new(if self.token.is_keyword(Keyword::If) {
                ElseBranch::If(self.parse_if_stmt()?)
            } else {
                ElseBranch::Block(self.parse_block()?)
            }))
        } else {
            None
        };
        Ok(IfStmt { cond, then_block, else_branch })
    }

    fn parse_switch_stmt(&mut self) -> PResult<SwitchStmt> {
        self.expect_keyword(Keyword::Switch)?;
        let selector = self.parse_expr()?;
        self.expect(TokenKind::OpenBrace)?;
        let mut cases = Vec::new();
        while !self.check(TokenKind::CloseBrace) {
            let lo = self.token.span;
            let selectors = if self.eat_keyword(Keyword::Case) {
                let mut selectors = Vec::new();
                loop {
                    if self.eat_keyword(Keyword::Default) {
                        selectors.push(CaseSelector::Default);
                    } else {
                        selectors.push(CaseSelector::Expr(self.parse_expr()?));
                    }
                    if !self.eat(TokenKind::Comma)
                        || self.check(TokenKind::Colon)
                        || self.check(TokenKind::OpenBrace)
                    {
                        break;
                    }
                }
                selectors
            } else if self.eat_keyword(Keyword::Default) {
                vec![CaseSelector::Default]
            } else {
                return self.unexpected();
            };
            // The colon after case selectors is optional.
            self.eat(TokenKind::Colon);
            let body = self.parse_block()?;
            cases.push(SwitchCase { span: lo.to(self.prev_token.span), selectors, body });
        }
        self.expect(TokenKind::CloseBrace)?;
        Ok(SwitchStmt { selector, cases })
    }

    fn parse_for_stmt(&mut self) -> PResult<ForStmt> {
        self.expect_keyword(Keyword::For)?;
        self.expect(TokenKind::OpenParen)?;
        let init = if self.check(TokenKind::Semi) {
            None
        } else {
            Some(self.parse_for_init()?)
        };
        self.expect_semi()?;
        let cond = if self.check(TokenKind::Semi) { None } else { Some(self.parse_expr()?) };
        self.expect_semi()?;
        let update = if self.check(TokenKind::CloseParen) {
            None
        } else {
            let lo = self.token.span;
            let kind = self.parse_simple_stmt()?;
            Some(Stmt { span: lo.to(self.prev_token.span), kind })
        };
        self.expect(TokenKind::CloseParen)?;
        let body = self.parse_block()?;
        Ok(ForStmt { init, cond, update, body })
    }

    fn parse_for_init(&mut self) -> PResult<Stmt> {
        let lo = self.token.span;
        let kind = match &self.token.kind {
            TokenKind::Keyword(Keyword::Var) => StmtKind::Var(self.parse_var_decl(false)?),
            TokenKind::Keyword(Keyword::Let) => StmtKind::Let(self.parse_let_decl()?),
            TokenKind::Keyword(Keyword::Const) => StmtKind::Const(self.parse_const_decl(false)?),
            _ => self.parse_simple_stmt()?,
        };
        Ok(Stmt { span: lo.to(self.prev_token.span), kind })
    }

    fn parse_loop_stmt(&mut self) -> PResult<LoopStmt> {
        self.expect_keyword(Keyword::Loop)?;
        let lo = self.token.span;
        self.expect(TokenKind::OpenBrace)?;
        let mut stmts = Vec::new();
        let mut continuing = None;
        while !self.check(TokenKind::CloseBrace) && !self.token.is_eof() {
            if self.token.is_keyword(Keyword::Continuing) {
                continuing = Some(self.parse_continuing()?);
                break;
            }
            match self.parse_stmt() {
                Ok(stmt) => stmts.push(stmt),
                Err(_) => self.recover_stmt(),
            }
        }
        self.expect(TokenKind::CloseBrace)?;
        let body = Block { span: lo.to(self.prev_token.span), stmts };
        Ok(LoopStmt { body, continuing })
    }

    /// Parses a `continuing { ... }` block, with its optional trailing
    /// `break if expr;`.
    fn parse_continuing(&mut self) -> PResult<Continuing> {
        let lo = self.token.span;
        self.expect_keyword(Keyword::Continuing)?;
        let block_lo = self.token.span;
        self.expect(TokenKind::OpenBrace)?;
        let mut stmts = Vec::new();
        let mut break_if = None;
        while !self.check(TokenKind::CloseBrace) && !self.token.is_eof() {
            if self.token.is_keyword(Keyword::Break) && self.look_ahead(1).is_keyword(Keyword::If)
            {
                self.bump();
                self.bump();
                break_if = Some(self.parse_expr()?);
                self.expect_semi()?;
                break;
            }
            match self.parse_stmt() {
                Ok(stmt) => stmts.push(stmt),
                Err(_) => self.recover_stmt(),
            }
        }
        self.expect(TokenKind::CloseBrace)?;
        let body = Block { span: block_lo.to(self.prev_token.span), stmts };
        Ok(Continuing { span: lo.to(self.prev_token.span), body, break_if })
    }
}
