use super::{ExpectedToken, Parser};
use crate::PResult;
use std::str::FromStr;
use wgslmin_ast::ast::*;
use wgslmin_ast::token::{Keyword, TokenKind};
use wgslmin_ast::{AccessMode, AddressSpace, SymbolKind};

impl Parser<'_> {
    /// Parses a top-level declaration.
    pub(super) fn parse_item(&mut self) -> PResult<Item> {
        let lo = self.token.span;
        let attrs = self.parse_attributes()?;
        let TokenKind::Keyword(kw) = self.token.kind else {
            return self.unexpected();
        };
        let kind = match kw {
            Keyword::Var => {
                let decl = self.parse_var_decl(true)?;
                self.expect_semi()?;
                ItemKind::Var(decl)
            }
            Keyword::Const => {
                let decl = self.parse_const_decl(true)?;
                self.expect_semi()?;
                ItemKind::Const(decl)
            }
            Keyword::Override => {
                let decl = self.parse_override_decl()?;
                self.expect_semi()?;
                ItemKind::Override(decl)
            }
            Keyword::Alias => {
                let decl = self.parse_alias_decl()?;
                self.expect_semi()?;
                ItemKind::Alias(decl)
            }
            Keyword::ConstAssert => {
                let assert = self.parse_const_assert()?;
                self.expect_semi()?;
                ItemKind::ConstAssert(assert)
            }
            Keyword::Struct => ItemKind::Struct(self.parse_struct_decl()?),
            Keyword::Fn => ItemKind::Function(self.parse_fn_decl()?),
            _ => return self.unexpected(),
        };
        Ok(Item { attrs, span: lo.to(self.prev_token.span), kind })
    }

    /// Parses an identifier.
    pub(super) fn parse_ident(&mut self) -> PResult<Ident> {
        if let TokenKind::Ident(name) = &self.token.kind {
            let ident = Ident::new(name.clone(), self.token.span);
            self.bump();
            return Ok(ident);
        }
        self.expected_tokens.push(ExpectedToken::Ident);
        self.unexpected()
    }

    /// Parses zero or more `@attribute(...)` attributes.
    pub(super) fn parse_attributes(&mut self) -> PResult<Vec<Attribute>> {
        let mut attrs = Vec::new();
        while self.token.kind == TokenKind::At {
            let lo = self.token.span;
            self.bump();
            let name = self.parse_attribute_name()?;
            let mut args = Vec::new();
            if self.eat(TokenKind::OpenParen) {
                while !self.check(TokenKind::CloseParen) {
                    args.push(self.parse_expr()?);
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(TokenKind::CloseParen)?;
            }
            attrs.push(Attribute { span: lo.to(self.prev_token.span), name, args });
        }
        Ok(attrs)
    }

    /// Parses an attribute name. `@diagnostic` is the one attribute whose
    /// name collides with a keyword.
    fn parse_attribute_name(&mut self) -> PResult<Ident> {
        if self.token.is_keyword(Keyword::Diagnostic) {
            let ident = Ident::new("diagnostic", self.token.span);
            self.bump();
            return Ok(ident);
        }
        self.parse_ident()
    }

    /// Parses a directive whose keyword is already known to be current.
    pub(super) fn parse_directive(&mut self, kw: Keyword) -> PResult<Directive> {
        let lo = self.token.span;
        self.bump();
        let kind = match kw {
            Keyword::Enable | Keyword::Requires => {
                let mut names = Vec::new();
                loop {
                    let ident = self.parse_ident()?;
                    let symbol =
                        self.fresh_symbol(&ident.name, SymbolKind::Directive, ident.span);
                    names.push(DirectiveName { ident, symbol });
                    if !self.eat(TokenKind::Comma) || self.check(TokenKind::Semi) {
                        break;
                    }
                }
                if kw == Keyword::Enable {
                    DirectiveKind::Enable(names)
                } else {
                    DirectiveKind::Requires(names)
                }
            }
            Keyword::Diagnostic => {
                self.expect(TokenKind::OpenParen)?;
                let severity = self.parse_ident()?;
                self.expect(TokenKind::Comma)?;
                let name = self.parse_ident()?;
                let sub =
                    if self.eat(TokenKind::Dot) { Some(self.parse_ident()?) } else { None };
                self.eat(TokenKind::Comma);
                self.expect(TokenKind::CloseParen)?;
                DirectiveKind::Diagnostic { severity, rule: (name, sub) }
            }
            kw => unreachable!("not a directive keyword: {kw}"),
        };
        self.expect_semi()?;
        Ok(Directive { span: lo.to(self.prev_token.span), kind })
    }

    /// Parses a `var` declaration, without the trailing `;`.
    pub(super) fn parse_var_decl(&mut self, global: bool) -> PResult<VarDecl> {
        self.expect_keyword(Keyword::Var)?;
        let mut address_space = None;
        let mut access = None;
        if self.eat(TokenKind::TemplateArgsStart) {
            address_space = Some(self.parse_enum_ident::<AddressSpace>("address space")?);
            if self.eat(TokenKind::Comma) && !self.check(TokenKind::TemplateArgsEnd) {
                access = Some(self.parse_enum_ident::<AccessMode>("access mode")?);
                self.eat(TokenKind::Comma);
            }
            self.expect(TokenKind::TemplateArgsEnd)?;
        }
        let name = self.parse_ident()?;
        let symbol = if global {
            self.declare_module_symbol(&name.name, SymbolKind::Variable, name.span)
        } else {
            self.fresh_symbol(&name.name, SymbolKind::Variable, name.span)
        };
        let ty = if self.eat(TokenKind::Colon) { Some(self.parse_type()?) } else { None };
        let init = if self.eat(TokenKind::Eq) { Some(self.parse_expr()?) } else { None };
        Ok(VarDecl { name, symbol, address_space, access, ty, init })
    }

    /// Parses a `const` declaration, without the trailing `;`.
    pub(super) fn parse_const_decl(&mut self, global: bool) -> PResult<ConstDecl> {
        self.expect_keyword(Keyword::Const)?;
        let name = self.parse_ident()?;
        let symbol = if global {
            self.declare_module_symbol(&name.name, SymbolKind::Const, name.span)
        } else {
            self.fresh_symbol(&name.name, SymbolKind::Const, name.span)
        };
        let ty = if self.eat(TokenKind::Colon) { Some(self.parse_type()?) } else { None };
        self.expect(TokenKind::Eq)?;
        let init = self.parse_expr()?;
        Ok(ConstDecl { name, symbol, ty, init })
    }

    /// Parses a `let` declaration, without the trailing `;`. Function-scope
    /// only.
    pub(super) fn parse_let_decl(&mut self) -> PResult<LetDecl> {
        self.expect_keyword(Keyword::Let)?;
        let name = self.parse_ident()?;
        let symbol = self.fresh_symbol(&name.name, SymbolKind::Let, name.span);
        let ty = if self.eat(TokenKind::Colon) { Some(self.parse_type()?) } else { None };
        self.expect(TokenKind::Eq)?;
        let init = self.parse_expr()?;
        Ok(LetDecl { name, symbol, ty, init })
    }

    fn parse_override_decl(&mut self) -> PResult<OverrideDecl> {
        self.expect_keyword(Keyword::Override)?;
        let name = self.parse_ident()?;
        let symbol = self.declare_module_symbol(&name.name, SymbolKind::Override, name.span);
        let ty = if self.eat(TokenKind::Colon) { Some(self.parse_type()?) } else { None };
        let init = if self.eat(TokenKind::Eq) { Some(self.parse_expr()?) } else { None };
        Ok(OverrideDecl { name, symbol, ty, init })
    }

    fn parse_alias_decl(&mut self) -> PResult<AliasDecl> {
        self.expect_keyword(Keyword::Alias)?;
        let name = self.parse_ident()?;
        let symbol = self.declare_module_symbol(&name.name, SymbolKind::Alias, name.span);
        self.expect(TokenKind::Eq)?;
        let ty = self.parse_type()?;
        Ok(AliasDecl { name, symbol, ty })
    }

    /// Parses a `const_assert`, without the trailing `;`.
    pub(super) fn parse_const_assert(&mut self) -> PResult<ConstAssert> {
        self.expect_keyword(Keyword::ConstAssert)?;
        let expr = self.parse_expr()?;
        Ok(ConstAssert { expr })
    }

    fn parse_struct_decl(&mut self) -> PResult<StructDecl> {
        self.expect_keyword(Keyword::Struct)?;
        let name = self.parse_ident()?;
        let symbol = self.declare_module_symbol(&name.name, SymbolKind::Struct, name.span);
        self.expect(TokenKind::OpenBrace)?;
        let mut members = Vec::new();
        while !self.check(TokenKind::CloseBrace) {
            let lo = self.token.span;
            let attrs = self.parse_attributes()?;
            let member_name = self.parse_ident()?;
            let member_symbol =
                self.fresh_symbol(&member_name.name, SymbolKind::Field, member_name.span);
            self.expect(TokenKind::Colon)?;
            let ty = self.parse_type()?;
            members.push(StructMember {
                attrs,
                name: member_name,
                symbol: member_symbol,
                ty,
                span: lo.to(self.prev_token.span),
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::CloseBrace)?;
        Ok(StructDecl { name, symbol, members })
    }

    fn parse_fn_decl(&mut self) -> PResult<FunctionDecl> {
        self.expect_keyword(Keyword::Fn)?;
        let name = self.parse_ident()?;
        let symbol = self.declare_module_symbol(&name.name, SymbolKind::Function, name.span);
        self.expect(TokenKind::OpenParen)?;
        let mut params = Vec::new();
        while !self.check(TokenKind::CloseParen) {
            let lo = self.token.span;
            let attrs = self.parse_attributes()?;
            let param_name = self.parse_ident()?;
            self.expect(TokenKind::Colon)?;
            let ty = self.parse_type()?;
            let param_symbol =
                self.fresh_symbol(&param_name.name, SymbolKind::Parameter, param_name.span);
            params.push(Param {
                attrs,
                name: param_name,
                symbol: param_symbol,
                ty,
                span: lo.to(self.prev_token.span),
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::CloseParen)?;
        let ret = if self.eat(TokenKind::Arrow) {
            let attrs = self.parse_attributes()?;
            let ty = self.parse_type()?;
            Some(ReturnType { attrs, ty })
        } else {
            None
        };
        let body = self.parse_block()?;
        Ok(FunctionDecl { name, symbol, params, ret, body })
    }

    /// Parses an identifier naming a fixed enumerant set.
    fn parse_enum_ident<T: FromStr>(&mut self, what: &str) -> PResult<T> {
        let ident = self.parse_ident()?;
        T::from_str(&ident.name).map_err(|_| {
            self.dcx().err(format!("unknown {what} `{}`", ident.name)).span(ident.span).emit()
        })
    }
}
