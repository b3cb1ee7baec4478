use crate::{Lexer, PResult};
use smallvec::SmallVec;
use std::fmt;
use wgslmin_ast::ast::Module;
use wgslmin_ast::token::{Keyword, Token, TokenKind};
use wgslmin_ast::{ScopeId, ScopeTree, SymbolId, SymbolKind, SymbolTable};
use wgslmin_interface::{BytePos, Session, Span, diagnostics::DiagCtxt};

mod expr;
mod item;
mod stmt;
mod ty;

/// WGSL parser.
///
/// Consumes the lexer's token stream and builds the AST. Symbols are created
/// eagerly for every declaration; module-scope names are entered into the
/// module scope so the bind pass can resolve forward references. Local
/// scopes are built later, by the bind pass, because locals never hoist.
pub struct Parser<'sess> {
    /// The parser session.
    pub sess: &'sess Session,

    /// The token stream, after template-list disambiguation.
    tokens: Vec<Token>,
    /// Index of the current token in `tokens`.
    index: usize,
    /// The current token.
    pub token: Token,
    /// The previous token.
    pub prev_token: Token,
    /// List of expected tokens. Cleared after each `bump` call.
    expected_tokens: Vec<ExpectedToken>,

    /// The symbol table under construction.
    pub(crate) symbols: SymbolTable,
    /// The scope tree under construction. Only the module scope is
    /// populated during parsing.
    pub(crate) scopes: ScopeTree,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum ExpectedToken {
    Token(TokenKind),
    Keyword(Keyword),
    Ident,
    Lit,
    Type,
}

impl fmt::Display for ExpectedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(t) => write!(f, "`{t}`"),
            Self::Keyword(kw) => write!(f, "`{kw}`"),
            Self::Ident => f.write_str("identifier"),
            Self::Lit => f.write_str("literal"),
            Self::Type => f.write_str("type"),
        }
    }
}

impl ExpectedToken {
    fn to_string_many(tokens: &[Self]) -> String {
        match tokens {
            [] => "nothing".to_string(),
            [one] => one.to_string(),
            [head @ .., last] => {
                let head = head.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
                format!("{head} or {last}")
            }
        }
    }
}

impl<'sess> Parser<'sess> {
    /// Creates a new parser for the session's source file.
    pub fn new(sess: &'sess Session) -> Self {
        let mut tokens = Lexer::new(sess).into_tokens();
        disambiguate_template_lists(&mut tokens);
        let mut parser = Self {
            sess,
            tokens,
            index: 0,
            token: Token::DUMMY,
            prev_token: Token::DUMMY,
            expected_tokens: Vec::new(),
            symbols: SymbolTable::new(),
            scopes: ScopeTree::new(),
        };
        parser.token = parser.tokens.first().cloned().unwrap_or(Token::DUMMY);
        parser
    }

    /// Returns the diagnostic context.
    #[inline]
    pub fn dcx(&self) -> &'sess DiagCtxt {
        &self.sess.dcx
    }

    /// Parses the whole module, consuming the parser.
    ///
    /// Recovery happens at declaration boundaries: a failed item is skipped
    /// up to the next plausible declaration start, so one run can surface
    /// several diagnostics.
    #[instrument(name = "parse", level = "debug", skip_all)]
    pub fn parse_module(mut self) -> Module {
        let mut directives = Vec::new();
        while let TokenKind::Keyword(
            kw @ (Keyword::Enable | Keyword::Requires | Keyword::Diagnostic),
        ) = self.token.kind
        {
            // `diagnostic` also names an attribute; the directive form only
            // occurs before all declarations.
            match self.parse_directive(kw) {
                Ok(directive) => directives.push(directive),
                Err(_) => self.recover_top_level(),
            }
        }

        let mut items = Vec::new();
        while !self.token.is_eof() {
            if self.eat(TokenKind::Semi) {
                continue;
            }
            match self.parse_item() {
                Ok(item) => items.push(item),
                Err(_) => self.recover_top_level(),
            }
        }
        debug!(items = items.len(), symbols = self.symbols.len(), "parsed");
        Module { directives, items, symbols: self.symbols, scopes: self.scopes }
    }

    /// Advances to the next token.
    pub fn bump(&mut self) {
        self.index += 1;
        let next = self.tokens.get(self.index).cloned().unwrap_or_else(|| {
            Token::new(TokenKind::Eof, self.eof_span())
        });
        self.prev_token = std::mem::replace(&mut self.token, next);
        self.expected_tokens.clear();
    }

    fn eof_span(&self) -> Span {
        let end = BytePos::from_usize(self.sess.file.src.len());
        Span::new(end, end)
    }

    /// Peeks `n` tokens ahead of the current one.
    pub fn look_ahead(&self, n: usize) -> &Token {
        static EOF: Token = Token::DUMMY;
        self.tokens.get(self.index + n).unwrap_or(&EOF)
    }

    /// Returns `true` if the current token is `kind`. Records the
    /// expectation otherwise.
    pub fn check(&mut self, kind: TokenKind) -> bool {
        let ok = self.token.kind == kind;
        if !ok {
            self.expected_tokens.push(ExpectedToken::Token(kind));
        }
        ok
    }

    /// Consumes the current token if it is `kind`.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        let ok = self.check(kind);
        if ok {
            self.bump();
        }
        ok
    }

    /// Returns `true` if the current token is the keyword `kw`.
    pub fn check_keyword(&mut self, kw: Keyword) -> bool {
        let ok = self.token.is_keyword(kw);
        if !ok {
            self.expected_tokens.push(ExpectedToken::Keyword(kw));
        }
        ok
    }

    /// Consumes the current token if it is the keyword `kw`.
    pub fn eat_keyword(&mut self, kw: Keyword) -> bool {
        let ok = self.check_keyword(kw);
        if ok {
            self.bump();
        }
        ok
    }

    /// Expects and consumes the token `kind`. Signals an error otherwise.
    pub fn expect(&mut self, kind: TokenKind) -> PResult<()> {
        if self.eat(kind) { Ok(()) } else { self.unexpected() }
    }

    /// Expects and consumes a `;`.
    pub fn expect_semi(&mut self) -> PResult<()> {
        self.expect(TokenKind::Semi)
    }

    /// Expects and consumes the keyword `kw`. Signals an error otherwise.
    pub fn expect_keyword(&mut self, kw: Keyword) -> PResult<()> {
        if self.eat_keyword(kw) { Ok(()) } else { self.unexpected() }
    }

    /// Returns an "unexpected token" error for the current token, listing
    /// what was expected instead.
    pub fn unexpected<T>(&mut self) -> PResult<T> {
        let expected = ExpectedToken::to_string_many(&self.expected_tokens);
        let found = self.token.description();
        let msg = if self.expected_tokens.is_empty() {
            format!("unexpected token: {found}")
        } else {
            format!("expected {expected}, found {found}")
        };
        let span = self.token.span;
        self.expected_tokens.clear();
        Err(self.dcx().err(msg).span(span).emit())
    }

    /// Skips tokens until a plausible top-level declaration boundary.
    fn recover_top_level(&mut self) {
        let mut depth = 0usize;
        loop {
            match &self.token.kind {
                TokenKind::Eof => return,
                TokenKind::Semi if depth == 0 => {
                    self.bump();
                    return;
                }
                TokenKind::OpenBrace => {
                    depth += 1;
                    self.bump();
                }
                TokenKind::CloseBrace => {
                    self.bump();
                    if depth <= 1 {
                        return;
                    }
                    depth -= 1;
                }
                TokenKind::At if depth == 0 => return,
                TokenKind::Keyword(
                    Keyword::Fn
                    | Keyword::Var
                    | Keyword::Const
                    | Keyword::ConstAssert
                    | Keyword::Override
                    | Keyword::Struct
                    | Keyword::Alias
                    | Keyword::Enable
                    | Keyword::Requires,
                ) if depth == 0 => return,
                _ => self.bump(),
            }
        }
    }

    /// Skips tokens until a statement boundary: past the next `;`, or up to
    /// a `}` left for the caller.
    pub(crate) fn recover_stmt(&mut self) {
        let mut depth = 0usize;
        loop {
            match &self.token.kind {
                TokenKind::Eof => return,
                TokenKind::Semi if depth == 0 => {
                    self.bump();
                    return;
                }
                TokenKind::CloseBrace => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                    self.bump();
                }
                TokenKind::OpenBrace => {
                    depth += 1;
                    self.bump();
                }
                _ => self.bump(),
            }
        }
    }

    /// Creates a symbol for a declaration.
    ///
    /// Local symbols get the module scope as a placeholder; the bind pass
    /// assigns their real scope when it walks function bodies.
    pub(crate) fn fresh_symbol(
        &mut self,
        name: &str,
        kind: SymbolKind,
        span: Span,
    ) -> SymbolId {
        self.symbols.fresh(name, kind, span, ScopeId::MODULE)
    }

    /// Creates a symbol for a module-scope declaration and enters it into
    /// the module scope.
    pub(crate) fn declare_module_symbol(
        &mut self,
        name: &str,
        kind: SymbolKind,
        span: Span,
    ) -> SymbolId {
        let id = self.fresh_symbol(name, kind, span);
        if self.scopes.declare(ScopeId::MODULE, name, id).is_some() {
            self.dcx()
                .err(format!("the name `{name}` is declared multiple times"))
                .span(span)
                .emit();
        }
        id
    }
}

/// A candidate `<` that may start a template argument list.
#[derive(Clone, Copy, Debug)]
struct TemplateCandidate {
    /// Index of the `<` token.
    pos: usize,
    /// Parenthesis/bracket nesting depth at the candidate.
    depth: u32,
}

/// Rewrites `<`/`>` pairs that delimit template argument lists into
/// [`TokenKind::TemplateArgsStart`]/[`TokenKind::TemplateArgsEnd`].
///
/// Token-level rendition of the template-list discovery algorithm from the
/// WGSL specification: a `<` directly after an identifier (or `var`) is a
/// candidate; a later `>` at the same nesting depth closes the innermost
/// candidate; expression terminators discard all pending candidates. The
/// maximal-munch tokens `>>`, `>=`, and `>>=` are split apart when their
/// leading `>` closes a template list.
fn disambiguate_template_lists(tokens: &mut Vec<Token>) {
    use wgslmin_ast::BinOpToken;

    let mut pending = SmallVec::<[TemplateCandidate; 8]>::new();
    let mut depth = 0u32;
    let mut i = 0;
    while i < tokens.len() {
        match &tokens[i].kind {
            TokenKind::Lt => {
                let after_ident = i > 0
                    && matches!(
                        tokens[i - 1].kind,
                        TokenKind::Ident(_) | TokenKind::Keyword(Keyword::Var)
                    );
                if after_ident {
                    pending.push(TemplateCandidate { pos: i, depth });
                }
            }
            TokenKind::Gt => {
                if let Some(c) = pending.last().copied()
                    && c.depth == depth
                {
                    pending.pop();
                    tokens[c.pos].kind = TokenKind::TemplateArgsStart;
                    tokens[i].kind = TokenKind::TemplateArgsEnd;
                }
            }
            TokenKind::BinOp(BinOpToken::Shr) => {
                // `>>` may close two nested template lists, or one list
                // followed by a plain `>`.
                if let Some(c) = pending.last().copied()
                    && c.depth == depth
                {
                    pending.pop();
                    tokens[c.pos].kind = TokenKind::TemplateArgsStart;
                    let span = tokens[i].span;
                    let mid = BytePos(span.lo().to_u32() + 1);
                    tokens[i] =
                        Token::new(TokenKind::TemplateArgsEnd, Span::new(span.lo(), mid));
                    let second = Token::new(TokenKind::Gt, Span::new(mid, span.hi()));
                    tokens.insert(i + 1, second);
                    // Reprocess the second `>` on the next iteration.
                }
            }
            TokenKind::Ge => {
                // `>=` may be a template list end followed by `=`.
                if let Some(c) = pending.last().copied()
                    && c.depth == depth
                {
                    pending.pop();
                    tokens[c.pos].kind = TokenKind::TemplateArgsStart;
                    let span = tokens[i].span;
                    let mid = BytePos(span.lo().to_u32() + 1);
                    tokens[i] =
                        Token::new(TokenKind::TemplateArgsEnd, Span::new(span.lo(), mid));
                    tokens.insert(i + 1, Token::new(TokenKind::Eq, Span::new(mid, span.hi())));
                    i += 1;
                }
                pending.clear();
            }
            TokenKind::BinOpEq(BinOpToken::Shr) => {
                // `>>=`: same splitting, leaving `>=` to reprocess.
                if let Some(c) = pending.last().copied()
                    && c.depth == depth
                {
                    pending.pop();
                    tokens[c.pos].kind = TokenKind::TemplateArgsStart;
                    let span = tokens[i].span;
                    let mid = BytePos(span.lo().to_u32() + 1);
                    tokens[i] =
                        Token::new(TokenKind::TemplateArgsEnd, Span::new(span.lo(), mid));
                    tokens.insert(i + 1, Token::new(TokenKind::Ge, Span::new(mid, span.hi())));
                } else {
                    pending.clear();
                }
            }
            TokenKind::OpenParen | TokenKind::OpenBracket => depth += 1,
            TokenKind::CloseParen | TokenKind::CloseBracket => {
                pending.retain(|c| c.depth < depth);
                depth = depth.saturating_sub(1);
            }
            // Expression terminators: nothing pending can span these.
            TokenKind::Semi
            | TokenKind::Colon
            | TokenKind::OpenBrace
            | TokenKind::CloseBrace
            | TokenKind::Eq
            | TokenKind::BinOpEq(_)
            | TokenKind::AndAnd
            | TokenKind::OrOr
            | TokenKind::Arrow => pending.clear(),
            _ => {}
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgslmin_ast::ast::ItemKind;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let sess = Session::new("test.wgsl", src);
        let mut tokens = Lexer::new(&sess).into_tokens();
        disambiguate_template_lists(&mut tokens);
        tokens.into_iter().map(|t| t.kind).collect()
    }

    fn count_template_delims(src: &str) -> (usize, usize) {
        let kinds = kinds(src);
        let starts =
            kinds.iter().filter(|k| matches!(k, TokenKind::TemplateArgsStart)).count();
        let ends = kinds.iter().filter(|k| matches!(k, TokenKind::TemplateArgsEnd)).count();
        (starts, ends)
    }

    #[test]
    fn simple_template() {
        assert_eq!(count_template_delims("vec3<f32>"), (1, 1));
        assert_eq!(count_template_delims("var<private> x: f32;"), (1, 1));
    }

    #[test]
    fn nested_templates_split_shr() {
        assert_eq!(count_template_delims("array<vec3<f32>>"), (2, 2));
        assert_eq!(count_template_delims("array<array<f32, 2>>"), (2, 2));
    }

    #[test]
    fn template_end_in_ge() {
        // `>=` after a pending template end splits into `>` `=`.
        let kinds = kinds("var x: vec2<f32>=vec2<f32>();");
        assert_eq!(
            kinds.iter().filter(|k| matches!(k, TokenKind::TemplateArgsEnd)).count(),
            2
        );
        assert!(kinds.contains(&TokenKind::Eq));
    }

    #[test]
    fn comparisons_are_not_templates() {
        assert_eq!(count_template_delims("let c = a < b;"), (0, 0));
        assert_eq!(count_template_delims("if a < b { }"), (0, 0));
        assert_eq!(count_template_delims("let c = (a) < (b);"), (0, 0));
        // Candidates inside parens are discarded at `)`.
        assert_eq!(count_template_delims("f(a < b)"), (0, 0));
        // `&&` terminates candidates.
        assert_eq!(count_template_delims("let c = a < b && c > d;"), (0, 0));
    }

    #[test]
    fn shift_inside_template() {
        assert_eq!(count_template_delims("array<u32, 1 << 2>"), (1, 1));
    }

    fn parse(src: &str) -> (Session, Module) {
        let sess = Session::new("test.wgsl", src);
        let module = Parser::new(&sess).parse_module();
        (sess, module)
    }

    #[test]
    fn module_shape() {
        let (sess, module) = parse(
            "enable f16;\n\
             const N = 4;\n\
             struct S { a: f32, b: vec3<f32> }\n\
             @group(0) @binding(0) var<uniform> u: S;\n\
             fn f(x: f32) -> f32 { return x; }",
        );
        assert!(sess.dcx.has_errors().is_ok());
        assert_eq!(module.directives.len(), 1);
        assert_eq!(module.items.len(), 4);
        // Declarations in module-scope lookup, in declaration order.
        let names: Vec<_> =
            module.scopes.get(ScopeId::MODULE).names.keys().cloned().collect();
        assert_eq!(names, ["N", "S", "u", "f"]);
        // N, S + 2 fields, u, f + 1 parameter, x local? none; plus the
        // directive name.
        assert_eq!(module.symbols.len(), 8);
    }

    #[test]
    fn module_scope_forward_references_parse() {
        // Resolution is deferred to the bind pass, so use-before-decl at
        // module scope must parse cleanly.
        let (sess, module) = parse(
            "fn f() -> f32 { return K; }\n\
             const K: f32 = 1.0;",
        );
        assert!(sess.dcx.has_errors().is_ok());
        assert_eq!(module.items.len(), 2);
    }

    #[test]
    fn recovery_surfaces_multiple_errors() {
        let (sess, module) = parse(
            "fn broken( { }\n\
             const ALSO_BAD = ;\n\
             fn ok() { }",
        );
        assert!(sess.dcx.err_count() >= 2, "errors: {:?}", sess.dcx.emitted());
        // The parser resynchronized and still picked up the valid item.
        assert!(module.items.iter().any(|i| i.name().is_some_and(|n| n.name == "ok")));
    }

    #[test]
    fn trailing_commas() {
        let (sess, module) = parse(
            "struct S { a: f32, b: f32, }\n\
             fn f(x: f32, y: f32,) -> f32 { return g(x, y,); }\n\
             fn g(a: f32, b: f32) -> f32 { return vec2<f32>(a, b,).x; }",
        );
        assert!(sess.dcx.has_errors().is_ok(), "errors: {:?}", sess.dcx.emitted());
        assert_eq!(module.items.len(), 3);
    }

    #[test]
    fn attributes_attach_to_following_declaration() {
        let (sess, module) = parse(
            "@group(1) @binding(2) var t: texture_2d<f32>;\n\
             @fragment fn main() -> @location(0) vec4<f32> { return vec4<f32>(); }",
        );
        assert!(sess.dcx.has_errors().is_ok());
        assert_eq!(module.items[0].attrs.len(), 2);
        assert!(module.items[0].attrs[0].is("group"));
        assert_eq!(module.items[1].attrs.len(), 1);
        let ItemKind::Function(f) = &module.items[1].kind else { panic!() };
        let ret = f.ret.as_ref().unwrap();
        assert!(ret.attrs[0].is("location"));
    }

    #[test]
    fn var_templates() {
        let (sess, module) = parse(
            "var<private> a: f32;\n\
             var<storage, read_write> b: array<u32>;",
        );
        assert!(sess.dcx.has_errors().is_ok());
        let ItemKind::Var(a) = &module.items[0].kind else { panic!() };
        assert_eq!(a.address_space, Some(wgslmin_ast::AddressSpace::Private));
        assert_eq!(a.access, None);
        let ItemKind::Var(b) = &module.items[1].kind else { panic!() };
        assert_eq!(b.address_space, Some(wgslmin_ast::AddressSpace::Storage));
        assert_eq!(b.access, Some(wgslmin_ast::AccessMode::ReadWrite));
    }

    #[test]
    fn duplicate_module_declarations_error() {
        let (sess, _) = parse("const x = 1; const x = 2;");
        assert!(sess.dcx.has_errors().is_err());
    }
}
