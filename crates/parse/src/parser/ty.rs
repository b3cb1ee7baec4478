use super::{ExpectedToken, Parser};
use crate::PResult;
use wgslmin_ast::ast::*;
use wgslmin_ast::token::TokenKind;
use wgslmin_ast::{AccessMode, AddressSpace, VecSize};
use wgslmin_interface::Span;

impl Parser<'_> {
    /// Parses a type.
    ///
    /// The structural type generators (`vecN`, `matCxR`, `array`, `atomic`,
    /// `ptr`) get dedicated nodes because the layout computer needs their
    /// shape; every other templated name becomes a generic node whose
    /// arguments are expressions.
    pub(super) fn parse_type(&mut self) -> PResult<Type> {
        let lo = self.token.span;
        if !self.token.is_ident() {
            self.expected_tokens.push(ExpectedToken::Type);
            return self.unexpected();
        }
        let name = self.parse_ident()?;
        let kind = self.parse_type_with_name(name)?;
        Ok(Type { span: lo.to(self.prev_token.span), kind })
    }

    fn parse_type_with_name(&mut self, name: Ident) -> PResult<TyKind> {
        if let Some((size, scalar)) = vec_shorthand(&name.name) {
            return Ok(TyKind::Vector(VectorTy {
                size,
                elem: Box::new(scalar_type(scalar, name.span)),
                shorthand: true,
            }));
        }
        if let Some((cols, rows, scalar)) = mat_shorthand(&name.name) {
            return Ok(TyKind::Matrix(MatrixTy {
                cols,
                rows,
                elem: Box::new(scalar_type(scalar, name.span)),
                shorthand: true,
            }));
        }

        let templated = self.token.kind == TokenKind::TemplateArgsStart;
        Ok(match name.name.as_str() {
            "vec2" | "vec3" | "vec4" if templated => {
                let size = VecSize::from_u8(name.name.as_bytes()[3] - b'0').unwrap();
                self.bump();
                let elem = self.parse_type()?;
                self.eat(TokenKind::Comma);
                self.expect(TokenKind::TemplateArgsEnd)?;
                TyKind::Vector(VectorTy { size, elem: Box::new(elem), shorthand: false })
            }
            "mat2x2" | "mat2x3" | "mat2x4" | "mat3x2" | "mat3x3" | "mat3x4" | "mat4x2"
            | "mat4x3" | "mat4x4"
                if templated =>
            {
                let bytes = name.name.as_bytes();
                let cols = VecSize::from_u8(bytes[3] - b'0').unwrap();
                let rows = VecSize::from_u8(bytes[5] - b'0').unwrap();
                self.bump();
                let elem = self.parse_type()?;
                self.eat(TokenKind::Comma);
                self.expect(TokenKind::TemplateArgsEnd)?;
                TyKind::Matrix(MatrixTy { cols, rows, elem: Box::new(elem), shorthand: false })
            }
            "array" if templated => {
                self.bump();
                let elem = self.parse_type()?;
                let size = if self.eat(TokenKind::Comma)
                    && !self.check(TokenKind::TemplateArgsEnd)
                {
                    let size = self.parse_expr()?;
                    self.eat(TokenKind::Comma);
                    Some(Box::new(size))
                } else {
                    None
                };
                self.expect(TokenKind::TemplateArgsEnd)?;
                TyKind::Array(ArrayTy { elem: Box::new(elem), size })
            }
            "atomic" if templated => {
                self.bump();
                let elem = self.parse_type()?;
                self.eat(TokenKind::Comma);
                self.expect(TokenKind::TemplateArgsEnd)?;
                TyKind::Atomic(Box::new(elem))
            }
            "ptr" if templated => {
                self.bump();
                let address_space = self.parse_enum_template_arg::<AddressSpace>()?;
                self.expect(TokenKind::Comma)?;
                let elem = self.parse_type()?;
                let access = if self.eat(TokenKind::Comma)
                    && !self.check(TokenKind::TemplateArgsEnd)
                {
                    let access = self.parse_enum_template_arg::<AccessMode>()?;
                    self.eat(TokenKind::Comma);
                    Some(access)
                } else {
                    None
                };
                self.expect(TokenKind::TemplateArgsEnd)?;
                TyKind::Ptr(PtrTy { address_space, elem: Box::new(elem), access })
            }
            _ if templated => {
                self.bump();
                let mut args = Vec::new();
                while !self.check(TokenKind::TemplateArgsEnd) {
                    args.push(self.parse_expr()?);
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(TokenKind::TemplateArgsEnd)?;
                TyKind::Generic(GenericTy { name: IdentRef::new(name), args })
            }
            _ => TyKind::Named(IdentRef::new(name)),
        })
    }

    fn parse_enum_template_arg<T: std::str::FromStr>(&mut self) -> PResult<T> {
        let ident = self.parse_ident()?;
        T::from_str(&ident.name).map_err(|_| {
            self.dcx()
                .err(format!("invalid template argument `{}`", ident.name))
                .span(ident.span)
                .emit()
        })
    }
}

fn scalar_type(name: &str, span: Span) -> Type {
    Type { span, kind: TyKind::Named(IdentRef::new(Ident::new(name, span))) }
}

/// Maps `vec3f`-style predeclared aliases to their structure.
fn vec_shorthand(name: &str) -> Option<(VecSize, &'static str)> {
    let bytes = name.as_bytes();
    if bytes.len() == 5 && bytes.starts_with(b"vec") {
        let size = VecSize::from_u8(bytes[3].wrapping_sub(b'0'))?;
        let scalar = scalar_for_suffix(bytes[4])?;
        return Some((size, scalar));
    }
    None
}

/// Maps `mat4x4f`-style predeclared aliases to their structure. Only `f`
/// and `h` element types exist.
fn mat_shorthand(name: &str) -> Option<(VecSize, VecSize, &'static str)> {
    let bytes = name.as_bytes();
    if bytes.len() == 7 && bytes.starts_with(b"mat") && bytes[4] == b'x' {
        let cols = VecSize::from_u8(bytes[3].wrapping_sub(b'0'))?;
        let rows = VecSize::from_u8(bytes[5].wrapping_sub(b'0'))?;
        let scalar = match bytes[6] {
            b'f' => "f32",
            b'h' => "f16",
            _ => return None,
        };
        return Some((cols, rows, scalar));
    }
    None
}

fn scalar_for_suffix(suffix: u8) -> Option<&'static str> {
    match suffix {
        b'f' => Some("f32"),
        b'i' => Some("i32"),
        b'u' => Some("u32"),
        b'h' => Some("f16"),
        _ => None,
    }
}
