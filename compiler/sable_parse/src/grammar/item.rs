//! Top-level declarations.

use sable_diagnostic::ErrorCode;
use sable_ir::{
    ConstantDecl, Decorator, EnumDecl, EnumMember, EventDecl, FieldDecl, FunctionDecl,
    InterfaceDecl, InterfaceMethod, Item, Mutability, Name, Param, Span, StructDecl, TokenKind,
    TypeExpr, Visibility,
};

use crate::{ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn parse_item(&mut self) -> Result<Item, ParseError> {
        match self.cursor.current_kind() {
            TokenKind::Enum => self.parse_enum().map(Item::Enum),
            TokenKind::Struct => self.parse_struct().map(Item::Struct),
            TokenKind::Event => self.parse_event().map(Item::Event),
            TokenKind::Interface => self.parse_interface().map(Item::Interface),
            TokenKind::At | TokenKind::Def => self.parse_function().map(Item::Function),
            TokenKind::Ident(_) if self.cursor.next_is(&TokenKind::Colon) => {
                self.parse_constant().map(Item::Constant)
            }
            TokenKind::Indent => Err(ParseError::new(
                ErrorCode::E1001,
                "unexpected indentation",
                self.cursor.current_span(),
            )),
            other => Err(ParseError::new(
                ErrorCode::E1001,
                format!("expected declaration, found {}", other.describe()),
                self.cursor.current_span(),
            )
            .with_context("expected `enum`, `struct`, `event`, `interface`, `def` or a constant")),
        }
    }

    // ===== enum =====

    /// `enum Name:` followed by one bare identifier per line.
    fn parse_enum(&mut self) -> Result<EnumDecl, ParseError> {
        let start = self.cursor.expect(&TokenKind::Enum)?;
        let (name, name_span) = self.cursor.expect_ident()?;
        self.cursor.expect(&TokenKind::Colon)?;
        let members = self.parse_block(Self::parse_enum_member)?;
        Ok(EnumDecl {
            name,
            name_span,
            members,
            span: self.span_from(start),
        })
    }

    fn parse_enum_member(&mut self) -> Result<EnumMember, ParseError> {
        let at_line_end = matches!(
            self.cursor.peek_kind_at(1),
            TokenKind::Newline | TokenKind::Eof
        );
        let member = match *self.cursor.current_kind() {
            TokenKind::Ident(name) if at_line_end => {
                let span = self.cursor.advance();
                EnumMember::Named { name, span }
            }
            TokenKind::Pass if at_line_end => EnumMember::Pass(self.cursor.advance()),
            _ => return Err(self.malformed_line("enum members must be bare identifiers, one per line")),
        };
        self.expect_line_end()?;
        Ok(member)
    }

    /// Build a structure error covering the rest of the current line.
    fn malformed_line(&self, message: &str) -> ParseError {
        let start = self.cursor.current_span();
        let mut end = start;
        let mut n = 0;
        loop {
            let kind = self.cursor.peek_kind_at(n);
            if matches!(
                kind,
                TokenKind::Newline | TokenKind::Eof | TokenKind::Indent | TokenKind::Dedent
            ) {
                break;
            }
            n += 1;
        }
        if n > 0 {
            end = self.cursor.peek_span_at(n - 1);
        }
        ParseError::new(ErrorCode::E1005, message, start.merge(end))
            .with_context("malformed declaration")
    }

    // ===== struct / event =====

    fn parse_struct(&mut self) -> Result<StructDecl, ParseError> {
        let start = self.cursor.expect(&TokenKind::Struct)?;
        let (name, name_span) = self.cursor.expect_ident()?;
        self.cursor.expect(&TokenKind::Colon)?;
        let fields = self.parse_block(|p| {
            if p.cursor.check(&TokenKind::Pass) {
                return Err(p.malformed_line("struct fields must be `name: type`"));
            }
            p.parse_field()
        })?;
        if fields.is_empty() {
            return Err(ParseError::new(
                ErrorCode::E1005,
                "struct must declare at least one field",
                name_span,
            ));
        }
        Ok(StructDecl {
            name,
            name_span,
            fields,
            span: self.span_from(start),
        })
    }

    fn parse_event(&mut self) -> Result<EventDecl, ParseError> {
        let start = self.cursor.expect(&TokenKind::Event)?;
        let (name, name_span) = self.cursor.expect_ident()?;
        self.cursor.expect(&TokenKind::Colon)?;
        let lines = self.parse_block(|p| {
            if p.cursor.eat(&TokenKind::Pass).is_some() {
                p.expect_line_end()?;
                return Ok(None);
            }
            p.parse_field().map(Some)
        })?;
        if lines.is_empty() {
            return Err(ParseError::new(
                ErrorCode::E1005,
                "event body must list fields or `pass`",
                name_span,
            ));
        }
        Ok(EventDecl {
            name,
            name_span,
            fields: lines.into_iter().flatten().collect(),
            span: self.span_from(start),
        })
    }

    /// `name: type` on its own line.
    fn parse_field(&mut self) -> Result<FieldDecl, ParseError> {
        if !(self.cursor.check_ident() && self.cursor.next_is(&TokenKind::Colon)) {
            return Err(self.malformed_line("fields must be declared as `name: type`"));
        }
        let (name, start) = self.cursor.expect_ident()?;
        self.cursor.expect(&TokenKind::Colon)?;
        let ty = self.parse_type()?;
        let span = start.merge(ty.span);
        self.expect_line_end()?;
        Ok(FieldDecl { name, ty, span })
    }

    // ===== interface =====

    fn parse_interface(&mut self) -> Result<InterfaceDecl, ParseError> {
        let start = self.cursor.expect(&TokenKind::Interface)?;
        let (name, name_span) = self.cursor.expect_ident()?;
        self.cursor.expect(&TokenKind::Colon)?;
        let methods = self.parse_block(Self::parse_interface_method)?;
        if methods.is_empty() {
            return Err(ParseError::new(
                ErrorCode::E1005,
                "interface must declare at least one method",
                name_span,
            ));
        }
        Ok(InterfaceDecl {
            name,
            name_span,
            methods,
            span: self.span_from(start),
        })
    }

    /// `def name(params) -> ret: mutability`
    fn parse_interface_method(&mut self) -> Result<InterfaceMethod, ParseError> {
        if !self.cursor.check(&TokenKind::Def) {
            return Err(self.malformed_line("interface bodies may only contain method signatures"));
        }
        let start = self.cursor.advance();
        let (name, _) = self.cursor.expect_ident()?;
        let params = self.parse_params()?;
        let ret = self.parse_return_type()?;
        self.cursor.expect(&TokenKind::Colon)?;
        let (mutability_name, mutability_span) = self.cursor.expect_ident()?;
        let mutability = self.mutability_from_name(mutability_name).ok_or_else(|| {
            ParseError::new(
                ErrorCode::E1005,
                "interface methods must declare `view`, `pure`, `nonpayable` or `payable`",
                mutability_span,
            )
        })?;
        let span = start.merge(mutability_span);
        self.expect_line_end()?;
        Ok(InterfaceMethod {
            name,
            params,
            ret,
            mutability,
            span,
        })
    }

    fn mutability_from_name(&self, name: Name) -> Option<Mutability> {
        match &*self.cursor.interner().lookup(name) {
            "pure" => Some(Mutability::Pure),
            "view" => Some(Mutability::View),
            "nonpayable" => Some(Mutability::Nonpayable),
            "payable" => Some(Mutability::Payable),
            _ => None,
        }
    }

    // ===== constant =====

    /// `NAME: constant(type) = value`
    fn parse_constant(&mut self) -> Result<ConstantDecl, ParseError> {
        let (name, name_span) = self.cursor.expect_ident()?;
        self.cursor.expect(&TokenKind::Colon)?;
        if !self.cursor.check(&TokenKind::Constant) {
            return Err(ParseError::new(
                ErrorCode::E1005,
                "module-level declarations of this form must be `constant(type)`",
                self.cursor.current_span(),
            )
            .with_context("expected `constant`"));
        }
        self.cursor.advance();
        let open = self.cursor.expect(&TokenKind::LParen)?;
        let ty = self.parse_type()?;
        self.cursor.expect_closing(&TokenKind::RParen, open)?;
        self.cursor.expect(&TokenKind::Eq)?;
        let value = self.parse_expr()?;
        let span = self.span_from(name_span);
        self.expect_line_end()?;
        Ok(ConstantDecl {
            name,
            name_span,
            ty,
            value,
            span,
        })
    }

    // ===== function =====

    fn parse_function(&mut self) -> Result<FunctionDecl, ParseError> {
        let start = self.cursor.current_span();
        let decorators = self.parse_decorators()?;
        self.cursor.expect(&TokenKind::Def)?;
        let (name, name_span) = self.cursor.expect_ident()?;
        let params = self.parse_params()?;
        let ret = self.parse_return_type()?;
        self.cursor.expect(&TokenKind::Colon)?;
        let body = self.parse_block(Self::parse_stmt)?;
        if body.is_empty() {
            return Err(ParseError::new(
                ErrorCode::E1005,
                "function body must contain at least one statement",
                name_span,
            )
            .with_context("expected an indented block"));
        }
        Ok(FunctionDecl {
            name,
            name_span,
            decorators,
            params,
            ret,
            body,
            span: self.span_from(start),
        })
    }

    /// `@name` lines before `def`.
    fn parse_decorators(&mut self) -> Result<Vec<(Decorator, Span)>, ParseError> {
        let mut decorators = Vec::new();
        while let Some(at) = self.cursor.eat(&TokenKind::At) {
            let (name, name_span) = self.cursor.expect_ident()?;
            let span = at.merge(name_span);
            let decorator = match &*self.cursor.interner().lookup(name) {
                "external" => Decorator::Visibility(Visibility::External),
                "internal" => Decorator::Visibility(Visibility::Internal),
                other => match self.mutability_from_name(name) {
                    Some(m) => Decorator::Mutability(m),
                    None => {
                        return Err(ParseError::new(
                            ErrorCode::E1006,
                            format!("unknown decorator `@{other}`"),
                            span,
                        ))
                    }
                },
            };
            self.expect_line_end()?;
            decorators.push((decorator, span));
        }
        Ok(decorators)
    }

    /// `(name: type, ...)`
    fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        let open = self.cursor.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.cursor.check(&TokenKind::RParen) {
            let (name, start) = self.cursor.expect_ident()?;
            self.cursor.expect(&TokenKind::Colon)?;
            let ty = self.parse_type()?;
            params.push(Param {
                name,
                ty,
                span: start.merge(ty.span),
            });
            if self.cursor.eat(&TokenKind::Comma).is_none() {
                break;
            }
        }
        self.cursor.expect_closing(&TokenKind::RParen, open)?;
        Ok(params)
    }

    fn parse_return_type(&mut self) -> Result<Option<TypeExpr>, ParseError> {
        if self.cursor.eat(&TokenKind::Arrow).is_some() {
            self.parse_type().map(Some)
        } else {
            Ok(None)
        }
    }
}
