//! Recursive descent parser for the grammar in spec.md §4.1:
//!
//! ```text
//! ari        := "ari:" ssp  |  ssp
//! ssp        := literal  |  ident  |  ident "(" [paramlist] ")"
//! literal    := litvalue  |  TYPENAME "." litvalue
//! litvalue   := BOOL | INT | FLOAT | TSTR | BSTR
//! paramlist  := paramitem ("," paramitem)*
//! paramitem  := ari | "[" [aclist] "]" | "(" TYPENAME ")" "[" aclist "]"
//! aclist     := ari ("," ari)*
//! ident      := "/" [nsid] "/" TYPENAME "." objid
//! nsid       := INT | NAME
//! objid      := BSTR | NAME
//! ```
//!
//! Grounded in `original_source/src/ace/ari_text/parsemod.py`; the shape is
//! kept identical but recast from PLY productions into ordinary recursive
//! descent over [`super::lexer::Token`]s.

use super::error::TextError;
use super::lexer::{Token, TokenKind};
use crate::ari::{Ac, Ari, Expr, Identity, Literal, LiteralAri, Name, Namespace, Param, ReferenceAri};

pub struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    source: &'a str,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, source: &'a str) -> Self {
        Self {
            tokens,
            pos: 0,
            source,
        }
    }

    /// Parse a full `ari` production and require the token stream to be
    /// exhausted afterwards.
    pub fn parse_top(&mut self) -> Result<Ari, TextError> {
        let value = self.parse_ari_value()?;
        if !matches!(self.peek().kind, TokenKind::Eof) {
            return Err(self.error("unexpected trailing input"));
        }
        Ok(value)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn error(&self, message: impl Into<String>) -> TextError {
        TextError::new(message, self.peek().position, self.source)
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<Token, TextError> {
        if std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(format!(
                "expected {kind:?}, found {:?}",
                self.peek().kind
            )))
        }
    }

    /// `ari := "ari:" ssp | ssp`
    fn parse_ari_value(&mut self) -> Result<Ari, TextError> {
        if matches!(self.peek().kind, TokenKind::AriPrefix) {
            self.advance();
        }
        self.parse_ssp()
    }

    /// `ssp := literal | ident | ident "(" [paramlist] ")"`
    fn parse_ssp(&mut self) -> Result<Ari, TextError> {
        if matches!(self.peek().kind, TokenKind::Slash) {
            let ident = self.parse_ident()?;
            let params = if matches!(self.peek().kind, TokenKind::LParen) {
                self.advance();
                let list = if matches!(self.peek().kind, TokenKind::RParen) {
                    Vec::new()
                } else {
                    self.parse_paramlist()?
                };
                self.expect(&TokenKind::RParen)?;
                Some(list)
            } else {
                None
            };
            Ok(Ari::Reference(ReferenceAri { ident, params }))
        } else {
            self.parse_literal()
        }
    }

    /// `ident := "/" [nsid] "/" TYPENAME "." objid`
    fn parse_ident(&mut self) -> Result<Identity, TextError> {
        self.expect(&TokenKind::Slash)?;

        let namespace = if matches!(self.peek().kind, TokenKind::Slash) {
            None
        } else {
            Some(self.parse_nsid()?)
        };

        self.expect(&TokenKind::Slash)?;

        let type_enum = match self.advance().kind {
            TokenKind::TypeDot(t) => t,
            other => return Err(self.error(format!("expected TYPE., found {other:?}"))),
        };

        let name = self.parse_objid()?;

        Ok(Identity {
            namespace,
            type_enum,
            name,
            issuer: None,
            tag: None,
        })
    }

    /// `nsid := INT | NAME`
    fn parse_nsid(&mut self) -> Result<Namespace, TextError> {
        match self.advance().kind {
            TokenKind::Int(v) => Ok(Namespace::Text(v.to_string())),
            TokenKind::Name(s) => Ok(Namespace::Text(s)),
            other => Err(self.error(format!("expected namespace (INT or NAME), found {other:?}"))),
        }
    }

    /// `objid := BSTR | NAME`
    fn parse_objid(&mut self) -> Result<Name, TextError> {
        match self.advance().kind {
            TokenKind::Bytes(b) => Ok(Name::Bytes(b)),
            TokenKind::Name(s) => Ok(Name::Text(s)),
            other => Err(self.error(format!("expected object name (BSTR or NAME), found {other:?}"))),
        }
    }

    /// `literal := litvalue | TYPENAME "." litvalue`
    fn parse_literal(&mut self) -> Result<Ari, TextError> {
        if let TokenKind::TypeDot(t) = self.peek().kind {
            self.advance();
            let value = self.parse_litvalue()?;
            let lit = LiteralAri {
                type_enum: t,
                value,
            };
            lit.check_type()
                .map_err(|e| self.error(e.to_string()))?;
            return Ok(Ari::Literal(lit));
        }

        let (type_enum, value) = match self.advance().kind {
            TokenKind::Bool(b) => (crate::ari::StructType::Bool, Literal::Bool(b)),
            TokenKind::Int(i) => (crate::ari::StructType::Vast, Literal::Int(i)),
            TokenKind::Float(f) => (crate::ari::StructType::Real64, Literal::Float(f)),
            TokenKind::Text(s) => (crate::ari::StructType::Str, Literal::Text(s)),
            TokenKind::Bytes(b) => (crate::ari::StructType::Bstr, Literal::Bytes(b)),
            other => return Err(self.error(format!("expected a literal value, found {other:?}"))),
        };
        Ok(Ari::Literal(LiteralAri { type_enum, value }))
    }

    /// `litvalue := BOOL | INT | FLOAT | TSTR | BSTR`
    fn parse_litvalue(&mut self) -> Result<Literal, TextError> {
        match self.advance().kind {
            TokenKind::Bool(b) => Ok(Literal::Bool(b)),
            TokenKind::Int(i) => Ok(Literal::Int(i)),
            TokenKind::Float(f) => Ok(Literal::Float(f)),
            TokenKind::Text(s) => Ok(Literal::Text(s)),
            TokenKind::Bytes(b) => Ok(Literal::Bytes(b)),
            other => Err(self.error(format!("expected a literal value, found {other:?}"))),
        }
    }

    /// `paramlist := paramitem ("," paramitem)*`
    fn parse_paramlist(&mut self) -> Result<Vec<Param>, TextError> {
        let mut items = vec![self.parse_paramitem()?];
        while matches!(self.peek().kind, TokenKind::Comma) {
            self.advance();
            items.push(self.parse_paramitem()?);
        }
        Ok(items)
    }

    /// `paramitem := ari | "[" [aclist] "]" | "(" TYPENAME ")" "[" aclist "]"`
    fn parse_paramitem(&mut self) -> Result<Param, TextError> {
        match self.peek().kind {
            TokenKind::LBracket => {
                self.advance();
                let items = if matches!(self.peek().kind, TokenKind::RBracket) {
                    Vec::new()
                } else {
                    self.parse_aclist()?
                };
                self.expect(&TokenKind::RBracket)?;
                Ok(Param::Ac(Ac { items }))
            }
            TokenKind::TypeName(t) => {
                self.advance();
                self.expect(&TokenKind::LBracket)?;
                let items = if matches!(self.peek().kind, TokenKind::RBracket) {
                    Vec::new()
                } else {
                    self.parse_aclist()?
                };
                self.expect(&TokenKind::RBracket)?;
                Ok(Param::Expr(Expr {
                    type_enum: t,
                    items,
                }))
            }
            _ => Ok(Param::Ari(self.parse_ari_value()?)),
        }
    }

    /// `aclist := ari ("," ari)*`
    fn parse_aclist(&mut self) -> Result<Vec<Param>, TextError> {
        let mut items = vec![Param::Ari(self.parse_ari_value()?)];
        while matches!(self.peek().kind, TokenKind::Comma) {
            self.advance();
            items.push(Param::Ari(self.parse_ari_value()?));
        }
        Ok(items)
    }
}

/// Parse a complete ARI text value.
pub fn parse(input: &str) -> Result<Ari, TextError> {
    let tokens = super::lexer::tokenize(input)?;
    Parser::new(tokens, input).parse_top()
}
