//! Recursive-descent parser for the JavaScript subset found in fluent
//! browser-test suites: call/member chains, arrow and function callbacks,
//! object/array literals, and the control flow the walker needs to keep.
//!
//! Control-flow conditions and loop headers are never interpreted, so they
//! are captured by bracket matching and carried as verbatim text.

use crate::ast::{Expr, ExprKind, Program, Property, Stmt};
use crate::token::{Lexer, Token, TokenKind};
use crate::ParseError;

pub fn parse(src: &str) -> Result<Program, ParseError> {
    let tokens = Lexer::new(src).tokenize()?;
    Parser::new(src, tokens).parse_program()
}

/// Parses a single expression (used by tests and the REPL-style tooling).
pub fn parse_expr(src: &str) -> Result<Expr, ParseError> {
    let tokens = Lexer::new(src).tokenize()?;
    let mut parser = Parser::new(src, tokens);
    let expr = parser.expression()?;
    parser.expect_end()?;
    Ok(expr)
}

struct Parser<'a> {
    src: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str, tokens: Vec<Token>) -> Self {
        Self {
            src,
            tokens,
            pos: 0,
        }
    }

    fn parse_program(mut self) -> Result<Program, ParseError> {
        let mut body = Vec::new();
        while !self.at_end() {
            body.push(self.statement()?);
        }
        Ok(Program { body })
    }

    // --- token stream helpers ---

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    fn peek_at(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| &t.kind)
    }

    fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn line(&self) -> usize {
        self.peek()
            .or_else(|| self.tokens.last())
            .map(|t| t.line)
            .unwrap_or(1)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek_kind() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<(), ParseError> {
        if self.eat(&kind) {
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_end(&self) -> Result<(), ParseError> {
        if self.at_end() {
            Ok(())
        } else {
            Err(self.unexpected("end of input"))
        }
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        match self.peek() {
            Some(token) => ParseError::UnexpectedToken {
                line: token.line,
                found: self.src[token.start..token.end].to_string(),
                expected,
            },
            None => ParseError::UnexpectedEof { expected },
        }
    }

    /// Source text from the first token at `start` through the last
    /// consumed token.
    fn text_since(&self, start: usize) -> String {
        if start >= self.pos || start >= self.tokens.len() {
            return String::new();
        }
        let from = self.tokens[start].start;
        let to = self.tokens[self.pos - 1].end;
        self.src[from..to].to_string()
    }

    fn finish(&self, start: usize, kind: ExprKind) -> Expr {
        Expr {
            kind,
            text: self.text_since(start),
        }
    }

    // --- statements ---

    fn statement(&mut self) -> Result<Stmt, ParseError> {
        match self.peek_kind() {
            Some(TokenKind::Semicolon) => {
                self.advance();
                Ok(Stmt::Empty)
            }
            Some(TokenKind::LBrace) => Ok(Stmt::Block(self.block()?)),
            Some(TokenKind::If) => self.if_statement(),
            Some(TokenKind::For) | Some(TokenKind::While) => self.loop_statement(),
            Some(TokenKind::Function) => self.function_declaration(),
            Some(TokenKind::Const) | Some(TokenKind::Let) | Some(TokenKind::Var) => {
                self.declaration()
            }
            Some(TokenKind::Return) => {
                self.advance();
                let value = match self.peek_kind() {
                    None | Some(TokenKind::Semicolon) | Some(TokenKind::RBrace) => None,
                    _ => Some(self.expression()?),
                };
                self.eat(&TokenKind::Semicolon);
                Ok(Stmt::Return(value))
            }
            Some(_) => {
                let expr = self.expression()?;
                self.eat(&TokenKind::Semicolon);
                Ok(Stmt::Expr(expr))
            }
            None => Err(self.unexpected("statement")),
        }
    }

    fn block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.expect(TokenKind::LBrace, "'{'")?;
        let mut body = Vec::new();
        while !matches!(self.peek_kind(), Some(TokenKind::RBrace) | None) {
            body.push(self.statement()?);
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(body)
    }

    /// A block if braced, otherwise a single statement.
    fn branch(&mut self) -> Result<Vec<Stmt>, ParseError> {
        if matches!(self.peek_kind(), Some(TokenKind::LBrace)) {
            self.block()
        } else {
            Ok(vec![self.statement()?])
        }
    }

    fn if_statement(&mut self) -> Result<Stmt, ParseError> {
        self.advance(); // `if`
        let condition = self.parenthesized_raw()?;
        let then_branch = self.branch()?;
        let else_branch = if self.eat(&TokenKind::Else) {
            Some(self.branch()?)
        } else {
            None
        };
        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn loop_statement(&mut self) -> Result<Stmt, ParseError> {
        let start = self.pos;
        self.advance(); // `for` / `while`
        self.skip_parenthesized()?;
        let header = self.text_since(start);
        let body = self.branch()?;
        Ok(Stmt::Loop { header, body })
    }

    /// Captures a parenthesized region as a raw expression without
    /// interpreting it.
    fn parenthesized_raw(&mut self) -> Result<Expr, ParseError> {
        if !matches!(self.peek_kind(), Some(TokenKind::LParen)) {
            return Err(self.unexpected("'('"));
        }
        let inner_start = self.pos + 1;
        self.skip_parenthesized()?;
        // Text between the parens, not including them.
        let text = if inner_start < self.pos - 1 {
            let from = self.tokens[inner_start].start;
            let to = self.tokens[self.pos - 2].end;
            self.src[from..to].to_string()
        } else {
            String::new()
        };
        Ok(Expr {
            kind: ExprKind::Raw,
            text,
        })
    }

    fn skip_parenthesized(&mut self) -> Result<(), ParseError> {
        self.expect(TokenKind::LParen, "'('")?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.advance().map(|t| &t.kind) {
                Some(TokenKind::LParen) => depth += 1,
                Some(TokenKind::RParen) => depth -= 1,
                Some(_) => {}
                None => return Err(ParseError::UnexpectedEof { expected: "')'" }),
            }
        }
        Ok(())
    }

    fn function_declaration(&mut self) -> Result<Stmt, ParseError> {
        let start = self.pos;
        let init = self.function_expression()?;
        self.eat(&TokenKind::Semicolon);
        Ok(Stmt::Decl {
            text: self.text_since(start),
            init: Some(init),
        })
    }

    fn declaration(&mut self) -> Result<Stmt, ParseError> {
        let start = self.pos;
        self.advance(); // const / let / var
        // Binding target is carried as text only; destructuring included.
        while !matches!(
            self.peek_kind(),
            Some(TokenKind::Op(op)) if op == "="
        ) {
            match self.peek_kind() {
                None | Some(TokenKind::Semicolon) => {
                    self.eat(&TokenKind::Semicolon);
                    return Ok(Stmt::Decl {
                        text: self.text_since(start),
                        init: None,
                    });
                }
                _ => {
                    self.advance();
                }
            }
        }
        self.advance(); // `=`
        let init = self.expression()?;
        self.eat(&TokenKind::Semicolon);
        Ok(Stmt::Decl {
            text: self.text_since(start),
            init: Some(init),
        })
    }

    // --- expressions ---

    fn expression(&mut self) -> Result<Expr, ParseError> {
        let start = self.pos;
        let left = self.ternary()?;
        if let Some(TokenKind::Op(op)) = self.peek_kind() {
            if matches!(op.as_str(), "=" | "+=" | "-=" | "*=" | "/=") {
                self.advance();
                let value = self.expression()?;
                return Ok(self.finish(
                    start,
                    ExprKind::Assign {
                        target: Box::new(left),
                        value: Box::new(value),
                    },
                ));
            }
        }
        Ok(left)
    }

    fn ternary(&mut self) -> Result<Expr, ParseError> {
        let start = self.pos;
        let cond = self.binary(0)?;
        if matches!(self.peek_kind(), Some(TokenKind::Op(op)) if op == "?") {
            self.advance();
            self.expression()?;
            self.expect(TokenKind::Colon, "':'")?;
            self.expression()?;
            return Ok(self.finish(start, ExprKind::Raw));
        }
        Ok(cond)
    }

    fn binary(&mut self, min_prec: u8) -> Result<Expr, ParseError> {
        let start = self.pos;
        let mut left = self.unary()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Op(op)) => op.clone(),
                _ => break,
            };
            let prec = match op.as_str() {
                "||" => 1,
                "&&" => 2,
                "==" | "!=" | "===" | "!==" => 3,
                "<" | ">" | "<=" | ">=" => 4,
                "+" | "-" => 5,
                "*" | "/" | "%" => 6,
                _ => break,
            };
            if prec < min_prec {
                break;
            }
            self.advance();
            let right = self.binary(prec + 1)?;
            left = self.finish(
                start,
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
            );
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        let start = self.pos;
        if let Some(TokenKind::Op(op)) = self.peek_kind() {
            if matches!(op.as_str(), "!" | "-" | "+" | "~" | "++" | "--") {
                let op = op.clone();
                self.advance();
                let operand = self.unary()?;
                return Ok(self.finish(
                    start,
                    ExprKind::Unary {
                        op,
                        operand: Box::new(operand),
                    },
                ));
            }
        }
        self.postfix()
    }

    fn postfix(&mut self) -> Result<Expr, ParseError> {
        let start = self.pos;
        let mut expr = self.primary()?;
        loop {
            match self.peek_kind() {
                Some(TokenKind::Dot) => {
                    self.advance();
                    let property = self.property_name()?;
                    expr = self.finish(
                        start,
                        ExprKind::Member {
                            object: Box::new(expr),
                            property,
                        },
                    );
                }
                Some(TokenKind::LParen) => {
                    let args = self.arguments()?;
                    expr = self.finish(
                        start,
                        ExprKind::Call {
                            callee: Box::new(expr),
                            args,
                        },
                    );
                }
                Some(TokenKind::LBracket) => {
                    self.advance();
                    let index = self.expression()?;
                    self.expect(TokenKind::RBracket, "']'")?;
                    expr = self.finish(
                        start,
                        ExprKind::Index {
                            object: Box::new(expr),
                            index: Box::new(index),
                        },
                    );
                }
                Some(TokenKind::Op(op)) if op == "++" || op == "--" => {
                    let op = op.clone();
                    self.advance();
                    expr = self.finish(
                        start,
                        ExprKind::Unary {
                            op,
                            operand: Box::new(expr),
                        },
                    );
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect(TokenKind::LParen, "'('")?;
        let mut args = Vec::new();
        if self.eat(&TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.expression()?);
            if self.eat(&TokenKind::Comma) {
                continue;
            }
            self.expect(TokenKind::RParen, "')'")?;
            return Ok(args);
        }
    }

    fn property_name(&mut self) -> Result<String, ParseError> {
        let name = match self.peek_kind() {
            Some(TokenKind::Ident(name)) => name.clone(),
            // Keywords are valid property names in member position.
            Some(TokenKind::If) => "if".to_string(),
            Some(TokenKind::Else) => "else".to_string(),
            Some(TokenKind::For) => "for".to_string(),
            Some(TokenKind::While) => "while".to_string(),
            Some(TokenKind::Function) => "function".to_string(),
            Some(TokenKind::Return) => "return".to_string(),
            Some(TokenKind::Const) => "const".to_string(),
            Some(TokenKind::Let) => "let".to_string(),
            Some(TokenKind::Var) => "var".to_string(),
            _ => return Err(self.unexpected("property name")),
        };
        self.advance();
        Ok(name)
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let start = self.pos;
        match self.peek_kind() {
            Some(TokenKind::Ident(name)) => {
                if matches!(self.peek_at(1), Some(TokenKind::Arrow)) {
                    let param = name.clone();
                    self.advance();
                    self.advance(); // `=>`
                    let body = self.arrow_body()?;
                    return Ok(self.finish(
                        start,
                        ExprKind::Function {
                            params: vec![param],
                            body,
                        },
                    ));
                }
                let kind = match name.as_str() {
                    "true" => ExprKind::Bool(true),
                    "false" => ExprKind::Bool(false),
                    "null" => ExprKind::Null,
                    _ => ExprKind::Ident(name.clone()),
                };
                self.advance();
                Ok(self.finish(start, kind))
            }
            Some(TokenKind::Number(n)) => {
                let kind = ExprKind::Number(n.clone());
                self.advance();
                Ok(self.finish(start, kind))
            }
            Some(TokenKind::Str(s)) => {
                let kind = ExprKind::Str(s.clone());
                self.advance();
                Ok(self.finish(start, kind))
            }
            Some(TokenKind::Template(raw)) => {
                let kind = ExprKind::Template(raw.clone());
                self.advance();
                Ok(self.finish(start, kind))
            }
            Some(TokenKind::LParen) => {
                if self.arrow_ahead() {
                    let params = self.parameters()?;
                    self.expect(TokenKind::Arrow, "'=>'")?;
                    let body = self.arrow_body()?;
                    return Ok(self.finish(start, ExprKind::Function { params, body }));
                }
                self.advance();
                let inner = self.expression()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(self.finish(start, inner.kind))
            }
            Some(TokenKind::LBrace) => self.object_literal(),
            Some(TokenKind::LBracket) => self.array_literal(),
            Some(TokenKind::Function) => self.function_expression(),
            _ => Err(self.unexpected("expression")),
        }
    }

    /// True when the parenthesized group starting here is an arrow
    /// parameter list.
    fn arrow_ahead(&self) -> bool {
        let mut depth = 0usize;
        let mut i = self.pos;
        while let Some(token) = self.tokens.get(i) {
            match token.kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return matches!(
                            self.tokens.get(i + 1).map(|t| &t.kind),
                            Some(TokenKind::Arrow)
                        );
                    }
                }
                _ => {}
            }
            i += 1;
        }
        false
    }

    fn parameters(&mut self) -> Result<Vec<String>, ParseError> {
        self.expect(TokenKind::LParen, "'('")?;
        let mut params = Vec::new();
        if self.eat(&TokenKind::RParen) {
            return Ok(params);
        }
        loop {
            match self.peek_kind() {
                Some(TokenKind::Ident(name)) => {
                    params.push(name.clone());
                    self.advance();
                }
                _ => return Err(self.unexpected("parameter name")),
            }
            if self.eat(&TokenKind::Comma) {
                continue;
            }
            self.expect(TokenKind::RParen, "')'")?;
            return Ok(params);
        }
    }

    fn arrow_body(&mut self) -> Result<Vec<Stmt>, ParseError> {
        if matches!(self.peek_kind(), Some(TokenKind::LBrace)) {
            self.block()
        } else {
            // Expression-bodied arrow; the walker treats it as one statement.
            Ok(vec![Stmt::Expr(self.expression()?)])
        }
    }

    fn function_expression(&mut self) -> Result<Expr, ParseError> {
        let start = self.pos;
        self.expect(TokenKind::Function, "'function'")?;
        if let Some(TokenKind::Ident(_)) = self.peek_kind() {
            self.advance(); // optional name
        }
        let params = self.parameters()?;
        let body = self.block()?;
        Ok(self.finish(start, ExprKind::Function { params, body }))
    }

    fn object_literal(&mut self) -> Result<Expr, ParseError> {
        let start = self.pos;
        self.expect(TokenKind::LBrace, "'{'")?;
        let mut properties = Vec::new();
        if self.eat(&TokenKind::RBrace) {
            return Ok(self.finish(start, ExprKind::Object(properties)));
        }
        loop {
            let key_start = self.pos;
            let key = match self.peek_kind() {
                Some(TokenKind::Ident(name)) => {
                    let kind = ExprKind::Ident(name.clone());
                    self.advance();
                    self.finish(key_start, kind)
                }
                Some(TokenKind::Str(s)) => {
                    let kind = ExprKind::Str(s.clone());
                    self.advance();
                    self.finish(key_start, kind)
                }
                Some(TokenKind::Number(n)) => {
                    let kind = ExprKind::Number(n.clone());
                    self.advance();
                    self.finish(key_start, kind)
                }
                _ => return Err(self.unexpected("property key")),
            };
            let value = if self.eat(&TokenKind::Colon) {
                self.expression()?
            } else {
                // Shorthand `{ name }`.
                key.clone()
            };
            properties.push(Property { key, value });
            if self.eat(&TokenKind::Comma) {
                if self.eat(&TokenKind::RBrace) {
                    break; // trailing comma
                }
                continue;
            }
            self.expect(TokenKind::RBrace, "'}'")?;
            break;
        }
        Ok(self.finish(start, ExprKind::Object(properties)))
    }

    fn array_literal(&mut self) -> Result<Expr, ParseError> {
        let start = self.pos;
        self.expect(TokenKind::LBracket, "'['")?;
        let mut elements = Vec::new();
        if self.eat(&TokenKind::RBracket) {
            return Ok(self.finish(start, ExprKind::Array(elements)));
        }
        loop {
            elements.push(self.expression()?);
            if self.eat(&TokenKind::Comma) {
                if self.eat(&TokenKind::RBracket) {
                    break;
                }
                continue;
            }
            self.expect(TokenKind::RBracket, "']'")?;
            break;
        }
        Ok(self.finish(start, ExprKind::Array(elements)))
    }
}
