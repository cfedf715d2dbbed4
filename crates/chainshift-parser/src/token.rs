//! Lexer for the JavaScript subset the converter understands.
//!
//! Produces a flat token stream with byte offsets into the source so the
//! parser can recover the exact text of any expression it hands through.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    /// Quoted string content with escapes already processed.
    Str(String),
    /// Template literal inner text, `${...}` markers left intact.
    Template(String),
    /// Numbers are kept as written; nothing downstream does arithmetic.
    Number(String),

    // Keywords the parser dispatches on. Everything else stays Ident.
    If,
    Else,
    For,
    While,
    Function,
    Return,
    Const,
    Let,
    Var,

    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Semicolon,
    Colon,
    /// `=>`
    Arrow,
    /// Any other operator, kept as written (`=`, `===`, `&&`, `++`, ...).
    Op(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
    pub line: usize,
}

pub struct Lexer<'a> {
    src: &'a str,
    chars: Peekable<CharIndices<'a>>,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            chars: src.char_indices().peekable(),
            line: 1,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        let next = self.chars.next();
        if let Some((_, '\n')) = next {
            self.line += 1;
        }
        next
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            match self.peek_char() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') => {
                    // Could be a comment or a division operator.
                    let mut ahead = self.chars.clone();
                    ahead.next();
                    match ahead.peek().map(|&(_, c)| c) {
                        Some('/') => {
                            while let Some(c) = self.peek_char() {
                                if c == '\n' {
                                    break;
                                }
                                self.bump();
                            }
                        }
                        Some('*') => {
                            let start_line = self.line;
                            self.bump();
                            self.bump();
                            let mut closed = false;
                            while let Some((_, c)) = self.bump() {
                                if c == '*' && self.peek_char() == Some('/') {
                                    self.bump();
                                    closed = true;
                                    break;
                                }
                            }
                            if !closed {
                                return Err(ParseError::UnterminatedComment { line: start_line });
                            }
                        }
                        _ => return Ok(()),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        self.skip_trivia()?;

        let (start, c) = match self.chars.peek() {
            Some(&(i, c)) => (i, c),
            None => return Ok(None),
        };
        let line = self.line;

        if c == '"' || c == '\'' {
            let value = self.lex_quoted(c)?;
            let end = self.offset();
            return Ok(Some(Token {
                kind: TokenKind::Str(value),
                start,
                end,
                line,
            }));
        }

        if c == '`' {
            let raw = self.lex_template()?;
            let end = self.offset();
            return Ok(Some(Token {
                kind: TokenKind::Template(raw),
                start,
                end,
                line,
            }));
        }

        if c.is_ascii_digit() {
            let word = self.consume_while(|c| c.is_ascii_alphanumeric() || c == '.');
            let end = self.offset();
            return Ok(Some(Token {
                kind: TokenKind::Number(word),
                start,
                end,
                line,
            }));
        }

        if c.is_alphabetic() || c == '_' || c == '$' {
            let word = self.consume_while(|c| c.is_alphanumeric() || c == '_' || c == '$');
            let end = self.offset();
            let kind = match word.as_str() {
                "if" => TokenKind::If,
                "else" => TokenKind::Else,
                "for" => TokenKind::For,
                "while" => TokenKind::While,
                "function" => TokenKind::Function,
                "return" => TokenKind::Return,
                "const" => TokenKind::Const,
                "let" => TokenKind::Let,
                "var" => TokenKind::Var,
                _ => TokenKind::Ident(word),
            };
            return Ok(Some(Token {
                kind,
                start,
                end,
                line,
            }));
        }

        self.bump();
        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            '=' => {
                if self.peek_char() == Some('>') {
                    self.bump();
                    TokenKind::Arrow
                } else {
                    TokenKind::Op(self.lex_operator('='))
                }
            }
            '!' | '<' | '>' | '+' | '-' | '*' | '/' | '%' | '&' | '|' | '?' | '~' | '^' => {
                TokenKind::Op(self.lex_operator(c))
            }
            _ => {
                return Err(ParseError::UnexpectedChar { ch: c, line });
            }
        };
        let end = self.offset();
        Ok(Some(Token {
            kind,
            start,
            end,
            line,
        }))
    }

    /// Greedily extends a one-character operator with its legal followers
    /// (`==`, `===`, `&&`, `<=`, `++`, ...).
    fn lex_operator(&mut self, first: char) -> String {
        let mut op = String::new();
        op.push(first);
        loop {
            let next = match self.peek_char() {
                Some(c) => c,
                None => break,
            };
            let extended = matches!(
                (op.as_str(), next),
                ("=", '=')
                    | ("==", '=')
                    | ("!", '=')
                    | ("!=", '=')
                    | ("<", '=')
                    | (">", '=')
                    | ("&", '&')
                    | ("|", '|')
                    | ("+", '+')
                    | ("-", '-')
                    | ("+", '=')
                    | ("-", '=')
                    | ("*", '=')
                    | ("/", '=')
            );
            if !extended {
                break;
            }
            op.push(next);
            self.bump();
        }
        op
    }

    fn lex_quoted(&mut self, quote: char) -> Result<String, ParseError> {
        let start_line = self.line;
        self.bump(); // opening quote
        let mut value = String::new();
        loop {
            match self.bump() {
                Some((_, c)) if c == quote => return Ok(value),
                Some((_, '\\')) => match self.bump() {
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, 'r')) => value.push('\r'),
                    Some((_, c)) => value.push(c),
                    None => return Err(ParseError::UnterminatedString { line: start_line }),
                },
                Some((_, c)) => value.push(c),
                None => return Err(ParseError::UnterminatedString { line: start_line }),
            }
        }
    }

    /// Reads a backtick template, returning the inner text with `${...}`
    /// interpolation markers untouched. Braces inside an interpolation are
    /// balanced so nested object literals survive.
    fn lex_template(&mut self) -> Result<String, ParseError> {
        let start_line = self.line;
        self.bump(); // opening backtick
        let mut raw = String::new();
        loop {
            match self.bump() {
                Some((_, '`')) => return Ok(raw),
                Some((_, '\\')) => {
                    if let Some((_, c)) = self.bump() {
                        raw.push('\\');
                        raw.push(c);
                    }
                }
                Some((_, '$')) if self.peek_char() == Some('{') => {
                    raw.push('$');
                    raw.push('{');
                    self.bump();
                    let mut depth = 1usize;
                    while depth > 0 {
                        match self.bump() {
                            Some((_, '{')) => {
                                depth += 1;
                                raw.push('{');
                            }
                            Some((_, '}')) => {
                                depth -= 1;
                                if depth > 0 {
                                    raw.push('}');
                                }
                            }
                            Some((_, c)) => raw.push(c),
                            None => {
                                return Err(ParseError::UnterminatedString { line: start_line })
                            }
                        }
                    }
                    raw.push('}');
                }
                Some((_, c)) => raw.push(c),
                None => return Err(ParseError::UnterminatedString { line: start_line }),
            }
        }
    }

    fn consume_while<F>(&mut self, predicate: F) -> String
    where
        F: Fn(char) -> bool,
    {
        let mut result = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if predicate(c) {
                result.push(c);
                self.bump();
            } else {
                break;
            }
        }
        result
    }

    /// Current byte offset (one past the last consumed character).
    fn offset(&mut self) -> usize {
        match self.chars.peek() {
            Some(&(i, _)) => i,
            None => self.src.len(),
        }
    }
}
