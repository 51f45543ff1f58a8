use std::fmt;
use std::str::CharIndices;

use itertools::peek_nth;
use itertools::PeekNth;

use crate::lang::{Literal, Token, TokenType};
use crate::report::Reporter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexicalError {
    UnexpectedCharacter { line: usize, character: char },
    UnterminatedString { line: usize },
}

impl LexicalError {
    pub fn line(&self) -> usize {
        match self {
            LexicalError::UnexpectedCharacter { line, .. } => *line,
            LexicalError::UnterminatedString { line } => *line,
        }
    }
}

impl fmt::Display for LexicalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexicalError::UnexpectedCharacter { character, .. } => {
                write!(f, "Unexpected character '{character}'.")
            }
            LexicalError::UnterminatedString { .. } => write!(f, "Unterminated string."),
        }
    }
}

/// Scans `source` with a fresh scanner and returns every token, the last
/// one always being `Eof`.
pub fn scan_tokens<R: Reporter>(source: &str, reporter: &mut R) -> Vec<Token> {
    Scanner::new(source, reporter).scan()
}

pub struct Scanner<'a, R: Reporter> {
    source: &'a str,
    input: PeekNth<CharIndices<'a>>,
    reporter: &'a mut R,
    tokens: Vec<Token>,
    // byte offsets into source
    start: usize,
    current: usize,
    line: usize,
    start_line: usize,
}

/// Scanner is responsible for reading a string and returning
/// all tokens from it. If there is an error, it is handed to the
/// reporter and scanning goes on with the next character, so a
/// single pass surfaces every lexical error in the source.
impl<'a, R: Reporter> Scanner<'a, R> {
    pub fn new(source: &'a str, reporter: &'a mut R) -> Self {
        Self {
            source,
            input: peek_nth(source.char_indices()),
            reporter,
            tokens: vec![],
            start: 0,
            current: 0,
            line: 1,
            start_line: 1,
        }
    }

    pub fn scan(mut self) -> Vec<Token> {
        loop {
            self.start = self.current;
            self.start_line = self.line;
            match self.advance() {
                Some(c) => self.scan_token(c),
                None => break,
            }
        }
        self.tokens.push(Token::eof(self.line));
        self.tokens
    }

    fn scan_token(&mut self, c: char) {
        match c {
            '(' => self.add_token(TokenType::LeftParen),
            ')' => self.add_token(TokenType::RightParen),
            '{' => self.add_token(TokenType::LeftBrace),
            '}' => self.add_token(TokenType::RightBrace),
            ',' => self.add_token(TokenType::Comma),
            '.' => self.add_token(TokenType::Dot),
            '-' => self.add_token(TokenType::Minus),
            '+' => self.add_token(TokenType::Plus),
            ';' => self.add_token(TokenType::SemiColon),
            '*' => self.add_token(TokenType::Star),
            '!' if self.advance_if_match('=') => self.add_token(TokenType::BangEqual),
            '!' => self.add_token(TokenType::Bang),
            '=' if self.advance_if_match('=') => self.add_token(TokenType::EqualEqual),
            '=' => self.add_token(TokenType::Equal),
            '<' if self.advance_if_match('=') => self.add_token(TokenType::LessEqual),
            '<' => self.add_token(TokenType::Less),
            '>' if self.advance_if_match('=') => self.add_token(TokenType::GreaterEqual),
            '>' => self.add_token(TokenType::Greater),
            '/' if self.advance_if_match('/') => self.comment(),
            '/' => self.add_token(TokenType::Slash),
            '"' => self.text(),
            ' ' | '\r' | '\t' => {}
            '\n' => self.line += 1,
            c if c.is_ascii_digit() => self.number(),
            c if c.is_ascii_alphabetic() || c == '_' => self.identifier(),
            character => self.error(LexicalError::UnexpectedCharacter {
                line: self.line,
                character,
            }),
        }
    }

    // the comment is valid until the end of the line, the newline
    // itself is left for the main loop to count.
    fn comment(&mut self) {
        while self.peek().is_some_and(|c| c != '\n') {
            self.advance();
        }
    }

    fn text(&mut self) {
        while let Some(c) = self.peek() {
            if c == '"' {
                break;
            }
            if c == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        if !self.advance_if_match('"') {
            self.error(LexicalError::UnterminatedString { line: self.line });
            return;
        }

        let value = &self.source[self.start + 1..self.current - 1];
        self.add_literal(TokenType::Text, Literal::Text(value.to_owned()));
    }

    fn number(&mut self) {
        self.digits();

        // a dot only belongs to the number when a digit follows it
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            self.digits();
        }

        // digits with at most one dot always parse, huge runs become inf
        let value = self.lexeme().parse().unwrap_or(f64::INFINITY);
        self.add_literal(TokenType::Number, Literal::Number(value));
    }

    fn digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn identifier(&mut self) {
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance();
        }

        let kind = TokenType::keyword(self.lexeme()).unwrap_or(TokenType::Identifier);
        self.add_token(kind);
    }

    fn error(&mut self, error: LexicalError) {
        self.reporter.error(error.line(), &error.to_string());
    }

    fn lexeme(&self) -> &'a str {
        &self.source[self.start..self.current]
    }

    fn add_token(&mut self, kind: TokenType) {
        self.add_literal(kind, Literal::Absent);
    }

    fn add_literal(&mut self, kind: TokenType, literal: Literal) {
        let token = Token::new(kind, self.lexeme(), literal, self.start_line);
        self.tokens.push(token);
    }

    // peek the next char without consuming it.
    fn peek(&mut self) -> Option<char> {
        self.input.peek().map(|&(_, c)| c)
    }

    // peek the char right after the next one.
    fn peek_next(&mut self) -> Option<char> {
        self.input.peek_nth(1).map(|&(_, c)| c)
    }

    fn advance(&mut self) -> Option<char> {
        let (offset, c) = self.input.next()?;
        self.current = offset + c.len_utf8();
        Some(c)
    }

    // only consumes char if it matches the expected value.
    fn advance_if_match(&mut self, expected: char) -> bool {
        match self.peek() {
            Some(c) if c == expected => {
                self.advance();
                true
            }
            _ => false,
        }
    }
}
