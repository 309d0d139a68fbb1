//! This lexer tokenizes VM bytecode text.
//!
//! Words are runs of letters, classified after the fact into commands,
//! memory segments or plain symbols. All keywords are reserved words,
//! so no lookahead is needed to tell them apart.
use std::fmt;

use crate::error::{Error, Result};

/// Command keywords of the VM language that a letters-only word can
/// spell, supported or not. `if-goto` stops at `-` and never gets here.
pub const COMMANDS: &[&str] = &[
    "add", "sub", "neg", "eq", "gt", "lt", "and", "or", "not",
    "push", "pop",
    "label", "goto",
    "function", "call", "return",
];

pub const SEGMENTS: &[&str] = &[
    "argument", "local", "static", "constant", "this", "that", "pointer", "temp",
];

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TokenKind {
    Command,
    MemorySegment,
    Symbol,
    Integer,
    Eol,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            TokenKind::Command => "COMMAND",
            TokenKind::MemorySegment => "MEMORY_SEGMENT",
            TokenKind::Symbol => "SYMBOL",
            TokenKind::Integer => "INTEGER",
            TokenKind::Eol => "EOL",
            TokenKind::Eof => "EOF",
        };
        write!(f, "{}", name)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            TokenKind::Eol | TokenKind::Eof => {
                write!(f, "Token({}, line {}, column {})", self.kind, self.line, self.column)
            }
            _ => write!(
                f,
                "Token({}, '{}', line {}, column {})",
                self.kind, self.text, self.line, self.column
            ),
        }
    }
}

fn classify(word: &str) -> TokenKind {
    if COMMANDS.contains(&word) {
        TokenKind::Command
    } else if SEGMENTS.contains(&word) {
        TokenKind::MemorySegment
    } else {
        TokenKind::Symbol
    }
}

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer { chars: source.chars().collect(), pos: 0, line: 1, column: 1 }
    }

    pub fn next_token(&mut self) -> Result<Token> {
        while let Some(c) = self.current() {
            let (line, column) = (self.line, self.column);

            if c == '\n' {
                self.advance();
                return Ok(self.token(TokenKind::Eol, "\n".to_string(), line, column));
            }

            if c.is_whitespace() {
                self.advance();
                continue;
            }

            if c == '/' && self.peek(1) == Some('/') {
                while self.current().map_or(false, |c| c != '\n') {
                    self.advance();
                }
                continue;
            }

            if c.is_ascii_digit() {
                let text = self.take_while(|c| c.is_ascii_digit());
                return Ok(self.token(TokenKind::Integer, text, line, column));
            }

            if c.is_ascii_alphabetic() {
                let text = self.take_while(|c| c.is_ascii_alphabetic());
                return Ok(self.token(classify(&text), text, line, column));
            }

            return Err(Error::Lexer { ch: c, line, column });
        }

        Ok(self.token(TokenKind::Eof, String::new(), self.line, self.column))
    }

    fn token(&self, kind: TokenKind, text: String, line: usize, column: usize) -> Token {
        Token { kind, text, line, column }
    }

    fn take_while<F: Fn(char) -> bool>(&mut self, pred: F) -> String {
        let mut sb = String::new();
        while let Some(c) = self.current() {
            if !pred(c) {
                break;
            }
            sb.push(c);
            self.advance();
        }
        sb
    }

    #[inline]
    fn current(&self) -> Option<char> {
        self.peek(0)
    }

    #[inline]
    fn peek(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).copied()
    }

    fn advance(&mut self) {
        if let Some(c) = self.current() {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }
}
