//! This lexer tokenizes Hack assembly.
//!
//! The lexer is pull based: every call to [`Lexer::next_token`] yields one
//! token, and the final token is always `Eof`. It walks the source once and
//! never rewinds, but may peek arbitrarily far ahead without consuming.
use std::fmt;

use crate::error::{Error, Result};
use super::ast::is_mnemonic;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TokenKind {
    LParen,
    RParen,
    At,
    Equal,
    Semicolon,
    Eol,
    Eof,
    Mnemonic,
    Integer,
    Symbol,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use TokenKind::*;
        let name = match self {
            LParen => "(",
            RParen => ")",
            At => "@",
            Equal => "=",
            Semicolon => ";",
            Eol => "EOL",
            Eof => "EOF",
            Mnemonic => "MNEMONIC",
            Integer => "INTEGER",
            Symbol => "SYMBOL",
        };
        write!(f, "{}", name)
    }
}

/// Tokens carry their source text and the 1-based position they start at.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new<S: Into<String>>(kind: TokenKind, text: S, line: usize, column: usize) -> Self {
        Token { kind, text: text.into(), line, column }
    }
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

/// Characters allowed after the first character of a symbol.
pub fn is_symbol_continuation(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$' | ':')
}

fn is_symbol_start(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '_' | '.' | '$' | ':')
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

    /// Produces the next token. Once the input is exhausted every
    /// further call yields `Eof`.
    pub fn next_token(&mut self) -> Result<Token> {
        while let Some(c) = self.current() {
            let (line, column) = (self.line, self.column);

            if c == '\n' {
                self.advance();
                return Ok(Token::new(TokenKind::Eol, "\n", line, column));
            }

            if c.is_whitespace() {
                self.skip_whitespace();
                continue;
            }

            if c == '/' && self.peek(1) == Some('/') {
                self.skip_comment();
                continue;
            }

            let punct = match c {
                '@' => Some(TokenKind::At),
                '(' => Some(TokenKind::LParen),
                ')' => Some(TokenKind::RParen),
                '=' => Some(TokenKind::Equal),
                ';' => Some(TokenKind::Semicolon),
                _ => None,
            };
            if let Some(kind) = punct {
                self.advance();
                return Ok(Token::new(kind, c.to_string(), line, column));
            }

            if let Some(text) = self.mnemonic() {
                return Ok(Token::new(TokenKind::Mnemonic, text, line, column));
            }

            if c.is_ascii_digit() {
                let text = self.take_while(|c| c.is_ascii_digit());
                return Ok(Token::new(TokenKind::Integer, text, line, column));
            }

            if is_symbol_start(c) {
                let text = self.take_while(is_symbol_continuation);
                return Ok(Token::new(TokenKind::Symbol, text, line, column));
            }

            return Err(Error::Lexer { ch: c, line, column });
        }

        Ok(Token::new(TokenKind::Eof, "", self.line, self.column))
    }

    /// Tries a 3, then 2, then 1 character mnemonic at the current position.
    /// A match only counts when the character after it cannot continue a
    /// symbol, so `ADDRESS` is never split into `AD` + `DRESS`.
    fn mnemonic(&mut self) -> Option<String> {
        for width in (1..=3).rev() {
            let text: String = match (0..width).map(|n| self.peek(n)).collect::<Option<String>>() {
                Some(text) => text,
                None => continue,
            };
            if !is_mnemonic(&text) {
                continue;
            }
            if self.peek(width).map_or(false, is_symbol_continuation) {
                continue;
            }
            for _ in 0..width {
                self.advance();
            }
            return Some(text);
        }
        None
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

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.current() {
            if c == '\n' || !c.is_whitespace() {
                break;
            }
            self.advance();
        }
    }

    fn skip_comment(&mut self) {
        while let Some(c) = self.current() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    #[inline]
    fn current(&self) -> Option<char> {
        self.peek(0)
    }

    /// Looks `n` characters ahead without consuming anything.
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

#[cfg(test)]
mod tests {
    use super::*;
    use super::TokenKind::*;

    /// Lexes a whole source text, including the trailing `Eof`.
    fn tokenize(source: &str) -> Result<Vec<Token>> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let tok = lexer.next_token()?;
            let done = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn kinds(source: &str) -> Vec<(TokenKind, String)> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    fn tok(kind: TokenKind, text: &str) -> (TokenKind, String) {
        (kind, text.to_string())
    }

    #[test]
    fn test_symbol_is_not_split_by_mnemonic_prefix() {
        assert_eq!(kinds("ADDRESS"), vec![tok(Symbol, "ADDRESS"), tok(Eof, "")]);
        assert_eq!(kinds("AMDX"), vec![tok(Symbol, "AMDX"), tok(Eof, "")]);
        assert_eq!(kinds("MD_1"), vec![tok(Symbol, "MD_1"), tok(Eof, "")]);
        assert_eq!(kinds("D.x"), vec![tok(Symbol, "D.x"), tok(Eof, "")]);
    }

    #[test]
    fn test_c_instruction() {
        assert_eq!(
            kinds("AM=M-1;JNE"),
            vec![
                tok(Mnemonic, "AM"),
                tok(Equal, "="),
                tok(Mnemonic, "M-1"),
                tok(Semicolon, ";"),
                tok(Mnemonic, "JNE"),
                tok(Eof, ""),
            ]
        );
        assert_eq!(
            kinds("D=!M\nM=-1\n0;JMP"),
            vec![
                tok(Mnemonic, "D"),
                tok(Equal, "="),
                tok(Mnemonic, "!M"),
                tok(Eol, "\n"),
                tok(Mnemonic, "M"),
                tok(Equal, "="),
                tok(Mnemonic, "-1"),
                tok(Eol, "\n"),
                tok(Mnemonic, "0"),
                tok(Semicolon, ";"),
                tok(Mnemonic, "JMP"),
                tok(Eof, ""),
            ]
        );
    }

    #[test]
    fn test_integers_and_single_digit_mnemonics() {
        assert_eq!(kinds("@16"), vec![tok(At, "@"), tok(Integer, "16"), tok(Eof, "")]);
        assert_eq!(kinds("@5"), vec![tok(At, "@"), tok(Integer, "5"), tok(Eof, "")]);
        assert_eq!(kinds("@1"), vec![tok(At, "@"), tok(Mnemonic, "1"), tok(Eof, "")]);
        assert_eq!(kinds("@10"), vec![tok(At, "@"), tok(Integer, "10"), tok(Eof, "")]);
    }

    #[test]
    fn test_label_and_comments() {
        assert_eq!(
            kinds("  (LOOP) // start\n\t@LOOP // again"),
            vec![
                tok(LParen, "("),
                tok(Symbol, "LOOP"),
                tok(RParen, ")"),
                tok(Eol, "\n"),
                tok(At, "@"),
                tok(Symbol, "LOOP"),
                tok(Eof, ""),
            ]
        );
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize("@R0\n  D=M").unwrap();
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (1, 2));
        assert_eq!((tokens[2].line, tokens[2].column), (1, 4));
        assert_eq!((tokens[3].line, tokens[3].column), (2, 3));
        assert_eq!((tokens[5].line, tokens[5].column), (2, 5));
    }

    #[test]
    fn test_eof_repeats() {
        let mut lexer = Lexer::new("");
        assert_eq!(lexer.next_token().unwrap().kind, Eof);
        assert_eq!(lexer.next_token().unwrap().kind, Eof);
    }

    #[test]
    fn test_invalid_character() {
        match tokenize("@R0\n  #") {
            Err(Error::Lexer { ch, line, column }) => assert_eq!((ch, line, column), ('#', 2, 3)),
            other => panic!("unexpected result {:?}", other),
        }
        assert!(tokenize("D=D+12").is_err());
    }
}
