//! Recursive descent parser for VM bytecode.
//!
//! ```text
//! program       := (EOL | command)* EOF
//! command       := arith_command | stack_command
//! stack_command := ('push' | 'pop') segment
//! segment       := MEMORY_SEGMENT INTEGER
//! ```
use super::ast::*;
use super::lexer::{Lexer, Token, TokenKind};
use crate::error::{Error, Result};

pub struct Parser {
    lexer: Lexer,
    current: Token,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self> {
        let current = lexer.next_token()?;
        Ok(Parser { lexer, current })
    }

    /// Run the parser, consuming itself and returning the program.
    pub fn run(mut self) -> Result<Program> {
        let mut commands = Vec::new();

        loop {
            match self.current.kind {
                TokenKind::Eof => break,
                TokenKind::Eol => {
                    self.consume()?;
                }
                TokenKind::Command => {
                    commands.push(self.command()?);
                    // A command must end its line.
                    if self.current.kind != TokenKind::Eof {
                        self.eat(TokenKind::Eol)?;
                    }
                }
                _ => return Err(Error::unexpected(&[TokenKind::Command], &self.current)),
            }
        }
        self.eat(TokenKind::Eof)?;

        debug!("parsed {} VM command(s)", commands.len());
        Ok(Program { commands })
    }

    fn command(&mut self) -> Result<Command> {
        if let Some(op) = StackOp::from_keyword(&self.current.text) {
            self.consume()?;
            let target = self.segment()?;
            return Ok(Command::Stack { op, target });
        }
        if let Some(op) = ArithOp::from_keyword(&self.current.text) {
            self.consume()?;
            return Ok(Command::Arithmetic(op));
        }
        // Program flow and function commands are recognized but not translated.
        Err(Error::UnexpectedToken {
            expected: "one of add, sub, neg, eq, gt, lt, and, or, not, push, pop".to_string(),
            found: self.current.to_string(),
        })
    }

    fn segment(&mut self) -> Result<SegmentRef> {
        let seg_tok = self.expect(TokenKind::MemorySegment)?;
        let segment = match Segment::from_keyword(&seg_tok.text) {
            Some(segment) => segment,
            None => return Err(Error::unexpected(&[TokenKind::MemorySegment], &seg_tok)),
        };

        let idx_tok = self.expect(TokenKind::Integer)?;
        let index = idx_tok.text.parse::<u16>().map_err(|_| {
            Error::semantic(format!(
                "index {} on line {} is out of range",
                idx_tok.text, idx_tok.line
            ))
        })?;

        Ok(SegmentRef { segment, index })
    }

    /// Consumes and returns the current token if it has the given kind.
    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current.kind == kind {
            self.consume()
        } else {
            Err(Error::unexpected(&[kind], &self.current))
        }
    }

    fn eat(&mut self, kind: TokenKind) -> Result<()> {
        self.expect(kind).map(|_| ())
    }

    #[inline]
    fn consume(&mut self) -> Result<Token> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }
}

/// Parses a whole VM source text into a program.
pub fn parse(source: &str) -> Result<Program> {
    Parser::new(Lexer::new(source))?.run()
}
