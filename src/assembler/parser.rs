//! The Parser module pulls tokens from the lexer one at a time
//! and converts them into an AST.
//!
//! Grammar:
//!
//! ```text
//! program     := (instruction? EOL)* instruction? EOF
//! instruction := '(' SYMBOL ')'
//!              | '@' (SYMBOL | INTEGER)
//!              | (dest '=')? comp (';' jump)?
//! ```
use super::ast::*;
use super::lexer::{is_symbol_continuation, Lexer, Token, TokenKind};
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
        let mut instructions = Vec::new();

        loop {
            match self.current.kind {
                TokenKind::Eof | TokenKind::Eol => {}
                _ => instructions.push(self.instruction()?),
            }

            if self.current.kind == TokenKind::Eof {
                break;
            }
            // Only one instruction is allowed per line.
            self.eat(TokenKind::Eol)?;
        }
        self.eat(TokenKind::Eof)?;

        debug!("parsed {} assembly instruction(s)", instructions.len());
        Ok(Program { instructions })
    }

    /// Parses the instruction starting at the current token.
    fn instruction(&mut self) -> Result<Instruction> {
        match self.current.kind {
            TokenKind::LParen => self.label(),
            TokenKind::At => self.address(),
            TokenKind::Mnemonic => self.compute(),
            _ => Err(Error::unexpected(
                &[TokenKind::LParen, TokenKind::At, TokenKind::Mnemonic],
                &self.current,
            )),
        }
    }

    /// `(NAME)`
    fn label(&mut self) -> Result<Instruction> {
        self.eat(TokenKind::LParen)?;
        let tok = self.consume()?;
        let name = match tok.kind {
            TokenKind::Symbol => tok.text,
            TokenKind::Mnemonic if is_symbol_like(&tok.text) => tok.text,
            _ => return Err(Error::unexpected(&[TokenKind::Symbol], &tok)),
        };
        self.eat(TokenKind::RParen)?;
        Ok(Instruction::Label { name, line: tok.line })
    }

    /// `@SYMBOL` or `@INTEGER`
    fn address(&mut self) -> Result<Instruction> {
        self.eat(TokenKind::At)?;
        let tok = self.consume()?;
        let operand = match tok.kind {
            TokenKind::Symbol => Operand::Symbol(tok.text),
            TokenKind::Integer => Operand::Address(constant(&tok)?),
            // `0`, `1`, `M`, `AMD` etc. are lexed as mnemonics.
            TokenKind::Mnemonic if tok.text.chars().all(|c| c.is_ascii_digit()) => {
                Operand::Address(constant(&tok)?)
            }
            TokenKind::Mnemonic if is_symbol_like(&tok.text) => Operand::Symbol(tok.text),
            _ => return Err(Error::unexpected(&[TokenKind::Symbol, TokenKind::Integer], &tok)),
        };
        Ok(Instruction::A(operand))
    }

    /// `dest=comp;jump`. The first mnemonic is only a dest when
    /// it is directly followed by `=`.
    fn compute(&mut self) -> Result<Instruction> {
        let first = self.consume()?;

        let (dest, comp_tok) = if self.current.kind == TokenKind::Equal {
            let dest = match Dest::from_mnemonic(&first.text) {
                Some(dest) => dest,
                None => return Err(expected_mnemonic("dest", &first)),
            };
            self.eat(TokenKind::Equal)?;
            if self.current.kind != TokenKind::Mnemonic {
                return Err(Error::unexpected(&[TokenKind::Mnemonic], &self.current));
            }
            (Some(dest), self.consume()?)
        } else {
            (None, first)
        };

        let comp = match Comp::from_mnemonic(&comp_tok.text) {
            Some(comp) => comp,
            None => return Err(expected_mnemonic("comp", &comp_tok)),
        };

        let jump = if self.current.kind == TokenKind::Semicolon {
            self.eat(TokenKind::Semicolon)?;
            let tok = self.consume()?;
            match (tok.kind, Jump::from_mnemonic(&tok.text)) {
                (TokenKind::Mnemonic, Some(jump)) => Some(jump),
                _ => return Err(expected_mnemonic("jump", &tok)),
            }
        } else {
            None
        };

        Ok(Instruction::C { dest, comp, jump })
    }

    /// Consumes the current token if it has the given kind,
    /// otherwise fails naming the expected kind.
    fn eat(&mut self, kind: TokenKind) -> Result<()> {
        if self.current.kind == kind {
            self.consume()?;
            Ok(())
        } else {
            Err(Error::unexpected(&[kind], &self.current))
        }
    }

    /// Pops the current token off the input stream and returns it.
    #[inline]
    fn consume(&mut self) -> Result<Token> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }
}

/// Mnemonics such as `M` or `AMD` are also valid symbol names.
fn is_symbol_like(text: &str) -> bool {
    match text.chars().next() {
        Some(c) if !c.is_ascii_digit() => text.chars().all(is_symbol_continuation),
        _ => false,
    }
}

fn constant(tok: &Token) -> Result<u16> {
    match tok.text.parse::<u16>() {
        Ok(value) if value <= MAX_ADDRESS => Ok(value),
        _ => Err(Error::semantic(format!(
            "constant {} on line {} does not fit in 15 bits (max {})",
            tok.text, tok.line, MAX_ADDRESS
        ))),
    }
}

fn expected_mnemonic(field: &str, tok: &Token) -> Error {
    Error::UnexpectedToken {
        expected: format!("{} {}", field, TokenKind::Mnemonic),
        found: tok.to_string(),
    }
}

/// Parses a whole source text into a program.
pub fn parse(source: &str) -> Result<Program> {
    Parser::new(Lexer::new(source))?.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(dest: Option<Dest>, comp: Comp, jump: Option<Jump>) -> Instruction {
        Instruction::C { dest, comp, jump }
    }

    #[test]
    fn test_instruction_forms() {
        let program = parse("@5\n@LOOP\n(LOOP)\nD=M\n0;JMP\nAM=M-1;JNE\nD").unwrap();
        assert_eq!(
            program.instructions,
            vec![
                Instruction::A(Operand::Address(5)),
                Instruction::A(Operand::Symbol("LOOP".to_string())),
                Instruction::Label { name: "LOOP".to_string(), line: 3 },
                c(Some(Dest::D), Comp::M, None),
                c(None, Comp::Zero, Some(Jump::JMP)),
                c(Some(Dest::AM), Comp::MMinusOne, Some(Jump::JNE)),
                c(None, Comp::D, None),
            ]
        );
    }

    #[test]
    fn test_blank_lines_and_comments_are_skipped() {
        let program = parse("\n\n// header\n   @1 // one\n\n\nM=D\n\n").unwrap();
        assert_eq!(
            program.instructions,
            vec![Instruction::A(Operand::Address(1)), c(Some(Dest::M), Comp::D, None)]
        );
        assert_eq!(parse("").unwrap(), Program::default());
    }

    #[test]
    fn test_mnemonic_shaped_operands() {
        let program = parse("@0\n@M\n(AMD)").unwrap();
        assert_eq!(
            program.instructions,
            vec![
                Instruction::A(Operand::Address(0)),
                Instruction::A(Operand::Symbol("M".to_string())),
                Instruction::Label { name: "AMD".to_string(), line: 3 },
            ]
        );
        assert!(parse("@-1").is_err());
        assert!(parse("@D+1").is_err());
    }

    #[test]
    fn test_constant_range() {
        assert_eq!(
            parse("@32767").unwrap().instructions,
            vec![Instruction::A(Operand::Address(32767))]
        );
        assert!(matches!(parse("@32768"), Err(Error::Semantic(_))));
        assert!(matches!(parse("@99999999"), Err(Error::Semantic(_))));
    }

    #[test]
    fn test_invalid_statement_start() {
        match parse("@1\nLOOP") {
            Err(Error::UnexpectedToken { expected, found }) => {
                assert_eq!(expected, "(, @, MNEMONIC");
                assert_eq!(found, "Token(SYMBOL, 'LOOP', line 2, column 1)");
            }
            other => panic!("unexpected result {:?}", other),
        }
        assert!(matches!(parse("=D"), Err(Error::UnexpectedToken { .. })));
    }

    #[test]
    fn test_invalid_c_instructions() {
        // dest-only mnemonic used as a computation
        assert!(matches!(parse("MD"), Err(Error::UnexpectedToken { .. })));
        // comp used as a dest
        assert!(matches!(parse("D+1=A"), Err(Error::UnexpectedToken { .. })));
        // jump used as a comp
        assert!(matches!(parse("JMP"), Err(Error::UnexpectedToken { .. })));
        // comp used as a jump
        assert!(matches!(parse("0;D"), Err(Error::UnexpectedToken { .. })));
        assert!(matches!(parse("D="), Err(Error::UnexpectedToken { .. })));
        assert!(matches!(parse("D;"), Err(Error::UnexpectedToken { .. })));
    }

    #[test]
    fn test_one_instruction_per_line() {
        assert!(matches!(parse("@1 @2"), Err(Error::UnexpectedToken { .. })));
        assert!(matches!(parse("(LOOP"), Err(Error::UnexpectedToken { .. })));
        assert!(matches!(parse("()"), Err(Error::UnexpectedToken { .. })));
    }
}
