//! The Assembler module is in charge of taking a
//! Hack assembly file and producing Hack machine code.
//!
//! It does this in four strictly sequential stages: a pull based
//! tokenizer, a recursive descent parser, a label resolution pass
//! and a single pass code generator that also allocates variables.

pub mod analyzer;
pub mod ast;
pub mod codegen;
pub mod lexer;
pub mod parser;
pub mod symbols;

use crate::error::Result;
use analyzer::{Analyzer, DuplicateLabelPolicy};
use codegen::CodeGenerator;

/// Assembles a complete source text into newline separated 16-bit words.
pub fn assemble(source: &str, policy: DuplicateLabelPolicy) -> Result<String> {
    let program = parser::parse(source)?;
    let symbols = Analyzer::new(policy).run(&program)?;
    Ok(CodeGenerator::new(symbols).run(&program)?.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: &str = "// Computes R2 = max(R0, R1)
@R0
D=M
@R1
D=D-M
// If (D > 0) goto ITSR0
@ITSR0
D;JGT
// Its R1
@R1
D=M
@OUTPUT_D
0;JMP
(ITSR0)
  @R0
  D=M
(OUTPUT_D)
  @R2
  M=D
(END)
  @END
  0;JMP
";

    #[test]
    fn test_assemble_max() {
        let expected = [
            "0000000000000000",
            "1111110000010000",
            "0000000000000001",
            "1111010011010000",
            "0000000000001010",
            "1110001100000001",
            "0000000000000001",
            "1111110000010000",
            "0000000000001100",
            "1110101010000111",
            "0000000000000000",
            "1111110000010000",
            "0000000000000010",
            "1110001100001000",
            "0000000000001110",
            "1110101010000111",
        ]
        .join("\n");
        assert_eq!(assemble(MAX, DuplicateLabelPolicy::KeepFirst).unwrap(), expected);
    }

    #[test]
    fn test_every_line_is_sixteen_bits() {
        let out = assemble(MAX, DuplicateLabelPolicy::KeepFirst).unwrap();
        assert!(!out.starts_with('\n') && !out.ends_with('\n'));
        for line in out.lines() {
            assert_eq!(line.len(), 16);
            assert!(line.chars().all(|c| c == '0' || c == '1'));
        }
    }

    #[test]
    fn test_assemble_errors_abort() {
        assert!(assemble("@1\n#", DuplicateLabelPolicy::KeepFirst).is_err());
        assert!(assemble("(X)\n(X)", DuplicateLabelPolicy::Reject).is_err());
    }

    #[test]
    fn test_label_beyond_rom_is_rejected() {
        let source = format!("{}(FAR)\n@FAR", "D=D\n".repeat(32768));
        assert!(matches!(
            assemble(&source, DuplicateLabelPolicy::KeepFirst),
            Err(crate::error::Error::Semantic(_))
        ));
    }
}
