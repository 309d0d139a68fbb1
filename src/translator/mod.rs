//! The Translator module turns stack machine bytecode into
//! Hack assembly text, which the assembler then consumes.
//!
//! Like the assembler it is a pull based tokenizer feeding a recursive
//! descent parser, followed by a single pass code generator. No symbol
//! pass is needed: the only names it creates are branch labels, and
//! those are made unique as they are emitted.

pub mod ast;
pub mod codegen;
pub mod lexer;
pub mod parser;

use crate::error::Result;
use codegen::CodeGenerator;

/// Translates a complete VM source text into assembly text.
pub fn translate(source: &str, static_prefix: &str) -> Result<String> {
    let program = parser::parse(source)?;
    Ok(CodeGenerator::new(static_prefix).run(&program)?.finish())
}
