//! Hack machine code generation.
//!
//! Every A- and C-instruction becomes one 16 character line of `0`/`1`.
//! Symbols that are neither predefined nor labels are variables and are
//! allocated RAM cells from address 16 upward in order of first use.
use super::ast::{encode_compute, Instruction, Operand, Program, MAX_ADDRESS};
use super::symbols::{Origin, SymbolTable};
use crate::emit::Lines;
use crate::error::{Error, Result};

/// First RAM address handed out to variables.
pub const VARIABLE_BASE: u16 = 16;

pub struct CodeGenerator {
    symbols: SymbolTable,
    next_variable: u16,
}

impl CodeGenerator {
    pub fn new(symbols: SymbolTable) -> Self {
        CodeGenerator { symbols, next_variable: VARIABLE_BASE }
    }

    /// Assembles a single instruction. Labels produce no word.
    pub fn instruction(&mut self, ins: &Instruction) -> Result<Option<u16>> {
        match ins {
            Instruction::A(Operand::Address(addr)) => Ok(Some(*addr)),
            Instruction::A(Operand::Symbol(name)) => Ok(Some(self.resolve(name)?)),
            Instruction::C { dest, comp, jump } => Ok(Some(encode_compute(*dest, *comp, *jump))),
            Instruction::Label { .. } => Ok(None),
        }
    }

    /// Assembles the whole program, one output line per word.
    pub fn run(mut self, program: &Program) -> Result<Lines> {
        let mut out = Lines::new();
        for ins in program.instructions.iter() {
            if let Some(word) = self.instruction(ins)? {
                out.push(format_word(word));
            }
        }
        info!("assembled {} word(s), {} variable(s)", out.len(), self.next_variable - VARIABLE_BASE);
        Ok(out)
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    fn resolve(&mut self, name: &str) -> Result<u16> {
        if let Some(sym) = self.symbols.lookup(name) {
            return Ok(sym.address);
        }
        let address = self.alloc(name)?;
        self.symbols.define(name, address, Origin::Variable);
        debug!("variable {} => {}", name, address);
        Ok(address)
    }

    fn alloc(&mut self, name: &str) -> Result<u16> {
        let address = self.next_variable;
        if address > MAX_ADDRESS {
            return Err(Error::semantic(format!("no free memory left for variable `{}`", name)));
        }
        self.next_variable += 1;
        Ok(address)
    }
}

/// Renders a word as 16 binary digits.
pub fn format_word(word: u16) -> String {
    format!("{:016b}", word)
}
