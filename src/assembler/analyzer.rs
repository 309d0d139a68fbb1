//! Label resolution.
//!
//! One forward pass over the program binds each `(LABEL)` to the ROM
//! address of the instruction that follows it. Labels take no address
//! themselves, so adjacent declarations share the same binding.
use super::ast::{Instruction, Program, MAX_ADDRESS};
use super::symbols::{Origin, SymbolTable};
use crate::error::{Error, Result};

/// What to do when a label name is declared a second time (or
/// names a predefined symbol).
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DuplicateLabelPolicy {
    /// The first binding wins and the repeat is logged and ignored.
    KeepFirst,
    /// The repeat aborts the run.
    Reject,
}

impl Default for DuplicateLabelPolicy {
    fn default() -> Self {
        DuplicateLabelPolicy::KeepFirst
    }
}

pub struct Analyzer {
    policy: DuplicateLabelPolicy,
    symbols: SymbolTable,
}

impl Analyzer {
    pub fn new(policy: DuplicateLabelPolicy) -> Self {
        Analyzer { policy, symbols: SymbolTable::new() }
    }

    /// Walks the program and returns the table with every label bound.
    pub fn run(mut self, program: &Program) -> Result<SymbolTable> {
        let mut counter: u16 = 0;

        for ins in program.instructions.iter() {
            match ins {
                Instruction::A(_) | Instruction::C { .. } => {
                    counter = counter
                        .checked_add(1)
                        .ok_or_else(|| Error::semantic("program does not fit in instruction memory"))?;
                }
                Instruction::Label { name, line } => self.declare(name, *line, counter)?,
            }
        }

        debug!("resolved labels over {} instruction(s), {} symbol(s) known", counter, self.symbols.len());
        Ok(self.symbols)
    }

    fn declare(&mut self, name: &str, line: usize, address: u16) -> Result<()> {
        // `@LABEL` must still encode as an A-instruction.
        if address > MAX_ADDRESS {
            return Err(Error::semantic(format!(
                "label `{}` on line {} is bound to address {}, past the last loadable address {}",
                name, line, address, MAX_ADDRESS
            )));
        }
        if self.symbols.define(name, address, Origin::Label) {
            debug!("label {} => {}", name, address);
            return Ok(());
        }

        match self.policy {
            DuplicateLabelPolicy::KeepFirst => {
                warn!("ignoring duplicate declaration of `{}` on line {}", name, line);
                Ok(())
            }
            DuplicateLabelPolicy::Reject => Err(Error::DuplicateLabel { name: name.to_string(), line }),
        }
    }
}
