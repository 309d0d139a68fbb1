//! A minimal Hack CPU used to execute generated code in tests.
use crate::assembler::{self, analyzer::DuplicateLabelPolicy};
use crate::error::Result;

pub const RAM_SIZE: usize = 0x8000;

pub struct Emulator {
    rom: Vec<u16>,
    pub ram: Vec<u16>,
    pub a: u16,
    pub d: u16,
    pub pc: usize,
}

impl Emulator {
    pub fn new(rom: Vec<u16>) -> Self {
        Emulator { rom, ram: vec![0; RAM_SIZE], a: 0, d: 0, pc: 0 }
    }

    /// Assembles `source` with the crate's own assembler and loads it.
    pub fn from_asm(source: &str) -> Result<Self> {
        let text = assembler::assemble(source, DuplicateLabelPolicy::Reject)?;
        let rom = text
            .lines()
            .map(|line| u16::from_str_radix(line, 2).expect("assembler emitted a non-binary line"))
            .collect();
        Ok(Emulator::new(rom))
    }

    /// Runs until the program counter leaves ROM or `max_steps` is hit.
    /// Returns the number of executed instructions.
    pub fn run(&mut self, max_steps: usize) -> usize {
        let mut steps = 0;
        while self.pc < self.rom.len() && steps < max_steps {
            self.step();
            steps += 1;
        }
        steps
    }

    pub fn step(&mut self) {
        let word = self.rom[self.pc];
        if word & 0x8000 == 0 {
            self.a = word;
            self.pc += 1;
            return;
        }

        let y = if word & (1 << 12) != 0 { self.ram[self.a as usize % RAM_SIZE] } else { self.a };
        let out = alu(self.d, y, (word >> 6) & 0b111111);

        let target = self.a;
        if word & 0b001_000 != 0 {
            self.ram[target as usize % RAM_SIZE] = out;
        }
        if word & 0b100_000 != 0 {
            self.a = out;
        }
        if word & 0b010_000 != 0 {
            self.d = out;
        }

        let value = out as i16;
        let jump = word & 0b111;
        let taken = (jump & 0b100 != 0 && value < 0)
            || (jump & 0b010 != 0 && value == 0)
            || (jump & 0b001 != 0 && value > 0);
        self.pc = if taken { target as usize } else { self.pc + 1 };
    }

    pub fn sp(&self) -> u16 {
        self.ram[0]
    }
}

/// The Hack ALU: zx nx zy ny f no.
fn alu(x: u16, y: u16, control: u16) -> u16 {
    let bit = |n: u16| control & (1 << (5 - n)) != 0;
    let mut x = if bit(0) { 0 } else { x };
    if bit(1) {
        x = !x;
    }
    let mut y = if bit(2) { 0 } else { y };
    if bit(3) {
        y = !y;
    }
    let out = if bit(4) { x.wrapping_add(y) } else { x & y };
    if bit(5) {
        !out
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alu_reference_rows() {
        assert_eq!(alu(7, 3, 0b101010), 0);
        assert_eq!(alu(7, 3, 0b111111), 1);
        assert_eq!(alu(7, 3, 0b111010), 0xFFFF);
        assert_eq!(alu(7, 3, 0b000010), 10);
        assert_eq!(alu(7, 3, 0b010011), 4);
        assert_eq!(alu(7, 3, 0b000111), 0xFFFC);
        assert_eq!(alu(7, 3, 0b001111), 0xFFF9);
    }

    #[test]
    fn test_runs_assembled_program() {
        let mut emu = Emulator::from_asm("@2\nD=A\n@3\nD=D+A\n@0\nM=D").unwrap();
        assert_eq!(emu.run(100), 6);
        assert_eq!(emu.ram[0], 5);
    }

    #[test]
    fn test_jumps() {
        let mut emu = Emulator::from_asm("@5\nD=A\n(LOOP)\n@R2\nM=M+1\n@LOOP\nD=D-1;JGT").unwrap();
        emu.run(1000);
        assert_eq!(emu.ram[2], 5);
        assert_eq!(emu.d, 0);
    }
}
