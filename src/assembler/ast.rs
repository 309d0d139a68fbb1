//! This AST describes a parsed Hack assembly file.
//!
//! Execution begins with the first instruction in the file.
//! Comments are prefixed with `//` and are single-line only.
//! Instructions are delimited by newlines.
//!
//! Supported Instructions:
//!
//! ```text
//! @value          // A <= value, where value is a constant or a symbol
//! dest=comp;jump  // dest <= comp, then jump if comp satisfies jump
//! (LABEL)         // binds LABEL to the address of the next instruction
//! ```
//!
//! Either `dest=` or `;jump` may be left out of a C-instruction, the
//! computation itself is mandatory.
//!
//! Example source file:
//!
//! ```text
//! @R0
//! D=M
//! @ITSR0
//! D;JGT
//! (ITSR0)
//! @R2
//! M=D
//! (END)
//! @END
//! 0;JMP
//! ```

use std::fmt;

/// Largest value an A-instruction can load.
pub const MAX_ADDRESS: u16 = 0x7FFF;

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Program {
    pub instructions: Vec<Instruction>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Instruction {
    /// `@operand`
    A(Operand),
    /// `dest=comp;jump`
    C {
        dest: Option<Dest>,
        comp: Comp,
        jump: Option<Jump>,
    },
    /// `(NAME)`. The line is kept for duplicate diagnostics.
    Label { name: String, line: usize },
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Operand {
    Address(u16),
    Symbol(String),
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Instruction::A(op) => write!(f, "@{}", op),
            Instruction::C { dest, comp, jump } => {
                if let Some(dest) = dest {
                    write!(f, "{}=", dest)?;
                }
                write!(f, "{}", comp)?;
                if let Some(jump) = jump {
                    write!(f, ";{}", jump)?;
                }
                Ok(())
            }
            Instruction::Label { name, .. } => write!(f, "({})", name),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operand::Address(addr) => write!(f, "{}", addr),
            Operand::Symbol(name) => write!(f, "{}", name),
        }
    }
}

/// Generates a mnemonic-keyed table enum: the variant list, its
/// mnemonic spelling, its field bits and a reverse lookup.
macro_rules! mnemonic_table {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal = $bits:literal,)* }) => {
        $(#[$meta])*
        #[derive(Copy, Clone, PartialEq, Eq, Debug)]
        pub enum $name {
            $($variant,)*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)*];

            pub fn from_mnemonic(text: &str) -> Option<Self> {
                match text {
                    $($text => Some($name::$variant),)*
                    _ => None,
                }
            }

            pub fn mnemonic(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)*
                }
            }

            pub fn bits(&self) -> u16 {
                match self {
                    $($name::$variant => $bits,)*
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}", self.mnemonic())
            }
        }
    };
}

mnemonic_table! {
    /// The computation field. Bits are `a c1 c2 c3 c4 c5 c6`.
    Comp {
        Zero      => "0"   = 0b0101010,
        One       => "1"   = 0b0111111,
        NegOne    => "-1"  = 0b0111010,
        D         => "D"   = 0b0001100,
        A         => "A"   = 0b0110000,
        M         => "M"   = 0b1110000,
        NotD      => "!D"  = 0b0001101,
        NotA      => "!A"  = 0b0110001,
        NotM      => "!M"  = 0b1110001,
        NegD      => "-D"  = 0b0001111,
        NegA      => "-A"  = 0b0110011,
        NegM      => "-M"  = 0b1110011,
        DPlusOne  => "D+1" = 0b0011111,
        APlusOne  => "A+1" = 0b0110111,
        MPlusOne  => "M+1" = 0b1110111,
        DMinusOne => "D-1" = 0b0001110,
        AMinusOne => "A-1" = 0b0110010,
        MMinusOne => "M-1" = 0b1110010,
        DPlusA    => "D+A" = 0b0000010,
        DPlusM    => "D+M" = 0b1000010,
        DMinusA   => "D-A" = 0b0010011,
        DMinusM   => "D-M" = 0b1010011,
        AMinusD   => "A-D" = 0b0000111,
        MMinusD   => "M-D" = 0b1000111,
        DAndA     => "D&A" = 0b0000000,
        DAndM     => "D&M" = 0b1000000,
        DOrA      => "D|A" = 0b0010101,
        DOrM      => "D|M" = 0b1010101,
    }
}

mnemonic_table! {
    /// The destination field. Bits are `d1 d2 d3` = `A D M`.
    Dest {
        M   => "M"   = 0b001,
        D   => "D"   = 0b010,
        MD  => "MD"  = 0b011,
        A   => "A"   = 0b100,
        AM  => "AM"  = 0b101,
        AD  => "AD"  = 0b110,
        AMD => "AMD" = 0b111,
    }
}

mnemonic_table! {
    /// The jump field. Bits are `j1 j2 j3` = `< = >`.
    Jump {
        JGT => "JGT" = 0b001,
        JEQ => "JEQ" = 0b010,
        JGE => "JGE" = 0b011,
        JLT => "JLT" = 0b100,
        JNE => "JNE" = 0b101,
        JLE => "JLE" = 0b110,
        JMP => "JMP" = 0b111,
    }
}

/// Returns true when `text` spells any comp, dest or jump mnemonic.
pub fn is_mnemonic(text: &str) -> bool {
    Comp::from_mnemonic(text).is_some()
        || Dest::from_mnemonic(text).is_some()
        || Jump::from_mnemonic(text).is_some()
}

/// Encodes a C-instruction. An absent dest or jump encodes as `000`.
pub fn encode_compute(dest: Option<Dest>, comp: Comp, jump: Option<Jump>) -> u16 {
    (0b111 << 13)
        | (comp.bits() << 6)
        | (dest.map_or(0, |d| d.bits()) << 3)
        | jump.map_or(0, |j| j.bits())
}
