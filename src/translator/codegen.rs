//! Hack assembly generation for VM commands.
//!
//! The stack lives in RAM from address 256 upward and `SP` always points
//! at the next free slot. `LCL`, `ARG`, `THIS` and `THAT` hold segment
//! base addresses, `temp` maps onto `R5`..`R12` and `R13` is scratch.
use super::ast::*;
use crate::emit::Lines;
use crate::error::{Error, Result};
use crate::lines;

pub const TEMP_BASE: u16 = 5;
pub const TEMP_SIZE: u16 = 8;
pub const MAX_CONSTANT: u16 = 0x7FFF;

/// Static symbol prefix used when no input file name is known.
pub const DEFAULT_STATIC_PREFIX: &str = "Static";

pub struct CodeGenerator {
    static_prefix: String,
    next_label: usize,
}

impl CodeGenerator {
    /// `static_prefix` namespaces the `static` segment, usually the
    /// input file stem, so `static 3` of `Foo.vm` becomes `@Foo.3`.
    pub fn new<S: Into<String>>(static_prefix: S) -> Self {
        CodeGenerator { static_prefix: static_prefix.into(), next_label: 0 }
    }

    /// Translates the whole program.
    pub fn run(mut self, program: &Program) -> Result<Lines> {
        let mut out = Lines::new();
        for cmd in program.commands.iter() {
            out.extend(self.command(cmd)?);
        }
        info!("translated {} VM command(s) into {} assembly line(s)", program.commands.len(), out.len());
        Ok(out)
    }

    /// Translates a single command into its block of assembly,
    /// headed by a comment naming the command.
    pub fn command(&mut self, cmd: &Command) -> Result<Lines> {
        let mut out = lines![format!("// {}", cmd)];
        let body = match cmd {
            Command::Arithmetic(op) => self.arithmetic(*op),
            Command::Stack { op: StackOp::Push, target } => self.push(target)?,
            Command::Stack { op: StackOp::Pop, target } => self.pop(target)?,
        };
        out.extend(body);
        Ok(out)
    }

    fn arithmetic(&mut self, op: ArithOp) -> Lines {
        match op {
            ArithOp::Neg => unary("-M"),
            ArithOp::Not => unary("!M"),
            ArithOp::Add => binary("M=D+M"),
            ArithOp::Sub => binary("M=M-D"),
            ArithOp::And => binary("M=D&M"),
            ArithOp::Or => binary("M=D|M"),
            ArithOp::Eq => self.compare(op, "JEQ"),
            ArithOp::Gt => self.compare(op, "JGT"),
            ArithOp::Lt => self.compare(op, "JLT"),
        }
    }

    /// Pops y and x, pushes -1 when `x - y` satisfies `jump`, else 0.
    fn compare(&mut self, op: ArithOp, jump: &str) -> Lines {
        let name = op.keyword().to_uppercase();
        let id = self.next_label;
        self.next_label += 1;
        let label = |part: &str| format!("{}_{}_{}", name, part, id);

        let mut out = if op == ArithOp::Eq {
            let mut out = pop_operands();
            out.push("D=M-D");
            out
        } else {
            ordered_difference(&label)
        };
        out.extend(lines![
            format!("@{}", label("TRUE")),
            format!("D;{}", jump),
            "@SP",
            "A=M",
            "M=0",
            format!("@{}", label("END")),
            "0;JMP",
            format!("({})", label("TRUE")),
            "@SP",
            "A=M",
            "M=-1",
            format!("({})", label("END")),
            "@SP",
            "M=M+1",
        ]);
        out
    }

    fn push(&self, target: &SegmentRef) -> Result<Lines> {
        let index = target.index;
        let mut out = match target.segment {
            Segment::Constant => {
                if index > MAX_CONSTANT {
                    return Err(Error::semantic(format!(
                        "constant {} does not fit in 15 bits (max {})",
                        index, MAX_CONSTANT
                    )));
                }
                lines![format!("@{}", index), "D=A"]
            }
            Segment::Static => lines![format!("@{}", self.static_symbol(index)), "D=M"],
            Segment::Argument => push_indirect("ARG", target)?,
            Segment::Local => push_indirect("LCL", target)?,
            Segment::This => push_indirect("THIS", target)?,
            Segment::That => push_indirect("THAT", target)?,
            Segment::Pointer => lines![format!("@{}", pointer_register(index)?), "D=M"],
            Segment::Temp => lines![format!("@{}", temp_register(index)?), "D=M"],
        };
        out.extend(lines!["@SP", "A=M", "M=D", "@SP", "M=M+1"]);
        Ok(out)
    }

    fn pop(&self, target: &SegmentRef) -> Result<Lines> {
        let index = target.index;
        let dest = match target.segment {
            Segment::Constant => {
                return Err(Error::semantic(format!(
                    "invalid memory segment {} for stack command `pop`",
                    target.segment.keyword()
                )))
            }
            Segment::Static => self.static_symbol(index),
            Segment::Pointer => pointer_register(index)?.to_string(),
            Segment::Temp => temp_register(index)?,
            Segment::Argument => return pop_indirect("ARG", target),
            Segment::Local => return pop_indirect("LCL", target),
            Segment::This => return pop_indirect("THIS", target),
            Segment::That => return pop_indirect("THAT", target),
        };

        let mut out = pop_to_d();
        out.extend(lines![format!("@{}", dest), "M=D"]);
        Ok(out)
    }

    fn static_symbol(&self, index: u16) -> String {
        format!("{}.{}", self.static_prefix, index)
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        CodeGenerator::new(DEFAULT_STATIC_PREFIX)
    }
}

/// The index of a base-relative segment is loaded with `@index`,
/// so it has the same 15 bit limit as a constant.
fn offset(target: &SegmentRef) -> Result<u16> {
    if target.index > MAX_CONSTANT {
        return Err(Error::semantic(format!(
            "index {} for {} segment does not fit in 15 bits (max {})",
            target.index,
            target.segment.keyword(),
            MAX_CONSTANT
        )));
    }
    Ok(target.index)
}

/// D = *(base + index)
fn push_indirect(base: &str, target: &SegmentRef) -> Result<Lines> {
    let index = offset(target)?;
    Ok(lines![
        format!("@{}", base),
        "D=M",
        format!("@{}", index),
        "A=D+A",
        "D=M",
    ])
}

/// *(base + index) = pop. The target address is computed before the
/// stack is touched.
fn pop_indirect(base: &str, target: &SegmentRef) -> Result<Lines> {
    let index = offset(target)?;
    let mut out = lines![
        format!("@{}", index),
        "D=A",
        format!("@{}", base),
        "D=D+M",
        "@R13",
        "M=D",
    ];
    out.extend(pop_to_d());
    out.extend(lines!["@R13", "A=M", "M=D"]);
    Ok(out)
}

fn pointer_register(index: u16) -> Result<&'static str> {
    match index {
        0 => Ok("THIS"),
        1 => Ok("THAT"),
        _ => Err(Error::semantic(format!(
            "invalid memory location {} for pointer segment (expected 0 or 1)",
            index
        ))),
    }
}

fn temp_register(index: u16) -> Result<String> {
    if index >= TEMP_SIZE {
        return Err(Error::semantic(format!(
            "invalid memory location {} for temp segment (expected 0 to {})",
            index,
            TEMP_SIZE - 1
        )));
    }
    Ok(format!("R{}", TEMP_BASE + index))
}

/// SP--, D = *SP
fn pop_to_d() -> Lines {
    lines!["@SP", "M=M-1", "A=M", "D=M"]
}

/// Pops y into D and leaves A pointing at x.
fn pop_operands() -> Lines {
    let mut out = pop_to_d();
    out.extend(lines!["@SP", "M=M-1", "A=M"]);
    out
}

/// Pops y and x and leaves in D a value with the sign of `x - y`.
/// Operands of opposite sign are ordered by x alone, since their
/// difference can overflow 16 bits. SP is left pointing at x.
fn ordered_difference<F: Fn(&str) -> String>(label: &F) -> Lines {
    let mut out = pop_to_d();
    out.extend(lines![
        "@R13",
        "M=D",
        "@SP",
        "M=M-1",
        "A=M",
        "D=M",
        format!("@{}", label("XNEG")),
        "D;JLT",
        // x >= 0
        "@R13",
        "D=M",
        format!("@{}", label("SAME")),
        "D;JGE",
        "D=1",
        format!("@{}", label("TEST")),
        "0;JMP",
        format!("({})", label("XNEG")),
        "@R13",
        "D=M",
        format!("@{}", label("SAME")),
        "D;JLT",
        "D=-1",
        format!("@{}", label("TEST")),
        "0;JMP",
        format!("({})", label("SAME")),
        "@SP",
        "A=M",
        "D=M",
        "@R13",
        "D=D-M",
        format!("({})", label("TEST")),
    ]);
    out
}

fn unary(comp: &str) -> Lines {
    let mut out = lines!["@SP", "M=M-1", "A=M"];
    out.extend(lines![format!("D={}", comp), "@SP", "A=M", "M=D", "@SP", "M=M+1"]);
    out
}

fn binary(op: &str) -> Lines {
    let mut out = pop_operands();
    out.extend(lines![op, "@SP", "M=M+1"]);
    out
}
