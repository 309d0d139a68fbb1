//! This AST describes a parsed VM bytecode file.
//!
//! ```text
//! push constant 7   // stack commands name a segment and an index
//! push constant 8
//! add               // arithmetic/logical commands take no operands
//! pop local 0
//! ```

use std::fmt;

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Program {
    pub commands: Vec<Command>,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Command {
    Arithmetic(ArithOp),
    Stack { op: StackOp, target: SegmentRef },
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ArithOp {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum StackOp {
    Push,
    Pop,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Segment {
    Argument,
    Local,
    Static,
    Constant,
    This,
    That,
    Pointer,
    Temp,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct SegmentRef {
    pub segment: Segment,
    pub index: u16,
}

impl ArithOp {
    pub fn from_keyword(kw: &str) -> Option<Self> {
        use ArithOp::*;
        match kw {
            "add" => Some(Add),
            "sub" => Some(Sub),
            "neg" => Some(Neg),
            "eq" => Some(Eq),
            "gt" => Some(Gt),
            "lt" => Some(Lt),
            "and" => Some(And),
            "or" => Some(Or),
            "not" => Some(Not),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        use ArithOp::*;
        match self {
            Add => "add",
            Sub => "sub",
            Neg => "neg",
            Eq => "eq",
            Gt => "gt",
            Lt => "lt",
            And => "and",
            Or => "or",
            Not => "not",
        }
    }
}

impl StackOp {
    pub fn from_keyword(kw: &str) -> Option<Self> {
        match kw {
            "push" => Some(StackOp::Push),
            "pop" => Some(StackOp::Pop),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            StackOp::Push => "push",
            StackOp::Pop => "pop",
        }
    }
}

impl Segment {
    pub fn from_keyword(kw: &str) -> Option<Self> {
        use Segment::*;
        match kw {
            "argument" => Some(Argument),
            "local" => Some(Local),
            "static" => Some(Static),
            "constant" => Some(Constant),
            "this" => Some(This),
            "that" => Some(That),
            "pointer" => Some(Pointer),
            "temp" => Some(Temp),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        use Segment::*;
        match self {
            Argument => "argument",
            Local => "local",
            Static => "static",
            Constant => "constant",
            This => "this",
            That => "that",
            Pointer => "pointer",
            Temp => "temp",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Command::Arithmetic(op) => write!(f, "{}", op.keyword()),
            Command::Stack { op, target } => {
                write!(f, "{} {} {}", op.keyword(), target.segment.keyword(), target.index)
            }
        }
    }
}
