//! Symbol table for labels, variables and the predefined symbols.
use std::collections::HashMap;

/// Where a symbol's binding came from.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Origin {
    Builtin,
    Label,
    Variable,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Symbol {
    pub name: String,
    pub address: u16,
    pub origin: Origin,
}

/// Symbols predefined by the platform, beyond `R0`..`R15`.
pub const BUILTINS: &[(&str, u16)] = &[
    ("SP", 0),
    ("LCL", 1),
    ("ARG", 2),
    ("THIS", 3),
    ("THAT", 4),
    ("SCREEN", 16384),
    ("KBD", 24576),
];

/// Owns every symbol of one assembly run.
#[derive(Debug)]
pub struct SymbolTable {
    symbols: HashMap<String, Symbol>,
}

impl SymbolTable {
    /// Creates a table holding only the predefined symbols.
    pub fn new() -> Self {
        let mut table = SymbolTable { symbols: HashMap::with_capacity(64) };
        for reg in 0..16u16 {
            table.insert(format!("R{}", reg), reg, Origin::Builtin);
        }
        for &(name, address) in BUILTINS {
            table.insert(name.to_string(), address, Origin::Builtin);
        }
        table
    }

    /// Binds `name` to `address`. Returns false and leaves the table
    /// untouched when `name` is already bound.
    pub fn define(&mut self, name: &str, address: u16, origin: Origin) -> bool {
        if self.contains(name) {
            return false;
        }
        self.insert(name.to_string(), address, origin);
        true
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    fn insert(&mut self, name: String, address: u16, origin: Origin) {
        self.symbols.insert(name.clone(), Symbol { name, address, origin });
    }
}
