use std::collections::HashMap;

use lazy_static::lazy_static;

lazy_static! {
    /// The standard binary operators, 1 being the lowest precedence.
    pub static ref STANDARD_OPERATORS: HashMap<char, i32> = {
        let mut map = HashMap::new();
        map.insert('<', 10);
        map.insert('+', 20);
        map.insert('-', 20);
        map.insert('*', 40); // highest
        map
    };
}

/// Maps binary operator characters to their precedence.
///
/// The table is filled in while configuring a parser and only read while
/// parsing. Operators that are absent, or installed with a non-positive
/// precedence, are not binary operators.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrecedenceTable {
    table: HashMap<char, i32>,
}

impl PrecedenceTable {
    /// Creates an empty table; nothing parses as a binary operator.
    pub fn new() -> Self {
        PrecedenceTable {
            table: HashMap::new(),
        }
    }

    /// Creates a table with `<`, `+`, `-` and `*` installed.
    pub fn standard() -> Self {
        PrecedenceTable {
            table: STANDARD_OPERATORS.clone(),
        }
    }

    /// Installs `op` with `precedence`, replacing any previous entry.
    pub fn install(&mut self, op: char, precedence: i32) -> &mut Self {
        self.table.insert(op, precedence);
        self
    }

    /// Returns the precedence of `op` if it is a binary operator.
    pub fn precedence(&self, op: char) -> Option<i32> {
        self.table.get(&op).copied().filter(|precedence| *precedence > 0)
    }

    pub fn is_binary_operator(&self, op: char) -> bool {
        self.precedence(op).is_some()
    }
}
