//! Source positions carried by query tokens.

use std::fmt;

/// Line and column of a token in the query text.
///
/// Both coordinates are 1-based; the first character of a query is `1:1`.
/// [`Position::new`] trusts its caller, [`Position::try_new`] checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Build a position, or `None` when either coordinate is 0
    pub fn try_new(line: u32, column: u32) -> Option<Self> {
        (line >= 1 && column >= 1).then_some(Self { line, column })
    }
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
