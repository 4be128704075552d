//! Operator definitions for filter queries.

use crate::query::field::ResolvedType;
use crate::query::position::Position;

/// Operators supported in filter queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    // Pattern matching
    Glob,
    Regexp,

    // Logical
    And,
    Or,
    Not,
}

const STRING_ONLY: &[ResolvedType] = &[ResolvedType::String];

impl OperatorKind {
    /// Comparison operators produce a boolean from two value operands
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            OperatorKind::Eq
                | OperatorKind::Ne
                | OperatorKind::Lt
                | OperatorKind::Le
                | OperatorKind::Gt
                | OperatorKind::Ge
                | OperatorKind::Glob
                | OperatorKind::Regexp
        )
    }

    /// Logical connectives between two boolean operands
    pub fn is_logical(&self) -> bool {
        matches!(self, OperatorKind::And | OperatorKind::Or)
    }

    pub fn is_unary(&self) -> bool {
        matches!(self, OperatorKind::Not)
    }

    pub fn is_binary(&self) -> bool {
        self.is_comparison() || self.is_logical()
    }

    /// Operand types accepted by operators that restrict them.
    ///
    /// `None` means any value type is accepted.
    pub fn allowed_operand_types(&self) -> Option<&'static [ResolvedType]> {
        match self {
            OperatorKind::Glob | OperatorKind::Regexp => Some(STRING_ONLY),
            _ => None,
        }
    }

    /// Get the canonical query text for this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorKind::Eq => "=",
            OperatorKind::Ne => "!=",
            OperatorKind::Lt => "<",
            OperatorKind::Le => "<=",
            OperatorKind::Gt => ">",
            OperatorKind::Ge => ">=",
            OperatorKind::Glob => "GLOB",
            OperatorKind::Regexp => "REGEXP",
            OperatorKind::And => "AND",
            OperatorKind::Or => "OR",
            OperatorKind::Not => "NOT",
        }
    }
}

/// Operator token as it appeared in the query
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    /// Source text of the token, e.g. `and` or `AND`
    pub token: String,
    pub kind: OperatorKind,
    pub pos: Position,
}

impl Operator {
    /// Create an operator using the canonical text for `kind`
    pub fn new(kind: OperatorKind, pos: Position) -> Self {
        Self {
            token: kind.as_str().to_string(),
            kind,
            pos,
        }
    }

    pub fn with_token(token: impl Into<String>, kind: OperatorKind, pos: Position) -> Self {
        Self {
            token: token.into(),
            kind,
            pos,
        }
    }
}
