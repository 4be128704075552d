//! Errors reported while refining a filter query.

use crate::query::field::ResolvedType;
use crate::query::position::Position;
use std::fmt;
use thiserror::Error;

/// Which operand of a binary expression an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Lhs,
    Rhs,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Lhs => f.write_str("LHS"),
            Side::Rhs => f.write_str("RHS"),
        }
    }
}

/// Broad category of a [`QueryError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The root is not a logical expression
    Structural,
    /// Identifier not known to the schema
    UnresolvedField,
    /// Boolean used where a value is expected or vice versa
    TypeMismatch,
    /// A string could not be turned into a date or regex
    LiteralConversion,
    /// Operator does not accept the operand's type
    OperandTypeRestriction,
}

/// A single problem found in a query.
///
/// Every variant except [`QueryError::NotLogical`] renders as
/// `"<line>:<column>: <message>"`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Expected logical expression but received expression of type {variant}")]
    NotLogical { variant: &'static str },

    #[error("{pos}: Invalid field: {name}")]
    InvalidField { pos: Position, name: String },

    #[error("{pos}: Expression in parentheses must resolve to a boolean value")]
    ParenNotBoolean { pos: Position },

    #[error(
        "{pos}: NOT operator can only be applied to expressions that resolve to a boolean value"
    )]
    NotOperandNotBoolean { pos: Position },

    #[error("{pos}: Operands of a logical operator must resolve to boolean values")]
    LogicalOperandsNotBoolean { pos: Position },

    #[error("{pos}: Comparison expressions must compare value types")]
    ComparisonNotValueTypes { pos: Position },

    #[error("{pos}: Invalid operator {token} in {context} expression")]
    MisplacedOperator {
        pos: Position,
        token: String,
        context: &'static str,
    },

    #[error(
        "{pos}: Invalid date: {raw}. Format must be either {date_format} or {date_time_format}"
    )]
    InvalidDate {
        pos: Position,
        raw: String,
        date_format: String,
        date_time_format: String,
    },

    #[error("{pos}: Invalid regex {raw}: {reason}")]
    InvalidRegex {
        pos: Position,
        raw: String,
        reason: String,
    },

    #[error(
        "{pos}: Argument on {side} has invalid type: {actual}. Allowed types are: {}",
        join_types(.allowed)
    )]
    InvalidOperandType {
        pos: Position,
        side: Side,
        actual: ResolvedType,
        allowed: Vec<ResolvedType>,
    },
}

fn join_types(types: &[ResolvedType]) -> String {
    types
        .iter()
        .map(ResolvedType::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl QueryError {
    /// Source position, absent only for the structural error
    pub fn position(&self) -> Option<Position> {
        match self {
            QueryError::NotLogical { .. } => None,
            QueryError::InvalidField { pos, .. }
            | QueryError::ParenNotBoolean { pos }
            | QueryError::NotOperandNotBoolean { pos }
            | QueryError::LogicalOperandsNotBoolean { pos }
            | QueryError::ComparisonNotValueTypes { pos }
            | QueryError::MisplacedOperator { pos, .. }
            | QueryError::InvalidDate { pos, .. }
            | QueryError::InvalidRegex { pos, .. }
            | QueryError::InvalidOperandType { pos, .. } => Some(*pos),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            QueryError::NotLogical { .. } => ErrorKind::Structural,
            QueryError::InvalidField { .. } => ErrorKind::UnresolvedField,
            QueryError::ParenNotBoolean { .. }
            | QueryError::NotOperandNotBoolean { .. }
            | QueryError::LogicalOperandsNotBoolean { .. }
            | QueryError::ComparisonNotValueTypes { .. }
            | QueryError::MisplacedOperator { .. } => ErrorKind::TypeMismatch,
            QueryError::InvalidDate { .. } | QueryError::InvalidRegex { .. } => {
                ErrorKind::LiteralConversion
            }
            QueryError::InvalidOperandType { .. } => ErrorKind::OperandTypeRestriction,
        }
    }
}

/// Result type for single-literal conversions
pub type QueryResult<T> = Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QueryError::NotLogical {
            variant: "StringLiteral",
        };
        assert_eq!(
            err.to_string(),
            "Expected logical expression but received expression of type StringLiteral"
        );

        let err = QueryError::InvalidField {
            pos: Position::new(1, 1),
            name: "AuthorNamey".to_string(),
        };
        assert_eq!(err.to_string(), "1:1: Invalid field: AuthorNamey");

        let err = QueryError::ParenNotBoolean {
            pos: Position::new(1, 14),
        };
        assert_eq!(
            err.to_string(),
            "1:14: Expression in parentheses must resolve to a boolean value"
        );

        let err = QueryError::InvalidDate {
            pos: Position::new(1, 14),
            raw: "2017-09-1".to_string(),
            date_format: "YYYY-MM-DD".to_string(),
            date_time_format: "YYYY-MM-DD HH:MM:SS".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "1:14: Invalid date: 2017-09-1. Format must be either YYYY-MM-DD or YYYY-MM-DD HH:MM:SS"
        );

        let err = QueryError::InvalidOperandType {
            pos: Position::new(1, 15),
            side: Side::Lhs,
            actual: ResolvedType::Number,
            allowed: vec![ResolvedType::String],
        };
        assert_eq!(
            err.to_string(),
            "1:15: Argument on LHS has invalid type: Number. Allowed types are: String"
        );

        let err = QueryError::InvalidOperandType {
            pos: Position::new(2, 3),
            side: Side::Rhs,
            actual: ResolvedType::Date,
            allowed: vec![ResolvedType::String, ResolvedType::Number],
        };
        assert_eq!(
            err.to_string(),
            "2:3: Argument on RHS has invalid type: Date. Allowed types are: String, Number"
        );

        let err = QueryError::MisplacedOperator {
            pos: Position::new(1, 1),
            token: "=".to_string(),
            context: "unary",
        };
        assert_eq!(err.to_string(), "1:1: Invalid operator = in unary expression");
    }

    #[test]
    fn test_error_position_and_kind() {
        let err = QueryError::NotLogical {
            variant: "Identifier",
        };
        assert_eq!(err.position(), None);
        assert_eq!(err.kind(), ErrorKind::Structural);

        let err = QueryError::InvalidRegex {
            pos: Position::new(1, 20),
            raw: "[".to_string(),
            reason: "unclosed character class".to_string(),
        };
        assert_eq!(err.position(), Some(Position::new(1, 20)));
        assert_eq!(err.kind(), ErrorKind::LiteralConversion);

        let err = QueryError::LogicalOperandsNotBoolean {
            pos: Position::new(1, 10),
        };
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }
}
