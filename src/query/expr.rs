//! Filter query expression tree.

use crate::query::config::DEFAULT_DATE_TIME_FORMAT;
use crate::query::operator::{Operator, OperatorKind};
use crate::query::position::Position;
use chrono::{DateTime, Local};
use regex::Regex;
use std::fmt;

/// Field name as written in the query
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub pos: Position,
}

/// Quoted string whose meaning depends on the surrounding comparison
#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub raw: String,
    pub pos: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberLiteral {
    pub value: f64,
    pub pos: Position,
}

/// Point in time produced from a string compared against a date field
#[derive(Debug, Clone, PartialEq)]
pub struct DateLiteral {
    pub value: DateTime<Local>,
    pub pos: Position,
}

/// Glob pattern; compiled by whoever evaluates the query
#[derive(Debug, Clone, PartialEq)]
pub struct GlobLiteral {
    pub pattern: String,
    pub pos: Position,
}

/// Compiled regular expression.
///
/// Two regex literals are equal when their source patterns are equal.
#[derive(Debug, Clone)]
pub struct RegexLiteral {
    pub regex: Regex,
    pub pos: Position,
}

impl RegexLiteral {
    pub fn source(&self) -> &str {
        self.regex.as_str()
    }
}

impl PartialEq for RegexLiteral {
    fn eq(&self, other: &Self) -> bool {
        self.source() == other.source() && self.pos == other.pos
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpression {
    pub operator: Operator,
    pub operand: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    pub operator: Operator,
    pub lhs: Box<Expression>,
    pub rhs: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParenExpression {
    pub inner: Box<Expression>,
}

/// Expression tree node
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    StringLiteral(StringLiteral),
    NumberLiteral(NumberLiteral),
    DateLiteral(DateLiteral),
    GlobLiteral(GlobLiteral),
    RegexLiteral(RegexLiteral),
    Unary(UnaryExpression),
    Binary(BinaryExpression),
    Paren(ParenExpression),
}

impl Expression {
    /// Create a field reference
    pub fn identifier(name: impl Into<String>, pos: Position) -> Self {
        Expression::Identifier(Identifier {
            name: name.into(),
            pos,
        })
    }

    /// Create an unrefined string literal
    pub fn string(raw: impl Into<String>, pos: Position) -> Self {
        Expression::StringLiteral(StringLiteral {
            raw: raw.into(),
            pos,
        })
    }

    pub fn number(value: f64, pos: Position) -> Self {
        Expression::NumberLiteral(NumberLiteral { value, pos })
    }

    pub fn date(value: DateTime<Local>, pos: Position) -> Self {
        Expression::DateLiteral(DateLiteral { value, pos })
    }

    pub fn glob(pattern: impl Into<String>, pos: Position) -> Self {
        Expression::GlobLiteral(GlobLiteral {
            pattern: pattern.into(),
            pos,
        })
    }

    pub fn regex(regex: Regex, pos: Position) -> Self {
        Expression::RegexLiteral(RegexLiteral { regex, pos })
    }

    /// Create a binary expression
    pub fn binary(operator: Operator, lhs: Expression, rhs: Expression) -> Self {
        Expression::Binary(BinaryExpression {
            operator,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    /// Create a binary expression using the canonical token for `kind`
    pub fn binary_op(kind: OperatorKind, pos: Position, lhs: Expression, rhs: Expression) -> Self {
        Self::binary(Operator::new(kind, pos), lhs, rhs)
    }

    pub fn unary(operator: Operator, operand: Expression) -> Self {
        Expression::Unary(UnaryExpression {
            operator,
            operand: Box::new(operand),
        })
    }

    /// Create an AND expression
    pub fn and(pos: Position, lhs: Expression, rhs: Expression) -> Self {
        Self::binary_op(OperatorKind::And, pos, lhs, rhs)
    }

    /// Create an OR expression
    pub fn or(pos: Position, lhs: Expression, rhs: Expression) -> Self {
        Self::binary_op(OperatorKind::Or, pos, lhs, rhs)
    }

    /// Create a NOT expression
    pub fn not(pos: Position, operand: Expression) -> Self {
        Self::unary(Operator::new(OperatorKind::Not, pos), operand)
    }

    /// Wrap an expression in parentheses
    pub fn paren(inner: Expression) -> Self {
        Expression::Paren(ParenExpression {
            inner: Box::new(inner),
        })
    }

    /// Position of the token that starts this expression
    pub fn pos(&self) -> Position {
        match self {
            Expression::Identifier(ident) => ident.pos,
            Expression::StringLiteral(lit) => lit.pos,
            Expression::NumberLiteral(lit) => lit.pos,
            Expression::DateLiteral(lit) => lit.pos,
            Expression::GlobLiteral(lit) => lit.pos,
            Expression::RegexLiteral(lit) => lit.pos,
            Expression::Unary(unary) => unary.operator.pos,
            Expression::Binary(binary) => binary.lhs.pos(),
            Expression::Paren(paren) => paren.inner.pos(),
        }
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            Expression::Identifier(_) => "Identifier",
            Expression::StringLiteral(_) => "StringLiteral",
            Expression::NumberLiteral(_) => "NumberLiteral",
            Expression::DateLiteral(_) => "DateLiteral",
            Expression::GlobLiteral(_) => "GlobLiteral",
            Expression::RegexLiteral(_) => "RegexLiteral",
            Expression::Unary(_) => "UnaryExpression",
            Expression::Binary(_) => "BinaryExpression",
            Expression::Paren(_) => "ParenExpression",
        }
    }

    /// Whether this node has a shape that can produce a boolean
    pub fn is_logical(&self) -> bool {
        matches!(
            self,
            Expression::Unary(_) | Expression::Binary(_) | Expression::Paren(_)
        )
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in text.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            _ => write!(f, "{}", c)?,
        }
    }
    f.write_str("\"")
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(ident) => f.write_str(&ident.name),
            Expression::StringLiteral(lit) => write_quoted(f, &lit.raw),
            Expression::NumberLiteral(lit) => write!(f, "{}", lit.value),
            Expression::DateLiteral(lit) => {
                write_quoted(f, &lit.value.format(DEFAULT_DATE_TIME_FORMAT).to_string())
            }
            Expression::GlobLiteral(lit) => write_quoted(f, &lit.pattern),
            Expression::RegexLiteral(lit) => write_quoted(f, lit.source()),
            Expression::Unary(unary) => write!(f, "{} {}", unary.operator.token, unary.operand),
            Expression::Binary(binary) => {
                write!(f, "{} {} {}", binary.lhs, binary.operator.token, binary.rhs)
            }
            Expression::Paren(paren) => write!(f, "({})", paren.inner),
        }
    }
}
