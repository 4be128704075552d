//! Semantic analysis for the filter query language.
//!
//! This module provides:
//! - Expression tree representation with source positions
//! - The field schema contract used to resolve identifiers
//! - Type checking of logical, unary and comparison operators
//! - Refinement of string literals into date, glob and regex literals

pub mod config;
pub mod error;
pub mod expr;
pub mod field;
pub mod literal;
pub mod operator;
pub mod position;
pub mod processor;

pub use config::ProcessorConfig;
pub use error::{ErrorKind, QueryError, QueryResult, Side};
pub use expr::{
    BinaryExpression, DateLiteral, Expression, GlobLiteral, Identifier, NumberLiteral,
    ParenExpression, RegexLiteral, StringLiteral, UnaryExpression,
};
pub use field::{FieldTypeSchema, ResolvedType};
pub use operator::{Operator, OperatorKind};
pub use position::Position;
pub use processor::{process_expression, ExpressionProcessor, Refined};
