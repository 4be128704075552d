//! Type checking and literal refinement for filter queries.
//!
//! The processor walks a parsed query bottom-up. Identifiers are resolved
//! against a [`FieldTypeSchema`], string literals are turned into date, glob
//! or regex literals where the surrounding comparison requires it, and every
//! operator is checked against the types of its operands. Errors are
//! collected rather than returned early, children before parents and left
//! before right, so a caller can show all of them at once.

use crate::query::config::ProcessorConfig;
use crate::query::error::{QueryError, Side};
use crate::query::expr::{
    BinaryExpression, Expression, Identifier, ParenExpression, UnaryExpression,
};
use crate::query::field::{FieldTypeSchema, ResolvedType};
use crate::query::literal::{to_date_literal, to_glob_literal, to_regex_literal};
use crate::query::operator::{Operator, OperatorKind};
use log::{debug, trace};

/// Outcome of processing a query
#[derive(Debug, Clone, PartialEq)]
pub struct Refined {
    /// Refined tree; the input root unchanged if it was not a logical expression
    pub expression: Expression,
    /// Every problem found, in reporting order
    pub errors: Vec<QueryError>,
}

impl Refined {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_parts(self) -> (Expression, Vec<QueryError>) {
        (self.expression, self.errors)
    }

    /// The refined expression if no errors were found
    pub fn into_result(self) -> Result<Expression, Vec<QueryError>> {
        if self.errors.is_empty() {
            Ok(self.expression)
        } else {
            Err(self.errors)
        }
    }
}

/// Refines query expressions against a field schema
pub struct ExpressionProcessor<'a, S: FieldTypeSchema + ?Sized> {
    schema: &'a S,
    config: ProcessorConfig,
}

impl<'a, S: FieldTypeSchema + ?Sized> ExpressionProcessor<'a, S> {
    pub fn new(schema: &'a S) -> Self {
        Self::with_config(schema, ProcessorConfig::default())
    }

    pub fn with_config(schema: &'a S, config: ProcessorConfig) -> Self {
        Self { schema, config }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Refine `root` and collect every error found in it.
    ///
    /// A root that is not a unary, binary or parenthesized expression cannot
    /// produce a boolean; it is returned untouched with a single error.
    pub fn process(&self, root: Expression) -> Refined {
        if !root.is_logical() {
            let error = QueryError::NotLogical {
                variant: root.variant_name(),
            };
            debug!("Rejecting query: {}", error);
            return Refined {
                expression: root,
                errors: vec![error],
            };
        }

        debug!("Processing query: {}", root);
        let mut errors = Vec::new();
        let (expression, _) = self.refine(root, &mut errors);
        debug!("Processed query with {} error(s)", errors.len());

        Refined { expression, errors }
    }

    fn record(&self, errors: &mut Vec<QueryError>, error: QueryError) {
        debug!("Query error: {}", error);
        errors.push(error);
    }

    /// Refine a node after its children and return its resolved type
    fn refine(
        &self,
        expr: Expression,
        errors: &mut Vec<QueryError>,
    ) -> (Expression, ResolvedType) {
        match expr {
            Expression::Identifier(ident) => {
                let field_type = self.resolve_identifier(&ident, errors);
                (Expression::Identifier(ident), field_type)
            }
            Expression::StringLiteral(lit) => {
                (Expression::StringLiteral(lit), ResolvedType::String)
            }
            Expression::GlobLiteral(lit) => (Expression::GlobLiteral(lit), ResolvedType::String),
            Expression::RegexLiteral(lit) => (Expression::RegexLiteral(lit), ResolvedType::String),
            Expression::NumberLiteral(lit) => {
                (Expression::NumberLiteral(lit), ResolvedType::Number)
            }
            Expression::DateLiteral(lit) => (Expression::DateLiteral(lit), ResolvedType::Date),
            Expression::Paren(paren) => self.refine_paren(paren, errors),
            Expression::Unary(unary) => self.refine_unary(unary, errors),
            Expression::Binary(binary) => self.refine_binary(binary, errors),
        }
    }

    fn resolve_identifier(&self, ident: &Identifier, errors: &mut Vec<QueryError>) -> ResolvedType {
        match self.schema.field_type(&ident.name) {
            Some(field_type) => field_type,
            None => {
                self.record(
                    errors,
                    QueryError::InvalidField {
                        pos: ident.pos,
                        name: ident.name.clone(),
                    },
                );
                ResolvedType::Invalid
            }
        }
    }

    fn refine_paren(
        &self,
        paren: ParenExpression,
        errors: &mut Vec<QueryError>,
    ) -> (Expression, ResolvedType) {
        let (inner, inner_type) = self.refine(*paren.inner, errors);

        if inner_type != ResolvedType::Boolean {
            self.record(errors, QueryError::ParenNotBoolean { pos: inner.pos() });
        }

        (Expression::paren(inner), ResolvedType::Boolean)
    }

    fn refine_unary(
        &self,
        unary: UnaryExpression,
        errors: &mut Vec<QueryError>,
    ) -> (Expression, ResolvedType) {
        let UnaryExpression { operator, operand } = unary;
        let (operand, operand_type) = self.refine(*operand, errors);

        if !operator.kind.is_unary() {
            self.record(
                errors,
                QueryError::MisplacedOperator {
                    pos: operator.pos,
                    token: operator.token.clone(),
                    context: "unary",
                },
            );
        } else if operand_type != ResolvedType::Boolean {
            self.record(
                errors,
                QueryError::NotOperandNotBoolean { pos: operator.pos },
            );
        }

        (Expression::unary(operator, operand), ResolvedType::Boolean)
    }

    fn refine_binary(
        &self,
        binary: BinaryExpression,
        errors: &mut Vec<QueryError>,
    ) -> (Expression, ResolvedType) {
        let BinaryExpression { operator, lhs, rhs } = binary;
        let (lhs, lhs_type) = self.refine(*lhs, errors);
        let (rhs, rhs_type) = self.refine(*rhs, errors);

        let (lhs, rhs) = if operator.kind.is_logical() {
            if lhs_type != ResolvedType::Boolean || rhs_type != ResolvedType::Boolean {
                self.record(
                    errors,
                    QueryError::LogicalOperandsNotBoolean { pos: operator.pos },
                );
            }
            (lhs, rhs)
        } else if operator.kind.is_comparison() {
            self.refine_comparison(&operator, (lhs, lhs_type), (rhs, rhs_type), errors)
        } else {
            self.record(
                errors,
                QueryError::MisplacedOperator {
                    pos: operator.pos,
                    token: operator.token.clone(),
                    context: "binary",
                },
            );
            (lhs, rhs)
        };

        (Expression::binary(operator, lhs, rhs), ResolvedType::Boolean)
    }

    /// Check the operands of a comparison and convert its string literals.
    ///
    /// Pattern operators compile the string literal opposite the field, or
    /// the RHS when both sides are literals. Other comparisons convert a
    /// string literal to a date when the opposite side is a date.
    fn refine_comparison(
        &self,
        operator: &Operator,
        (lhs, lhs_type): (Expression, ResolvedType),
        (rhs, rhs_type): (Expression, ResolvedType),
        errors: &mut Vec<QueryError>,
    ) -> (Expression, Expression) {
        if !lhs_type.is_value_type() || !rhs_type.is_value_type() {
            self.record(
                errors,
                QueryError::ComparisonNotValueTypes { pos: operator.pos },
            );
        }

        match operator.kind {
            OperatorKind::Glob | OperatorKind::Regexp => {
                self.check_operand_type(operator, Side::Lhs, lhs_type, errors);
                self.check_operand_type(operator, Side::Rhs, rhs_type, errors);
                if matches!(lhs, Expression::StringLiteral(_))
                    && !matches!(rhs, Expression::StringLiteral(_))
                {
                    (self.convert_pattern(operator.kind, lhs, errors), rhs)
                } else {
                    (lhs, self.convert_pattern(operator.kind, rhs, errors))
                }
            }
            _ => {
                let lhs = if rhs_type == ResolvedType::Date {
                    self.convert_date(lhs, errors)
                } else {
                    lhs
                };
                let rhs = if lhs_type == ResolvedType::Date {
                    self.convert_date(rhs, errors)
                } else {
                    rhs
                };
                (lhs, rhs)
            }
        }
    }

    fn check_operand_type(
        &self,
        operator: &Operator,
        side: Side,
        operand_type: ResolvedType,
        errors: &mut Vec<QueryError>,
    ) {
        let Some(allowed) = operator.kind.allowed_operand_types() else {
            return;
        };
        // Invalid and boolean operands have already been reported
        if matches!(operand_type, ResolvedType::Invalid | ResolvedType::Boolean)
            || allowed.contains(&operand_type)
        {
            return;
        }

        self.record(
            errors,
            QueryError::InvalidOperandType {
                pos: operator.pos,
                side,
                actual: operand_type,
                allowed: allowed.to_vec(),
            },
        );
    }

    fn convert_date(&self, expr: Expression, errors: &mut Vec<QueryError>) -> Expression {
        let Expression::StringLiteral(lit) = expr else {
            return expr;
        };

        match to_date_literal(&lit, &self.config) {
            Ok(date) => {
                trace!("{}: converted \"{}\" to date {}", lit.pos, lit.raw, date.value);
                Expression::DateLiteral(date)
            }
            Err(error) => {
                self.record(errors, error);
                Expression::StringLiteral(lit)
            }
        }
    }

    fn convert_pattern(
        &self,
        kind: OperatorKind,
        expr: Expression,
        errors: &mut Vec<QueryError>,
    ) -> Expression {
        let Expression::StringLiteral(lit) = expr else {
            return expr;
        };

        if kind == OperatorKind::Glob {
            trace!("{}: converted \"{}\" to glob", lit.pos, lit.raw);
            return Expression::GlobLiteral(to_glob_literal(lit));
        }

        match to_regex_literal(&lit) {
            Ok(regex) => {
                trace!("{}: compiled \"{}\" to regex", lit.pos, lit.raw);
                Expression::RegexLiteral(regex)
            }
            Err(error) => {
                self.record(errors, error);
                Expression::StringLiteral(lit)
            }
        }
    }
}

/// Helper function to refine a query with the default configuration
pub fn process_expression<S: FieldTypeSchema + ?Sized>(root: Expression, schema: &S) -> Refined {
    ExpressionProcessor::new(schema).process(root)
}
