//! Expression trees evaluated against rows.
//!
//! This module provides:
//! - The `Expression` contract shared by every node
//! - Leaves (`Literal`, `GetField`) and comparison predicates
//! - Named built-in functions and the registry resolving them
//! - Bottom-up rewriting through `with_children`

pub mod comparison;
pub mod error;
pub mod expr;
pub mod function;
pub mod get_field;
pub mod literal;

pub use comparison::{comparison_type, Comparison, ComparisonOperator};
pub use error::{ExpressionError, ExpressionResult};
pub use expr::{check_arity, transform_up, BinaryExpression, ExprRef, Expression};
pub use function::{FunctionExpression, FunctionRegistry, Truncate};
pub use get_field::GetField;
pub use literal::Literal;
