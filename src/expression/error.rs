//! Error types for expression evaluation.

use crate::types::TypeError;
use thiserror::Error;

/// Errors that can occur while building or evaluating expressions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    /// Conversion or cancellation failure from the type layer
    #[error(transparent)]
    Type(#[from] TypeError),

    /// Wrong number of children for an expression
    #[error("{expression} expects {expected} children, got {actual}")]
    Arity {
        expression: String,
        expected: usize,
        actual: usize,
    },

    /// Column index out of bounds
    #[error("Column index {index} out of bounds for row with {row_len} columns")]
    ColumnIndexOutOfBounds { index: usize, row_len: usize },

    /// Invalid function name
    #[error("Unknown function: {name}")]
    UnknownFunction { name: String },
}

impl ExpressionError {
    pub fn is_conversion(&self) -> bool {
        matches!(self, ExpressionError::Type(e) if e.is_conversion())
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ExpressionError::Type(e) if e.is_cancelled())
    }

    pub fn is_arity(&self) -> bool {
        matches!(self, ExpressionError::Arity { .. })
    }
}

/// Result type for expression operations
pub type ExpressionResult<T> = Result<T, ExpressionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExpressionError::Arity {
            expression: "truncate".to_string(),
            expected: 2,
            actual: 3,
        };
        assert_eq!(err.to_string(), "truncate expects 2 children, got 3");
        assert!(err.is_arity());

        let err = ExpressionError::ColumnIndexOutOfBounds {
            index: 5,
            row_len: 3,
        };
        assert_eq!(
            err.to_string(),
            "Column index 5 out of bounds for row with 3 columns"
        );

        let err = ExpressionError::UnknownFunction {
            name: "foo".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown function: foo");

        let err: ExpressionError = TypeError::conversion("'a'", "DOUBLE").into();
        assert_eq!(err.to_string(), "value 'a' is not a valid DOUBLE");
        assert!(err.is_conversion());
        assert!(!err.is_cancelled());
    }
}
