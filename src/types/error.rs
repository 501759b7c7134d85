//! Type layer error types.

use thiserror::Error;

/// Errors raised while converting or comparing values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TypeError {
    /// The value cannot be interpreted in the target domain.
    #[error("value {value} is not a valid {domain}")]
    Conversion { value: String, domain: String },

    /// The execution context was cancelled or ran past its deadline.
    #[error("operation cancelled: {operation}")]
    Cancelled { operation: String },
}

impl TypeError {
    pub fn conversion(value: impl Into<String>, domain: impl Into<String>) -> Self {
        TypeError::Conversion {
            value: value.into(),
            domain: domain.into(),
        }
    }

    pub fn cancelled(operation: impl Into<String>) -> Self {
        TypeError::Cancelled {
            operation: operation.into(),
        }
    }

    pub fn is_conversion(&self) -> bool {
        matches!(self, TypeError::Conversion { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, TypeError::Cancelled { .. })
    }
}

/// Result type for type layer operations.
pub type TypeResult<T> = Result<T, TypeError>;
