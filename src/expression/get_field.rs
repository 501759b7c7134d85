use crate::context::ExecutionContext;
use crate::expression::{check_arity, ExprRef, Expression, ExpressionError, ExpressionResult};
use crate::types::{Row, TypeRef, Value};
use std::fmt;
use std::sync::Arc;

/// Reads one position of the input row
#[derive(Debug, Clone)]
pub struct GetField {
    /// Column index in the row (0-based)
    index: usize,
    ty: TypeRef,
    /// Column name for display; may be empty
    name: String,
    nullable: bool,
}

impl GetField {
    pub fn new(index: usize, ty: TypeRef, name: impl Into<String>, nullable: bool) -> Self {
        Self {
            index,
            ty,
            name: name.into(),
            nullable,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Expression for GetField {
    fn eval(&self, _ctx: &ExecutionContext, row: &Row) -> ExpressionResult<Value> {
        row.get(self.index)
            .cloned()
            .ok_or(ExpressionError::ColumnIndexOutOfBounds {
                index: self.index,
                row_len: row.len(),
            })
    }

    fn sql_type(&self) -> TypeRef {
        self.ty
    }

    fn is_nullable(&self) -> bool {
        self.nullable
    }

    fn children(&self) -> Vec<ExprRef> {
        vec![]
    }

    fn with_children(&self, children: Vec<ExprRef>) -> ExpressionResult<ExprRef> {
        check_arity("field", &children, 0)?;
        Ok(Arc::new(self.clone()))
    }

    fn is_constant(&self) -> bool {
        false
    }
}

impl fmt::Display for GetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "#{}", self.index)
        } else {
            write!(f, "{}", self.name)
        }
    }
}
