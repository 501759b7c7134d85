use crate::context::ExecutionContext;
use crate::expression::{check_arity, ExprRef, Expression, ExpressionResult};
use crate::types::{DataType, Row, TypeRef, Value, JSON, TEXT};
use std::fmt;
use std::sync::Arc;

/// Literal constant value in an expression
#[derive(Debug, Clone)]
pub struct Literal {
    value: Value,
    ty: TypeRef,
}

impl Literal {
    pub fn new(value: Value, ty: TypeRef) -> Self {
        Self { value, ty }
    }

    /// Create a literal typed by the value's own domain
    pub fn from_value(value: Value) -> Self {
        let ty = match value.data_type() {
            Some(data_type) => data_type.sql_type(),
            None if matches!(value, Value::Bytes(_)) => &TEXT,
            None => &JSON,
        };
        Self::new(value, ty)
    }

    pub fn null() -> Self {
        Self::new(Value::Null, DataType::Null.sql_type())
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl Expression for Literal {
    fn eval(&self, _ctx: &ExecutionContext, _row: &Row) -> ExpressionResult<Value> {
        Ok(self.value.clone())
    }

    fn sql_type(&self) -> TypeRef {
        self.ty
    }

    fn is_nullable(&self) -> bool {
        self.value.is_null()
    }

    fn children(&self) -> Vec<ExprRef> {
        vec![]
    }

    fn with_children(&self, children: Vec<ExprRef>) -> ExpressionResult<ExprRef> {
        check_arity("literal", &children, 0)?;
        Ok(Arc::new(self.clone()))
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
