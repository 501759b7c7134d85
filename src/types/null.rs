use crate::context::ExecutionContext;
use crate::types::{
    conversion_error, type_oids, DataType, SqlType, SqlValue, TypeId, TypeRef, TypeResult, Value,
};
use std::cmp::Ordering;
use std::fmt;

/// Type of the bare NULL literal. Its only value is NULL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NullType;

impl SqlType for NullType {
    fn name(&self) -> &'static str {
        "NULL"
    }

    fn data_type(&self) -> DataType {
        DataType::Null
    }

    fn convert(&self, _ctx: &ExecutionContext, value: &Value) -> TypeResult<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            other => Err(conversion_error(other, self)),
        }
    }

    fn compare(&self, ctx: &ExecutionContext, a: &Value, b: &Value) -> TypeResult<Ordering> {
        self.convert(ctx, a)?;
        self.convert(ctx, b)?;
        Ok(Ordering::Equal)
    }

    fn promote(&self) -> TypeRef {
        &crate::types::NULL
    }

    fn sql(&self, _ctx: &ExecutionContext, _value: &Value) -> TypeResult<SqlValue> {
        Ok(SqlValue::null(self.type_id()))
    }

    fn type_id(&self) -> TypeId {
        type_oids::UNKNOWN
    }

    fn zero(&self) -> Value {
        Value::Null
    }
}

impl fmt::Display for NullType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
