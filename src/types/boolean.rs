use crate::context::ExecutionContext;
use crate::types::{
    compare_nulls, conversion_error, type_oids, DataType, SqlType, SqlValue, TypeId, TypeRef,
    TypeResult, Value, FLOAT64,
};
use std::cmp::Ordering;
use std::fmt;

/// The BOOLEAN domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BooleanType;

impl BooleanType {
    fn parse(text: &str) -> Option<bool> {
        match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }
}

impl SqlType for BooleanType {
    fn name(&self) -> &'static str {
        "BOOLEAN"
    }

    fn data_type(&self) -> DataType {
        DataType::Boolean
    }

    fn convert(&self, ctx: &ExecutionContext, value: &Value) -> TypeResult<Value> {
        let b = match value {
            Value::Null => return Ok(Value::Null),
            Value::Boolean(b) => *b,
            Value::String(s) => Self::parse(s).ok_or_else(|| conversion_error(value, self))?,
            Value::Bytes(bytes) => std::str::from_utf8(bytes)
                .ok()
                .and_then(Self::parse)
                .ok_or_else(|| conversion_error(value, self))?,
            Value::Json(doc) => doc
                .as_json()
                .as_bool()
                .ok_or_else(|| conversion_error(value, self))?,
            v if v.is_numeric() => match FLOAT64.to_f64(ctx, v)? {
                Some(f) => f != 0.0,
                None => return Err(conversion_error(value, self)),
            },
            _ => return Err(conversion_error(value, self)),
        };
        Ok(Value::Boolean(b))
    }

    fn compare(&self, ctx: &ExecutionContext, a: &Value, b: &Value) -> TypeResult<Ordering> {
        let a = self.convert(ctx, a)?;
        let b = self.convert(ctx, b)?;
        if let Some(ordering) = compare_nulls(&a, &b) {
            return Ok(ordering);
        }
        match (&a, &b) {
            (Value::Boolean(x), Value::Boolean(y)) => Ok(x.cmp(y)),
            _ => Err(conversion_error(&a, self)),
        }
    }

    fn promote(&self) -> TypeRef {
        &crate::types::BOOLEAN
    }

    fn sql(&self, _ctx: &ExecutionContext, value: &Value) -> TypeResult<SqlValue> {
        match value {
            Value::Boolean(b) => Ok(SqlValue::text(self.type_id(), if *b { "t" } else { "f" })),
            _ => Ok(SqlValue::null(self.type_id())),
        }
    }

    fn type_id(&self) -> TypeId {
        type_oids::BOOL
    }

    fn zero(&self) -> Value {
        Value::Boolean(false)
    }
}

impl fmt::Display for BooleanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
