//! The JSON domain.

pub mod document;

pub use document::{JsonClass, JsonDocument};

use crate::context::ExecutionContext;
use crate::types::{
    compare_nulls, conversion_error, type_oids, widen_f32, DataType, SqlType, SqlValue, TypeId,
    TypeRef, TypeResult, Value,
};
use serde_json::{Map, Number, Value as JsonValue};
use std::cmp::Ordering;
use std::fmt;

/// The JSON domain. Canonical values are `Value::Json` documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonType;

impl JsonType {
    /// Scalar elements a homogeneous collection may be built from directly
    fn scalar_to_json(value: &Value) -> Option<JsonValue> {
        let json = match value {
            Value::Boolean(b) => JsonValue::Bool(*b),
            Value::Int8(n) => JsonValue::from(*n),
            Value::Int16(n) => JsonValue::from(*n),
            Value::Int32(n) => JsonValue::from(*n),
            Value::Int64(n) => JsonValue::from(*n),
            Value::UInt8(n) => JsonValue::from(*n),
            Value::UInt16(n) => JsonValue::from(*n),
            Value::UInt32(n) => JsonValue::from(*n),
            Value::UInt64(n) => JsonValue::from(*n),
            Value::Float32(n) => JsonValue::Number(Number::from_f64(widen_f32(*n))?),
            Value::Float64(n) => JsonValue::Number(Number::from_f64(*n)?),
            Value::String(s) => JsonValue::String(s.clone()),
            _ => return None,
        };
        Some(json)
    }

    fn is_homogeneous<'a>(mut items: impl Iterator<Item = &'a Value>) -> bool {
        let Some(first) = items.next() else {
            return true;
        };
        let kind = std::mem::discriminant(first);
        Self::scalar_kind(first) && items.all(|v| std::mem::discriminant(v) == kind)
    }

    fn scalar_kind(value: &Value) -> bool {
        value.is_numeric() || matches!(value, Value::Boolean(_) | Value::String(_))
    }

    fn from_list(&self, items: &[Value]) -> Option<JsonValue> {
        let array = items
            .iter()
            .map(Self::scalar_to_json)
            .collect::<Option<Vec<_>>>()?;
        Some(JsonValue::Array(array))
    }

    fn from_map(&self, entries: &std::collections::BTreeMap<String, Value>) -> Option<JsonValue> {
        let mut object = Map::new();
        for (key, item) in entries {
            object.insert(key.clone(), Self::scalar_to_json(item)?);
        }
        Some(JsonValue::Object(object))
    }

    /// Generic two-step path: serialize the value, then decode the result
    fn marshal(&self, value: &Value) -> TypeResult<Value> {
        log::debug!(
            "converting {} to JSON through generic serialization",
            value.kind_name()
        );
        let json = serde_json::to_value(value).map_err(|_| conversion_error(value, self))?;
        Ok(Value::Json(JsonDocument::new(json)))
    }
}

impl SqlType for JsonType {
    fn name(&self) -> &'static str {
        "JSON"
    }

    fn data_type(&self) -> DataType {
        DataType::Json
    }

    fn convert(&self, ctx: &ExecutionContext, value: &Value) -> TypeResult<Value> {
        let json = match value {
            Value::Null => return Ok(Value::Null),
            Value::Json(_) => return Ok(value.clone()),
            Value::String(s) => return Ok(Value::Json(JsonDocument::from_text(ctx, s)?)),
            Value::Bytes(b) => return Ok(Value::Json(JsonDocument::from_bytes(ctx, b)?)),
            Value::List(items) if Self::is_homogeneous(items.iter()) => self.from_list(items),
            Value::Map(entries) if Self::is_homogeneous(entries.values()) => {
                self.from_map(entries)
            }
            other => return self.marshal(other),
        };
        json.map(|json| Value::Json(JsonDocument::new(json)))
            .ok_or_else(|| conversion_error(value, self))
    }

    fn compare(&self, ctx: &ExecutionContext, a: &Value, b: &Value) -> TypeResult<Ordering> {
        let a = self.convert(ctx, a)?;
        let b = self.convert(ctx, b)?;
        if let Some(ordering) = compare_nulls(&a, &b) {
            return Ok(ordering);
        }
        match (&a, &b) {
            (Value::Json(x), Value::Json(y)) => x.compare(ctx, y),
            _ => Err(conversion_error(&a, self)),
        }
    }

    fn promote(&self) -> TypeRef {
        &crate::types::JSON
    }

    fn sql(&self, ctx: &ExecutionContext, value: &Value) -> TypeResult<SqlValue> {
        match value {
            Value::Json(doc) => Ok(SqlValue::text(self.type_id(), doc.to_json_string(ctx)?)),
            _ => Ok(SqlValue::null(self.type_id())),
        }
    }

    fn type_id(&self) -> TypeId {
        type_oids::JSON
    }

    fn zero(&self) -> Value {
        Value::Json(JsonDocument::null())
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
