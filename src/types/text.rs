use crate::context::ExecutionContext;
use crate::types::{
    compare_nulls, conversion_error, type_oids, DataType, SqlType, SqlValue, TypeId, TypeRef,
    TypeResult, Value,
};
use std::cmp::Ordering;
use std::fmt;

/// The TEXT domain. Comparison is binary (byte-wise), independent of locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextType;

impl SqlType for TextType {
    fn name(&self) -> &'static str {
        "TEXT"
    }

    fn data_type(&self) -> DataType {
        DataType::Text
    }

    fn convert(&self, ctx: &ExecutionContext, value: &Value) -> TypeResult<Value> {
        let text = match value {
            Value::Null => return Ok(Value::Null),
            Value::String(_) => return Ok(value.clone()),
            Value::Bytes(bytes) => String::from_utf8(bytes.clone())
                .map_err(|_| conversion_error(value, self))?,
            Value::Boolean(b) => (if *b { "1" } else { "0" }).to_string(),
            Value::Json(doc) => doc.to_json_string(ctx)?,
            Value::List(_) | Value::Map(_) => return Err(conversion_error(value, self)),
            // numbers render the same way they are displayed
            v => v.to_string(),
        };
        Ok(Value::String(text))
    }

    fn compare(&self, ctx: &ExecutionContext, a: &Value, b: &Value) -> TypeResult<Ordering> {
        let a = self.convert(ctx, a)?;
        let b = self.convert(ctx, b)?;
        if let Some(ordering) = compare_nulls(&a, &b) {
            return Ok(ordering);
        }
        match (&a, &b) {
            (Value::String(x), Value::String(y)) => Ok(x.as_bytes().cmp(y.as_bytes())),
            _ => Err(conversion_error(&a, self)),
        }
    }

    fn promote(&self) -> TypeRef {
        &crate::types::TEXT
    }

    fn sql(&self, _ctx: &ExecutionContext, value: &Value) -> TypeResult<SqlValue> {
        match value {
            Value::String(s) => Ok(SqlValue::text(self.type_id(), s.clone())),
            _ => Ok(SqlValue::null(self.type_id())),
        }
    }

    fn type_id(&self) -> TypeId {
        type_oids::TEXT
    }

    fn zero(&self) -> Value {
        Value::String(String::new())
    }
}

impl fmt::Display for TextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::JsonDocument;

    #[test]
    fn test_convert() {
        let ctx = ExecutionContext::empty();
        assert_eq!(
            TextType.convert(&ctx, &Value::Float64(2.5)).unwrap(),
            Value::from("2.5")
        );
        assert_eq!(
            TextType.convert(&ctx, &Value::Bytes(b"abc".to_vec())).unwrap(),
            Value::from("abc")
        );
        assert_eq!(
            TextType.convert(&ctx, &Value::Boolean(true)).unwrap(),
            Value::from("1")
        );
        assert!(TextType.convert(&ctx, &Value::Bytes(vec![0xff, 0xfe])).is_err());

        let doc = JsonDocument::from_text(&ctx, r#"{"b": 1, "a": [true]}"#).unwrap();
        assert_eq!(
            TextType.convert(&ctx, &Value::Json(doc)).unwrap(),
            Value::from(r#"{"a":[true],"b":1}"#)
        );
    }

    #[test]
    fn test_compare_is_binary() {
        let ctx = ExecutionContext::empty().with_locale("sv_SE");
        assert_eq!(
            TextType
                .compare(&ctx, &Value::from("Z"), &Value::from("a"))
                .unwrap(),
            Ordering::Less
        );
        assert_eq!(
            TextType
                .compare(&ctx, &Value::from("10"), &Value::Int32(10))
                .unwrap(),
            Ordering::Equal
        );
    }
}
