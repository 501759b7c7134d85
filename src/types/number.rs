//! The numeric family: signed and unsigned integers of every width plus
//! single and double precision floats.

use crate::context::ExecutionContext;
use crate::types::{
    compare_nulls, conversion_error, type_oids, DataType, SqlType, SqlValue, TypeId, TypeRef,
    TypeResult, Value,
};
use std::cmp::Ordering;
use std::fmt;

/// Width and signedness of a numeric type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberKind {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
}

impl NumberKind {
    pub fn is_float(self) -> bool {
        matches!(self, NumberKind::Float32 | NumberKind::Float64)
    }

    pub fn is_signed_int(self) -> bool {
        matches!(
            self,
            NumberKind::Int8 | NumberKind::Int16 | NumberKind::Int32 | NumberKind::Int64
        )
    }

    pub fn is_unsigned_int(self) -> bool {
        !self.is_float() && !self.is_signed_int()
    }
}

/// A numeric domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberType {
    kind: NumberKind,
}

/// A number extracted from any accepted input shape
#[derive(Debug, Clone, Copy)]
enum Num {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

impl Num {
    fn from_value(value: &Value) -> Option<Num> {
        match value {
            Value::Boolean(b) => Some(Num::Signed(*b as i64)),
            Value::Int8(n) => Some(Num::Signed(*n as i64)),
            Value::Int16(n) => Some(Num::Signed(*n as i64)),
            Value::Int32(n) => Some(Num::Signed(*n as i64)),
            Value::Int64(n) => Some(Num::Signed(*n)),
            Value::UInt8(n) => Some(Num::Unsigned(*n as u64)),
            Value::UInt16(n) => Some(Num::Unsigned(*n as u64)),
            Value::UInt32(n) => Some(Num::Unsigned(*n as u64)),
            Value::UInt64(n) => Some(Num::Unsigned(*n)),
            Value::Float32(n) => Some(Num::Float(*n as f64)),
            Value::Float64(n) => Some(Num::Float(*n)),
            Value::String(s) => Num::parse(s),
            Value::Bytes(b) => std::str::from_utf8(b).ok().and_then(Num::parse),
            Value::Json(doc) => {
                let n = doc.as_json().as_number()?;
                if let Some(i) = n.as_i64() {
                    Some(Num::Signed(i))
                } else if let Some(u) = n.as_u64() {
                    Some(Num::Unsigned(u))
                } else {
                    n.as_f64().map(Num::Float)
                }
            }
            Value::Null | Value::List(_) | Value::Map(_) => None,
        }
    }

    fn parse(text: &str) -> Option<Num> {
        let text = text.trim();
        if let Ok(i) = text.parse::<i64>() {
            return Some(Num::Signed(i));
        }
        if let Ok(u) = text.parse::<u64>() {
            return Some(Num::Unsigned(u));
        }
        // `f64::from_str` also accepts "inf" and "nan", which are not numeric literals
        match text.parse::<f64>() {
            Ok(f) if f.is_finite() => Some(Num::Float(f)),
            _ => None,
        }
    }

    fn to_int<T: TryFrom<i128>>(self) -> Option<T> {
        let wide = match self {
            Num::Signed(i) => i as i128,
            Num::Unsigned(u) => u as i128,
            Num::Float(f) => {
                if !f.is_finite() {
                    return None;
                }
                let rounded = f.round();
                let wide = rounded as i128;
                // `as` saturates, so a mismatch means the float was out of range
                if wide as f64 != rounded {
                    return None;
                }
                wide
            }
        };
        T::try_from(wide).ok()
    }

    fn to_f64(self) -> f64 {
        match self {
            Num::Signed(i) => i as f64,
            Num::Unsigned(u) => u as f64,
            Num::Float(f) => f,
        }
    }

    fn total_cmp(self, other: Num) -> Ordering {
        match (self, other) {
            (Num::Signed(a), Num::Signed(b)) => a.cmp(&b),
            (Num::Unsigned(a), Num::Unsigned(b)) => a.cmp(&b),
            (Num::Signed(a), Num::Unsigned(b)) => (a as i128).cmp(&(b as i128)),
            (Num::Unsigned(a), Num::Signed(b)) => (a as i128).cmp(&(b as i128)),
            (a, b) => float_cmp(a.to_f64(), b.to_f64()),
        }
    }
}

/// Total order over floats: `-0.0 == 0.0`, NaN equals NaN and sorts last
pub fn float_cmp(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b)
        .unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}

fn non_finite_text(f: f64) -> Option<&'static str> {
    if f.is_nan() {
        Some("NaN")
    } else if f.is_infinite() {
        Some(if f > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        None
    }
}

fn format_float(f: f64) -> String {
    non_finite_text(f).map_or_else(|| f.to_string(), str::to_string)
}

// Formatted at single precision so 0.1f32 renders as "0.1"
fn format_float32(f: f32) -> String {
    non_finite_text(f as f64).map_or_else(|| f.to_string(), str::to_string)
}

/// Widen an `f32` to the `f64` closest to its shortest decimal text, so
/// `0.1f32` becomes `0.1` rather than `0.10000000149011612`
pub fn widen_f32(f: f32) -> f64 {
    if !f.is_finite() {
        return f as f64;
    }
    f.to_string().parse::<f64>().unwrap_or(f as f64)
}

/// Compare two values in their own integer domains. Signed and unsigned
/// 64-bit integers compare exactly instead of through floats.
pub fn compare_integers(
    ctx: &ExecutionContext,
    left: TypeRef,
    a: &Value,
    right: TypeRef,
    b: &Value,
) -> TypeResult<Ordering> {
    let a = left.convert(ctx, a)?;
    let b = right.convert(ctx, b)?;
    if let Some(ordering) = compare_nulls(&a, &b) {
        return Ok(ordering);
    }
    match (Num::from_value(&a), Num::from_value(&b)) {
        (Some(x), Some(y)) => Ok(x.total_cmp(y)),
        (None, _) => Err(conversion_error(&a, left)),
        (_, None) => Err(conversion_error(&b, right)),
    }
}

impl NumberType {
    pub const fn new(kind: NumberKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> NumberKind {
        self.kind
    }

    /// Convert and unwrap a non-null value as `f64`
    pub fn to_f64(&self, ctx: &ExecutionContext, value: &Value) -> TypeResult<Option<f64>> {
        let converted = self.convert(ctx, value)?;
        Ok(Num::from_value(&converted).map(Num::to_f64))
    }

    fn cast(&self, num: Num) -> Option<Value> {
        let value = match self.kind {
            NumberKind::Int8 => Value::Int8(num.to_int()?),
            NumberKind::Int16 => Value::Int16(num.to_int()?),
            NumberKind::Int32 => Value::Int32(num.to_int()?),
            NumberKind::Int64 => Value::Int64(num.to_int()?),
            NumberKind::UInt8 => Value::UInt8(num.to_int()?),
            NumberKind::UInt16 => Value::UInt16(num.to_int()?),
            NumberKind::UInt32 => Value::UInt32(num.to_int()?),
            NumberKind::UInt64 => Value::UInt64(num.to_int()?),
            NumberKind::Float32 => Value::Float32(num.to_f64() as f32),
            NumberKind::Float64 => Value::Float64(num.to_f64()),
        };
        Some(value)
    }

    fn is_canonical(&self, value: &Value) -> bool {
        matches!(
            (self.kind, value),
            (NumberKind::Int8, Value::Int8(_))
                | (NumberKind::Int16, Value::Int16(_))
                | (NumberKind::Int32, Value::Int32(_))
                | (NumberKind::Int64, Value::Int64(_))
                | (NumberKind::UInt8, Value::UInt8(_))
                | (NumberKind::UInt16, Value::UInt16(_))
                | (NumberKind::UInt32, Value::UInt32(_))
                | (NumberKind::UInt64, Value::UInt64(_))
                | (NumberKind::Float32, Value::Float32(_))
                | (NumberKind::Float64, Value::Float64(_))
        )
    }
}

impl SqlType for NumberType {
    fn name(&self) -> &'static str {
        match self.kind {
            NumberKind::Int8 => "TINYINT",
            NumberKind::Int16 => "SMALLINT",
            NumberKind::Int32 => "INT",
            NumberKind::Int64 => "BIGINT",
            NumberKind::UInt8 => "TINYINT UNSIGNED",
            NumberKind::UInt16 => "SMALLINT UNSIGNED",
            NumberKind::UInt32 => "INT UNSIGNED",
            NumberKind::UInt64 => "BIGINT UNSIGNED",
            NumberKind::Float32 => "FLOAT",
            NumberKind::Float64 => "DOUBLE",
        }
    }

    fn data_type(&self) -> DataType {
        match self.kind {
            NumberKind::Int8 => DataType::Int8,
            NumberKind::Int16 => DataType::Int16,
            NumberKind::Int32 => DataType::Int32,
            NumberKind::Int64 => DataType::Int64,
            NumberKind::UInt8 => DataType::UInt8,
            NumberKind::UInt16 => DataType::UInt16,
            NumberKind::UInt32 => DataType::UInt32,
            NumberKind::UInt64 => DataType::UInt64,
            NumberKind::Float32 => DataType::Float32,
            NumberKind::Float64 => DataType::Float64,
        }
    }

    fn convert(&self, _ctx: &ExecutionContext, value: &Value) -> TypeResult<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        if self.is_canonical(value) {
            return Ok(value.clone());
        }
        Num::from_value(value)
            .and_then(|num| self.cast(num))
            .ok_or_else(|| conversion_error(value, self))
    }

    fn compare(&self, ctx: &ExecutionContext, a: &Value, b: &Value) -> TypeResult<Ordering> {
        let a = self.convert(ctx, a)?;
        let b = self.convert(ctx, b)?;
        if let Some(ordering) = compare_nulls(&a, &b) {
            return Ok(ordering);
        }
        match (Num::from_value(&a), Num::from_value(&b)) {
            (Some(x), Some(y)) => Ok(x.total_cmp(y)),
            _ => Err(conversion_error(&a, self)),
        }
    }

    fn promote(&self) -> TypeRef {
        if self.kind.is_float() {
            &crate::types::FLOAT64
        } else if self.kind.is_signed_int() {
            &crate::types::INT64
        } else {
            &crate::types::UINT64
        }
    }

    fn sql(&self, _ctx: &ExecutionContext, value: &Value) -> TypeResult<SqlValue> {
        let text = match value {
            Value::Float32(f) if self.kind == NumberKind::Float32 => format_float32(*f),
            Value::Float64(f) if self.kind == NumberKind::Float64 => format_float(*f),
            v if self.is_canonical(v) => v.to_string(),
            _ => return Ok(SqlValue::null(self.type_id())),
        };
        Ok(SqlValue::text(self.type_id(), text))
    }

    fn type_id(&self) -> TypeId {
        match self.kind {
            NumberKind::Int8 | NumberKind::Int16 | NumberKind::UInt8 => type_oids::INT2,
            NumberKind::Int32 | NumberKind::UInt16 => type_oids::INT4,
            NumberKind::Int64 | NumberKind::UInt32 => type_oids::INT8,
            NumberKind::UInt64 => type_oids::NUMERIC,
            NumberKind::Float32 => type_oids::FLOAT4,
            NumberKind::Float64 => type_oids::FLOAT8,
        }
    }

    fn zero(&self) -> Value {
        match self.kind {
            NumberKind::Int8 => Value::Int8(0),
            NumberKind::Int16 => Value::Int16(0),
            NumberKind::Int32 => Value::Int32(0),
            NumberKind::Int64 => Value::Int64(0),
            NumberKind::UInt8 => Value::UInt8(0),
            NumberKind::UInt16 => Value::UInt16(0),
            NumberKind::UInt32 => Value::UInt32(0),
            NumberKind::UInt64 => Value::UInt64(0),
            NumberKind::Float32 => Value::Float32(0.0),
            NumberKind::Float64 => Value::Float64(0.0),
        }
    }
}

impl fmt::Display for NumberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FLOAT32, FLOAT64, INT16, INT32, INT64, INT8, UINT64, UINT8};
    use crate::types::JsonDocument;

    fn ctx() -> ExecutionContext {
        ExecutionContext::empty()
    }

    #[test]
    fn test_convert_float() {
        let ctx = ctx();
        assert_eq!(FLOAT64.convert(&ctx, &Value::Int32(2)).unwrap(), Value::Float64(2.0));
        assert_eq!(
            FLOAT64.convert(&ctx, &Value::from("232.333")).unwrap(),
            Value::Float64(232.333)
        );
        assert_eq!(
            FLOAT64.convert(&ctx, &Value::from(" -2 ")).unwrap(),
            Value::Float64(-2.0)
        );
        assert_eq!(
            FLOAT64.convert(&ctx, &Value::Bytes(b"1.5".to_vec())).unwrap(),
            Value::Float64(1.5)
        );
        assert_eq!(
            FLOAT64.convert(&ctx, &Value::Boolean(true)).unwrap(),
            Value::Float64(1.0)
        );
        assert_eq!(
            FLOAT32.convert(&ctx, &Value::Float64(0.5)).unwrap(),
            Value::Float32(0.5)
        );

        let doc = JsonDocument::from_text(&ctx, "12.5").unwrap();
        assert_eq!(
            FLOAT64.convert(&ctx, &Value::Json(doc)).unwrap(),
            Value::Float64(12.5)
        );
    }

    #[test]
    fn test_convert_rejects_non_numbers() {
        let ctx = ctx();
        for bad in [
            Value::from("a"),
            Value::from("nan"),
            Value::from("inf"),
            Value::from(""),
            Value::List(vec![Value::Int32(1)]),
        ] {
            let err = FLOAT64.convert(&ctx, &bad).unwrap_err();
            assert!(err.is_conversion(), "{}", bad);
        }
        let err = FLOAT64.convert(&ctx, &Value::from("a")).unwrap_err();
        assert_eq!(err.to_string(), "value 'a' is not a valid DOUBLE");
    }

    #[test]
    fn test_convert_integer_range_and_rounding() {
        let ctx = ctx();
        assert_eq!(INT8.convert(&ctx, &Value::Int64(127)).unwrap(), Value::Int8(127));
        assert!(INT8.convert(&ctx, &Value::Int64(128)).is_err());
        assert!(UINT8.convert(&ctx, &Value::Int32(-1)).is_err());
        assert_eq!(INT32.convert(&ctx, &Value::Float64(2.5)).unwrap(), Value::Int32(3));
        assert_eq!(INT32.convert(&ctx, &Value::Float64(-2.5)).unwrap(), Value::Int32(-3));
        assert_eq!(INT16.convert(&ctx, &Value::from("12")).unwrap(), Value::Int16(12));
        assert!(INT64.convert(&ctx, &Value::Float64(f64::NAN)).is_err());
        assert!(INT64.convert(&ctx, &Value::Float64(1e19)).is_err());
        assert_eq!(
            UINT64.convert(&ctx, &Value::from("18446744073709551615")).unwrap(),
            Value::UInt64(u64::MAX)
        );
    }

    #[test]
    fn test_compare() {
        let ctx = ctx();
        assert_eq!(
            FLOAT64.compare(&ctx, &Value::Int32(1), &Value::from("1.5")).unwrap(),
            Ordering::Less
        );
        assert_eq!(
            FLOAT64.compare(&ctx, &Value::Float64(-0.0), &Value::Float64(0.0)).unwrap(),
            Ordering::Equal
        );
        assert_eq!(
            FLOAT64
                .compare(&ctx, &Value::Float64(f64::NAN), &Value::Float64(f64::INFINITY))
                .unwrap(),
            Ordering::Greater
        );
        assert_eq!(
            INT64.compare(&ctx, &Value::Null, &Value::Int64(-5)).unwrap(),
            Ordering::Less
        );
        assert_eq!(
            UINT64
                .compare(&ctx, &Value::UInt64(u64::MAX), &Value::UInt64(1))
                .unwrap(),
            Ordering::Greater
        );
        assert!(FLOAT64.compare(&ctx, &Value::from("x"), &Value::Int32(1)).is_err());
    }

    #[test]
    fn test_promote() {
        assert_eq!(INT8.promote().name(), "BIGINT");
        assert_eq!(UINT8.promote().name(), "BIGINT UNSIGNED");
        assert_eq!(FLOAT32.promote().name(), "DOUBLE");
        assert_eq!(FLOAT64.promote().name(), "DOUBLE");
    }

    #[test]
    fn test_sql_encoding() {
        let ctx = ctx();
        let v = FLOAT64.sql(&ctx, &Value::Float64(2200.0)).unwrap();
        assert_eq!(v.as_str(), Some("2200"));
        assert_eq!(v.type_id, type_oids::FLOAT8);

        let v = FLOAT64.sql(&ctx, &Value::Float64(f64::NEG_INFINITY)).unwrap();
        assert_eq!(v.as_str(), Some("-Infinity"));

        let v = FLOAT32.sql(&ctx, &Value::Float32(0.1)).unwrap();
        assert_eq!(v.as_str(), Some("0.1"));
        assert_eq!(v.type_id, type_oids::FLOAT4);
        let v = FLOAT32.sql(&ctx, &Value::Float32(f32::NAN)).unwrap();
        assert_eq!(v.as_str(), Some("NaN"));

        let v = INT32.sql(&ctx, &Value::Int32(-7)).unwrap();
        assert_eq!(v.as_str(), Some("-7"));
        assert_eq!(v.type_id, type_oids::INT4);

        assert!(INT32.sql(&ctx, &Value::from("7")).unwrap().is_null());
        assert!(INT32.sql(&ctx, &Value::Null).unwrap().is_null());
    }

    #[test]
    fn test_widen_f32() {
        assert_eq!(widen_f32(0.1), 0.1);
        assert_eq!(widen_f32(-2.5), -2.5);
        assert_eq!(widen_f32(f32::INFINITY), f64::INFINITY);
        assert!(widen_f32(f32::NAN).is_nan());
    }

    #[test]
    fn test_compare_integers_across_signedness() {
        let ctx = ctx();
        let big = 1i64 << 53;
        assert_eq!(
            compare_integers(&ctx, &INT64, &Value::Int64(big + 1), &UINT64, &Value::UInt64(big as u64))
                .unwrap(),
            Ordering::Greater
        );
        assert_eq!(
            compare_integers(&ctx, &INT64, &Value::Int64(i64::MAX), &UINT64, &Value::UInt64(1 << 63))
                .unwrap(),
            Ordering::Less
        );
        assert_eq!(
            compare_integers(&ctx, &UINT64, &Value::UInt64(u64::MAX), &INT64, &Value::Int64(-1))
                .unwrap(),
            Ordering::Greater
        );
        assert_eq!(
            compare_integers(&ctx, &INT64, &Value::Null, &UINT64, &Value::UInt64(0)).unwrap(),
            Ordering::Less
        );
        let err = compare_integers(&ctx, &INT64, &Value::from("x"), &UINT64, &Value::UInt64(0))
            .unwrap_err();
        assert_eq!(err.to_string(), "value 'x' is not a valid BIGINT");
    }

    #[test]
    fn test_zero() {
        assert_eq!(INT8.zero(), Value::Int8(0));
        assert_eq!(UINT64.zero(), Value::UInt64(0));
        assert_eq!(FLOAT64.zero(), Value::Float64(0.0));
    }
}
