use crate::types::json::JsonDocument;
use crate::types::{widen_f32, DataType};
use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Values flowing through the expression engine.
///
/// This is the closed set of shapes every type's `convert` dispatches over.
/// `List` and `Map` are host collection shapes: they have no SQL domain of
/// their own and are only accepted by the JSON type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    String(String),
    Bytes(Vec<u8>),
    Json(JsonDocument),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get the data type this value natively belongs to
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => Some(DataType::Null),
            Value::Boolean(_) => Some(DataType::Boolean),
            Value::Int8(_) => Some(DataType::Int8),
            Value::Int16(_) => Some(DataType::Int16),
            Value::Int32(_) => Some(DataType::Int32),
            Value::Int64(_) => Some(DataType::Int64),
            Value::UInt8(_) => Some(DataType::UInt8),
            Value::UInt16(_) => Some(DataType::UInt16),
            Value::UInt32(_) => Some(DataType::UInt32),
            Value::UInt64(_) => Some(DataType::UInt64),
            Value::Float32(_) => Some(DataType::Float32),
            Value::Float64(_) => Some(DataType::Float64),
            Value::String(_) => Some(DataType::Text),
            Value::Json(_) => Some(DataType::Json),
            Value::Bytes(_) | Value::List(_) | Value::Map(_) => None,
        }
    }

    /// Check if this value belongs to the numeric family
    pub fn is_numeric(&self) -> bool {
        self.data_type().is_some_and(DataType::is_numeric)
    }

    /// Short name of the value's shape, used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Int8(_) => "int8",
            Value::Int16(_) => "int16",
            Value::Int32(_) => "int32",
            Value::Int64(_) => "int64",
            Value::UInt8(_) => "uint8",
            Value::UInt16(_) => "uint16",
            Value::UInt32(_) => "uint32",
            Value::UInt64(_) => "uint64",
            Value::Float32(_) => "float32",
            Value::Float64(_) => "float64",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Json(_) => "json",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Int8(n) => write!(f, "{}", n),
            Value::Int16(n) => write!(f, "{}", n),
            Value::Int32(n) => write!(f, "{}", n),
            Value::Int64(n) => write!(f, "{}", n),
            Value::UInt8(n) => write!(f, "{}", n),
            Value::UInt16(n) => write!(f, "{}", n),
            Value::UInt32(n) => write!(f, "{}", n),
            Value::UInt64(n) => write!(f, "{}", n),
            Value::Float32(n) => write!(f, "{}", n),
            Value::Float64(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Value::Bytes(bytes) => {
                write!(f, "x'")?;
                for b in bytes {
                    write!(f, "{:02x}", b)?;
                }
                write!(f, "'")
            }
            Value::Json(doc) => write!(f, "{}", doc),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, item)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, item)?;
                }
                write!(f, "}}")
            }
        }
    }
}

// Generic marshalling used by the JSON fallback path. Non-finite floats have
// no JSON representation and fail instead of silently becoming null.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Int8(n) => serializer.serialize_i8(*n),
            Value::Int16(n) => serializer.serialize_i16(*n),
            Value::Int32(n) => serializer.serialize_i32(*n),
            Value::Int64(n) => serializer.serialize_i64(*n),
            Value::UInt8(n) => serializer.serialize_u8(*n),
            Value::UInt16(n) => serializer.serialize_u16(*n),
            Value::UInt32(n) => serializer.serialize_u32(*n),
            Value::UInt64(n) => serializer.serialize_u64(*n),
            Value::Float32(n) if !n.is_finite() => {
                Err(S::Error::custom(format!("unsupported value: {}", n)))
            }
            Value::Float32(n) => serializer.serialize_f64(widen_f32(*n)),
            Value::Float64(n) if !n.is_finite() => {
                Err(S::Error::custom(format!("unsupported value: {}", n)))
            }
            Value::Float64(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Bytes(bytes) => serializer.serialize_bytes(bytes),
            Value::Json(doc) => doc.as_json().serialize(serializer),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, item) in entries {
                    map.serialize_entry(key, item)?;
                }
                map.end()
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar!(
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    String => String,
    Vec<u8> => Bytes,
    JsonDocument => Json,
);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// An input row: an ordered, position-addressable sequence of values
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

impl FromIterator<Value> for Row {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_data_type() {
        assert_eq!(Value::Null.data_type(), Some(DataType::Null));
        assert_eq!(Value::Int32(42).data_type(), Some(DataType::Int32));
        assert_eq!(Value::Float64(1.5).data_type(), Some(DataType::Float64));
        assert_eq!(
            Value::String("hello".to_string()).data_type(),
            Some(DataType::Text)
        );
        assert_eq!(Value::Bytes(vec![1]).data_type(), None);
        assert_eq!(Value::List(vec![]).data_type(), None);

        assert!(Value::UInt16(7).is_numeric());
        assert!(!Value::Boolean(true).is_numeric());
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Float64(2200.0).to_string(), "2200");
        assert_eq!(Value::from("it's").to_string(), "'it''s'");
        assert_eq!(Value::Bytes(vec![0x0a, 0xff]).to_string(), "x'0aff'");
        assert_eq!(
            Value::List(vec![Value::Int32(1), Value::from("a")]).to_string(),
            "[1, 'a']"
        );
    }

    #[test]
    fn test_value_from() {
        assert_eq!(Value::from(true), Value::Boolean(true));
        assert_eq!(Value::from(3u64), Value::UInt64(3));
        assert_eq!(Value::from(Some(2.5f64)), Value::Float64(2.5));
        assert_eq!(Value::from(None::<i32>), Value::Null);
    }

    #[test]
    fn test_serialize_rejects_non_finite() {
        let list = Value::List(vec![Value::Float64(1.0), Value::Float64(f64::NAN)]);
        assert!(serde_json::to_value(&list).is_err());

        let map = Value::Map(BTreeMap::from([
            ("a".to_string(), Value::Int64(1)),
            ("b".to_string(), Value::Null),
        ]));
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json, serde_json::json!({"a": 1, "b": null}));
    }

    #[test]
    fn test_row_access() {
        let row = Row::new(vec![Value::Int32(1), Value::Null]);
        assert_eq!(row.len(), 2);
        assert_eq!(row.get(0), Some(&Value::Int32(1)));
        assert_eq!(row.get(2), None);
        assert!(Row::empty().is_empty());

        let collected: Row = vec![Value::Boolean(false)].into_iter().collect();
        assert_eq!(collected.values(), &[Value::Boolean(false)]);
    }
}
