//! Canonical SQL value types.
//!
//! This module provides:
//!
//! - **Value**: the untyped carrier for every value shape the engine accepts
//! - **SqlType**: the contract each value domain implements (convert,
//!   compare, promote, SQL encoding, zero value)
//! - **Built-in domains**: NULL, BOOLEAN, the numeric family, TEXT and JSON,
//!   each exposed as a stateless static singleton
//!
//! Types hold no state, so a `TypeRef` can be shared freely between threads
//! evaluating the same expression tree.

pub mod boolean;
pub mod error;
pub mod json;
pub mod null;
pub mod number;
pub mod text;
pub mod value;
pub mod wire;

pub use boolean::BooleanType;
pub use error::{TypeError, TypeResult};
pub use json::{JsonClass, JsonDocument, JsonType};
pub use null::NullType;
pub use number::{compare_integers, widen_f32, NumberKind, NumberType};
pub use text::TextType;
pub use value::{Row, Value};
pub use wire::{type_oids, SqlValue, TypeId};

use crate::context::ExecutionContext;
use std::cmp::Ordering;
use std::fmt;

/// Contract implemented by every value domain
pub trait SqlType: fmt::Debug + fmt::Display + Send + Sync {
    /// Name of the domain as shown to users
    fn name(&self) -> &'static str;

    /// Which built-in domain this type is
    fn data_type(&self) -> DataType;

    /// Convert a value into this domain's canonical representation.
    /// NULL stays NULL; anything that cannot be interpreted is an error.
    fn convert(&self, ctx: &ExecutionContext, value: &Value) -> TypeResult<Value>;

    /// Compare two values after converting both into this domain.
    /// NULL sorts before every non-null value.
    fn compare(&self, ctx: &ExecutionContext, a: &Value, b: &Value) -> TypeResult<Ordering>;

    /// Type used when this type participates in implicit coercion
    fn promote(&self) -> TypeRef;

    /// Render a value for the client, tagged with this type's wire id
    fn sql(&self, ctx: &ExecutionContext, value: &Value) -> TypeResult<SqlValue>;

    /// Wire type id of this domain
    fn type_id(&self) -> TypeId;

    /// Zero value of this domain
    fn zero(&self) -> Value;
}

/// Reference to one of the static type singletons
pub type TypeRef = &'static dyn SqlType;

pub static NULL: NullType = NullType;
pub static BOOLEAN: BooleanType = BooleanType;
pub static INT8: NumberType = NumberType::new(NumberKind::Int8);
pub static INT16: NumberType = NumberType::new(NumberKind::Int16);
pub static INT32: NumberType = NumberType::new(NumberKind::Int32);
pub static INT64: NumberType = NumberType::new(NumberKind::Int64);
pub static UINT8: NumberType = NumberType::new(NumberKind::UInt8);
pub static UINT16: NumberType = NumberType::new(NumberKind::UInt16);
pub static UINT32: NumberType = NumberType::new(NumberKind::UInt32);
pub static UINT64: NumberType = NumberType::new(NumberKind::UInt64);
pub static FLOAT32: NumberType = NumberType::new(NumberKind::Float32);
pub static FLOAT64: NumberType = NumberType::new(NumberKind::Float64);
pub static TEXT: TextType = TextType;
pub static JSON: JsonType = JsonType;

/// Built-in value domains
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Null = 0,
    Boolean = 1,
    Int8 = 2,
    Int16 = 3,
    Int32 = 4,
    Int64 = 5,
    UInt8 = 6,
    UInt16 = 7,
    UInt32 = 8,
    UInt64 = 9,
    Float32 = 10,
    Float64 = 11,
    Text = 12,
    Json = 13,
}

impl DataType {
    pub fn from_u8(value: u8) -> TypeResult<Self> {
        let data_type = match value {
            0 => DataType::Null,
            1 => DataType::Boolean,
            2 => DataType::Int8,
            3 => DataType::Int16,
            4 => DataType::Int32,
            5 => DataType::Int64,
            6 => DataType::UInt8,
            7 => DataType::UInt16,
            8 => DataType::UInt32,
            9 => DataType::UInt64,
            10 => DataType::Float32,
            11 => DataType::Float64,
            12 => DataType::Text,
            13 => DataType::Json,
            _ => return Err(TypeError::conversion(value.to_string(), "data type tag")),
        };
        Ok(data_type)
    }

    /// The static type singleton for this domain
    pub fn sql_type(self) -> TypeRef {
        match self {
            DataType::Null => &NULL,
            DataType::Boolean => &BOOLEAN,
            DataType::Int8 => &INT8,
            DataType::Int16 => &INT16,
            DataType::Int32 => &INT32,
            DataType::Int64 => &INT64,
            DataType::UInt8 => &UINT8,
            DataType::UInt16 => &UINT16,
            DataType::UInt32 => &UINT32,
            DataType::UInt64 => &UINT64,
            DataType::Float32 => &FLOAT32,
            DataType::Float64 => &FLOAT64,
            DataType::Text => &TEXT,
            DataType::Json => &JSON,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
                | DataType::Float32
                | DataType::Float64
        )
    }
}

/// All built-in types, in `DataType` tag order
pub fn builtin_types() -> [TypeRef; 14] {
    [
        &NULL, &BOOLEAN, &INT8, &INT16, &INT32, &INT64, &UINT8, &UINT16, &UINT32, &UINT64,
        &FLOAT32, &FLOAT64, &TEXT, &JSON,
    ]
}

/// Order SQL NULLs first. Returns `None` when neither side is NULL.
pub(crate) fn compare_nulls(a: &Value, b: &Value) -> Option<Ordering> {
    match (a.is_null(), b.is_null()) {
        (true, true) => Some(Ordering::Equal),
        (true, false) => Some(Ordering::Less),
        (false, true) => Some(Ordering::Greater),
        (false, false) => None,
    }
}

/// Render a value into an error for the given domain
pub(crate) fn conversion_error(value: &Value, domain: &dyn SqlType) -> TypeError {
    TypeError::conversion(value.to_string(), domain.name())
}
