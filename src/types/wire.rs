//! Tagged values handed to the protocol layer.

use bytes::Bytes;
use std::fmt;

/// PostgreSQL-compatible type OID identifying a value's wire type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub i32);

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// PostgreSQL type OIDs
pub mod type_oids {
    use super::TypeId;

    pub const BOOL: TypeId = TypeId(16);
    pub const BYTEA: TypeId = TypeId(17);
    pub const INT8: TypeId = TypeId(20);
    pub const INT2: TypeId = TypeId(21);
    pub const INT4: TypeId = TypeId(23);
    pub const TEXT: TypeId = TypeId(25);
    pub const JSON: TypeId = TypeId(114);
    pub const FLOAT4: TypeId = TypeId(700);
    pub const FLOAT8: TypeId = TypeId(701);
    pub const UNKNOWN: TypeId = TypeId(705);
    pub const NUMERIC: TypeId = TypeId(1700);
}

/// A value rendered for the client: wire type plus text payload.
/// A missing payload is the NULL marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlValue {
    pub type_id: TypeId,
    pub payload: Option<Bytes>,
}

impl SqlValue {
    pub fn null(type_id: TypeId) -> Self {
        Self {
            type_id,
            payload: None,
        }
    }

    pub fn text(type_id: TypeId, text: impl Into<String>) -> Self {
        Self {
            type_id,
            payload: Some(Bytes::from(text.into())),
        }
    }

    pub fn is_null(&self) -> bool {
        self.payload.is_none()
    }

    /// The payload as UTF-8 text, if present and valid
    pub fn as_str(&self) -> Option<&str> {
        self.payload
            .as_deref()
            .and_then(|b| std::str::from_utf8(b).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_value() {
        let v = SqlValue::text(type_oids::JSON, "[1,2,3]");
        assert!(!v.is_null());
        assert_eq!(v.as_str(), Some("[1,2,3]"));
        assert_eq!(v.type_id, TypeId(114));

        let null = SqlValue::null(type_oids::FLOAT8);
        assert!(null.is_null());
        assert_eq!(null.as_str(), None);
    }
}
