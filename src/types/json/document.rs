//! Decoded JSON documents and their structural ordering.

use crate::context::ExecutionContext;
use crate::types::number::float_cmp;
use crate::types::{TypeError, TypeResult};
use serde_json::{Number, Value as JsonValue};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

/// Type class of a JSON value.
///
/// Documents of different classes order by class, in declaration order:
/// `null < boolean < number < string < array < object`. Stored orderings
/// depend on this sequence, so it must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JsonClass {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl JsonClass {
    pub fn of(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => JsonClass::Null,
            JsonValue::Bool(_) => JsonClass::Boolean,
            JsonValue::Number(_) => JsonClass::Number,
            JsonValue::String(_) => JsonClass::String,
            JsonValue::Array(_) => JsonClass::Array,
            JsonValue::Object(_) => JsonClass::Object,
        }
    }
}

/// An immutable, decoded JSON document
#[derive(Debug, Clone, PartialEq)]
pub struct JsonDocument {
    val: JsonValue,
}

impl JsonDocument {
    pub fn new(val: JsonValue) -> Self {
        Self { val }
    }

    /// The JSON `null` document. Not the same thing as SQL NULL.
    pub fn null() -> Self {
        Self::new(JsonValue::Null)
    }

    /// Decode a document from JSON text
    pub fn from_text(ctx: &ExecutionContext, text: &str) -> TypeResult<Self> {
        ctx.check_cancelled("JSON decode")?;
        let val = serde_json::from_str(text)
            .map_err(|_| TypeError::conversion(format!("'{}'", text), "JSON"))?;
        Ok(Self::new(val))
    }

    /// Decode a document from JSON text held in a byte payload
    pub fn from_bytes(ctx: &ExecutionContext, bytes: &[u8]) -> TypeResult<Self> {
        ctx.check_cancelled("JSON decode")?;
        let val = serde_json::from_slice(bytes).map_err(|_| {
            TypeError::conversion(format!("'{}'", String::from_utf8_lossy(bytes)), "JSON")
        })?;
        Ok(Self::new(val))
    }

    pub fn as_json(&self) -> &JsonValue {
        &self.val
    }

    pub fn into_json(self) -> JsonValue {
        self.val
    }

    pub fn class(&self) -> JsonClass {
        JsonClass::of(&self.val)
    }

    /// Structural comparison.
    ///
    /// Values of different classes order by [`JsonClass`]. Within a class:
    /// booleans order `false < true`; numbers by exact numeric value; strings
    /// byte-wise; arrays element by element, a proper prefix sorting first;
    /// objects key by key over the sorted union of both key sets, where the
    /// first key present in only one document puts that document last.
    pub fn compare(&self, ctx: &ExecutionContext, other: &JsonDocument) -> TypeResult<Ordering> {
        compare_values(ctx, &self.val, &other.val)
    }

    /// Canonical JSON text: compact, with object keys in sorted order
    pub fn to_json_string(&self, ctx: &ExecutionContext) -> TypeResult<String> {
        let mut out = String::new();
        write_canonical(&mut out, &self.val, Some(ctx))?;
        Ok(out)
    }
}

impl fmt::Display for JsonDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_canonical(&mut out, &self.val, None).map_err(|_| fmt::Error)?;
        f.write_str(&out)
    }
}

impl From<JsonValue> for JsonDocument {
    fn from(val: JsonValue) -> Self {
        Self::new(val)
    }
}

fn compare_values(ctx: &ExecutionContext, a: &JsonValue, b: &JsonValue) -> TypeResult<Ordering> {
    let ordering = match (a, b) {
        (JsonValue::Null, JsonValue::Null) => Ordering::Equal,
        (JsonValue::Bool(x), JsonValue::Bool(y)) => x.cmp(y),
        (JsonValue::Number(x), JsonValue::Number(y)) => compare_numbers(x, y),
        (JsonValue::String(x), JsonValue::String(y)) => x.as_bytes().cmp(y.as_bytes()),
        (JsonValue::Array(x), JsonValue::Array(y)) => {
            ctx.check_cancelled("JSON compare")?;
            for (l, r) in x.iter().zip(y.iter()) {
                let ordering = compare_values(ctx, l, r)?;
                if ordering != Ordering::Equal {
                    return Ok(ordering);
                }
            }
            x.len().cmp(&y.len())
        }
        (JsonValue::Object(x), JsonValue::Object(y)) => {
            ctx.check_cancelled("JSON compare")?;
            let keys: BTreeSet<&String> = x.keys().chain(y.keys()).collect();
            for key in keys {
                let ordering = match (x.get(key), y.get(key)) {
                    (Some(l), Some(r)) => compare_values(ctx, l, r)?,
                    (None, Some(_)) => Ordering::Less,
                    (Some(_), None) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                };
                if ordering != Ordering::Equal {
                    return Ok(ordering);
                }
            }
            Ordering::Equal
        }
        _ => JsonClass::of(a).cmp(&JsonClass::of(b)),
    };
    Ok(ordering)
}

fn as_integer(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    // JSON numbers are always finite, so as_f64 only fails for integers
    let af = a.as_f64().unwrap_or_default();
    let bf = b.as_f64().unwrap_or_default();
    match (as_integer(a), as_integer(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(x), None) => compare_int_float(x, bf),
        (None, Some(y)) => compare_int_float(y, af).reverse(),
        (None, None) => float_cmp(af, bf),
    }
}

/// Compare an integer with a float without losing precision on either side
fn compare_int_float(i: i128, f: f64) -> Ordering {
    if f.fract() != 0.0 {
        // |f| < 2^52 here, so rounding `i` cannot make them equal
        return float_cmp(i as f64, f);
    }
    if f >= i128::MAX as f64 {
        return Ordering::Less;
    }
    if f < i128::MIN as f64 {
        return Ordering::Greater;
    }
    i.cmp(&(f as i128))
}

fn write_canonical(
    out: &mut String,
    value: &JsonValue,
    ctx: Option<&ExecutionContext>,
) -> TypeResult<()> {
    match value {
        JsonValue::Array(items) => {
            if let Some(ctx) = ctx {
                ctx.check_cancelled("JSON encode")?;
            }
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(out, item, ctx)?;
            }
            out.push(']');
        }
        JsonValue::Object(entries) => {
            if let Some(ctx) = ctx {
                ctx.check_cancelled("JSON encode")?;
            }
            let mut keys: Vec<&String> = entries.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&JsonValue::String(key.clone()).to_string());
                out.push(':');
                write_canonical(out, &entries[key], ctx)?;
            }
            out.push('}');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
    Ok(())
}
