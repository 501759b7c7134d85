use crate::context::ExecutionContext;
use crate::expression::function::FunctionExpression;
use crate::expression::{BinaryExpression, ExprRef, Expression, ExpressionResult};
use crate::types::{Row, TypeRef, Value, FLOAT64};
use std::fmt;
use std::sync::Arc;

/// TRUNCATE(N, D): N truncated toward zero to D decimal places.
///
/// Both arguments are converted to DOUBLE, so numeric strings are accepted.
/// A negative D zeroes digits left of the decimal point. The result is
/// always a DOUBLE, and NULL if either argument is NULL. Place counts beyond
/// the range of a double return N unchanged (large D) or a signed zero
/// (large negative D).
#[derive(Debug, Clone)]
pub struct Truncate {
    operands: BinaryExpression,
}

impl Truncate {
    pub const NAME: &'static str = "truncate";
    pub const DESCRIPTION: &'static str = "returns the value of N truncated to D decimal places.";

    pub fn new(value: ExprRef, places: ExprRef) -> Self {
        Self {
            operands: BinaryExpression::new(value, places),
        }
    }

    /// Registry constructor: exactly two children, value then decimal places
    pub fn from_children(children: Vec<ExprRef>) -> ExpressionResult<ExprRef> {
        let operands = BinaryExpression::from_children(Self::NAME, children)?;
        Ok(Arc::new(Self { operands }))
    }
}

impl FunctionExpression for Truncate {
    fn function_name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        Self::DESCRIPTION
    }
}

impl Expression for Truncate {
    fn eval(&self, ctx: &ExecutionContext, row: &Row) -> ExpressionResult<Value> {
        let left = self.operands.left.eval(ctx, row)?;
        let Some(value) = FLOAT64.to_f64(ctx, &left)? else {
            return Ok(Value::Null);
        };

        let right = self.operands.right.eval(ctx, row)?;
        let Some(places) = FLOAT64.to_f64(ctx, &right)? else {
            return Ok(Value::Null);
        };

        let scale = 10f64.powf(-places);
        let truncated = if scale.is_infinite() {
            0.0f64.copysign(value)
        } else {
            let quotient = value / scale;
            if quotient.is_finite() {
                quotient.trunc() * scale
            } else {
                // more places than a double can hold
                value
            }
        };
        Ok(Value::Float64(truncated))
    }

    fn sql_type(&self) -> TypeRef {
        &FLOAT64
    }

    fn is_nullable(&self) -> bool {
        self.operands.is_nullable()
    }

    fn children(&self) -> Vec<ExprRef> {
        self.operands.children()
    }

    fn with_children(&self, children: Vec<ExprRef>) -> ExpressionResult<ExprRef> {
        Self::from_children(children)
    }
}

impl fmt::Display for Truncate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}, {})",
            Self::NAME,
            self.operands.left,
            self.operands.right
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{ExpressionError, GetField, Literal};
    use crate::types::{TypeError, INT32};

    fn truncate_fields() -> Truncate {
        Truncate::new(
            Arc::new(GetField::new(0, &FLOAT64, "", false)),
            Arc::new(GetField::new(1, &FLOAT64, "", false)),
        )
    }

    fn eval_row(values: Vec<Value>) -> ExpressionResult<Value> {
        truncate_fields().eval(&ExecutionContext::empty(), &Row::new(values))
    }

    #[test]
    fn test_truncate() {
        let cases: Vec<(&str, Value, Value, Value)> = vec![
            ("number and places are null", Value::Null, Value::Null, Value::Null),
            ("places is null", Value::Int32(2), Value::Null, Value::Null),
            ("number is null", Value::Null, Value::Int32(2), Value::Null),
            ("number is 0", Value::Int32(0), Value::Int32(2), Value::Float64(0.0)),
            ("number and places are 0", Value::Int32(0), Value::Int32(0), Value::Float64(0.0)),
            ("places is 0", Value::Float64(2.123), Value::Int32(0), Value::Float64(2.0)),
            (
                "number is negative",
                Value::Float64(-298.0123),
                Value::Int32(2),
                Value::Float64(-298.01),
            ),
            (
                "places is negative",
                Value::Float64(2231.1),
                Value::Int32(-2),
                Value::Float64(2200.0),
            ),
            (
                "number and places are numeric strings",
                Value::from("232.333"),
                Value::from("2"),
                Value::Float64(232.33),
            ),
            ("truncates toward zero", Value::Float64(-1.99), Value::Int32(0), Value::Float64(-1.0)),
        ];

        for (name, number, places, expected) in cases {
            let result = eval_row(vec![number, places]);
            assert_eq!(result, Ok(expected), "{}", name);
        }
    }

    #[test]
    fn test_extreme_places() {
        assert_eq!(
            eval_row(vec![Value::Float64(1.5), Value::Int32(400)]),
            Ok(Value::Float64(1.5))
        );
        assert_eq!(
            eval_row(vec![Value::Float64(1.5), Value::Int32(320)]),
            Ok(Value::Float64(1.5))
        );
        assert_eq!(
            eval_row(vec![Value::Float64(0.0), Value::Int32(400)]),
            Ok(Value::Float64(0.0))
        );
        assert_eq!(
            eval_row(vec![Value::Float64(1.5), Value::Int32(-400)]),
            Ok(Value::Float64(0.0))
        );
        let Ok(Value::Float64(negative)) =
            eval_row(vec![Value::Float64(-1.5), Value::Int32(-400)])
        else {
            panic!("expected a double");
        };
        assert_eq!(negative, 0.0);
        assert!(negative.is_sign_negative());
    }

    #[test]
    fn test_invalid_strings() {
        let err = eval_row(vec![Value::from("a"), Value::from("b")]).unwrap_err();
        assert!(err.is_conversion());
        assert_eq!(
            err,
            ExpressionError::Type(TypeError::conversion("'a'", "DOUBLE"))
        );

        // the number is converted before the places are looked at
        let err = eval_row(vec![Value::from("a"), Value::Null]).unwrap_err();
        assert!(err.is_conversion());

        let err = eval_row(vec![Value::Int32(1), Value::from("b")]).unwrap_err();
        assert_eq!(
            err,
            ExpressionError::Type(TypeError::conversion("'b'", "DOUBLE"))
        );
    }

    #[test]
    fn test_child_errors_propagate() {
        let err = eval_row(vec![Value::Int32(1)]).unwrap_err();
        assert_eq!(
            err,
            ExpressionError::ColumnIndexOutOfBounds {
                index: 1,
                row_len: 1
            }
        );
    }

    #[test]
    fn test_result_type_and_nullability() {
        let call = Truncate::new(
            Arc::new(GetField::new(0, &INT32, "n", false)),
            Arc::new(Literal::from_value(Value::Int32(1))),
        );
        assert_eq!(call.sql_type().name(), "DOUBLE");
        assert!(!call.is_nullable());
        assert_eq!(call.function_name(), "truncate");
        assert_eq!(
            call.description(),
            "returns the value of N truncated to D decimal places."
        );

        let nullable = Truncate::new(
            Arc::new(GetField::new(0, &INT32, "n", true)),
            Arc::new(Literal::from_value(Value::Int32(1))),
        );
        assert!(nullable.is_nullable());

        let with_null = Truncate::new(
            Arc::new(GetField::new(0, &INT32, "n", false)),
            Arc::new(Literal::null()),
        );
        assert!(with_null.is_nullable());
    }

    #[test]
    fn test_display() {
        assert_eq!(truncate_fields().to_string(), "truncate(#0, #1)");
        let call = Truncate::new(
            Arc::new(GetField::new(0, &FLOAT64, "price", true)),
            Arc::new(Literal::from_value(Value::Int32(-2))),
        );
        assert_eq!(call.to_string(), "truncate(price, -2)");
    }

    #[test]
    fn test_with_children() {
        let call = truncate_fields();
        let one: ExprRef = Arc::new(Literal::from_value(Value::Int32(1)));

        for count in [0, 1, 3] {
            let err = call.with_children(vec![one.clone(); count]).unwrap_err();
            assert_eq!(
                err,
                ExpressionError::Arity {
                    expression: "truncate".to_string(),
                    expected: 2,
                    actual: count
                }
            );
        }

        let rebuilt = call
            .with_children(vec![
                Arc::new(Literal::from_value(Value::Float64(9.99))),
                one,
            ])
            .unwrap();
        assert_eq!(rebuilt.to_string(), "truncate(9.99, 1)");
        assert_eq!(
            rebuilt.eval(&ExecutionContext::empty(), &Row::empty()).unwrap(),
            Value::Float64(9.9)
        );
        assert_eq!(call.children().len(), 2);
        assert_eq!(call.to_string(), "truncate(#0, #1)");
    }

    #[test]
    fn test_cancelled_context_ignored_for_numeric_operands() {
        let ctx = ExecutionContext::empty();
        ctx.cancel_handle().cancel();
        // numbers never decode JSON, so cancellation is not observed
        let call = truncate_fields();
        let row = Row::new(vec![Value::Float64(1.5), Value::Int32(0)]);
        assert_eq!(call.eval(&ctx, &row).unwrap(), Value::Float64(1.0));
    }
}
