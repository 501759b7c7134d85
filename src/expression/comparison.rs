//! Comparison predicates.

use crate::context::ExecutionContext;
use crate::expression::{BinaryExpression, ExprRef, Expression, ExpressionResult};
use crate::types::{
    compare_integers, DataType, Row, TypeRef, Value, BOOLEAN, FLOAT64, INT64, JSON, TEXT, UINT64,
};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl ComparisonOperator {
    /// Whether an ordering between the operands satisfies this operator
    pub fn matches(&self, ordering: Ordering) -> bool {
        match self {
            ComparisonOperator::Eq => ordering == Ordering::Equal,
            ComparisonOperator::Ne => ordering != Ordering::Equal,
            ComparisonOperator::Lt => ordering == Ordering::Less,
            ComparisonOperator::Le => ordering != Ordering::Greater,
            ComparisonOperator::Gt => ordering == Ordering::Greater,
            ComparisonOperator::Ge => ordering != Ordering::Less,
        }
    }

    /// Get the display string for this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperator::Eq => "=",
            ComparisonOperator::Ne => "!=",
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Le => "<=",
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Ge => ">=",
        }
    }
}

/// Signed against unsigned integers, which have no common integer domain
fn is_mixed_integer(left: TypeRef, right: TypeRef) -> bool {
    matches!(
        (left.promote().data_type(), right.promote().data_type()),
        (DataType::Int64, DataType::UInt64) | (DataType::UInt64, DataType::Int64)
    )
}

/// Domain both operands are converted into before comparing.
///
/// Signed against unsigned integers map to DOUBLE here, but `Comparison`
/// compares such operands exactly in their own integer domains.
pub fn comparison_type(left: TypeRef, right: TypeRef) -> TypeRef {
    let (l, r) = (left.data_type(), right.data_type());
    match (l, r) {
        (DataType::Null, _) => right,
        (_, DataType::Null) => left,
        (DataType::Json, _) | (_, DataType::Json) => &JSON,
        _ if l == r => left.promote(),
        _ if l.is_numeric() && r.is_numeric() => {
            let (lp, rp) = (left.promote().data_type(), right.promote().data_type());
            match (lp, rp) {
                (DataType::Int64, DataType::Int64) => &INT64,
                (DataType::UInt64, DataType::UInt64) => &UINT64,
                _ => &FLOAT64,
            }
        }
        _ => &TEXT,
    }
}

/// Compares two operands with one of the comparison operators
#[derive(Debug, Clone)]
pub struct Comparison {
    op: ComparisonOperator,
    operands: BinaryExpression,
}

impl Comparison {
    pub fn new(op: ComparisonOperator, left: ExprRef, right: ExprRef) -> Self {
        Self {
            op,
            operands: BinaryExpression::new(left, right),
        }
    }

    pub fn op(&self) -> ComparisonOperator {
        self.op
    }
}

impl Expression for Comparison {
    fn eval(&self, ctx: &ExecutionContext, row: &Row) -> ExpressionResult<Value> {
        let left = self.operands.left.eval(ctx, row)?;
        if left.is_null() {
            return Ok(Value::Null);
        }
        let right = self.operands.right.eval(ctx, row)?;
        if right.is_null() {
            return Ok(Value::Null);
        }

        let (left_ty, right_ty) = (self.operands.left.sql_type(), self.operands.right.sql_type());
        let ordering = if is_mixed_integer(left_ty, right_ty) {
            compare_integers(ctx, left_ty.promote(), &left, right_ty.promote(), &right)?
        } else {
            comparison_type(left_ty, right_ty).compare(ctx, &left, &right)?
        };
        Ok(Value::Boolean(self.op.matches(ordering)))
    }

    fn sql_type(&self) -> TypeRef {
        &BOOLEAN
    }

    fn is_nullable(&self) -> bool {
        self.operands.is_nullable()
    }

    fn children(&self) -> Vec<ExprRef> {
        self.operands.children()
    }

    fn with_children(&self, children: Vec<ExprRef>) -> ExpressionResult<ExprRef> {
        let operands = BinaryExpression::from_children(self.op.as_str(), children)?;
        Ok(Arc::new(Self {
            op: self.op,
            operands,
        }))
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({} {} {})",
            self.operands.left,
            self.op.as_str(),
            self.operands.right
        )
    }
}
