//! The expression contract and shared child bookkeeping.

use crate::context::ExecutionContext;
use crate::expression::{ExpressionError, ExpressionResult};
use crate::types::{Row, TypeRef, Value};
use std::fmt;
use std::sync::Arc;

/// A node of an expression tree.
///
/// Nodes are immutable once built: they hold no context and no cached
/// state, so one tree can be evaluated from many threads at once, each with
/// its own context and row. Rewrites go through [`Expression::with_children`],
/// which builds a new node.
pub trait Expression: fmt::Display + fmt::Debug + Send + Sync {
    /// Evaluate this node against a row
    fn eval(&self, ctx: &ExecutionContext, row: &Row) -> ExpressionResult<Value>;

    /// Result type, derived from the shape of the tree without evaluating it
    fn sql_type(&self) -> TypeRef;

    /// Whether evaluation may produce NULL
    fn is_nullable(&self) -> bool;

    fn children(&self) -> Vec<ExprRef>;

    /// Build an equivalent node over new children
    fn with_children(&self, children: Vec<ExprRef>) -> ExpressionResult<ExprRef>;

    /// Check if this expression is a constant (reads no row values)
    fn is_constant(&self) -> bool {
        self.children().iter().all(|child| child.is_constant())
    }
}

/// Shared handle to an immutable expression node
pub type ExprRef = Arc<dyn Expression>;

/// Fail unless exactly `expected` children were supplied
pub fn check_arity(name: &str, children: &[ExprRef], expected: usize) -> ExpressionResult<()> {
    if children.len() != expected {
        return Err(ExpressionError::Arity {
            expression: name.to_string(),
            expected,
            actual: children.len(),
        });
    }
    Ok(())
}

/// Child storage for two-operand expressions
#[derive(Debug, Clone)]
pub struct BinaryExpression {
    pub left: ExprRef,
    pub right: ExprRef,
}

impl BinaryExpression {
    pub fn new(left: ExprRef, right: ExprRef) -> Self {
        Self { left, right }
    }

    /// Take exactly two children, failing with an arity error otherwise
    pub fn from_children(name: &str, children: Vec<ExprRef>) -> ExpressionResult<Self> {
        let [left, right]: [ExprRef; 2] =
            children
                .try_into()
                .map_err(|children: Vec<ExprRef>| ExpressionError::Arity {
                    expression: name.to_string(),
                    expected: 2,
                    actual: children.len(),
                })?;
        Ok(Self::new(left, right))
    }

    pub fn children(&self) -> Vec<ExprRef> {
        vec![self.left.clone(), self.right.clone()]
    }

    pub fn is_nullable(&self) -> bool {
        self.left.is_nullable() || self.right.is_nullable()
    }
}

/// Rebuild a tree bottom-up, replacing every node for which `rule` returns
/// a replacement. Untouched subtrees are shared with the input tree.
pub fn transform_up<F>(expr: &ExprRef, rule: &F) -> ExpressionResult<ExprRef>
where
    F: Fn(&ExprRef) -> Option<ExprRef>,
{
    let children = expr.children();
    let node = if children.is_empty() {
        expr.clone()
    } else {
        let mut changed = false;
        let mut new_children = Vec::with_capacity(children.len());
        for child in &children {
            let new_child = transform_up(child, rule)?;
            changed |= !Arc::ptr_eq(&new_child, child);
            new_children.push(new_child);
        }
        if changed {
            expr.with_children(new_children)?
        } else {
            expr.clone()
        }
    };
    Ok(rule(&node).unwrap_or(node))
}
