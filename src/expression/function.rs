//! Built-in scalar functions and the registry resolving them by name.

pub mod truncate;

pub use truncate::Truncate;

use crate::expression::{check_arity, ExprRef, Expression, ExpressionError, ExpressionResult};
use std::collections::HashMap;

/// An expression that is a call to a named built-in function
pub trait FunctionExpression: Expression {
    /// Name the function is called by in SQL
    fn function_name(&self) -> &'static str;

    /// Human-readable summary shown in function listings
    fn description(&self) -> &'static str;
}

/// Builds a function call over already-built argument expressions
pub type FunctionConstructor = fn(Vec<ExprRef>) -> ExpressionResult<ExprRef>;

#[derive(Debug, Clone, Copy)]
struct FunctionDef {
    name: &'static str,
    arity: usize,
    description: &'static str,
    constructor: FunctionConstructor,
}

/// Maps function names to constructors. Lookup is case-insensitive.
#[derive(Debug, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionDef>,
}

impl FunctionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in function
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(
            Truncate::NAME,
            2,
            Truncate::DESCRIPTION,
            Truncate::from_children,
        );
        registry
    }

    /// Register a function, replacing any previous one with the same name
    pub fn register(
        &mut self,
        name: &'static str,
        arity: usize,
        description: &'static str,
        constructor: FunctionConstructor,
    ) {
        self.functions.insert(
            name.to_ascii_lowercase(),
            FunctionDef {
                name,
                arity,
                description,
                constructor,
            },
        );
    }

    /// Build a call to `name` over `args`
    pub fn resolve(&self, name: &str, args: Vec<ExprRef>) -> ExpressionResult<ExprRef> {
        let def = self
            .functions
            .get(&name.to_ascii_lowercase())
            .ok_or_else(|| ExpressionError::UnknownFunction {
                name: name.to_string(),
            })?;
        check_arity(def.name, &args, def.arity)?;
        log::debug!("resolved function {} with {} arguments", def.name, args.len());
        (def.constructor)(args)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(&name.to_ascii_lowercase())
    }

    pub fn arity(&self, name: &str) -> Option<usize> {
        self.functions
            .get(&name.to_ascii_lowercase())
            .map(|def| def.arity)
    }

    pub fn description(&self, name: &str) -> Option<&'static str> {
        self.functions
            .get(&name.to_ascii_lowercase())
            .map(|def| def.description)
    }

    /// Registered function names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.functions.values().map(|def| def.name).collect();
        names.sort_unstable();
        names
    }
}
