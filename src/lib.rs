pub mod context;
pub mod expression;
pub mod types;
