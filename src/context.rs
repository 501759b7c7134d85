//! Per-query execution context.
//!
//! A context is created for each query (or session) and passed by reference
//! into every conversion, comparison and evaluation call. Types and
//! expressions never store one, so a single expression tree can be
//! evaluated concurrently under different contexts.

use crate::types::{TypeError, TypeResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default locale of a context created without one
pub const DEFAULT_LOCALE: &str = "en_US";

/// Execution context threaded through evaluation
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// Session the query belongs to
    pub session_id: u64,
    /// Query identifier within the session
    pub query_id: u64,
    /// Session locale. Numeric and JSON comparisons never consult it.
    pub locale: String,
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl ExecutionContext {
    /// Create a context for the given session
    pub fn new(session_id: u64) -> Self {
        Self {
            session_id,
            query_id: 0,
            locale: DEFAULT_LOCALE.to_string(),
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: None,
        }
    }

    /// Create a context not attached to any session
    pub fn empty() -> Self {
        Self::new(0)
    }

    pub fn with_query_id(mut self, query_id: u64) -> Self {
        self.query_id = query_id;
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Handle that can cancel this context from another thread
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            cancelled: self.cancelled.clone(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Fail with a cancellation error if the context was cancelled or its
    /// deadline has passed
    pub fn check_cancelled(&self, operation: &str) -> TypeResult<()> {
        if self.is_cancelled() {
            log::warn!(
                "session {} query {}: {} cancelled",
                self.session_id,
                self.query_id,
                operation
            );
            return Err(TypeError::cancelled(operation));
        }
        Ok(())
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::empty()
    }
}

/// Cancels the context it was obtained from
#[derive(Debug, Clone)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}
