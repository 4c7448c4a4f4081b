//! Per-request mutable context, cancellation and deadlines.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;

/// Cooperative cancellation flag shared between a caller and an in-flight
/// request. Cloning yields a handle to the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Mutable state scoped to a single pipeline send.
///
/// Policies may stash arbitrary values here to communicate along the chain.
/// The context also carries the request's cancellation token and optional
/// absolute deadline, both observed by the transport and by retrying
/// policies.
#[derive(Debug, Clone, Default)]
pub struct Context {
    values: HashMap<String, Value>,
    cancel: CancelToken,
    deadline: Option<Instant>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Share a caller-owned token so the caller can cancel mid-flight.
    pub fn set_cancel_token(&mut self, token: CancelToken) {
        self.cancel = token;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn set_deadline(&mut self, deadline: Instant) {
        self.deadline = Some(deadline);
    }

    /// Convenience: set the deadline `timeout` from now.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.deadline = Some(Instant::now() + timeout);
    }

    /// True once the token fired or the deadline passed.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Time left until the deadline. `None` when no deadline is set.
    pub fn time_remaining(&self) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_shared_between_clones() {
        let token = CancelToken::new();
        let handle = token.clone();
        assert!(!token.is_cancelled());
        handle.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn expired_deadline_counts_as_cancelled() {
        let mut ctx = Context::new();
        assert!(!ctx.is_cancelled());
        ctx.set_deadline(Instant::now() - Duration::from_millis(1));
        assert!(ctx.is_cancelled());
        assert_eq!(ctx.time_remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn values_round_trip() {
        let mut ctx = Context::new();
        ctx.insert("attempt", 2);
        assert_eq!(ctx.get("attempt"), Some(&Value::from(2)));
        assert_eq!(ctx.remove("attempt"), Some(Value::from(2)));
        assert!(ctx.get("attempt").is_none());
    }
}
