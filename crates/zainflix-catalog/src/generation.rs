use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Guards against a superseded fetch overwriting newer state: each refresh
/// takes a ticket, and a result is applied only while its ticket is still
/// the latest one issued. A late-resolving response whose ticket has gone
/// stale is dropped.
#[derive(Clone, Default)]
pub struct RequestGeneration {
    counter: Arc<AtomicU64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl RequestGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request generation, invalidating all earlier tickets.
    pub fn begin(&self) -> Ticket {
        Ticket(self.counter.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.counter.load(Ordering::SeqCst) == ticket.0
    }
}
