//! Request tickets
//!
//! A remote call cannot be cancelled once dispatched. Instead, every dispatch
//! is stamped with a generation number and the identity it targets; issuing a
//! newer ticket (or invalidating) makes every older ticket stale, and a stale
//! response is dropped instead of applied.

/// Proof that a request was dispatched, carried back with its response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    generation: u64,
    key: K,
}

impl<K> Ticket<K> {
    /// Identity the request was issued for
    pub fn key(&self) -> &K {
        &self.key
    }
}

/// Issues tickets for one kind of request; only the newest one is current
#[derive(Debug, Default)]
pub struct TicketIssuer {
    current: u64,
}

impl TicketIssuer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket, superseding every earlier one
    pub fn issue<K>(&mut self, key: K) -> Ticket<K> {
        self.current += 1;
        Ticket {
            generation: self.current,
            key,
        }
    }

    pub fn is_current<K>(&self, ticket: &Ticket<K>) -> bool {
        ticket.generation == self.current
    }

    /// Makes every outstanding ticket stale
    pub fn invalidate(&mut self) {
        self.current += 1;
    }
}
