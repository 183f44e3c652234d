//! Last-request-wins bookkeeping for overlapping fetches.
//!
//! Every initiation bumps a generation counter and hands out a ticket. A
//! completion may only touch shared state while its ticket still carries the
//! latest generation; anything older was superseded and is dropped on arrival.

use crate::cache::CacheKey;

/// Proof that a fetch was initiated, carried through to its completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    key: CacheKey,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub(crate) fn into_key(self) -> CacheKey {
        self.key
    }
}

#[derive(Debug, Default)]
pub struct FetchSequencer {
    generation: u64,
}

impl FetchSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supersede everything in flight and issue a ticket for `key`.
    pub fn begin(&mut self, key: CacheKey) -> FetchTicket {
        self.generation += 1;
        FetchTicket { generation: self.generation, key }
    }

    /// Supersede everything in flight without issuing a request, e.g. when
    /// the new view is served from cache.
    pub fn supersede(&mut self) {
        self.generation += 1;
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
