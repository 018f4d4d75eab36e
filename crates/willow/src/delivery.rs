//! In-order delivery of concurrently completing transcriptions.
//!
//! Workers finish in whatever order Whisper happens to be fast; pasted
//! text must follow the order the recordings stopped. Each sealed
//! recording gets a sequence number at stop time, and this queue holds
//! early completions back until every earlier slot has resolved.

use std::collections::BTreeMap;

use tracing::{debug, warn};
use uuid::Uuid;

/// The resolved result of one recording session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    /// Delivery slot assigned when the recording stopped.
    pub seq: u64,
    /// The originating session, for log correlation.
    pub session_id: Uuid,
    /// Formatted text to paste. `None` when the session failed, timed
    /// out, or produced nothing worth pasting; the slot is still consumed
    /// so later sessions are never blocked.
    pub text: Option<String>,
}

/// Reorder buffer keyed by sequence number.
pub struct DeliveryQueue {
    next_seq: u64,
    held: BTreeMap<u64, SessionOutcome>,
}

impl DeliveryQueue {
    /// A queue expecting `first_seq` as its first deliverable slot.
    pub fn new(first_seq: u64) -> Self {
        Self {
            next_seq: first_seq,
            held: BTreeMap::new(),
        }
    }

    /// Record one completed outcome and drain everything now deliverable,
    /// in sequence order.
    pub fn push(&mut self, outcome: SessionOutcome) -> Vec<SessionOutcome> {
        if outcome.seq < self.next_seq {
            warn!(
                seq = outcome.seq,
                next_seq = self.next_seq,
                "Dropping duplicate delivery slot"
            );
            return Vec::new();
        }

        if outcome.seq > self.next_seq {
            debug!(
                seq = outcome.seq,
                waiting_for = self.next_seq,
                "Holding early completion for ordering"
            );
        }
        self.held.insert(outcome.seq, outcome);

        let mut ready = Vec::new();
        while let Some(outcome) = self.held.remove(&self.next_seq) {
            self.next_seq += 1;
            ready.push(outcome);
        }
        ready
    }

    /// Number of completions held back waiting for an earlier slot.
    pub fn held_len(&self) -> usize {
        self.held.len()
    }
}
