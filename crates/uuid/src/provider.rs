//! Injectable sources of identifiers and time.

use crate::{DocumentId, Timestamp};
use std::sync::atomic::{AtomicU64, Ordering};

/// Supplies fresh document identifiers and the current UTC time.
pub trait IdentityProvider: Send + Sync {
    /// Returns an identifier that is unique with overwhelming probability.
    fn new_document_id(&self) -> DocumentId;

    /// Returns the current time, truncated to whole seconds.
    fn now_utc(&self) -> Timestamp;
}

/// Provider backed by the system clock and OS randomness.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemIdentity;

impl IdentityProvider for SystemIdentity {
    fn new_document_id(&self) -> DocumentId {
        DocumentId::new()
    }

    fn now_utc(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Provider with a frozen clock and a reproducible identifier sequence.
///
/// Explicit ids passed to [`FixedIdentity::with_ids`] are handed out first, in order.
/// After that, ids are derived from the seed and a counter, so two providers built
/// with the same arguments yield the same sequence.
#[derive(Debug)]
pub struct FixedIdentity {
    now: Timestamp,
    seed: u64,
    ids: Vec<DocumentId>,
    issued: AtomicU64,
}

impl FixedIdentity {
    pub fn new(now: Timestamp) -> Self {
        Self::seeded(now, 0)
    }

    pub fn seeded(now: Timestamp, seed: u64) -> Self {
        Self {
            now,
            seed,
            ids: Vec::new(),
            issued: AtomicU64::new(0),
        }
    }

    pub fn with_ids(now: Timestamp, ids: Vec<DocumentId>) -> Self {
        Self {
            ids,
            ..Self::new(now)
        }
    }

    fn derived_id(&self, counter: u64) -> DocumentId {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&self.seed.to_be_bytes());
        bytes[8..].copy_from_slice(&counter.to_be_bytes());
        // Builder stamps the v4 version and RFC 4122 variant bits.
        DocumentId(::uuid::Builder::from_random_bytes(bytes).into_uuid())
    }
}

impl IdentityProvider for FixedIdentity {
    fn new_document_id(&self) -> DocumentId {
        let counter = self.issued.fetch_add(1, Ordering::Relaxed);
        match usize::try_from(counter).ok().and_then(|i| self.ids.get(i)) {
            Some(id) => *id,
            None => self.derived_id(counter),
        }
    }

    fn now_utc(&self) -> Timestamp {
        self.now
    }
}
