// 👤 Consumer Entity - Registered electricity customers
//
// Identity is the operator-assigned consumer ID (an integer, unique per
// register). Records are append-only: never updated, never deleted.

use serde::{Deserialize, Serialize};

// ============================================================================
// CONSUMER RECORD
// ============================================================================

/// A registered electricity consumer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumer {
    /// Operator-assigned identifier, unique, immutable once registered
    pub consumer_id: u32,

    /// Consumer's full name
    pub name: String,

    /// Postal address (at least 7 characters; validated by callers)
    pub address: String,

    /// Mobile number, exactly 10 digits (validated by callers)
    pub mobile_no: String,
}

impl Consumer {
    pub fn new(consumer_id: u32, name: String, address: String, mobile_no: String) -> Self {
        Consumer {
            consumer_id,
            name,
            address,
            mobile_no,
        }
    }
}

// ============================================================================
// DUPLICATE ERROR
// ============================================================================

/// Returned by [`ConsumerStore::add`] when the ID is already registered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateConsumer(pub u32);

impl std::fmt::Display for DuplicateConsumer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Consumer {} already exists", self.0)
    }
}

impl std::error::Error for DuplicateConsumer {}

// ============================================================================
// CONSUMER STORE
// ============================================================================

/// In-memory register of all consumers
///
/// Insertion order is preserved; display listing sorts by ID on the way out.
/// The store enforces ID uniqueness but trusts callers to have validated
/// field contents beforehand.
#[derive(Debug, Default)]
pub struct ConsumerStore {
    consumers: Vec<Consumer>,
}

impl ConsumerStore {
    /// Create an empty store
    pub fn new() -> Self {
        ConsumerStore {
            consumers: Vec::new(),
        }
    }

    /// Check whether a consumer ID is already registered
    pub fn exists(&self, consumer_id: u32) -> bool {
        self.consumers.iter().any(|c| c.consumer_id == consumer_id)
    }

    /// Register a consumer; rejects duplicate IDs, keeps the first record
    pub fn add(&mut self, consumer: Consumer) -> Result<(), DuplicateConsumer> {
        if self.exists(consumer.consumer_id) {
            return Err(DuplicateConsumer(consumer.consumer_id));
        }
        self.consumers.push(consumer);
        Ok(())
    }

    /// Look up a consumer by ID
    pub fn find_by_id(&self, consumer_id: u32) -> Option<Consumer> {
        self.consumers
            .iter()
            .find(|c| c.consumer_id == consumer_id)
            .cloned()
    }

    /// Snapshot of all consumers in insertion order
    pub fn all(&self) -> Vec<Consumer> {
        self.consumers.clone()
    }

    /// Snapshot of all consumers sorted ascending by ID (for display)
    pub fn all_sorted_by_id(&self) -> Vec<Consumer> {
        let mut consumers = self.consumers.clone();
        consumers.sort_by_key(|c| c.consumer_id);
        consumers
    }

    /// Number of registered consumers
    pub fn count(&self) -> usize {
        self.consumers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.consumers.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
