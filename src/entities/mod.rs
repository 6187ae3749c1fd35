// Entity Models - Consumers and their monthly bills
//
// Each entity has:
// - An operator-assigned key that never changes once recorded
// - An in-memory store that enforces its uniqueness invariant
// - Append-only lifecycle: records are never updated or deleted

pub mod bill;
pub mod consumer;

pub use bill::{Bill, BillStore, DuplicateBill};
pub use consumer::{Consumer, ConsumerStore, DuplicateConsumer};
