// Meter Ledger - Core Library
// Exposes all modules for use in the menu CLI, API server, and tests

pub mod billing;
pub mod entities;
pub mod validators;

// Re-export commonly used types
pub use billing::{
    BillEntryError, BillReport, BillingService, MonthlyRevenue, ReportError,
    DEFAULT_COST_PER_UNIT, RECENT_HISTORY_LIMIT,
};
pub use entities::{Bill, BillStore, Consumer, ConsumerStore, DuplicateBill, DuplicateConsumer};
pub use validators::{
    is_valid_address, is_valid_consumer_id, is_valid_mobile, is_valid_month, is_valid_name,
    is_valid_year, validate_bill_entry, validate_registration, FieldError,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
