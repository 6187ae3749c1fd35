// 🧾 Bill Entity - Monthly consumption records
//
// A bill is keyed by (consumer_id, month, year); the store enforces that at
// most one bill exists per key. The amount is always recomputed by the store
// at insert time from the rate it is handed, never trusted from the caller.

use serde::{Deserialize, Serialize};

// ============================================================================
// BILL RECORD
// ============================================================================

/// One month of electricity consumption for one consumer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    /// References a registered consumer
    pub consumer_id: u32,

    /// Billing month, 1-12
    pub month: u32,

    /// Billing year, 2000-2026
    pub year: u32,

    /// Units consumed over the period
    pub units_consumed: u32,

    /// Derived: units_consumed * cost_per_unit at insert time
    pub amount: f64,
}

impl Bill {
    /// Chronological key: later periods compare greater
    pub fn period(&self) -> (u32, u32) {
        (self.year, self.month)
    }
}

// ============================================================================
// DUPLICATE ERROR
// ============================================================================

/// Returned by [`BillStore::add`] when the period is already billed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateBill {
    pub consumer_id: u32,
    pub month: u32,
    pub year: u32,
}

impl std::fmt::Display for DuplicateBill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Bill already exists for consumer {} in {}/{}",
            self.consumer_id, self.month, self.year
        )
    }
}

impl std::error::Error for DuplicateBill {}

// ============================================================================
// BILL STORE
// ============================================================================

/// In-memory register of all bills, insertion-ordered
#[derive(Debug, Default)]
pub struct BillStore {
    bills: Vec<Bill>,
}

impl BillStore {
    /// Create an empty store
    pub fn new() -> Self {
        BillStore { bills: Vec::new() }
    }

    /// Check whether a bill already exists for the given period
    pub fn exists(&self, consumer_id: u32, month: u32, year: u32) -> bool {
        self.bills
            .iter()
            .any(|b| b.consumer_id == consumer_id && b.month == month && b.year == year)
    }

    /// Record a bill for the period, computing the amount from the given rate
    ///
    /// Returns the computed amount on success. The existing bill is left
    /// untouched on a duplicate.
    pub fn add(
        &mut self,
        consumer_id: u32,
        month: u32,
        year: u32,
        units_consumed: u32,
        cost_per_unit: f64,
    ) -> Result<f64, DuplicateBill> {
        if self.exists(consumer_id, month, year) {
            return Err(DuplicateBill {
                consumer_id,
                month,
                year,
            });
        }

        let amount = f64::from(units_consumed) * cost_per_unit;
        self.bills.push(Bill {
            consumer_id,
            month,
            year,
            units_consumed,
            amount,
        });
        Ok(amount)
    }

    /// Look up the bill for an exact period
    pub fn find(&self, consumer_id: u32, month: u32, year: u32) -> Option<Bill> {
        self.bills
            .iter()
            .find(|b| b.consumer_id == consumer_id && b.month == month && b.year == year)
            .cloned()
    }

    /// All bills for a consumer strictly earlier than the given period
    ///
    /// Earlier means (bill.year, bill.month) < (year, month). Order is
    /// insertion order; sorting and truncation belong to the billing service.
    pub fn history_before(&self, consumer_id: u32, month: u32, year: u32) -> Vec<Bill> {
        self.bills
            .iter()
            .filter(|b| b.consumer_id == consumer_id && b.period() < (year, month))
            .cloned()
            .collect()
    }

    /// Snapshot of all bills in insertion order
    pub fn all(&self) -> Vec<Bill> {
        self.bills.clone()
    }

    /// Number of recorded bills
    pub fn count(&self) -> usize {
        self.bills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bills.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
