// 💡 Billing Service - Amount computation and bill reports
//
// Owns the tariff (cost per unit) and builds the consumer-facing report:
// the requested bill plus up to three prior bills, newest first.

use crate::entities::{Bill, BillStore, Consumer, ConsumerStore, DuplicateBill};
use serde::{Deserialize, Serialize};

/// Default tariff when none is configured
pub const DEFAULT_COST_PER_UNIT: f64 = 5.0;

/// How many prior bills a report shows
pub const RECENT_HISTORY_LIMIT: usize = 3;

// ============================================================================
// ERRORS
// ============================================================================

/// Why a bill report could not be produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportError {
    /// No consumer registered under this ID
    ConsumerNotFound(u32),

    /// Consumer exists but has no bill for the requested period
    BillNotFound {
        consumer_id: u32,
        month: u32,
        year: u32,
    },
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::ConsumerNotFound(id) => write!(f, "Consumer {} not found", id),
            ReportError::BillNotFound {
                consumer_id,
                month,
                year,
            } => write!(
                f,
                "No bill found for consumer {} in {}/{}",
                consumer_id, month, year
            ),
        }
    }
}

impl std::error::Error for ReportError {}

/// Why a bill entry was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillEntryError {
    /// No consumer registered under this ID
    ConsumerNotFound(u32),

    /// A bill already exists for this period
    AlreadyBilled(DuplicateBill),
}

impl std::fmt::Display for BillEntryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BillEntryError::ConsumerNotFound(id) => write!(f, "Consumer {} not found", id),
            BillEntryError::AlreadyBilled(dup) => dup.fmt(f),
        }
    }
}

impl std::error::Error for BillEntryError {}

impl From<DuplicateBill> for BillEntryError {
    fn from(dup: DuplicateBill) -> Self {
        BillEntryError::AlreadyBilled(dup)
    }
}

// ============================================================================
// BILL REPORT
// ============================================================================

/// The full report for one billing period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillReport {
    pub consumer: Consumer,
    pub current: Bill,

    /// Up to three bills preceding the requested period, newest first.
    /// Empty when the consumer has no earlier bills; that is not an error.
    pub recent_history: Vec<Bill>,
}

/// One row of the monthly revenue summary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    pub year: u32,
    pub month: u32,
    pub total: f64,
}

// ============================================================================
// BILLING SERVICE
// ============================================================================

/// Computes amounts and assembles reports over the two stores
#[derive(Debug, Clone)]
pub struct BillingService {
    cost_per_unit: f64,
}

impl BillingService {
    /// Service with the default tariff (5.0 per unit)
    pub fn new() -> Self {
        Self::with_rate(DEFAULT_COST_PER_UNIT)
    }

    /// Service with an explicit tariff
    pub fn with_rate(cost_per_unit: f64) -> Self {
        BillingService { cost_per_unit }
    }

    pub fn cost_per_unit(&self) -> f64 {
        self.cost_per_unit
    }

    /// Change the tariff; affects bills added afterwards only
    pub fn set_cost_per_unit(&mut self, cost_per_unit: f64) {
        self.cost_per_unit = cost_per_unit;
    }

    /// Pure amount computation, no rounding (rendering rounds for display)
    pub fn compute_amount(&self, units_consumed: u32) -> f64 {
        f64::from(units_consumed) * self.cost_per_unit
    }

    /// Record a bill for a registered consumer
    ///
    /// Returns the computed amount. The consumer must exist; the period must
    /// not already be billed. The store recomputes the amount from the
    /// service's tariff.
    pub fn enter_bill(
        &self,
        consumers: &ConsumerStore,
        bills: &mut BillStore,
        consumer_id: u32,
        month: u32,
        year: u32,
        units_consumed: u32,
    ) -> Result<f64, BillEntryError> {
        if !consumers.exists(consumer_id) {
            return Err(BillEntryError::ConsumerNotFound(consumer_id));
        }

        let amount = bills.add(consumer_id, month, year, units_consumed, self.cost_per_unit)?;
        Ok(amount)
    }

    /// Build the report for one consumer and period
    ///
    /// Fails with `ConsumerNotFound` before any bill lookup happens, then
    /// with `BillNotFound` if the period is unbilled. History is sorted
    /// newest-first and capped at [`RECENT_HISTORY_LIMIT`].
    pub fn generate_report(
        &self,
        consumers: &ConsumerStore,
        bills: &BillStore,
        consumer_id: u32,
        month: u32,
        year: u32,
    ) -> Result<BillReport, ReportError> {
        let consumer = consumers
            .find_by_id(consumer_id)
            .ok_or(ReportError::ConsumerNotFound(consumer_id))?;

        let current =
            bills
                .find(consumer_id, month, year)
                .ok_or(ReportError::BillNotFound {
                    consumer_id,
                    month,
                    year,
                })?;

        let mut recent_history = bills.history_before(consumer_id, month, year);
        recent_history.sort_by(|a, b| b.period().cmp(&a.period()));
        recent_history.truncate(RECENT_HISTORY_LIMIT);

        Ok(BillReport {
            consumer,
            current,
            recent_history,
        })
    }

    /// Total billed amount per (year, month), sorted chronologically
    pub fn monthly_revenue(&self, bills: &BillStore) -> Vec<MonthlyRevenue> {
        let mut totals: std::collections::BTreeMap<(u32, u32), f64> =
            std::collections::BTreeMap::new();

        for bill in bills.all() {
            *totals.entry(bill.period()).or_insert(0.0) += bill.amount;
        }

        totals
            .into_iter()
            .map(|((year, month), total)| MonthlyRevenue { year, month, total })
            .collect()
    }
}

impl Default for BillingService {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Consumer;

    fn register(store: &mut ConsumerStore, id: u32) {
        store
            .add(Consumer::new(
                id,
                format!("Consumer {}", id),
                "12 Main Street".to_string(),
                "1234567890".to_string(),
            ))
            .unwrap();
    }

    #[test]
    fn test_amount_at_default_rate() {
        let service = BillingService::new();
        assert_eq!(service.cost_per_unit(), 5.0);
        assert_eq!(service.compute_amount(120), 600.0);
        assert_eq!(service.compute_amount(0), 0.0);
    }

    #[test]
    fn test_amount_tracks_configured_rate() {
        let mut service = BillingService::with_rate(7.5);
        assert_eq!(service.compute_amount(100), 750.0);

        service.set_cost_per_unit(3.0);
        assert_eq!(service.compute_amount(100), 300.0);
    }

    #[test]
    fn test_enter_bill_unknown_consumer() {
        let consumers = ConsumerStore::new();
        let mut bills = BillStore::new();
        let service = BillingService::new();

        let err = service
            .enter_bill(&consumers, &mut bills, 999, 3, 2024, 120)
            .unwrap_err();
        assert_eq!(err, BillEntryError::ConsumerNotFound(999));
        assert!(bills.is_empty());
    }

    #[test]
    fn test_enter_bill_records_amount() {
        let mut consumers = ConsumerStore::new();
        register(&mut consumers, 101);
        let mut bills = BillStore::new();
        let service = BillingService::new();

        let amount = service
            .enter_bill(&consumers, &mut bills, 101, 3, 2024, 120)
            .unwrap();
        assert_eq!(amount, 600.0);
        assert_eq!(bills.find(101, 3, 2024).unwrap().amount, 600.0);
    }

    #[test]
    fn test_enter_bill_duplicate_period() {
        let mut consumers = ConsumerStore::new();
        register(&mut consumers, 101);
        let mut bills = BillStore::new();
        let service = BillingService::new();

        service
            .enter_bill(&consumers, &mut bills, 101, 3, 2024, 120)
            .unwrap();
        let err = service
            .enter_bill(&consumers, &mut bills, 101, 3, 2024, 50)
            .unwrap_err();

        assert!(matches!(err, BillEntryError::AlreadyBilled(_)));
    }

    #[test]
    fn test_rate_change_leaves_existing_bills() {
        let mut consumers = ConsumerStore::new();
        register(&mut consumers, 101);
        let mut bills = BillStore::new();
        let mut service = BillingService::new();

        service
            .enter_bill(&consumers, &mut bills, 101, 1, 2024, 100)
            .unwrap();
        service.set_cost_per_unit(10.0);
        service
            .enter_bill(&consumers, &mut bills, 101, 2, 2024, 100)
            .unwrap();

        assert_eq!(bills.find(101, 1, 2024).unwrap().amount, 500.0);
        assert_eq!(bills.find(101, 2, 2024).unwrap().amount, 1000.0);
    }

    #[test]
    fn test_report_unknown_consumer() {
        let consumers = ConsumerStore::new();
        let bills = BillStore::new();
        let service = BillingService::new();

        let err = service
            .generate_report(&consumers, &bills, 999, 3, 2024)
            .unwrap_err();
        assert_eq!(err, ReportError::ConsumerNotFound(999));
    }

    #[test]
    fn test_report_unbilled_period() {
        let mut consumers = ConsumerStore::new();
        register(&mut consumers, 101);
        let bills = BillStore::new();
        let service = BillingService::new();

        let err = service
            .generate_report(&consumers, &bills, 101, 3, 2024)
            .unwrap_err();
        assert_eq!(
            err,
            ReportError::BillNotFound {
                consumer_id: 101,
                month: 3,
                year: 2024
            }
        );
    }

    #[test]
    fn test_report_history_newest_first_capped_at_three() {
        let mut consumers = ConsumerStore::new();
        register(&mut consumers, 7);
        let mut bills = BillStore::new();
        let service = BillingService::new();

        for month in [1, 3, 5, 6] {
            service
                .enter_bill(&consumers, &mut bills, 7, month, 2024, 100)
                .unwrap();
        }

        let report = service.generate_report(&consumers, &bills, 7, 6, 2024).unwrap();
        let periods: Vec<(u32, u32)> = report
            .recent_history
            .iter()
            .map(|b| (b.month, b.year))
            .collect();

        assert_eq!(periods, vec![(5, 2024), (3, 2024), (1, 2024)]);
    }

    #[test]
    fn test_report_history_drops_fourth_oldest() {
        let mut consumers = ConsumerStore::new();
        register(&mut consumers, 7);
        let mut bills = BillStore::new();
        let service = BillingService::new();

        // Four earlier periods across a year boundary
        service.enter_bill(&consumers, &mut bills, 7, 11, 2023, 100).unwrap();
        service.enter_bill(&consumers, &mut bills, 7, 12, 2023, 100).unwrap();
        service.enter_bill(&consumers, &mut bills, 7, 1, 2024, 100).unwrap();
        service.enter_bill(&consumers, &mut bills, 7, 2, 2024, 100).unwrap();
        service.enter_bill(&consumers, &mut bills, 7, 3, 2024, 100).unwrap();

        let report = service.generate_report(&consumers, &bills, 7, 3, 2024).unwrap();
        let periods: Vec<(u32, u32)> = report
            .recent_history
            .iter()
            .map(|b| (b.month, b.year))
            .collect();

        // November 2023 falls off the end
        assert_eq!(periods, vec![(2, 2024), (1, 2024), (12, 2023)]);
    }

    #[test]
    fn test_report_with_no_history() {
        let mut consumers = ConsumerStore::new();
        register(&mut consumers, 101);
        let mut bills = BillStore::new();
        let service = BillingService::new();

        service
            .enter_bill(&consumers, &mut bills, 101, 1, 2024, 120)
            .unwrap();

        let report = service
            .generate_report(&consumers, &bills, 101, 1, 2024)
            .unwrap();
        assert!(report.recent_history.is_empty());
        assert_eq!(report.consumer.consumer_id, 101);
        assert_eq!(report.current.amount, 600.0);
    }

    #[test]
    fn test_report_history_ignores_other_consumers() {
        let mut consumers = ConsumerStore::new();
        register(&mut consumers, 101);
        register(&mut consumers, 102);
        let mut bills = BillStore::new();
        let service = BillingService::new();

        service.enter_bill(&consumers, &mut bills, 101, 1, 2024, 100).unwrap();
        service.enter_bill(&consumers, &mut bills, 102, 1, 2024, 999).unwrap();
        service.enter_bill(&consumers, &mut bills, 101, 2, 2024, 100).unwrap();

        let report = service
            .generate_report(&consumers, &bills, 101, 2, 2024)
            .unwrap();
        assert_eq!(report.recent_history.len(), 1);
        assert_eq!(report.recent_history[0].consumer_id, 101);
    }

    #[test]
    fn test_monthly_revenue_chronological() {
        let mut consumers = ConsumerStore::new();
        register(&mut consumers, 101);
        register(&mut consumers, 102);
        let mut bills = BillStore::new();
        let service = BillingService::new();

        service.enter_bill(&consumers, &mut bills, 101, 2, 2024, 100).unwrap(); // 500
        service.enter_bill(&consumers, &mut bills, 102, 2, 2024, 60).unwrap(); // 300
        service.enter_bill(&consumers, &mut bills, 101, 12, 2023, 40).unwrap(); // 200

        let revenue = service.monthly_revenue(&bills);

        assert_eq!(revenue.len(), 2);
        assert_eq!((revenue[0].year, revenue[0].month), (2023, 12));
        assert_eq!(revenue[0].total, 200.0);
        assert_eq!((revenue[1].year, revenue[1].month), (2024, 2));
        assert_eq!(revenue[1].total, 800.0);
    }

    #[test]
    fn test_monthly_revenue_empty() {
        let service = BillingService::new();
        assert!(service.monthly_revenue(&BillStore::new()).is_empty());
    }
}
