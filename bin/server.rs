// Meter Ledger - JSON API Server
// Serves the in-memory register over HTTP; state lives for the process only

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use chrono::{DateTime, Utc};
use meter_ledger::{
    validate_bill_entry, validate_registration, Bill, BillEntryError, BillReport, BillStore,
    BillingService, Consumer, ConsumerStore, MonthlyRevenue, ReportError,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use tower_http::cors::CorsLayer;

/// Everything the handlers operate on, behind one lock so a duplicate check
/// and its insert stay atomic
struct Ledger {
    consumers: ConsumerStore,
    bills: BillStore,
    service: BillingService,
}

/// Shared application state
#[derive(Clone)]
struct AppState {
    ledger: Arc<RwLock<Ledger>>,
}

/// API Response wrapper
///
/// `data` is always present (null on failure); `error` only appears on
/// failure.
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Full register snapshot
#[derive(Serialize)]
struct StateResponse {
    consumers: Vec<Consumer>,
    bills: Vec<Bill>,
    cost_per_unit: f64,
    generated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RegisterRequest {
    consumer_id: u32,
    name: String,
    address: String,
    mobile_no: String,
}

#[derive(Deserialize)]
struct BillRequest {
    consumer_id: u32,
    month: u32,
    year: u32,
    units_consumed: u32,
}

#[derive(Deserialize)]
struct RateRequest {
    value: f64,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/state - Full register snapshot
async fn get_state(State(state): State<AppState>) -> impl IntoResponse {
    let ledger = state.ledger.read().unwrap();

    Json(ApiResponse::ok(StateResponse {
        consumers: ledger.consumers.all(),
        bills: ledger.bills.all(),
        cost_per_unit: ledger.service.cost_per_unit(),
        generated_at: Utc::now(),
    }))
}

/// GET /api/consumers - All consumers sorted by ID
async fn list_consumers(State(state): State<AppState>) -> impl IntoResponse {
    let ledger = state.ledger.read().unwrap();
    Json(ApiResponse::ok(ledger.consumers.all_sorted_by_id()))
}

/// POST /api/consumer - Register a consumer
async fn add_consumer(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> impl IntoResponse {
    if let Err(field) = validate_registration(req.consumer_id, &req.name, &req.address, &req.mobile_no)
    {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Consumer>::err(field.to_string())),
        );
    }

    let consumer = Consumer::new(req.consumer_id, req.name, req.address, req.mobile_no);

    let mut ledger = state.ledger.write().unwrap();
    match ledger.consumers.add(consumer.clone()) {
        Ok(()) => (StatusCode::CREATED, Json(ApiResponse::ok(consumer))),
        Err(dup) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::err(dup.to_string())),
        ),
    }
}

/// GET /api/consumer/:id - Look up one consumer
async fn get_consumer(
    State(state): State<AppState>,
    Path(consumer_id): Path<u32>,
) -> impl IntoResponse {
    let ledger = state.ledger.read().unwrap();

    match ledger.consumers.find_by_id(consumer_id) {
        Some(consumer) => (StatusCode::OK, Json(ApiResponse::ok(consumer))),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::err(format!(
                "Consumer {} not found",
                consumer_id
            ))),
        ),
    }
}

/// POST /api/bill - Record a bill; amount is computed server-side
async fn add_bill(
    State(state): State<AppState>,
    Json(req): Json<BillRequest>,
) -> impl IntoResponse {
    if let Err(field) = validate_bill_entry(req.consumer_id, req.month, req.year, req.units_consumed)
    {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Bill>::err(field.to_string())),
        );
    }

    let mut ledger = state.ledger.write().unwrap();
    let Ledger {
        consumers,
        bills,
        service,
    } = &mut *ledger;

    match service.enter_bill(
        consumers,
        bills,
        req.consumer_id,
        req.month,
        req.year,
        req.units_consumed,
    ) {
        Ok(_amount) => {
            // Echo the stored record back, amount included
            let bill = bills
                .find(req.consumer_id, req.month, req.year)
                .expect("bill just added");
            (StatusCode::CREATED, Json(ApiResponse::ok(bill)))
        }
        Err(err @ BillEntryError::ConsumerNotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::err(err.to_string())),
        ),
        Err(err @ BillEntryError::AlreadyBilled(_)) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::err(err.to_string())),
        ),
    }
}

/// GET /api/bill/:consumer_id/:year/:month - One bill for an exact period
async fn get_bill(
    State(state): State<AppState>,
    Path((consumer_id, year, month)): Path<(u32, u32, u32)>,
) -> impl IntoResponse {
    let ledger = state.ledger.read().unwrap();

    match ledger.bills.find(consumer_id, month, year) {
        Some(bill) => (StatusCode::OK, Json(ApiResponse::ok(bill))),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::err(format!(
                "No bill found for consumer {} in {}/{}",
                consumer_id, month, year
            ))),
        ),
    }
}

/// GET /api/bills/previous/:consumer_id/:year/:month - Up to 3, newest first
async fn get_previous_bills(
    State(state): State<AppState>,
    Path((consumer_id, year, month)): Path<(u32, u32, u32)>,
) -> impl IntoResponse {
    let ledger = state.ledger.read().unwrap();

    let mut history = ledger.bills.history_before(consumer_id, month, year);
    history.sort_by(|a, b| b.period().cmp(&a.period()));
    history.truncate(meter_ledger::RECENT_HISTORY_LIMIT);

    Json(ApiResponse::ok(history))
}

/// GET /api/report/:consumer_id/:year/:month - Full bill report
async fn get_report(
    State(state): State<AppState>,
    Path((consumer_id, year, month)): Path<(u32, u32, u32)>,
) -> impl IntoResponse {
    let ledger = state.ledger.read().unwrap();

    match ledger
        .service
        .generate_report(&ledger.consumers, &ledger.bills, consumer_id, month, year)
    {
        Ok(report) => (StatusCode::OK, Json(ApiResponse::ok(report))),
        Err(err @ ReportError::ConsumerNotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<BillReport>::err(err.to_string())),
        ),
        Err(err @ ReportError::BillNotFound { .. }) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::err(err.to_string())),
        ),
    }
}

/// GET /api/revenue/monthly - Billed totals per period, chronological
async fn get_monthly_revenue(State(state): State<AppState>) -> impl IntoResponse {
    let ledger = state.ledger.read().unwrap();
    let revenue: Vec<MonthlyRevenue> = ledger.service.monthly_revenue(&ledger.bills);
    Json(ApiResponse::ok(revenue))
}

/// PUT /api/settings/cost-per-unit - Change the tariff for future bills
async fn set_cost_per_unit(
    State(state): State<AppState>,
    Json(req): Json<RateRequest>,
) -> impl IntoResponse {
    if !req.value.is_finite() || req.value <= 0.0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<f64>::err(
                "cost_per_unit must be a positive number",
            )),
        );
    }

    let mut ledger = state.ledger.write().unwrap();
    ledger.service.set_cost_per_unit(req.value);
    (StatusCode::OK, Json(ApiResponse::ok(req.value)))
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() {
    println!("🌐 Meter Ledger - API Server v{}", meter_ledger::VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // Fresh in-memory register; nothing survives a restart
    let state = AppState {
        ledger: Arc::new(RwLock::new(Ledger {
            consumers: ConsumerStore::new(),
            bills: BillStore::new(),
            service: BillingService::new(),
        })),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/state", get(get_state))
        .route("/consumers", get(list_consumers))
        .route("/consumer", post(add_consumer))
        .route("/consumer/:id", get(get_consumer))
        .route("/bill", post(add_bill))
        .route("/bill/:consumer_id/:year/:month", get(get_bill))
        .route(
            "/bills/previous/:consumer_id/:year/:month",
            get(get_previous_bills),
        )
        .route("/report/:consumer_id/:year/:month", get(get_report))
        .route("/revenue/monthly", get(get_monthly_revenue))
        .route("/settings/cost-per-unit", put(set_cost_per_unit))
        .with_state(state);

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    // Start server
    let addr = "0.0.0.0:3000";
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    println!("\n🚀 Server running on http://localhost:3000");
    println!("   Health: http://localhost:3000/api/health");
    println!("   State:  http://localhost:3000/api/state");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
