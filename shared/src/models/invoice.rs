//! Invoice Record Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Invoice match classification - exactly one terminal status per invoice
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceMatchStatus {
    Matched,
    Exception,
}

/// Why an invoice was classified as an exception
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceExceptionReason {
    /// Amount deviates from the expected order total beyond tolerance
    AmountMismatch,
    /// Invoice dated too long after full receipt
    LateInvoice,
}

/// Invoice against an order
///
/// Multiple invoices per order are permitted (partial billing); each is
/// classified independently.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceRecord {
    pub id: String,
    /// Order reference
    pub order_id: String,
    pub amount: f64,
    pub invoiced_at: DateTime<Utc>,
    pub match_status: InvoiceMatchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception_reason: Option<InvoiceExceptionReason>,
}

/// Record invoice payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceCreate {
    pub amount: f64,
    pub invoiced_at: DateTime<Utc>,
}
