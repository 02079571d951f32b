//! Purchase Order Model
//!
//! The purchase order is the aggregate root of the procurement domain.
//! Receipt and invoice records reference it by id; derived metrics are never
//! stored on it. Lifecycle timestamps are stamped by the state machine and
//! must stay monotonically non-decreasing in lifecycle order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Purchase order lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseOrderStatus {
    /// 草稿 - 行项目可自由编辑
    #[default]
    Draft,
    /// 已批准
    Approved,
    /// 已下单 - 此后行项目不可再编辑
    Issued,
    /// 部分收货
    PartiallyReceived,
    /// 全部收货
    FullyReceived,
    /// 已开票
    Invoiced,
    /// 已关闭 (终态)
    Closed,
    /// 已取消 (终态)
    Cancelled,
}

impl PurchaseOrderStatus {
    /// Terminal states admit no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed | Self::Cancelled)
    }
}

impl std::fmt::Display for PurchaseOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Draft => "DRAFT",
            Self::Approved => "APPROVED",
            Self::Issued => "ISSUED",
            Self::PartiallyReceived => "PARTIALLY_RECEIVED",
            Self::FullyReceived => "FULLY_RECEIVED",
            Self::Invoiced => "INVOICED",
            Self::Closed => "CLOSED",
            Self::Cancelled => "CANCELLED",
        };
        write!(f, "{}", s)
    }
}

/// Ordered line item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    /// Line ID (assigned at creation, stable across edits)
    pub line_id: String,
    /// Inventory item reference
    pub item_id: String,
    /// Item name snapshot (for display/audit)
    pub name: String,
    pub quantity: i32,
    pub unit_price: f64,
}

/// Line item input - for creating/replacing lines (without line_id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineInput {
    pub item_id: String,
    pub name: String,
    pub quantity: i32,
    pub unit_price: f64,
}

/// Purchase order entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PurchaseOrder {
    pub id: String,
    /// Supplier reference
    pub supplier_id: String,
    pub lines: Vec<OrderLine>,
    pub status: PurchaseOrderStatus,

    // === Lifecycle timestamps ===
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<DateTime<Utc>>,
    /// Full-receipt instant (set when the last outstanding line is received)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoiced_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,

    /// Optimistic concurrency stamp - bumped by the store on every write
    pub version: u64,
}

impl PurchaseOrder {
    /// Look up a line by its stable line ID
    pub fn line(&self, line_id: &str) -> Option<&OrderLine> {
        self.lines.iter().find(|l| l.line_id == line_id)
    }

    /// Total ordered quantity across all lines
    pub fn total_ordered_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity as i64).sum()
    }

    /// The latest lifecycle timestamp currently present
    pub fn last_lifecycle_timestamp(&self) -> DateTime<Utc> {
        [
            Some(self.created_at),
            self.approved_at,
            self.issued_at,
            self.received_at,
            self.invoiced_at,
            self.closed_at,
            self.cancelled_at,
        ]
        .into_iter()
        .flatten()
        .max()
        .unwrap_or(self.created_at)
    }
}

/// Create purchase order payload (always starts in Draft)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrderCreate {
    pub supplier_id: String,
    #[serde(default)]
    pub lines: Vec<OrderLineInput>,
}

/// Transition request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub target: PurchaseOrderStatus,
}
