//! Refund domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vendra_shared::types::{OrderId, OrderItemId, RefundId};

/// Refund request status.
///
/// Valid transitions:
/// - Requested → Approved (approve)
/// - Requested → Rejected (reject)
/// - Approved → Completed (return accepted, money moved)
/// - Approved → Rejected (reject, or return inspection failed)
///
/// Rejected and Completed are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefundStatus {
    /// Buyer opened the request; awaiting a decision.
    Requested,
    /// Seller or admin approved; awaiting return/settlement.
    Approved,
    /// Request was turned down (terminal).
    Rejected,
    /// Money moved back to the buyer (terminal).
    Completed,
}

impl RefundStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "requested" => Some(Self::Requested),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Returns true if no further transition is allowed.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Completed)
    }
}

impl std::fmt::Display for RefundStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Line-level allocation of a refund.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundItem {
    /// The order line being refunded.
    pub order_item_id: OrderItemId,
    /// Refunded quantity; never exceeds the ordered quantity.
    pub quantity: u32,
    /// Amount allocated to this line (`unit_price * quantity`).
    pub refund_amount: Decimal,
}

/// What the buyer is asking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefundClaim {
    /// A bare amount against the whole order.
    Amount(Decimal),
    /// Specific lines and quantities; the amount is derived from them.
    Items(Vec<ItemClaim>),
}

/// One requested line in an item-level claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemClaim {
    /// The order line being claimed.
    pub order_item_id: OrderItemId,
    /// Requested quantity.
    pub quantity: u32,
}

/// A refund request against a completed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refund {
    /// Unique identifier.
    pub id: RefundId,
    /// The order the refund is against.
    pub order_id: OrderId,
    /// Current workflow status.
    pub status: RefundStatus,
    /// Amount to return to the buyer, in minor units.
    pub amount: Decimal,
    /// Append-only audit trail of reasons and decision notes.
    pub reason: String,
    /// Evidence references (image urls and the like).
    pub evidence: Vec<String>,
    /// Whether the goods must come back before payout.
    pub requires_return: bool,
    /// Optional line-level allocations; when present their amounts sum to
    /// `amount`.
    pub items: Vec<RefundItem>,
    /// When the request was opened.
    pub created_at: DateTime<Utc>,
    /// Last transition time.
    pub updated_at: DateTime<Utc>,
}

impl Refund {
    /// Creates a freshly opened request.
    #[must_use]
    pub fn new(
        order_id: OrderId,
        amount: Decimal,
        reason: String,
        evidence: Vec<String>,
        items: Vec<RefundItem>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: RefundId::new(),
            order_id,
            status: RefundStatus::Requested,
            amount,
            reason,
            evidence,
            requires_return: false,
            items,
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends a note to the reason trail. Earlier text is never overwritten.
    pub fn push_reason(&mut self, note: &str) {
        if self.reason.is_empty() {
            self.reason = note.to_string();
        } else {
            self.reason.push('\n');
            self.reason.push_str(note);
        }
    }

    /// Marks a transition, stamping `updated_at`.
    pub(crate) fn transition_to(&mut self, status: RefundStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Returns true if the refund can no longer change.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_as_str_roundtrip() {
        for status in [
            RefundStatus::Requested,
            RefundStatus::Approved,
            RefundStatus::Rejected,
            RefundStatus::Completed,
        ] {
            assert_eq!(RefundStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(RefundStatus::parse("invalid"), None);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!RefundStatus::Requested.is_terminal());
        assert!(!RefundStatus::Approved.is_terminal());
        assert!(RefundStatus::Rejected.is_terminal());
        assert!(RefundStatus::Completed.is_terminal());
    }

    #[test]
    fn test_reason_trail_appends() {
        let mut refund = Refund::new(
            OrderId::new(),
            dec!(1000),
            "item arrived broken".to_string(),
            vec![],
            vec![],
        );
        refund.push_reason("inspection failed");
        assert_eq!(refund.reason, "item arrived broken\ninspection failed");

        refund.push_reason("second note");
        assert!(refund.reason.starts_with("item arrived broken"));
        assert!(refund.reason.ends_with("second note"));
    }

    #[test]
    fn test_push_reason_onto_empty_trail() {
        let mut refund = Refund::new(OrderId::new(), dec!(1), String::new(), vec![], vec![]);
        refund.push_reason("first");
        assert_eq!(refund.reason, "first");
    }
}
