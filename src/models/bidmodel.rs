use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "bid_status", rename_all = "snake_case")]
pub enum BidStatus {
    Pending,
    Accepted,
    Rejected,
}

impl BidStatus {
    pub fn to_str(&self) -> &str {
        match self {
            BidStatus::Pending => "pending",
            BidStatus::Accepted => "accepted",
            BidStatus::Rejected => "rejected",
        }
    }

    // Accepted and rejected are terminal. A resolved bid is never reopened;
    // repeat responses surface as conflicts instead of re-running cascades.
    pub fn can_transition_to(&self, to: BidStatus) -> bool {
        match (self, to) {
            (BidStatus::Pending, BidStatus::Accepted) => true,
            (BidStatus::Pending, BidStatus::Rejected) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "bidder_role", rename_all = "snake_case")]
pub enum BidderRole {
    Constructor,
    Supplier,
    Architect,
}

impl BidderRole {
    pub fn to_str(&self) -> &str {
        match self {
            BidderRole::Constructor => "constructor",
            BidderRole::Supplier => "supplier",
            BidderRole::Architect => "architect",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: Uuid,
    pub project_id: Option<Uuid>,
    pub material_request_id: Option<Uuid>,
    pub bidder_user_id: Uuid,
    pub bidder_role: BidderRole,
    pub bid_amount: BigDecimal,
    pub proposed_timeline: String,
    pub description: String,
    pub status: BidStatus,
    pub submitted_at: Option<DateTime<Utc>>, // Database has DEFAULT NOW(), can be NULL
    pub updated_at: Option<DateTime<Utc>>,
}

// Bid joined with the bidder's display fields and the offer title, the shape
// list and detail endpoints return. The joins are LEFT joins so a missing
// user row degrades to nulls instead of hiding the bid.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BidDetails {
    pub id: Uuid,
    pub project_id: Option<Uuid>,
    pub material_request_id: Option<Uuid>,
    pub bidder_user_id: Uuid,
    pub bidder_role: BidderRole,
    pub bid_amount: BigDecimal,
    pub proposed_timeline: String,
    pub description: String,
    pub status: BidStatus,
    pub submitted_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub bidder_name: Option<String>,
    pub bidder_username: Option<String>,
    pub offer_title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_be_accepted_or_rejected() {
        assert!(BidStatus::Pending.can_transition_to(BidStatus::Accepted));
        assert!(BidStatus::Pending.can_transition_to(BidStatus::Rejected));
    }

    #[test]
    fn resolved_bids_are_terminal() {
        for from in [BidStatus::Accepted, BidStatus::Rejected] {
            for to in [BidStatus::Pending, BidStatus::Accepted, BidStatus::Rejected] {
                assert!(!from.can_transition_to(to), "{:?} -> {:?} must be rejected", from, to);
            }
        }
        assert!(!BidStatus::Pending.can_transition_to(BidStatus::Pending));
    }
}
