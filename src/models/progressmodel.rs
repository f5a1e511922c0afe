use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "review_status", rename_all = "snake_case")]
pub enum ReviewStatus {
    PendingReview,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn to_str(&self) -> &str {
        match self {
            ReviewStatus::PendingReview => "pending_review",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
        }
    }

    // A submission is reviewed exactly once. There is no resubmission or
    // re-review path, a rejected submission stays rejected.
    pub fn can_transition_to(&self, to: ReviewStatus) -> bool {
        match (self, to) {
            (ReviewStatus::PendingReview, ReviewStatus::Approved) => true,
            (ReviewStatus::PendingReview, ReviewStatus::Rejected) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProgressUpdate {
    pub id: Uuid,
    pub project_id: Uuid,
    pub bid_id: Uuid,
    pub submitted_by: Uuid,
    pub milestone_name: String,
    pub description: String,
    pub progress_percentage: i32,
    pub payment_amount: BigDecimal,
    pub attachment_urls: Option<Vec<String>>,
    pub status: ReviewStatus,
    pub reviewed_by: Option<Uuid>,
    pub review_comments: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub submitted_at: Option<DateTime<Utc>>, // Database has DEFAULT NOW(), can be NULL
}

/// Each approved update adds its percentage to the project total, capped at
/// 100. An increment that overshoots the cap is accepted and the excess
/// discarded, not rejected.
pub fn accumulate_progress(current: i32, increment: i32) -> i32 {
    (current + increment).min(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_review_resolves_once() {
        assert!(ReviewStatus::PendingReview.can_transition_to(ReviewStatus::Approved));
        assert!(ReviewStatus::PendingReview.can_transition_to(ReviewStatus::Rejected));
        for from in [ReviewStatus::Approved, ReviewStatus::Rejected] {
            for to in [
                ReviewStatus::PendingReview,
                ReviewStatus::Approved,
                ReviewStatus::Rejected,
            ] {
                assert!(!from.can_transition_to(to), "{:?} -> {:?} must be rejected", from, to);
            }
        }
    }

    #[test]
    fn progress_accumulates_additively() {
        let mut total = 0;
        for step in [25, 25, 30] {
            total = accumulate_progress(total, step);
        }
        assert_eq!(total, 80);
    }

    #[test]
    fn progress_clamps_at_one_hundred() {
        // 50 then 60 lands on 100, the excess 10 is discarded
        let total = accumulate_progress(accumulate_progress(0, 50), 60);
        assert_eq!(total, 100);
        assert_eq!(accumulate_progress(100, 25), 100);
    }

    #[test]
    fn clamped_total_is_order_independent() {
        let a = accumulate_progress(accumulate_progress(0, 60), 50);
        let b = accumulate_progress(accumulate_progress(0, 50), 60);
        assert_eq!(a, b);
    }
}
