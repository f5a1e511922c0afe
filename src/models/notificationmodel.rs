use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    bidmodel::{Bid, BidDetails},
    designmodel::DesignSubmission,
    paymentmodel::Payment,
    progressmodel::ProgressUpdate,
};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "notification_priority", rename_all = "snake_case")]
pub enum NotificationPriority {
    Low,
    Normal,
    High,
}

impl NotificationPriority {
    pub fn to_str(&self) -> &str {
        match self {
            NotificationPriority::Low => "low",
            NotificationPriority::Normal => "normal",
            NotificationPriority::High => "high",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub related_id: Option<Uuid>,
    pub related_type: Option<String>,
    pub priority: NotificationPriority,
    pub action_url: Option<String>,
    pub is_read: bool,
    pub created_at: Option<DateTime<Utc>>, // Database has DEFAULT NOW(), can be NULL
}

/// What the workflow hands to the notification queue. The dispatcher turns it
/// into a stored `Notification` row and fans it out to live subscribers.
///
/// All the message copy lives here so every path that raises the same event
/// produces the same wording, whether it enqueues directly or returns the
/// request from inside a transaction for post-commit dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub user_id: Uuid,
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub related_id: Option<Uuid>,
    pub related_type: Option<String>,
    pub priority: NotificationPriority,
    pub action_url: Option<String>,
}

impl NotificationRequest {
    pub fn bid_received(owner_id: Uuid, bid: &BidDetails) -> Self {
        let bidder = bid
            .bidder_name
            .clone()
            .unwrap_or_else(|| "A bidder".to_string());
        let listing = bid
            .offer_title
            .clone()
            .unwrap_or_else(|| "your listing".to_string());
        NotificationRequest {
            user_id: owner_id,
            notification_type: "bid_received".to_string(),
            title: "New bid received".to_string(),
            message: format!("{} placed a bid of {} on {}", bidder, bid.bid_amount, listing),
            related_id: Some(bid.id),
            related_type: Some("bid".to_string()),
            priority: NotificationPriority::Normal,
            action_url: Some(format!("/bids/{}", bid.id)),
        }
    }

    pub fn bid_accepted(bid: &Bid, offer_title: &str) -> Self {
        NotificationRequest {
            user_id: bid.bidder_user_id,
            notification_type: "bid_accepted".to_string(),
            title: "Bid accepted".to_string(),
            message: format!("Your bid of {} on {} was accepted", bid.bid_amount, offer_title),
            related_id: Some(bid.id),
            related_type: Some("bid".to_string()),
            priority: NotificationPriority::High,
            action_url: Some(format!("/bids/{}", bid.id)),
        }
    }

    pub fn bid_rejected(bid: &Bid, offer_title: Option<&str>) -> Self {
        let listing = offer_title.unwrap_or("the listing");
        NotificationRequest {
            user_id: bid.bidder_user_id,
            notification_type: "bid_rejected".to_string(),
            title: "Bid not selected".to_string(),
            message: format!("Your bid of {} on {} was not selected", bid.bid_amount, listing),
            related_id: Some(bid.id),
            related_type: Some("bid".to_string()),
            priority: NotificationPriority::Normal,
            action_url: Some(format!("/bids/{}", bid.id)),
        }
    }

    pub fn progress_submitted(owner_id: Uuid, update: &ProgressUpdate) -> Self {
        NotificationRequest {
            user_id: owner_id,
            notification_type: "progress_submitted".to_string(),
            title: "Progress update submitted".to_string(),
            message: format!(
                "{} ({}%) was submitted for your review",
                update.milestone_name, update.progress_percentage
            ),
            related_id: Some(update.id),
            related_type: Some("progress_update".to_string()),
            priority: NotificationPriority::Normal,
            action_url: Some(format!("/progress/{}", update.id)),
        }
    }

    pub fn progress_approved(update: &ProgressUpdate) -> Self {
        NotificationRequest {
            user_id: update.submitted_by,
            notification_type: "progress_approved".to_string(),
            title: "Progress update approved".to_string(),
            message: format!(
                "{} was approved and a payment of {} has been created",
                update.milestone_name, update.payment_amount
            ),
            related_id: Some(update.id),
            related_type: Some("progress_update".to_string()),
            priority: NotificationPriority::High,
            action_url: Some(format!("/progress/{}", update.id)),
        }
    }

    pub fn progress_rejected(update: &ProgressUpdate) -> Self {
        let comments = update
            .review_comments
            .as_deref()
            .unwrap_or("no comments were provided");
        NotificationRequest {
            user_id: update.submitted_by,
            notification_type: "progress_rejected".to_string(),
            title: "Progress update rejected".to_string(),
            message: format!("{} was rejected: {}", update.milestone_name, comments),
            related_id: Some(update.id),
            related_type: Some("progress_update".to_string()),
            priority: NotificationPriority::Normal,
            action_url: Some(format!("/progress/{}", update.id)),
        }
    }

    pub fn design_submitted(owner_id: Uuid, design: &DesignSubmission) -> Self {
        NotificationRequest {
            user_id: owner_id,
            notification_type: "design_submitted".to_string(),
            title: "Design submitted".to_string(),
            message: format!("{} was submitted for your review", design.title),
            related_id: Some(design.id),
            related_type: Some("design_submission".to_string()),
            priority: NotificationPriority::Normal,
            action_url: Some(format!("/designs/{}", design.id)),
        }
    }

    pub fn design_approved(design: &DesignSubmission) -> Self {
        NotificationRequest {
            user_id: design.architect_id,
            notification_type: "design_approved".to_string(),
            title: "Design approved".to_string(),
            message: format!(
                "{} was approved and a payment of {} has been created",
                design.title, design.payment_amount
            ),
            related_id: Some(design.id),
            related_type: Some("design_submission".to_string()),
            priority: NotificationPriority::High,
            action_url: Some(format!("/designs/{}", design.id)),
        }
    }

    pub fn design_rejected(design: &DesignSubmission) -> Self {
        let comments = design
            .review_comments
            .as_deref()
            .unwrap_or("no comments were provided");
        NotificationRequest {
            user_id: design.architect_id,
            notification_type: "design_rejected".to_string(),
            title: "Design rejected".to_string(),
            message: format!("{} was rejected: {}", design.title, comments),
            related_id: Some(design.id),
            related_type: Some("design_submission".to_string()),
            priority: NotificationPriority::Normal,
            action_url: Some(format!("/designs/{}", design.id)),
        }
    }

    pub fn payment_created(payment: &Payment) -> Self {
        NotificationRequest {
            user_id: payment.payee_id,
            notification_type: "payment_created".to_string(),
            title: "Payment created".to_string(),
            message: format!("A payment of {} has been created for you", payment.amount),
            related_id: Some(payment.id),
            related_type: Some("payment".to_string()),
            priority: NotificationPriority::High,
            action_url: Some(format!("/payments/{}", payment.id)),
        }
    }

    pub fn payment_completed(payment: &Payment) -> Self {
        NotificationRequest {
            user_id: payment.payee_id,
            notification_type: "payment_completed".to_string(),
            title: "Payment completed".to_string(),
            message: format!("Your payment of {} has been completed", payment.amount),
            related_id: Some(payment.id),
            related_type: Some("payment".to_string()),
            priority: NotificationPriority::High,
            action_url: Some(format!("/payments/{}", payment.id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::progressmodel::ReviewStatus;
    use sqlx::types::BigDecimal;

    fn sample_update(comments: Option<&str>) -> ProgressUpdate {
        ProgressUpdate {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            bid_id: Uuid::new_v4(),
            submitted_by: Uuid::new_v4(),
            milestone_name: "Foundation".to_string(),
            description: "Foundation and groundwork complete".to_string(),
            progress_percentage: 25,
            payment_amount: BigDecimal::from(250000),
            attachment_urls: None,
            status: ReviewStatus::Rejected,
            reviewed_by: Some(Uuid::new_v4()),
            review_comments: comments.map(|c| c.to_string()),
            reviewed_at: None,
            submitted_at: None,
        }
    }

    #[test]
    fn rejection_notice_carries_review_comments() {
        let update = sample_update(Some("cracks along the east wall"));
        let request = NotificationRequest::progress_rejected(&update);
        assert_eq!(request.user_id, update.submitted_by);
        assert!(request.message.contains("cracks along the east wall"));
    }

    #[test]
    fn rejection_notice_survives_missing_comments() {
        let update = sample_update(None);
        let request = NotificationRequest::progress_rejected(&update);
        assert!(request.message.contains("no comments were provided"));
    }

    #[test]
    fn approval_notice_targets_the_submitter() {
        let update = sample_update(None);
        let request = NotificationRequest::progress_approved(&update);
        assert_eq!(request.user_id, update.submitted_by);
        assert_eq!(request.notification_type, "progress_approved");
        assert_eq!(request.priority, NotificationPriority::High);
    }
}
