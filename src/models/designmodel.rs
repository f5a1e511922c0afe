use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

use crate::models::progressmodel::ReviewStatus;

// Design submissions run the same review machine as progress updates. The
// client_id column is carried for display and notification copy only;
// review authorization always resolves through projects.user_id.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DesignSubmission {
    pub id: Uuid,
    pub project_id: Uuid,
    pub bid_id: Uuid,
    pub architect_id: Uuid,
    pub client_id: Uuid,
    pub title: String,
    pub description: String,
    pub payment_amount: BigDecimal,
    pub attachment_urls: Option<Vec<String>>,
    pub status: ReviewStatus,
    pub reviewed_by: Option<Uuid>,
    pub review_comments: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub submitted_at: Option<DateTime<Utc>>, // Database has DEFAULT NOW(), can be NULL
}
