// db/progressdb.rs
use async_trait::async_trait;
use sqlx::{types::BigDecimal, Error};
use uuid::Uuid;

use super::db::DBClient;
use crate::models::progressmodel::{ProgressUpdate, ReviewStatus};

const PROGRESS_COLUMNS: &str = "id, project_id, bid_id, submitted_by, milestone_name, description, \
     progress_percentage, payment_amount, attachment_urls, status, reviewed_by, review_comments, \
     reviewed_at, submitted_at";

#[async_trait]
pub trait ProgressExt {
    async fn save_progress_update(
        &self,
        project_id: Uuid,
        bid_id: Uuid,
        submitted_by: Uuid,
        milestone_name: String,
        description: String,
        progress_percentage: i32,
        payment_amount: BigDecimal,
        attachment_urls: Option<Vec<String>>,
    ) -> Result<ProgressUpdate, Error>;

    async fn get_progress_update(&self, update_id: Uuid) -> Result<Option<ProgressUpdate>, Error>;

    async fn get_progress_updates_for_project(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<ProgressUpdate>, Error>;

    async fn review_progress_update_tx(
        &self,
        update_id: Uuid,
        decision: ReviewStatus,
        reviewed_by: Uuid,
        review_comments: Option<String>,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<Option<ProgressUpdate>, Error>;
}

#[async_trait]
impl ProgressExt for DBClient {
    async fn save_progress_update(
        &self,
        project_id: Uuid,
        bid_id: Uuid,
        submitted_by: Uuid,
        milestone_name: String,
        description: String,
        progress_percentage: i32,
        payment_amount: BigDecimal,
        attachment_urls: Option<Vec<String>>,
    ) -> Result<ProgressUpdate, Error> {
        let query = format!(
            r#"
            INSERT INTO progress_updates
                (project_id, bid_id, submitted_by, milestone_name, description,
                 progress_percentage, payment_amount, attachment_urls)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            PROGRESS_COLUMNS
        );

        sqlx::query_as::<_, ProgressUpdate>(&query)
            .bind(project_id)
            .bind(bid_id)
            .bind(submitted_by)
            .bind(milestone_name)
            .bind(description)
            .bind(progress_percentage)
            .bind(payment_amount)
            .bind(attachment_urls)
            .fetch_one(&self.pool)
            .await
    }

    async fn get_progress_update(&self, update_id: Uuid) -> Result<Option<ProgressUpdate>, Error> {
        let query = format!("SELECT {} FROM progress_updates WHERE id = $1", PROGRESS_COLUMNS);

        sqlx::query_as::<_, ProgressUpdate>(&query)
            .bind(update_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_progress_updates_for_project(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<ProgressUpdate>, Error> {
        let query = format!(
            "SELECT {} FROM progress_updates WHERE project_id = $1 ORDER BY submitted_at DESC",
            PROGRESS_COLUMNS
        );

        sqlx::query_as::<_, ProgressUpdate>(&query)
            .bind(project_id)
            .fetch_all(&self.pool)
            .await
    }

    // Review-once guard. The WHERE clause only matches a row still pending
    // review, a second reviewer gets zero rows back.
    async fn review_progress_update_tx(
        &self,
        update_id: Uuid,
        decision: ReviewStatus,
        reviewed_by: Uuid,
        review_comments: Option<String>,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<Option<ProgressUpdate>, Error> {
        let query = format!(
            r#"
            UPDATE progress_updates
            SET status = $2, reviewed_by = $3, review_comments = $4, reviewed_at = NOW()
            WHERE id = $1 AND status = 'pending_review'
            RETURNING {}
            "#,
            PROGRESS_COLUMNS
        );

        sqlx::query_as::<_, ProgressUpdate>(&query)
            .bind(update_id)
            .bind(decision)
            .bind(reviewed_by)
            .bind(review_comments)
            .fetch_optional(&mut **tx)
            .await
    }
}
