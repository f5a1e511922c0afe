// db/designdb.rs
use async_trait::async_trait;
use sqlx::{types::BigDecimal, Error};
use uuid::Uuid;

use super::db::DBClient;
use crate::models::designmodel::DesignSubmission;
use crate::models::progressmodel::ReviewStatus;

const DESIGN_COLUMNS: &str = "id, project_id, bid_id, architect_id, client_id, title, description, \
     payment_amount, attachment_urls, status, reviewed_by, review_comments, reviewed_at, submitted_at";

#[async_trait]
pub trait DesignExt {
    async fn save_design_submission(
        &self,
        project_id: Uuid,
        bid_id: Uuid,
        architect_id: Uuid,
        client_id: Uuid,
        title: String,
        description: String,
        payment_amount: BigDecimal,
        attachment_urls: Option<Vec<String>>,
    ) -> Result<DesignSubmission, Error>;

    async fn get_design_submission(&self, design_id: Uuid) -> Result<Option<DesignSubmission>, Error>;

    async fn get_design_by_project_and_bid(
        &self,
        project_id: Uuid,
        bid_id: Uuid,
    ) -> Result<Option<DesignSubmission>, Error>;

    async fn get_designs_for_project(&self, project_id: Uuid) -> Result<Vec<DesignSubmission>, Error>;

    async fn review_design_submission_tx(
        &self,
        design_id: Uuid,
        decision: ReviewStatus,
        reviewed_by: Uuid,
        review_comments: Option<String>,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<Option<DesignSubmission>, Error>;
}

#[async_trait]
impl DesignExt for DBClient {
    async fn save_design_submission(
        &self,
        project_id: Uuid,
        bid_id: Uuid,
        architect_id: Uuid,
        client_id: Uuid,
        title: String,
        description: String,
        payment_amount: BigDecimal,
        attachment_urls: Option<Vec<String>>,
    ) -> Result<DesignSubmission, Error> {
        let query = format!(
            r#"
            INSERT INTO design_submissions
                (project_id, bid_id, architect_id, client_id, title, description,
                 payment_amount, attachment_urls)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            DESIGN_COLUMNS
        );

        sqlx::query_as::<_, DesignSubmission>(&query)
            .bind(project_id)
            .bind(bid_id)
            .bind(architect_id)
            .bind(client_id)
            .bind(title)
            .bind(description)
            .bind(payment_amount)
            .bind(attachment_urls)
            .fetch_one(&self.pool)
            .await
    }

    async fn get_design_submission(&self, design_id: Uuid) -> Result<Option<DesignSubmission>, Error> {
        let query = format!("SELECT {} FROM design_submissions WHERE id = $1", DESIGN_COLUMNS);

        sqlx::query_as::<_, DesignSubmission>(&query)
            .bind(design_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_design_by_project_and_bid(
        &self,
        project_id: Uuid,
        bid_id: Uuid,
    ) -> Result<Option<DesignSubmission>, Error> {
        let query = format!(
            "SELECT {} FROM design_submissions WHERE project_id = $1 AND bid_id = $2",
            DESIGN_COLUMNS
        );

        sqlx::query_as::<_, DesignSubmission>(&query)
            .bind(project_id)
            .bind(bid_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_designs_for_project(&self, project_id: Uuid) -> Result<Vec<DesignSubmission>, Error> {
        let query = format!(
            "SELECT {} FROM design_submissions WHERE project_id = $1 ORDER BY submitted_at DESC",
            DESIGN_COLUMNS
        );

        sqlx::query_as::<_, DesignSubmission>(&query)
            .bind(project_id)
            .fetch_all(&self.pool)
            .await
    }

    async fn review_design_submission_tx(
        &self,
        design_id: Uuid,
        decision: ReviewStatus,
        reviewed_by: Uuid,
        review_comments: Option<String>,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<Option<DesignSubmission>, Error> {
        let query = format!(
            r#"
            UPDATE design_submissions
            SET status = $2, reviewed_by = $3, review_comments = $4, reviewed_at = NOW()
            WHERE id = $1 AND status = 'pending_review'
            RETURNING {}
            "#,
            DESIGN_COLUMNS
        );

        sqlx::query_as::<_, DesignSubmission>(&query)
            .bind(design_id)
            .bind(decision)
            .bind(reviewed_by)
            .bind(review_comments)
            .fetch_optional(&mut **tx)
            .await
    }
}
