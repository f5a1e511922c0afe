// services/progress_service.rs
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    db::biddb::BidExt,
    db::db::DBClient,
    db::offerdb::OfferExt,
    db::paymentdb::PaymentExt,
    db::progressdb::ProgressExt,
    dtos::common::ReviewDecisionDto,
    dtos::progressdtos::SubmitProgressDto,
    models::notificationmodel::NotificationRequest,
    models::paymentmodel::{PaymentMethod, PaymentSource},
    models::progressmodel::{accumulate_progress, ProgressUpdate, ReviewStatus},
    service::{
        error::ServiceError, generate_transaction_reference, money_from_f64,
        notification_service::NotificationService,
    },
};

#[derive(Debug, Clone)]
pub struct ProgressService {
    db_client: Arc<DBClient>,
    notification_service: Arc<NotificationService>,
}

impl ProgressService {
    pub fn new(db_client: Arc<DBClient>, notification_service: Arc<NotificationService>) -> Self {
        Self {
            db_client,
            notification_service,
        }
    }

    pub async fn submit_update(&self, dto: SubmitProgressDto) -> Result<ProgressUpdate, ServiceError> {
        let amount = money_from_f64(dto.payment_amount)?;

        // Only the constructor on the accepted bid may report progress. The
        // lookup folds "no such project/bid" and "not your bid" into one
        // answer on purpose.
        let bid = self
            .db_client
            .get_accepted_bid(dto.project_id, dto.bid_id, dto.submitted_by)
            .await?
            .ok_or(ServiceError::NoAcceptedBid)?;

        let project = self
            .db_client
            .get_project(dto.project_id)
            .await?
            .ok_or(ServiceError::ProjectNotFound(dto.project_id))?;

        let update = self
            .db_client
            .save_progress_update(
                dto.project_id,
                dto.bid_id,
                dto.submitted_by,
                dto.milestone_name,
                dto.description,
                dto.progress_percentage,
                amount,
                dto.attachment_urls,
            )
            .await?;

        tracing::info!(
            "ProgressService: update {} ({}%) submitted on bid {} for project {}",
            update.id,
            update.progress_percentage,
            bid.id,
            project.id
        );

        self.notification_service
            .enqueue(NotificationRequest::progress_submitted(project.user_id, &update));

        Ok(update)
    }

    pub async fn review_update(
        &self,
        update_id: Uuid,
        dto: ReviewDecisionDto,
    ) -> Result<ProgressUpdate, ServiceError> {
        let decision = match dto.status.as_str() {
            "approved" => ReviewStatus::Approved,
            "rejected" => ReviewStatus::Rejected,
            other => {
                return Err(ServiceError::Validation(format!(
                    "Invalid status '{}': expected 'approved' or 'rejected'",
                    other
                )))
            }
        };

        let update = self
            .db_client
            .get_progress_update(update_id)
            .await?
            .ok_or(ServiceError::ProgressUpdateNotFound(update_id))?;

        if update.status != ReviewStatus::PendingReview {
            return Err(ServiceError::AlreadyReviewed(update_id));
        }

        // Authorization before any mutation: only the project owner reviews.
        let project = self
            .db_client
            .get_project(update.project_id)
            .await?
            .ok_or(ServiceError::ProjectNotFound(update.project_id))?;

        if project.user_id != dto.reviewed_by {
            return Err(ServiceError::NotProjectOwner(dto.reviewed_by, project.id));
        }

        let mut tx = self.db_client.pool.begin().await?;

        let reviewed = self
            .db_client
            .review_progress_update_tx(update_id, decision, dto.reviewed_by, dto.review_comments, &mut tx)
            .await?
            .ok_or(ServiceError::AlreadyReviewed(update_id))?;

        let notification = if decision == ReviewStatus::Approved {
            // Lock the project row, accumulate clamped progress, and open
            // the milestone payment, all on the same transaction.
            let locked = self
                .db_client
                .get_project_for_update_tx(reviewed.project_id, &mut tx)
                .await?
                .ok_or(ServiceError::ProjectNotFound(reviewed.project_id))?;

            let new_progress = accumulate_progress(locked.overall_progress, reviewed.progress_percentage);

            self.db_client
                .set_project_progress_tx(locked.id, new_progress, &mut tx)
                .await?;

            let payment = self
                .db_client
                .save_payment_tx(
                    PaymentSource::ProgressUpdate(reviewed.id),
                    project.user_id,
                    reviewed.submitted_by,
                    reviewed.payment_amount.clone(),
                    PaymentMethod::BankTransfer,
                    Some(generate_transaction_reference()),
                    &mut tx,
                )
                .await?;

            tracing::info!(
                "ProgressService: update {} approved, project {} now at {}%, payment {} opened",
                reviewed.id,
                locked.id,
                new_progress,
                payment.id
            );

            NotificationRequest::progress_approved(&reviewed)
        } else {
            tracing::info!("ProgressService: update {} rejected", reviewed.id);
            NotificationRequest::progress_rejected(&reviewed)
        };

        tx.commit().await?;

        self.notification_service.enqueue(notification);

        Ok(reviewed)
    }

    pub async fn get_update(&self, update_id: Uuid) -> Result<ProgressUpdate, ServiceError> {
        self.db_client
            .get_progress_update(update_id)
            .await?
            .ok_or(ServiceError::ProgressUpdateNotFound(update_id))
    }

    pub async fn get_updates_for_project(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<ProgressUpdate>, ServiceError> {
        self.db_client
            .get_project(project_id)
            .await?
            .ok_or(ServiceError::ProjectNotFound(project_id))?;

        Ok(self
            .db_client
            .get_progress_updates_for_project(project_id)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::notification_service::NotificationService;
    use sqlx::PgPool;

    #[tokio::test]
    async fn progress_service_compiles() {
        let pool = PgPool::connect_lazy("postgres://localhost/buildbid").unwrap();
        let db_client = Arc::new(DBClient::new(pool));
        let (notification_service, _dispatcher) = NotificationService::new(db_client.clone());
        let _service = ProgressService::new(db_client, Arc::new(notification_service));
    }
}
