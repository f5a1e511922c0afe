// services/design_service.rs
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    db::biddb::BidExt,
    db::db::DBClient,
    db::designdb::DesignExt,
    db::offerdb::OfferExt,
    db::paymentdb::PaymentExt,
    dtos::common::ReviewDecisionDto,
    dtos::designdtos::SubmitDesignDto,
    models::bidmodel::BidderRole,
    models::designmodel::DesignSubmission,
    models::notificationmodel::NotificationRequest,
    models::paymentmodel::{PaymentMethod, PaymentSource},
    models::progressmodel::ReviewStatus,
    service::{
        error::ServiceError, generate_transaction_reference, money_from_f64,
        notification_service::NotificationService,
    },
};

#[derive(Debug, Clone)]
pub struct DesignService {
    db_client: Arc<DBClient>,
    notification_service: Arc<NotificationService>,
}

impl DesignService {
    pub fn new(db_client: Arc<DBClient>, notification_service: Arc<NotificationService>) -> Self {
        Self {
            db_client,
            notification_service,
        }
    }

    pub async fn submit_design(&self, dto: SubmitDesignDto) -> Result<DesignSubmission, ServiceError> {
        let amount = money_from_f64(dto.payment_amount)?;

        let bid = self
            .db_client
            .get_accepted_bid(dto.project_id, dto.bid_id, dto.architect_id)
            .await?
            .ok_or(ServiceError::NoAcceptedBid)?;

        // The accepted bid must be an architect's. A constructor's bid on
        // the same project does not open the design lane.
        if bid.bidder_role != BidderRole::Architect {
            return Err(ServiceError::NoAcceptedBid);
        }

        if self
            .db_client
            .get_design_by_project_and_bid(dto.project_id, dto.bid_id)
            .await?
            .is_some()
        {
            return Err(ServiceError::DuplicateDesignSubmission);
        }

        let project = self
            .db_client
            .get_project(dto.project_id)
            .await?
            .ok_or(ServiceError::ProjectNotFound(dto.project_id))?;

        // The unique index on (project_id, bid_id) backstops the duplicate
        // check against a concurrent submission.
        let design = match self
            .db_client
            .save_design_submission(
                dto.project_id,
                dto.bid_id,
                dto.architect_id,
                dto.client_id,
                dto.title,
                dto.description,
                amount,
                dto.attachment_urls,
            )
            .await
        {
            Ok(design) => design,
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(ServiceError::DuplicateDesignSubmission);
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            "DesignService: design {} submitted on bid {} for project {}",
            design.id,
            design.bid_id,
            design.project_id
        );

        self.notification_service
            .enqueue(NotificationRequest::design_submitted(project.user_id, &design));

        Ok(design)
    }

    pub async fn review_design(
        &self,
        design_id: Uuid,
        dto: ReviewDecisionDto,
    ) -> Result<DesignSubmission, ServiceError> {
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

        let design = self
            .db_client
            .get_design_submission(design_id)
            .await?
            .ok_or(ServiceError::DesignSubmissionNotFound(design_id))?;

        if design.status != ReviewStatus::PendingReview {
            return Err(ServiceError::AlreadyReviewed(design_id));
        }

        // Review rights belong to whoever owns the project row. The stored
        // client_id is display data and deliberately not consulted.
        let project = self
            .db_client
            .get_project(design.project_id)
            .await?
            .ok_or(ServiceError::ProjectNotFound(design.project_id))?;

        if project.user_id != dto.reviewed_by {
            return Err(ServiceError::NotProjectOwner(dto.reviewed_by, project.id));
        }

        let mut tx = self.db_client.pool.begin().await?;

        let reviewed = self
            .db_client
            .review_design_submission_tx(design_id, decision, dto.reviewed_by, dto.review_comments, &mut tx)
            .await?
            .ok_or(ServiceError::AlreadyReviewed(design_id))?;

        let notification = if decision == ReviewStatus::Approved {
            let payment = self
                .db_client
                .save_payment_tx(
                    PaymentSource::DesignSubmission(reviewed.id),
                    project.user_id,
                    reviewed.architect_id,
                    reviewed.payment_amount.clone(),
                    PaymentMethod::BankTransfer,
                    Some(generate_transaction_reference()),
                    &mut tx,
                )
                .await?;

            tracing::info!(
                "DesignService: design {} approved, payment {} opened",
                reviewed.id,
                payment.id
            );

            NotificationRequest::design_approved(&reviewed)
        } else {
            tracing::info!("DesignService: design {} rejected", reviewed.id);
            NotificationRequest::design_rejected(&reviewed)
        };

        tx.commit().await?;

        self.notification_service.enqueue(notification);

        Ok(reviewed)
    }

    pub async fn get_design(&self, design_id: Uuid) -> Result<DesignSubmission, ServiceError> {
        self.db_client
            .get_design_submission(design_id)
            .await?
            .ok_or(ServiceError::DesignSubmissionNotFound(design_id))
    }

    pub async fn get_designs_for_project(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<DesignSubmission>, ServiceError> {
        self.db_client
            .get_project(project_id)
            .await?
            .ok_or(ServiceError::ProjectNotFound(project_id))?;

        Ok(self.db_client.get_designs_for_project(project_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    #[tokio::test]
    async fn design_service_compiles() {
        let pool = PgPool::connect_lazy("postgres://localhost/buildbid").unwrap();
        let db_client = Arc::new(DBClient::new(pool));
        let (notification_service, _dispatcher) = NotificationService::new(db_client.clone());
        let _service = DesignService::new(db_client, Arc::new(notification_service));
    }
}
