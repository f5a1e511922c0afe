// services/payment_service.rs
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    db::biddb::BidExt,
    db::db::DBClient,
    db::designdb::DesignExt,
    db::offerdb::OfferExt,
    db::paymentdb::PaymentExt,
    db::progressdb::ProgressExt,
    db::userdb::UserExt,
    dtos::paymentdtos::{CreatePaymentDto, UpdatePaymentStatusDto},
    models::bidmodel::BidStatus,
    models::notificationmodel::NotificationRequest,
    models::offermodel::OfferRef,
    models::paymentmodel::{Payment, PaymentMethod, PaymentSource, PaymentStatus},
    models::progressmodel::ReviewStatus,
    service::{
        error::ServiceError, generate_transaction_reference, money_from_f64,
        notification_service::NotificationService,
    },
};

#[derive(Debug, Clone)]
pub struct PaymentService {
    db_client: Arc<DBClient>,
    notification_service: Arc<NotificationService>,
}

impl PaymentService {
    pub fn new(db_client: Arc<DBClient>, notification_service: Arc<NotificationService>) -> Self {
        Self {
            db_client,
            notification_service,
        }
    }

    /// Direct ledger entry. The settlement and review paths write their own
    /// payments inside their transactions, this path exists for out-of-band
    /// entries and re-derives payer and payee from the referenced record
    /// instead of trusting the request.
    pub async fn create_payment(&self, dto: CreatePaymentDto) -> Result<Payment, ServiceError> {
        let source =
            PaymentSource::from_ids(dto.bid_id, dto.progress_update_id, dto.design_submission_id)
                .ok_or_else(|| {
                    ServiceError::Validation(
                        "Provide exactly one of bid_id, progress_update_id or design_submission_id"
                            .to_string(),
                    )
                })?;

        let amount = money_from_f64(dto.amount)?;
        let method = dto.method.unwrap_or(PaymentMethod::BankTransfer);

        let (expected_payer, expected_payee) = self.derive_parties(source).await?;

        if dto.payer_id != expected_payer || dto.payee_id != expected_payee {
            return Err(ServiceError::Validation(
                "Payer and payee do not match the referenced record".to_string(),
            ));
        }

        let payment = self
            .db_client
            .save_payment(
                source,
                expected_payer,
                expected_payee,
                amount,
                method,
                Some(generate_transaction_reference()),
            )
            .await?;

        tracing::info!(
            "PaymentService: payment {} of {} created ({} -> {})",
            payment.id,
            payment.amount,
            payment.payer_id,
            payment.payee_id
        );

        self.notification_service
            .enqueue(NotificationRequest::payment_created(&payment));

        Ok(payment)
    }

    pub async fn update_status(
        &self,
        payment_id: Uuid,
        dto: UpdatePaymentStatusDto,
    ) -> Result<Payment, ServiceError> {
        let requested = match dto.status.as_str() {
            "pending" => PaymentStatus::Pending,
            "processing" => PaymentStatus::Processing,
            "completed" => PaymentStatus::Completed,
            "failed" => PaymentStatus::Failed,
            "refunded" => PaymentStatus::Refunded,
            other => {
                return Err(ServiceError::Validation(format!(
                    "Invalid payment status '{}'",
                    other
                )))
            }
        };

        let payment = self
            .db_client
            .get_payment(payment_id)
            .await?
            .ok_or(ServiceError::PaymentNotFound(payment_id))?;

        if !payment.status.can_transition_to(requested) {
            return Err(ServiceError::InvalidPaymentTransition(format!(
                "Cannot transition from {:?} to {:?}",
                payment.status, requested
            )));
        }

        // The update pins the status we read, so a concurrent advance turns
        // into a conflict instead of a double transition.
        let updated = self
            .db_client
            .advance_payment_status(payment_id, payment.status, requested, dto.transaction_reference)
            .await?
            .ok_or_else(|| {
                ServiceError::InvalidPaymentTransition(format!(
                    "Cannot transition from {:?} to {:?}",
                    payment.status, requested
                ))
            })?;

        tracing::info!(
            "PaymentService: payment {} {} -> {}",
            payment_id,
            payment.status.to_str(),
            updated.status.to_str()
        );

        if updated.status == PaymentStatus::Completed {
            self.notification_service
                .enqueue(NotificationRequest::payment_completed(&updated));
        }

        Ok(updated)
    }

    pub async fn get_payment(&self, payment_id: Uuid) -> Result<Payment, ServiceError> {
        self.db_client
            .get_payment(payment_id)
            .await?
            .ok_or(ServiceError::PaymentNotFound(payment_id))
    }

    pub async fn get_payments_for_user(&self, user_id: Uuid) -> Result<Vec<Payment>, ServiceError> {
        self.db_client
            .get_user(user_id)
            .await?
            .ok_or(ServiceError::UserNotFound(user_id))?;

        Ok(self.db_client.get_payments_for_user(user_id).await?)
    }

    async fn derive_parties(&self, source: PaymentSource) -> Result<(Uuid, Uuid), ServiceError> {
        match source {
            PaymentSource::Bid(bid_id) => {
                let bid = self
                    .db_client
                    .get_bid(bid_id)
                    .await?
                    .ok_or(ServiceError::BidNotFound(bid_id))?;

                if bid.status != BidStatus::Accepted {
                    return Err(ServiceError::Validation(
                        "Payments can only be created for accepted bids".to_string(),
                    ));
                }

                let offer_ref = OfferRef::from_ids(bid.project_id, bid.material_request_id)
                    .ok_or_else(|| {
                        ServiceError::Validation("Bid references no listing".to_string())
                    })?;

                let offer = self
                    .db_client
                    .get_offer(offer_ref)
                    .await?
                    .ok_or(match offer_ref {
                        OfferRef::Project(id) => ServiceError::ProjectNotFound(id),
                        OfferRef::MaterialRequest(id) => ServiceError::MaterialRequestNotFound(id),
                    })?;

                Ok((offer.owner_id(), bid.bidder_user_id))
            }
            PaymentSource::ProgressUpdate(update_id) => {
                let update = self
                    .db_client
                    .get_progress_update(update_id)
                    .await?
                    .ok_or(ServiceError::ProgressUpdateNotFound(update_id))?;

                if update.status != ReviewStatus::Approved {
                    return Err(ServiceError::Validation(
                        "Payments can only be created for approved progress updates".to_string(),
                    ));
                }

                let project = self
                    .db_client
                    .get_project(update.project_id)
                    .await?
                    .ok_or(ServiceError::ProjectNotFound(update.project_id))?;

                Ok((project.user_id, update.submitted_by))
            }
            PaymentSource::DesignSubmission(design_id) => {
                let design = self
                    .db_client
                    .get_design_submission(design_id)
                    .await?
                    .ok_or(ServiceError::DesignSubmissionNotFound(design_id))?;

                if design.status != ReviewStatus::Approved {
                    return Err(ServiceError::Validation(
                        "Payments can only be created for approved design submissions".to_string(),
                    ));
                }

                let project = self
                    .db_client
                    .get_project(design.project_id)
                    .await?
                    .ok_or(ServiceError::ProjectNotFound(design.project_id))?;

                Ok((project.user_id, design.architect_id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    #[tokio::test]
    async fn payment_service_compiles() {
        let pool = PgPool::connect_lazy("postgres://localhost/buildbid").unwrap();
        let db_client = Arc::new(DBClient::new(pool));
        let (notification_service, _dispatcher) = NotificationService::new(db_client.clone());
        let _service = PaymentService::new(db_client, Arc::new(notification_service));
    }
}
