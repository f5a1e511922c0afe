// services/settlement_service.rs
use std::sync::Arc;

use crate::{
    db::db::DBClient,
    db::offerdb::OfferExt,
    db::paymentdb::PaymentExt,
    models::bidmodel::Bid,
    models::notificationmodel::NotificationRequest,
    models::offermodel::OfferRef,
    models::paymentmodel::{PaymentMethod, PaymentSource},
    service::{error::ServiceError, generate_transaction_reference},
};

/// Runs the cascade that follows a bid acceptance: award the listing and,
/// for material requests, open the payment that settles the purchase.
///
/// Always called on the transaction that flipped the bid, so either the
/// whole cascade lands or none of it does. Side effects that must not run
/// before the commit (notifications) are returned to the caller as data.
#[derive(Debug, Clone)]
pub struct SettlementService {
    db_client: Arc<DBClient>,
}

impl SettlementService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    pub async fn settle_accepted_bid(
        &self,
        bid: &Bid,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<Vec<NotificationRequest>, ServiceError> {
        let offer_ref = OfferRef::from_ids(bid.project_id, bid.material_request_id)
            .ok_or_else(|| ServiceError::Validation("Bid references no listing".to_string()))?;

        let mut notifications = Vec::new();

        match offer_ref {
            OfferRef::Project(project_id) => {
                let project = self
                    .db_client
                    .award_project_tx(project_id, bid.id, tx)
                    .await?
                    .ok_or(ServiceError::OfferNotBiddable(project_id))?;

                tracing::info!(
                    "SettlementService: project {} awarded to bid {}",
                    project.id,
                    bid.id
                );

                notifications.push(NotificationRequest::bid_accepted(bid, &project.title));
            }
            OfferRef::MaterialRequest(request_id) => {
                let request = self
                    .db_client
                    .award_material_request_tx(request_id, tx)
                    .await?
                    .ok_or(ServiceError::OfferNotBiddable(request_id))?;

                // Supply deals settle at the bid amount, owner pays supplier
                let payment = self
                    .db_client
                    .save_payment_tx(
                        PaymentSource::Bid(bid.id),
                        request.user_id,
                        bid.bidder_user_id,
                        bid.bid_amount.clone(),
                        PaymentMethod::BankTransfer,
                        Some(generate_transaction_reference()),
                        tx,
                    )
                    .await?;

                tracing::info!(
                    "SettlementService: material request {} awarded to bid {}, payment {} of {} opened",
                    request.id,
                    bid.id,
                    payment.id,
                    payment.amount
                );

                notifications.push(NotificationRequest::bid_accepted(bid, &request.title));
                notifications.push(NotificationRequest::payment_created(&payment));
            }
        }

        Ok(notifications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    #[tokio::test]
    async fn settlement_service_compiles() {
        let pool = PgPool::connect_lazy("postgres://localhost/buildbid").unwrap();
        let db_client = Arc::new(DBClient::new(pool));
        let _service = SettlementService::new(db_client);
    }
}
