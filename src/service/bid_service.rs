// services/bid_service.rs
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    db::biddb::BidExt,
    db::db::DBClient,
    db::offerdb::OfferExt,
    db::userdb::UserExt,
    dtos::biddtos::{RespondToBidDto, SubmitBidDto},
    models::bidmodel::{Bid, BidDetails, BidStatus},
    models::notificationmodel::NotificationRequest,
    models::offermodel::{Offer, OfferRef},
    service::{
        error::ServiceError, money_from_f64, notification_service::NotificationService,
        settlement_service::SettlementService,
    },
};

#[derive(Debug, Clone)]
pub struct BidService {
    db_client: Arc<DBClient>,
    settlement_service: Arc<SettlementService>,
    notification_service: Arc<NotificationService>,
}

impl BidService {
    pub fn new(
        db_client: Arc<DBClient>,
        settlement_service: Arc<SettlementService>,
        notification_service: Arc<NotificationService>,
    ) -> Self {
        Self {
            db_client,
            settlement_service,
            notification_service,
        }
    }

    // The listing must still accept bids and the bidder must not own it.
    fn ensure_open_for_bidding(
        offer: &Offer,
        offer_id: Uuid,
        bidder_user_id: Uuid,
    ) -> Result<(), ServiceError> {
        if !offer.is_biddable() {
            return Err(ServiceError::OfferNotBiddable(offer_id));
        }

        if offer.owner_id() == bidder_user_id {
            return Err(ServiceError::SelfBid);
        }

        Ok(())
    }

    pub async fn submit_bid(&self, dto: SubmitBidDto) -> Result<BidDetails, ServiceError> {
        let offer_ref = OfferRef::from_ids(dto.project_id, dto.material_request_id).ok_or_else(|| {
            ServiceError::Validation(
                "Provide exactly one of project_id or material_request_id".to_string(),
            )
        })?;

        let offer = self
            .db_client
            .get_offer(offer_ref)
            .await?
            .ok_or(match offer_ref {
                OfferRef::Project(id) => ServiceError::ProjectNotFound(id),
                OfferRef::MaterialRequest(id) => ServiceError::MaterialRequestNotFound(id),
            })?;

        Self::ensure_open_for_bidding(&offer, offer_ref.id(), dto.bidder_user_id)?;

        if self
            .db_client
            .get_bid_by_bidder_and_offer(dto.bidder_user_id, offer_ref)
            .await?
            .is_some()
        {
            return Err(ServiceError::DuplicateBid(dto.bidder_user_id));
        }

        let amount = money_from_f64(dto.bid_amount)?;

        // The unique index backstops the duplicate check above against a
        // concurrent insert by the same bidder.
        let bid = match self
            .db_client
            .save_bid(
                offer_ref,
                dto.bidder_user_id,
                dto.bidder_role,
                amount,
                dto.proposed_timeline,
                dto.description,
            )
            .await
        {
            Ok(bid) => bid,
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(ServiceError::DuplicateBid(dto.bidder_user_id));
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            "BidService: bid {} submitted by {} with amount {}",
            bid.id,
            bid.bidder_user_id,
            bid.bid_amount
        );

        let details = self
            .db_client
            .get_bid_details(bid.id)
            .await?
            .ok_or(ServiceError::BidNotFound(bid.id))?;

        self.notification_service
            .enqueue(NotificationRequest::bid_received(offer.owner_id(), &details));

        Ok(details)
    }

    pub async fn respond_to_bid(&self, bid_id: Uuid, dto: RespondToBidDto) -> Result<Bid, ServiceError> {
        let decision = match dto.status.as_str() {
            "accepted" => BidStatus::Accepted,
            "rejected" => BidStatus::Rejected,
            other => {
                return Err(ServiceError::Validation(format!(
                    "Invalid status '{}': expected 'accepted' or 'rejected'",
                    other
                )))
            }
        };

        let mut tx = self.db_client.pool.begin().await?;

        // Compare-and-swap first. Whoever loses the race sees zero rows and
        // resolves to a conflict, the cascade below runs at most once.
        let bid = match self.db_client.resolve_bid_tx(bid_id, decision, &mut tx).await? {
            Some(bid) => bid,
            None => {
                return match self.db_client.get_bid(bid_id).await? {
                    Some(_) => Err(ServiceError::BidAlreadyResolved(bid_id)),
                    None => Err(ServiceError::BidNotFound(bid_id)),
                };
            }
        };

        let mut notifications = Vec::new();

        if decision == BidStatus::Accepted {
            notifications = self
                .settlement_service
                .settle_accepted_bid(&bid, &mut tx)
                .await?;
        }

        tx.commit().await?;

        if decision == BidStatus::Rejected {
            // Best effort title lookup for the rejection notice
            let offer_title = match OfferRef::from_ids(bid.project_id, bid.material_request_id) {
                Some(offer_ref) => self
                    .db_client
                    .get_offer(offer_ref)
                    .await
                    .ok()
                    .flatten()
                    .map(|offer| offer.title().to_string()),
                None => None,
            };
            notifications.push(NotificationRequest::bid_rejected(&bid, offer_title.as_deref()));
        }

        for request in notifications {
            self.notification_service.enqueue(request);
        }

        tracing::info!("BidService: bid {} {}", bid.id, bid.status.to_str());

        Ok(bid)
    }

    pub async fn withdraw_bid(&self, bid_id: Uuid) -> Result<(), ServiceError> {
        let bid = self
            .db_client
            .get_bid(bid_id)
            .await?
            .ok_or(ServiceError::BidNotFound(bid_id))?;

        if bid.status != BidStatus::Pending {
            return Err(ServiceError::BidNotWithdrawable(bid_id));
        }

        // The delete re-checks pending, a response landing in between
        // surfaces as a conflict rather than silently deleting history.
        if !self.db_client.delete_pending_bid(bid_id).await? {
            return Err(ServiceError::BidNotWithdrawable(bid_id));
        }

        tracing::info!("BidService: bid {} withdrawn", bid_id);

        Ok(())
    }

    pub async fn get_bid(&self, bid_id: Uuid) -> Result<BidDetails, ServiceError> {
        self.db_client
            .get_bid_details(bid_id)
            .await?
            .ok_or(ServiceError::BidNotFound(bid_id))
    }

    pub async fn get_bids_for_project(&self, project_id: Uuid) -> Result<Vec<BidDetails>, ServiceError> {
        self.db_client
            .get_project(project_id)
            .await?
            .ok_or(ServiceError::ProjectNotFound(project_id))?;

        Ok(self
            .db_client
            .get_bids_for_offer(OfferRef::Project(project_id))
            .await?)
    }

    pub async fn get_bids_for_material_request(
        &self,
        request_id: Uuid,
    ) -> Result<Vec<BidDetails>, ServiceError> {
        self.db_client
            .get_material_request(request_id)
            .await?
            .ok_or(ServiceError::MaterialRequestNotFound(request_id))?;

        Ok(self
            .db_client
            .get_bids_for_offer(OfferRef::MaterialRequest(request_id))
            .await?)
    }

    pub async fn get_bids_by_bidder(&self, user_id: Uuid) -> Result<Vec<BidDetails>, ServiceError> {
        self.db_client
            .get_user(user_id)
            .await?
            .ok_or(ServiceError::UserNotFound(user_id))?;

        Ok(self.db_client.get_bids_by_bidder(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::offermodel::{MaterialRequest, Project, ProjectStatus};
    use sqlx::PgPool;

    fn project_owned_by(user_id: Uuid, status: Option<ProjectStatus>) -> Offer {
        Offer::Project(Project {
            id: Uuid::new_v4(),
            user_id,
            title: "3 bedroom duplex".to_string(),
            description: "Full build from foundation".to_string(),
            status,
            awarded_bid_id: None,
            overall_progress: 0,
            created_at: None,
            updated_at: None,
        })
    }

    #[test]
    fn open_listing_accepts_a_strangers_bid() {
        let offer = project_owned_by(Uuid::new_v4(), Some(ProjectStatus::Active));
        let result = BidService::ensure_open_for_bidding(&offer, Uuid::new_v4(), Uuid::new_v4());
        assert!(result.is_ok());
    }

    #[test]
    fn owner_cannot_bid_on_own_listing() {
        let owner = Uuid::new_v4();

        let project = project_owned_by(owner, Some(ProjectStatus::Active));
        let result = BidService::ensure_open_for_bidding(&project, Uuid::new_v4(), owner);
        assert!(matches!(result, Err(ServiceError::SelfBid)));

        let request = Offer::MaterialRequest(MaterialRequest {
            id: Uuid::new_v4(),
            user_id: owner,
            title: "Roofing sheets".to_string(),
            description: "200 corrugated aluminium sheets".to_string(),
            status: None,
            created_at: None,
            updated_at: None,
        });
        let result = BidService::ensure_open_for_bidding(&request, Uuid::new_v4(), owner);
        assert!(matches!(result, Err(ServiceError::SelfBid)));
    }

    #[test]
    fn awarded_listing_rejects_new_bids() {
        let offer_id = Uuid::new_v4();
        let offer = project_owned_by(Uuid::new_v4(), Some(ProjectStatus::InProgress));
        let result = BidService::ensure_open_for_bidding(&offer, offer_id, Uuid::new_v4());
        assert!(matches!(result, Err(ServiceError::OfferNotBiddable(id)) if id == offer_id));
    }

    #[tokio::test]
    async fn bid_service_compiles() {
        let pool = PgPool::connect_lazy("postgres://localhost/buildbid").unwrap();
        let db_client = Arc::new(DBClient::new(pool));
        let settlement_service = Arc::new(SettlementService::new(db_client.clone()));
        let (notification_service, _dispatcher) = NotificationService::new(db_client.clone());
        let _service = BidService::new(
            db_client,
            settlement_service,
            Arc::new(notification_service),
        );
    }
}
