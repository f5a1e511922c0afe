// db/biddb.rs
use async_trait::async_trait;
use sqlx::{types::BigDecimal, Error};
use uuid::Uuid;

use super::db::DBClient;
use crate::models::bidmodel::{Bid, BidDetails, BidStatus, BidderRole};
use crate::models::offermodel::OfferRef;

const BID_COLUMNS: &str = "id, project_id, material_request_id, bidder_user_id, bidder_role, \
     bid_amount, proposed_timeline, description, status, submitted_at, updated_at";

// Shared SELECT for the enriched projection. LEFT joins keep bids visible
// even when the user row is gone.
const BID_DETAILS_SELECT: &str = r#"
    SELECT b.id, b.project_id, b.material_request_id, b.bidder_user_id, b.bidder_role,
           b.bid_amount, b.proposed_timeline, b.description, b.status, b.submitted_at, b.updated_at,
           u.name AS bidder_name, u.username AS bidder_username,
           COALESCE(p.title, mr.title) AS offer_title
    FROM bids b
    LEFT JOIN users u ON u.id = b.bidder_user_id
    LEFT JOIN projects p ON p.id = b.project_id
    LEFT JOIN material_requests mr ON mr.id = b.material_request_id
"#;

#[async_trait]
pub trait BidExt {
    async fn save_bid(
        &self,
        offer: OfferRef,
        bidder_user_id: Uuid,
        bidder_role: BidderRole,
        bid_amount: BigDecimal,
        proposed_timeline: String,
        description: String,
    ) -> Result<Bid, Error>;

    async fn get_bid(&self, bid_id: Uuid) -> Result<Option<Bid>, Error>;

    async fn get_bid_details(&self, bid_id: Uuid) -> Result<Option<BidDetails>, Error>;

    async fn get_bid_by_bidder_and_offer(
        &self,
        bidder_user_id: Uuid,
        offer: OfferRef,
    ) -> Result<Option<Bid>, Error>;

    async fn get_accepted_bid(
        &self,
        project_id: Uuid,
        bid_id: Uuid,
        bidder_user_id: Uuid,
    ) -> Result<Option<Bid>, Error>;

    async fn get_bids_for_offer(&self, offer: OfferRef) -> Result<Vec<BidDetails>, Error>;

    async fn get_bids_by_bidder(&self, bidder_user_id: Uuid) -> Result<Vec<BidDetails>, Error>;

    async fn resolve_bid_tx(
        &self,
        bid_id: Uuid,
        decision: BidStatus,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<Option<Bid>, Error>;

    async fn delete_pending_bid(&self, bid_id: Uuid) -> Result<bool, Error>;
}

#[async_trait]
impl BidExt for DBClient {
    async fn save_bid(
        &self,
        offer: OfferRef,
        bidder_user_id: Uuid,
        bidder_role: BidderRole,
        bid_amount: BigDecimal,
        proposed_timeline: String,
        description: String,
    ) -> Result<Bid, Error> {
        let (project_id, material_request_id) = match offer {
            OfferRef::Project(id) => (Some(id), None),
            OfferRef::MaterialRequest(id) => (None, Some(id)),
        };

        let query = format!(
            r#"
            INSERT INTO bids
                (project_id, material_request_id, bidder_user_id, bidder_role,
                 bid_amount, proposed_timeline, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            BID_COLUMNS
        );

        sqlx::query_as::<_, Bid>(&query)
            .bind(project_id)
            .bind(material_request_id)
            .bind(bidder_user_id)
            .bind(bidder_role)
            .bind(bid_amount)
            .bind(proposed_timeline)
            .bind(description)
            .fetch_one(&self.pool)
            .await
    }

    async fn get_bid(&self, bid_id: Uuid) -> Result<Option<Bid>, Error> {
        let query = format!("SELECT {} FROM bids WHERE id = $1", BID_COLUMNS);

        sqlx::query_as::<_, Bid>(&query)
            .bind(bid_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_bid_details(&self, bid_id: Uuid) -> Result<Option<BidDetails>, Error> {
        let query = format!("{} WHERE b.id = $1", BID_DETAILS_SELECT);

        sqlx::query_as::<_, BidDetails>(&query)
            .bind(bid_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_bid_by_bidder_and_offer(
        &self,
        bidder_user_id: Uuid,
        offer: OfferRef,
    ) -> Result<Option<Bid>, Error> {
        let query = match offer {
            OfferRef::Project(_) => format!(
                "SELECT {} FROM bids WHERE bidder_user_id = $1 AND project_id = $2",
                BID_COLUMNS
            ),
            OfferRef::MaterialRequest(_) => format!(
                "SELECT {} FROM bids WHERE bidder_user_id = $1 AND material_request_id = $2",
                BID_COLUMNS
            ),
        };

        sqlx::query_as::<_, Bid>(&query)
            .bind(bidder_user_id)
            .bind(offer.id())
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_accepted_bid(
        &self,
        project_id: Uuid,
        bid_id: Uuid,
        bidder_user_id: Uuid,
    ) -> Result<Option<Bid>, Error> {
        let query = format!(
            r#"
            SELECT {} FROM bids
            WHERE id = $1 AND project_id = $2 AND bidder_user_id = $3 AND status = 'accepted'
            "#,
            BID_COLUMNS
        );

        sqlx::query_as::<_, Bid>(&query)
            .bind(bid_id)
            .bind(project_id)
            .bind(bidder_user_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_bids_for_offer(&self, offer: OfferRef) -> Result<Vec<BidDetails>, Error> {
        let query = match offer {
            OfferRef::Project(_) => format!(
                "{} WHERE b.project_id = $1 ORDER BY b.submitted_at DESC",
                BID_DETAILS_SELECT
            ),
            OfferRef::MaterialRequest(_) => format!(
                "{} WHERE b.material_request_id = $1 ORDER BY b.submitted_at DESC",
                BID_DETAILS_SELECT
            ),
        };

        sqlx::query_as::<_, BidDetails>(&query)
            .bind(offer.id())
            .fetch_all(&self.pool)
            .await
    }

    async fn get_bids_by_bidder(&self, bidder_user_id: Uuid) -> Result<Vec<BidDetails>, Error> {
        let query = format!(
            "{} WHERE b.bidder_user_id = $1 ORDER BY b.submitted_at DESC",
            BID_DETAILS_SELECT
        );

        sqlx::query_as::<_, BidDetails>(&query)
            .bind(bidder_user_id)
            .fetch_all(&self.pool)
            .await
    }

    // Compare-and-swap resolution. Zero rows back means the bid was missing
    // or already resolved, the caller disambiguates with a plain load.
    async fn resolve_bid_tx(
        &self,
        bid_id: Uuid,
        decision: BidStatus,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<Option<Bid>, Error> {
        let query = format!(
            r#"
            UPDATE bids
            SET status = $2, updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING {}
            "#,
            BID_COLUMNS
        );

        sqlx::query_as::<_, Bid>(&query)
            .bind(bid_id)
            .bind(decision)
            .fetch_optional(&mut **tx)
            .await
    }

    async fn delete_pending_bid(&self, bid_id: Uuid) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM bids WHERE id = $1 AND status = 'pending'")
            .bind(bid_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
