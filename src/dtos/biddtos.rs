use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dtos::common::validate_money_amount;
use crate::models::bidmodel::BidderRole;

//Bid DTOs
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SubmitBidDto {
    // Exactly one of these two must be present, checked by the service
    // against OfferRef::from_ids before anything touches the database.
    pub project_id: Option<Uuid>,
    pub material_request_id: Option<Uuid>,

    pub bidder_user_id: Uuid,

    pub bidder_role: BidderRole,

    #[validate(custom = "validate_money_amount")]
    pub bid_amount: f64,

    #[validate(length(min = 3, max = 100, message = "Timeline must be between 3 and 100 characters"))]
    pub proposed_timeline: String,

    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RespondToBidDto {
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_dto() -> SubmitBidDto {
        SubmitBidDto {
            project_id: Some(Uuid::new_v4()),
            material_request_id: None,
            bidder_user_id: Uuid::new_v4(),
            bidder_role: BidderRole::Constructor,
            bid_amount: 10000.0,
            proposed_timeline: "6 weeks".to_string(),
            description: "Supply and installation of roofing sheets".to_string(),
        }
    }

    #[test]
    fn accepts_a_well_formed_bid() {
        assert!(valid_dto().validate().is_ok());
    }

    #[test]
    fn rejects_short_timeline_and_description() {
        let mut dto = valid_dto();
        dto.proposed_timeline = "2w".to_string();
        assert!(dto.validate().is_err());

        let mut dto = valid_dto();
        dto.description = "too short".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn rejects_bad_amounts() {
        let mut dto = valid_dto();
        dto.bid_amount = 0.0;
        assert!(dto.validate().is_err());

        let mut dto = valid_dto();
        dto.bid_amount = 99.999;
        assert!(dto.validate().is_err());
    }
}
