use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dtos::common::validate_money_amount;

//Design submission DTOs
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SubmitDesignDto {
    pub project_id: Uuid,
    pub bid_id: Uuid,

    // Must match the architect on the accepted bid for this project.
    pub architect_id: Uuid,

    // Stored for display only; review rights come from the project owner.
    pub client_id: Uuid,

    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,

    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: String,

    #[validate(custom = "validate_money_amount")]
    pub payment_amount: f64,

    pub attachment_urls: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_title() {
        let dto = SubmitDesignDto {
            project_id: Uuid::new_v4(),
            bid_id: Uuid::new_v4(),
            architect_id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            title: "".to_string(),
            description: "Structural drawings for the ground floor".to_string(),
            payment_amount: 150000.0,
            attachment_urls: None,
        };
        assert!(dto.validate().is_err());
    }
}
