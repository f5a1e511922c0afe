use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dtos::common::validate_money_amount;

//Progress update DTOs
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SubmitProgressDto {
    pub project_id: Uuid,
    pub bid_id: Uuid,

    // Must match the constructor on the accepted bid for this project.
    pub submitted_by: Uuid,

    #[validate(length(min = 1, max = 100, message = "Milestone name must be between 1 and 100 characters"))]
    pub milestone_name: String,

    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: String,

    #[validate(range(min = 0, max = 100, message = "Progress percentage must be between 0 and 100"))]
    pub progress_percentage: i32,

    #[validate(custom = "validate_money_amount")]
    pub payment_amount: f64,

    pub attachment_urls: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_dto() -> SubmitProgressDto {
        SubmitProgressDto {
            project_id: Uuid::new_v4(),
            bid_id: Uuid::new_v4(),
            submitted_by: Uuid::new_v4(),
            milestone_name: "Foundation".to_string(),
            description: "Excavation and foundation casting complete".to_string(),
            progress_percentage: 25,
            payment_amount: 250000.0,
            attachment_urls: Some(vec!["https://cdn.example.com/site-1.jpg".to_string()]),
        }
    }

    #[test]
    fn accepts_a_well_formed_update() {
        assert!(valid_dto().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_percentage() {
        let mut dto = valid_dto();
        dto.progress_percentage = 101;
        assert!(dto.validate().is_err());

        let mut dto = valid_dto();
        dto.progress_percentage = -5;
        assert!(dto.validate().is_err());
    }
}
