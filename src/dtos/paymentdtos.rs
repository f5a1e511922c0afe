use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dtos::common::validate_money_amount;
use crate::models::paymentmodel::PaymentMethod;

//Payment DTOs
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreatePaymentDto {
    // Exactly one source reference must be present.
    pub bid_id: Option<Uuid>,
    pub progress_update_id: Option<Uuid>,
    pub design_submission_id: Option<Uuid>,

    pub payer_id: Uuid,
    pub payee_id: Uuid,

    #[validate(custom = "validate_money_amount")]
    pub amount: f64,

    pub method: Option<PaymentMethod>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdatePaymentStatusDto {
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,

    #[validate(length(max = 100, message = "Transaction reference must be at most 100 characters"))]
    pub transaction_reference: Option<String>,
}
