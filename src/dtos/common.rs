use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

//Response wrappers
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: &str, data: T) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data: Some(data),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: i64, page: u32, limit: u32) -> Self {
        let total_pages = ((total as f64) / (limit as f64)).ceil() as u32;
        Self {
            success: true,
            data,
            total,
            page,
            limit,
            total_pages,
        }
    }
}

// Shared review body for progress updates and design submissions. The status
// string is parsed by the service so unknown values come back as a 400 with
// the offending value in the message.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ReviewDecisionDto {
    pub reviewed_by: Uuid,

    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,

    #[validate(length(max = 1000, message = "Review comments must be at most 1000 characters"))]
    pub review_comments: Option<String>,
}

/// Money arrives as JSON numbers. Accepts strictly positive values with at
/// most two decimal places; everything else (zero, negatives, sub-cent
/// precision, NaN, infinities) is rejected before it reaches the database.
pub fn validate_money_amount(amount: f64) -> Result<(), validator::ValidationError> {
    if !amount.is_finite() {
        return Err(validator::ValidationError::new("amount_not_finite"));
    }
    if amount <= 0.0 {
        return Err(validator::ValidationError::new("amount_not_positive"));
    }
    let cents = amount * 100.0;
    if (cents - cents.round()).abs() > 1e-6 {
        return Err(validator::ValidationError::new("amount_precision"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_two_decimal_amounts() {
        assert!(validate_money_amount(10000.0).is_ok());
        assert!(validate_money_amount(4500.50).is_ok());
        assert!(validate_money_amount(0.01).is_ok());
    }

    #[test]
    fn rejects_non_positive_and_sub_cent_amounts() {
        assert!(validate_money_amount(0.0).is_err());
        assert!(validate_money_amount(-25.0).is_err());
        assert!(validate_money_amount(10.001).is_err());
        assert!(validate_money_amount(f64::NAN).is_err());
        assert!(validate_money_amount(f64::INFINITY).is_err());
    }

    #[test]
    fn pagination_rounds_total_pages_up() {
        let page: PaginatedResponse<u8> = PaginatedResponse::new(vec![], 21, 1, 10);
        assert_eq!(page.total_pages, 3);
    }
}
