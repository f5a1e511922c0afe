pub mod bid_service;
pub mod design_service;
pub mod error;
pub mod notification_service;
pub mod payment_service;
pub mod progress_service;
pub mod settlement_service;

use bigdecimal::RoundingMode;
use chrono::Utc;
use num_traits::FromPrimitive;
use rand::Rng;
use sqlx::types::BigDecimal;

use self::error::ServiceError;

/// Converts a validated request amount into the NUMERIC(12,2) the ledger
/// stores. DTO validation has already rejected non-finite and sub-cent
/// values, the rounding here only normalizes float representation noise.
pub(crate) fn money_from_f64(amount: f64) -> Result<BigDecimal, ServiceError> {
    BigDecimal::from_f64(amount)
        .map(|value| value.with_scale_round(2, RoundingMode::HalfUp))
        .ok_or_else(|| ServiceError::Validation(format!("Invalid money amount: {}", amount)))
}

pub(crate) fn generate_transaction_reference() -> String {
    let suffix = format!("{:06}", rand::rng().random_range(0..1_000_000));
    format!("PAY-{}-{}", Utc::now().format("%Y%m%d%H%M%S"), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_keeps_two_decimal_places() {
        assert_eq!(money_from_f64(10000.0).unwrap(), "10000.00".parse::<BigDecimal>().unwrap());
        assert_eq!(money_from_f64(4500.50).unwrap(), "4500.50".parse::<BigDecimal>().unwrap());
        // 0.29 has no exact binary representation, rounding must not lose a cent
        assert_eq!(money_from_f64(0.29).unwrap(), "0.29".parse::<BigDecimal>().unwrap());
    }

    #[test]
    fn money_rejects_non_finite_values() {
        assert!(money_from_f64(f64::NAN).is_err());
        assert!(money_from_f64(f64::INFINITY).is_err());
    }

    #[test]
    fn references_are_unique_enough() {
        let a = generate_transaction_reference();
        let b = generate_transaction_reference();
        assert!(a.starts_with("PAY-"));
        assert_ne!(a, b);
    }
}
